//! Skill domain model.
//!
//! Skills live in an ordered sequence owned by the store; position encodes
//! priority (index 0 is the highest).

use crate::model::id::RecordId;
use serde::{Deserialize, Serialize};

/// Stable identifier for a skill.
pub type SkillId = RecordId;

/// Skill lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillStatus {
    #[default]
    Active,
    Completed,
    Missed,
}

/// Tracked learning goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    #[serde(default)]
    pub status: SkillStatus,
}

impl Skill {
    pub fn new(id: SkillId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: SkillStatus::Active,
        }
    }

    /// Flips `Active <-> Completed`; a missed skill is left as is.
    pub fn toggle_completed(&mut self) -> bool {
        let next = match self.status {
            SkillStatus::Active => SkillStatus::Completed,
            SkillStatus::Completed => SkillStatus::Active,
            SkillStatus::Missed => return false,
        };
        self.status = next;
        true
    }

    /// Flips `Active <-> Missed`; a completed skill is left as is.
    pub fn toggle_missed(&mut self) -> bool {
        let next = match self.status {
            SkillStatus::Active => SkillStatus::Missed,
            SkillStatus::Missed => SkillStatus::Active,
            SkillStatus::Completed => return false,
        };
        self.status = next;
        true
    }
}

/// Direction for moving a skill within the priority sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderDirection {
    /// Towards index 0 (higher priority).
    Up,
    Down,
}

impl ReorderDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ReorderDirection, Skill, SkillStatus};
    use crate::model::id::RecordId;

    #[test]
    fn transitions_skip_the_third_state() {
        let mut skill = Skill::new(RecordId::generate(), "Guitar");
        assert!(skill.toggle_completed());
        assert_eq!(skill.status, SkillStatus::Completed);

        assert!(!skill.toggle_missed());
        assert_eq!(skill.status, SkillStatus::Completed);

        assert!(skill.toggle_completed());
        assert!(skill.toggle_missed());
        assert_eq!(skill.status, SkillStatus::Missed);
        assert!(!skill.toggle_completed());
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!(ReorderDirection::parse(" UP "), Some(ReorderDirection::Up));
        assert_eq!(ReorderDirection::parse("down"), Some(ReorderDirection::Down));
        assert_eq!(ReorderDirection::parse("left"), None);
    }
}
