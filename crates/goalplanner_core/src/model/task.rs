//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its creation/edit inputs.
//! - Own the tri-state status transitions used by the store.
//!
//! # Invariants
//! - `id` is assigned at creation and never rewritten by an edit.
//! - A new task always starts as `TaskStatus::Pending`.
//! - `toggle_completed` never touches a missed task, and `toggle_missed`
//!   never touches a completed one.

use crate::model::id::RecordId;
use crate::model::skill::SkillId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable identifier for a task.
pub type TaskId = RecordId;

/// Task priority, ordered High before Medium before Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Sort rank: `High=1`, `Medium=2`, `Low=3`.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Parses the persisted label (`High|Medium|Low`), case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
    Missed,
}

/// Planning horizon a task was created from. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    #[default]
    Daily,
    Monthly,
    Yearly,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }
}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    /// Scheduled calendar day, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    #[serde(default)]
    pub status: TaskStatus,
    /// Serialized as `type` to match the persisted record shape.
    #[serde(rename = "type", default)]
    pub kind: TaskKind,
    /// Weak reference; nothing checks that the skill still exists.
    #[serde(rename = "linkedSkill", default)]
    pub linked_skill: Option<SkillId>,
}

impl Task {
    /// Builds a pending task from caller input, filling defaults.
    ///
    /// `today` is used when the caller did not pick a date.
    pub fn from_new(id: TaskId, input: NewTask, today: NaiveDate) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            date: input.date.unwrap_or(today),
            status: TaskStatus::Pending,
            kind: input.kind.unwrap_or_default(),
            linked_skill: input.linked_skill,
        }
    }

    /// Flips `Pending <-> Completed`. A missed task is left as is.
    ///
    /// Returns whether the status changed.
    pub fn toggle_completed(&mut self) -> bool {
        let next = match self.status {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
            TaskStatus::Missed => return false,
        };
        self.status = next;
        true
    }

    /// Flips `Pending <-> Missed`. A completed task is left as is.
    ///
    /// Returns whether the status changed.
    pub fn toggle_missed(&mut self) -> bool {
        let next = match self.status {
            TaskStatus::Pending => TaskStatus::Missed,
            TaskStatus::Missed => TaskStatus::Pending,
            TaskStatus::Completed => return false,
        };
        self.status = next;
        true
    }

    /// Shallow-merges every field set in `patch`.
    pub fn apply_patch(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(linked_skill) = patch.linked_skill {
            self.linked_skill = linked_skill;
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn is_missed(&self) -> bool {
        self.status == TaskStatus::Missed
    }
}

/// Caller-supplied fields for creating a task.
///
/// Non-empty `title` is the caller's responsibility; the store does not
/// re-validate it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub date: Option<NaiveDate>,
    pub kind: Option<TaskKind>,
    pub linked_skill: Option<SkillId>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn kind(mut self, kind: TaskKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn linked_to(mut self, skill_id: SkillId) -> Self {
        self.linked_skill = Some(skill_id);
        self
    }
}

/// Partial update for `edit_task`.
///
/// `id` and `status` are not patchable; status moves only through
/// toggle/mark operations. `Some(None)` in `linked_skill` clears the link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub date: Option<NaiveDate>,
    pub kind: Option<TaskKind>,
    pub linked_skill: Option<Option<SkillId>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Priority filter with the "All" pass-through sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    /// Parses `All|High|Medium|Low`.
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        Priority::parse(value).map(Self::Only)
    }
}
