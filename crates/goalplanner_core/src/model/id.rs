//! Opaque record identifiers.
//!
//! # Invariants
//! - Ids are compared as exact strings; they are never normalized.
//! - Ids minted here are UUID v4 strings. Ids read back from storage or a
//!   backup keep whatever form they were written in.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Identifier shared by tasks and skills.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Mints a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Accepts any non-blank id, trimmed.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Uuid> for RecordId {
    fn from(value: Uuid) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::RecordId;

    #[test]
    fn generated_ids_are_uuid_strings() {
        let id = RecordId::generate();
        assert!(uuid::Uuid::parse_str(id.as_str()).is_ok());
        assert_ne!(id, RecordId::generate());
    }

    #[test]
    fn parse_keeps_short_legacy_ids_and_rejects_blank() {
        assert_eq!(RecordId::parse(" k3x9a2b ").unwrap().as_str(), "k3x9a2b");
        assert_eq!(RecordId::parse("   "), None);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = RecordId::parse("abc1234").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc1234\"");
        let back: RecordId = serde_json::from_str("\"abc1234\"").unwrap();
        assert_eq!(back, id);
    }
}
