//! Backup export/import of the full task and skill state.
//!
//! # Invariants
//! - Import parses the whole document before touching the store; a
//!   malformed document leaves existing state unchanged.
//! - Ids are unique per collection in an accepted document.
//! - The theme flag is not part of a backup.

use crate::model::id::RecordId;
use crate::model::skill::Skill;
use crate::model::task::Task;
use crate::storage::KvStore;
use crate::store::Store;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Serialized backup shape: `{ "tasks": [...], "skills": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupDocument {
    pub tasks: Vec<Task>,
    pub skills: Vec<Skill>,
}

/// Counts applied by a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub tasks: usize,
    pub skills: usize,
}

#[derive(Debug)]
pub enum BackupError {
    /// Document could not be parsed into a `BackupDocument`.
    Malformed(serde_json::Error),
    /// State could not be encoded.
    Encode(serde_json::Error),
    /// Two records of the same collection share an id.
    DuplicateId { record: &'static str, id: RecordId },
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "backup document is malformed: {err}"),
            Self::Encode(err) => write!(f, "failed to encode backup: {err}"),
            Self::DuplicateId { record, id } => {
                write!(f, "backup document repeats {record} id `{id}`")
            }
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) | Self::Encode(err) => Some(err),
            Self::DuplicateId { .. } => None,
        }
    }
}

impl BackupDocument {
    pub fn from_store<S: KvStore>(store: &Store<S>) -> Self {
        Self {
            tasks: store.tasks().to_vec(),
            skills: store.skills().to_vec(),
        }
    }

    pub fn parse(document: &str) -> Result<Self, BackupError> {
        let parsed: Self = serde_json::from_str(document).map_err(BackupError::Malformed)?;
        ensure_unique("task", parsed.tasks.iter().map(|task| &task.id))?;
        ensure_unique("skill", parsed.skills.iter().map(|skill| &skill.id))?;
        Ok(parsed)
    }

    pub fn to_pretty_json(&self) -> Result<String, BackupError> {
        serde_json::to_string_pretty(self).map_err(BackupError::Encode)
    }
}

fn ensure_unique<'a>(
    record: &'static str,
    ids: impl Iterator<Item = &'a RecordId>,
) -> Result<(), BackupError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(BackupError::DuplicateId {
                record,
                id: id.clone(),
            });
        }
    }
    Ok(())
}

/// Serializes the store's tasks and skills as pretty JSON.
pub fn export_backup<S: KvStore>(store: &Store<S>) -> Result<String, BackupError> {
    let document = BackupDocument::from_store(store);
    let json = document.to_pretty_json()?;
    info!(
        "event=backup_export module=backup status=ok tasks={} skills={} bytes={}",
        document.tasks.len(),
        document.skills.len(),
        json.len()
    );
    Ok(json)
}

/// Replaces the store's tasks and skills with the document's contents.
///
/// # Errors
/// - `Malformed` when the document does not parse; the store is untouched.
/// - `DuplicateId` when a collection repeats an id; the store is untouched.
pub fn import_backup<S: KvStore>(
    store: &mut Store<S>,
    document: &str,
) -> Result<ImportSummary, BackupError> {
    let parsed = match BackupDocument::parse(document) {
        Ok(parsed) => parsed,
        Err(err) => {
            let error_code = match err {
                BackupError::DuplicateId { .. } => "duplicate_id",
                _ => "malformed",
            };
            warn!(
                "event=backup_import module=backup status=error error_code={error_code} bytes={}",
                document.len()
            );
            return Err(err);
        }
    };

    let summary = ImportSummary {
        tasks: parsed.tasks.len(),
        skills: parsed.skills.len(),
    };
    store.replace_all(parsed.tasks, parsed.skills);
    info!(
        "event=backup_import module=backup status=ok tasks={} skills={}",
        summary.tasks, summary.skills
    );
    Ok(summary)
}
