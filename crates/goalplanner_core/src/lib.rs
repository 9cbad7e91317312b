//! Core domain logic for GoalPlanner.
//! This crate owns the task/skill state, its persistence and analytics.

pub mod analytics;
pub mod backup;
pub mod date;
pub mod db;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod storage;
pub mod store;

pub use analytics::{DailyStat, ProductiveDay, TaskStats, DEFAULT_DAILY_STATS_DAYS};
pub use backup::{export_backup, import_backup, BackupDocument, BackupError, ImportSummary};
pub use date::{Clock, DateError, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::id::RecordId;
pub use model::skill::{ReorderDirection, Skill, SkillId, SkillStatus};
pub use model::task::{
    NewTask, Priority, PriorityFilter, Task, TaskId, TaskKind, TaskPatch, TaskStatus,
};
pub use persistence::{Loaded, Persistence, PersistenceKeys};
pub use storage::{KvError, KvResult, KvStore, MemoryKvStore, SqliteKvStore};
pub use store::{Store, StoreConfig};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
