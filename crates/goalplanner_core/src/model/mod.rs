//! Domain model for tasks and skills.
//!
//! # Responsibility
//! - Define canonical data structures owned by the domain store.
//! - Keep the persisted field names stable (`linkedSkill`, `type`).
//!
//! # Invariants
//! - Every record is identified by a stable opaque id that never changes.
//! - Status changes only through explicit toggle/mark transitions.
//! - Deletion is a hard removal; there are no tombstones.

pub mod id;
pub mod skill;
pub mod task;
