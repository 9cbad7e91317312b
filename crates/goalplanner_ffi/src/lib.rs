//! Flutter bridge for GoalPlanner core.

pub mod api;
