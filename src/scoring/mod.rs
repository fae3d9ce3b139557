//! Gamification scoring: per-assignment points, streaks, and the service
//! that persists aggregates and serves rankings.

pub mod points;
pub mod recompute;
pub mod service;
pub mod streak;

pub use points::calculate_assignment_points;
pub use service::ScoreService;
