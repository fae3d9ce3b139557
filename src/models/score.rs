// src/models/score.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::profile::{Profile, display_name};

/// Represents the 'user_scores' table. One row per user, replaced on every recompute.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct UserScoreAggregate {
    pub user_id: Uuid,

    /// `assignment_score + bonus_points`.
    pub total_score: i64,
    pub assignment_score: i64,

    /// Performance bonuses plus the single streak bonus.
    pub bonus_points: i64,
    pub assignments_completed: i64,
    pub perfect_scores: i64,

    /// Longest run of closely spaced completions in the user's history.
    pub current_streak: i64,

    /// Rank written by an external job, if any. Recomputes never touch it.
    pub rank: Option<i64>,

    pub last_updated: DateTime<Utc>,
}

impl UserScoreAggregate {
    /// The row written for a user with no scorable assignments.
    pub fn zeroed(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            total_score: 0,
            assignment_score: 0,
            bonus_points: 0,
            assignments_completed: 0,
            perfect_scores: 0,
            current_streak: 0,
            rank: None,
            last_updated: now,
        }
    }
}

/// Points earned by a single assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AssignmentPoints {
    pub base_points: i64,
    pub bonus_points: i64,
    pub total_points: i64,
}

/// Result of a recompute, returned to the caller for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ScoreBreakdown {
    pub total_score: i64,
    pub assignment_score: i64,
    pub bonus_points: i64,

    /// Sum of per-assignment performance bonuses.
    pub performance_bonus: i64,

    /// `(current_streak - 1) * 5`, zero without history.
    pub streak_bonus: i64,
    pub assignments_completed: i64,
    pub perfect_scores: i64,
    pub current_streak: i64,
}

/// One row of the public leaderboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    /// 1-based position within this listing.
    pub position: usize,
    pub display_name: String,
    #[serde(flatten)]
    pub score: UserScoreAggregate,
    pub profile: Option<Profile>,
}

impl LeaderboardEntry {
    pub fn new(position: usize, score: UserScoreAggregate, profile: Option<Profile>) -> Self {
        Self {
            position,
            display_name: display_name(profile.as_ref()),
            score,
            profile,
        }
    }
}

/// A user's own standing.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserRank {
    #[serde(flatten)]
    pub score: UserScoreAggregate,
    pub profile: Option<Profile>,
    pub display_name: String,

    /// `1 + number of users with a strictly greater total score`.
    pub dynamic_rank: i64,

    /// Stored rank when present, otherwise `dynamic_rank`.
    pub effective_rank: i64,
}

impl UserRank {
    pub fn new(score: UserScoreAggregate, profile: Option<Profile>, dynamic_rank: i64) -> Self {
        let effective_rank = score.rank.unwrap_or(dynamic_rank);
        Self {
            display_name: display_name(profile.as_ref()),
            score,
            profile,
            dynamic_rank,
            effective_rank,
        }
    }
}

/// Outcome of a bulk recompute.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct RecomputeSummary {
    pub processed: usize,
    pub failed: Vec<Uuid>,
}
