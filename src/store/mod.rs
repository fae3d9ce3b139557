//! Storage port for scoring data.
//!
//! All durable state lives in an external relational store. The scoring
//! service only needs ordered/filtered queries, an insert-or-replace upsert
//! and a count; [`ScoreStore`] captures exactly that surface.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    assignment::{AssignmentRecord, QuizResult},
    profile::Profile,
    score::UserScoreAggregate,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryScoreStore;
pub use postgres::PgScoreStore;

/// Opaque store failure. No distinction is made between failure kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("score store failure: {message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::new(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Completed assignments with a quiz result, oldest first.
    async fn completed_assignments(&self, user_id: Uuid) -> StoreResult<Vec<AssignmentRecord>>;

    /// Insert-or-replace by `user_id`. A stored `rank` is left as it was.
    async fn upsert_user_score(&self, score: &UserScoreAggregate) -> StoreResult<()>;

    /// Top rows by `total_score` desc, then `last_updated` asc.
    async fn top_user_scores(&self, limit: i64) -> StoreResult<Vec<UserScoreAggregate>>;

    async fn user_score(&self, user_id: Uuid) -> StoreResult<Option<UserScoreAggregate>>;

    /// Number of rows with a strictly greater `total_score`.
    async fn count_scores_above(&self, total_score: i64) -> StoreResult<i64>;

    /// Batched profile lookup. Unknown ids are simply absent from the result.
    async fn profiles(&self, user_ids: &[Uuid]) -> StoreResult<Vec<Profile>>;

    /// Marks one of the user's assignments completed with the given result.
    /// Returns `None` when no such assignment belongs to the user.
    async fn complete_assignment(
        &self,
        assignment_id: Uuid,
        user_id: Uuid,
        quiz_result: &QuizResult,
    ) -> StoreResult<Option<AssignmentRecord>>;

    /// Distinct owners of at least one completed assignment.
    async fn users_with_completed_assignments(&self) -> StoreResult<Vec<Uuid>>;
}
