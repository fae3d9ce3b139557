// src/scoring/service.rs

use std::{collections::HashMap, sync::Arc};

use mockable::{Clock, DefaultClock};
use uuid::Uuid;

use super::recompute::{compute_breakdown, to_aggregate};
use crate::{
    models::{
        assignment::{AssignmentRecord, QuizResult},
        score::{LeaderboardEntry, RecomputeSummary, ScoreBreakdown, UserRank, UserScoreAggregate},
    },
    store::{ScoreStore, StoreResult},
};

/// Recomputes scores and answers ranking queries against a [`ScoreStore`].
///
/// Holds no state of its own besides the injected handles; every call is a
/// fresh read (and at most one write) against the store. Nothing is retried.
/// The clock only stamps `last_updated`.
#[derive(Clone)]
pub struct ScoreService {
    store: Arc<dyn ScoreStore>,
    clock: Arc<dyn Clock>,
}

impl ScoreService {
    pub fn new(store: Arc<dyn ScoreStore>) -> Self {
        Self::with_clock(store, Arc::new(DefaultClock))
    }

    pub fn with_clock(store: Arc<dyn ScoreStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Rebuilds the user's aggregate from their full history and replaces the stored row.
    ///
    /// A user without scorable assignments still gets an all-zero row.
    #[tracing::instrument(skip(self))]
    pub async fn update_user_score(&self, user_id: Uuid) -> StoreResult<ScoreBreakdown> {
        let assignments = self.store.completed_assignments(user_id).await?;
        let now = self.clock.utc();

        if assignments.is_empty() {
            tracing::debug!("No scorable assignments, writing zeroed score");
            self.store
                .upsert_user_score(&UserScoreAggregate::zeroed(user_id, now))
                .await?;
            return Ok(ScoreBreakdown::default());
        }

        let breakdown = compute_breakdown(&assignments);
        self.store
            .upsert_user_score(&to_aggregate(user_id, &breakdown, now))
            .await?;

        tracing::info!(
            total_score = breakdown.total_score,
            assignments = breakdown.assignments_completed,
            streak = breakdown.current_streak,
            "Score recomputed"
        );
        Ok(breakdown)
    }

    /// Top `limit` users, each paired with their profile (if any).
    pub async fn get_leaderboard(&self, limit: i64) -> StoreResult<Vec<LeaderboardEntry>> {
        let scores = self.store.top_user_scores(limit).await?;
        if scores.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = scores.iter().map(|s| s.user_id).collect();
        let mut profiles: HashMap<Uuid, _> = self
            .store
            .profiles(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(scores
            .into_iter()
            .enumerate()
            .map(|(i, score)| {
                let profile = profiles.remove(&score.user_id);
                LeaderboardEntry::new(i + 1, score, profile)
            })
            .collect())
    }

    /// The user's own row with a live rank, or `None` if they have never been scored.
    pub async fn get_user_rank(&self, user_id: Uuid) -> StoreResult<Option<UserRank>> {
        let Some(score) = self.store.user_score(user_id).await? else {
            return Ok(None);
        };

        let profile = self.store.profiles(&[user_id]).await?.into_iter().next();
        let above = self.store.count_scores_above(score.total_score).await?;

        Ok(Some(UserRank::new(score, profile, above + 1)))
    }

    /// Records a graded quiz against one of the user's assignments.
    ///
    /// Returns `None` if the assignment does not exist or is not the user's.
    pub async fn complete_assignment(
        &self,
        assignment_id: Uuid,
        user_id: Uuid,
        quiz_result: &QuizResult,
    ) -> StoreResult<Option<AssignmentRecord>> {
        self.store
            .complete_assignment(assignment_id, user_id, quiz_result)
            .await
    }

    /// Recomputes every user that owns a completed assignment, one at a time.
    /// Individual failures are logged and reported, not propagated.
    pub async fn recompute_all(&self) -> StoreResult<RecomputeSummary> {
        let users = self.store.users_with_completed_assignments().await?;
        let mut summary = RecomputeSummary::default();

        for user_id in users {
            match self.update_user_score(user_id).await {
                Ok(_) => summary.processed += 1,
                Err(e) => {
                    tracing::warn!("Recompute failed for {}: {}", user_id, e);
                    summary.failed.push(user_id);
                }
            }
        }

        tracing::info!(
            processed = summary.processed,
            failed = summary.failed.len(),
            "Bulk recompute finished"
        );
        Ok(summary)
    }
}
