// src/store/memory.rs

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ScoreStore, StoreResult};
use crate::models::{
    assignment::{AssignmentRecord, AssignmentStatus, QuizResult},
    profile::Profile,
    score::UserScoreAggregate,
};

#[derive(Default)]
struct Tables {
    assignments: Vec<AssignmentRecord>,
    scores: HashMap<Uuid, UserScoreAggregate>,
    profiles: HashMap<Uuid, Profile>,
}

/// In-process store with the same ordering and upsert rules as the
/// PostgreSQL adapter. Used by tests and local runs without a database.
#[derive(Default)]
pub struct MemoryScoreStore {
    tables: RwLock<Tables>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_assignment(&self, assignment: AssignmentRecord) {
        self.tables.write().await.assignments.push(assignment);
    }

    pub async fn insert_profile(&self, profile: Profile) {
        self.tables
            .write()
            .await
            .profiles
            .insert(profile.id, profile);
    }

    /// Writes a stored rank, as an external ranking job would.
    pub async fn set_rank(&self, user_id: Uuid, rank: Option<i64>) {
        if let Some(row) = self.tables.write().await.scores.get_mut(&user_id) {
            row.rank = rank;
        }
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn completed_assignments(&self, user_id: Uuid) -> StoreResult<Vec<AssignmentRecord>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<AssignmentRecord> = tables
            .assignments
            .iter()
            .filter(|a| a.user_id == user_id && a.is_scorable())
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.created_at);
        Ok(rows)
    }

    async fn upsert_user_score(&self, score: &UserScoreAggregate) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let rank = tables.scores.get(&score.user_id).and_then(|s| s.rank);
        tables.scores.insert(
            score.user_id,
            UserScoreAggregate {
                rank,
                ..score.clone()
            },
        );
        Ok(())
    }

    async fn top_user_scores(&self, limit: i64) -> StoreResult<Vec<UserScoreAggregate>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<UserScoreAggregate> = tables.scores.values().cloned().collect();
        rows.sort_by(|a, b| {
            b.total_score
                .cmp(&a.total_score)
                .then(a.last_updated.cmp(&b.last_updated))
        });
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn user_score(&self, user_id: Uuid) -> StoreResult<Option<UserScoreAggregate>> {
        Ok(self.tables.read().await.scores.get(&user_id).cloned())
    }

    async fn count_scores_above(&self, total_score: i64) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        let count = tables
            .scores
            .values()
            .filter(|s| s.total_score > total_score)
            .count();
        Ok(count as i64)
    }

    async fn profiles(&self, user_ids: &[Uuid]) -> StoreResult<Vec<Profile>> {
        let tables = self.tables.read().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| tables.profiles.get(id).cloned())
            .collect())
    }

    async fn complete_assignment(
        &self,
        assignment_id: Uuid,
        user_id: Uuid,
        quiz_result: &QuizResult,
    ) -> StoreResult<Option<AssignmentRecord>> {
        let mut tables = self.tables.write().await;
        let Some(assignment) = tables
            .assignments
            .iter_mut()
            .find(|a| a.id == assignment_id && a.user_id == user_id)
        else {
            return Ok(None);
        };

        assignment.status = AssignmentStatus::Completed;
        assignment.quiz_result = Some(quiz_result.clone());
        Ok(Some(assignment.clone()))
    }

    async fn users_with_completed_assignments(&self) -> StoreResult<Vec<Uuid>> {
        let tables = self.tables.read().await;
        let ids: BTreeSet<Uuid> = tables
            .assignments
            .iter()
            .filter(|a| a.is_scorable())
            .map(|a| a.user_id)
            .collect();
        Ok(ids.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn score(user_id: Uuid, total: i64, minute: i64) -> UserScoreAggregate {
        UserScoreAggregate {
            total_score: total,
            last_updated: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
                + Duration::minutes(minute),
            ..UserScoreAggregate::zeroed(user_id, Utc::now())
        }
    }

    #[tokio::test]
    async fn test_top_scores_order_and_tie_break() {
        let store = MemoryScoreStore::new();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        store.upsert_user_score(&score(a, 100, 10)).await.unwrap();
        store.upsert_user_score(&score(b, 100, 5)).await.unwrap();
        store.upsert_user_score(&score(c, 300, 20)).await.unwrap();

        let top = store.top_user_scores(10).await.unwrap();
        let order: Vec<Uuid> = top.iter().map(|s| s.user_id).collect();
        assert_eq!(order, vec![c, b, a]);

        let top = store.top_user_scores(1).await.unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].user_id, c);
    }

    #[tokio::test]
    async fn test_upsert_replaces_row_but_keeps_stored_rank() {
        let store = MemoryScoreStore::new();
        let user = Uuid::new_v4();

        store.upsert_user_score(&score(user, 50, 0)).await.unwrap();
        store.set_rank(user, Some(7)).await;
        store.upsert_user_score(&score(user, 20, 1)).await.unwrap();

        let row = store.user_score(user).await.unwrap().unwrap();
        assert_eq!(row.total_score, 20);
        assert_eq!(row.rank, Some(7));
    }

    #[tokio::test]
    async fn test_completed_assignments_are_filtered_and_sorted() {
        let store = MemoryScoreStore::new();
        let user = Uuid::new_v4();
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

        let make = |day: i64, status: AssignmentStatus, with_result: bool| AssignmentRecord {
            id: Uuid::new_v4(),
            user_id: user,
            title: "Quiz".into(),
            status,
            quiz_result: with_result.then(|| QuizResult::graded(1, 2)),
            created_at: base + Duration::days(day),
        };

        store.insert_assignment(make(3, AssignmentStatus::Completed, true)).await;
        store.insert_assignment(make(1, AssignmentStatus::Completed, true)).await;
        store.insert_assignment(make(2, AssignmentStatus::Pending, true)).await;
        store.insert_assignment(make(0, AssignmentStatus::Completed, false)).await;

        let rows = store.completed_assignments(user).await.unwrap();
        let days: Vec<i64> = rows.iter().map(|a| (a.created_at - base).num_days()).collect();
        assert_eq!(days, vec![1, 3]);

        assert_eq!(store.users_with_completed_assignments().await.unwrap(), vec![user]);
    }

    #[tokio::test]
    async fn test_complete_assignment_checks_owner() {
        let store = MemoryScoreStore::new();
        let owner = Uuid::new_v4();
        let assignment = AssignmentRecord {
            id: Uuid::new_v4(),
            user_id: owner,
            title: "Essay".into(),
            status: AssignmentStatus::Pending,
            quiz_result: None,
            created_at: Utc::now(),
        };
        let id = assignment.id;
        store.insert_assignment(assignment).await;

        let result = QuizResult::graded(3, 4);
        let other = store
            .complete_assignment(id, Uuid::new_v4(), &result)
            .await
            .unwrap();
        assert!(other.is_none());

        let done = store.complete_assignment(id, owner, &result).await.unwrap().unwrap();
        assert_eq!(done.status, AssignmentStatus::Completed);
        assert_eq!(done.quiz_result, Some(result));
    }
}
