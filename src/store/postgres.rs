// src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};
use uuid::Uuid;

use super::{ScoreStore, StoreError, StoreResult};
use crate::models::{
    assignment::{AssignmentRecord, AssignmentStatus, QuizResult},
    profile::Profile,
    score::UserScoreAggregate,
};

/// Raw 'assignments' row. `quiz_result` is decoded leniently afterwards.
#[derive(FromRow)]
struct AssignmentRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    status: String,
    quiz_result: Option<Json<serde_json::Value>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AssignmentRow> for AssignmentRecord {
    type Error = StoreError;

    fn try_from(row: AssignmentRow) -> Result<Self, Self::Error> {
        let status = AssignmentStatus::parse(&row.status).ok_or_else(|| {
            StoreError::new(format!(
                "assignment {} has unknown status '{}'",
                row.id, row.status
            ))
        })?;

        Ok(AssignmentRecord {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            status,
            quiz_result: row.quiz_result.map(|Json(v)| QuizResult::from_json(v)),
            created_at: row.created_at,
        })
    }
}

/// PostgreSQL adapter. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgScoreStore {
    pool: PgPool,
}

impl PgScoreStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScoreStore for PgScoreStore {
    async fn completed_assignments(&self, user_id: Uuid) -> StoreResult<Vec<AssignmentRecord>> {
        let rows = sqlx::query_as::<_, AssignmentRow>(
            r#"
            SELECT id, user_id, title, status, quiz_result, created_at
            FROM assignments
            WHERE user_id = $1
              AND status = $2
              AND quiz_result IS NOT NULL
              AND quiz_result <> 'null'::jsonb
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(AssignmentStatus::Completed.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch assignments for {}: {:?}", user_id, e);
            StoreError::from(e)
        })?;

        rows.into_iter().map(AssignmentRecord::try_from).collect()
    }

    async fn upsert_user_score(&self, score: &UserScoreAggregate) -> StoreResult<()> {
        // Full replacement of the computed columns; `rank` belongs to another writer.
        sqlx::query(
            r#"
            INSERT INTO user_scores (
                user_id, total_score, assignment_score, bonus_points,
                assignments_completed, perfect_scores, current_streak, last_updated
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO UPDATE SET
                total_score = EXCLUDED.total_score,
                assignment_score = EXCLUDED.assignment_score,
                bonus_points = EXCLUDED.bonus_points,
                assignments_completed = EXCLUDED.assignments_completed,
                perfect_scores = EXCLUDED.perfect_scores,
                current_streak = EXCLUDED.current_streak,
                last_updated = EXCLUDED.last_updated
            "#,
        )
        .bind(score.user_id)
        .bind(score.total_score)
        .bind(score.assignment_score)
        .bind(score.bonus_points)
        .bind(score.assignments_completed)
        .bind(score.perfect_scores)
        .bind(score.current_streak)
        .bind(score.last_updated)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert score for {}: {:?}", score.user_id, e);
            StoreError::from(e)
        })?;

        Ok(())
    }

    async fn top_user_scores(&self, limit: i64) -> StoreResult<Vec<UserScoreAggregate>> {
        let rows = sqlx::query_as::<_, UserScoreAggregate>(
            r#"
            SELECT
                user_id, total_score, assignment_score, bonus_points,
                assignments_completed, perfect_scores, current_streak, rank, last_updated
            FROM user_scores
            ORDER BY total_score DESC, last_updated ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn user_score(&self, user_id: Uuid) -> StoreResult<Option<UserScoreAggregate>> {
        let row = sqlx::query_as::<_, UserScoreAggregate>(
            r#"
            SELECT
                user_id, total_score, assignment_score, bonus_points,
                assignments_completed, perfect_scores, current_streak, rank, last_updated
            FROM user_scores
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn count_scores_above(&self, total_score: i64) -> StoreResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM user_scores WHERE total_score > $1",
        )
        .bind(total_score)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn profiles(&self, user_ids: &[Uuid]) -> StoreResult<Vec<Profile>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let profiles = sqlx::query_as::<_, Profile>(
            "SELECT id, full_name, email FROM profiles WHERE id = ANY($1)",
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }

    async fn complete_assignment(
        &self,
        assignment_id: Uuid,
        user_id: Uuid,
        quiz_result: &QuizResult,
    ) -> StoreResult<Option<AssignmentRecord>> {
        let row = sqlx::query_as::<_, AssignmentRow>(
            r#"
            UPDATE assignments
            SET status = $3, quiz_result = $4
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, status, quiz_result, created_at
            "#,
        )
        .bind(assignment_id)
        .bind(user_id)
        .bind(AssignmentStatus::Completed.as_str())
        .bind(Json(quiz_result))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to complete assignment {}: {:?}", assignment_id, e);
            StoreError::from(e)
        })?;

        row.map(AssignmentRecord::try_from).transpose()
    }

    async fn users_with_completed_assignments(&self) -> StoreResult<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT DISTINCT user_id
            FROM assignments
            WHERE status = $1
              AND quiz_result IS NOT NULL
              AND quiz_result <> 'null'::jsonb
            ORDER BY user_id
            "#,
        )
        .bind(AssignmentStatus::Completed.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
