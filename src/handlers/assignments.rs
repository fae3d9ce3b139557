// src/handlers/assignments.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use super::success;
use crate::{
    error::AppError,
    models::assignment::{CompleteAssignmentRequest, QuizResult},
    scoring::ScoreService,
    utils::jwt::Claims,
};

/// Submits a graded quiz for one of the caller's assignments.
///
/// * Derives the rounded percentage and marks the assignment completed.
/// * Recomputes the caller's score. A failed recompute is logged and the
///   response carries `score: null`; the submission itself still succeeds.
#[utoipa::path(
    post,
    path = "/api/assignments/{id}/complete",
    params(("id" = Uuid, Path, description = "Assignment id")),
    request_body = CompleteAssignmentRequest,
    responses(
        (status = 200, description = "Updated assignment and score breakdown"),
        (status = 400, description = "Invalid score/total"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Assignment not found for this user"),
    ),
    security(("bearer" = [])),
    tag = "assignments"
)]
pub async fn complete_assignment(
    State(scores): State<ScoreService>,
    Extension(claims): Extension<Claims>,
    Path(assignment_id): Path<Uuid>,
    Json(req): Json<CompleteAssignmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    let user_id = claims.user_id()?;

    let quiz_result = QuizResult::graded(req.score, req.total);
    let assignment = scores
        .complete_assignment(assignment_id, user_id, &quiz_result)
        .await?
        .ok_or(AppError::NotFound("Assignment not found".to_string()))?;

    let score = match scores.update_user_score(user_id).await {
        Ok(breakdown) => Some(breakdown),
        Err(e) => {
            tracing::warn!("Score update after completing {} failed: {}", assignment_id, e);
            None
        }
    };

    Ok(success(json!({
        "assignment": assignment,
        "score": score,
    })))
}
