// src/handlers/admin.rs

use axum::{extract::State, response::IntoResponse};

use super::success;
use crate::{error::AppError, scoring::ScoreService};

/// Recomputes every user with at least one completed assignment.
/// Service role only.
#[utoipa::path(
    post,
    path = "/api/admin/scores/recompute",
    responses(
        (status = 200, description = "Processed/failed summary", body = crate::models::score::RecomputeSummary),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not a service-role token"),
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
pub async fn recompute_all_scores(
    State(scores): State<ScoreService>,
) -> Result<impl IntoResponse, AppError> {
    let summary = scores.recompute_all().await?;
    Ok(success(summary))
}
