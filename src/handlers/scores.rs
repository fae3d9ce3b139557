// src/handlers/scores.rs

use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use super::success;
use crate::{error::AppError, scoring::ScoreService, utils::jwt::Claims};

/// A user's score row and live rank.
///
/// `data` is `null` when the user has never been scored, which is not an error.
#[utoipa::path(
    get,
    path = "/api/scores/{user_id}",
    params(("user_id" = Uuid, Path, description = "User to look up")),
    responses(
        (status = 200, description = "Rank in a success envelope, or null data", body = crate::models::score::UserRank),
    ),
    tag = "scores"
)]
pub async fn get_user_score(
    State(scores): State<ScoreService>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let rank = scores.get_user_rank(user_id).await?;
    Ok(success(rank))
}

/// Recomputes any user's score. Service role only.
#[utoipa::path(
    post,
    path = "/api/scores/{user_id}/recompute",
    params(("user_id" = Uuid, Path, description = "User to recompute")),
    responses(
        (status = 200, description = "Fresh breakdown", body = crate::models::score::ScoreBreakdown),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not a service-role token"),
    ),
    security(("bearer" = [])),
    tag = "scores"
)]
pub async fn recompute_user_score(
    State(scores): State<ScoreService>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let breakdown = scores.update_user_score(user_id).await?;
    Ok(success(breakdown))
}

/// The caller's own score row and live rank.
#[utoipa::path(
    get,
    path = "/api/me/score",
    responses(
        (status = 200, description = "Rank in a success envelope, or null data", body = crate::models::score::UserRank),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer" = [])),
    tag = "scores"
)]
pub async fn get_my_score(
    State(scores): State<ScoreService>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let rank = scores.get_user_rank(claims.user_id()?).await?;
    Ok(success(rank))
}

/// Recomputes the caller's own score.
#[utoipa::path(
    post,
    path = "/api/me/score/recompute",
    responses(
        (status = 200, description = "Fresh breakdown", body = crate::models::score::ScoreBreakdown),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer" = [])),
    tag = "scores"
)]
pub async fn recompute_my_score(
    State(scores): State<ScoreService>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let breakdown = scores.update_user_score(claims.user_id()?).await?;
    Ok(success(breakdown))
}
