// src/handlers/leaderboard.rs

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use super::success;
use crate::{config::Config, error::AppError, scoring::ScoreService};

/// Query parameters for the leaderboard.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardParams {
    /// Number of rows to return. Defaults to the configured limit.
    #[validate(range(min = 1))]
    pub limit: Option<i64>,
}

/// Top scorers, highest total first; ties go to whoever got there earlier.
#[utoipa::path(
    get,
    path = "/api/leaderboard",
    params(LeaderboardParams),
    responses(
        (status = 200, description = "Ranked rows in a success envelope", body = [crate::models::score::LeaderboardEntry]),
        (status = 400, description = "Limit not a number or out of range"),
    ),
    tag = "leaderboard"
)]
pub async fn get_leaderboard(
    State(scores): State<ScoreService>,
    State(config): State<Config>,
    query: Result<Query<LeaderboardParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = query?;
    params.validate()?;

    let limit = params.limit.unwrap_or(config.leaderboard_default_limit);
    if limit > config.leaderboard_max_limit {
        return Err(AppError::BadRequest(format!(
            "limit must not exceed {}",
            config.leaderboard_max_limit
        )));
    }

    let entries = scores.get_leaderboard(limit).await?;
    Ok(success(entries))
}
