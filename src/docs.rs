// src/docs.rs

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    handlers::{admin, assignments, leaderboard, scores},
    models::{
        assignment::{AssignmentRecord, AssignmentStatus, CompleteAssignmentRequest, QuizResult},
        profile::Profile,
        score::{LeaderboardEntry, RecomputeSummary, ScoreBreakdown, UserRank, UserScoreAggregate},
    },
};

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        leaderboard::get_leaderboard,
        scores::get_user_score,
        scores::recompute_user_score,
        scores::get_my_score,
        scores::recompute_my_score,
        assignments::complete_assignment,
        admin::recompute_all_scores,
    ),
    components(schemas(
        AssignmentRecord,
        AssignmentStatus,
        CompleteAssignmentRequest,
        LeaderboardEntry,
        Profile,
        QuizResult,
        RecomputeSummary,
        ScoreBreakdown,
        UserRank,
        UserScoreAggregate,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "leaderboard", description = "Public ranking"),
        (name = "scores", description = "Score aggregates and recomputation"),
        (name = "assignments", description = "Quiz submissions feeding the scorer"),
        (name = "admin", description = "Service-role maintenance"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/leaderboard",
            "/api/scores/{user_id}",
            "/api/scores/{user_id}/recompute",
            "/api/me/score",
            "/api/me/score/recompute",
            "/api/assignments/{id}/complete",
            "/api/admin/scores/recompute",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        assert!(
            doc.components
                .as_ref()
                .is_some_and(|c| c.security_schemes.contains_key("bearer"))
        );
    }
}
