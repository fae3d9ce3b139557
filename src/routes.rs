// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    docs::ApiDoc,
    handlers::{admin, assignments, leaderboard, scores},
    state::AppState,
    utils::jwt::{auth_middleware, service_role_middleware},
};

/// Assembles the main application router.
///
/// * Public ranking routes, bearer-protected caller routes, and
///   service-role routes under `/api`.
/// * Swagger UI and the OpenAPI document.
/// * Global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let public_routes = Router::new()
        .route("/leaderboard", get(leaderboard::get_leaderboard))
        .route("/scores/{user_id}", get(scores::get_user_score));

    let caller_routes = Router::new()
        .route("/me/score", get(scores::get_my_score))
        .route("/me/score/recompute", post(scores::recompute_my_score))
        .route(
            "/assignments/{id}/complete",
            post(assignments::complete_assignment),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Auth first, then the role check
    let service_routes = Router::new()
        .route(
            "/scores/{user_id}/recompute",
            post(scores::recompute_user_score),
        )
        .route("/admin/scores/recompute", post(admin::recompute_all_scores))
        .layer(middleware::from_fn(service_role_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest(
            "/api",
            public_routes.merge(caller_routes).merge(service_routes),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
