//! # Routes
//!
//! Axum router configuration for the leadgen API.

use crate::handlers;
use crate::state::{AppConfig, AppState};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Create the main application router
///
/// Routes:
/// - GET  /health
/// - POST /api/v1/checkout, GET /api/v1/subscription
/// - GET/POST /api/v1/projects
/// - GET/PUT/DELETE /api/v1/projects/{id}
/// - POST /api/v1/projects/{id}/discover
/// - GET/PUT/DELETE /api/v1/projects/{id}/scheduler
/// - GET/DELETE /api/v1/projects/{id}/reddit, POST /api/v1/projects/{id}/reddit/connect
/// - POST /api/v1/projects/{id}/messages, GET /api/v1/projects/{id}/interactions
/// - GET  /api/v1/reddit/callback (Reddit redirect target, no bearer token)
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let billing_routes = Router::new()
        .route("/checkout", post(handlers::create_checkout))
        .route("/subscription", get(handlers::subscription_status));

    let project_routes = Router::new()
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/projects/{id}",
            get(handlers::get_project)
                .put(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .route("/projects/{id}/discover", post(handlers::discover_leads))
        .route(
            "/projects/{id}/scheduler",
            get(handlers::get_scheduler)
                .put(handlers::put_scheduler)
                .delete(handlers::delete_scheduler),
        )
        .route(
            "/projects/{id}/reddit",
            get(handlers::reddit_status).delete(handlers::reddit_disconnect),
        )
        .route(
            "/projects/{id}/reddit/connect",
            post(handlers::reddit_connect),
        )
        .route("/projects/{id}/messages", post(handlers::send_message))
        .route(
            "/projects/{id}/interactions",
            get(handlers::list_interactions),
        );

    let api_routes = Router::new()
        .merge(billing_routes)
        .merge(project_routes)
        .route("/reddit/callback", get(handlers::reddit_callback));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The frontend is the only browser origin; anything else in development
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if !config.is_production() {
        return layer.allow_origin(Any);
    }

    match HeaderValue::from_str(&config.app_url) {
        Ok(origin) => layer.allow_origin(AllowOrigin::exact(origin)),
        Err(e) => {
            warn!("APP_URL is not a valid origin ({}); CORS allows any origin", e);
            layer.allow_origin(Any)
        }
    }
}
