use axum::{extract::DefaultBodyLimit, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::api::api_routes;

use super::AppState;

pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = RequestBodyLimitLayer::new(state.settings.server.max_body_bytes);

    Router::new()
        .merge(api_routes())
        .layer(DefaultBodyLimit::disable())
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
