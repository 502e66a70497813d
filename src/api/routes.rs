use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::health::health;
use super::merge::{
    apply_merge, merge_batch, parse_recipient, personalization_documentation,
    personalization_variables,
};
use super::metrics::prometheus_metrics;
use super::template::analyze_variables;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        .nest(
            "/api",
            Router::new()
                // Variable catalogue
                .route(
                    "/email/personalization-variables",
                    get(personalization_variables),
                )
                .route(
                    "/email/personalization-documentation",
                    get(personalization_documentation),
                )
                // Merging
                .route("/email/parse-recipient", post(parse_recipient))
                .route("/email/apply-enhanced-merge", post(apply_merge))
                .route("/email/merge-batch", post(merge_batch))
                // Analysis
                .route("/template/analyze-variables", post(analyze_variables)),
        )
}
