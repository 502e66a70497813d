//! API layer - HTTP endpoint handlers organized by domain.

mod health;
mod merge;
mod metrics;
mod routes;
mod template;

pub use health::{health, HealthResponse};
pub use merge::{
    apply_merge, merge_batch, parse_recipient, personalization_documentation,
    personalization_variables, ApplyMergeRequest, ApplyMergeResponse, MergeBatchRequest,
    MergeBatchResponse, ParseRecipientRequest, ParseRecipientResponse,
};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
pub use template::{analyze_variables, AnalyzeTemplateRequest};
