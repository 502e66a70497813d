//! Template variable analysis endpoint.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::merge::{analyze, analyze_against, TemplateAnalysis};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTemplateRequest {
    #[serde(default)]
    pub template: Option<String>,
    /// When given, the analysis also lists variables this recipient lacks
    #[serde(default)]
    pub recipient_line: Option<String>,
}

/// POST /api/template/analyze-variables
#[tracing::instrument(name = "http.analyze_template", skip(state, request))]
pub async fn analyze_variables(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeTemplateRequest>,
) -> Result<Json<TemplateAnalysis>> {
    let template = request
        .template
        .ok_or_else(|| AppError::Validation("Template is required".to_string()))?;

    let analysis = match request.recipient_line.as_deref() {
        Some(line) if !line.trim().is_empty() => {
            analyze_against(&template, &state.merge.parse_recipient(line))
        }
        _ => analyze(&template),
    };

    Ok(Json(analysis))
}
