//! Personalization endpoints: variable catalogue, recipient parsing and merging.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::merge::{
    available_variables, generate_documentation, parse_recipient_list, resolve_with_report,
    MergedMessage, MessageTemplate, RecipientRecord, VariableInfo,
};
use crate::metrics::MergeMetrics;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRecipientRequest {
    #[serde(default)]
    pub recipient_line: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ParseRecipientResponse {
    pub success: bool,
    pub variables: RecipientRecord,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyMergeRequest {
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub recipient_line: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyMergeResponse {
    pub success: bool,
    pub result: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown_variables: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeBatchRequest {
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub template: Option<String>,
    /// One recipient line per entry
    #[serde(default)]
    pub recipients: Vec<String>,
    /// Raw recipients file contents, one recipient per line
    #[serde(default)]
    pub recipients_text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeBatchResponse {
    pub success: bool,
    pub total: usize,
    pub messages: Vec<MergedMessage>,
}

#[derive(Debug, Serialize)]
pub struct DocumentationResponse {
    pub success: bool,
    pub documentation: String,
}

/// Treat a missing or blank field as absent
fn required(value: Option<String>, message: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation(message.to_string())),
    }
}

/// GET /api/email/personalization-variables
pub async fn personalization_variables() -> Json<Vec<VariableInfo>> {
    Json(available_variables())
}

/// GET /api/email/personalization-documentation
pub async fn personalization_documentation() -> Json<DocumentationResponse> {
    Json(DocumentationResponse {
        success: true,
        documentation: generate_documentation(),
    })
}

/// POST /api/email/parse-recipient
#[tracing::instrument(name = "http.parse_recipient", skip(state, request))]
pub async fn parse_recipient(
    State(state): State<AppState>,
    Json(request): Json<ParseRecipientRequest>,
) -> Result<Json<ParseRecipientResponse>> {
    let line = required(request.recipient_line, "Recipient line is required")?;

    let variables = state.merge.parse_recipient(&line);
    MergeMetrics::record_built(variables.used_fallback_address());

    Ok(Json(ParseRecipientResponse {
        success: true,
        variables,
    }))
}

/// POST /api/email/apply-enhanced-merge
#[tracing::instrument(name = "http.apply_merge", skip(state, request))]
pub async fn apply_merge(
    State(state): State<AppState>,
    Json(request): Json<ApplyMergeRequest>,
) -> Result<Json<ApplyMergeResponse>> {
    let (template, line) = match (request.template, request.recipient_line) {
        (Some(t), Some(l)) if !t.is_empty() && !l.trim().is_empty() => (t, l),
        _ => {
            return Err(AppError::Validation(
                "Template and recipient line are required".to_string(),
            ))
        }
    };

    let record = state.merge.parse_recipient(&line);
    MergeMetrics::record_built(record.used_fallback_address());

    let resolution = resolve_with_report(&template, &record);
    MergeMetrics::record_resolved("apply", resolution.unknown.len());

    if !resolution.unknown.is_empty() {
        tracing::debug!(unknown = ?resolution.unknown, "Template uses variables the recipient lacks");
    }

    Ok(Json(ApplyMergeResponse {
        success: true,
        result: resolution.message,
        unknown_variables: resolution.unknown,
    }))
}

/// POST /api/email/merge-batch
#[tracing::instrument(name = "http.merge_batch", skip(state, request))]
pub async fn merge_batch(
    State(state): State<AppState>,
    Json(request): Json<MergeBatchRequest>,
) -> Result<Json<MergeBatchResponse>> {
    let body = required(request.template, "Template is required")?;

    let mut lines: Vec<String> = request
        .recipients
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if let Some(text) = request.recipients_text.as_deref() {
        lines.extend(parse_recipient_list(text));
    }

    if lines.is_empty() {
        return Err(AppError::Validation(
            "At least one recipient is required".to_string(),
        ));
    }

    let max = state.settings.merge.max_batch_size;
    if lines.len() > max {
        return Err(AppError::Validation(format!(
            "Batch of {} recipients exceeds the limit of {}",
            lines.len(),
            max
        )));
    }

    let template = MessageTemplate::new(body).with_subjects(request.subjects);
    let max_output_bytes = state.settings.merge.max_output_bytes;
    let merge = state.merge.clone();

    let messages = tokio::task::spawn_blocking(move || {
        merge.merge_batch_bounded(&template, &lines, max_output_bytes)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Batch merge task failed: {}", e)))?
    .map_err(|e| {
        tracing::warn!(limit = e.limit, merged = e.merged, "Batch output limit exceeded");
        AppError::Validation(e.to_string())
    })?;

    MergeMetrics::record_batch(messages.len());
    for message in &messages {
        MergeMetrics::record_built(message.malformed_address);
        MergeMetrics::record_resolved("batch", message.unknown_variables.len());
    }

    let malformed = messages.iter().filter(|m| m.malformed_address).count();
    tracing::info!(
        total = messages.len(),
        malformed,
        "Batch merge completed"
    );

    Ok(Json(MergeBatchResponse {
        success: true,
        total: messages.len(),
        messages,
    }))
}
