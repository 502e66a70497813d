//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use super::{
    BATCH_SIZE, MALFORMED_RECIPIENTS_TOTAL, MESSAGES_RESOLVED_TOTAL, RECORDS_BUILT_TOTAL,
    UNKNOWN_PLACEHOLDERS_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording merge metrics
pub struct MergeMetrics;

impl MergeMetrics {
    /// Record a built recipient record
    pub fn record_built(malformed: bool) {
        RECORDS_BUILT_TOTAL.inc();
        if malformed {
            MALFORMED_RECIPIENTS_TOTAL.inc();
        }
    }

    /// Record a resolved template and the unknown variables it referenced
    pub fn record_resolved(endpoint: &str, unknown: usize) {
        MESSAGES_RESOLVED_TOTAL.with_label_values(&[endpoint]).inc();
        UNKNOWN_PLACEHOLDERS_TOTAL.inc_by(unknown as u64);
    }

    pub fn record_batch(size: usize) {
        BATCH_SIZE.observe(size as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_contains_recorded_metrics() {
        MergeMetrics::record_built(true);
        MergeMetrics::record_resolved("test", 2);
        MergeMetrics::record_batch(3);

        let output = encode_metrics().unwrap();
        assert!(output.contains("mailmerge_records_built_total"));
        assert!(output.contains("mailmerge_malformed_recipients_total"));
        assert!(output.contains("mailmerge_messages_resolved_total{endpoint=\"test\"}"));
        assert!(output.contains("mailmerge_batch_size_bucket"));
    }
}
