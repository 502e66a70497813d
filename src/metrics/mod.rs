//! Prometheus metrics for the mail-merge service.
//!
//! - Record metrics (records built, malformed recipient lines)
//! - Resolution metrics (messages resolved per endpoint, unknown placeholders)
//! - Batch metrics (batch size distribution)

mod helpers;

pub use helpers::{encode_metrics, MergeMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "mailmerge";

lazy_static! {
    /// Total recipient records built
    pub static ref RECORDS_BUILT_TOTAL: IntCounter = register_int_counter!(
        format!("{}_records_built_total", METRIC_PREFIX),
        "Total recipient records built"
    ).unwrap();

    /// Recipient lines without an '@' that fell back to placeholder address parts
    pub static ref MALFORMED_RECIPIENTS_TOTAL: IntCounter = register_int_counter!(
        format!("{}_malformed_recipients_total", METRIC_PREFIX),
        "Total recipient lines without a valid email address"
    ).unwrap();

    /// Templates resolved, by endpoint
    pub static ref MESSAGES_RESOLVED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_messages_resolved_total", METRIC_PREFIX),
        "Total templates resolved",
        &["endpoint"]
    ).unwrap();

    /// Placeholders that resolved to the empty string
    pub static ref UNKNOWN_PLACEHOLDERS_TOTAL: IntCounter = register_int_counter!(
        format!("{}_unknown_placeholders_total", METRIC_PREFIX),
        "Total distinct unknown variables encountered per resolved message"
    ).unwrap();

    /// Recipients per batch request
    pub static ref BATCH_SIZE: Histogram = register_histogram!(
        format!("{}_batch_size", METRIC_PREFIX),
        "Number of recipients per batch merge",
        vec![1.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0, 10000.0]
    ).unwrap();
}
