//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use super::{RENDERS_TOTAL, RENDER_ITERATIONS, TEMPLATE_OPERATIONS_TOTAL};
use crate::tags::ParseOutcome;

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording parse metrics
pub struct RenderMetrics;

impl RenderMetrics {
    /// Record a finished parse
    pub fn record(outcome: ParseOutcome, iterations: usize) {
        RENDERS_TOTAL.with_label_values(&[outcome.as_str()]).inc();
        RENDER_ITERATIONS.observe(iterations as f64);
    }
}

/// Helper struct for recording template catalogue metrics
pub struct TemplateMetrics;

impl TemplateMetrics {
    pub fn record_created() {
        TEMPLATE_OPERATIONS_TOTAL.with_label_values(&["create"]).inc();
    }

    pub fn record_updated() {
        TEMPLATE_OPERATIONS_TOTAL.with_label_values(&["update"]).inc();
    }

    pub fn record_deleted() {
        TEMPLATE_OPERATIONS_TOTAL.with_label_values(&["delete"]).inc();
    }

    pub fn record_rendered() {
        TEMPLATE_OPERATIONS_TOTAL.with_label_values(&["render"]).inc();
    }
}
