//! Prometheus metrics for the template service.
//!
//! This module provides:
//! - Render metrics (renders by outcome, iterations per render)
//! - Registry metrics (registered tag functions)
//! - Template catalogue metrics (stored templates, CRUD operations)

mod helpers;

pub use helpers::{encode_metrics, RenderMetrics, TemplateMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter_vec, register_int_gauge, Histogram, IntCounterVec,
    IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "tagtpl";

lazy_static! {
    // ============================================================================
    // Render Metrics
    // ============================================================================

    /// Total parses by how the rewrite loop ended
    pub static ref RENDERS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_renders_total", METRIC_PREFIX),
        "Total template parses by outcome",
        &["outcome"]
    ).unwrap();

    /// Tag evaluations per parse
    pub static ref RENDER_ITERATIONS: Histogram = register_histogram!(
        format!("{}_render_iterations", METRIC_PREFIX),
        "Tag evaluations performed per parse",
        vec![0.0, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0]
    ).unwrap();

    // ============================================================================
    // Registry Metrics
    // ============================================================================

    /// Number of registered tag functions
    pub static ref REGISTERED_TAGS: IntGauge = register_int_gauge!(
        format!("{}_registered_tags", METRIC_PREFIX),
        "Number of registered tag functions"
    ).unwrap();

    // ============================================================================
    // Template Catalogue Metrics
    // ============================================================================

    /// Number of stored templates
    pub static ref TEMPLATES_STORED: IntGauge = register_int_gauge!(
        format!("{}_templates_stored", METRIC_PREFIX),
        "Number of templates in the catalogue"
    ).unwrap();

    /// Template catalogue operations
    pub static ref TEMPLATE_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_template_operations_total", METRIC_PREFIX),
        "Total template catalogue operations",
        &["operation"]
    ).unwrap();
}
