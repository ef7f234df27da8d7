//! API layer - HTTP endpoint handlers organized by domain.

mod health;
mod metrics;
mod render;
mod routes;
mod template;

// Re-export all handlers for use in server/app.rs
pub use health::{health, not_found, HealthResponse};
pub use metrics::prometheus_metrics;
pub use render::{
    list_tags, render, render_level_up, LevelUpRenderRequest, LevelUpRenderResponse,
    RenderRequest, TagListResponse,
};
pub use routes::api_routes;
pub use template::{
    create_template, delete_template, get_template, list_templates, render_template,
    update_template, RenderTemplateRequest,
};
