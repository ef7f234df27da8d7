use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::server::{api_key_auth, AppState};

use super::health::{health, not_found};
use super::metrics::prometheus_metrics;
use super::render::{list_tags, render, render_level_up};
use super::template::{
    create_template, delete_template, get_template, list_templates, render_template,
    update_template,
};

pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        // Engine endpoints, behind the API key when one is configured
        .nest(
            "/api/v1",
            Router::new()
                // Ad-hoc rendering
                .route("/render", post(render))
                .route("/tags", get(list_tags))
                .route("/level-up/render", post(render_level_up))
                // Template catalogue
                .route("/templates", get(list_templates).post(create_template))
                .route(
                    "/templates/{id}",
                    get(get_template).put(update_template).delete(delete_template),
                )
                .route("/templates/{id}/render", post(render_template))
                .route_layer(middleware::from_fn_with_state(state, api_key_auth)),
        )
        .fallback(not_found)
}
