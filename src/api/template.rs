//! Template catalogue endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::render::seed_store;
use crate::error::Result;
use crate::server::AppState;
use crate::template::{
    CreateTemplateRequest, MessageTemplate, RenderedTemplate, TemplateListResponse,
    UpdateTemplateRequest,
};

#[derive(Debug, Default, Deserialize)]
pub struct RenderTemplateRequest {
    /// Positional (array) or named (object) seed tags
    #[serde(default)]
    pub tags: serde_json::Value,
}

/// POST /api/v1/templates - Create a new template
#[tracing::instrument(
    name = "http.create_template",
    skip(state, request),
    fields(template_id = %request.id)
)]
pub async fn create_template(
    State(state): State<AppState>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<MessageTemplate>)> {
    let created = state.template_store.create(request.into())?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/templates - List all templates
#[tracing::instrument(name = "http.list_templates", skip(state))]
pub async fn list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    let templates = state.template_store.list();
    let total = templates.len();

    Json(TemplateListResponse { templates, total })
}

/// GET /api/v1/templates/{id} - Get a specific template
#[tracing::instrument(name = "http.get_template", skip(state))]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageTemplate>> {
    Ok(Json(state.template_store.get(&id)?))
}

/// PUT /api/v1/templates/{id} - Update an existing template
#[tracing::instrument(name = "http.update_template", skip(state, request))]
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTemplateRequest>,
) -> Result<Json<MessageTemplate>> {
    Ok(Json(state.template_store.update(&id, request)?))
}

/// DELETE /api/v1/templates/{id} - Delete a template
#[tracing::instrument(name = "http.delete_template", skip(state))]
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.template_store.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/templates/{id}/render - Render a stored template
#[tracing::instrument(name = "http.render_template", skip(state, request))]
pub async fn render_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RenderTemplateRequest>,
) -> Result<Json<RenderedTemplate>> {
    let store = seed_store(request.tags)?;
    Ok(Json(state.template_store.render(&id, store)?))
}
