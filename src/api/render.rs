//! Ad-hoc rendering endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::leveling::{self, LevelUpContext};
use crate::server::AppState;
use crate::tags::{ParseReport, Store};

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub template: String,

    /// Positional (array) or named (object) seed tags
    #[serde(default)]
    pub tags: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct TagListResponse {
    pub tags: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct LevelUpRenderRequest {
    /// Inline template; ignored when `template_id` is given
    #[serde(default)]
    pub template: Option<String>,

    /// Stored template to render instead of an inline one
    #[serde(default)]
    pub template_id: Option<String>,

    pub context: LevelUpContext,
}

#[derive(Debug, Serialize)]
pub struct LevelUpRenderResponse {
    pub output: String,
    pub level: u32,
}

/// Turn a request's `tags` field into a seed store
pub(super) fn seed_store(tags: serde_json::Value) -> Result<Store> {
    match tags {
        serde_json::Value::Null
        | serde_json::Value::Array(_)
        | serde_json::Value::Object(_) => Ok(Store::from_json(tags)),
        _ => Err(AppError::Validation(
            "tags must be an array or an object".to_string(),
        )),
    }
}

/// POST /api/v1/render - Render an inline template
#[tracing::instrument(
    name = "http.render",
    skip(state, request),
    fields(template_len = request.template.len())
)]
pub async fn render(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<ParseReport>> {
    let mut store = seed_store(request.tags)?;
    let report = state.parser.run(&request.template, &mut store);

    Ok(Json(report))
}

/// GET /api/v1/tags - List registered tag functions
#[tracing::instrument(name = "http.list_tags", skip(state))]
pub async fn list_tags(State(state): State<AppState>) -> Json<TagListResponse> {
    let tags = state.parser.available_tags();
    let total = tags.len();

    Json(TagListResponse { tags, total })
}

/// POST /api/v1/level-up/render - Render a level-up message
#[tracing::instrument(
    name = "http.render_level_up",
    skip(state, request),
    fields(level = request.context.level)
)]
pub async fn render_level_up(
    State(state): State<AppState>,
    Json(request): Json<LevelUpRenderRequest>,
) -> Result<Json<LevelUpRenderResponse>> {
    let template = match &request.template_id {
        Some(id) => Some(state.template_store.get(id)?.content),
        None => request.template,
    };

    let output = leveling::render_level_up(&state.parser, template.as_deref(), &request.context);

    Ok(Json(LevelUpRenderResponse {
        output,
        level: request.context.level,
    }))
}
