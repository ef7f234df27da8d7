//! Template types and error definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::tags::{ParseOutcome, ParseReport};

/// Longest content accepted, matching a chat message limit
pub const MAX_CONTENT_LEN: usize = 4000;

const MAX_ID_LEN: usize = 64;
const MAX_NAME_LEN: usize = 256;

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid template ID: {0}")]
    InvalidId(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// A stored message template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageTemplate {
    /// Unique template identifier (alphanumeric, dash, underscore)
    pub id: String,

    /// Human-readable template name
    pub name: String,

    /// Template text with `{tag}` placeholders
    pub content: String,

    /// Template description (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl MessageTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            content: content.into(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check id, name and content bounds.
    pub fn validate(&self) -> TemplateResult<()> {
        let id_ok = (1..=MAX_ID_LEN).contains(&self.id.len())
            && self
                .id
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
        if !id_ok {
            return Err(TemplateError::InvalidId(format!(
                "'{}' must be 1-{} alphanumeric, '-' or '_' characters",
                self.id, MAX_ID_LEN
            )));
        }

        if !(1..=MAX_NAME_LEN).contains(&self.name.chars().count()) {
            return Err(TemplateError::InvalidTemplate(format!(
                "name must be 1-{} characters",
                MAX_NAME_LEN
            )));
        }

        if !(1..=MAX_CONTENT_LEN).contains(&self.content.chars().count()) {
            return Err(TemplateError::InvalidTemplate(format!(
                "content must be 1-{} characters",
                MAX_CONTENT_LEN
            )));
        }

        Ok(())
    }
}

/// Request to create a new template
#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    /// Unique template identifier
    pub id: String,

    /// Human-readable template name
    pub name: String,

    /// Template text
    pub content: String,

    /// Template description (optional)
    pub description: Option<String>,
}

impl From<CreateTemplateRequest> for MessageTemplate {
    fn from(req: CreateTemplateRequest) -> Self {
        let mut template = MessageTemplate::new(req.id, req.name, req.content);
        template.description = req.description;
        template
    }
}

/// Request to update an existing template
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTemplateRequest {
    /// Human-readable template name (optional)
    pub name: Option<String>,

    /// Template text (optional)
    pub content: Option<String>,

    /// Template description (optional, use null to clear)
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

/// Keeps an explicit `null` apart from a missing field: absent is `None`,
/// `null` is `Some(None)`.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Response for listing templates
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    /// List of templates
    pub templates: Vec<MessageTemplate>,

    /// Total count
    pub total: usize,
}

/// A rendered template
#[derive(Debug, Clone, Serialize)]
pub struct RenderedTemplate {
    /// Source template ID
    pub template_id: String,

    /// Expanded text
    pub output: String,

    /// Tag evaluations performed
    pub iterations: usize,

    /// How rendering stopped
    pub outcome: ParseOutcome,
}

impl RenderedTemplate {
    pub(super) fn from_report(template_id: String, report: ParseReport) -> Self {
        Self {
            template_id,
            output: report.output,
            iterations: report.iterations,
            outcome: report.outcome,
        }
    }
}
