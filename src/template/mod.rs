//! Stored message templates.
//!
//! This module provides:
//! - Template definitions whose content uses `{tag}` syntax
//! - In-memory template storage with CRUD operations
//! - Rendering of stored templates through the tag [`Parser`](crate::tags::Parser)
//!
//! # Example
//!
//! ```ignore
//! let store = TemplateStore::new(Parser::new());
//!
//! store.create(MessageTemplate::new(
//!     "level-up",
//!     "Level up",
//!     "GGs {user:mention}! You reached level {level}.",
//! ))?;
//!
//! let rendered = store.render("level-up", json!({
//!     "user": {"mention": "<@123>"},
//!     "level": 5
//! }))?;
//! ```

mod store;
mod types;

pub use store::{create_template_store, TemplateStore};
pub use types::{
    CreateTemplateRequest, MessageTemplate, RenderedTemplate, TemplateError,
    TemplateListResponse, TemplateResult, UpdateTemplateRequest, MAX_CONTENT_LEN,
};
