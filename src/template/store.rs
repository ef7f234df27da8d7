//! Template storage with CRUD operations

use std::sync::Arc;

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::types::{
    MessageTemplate, RenderedTemplate, TemplateError, TemplateResult, UpdateTemplateRequest,
};
use crate::metrics::{TemplateMetrics, TEMPLATES_STORED};
use crate::tags::{Parser, Store};

/// In-memory template storage
pub struct TemplateStore {
    templates: DashMap<String, MessageTemplate>,
    parser: Parser,
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new(Parser::new())
    }
}

impl TemplateStore {
    /// Create a new template store rendering through `parser`
    pub fn new(parser: Parser) -> Self {
        Self {
            templates: DashMap::new(),
            parser,
        }
    }

    /// Create a new template
    pub fn create(&self, template: MessageTemplate) -> TemplateResult<MessageTemplate> {
        template.validate()?;

        // The entry guard holds a shard lock; release it before counting.
        match self.templates.entry(template.id.clone()) {
            Entry::Occupied(_) => return Err(TemplateError::AlreadyExists(template.id)),
            Entry::Vacant(entry) => {
                entry.insert(template.clone());
            }
        }

        TemplateMetrics::record_created();
        TEMPLATES_STORED.set(self.templates.len() as i64);
        tracing::debug!(template_id = %template.id, "Template created");

        Ok(template)
    }

    /// Get a template by ID
    pub fn get(&self, id: &str) -> TemplateResult<MessageTemplate> {
        self.templates
            .get(id)
            .map(|t| t.clone())
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// List all templates, ordered by ID
    pub fn list(&self) -> Vec<MessageTemplate> {
        let mut templates: Vec<MessageTemplate> = self
            .templates
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        templates
    }

    /// Update an existing template.
    ///
    /// Changes are validated on a copy and written back under the entry's
    /// write guard, so a concurrent delete cannot be undone.
    pub fn update(
        &self,
        id: &str,
        updates: UpdateTemplateRequest,
    ) -> TemplateResult<MessageTemplate> {
        let mut entry = self
            .templates
            .get_mut(id)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))?;

        let mut template = entry.value().clone();

        if let Some(name) = updates.name {
            template.name = name;
        }

        if let Some(content) = updates.content {
            template.content = content;
        }

        if let Some(description) = updates.description {
            template.description = description;
        }

        template.updated_at = Utc::now();
        template.validate()?;

        *entry = template.clone();
        drop(entry);

        TemplateMetrics::record_updated();
        Ok(template)
    }

    /// Delete a template by ID
    pub fn delete(&self, id: &str) -> TemplateResult<()> {
        self.templates
            .remove(id)
            .map(|_| {
                TemplateMetrics::record_deleted();
                TEMPLATES_STORED.set(self.templates.len() as i64);
            })
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// Check if a template exists
    pub fn exists(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Get the number of templates
    pub fn count(&self) -> usize {
        self.templates.len()
    }

    /// Render a stored template against a fresh store seeded from `tags`
    pub fn render(&self, id: &str, tags: impl Into<Store>) -> TemplateResult<RenderedTemplate> {
        let template = self.get(id)?;

        let mut store = tags.into();
        let report = self.parser.run(&template.content, &mut store);
        TemplateMetrics::record_rendered();

        Ok(RenderedTemplate::from_report(template.id, report))
    }
}

/// Create an Arc-wrapped template store
pub fn create_template_store(parser: Parser) -> Arc<TemplateStore> {
    Arc::new(TemplateStore::new(parser))
}
