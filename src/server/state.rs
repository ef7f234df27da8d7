use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::tags::{create_tag_registry, Parser, TagRegistry};
use crate::template::{create_template_store, TemplateStore};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub registry: Arc<TagRegistry>,
    pub parser: Parser,
    pub template_store: Arc<TemplateStore>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let registry = create_tag_registry();
        let parser = Parser::with_registry(registry.clone())
            .with_max_iterations(settings.parser.max_iterations);
        let template_store = create_template_store(parser.clone());

        Self {
            settings: Arc::new(settings),
            registry,
            parser,
            template_store,
            start_time: Instant::now(),
        }
    }
}
