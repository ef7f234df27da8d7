//! Rewrite loop that expands `{name[:payload]}` tags.

use std::sync::Arc;

use serde::Serialize;

use super::numeric::parse_index;
use super::registry::TagRegistry;
use super::store::Store;
use super::value::{join_values, Value};
use crate::metrics::RenderMetrics;

/// Default upper bound on tag evaluations per parse
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Why the rewrite loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseOutcome {
    /// No `}` left in the text
    Complete,
    /// A `}` with no `{` before it; the rest is left as literal text
    Unterminated,
    /// The last substitution did not change the text
    FixedPoint,
    /// The iteration budget ran out with tags still pending
    BudgetExhausted,
}

impl ParseOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseOutcome::Complete => "complete",
            ParseOutcome::Unterminated => "unterminated",
            ParseOutcome::FixedPoint => "fixed_point",
            ParseOutcome::BudgetExhausted => "budget_exhausted",
        }
    }
}

/// Result of a parse, with the bookkeeping `parse` itself discards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseReport {
    pub output: String,
    pub iterations: usize,
    pub outcome: ParseOutcome,
}

/// Template parser.
///
/// Holds a shared [`TagRegistry`] and an iteration budget. Cloning a parser
/// is cheap and clones share the registry.
#[derive(Clone)]
pub struct Parser {
    registry: Arc<TagRegistry>,
    max_iterations: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a parser with its own registry of built-in tags
    pub fn new() -> Self {
        Self::with_registry(Arc::new(TagRegistry::new()))
    }

    /// Create a parser over an existing registry
    pub fn with_registry(registry: Arc<TagRegistry>) -> Self {
        Self {
            registry,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Set the iteration budget
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn registry(&self) -> &Arc<TagRegistry> {
        &self.registry
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Register a tag function on the shared registry.
    pub fn add_tag<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(&str, &mut Store) -> String + Send + Sync + 'static,
    {
        self.registry.add_tag(name, f);
    }

    /// Remove a tag function from the shared registry.
    pub fn remove_tag(&self, name: &str) -> bool {
        self.registry.remove_tag(name)
    }

    pub fn available_tags(&self) -> Vec<String> {
        self.registry.available_tags()
    }

    /// Expand `template` against a fresh store seeded from `tags`.
    ///
    /// Never fails. Malformed tags degrade to empty text or stay literal.
    pub fn parse(&self, template: &str, tags: impl Into<Store>) -> String {
        let mut store = tags.into();
        self.run(template, &mut store).output
    }

    /// Expand `template` against a store the caller keeps, so mutations made
    /// by tags remain visible afterwards.
    pub fn parse_with_store(&self, template: &str, store: &mut Store) -> String {
        self.run(template, store).output
    }

    /// Expand `template` and report how the loop ended.
    ///
    /// Each iteration picks the first `}` and the last `{` before it, so
    /// nested tags resolve inside-out and left to right.
    pub fn run(&self, template: &str, store: &mut Store) -> ParseReport {
        let mut output = template.to_string();
        let mut iterations = 0;

        let outcome = loop {
            let Some(close) = output.find('}') else {
                break ParseOutcome::Complete;
            };
            let Some(open) = output[..close].rfind('{') else {
                break ParseOutcome::Unterminated;
            };
            if iterations >= self.max_iterations {
                break ParseOutcome::BudgetExhausted;
            }

            let content = &output[open + 1..close];
            let tag = format!("{{{content}}}");
            let replacement = self.analyze_content(content, store);
            let next = output.replacen(&tag, &replacement, 1);
            iterations += 1;

            if next == output {
                break ParseOutcome::FixedPoint;
            }
            output = next;
        };

        if outcome == ParseOutcome::BudgetExhausted {
            tracing::warn!(
                max_iterations = self.max_iterations,
                "Template iteration budget exhausted"
            );
        } else {
            tracing::debug!(iterations, outcome = outcome.as_str(), "Template parsed");
        }
        RenderMetrics::record(outcome, iterations);

        ParseReport {
            output,
            iterations,
            outcome,
        }
    }

    /// Evaluate the text between one pair of braces.
    fn analyze_content(&self, content: &str, store: &mut Store) -> String {
        let content = content.trim();
        let (name, payload) = self.split_tag(content, store);

        let resolved = match store.get(name) {
            Some(value) => Some(value.clone()),
            None => self.registry.get(name).map(Value::Fn),
        };

        // {object:key} reads the key directly.
        if let (Some(Value::Object(map)), Some(payload)) = (&resolved, payload) {
            if let Some(value) = map.get(payload) {
                return value.to_string();
            }
        }

        if let Some(Value::Fn(f)) = &resolved {
            return f(payload.unwrap_or_default(), store);
        }

        let Some(payload) = payload else {
            if resolved.is_none() {
                if let Some(pushed) = push_shorthand(content, store) {
                    return pushed;
                }
            }
            return resolved.map(|value| value.to_string()).unwrap_or_default();
        };

        if let Some((key, value)) = payload.split_once('=') {
            let (key, value) = (key.trim(), value.trim());
            match store.get_mut(name) {
                Some(Value::List(items)) => {
                    if let Some(slot) = parse_index(key).and_then(|i| items.get_mut(i)) {
                        *slot = Value::from(value);
                    }
                    return String::new();
                }
                Some(Value::Object(map)) => {
                    map.insert(key.to_string(), Value::from(value));
                    return String::new();
                }
                _ => {}
            }
        }

        match resolved {
            Some(Value::List(items)) => list_access(&items, payload),
            Some(Value::Object(map)) => {
                let (key, rest) = payload.split_once(':').unwrap_or((payload, ""));
                match map.get(key) {
                    Some(Value::Fn(f)) => f(rest, store),
                    Some(value) => value.to_string(),
                    None => "null".to_string(),
                }
            }
            _ => {
                store.set(name, payload.trim());
                String::new()
            }
        }
    }

    /// Split tag content into name and optional payload.
    ///
    /// Normally the split is at the first `:`. A `(` before any `:` starts the
    /// payload instead when the text before it names a function, which lets
    /// `{if(a==b)=>...}` be written without a colon.
    fn split_tag<'a>(&self, content: &'a str, store: &Store) -> (&'a str, Option<&'a str>) {
        let colon = content.find(':');

        if let Some(paren) = content.find('(') {
            if colon.map_or(true, |colon| paren < colon) {
                let name = content[..paren].trim_end();
                if self.is_function(name, store) {
                    return (name, Some(&content[paren..]));
                }
            }
        }

        match colon {
            Some(colon) => (&content[..colon], Some(&content[colon + 1..])),
            None => (content, None),
        }
    }

    fn is_function(&self, name: &str, store: &Store) -> bool {
        match store.get(name) {
            Some(value) => value.is_fn(),
            None => self.registry.contains(name),
        }
    }
}

/// `{list->value}` appends to an existing list, like `{push:list->value}`.
fn push_shorthand(content: &str, store: &mut Store) -> Option<String> {
    let (name, value) = content.split_once("->")?;
    let (name, value) = (name.trim(), value.trim());
    if value.is_empty() || !matches!(store.get(name), Some(Value::List(_))) {
        return None;
    }

    let item = store
        .get(value)
        .cloned()
        .unwrap_or_else(|| Value::from(value));
    if let Some(Value::List(items)) = store.get_mut(name) {
        items.push(item);
    }
    Some(String::new())
}

/// `a-b` range, `n+` suffix, or plain index into a list.
fn list_access(items: &[Value], selector: &str) -> String {
    if let Some((from, to)) = range_bounds(selector) {
        return match (from, to) {
            (Some(from), Some(to)) if from <= to => {
                let end = to.saturating_add(1).min(items.len());
                items.get(from..end).map(|slice| join_values(slice, " ")).unwrap_or_default()
            }
            _ => String::new(),
        };
    }

    if let Some(start) = selector.strip_suffix('+') {
        return match parse_index(start) {
            Some(start) => items
                .get(start..)
                .map(|slice| join_values(slice, " "))
                .unwrap_or_default(),
            None => String::new(),
        };
    }

    parse_index(selector)
        .and_then(|index| items.get(index))
        .map(Value::to_string)
        .unwrap_or_default()
}

/// Recognise `digits-digits`. Bounds that overflow come back as `None`.
fn range_bounds(selector: &str) -> Option<(Option<usize>, Option<usize>)> {
    let (from, to) = selector.split_once('-')?;
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(from) || !is_digits(to) {
        return None;
    }
    Some((from.parse().ok(), to.parse().ok()))
}
