//! Tag template engine.
//!
//! This module provides:
//! - [`Value`], the dynamic values a tag name can resolve to
//! - [`Store`], the per-parse key/value environment tags read and write
//! - [`TagRegistry`], the shared set of native tag functions
//! - [`Parser`], the rewrite loop expanding `{name[:payload]}` tags
//!
//! Tags resolve innermost first, so the output of one tag can become part
//! of the tag around it:
//!
//! ```ignore
//! let parser = Parser::new();
//!
//! let output = parser.parse(
//!     "{if({level}>=10)=>Veteran(else)Rookie} {upper:{name}}",
//!     [("level", Value::from(12)), ("name", Value::from("bob"))],
//! );
//!
//! assert_eq!(output, "Veteran BOB");
//! ```
//!
//! Name lookup checks the store first and the registry second, so a seeded
//! value shadows a built-in of the same name.

mod builtins;
mod numeric;
mod parser;
mod registry;
mod store;
mod value;

pub use builtins::BUILTIN_TAGS;
pub use parser::{ParseOutcome, ParseReport, Parser, DEFAULT_MAX_ITERATIONS};
pub use registry::{create_tag_registry, TagRegistry};
pub use store::Store;
pub use value::{join_values, ObjectMap, TagFn, Value};
