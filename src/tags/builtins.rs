//! Built-in tag functions.
//!
//! Each function receives the raw payload that followed `name:` and the store
//! of the running parse. None of them fail: malformed input yields an empty
//! string (or `"false"` for predicates).

use super::numeric::{format_number, has_integer_prefix, parse_float_prefix, parse_number};
use super::registry::TagRegistry;
use super::store::Store;
use super::value::{join_values, Value};

/// Names of every built-in tag, in registration order.
pub const BUILTIN_TAGS: [&str; 16] = [
    "round", "floor", "ceil", "abs", "random", "object", "in", "vector", "if", "isNaN", "push",
    "length", "upper", "lower", "trim", "join",
];

/// Comparison operators recognised by `if`, in detection order.
const OPERATORS: [&str; 6] = ["==", "!=", "<=", ">=", "<", ">"];

const ELSE_MARKER: &str = "(else)";

pub(super) fn register(registry: &TagRegistry) {
    registry.add_tag("round", round);
    registry.add_tag("floor", |payload, _| map_number(payload, f64::floor));
    registry.add_tag("ceil", |payload, _| map_number(payload, f64::ceil));
    registry.add_tag("abs", |payload, _| map_number(payload, f64::abs));
    registry.add_tag("random", random);
    registry.add_tag("object", object);
    registry.add_tag("in", contains);
    registry.add_tag("vector", vector);
    registry.add_tag("if", if_else);
    registry.add_tag("isNaN", |payload, _| (!has_integer_prefix(payload)).to_string());
    registry.add_tag("push", push);
    registry.add_tag("length", length);
    registry.add_tag("upper", |payload, _| payload.to_uppercase());
    registry.add_tag("lower", |payload, _| payload.to_lowercase());
    registry.add_tag("trim", |payload, _| payload.trim().to_string());
    registry.add_tag("join", join);
}

fn map_number(payload: &str, op: fn(f64) -> f64) -> String {
    parse_number(payload)
        .map(|n| format_number(op(n)))
        .unwrap_or_default()
}

/// Halves round towards positive infinity (`-2.5` -> `-2`).
fn round(payload: &str, _store: &mut Store) -> String {
    map_number(payload, |n| {
        let floor = n.floor();
        if n - floor >= 0.5 {
            floor + 1.0
        } else {
            floor
        }
    })
}

/// `random:min,max` - integer in `[min, max]`.
fn random(payload: &str, _store: &mut Store) -> String {
    let Some((min, max)) = payload.split_once(',') else {
        return String::new();
    };
    let (Some(min), Some(max)) = (parse_number(min), parse_number(max)) else {
        return String::new();
    };

    let roll: f64 = rand::random();
    format_number((roll * (max - min + 1.0) + min).floor())
}

/// `object:name` - bind an empty object.
fn object(payload: &str, store: &mut Store) -> String {
    store.set(payload.trim(), Value::object());
    String::new()
}

/// `vector:name=a,b,c` - bind a list of trimmed strings.
fn vector(payload: &str, store: &mut Store) -> String {
    let (name, items) = match payload.split_once('=') {
        Some((name, items)) => (
            name,
            items.split(',').map(|item| Value::from(item.trim())).collect(),
        ),
        None => (payload, Vec::new()),
    };
    store.set(name.trim(), Value::List(items));
    String::new()
}

/// `in:needle,haystack` - substring test; a haystack naming a list searches
/// its comma-joined elements, one naming a string searches that string.
fn contains(payload: &str, store: &mut Store) -> String {
    let Some((needle, haystack)) = payload.split_once(',') else {
        return "false".to_string();
    };
    let (needle, haystack) = (needle.trim(), haystack.trim());

    let text = match store.get(haystack) {
        Some(Value::List(items)) => join_values(items, ","),
        Some(Value::String(s)) => s.clone(),
        _ => haystack.to_string(),
    };

    text.contains(needle).to_string()
}

/// `push:name->value` - append to an existing list in place.
fn push(payload: &str, store: &mut Store) -> String {
    let Some((name, value)) = payload.split_once("->") else {
        return String::new();
    };
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() || value.is_empty() {
        return String::new();
    }

    let item = store
        .get(value)
        .cloned()
        .unwrap_or_else(|| Value::from(value));

    if let Some(Value::List(items)) = store.get_mut(name) {
        items.push(item);
    }
    String::new()
}

/// `length:name` - element count of a list or character count of a string.
fn length(payload: &str, store: &mut Store) -> String {
    match store.get(payload.trim()) {
        Some(Value::List(items)) => items.len().to_string(),
        Some(Value::String(s)) => s.chars().count().to_string(),
        _ => "0".to_string(),
    }
}

/// `join:name,separator`
fn join(payload: &str, store: &mut Store) -> String {
    let Some((name, separator)) = payload.split_once(',') else {
        return String::new();
    };

    match store.get(name.trim()) {
        Some(Value::List(items)) => join_values(items, separator.trim()),
        _ => String::new(),
    }
}

/// `if(cond)=>truthy(else)falsy`
fn if_else(payload: &str, _store: &mut Store) -> String {
    let (Some(open), Some(close)) = (payload.find('('), payload.find(')')) else {
        return String::new();
    };
    let condition: String = payload
        .get(open + 1..close)
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let Some(truthy) = evaluate_condition(&condition) else {
        return String::new();
    };
    let Some(arrow) = payload.find("=>") else {
        return String::new();
    };
    let else_at = payload.find(ELSE_MARKER);

    if truthy {
        let end = else_at.unwrap_or(payload.len());
        payload
            .get(arrow + 2..end)
            .unwrap_or_default()
            .trim()
            .to_string()
    } else {
        else_at
            .map(|at| payload[at + ELSE_MARKER.len()..].trim().to_string())
            .unwrap_or_default()
    }
}

/// Evaluate `left<op>right`. The first operator found in detection order
/// wins; `None` when there is no operator at all.
fn evaluate_condition(condition: &str) -> Option<bool> {
    let (op, at) = OPERATORS
        .iter()
        .find_map(|op| condition.find(op).map(|at| (*op, at)))?;

    let left = match &condition[..at] {
        "" => "null",
        left => left,
    };
    let right = match &condition[at + op.len()..] {
        "" => "null",
        right => right,
    };

    let result = match op {
        "==" => left == right,
        "!=" => left != right,
        _ => match (parse_float_prefix(left), parse_float_prefix(right)) {
            (Some(l), Some(r)) => match op {
                "<=" => l <= r,
                ">=" => l >= r,
                "<" => l < r,
                _ => l > r,
            },
            _ => false,
        },
    };

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(registry: &TagRegistry, name: &str, payload: &str, store: &mut Store) -> String {
        let f = registry.get(name).unwrap();
        f(payload, store)
    }

    fn eval(name: &str, payload: &str) -> String {
        call(&TagRegistry::new(), name, payload, &mut Store::new())
    }

    #[test]
    fn test_numeric_tags() {
        assert_eq!(eval("round", "2.5"), "3");
        assert_eq!(eval("round", "-2.5"), "-2");
        assert_eq!(eval("round", "2.4"), "2");
        assert_eq!(eval("floor", "2.9"), "2");
        assert_eq!(eval("ceil", "2.1"), "3");
        assert_eq!(eval("abs", "-7"), "7");
        assert_eq!(eval("round", "abc"), "");
        assert_eq!(eval("abs", "1x"), "");
    }

    #[test]
    fn test_random_degenerate_range() {
        for _ in 0..20 {
            assert_eq!(eval("random", "1,1"), "1");
        }
    }

    #[test]
    fn test_random_in_bounds() {
        for _ in 0..100 {
            let n: i64 = eval("random", "1,6").parse().unwrap();
            assert!((1..=6).contains(&n));
        }
    }

    #[test]
    fn test_random_malformed() {
        assert_eq!(eval("random", "5"), "");
        assert_eq!(eval("random", "a,b"), "");
    }

    #[test]
    fn test_object_and_vector() {
        let registry = TagRegistry::new();
        let mut store = Store::new();

        assert_eq!(call(&registry, "object", "stats", &mut store), "");
        assert_eq!(store.get("stats"), Some(&Value::object()));

        call(&registry, "vector", "fruits = apple, pear ,fig", &mut store);
        assert_eq!(
            store.get("fruits"),
            Some(&Value::List(vec!["apple".into(), "pear".into(), "fig".into()]))
        );

        call(&registry, "vector", "empty", &mut store);
        assert_eq!(store.get("empty"), Some(&Value::List(vec![])));
    }

    #[test]
    fn test_in() {
        let registry = TagRegistry::new();
        let mut store = Store::new();
        store.set("roles", Value::List(vec!["admin".into(), "mod".into()]));
        store.set("bio", "likes rust");

        assert_eq!(call(&registry, "in", "mod,roles", &mut store), "true");
        assert_eq!(call(&registry, "in", "rust, bio", &mut store), "true");
        assert_eq!(call(&registry, "in", "owner,roles", &mut store), "false");
        assert_eq!(call(&registry, "in", "ell,hello", &mut store), "true");
        assert_eq!(call(&registry, "in", "no comma", &mut store), "false");
    }

    #[test]
    fn test_push() {
        let registry = TagRegistry::new();
        let mut store = Store::new();
        store.set("list", Value::List(vec![]));
        store.set("x", "v");

        assert_eq!(call(&registry, "push", "list->x", &mut store), "");
        assert_eq!(call(&registry, "push", "list -> literal", &mut store), "");
        assert_eq!(
            store.get("list"),
            Some(&Value::List(vec!["v".into(), "literal".into()]))
        );
    }

    #[test]
    fn test_push_requires_existing_list() {
        let registry = TagRegistry::new();
        let mut store = Store::new();
        store.set("text", "abc");

        call(&registry, "push", "missing->x", &mut store);
        call(&registry, "push", "text->x", &mut store);
        call(&registry, "push", "text x", &mut store);

        assert!(!store.has("missing"));
        assert_eq!(store.get("text"), Some(&Value::from("abc")));
    }

    #[test]
    fn test_length() {
        let registry = TagRegistry::new();
        let mut store = Store::new();
        store.set("list", Value::List(vec!["a".into(), "b".into()]));
        store.set("word", "héllo");
        store.set("n", 42);

        assert_eq!(call(&registry, "length", "list", &mut store), "2");
        assert_eq!(call(&registry, "length", "word", &mut store), "5");
        assert_eq!(call(&registry, "length", "n", &mut store), "0");
        assert_eq!(call(&registry, "length", "missing", &mut store), "0");
    }

    #[test]
    fn test_string_tags() {
        assert_eq!(eval("upper", "abc"), "ABC");
        assert_eq!(eval("lower", "AbC"), "abc");
        assert_eq!(eval("trim", "  x y  "), "x y");
    }

    #[test]
    fn test_join() {
        let registry = TagRegistry::new();
        let mut store = Store::new();
        store.set("list", Value::List(vec!["a".into(), 1.into()]));

        assert_eq!(call(&registry, "join", "list, |", &mut store), "a|1");
        assert_eq!(call(&registry, "join", "list,", &mut store), "a1");
        assert_eq!(call(&registry, "join", "missing,-", &mut store), "");
        assert_eq!(call(&registry, "join", "list", &mut store), "");
    }

    #[test]
    fn test_is_nan() {
        assert_eq!(eval("isNaN", "12"), "false");
        assert_eq!(eval("isNaN", "12abc"), "false");
        assert_eq!(eval("isNaN", "abc"), "true");
        assert_eq!(eval("isNaN", ""), "true");
    }

    #[test]
    fn test_if_comparisons() {
        assert_eq!(eval("if", "(5>3)=>yes(else)no"), "yes");
        assert_eq!(eval("if", "(1==2)=>yes(else)no"), "no");
        assert_eq!(eval("if", "(a != b) => different (else) same"), "different");
        assert_eq!(eval("if", "(10 <= 10)=>le"), "le");
        assert_eq!(eval("if", "(3>=4)=>ge(else)lt"), "lt");
        assert_eq!(eval("if", "(2<10)=>numeric"), "numeric");
    }

    #[test]
    fn test_if_missing_branches() {
        assert_eq!(eval("if", "(1==2)=>yes"), "");
        assert_eq!(eval("if", "(1==1)yes(else)no"), "");
        assert_eq!(eval("if", "(1 2)=>yes(else)no"), "");
        assert_eq!(eval("if", "=>yes"), "");
    }

    #[test]
    fn test_if_non_numeric_comparison_is_false() {
        assert_eq!(eval("if", "(abc>1)=>yes(else)no"), "no");
        assert_eq!(eval("if", "(>1)=>yes(else)no"), "no");
    }

    #[test]
    fn test_if_empty_operand_is_null() {
        assert_eq!(eval("if", "(==null)=>empty(else)set"), "empty");
    }

    #[test]
    fn test_evaluate_condition_operator_order() {
        // "<=" is found before "<", so "1<=1" is not read as "1" < "=1".
        assert_eq!(evaluate_condition("1<=1"), Some(true));
        assert_eq!(evaluate_condition("a==b"), Some(false));
        assert_eq!(evaluate_condition("nothing"), None);
    }
}
