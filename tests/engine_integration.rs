//! Engine integration tests
//!
//! These tests drive the public library API: the parser, its shared
//! registry, retained stores, the template catalogue and level-up rendering.

use std::sync::Arc;

use serde_json::json;

use tag_template_service::leveling::{
    render_level_up, LevelUpContext, LevelUpReward, LevelUpServer, LevelUpUser,
};
use tag_template_service::tags::{
    create_tag_registry, ParseOutcome, Parser, Store, Value, BUILTIN_TAGS,
};
use tag_template_service::template::{MessageTemplate, TemplateStore};

fn level_up_context(level: u32, reward: bool) -> LevelUpContext {
    LevelUpContext {
        user: LevelUpUser {
            id: "42".to_string(),
            mention: "<@42>".to_string(),
            username: "ferris".to_string(),
            avatar_url: None,
        },
        server: LevelUpServer {
            id: "7".to_string(),
            name: "Crab Club".to_string(),
            icon_url: None,
            owner_id: "1".to_string(),
            member_count: 1200,
        },
        reward: reward.then(|| LevelUpReward {
            id: "99".to_string(),
            name: "Veteran".to_string(),
            mention: "<@&99>".to_string(),
        }),
        level,
    }
}

// ============================================================================
// Parser
// ============================================================================

#[test]
fn test_positional_and_named_seeds() {
    let parser = Parser::new();

    let positional = parser.parse("{0} and {1}", vec![Value::from("salt"), Value::from("pepper")]);
    assert_eq!(positional, "salt and pepper");

    let named = parser.parse("Hi {name}!", [("name", Value::from("Ann"))]);
    assert_eq!(named, "Hi Ann!");
}

#[test]
fn test_nested_tags_resolve_inside_out() {
    let parser = Parser::new();

    let output = parser.parse(
        "{if({level}>=10)=>Veteran(else)Rookie} {upper:{name}}",
        [("level", Value::from(12)), ("name", Value::from("bob"))],
    );
    assert_eq!(output, "Veteran BOB");
}

#[test]
fn test_list_workflow() {
    let parser = Parser::new();
    let mut store = Store::new();

    let output = parser.parse_with_store(
        "{vector:items=a,b}{push:items->c}{length:items}|{join:items, - }|{items:1}|{items:0-1}",
        &mut store,
    );

    assert_eq!(output, "3|a-b-c|b|a b");
    assert_eq!(
        store.get("items"),
        Some(&Value::List(vec![
            Value::from("a"),
            Value::from("b"),
            Value::from("c"),
        ]))
    );
}

#[test]
fn test_object_workflow() {
    let parser = Parser::new();
    let mut store = Store::new();

    let output = parser.parse_with_store(
        "{object:user}{user:name=Ann}{user:name} {user:missing}",
        &mut store,
    );

    assert_eq!(output, "Ann null");
    let user = store.get("user").and_then(Value::as_object).unwrap();
    assert_eq!(user.get("name"), Some(&Value::from("Ann")));
}

#[test]
fn test_assignment_persists_in_store() {
    let parser = Parser::new();
    let mut store = Store::new();

    let output = parser.parse_with_store("{greeting:hello}{upper:{greeting}}", &mut store);

    assert_eq!(output, "HELLO");
    assert_eq!(store.get("greeting"), Some(&Value::from("hello")));
}

#[test]
fn test_json_seeds() {
    let parser = Parser::new();

    let output = parser.parse(
        "{user:name} has {length:tags} tags: {join:tags,/}",
        json!({"user": {"name": "Ann"}, "tags": ["a", "b"], "skipped": null}),
    );
    assert_eq!(output, "Ann has 2 tags: a/b");
}

// ============================================================================
// Registry sharing
// ============================================================================

#[test]
fn test_registry_shared_between_parsers() {
    let registry = create_tag_registry();
    let first = Parser::with_registry(registry.clone());
    let second = Parser::with_registry(Arc::clone(&registry));

    first.add_tag("shout", |payload, _| format!("{}!", payload.to_uppercase()));
    assert_eq!(second.parse("{shout:hey}", Store::new()), "HEY!");

    assert!(second.remove_tag("shout"));
    assert_eq!(first.parse("{shout:hey}", Store::new()), "");
}

#[test]
fn test_separate_parsers_have_separate_registries() {
    let first = Parser::new();
    let second = Parser::new();

    first.add_tag("only_here", |_, _| "x".to_string());
    assert!(first.available_tags().contains(&"only_here".to_string()));
    assert!(!second.available_tags().contains(&"only_here".to_string()));
    assert_eq!(second.available_tags().len(), BUILTIN_TAGS.len());
}

#[test]
fn test_store_value_shadows_builtin() {
    let parser = Parser::new();
    let output = parser.parse("{upper}", [("upper", Value::from("plain"))]);
    assert_eq!(output, "plain");
}

#[test]
fn test_custom_tag_mutates_store() {
    let parser = Parser::new();
    parser.add_tag("count", |_, store| {
        let next = store
            .get("n")
            .and_then(|v| v.as_str().and_then(|s| s.parse::<u32>().ok()))
            .unwrap_or(0)
            + 1;
        store.set("n", next.to_string());
        next.to_string()
    });

    let output = parser.parse("{count}{count}{count}", Store::new());
    assert_eq!(output, "123");
}

// ============================================================================
// Termination
// ============================================================================

#[test]
fn test_budget_exhausted() {
    let parser = Parser::new().with_max_iterations(2);
    let mut store = Store::new();

    let report = parser.run("{a}{b}{c}", &mut store);

    assert_eq!(report.outcome, ParseOutcome::BudgetExhausted);
    assert_eq!(report.iterations, 2);
    assert_eq!(report.output, "{c}");
}

#[test]
fn test_self_producing_tag_stops_at_fixed_point() {
    let parser = Parser::new();
    parser.add_tag("again", |_, _| "{again}".to_string());

    let report = parser.run("{again}", &mut Store::new());

    assert_eq!(report.outcome, ParseOutcome::FixedPoint);
    assert_eq!(report.iterations, 1);
    assert_eq!(report.output, "{again}");
}

#[test]
fn test_stray_close_brace_stops_parsing() {
    let parser = Parser::new();
    let mut store = Store::from_named([("b", Value::from("x"))]);

    let report = parser.run("a } {b}", &mut store);

    assert_eq!(report.outcome, ParseOutcome::Unterminated);
    assert_eq!(report.iterations, 0);
    assert_eq!(report.output, "a } {b}");
}

#[test]
fn test_plain_text_is_complete() {
    let parser = Parser::new();
    let report = parser.run("no tags here", &mut Store::new());

    assert_eq!(report.outcome, ParseOutcome::Complete);
    assert_eq!(report.iterations, 0);
    assert_eq!(report.output, "no tags here");
}

// ============================================================================
// Catalogue and leveling
// ============================================================================

#[test]
fn test_catalogue_renders_with_shared_parser() {
    let parser = Parser::new();
    parser.add_tag("stars", |payload, _| "*".repeat(payload.trim().parse().unwrap_or(0)));
    let store = TemplateStore::new(parser);

    store
        .create(MessageTemplate::new("rating", "Rating", "{name}: {stars:{score}}"))
        .unwrap();

    let rendered = store
        .render("rating", json!({"name": "Ann", "score": 3}))
        .unwrap();

    assert_eq!(rendered.template_id, "rating");
    assert_eq!(rendered.output, "Ann: ***");
    assert_eq!(rendered.outcome, ParseOutcome::Complete);
}

#[test]
fn test_level_up_default_message() {
    let parser = Parser::new();
    let output = render_level_up(&parser, None, &level_up_context(5, false));

    assert_eq!(output, "GGs <@42>! You have leveled up to **Level 5**.");
}

#[test]
fn test_level_up_custom_message_with_reward() {
    let parser = Parser::new();
    let template = "{user:username} went {oldLevel} -> {level} in {server:name} and got {reward:name}";

    let output = render_level_up(&parser, Some(template), &level_up_context(10, true));

    assert_eq!(output, "ferris went 9 -> 10 in Crab Club and got Veteran");
}
