#![forbid(unsafe_code)]

//! Integration tests: plugin ordering, custom plugins and resolution errors.

use std::rc::Rc;

use serde_json::json;
use twiddle_harness::{find, object, pane, params, type_text};
use twiddle_runtime::converter::{Formatter, number_from_unknown, write_number};
use twiddle_runtime::{Observable, Params, Unknown};
use twiddle_widgets::controller::{TextController, ValueController};
use twiddle_widgets::plugin::{InputBindingHooks, InputControllerArgs};
use twiddle_widgets::{Acceptance, BladeHandle, InputBindingPlugin, PluginError, PluginPool};

fn wants_view(params: &Params, view: &str) -> bool {
    params.get("view").and_then(Unknown::as_str) == Some(view)
}

fn percent_input(id: &'static str) -> InputBindingPlugin<f64, ()> {
    InputBindingPlugin {
        id,
        accept: |value, params| {
            if value.is_number() && wants_view(params, "percent") {
                Acceptance::Accepted {
                    initial_value: value.clone(),
                    params: (),
                }
            } else {
                Acceptance::Rejected
            }
        },
        binding: InputBindingHooks {
            reader: |_| Rc::new(number_from_unknown),
            constraint: None,
            writer: |_| Rc::new(write_number),
            equals: None,
        },
        controller: percent_controller,
        api: None,
    }
}

fn percent_controller(args: InputControllerArgs<'_, f64, ()>) -> Rc<dyn ValueController> {
    Rc::new(TextController::new(
        args.document,
        Rc::new(|text: &str| {
            let n: f64 = text.trim().trim_end_matches('%').trim().parse().ok()?;
            Some(n / 100.0)
        }),
        Observable::new(Formatter::new(|v: &f64| format!("{:.0}%", v * 100.0))),
        args.value.clone(),
        args.view_props,
    ))
}

fn resolved(pool: &PluginPool, value: Unknown, p: Unknown) -> Result<&'static str, PluginError> {
    pool.resolve_input("key", &value, &params(p))
        .map(|r| r.plugin_id())
}

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn default_inputs_resolve_by_value_and_view() {
    let pool = PluginPool::with_defaults();
    assert_eq!(resolved(&pool, json!(true), json!({})).ok(), Some("input-bool"));
    assert_eq!(resolved(&pool, json!(1), json!({})).ok(), Some("input-number"));
    assert_eq!(
        resolved(&pool, json!(0xff0000), json!({"view": "color"})).ok(),
        Some("input-color-number")
    );
    assert_eq!(
        resolved(&pool, json!("#fff"), json!({})).ok(),
        Some("input-color-string")
    );
    assert_eq!(
        resolved(&pool, json!("#fff"), json!({"view": "text"})).ok(),
        Some("input-string")
    );
    assert_eq!(
        resolved(&pool, json!({"r": 1, "g": 2, "b": 3}), json!({})).ok(),
        Some("input-color-object")
    );
    assert_eq!(resolved(&pool, json!("hello"), json!({})).ok(), Some("input-string"));
}

#[test]
fn unsupported_values_have_no_plugin() {
    let pool = PluginPool::with_defaults();
    let err = resolved(&pool, json!([1, 2]), json!({})).unwrap_err();
    assert!(matches!(
        err,
        PluginError::NoMatchingPlugin { kind: "input", ref key } if key == "key"
    ));

    let pane = pane();
    let obj = object(json!({"list": [1, 2], "nested": {"a": 1}}));
    assert!(pane.add_input(&obj, "list", &params(json!({}))).is_err());
    assert!(pane.add_monitor(&obj, "nested", &params(json!({}))).is_err());
    assert!(pane.children().is_empty());
}

// ============================================================================
// Custom plugins
// ============================================================================

#[test]
fn custom_plugins_run_before_defaults() {
    let mut pool = PluginPool::with_defaults();
    pool.register(percent_input("input-percent")).expect("fresh id");

    assert_eq!(
        resolved(&pool, json!(0.5), json!({"view": "percent"})).ok(),
        Some("input-percent")
    );
    assert_eq!(resolved(&pool, json!(0.5), json!({})).ok(), Some("input-number"));
    assert_eq!(
        resolved(&pool, json!("50"), json!({"view": "percent"})).ok(),
        Some("input-string")
    );
}

#[test]
fn earlier_custom_plugin_wins() {
    let mut pool = PluginPool::new();
    pool.register(percent_input("input-percent-a")).expect("fresh id");
    pool.register(percent_input("input-percent-b")).expect("fresh id");

    assert_eq!(
        resolved(&pool, json!(0.1), json!({"view": "percent"})).ok(),
        Some("input-percent-a")
    );
    assert_eq!(pool.input_ids(), vec!["input-percent-a", "input-percent-b"]);
}

#[test]
fn duplicate_ids_are_rejected() {
    let mut pool = PluginPool::with_defaults();
    let err = pool.register(percent_input("input-number")).unwrap_err();
    assert!(matches!(err, PluginError::DuplicateId { ref id } if id == "input-number"));

    // Ids are shared across plugin kinds.
    let err = pool.register(percent_input("folder")).unwrap_err();
    assert!(matches!(err, PluginError::DuplicateId { .. }));
    assert!(!pool.input_ids().contains(&"folder"));
}

#[test]
fn registered_plugin_builds_rows_in_nested_folders() {
    let pane = pane();
    let folder = pane
        .add_folder(&params(json!({"title": "Mix"})))
        .expect("folder");
    pane.register_plugin(percent_input("input-percent"))
        .expect("fresh id");

    let obj = object(json!({"wet": 0.25}));
    let input = folder
        .add_input(&obj, "wet", &params(json!({"view": "percent"})))
        .expect("percent input");
    let field = find(input.element(), "tp-txtv_i");
    assert_eq!(field.value(), "25%");

    type_text(&field, "40%");
    assert_eq!(obj.get("wet"), Some(json!(0.4)));
    assert_eq!(field.value(), "40%");

    type_text(&field, "lots");
    assert_eq!(obj.get("wet"), Some(json!(0.4)));
    assert_eq!(field.value(), "40%");
}
