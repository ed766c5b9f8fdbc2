#![forbid(unsafe_code)]

//! Integration tests: input rows driven through simulated user input.

use serde_json::json;
use twiddle_harness::{
    Recorder, drag_slider, find, object, pane, params, press_key, select_option, set_checked,
    type_text,
};
use twiddle_runtime::ListItem;
use twiddle_widgets::{BladeHandle, InputApiKind, TpChangeEvent};

const TEXT_INPUT: &str = "tp-txtv_i";

// ============================================================================
// Number
// ============================================================================

#[test]
fn unparsable_text_reverts_to_last_value() {
    let pane = pane();
    let obj = object(json!({"foo": 123}));
    let input = pane
        .add_input(&obj, "foo", &params(json!({"step": 1})))
        .expect("number input");
    let field = find(input.element(), TEXT_INPUT);
    assert_eq!(field.value(), "123");

    let changes = Recorder::<TpChangeEvent>::new();
    let _sub = pane.on_change(changes.handler());
    type_text(&field, "foobar");

    assert_eq!(field.value(), "123");
    assert_eq!(obj.get("foo"), Some(json!(123)));
    assert!(changes.is_empty());
}

#[test]
fn deeply_nested_text_reverts() {
    let pane = pane();
    let obj = object(json!({"foo": 5}));
    let input = pane
        .add_input(&obj, "foo", &params(json!({"step": 1})))
        .expect("number input");
    let field = find(input.element(), TEXT_INPUT);

    type_text(&field, &("-".repeat(1_000_000) + "1"));
    assert_eq!(field.value(), "5");
    type_text(&field, &"(".repeat(100_000));
    assert_eq!(field.value(), "5");
    assert_eq!(obj.get("foo"), Some(json!(5)));
}

#[test]
fn equal_values_do_not_emit() {
    let pane = pane();
    let obj = object(json!({"foo": 1}));
    let input = pane
        .add_input(&obj, "foo", &params(json!({})))
        .expect("number input");
    let field = find(input.element(), TEXT_INPUT);
    let changes = Recorder::<TpChangeEvent>::new();
    let _sub = input.on_change(changes.handler());

    type_text(&field, "2");
    type_text(&field, "2");
    type_text(&field, "2.0");

    assert_eq!(changes.len(), 1);
    let event = changes.last().expect("one change");
    assert_eq!(event.value, json!(2));
    assert!(event.last);
}

#[test]
fn typed_values_are_stepped_and_clamped_before_write_back() {
    let pane = pane();
    let obj = object(json!({"foo": 0}));
    let input = pane
        .add_input(&obj, "foo", &params(json!({"min": 0, "max": 100, "step": 10})))
        .expect("slider input");
    assert_eq!(input.kind(), Some(InputApiKind::Slider));
    let field = find(input.element(), TEXT_INPUT);
    let changes = Recorder::<TpChangeEvent>::new();
    let _sub = pane.on_change(changes.handler());

    type_text(&field, "57");
    assert_eq!(obj.get("foo"), Some(json!(60)));
    assert_eq!(field.value(), "60");

    type_text(&field, "1000");
    assert_eq!(obj.get("foo"), Some(json!(100)));

    type_text(&field, "-30");
    assert_eq!(obj.get("foo"), Some(json!(0)));

    let values: Vec<_> = changes.events().into_iter().map(|e| e.value).collect();
    assert_eq!(values, vec![json!(60), json!(100), json!(0)]);
}

#[test]
fn slider_drag_reports_intermediate_then_last() {
    let pane = pane();
    let obj = object(json!({"foo": 0}));
    let input = pane
        .add_input(&obj, "foo", &params(json!({"min": 0, "max": 100})))
        .expect("slider input");
    let changes = Recorder::<TpChangeEvent>::new();
    let _sub = input.on_change(changes.handler());

    drag_slider(&find(input.element(), "tp-sldv_t"), 0.25, 0.75);

    let flags: Vec<_> = changes.events().iter().map(|e| e.last).collect();
    assert_eq!(flags, vec![false, false, true]);
    assert_eq!(obj.get("foo"), Some(json!(75)));
}

#[test]
fn slider_bounds_can_change() {
    let pane = pane();
    let obj = object(json!({"foo": 50}));
    let input = pane
        .add_input(&obj, "foo", &params(json!({"min": 0, "max": 100})))
        .expect("slider input");
    let slider = input.as_slider().expect("slider api");
    assert_eq!((slider.min(), slider.max()), (0.0, 100.0));

    slider.set_max(10.0);
    type_text(&find(input.element(), TEXT_INPUT), "20");
    assert_eq!(obj.get("foo"), Some(json!(10)));
}

#[test]
fn arrow_keys_step_the_value() {
    let pane = pane();
    let obj = object(json!({"foo": 1}));
    let input = pane
        .add_input(&obj, "foo", &params(json!({"step": 1})))
        .expect("number input");
    let field = find(input.element(), TEXT_INPUT);

    press_key(&field, "ArrowUp");
    assert_eq!(obj.get("foo"), Some(json!(2)));
    press_key(&field, "ArrowDown");
    press_key(&field, "ArrowDown");
    assert_eq!(obj.get("foo"), Some(json!(0)));
}

// ============================================================================
// Boolean, string, lists
// ============================================================================

#[test]
fn checkbox_writes_booleans() {
    let pane = pane();
    let obj = object(json!({"on": false}));
    let input = pane
        .add_input(&obj, "on", &params(json!({})))
        .expect("checkbox input");
    let checkbox = find(input.element(), "tp-ckbv_i");
    assert!(!checkbox.checked());

    set_checked(&checkbox, true);
    assert_eq!(obj.get("on"), Some(json!(true)));
}

#[test]
fn text_writes_strings() {
    let pane = pane();
    let obj = object(json!({"name": "foo"}));
    let input = pane
        .add_input(&obj, "name", &params(json!({})))
        .expect("text input");
    let field = find(input.element(), TEXT_INPUT);
    assert_eq!(field.value(), "foo");

    type_text(&field, "bar");
    assert_eq!(obj.get("name"), Some(json!("bar")));
}

#[test]
fn options_turn_numbers_into_lists() {
    let pane = pane();
    let obj = object(json!({"mode": 1}));
    let input = pane
        .add_input(&obj, "mode", &params(json!({"options": {"low": 1, "high": 2}})))
        .expect("list input");
    assert_eq!(input.kind(), Some(InputApiKind::List));
    let select = find(input.element(), "tp-lstv_s");
    assert_eq!(select.value(), "0");

    select_option(&select, 1);
    assert_eq!(obj.get("mode"), Some(json!(2)));

    let list = input.as_list::<f64>().expect("list api");
    list.set_options(vec![
        ListItem::new("one", 1.0),
        ListItem::new("two", 2.0),
        ListItem::new("three", 3.0),
    ]);
    assert_eq!(list.options().len(), 3);
    assert_eq!(select.child_count(), 3);
}

#[test]
fn string_options_keep_non_members_out() {
    let pane = pane();
    let obj = object(json!({"theme": "dark"}));
    let input = pane
        .add_input(
            &obj,
            "theme",
            &params(json!({"options": [{"text": "Dark", "value": "dark"}, {"text": "Light", "value": "light"}]})),
        )
        .expect("list input");
    let select = find(input.element(), "tp-lstv_s");
    select_option(&select, 1);
    assert_eq!(obj.get("theme"), Some(json!("light")));
}

// ============================================================================
// Colors
// ============================================================================

#[test]
fn string_color_keeps_its_notation() {
    let pane = pane();
    let obj = object(json!({"color": "#123"}));
    let input = pane
        .add_input(&obj, "color", &params(json!({})))
        .expect("color input");
    let field = find(input.element(), TEXT_INPUT);
    assert_eq!(field.value(), "#112233");

    type_text(&field, "#248");
    assert_eq!(obj.get("color"), Some(json!("#224488")));
}

#[test]
fn text_view_turns_color_strings_into_text() {
    let pane = pane();
    let obj = object(json!({"color": "#123"}));
    let input = pane
        .add_input(&obj, "color", &params(json!({"view": "text"})))
        .expect("text input");
    type_text(&find(input.element(), TEXT_INPUT), "#248");
    assert_eq!(obj.get("color"), Some(json!("#248")));
}

#[test]
fn number_color_needs_color_view() {
    let pane = pane();
    let obj = object(json!({"tint": 0x00ff_8800_u32}));
    let plain = pane
        .add_input(&obj, "tint", &params(json!({})))
        .expect("number input");
    assert!(plain.element().query_class("tp-colswtxtv").is_none());

    let color = pane
        .add_input(&obj, "tint", &params(json!({"view": "color"})))
        .expect("color input");
    let field = find(color.element(), TEXT_INPUT);
    assert_eq!(field.value(), "#ff8800");
    type_text(&field, "#000080");
    assert_eq!(obj.get("tint"), Some(json!(0x80)));
}

#[test]
fn object_color_writes_components() {
    let pane = pane();
    let obj = object(json!({"bg": {"r": 255, "g": 0, "b": 0}}));
    let input = pane
        .add_input(&obj, "bg", &params(json!({})))
        .expect("object color input");
    type_text(&find(input.element(), TEXT_INPUT), "rgb(0, 128, 255)");
    assert_eq!(obj.get("bg"), Some(json!({"r": 0, "g": 128, "b": 255})));
}

// ============================================================================
// Common params
// ============================================================================

#[test]
fn label_defaults_to_key_and_can_be_overridden() {
    let pane = pane();
    let obj = object(json!({"speed": 1, "size": 2}));
    let speed = pane
        .add_input(&obj, "speed", &params(json!({})))
        .expect("number input");
    let size = pane
        .add_input(&obj, "size", &params(json!({"label": "Size (px)"})))
        .expect("number input");
    assert_eq!(speed.label().as_deref(), Some("speed"));
    assert_eq!(size.label().as_deref(), Some("Size (px)"));
    size.set_label(None);
    assert!(size.element().has_class("tp-lblv--nol"));
}

#[test]
fn disabled_param_disables_the_field() {
    let pane = pane();
    let obj = object(json!({"name": "x"}));
    let input = pane
        .add_input(&obj, "name", &params(json!({"disabled": true})))
        .expect("text input");
    assert!(input.is_disabled());
    assert!(find(input.element(), TEXT_INPUT).disabled());
    input.set_disabled(false);
    assert!(!find(input.element(), TEXT_INPUT).disabled());
}
