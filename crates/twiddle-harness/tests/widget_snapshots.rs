#![forbid(unsafe_code)]

//! Integration tests: HTML snapshots of the default views.
//!
//! Snapshots are committed under `tests/snapshots/`. Run
//! `BLESS=1 cargo test --package twiddle-harness` to create or update them.

use serde_json::json;
use twiddle_harness::{assert_html_snapshot, html_digest, object, pane, params};
use twiddle_widgets::{BladeHandle, Pane};

fn single_input(value: serde_json::Value, p: serde_json::Value) -> Pane {
    let pane = pane();
    let obj = object(json!({"v": value}));
    pane.add_input(&obj, "v", &params(p)).expect("input");
    pane
}

// ============================================================================
// Inputs
// ============================================================================

#[test]
fn snapshot_checkbox() {
    let pane = single_input(json!(true), json!({}));
    assert_html_snapshot!("checkbox", pane.element());
}

#[test]
fn snapshot_number_text() {
    let pane = single_input(json!(1.25), json!({}));
    assert_html_snapshot!("number_text", pane.element());
}

#[test]
fn snapshot_slider() {
    let pane = single_input(json!(30), json!({"min": 0, "max": 100, "step": 10}));
    assert_html_snapshot!("slider", pane.element());
}

#[test]
fn snapshot_list() {
    let pane = single_input(
        json!("b"),
        json!({"options": {"Alpha": "a", "Beta": "b"}}),
    );
    assert_html_snapshot!("list", pane.element());
}

#[test]
fn snapshot_color_swatch() {
    let pane = single_input(json!("#ff8800"), json!({"label": "Tint"}));
    assert_html_snapshot!("color_swatch", pane.element());
}

#[test]
fn snapshot_no_label() {
    let pane = pane();
    let obj = object(json!({"v": "hi"}));
    let input = pane.add_input(&obj, "v", &params(json!({}))).expect("text input");
    input.set_label(None);
    assert_html_snapshot!("no_label", pane.element());
}

// ============================================================================
// Monitors
// ============================================================================

#[test]
fn snapshot_multiline_monitor() {
    let pane = pane();
    let obj = object(json!({"log": "ready"}));
    pane.add_monitor(&obj, "log", &params(json!({"multiline": true, "bufferSize": 4})))
        .expect("string monitor");
    assert_html_snapshot!("multiline_monitor", pane.element());
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn snapshot_folder_collapsed() {
    let pane = pane();
    let folder = pane
        .add_folder(&params(json!({"title": "Settings", "expanded": false})))
        .expect("folder");
    folder
        .add_button(&params(json!({"title": "Reset"})))
        .expect("button");
    pane.add_separator(&params(json!({}))).expect("separator");
    assert_html_snapshot!("folder_collapsed", pane.element());
}

#[test]
fn snapshot_hidden_and_disabled() {
    let pane = pane();
    let a = pane
        .add_button(&params(json!({"title": "A"})))
        .expect("button");
    let b = pane
        .add_button(&params(json!({"title": "B"})))
        .expect("button");
    a.set_hidden(true);
    b.set_disabled(true);
    assert_html_snapshot!("hidden_and_disabled", pane.element());
}

// ============================================================================
// Digests
// ============================================================================

#[test]
fn identical_panes_share_a_digest() {
    let a = single_input(json!(5), json!({"min": 0, "max": 10}));
    let b = single_input(json!(5), json!({"min": 0, "max": 10}));
    assert_eq!(html_digest(a.element()), html_digest(b.element()));

    let c = single_input(json!(6), json!({"min": 0, "max": 10}));
    assert_ne!(html_digest(a.element()), html_digest(c.element()));
}
