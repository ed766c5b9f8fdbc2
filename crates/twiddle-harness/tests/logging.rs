#![forbid(unsafe_code)]

//! Integration tests: failures surface as structured log events.

use std::fmt;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use serde_json::json;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use twiddle_harness::{find, object, pane, params, type_text};
use twiddle_runtime::{Bindable, BindingTarget, TargetError, Unknown};
use twiddle_widgets::BladeHandle;

#[derive(Debug, Clone, PartialEq)]
struct Captured {
    level: Level,
    message: String,
    fields: Vec<(String, String)>,
}

impl Captured {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_owned();
        } else {
            self.fields.push((field.name().to_owned(), value.to_owned()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push((field.name().to_owned(), format!("{value:?}")));
        }
    }
}

#[derive(Clone, Default)]
struct CaptureLayer {
    events: Arc<Mutex<Vec<Captured>>>,
}

impl CaptureLayer {
    fn at_least(&self, level: Level) -> Vec<Captured> {
        self.events
            .lock()
            .map(|events| events.iter().filter(|e| e.level <= level).cloned().collect())
            .unwrap_or_default()
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        if let Ok(mut events) = self.events.lock() {
            events.push(Captured {
                level: *event.metadata().level(),
                message: visitor.message,
                fields: visitor.fields,
            });
        }
    }
}

fn capture<R>(f: impl FnOnce() -> R) -> (R, CaptureLayer) {
    let layer = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, layer)
}

/// A host object that refuses every write.
struct Frozen;

impl Bindable for Frozen {
    fn read_property(&self, key: &str) -> Result<Unknown, TargetError> {
        match key {
            "speed" => Ok(json!(1)),
            _ => Err(TargetError::MissingProperty { key: key.to_owned() }),
        }
    }

    fn write_property(&self, key: &str, _value: Unknown) -> Result<(), TargetError> {
        Err(TargetError::Rejected {
            key: key.to_owned(),
            reason: "frozen".into(),
        })
    }
}

#[test]
fn unresolved_binding_logs_a_warning() {
    let (result, layer) = capture(|| {
        let pane = pane();
        let obj = object(json!({"points": [1, 2, 3]}));
        pane.add_input(&obj, "points", &params(json!({}))).is_err()
    });
    assert!(result);

    let warnings = layer.at_least(Level::WARN);
    assert_eq!(warnings.len(), 1, "{warnings:?}");
    assert_eq!(warnings[0].message, "no input plugin accepted");
    assert_eq!(warnings[0].field("key"), Some("points"));
}

#[test]
fn rejected_write_logs_an_error() {
    let (value, layer) = capture(|| {
        let pane = pane();
        let input = pane
            .add_input_with(
                BindingTarget::new(Rc::new(Frozen), "speed"),
                &params(json!({})),
            )
            .expect("number input");
        type_text(&find(input.element(), "tp-txtv_i"), "5");
        input.value()
    });
    assert_eq!(value, json!(1));

    let errors = layer.at_least(Level::ERROR);
    let failed = errors
        .iter()
        .find(|e| e.message == "binding write failed")
        .unwrap_or_else(|| panic!("no write failure in {errors:?}"));
    assert_eq!(failed.field("key"), Some("speed"));
    assert!(failed.field("error").is_some_and(|e| e.contains("frozen")));
}

#[test]
fn quiet_on_success() {
    let ((), layer) = capture(|| {
        let pane = pane();
        let obj = object(json!({"on": false}));
        pane.add_input(&obj, "on", &params(json!({})))
            .expect("checkbox input");
    });
    assert!(layer.at_least(Level::WARN).is_empty());
}
