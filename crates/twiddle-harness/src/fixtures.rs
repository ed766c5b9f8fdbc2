#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;

use twiddle_runtime::{Object, Params, Unknown};
use twiddle_widgets::{Pane, PaneConfig};

/// Params from a JSON object literal. Anything else gives empty params.
#[must_use]
pub fn params(value: Unknown) -> Params {
    match value {
        Unknown::Object(map) => map,
        _ => Params::new(),
    }
}

/// A bindable object from a JSON object literal.
#[must_use]
pub fn object(value: Unknown) -> Object {
    Object::from_json(value).unwrap_or_default()
}

/// A pane with the default config.
#[must_use]
pub fn pane() -> Pane {
    Pane::new(PaneConfig::new())
}

/// Collects copies of the events handed to a handler.
///
/// ```ignore
/// let changes = Recorder::new();
/// let _sub = pane.on_change(changes.handler());
/// assert_eq!(changes.len(), 1);
/// ```
pub struct Recorder<E> {
    events: Rc<RefCell<Vec<E>>>,
}

impl<E> Clone for Recorder<E> {
    fn clone(&self) -> Self {
        Self {
            events: Rc::clone(&self.events),
        }
    }
}

impl<E> Default for Recorder<E> {
    fn default() -> Self {
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<E: Clone + 'static> Recorder<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler pushing a clone of each event.
    pub fn handler(&self) -> impl Fn(&E) + 'static {
        let events = Rc::clone(&self.events);
        move |event: &E| events.borrow_mut().push(event.clone())
    }

    pub fn push(&self, event: E) {
        self.events.borrow_mut().push(event);
    }

    #[must_use]
    pub fn events(&self) -> Vec<E> {
        self.events.borrow().clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<E> {
        self.events.borrow().last().cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn params_from_literal() {
        let p = params(json!({"min": 0, "label": "x"}));
        assert_eq!(p.len(), 2);
        assert!(params(json!(3)).is_empty());
    }

    #[test]
    fn recorder_collects_in_order() {
        let rec = Recorder::<u32>::new();
        let handler = rec.handler();
        handler(&1);
        handler(&2);
        assert_eq!(rec.events(), vec![1, 2]);
        assert_eq!(rec.last(), Some(2));
        rec.clear();
        assert!(rec.is_empty());
    }
}
