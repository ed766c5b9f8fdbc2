#![forbid(unsafe_code)]

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use twiddle_dom::{Document, Element, EventKind};
use twiddle_runtime::{BindingScope, Observable, ViewProps};
use twiddle_style::ClassName;

use super::{ValueController, ValueControllerKind};
use crate::reactive::{bind_class_modifier, bind_disabled};

const CLASS: ClassName = ClassName::new("ckb");

struct CheckboxInner {
    element: Element,
    input: Element,
    value: Observable<bool>,
    view_props: ViewProps,
    _scope: BindingScope,
}

/// Edits a boolean through a checkbox.
#[derive(Clone)]
pub struct CheckboxController {
    inner: Rc<CheckboxInner>,
}

impl CheckboxController {
    pub fn new(doc: &Document, value: Observable<bool>, view_props: ViewProps) -> Self {
        let element = doc.create_element("div");
        element.add_class(&CLASS.block());
        let label = doc.create_element("label");
        label.add_class(&CLASS.elem("l"));
        element.append_child(&label);
        let input = doc.create_element("input");
        input.add_class(&CLASS.elem("i"));
        input.set_attribute("type", "checkbox");
        label.append_child(&input);
        let wrapper = doc.create_element("div");
        wrapper.add_class(&CLASS.elem("w"));
        label.append_child(&wrapper);

        let mut scope = BindingScope::new();
        scope.hold_all(bind_class_modifier(&view_props, &element));
        scope.hold(bind_disabled(&view_props, &input));
        let checkbox = input.clone();
        scope.bind_value(&value, move |checked| checkbox.set_checked(*checked));

        let target = value.clone();
        let source = input.downgrade();
        input.add_event_listener(EventKind::Change, move |_| {
            if let Some(input) = source.upgrade() {
                target.set(input.checked());
            }
        });

        Self {
            inner: Rc::new(CheckboxInner {
                element,
                input,
                value,
                view_props,
                _scope: scope,
            }),
        }
    }

    #[must_use]
    pub fn value(&self) -> &Observable<bool> {
        &self.inner.value
    }

    #[must_use]
    pub fn input_element(&self) -> &Element {
        &self.inner.input
    }
}

impl ValueController for CheckboxController {
    fn element(&self) -> &Element {
        &self.inner.element
    }

    fn view_props(&self) -> &ViewProps {
        &self.inner.view_props
    }

    fn kind(&self) -> ValueControllerKind {
        ValueControllerKind::Checkbox
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for CheckboxController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckboxController")
            .field("value", &self.inner.value)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkbox_round_trip() {
        let value = Observable::new(true);
        let c = CheckboxController::new(&Document::new(), value.clone(), ViewProps::default());
        assert!(c.input_element().checked());
        c.input_element().set_checked(false);
        c.input_element().dispatch(EventKind::Change);
        assert!(!value.get());
        value.set(true);
        assert!(c.input_element().checked());
    }
}
