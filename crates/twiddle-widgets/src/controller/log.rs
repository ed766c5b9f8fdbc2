#![forbid(unsafe_code)]

//! Read-only monitor views.
//!
//! Both views render from a [`BufferedValue`]; empty slots are skipped.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use twiddle_dom::{Document, Element};
use twiddle_runtime::converter::Formatter;
use twiddle_runtime::reactive::buffered::latest;
use twiddle_runtime::{BindingScope, BufferedValue, ViewProps};
use twiddle_style::ClassName;

use super::{ValueController, ValueControllerKind};
use crate::reactive::bind_class_modifier;

const SINGLE_CLASS: ClassName = ClassName::new("sgl");
const MULTI_CLASS: ClassName = ClassName::new("mll");

// ---------------------------------------------------------------------------
// SingleLogController
// ---------------------------------------------------------------------------

struct SingleInner<T> {
    element: Element,
    input: Element,
    value: BufferedValue<T>,
    view_props: ViewProps,
    _scope: BindingScope,
}

/// Shows the most recent monitored value in a read-only field.
pub struct SingleLogController<T> {
    inner: Rc<SingleInner<T>>,
}

impl<T> Clone for SingleLogController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> SingleLogController<T> {
    pub fn new(
        doc: &Document,
        formatter: Formatter<T>,
        value: BufferedValue<T>,
        view_props: ViewProps,
    ) -> Self {
        let element = doc.create_element("div");
        element.add_class(&SINGLE_CLASS.block());
        let input = doc.create_element("input");
        input.add_class(&SINGLE_CLASS.elem("i"));
        input.set_attribute("readonly", "true");
        input.set_attribute("type", "text");
        element.append_child(&input);

        let mut scope = BindingScope::new();
        scope.hold_all(bind_class_modifier(&view_props, &element));
        let field = input.clone();
        scope.bind_value(&value, move |buffer| {
            let text = latest(buffer).map(|v| formatter.format(v)).unwrap_or_default();
            field.set_value(&text);
        });

        Self {
            inner: Rc::new(SingleInner {
                element,
                input,
                value,
                view_props,
                _scope: scope,
            }),
        }
    }

    #[must_use]
    pub fn value(&self) -> &BufferedValue<T> {
        &self.inner.value
    }

    #[must_use]
    pub fn input_element(&self) -> &Element {
        &self.inner.input
    }
}

impl<T: Clone + 'static> ValueController for SingleLogController<T> {
    fn element(&self) -> &Element {
        &self.inner.element
    }

    fn view_props(&self) -> &ViewProps {
        &self.inner.view_props
    }

    fn kind(&self) -> ValueControllerKind {
        ValueControllerKind::SingleLog
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T> fmt::Debug for SingleLogController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleLogController").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// MultiLogController
// ---------------------------------------------------------------------------

struct MultiInner<T> {
    element: Element,
    textarea: Element,
    value: BufferedValue<T>,
    view_props: ViewProps,
    _scope: BindingScope,
}

/// Shows the monitored history, one entry per line.
pub struct MultiLogController<T> {
    inner: Rc<MultiInner<T>>,
}

impl<T> Clone for MultiLogController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> MultiLogController<T> {
    pub fn new(
        doc: &Document,
        formatter: Formatter<T>,
        line_count: usize,
        value: BufferedValue<T>,
        view_props: ViewProps,
    ) -> Self {
        let element = doc.create_element("div");
        element.add_class(&MULTI_CLASS.block());
        let textarea = doc.create_element("textarea");
        textarea.add_class(&MULTI_CLASS.elem("i"));
        textarea.set_attribute("readonly", "true");
        textarea.set_style(
            "height",
            &format!("calc(var(--bld-us) * {})", line_count.max(1)),
        );
        element.append_child(&textarea);

        let mut scope = BindingScope::new();
        scope.hold_all(bind_class_modifier(&view_props, &element));
        let area = textarea.clone();
        scope.bind_value(&value, move |buffer| {
            let lines: Vec<String> = buffer
                .iter()
                .flatten()
                .map(|v| formatter.format(v))
                .collect();
            area.set_value(&lines.join("\n"));
        });

        Self {
            inner: Rc::new(MultiInner {
                element,
                textarea,
                value,
                view_props,
                _scope: scope,
            }),
        }
    }

    #[must_use]
    pub fn value(&self) -> &BufferedValue<T> {
        &self.inner.value
    }

    #[must_use]
    pub fn textarea_element(&self) -> &Element {
        &self.inner.textarea
    }
}

impl<T: Clone + 'static> ValueController for MultiLogController<T> {
    fn element(&self) -> &Element {
        &self.inner.element
    }

    fn view_props(&self) -> &ViewProps {
        &self.inner.view_props
    }

    fn kind(&self) -> ValueControllerKind {
        ValueControllerKind::MultiLog
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T> fmt::Debug for MultiLogController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiLogController").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twiddle_runtime::reactive::{create_buffered_value, create_pushed_buffer};

    fn push(value: &BufferedValue<i32>, v: i32) {
        let next = value.with(|b| create_pushed_buffer(b, v));
        value.set(next);
    }

    #[test]
    fn single_log_shows_latest() {
        let value = create_buffered_value::<i32>(1);
        let c = SingleLogController::new(
            &Document::new(),
            Formatter::new(|v: &i32| format!("#{v}")),
            value.clone(),
            ViewProps::default(),
        );
        assert_eq!(c.input_element().value(), "");
        assert_eq!(c.input_element().attribute("readonly").as_deref(), Some("true"));
        push(&value, 7);
        assert_eq!(c.input_element().value(), "#7");
    }

    #[test]
    fn multi_log_joins_filled_slots() {
        let value = create_buffered_value::<i32>(3);
        let c = MultiLogController::new(
            &Document::new(),
            Formatter::new(|v: &i32| v.to_string()),
            3,
            value.clone(),
            ViewProps::default(),
        );
        push(&value, 1);
        push(&value, 2);
        assert_eq!(c.textarea_element().value(), "1\n2");
        push(&value, 3);
        push(&value, 4);
        assert_eq!(c.textarea_element().value(), "2\n3\n4");
        assert_eq!(
            c.textarea_element().style("height").as_deref(),
            Some("calc(var(--bld-us) * 3)")
        );
    }
}
