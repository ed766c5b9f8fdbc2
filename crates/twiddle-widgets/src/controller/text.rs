#![forbid(unsafe_code)]

//! Text input controllers.
//!
//! # Failure Modes
//!
//! | Input | Behavior |
//! |-------|----------|
//! | Parser rejects the text | Display reverts to the formatted current value; the value is untouched |
//! | Parsed value is constrained to the current value | Display shows the constrained value; no change event |

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use twiddle_dom::{Document, DomEvent, Element, EventKind};
use twiddle_runtime::converter::Formatter;
use twiddle_runtime::{BindingScope, ChangeOptions, Observable, ViewProps, value_map};
use twiddle_style::ClassName;

use super::{Parser, ValueController, ValueControllerKind, arrow_direction, step_multiplier};
use crate::reactive::{bind_class_modifier, bind_disabled};

const CLASS: ClassName = ClassName::new("txt");

// ---------------------------------------------------------------------------
// TextController
// ---------------------------------------------------------------------------

struct TextInner<T> {
    element: Element,
    input: Element,
    value: Observable<T>,
    formatter: Observable<Formatter<T>>,
    parser: Parser<T>,
    view_props: ViewProps,
    scope: RefCell<BindingScope>,
}

impl<T: Clone + 'static> TextInner<T> {
    fn refresh(&self) {
        let text = self.value.with(|v| self.formatter.with(|f| f.format(v)));
        self.input.set_value(&text);
    }

    fn commit(&self) {
        if let Some(parsed) = (self.parser)(&self.input.value()) {
            self.value.set(parsed);
        }
        self.refresh();
    }
}

/// Edits a value through a single-line text field.
pub struct TextController<T> {
    inner: Rc<TextInner<T>>,
}

impl<T> Clone for TextController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> TextController<T> {
    pub fn new(
        doc: &Document,
        parser: Parser<T>,
        formatter: Observable<Formatter<T>>,
        value: Observable<T>,
        view_props: ViewProps,
    ) -> Self {
        let element = doc.create_element("div");
        element.add_class(&CLASS.block());
        let input = doc.create_element("input");
        input.add_class(&CLASS.elem("i"));
        input.set_attribute("type", "text");
        element.append_child(&input);

        let mut scope = BindingScope::new();
        scope.hold_all(bind_class_modifier(&view_props, &element));
        scope.hold(bind_disabled(&view_props, &input));

        let inner = Rc::new(TextInner {
            element,
            input,
            value,
            formatter,
            parser,
            view_props,
            scope: RefCell::new(BindingScope::new()),
        });

        let weak = Rc::downgrade(&inner);
        scope.hold(inner.value.subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.refresh();
            }
        }));
        let weak = Rc::downgrade(&inner);
        scope.hold(inner.formatter.subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.refresh();
            }
        }));
        let weak: Weak<TextInner<T>> = Rc::downgrade(&inner);
        inner.input.add_event_listener(EventKind::Change, move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.commit();
            }
        });

        *inner.scope.borrow_mut() = scope;
        inner.refresh();
        Self { inner }
    }

    #[must_use]
    pub fn value(&self) -> &Observable<T> {
        &self.inner.value
    }

    #[must_use]
    pub fn formatter(&self) -> &Observable<Formatter<T>> {
        &self.inner.formatter
    }

    #[must_use]
    pub fn input_element(&self) -> &Element {
        &self.inner.input
    }

    /// Redisplay the current value.
    pub fn refresh(&self) {
        self.inner.refresh();
    }
}

impl<T: Clone + 'static> ValueController for TextController<T> {
    fn element(&self) -> &Element {
        &self.inner.element
    }

    fn view_props(&self) -> &ViewProps {
        &self.inner.view_props
    }

    fn kind(&self) -> ValueControllerKind {
        ValueControllerKind::Text
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: fmt::Debug> fmt::Debug for TextController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextController")
            .field("value", &self.inner.value)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// NumberTextController
// ---------------------------------------------------------------------------

value_map! {
    /// Display and stepping settings of a number text field.
    pub struct NumberTextProps / NumberTextPropsObject {
        formatter: Formatter<f64>,
        key_scale: f64,
        pointer_scale: f64,
    }
}

struct NumberInner {
    text: TextController<f64>,
    props: NumberTextProps,
    knob: Element,
    drag_origin: Cell<Option<f64>>,
}

impl NumberInner {
    fn value(&self) -> &Observable<f64> {
        self.text.value()
    }

    fn on_key_down(&self, ev: &DomEvent) {
        let Some(dir) = arrow_direction(ev.key.as_deref(), false) else {
            return;
        };
        let step = self.props.key_scale.get() * step_multiplier(ev.shift_key, ev.alt_key);
        let next = self.value().get() + dir * step;
        self.value()
            .set_with_options(next, ChangeOptions::intermediate());
        self.text.refresh();
    }

    fn on_key_up(&self, ev: &DomEvent) {
        if arrow_direction(ev.key.as_deref(), false).is_none() {
            return;
        }
        self.value()
            .set_with_options(self.value().get(), ChangeOptions::forced());
    }

    fn on_drag(&self, ev: &DomEvent, options: ChangeOptions) {
        let Some(origin) = self.drag_origin.get() else {
            return;
        };
        let dx = ev.delta_x.unwrap_or(0.0);
        let next = origin + dx * self.props.pointer_scale.get();
        self.value().set_with_options(next, options);
    }
}

/// A text field for numbers that also steps with arrow keys and by dragging
/// its knob.
#[derive(Clone)]
pub struct NumberTextController {
    inner: Rc<NumberInner>,
}

impl NumberTextController {
    pub fn new(
        doc: &Document,
        parser: Parser<f64>,
        props: NumberTextProps,
        value: Observable<f64>,
        view_props: ViewProps,
    ) -> Self {
        let text = TextController::new(doc, parser, props.formatter.clone(), value, view_props);
        text.element().add_class(&CLASS.modifier("num"));
        let knob = doc.create_element("div");
        knob.add_class(&CLASS.elem("k"));
        text.element().insert_child(0, &knob);

        let inner = Rc::new(NumberInner {
            text,
            props,
            knob,
            drag_origin: Cell::new(None),
        });

        let input = inner.text.input_element().clone();
        let weak = Rc::downgrade(&inner);
        input.add_event_listener(EventKind::KeyDown, move |ev| {
            if let Some(inner) = weak.upgrade() {
                inner.on_key_down(ev);
            }
        });
        let weak = Rc::downgrade(&inner);
        input.add_event_listener(EventKind::KeyUp, move |ev| {
            if let Some(inner) = weak.upgrade() {
                inner.on_key_up(ev);
            }
        });

        let weak = Rc::downgrade(&inner);
        inner.knob.add_event_listener(EventKind::PointerDown, move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.drag_origin.set(Some(inner.value().get()));
                inner.knob.add_class(&CLASS.elem_modifier("k", "drg"));
            }
        });
        let weak = Rc::downgrade(&inner);
        inner.knob.add_event_listener(EventKind::PointerMove, move |ev| {
            if let Some(inner) = weak.upgrade() {
                inner.on_drag(ev, ChangeOptions::intermediate());
            }
        });
        let weak = Rc::downgrade(&inner);
        inner.knob.add_event_listener(EventKind::PointerUp, move |ev| {
            if let Some(inner) = weak.upgrade() {
                inner.on_drag(ev, ChangeOptions::forced());
                inner.drag_origin.set(None);
                inner.knob.remove_class(&CLASS.elem_modifier("k", "drg"));
            }
        });

        Self { inner }
    }

    #[must_use]
    pub fn value(&self) -> &Observable<f64> {
        self.inner.value()
    }

    #[must_use]
    pub fn props(&self) -> &NumberTextProps {
        &self.inner.props
    }

    #[must_use]
    pub fn text(&self) -> &TextController<f64> {
        &self.inner.text
    }

    #[must_use]
    pub fn input_element(&self) -> &Element {
        self.inner.text.input_element()
    }

    #[must_use]
    pub fn knob_element(&self) -> &Element {
        &self.inner.knob
    }
}

impl ValueController for NumberTextController {
    fn element(&self) -> &Element {
        self.inner.text.element()
    }

    fn view_props(&self) -> &ViewProps {
        self.inner.text.view_props()
    }

    fn kind(&self) -> ValueControllerKind {
        ValueControllerKind::NumberText
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for NumberTextController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumberTextController")
            .field("value", self.value())
            .field("props", &self.inner.props)
            .finish_non_exhaustive()
    }
}
