#![forbid(unsafe_code)]

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use twiddle_dom::{Document, Element, EventKind};
use twiddle_runtime::{BindingScope, Emitter, Subscription, ViewProps, value_map};
use twiddle_style::ClassName;

use super::{ValueController, ValueControllerKind};
use crate::reactive::{bind_class_modifier, bind_disabled};

const CLASS: ClassName = ClassName::new("btn");

value_map! {
    /// Button caption.
    pub struct ButtonProps / ButtonPropsObject {
        title: String,
    }
}

struct ButtonInner {
    element: Element,
    button: Element,
    props: ButtonProps,
    view_props: ViewProps,
    click: Emitter<()>,
    _scope: BindingScope,
}

/// A push button. It edits no value; clicks are re-emitted to listeners.
#[derive(Clone)]
pub struct ButtonController {
    inner: Rc<ButtonInner>,
}

impl ButtonController {
    pub fn new(doc: &Document, props: ButtonProps, view_props: ViewProps) -> Self {
        let element = doc.create_element("div");
        element.add_class(&CLASS.block());
        let button = doc.create_element("button");
        button.add_class(&CLASS.elem("b"));
        element.append_child(&button);
        let title = doc.create_element("div");
        title.add_class(&CLASS.elem("t"));
        button.append_child(&title);

        let mut scope = BindingScope::new();
        scope.hold_all(bind_class_modifier(&view_props, &element));
        scope.hold(bind_disabled(&view_props, &button));
        scope.bind_value(&props.title, move |text| title.set_text_content(text));

        let click = Emitter::new();
        let emitter = click.clone();
        button.add_event_listener(EventKind::Click, move |_| emitter.emit(&()));

        Self {
            inner: Rc::new(ButtonInner {
                element,
                button,
                props,
                view_props,
                click,
                _scope: scope,
            }),
        }
    }

    #[must_use]
    pub fn props(&self) -> &ButtonProps {
        &self.inner.props
    }

    #[must_use]
    pub fn button_element(&self) -> &Element {
        &self.inner.button
    }

    /// Run `handler` on every click.
    #[must_use = "dropping the subscription unregisters the handler"]
    pub fn on_click(&self, handler: impl Fn() + 'static) -> Subscription {
        self.inner.click.on(move |_| handler())
    }
}

impl ValueController for ButtonController {
    fn element(&self) -> &Element {
        &self.inner.element
    }

    fn view_props(&self) -> &ViewProps {
        &self.inner.view_props
    }

    fn kind(&self) -> ValueControllerKind {
        ValueControllerKind::Button
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for ButtonController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ButtonController")
            .field("title", &self.inner.props.title.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn button(title: &str) -> ButtonController {
        ButtonController::new(
            &Document::new(),
            ButtonProps::from_object(ButtonPropsObject {
                title: title.to_owned(),
            }),
            ViewProps::default(),
        )
    }

    #[test]
    fn title_follows_props() {
        let b = button("Run");
        assert_eq!(b.element().text_content(), "Run");
        b.props().title.set("Stop".to_owned());
        assert_eq!(b.element().text_content(), "Stop");
    }

    #[test]
    fn clicks_reach_listeners_unless_disabled() {
        let b = button("Go");
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let _sub = b.on_click(move || c.set(c.get() + 1));
        b.button_element().click();
        assert_eq!(count.get(), 1);

        b.view_props().set_disabled(true);
        b.button_element().click();
        assert_eq!(count.get(), 1);
    }
}
