#![forbid(unsafe_code)]

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use twiddle_dom::{Document, Element, EventKind};
use twiddle_runtime::{BindingScope, ListItem, Observable, ViewProps};
use twiddle_style::ClassName;

use super::{ValueController, ValueControllerKind};
use crate::reactive::{bind_class_modifier, bind_disabled};

const CLASS: ClassName = ClassName::new("lst");

/// Options of a list, usually shared with a [`ListConstraint`](twiddle_runtime::ListConstraint).
pub type ListOptions<T> = Observable<Vec<ListItem<T>>>;

struct ListInner<T> {
    doc: Document,
    element: Element,
    select: Element,
    options: ListOptions<T>,
    value: Observable<T>,
    view_props: ViewProps,
    scope: RefCell<BindingScope>,
}

impl<T: Clone + PartialEq + 'static> ListInner<T> {
    fn render_options(&self) {
        self.select.set_text_content("");
        self.options.with(|items| {
            for (index, item) in items.iter().enumerate() {
                let option = self.doc.create_element("option");
                option.set_attribute("value", &index.to_string());
                option.set_text_content(&item.text);
                self.select.append_child(&option);
            }
        });
    }

    fn render_selection(&self) {
        let selected = self.value.with(|value| {
            self.options
                .with(|items| items.iter().position(|item| &item.value == value))
        });
        self.select
            .set_value(&selected.map(|i| i.to_string()).unwrap_or_default());
    }

    fn commit(&self) {
        let picked = self
            .select
            .value()
            .parse::<usize>()
            .ok()
            .and_then(|index| self.options.with(|items| items.get(index).cloned()));
        if let Some(item) = picked {
            self.value.set(item.value);
        }
        self.render_selection();
    }
}

/// Picks one of a list of options through a select box.
pub struct ListController<T> {
    inner: Rc<ListInner<T>>,
}

impl<T> Clone for ListController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + 'static> ListController<T> {
    pub fn new(
        doc: &Document,
        options: ListOptions<T>,
        value: Observable<T>,
        view_props: ViewProps,
    ) -> Self {
        let element = doc.create_element("div");
        element.add_class(&CLASS.block());
        let select = doc.create_element("select");
        select.add_class(&CLASS.elem("s"));
        element.append_child(&select);
        let mark = doc.create_element("div");
        mark.add_class(&CLASS.elem("m"));
        element.append_child(&mark);

        let mut scope = BindingScope::new();
        scope.hold_all(bind_class_modifier(&view_props, &element));
        scope.hold(bind_disabled(&view_props, &select));

        let inner = Rc::new(ListInner {
            doc: *doc,
            element,
            select,
            options,
            value,
            view_props,
            scope: RefCell::new(BindingScope::new()),
        });

        let weak = Rc::downgrade(&inner);
        scope.hold(inner.options.subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.render_options();
                inner.render_selection();
            }
        }));
        let weak = Rc::downgrade(&inner);
        scope.hold(inner.value.subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.render_selection();
            }
        }));
        let weak = Rc::downgrade(&inner);
        inner.select.add_event_listener(EventKind::Change, move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.commit();
            }
        });

        *inner.scope.borrow_mut() = scope;
        inner.render_options();
        inner.render_selection();
        Self { inner }
    }

    #[must_use]
    pub fn value(&self) -> &Observable<T> {
        &self.inner.value
    }

    #[must_use]
    pub fn options(&self) -> &ListOptions<T> {
        &self.inner.options
    }

    #[must_use]
    pub fn select_element(&self) -> &Element {
        &self.inner.select
    }
}

impl<T: Clone + PartialEq + 'static> ValueController for ListController<T> {
    fn element(&self) -> &Element {
        &self.inner.element
    }

    fn view_props(&self) -> &ViewProps {
        &self.inner.view_props
    }

    fn kind(&self) -> ValueControllerKind {
        ValueControllerKind::List
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: fmt::Debug> fmt::Debug for ListController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListController")
            .field("options", &self.inner.options)
            .field("value", &self.inner.value)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<ListItem<f64>> {
        vec![ListItem::new("one", 1.0), ListItem::new("two", 2.0)]
    }

    #[test]
    fn renders_options_and_selection() {
        let c = ListController::new(
            &Document::new(),
            Observable::new(items()),
            Observable::new(2.0),
            ViewProps::default(),
        );
        let select = c.select_element();
        assert_eq!(select.child_count(), 2);
        assert_eq!(select.value(), "1");
        assert_eq!(select.text_content(), "onetwo");
    }

    #[test]
    fn change_picks_option_value() {
        let value = Observable::new(1.0);
        let c = ListController::new(
            &Document::new(),
            Observable::new(items()),
            value.clone(),
            ViewProps::default(),
        );
        c.select_element().set_value("1");
        c.select_element().dispatch(EventKind::Change);
        assert_eq!(value.get(), 2.0);

        c.select_element().set_value("7");
        c.select_element().dispatch(EventKind::Change);
        assert_eq!(value.get(), 2.0);
        assert_eq!(c.select_element().value(), "1");
    }

    #[test]
    fn option_changes_rerender() {
        let c = ListController::new(
            &Document::new(),
            Observable::new(items()),
            Observable::new(3.0),
            ViewProps::default(),
        );
        assert_eq!(c.select_element().value(), "");
        c.options().update(|o| o.push(ListItem::new("three", 3.0)));
        assert_eq!(c.select_element().child_count(), 3);
        assert_eq!(c.select_element().value(), "2");
    }
}
