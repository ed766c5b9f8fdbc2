#![forbid(unsafe_code)]

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use serde_json::json;
use tracing::debug;
use twiddle_dom::{Document, Element, EventKind};
use twiddle_runtime::params::{Fields, array, boolean, custom, optional, parse_record, required, string};
use twiddle_runtime::{BindingScope, Unknown, ViewProps, value_map};
use twiddle_style::ClassName;

use super::rack::Rack;
use super::state::{export_view_state, prepare_view_import};
use super::{Blade, BladeController, BladeKind, BladeState, ImportPlan, bind_blade};
use crate::reactive::{bind_class, bind_disabled, bind_text_content};

const CLASS: ClassName = ClassName::new("fld");
const ROOT_CLASS: ClassName = ClassName::new("rot");

value_map! {
    /// Folder title and fold state.
    pub struct FolderProps / FolderPropsObject {
        title: Option<String>,
        expanded: bool,
    }
}

struct FolderInner {
    element: Element,
    button: Element,
    title_element: Element,
    blade: Blade,
    props: FolderProps,
    view_props: ViewProps,
    rack: Rack,
    _scope: BindingScope,
}

/// A collapsible group of blades.
#[derive(Clone)]
pub struct FolderController {
    inner: Rc<FolderInner>,
}

impl FolderController {
    pub fn new(doc: &Document, blade: Blade, props: FolderProps, view_props: ViewProps) -> Self {
        let element = doc.create_element("div");
        element.add_class(&CLASS.block());
        let button = doc.create_element("button");
        button.add_class(&CLASS.elem("b"));
        element.append_child(&button);
        let title_element = doc.create_element("div");
        title_element.add_class(&CLASS.elem("t"));
        button.append_child(&title_element);
        let mark = doc.create_element("div");
        mark.add_class(&CLASS.elem("m"));
        button.append_child(&mark);
        let container = doc.create_element("div");
        container.add_class(&CLASS.elem("c"));
        element.append_child(&container);

        let mut scope = BindingScope::new();
        scope.hold_all(bind_blade(&blade, &view_props, &element));
        scope.hold(bind_disabled(&view_props, &button));
        scope.hold(bind_class(&props.expanded, &element, CLASS.modifier("expanded")));
        scope.hold(bind_text_content(&props.title, &title_element));
        let root = element.clone();
        scope.bind_value(&props.title, move |title| {
            root.toggle_class(&CLASS.modifier("not"), title.is_none());
        });

        let expanded = props.expanded.clone();
        button.add_event_listener(EventKind::Click, move |_| {
            expanded.set(!expanded.get());
        });

        let rack = Rack::new(container, view_props.clone());
        Self {
            inner: Rc::new(FolderInner {
                element,
                button,
                title_element,
                blade,
                props,
                view_props,
                rack,
                _scope: scope,
            }),
        }
    }

    /// The top folder of a pane.
    pub fn new_root(doc: &Document, props: FolderProps, view_props: ViewProps) -> Self {
        let folder = Self::new(doc, Blade::new(), props, view_props);
        folder.inner.element.add_class(&ROOT_CLASS.block());
        folder.inner.rack.set_root(true);
        folder
    }

    #[must_use]
    pub fn props(&self) -> &FolderProps {
        &self.inner.props
    }

    #[must_use]
    pub fn rack(&self) -> &Rack {
        &self.inner.rack
    }

    #[must_use]
    pub fn button_element(&self) -> &Element {
        &self.inner.button
    }

    #[must_use]
    pub fn title_element(&self) -> &Element {
        &self.inner.title_element
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.inner.props.expanded.get()
    }

    pub fn set_expanded(&self, expanded: bool) {
        self.inner.props.expanded.set(expanded);
    }

    /// Whether both handles refer to the same folder.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl BladeController for FolderController {
    fn element(&self) -> &Element {
        &self.inner.element
    }

    fn view_props(&self) -> &ViewProps {
        &self.inner.view_props
    }

    fn blade(&self) -> &Blade {
        &self.inner.blade
    }

    fn kind(&self) -> BladeKind<'_> {
        BladeKind::Folder(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dispose(&self) {
        if self.inner.view_props.is_disposed() {
            return;
        }
        debug!(children = self.inner.rack.len(), "folder disposing");
        self.inner.rack.dispose_children();
        self.inner.view_props.dispose();
    }

    fn export_state(&self) -> BladeState {
        let mut state = export_view_state(&self.inner.view_props);
        if let Some(title) = self.inner.props.title.get() {
            state.insert("title".into(), json!(title));
        }
        state.insert("expanded".into(), json!(self.is_expanded()));
        let children: Vec<Unknown> = self
            .inner
            .rack
            .children()
            .iter()
            .map(|c| Unknown::Object(c.export_state()))
            .collect();
        state.insert("children".into(), Unknown::Array(children));
        state
    }

    fn prepare_import(&self, state: &BladeState) -> Option<ImportPlan> {
        let base = prepare_view_import(&self.inner.view_props, state)?;
        let (title, expanded, children) = parse_record(state, |f: &Fields<'_>| {
            Ok((
                f.field("title", optional(string()))?,
                f.field("expanded", required(boolean()))?,
                f.field(
                    "children",
                    required(array(custom(|v: &Unknown| v.as_object().cloned()))),
                )?,
            ))
        })
        .ok()?;

        let current = self.inner.rack.children();
        if current.len() != children.len() {
            return None;
        }
        let mut plan = base;
        for (child, child_state) in current.iter().zip(&children) {
            plan = plan.merge(child.prepare_import(child_state)?);
        }
        let props = self.inner.props.clone();
        Some(plan.then(move || {
            props.title.set(title);
            props.expanded.set(expanded);
        }))
    }
}

impl fmt::Debug for FolderController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FolderController")
            .field("title", &self.inner.props.title.get())
            .field("expanded", &self.inner.props.expanded.get())
            .field("rack", &self.inner.rack)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blade::SeparatorController;

    fn folder(title: &str) -> FolderController {
        FolderController::new(
            &Document::new(),
            Blade::new(),
            FolderProps::from_object(FolderPropsObject {
                title: Some(title.into()),
                expanded: true,
            }),
            ViewProps::default(),
        )
    }

    fn add_separator(f: &FolderController) -> Rc<dyn BladeController> {
        let s: Rc<dyn BladeController> = Rc::new(SeparatorController::new(
            &Document::new(),
            Blade::new(),
            ViewProps::default(),
        ));
        f.rack().add(Rc::clone(&s), None);
        s
    }

    #[test]
    fn initial_state() {
        let f = folder("Folder");
        assert!(f.is_expanded());
        assert!(f.element().has_class("tp-fldv--expanded"));
        assert_eq!(f.title_element().text_content(), "Folder");
        assert!(!f.view_props().is_hidden());
    }

    #[test]
    fn title_updates_view() {
        let f = folder("Folder");
        f.props().title.set(Some("changed".into()));
        assert_eq!(f.title_element().text_content(), "changed");
        f.props().title.set(None);
        assert!(f.element().has_class("tp-fldv--not"));
    }

    #[test]
    fn clicking_title_toggles_expanded() {
        let f = folder("Folder");
        f.button_element().click();
        assert!(!f.is_expanded());
        assert!(!f.element().has_class("tp-fldv--expanded"));
    }

    #[test]
    fn dispose_is_recursive_and_idempotent() {
        let outer = folder("outer");
        let inner = folder("inner");
        let inner_blade: Rc<dyn BladeController> = Rc::new(inner.clone());
        outer.rack().add(Rc::clone(&inner_blade), None);
        let leaf = add_separator(&inner);

        outer.dispose();
        assert!(outer.view_props().is_disposed());
        assert!(inner.view_props().is_disposed());
        assert!(leaf.view_props().is_disposed());
        assert!(outer.rack().is_empty());
        outer.dispose();
        assert!(outer.view_props().is_disposed());
    }

    #[test]
    fn nested_fold_events_bubble() {
        let outer = folder("outer");
        let inner = folder("inner");
        outer.rack().add(Rc::new(inner.clone()), None);
        let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = outer.rack().on_event(move |ev| {
            if let crate::blade::RackEvent::Fold { expanded, .. } = ev {
                s.borrow_mut().push(*expanded);
            }
        });
        inner.set_expanded(false);
        assert_eq!(*seen.borrow(), vec![false]);
    }

    #[test]
    fn state_round_trip_includes_children() {
        let f = folder("Folder");
        let s = add_separator(&f);
        s.view_props().set_hidden(true);
        let state = f.export_state();
        assert_eq!(state.get("children").and_then(Unknown::as_array).map(Vec::len), Some(1));

        let g = folder("Other");
        add_separator(&g);
        g.set_expanded(false);
        assert!(g.import_state(&state));
        assert!(g.is_expanded());
        assert_eq!(g.props().title.get().as_deref(), Some("Folder"));
        assert!(g.rack().children()[0].view_props().is_hidden());
    }

    #[test]
    fn child_count_mismatch_rejects_state() {
        let f = folder("Folder");
        add_separator(&f);
        let state = f.export_state();
        let g = folder("Other");
        assert!(!g.import_state(&state));
        assert_eq!(g.props().title.get().as_deref(), Some("Other"));
    }
}
