#![forbid(unsafe_code)]

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use serde_json::json;
use twiddle_dom::{Document, Element};
use twiddle_runtime::params::{Fields, optional, parse_record, required, string};
use twiddle_runtime::reactive::bind_value;
use twiddle_runtime::{BindingScope, ViewProps, value_map};
use twiddle_style::ClassName;

use super::{Blade, BladeController, BladeKind, BladeState, ImportPlan, bind_blade};
use crate::controller::{ButtonController, ValueController};

const CLASS: ClassName = ClassName::new("lbl");

value_map! {
    /// Label text of a row; `None` hides the label column.
    pub struct LabelProps / LabelPropsObject {
        label: Option<String>,
    }
}

impl LabelProps {
    #[must_use]
    pub fn with_label(label: Option<String>) -> Self {
        Self::from_object(LabelPropsObject { label })
    }
}

// ---------------------------------------------------------------------------
// LabeledView
// ---------------------------------------------------------------------------

/// Two-column row: label on the left, value view on the right.
pub struct LabeledView {
    element: Element,
    label_element: Element,
    value_element: Element,
    _scope: BindingScope,
}

impl LabeledView {
    pub fn new(doc: &Document, props: &LabelProps, blade: &Blade, view_props: &ViewProps) -> Self {
        let element = doc.create_element("div");
        element.add_class(&CLASS.block());
        let label_element = doc.create_element("div");
        label_element.add_class(&CLASS.elem("l"));
        element.append_child(&label_element);
        let value_element = doc.create_element("div");
        value_element.add_class(&CLASS.elem("v"));
        element.append_child(&value_element);

        let mut scope = BindingScope::new();
        scope.hold_all(bind_blade(blade, view_props, &element));
        let (doc, root, label_elem) = (*doc, element.clone(), label_element.clone());
        scope.hold(bind_value(&props.label, move |label| {
            let Some(label) = label else {
                root.add_class(&CLASS.modifier("nol"));
                return;
            };
            root.remove_class(&CLASS.modifier("nol"));
            label_elem.set_text_content("");
            for (index, line) in label.split('\n').enumerate() {
                if index > 0 {
                    label_elem.append_child(&doc.create_element("br"));
                }
                let span = doc.create_element("span");
                span.set_text_content(line);
                label_elem.append_child(&span);
            }
        }));

        Self {
            element,
            label_element,
            value_element,
            _scope: scope,
        }
    }

    #[must_use]
    pub fn element(&self) -> &Element {
        &self.element
    }

    #[must_use]
    pub fn label_element(&self) -> &Element {
        &self.label_element
    }

    #[must_use]
    pub fn value_element(&self) -> &Element {
        &self.value_element
    }
}

impl fmt::Debug for LabeledView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabeledView").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// LabelController
// ---------------------------------------------------------------------------

struct LabelInner {
    blade: Blade,
    props: LabelProps,
    value_controller: Rc<dyn ValueController>,
    view: LabeledView,
}

/// A labeled row around a value controller.
#[derive(Clone)]
pub struct LabelController {
    inner: Rc<LabelInner>,
}

impl LabelController {
    pub fn new(
        doc: &Document,
        blade: Blade,
        props: LabelProps,
        value_controller: Rc<dyn ValueController>,
    ) -> Self {
        let view = LabeledView::new(doc, &props, &blade, value_controller.view_props());
        view.value_element().append_child(value_controller.element());
        Self {
            inner: Rc::new(LabelInner {
                blade,
                props,
                value_controller,
                view,
            }),
        }
    }

    #[must_use]
    pub fn props(&self) -> &LabelProps {
        &self.inner.props
    }

    #[must_use]
    pub fn value_controller(&self) -> &Rc<dyn ValueController> {
        &self.inner.value_controller
    }

    #[must_use]
    pub fn view(&self) -> &LabeledView {
        &self.inner.view
    }

    /// The wrapped button, for button blades.
    fn button(&self) -> Option<&ButtonController> {
        self.inner
            .value_controller
            .as_any()
            .downcast_ref::<ButtonController>()
    }

    /// Label state on top of the view-prop state.
    pub(crate) fn export_label_state(&self) -> BladeState {
        let mut state = super::state::export_view_state(self.view_props());
        if let Some(label) = self.inner.props.label.get() {
            state.insert("label".into(), json!(label));
        }
        state
    }

    pub(crate) fn prepare_label_import(&self, state: &BladeState) -> Option<ImportPlan> {
        let base = super::state::prepare_view_import(self.view_props(), state)?;
        let label = parse_record(state, |f: &Fields<'_>| f.field("label", optional(string()))).ok()?;
        let props = self.inner.props.clone();
        Some(base.then(move || props.label.set(label)))
    }
}

impl BladeController for LabelController {
    fn element(&self) -> &Element {
        self.inner.view.element()
    }

    fn view_props(&self) -> &ViewProps {
        self.inner.value_controller.view_props()
    }

    fn blade(&self) -> &Blade {
        &self.inner.blade
    }

    fn kind(&self) -> BladeKind<'_> {
        BladeKind::Label(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn export_state(&self) -> BladeState {
        let mut state = self.export_label_state();
        if let Some(button) = self.button() {
            state.insert("title".into(), json!(button.props().title.get()));
        }
        state
    }

    fn prepare_import(&self, state: &BladeState) -> Option<ImportPlan> {
        let plan = self.prepare_label_import(state)?;
        let Some(button) = self.button() else {
            return Some(plan);
        };
        let title = parse_record(state, |f: &Fields<'_>| f.field("title", required(string()))).ok()?;
        let props = button.props().clone();
        Some(plan.then(move || props.title.set(title)))
    }
}

impl fmt::Debug for LabelController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelController")
            .field("label", &self.inner.props.label.get())
            .field("value_controller", &self.inner.value_controller.kind())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ButtonProps, ButtonPropsObject};

    fn labeled(label: Option<&str>) -> LabelController {
        let doc = Document::new();
        let button = ButtonController::new(
            &doc,
            ButtonProps::from_object(ButtonPropsObject {
                title: "Go".into(),
            }),
            ViewProps::default(),
        );
        LabelController::new(
            &doc,
            Blade::new(),
            LabelProps::with_label(label.map(str::to_owned)),
            Rc::new(button),
        )
    }

    #[test]
    fn multi_line_labels_use_line_breaks() {
        let c = labeled(Some("first\nsecond"));
        let label = c.view().label_element();
        assert_eq!(label.child_count(), 3);
        assert_eq!(label.child(1).map(|e| e.tag()).as_deref(), Some("br"));
        assert_eq!(label.text_content(), "firstsecond");
        assert!(!c.element().has_class("tp-lblv--nol"));
    }

    #[test]
    fn missing_label_adds_modifier() {
        let c = labeled(None);
        assert!(c.element().has_class("tp-lblv--nol"));
        c.props().label.set(Some("x".into()));
        assert!(!c.element().has_class("tp-lblv--nol"));
    }

    #[test]
    fn value_view_is_nested_and_shares_view_props() {
        let c = labeled(Some("a"));
        assert_eq!(c.view().value_element().child_count(), 1);
        c.view_props().set_disabled(true);
        assert!(c.element().has_class("tp-v--disabled"));
        assert!(c.value_controller().element().has_class("tp-v--disabled"));
    }

    #[test]
    fn state_round_trip() {
        let c = labeled(Some("speed"));
        let state = c.export_state();
        assert_eq!(state.get("label"), Some(&json!("speed")));

        let other = labeled(Some("other"));
        assert!(other.import_state(&state));
        assert_eq!(other.props().label.get().as_deref(), Some("speed"));
    }

    #[test]
    fn button_title_is_part_of_state() {
        let c = labeled(None);
        let mut state = c.export_state();
        assert_eq!(state.get("title"), Some(&json!("Go")));
        assert_eq!(state.get("label"), None);

        state.insert("title".into(), json!("Stop"));
        assert!(c.import_state(&state));
        let button = c.button().map(|b| b.props().title.get());
        assert_eq!(button.as_deref(), Some("Stop"));

        state.insert("title".into(), json!(7));
        assert!(!c.import_state(&state));
    }
}
