#![forbid(unsafe_code)]

use std::rc::Rc;

use twiddle_runtime::Subscription;

use super::blade_handle;
use crate::blade::{BladeController, BladeKind, LabelController};
use crate::controller::ButtonController;

/// Handle of a button blade.
#[derive(Clone)]
pub struct ButtonApi {
    controller: Rc<dyn BladeController>,
}

impl ButtonApi {
    pub(crate) fn new(controller: Rc<dyn BladeController>) -> Self {
        Self { controller }
    }

    fn label_controller(&self) -> Option<&LabelController> {
        match self.controller.kind() {
            BladeKind::Label(label) => Some(label),
            _ => None,
        }
    }

    fn button(&self) -> Option<&ButtonController> {
        self.label_controller()?
            .value_controller()
            .as_any()
            .downcast_ref::<ButtonController>()
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.button()
            .map(|b| b.props().title.get())
            .unwrap_or_default()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        if let Some(button) = self.button() {
            button.props().title.set(title.into());
        }
    }

    #[must_use]
    pub fn label(&self) -> Option<String> {
        self.label_controller()?.props().label.get()
    }

    pub fn set_label(&self, label: Option<String>) {
        if let Some(c) = self.label_controller() {
            c.props().label.set(label);
        }
    }

    /// Called on every click while the button is enabled.
    pub fn on_click(&self, handler: impl Fn() + 'static) -> Subscription {
        self.button()
            .map_or_else(Subscription::empty, |b| b.on_click(handler))
    }

    /// Click the button as a user would.
    pub fn click(&self) {
        if let Some(button) = self.button() {
            button.button_element().click();
        }
    }
}

blade_handle!(ButtonApi);
