#![forbid(unsafe_code)]

use std::rc::Rc;

use twiddle_runtime::{BindingError, ChangeOptions, MonitorBinding, Subscription, Unknown};

use super::{BladeApi, TpUpdateEvent, blade_handle};
use crate::blade::{BladeController, BladeKind, MonitorBindingBlade, MonitorBindingController};

/// Handle of a monitor row.
#[derive(Clone)]
pub struct MonitorBindingApi {
    controller: Rc<dyn BladeController>,
}

impl MonitorBindingApi {
    pub(crate) fn new(controller: Rc<dyn BladeController>) -> Self {
        Self { controller }
    }

    fn blade(&self) -> Option<&dyn MonitorBindingBlade> {
        match self.controller.kind() {
            BladeKind::MonitorBinding(blade) => Some(blade),
            _ => None,
        }
    }

    #[must_use]
    pub fn key(&self) -> String {
        self.blade()
            .map(|b| b.binding().target().key().to_owned())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn preset_key(&self) -> String {
        self.blade()
            .map(|b| b.binding().target().preset_key().to_owned())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn label(&self) -> Option<String> {
        self.blade()?.label().props().label.get()
    }

    pub fn set_label(&self, label: Option<String>) {
        if let Some(blade) = self.blade() {
            blade.label().props().label.set(label);
        }
    }

    #[must_use]
    pub fn value(&self) -> Unknown {
        self.blade()
            .and_then(|b| b.binding().target_value())
            .unwrap_or(Unknown::Null)
    }

    /// Read the property now, regardless of the interval.
    pub fn refresh(&self) -> Result<bool, BindingError> {
        self.blade()
            .ok_or(BindingError::Disposed)?
            .binding()
            .read()
    }

    /// The typed binding, when `T` is the monitored value type.
    #[must_use]
    pub fn binding<T: Clone + 'static>(&self) -> Option<MonitorBinding<T>> {
        self.controller
            .as_any()
            .downcast_ref::<MonitorBindingController<T>>()
            .map(|c| c.typed_binding().clone())
    }

    pub(crate) fn update_event(&self) -> TpUpdateEvent {
        TpUpdateEvent {
            target: BladeApi::Monitor(self.clone()),
            preset_key: self.preset_key(),
            value: self.value(),
        }
    }

    /// Called after every read.
    pub fn on_update(&self, handler: impl Fn(&TpUpdateEvent) + 'static) -> Subscription {
        let Some(blade) = self.blade() else {
            return Subscription::empty();
        };
        let api = self.clone();
        blade.binding().on_change(Box::new(move |_: ChangeOptions| {
            handler(&api.update_event());
        }))
    }
}

blade_handle!(MonitorBindingApi);
