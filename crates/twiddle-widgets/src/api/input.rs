#![forbid(unsafe_code)]

use std::rc::Rc;

use twiddle_runtime::{
    Binding, BindingError, ChangeOptions, ListItem, Observable, Subscription, Unknown,
};

use super::{BladeApi, InputApiKind, TpChangeEvent, blade_handle};
use crate::blade::{BladeController, BladeKind, InputBindingBlade, InputBindingController};
use crate::controller::{ListController, SliderTextController};

/// Handle of an input binding row.
#[derive(Clone)]
pub struct InputBindingApi {
    controller: Rc<dyn BladeController>,
    kind: Option<InputApiKind>,
}

impl InputBindingApi {
    pub(crate) fn new(controller: Rc<dyn BladeController>, kind: Option<InputApiKind>) -> Self {
        Self { controller, kind }
    }

    fn blade(&self) -> Option<&dyn InputBindingBlade> {
        match self.controller.kind() {
            BladeKind::InputBinding(blade) => Some(blade),
            _ => None,
        }
    }

    /// Extension offered by the plugin that built this row.
    #[must_use]
    pub fn kind(&self) -> Option<InputApiKind> {
        self.kind
    }

    /// Bound property name.
    #[must_use]
    pub fn key(&self) -> String {
        self.blade()
            .map(|b| b.binding().target().key().to_owned())
            .unwrap_or_default()
    }

    /// Key reported in change events.
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

    /// Current property value.
    #[must_use]
    pub fn value(&self) -> Unknown {
        self.blade()
            .and_then(|b| b.binding().target_value())
            .unwrap_or(Unknown::Null)
    }

    /// Read the property into the row now.
    pub fn refresh(&self) -> Result<bool, BindingError> {
        self.blade()
            .ok_or(BindingError::Disposed)?
            .binding()
            .read()
    }

    /// The typed binding, when `In` is the row's value type.
    #[must_use]
    pub fn binding<In: Clone + 'static>(&self) -> Option<Binding<In>> {
        self.controller
            .as_any()
            .downcast_ref::<InputBindingController<In>>()
            .map(|c| c.typed_binding().clone())
    }

    /// Slider bounds, for rows drawn as sliders.
    #[must_use]
    pub fn as_slider(&self) -> Option<SliderInputBindingApi> {
        if self.kind != Some(InputApiKind::Slider) {
            return None;
        }
        let slider = self
            .blade()?
            .value_controller()
            .as_any()
            .downcast_ref::<SliderTextController>()?;
        Some(SliderInputBindingApi {
            min: slider.min().clone(),
            max: slider.max().clone(),
            input: self.clone(),
        })
    }

    /// Options, for rows drawn as lists of `T`.
    #[must_use]
    pub fn as_list<T: Clone + PartialEq + 'static>(&self) -> Option<ListInputBindingApi<T>> {
        if self.kind != Some(InputApiKind::List) {
            return None;
        }
        let list = self
            .blade()?
            .value_controller()
            .as_any()
            .downcast_ref::<ListController<T>>()?;
        Some(ListInputBindingApi {
            options: list.options().clone(),
            input: self.clone(),
        })
    }

    pub(crate) fn change_event(&self, last: bool) -> TpChangeEvent {
        TpChangeEvent {
            target: BladeApi::Input(self.clone()),
            preset_key: self.preset_key(),
            value: self.value(),
            last,
        }
    }

    /// Called after every change of this row's value.
    pub fn on_change(&self, handler: impl Fn(&TpChangeEvent) + 'static) -> Subscription {
        let Some(blade) = self.blade() else {
            return Subscription::empty();
        };
        let api = self.clone();
        blade.binding().on_change(Box::new(move |options: ChangeOptions| {
            handler(&api.change_event(options.last));
        }))
    }
}

blade_handle!(InputBindingApi);

/// A number input drawn as a slider. Bounds are shared with the row's range
/// constraint, so changing them re-clamps later writes.
#[derive(Clone)]
pub struct SliderInputBindingApi {
    min: Observable<f64>,
    max: Observable<f64>,
    input: InputBindingApi,
}

impl SliderInputBindingApi {
    #[must_use]
    pub fn input(&self) -> &InputBindingApi {
        &self.input
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min.get()
    }

    pub fn set_min(&self, min: f64) {
        self.min.set(min);
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max.get()
    }

    pub fn set_max(&self, max: f64) {
        self.max.set(max);
    }
}

impl std::fmt::Debug for SliderInputBindingApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SliderInputBindingApi")
            .field("min", &self.min.get())
            .field("max", &self.max.get())
            .finish_non_exhaustive()
    }
}

/// An input drawn as a list of options.
#[derive(Clone)]
pub struct ListInputBindingApi<T> {
    options: Observable<Vec<ListItem<T>>>,
    input: InputBindingApi,
}

impl<T: Clone + 'static> ListInputBindingApi<T> {
    #[must_use]
    pub fn input(&self) -> &InputBindingApi {
        &self.input
    }

    #[must_use]
    pub fn options(&self) -> Vec<ListItem<T>> {
        self.options.get()
    }

    /// Replace the options; the list view and constraint follow.
    pub fn set_options(&self, options: Vec<ListItem<T>>) {
        self.options.set(options);
    }
}
