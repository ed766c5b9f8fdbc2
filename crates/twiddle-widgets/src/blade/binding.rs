#![forbid(unsafe_code)]

//! Rows that own a binding.
//!
//! The row's ticker follows `global_disabled`: disabling the row or any
//! folder above it stops its reads.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use serde_json::json;
use tracing::error;
use twiddle_dom::{Document, Element};
use twiddle_runtime::params::{Fields, custom, parse_record, required};
use twiddle_runtime::{
    Binding, BindingHandle, BindingScope, MonitorBinding, Unknown, ViewProps,
};

use super::{Blade, BladeController, BladeKind, BladeState, ImportPlan, LabelController, LabelProps};
use crate::controller::ValueController;

/// Type-erased access to an input row.
pub trait InputBindingBlade {
    fn binding(&self) -> &dyn BindingHandle;

    fn label(&self) -> &LabelController;

    fn value_controller(&self) -> &Rc<dyn ValueController> {
        self.label().value_controller()
    }

    /// The concrete controller, for typed downcasts.
    fn as_any(&self) -> &dyn Any;
}

/// Type-erased access to a monitor row.
pub trait MonitorBindingBlade {
    fn binding(&self) -> &dyn BindingHandle;

    fn label(&self) -> &LabelController;

    fn value_controller(&self) -> &Rc<dyn ValueController> {
        self.label().value_controller()
    }

    fn as_any(&self) -> &dyn Any;
}

fn export_binding(label: &LabelController, binding: &dyn BindingHandle) -> BladeState {
    let mut state = label.export_label_state();
    let value = binding.target_value().unwrap_or(Unknown::Null);
    state.insert(
        "binding".into(),
        json!({"key": binding.target().key(), "value": value}),
    );
    state
}

/// The `binding.value` of a state, if its key matches.
fn parse_binding_value(state: &BladeState, key: &str) -> Option<Unknown> {
    parse_record(state, |f: &Fields<'_>| {
        f.field(
            "binding",
            required(custom(|v: &Unknown| {
                let obj = v.as_object()?;
                (obj.get("key")?.as_str()? == key).then(|| obj.get("value").cloned())?
            })),
        )
    })
    .ok()
}

// ---------------------------------------------------------------------------
// InputBindingController
// ---------------------------------------------------------------------------

struct InputInner<In> {
    label: LabelController,
    binding: Binding<In>,
    _scope: BindingScope,
}

/// A labeled row editing a bound property.
pub struct InputBindingController<In> {
    inner: Rc<InputInner<In>>,
}

impl<In> Clone for InputBindingController<In> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<In: Clone + 'static> InputBindingController<In> {
    pub fn new(
        doc: &Document,
        blade: Blade,
        props: LabelProps,
        binding: Binding<In>,
        value_controller: Rc<dyn ValueController>,
    ) -> Self {
        let label = LabelController::new(doc, blade, props, value_controller);
        let mut scope = BindingScope::new();
        let ticker = binding.ticker();
        scope.bind_value(label.view_props().global_disabled(), move |disabled| {
            ticker.set_disabled(*disabled);
        });
        let b = binding.clone();
        scope.hold(label.view_props().on_dispose(move || b.dispose()));

        Self {
            inner: Rc::new(InputInner {
                label,
                binding,
                _scope: scope,
            }),
        }
    }

    #[must_use]
    pub fn typed_binding(&self) -> &Binding<In> {
        &self.inner.binding
    }
}

impl<In: Clone + 'static> InputBindingBlade for InputBindingController<In> {
    fn binding(&self) -> &dyn BindingHandle {
        &self.inner.binding
    }

    fn label(&self) -> &LabelController {
        &self.inner.label
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<In: Clone + 'static> BladeController for InputBindingController<In> {
    fn element(&self) -> &Element {
        self.inner.label.element()
    }

    fn view_props(&self) -> &ViewProps {
        self.inner.label.view_props()
    }

    fn blade(&self) -> &Blade {
        self.inner.label.blade()
    }

    fn kind(&self) -> BladeKind<'_> {
        BladeKind::InputBinding(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dispose(&self) {
        self.inner.binding.dispose();
        self.view_props().dispose();
    }

    fn export_state(&self) -> BladeState {
        export_binding(&self.inner.label, &self.inner.binding)
    }

    fn prepare_import(&self, state: &BladeState) -> Option<ImportPlan> {
        let base = self.inner.label.prepare_label_import(state)?;
        let value = parse_binding_value(state, self.inner.binding.target().key())?;
        let binding = self.inner.binding.clone();
        Some(base.then(move || {
            if let Err(err) = binding.set_raw(&value) {
                error!(key = %binding.target().key(), error = %err, "state import write failed");
            }
        }))
    }
}

impl<In: fmt::Debug> fmt::Debug for InputBindingController<In> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputBindingController")
            .field("binding", &self.inner.binding)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// MonitorBindingController
// ---------------------------------------------------------------------------

struct MonitorInner<T> {
    label: LabelController,
    binding: MonitorBinding<T>,
    _scope: BindingScope,
}

/// A labeled row displaying a bound property.
pub struct MonitorBindingController<T> {
    inner: Rc<MonitorInner<T>>,
}

impl<T> Clone for MonitorBindingController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> MonitorBindingController<T> {
    pub fn new(
        doc: &Document,
        blade: Blade,
        props: LabelProps,
        binding: MonitorBinding<T>,
        value_controller: Rc<dyn ValueController>,
    ) -> Self {
        let label = LabelController::new(doc, blade, props, value_controller);
        let mut scope = BindingScope::new();
        let ticker = binding.ticker();
        scope.bind_value(label.view_props().global_disabled(), move |disabled| {
            ticker.set_disabled(*disabled);
        });
        let b = binding.clone();
        scope.hold(label.view_props().on_dispose(move || b.dispose()));

        Self {
            inner: Rc::new(MonitorInner {
                label,
                binding,
                _scope: scope,
            }),
        }
    }

    #[must_use]
    pub fn typed_binding(&self) -> &MonitorBinding<T> {
        &self.inner.binding
    }
}

impl<T: Clone + 'static> MonitorBindingBlade for MonitorBindingController<T> {
    fn binding(&self) -> &dyn BindingHandle {
        &self.inner.binding
    }

    fn label(&self) -> &LabelController {
        &self.inner.label
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: Clone + 'static> BladeController for MonitorBindingController<T> {
    fn element(&self) -> &Element {
        self.inner.label.element()
    }

    fn view_props(&self) -> &ViewProps {
        self.inner.label.view_props()
    }

    fn blade(&self) -> &Blade {
        self.inner.label.blade()
    }

    fn kind(&self) -> BladeKind<'_> {
        BladeKind::MonitorBinding(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dispose(&self) {
        self.inner.binding.dispose();
        self.view_props().dispose();
    }

    fn export_state(&self) -> BladeState {
        export_binding(&self.inner.label, &self.inner.binding)
    }

    /// Monitors are read-only: the bound value is checked, not written.
    fn prepare_import(&self, state: &BladeState) -> Option<ImportPlan> {
        let base = self.inner.label.prepare_label_import(state)?;
        parse_binding_value(state, self.inner.binding.target().key())?;
        Some(base)
    }
}

impl<T: fmt::Debug> fmt::Debug for MonitorBindingController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorBindingController")
            .field("binding", &self.inner.binding)
            .finish_non_exhaustive()
    }
}
