#![forbid(unsafe_code)]

use std::fmt;

use serde_json::json;
use twiddle_runtime::params::{Fields, boolean, parse_record, required};
use twiddle_runtime::{Params, ViewProps};

/// Exported blade state: a JSON object.
pub type BladeState = Params;

/// Validated changes waiting to be applied.
#[derive(Default)]
pub struct ImportPlan {
    steps: Vec<Box<dyn FnOnce()>>,
}

impl ImportPlan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    #[must_use]
    pub fn then(mut self, step: impl FnOnce() + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Append every step of `other`.
    #[must_use]
    pub fn merge(mut self, other: ImportPlan) -> Self {
        self.steps.extend(other.steps);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run the steps in order.
    pub fn apply(self) {
        for step in self.steps {
            step();
        }
    }
}

impl fmt::Debug for ImportPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportPlan")
            .field("steps", &self.steps.len())
            .finish()
    }
}

pub(crate) fn export_view_state(view_props: &ViewProps) -> BladeState {
    let mut state = BladeState::new();
    state.insert("disabled".into(), json!(view_props.is_disabled()));
    state.insert("hidden".into(), json!(view_props.is_hidden()));
    state
}

pub(crate) fn prepare_view_import(view_props: &ViewProps, state: &BladeState) -> Option<ImportPlan> {
    let (disabled, hidden) = parse_record(state, |f: &Fields<'_>| {
        Ok((
            f.field("disabled", required(boolean()))?,
            f.field("hidden", required(boolean()))?,
        ))
    })
    .ok()?;
    let view_props = view_props.clone();
    Some(ImportPlan::new().then(move || {
        view_props.set_disabled(disabled);
        view_props.set_hidden(hidden);
    }))
}
