#![forbid(unsafe_code)]

//! Blades: the rows of a pane.
//!
//! A blade controller owns one row view. Labeled rows wrap a
//! [`ValueController`](crate::controller::ValueController); binding rows also
//! own a binding; folders own a [`Rack`] of child blades.
//!
//! # Invariants
//!
//! 1. `dispose()` disposes children before the blade itself and sets every
//!    `disposed` flag exactly once. Calling it again is a no-op.
//! 2. A disposed child leaves its rack.
//! 3. `import_state` either applies every field of a state or none of them.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | State does not parse | Missing key, wrong type, child count mismatch | `import_state` returns `false`, nothing applied |
//! | Binding write fails during import | Target rejected the value | Logged, import still reports `true` |

mod binding;
mod folder;
mod label;
mod rack;
mod separator;
mod state;

pub use binding::{
    InputBindingBlade, InputBindingController, MonitorBindingBlade, MonitorBindingController,
};
pub use folder::{FolderController, FolderProps, FolderPropsObject};
pub use label::{LabelController, LabelProps, LabelPropsObject, LabeledView};
pub use rack::{Rack, RackEvent};
pub use separator::SeparatorController;
pub use state::{BladeState, ImportPlan};

use std::any::Any;

use bitflags::bitflags;
use twiddle_dom::Element;
use twiddle_runtime::reactive::bind_value;
use twiddle_runtime::{Observable, Subscription, ViewProps};
use twiddle_style::CSS_PREFIX;

use crate::reactive::bind_class_modifier;

bitflags! {
    /// Where a blade sits in its rack.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BladePosition: u8 {
        const FIRST = 0b001;
        const LAST = 0b010;
        /// First blade of the root rack.
        const VERY_FIRST = 0b100;
    }
}

impl BladePosition {
    fn class_names() -> [(Self, String); 3] {
        [
            (Self::FIRST, format!("{CSS_PREFIX}-v-fst")),
            (Self::LAST, format!("{CSS_PREFIX}-v-lst")),
            (Self::VERY_FIRST, format!("{CSS_PREFIX}-v-vfst")),
        ]
    }
}

/// Per-row state shared by every blade controller.
#[derive(Debug, Clone)]
pub struct Blade {
    positions: Observable<BladePosition>,
}

impl Default for Blade {
    fn default() -> Self {
        Self {
            positions: Observable::new(BladePosition::empty()),
        }
    }
}

impl Blade {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn positions(&self) -> &Observable<BladePosition> {
        &self.positions
    }

    pub fn set_positions(&self, positions: BladePosition) {
        self.positions.set(positions);
    }
}

/// Position classes and view-prop modifiers of a blade's root element.
pub(crate) fn bind_blade(blade: &Blade, view_props: &ViewProps, elem: &Element) -> Vec<Subscription> {
    let mut subs = bind_class_modifier(view_props, elem);
    let elem = elem.clone();
    subs.push(bind_value(&blade.positions, move |positions| {
        for (flag, class) in BladePosition::class_names() {
            elem.toggle_class(&class, positions.contains(flag));
        }
    }));
    subs
}

/// Capability view of a blade controller.
#[derive(Clone, Copy)]
pub enum BladeKind<'a> {
    Label(&'a LabelController),
    InputBinding(&'a dyn InputBindingBlade),
    MonitorBinding(&'a dyn MonitorBindingBlade),
    Folder(&'a FolderController),
    Separator,
    /// Provided by a custom plugin.
    Custom,
}

impl BladeKind<'_> {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Label(_) => "label",
            Self::InputBinding(_) => "input",
            Self::MonitorBinding(_) => "monitor",
            Self::Folder(_) => "folder",
            Self::Separator => "separator",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Debug for BladeKind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A controller for one row of a pane.
pub trait BladeController {
    fn element(&self) -> &Element;

    fn view_props(&self) -> &ViewProps;

    fn blade(&self) -> &Blade;

    fn kind(&self) -> BladeKind<'_> {
        BladeKind::Custom
    }

    /// Typed access for API extensions.
    fn as_any(&self) -> &dyn Any;

    /// Dispose the blade (and its children). Idempotent.
    fn dispose(&self) {
        self.view_props().dispose();
    }

    fn export_state(&self) -> BladeState {
        state::export_view_state(self.view_props())
    }

    /// Validate `state` and return the changes it would apply.
    fn prepare_import(&self, state: &BladeState) -> Option<ImportPlan> {
        state::prepare_view_import(self.view_props(), state)
    }

    /// Apply `state` if it is valid. Returns `false` and changes nothing
    /// otherwise.
    fn import_state(&self, state: &BladeState) -> bool {
        match self.prepare_import(state) {
            Some(plan) => {
                plan.apply();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twiddle_dom::Document;

    #[test]
    fn positions_toggle_classes() {
        let blade = Blade::new();
        let elem = Document::new().create_element("div");
        let _subs = bind_blade(&blade, &ViewProps::default(), &elem);
        blade.set_positions(BladePosition::FIRST | BladePosition::LAST);
        assert!(elem.has_class("tp-v-fst"));
        assert!(elem.has_class("tp-v-lst"));
        blade.set_positions(BladePosition::LAST);
        assert!(!elem.has_class("tp-v-fst"));
        assert!(elem.has_class("tp-v-lst"));
        assert!(!elem.has_class("tp-v-vfst"));
    }
}
