#![forbid(unsafe_code)]

//! Plugins every pane starts with.
//!
//! Each constructor returns a fresh plugin record, so hosts can register a
//! default under a custom pool without the rest.

mod blades;
mod boolean;
mod color;
mod monitors;
mod number;
mod string;

pub use blades::{ButtonBladeParams, FolderBladeParams, button_blade, folder_blade, separator_blade};
pub use boolean::{BooleanInputParams, boolean_input};
pub use color::{
    NumberColorParams, ObjectColorParams, StringColorParams, number_color_input,
    object_color_input, string_color_input,
};
pub use monitors::{LogParams, boolean_monitor, number_monitor, string_monitor};
pub use number::{NumberInputParams, number_input};
pub use string::{StringInputParams, string_input};

use std::rc::Rc;

use twiddle_runtime::params::{Fields, parse_record};
use twiddle_runtime::{
    Constraint, ListConstraint, ListItem, Params, ParamsError, Unknown, find_constraint,
};

use super::{Acceptance, Plugin};
use crate::api::InputApiKind;
use crate::blade::InputBindingController;
use crate::controller::ValueControllerKind;

/// Every default plugin in resolution order.
#[must_use]
pub fn all() -> Vec<Plugin> {
    vec![
        boolean_input().into(),
        number_color_input().into(),
        string_color_input().into(),
        object_color_input().into(),
        number_input().into(),
        string_input().into(),
        boolean_monitor().into(),
        number_monitor().into(),
        string_monitor().into(),
        button_blade().into(),
        folder_blade().into(),
        separator_blade().into(),
    ]
}

/// Accept `value` as-is with params parsed by `build`; bad params reject.
fn accept_with<P>(
    value: &Unknown,
    params: &Params,
    build: impl FnOnce(&Fields<'_>) -> Result<P, ParamsError>,
) -> Acceptance<P> {
    match parse_record(params, build) {
        Ok(params) => Acceptance::Accepted {
            initial_value: value.clone(),
            params,
        },
        Err(err) => {
            tracing::trace!(error = %err, "params rejected");
            Acceptance::Rejected
        }
    }
}

/// The list constraint inside a binding's constraint, if any.
fn list_constraint<T: 'static>(
    constraint: Option<&Rc<dyn Constraint<T>>>,
) -> Option<&ListConstraint<T>> {
    find_constraint::<T, ListConstraint<T>>(constraint?.as_ref())
}

/// A list constraint built from `options`.
fn options_constraint<T>(options: Option<&[ListItem<T>]>) -> Option<Rc<dyn Constraint<T>>>
where
    T: Clone + PartialEq + 'static,
{
    options.map(|o| Rc::new(ListConstraint::new(o.to_vec())) as Rc<dyn Constraint<T>>)
}

/// Extension of inputs that render as a list or a slider.
fn value_controller_api<In: Clone + 'static>(
    controller: &InputBindingController<In>,
) -> Option<InputApiKind> {
    use crate::blade::InputBindingBlade;

    match controller.value_controller().kind() {
        ValueControllerKind::List => Some(InputApiKind::List),
        ValueControllerKind::SliderText | ValueControllerKind::Slider => Some(InputApiKind::Slider),
        _ => None,
    }
}
