#![forbid(unsafe_code)]

use std::rc::Rc;

use twiddle_runtime::converter::{bool_from_unknown, write_primitive};
use twiddle_runtime::params::{boolean, list_options, optional};
use twiddle_runtime::{ListItem, Params, Unknown};

use super::{accept_with, list_constraint, options_constraint, value_controller_api};
use crate::controller::{CheckboxController, ListController, ValueController};
use crate::plugin::{
    Acceptance, BindingArgs, InputBindingHooks, InputBindingPlugin, InputControllerArgs,
};

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanInputParams {
    pub options: Option<Vec<ListItem<bool>>>,
}

/// Checkbox for booleans; a list when `options` is given.
#[must_use]
pub fn boolean_input() -> InputBindingPlugin<bool, BooleanInputParams> {
    InputBindingPlugin {
        id: "input-bool",
        accept,
        binding: InputBindingHooks {
            reader: |_| Rc::new(bool_from_unknown),
            constraint: Some(|args: &BindingArgs<'_, BooleanInputParams>| {
                options_constraint(args.params.options.as_deref())
            }),
            writer: |_| Rc::new(write_primitive::<bool>),
            equals: None,
        },
        controller,
        api: Some(value_controller_api::<bool>),
    }
}

fn accept(value: &Unknown, params: &Params) -> Acceptance<BooleanInputParams> {
    if !value.is_boolean() {
        return Acceptance::Rejected;
    }
    accept_with(value, params, |f| {
        Ok(BooleanInputParams {
            options: f.field("options", optional(list_options(boolean())))?,
        })
    })
}

fn controller(args: InputControllerArgs<'_, bool, BooleanInputParams>) -> Rc<dyn ValueController> {
    match list_constraint(args.constraint) {
        Some(list) => Rc::new(ListController::new(
            args.document,
            list.options().clone(),
            args.value.clone(),
            args.view_props,
        )),
        None => Rc::new(CheckboxController::new(
            args.document,
            args.value.clone(),
            args.view_props,
        )),
    }
}
