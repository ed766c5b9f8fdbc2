#![forbid(unsafe_code)]

use std::rc::Rc;

use twiddle_runtime::converter::{format_string, string_from_unknown, write_primitive};
use twiddle_runtime::params::{list_options, optional, string};
use twiddle_runtime::{ListItem, Observable, Params, Unknown};

use super::{accept_with, list_constraint, options_constraint, value_controller_api};
use crate::controller::{ListController, TextController, ValueController};
use crate::plugin::{
    Acceptance, BindingArgs, InputBindingHooks, InputBindingPlugin, InputControllerArgs,
};

#[derive(Debug, Clone, PartialEq)]
pub struct StringInputParams {
    pub options: Option<Vec<ListItem<String>>>,
}

/// Text field for strings; a list when `options` is given.
#[must_use]
pub fn string_input() -> InputBindingPlugin<String, StringInputParams> {
    InputBindingPlugin {
        id: "input-string",
        accept,
        binding: InputBindingHooks {
            reader: |_| Rc::new(string_from_unknown),
            constraint: Some(|args: &BindingArgs<'_, StringInputParams>| {
                options_constraint(args.params.options.as_deref())
            }),
            writer: |_| Rc::new(write_primitive::<String>),
            equals: None,
        },
        controller,
        api: Some(value_controller_api::<String>),
    }
}

fn accept(value: &Unknown, params: &Params) -> Acceptance<StringInputParams> {
    if !value.is_string() {
        return Acceptance::Rejected;
    }
    accept_with(value, params, |f| {
        Ok(StringInputParams {
            options: f.field("options", optional(list_options(string())))?,
        })
    })
}

fn controller(
    args: InputControllerArgs<'_, String, StringInputParams>,
) -> Rc<dyn ValueController> {
    if let Some(list) = list_constraint(args.constraint) {
        return Rc::new(ListController::new(
            args.document,
            list.options().clone(),
            args.value.clone(),
            args.view_props,
        ));
    }
    Rc::new(TextController::new(
        args.document,
        Rc::new(|text: &str| Some(text.to_owned())),
        Observable::new(format_string()),
        args.value.clone(),
        args.view_props,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_strings() {
        assert!(accept(&json!("abc"), &Params::new()).is_accepted());
        assert!(!accept(&json!(1), &Params::new()).is_accepted());
    }
}
