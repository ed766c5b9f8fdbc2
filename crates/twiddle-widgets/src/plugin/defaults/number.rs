#![forbid(unsafe_code)]

use std::rc::Rc;

use twiddle_runtime::constraint::create_number_constraint;
use twiddle_runtime::converter::{
    create_number_formatter, get_suitable_decimal_digits, get_suitable_key_scale,
    get_suitable_pointer_scale, number_from_unknown, parse_number, write_number,
};
use twiddle_runtime::params::{constant, list_options, number, optional};
use twiddle_runtime::{
    Constraint, DefiniteRangeConstraint, ListItem, Observable, Params, Unknown, find_constraint,
};

use super::{accept_with, list_constraint, value_controller_api};
use crate::controller::{
    ListController, NumberTextController, NumberTextProps, NumberTextPropsObject, SliderProps,
    SliderTextController, ValueController,
};
use crate::plugin::{
    Acceptance, BindingArgs, InputBindingHooks, InputBindingPlugin, InputControllerArgs,
};

#[derive(Debug, Clone, PartialEq)]
pub struct NumberInputParams {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub options: Option<Vec<ListItem<f64>>>,
    pub key_scale: Option<f64>,
    pub pointer_scale: Option<f64>,
}

/// Number field; a slider when both bounds are set, a list with `options`.
#[must_use]
pub fn number_input() -> InputBindingPlugin<f64, NumberInputParams> {
    InputBindingPlugin {
        id: "input-number",
        accept,
        binding: InputBindingHooks {
            reader: |_| Rc::new(number_from_unknown),
            constraint: Some(constraint),
            writer: |_| Rc::new(write_number),
            equals: None,
        },
        controller,
        api: Some(value_controller_api::<f64>),
    }
}

fn accept(value: &Unknown, params: &Params) -> Acceptance<NumberInputParams> {
    if !value.is_number() {
        return Acceptance::Rejected;
    }
    accept_with(value, params, |f| {
        f.field("readonly", optional(constant(false)))?;
        Ok(NumberInputParams {
            min: f.field("min", optional(number()))?,
            max: f.field("max", optional(number()))?,
            step: f.field("step", optional(number()))?,
            options: f.field("options", optional(list_options(number())))?,
            key_scale: f.field("keyScale", optional(number()))?,
            pointer_scale: f.field("pointerScale", optional(number()))?,
        })
    })
}

fn constraint(args: &BindingArgs<'_, NumberInputParams>) -> Option<Rc<dyn Constraint<f64>>> {
    let p = args.params;
    Some(Rc::new(create_number_constraint(
        p.step,
        p.min,
        p.max,
        p.options.clone(),
        number_from_unknown(args.initial_value),
    )))
}

fn controller(args: InputControllerArgs<'_, f64, NumberInputParams>) -> Rc<dyn ValueController> {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!("number_controller").entered();

    if let Some(list) = list_constraint(args.constraint) {
        return Rc::new(ListController::new(
            args.document,
            list.options().clone(),
            args.value.clone(),
            args.view_props,
        ));
    }

    let p = args.params;
    let raw = number_from_unknown(args.initial_value);
    let key_scale = p.key_scale.unwrap_or_else(|| get_suitable_key_scale(p.step));
    let text_props = NumberTextProps::from_object(NumberTextPropsObject {
        formatter: create_number_formatter(get_suitable_decimal_digits(p.step, raw)),
        key_scale,
        pointer_scale: p
            .pointer_scale
            .unwrap_or_else(|| get_suitable_pointer_scale(p.step, raw)),
    });
    let parser = Rc::new(parse_number);

    let range = args
        .constraint
        .and_then(|c| find_constraint::<f64, DefiniteRangeConstraint>(c.as_ref()));
    match range {
        Some(range) => Rc::new(SliderTextController::new(
            args.document,
            parser,
            SliderProps {
                key_scale: Observable::new(key_scale),
                max: range.max().clone(),
                min: range.min().clone(),
            },
            text_props,
            args.value.clone(),
            args.view_props,
        )),
        None => Rc::new(NumberTextController::new(
            args.document,
            parser,
            text_props,
            args.value.clone(),
            args.view_props,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Unknown) -> Params {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn readonly_must_be_false() {
        assert!(accept(&json!(1), &params(json!({"readonly": false}))).is_accepted());
        assert!(!accept(&json!(1), &params(json!({"readonly": true}))).is_accepted());
    }

    #[test]
    fn wrongly_typed_bounds_reject() {
        assert!(accept(&json!(1), &params(json!({"min": 0, "max": 10}))).is_accepted());
        assert!(!accept(&json!(1), &params(json!({"min": "0"}))).is_accepted());
        assert!(!accept(&json!("1"), &Params::new()).is_accepted());
    }

    #[test]
    fn constraint_composes_params() {
        let p = NumberInputParams {
            min: Some(0.0),
            max: Some(100.0),
            step: Some(10.0),
            options: None,
            key_scale: None,
            pointer_scale: None,
        };
        let target = twiddle_runtime::BindingTarget::for_object(
            &twiddle_runtime::Object::new(),
            "foo",
        );
        let initial = json!(0);
        let args = BindingArgs {
            target: &target,
            initial_value: &initial,
            params: &p,
        };
        let c = constraint(&args).expect("number inputs always constrain");
        assert_eq!(c.constrain(123.0), 100.0);
        assert_eq!(c.constrain(44.0), 40.0);
    }
}
