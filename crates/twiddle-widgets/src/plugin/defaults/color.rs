#![forbid(unsafe_code)]

//! Color inputs for number, string and `{r, g, b[, a]}` properties.

use std::rc::Rc;

use twiddle_runtime::converter::{Formatter, number_from_unknown, number_to_unknown};
use twiddle_runtime::params::{boolean, constant, optional, required, string, with_default};
use twiddle_runtime::{BindingTarget, Params, ParamsError, Reader, TargetError, Unknown};
use twiddle_style::{Color, ColorNotation};

use super::accept_with;
use crate::controller::{ColorSwatchTextController, ValueController};
use crate::plugin::{
    Acceptance, BindingArgs, InputBindingHooks, InputBindingPlugin, InputControllerArgs,
};

fn swatch(
    args: &InputControllerArgs<'_, Color, impl Sized>,
    formatter: Formatter<Color>,
    supports_alpha: bool,
) -> Rc<dyn ValueController> {
    Rc::new(ColorSwatchTextController::new(
        args.document,
        formatter,
        supports_alpha,
        args.value.clone(),
        args.view_props.clone(),
    ))
}

// ---------------------------------------------------------------------------
// Number
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct NumberColorParams {
    /// `0xRRGGBBAA` instead of `0xRRGGBB`.
    pub alpha: bool,
}

/// Colors stored as numbers; needs `view: "color"`.
#[must_use]
pub fn number_color_input() -> InputBindingPlugin<Color, NumberColorParams> {
    InputBindingPlugin {
        id: "input-color-number",
        accept: accept_number,
        binding: InputBindingHooks {
            reader: read_number_color,
            constraint: None,
            writer: |args: &BindingArgs<'_, NumberColorParams>| {
                let alpha = args.params.alpha;
                Rc::new(move |target: &BindingTarget, color: &Color| {
                    let n = if alpha {
                        color.to_rgba_number()
                    } else {
                        color.to_rgb_number()
                    };
                    target.write(number_to_unknown(f64::from(n)))
                })
            },
            equals: None,
        },
        controller: |args| {
            let alpha = args.params.alpha;
            let formatter = if alpha {
                Formatter::new(Color::to_hex_rgba_string)
            } else {
                Formatter::new(Color::to_hex_rgb_string)
            };
            swatch(&args, formatter, alpha)
        },
        api: None,
    }
}

fn accept_number(value: &Unknown, params: &Params) -> Acceptance<NumberColorParams> {
    if !value.is_number() {
        return Acceptance::Rejected;
    }
    accept_with(value, params, |f| {
        f.field("view", required(constant("color")))?;
        Ok(NumberColorParams {
            alpha: f.field("alpha", with_default(boolean(), false))?,
        })
    })
}

fn read_number_color(args: &BindingArgs<'_, NumberColorParams>) -> Reader<Color> {
    if args.params.alpha {
        Rc::new(|v: &Unknown| Color::from_rgba_number(to_u32(v)))
    } else {
        Rc::new(|v: &Unknown| Color::from_rgb_number(to_u32(v)))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u32(value: &Unknown) -> u32 {
    number_from_unknown(value).clamp(0.0, f64::from(u32::MAX)) as u32
}

// ---------------------------------------------------------------------------
// String
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StringColorParams {
    /// Notation of the initial value; writes use it too.
    pub notation: ColorNotation,
}

/// Colors stored as CSS strings. `view: "text"` opts out.
#[must_use]
pub fn string_color_input() -> InputBindingPlugin<Color, StringColorParams> {
    InputBindingPlugin {
        id: "input-color-string",
        accept: accept_string,
        binding: InputBindingHooks {
            reader: |_| Rc::new(|v: &Unknown| v.as_str().and_then(Color::parse).unwrap_or_default()),
            constraint: None,
            writer: |args: &BindingArgs<'_, StringColorParams>| {
                let notation = args.params.notation;
                Rc::new(move |target: &BindingTarget, color: &Color| {
                    target.write(Unknown::from(color.to_notation_string(notation)))
                })
            },
            equals: None,
        },
        controller: |args| {
            let notation = args.params.notation;
            swatch(
                &args,
                Formatter::new(move |c: &Color| c.to_notation_string(notation)),
                notation.has_alpha(),
            )
        },
        api: None,
    }
}

fn accept_string(value: &Unknown, params: &Params) -> Acceptance<StringColorParams> {
    let Some(notation) = value.as_str().and_then(Color::detect_notation) else {
        return Acceptance::Rejected;
    };
    accept_with(value, params, |f| {
        let view = f.field("view", optional(string()))?;
        if view.as_deref() == Some("text") {
            return Err(ParamsError::Invalid {
                key: "view".into(),
                reason: "text view requested".into(),
            });
        }
        Ok(StringColorParams { notation })
    })
}

// ---------------------------------------------------------------------------
// Object
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectColorParams {
    /// The object carries an `a` field.
    pub alpha: bool,
}

/// Colors stored as `{r, g, b}` or `{r, g, b, a}` objects, written field by
/// field.
#[must_use]
pub fn object_color_input() -> InputBindingPlugin<Color, ObjectColorParams> {
    InputBindingPlugin {
        id: "input-color-object",
        accept: accept_object,
        binding: InputBindingHooks {
            reader: |_| Rc::new(|v: &Unknown| color_from_object(v).unwrap_or_default()),
            constraint: None,
            writer: |args: &BindingArgs<'_, ObjectColorParams>| {
                let alpha = args.params.alpha;
                Rc::new(move |target: &BindingTarget, color: &Color| {
                    write_color_object(target, color, alpha)
                })
            },
            equals: None,
        },
        controller: |args| {
            let alpha = args.params.alpha;
            let formatter = if alpha {
                Formatter::new(Color::to_functional_rgba_string)
            } else {
                Formatter::new(Color::to_functional_rgb_string)
            };
            swatch(&args, formatter, alpha)
        },
        api: None,
    }
}

fn accept_object(value: &Unknown, params: &Params) -> Acceptance<ObjectColorParams> {
    if color_from_object(value).is_none() {
        return Acceptance::Rejected;
    }
    let alpha = value.get("a").is_some();
    accept_with(value, params, |_| Ok(ObjectColorParams { alpha }))
}

fn color_from_object(value: &Unknown) -> Option<Color> {
    let obj = value.as_object()?;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let channel = |key: &str| {
        obj.get(key)
            .and_then(Unknown::as_f64)
            .map(|v| v.round().clamp(0.0, 255.0) as u8)
    };
    let a = match obj.get("a") {
        Some(a) => a.as_f64()?,
        None => 1.0,
    };
    Some(Color::rgba(channel("r")?, channel("g")?, channel("b")?, a))
}

fn write_color_object(target: &BindingTarget, color: &Color, alpha: bool) -> Result<(), TargetError> {
    target.write_property("r", number_to_unknown(f64::from(color.r())))?;
    target.write_property("g", number_to_unknown(f64::from(color.g())))?;
    target.write_property("b", number_to_unknown(f64::from(color.b())))?;
    if alpha {
        target.write_property("a", number_to_unknown(color.alpha()))?;
    }
    Ok(())
}
