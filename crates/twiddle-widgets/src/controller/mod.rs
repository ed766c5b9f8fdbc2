#![forbid(unsafe_code)]

//! Value controllers.
//!
//! A value controller owns one view, the observable it edits (or displays)
//! and the [`ViewProps`] shared with the blade that wraps it. Controllers are
//! cheap handles; cloning shares the same view.
//!
//! | Controller | Edits | Block class |
//! |------------|-------|-------------|
//! | [`TextController`] | any `T` with a parser | `tp-txtv` |
//! | [`NumberTextController`] | `f64`, keyboard and drag steps | `tp-txtv--num` |
//! | [`SliderController`] | `f64` within shared bounds | `tp-sldv` |
//! | [`SliderTextController`] | slider plus number text | `tp-sldtxtv` |
//! | [`ListController`] | one of a list of options | `tp-lstv` |
//! | [`CheckboxController`] | `bool` | `tp-ckbv` |
//! | [`ColorSwatchTextController`] | [`Color`](twiddle_style::Color) | `tp-colswtxtv` |
//! | [`SingleLogController`] / [`MultiLogController`] | monitor history | `tp-sglv` / `tp-mllv` |
//! | [`ButtonController`] | nothing; emits clicks | `tp-btnv` |

mod button;
mod checkbox;
mod color;
mod list;
mod log;
mod slider;
mod text;

pub use button::{ButtonController, ButtonProps, ButtonPropsObject};
pub use checkbox::CheckboxController;
pub use color::{APaletteView, ColorSwatchTextController};
pub use list::{ListController, ListOptions};
pub use log::{MultiLogController, SingleLogController};
pub use slider::{SliderController, SliderProps, SliderTextController};
pub use text::{NumberTextController, NumberTextProps, NumberTextPropsObject, TextController};

use std::any::Any;
use std::rc::Rc;

use twiddle_dom::Element;
use twiddle_runtime::ViewProps;

/// Converts user-entered text; `None` rejects it.
pub type Parser<T> = Rc<dyn Fn(&str) -> Option<T>>;

/// Discriminant of a value controller, for capability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueControllerKind {
    Text,
    NumberText,
    Slider,
    SliderText,
    List,
    Checkbox,
    ColorSwatchText,
    SingleLog,
    MultiLog,
    Button,
    /// Provided by a custom plugin.
    Custom,
}

/// A controller for one value view.
pub trait ValueController {
    fn element(&self) -> &Element;

    fn view_props(&self) -> &ViewProps;

    fn kind(&self) -> ValueControllerKind {
        ValueControllerKind::Custom
    }

    /// Typed access for API extensions.
    fn as_any(&self) -> &dyn Any;
}

/// Modifier multiplier for keyboard steps: shift ×10, alt ×0.1.
pub(crate) fn step_multiplier(shift: bool, alt: bool) -> f64 {
    if shift {
        10.0
    } else if alt {
        0.1
    } else {
        1.0
    }
}

/// Direction of an arrow key, if it is one.
pub(crate) fn arrow_direction(key: Option<&str>, horizontal: bool) -> Option<f64> {
    match key? {
        "ArrowUp" => Some(1.0),
        "ArrowDown" => Some(-1.0),
        "ArrowRight" if horizontal => Some(1.0),
        "ArrowLeft" if horizontal => Some(-1.0),
        _ => None,
    }
}
