#![forbid(unsafe_code)]

//! Conversions between raw property values, typed values and display text.

mod formatter;
mod number;
mod primitive;

pub use formatter::{Formatter, create_number_formatter, format_string};
pub use number::{
    MAX_EXPRESSION_DEPTH, MIN_SUITABLE_DECIMAL_DIGITS, constrain_range, get_decimal_digits,
    get_suitable_decimal_digits, get_suitable_key_scale, get_suitable_pointer_scale, map_range,
    number_from_unknown, number_to_unknown, parse_number,
};
pub use primitive::{
    bool_from_unknown, string_from_unknown, write_number, write_primitive,
};
