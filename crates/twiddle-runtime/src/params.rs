#![forbid(unsafe_code)]

//! Micro-parsers for untyped plugin params.
//!
//! Plugins receive params as an open JSON map. They describe the fields they
//! understand with small composable parsers and get back either a typed
//! struct or a [`ParamsError`] naming the offending key.
//!
//! ```
//! use serde_json::json;
//! use twiddle_runtime::params::{Fields, boolean, number, optional, parse_record, with_default};
//!
//! struct SliderParams {
//!     min: Option<f64>,
//!     readonly: bool,
//! }
//!
//! let raw = json!({"min": 0, "readonly": false});
//! let params = parse_record(raw.as_object().unwrap(), |p: &Fields<'_>| {
//!     Ok(SliderParams {
//!         min: p.field("min", optional(number()))?,
//!         readonly: p.field("readonly", with_default(boolean(), false))?,
//!     })
//! })
//! .unwrap();
//! assert_eq!(params.min, Some(0.0));
//! assert!(!params.readonly);
//! ```
//!
//! # Failure Modes
//!
//! | Failure | Cause | Result |
//! |---------|-------|--------|
//! | Missing field | `required` key absent | `ParamsError::Missing` |
//! | Wrong type | Present key with another JSON type | `ParamsError::Type` |
//! | Invalid value | Right type, rejected by a `constant`/`custom` parser | `ParamsError::Invalid` |

use thiserror::Error;

use crate::constraint::ListItem;
use crate::unknown::{Params, Unknown};

/// Why params did not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("missing required param `{key}`")]
    Missing { key: String },
    #[error("param `{key}` must be {expected}")]
    Type { key: String, expected: &'static str },
    #[error("param `{key}` is invalid: {reason}")]
    Invalid { key: String, reason: String },
}

/// Failure of a single value parser, before a key is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    Missing,
    Type(&'static str),
    Invalid(String),
}

impl ParseFailure {
    fn at(self, key: &str) -> ParamsError {
        let key = key.to_owned();
        match self {
            Self::Missing => ParamsError::Missing { key },
            Self::Type(expected) => ParamsError::Type { key, expected },
            Self::Invalid(reason) => ParamsError::Invalid { key, reason },
        }
    }
}

// ---------------------------------------------------------------------------
// Value parsers
// ---------------------------------------------------------------------------

/// Parses a present value.
pub trait MicroParser {
    type Output;

    fn parse_value(&self, value: &Unknown) -> Result<Self::Output, ParseFailure>;
}

/// Parses a possibly absent value.
pub trait FieldParser {
    type Output;

    fn parse_field(&self, value: Option<&Unknown>) -> Result<Self::Output, ParseFailure>;
}

#[derive(Debug, Clone, Copy)]
pub struct NumberParser;

impl MicroParser for NumberParser {
    type Output = f64;

    fn parse_value(&self, value: &Unknown) -> Result<f64, ParseFailure> {
        value.as_f64().ok_or(ParseFailure::Type("a number"))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StringParser;

impl MicroParser for StringParser {
    type Output = String;

    fn parse_value(&self, value: &Unknown) -> Result<String, ParseFailure> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or(ParseFailure::Type("a string"))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BooleanParser;

impl MicroParser for BooleanParser {
    type Output = bool;

    fn parse_value(&self, value: &Unknown) -> Result<bool, ParseFailure> {
        value.as_bool().ok_or(ParseFailure::Type("a boolean"))
    }
}

/// Accepts exactly one value.
#[derive(Debug, Clone)]
pub struct ConstantParser<T> {
    expected: T,
}

impl<T: Clone + Into<Unknown>> MicroParser for ConstantParser<T> {
    type Output = T;

    fn parse_value(&self, value: &Unknown) -> Result<T, ParseFailure> {
        let expected: Unknown = self.expected.clone().into();
        if *value == expected {
            Ok(self.expected.clone())
        } else {
            Err(ParseFailure::Invalid(format!("expected {expected}")))
        }
    }
}

/// Accepts whatever `f` recognizes.
#[derive(Clone)]
pub struct CustomParser<F> {
    f: F,
}

impl<T, F: Fn(&Unknown) -> Option<T>> MicroParser for CustomParser<F> {
    type Output = T;

    fn parse_value(&self, value: &Unknown) -> Result<T, ParseFailure> {
        (self.f)(value).ok_or_else(|| ParseFailure::Invalid("unrecognized value".into()))
    }
}

/// Accepts an array whose every element parses.
#[derive(Debug, Clone)]
pub struct ArrayParser<P> {
    item: P,
}

impl<P: MicroParser> MicroParser for ArrayParser<P> {
    type Output = Vec<P::Output>;

    fn parse_value(&self, value: &Unknown) -> Result<Self::Output, ParseFailure> {
        value
            .as_array()
            .ok_or(ParseFailure::Type("an array"))?
            .iter()
            .map(|v| self.item.parse_value(v))
            .collect()
    }
}

/// Accepts list options, either `[{text, value}, ..]` or `{text: value, ..}`.
#[derive(Debug, Clone)]
pub struct ListOptionsParser<P> {
    item: P,
}

impl<P: MicroParser> MicroParser for ListOptionsParser<P> {
    type Output = Vec<ListItem<P::Output>>;

    fn parse_value(&self, value: &Unknown) -> Result<Self::Output, ParseFailure> {
        match value {
            Unknown::Array(items) => items
                .iter()
                .map(|item| {
                    let text = item
                        .get("text")
                        .and_then(Unknown::as_str)
                        .ok_or(ParseFailure::Type("a list of {text, value} items"))?;
                    let value = item
                        .get("value")
                        .ok_or(ParseFailure::Type("a list of {text, value} items"))?;
                    Ok(ListItem::new(text, self.item.parse_value(value)?))
                })
                .collect(),
            Unknown::Object(map) => map
                .iter()
                .map(|(text, v)| Ok(ListItem::new(text.clone(), self.item.parse_value(v)?)))
                .collect(),
            _ => Err(ParseFailure::Type("list options")),
        }
    }
}

#[must_use]
pub fn number() -> NumberParser {
    NumberParser
}

#[must_use]
pub fn string() -> StringParser {
    StringParser
}

#[must_use]
pub fn boolean() -> BooleanParser {
    BooleanParser
}

#[must_use]
pub fn constant<T: Clone + Into<Unknown>>(expected: T) -> ConstantParser<T> {
    ConstantParser { expected }
}

#[must_use]
pub fn custom<T, F: Fn(&Unknown) -> Option<T>>(f: F) -> CustomParser<F> {
    CustomParser { f }
}

#[must_use]
pub fn array<P: MicroParser>(item: P) -> ArrayParser<P> {
    ArrayParser { item }
}

#[must_use]
pub fn list_options<P: MicroParser>(item: P) -> ListOptionsParser<P> {
    ListOptionsParser { item }
}

// ---------------------------------------------------------------------------
// Field combinators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Required<P>(P);

impl<P: MicroParser> FieldParser for Required<P> {
    type Output = P::Output;

    fn parse_field(&self, value: Option<&Unknown>) -> Result<P::Output, ParseFailure> {
        self.0.parse_value(value.ok_or(ParseFailure::Missing)?)
    }
}

#[derive(Debug, Clone)]
pub struct Optional<P>(P);

impl<P: MicroParser> FieldParser for Optional<P> {
    type Output = Option<P::Output>;

    fn parse_field(&self, value: Option<&Unknown>) -> Result<Self::Output, ParseFailure> {
        value.map(|v| self.0.parse_value(v)).transpose()
    }
}

pub struct WithDefault<P: MicroParser> {
    parser: P,
    default: P::Output,
}

impl<P> FieldParser for WithDefault<P>
where
    P: MicroParser,
    P::Output: Clone,
{
    type Output = P::Output;

    fn parse_field(&self, value: Option<&Unknown>) -> Result<P::Output, ParseFailure> {
        match value {
            Some(v) => self.parser.parse_value(v),
            None => Ok(self.default.clone()),
        }
    }
}

/// The key must be present and parse.
#[must_use]
pub fn required<P: MicroParser>(parser: P) -> Required<P> {
    Required(parser)
}

/// The key may be absent; when present it must parse.
#[must_use]
pub fn optional<P: MicroParser>(parser: P) -> Optional<P> {
    Optional(parser)
}

/// Like [`optional`], substituting `default` when absent.
#[must_use]
pub fn with_default<P: MicroParser>(parser: P, default: P::Output) -> WithDefault<P> {
    WithDefault { parser, default }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Field access for [`parse_record`].
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    params: &'a Params,
}

impl<'a> Fields<'a> {
    #[must_use]
    pub fn new(params: &'a Params) -> Self {
        Self { params }
    }

    /// Parse one key.
    pub fn field<P: FieldParser>(&self, key: &str, parser: P) -> Result<P::Output, ParamsError> {
        parser
            .parse_field(self.params.get(key))
            .map_err(|failure| failure.at(key))
    }

    /// The raw params.
    #[must_use]
    pub fn raw(&self) -> &'a Params {
        self.params
    }
}

/// Build a typed record from params.
pub fn parse_record<T>(
    params: &Params,
    build: impl FnOnce(&Fields<'_>) -> Result<T, ParamsError>,
) -> Result<T, ParamsError> {
    build(&Fields::new(params))
}

/// A string param, ignoring other types.
#[must_use]
pub fn find_string_param(params: &Params, key: &str) -> Option<String> {
    params.get(key).and_then(Unknown::as_str).map(str::to_owned)
}

/// A number param, ignoring other types.
#[must_use]
pub fn find_number_param(params: &Params, key: &str) -> Option<f64> {
    params.get(key).and_then(Unknown::as_f64)
}

/// A boolean param, ignoring other types.
#[must_use]
pub fn find_bool_param(params: &Params, key: &str) -> Option<bool> {
    params.get(key).and_then(Unknown::as_bool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Unknown) -> Params {
        match value {
            Unknown::Object(map) => map,
            _ => Params::new(),
        }
    }

    #[derive(Debug, PartialEq)]
    struct ButtonParams {
        title: String,
        label: Option<String>,
        view: String,
    }

    fn parse_button(p: &Params) -> Result<ButtonParams, ParamsError> {
        parse_record(p, |f| {
            Ok(ButtonParams {
                title: f.field("title", required(string()))?,
                label: f.field("label", optional(string()))?,
                view: f.field("view", required(constant("button".to_string())))?,
            })
        })
    }

    #[test]
    fn record_parses_when_fields_match() {
        let p = params(json!({"view": "button", "title": "Go", "extra": 1}));
        assert_eq!(
            parse_button(&p),
            Ok(ButtonParams {
                title: "Go".into(),
                label: None,
                view: "button".into(),
            })
        );
    }

    #[test]
    fn missing_required_field_names_the_key() {
        let p = params(json!({"view": "button"}));
        assert_eq!(
            parse_button(&p),
            Err(ParamsError::Missing {
                key: "title".into()
            })
        );
    }

    #[test]
    fn wrong_type_is_reported_even_when_optional() {
        let p = params(json!({"view": "button", "title": "Go", "label": 3}));
        assert_eq!(
            parse_button(&p),
            Err(ParamsError::Type {
                key: "label".into(),
                expected: "a string"
            })
        );
    }

    #[test]
    fn constant_mismatch_is_invalid() {
        let p = params(json!({"view": "folder", "title": "Go"}));
        assert!(matches!(
            parse_button(&p),
            Err(ParamsError::Invalid { key, .. }) if key == "view"
        ));
    }

    #[test]
    fn with_default_and_array() {
        let p = params(json!({"xs": [1, 2.5]}));
        let f = Fields::new(&p);
        assert_eq!(f.field("xs", required(array(number()))), Ok(vec![1.0, 2.5]));
        assert_eq!(f.field("n", with_default(number(), 3.0)), Ok(3.0));
        assert!(f.field("xs", required(array(string()))).is_err());
    }

    #[test]
    fn custom_parser() {
        let even = custom(|v: &Unknown| v.as_i64().filter(|n| n % 2 == 0));
        let p = params(json!({"a": 4, "b": 3}));
        let f = Fields::new(&p);
        assert_eq!(f.field("a", required(even.clone())), Ok(4));
        assert!(matches!(
            f.field("b", required(even)),
            Err(ParamsError::Invalid { .. })
        ));
    }

    #[test]
    fn list_options_accept_both_forms() {
        let array_form = json!([{"text": "one", "value": 1}, {"text": "two", "value": 2}]);
        let object_form = json!({"one": 1, "two": 2});
        let parser = list_options(number());
        let expected = vec![ListItem::new("one", 1.0), ListItem::new("two", 2.0)];
        assert_eq!(parser.parse_value(&array_form), Ok(expected.clone()));
        assert_eq!(parser.parse_value(&object_form), Ok(expected));
        assert!(parser.parse_value(&json!([{"text": "x"}])).is_err());
        assert!(parser.parse_value(&json!(5)).is_err());
    }

    #[test]
    fn find_helpers_ignore_other_types() {
        let p = params(json!({"s": "x", "n": 2, "b": true}));
        assert_eq!(find_string_param(&p, "s"), Some("x".into()));
        assert_eq!(find_string_param(&p, "n"), None);
        assert_eq!(find_number_param(&p, "n"), Some(2.0));
        assert_eq!(find_bool_param(&p, "b"), Some(true));
        assert_eq!(find_bool_param(&p, "missing"), None);
    }

    #[test]
    fn error_messages() {
        let err = ParamsError::Type {
            key: "min".into(),
            expected: "a number",
        };
        assert_eq!(err.to_string(), "param `min` must be a number");
    }
}
