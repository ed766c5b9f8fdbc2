#![forbid(unsafe_code)]

use std::fmt;
use std::rc::Rc;

/// Turns a value into display text.
///
/// Two formatters are equal when they share the same function, so a
/// formatter can live in a [`value_map!`](crate::value_map) field.
pub struct Formatter<T> {
    format: Rc<dyn Fn(&T) -> String>,
}

impl<T> Formatter<T> {
    pub fn new(format: impl Fn(&T) -> String + 'static) -> Self {
        Self {
            format: Rc::new(format),
        }
    }

    #[must_use]
    pub fn format(&self, value: &T) -> String {
        (self.format)(value)
    }
}

impl<T> Clone for Formatter<T> {
    fn clone(&self) -> Self {
        Self {
            format: Rc::clone(&self.format),
        }
    }
}

impl<T> PartialEq for Formatter<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.format, &other.format)
    }
}

impl<T> fmt::Debug for Formatter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Formatter")
    }
}

/// Fixed-precision number formatter.
#[must_use]
pub fn create_number_formatter(digits: usize) -> Formatter<f64> {
    Formatter::new(move |v: &f64| format!("{v:.digits$}"))
}

/// Identity formatter for strings.
#[must_use]
pub fn format_string() -> Formatter<String> {
    Formatter::new(String::clone)
}
