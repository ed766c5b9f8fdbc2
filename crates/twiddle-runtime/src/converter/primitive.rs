#![forbid(unsafe_code)]

use crate::binding::BindingTarget;
use crate::error::TargetError;
use crate::unknown::Unknown;

use super::number::number_to_unknown;

/// Text for a raw value. Strings are taken as-is; numbers print without a
/// trailing `.0`; other values print as JSON.
#[must_use]
pub fn string_from_unknown(value: &Unknown) -> String {
    match value {
        Unknown::String(s) => s.clone(),
        Unknown::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
            Some(f) => f.to_string(),
            None => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Truthiness of a raw value. The string `"false"` reads as `false`.
#[must_use]
pub fn bool_from_unknown(value: &Unknown) -> bool {
    match value {
        Unknown::Null => false,
        Unknown::Bool(b) => *b,
        Unknown::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Unknown::String(s) => !s.is_empty() && s != "false",
        Unknown::Array(_) | Unknown::Object(_) => true,
    }
}

/// Write a primitive value to the bound property.
pub fn write_primitive<T>(target: &BindingTarget, value: &T) -> Result<(), TargetError>
where
    T: Clone + Into<Unknown>,
{
    target.write(value.clone().into())
}

/// Write a number to the bound property.
pub fn write_number(target: &BindingTarget, value: &f64) -> Result<(), TargetError> {
    target.write(number_to_unknown(*value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unknown::Object;
    use serde_json::json;
    use std::rc::Rc;

    #[test]
    fn strings_from_unknown() {
        assert_eq!(string_from_unknown(&json!("abc")), "abc");
        assert_eq!(string_from_unknown(&json!(3)), "3");
        assert_eq!(string_from_unknown(&json!(3.0)), "3");
        assert_eq!(string_from_unknown(&json!(1.5)), "1.5");
        assert_eq!(string_from_unknown(&json!(true)), "true");
        assert_eq!(string_from_unknown(&json!(null)), "null");
    }

    #[test]
    fn truthiness() {
        assert!(bool_from_unknown(&json!(true)));
        assert!(bool_from_unknown(&json!(1)));
        assert!(bool_from_unknown(&json!("yes")));
        assert!(!bool_from_unknown(&json!("false")));
        assert!(!bool_from_unknown(&json!("")));
        assert!(!bool_from_unknown(&json!(0)));
        assert!(!bool_from_unknown(&json!(null)));
    }

    #[test]
    fn writers_store_values() {
        let obj = Object::new();
        let target = BindingTarget::new(Rc::new(obj.clone()), "foo");
        write_number(&target, &2.0).unwrap();
        assert_eq!(obj.get("foo"), Some(json!(2)));
        write_primitive(&target, &"bar".to_string()).unwrap();
        assert_eq!(obj.get("foo"), Some(json!("bar")));
    }
}
