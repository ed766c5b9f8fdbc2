#![forbid(unsafe_code)]

use std::fmt;
use std::rc::Rc;

use crate::error::TargetError;
use crate::unknown::{Object, Unknown};

/// A host object whose properties can be bound.
pub trait Bindable {
    fn read_property(&self, key: &str) -> Result<Unknown, TargetError>;

    fn write_property(&self, key: &str, value: Unknown) -> Result<(), TargetError>;
}

/// One property of a host object.
#[derive(Clone)]
pub struct BindingTarget {
    object: Rc<dyn Bindable>,
    key: String,
    preset_key: String,
    writable: bool,
}

impl BindingTarget {
    /// A writable target. The preset key defaults to `key`.
    pub fn new(object: Rc<dyn Bindable>, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            object,
            preset_key: key.clone(),
            key,
            writable: true,
        }
    }

    /// A writable target on a shared [`Object`].
    pub fn for_object(object: &Object, key: impl Into<String>) -> Self {
        Self::new(Rc::new(object.clone()), key)
    }

    /// Make the target read-only; writes become no-ops.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    /// Key reported in change events and exported state.
    #[must_use]
    pub fn with_preset_key(mut self, preset_key: impl Into<String>) -> Self {
        self.preset_key = preset_key.into();
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn preset_key(&self) -> &str {
        &self.preset_key
    }

    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    #[must_use]
    pub fn object(&self) -> &Rc<dyn Bindable> {
        &self.object
    }

    pub fn read(&self) -> Result<Unknown, TargetError> {
        self.object.read_property(&self.key)
    }

    pub fn write(&self, value: Unknown) -> Result<(), TargetError> {
        if !self.writable {
            return Ok(());
        }
        self.object.write_property(&self.key, value)
    }

    /// Write one field of an object-valued property.
    pub fn write_property(&self, sub_key: &str, value: Unknown) -> Result<(), TargetError> {
        if !self.writable {
            return Ok(());
        }
        let mut current = self.read()?;
        let fields = current
            .as_object_mut()
            .ok_or_else(|| TargetError::NotAnObject {
                key: self.key.clone(),
            })?;
        fields.insert(sub_key.to_owned(), value);
        self.object.write_property(&self.key, current)
    }
}

impl fmt::Debug for BindingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingTarget")
            .field("key", &self.key)
            .field("preset_key", &self.preset_key)
            .field("writable", &self.writable)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn read_and_write() {
        let obj = Object::from_json(json!({"foo": 1})).unwrap();
        let target = BindingTarget::for_object(&obj, "foo");
        assert_eq!(target.read(), Ok(json!(1)));
        target.write(json!(2)).unwrap();
        assert_eq!(obj.get("foo"), Some(json!(2)));
        assert_eq!(target.preset_key(), "foo");
    }

    #[test]
    fn read_only_target_ignores_writes() {
        let obj = Object::from_json(json!({"foo": 1})).unwrap();
        let target = BindingTarget::for_object(&obj, "foo").read_only();
        target.write(json!(2)).unwrap();
        assert_eq!(obj.get("foo"), Some(json!(1)));
        assert!(!target.is_writable());
    }

    #[test]
    fn write_property_updates_one_field() {
        let obj = Object::from_json(json!({"color": {"r": 0, "g": 0, "b": 0}})).unwrap();
        let target = BindingTarget::for_object(&obj, "color");
        target.write_property("g", json!(255)).unwrap();
        assert_eq!(obj.get("color"), Some(json!({"r": 0, "g": 255, "b": 0})));
    }

    #[test]
    fn write_property_on_scalar_fails() {
        let obj = Object::from_json(json!({"n": 1})).unwrap();
        let target = BindingTarget::for_object(&obj, "n");
        assert_eq!(
            target.write_property("x", json!(0)),
            Err(TargetError::NotAnObject { key: "n".into() })
        );
    }

    #[test]
    fn preset_key_override() {
        let obj = Object::new();
        let target = BindingTarget::for_object(&obj, "foo").with_preset_key("bar");
        assert_eq!(target.key(), "foo");
        assert_eq!(target.preset_key(), "bar");
    }
}
