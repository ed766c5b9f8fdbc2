#![forbid(unsafe_code)]

//! Untyped property values and the default bindable object.
//!
//! Host objects are modelled as JSON-like property bags. An [`Unknown`] is the
//! raw value read from (or written to) a property before a binding converts it
//! into a typed value.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::Map;

use crate::binding::Bindable;
use crate::error::TargetError;

/// A raw, untyped property value.
pub type Unknown = serde_json::Value;

/// User supplied binding or blade params.
pub type Params = Map<String, Unknown>;

/// A shared, mutable property bag that bindings can read from and write to.
///
/// Cloning an `Object` yields another handle to the same properties, so the
/// host can keep one handle while a binding holds another.
///
/// ```
/// use twiddle_runtime::Object;
/// use serde_json::json;
///
/// let obj = Object::from_json(json!({"speed": 1.5})).unwrap();
/// let handle = obj.clone();
/// handle.set("speed", 3.0);
/// assert_eq!(obj.get("speed"), Some(json!(3.0)));
/// ```
#[derive(Clone, Default)]
pub struct Object {
    props: Rc<RefCell<Map<String, Unknown>>>,
}

impl Object {
    /// Create an empty object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an object from a JSON object value. Returns `None` for any other
    /// JSON value.
    #[must_use]
    pub fn from_json(value: Unknown) -> Option<Self> {
        match value {
            Unknown::Object(map) => Some(Self {
                props: Rc::new(RefCell::new(map)),
            }),
            _ => None,
        }
    }

    /// Current value of a property.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Unknown> {
        self.props.borrow().get(key).cloned()
    }

    /// Set a property, inserting it when absent.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Unknown>) {
        self.props.borrow_mut().insert(key.into(), value.into());
    }

    /// Whether the property exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.props.borrow().contains_key(key)
    }

    /// Snapshot of all properties as a JSON value.
    #[must_use]
    pub fn to_json(&self) -> Unknown {
        Unknown::Object(self.props.borrow().clone())
    }

    /// Whether both handles refer to the same property bag.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.props, &other.props)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Object").field(&self.props.borrow()).finish()
    }
}

impl Bindable for Object {
    fn read_property(&self, key: &str) -> Result<Unknown, TargetError> {
        self.get(key).ok_or_else(|| TargetError::MissingProperty {
            key: key.to_owned(),
        })
    }

    fn write_property(&self, key: &str, value: Unknown) -> Result<(), TargetError> {
        self.set(key, value);
        Ok(())
    }
}
