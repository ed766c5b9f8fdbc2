//! Errors raised by binding targets and bindings.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing property | Key absent on the host object | `read()` returns `Err` |
//! | Not an object | `write_property` on a scalar property | `Err`, target unchanged |
//! | Rejected write | A `Bindable` refused the value | `Err`, propagated or logged |
//! | Disposed binding | `read()`/`set()` after `dispose()` | `Err(Disposed)` |

use thiserror::Error;

/// Errors from reading or writing a host property.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    /// The property does not exist on the target object.
    #[error("property `{key}` not found")]
    MissingProperty { key: String },
    /// A field write was attempted on a property that is not an object.
    #[error("property `{key}` is not an object")]
    NotAnObject { key: String },
    /// The target object refused the write.
    #[error("property `{key}` rejected the write: {reason}")]
    Rejected { key: String, reason: String },
}

/// Errors from driving a binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error(transparent)]
    Target(#[from] TargetError),
    /// The binding was disposed and no longer reads or writes.
    #[error("binding has been disposed")]
    Disposed,
}
