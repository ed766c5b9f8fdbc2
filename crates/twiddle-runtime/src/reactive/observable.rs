#![forbid(unsafe_code)]

//! Shared observable value cell.
//!
//! # Invariants
//!
//! 1. The configured constraint runs before the equality check, so a write
//!    that constrains to the current value is suppressed.
//! 2. `version` increments exactly once per emitted change and never on a
//!    suppressed write.
//! 3. Subscribers see the new value: `get()` inside a callback returns the
//!    value carried by the event.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Subscriber panics | User callback | Propagates out of `set()`; the new value is already stored |
//! | Subscriber writes the same cell | Feedback loop | Nested synchronous dispatch; terminates once values compare equal |

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::emitter::{Emitter, Subscription};
use crate::constraint::Constraint;

type EqualsFn<T> = Rc<dyn Fn(&T, &T) -> bool>;

/// Options carried with a value change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeOptions {
    /// Emit even when the new value equals the current one.
    pub force_emit: bool,
    /// `false` for intermediate values, e.g. while a slider is dragged.
    pub last: bool,
}

impl Default for ChangeOptions {
    fn default() -> Self {
        Self {
            force_emit: false,
            last: true,
        }
    }
}

impl ChangeOptions {
    /// Options for an intermediate value.
    #[must_use]
    pub fn intermediate() -> Self {
        Self {
            last: false,
            ..Self::default()
        }
    }

    /// Options that bypass the equality check.
    #[must_use]
    pub fn forced() -> Self {
        Self {
            force_emit: true,
            ..Self::default()
        }
    }
}

/// A single emitted change.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChangeEvent<T> {
    /// The value now stored.
    pub raw_value: T,
    /// The value that was replaced.
    pub previous: T,
    pub options: ChangeOptions,
}

struct Inner<T> {
    value: T,
    version: u64,
    equals: EqualsFn<T>,
    constraint: Option<Rc<dyn Constraint<T>>>,
}

/// A shared, mutable value with change notification.
///
/// Cloning yields another handle to the same cell.
///
/// ```
/// use twiddle_runtime::Observable;
///
/// let speed = Observable::new(1.0);
/// let seen = std::rc::Rc::new(std::cell::Cell::new(0.0));
/// let s = seen.clone();
/// let _sub = speed.subscribe(move |v| s.set(*v));
/// speed.set(2.5);
/// assert_eq!(seen.get(), 2.5);
/// ```
pub struct Observable<T> {
    inner: Rc<RefCell<Inner<T>>>,
    changes: Emitter<ValueChangeEvent<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            changes: self.changes.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create an observable compared with `PartialEq`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::with_equals(value, |a: &T, b: &T| a == b)
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// Create an observable with a custom equality function.
    #[must_use]
    pub fn with_equals(value: T, equals: impl Fn(&T, &T) -> bool + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                version: 0,
                equals: Rc::new(equals),
                constraint: None,
            })),
            changes: Emitter::new(),
        }
    }

    /// Install a constraint and return the observable.
    ///
    /// The current value is not re-constrained; only later writes are.
    #[must_use]
    pub fn with_constraint(self, constraint: Rc<dyn Constraint<T>>) -> Self {
        self.set_constraint(Some(constraint));
        self
    }

    /// Replace the constraint applied by the setter.
    pub fn set_constraint(&self, constraint: Option<Rc<dyn Constraint<T>>>) {
        self.inner.borrow_mut().constraint = constraint;
    }

    /// The constraint applied by the setter, if any.
    #[must_use]
    pub fn constraint(&self) -> Option<Rc<dyn Constraint<T>>> {
        self.inner.borrow().constraint.clone()
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value for the duration of `f`.
    ///
    /// `f` must not write to this observable.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Set the value with default options.
    pub fn set(&self, value: T) {
        self.set_with_options(value, ChangeOptions::default());
    }

    /// Set the value, constraining it first and emitting when it changed (or
    /// when `options.force_emit` is set).
    ///
    /// Returns whether a change was emitted.
    pub fn set_with_options(&self, value: T, options: ChangeOptions) -> bool {
        let constraint = self.inner.borrow().constraint.clone();
        let value = match constraint {
            Some(c) => c.constrain(value),
            None => value,
        };

        let event = {
            let mut inner = self.inner.borrow_mut();
            if !options.force_emit && (inner.equals)(&inner.value, &value) {
                return false;
            }
            let previous = std::mem::replace(&mut inner.value, value);
            inner.version += 1;
            ValueChangeEvent {
                raw_value: inner.value.clone(),
                previous,
                options,
            }
        };
        self.changes.emit(&event);
        true
    }

    /// Modify a copy of the value in place and set it.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut value = self.get();
        f(&mut value);
        self.set(value);
    }

    /// Subscribe to new values.
    #[must_use = "dropping the subscription unregisters the callback"]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.changes.on(move |event: &ValueChangeEvent<T>| callback(&event.raw_value))
    }

    /// Subscribe to full change events, including the previous value and
    /// change options.
    #[must_use = "dropping the subscription unregisters the callback"]
    pub fn subscribe_change(
        &self,
        callback: impl Fn(&ValueChangeEvent<T>) + 'static,
    ) -> Subscription {
        self.changes.on(callback)
    }

    /// Number of emitted changes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.changes.handler_count()
    }

    /// Compare two values with this observable's equality.
    #[must_use]
    pub fn equals(&self, a: &T, b: &T) -> bool {
        let equals = Rc::clone(&self.inner.borrow().equals);
        equals(a, b)
    }

    /// Whether both handles refer to the same cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
