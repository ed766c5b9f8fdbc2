#![forbid(unsafe_code)]

//! Bindings between host properties and observable values.
//!
//! A [`Binding`] connects a [`BindingTarget`] (one property of a host object)
//! to an [`Observable`](crate::Observable):
//!
//! ```text
//!   host property ──read──▶ reader ──▶ value.set (constrained, no write-back)
//!        ▲                                  │
//!        └──────────── writer ◀── UI/API value.set (constrained)
//! ```
//!
//! Reads are driven by a [`Ticker`]: manually (`refresh`) or on an interval.
//! A [`MonitorBinding`] only reads, pushing each value into a history buffer.
//!
//! # Invariants
//!
//! 1. A tick never writes to the target.
//! 2. Every write from the UI or API passes the constraint before the writer
//!    sees it.
//! 3. `dispose()` stops the ticker and drops every internal subscription;
//!    calling it twice is a no-op.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Target read fails | Property removed from host | `read()` returns `Err`; tick-driven reads log and store it |
//! | Writer fails | `Bindable` rejected the value | `set()` returns `Err`; UI-driven writes log and store it |
//! | Use after dispose | Stale handle | `Err(BindingError::Disposed)` |

mod input;
mod monitor;
mod target;
mod ticker;

pub use input::{Binding, BindingConfig, Reader, Writer};
pub use monitor::{MonitorBinding, MonitorBindingConfig};
pub use target::{Bindable, BindingTarget};
pub use ticker::{IntervalTicker, ManualTicker, TickScheduler, Ticker, create_ticker};

use std::cell::Cell;
use std::rc::Rc;

use crate::error::BindingError;
use crate::reactive::{ChangeOptions, Subscription};
use crate::unknown::Unknown;

/// Type-erased view of an input or monitor binding.
pub trait BindingHandle {
    fn target(&self) -> &BindingTarget;

    fn ticker(&self) -> Rc<dyn Ticker>;

    /// Read the target into the bound value. Returns whether the value
    /// changed.
    fn read(&self) -> Result<bool, BindingError>;

    /// Current raw value of the target, if readable.
    fn target_value(&self) -> Option<Unknown> {
        self.target().read().ok()
    }

    /// Called after every change of the bound value.
    fn on_change(&self, callback: Box<dyn Fn(ChangeOptions)>) -> Subscription;

    fn dispose(&self);

    fn is_disposed(&self) -> bool;
}

/// Sets a flag for the guard's lifetime, restoring the previous value on
/// drop.
pub(crate) struct FlagGuard<'a> {
    flag: &'a Cell<bool>,
    previous: bool,
}

impl<'a> FlagGuard<'a> {
    pub(crate) fn set(flag: &'a Cell<bool>) -> Self {
        let previous = flag.replace(true);
        Self { flag, previous }
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}
