#![forbid(unsafe_code)]

//! Reactive binding core for Twiddle.
//!
//! This crate knows nothing about views or documents. It provides the pieces a
//! control panel needs to keep widget state and host-owned properties in sync:
//!
//! - [`reactive`]: observable values, event emitters, fixed-shape value maps,
//!   view props and subscription scopes.
//! - [`constraint`]: composable value transforms (step, range, list).
//! - [`binding`]: property targets, tickers and the read/write binding loop.
//! - [`params`]: micro-parser combinators for user supplied binding params.
//! - [`converter`]: conversions between raw property values and typed values.

pub mod binding;
pub mod constraint;
pub mod converter;
pub mod error;
pub mod params;
pub mod reactive;
pub mod unknown;

pub use binding::{
    Bindable, Binding, BindingConfig, BindingHandle, BindingTarget, IntervalTicker, ManualTicker,
    MonitorBinding, MonitorBindingConfig, Reader, TickScheduler, Ticker, Writer, create_ticker,
};
pub use constraint::{
    CompositeConstraint, Constraint, ConstraintKind, DefiniteRangeConstraint, ListConstraint,
    ListItem, RangeConstraint, StepConstraint, find_constraint,
};
pub use error::{BindingError, TargetError};
pub use params::ParamsError;
pub use reactive::{
    BindingScope, BufferedValue, ChangeOptions, Emitter, Observable, Subscription,
    ValueChangeEvent, ValueMap, ViewProps,
};
pub use unknown::{Object, Params, Unknown};
