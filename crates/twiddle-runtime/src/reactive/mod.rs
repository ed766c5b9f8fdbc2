#![forbid(unsafe_code)]

//! Reactive primitives for Twiddle.
//!
//! - [`Emitter`]: ordered, synchronous event fan-out.
//! - [`Observable`]: a shared value cell with equality-gated change
//!   notification and an optional write constraint.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`ValueMap`] / [`value_map!`](crate::value_map): fixed-shape records of
//!   observables, used as reactive property bags.
//! - [`ViewProps`]: `disabled` / `hidden` / `disposed` presentation flags with
//!   parent-to-child propagation of `disabled`.
//! - [`BindingScope`]: collects subscriptions owned by a view or controller.
//! - [`BufferedValue`]: fixed-size history of monitored values.
//!
//! # Architecture
//!
//! Everything here is single-threaded: shared state lives in `Rc<RefCell<..>>`
//! and subscribers are stored as `Weak` callbacks, pruned lazily during
//! notification. There is no async dispatch; a `set()` runs every subscriber
//! before it returns.
//!
//! # Invariants
//!
//! 1. Subscribers are notified in registration order.
//! 2. Setting a value equal to the current one (after constraining) is a
//!    no-op unless `force_emit` is requested.
//! 3. Version increments exactly once per emitted change.
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.

pub mod buffered;
pub mod emitter;
pub mod observable;
pub mod scope;
pub mod value_map;
pub mod view_props;

pub use buffered::{Buffer, BufferedValue, create_buffered_value, create_pushed_buffer};
pub use emitter::{Emitter, Subscription};
pub use observable::{ChangeOptions, Observable, ValueChangeEvent};
pub use scope::{BindingScope, bind_value};
pub use value_map::ValueMap;
pub use view_props::{ViewProps, ViewPropsMap, ViewPropsObject};
