#![forbid(unsafe_code)]

//! Minimal in-memory document model.
//!
//! Views build their element trees against this model instead of a browser
//! DOM. It tracks exactly what the binding layer touches: classes, attributes,
//! inline style, text, form state (`value`, `checked`, `disabled`,
//! `tabindex`), children and event listeners. [`Element::outer_html`] dumps a
//! tree deterministically for assertions.
//!
//! # Invariants
//!
//! - An element has at most one parent; appending it elsewhere moves it.
//! - Listeners run in registration order; a listener removed during dispatch
//!   still runs for the event in flight.
//! - Clicking a disabled element dispatches nothing.

mod document;
mod element;
mod event;

pub use document::Document;
pub use element::{Element, ListenerId, WeakElement};
pub use event::{DomEvent, EventKind};
