#![forbid(unsafe_code)]

//! Test harness for Twiddle.
//!
//! Helpers drive panes the way a user would: typing into text fields,
//! toggling checkboxes, dragging sliders, clicking buttons. Every helper
//! goes through [`twiddle_dom::Element::dispatch_event`], so the same
//! listeners a host would trigger run in tests.
//!
//! - [`fixtures`]: params and objects from JSON literals, event recorders.
//! - [`input`]: simulated user input.
//! - [`snapshot`]: HTML snapshots of element trees.
//! - [`strategies`]: proptest strategies for binding params.
//!
//! Run `BLESS=1 cargo test --package twiddle-harness` to create or update
//! snapshots.

pub mod fixtures;
pub mod input;
pub mod snapshot;
pub mod strategies;

pub use fixtures::{Recorder, object, pane, params};
pub use input::{
    click, drag_slider, find, press_key, select_option, set_checked, type_text,
};
pub use snapshot::{html_digest, normalize_html};
