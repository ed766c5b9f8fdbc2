#![forbid(unsafe_code)]

//! Views, controllers, plugins and the pane API for Twiddle.
//!
//! A [`Pane`] is a tree of blades. Binding rows are built by plugins: the
//! [`PluginPool`] hands a property value and its params to each plugin in
//! turn, and the first one that accepts them builds a binding, a value
//! controller and a labeled row. Public handles in [`api`] wrap the row
//! controllers and relay their change, update and fold events up the tree.
//!
//! # Feature Flags
//!
//! | Feature | Effect |
//! |---------|--------|
//! | `tracing` | `debug_span!`s around pane refresh and controller creation |
//! | `serde` | Serde support for [`twiddle_style::Color`] |

pub mod api;
pub mod blade;
pub mod constants;
pub mod controller;
pub mod error;
pub mod pane;
pub mod plugin;
pub mod reactive;

pub use api::{
    ApiContext, BladeApi, BladeHandle, ButtonApi, FolderApi, GenericBladeApi, InputApiKind,
    InputBindingApi, ListInputBindingApi, MonitorBindingApi, SeparatorApi, SliderInputBindingApi,
    TpChangeEvent, TpFoldEvent, TpUpdateEvent,
};
pub use blade::{BladeController, BladeKind, BladeState};
pub use error::{PaneError, PluginError};
pub use pane::{Pane, PaneConfig};
pub use plugin::{
    Acceptance, BladePlugin, CommonParams, InputBindingPlugin, MonitorBindingPlugin, Plugin,
    PluginContext, PluginPool,
};
