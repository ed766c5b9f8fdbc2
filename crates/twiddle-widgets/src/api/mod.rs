#![forbid(unsafe_code)]

//! Public handles for blades.
//!
//! A handle wraps a blade controller and exposes what hosts may do with it.
//! Handles are rebuilt on demand from the controller through
//! [`ApiContext::api_for`], so any two handles for the same controller are
//! equal and every event names its source with the same `target` at each
//! level of the tree.
//!
//! | Blade | Handle |
//! |-------|--------|
//! | Input binding | [`InputBindingApi`] (with slider/list extensions) |
//! | Monitor binding | [`MonitorBindingApi`] |
//! | Folder | [`FolderApi`] |
//! | Button | [`ButtonApi`] |
//! | Separator | [`SeparatorApi`] |
//! | Custom plugin blade | [`GenericBladeApi`] or the plugin's own handle |
//!
//! # Failure Modes
//!
//! | Failure | Result |
//! |---------|--------|
//! | No blade plugin recognizes a controller | [`PluginError::ApiMismatch`] |
//! | Handle used after dispose | Reads keep working; bindings refuse writes |

mod blade;
mod button;
mod folder;
mod input;
mod monitor;

pub use blade::{GenericBladeApi, SeparatorApi};
pub use button::ButtonApi;
pub use folder::FolderApi;
pub use input::{InputBindingApi, ListInputBindingApi, SliderInputBindingApi};
pub use monitor::MonitorBindingApi;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use twiddle_dom::Element;
use twiddle_runtime::Unknown;

use crate::blade::{BladeController, BladeKind, BladeState};
use crate::error::PluginError;
use crate::plugin::{PluginContext, PluginPool};

/// API extension an input plugin offers for its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputApiKind {
    Slider,
    List,
}

/// Operations every blade handle supports.
pub trait BladeHandle {
    fn controller(&self) -> &Rc<dyn BladeController>;

    fn element(&self) -> &Element {
        self.controller().element()
    }

    fn is_disabled(&self) -> bool {
        self.controller().view_props().is_disabled()
    }

    fn set_disabled(&self, disabled: bool) {
        self.controller().view_props().set_disabled(disabled);
    }

    fn is_hidden(&self) -> bool {
        self.controller().view_props().is_hidden()
    }

    fn set_hidden(&self, hidden: bool) {
        self.controller().view_props().set_hidden(hidden);
    }

    /// Dispose the blade and everything below it. Idempotent.
    fn dispose(&self) {
        self.controller().dispose();
    }

    fn is_disposed(&self) -> bool {
        self.controller().view_props().is_disposed()
    }

    fn export_state(&self) -> BladeState {
        self.controller().export_state()
    }

    /// Returns `false` and changes nothing when `state` does not fit.
    fn import_state(&self, state: &BladeState) -> bool {
        self.controller().import_state(state)
    }
}

/// `Clone`, equality by controller identity, `Debug` and [`BladeHandle`]
/// for a handle with a `controller` field.
macro_rules! blade_handle {
    ($ty:ident) => {
        impl $crate::api::BladeHandle for $ty {
            fn controller(&self) -> &::std::rc::Rc<dyn $crate::blade::BladeController> {
                &self.controller
            }
        }

        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                ::std::rc::Rc::ptr_eq(&self.controller, &other.controller)
            }
        }

        impl ::std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("kind", &self.controller.kind())
                    .finish_non_exhaustive()
            }
        }
    };
}
pub(crate) use blade_handle;

/// A handle of any kind.
#[derive(Clone, PartialEq)]
pub enum BladeApi {
    Input(InputBindingApi),
    Monitor(MonitorBindingApi),
    Folder(FolderApi),
    Button(ButtonApi),
    Separator(SeparatorApi),
    Blade(GenericBladeApi),
}

impl BladeApi {
    #[must_use]
    pub fn handle(&self) -> &dyn BladeHandle {
        match self {
            Self::Input(api) => api,
            Self::Monitor(api) => api,
            Self::Folder(api) => api,
            Self::Button(api) => api,
            Self::Separator(api) => api,
            Self::Blade(api) => api,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &Rc<dyn BladeController> {
        self.handle().controller()
    }

    #[must_use]
    pub fn as_input(&self) -> Option<&InputBindingApi> {
        match self {
            Self::Input(api) => Some(api),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_monitor(&self) -> Option<&MonitorBindingApi> {
        match self {
            Self::Monitor(api) => Some(api),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_folder(&self) -> Option<&FolderApi> {
        match self {
            Self::Folder(api) => Some(api),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_button(&self) -> Option<&ButtonApi> {
        match self {
            Self::Button(api) => Some(api),
            _ => None,
        }
    }
}

impl fmt::Debug for BladeApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(api) => fmt::Debug::fmt(api, f),
            Self::Monitor(api) => fmt::Debug::fmt(api, f),
            Self::Folder(api) => fmt::Debug::fmt(api, f),
            Self::Button(api) => fmt::Debug::fmt(api, f),
            Self::Separator(api) => fmt::Debug::fmt(api, f),
            Self::Blade(api) => fmt::Debug::fmt(api, f),
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// An input's value changed.
#[derive(Debug, Clone, PartialEq)]
pub struct TpChangeEvent {
    /// The input that changed, whichever folder reports it.
    pub target: BladeApi,
    pub preset_key: String,
    /// The property value after the write.
    pub value: Unknown,
    /// `false` for intermediate values such as slider drags.
    pub last: bool,
}

/// A monitor read a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct TpUpdateEvent {
    pub target: BladeApi,
    pub preset_key: String,
    pub value: Unknown,
}

/// A folder opened or closed.
#[derive(Debug, Clone, PartialEq)]
pub struct TpFoldEvent {
    pub target: BladeApi,
    pub expanded: bool,
}

// ---------------------------------------------------------------------------
// ApiContext
// ---------------------------------------------------------------------------

/// What handles need to build children and wrap controllers: the pane's
/// plugin pool and plugin environment.
#[derive(Clone)]
pub struct ApiContext {
    pool: Rc<RefCell<PluginPool>>,
    plugin: PluginContext,
}

impl ApiContext {
    #[must_use]
    pub fn new(pool: Rc<RefCell<PluginPool>>, plugin: PluginContext) -> Self {
        Self { pool, plugin }
    }

    /// A snapshot of the pool. Plugin code runs against the snapshot, so it
    /// may register plugins without conflicting borrows.
    #[must_use]
    pub fn pool(&self) -> PluginPool {
        self.pool.borrow().clone()
    }

    #[must_use]
    pub fn plugin_context(&self) -> &PluginContext {
        &self.plugin
    }

    /// The public handle for `controller`.
    pub fn api_for(&self, controller: &Rc<dyn BladeController>) -> Result<BladeApi, PluginError> {
        match controller.kind() {
            BladeKind::InputBinding(_) => {
                let kind = self.pool().input_api_kind(controller.as_ref());
                Ok(BladeApi::Input(InputBindingApi::new(Rc::clone(controller), kind)))
            }
            BladeKind::MonitorBinding(_) => Ok(BladeApi::Monitor(MonitorBindingApi::new(
                Rc::clone(controller),
            ))),
            _ => self.pool().blade_api(controller, self),
        }
    }
}

impl fmt::Debug for ApiContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiContext")
            .field("pool", &self.pool.borrow())
            .finish_non_exhaustive()
    }
}
