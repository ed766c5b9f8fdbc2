#![forbid(unsafe_code)]

//! Plugins: data records that turn a property or a params map into a blade.
//!
//! Three kinds exist. Input plugins build an editable row for a property,
//! monitor plugins a read-only row, blade plugins a row from params alone.
//! Each plugin decides with `accept` whether it handles a value; the
//! [`PluginPool`] asks plugins in order and the first acceptance wins.
//!
//! # Resolution order
//!
//! Custom plugins (added with [`PluginPool::register`]) are tried before
//! the defaults, each tier in registration order. Default order:
//!
//! | Kind | Order (plugin ids) |
//! |------|-------|
//! | Input | `input-bool`, `input-color-number`, `input-color-string`, `input-color-object`, `input-number`, `input-string` |
//! | Monitor | `monitor-bool`, `monitor-number`, `monitor-string` |
//! | Blade | `button`, `folder`, `separator` |
//!
//! Ids are unique across all three kinds.
//!
//! # Failure Modes
//!
//! | Failure | Result |
//! |---------|--------|
//! | Params do not fit a plugin | That plugin rejects; the next one is asked |
//! | `interval` or `bufferSize` out of bounds | [`PluginError::Params`](crate::PluginError::Params) before any plugin is asked |
//! | No plugin accepts | [`PluginError::NoMatchingPlugin`](crate::PluginError::NoMatchingPlugin) |
//! | Two plugins share an id | [`PluginError::DuplicateId`](crate::PluginError::DuplicateId) at registration |

mod blade;
pub mod defaults;
mod input;
mod monitor;
mod pool;

pub use blade::{BladeControllerArgs, BladePlugin, BladePluginEntry};
pub use input::{
    BindingArgs, InputBindingHooks, InputBindingPlugin, InputControllerArgs, InputPluginEntry,
};
pub use monitor::{MonitorBindingHooks, MonitorBindingPlugin, MonitorControllerArgs, MonitorPluginEntry};
pub use pool::{InputResolution, MonitorResolution, PluginPool};

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use twiddle_dom::Document;
use twiddle_runtime::params::{Fields, boolean, number, optional, parse_record, string, with_default};
use twiddle_runtime::reactive::ViewPropsObject;
use twiddle_runtime::{Params, ParamsError, TickScheduler, Unknown, ViewProps};

use crate::constants::{MAX_TICK_INTERVAL, MONITOR_DEFAULT_INTERVAL, MONITOR_MAX_BUFFER_SIZE};

/// Outcome of a plugin's `accept`.
#[derive(Debug, Clone, PartialEq)]
pub enum Acceptance<P> {
    Accepted {
        /// The value the binding starts from.
        initial_value: Unknown,
        params: P,
    },
    Rejected,
}

impl<P> Acceptance<P> {
    /// Accept a params-only blade.
    #[must_use]
    pub fn params(params: P) -> Self {
        Self::Accepted {
            initial_value: Unknown::Null,
            params,
        }
    }

    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Shared environment handed to plugins when they build controllers.
#[derive(Debug, Clone)]
pub struct PluginContext {
    pub document: Document,
    /// Interval tickers of new bindings register here.
    pub scheduler: TickScheduler,
    pub monitor_interval: Duration,
    /// `None` leaves inputs on manual tickers.
    pub input_interval: Option<Duration>,
    /// Overrides every monitor's default history size.
    pub buffer_size: Option<usize>,
}

impl Default for PluginContext {
    fn default() -> Self {
        Self {
            document: Document::new(),
            scheduler: TickScheduler::new(),
            monitor_interval: MONITOR_DEFAULT_INTERVAL,
            input_interval: None,
            buffer_size: None,
        }
    }
}

/// A registered plugin of any kind.
#[derive(Clone)]
pub enum Plugin {
    Input(Rc<dyn InputPluginEntry>),
    Monitor(Rc<dyn MonitorPluginEntry>),
    Blade(Rc<dyn BladePluginEntry>),
}

impl Plugin {
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Self::Input(p) => p.id(),
            Self::Monitor(p) => p.id(),
            Self::Blade(p) => p.id(),
        }
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Input(_) => "Input",
            Self::Monitor(_) => "Monitor",
            Self::Blade(_) => "Blade",
        };
        f.debug_tuple(kind).field(&self.id()).finish()
    }
}

// ---------------------------------------------------------------------------
// Params every row understands
// ---------------------------------------------------------------------------

/// `label`, `disabled`, `hidden`, `interval` and `bufferSize`.
/// Type-erased plugin entries receive these already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonParams {
    pub label: Option<String>,
    pub disabled: bool,
    pub hidden: bool,
    pub interval: Option<f64>,
    pub buffer_size: Option<f64>,
}

impl CommonParams {
    /// Binding rows are labelled with their key unless `label` says otherwise.
    /// An `interval` above [`MAX_TICK_INTERVAL`] or a `bufferSize` above
    /// [`MONITOR_MAX_BUFFER_SIZE`] is invalid.
    pub fn parse(params: &Params, default_label: Option<&str>) -> Result<Self, ParamsError> {
        parse_record(params, |f: &Fields<'_>| {
            let interval = f.field("interval", optional(number()))?;
            if interval.is_some_and(|ms| ms > MAX_TICK_INTERVAL.as_secs_f64() * 1000.0) {
                return Err(ParamsError::Invalid {
                    key: "interval".into(),
                    reason: format!("must be at most {} ms", MAX_TICK_INTERVAL.as_millis()),
                });
            }
            #[allow(clippy::cast_precision_loss)]
            let max_buffer = MONITOR_MAX_BUFFER_SIZE as f64;
            let buffer_size = f.field("bufferSize", optional(number()))?;
            if buffer_size.is_some_and(|n| n > max_buffer) {
                return Err(ParamsError::Invalid {
                    key: "bufferSize".into(),
                    reason: format!("must be at most {MONITOR_MAX_BUFFER_SIZE}"),
                });
            }
            Ok(Self {
                label: f
                    .field("label", optional(string()))?
                    .or_else(|| default_label.map(str::to_owned)),
                disabled: f.field("disabled", with_default(boolean(), false))?,
                hidden: f.field("hidden", with_default(boolean(), false))?,
                interval,
                buffer_size,
            })
        })
    }

    pub fn view_props(&self) -> ViewProps {
        ViewProps::new(ViewPropsObject {
            disabled: self.disabled,
            hidden: self.hidden,
            disposed: false,
        })
    }

    pub fn input_interval(&self, ctx: &PluginContext) -> Duration {
        self.interval
            .map(millis)
            .or(ctx.input_interval)
            .unwrap_or(Duration::ZERO)
    }

    pub fn monitor_interval(&self, ctx: &PluginContext) -> Duration {
        self.interval.map(millis).unwrap_or(ctx.monitor_interval)
    }

    pub fn buffer_size(&self, ctx: &PluginContext) -> Option<usize> {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let size = self
            .buffer_size
            .filter(|n| n.is_finite() && *n >= 1.0)
            .map(|n| n as usize);
        size.or(ctx.buffer_size)
    }
}

/// Milliseconds to a duration; invalid values mean "no interval".
fn millis(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::ZERO)
}
