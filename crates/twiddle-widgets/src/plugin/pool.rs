#![forbid(unsafe_code)]

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use ahash::AHashSet;
use tracing::{debug, warn};
use twiddle_runtime::params::find_string_param;
use twiddle_runtime::{BindingError, BindingTarget, Params, Unknown};

use super::{
    BladePluginEntry, CommonParams, InputPluginEntry, MonitorPluginEntry, Plugin, PluginContext,
};
use crate::api::{ApiContext, BladeApi, InputApiKind};
use crate::blade::BladeController;
use crate::error::PluginError;

/// Plugins of one tier, per category, in registration order.
#[derive(Clone, Default)]
struct Tier {
    inputs: Vec<Rc<dyn InputPluginEntry>>,
    monitors: Vec<Rc<dyn MonitorPluginEntry>>,
    blades: Vec<Rc<dyn BladePluginEntry>>,
}

impl Tier {
    fn push(&mut self, plugin: Plugin) {
        match plugin {
            Plugin::Input(p) => self.inputs.push(p),
            Plugin::Monitor(p) => self.monitors.push(p),
            Plugin::Blade(p) => self.blades.push(p),
        }
    }
}

/// Ordered plugin registry. Cloning is cheap and yields an independent
/// registry sharing the same plugin records.
#[derive(Clone, Default)]
pub struct PluginPool {
    custom: Tier,
    defaults: Tier,
    ids: AHashSet<&'static str>,
}

/// An input plugin that accepted a value.
pub struct InputResolution {
    pub entry: Rc<dyn InputPluginEntry>,
    pub initial_value: Unknown,
    params: Box<dyn Any>,
}

impl InputResolution {
    #[must_use]
    pub fn plugin_id(&self) -> &'static str {
        self.entry.id()
    }

    /// Typed params, when `P` is the accepting plugin's params type.
    #[must_use]
    pub fn params<P: 'static>(&self) -> Option<&P> {
        self.params.downcast_ref()
    }
}

impl fmt::Debug for InputResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputResolution")
            .field("plugin", &self.plugin_id())
            .field("initial_value", &self.initial_value)
            .finish_non_exhaustive()
    }
}

/// A monitor plugin that accepted a value.
pub struct MonitorResolution {
    pub entry: Rc<dyn MonitorPluginEntry>,
    pub initial_value: Unknown,
    params: Box<dyn Any>,
}

impl MonitorResolution {
    #[must_use]
    pub fn plugin_id(&self) -> &'static str {
        self.entry.id()
    }

    #[must_use]
    pub fn params<P: 'static>(&self) -> Option<&P> {
        self.params.downcast_ref()
    }
}

impl fmt::Debug for MonitorResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorResolution")
            .field("plugin", &self.plugin_id())
            .field("initial_value", &self.initial_value)
            .finish_non_exhaustive()
    }
}

impl PluginPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A pool holding the default plugins.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut pool = Self::new();
        for plugin in super::defaults::all() {
            // Default ids are distinct.
            let _ = pool.register_default(plugin);
        }
        pool
    }

    /// Add a custom plugin. Custom plugins are tried before every default.
    pub fn register(&mut self, plugin: impl Into<Plugin>) -> Result<(), PluginError> {
        let plugin = self.claim(plugin.into())?;
        debug!(plugin = plugin.id(), "plugin registered");
        self.custom.push(plugin);
        Ok(())
    }

    /// Add a plugin after the existing defaults.
    pub fn register_default(&mut self, plugin: impl Into<Plugin>) -> Result<(), PluginError> {
        let plugin = self.claim(plugin.into())?;
        self.defaults.push(plugin);
        Ok(())
    }

    fn claim(&mut self, plugin: Plugin) -> Result<Plugin, PluginError> {
        if self.ids.insert(plugin.id()) {
            Ok(plugin)
        } else {
            Err(PluginError::DuplicateId {
                id: plugin.id().to_owned(),
            })
        }
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Ids of every input plugin in resolution order.
    #[must_use]
    pub fn input_ids(&self) -> Vec<&'static str> {
        self.inputs().map(|p| p.id()).collect()
    }

    #[must_use]
    pub fn monitor_ids(&self) -> Vec<&'static str> {
        self.monitors().map(|p| p.id()).collect()
    }

    #[must_use]
    pub fn blade_ids(&self) -> Vec<&'static str> {
        self.blades().map(|p| p.id()).collect()
    }

    fn inputs(&self) -> impl Iterator<Item = &Rc<dyn InputPluginEntry>> {
        self.custom.inputs.iter().chain(&self.defaults.inputs)
    }

    fn monitors(&self) -> impl Iterator<Item = &Rc<dyn MonitorPluginEntry>> {
        self.custom.monitors.iter().chain(&self.defaults.monitors)
    }

    fn blades(&self) -> impl Iterator<Item = &Rc<dyn BladePluginEntry>> {
        self.custom.blades.iter().chain(&self.defaults.blades)
    }

    // -----------------------------------------------------------------------
    // Resolution
    // -----------------------------------------------------------------------

    /// First input plugin accepting `value` with `params`.
    pub fn resolve_input(
        &self,
        key: &str,
        value: &Unknown,
        params: &Params,
    ) -> Result<InputResolution, PluginError> {
        for entry in self.inputs() {
            if let Some((initial_value, typed)) = entry.accept(value, params) {
                debug!(plugin = entry.id(), key, "input plugin resolved");
                return Ok(InputResolution {
                    entry: Rc::clone(entry),
                    initial_value,
                    params: typed,
                });
            }
        }
        warn!(key, value = %value, "no input plugin accepted");
        Err(PluginError::NoMatchingPlugin {
            kind: "input",
            key: key.to_owned(),
        })
    }

    /// First monitor plugin accepting `value` with `params`.
    pub fn resolve_monitor(
        &self,
        key: &str,
        value: &Unknown,
        params: &Params,
    ) -> Result<MonitorResolution, PluginError> {
        for entry in self.monitors() {
            if let Some((initial_value, typed)) = entry.accept(value, params) {
                debug!(plugin = entry.id(), key, "monitor plugin resolved");
                return Ok(MonitorResolution {
                    entry: Rc::clone(entry),
                    initial_value,
                    params: typed,
                });
            }
        }
        warn!(key, value = %value, "no monitor plugin accepted");
        Err(PluginError::NoMatchingPlugin {
            kind: "monitor",
            key: key.to_owned(),
        })
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Resolve and build an input row for `target`.
    pub fn create_input(
        &self,
        context: &PluginContext,
        target: BindingTarget,
        params: &Params,
    ) -> Result<Rc<dyn BladeController>, PluginError> {
        let common = CommonParams::parse(params, Some(target.key()))?;
        let value = target.read().map_err(BindingError::from)?;
        let resolution = self.resolve_input(target.key(), &value, params)?;
        resolution.entry.create(
            context,
            target,
            &resolution.initial_value,
            resolution.params.as_ref(),
            &common,
        )
    }

    /// Resolve and build a monitor row for `target`. The target is made
    /// read-only.
    pub fn create_monitor(
        &self,
        context: &PluginContext,
        target: BindingTarget,
        params: &Params,
    ) -> Result<Rc<dyn BladeController>, PluginError> {
        let target = target.read_only();
        let common = CommonParams::parse(params, Some(target.key()))?;
        let value = target.read().map_err(BindingError::from)?;
        let resolution = self.resolve_monitor(target.key(), &value, params)?;
        resolution.entry.create(
            context,
            target,
            &resolution.initial_value,
            resolution.params.as_ref(),
            &common,
        )
    }

    /// Build a params-only blade from the first plugin accepting `params`.
    pub fn create_blade(
        &self,
        context: &PluginContext,
        params: &Params,
    ) -> Result<Rc<dyn BladeController>, PluginError> {
        let common = CommonParams::parse(params, None)?;
        for entry in self.blades() {
            if let Some(typed) = entry.accept(params) {
                debug!(plugin = entry.id(), "blade plugin resolved");
                return entry.create(context, typed.as_ref(), &common);
            }
        }
        let view = find_string_param(params, "view").unwrap_or_default();
        warn!(view = %view, "no blade plugin accepted");
        Err(PluginError::NoMatchingPlugin {
            kind: "blade",
            key: view,
        })
    }

    // -----------------------------------------------------------------------
    // API lookup
    // -----------------------------------------------------------------------

    /// Extension kind of an input row; the first plugin recognizing it wins.
    #[must_use]
    pub fn input_api_kind(&self, controller: &dyn BladeController) -> Option<InputApiKind> {
        self.inputs().find_map(|p| p.api_kind(controller))
    }

    /// Public handle of a params-only blade.
    pub fn blade_api(
        &self,
        controller: &Rc<dyn BladeController>,
        context: &ApiContext,
    ) -> Result<BladeApi, PluginError> {
        self.blades()
            .find_map(|p| p.api(controller, context))
            .ok_or_else(|| PluginError::ApiMismatch {
                id: controller.kind().name().to_owned(),
            })
    }
}

impl fmt::Debug for PluginPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginPool")
            .field("inputs", &self.input_ids())
            .field("monitors", &self.monitor_ids())
            .field("blades", &self.blade_ids())
            .finish()
    }
}
