#![forbid(unsafe_code)]

//! The pane: a root folder plus the plugin pool and tick scheduler its
//! bindings share.
//!
//! # Invariants
//!
//! 1. Every blade added anywhere in the pane resolves against the same pool,
//!    so plugins registered with [`Pane::register_plugin`] apply to nested
//!    folders too.
//! 2. Interval tickers of the pane's bindings fire only from [`Pane::poll`].
//! 3. `dispose` is recursive and idempotent.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Config does not parse | Bad JSON or wrong field type | [`PaneError::Config`] |
//! | Duplicate plugin id | `register_plugin` with a taken id | [`PluginError::DuplicateId`], pool unchanged |
//! | Refresh read fails | A target lost its property | First error returned, other bindings still read |

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use twiddle_dom::{Document, Element};
use twiddle_runtime::{BindingTarget, Object, Params, Subscription, TickScheduler};
use web_time::Instant;

use crate::api::{
    ApiContext, BladeApi, BladeHandle, ButtonApi, FolderApi, InputBindingApi, MonitorBindingApi,
    SeparatorApi, TpChangeEvent, TpFoldEvent, TpUpdateEvent,
};
use crate::blade::{BladeState, FolderController, FolderProps, FolderPropsObject};
use crate::constants::{MONITOR_DEFAULT_INTERVAL, MONITOR_MAX_BUFFER_SIZE};
use crate::error::{PaneError, PluginError};
use crate::plugin::{Plugin, PluginContext, PluginPool};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Pane-wide settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PaneConfig {
    /// Title of the root folder. A pane without a title has no fold button.
    /// Default: `None`
    pub title: Option<String>,

    /// Whether the root folder starts expanded.
    /// Default: `true`
    pub expanded: bool,

    /// Poll interval of monitors that do not set `interval`.
    /// Default: 200
    pub monitor_interval_ms: u64,

    /// Poll interval of inputs that do not set `interval`. `None` leaves
    /// inputs to explicit refreshes.
    /// Default: `None`
    pub input_interval_ms: Option<u64>,

    /// History size forced on every monitor.
    /// Default: `None` (each monitor plugin picks its own)
    pub buffer_size: Option<usize>,
}

impl Default for PaneConfig {
    fn default() -> Self {
        Self {
            title: None,
            expanded: true,
            monitor_interval_ms: u64::try_from(MONITOR_DEFAULT_INTERVAL.as_millis())
                .unwrap_or(200),
            input_interval_ms: None,
            buffer_size: None,
        }
    }
}

impl PaneConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, PaneError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    #[must_use]
    pub fn with_monitor_interval(mut self, interval: Duration) -> Self {
        self.monitor_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_input_interval(mut self, interval: Option<Duration>) -> Self {
        self.input_interval_ms =
            interval.map(|i| u64::try_from(i.as_millis()).unwrap_or(u64::MAX));
        self
    }

    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: Option<usize>) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    fn plugin_context(&self, document: Document) -> PluginContext {
        PluginContext {
            document,
            scheduler: TickScheduler::new(),
            monitor_interval: Duration::from_millis(self.monitor_interval_ms),
            input_interval: self.input_interval_ms.map(Duration::from_millis),
            buffer_size: self
                .buffer_size
                .map(|size| size.clamp(1, MONITOR_MAX_BUFFER_SIZE)),
        }
    }
}

// ---------------------------------------------------------------------------
// Pane
// ---------------------------------------------------------------------------

/// A control panel.
///
/// ```ignore
/// let pane = Pane::new(PaneConfig::new().with_title("Params"));
/// let object = Object::new();
/// object.set("speed", json!(0.5));
/// let speed = pane.add_input(&object, "speed", &params(json!({"min": 0, "max": 1})))?;
/// ```
pub struct Pane {
    config: PaneConfig,
    document: Document,
    pool: Rc<RefCell<PluginPool>>,
    root: FolderApi,
}

impl Pane {
    /// A pane with the default plugins registered.
    #[must_use]
    pub fn new(config: PaneConfig) -> Self {
        Self::with_pool(config, PluginPool::with_defaults())
    }

    /// A pane resolving against `pool` instead of the default plugins.
    #[must_use]
    pub fn with_pool(config: PaneConfig, pool: PluginPool) -> Self {
        let document = Document::new();
        let folder = FolderController::new_root(
            &document,
            FolderProps::from_object(FolderPropsObject {
                title: config.title.clone(),
                expanded: config.expanded,
            }),
            Default::default(),
        );
        let pool = Rc::new(RefCell::new(pool));
        let context = ApiContext::new(Rc::clone(&pool), config.plugin_context(document));
        debug!(title = ?config.title, "pane created");
        Self {
            config,
            document,
            pool,
            root: FolderApi::new(folder, context),
        }
    }

    #[must_use]
    pub fn config(&self) -> &PaneConfig {
        &self.config
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The root folder's handle.
    #[must_use]
    pub fn root(&self) -> &FolderApi {
        &self.root
    }

    #[must_use]
    pub fn element(&self) -> &Element {
        self.root.element()
    }

    /// Register a custom plugin. Custom plugins are tried before the
    /// defaults, in the order they were registered.
    pub fn register_plugin(&self, plugin: impl Into<Plugin>) -> Result<(), PluginError> {
        self.pool.borrow_mut().register(plugin)
    }

    // -----------------------------------------------------------------------
    // Root folder
    // -----------------------------------------------------------------------

    pub fn add_input(
        &self,
        object: &Object,
        key: &str,
        params: &Params,
    ) -> Result<InputBindingApi, PluginError> {
        self.root.add_input(object, key, params)
    }

    pub fn add_input_with(
        &self,
        target: BindingTarget,
        params: &Params,
    ) -> Result<InputBindingApi, PluginError> {
        self.root.add_input_with(target, params)
    }

    pub fn add_monitor(
        &self,
        object: &Object,
        key: &str,
        params: &Params,
    ) -> Result<MonitorBindingApi, PluginError> {
        self.root.add_monitor(object, key, params)
    }

    pub fn add_monitor_with(
        &self,
        target: BindingTarget,
        params: &Params,
    ) -> Result<MonitorBindingApi, PluginError> {
        self.root.add_monitor_with(target, params)
    }

    pub fn add_folder(&self, params: &Params) -> Result<FolderApi, PluginError> {
        self.root.add_folder(params)
    }

    pub fn add_button(&self, params: &Params) -> Result<ButtonApi, PluginError> {
        self.root.add_button(params)
    }

    pub fn add_separator(&self, params: &Params) -> Result<SeparatorApi, PluginError> {
        self.root.add_separator(params)
    }

    pub fn add_blade(&self, params: &Params) -> Result<BladeApi, PluginError> {
        self.root.add_blade(params)
    }

    pub fn remove(&self, api: &BladeApi) -> bool {
        self.root.remove(api)
    }

    #[must_use]
    pub fn children(&self) -> Vec<BladeApi> {
        self.root.children()
    }

    pub fn on_change(&self, handler: impl Fn(&TpChangeEvent) + 'static) -> Subscription {
        self.root.on_change(handler)
    }

    pub fn on_fold(&self, handler: impl Fn(&TpFoldEvent) + 'static) -> Subscription {
        self.root.on_fold(handler)
    }

    pub fn on_update(&self, handler: impl Fn(&TpUpdateEvent) + 'static) -> Subscription {
        self.root.on_update(handler)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Read every binding in the pane.
    pub fn refresh(&self) -> Result<(), PaneError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("pane_refresh").entered();

        self.root.refresh().map_err(PaneError::from)
    }

    /// Fire every interval ticker that is due at `now`. Returns how many
    /// fired.
    pub fn poll(&self, now: Instant) -> usize {
        self.root.context().plugin_context().scheduler.poll(now)
    }

    #[must_use]
    pub fn export_state(&self) -> BladeState {
        self.root.export_state()
    }

    /// Returns `false` and changes nothing when `state` does not fit.
    pub fn import_state(&self, state: &BladeState) -> bool {
        self.root.import_state(state)
    }

    pub fn dispose(&self) {
        self.root.dispose();
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.root.is_disposed()
    }
}

impl Drop for Pane {
    fn drop(&mut self) {
        self.root.dispose();
    }
}

impl std::fmt::Debug for Pane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pane")
            .field("config", &self.config)
            .field("children", &self.root.rack().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use twiddle_runtime::Unknown;

    fn params(value: Unknown) -> Params {
        match value {
            Unknown::Object(map) => map,
            _ => Params::new(),
        }
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config = PaneConfig::from_json_str(r#"{"title": "Tweaks"}"#).unwrap_or_default();
        assert_eq!(config.title.as_deref(), Some("Tweaks"));
        assert!(config.expanded);
        assert_eq!(config.monitor_interval_ms, 200);
        assert_eq!(config.input_interval_ms, None);
    }

    #[test]
    fn config_rejects_bad_json() {
        assert!(matches!(
            PaneConfig::from_json_str(r#"{"expanded": "yes"}"#),
            Err(PaneError::Config(_))
        ));
    }

    #[test]
    fn builders_set_fields() {
        let config = PaneConfig::new()
            .with_title("T")
            .with_expanded(false)
            .with_monitor_interval(Duration::from_millis(50))
            .with_input_interval(Some(Duration::from_millis(10)))
            .with_buffer_size(Some(8));
        assert_eq!(config.title.as_deref(), Some("T"));
        assert!(!config.expanded);
        assert_eq!(config.monitor_interval_ms, 50);
        assert_eq!(config.input_interval_ms, Some(10));
        assert_eq!(config.buffer_size, Some(8));
    }

    #[test]
    fn title_and_fold_follow_config() {
        let pane = Pane::new(PaneConfig::new().with_title("Tweaks").with_expanded(false));
        assert_eq!(pane.root().title().as_deref(), Some("Tweaks"));
        assert!(!pane.root().is_expanded());
        assert!(pane.element().has_class("tp-rotv"));
    }

    #[test]
    fn add_and_remove_children() {
        let pane = Pane::new(PaneConfig::new());
        let object = Object::new();
        object.set("count", json!(1));
        let input = pane.add_input(&object, "count", &Params::new());
        assert!(input.is_ok());
        let sep = pane.add_separator(&params(json!({"index": 0})));
        assert!(sep.is_ok());
        let children = pane.children();
        assert_eq!(children.len(), 2);
        assert!(matches!(children[0], BladeApi::Separator(_)));
        assert!(pane.remove(&children[0]));
        assert_eq!(pane.children().len(), 1);
    }

    #[test]
    fn unknown_value_is_reported() {
        let pane = Pane::new(PaneConfig::new());
        let object = Object::new();
        object.set("nothing", Unknown::Null);
        assert!(matches!(
            pane.add_input(&object, "nothing", &Params::new()),
            Err(PluginError::NoMatchingPlugin { kind: "input", .. })
        ));
        assert!(pane.children().is_empty());
    }

    #[test]
    fn dispose_is_idempotent() {
        let pane = Pane::new(PaneConfig::new());
        let folder = pane.add_folder(&params(json!({"title": "F"})));
        assert!(folder.is_ok());
        pane.dispose();
        pane.dispose();
        assert!(pane.is_disposed());
        assert!(folder.is_ok_and(|f| f.is_disposed()));
    }

    #[test]
    fn monitor_interval_drives_poll() {
        let pane = Pane::new(PaneConfig::new().with_monitor_interval(Duration::from_millis(10)));
        let object = Object::new();
        object.set("fps", json!(60));
        let monitor = pane.add_monitor(&object, "fps", &Params::new());
        assert!(monitor.is_ok());
        let start = Instant::now();
        pane.poll(start);
        object.set("fps", json!(30));
        assert_eq!(pane.poll(start + Duration::from_millis(20)), 1);
        assert!(monitor.is_ok_and(|m| m.value() == json!(30)));
    }
}
