#![forbid(unsafe_code)]

use std::rc::Rc;

use twiddle_runtime::params::{find_number_param, find_string_param};
use twiddle_runtime::{BindingError, BindingTarget, Object, Params, Subscription, Unknown};

use super::{
    ApiContext, BladeApi, ButtonApi, InputBindingApi, MonitorBindingApi, SeparatorApi,
    TpChangeEvent, TpFoldEvent, TpUpdateEvent, blade_handle,
};
use crate::blade::{BladeController, BladeKind, FolderController, Rack, RackEvent};
use crate::error::PluginError;

/// Handle of a folder, and the API for adding blades to it.
///
/// Every `add_*` method understands two params besides the plugin's own:
/// `index` (insert position, appended when absent) and, for bindings,
/// `presetKey` (key reported in events).
#[derive(Clone)]
pub struct FolderApi {
    controller: Rc<dyn BladeController>,
    folder: FolderController,
    context: ApiContext,
}

impl FolderApi {
    /// Wrap a folder controller; `None` for any other blade.
    #[must_use]
    pub fn from_controller(controller: Rc<dyn BladeController>, context: ApiContext) -> Option<Self> {
        let folder = match controller.kind() {
            BladeKind::Folder(folder) => folder.clone(),
            _ => return None,
        };
        Some(Self {
            controller,
            folder,
            context,
        })
    }

    pub(crate) fn new(folder: FolderController, context: ApiContext) -> Self {
        Self {
            controller: Rc::new(folder.clone()),
            folder,
            context,
        }
    }

    #[must_use]
    pub fn context(&self) -> &ApiContext {
        &self.context
    }

    #[must_use]
    pub fn folder(&self) -> &FolderController {
        &self.folder
    }

    #[must_use]
    pub fn rack(&self) -> &Rack {
        self.folder.rack()
    }

    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.folder.props().title.get()
    }

    pub fn set_title(&self, title: Option<String>) {
        self.folder.props().title.set(title);
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.folder.is_expanded()
    }

    pub fn set_expanded(&self, expanded: bool) {
        self.folder.set_expanded(expanded);
    }

    /// Handles of the direct children, in order.
    #[must_use]
    pub fn children(&self) -> Vec<BladeApi> {
        self.rack()
            .children()
            .iter()
            .filter_map(|c| self.context.api_for(c).ok())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Adding blades
    // -----------------------------------------------------------------------

    /// Bind `object[key]` to an input row.
    pub fn add_input(
        &self,
        object: &Object,
        key: &str,
        params: &Params,
    ) -> Result<InputBindingApi, PluginError> {
        self.add_input_with(target(object, key, params), params)
    }

    /// Bind an arbitrary target to an input row.
    pub fn add_input_with(
        &self,
        target: BindingTarget,
        params: &Params,
    ) -> Result<InputBindingApi, PluginError> {
        let controller = self
            .context
            .pool()
            .create_input(self.context.plugin_context(), target, params)?;
        match self.insert(controller, params)? {
            BladeApi::Input(api) => Ok(api),
            other => Err(mismatch(&other)),
        }
    }

    /// Show `object[key]` in a read-only monitor row.
    pub fn add_monitor(
        &self,
        object: &Object,
        key: &str,
        params: &Params,
    ) -> Result<MonitorBindingApi, PluginError> {
        self.add_monitor_with(target(object, key, params), params)
    }

    pub fn add_monitor_with(
        &self,
        target: BindingTarget,
        params: &Params,
    ) -> Result<MonitorBindingApi, PluginError> {
        let controller = self
            .context
            .pool()
            .create_monitor(self.context.plugin_context(), target, params)?;
        match self.insert(controller, params)? {
            BladeApi::Monitor(api) => Ok(api),
            other => Err(mismatch(&other)),
        }
    }

    /// Add a nested folder. Needs `title`; `expanded` defaults to `true`.
    pub fn add_folder(&self, params: &Params) -> Result<FolderApi, PluginError> {
        match self.add_blade(&with_view(params, "folder"))? {
            BladeApi::Folder(api) => Ok(api),
            other => Err(mismatch(&other)),
        }
    }

    /// Add a button. Needs `title`; `label` is optional.
    pub fn add_button(&self, params: &Params) -> Result<ButtonApi, PluginError> {
        match self.add_blade(&with_view(params, "button"))? {
            BladeApi::Button(api) => Ok(api),
            other => Err(mismatch(&other)),
        }
    }

    pub fn add_separator(&self, params: &Params) -> Result<SeparatorApi, PluginError> {
        match self.add_blade(&with_view(params, "separator"))? {
            BladeApi::Separator(api) => Ok(api),
            other => Err(mismatch(&other)),
        }
    }

    /// Add whatever blade plugin accepts `params`.
    pub fn add_blade(&self, params: &Params) -> Result<BladeApi, PluginError> {
        let controller = self
            .context
            .pool()
            .create_blade(self.context.plugin_context(), params)?;
        self.insert(controller, params)
    }

    fn insert(
        &self,
        controller: Rc<dyn BladeController>,
        params: &Params,
    ) -> Result<BladeApi, PluginError> {
        match self.context.api_for(&controller) {
            Ok(api) => {
                self.rack().add(controller, index(params));
                Ok(api)
            }
            Err(err) => {
                controller.dispose();
                Err(err)
            }
        }
    }

    /// Detach a child without disposing it. Returns `false` when `api` is
    /// not a child of this folder.
    pub fn remove(&self, api: &BladeApi) -> bool {
        self.rack().remove(api.controller())
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Changes of every input in this folder and below.
    pub fn on_change(&self, handler: impl Fn(&TpChangeEvent) + 'static) -> Subscription {
        let context = self.context.clone();
        self.rack().on_event(move |event| {
            let RackEvent::InputChange { blade, options } = event else {
                return;
            };
            if let Ok(BladeApi::Input(api)) = context.api_for(blade) {
                handler(&api.change_event(options.last));
            }
        })
    }

    /// Reads of every monitor in this folder and below.
    pub fn on_update(&self, handler: impl Fn(&TpUpdateEvent) + 'static) -> Subscription {
        let context = self.context.clone();
        self.rack().on_event(move |event| {
            let RackEvent::MonitorUpdate { blade } = event else {
                return;
            };
            if let Ok(BladeApi::Monitor(api)) = context.api_for(blade) {
                handler(&api.update_event());
            }
        })
    }

    /// Folds of this folder and of every folder below it.
    pub fn on_fold(&self, handler: impl Fn(&TpFoldEvent) + 'static) -> Subscription {
        let handler: Rc<dyn Fn(&TpFoldEvent)> = Rc::new(handler);

        let own = {
            let (handler, api) = (Rc::clone(&handler), self.clone());
            self.folder.props().expanded.subscribe(move |expanded| {
                handler(&TpFoldEvent {
                    target: BladeApi::Folder(api.clone()),
                    expanded: *expanded,
                });
            })
        };
        let context = self.context.clone();
        let nested = self.rack().on_event(move |event| {
            let RackEvent::Fold { blade, expanded } = event else {
                return;
            };
            if let Ok(target) = context.api_for(blade) {
                handler(&TpFoldEvent {
                    target,
                    expanded: *expanded,
                });
            }
        });
        Subscription::merge([own, nested])
    }

    /// Read every binding in this folder and below. All bindings are read
    /// even after a failure; the first error is returned.
    pub fn refresh(&self) -> Result<(), BindingError> {
        let mut first_error = None;
        refresh_rack(self.rack(), &mut first_error);
        first_error.map_or(Ok(()), Err)
    }
}

blade_handle!(FolderApi);

fn refresh_rack(rack: &Rack, first_error: &mut Option<BindingError>) {
    for child in rack.children() {
        let result = match child.kind() {
            BladeKind::InputBinding(b) => b.binding().read(),
            BladeKind::MonitorBinding(b) => b.binding().read(),
            BladeKind::Folder(folder) => {
                refresh_rack(folder.rack(), first_error);
                Ok(true)
            }
            BladeKind::Label(_) | BladeKind::Separator | BladeKind::Custom => Ok(false),
        };
        if let Err(err) = result {
            first_error.get_or_insert(err);
        }
    }
}

fn target(object: &Object, key: &str, params: &Params) -> BindingTarget {
    let target = BindingTarget::for_object(object, key);
    match find_string_param(params, "presetKey") {
        Some(preset_key) => target.with_preset_key(preset_key),
        None => target,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn index(params: &Params) -> Option<usize> {
    find_number_param(params, "index")
        .filter(|i| i.is_finite() && *i >= 0.0)
        .map(|i| i as usize)
}

fn with_view(params: &Params, view: &str) -> Params {
    let mut params = params.clone();
    params.insert("view".into(), Unknown::from(view));
    params
}

fn mismatch(api: &BladeApi) -> PluginError {
    PluginError::ApiMismatch {
        id: api.controller().kind().name().to_owned(),
    }
}
