#![forbid(unsafe_code)]

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};
use twiddle_dom::Document;
use twiddle_runtime::reactive::create_buffered_value;
use twiddle_runtime::{
    BindingTarget, BufferedValue, MonitorBinding, MonitorBindingConfig, Params, Reader, Unknown,
    ViewProps, create_ticker,
};

use super::{Acceptance, BindingArgs, CommonParams, PluginContext};
use crate::blade::{Blade, BladeController, LabelProps, MonitorBindingController};
use crate::constants::MONITOR_MAX_BUFFER_SIZE;
use crate::controller::ValueController;
use crate::error::PluginError;

/// How a monitor plugin reads its value.
pub struct MonitorBindingHooks<T, P> {
    pub reader: fn(&BindingArgs<'_, P>) -> Reader<T>,
    /// History size when neither params nor the pane set one.
    pub default_buffer_size: fn(&P) -> usize,
}

/// What a monitor plugin's controller factory sees.
pub struct MonitorControllerArgs<'a, T, P> {
    pub document: &'a Document,
    pub params: &'a P,
    pub value: &'a BufferedValue<T>,
    pub buffer_size: usize,
    pub view_props: ViewProps,
}

/// A monitor plugin.
pub struct MonitorBindingPlugin<T, P> {
    pub id: &'static str,
    pub accept: fn(&Unknown, &Params) -> Acceptance<P>,
    pub binding: MonitorBindingHooks<T, P>,
    pub controller: fn(MonitorControllerArgs<'_, T, P>) -> Rc<dyn ValueController>,
}

impl<T, P> fmt::Debug for MonitorBindingPlugin<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorBindingPlugin")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Type-erased monitor plugin.
pub trait MonitorPluginEntry {
    fn id(&self) -> &'static str;

    fn accept(&self, value: &Unknown, params: &Params) -> Option<(Unknown, Box<dyn Any>)>;

    fn create(
        &self,
        context: &PluginContext,
        target: BindingTarget,
        initial_value: &Unknown,
        params: &dyn Any,
        common: &CommonParams,
    ) -> Result<Rc<dyn BladeController>, PluginError>;
}

impl<T, P> MonitorPluginEntry for MonitorBindingPlugin<T, P>
where
    T: Clone + 'static,
    P: 'static,
{
    fn id(&self) -> &'static str {
        self.id
    }

    fn accept(&self, value: &Unknown, params: &Params) -> Option<(Unknown, Box<dyn Any>)> {
        match (self.accept)(value, params) {
            Acceptance::Accepted {
                initial_value,
                params,
            } => Some((initial_value, Box::new(params))),
            Acceptance::Rejected => {
                trace!(plugin = self.id, "monitor plugin rejected");
                None
            }
        }
    }

    fn create(
        &self,
        context: &PluginContext,
        target: BindingTarget,
        initial_value: &Unknown,
        params: &dyn Any,
        common: &CommonParams,
    ) -> Result<Rc<dyn BladeController>, PluginError> {
        let params = params
            .downcast_ref::<P>()
            .ok_or_else(|| PluginError::ForeignParams {
                id: self.id.to_owned(),
            })?;
        let args = BindingArgs {
            target: &target,
            initial_value,
            params,
        };
        let reader = (self.binding.reader)(&args);
        let buffer_size = common
            .buffer_size(context)
            .unwrap_or_else(|| (self.binding.default_buffer_size)(params))
            .clamp(1, MONITOR_MAX_BUFFER_SIZE);
        let value: BufferedValue<T> = create_buffered_value(buffer_size);

        let key = target.key().to_owned();
        let ticker = create_ticker(common.monitor_interval(context), &context.scheduler);
        let binding = MonitorBinding::new(MonitorBindingConfig {
            target,
            reader,
            value: value.clone(),
            ticker,
        })?;

        let value_controller = (self.controller)(MonitorControllerArgs {
            document: &context.document,
            params,
            value: &value,
            buffer_size,
            view_props: common.view_props(),
        });
        debug!(plugin = self.id, key = %key, buffer_size, "monitor created");
        Ok(Rc::new(MonitorBindingController::new(
            &context.document,
            Blade::new(),
            LabelProps::with_label(common.label.clone()),
            binding,
            value_controller,
        )))
    }
}

impl<T, P> From<MonitorBindingPlugin<T, P>> for super::Plugin
where
    T: Clone + 'static,
    P: 'static,
{
    fn from(plugin: MonitorBindingPlugin<T, P>) -> Self {
        Self::Monitor(Rc::new(plugin))
    }
}
