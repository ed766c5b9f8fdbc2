#![forbid(unsafe_code)]

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};
use twiddle_dom::Document;
use twiddle_runtime::{
    Binding, BindingConfig, BindingTarget, Constraint, Observable, Params, Reader, Unknown,
    ViewProps, Writer, create_ticker,
};

use super::{Acceptance, CommonParams, PluginContext};
use crate::api::InputApiKind;
use crate::blade::{Blade, BladeController, InputBindingController, LabelProps};
use crate::controller::ValueController;
use crate::error::PluginError;

/// What binding hooks see.
#[derive(Debug)]
pub struct BindingArgs<'a, P> {
    pub target: &'a BindingTarget,
    /// Raw property value at creation.
    pub initial_value: &'a Unknown,
    pub params: &'a P,
}

/// How an input plugin reads, constrains, compares and writes its value.
pub struct InputBindingHooks<In, P> {
    pub reader: fn(&BindingArgs<'_, P>) -> Reader<In>,
    pub constraint: Option<fn(&BindingArgs<'_, P>) -> Option<Rc<dyn Constraint<In>>>>,
    pub writer: fn(&BindingArgs<'_, P>) -> Writer<In>,
    /// Replaces `PartialEq` for change detection.
    pub equals: Option<fn(&In, &In) -> bool>,
}

/// What an input plugin's controller factory sees. The binding is fully
/// constructed and has read its target once.
pub struct InputControllerArgs<'a, In, P> {
    pub document: &'a Document,
    pub params: &'a P,
    pub initial_value: &'a Unknown,
    pub value: &'a Observable<In>,
    pub constraint: Option<&'a Rc<dyn Constraint<In>>>,
    pub binding: &'a Binding<In>,
    pub view_props: ViewProps,
}

/// An input plugin.
pub struct InputBindingPlugin<In, P> {
    pub id: &'static str,
    pub accept: fn(&Unknown, &Params) -> Acceptance<P>,
    pub binding: InputBindingHooks<In, P>,
    pub controller: fn(InputControllerArgs<'_, In, P>) -> Rc<dyn ValueController>,
    /// Names the API extension for a controller this plugin built, if any.
    pub api: Option<fn(&InputBindingController<In>) -> Option<InputApiKind>>,
}

impl<In, P> fmt::Debug for InputBindingPlugin<In, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputBindingPlugin")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Type-erased input plugin, as stored in a [`PluginPool`](super::PluginPool).
pub trait InputPluginEntry {
    fn id(&self) -> &'static str;

    /// Initial value and type-erased params when the plugin accepts.
    fn accept(&self, value: &Unknown, params: &Params) -> Option<(Unknown, Box<dyn Any>)>;

    fn create(
        &self,
        context: &PluginContext,
        target: BindingTarget,
        initial_value: &Unknown,
        params: &dyn Any,
        common: &CommonParams,
    ) -> Result<Rc<dyn BladeController>, PluginError>;

    /// API extension for `controller`, if this plugin recognizes it.
    fn api_kind(&self, controller: &dyn BladeController) -> Option<InputApiKind>;
}

impl<In, P> InputPluginEntry for InputBindingPlugin<In, P>
where
    In: Clone + PartialEq + 'static,
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
                trace!(plugin = self.id, "input plugin rejected");
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
        let constraint = self.binding.constraint.and_then(|f| f(&args));
        let writer = (self.binding.writer)(&args);
        let initial = reader(initial_value);
        let value = match self.binding.equals {
            Some(equals) => Observable::with_equals(initial, equals),
            None => Observable::new(initial),
        };

        let key = target.key().to_owned();
        let ticker = create_ticker(common.input_interval(context), &context.scheduler);
        let binding = Binding::new(BindingConfig {
            target,
            reader,
            writer: Some(writer),
            constraint: constraint.clone(),
            value: value.clone(),
            ticker,
        });
        binding.read()?;

        let value_controller = (self.controller)(InputControllerArgs {
            document: &context.document,
            params,
            initial_value,
            value: &value,
            constraint: constraint.as_ref(),
            binding: &binding,
            view_props: common.view_props(),
        });
        debug!(plugin = self.id, key = %key, "input created");
        Ok(Rc::new(InputBindingController::new(
            &context.document,
            Blade::new(),
            LabelProps::with_label(common.label.clone()),
            binding,
            value_controller,
        )))
    }

    fn api_kind(&self, controller: &dyn BladeController) -> Option<InputApiKind> {
        let api = self.api?;
        let typed = controller
            .as_any()
            .downcast_ref::<InputBindingController<In>>()?;
        api(typed)
    }
}

impl<In, P> From<InputBindingPlugin<In, P>> for super::Plugin
where
    In: Clone + PartialEq + 'static,
    P: 'static,
{
    fn from(plugin: InputBindingPlugin<In, P>) -> Self {
        Self::Input(Rc::new(plugin))
    }
}
