#![forbid(unsafe_code)]

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};
use twiddle_dom::Document;
use twiddle_runtime::{Params, ViewProps};

use super::{Acceptance, CommonParams, PluginContext};
use crate::api::{ApiContext, BladeApi};
use crate::blade::{Blade, BladeController};
use crate::error::PluginError;

/// What a blade plugin's controller factory sees.
pub struct BladeControllerArgs<'a, P> {
    pub document: &'a Document,
    pub blade: Blade,
    pub params: &'a P,
    pub view_props: ViewProps,
    pub context: &'a PluginContext,
}

/// A plugin for rows that bind nothing.
pub struct BladePlugin<P> {
    pub id: &'static str,
    /// Must check the `view` param before anything else.
    pub accept: fn(&Params) -> Acceptance<P>,
    pub controller: fn(BladeControllerArgs<'_, P>) -> Rc<dyn BladeController>,
    /// Wraps a controller this plugin recognizes in its public handle.
    pub api: fn(&Rc<dyn BladeController>, &ApiContext) -> Option<BladeApi>,
}

impl<P> fmt::Debug for BladePlugin<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BladePlugin")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Type-erased blade plugin.
pub trait BladePluginEntry {
    fn id(&self) -> &'static str;

    fn accept(&self, params: &Params) -> Option<Box<dyn Any>>;

    fn create(
        &self,
        context: &PluginContext,
        params: &dyn Any,
        common: &CommonParams,
    ) -> Result<Rc<dyn BladeController>, PluginError>;

    fn api(&self, controller: &Rc<dyn BladeController>, context: &ApiContext) -> Option<BladeApi>;
}

impl<P: 'static> BladePluginEntry for BladePlugin<P> {
    fn id(&self) -> &'static str {
        self.id
    }

    fn accept(&self, params: &Params) -> Option<Box<dyn Any>> {
        match (self.accept)(params) {
            Acceptance::Accepted { params, .. } => Some(Box::new(params)),
            Acceptance::Rejected => {
                trace!(plugin = self.id, "blade plugin rejected");
                None
            }
        }
    }

    fn create(
        &self,
        context: &PluginContext,
        params: &dyn Any,
        common: &CommonParams,
    ) -> Result<Rc<dyn BladeController>, PluginError> {
        let params = params
            .downcast_ref::<P>()
            .ok_or_else(|| PluginError::ForeignParams {
                id: self.id.to_owned(),
            })?;
        let controller = (self.controller)(BladeControllerArgs {
            document: &context.document,
            blade: Blade::new(),
            params,
            view_props: common.view_props(),
            context,
        });
        debug!(plugin = self.id, "blade created");
        Ok(controller)
    }

    fn api(&self, controller: &Rc<dyn BladeController>, context: &ApiContext) -> Option<BladeApi> {
        (self.api)(controller, context)
    }
}

impl<P: 'static> From<BladePlugin<P>> for super::Plugin {
    fn from(plugin: BladePlugin<P>) -> Self {
        Self::Blade(Rc::new(plugin))
    }
}
