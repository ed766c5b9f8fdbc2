#![forbid(unsafe_code)]

use std::rc::Rc;

use super::blade_handle;
use crate::blade::BladeController;

/// Handle of a separator.
#[derive(Clone)]
pub struct SeparatorApi {
    controller: Rc<dyn BladeController>,
}

impl SeparatorApi {
    pub(crate) fn new(controller: Rc<dyn BladeController>) -> Self {
        Self { controller }
    }
}

blade_handle!(SeparatorApi);

/// Handle for blades of custom plugins that need nothing beyond
/// [`BladeHandle`](super::BladeHandle).
#[derive(Clone)]
pub struct GenericBladeApi {
    controller: Rc<dyn BladeController>,
}

impl GenericBladeApi {
    #[must_use]
    pub fn new(controller: Rc<dyn BladeController>) -> Self {
        Self { controller }
    }
}

blade_handle!(GenericBladeApi);
