#![forbid(unsafe_code)]

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use twiddle_dom::{Document, Element};
use twiddle_runtime::{BindingScope, ViewProps};
use twiddle_style::ClassName;

use super::{Blade, BladeController, BladeKind, bind_blade};

const CLASS: ClassName = ClassName::new("spr");

struct SeparatorInner {
    element: Element,
    blade: Blade,
    view_props: ViewProps,
    _scope: BindingScope,
}

/// A horizontal rule between rows.
#[derive(Clone)]
pub struct SeparatorController {
    inner: Rc<SeparatorInner>,
}

impl SeparatorController {
    pub fn new(doc: &Document, blade: Blade, view_props: ViewProps) -> Self {
        let element = doc.create_element("div");
        element.add_class(&CLASS.block());
        let rule = doc.create_element("hr");
        rule.add_class(&CLASS.elem("r"));
        element.append_child(&rule);

        let mut scope = BindingScope::new();
        scope.hold_all(bind_blade(&blade, &view_props, &element));
        Self {
            inner: Rc::new(SeparatorInner {
                element,
                blade,
                view_props,
                _scope: scope,
            }),
        }
    }
}

impl BladeController for SeparatorController {
    fn element(&self) -> &Element {
        &self.inner.element
    }

    fn view_props(&self) -> &ViewProps {
        &self.inner.view_props
    }

    fn blade(&self) -> &Blade {
        &self.inner.blade
    }

    fn kind(&self) -> BladeKind<'_> {
        BladeKind::Separator
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for SeparatorController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeparatorController").finish_non_exhaustive()
    }
}
