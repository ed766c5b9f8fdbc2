#![forbid(unsafe_code)]

//! Twiddle public facade and prelude.
//!
//! Twiddle builds control panels that bind host properties to labeled
//! rows. The member crates are re-exported under short names; most users
//! only need the [`prelude`].
//!
//! ```
//! use twiddle::prelude::*;
//! use serde_json::json;
//!
//! let pane = Pane::new(PaneConfig::new().with_title("Scene"));
//! let obj = Object::from_json(json!({"speed": 0.5})).unwrap();
//! let speed = pane
//!     .add_input(&obj, "speed", &Params::new())
//!     .unwrap();
//! assert_eq!(speed.value(), json!(0.5));
//! ```
//!
//! | Crate | Re-exported as | Contents |
//! |-------|----------------|----------|
//! | `twiddle-dom` | [`dom`] | Element tree, events |
//! | `twiddle-runtime` | [`runtime`] | Observables, bindings, constraints, tickers |
//! | `twiddle-style` | [`style`] | Class names, colors |
//! | `twiddle-widgets` | [`widgets`] | Controllers, plugins, pane API |

pub use twiddle_dom as dom;
pub use twiddle_runtime as runtime;
pub use twiddle_style as style;
pub use twiddle_widgets as widgets;

pub use twiddle_widgets::{Pane, PaneConfig, PaneError, PluginError};

/// Types most panes are built from.
pub mod prelude {
    pub use twiddle_dom::{Document, Element};
    pub use twiddle_runtime::{
        BindingError, BindingTarget, ChangeOptions, ListItem, Object, Params, Subscription, Unknown,
    };
    pub use twiddle_style::Color;
    pub use twiddle_widgets::{
        BladeApi, BladeHandle, ButtonApi, FolderApi, InputBindingApi, MonitorBindingApi, Pane,
        PaneConfig, PaneError, PluginError, PluginPool, TpChangeEvent, TpFoldEvent, TpUpdateEvent,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use serde_json::json;

    #[test]
    fn prelude_builds_a_pane() {
        let pane = Pane::new(PaneConfig::new());
        let obj = Object::from_json(json!({"on": true, "name": "a"})).unwrap_or_default();
        let on = pane.add_input(&obj, "on", &Params::new()).unwrap();
        pane.add_monitor(&obj, "name", &Params::new()).unwrap();
        assert_eq!(on.value(), json!(true));
        assert_eq!(pane.children().len(), 2);
    }

    #[test]
    fn crates_are_reachable_by_alias() {
        let doc = crate::dom::Document::new();
        let el = doc.create_element("div");
        el.add_class(&crate::style::ClassName::new("rot").block());
        assert!(el.has_class("tp-rotv"));
    }
}
