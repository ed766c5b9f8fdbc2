#![forbid(unsafe_code)]

//! Bindings from observables to element state.
//!
//! Every helper applies the current value immediately and returns the
//! subscription that keeps the element in sync. Views hold the returned
//! subscriptions for as long as the element lives.

use twiddle_dom::Element;
use twiddle_runtime::reactive::bind_value;
use twiddle_runtime::{Observable, Subscription, ViewProps};
use twiddle_style::ClassName;

const SHARED: ClassName = ClassName::new("");

/// Toggle `class` on `elem` with a boolean observable.
pub fn bind_class(value: &Observable<bool>, elem: &Element, class: String) -> Subscription {
    let elem = elem.clone();
    bind_value(value, move |on| elem.toggle_class(&class, *on))
}

/// `tp-v--disabled` and `tp-v--hidden` follow the view props.
pub fn bind_class_modifier(view_props: &ViewProps, elem: &Element) -> Vec<Subscription> {
    vec![
        bind_class(view_props.disabled(), elem, SHARED.modifier("disabled")),
        bind_class(view_props.hidden(), elem, SHARED.modifier("hidden")),
    ]
}

/// The element's `disabled` state follows the cascaded flag.
pub fn bind_disabled(view_props: &ViewProps, elem: &Element) -> Subscription {
    let elem = elem.clone();
    bind_value(view_props.global_disabled(), move |disabled| {
        elem.set_disabled(*disabled);
    })
}

/// Disabled elements leave the tab order.
pub fn bind_tab_index(view_props: &ViewProps, elem: &Element) -> Subscription {
    let elem = elem.clone();
    bind_value(view_props.global_disabled(), move |disabled| {
        elem.set_tab_index(Some(if *disabled { -1 } else { 0 }));
    })
}

/// Text content follows an optional string; `None` clears it.
pub fn bind_text_content(value: &Observable<Option<String>>, elem: &Element) -> Subscription {
    let elem = elem.clone();
    bind_value(value, move |text| {
        elem.set_text_content(text.as_deref().unwrap_or(""));
    })
}
