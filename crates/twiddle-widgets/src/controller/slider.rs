#![forbid(unsafe_code)]

//! Slider controllers.
//!
//! The slider's `min`/`max` are plain observables, so the number plugin can
//! share them with the binding's range constraint: moving a bound through
//! the API re-clamps both the value and the knob.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use twiddle_dom::{Document, DomEvent, Element, EventKind};
use twiddle_runtime::converter::{constrain_range, map_range};
use twiddle_runtime::{BindingScope, ChangeOptions, Observable, ViewProps, value_map};
use twiddle_style::ClassName;

use super::text::{NumberTextController, NumberTextProps};
use super::{Parser, ValueController, ValueControllerKind, arrow_direction, step_multiplier};
use crate::reactive::{bind_class_modifier, bind_tab_index};

const SLIDER_CLASS: ClassName = ClassName::new("sld");
const SLIDER_TEXT_CLASS: ClassName = ClassName::new("sldtxt");

value_map! {
    /// Bounds and keyboard step of a slider.
    pub struct SliderProps / SliderPropsObject {
        key_scale: f64,
        max: f64,
        min: f64,
    }
}

// ---------------------------------------------------------------------------
// SliderController
// ---------------------------------------------------------------------------

struct SliderInner {
    element: Element,
    track: Element,
    knob: Element,
    value: Observable<f64>,
    props: SliderProps,
    view_props: ViewProps,
    scope: RefCell<BindingScope>,
}

impl SliderInner {
    fn update(&self) {
        let (min, max) = (self.props.min.get(), self.props.max.get());
        let pct = if max > min {
            map_range(constrain_range(self.value.get(), min, max), min, max, 0.0, 100.0)
        } else {
            0.0
        };
        self.knob.set_style("width", &format!("{pct}%"));
    }

    fn on_pointer(&self, ev: &DomEvent, options: ChangeOptions) {
        let Some(ratio) = ev.ratio else {
            return;
        };
        let (min, max) = (self.props.min.get(), self.props.max.get());
        let next = map_range(ratio.clamp(0.0, 1.0), 0.0, 1.0, min, max);
        self.value.set_with_options(next, options);
    }

    fn on_key_down(&self, ev: &DomEvent) {
        let Some(dir) = arrow_direction(ev.key.as_deref(), true) else {
            return;
        };
        let step = self.props.key_scale.get() * step_multiplier(ev.shift_key, ev.alt_key);
        self.value
            .set_with_options(self.value.get() + dir * step, ChangeOptions::intermediate());
    }

    fn on_key_up(&self, ev: &DomEvent) {
        if arrow_direction(ev.key.as_deref(), true).is_some() {
            self.value
                .set_with_options(self.value.get(), ChangeOptions::forced());
        }
    }
}

/// A horizontal slider between `props.min` and `props.max`.
#[derive(Clone)]
pub struct SliderController {
    inner: Rc<SliderInner>,
}

impl SliderController {
    pub fn new(
        doc: &Document,
        props: SliderProps,
        value: Observable<f64>,
        view_props: ViewProps,
    ) -> Self {
        let element = doc.create_element("div");
        element.add_class(&SLIDER_CLASS.block());
        let track = doc.create_element("div");
        track.add_class(&SLIDER_CLASS.elem("t"));
        element.append_child(&track);
        let knob = doc.create_element("div");
        knob.add_class(&SLIDER_CLASS.elem("k"));
        track.append_child(&knob);

        let mut scope = BindingScope::new();
        scope.hold_all(bind_class_modifier(&view_props, &element));
        scope.hold(bind_tab_index(&view_props, &track));

        let inner = Rc::new(SliderInner {
            element,
            track,
            knob,
            value,
            props,
            view_props,
            scope: RefCell::new(BindingScope::new()),
        });

        for source in [&inner.value, &inner.props.min, &inner.props.max] {
            let weak = Rc::downgrade(&inner);
            scope.hold(source.subscribe(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.update();
                }
            }));
        }

        let pointer_handlers = [
            (EventKind::PointerDown, ChangeOptions::intermediate()),
            (EventKind::PointerMove, ChangeOptions::intermediate()),
            (EventKind::PointerUp, ChangeOptions::forced()),
        ];
        for (kind, options) in pointer_handlers {
            let weak = Rc::downgrade(&inner);
            inner.track.add_event_listener(kind, move |ev| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_pointer(ev, options);
                }
            });
        }
        let weak = Rc::downgrade(&inner);
        inner.track.add_event_listener(EventKind::KeyDown, move |ev| {
            if let Some(inner) = weak.upgrade() {
                inner.on_key_down(ev);
            }
        });
        let weak = Rc::downgrade(&inner);
        inner.track.add_event_listener(EventKind::KeyUp, move |ev| {
            if let Some(inner) = weak.upgrade() {
                inner.on_key_up(ev);
            }
        });

        *inner.scope.borrow_mut() = scope;
        inner.update();
        Self { inner }
    }

    #[must_use]
    pub fn value(&self) -> &Observable<f64> {
        &self.inner.value
    }

    #[must_use]
    pub fn props(&self) -> &SliderProps {
        &self.inner.props
    }

    #[must_use]
    pub fn track_element(&self) -> &Element {
        &self.inner.track
    }

    #[must_use]
    pub fn knob_element(&self) -> &Element {
        &self.inner.knob
    }
}

impl ValueController for SliderController {
    fn element(&self) -> &Element {
        &self.inner.element
    }

    fn view_props(&self) -> &ViewProps {
        &self.inner.view_props
    }

    fn kind(&self) -> ValueControllerKind {
        ValueControllerKind::Slider
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for SliderController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliderController")
            .field("value", &self.inner.value)
            .field("props", &self.inner.props)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// SliderTextController
// ---------------------------------------------------------------------------

struct SliderTextInner {
    element: Element,
    slider: SliderController,
    text: NumberTextController,
}

/// A slider and a number text field editing the same value.
#[derive(Clone)]
pub struct SliderTextController {
    inner: Rc<SliderTextInner>,
}

impl SliderTextController {
    pub fn new(
        doc: &Document,
        parser: Parser<f64>,
        slider_props: SliderProps,
        text_props: NumberTextProps,
        value: Observable<f64>,
        view_props: ViewProps,
    ) -> Self {
        let element = doc.create_element("div");
        element.add_class(&SLIDER_TEXT_CLASS.block());

        let slider = SliderController::new(doc, slider_props, value.clone(), view_props.clone());
        let slider_elem = doc.create_element("div");
        slider_elem.add_class(&SLIDER_TEXT_CLASS.elem("s"));
        slider_elem.append_child(slider.element());
        element.append_child(&slider_elem);

        let text = NumberTextController::new(doc, parser, text_props, value, view_props);
        let text_elem = doc.create_element("div");
        text_elem.add_class(&SLIDER_TEXT_CLASS.elem("t"));
        text_elem.append_child(text.element());
        element.append_child(&text_elem);

        Self {
            inner: Rc::new(SliderTextInner {
                element,
                slider,
                text,
            }),
        }
    }

    #[must_use]
    pub fn value(&self) -> &Observable<f64> {
        self.inner.slider.value()
    }

    #[must_use]
    pub fn slider(&self) -> &SliderController {
        &self.inner.slider
    }

    #[must_use]
    pub fn text(&self) -> &NumberTextController {
        &self.inner.text
    }

    #[must_use]
    pub fn min(&self) -> &Observable<f64> {
        &self.inner.slider.props().min
    }

    #[must_use]
    pub fn max(&self) -> &Observable<f64> {
        &self.inner.slider.props().max
    }
}

impl ValueController for SliderTextController {
    fn element(&self) -> &Element {
        &self.inner.element
    }

    fn view_props(&self) -> &ViewProps {
        self.inner.slider.view_props()
    }

    fn kind(&self) -> ValueControllerKind {
        ValueControllerKind::SliderText
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for SliderTextController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliderTextController")
            .field("slider", &self.inner.slider)
            .field("text", &self.inner.text)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twiddle_runtime::converter::{create_number_formatter, parse_number};
    use twiddle_runtime::{Constraint, DefiniteRangeConstraint};

    use crate::controller::NumberTextPropsObject;

    fn props(min: f64, max: f64) -> SliderProps {
        SliderProps::from_object(SliderPropsObject {
            key_scale: 1.0,
            max,
            min,
        })
    }

    #[test]
    fn knob_width_tracks_value() {
        let value = Observable::new(25.0);
        let c = SliderController::new(&Document::new(), props(0.0, 100.0), value.clone(), ViewProps::default());
        assert_eq!(c.knob_element().style("width").as_deref(), Some("25%"));
        value.set(150.0);
        assert_eq!(c.knob_element().style("width").as_deref(), Some("100%"));
        c.props().max.set(300.0);
        assert_eq!(c.knob_element().style("width").as_deref(), Some("50%"));
    }

    #[test]
    fn pointer_sets_value_and_commits_on_release() {
        let value = Observable::new(0.0);
        let c = SliderController::new(&Document::new(), props(0.0, 10.0), value.clone(), ViewProps::default());
        let lasts = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&lasts);
        let _sub = value.subscribe_change(move |ev| l.borrow_mut().push((ev.raw_value, ev.options.last)));
        let track = c.track_element();
        track.dispatch_event(&DomEvent::pointer(EventKind::PointerDown, 0.5));
        track.dispatch_event(&DomEvent::pointer(EventKind::PointerMove, 1.5));
        track.dispatch_event(&DomEvent::pointer(EventKind::PointerUp, 1.0));
        assert_eq!(*lasts.borrow(), vec![(5.0, false), (10.0, false), (10.0, true)]);
    }

    #[test]
    fn arrow_keys_use_key_scale() {
        let value = Observable::new(5.0);
        let c = SliderController::new(&Document::new(), props(0.0, 10.0), value.clone(), ViewProps::default());
        c.track_element().dispatch_event(&DomEvent::key_down("ArrowRight"));
        assert_eq!(value.get(), 6.0);
        c.track_element()
            .dispatch_event(&DomEvent::key_down("ArrowLeft").with_alt());
        assert!((value.get() - 5.9).abs() < 1e-9);
    }

    #[test]
    fn bounds_shared_with_range_constraint() {
        let drc = Rc::new(DefiniteRangeConstraint::new(0.0, 10.0));
        let value = Observable::new(5.0).with_constraint(Rc::clone(&drc) as Rc<dyn Constraint<f64>>);
        let c = SliderTextController::new(
            &Document::new(),
            Rc::new(parse_number),
            SliderProps {
                key_scale: Observable::new(1.0),
                max: drc.max().clone(),
                min: drc.min().clone(),
            },
            NumberTextProps::from_object(NumberTextPropsObject {
                formatter: create_number_formatter(0),
                key_scale: 1.0,
                pointer_scale: 0.1,
            }),
            value.clone(),
            ViewProps::default(),
        );
        c.max().set(20.0);
        value.set(15.0);
        assert_eq!(value.get(), 15.0);
        assert_eq!(c.slider().knob_element().style("width").as_deref(), Some("75%"));
        assert_eq!(c.text().input_element().value(), "15");
        assert!(c.element().query_class("tp-sldv").is_some());
        assert!(c.element().query_class("tp-txtv").is_some());
    }
}
