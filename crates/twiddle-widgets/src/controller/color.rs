#![forbid(unsafe_code)]

//! Color controllers: a swatch next to a text field, plus an alpha palette
//! when the bound color carries alpha.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use twiddle_dom::{Document, DomEvent, Element, EventKind};
use twiddle_runtime::converter::{Formatter, map_range};
use twiddle_runtime::{BindingScope, ChangeOptions, Observable, ViewProps};
use twiddle_style::{ClassName, Color};

use super::text::TextController;
use super::{Parser, ValueController, ValueControllerKind};
use crate::reactive::{bind_class_modifier, bind_disabled};

const SWATCH_TEXT_CLASS: ClassName = ClassName::new("colswtxt");
const SWATCH_CLASS: ClassName = ClassName::new("colsw");
const PALETTE_CLASS: ClassName = ClassName::new("apl");

// ---------------------------------------------------------------------------
// APaletteView
// ---------------------------------------------------------------------------

struct PaletteInner {
    element: Element,
    color: Element,
    marker: Element,
    preview: Element,
    value: Observable<Color>,
}

impl PaletteInner {
    fn update(&self) {
        let c = self.value.get();
        let left = Color::rgba(c.r(), c.g(), c.b(), 0.0);
        let right = Color::rgba(c.r(), c.g(), c.b(), 1.0);
        self.color.set_style(
            "background",
            &format!(
                "linear-gradient(to right,{},{})",
                left.to_functional_rgba_string(),
                right.to_functional_rgba_string()
            ),
        );
        self.preview
            .set_style("background-color", &c.to_functional_rgba_string());
        let pct = map_range(c.alpha(), 0.0, 1.0, 0.0, 100.0);
        self.marker.set_style("left", &format!("{pct}%"));
    }

    fn on_pointer(&self, ev: &DomEvent, options: ChangeOptions) {
        if let Some(ratio) = ev.ratio {
            let next = self.value.get().with_alpha(ratio);
            self.value.set_with_options(next, options);
        }
    }
}

/// Alpha palette: a gradient bar with a marker at the current alpha.
#[derive(Clone)]
pub struct APaletteView {
    inner: Rc<PaletteInner>,
    _sub: Rc<BindingScope>,
}

impl APaletteView {
    pub fn new(doc: &Document, value: Observable<Color>) -> Self {
        let element = doc.create_element("div");
        element.add_class(&PALETTE_CLASS.block());
        element.set_tab_index(Some(0));
        let bar = doc.create_element("div");
        bar.add_class(&PALETTE_CLASS.elem("b"));
        element.append_child(&bar);
        let color = doc.create_element("div");
        color.add_class(&PALETTE_CLASS.elem("c"));
        bar.append_child(&color);
        let marker = doc.create_element("div");
        marker.add_class(&PALETTE_CLASS.elem("m"));
        element.append_child(&marker);
        let preview = doc.create_element("div");
        preview.add_class(&PALETTE_CLASS.elem("p"));
        marker.append_child(&preview);

        let inner = Rc::new(PaletteInner {
            element,
            color,
            marker,
            preview,
            value,
        });

        let mut scope = BindingScope::new();
        let weak = Rc::downgrade(&inner);
        scope.subscribe(&inner.value, move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.update();
            }
        });
        let pointer_handlers = [
            (EventKind::PointerDown, ChangeOptions::intermediate()),
            (EventKind::PointerMove, ChangeOptions::intermediate()),
            (EventKind::PointerUp, ChangeOptions::forced()),
        ];
        for (kind, options) in pointer_handlers {
            let weak = Rc::downgrade(&inner);
            inner.element.add_event_listener(kind, move |ev| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_pointer(ev, options);
                }
            });
        }

        inner.update();
        Self {
            inner,
            _sub: Rc::new(scope),
        }
    }

    #[must_use]
    pub fn element(&self) -> &Element {
        &self.inner.element
    }

    #[must_use]
    pub fn marker_element(&self) -> &Element {
        &self.inner.marker
    }

    #[must_use]
    pub fn preview_element(&self) -> &Element {
        &self.inner.preview
    }
}

impl fmt::Debug for APaletteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("APaletteView")
            .field("value", &self.inner.value)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// ColorSwatchTextController
// ---------------------------------------------------------------------------

struct ColorInner {
    element: Element,
    swatch_color: Element,
    text: TextController<Color>,
    palette: Option<APaletteView>,
    supports_alpha: bool,
    _scope: BindingScope,
}

/// Edits a color as text, with a swatch preview.
#[derive(Clone)]
pub struct ColorSwatchTextController {
    inner: Rc<ColorInner>,
}

impl ColorSwatchTextController {
    pub fn new(
        doc: &Document,
        formatter: Formatter<Color>,
        supports_alpha: bool,
        value: Observable<Color>,
        view_props: ViewProps,
    ) -> Self {
        let element = doc.create_element("div");
        element.add_class(&SWATCH_TEXT_CLASS.block());

        let swatch_wrapper = doc.create_element("div");
        swatch_wrapper.add_class(&SWATCH_TEXT_CLASS.elem("s"));
        element.append_child(&swatch_wrapper);
        let swatch = doc.create_element("div");
        swatch.add_class(&SWATCH_CLASS.block());
        swatch_wrapper.append_child(&swatch);
        let swatch_color = doc.create_element("div");
        swatch_color.add_class(&SWATCH_CLASS.elem("sw"));
        swatch.append_child(&swatch_color);
        let button = doc.create_element("button");
        button.add_class(&SWATCH_CLASS.elem("b"));
        swatch.append_child(&button);

        let parser: Parser<Color> = Rc::new(move |text| {
            Color::parse(text).map(|c| if supports_alpha { c } else { c.with_alpha(1.0) })
        });
        let text = TextController::new(
            doc,
            parser,
            Observable::new(formatter),
            value.clone(),
            view_props.clone(),
        );
        let text_wrapper = doc.create_element("div");
        text_wrapper.add_class(&SWATCH_TEXT_CLASS.elem("t"));
        text_wrapper.append_child(text.element());
        element.append_child(&text_wrapper);

        let palette = supports_alpha.then(|| {
            let palette = APaletteView::new(doc, value.clone());
            element.append_child(palette.element());
            palette
        });

        let mut scope = BindingScope::new();
        scope.hold_all(bind_class_modifier(&view_props, &swatch));
        scope.hold(bind_disabled(&view_props, &button));
        let sw = swatch_color.clone();
        scope.bind_value(&value, move |c| {
            sw.set_style("background-color", &c.to_functional_rgba_string());
        });

        Self {
            inner: Rc::new(ColorInner {
                element,
                swatch_color,
                text,
                palette,
                supports_alpha,
                _scope: scope,
            }),
        }
    }

    #[must_use]
    pub fn value(&self) -> &Observable<Color> {
        self.inner.text.value()
    }

    #[must_use]
    pub fn text(&self) -> &TextController<Color> {
        &self.inner.text
    }

    #[must_use]
    pub fn swatch_color_element(&self) -> &Element {
        &self.inner.swatch_color
    }

    #[must_use]
    pub fn palette(&self) -> Option<&APaletteView> {
        self.inner.palette.as_ref()
    }

    #[must_use]
    pub fn supports_alpha(&self) -> bool {
        self.inner.supports_alpha
    }
}

impl ValueController for ColorSwatchTextController {
    fn element(&self) -> &Element {
        &self.inner.element
    }

    fn view_props(&self) -> &ViewProps {
        self.inner.text.view_props()
    }

    fn kind(&self) -> ValueControllerKind {
        ValueControllerKind::ColorSwatchText
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for ColorSwatchTextController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorSwatchTextController")
            .field("value", self.value())
            .field("supports_alpha", &self.inner.supports_alpha)
            .finish_non_exhaustive()
    }
}
