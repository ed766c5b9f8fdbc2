#![forbid(unsafe_code)]

//! Simulated user input.
//!
//! Each helper changes the form state an element would have after the
//! gesture, then dispatches the events a browser would fire for it.

use twiddle_dom::{DomEvent, Element, EventKind};

/// First descendant of `root` carrying `class`.
///
/// # Panics
///
/// When no descendant has the class.
#[track_caller]
#[must_use]
pub fn find(root: &Element, class: &str) -> Element {
    match root.query_class(class) {
        Some(elem) => elem,
        None => panic!("no element with class `{class}` in:\n{}", root.outer_html()),
    }
}

/// Replace the text of a field and commit it.
pub fn type_text(input: &Element, text: &str) {
    input.set_value(text);
    input.dispatch(EventKind::Input);
    input.dispatch(EventKind::Change);
}

pub fn set_checked(input: &Element, checked: bool) {
    input.set_checked(checked);
    input.dispatch(EventKind::Change);
}

/// Pick the option at `index` of a select box.
pub fn select_option(select: &Element, index: usize) {
    select.set_value(&index.to_string());
    select.dispatch(EventKind::Change);
}

/// Press on the track at `from`, move to `to` and release. Positions are
/// fractions of the track width.
pub fn drag_slider(track: &Element, from: f64, to: f64) {
    track.dispatch_event(&DomEvent::pointer(EventKind::PointerDown, from));
    track.dispatch_event(&DomEvent::pointer(EventKind::PointerMove, to));
    track.dispatch_event(&DomEvent::pointer(EventKind::PointerUp, to));
}

/// Press and release a key.
pub fn press_key(elem: &Element, key: &str) {
    elem.dispatch_event(&DomEvent::key_down(key));
    elem.dispatch_event(&DomEvent::key_up(key));
}

pub fn click(elem: &Element) {
    elem.click();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use twiddle_dom::Document;

    #[test]
    fn type_text_commits_with_change() {
        let input = Document::new().create_element("input");
        let commits = Rc::new(Cell::new(0));
        let seen = Rc::clone(&commits);
        input.add_event_listener(EventKind::Change, move |_| seen.set(seen.get() + 1));
        type_text(&input, "42");
        assert_eq!(input.value(), "42");
        assert_eq!(commits.get(), 1);
    }

    #[test]
    fn drag_sends_press_move_release() {
        let track = Document::new().create_element("div");
        let kinds = Rc::new(std::cell::RefCell::new(Vec::new()));
        for kind in [EventKind::PointerDown, EventKind::PointerMove, EventKind::PointerUp] {
            let kinds = Rc::clone(&kinds);
            track.add_event_listener(kind, move |ev| kinds.borrow_mut().push((ev.kind, ev.ratio)));
        }
        drag_slider(&track, 0.25, 0.75);
        assert_eq!(
            *kinds.borrow(),
            vec![
                (EventKind::PointerDown, Some(0.25)),
                (EventKind::PointerMove, Some(0.75)),
                (EventKind::PointerUp, Some(0.75)),
            ]
        );
    }

    #[test]
    #[should_panic(expected = "no element with class")]
    fn find_reports_missing_class() {
        let root = Document::new().create_element("div");
        let _ = find(&root, "tp-none");
    }
}
