#![forbid(unsafe_code)]

//! Element nodes.
//!
//! An [`Element`] is a cheap handle (`Rc`) to shared node state. Parents own
//! their children; children hold a weak back-reference.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | `remove_child` with a non-child | No-op, returns `false` |
//! | Listener mutates the element it listens on | Allowed; no borrow is held during dispatch |
//! | `click()` on a disabled element | No listeners run |

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::event::{DomEvent, EventKind};

static LISTENER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies a registered event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn new() -> Self {
        Self(LISTENER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

type Listener = Rc<dyn Fn(&DomEvent)>;

struct ElementData {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    style: Vec<(String, String)>,
    text: String,
    value: String,
    checked: bool,
    disabled: bool,
    tab_index: Option<i32>,
    children: Vec<Element>,
    parent: Weak<RefCell<ElementData>>,
    listeners: Vec<(ListenerId, EventKind, Listener)>,
}

/// Handle to an element node.
#[derive(Clone)]
pub struct Element(Rc<RefCell<ElementData>>);

/// Non-owning element handle.
#[derive(Clone)]
pub struct WeakElement(Weak<RefCell<ElementData>>);

impl WeakElement {
    #[must_use]
    pub fn upgrade(&self) -> Option<Element> {
        self.0.upgrade().map(Element)
    }
}

impl fmt::Debug for WeakElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakElement")
            .field("alive", &(self.0.strong_count() > 0))
            .finish()
    }
}

impl Element {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(ElementData {
            tag: tag.to_owned(),
            classes: Vec::new(),
            attributes: Vec::new(),
            style: Vec::new(),
            text: String::new(),
            value: String::new(),
            checked: false,
            disabled: false,
            tab_index: None,
            children: Vec::new(),
            parent: Weak::new(),
            listeners: Vec::new(),
        })))
    }

    #[must_use]
    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakElement {
        WeakElement(Rc::downgrade(&self.0))
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // ------------------------------------------------------------------
    // Classes
    // ------------------------------------------------------------------

    pub fn add_class(&self, class: &str) {
        let mut data = self.0.borrow_mut();
        if !data.classes.iter().any(|c| c == class) {
            data.classes.push(class.to_owned());
        }
    }

    pub fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|c| c != class);
    }

    /// Adds or removes `class` so that its presence equals `on`.
    pub fn toggle_class(&self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    #[must_use]
    pub fn class_list(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }

    // ------------------------------------------------------------------
    // Attributes and style
    // ------------------------------------------------------------------

    pub fn set_attribute(&self, name: &str, value: &str) {
        let mut data = self.0.borrow_mut();
        match data.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.to_owned(),
            None => data.attributes.push((name.to_owned(), value.to_owned())),
        }
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0
            .borrow()
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    pub fn remove_attribute(&self, name: &str) {
        self.0.borrow_mut().attributes.retain(|(n, _)| n != name);
    }

    /// Sets an inline style property. An empty value removes it.
    pub fn set_style(&self, property: &str, value: &str) {
        let mut data = self.0.borrow_mut();
        if value.is_empty() {
            data.style.retain(|(p, _)| p != property);
            return;
        }
        match data.style.iter_mut().find(|(p, _)| p == property) {
            Some(entry) => entry.1 = value.to_owned(),
            None => data.style.push((property.to_owned(), value.to_owned())),
        }
    }

    #[must_use]
    pub fn style(&self, property: &str) -> Option<String> {
        self.0
            .borrow()
            .style
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.clone())
    }

    // ------------------------------------------------------------------
    // Text and form state
    // ------------------------------------------------------------------

    /// Own text followed by the text of all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let data = self.0.borrow();
        let mut out = data.text.clone();
        for child in &data.children {
            out.push_str(&child.text_content());
        }
        out
    }

    /// Replaces all children with plain text.
    pub fn set_text_content(&self, text: &str) {
        let children = {
            let mut data = self.0.borrow_mut();
            data.text = text.to_owned();
            std::mem::take(&mut data.children)
        };
        for child in children {
            child.0.borrow_mut().parent = Weak::new();
        }
    }

    #[must_use]
    pub fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    pub fn set_value(&self, value: &str) {
        self.0.borrow_mut().value = value.to_owned();
    }

    #[must_use]
    pub fn checked(&self) -> bool {
        self.0.borrow().checked
    }

    pub fn set_checked(&self, checked: bool) {
        self.0.borrow_mut().checked = checked;
    }

    #[must_use]
    pub fn disabled(&self) -> bool {
        self.0.borrow().disabled
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.0.borrow_mut().disabled = disabled;
    }

    #[must_use]
    pub fn tab_index(&self) -> Option<i32> {
        self.0.borrow().tab_index
    }

    pub fn set_tab_index(&self, index: Option<i32>) {
        self.0.borrow_mut().tab_index = index;
    }

    // ------------------------------------------------------------------
    // Tree
    // ------------------------------------------------------------------

    /// Appends `child`, detaching it from any previous parent first.
    pub fn append_child(&self, child: &Element) {
        if child.ptr_eq(self) {
            return;
        }
        child.remove();
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child.clone());
    }

    /// Inserts `child` before the child at `index`, or appends when `index`
    /// is past the end.
    pub fn insert_child(&self, index: usize, child: &Element) {
        if child.ptr_eq(self) {
            return;
        }
        child.remove();
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        let mut data = self.0.borrow_mut();
        let index = index.min(data.children.len());
        data.children.insert(index, child.clone());
    }

    /// Returns `false` when `child` is not a child of this element.
    pub fn remove_child(&self, child: &Element) -> bool {
        let removed = {
            let mut data = self.0.borrow_mut();
            let before = data.children.len();
            data.children.retain(|c| !c.ptr_eq(child));
            before != data.children.len()
        };
        if removed {
            child.0.borrow_mut().parent = Weak::new();
        }
        removed
    }

    /// Detaches this element from its parent.
    pub fn remove(&self) {
        if let Some(parent) = self.parent() {
            parent.remove_child(self);
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<Element> {
        self.0.borrow().parent.upgrade().map(Element)
    }

    #[must_use]
    pub fn children(&self) -> Vec<Element> {
        self.0.borrow().children.clone()
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    #[must_use]
    pub fn child(&self, index: usize) -> Option<Element> {
        self.0.borrow().children.get(index).cloned()
    }

    /// First descendant (depth-first, excluding `self`) carrying `class`.
    #[must_use]
    pub fn query_class(&self, class: &str) -> Option<Element> {
        for child in self.children() {
            if child.has_class(class) {
                return Some(child);
            }
            if let Some(found) = child.query_class(class) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants carrying `class`, in document order.
    #[must_use]
    pub fn query_all_class(&self, class: &str) -> Vec<Element> {
        let mut out = Vec::new();
        self.collect_class(class, &mut out);
        out
    }

    fn collect_class(&self, class: &str, out: &mut Vec<Element>) {
        for child in self.children() {
            if child.has_class(class) {
                out.push(child.clone());
            }
            child.collect_class(class, out);
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub fn add_event_listener(
        &self,
        kind: EventKind,
        listener: impl Fn(&DomEvent) + 'static,
    ) -> ListenerId {
        let id = ListenerId::new();
        self.0
            .borrow_mut()
            .listeners
            .push((id, kind, Rc::new(listener)));
        id
    }

    /// Returns `false` when no listener with `id` is registered here.
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        let mut data = self.0.borrow_mut();
        let before = data.listeners.len();
        data.listeners.retain(|(lid, _, _)| *lid != id);
        before != data.listeners.len()
    }

    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.0
            .borrow()
            .listeners
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .count()
    }

    /// Runs every listener registered for `event.kind`.
    pub fn dispatch_event(&self, event: &DomEvent) {
        let listeners: Vec<Listener> = self
            .0
            .borrow()
            .listeners
            .iter()
            .filter(|(_, k, _)| *k == event.kind)
            .map(|(_, _, l)| Rc::clone(l))
            .collect();
        trace!(kind = ?event.kind, listeners = listeners.len(), "dispatch");
        for listener in listeners {
            listener(event);
        }
    }

    pub fn dispatch(&self, kind: EventKind) {
        self.dispatch_event(&DomEvent::new(kind));
    }

    /// Dispatches a click unless the element is disabled.
    pub fn click(&self) {
        if self.disabled() {
            return;
        }
        self.dispatch(EventKind::Click);
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    /// HTML-like dump of the subtree. Attribute order is insertion order.
    #[must_use]
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let data = self.0.borrow();
        out.push('<');
        out.push_str(&data.tag);
        if !data.classes.is_empty() {
            out.push_str(" class=\"");
            out.push_str(&escape(&data.classes.join(" ")));
            out.push('"');
        }
        for (name, value) in &data.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }
        if !data.style.is_empty() {
            let style: Vec<String> = data
                .style
                .iter()
                .map(|(p, v)| format!("{p}: {v}"))
                .collect();
            out.push_str(" style=\"");
            out.push_str(&escape(&style.join("; ")));
            out.push('"');
        }
        if !data.value.is_empty() {
            out.push_str(" value=\"");
            out.push_str(&escape(&data.value));
            out.push('"');
        }
        if data.checked {
            out.push_str(" checked");
        }
        if data.disabled {
            out.push_str(" disabled");
        }
        if let Some(index) = data.tab_index {
            out.push_str(&format!(" tabindex=\"{index}\""));
        }
        out.push('>');
        out.push_str(&escape(&data.text));
        for child in &data.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&data.tag);
        out.push('>');
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("Element")
            .field("tag", &data.tag)
            .field("classes", &data.classes)
            .field("children", &data.children.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn classes_are_deduplicated() {
        let e = Element::new("div");
        e.add_class("a");
        e.add_class("a");
        e.add_class("b");
        assert_eq!(e.class_list(), vec!["a", "b"]);
        e.toggle_class("a", false);
        assert!(!e.has_class("a"));
        e.toggle_class("c", true);
        assert_eq!(e.class_list(), vec!["b", "c"]);
    }

    #[test]
    fn append_moves_between_parents() {
        let a = Element::new("div");
        let b = Element::new("div");
        let child = Element::new("span");
        a.append_child(&child);
        b.append_child(&child);
        assert_eq!(a.child_count(), 0);
        assert_eq!(b.child_count(), 1);
        assert!(child.parent().is_some_and(|p| p.ptr_eq(&b)));
    }

    #[test]
    fn insert_child_clamps_index() {
        let parent = Element::new("div");
        let a = Element::new("a");
        let b = Element::new("b");
        let c = Element::new("c");
        parent.append_child(&a);
        parent.insert_child(0, &b);
        parent.insert_child(10, &c);
        let tags: Vec<String> = parent.children().iter().map(Element::tag).collect();
        assert_eq!(tags, vec!["b", "a", "c"]);
    }

    #[test]
    fn remove_detaches() {
        let parent = Element::new("div");
        let child = Element::new("span");
        parent.append_child(&child);
        child.remove();
        assert_eq!(parent.child_count(), 0);
        assert!(child.parent().is_none());
        assert!(!parent.remove_child(&child));
    }

    #[test]
    fn text_content_is_recursive() {
        let root = Element::new("div");
        root.set_text_content("a");
        let child = Element::new("span");
        child.set_text_content("b");
        root.append_child(&child);
        assert_eq!(root.text_content(), "ab");
        root.set_text_content("c");
        assert_eq!(root.child_count(), 0);
        assert_eq!(root.text_content(), "c");
    }

    #[test]
    fn query_by_class() {
        let root = Element::new("div");
        let mid = Element::new("div");
        let leaf = Element::new("input");
        leaf.add_class("x");
        mid.add_class("x");
        mid.append_child(&leaf);
        root.append_child(&mid);
        assert!(root.query_class("x").is_some_and(|e| e.ptr_eq(&mid)));
        assert_eq!(root.query_all_class("x").len(), 2);
        assert!(root.query_class("y").is_none());
    }

    #[test]
    fn listeners_run_in_order_and_can_be_removed() {
        let e = Element::new("button");
        let log = Rc::new(RefCell::new(Vec::new()));
        let l1 = Rc::clone(&log);
        let id = e.add_event_listener(EventKind::Click, move |_| l1.borrow_mut().push(1));
        let l2 = Rc::clone(&log);
        e.add_event_listener(EventKind::Click, move |_| l2.borrow_mut().push(2));
        e.click();
        assert_eq!(*log.borrow(), vec![1, 2]);
        assert!(e.remove_event_listener(id));
        e.click();
        assert_eq!(*log.borrow(), vec![1, 2, 2]);
    }

    #[test]
    fn listener_ids_are_unique() {
        let e = Element::new("div");
        let a = e.add_event_listener(EventKind::Click, |_| {});
        let b = e.add_event_listener(EventKind::Click, |_| {});
        assert_ne!(a, b);
    }

    #[test]
    fn disabled_elements_ignore_clicks() {
        let e = Element::new("button");
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        e.add_event_listener(EventKind::Click, move |_| h.set(h.get() + 1));
        e.set_disabled(true);
        e.click();
        assert_eq!(hits.get(), 0);
        e.set_disabled(false);
        e.click();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn listener_may_mutate_element() {
        let e = Element::new("input");
        let weak = e.downgrade();
        e.add_event_listener(EventKind::Change, move |_| {
            if let Some(e) = weak.upgrade() {
                e.set_value("changed");
                e.add_class("touched");
            }
        });
        e.dispatch(EventKind::Change);
        assert_eq!(e.value(), "changed");
        assert!(e.has_class("touched"));
    }

    #[test]
    fn outer_html_is_deterministic() {
        let e = Element::new("div");
        e.add_class("tp-v");
        e.set_attribute("title", "a\"b");
        e.set_style("width", "50%");
        let child = Element::new("span");
        child.set_text_content("<x>");
        e.append_child(&child);
        assert_eq!(
            e.outer_html(),
            "<div class=\"tp-v\" title=\"a&quot;b\" style=\"width: 50%\"><span>&lt;x&gt;</span></div>"
        );
    }

    #[test]
    fn empty_style_value_removes_property() {
        let e = Element::new("div");
        e.set_style("left", "10%");
        e.set_style("left", "");
        assert_eq!(e.style("left"), None);
    }
}
