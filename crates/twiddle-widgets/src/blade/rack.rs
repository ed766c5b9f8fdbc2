#![forbid(unsafe_code)]

//! Ordered container of child blades.
//!
//! A rack relays what happens inside its children as [`RackEvent`]s: binding
//! changes, monitor updates and folder folds. Events from nested racks are
//! re-emitted unchanged, so a handler on the root rack sees every binding in
//! the tree with the blade that produced it. `Add` and `Remove` stay local.
//!
//! # Invariants
//!
//! 1. Child order, element order and position classes agree after every
//!    `add` and `remove`.
//! 2. A removed child's relays are dropped before `remove` returns; later
//!    changes of that child reach no rack handler.
//! 3. A child that is disposed removes itself.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;
use twiddle_dom::Element;
use twiddle_runtime::{ChangeOptions, Emitter, Subscription, ViewProps};

use super::{BladeController, BladeKind, BladePosition};

/// Something that happened in a rack or below it.
#[derive(Clone)]
pub enum RackEvent {
    /// An input binding's value changed.
    InputChange {
        blade: Rc<dyn BladeController>,
        options: ChangeOptions,
    },
    /// A monitor binding read its target.
    MonitorUpdate { blade: Rc<dyn BladeController> },
    /// A folder was expanded or collapsed.
    Fold {
        blade: Rc<dyn BladeController>,
        expanded: bool,
    },
    Add {
        blade: Rc<dyn BladeController>,
        index: usize,
    },
    Remove { blade: Rc<dyn BladeController> },
}

impl RackEvent {
    /// The blade the event is about.
    #[must_use]
    pub fn blade(&self) -> &Rc<dyn BladeController> {
        match self {
            Self::InputChange { blade, .. }
            | Self::MonitorUpdate { blade }
            | Self::Fold { blade, .. }
            | Self::Add { blade, .. }
            | Self::Remove { blade } => blade,
        }
    }

    /// Whether the event bubbles to enclosing racks.
    #[must_use]
    pub fn bubbles(&self) -> bool {
        !matches!(self, Self::Add { .. } | Self::Remove { .. })
    }
}

impl fmt::Debug for RackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputChange { options, .. } => f
                .debug_struct("InputChange")
                .field("options", options)
                .finish_non_exhaustive(),
            Self::MonitorUpdate { .. } => f.debug_struct("MonitorUpdate").finish_non_exhaustive(),
            Self::Fold { expanded, .. } => f
                .debug_struct("Fold")
                .field("expanded", expanded)
                .finish_non_exhaustive(),
            Self::Add { index, .. } => f
                .debug_struct("Add")
                .field("index", index)
                .finish_non_exhaustive(),
            Self::Remove { .. } => f.debug_struct("Remove").finish_non_exhaustive(),
        }
    }
}

struct RackEntry {
    blade: Rc<dyn BladeController>,
    _relays: Vec<Subscription>,
}

struct RackInner {
    element: Element,
    view_props: ViewProps,
    children: RefCell<Vec<RackEntry>>,
    events: Emitter<RackEvent>,
    root: Cell<bool>,
}

/// Ordered child blades of a folder.
#[derive(Clone)]
pub struct Rack {
    inner: Rc<RackInner>,
}

impl Rack {
    /// A rack rendering its children into `element`. Children inherit
    /// `view_props` as their parent flags.
    #[must_use]
    pub fn new(element: Element, view_props: ViewProps) -> Self {
        Self {
            inner: Rc::new(RackInner {
                element,
                view_props,
                children: RefCell::new(Vec::new()),
                events: Emitter::new(),
                root: Cell::new(false),
            }),
        }
    }

    #[must_use]
    pub fn element(&self) -> &Element {
        &self.inner.element
    }

    #[must_use]
    pub fn view_props(&self) -> &ViewProps {
        &self.inner.view_props
    }

    /// Mark the rack as the top of a pane, which adds
    /// [`BladePosition::VERY_FIRST`] to its first child.
    pub fn set_root(&self, root: bool) {
        self.inner.root.set(root);
        self.update_positions();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.children.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.children.borrow().is_empty()
    }

    /// Snapshot of the children in order.
    #[must_use]
    pub fn children(&self) -> Vec<Rc<dyn BladeController>> {
        self.inner
            .children
            .borrow()
            .iter()
            .map(|e| Rc::clone(&e.blade))
            .collect()
    }

    #[must_use]
    pub fn index_of(&self, blade: &Rc<dyn BladeController>) -> Option<usize> {
        self.inner
            .children
            .borrow()
            .iter()
            .position(|e| Rc::ptr_eq(&e.blade, blade))
    }

    /// Insert `blade` at `index` (appended when `None` or out of range).
    pub fn add(&self, blade: Rc<dyn BladeController>, index: Option<usize>) {
        let len = self.len();
        let index = index.map_or(len, |i| i.min(len));
        blade.view_props().set_parent(Some(&self.inner.view_props));
        self.inner.element.insert_child(index, blade.element());
        let relays = self.relay(&blade);
        self.inner.children.borrow_mut().insert(
            index,
            RackEntry {
                blade: Rc::clone(&blade),
                _relays: relays,
            },
        );
        debug!(kind = blade.kind().name(), index, "blade added");
        self.update_positions();
        self.inner.events.emit(&RackEvent::Add { blade, index });
    }

    /// Detach `blade`. Returns `false` when it is not a child.
    pub fn remove(&self, blade: &Rc<dyn BladeController>) -> bool {
        let entry = {
            let mut children = self.inner.children.borrow_mut();
            let Some(pos) = children.iter().position(|e| Rc::ptr_eq(&e.blade, blade)) else {
                return false;
            };
            children.remove(pos)
        };
        self.inner.element.remove_child(entry.blade.element());
        entry.blade.view_props().set_parent(None);
        debug!(kind = entry.blade.kind().name(), "blade removed");
        let blade = Rc::clone(&entry.blade);
        drop(entry);
        self.update_positions();
        self.inner.events.emit(&RackEvent::Remove { blade });
        true
    }

    /// Dispose every child. Disposed children remove themselves.
    pub fn dispose_children(&self) {
        for child in self.children() {
            child.dispose();
        }
    }

    /// Observe events of this rack and, for bubbling kinds, of nested racks.
    #[must_use = "dropping the subscription unregisters the handler"]
    pub fn on_event(&self, handler: impl Fn(&RackEvent) + 'static) -> Subscription {
        self.inner.events.on(handler)
    }

    fn relay(&self, blade: &Rc<dyn BladeController>) -> Vec<Subscription> {
        let mut relays = Vec::new();
        let source: Weak<dyn BladeController> = Rc::downgrade(blade);
        match blade.kind() {
            BladeKind::InputBinding(b) => {
                let (events, source) = (self.inner.events.clone(), source.clone());
                relays.push(b.binding().on_change(Box::new(move |options: ChangeOptions| {
                    if let Some(blade) = source.upgrade() {
                        events.emit(&RackEvent::InputChange { blade, options });
                    }
                })));
            }
            BladeKind::MonitorBinding(b) => {
                let (events, source) = (self.inner.events.clone(), source.clone());
                relays.push(b.binding().on_change(Box::new(move |_: ChangeOptions| {
                    if let Some(blade) = source.upgrade() {
                        events.emit(&RackEvent::MonitorUpdate { blade });
                    }
                })));
            }
            BladeKind::Folder(folder) => {
                let (events, source) = (self.inner.events.clone(), source.clone());
                relays.push(folder.props().expanded.subscribe(move |expanded| {
                    if let Some(blade) = source.upgrade() {
                        events.emit(&RackEvent::Fold {
                            blade,
                            expanded: *expanded,
                        });
                    }
                }));
                let events = self.inner.events.clone();
                relays.push(folder.rack().on_event(move |ev| {
                    if ev.bubbles() {
                        events.emit(ev);
                    }
                }));
            }
            BladeKind::Label(_) | BladeKind::Separator | BladeKind::Custom => {}
        }

        let rack = Rc::downgrade(&self.inner);
        relays.push(blade.view_props().on_dispose(move || {
            if let (Some(inner), Some(blade)) = (rack.upgrade(), source.upgrade()) {
                Rack { inner }.remove(&blade);
            }
        }));
        relays
    }

    fn update_positions(&self) {
        let children = self.children();
        let last = children.len().saturating_sub(1);
        for (i, child) in children.iter().enumerate() {
            let mut positions = BladePosition::empty();
            positions.set(BladePosition::FIRST, i == 0);
            positions.set(BladePosition::LAST, i == last);
            positions.set(BladePosition::VERY_FIRST, i == 0 && self.inner.root.get());
            child.blade().set_positions(positions);
        }
    }
}

impl fmt::Debug for Rack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rack")
            .field("children", &self.len())
            .finish_non_exhaustive()
    }
}
