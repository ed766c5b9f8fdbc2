#![forbid(unsafe_code)]

//! Presentation flags shared by a view and its controller.
//!
//! # Invariants
//!
//! 1. `global_disabled == disabled || parent.global_disabled` after every
//!    write to either side.
//! 2. `disposed` goes from `false` to `true` at most once; `dispose()` on a
//!    disposed instance does nothing.
//! 3. A child keeps its parent alive; a parent only holds weak callbacks into
//!    its children.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::emitter::Subscription;
use super::observable::Observable;

crate::value_map! {
    /// Raw presentation flags.
    pub struct ViewPropsMap / ViewPropsObject {
        disabled: bool,
        hidden: bool,
        disposed: bool,
    }
}

impl Default for ViewPropsObject {
    fn default() -> Self {
        Self {
            disabled: false,
            hidden: false,
            disposed: false,
        }
    }
}

struct Inner {
    map: ViewPropsMap,
    global_disabled: Observable<bool>,
    parent: RefCell<Option<ViewProps>>,
    parent_sub: RefCell<Option<Subscription>>,
    _own_sub: Subscription,
}

impl Inner {
    fn recompute(&self) {
        let inherited = self
            .parent
            .borrow()
            .as_ref()
            .is_some_and(|p| p.global_disabled().get());
        self.global_disabled.set(self.map.disabled.get() || inherited);
    }
}

/// Shared `disabled` / `hidden` / `disposed` flags plus the derived
/// `global_disabled` flag.
#[derive(Clone)]
pub struct ViewProps {
    inner: Rc<Inner>,
}

impl Default for ViewProps {
    fn default() -> Self {
        Self::new(ViewPropsObject::default())
    }
}

impl ViewProps {
    /// Create flags from raw values.
    #[must_use]
    pub fn new(object: ViewPropsObject) -> Self {
        let map = ViewPropsMap::from_object(object);
        let global_disabled = Observable::new(map.disabled.get());
        let inner = Rc::new_cyclic(|weak: &Weak<Inner>| {
            let weak = weak.clone();
            let own_sub = map.disabled.subscribe(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.recompute();
                }
            });
            Inner {
                map,
                global_disabled,
                parent: RefCell::new(None),
                parent_sub: RefCell::new(None),
                _own_sub: own_sub,
            }
        });
        Self { inner }
    }

    /// The underlying value map.
    #[must_use]
    pub fn map(&self) -> &ViewPropsMap {
        &self.inner.map
    }

    #[must_use]
    pub fn disabled(&self) -> &Observable<bool> {
        &self.inner.map.disabled
    }

    #[must_use]
    pub fn hidden(&self) -> &Observable<bool> {
        &self.inner.map.hidden
    }

    #[must_use]
    pub fn disposed(&self) -> &Observable<bool> {
        &self.inner.map.disposed
    }

    /// Own `disabled` or any ancestor's.
    #[must_use]
    pub fn global_disabled(&self) -> &Observable<bool> {
        &self.inner.global_disabled
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.inner.map.disabled.set(disabled);
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.inner.map.hidden.set(hidden);
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.inner.map.disabled.get()
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.inner.map.hidden.get()
    }

    #[must_use]
    pub fn is_globally_disabled(&self) -> bool {
        self.inner.global_disabled.get()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.map.disposed.get()
    }

    /// Link to a container's flags, or unlink with `None`.
    pub fn set_parent(&self, parent: Option<&ViewProps>) {
        let sub = parent.map(|p| {
            let weak = Rc::downgrade(&self.inner);
            p.global_disabled().subscribe(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.recompute();
                }
            })
        });
        *self.inner.parent_sub.borrow_mut() = sub;
        *self.inner.parent.borrow_mut() = parent.cloned();
        self.inner.recompute();
    }

    /// The linked container's flags.
    #[must_use]
    pub fn parent(&self) -> Option<ViewProps> {
        self.inner.parent.borrow().clone()
    }

    /// Mark as disposed. Returns `false` when already disposed.
    pub fn dispose(&self) -> bool {
        if self.is_disposed() {
            return false;
        }
        self.inner.map.disposed.set(true);
        true
    }

    /// Call `callback` once the flags are disposed.
    #[must_use = "dropping the subscription unregisters the callback"]
    pub fn on_dispose(&self, callback: impl Fn() + 'static) -> Subscription {
        self.inner.map.disposed.subscribe(move |disposed| {
            if *disposed {
                callback();
            }
        })
    }

    /// Whether both handles refer to the same flags.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ViewProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewProps")
            .field("disabled", &self.is_disabled())
            .field("hidden", &self.is_hidden())
            .field("disposed", &self.is_disposed())
            .field("global_disabled", &self.is_globally_disabled())
            .finish()
    }
}
