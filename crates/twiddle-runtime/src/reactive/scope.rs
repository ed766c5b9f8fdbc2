#![forbid(unsafe_code)]

//! Subscription lifecycle helpers.
//!
//! Views bind observables to their elements with [`bind_value`], which runs
//! the callback once with the current value and again on every change. A
//! [`BindingScope`] collects the resulting subscriptions so that dropping (or
//! clearing) the scope detaches the view in one step.
//!
//! # Invariants
//!
//! 1. Subscriptions are released when the scope is dropped or cleared.
//! 2. After release, no callback registered through this scope fires.
//! 3. `binding_count()` equals the number of held subscriptions.

use super::emitter::Subscription;
use super::observable::Observable;

// ---------------------------------------------------------------------------
// bind_value
// ---------------------------------------------------------------------------

/// Run `apply` with the current value now and on every later change.
#[must_use = "dropping the subscription unregisters the callback"]
pub fn bind_value<T: Clone + 'static>(
    source: &Observable<T>,
    apply: impl Fn(&T) + 'static,
) -> Subscription {
    source.with(|v| apply(v));
    source.subscribe(apply)
}

// ---------------------------------------------------------------------------
// BindingScope
// ---------------------------------------------------------------------------

/// Collects subscriptions owned by one view or controller.
#[derive(Default)]
pub struct BindingScope {
    subscriptions: Vec<Subscription>,
}

impl BindingScope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `sub` alive until the scope is dropped or cleared.
    pub fn hold(&mut self, sub: Subscription) {
        self.subscriptions.push(sub);
    }

    /// Keep every subscription in `subs` alive.
    pub fn hold_all(&mut self, subs: impl IntoIterator<Item = Subscription>) {
        self.subscriptions.extend(subs);
    }

    /// Subscribe to later changes of `source`.
    pub fn subscribe<T: Clone + 'static>(
        &mut self,
        source: &Observable<T>,
        callback: impl Fn(&T) + 'static,
    ) -> &mut Self {
        self.subscriptions.push(source.subscribe(callback));
        self
    }

    /// Apply `source` now and on every later change.
    pub fn bind_value<T: Clone + 'static>(
        &mut self,
        source: &Observable<T>,
        apply: impl Fn(&T) + 'static,
    ) -> &mut Self {
        self.subscriptions.push(bind_value(source, apply));
        self
    }

    /// Number of held subscriptions.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release all subscriptions. The scope stays usable.
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}

impl std::fmt::Debug for BindingScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingScope")
            .field("binding_count", &self.subscriptions.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn bind_value_applies_immediately_and_on_change() {
        let obs = Observable::new(3);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = bind_value(&obs, move |v| s.borrow_mut().push(*v));
        obs.set(4);
        assert_eq!(*seen.borrow(), vec![3, 4]);
    }

    #[test]
    fn scope_holds_subscriptions() {
        let obs = Observable::new(0);
        let count = Rc::new(Cell::new(0));
        let mut scope = BindingScope::new();
        let c = Rc::clone(&count);
        scope.subscribe(&obs, move |_| c.set(c.get() + 1));
        assert_eq!(scope.binding_count(), 1);

        obs.set(1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn scope_drop_releases_subscriptions() {
        let obs = Observable::new(0);
        let count = Rc::new(Cell::new(0));
        {
            let mut scope = BindingScope::new();
            let c = Rc::clone(&count);
            scope.subscribe(&obs, move |_| c.set(c.get() + 1));
            obs.set(1);
        }
        obs.set(2);
        assert_eq!(count.get(), 1);
        assert_eq!(obs.subscriber_count(), 0);
    }

    #[test]
    fn scope_clear_releases_and_is_reusable() {
        let obs = Observable::new(0);
        let count = Rc::new(Cell::new(0));
        let mut scope = BindingScope::new();
        let c1 = Rc::clone(&count);
        scope.bind_value(&obs, move |_| c1.set(c1.get() + 1));
        assert_eq!(count.get(), 1);

        scope.clear();
        assert!(scope.is_empty());
        obs.set(1);
        assert_eq!(count.get(), 1);

        let c2 = Rc::clone(&count);
        scope.subscribe(&obs, move |_| c2.set(c2.get() + 10));
        obs.set(2);
        assert_eq!(count.get(), 11);
    }

    #[test]
    fn scope_hold_external_subscription() {
        let obs = Observable::new(0);
        let count = Rc::new(Cell::new(0));
        let mut scope = BindingScope::new();
        let c = Rc::clone(&count);
        scope.hold(obs.subscribe(move |_| c.set(c.get() + 1)));
        obs.set(1);
        assert_eq!(count.get(), 1);
        drop(scope);
        obs.set(2);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn scope_debug_format() {
        let mut scope = BindingScope::new();
        let obs = Observable::new(0);
        scope.subscribe(&obs, |_| {});
        assert_eq!(format!("{scope:?}"), "BindingScope { binding_count: 1 }");
    }
}
