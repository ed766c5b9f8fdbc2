#![forbid(unsafe_code)]

//! Ordered synchronous event emitter with RAII subscriptions.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Handler<E> = dyn Fn(&E);

/// Fan-out of events of type `E` to subscribed handlers.
///
/// Handlers run synchronously inside [`emit`](Self::emit), in the order they
/// were registered. Cloning an emitter shares its handler list.
pub struct Emitter<E> {
    handlers: Rc<RefCell<Vec<Weak<Handler<E>>>>>,
}

impl<E> Clone for Emitter<E> {
    fn clone(&self) -> Self {
        Self {
            handlers: Rc::clone(&self.handlers),
        }
    }
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self {
            handlers: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<E: 'static> Emitter<E> {
    /// Create an emitter with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. It stays registered while the returned
    /// [`Subscription`] is alive.
    #[must_use = "dropping the subscription unregisters the handler"]
    pub fn on(&self, handler: impl Fn(&E) + 'static) -> Subscription {
        let handler: Rc<Handler<E>> = Rc::new(handler);
        self.handlers.borrow_mut().push(Rc::downgrade(&handler));
        Subscription::new(handler)
    }

    /// Deliver `event` to every live handler.
    ///
    /// The handler list is snapshotted first, so handlers may subscribe,
    /// unsubscribe or emit again without invalidating this dispatch.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Weak<Handler<E>>> = {
            let mut handlers = self.handlers.borrow_mut();
            handlers.retain(|h| h.strong_count() > 0);
            handlers.clone()
        };
        for weak in snapshot {
            if let Some(handler) = weak.upgrade() {
                handler(event);
            }
        }
    }

    /// Number of live handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers
            .borrow()
            .iter()
            .filter(|h| h.strong_count() > 0)
            .count()
    }
}

impl<E> fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("handlers", &self.handlers.borrow().len())
            .finish()
    }
}

/// RAII guard for a registered handler.
///
/// Dropping the guard releases the only strong reference to the handler, so
/// the emitter skips and prunes it on the next dispatch.
#[must_use = "dropping the subscription unregisters the handler"]
pub struct Subscription {
    _handler: Option<Box<dyn Any>>,
}

impl Subscription {
    pub(crate) fn new<H: ?Sized + 'static>(handler: Rc<H>) -> Self {
        Self {
            _handler: Some(Box::new(handler)),
        }
    }

    /// A subscription that holds nothing.
    pub fn empty() -> Self {
        Self { _handler: None }
    }

    /// One guard releasing all of `subs` together.
    pub fn merge(subs: impl IntoIterator<Item = Subscription>) -> Self {
        let subs: Vec<Subscription> = subs.into_iter().collect();
        Self {
            _handler: Some(Box::new(subs)),
        }
    }

    /// Unregister the handler now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self._handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn handlers_run_in_registration_order() {
        let emitter = Emitter::<u32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let l1 = Rc::clone(&log);
        let _a = emitter.on(move |v| l1.borrow_mut().push(("a", *v)));
        let l2 = Rc::clone(&log);
        let _b = emitter.on(move |v| l2.borrow_mut().push(("b", *v)));

        emitter.emit(&7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn dropped_subscription_stops_delivery() {
        let emitter = Emitter::<()>::new();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let sub = emitter.on(move |_| c.set(c.get() + 1));
        emitter.emit(&());
        sub.unsubscribe();
        emitter.emit(&());
        assert_eq!(count.get(), 1);
        assert_eq!(emitter.handler_count(), 0);
    }

    #[test]
    fn handler_may_emit_reentrantly() {
        let emitter = Emitter::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let inner = emitter.clone();
        let s = Rc::clone(&seen);
        let _sub = emitter.on(move |v| {
            s.borrow_mut().push(*v);
            if *v > 0 {
                inner.emit(&(v - 1));
            }
        });
        emitter.emit(&2);
        assert_eq!(*seen.borrow(), vec![2, 1, 0]);
    }

    #[test]
    fn empty_subscription_is_inert() {
        let sub = Subscription::empty();
        assert!(format!("{sub:?}").contains("active: false"));
    }

    #[test]
    fn merged_subscriptions_release_together() {
        let emitter = Emitter::<u32>::new();
        let hits = Rc::new(Cell::new(0));
        let h1 = Rc::clone(&hits);
        let h2 = Rc::clone(&hits);
        let merged = Subscription::merge([
            emitter.on(move |_| h1.set(h1.get() + 1)),
            emitter.on(move |_| h2.set(h2.get() + 1)),
        ]);
        emitter.emit(&1);
        assert_eq!(hits.get(), 2);
        drop(merged);
        emitter.emit(&2);
        assert_eq!(hits.get(), 2);
        assert_eq!(emitter.handler_count(), 0);
    }
}
