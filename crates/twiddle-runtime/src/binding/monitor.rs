#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, error, trace};

use super::BindingHandle;
use super::input::Reader;
use super::target::BindingTarget;
use super::ticker::Ticker;
use crate::error::{BindingError, TargetError};
use crate::reactive::{BufferedValue, ChangeOptions, Subscription, create_pushed_buffer};

/// Everything a [`MonitorBinding`] is built from.
pub struct MonitorBindingConfig<T> {
    pub target: BindingTarget,
    pub reader: Reader<T>,
    pub value: BufferedValue<T>,
    pub ticker: Rc<dyn Ticker>,
}

struct Inner<T> {
    target: BindingTarget,
    reader: Reader<T>,
    value: BufferedValue<T>,
    ticker: Rc<dyn Ticker>,
    disposed: Cell<bool>,
    last_error: RefCell<Option<TargetError>>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl<T: Clone + 'static> Inner<T> {
    fn read(&self) -> Result<bool, BindingError> {
        if self.disposed.get() {
            return Err(BindingError::Disposed);
        }
        let raw = self.target.read()?;
        let value = (self.reader)(&raw);
        let next = self.value.with(|buffer| create_pushed_buffer(buffer, value));
        self.value.set(next);
        Ok(true)
    }
}

/// Read-only binding that records each read in a history buffer.
pub struct MonitorBinding<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for MonitorBinding<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> MonitorBinding<T> {
    /// Create the binding and read the target once.
    pub fn new(config: MonitorBindingConfig<T>) -> Result<Self, BindingError> {
        let inner = Rc::new(Inner {
            target: config.target,
            reader: config.reader,
            value: config.value,
            ticker: config.ticker,
            disposed: Cell::new(false),
            last_error: RefCell::new(None),
            subscriptions: RefCell::new(Vec::new()),
        });

        let weak: Weak<Inner<T>> = Rc::downgrade(&inner);
        let tick_sub = inner.ticker.on_tick(Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            trace!(key = %inner.target.key(), "monitor tick");
            if let Err(BindingError::Target(err)) = inner.read() {
                error!(key = %inner.target.key(), error = %err, "monitor read failed");
                *inner.last_error.borrow_mut() = Some(err);
            }
        }));
        inner.subscriptions.borrow_mut().push(tick_sub);

        inner.read()?;
        Ok(Self { inner })
    }

    #[must_use]
    pub fn value(&self) -> &BufferedValue<T> {
        &self.inner.value
    }

    #[must_use]
    pub fn target(&self) -> &BindingTarget {
        &self.inner.target
    }

    #[must_use]
    pub fn ticker(&self) -> Rc<dyn Ticker> {
        Rc::clone(&self.inner.ticker)
    }

    /// Most recent value.
    #[must_use]
    pub fn latest(&self) -> Option<T> {
        self.inner
            .value
            .with(|buffer| buffer.last().cloned().flatten())
    }

    pub fn read(&self) -> Result<bool, BindingError> {
        self.inner.read()
    }

    /// The last error raised by a tick-driven read, if any.
    pub fn take_error(&self) -> Option<TargetError> {
        self.inner.last_error.borrow_mut().take()
    }

    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        debug!(key = %self.inner.target.key(), "monitor binding disposed");
        self.inner.ticker.dispose();
        self.inner.subscriptions.borrow_mut().clear();
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }
}

impl<T: Clone + 'static> BindingHandle for MonitorBinding<T> {
    fn target(&self) -> &BindingTarget {
        &self.inner.target
    }

    fn ticker(&self) -> Rc<dyn Ticker> {
        MonitorBinding::ticker(self)
    }

    fn read(&self) -> Result<bool, BindingError> {
        MonitorBinding::read(self)
    }

    fn on_change(&self, callback: Box<dyn Fn(ChangeOptions)>) -> Subscription {
        self.inner
            .value
            .subscribe_change(move |event| callback(event.options))
    }

    fn dispose(&self) {
        MonitorBinding::dispose(self);
    }

    fn is_disposed(&self) -> bool {
        MonitorBinding::is_disposed(self)
    }
}

impl<T: fmt::Debug> fmt::Debug for MonitorBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorBinding")
            .field("target", &self.inner.target)
            .field("value", &self.inner.value)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::ManualTicker;
    use crate::converter::number_from_unknown;
    use crate::reactive::create_buffered_value;
    use crate::unknown::Object;
    use serde_json::json;

    fn monitor(obj: &Object, size: usize) -> (MonitorBinding<f64>, ManualTicker) {
        let ticker = ManualTicker::new();
        let binding = MonitorBinding::new(MonitorBindingConfig {
            target: BindingTarget::for_object(obj, "foo").read_only(),
            reader: Rc::new(number_from_unknown),
            value: create_buffered_value(size),
            ticker: Rc::new(ticker.clone()),
        })
        .unwrap();
        (binding, ticker)
    }

    #[test]
    fn reads_once_on_creation() {
        let obj = Object::from_json(json!({"foo": 7})).unwrap();
        let (binding, _ticker) = monitor(&obj, 3);
        assert_eq!(binding.value().get(), vec![None, None, Some(7.0)]);
        assert_eq!(binding.latest(), Some(7.0));
    }

    #[test]
    fn ticks_push_into_history() {
        let obj = Object::from_json(json!({"foo": 1})).unwrap();
        let (binding, ticker) = monitor(&obj, 2);
        obj.set("foo", 2);
        ticker.tick();
        obj.set("foo", 3);
        ticker.tick();
        assert_eq!(binding.value().get(), vec![Some(2.0), Some(3.0)]);
    }

    #[test]
    fn identical_reads_still_emit() {
        let obj = Object::from_json(json!({"foo": 1})).unwrap();
        let (binding, ticker) = monitor(&obj, 1);
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let _sub = binding.on_change(Box::new(move |_| c.set(c.get() + 1)));
        ticker.tick();
        ticker.tick();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn creation_fails_on_missing_property() {
        let result = MonitorBinding::new(MonitorBindingConfig {
            target: BindingTarget::for_object(&Object::new(), "foo"),
            reader: Rc::new(number_from_unknown),
            value: create_buffered_value(1),
            ticker: Rc::new(ManualTicker::new()),
        });
        assert!(matches!(result, Err(BindingError::Target(_))));
    }

    #[test]
    fn dispose_stops_ticks() {
        let obj = Object::from_json(json!({"foo": 1})).unwrap();
        let (binding, ticker) = monitor(&obj, 1);
        binding.dispose();
        obj.set("foo", 2);
        ticker.tick();
        assert_eq!(binding.latest(), Some(1.0));
        assert_eq!(binding.read(), Err(BindingError::Disposed));
    }
}
