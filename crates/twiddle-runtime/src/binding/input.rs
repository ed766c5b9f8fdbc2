#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, error, trace};

use super::target::BindingTarget;
use super::ticker::Ticker;
use super::{BindingHandle, FlagGuard};
use crate::constraint::Constraint;
use crate::error::{BindingError, TargetError};
use crate::reactive::{ChangeOptions, Observable, Subscription};
use crate::unknown::Unknown;

/// Converts a raw property value into the bound type.
pub type Reader<In> = Rc<dyn Fn(&Unknown) -> In>;

/// Writes a bound value back to the property.
pub type Writer<In> = Rc<dyn Fn(&BindingTarget, &In) -> Result<(), TargetError>>;

/// Everything a [`Binding`] is built from.
pub struct BindingConfig<In> {
    pub target: BindingTarget,
    pub reader: Reader<In>,
    /// `None` leaves the property untouched on value changes.
    pub writer: Option<Writer<In>>,
    /// Installed into `value`'s setter.
    pub constraint: Option<Rc<dyn Constraint<In>>>,
    pub value: Observable<In>,
    pub ticker: Rc<dyn Ticker>,
}

struct Inner<In> {
    target: BindingTarget,
    reader: Reader<In>,
    writer: Option<Writer<In>>,
    value: Observable<In>,
    ticker: Rc<dyn Ticker>,
    syncing: Cell<bool>,
    disposed: Cell<bool>,
    last_error: RefCell<Option<TargetError>>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl<In: Clone + 'static> Inner<In> {
    fn write(&self, value: &In) {
        if self.syncing.get() || self.disposed.get() {
            return;
        }
        let Some(writer) = &self.writer else {
            return;
        };
        if let Err(err) = writer(&self.target, value) {
            error!(key = %self.target.key(), error = %err, "binding write failed");
            *self.last_error.borrow_mut() = Some(err);
        }
    }

    fn read(&self) -> Result<bool, BindingError> {
        if self.disposed.get() {
            return Err(BindingError::Disposed);
        }
        let raw = self.target.read()?;
        let value = (self.reader)(&raw);
        let _guard = FlagGuard::set(&self.syncing);
        Ok(self.value.set_with_options(value, ChangeOptions::default()))
    }
}

/// Two-way binding between a host property and an observable value.
///
/// Reads (ticks and [`read`](Self::read)) go through the reader and the
/// value's constraint but never reach the writer. Every other change to the
/// value is written back to the property.
///
/// ```
/// use std::rc::Rc;
/// use serde_json::json;
/// use twiddle_runtime::{Binding, BindingConfig, BindingTarget, ManualTicker, Object, Observable};
/// use twiddle_runtime::converter::{number_from_unknown, write_number};
///
/// let obj = Object::from_json(json!({"foo": 1})).unwrap();
/// let binding = Binding::new(BindingConfig {
///     target: BindingTarget::for_object(&obj, "foo"),
///     reader: Rc::new(number_from_unknown),
///     writer: Some(Rc::new(write_number)),
///     constraint: None,
///     value: Observable::new(1.0),
///     ticker: Rc::new(ManualTicker::new()),
/// });
///
/// binding.set(2.0).unwrap();
/// assert_eq!(obj.get("foo"), Some(json!(2)));
/// ```
pub struct Binding<In> {
    inner: Rc<Inner<In>>,
}

impl<In> Clone for Binding<In> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<In: Clone + 'static> Binding<In> {
    pub fn new(config: BindingConfig<In>) -> Self {
        if let Some(constraint) = config.constraint {
            config.value.set_constraint(Some(constraint));
        }
        let inner = Rc::new(Inner {
            target: config.target,
            reader: config.reader,
            writer: config.writer,
            value: config.value,
            ticker: config.ticker,
            syncing: Cell::new(false),
            disposed: Cell::new(false),
            last_error: RefCell::new(None),
            subscriptions: RefCell::new(Vec::new()),
        });

        let weak: Weak<Inner<In>> = Rc::downgrade(&inner);
        let value_sub = inner.value.subscribe(move |v| {
            if let Some(inner) = weak.upgrade() {
                inner.write(v);
            }
        });

        let weak: Weak<Inner<In>> = Rc::downgrade(&inner);
        let tick_sub = inner.ticker.on_tick(Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            trace!(key = %inner.target.key(), "tick read");
            if let Err(BindingError::Target(err)) = inner.read() {
                error!(key = %inner.target.key(), error = %err, "binding read failed");
                *inner.last_error.borrow_mut() = Some(err);
            }
        }));

        inner
            .subscriptions
            .borrow_mut()
            .extend([value_sub, tick_sub]);
        Self { inner }
    }

    #[must_use]
    pub fn value(&self) -> &Observable<In> {
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

    /// Whether the ticker is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.inner.ticker.is_disabled()
    }

    /// Read the property into the value without writing back.
    pub fn read(&self) -> Result<bool, BindingError> {
        self.inner.read()
    }

    /// Set the value and write it to the property.
    pub fn set(&self, value: In) -> Result<(), BindingError> {
        self.set_with_options(value, ChangeOptions::default())
    }

    pub fn set_with_options(&self, value: In, options: ChangeOptions) -> Result<(), BindingError> {
        if self.inner.disposed.get() {
            return Err(BindingError::Disposed);
        }
        self.inner.last_error.borrow_mut().take();
        self.inner.value.set_with_options(value, options);
        match self.take_error() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Convert `raw` with the reader, then set and write it like [`set`](Self::set).
    pub fn set_raw(&self, raw: &Unknown) -> Result<(), BindingError> {
        let value = (self.inner.reader)(raw);
        self.set(value)
    }

    /// The last error raised inside a notification, if any.
    pub fn take_error(&self) -> Option<TargetError> {
        self.inner.last_error.borrow_mut().take()
    }

    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        debug!(key = %self.inner.target.key(), "binding disposed");
        self.inner.ticker.dispose();
        self.inner.subscriptions.borrow_mut().clear();
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// Whether both handles refer to the same binding.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<In: Clone + 'static> BindingHandle for Binding<In> {
    fn target(&self) -> &BindingTarget {
        &self.inner.target
    }

    fn ticker(&self) -> Rc<dyn Ticker> {
        Binding::ticker(self)
    }

    fn read(&self) -> Result<bool, BindingError> {
        Binding::read(self)
    }

    fn on_change(&self, callback: Box<dyn Fn(ChangeOptions)>) -> Subscription {
        self.inner
            .value
            .subscribe_change(move |event| callback(event.options))
    }

    fn dispose(&self) {
        Binding::dispose(self);
    }

    fn is_disposed(&self) -> bool {
        Binding::is_disposed(self)
    }
}

impl<In: fmt::Debug> fmt::Debug for Binding<In> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("target", &self.inner.target)
            .field("value", &self.inner.value)
            .field("disposed", &self.inner.disposed.get())
            .finish()
    }
}
