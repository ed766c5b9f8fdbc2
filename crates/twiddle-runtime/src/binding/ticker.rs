#![forbid(unsafe_code)]

//! Tick sources that drive binding reads.
//!
//! Nothing here owns a timer thread. A [`ManualTicker`] fires when the host
//! calls [`ManualTicker::tick`]; an [`IntervalTicker`] fires from
//! [`IntervalTicker::poll`] once its interval has elapsed. The host's timer
//! callback (a `requestAnimationFrame` loop, a UI idle hook, a test) polls a
//! [`TickScheduler`], which fans the poll out to every live interval ticker.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use web_time::Instant;

use crate::reactive::{Emitter, Subscription};

thread_local! {
    static GLOBAL_SCHEDULER: TickScheduler = TickScheduler::default();
}

/// A source of ticks.
pub trait Ticker {
    fn is_disabled(&self) -> bool;

    /// Disabled tickers do not fire.
    fn set_disabled(&self, disabled: bool);

    #[must_use = "dropping the subscription unregisters the callback"]
    fn on_tick(&self, callback: Box<dyn Fn()>) -> Subscription;

    /// Stop firing permanently.
    fn dispose(&self);

    fn is_disposed(&self) -> bool;
}

// ---------------------------------------------------------------------------
// ManualTicker
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ManualInner {
    disabled: Cell<bool>,
    disposed: Cell<bool>,
    ticks: Emitter<()>,
}

/// Fires on explicit [`tick`](Self::tick) calls.
#[derive(Clone, Default)]
pub struct ManualTicker {
    inner: Rc<ManualInner>,
}

impl ManualTicker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire once unless disabled or disposed. Returns whether it fired.
    pub fn tick(&self) -> bool {
        if self.inner.disabled.get() || self.inner.disposed.get() {
            return false;
        }
        self.inner.ticks.emit(&());
        true
    }
}

impl Ticker for ManualTicker {
    fn is_disabled(&self) -> bool {
        self.inner.disabled.get()
    }

    fn set_disabled(&self, disabled: bool) {
        self.inner.disabled.set(disabled);
    }

    fn on_tick(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.inner.ticks.on(move |()| callback())
    }

    fn dispose(&self) {
        self.inner.disposed.set(true);
    }

    fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }
}

impl fmt::Debug for ManualTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualTicker")
            .field("disabled", &self.inner.disabled.get())
            .field("disposed", &self.inner.disposed.get())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// IntervalTicker
// ---------------------------------------------------------------------------

struct IntervalInner {
    interval: Duration,
    next_due: Cell<Option<Instant>>,
    disabled: Cell<bool>,
    disposed: Cell<bool>,
    ticks: Emitter<()>,
}

impl IntervalInner {
    fn poll(&self, now: Instant) -> bool {
        if self.disabled.get() || self.disposed.get() {
            return false;
        }
        // An interval past the end of the clock is never due.
        let Some(due) = self.next_due.get() else {
            self.next_due.set(now.checked_add(self.interval));
            return false;
        };
        if now < due {
            return false;
        }
        let next = match due.checked_add(self.interval) {
            Some(next) if next > now => Some(next),
            // Missed ticks collapse into one.
            _ => now.checked_add(self.interval),
        };
        self.next_due.set(next);
        self.ticks.emit(&());
        true
    }
}

/// Fires from [`poll`](Self::poll) at most once per interval.
///
/// The phase starts at the first poll after creation or after re-enabling,
/// so a ticker never fires on the poll that starts it.
#[derive(Clone)]
pub struct IntervalTicker {
    inner: Rc<IntervalInner>,
}

impl IntervalTicker {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            inner: Rc::new(IntervalInner {
                interval,
                next_due: Cell::new(None),
                disabled: Cell::new(false),
                disposed: Cell::new(false),
                ticks: Emitter::new(),
            }),
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    /// Fire if the interval has elapsed at `now`. Returns whether it fired.
    pub fn poll(&self, now: Instant) -> bool {
        self.inner.poll(now)
    }
}

impl Ticker for IntervalTicker {
    fn is_disabled(&self) -> bool {
        self.inner.disabled.get()
    }

    fn set_disabled(&self, disabled: bool) {
        if disabled {
            self.inner.next_due.set(None);
        }
        self.inner.disabled.set(disabled);
    }

    fn on_tick(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.inner.ticks.on(move |()| callback())
    }

    fn dispose(&self) {
        self.inner.disposed.set(true);
        self.inner.next_due.set(None);
    }

    fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }
}

impl fmt::Debug for IntervalTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalTicker")
            .field("interval", &self.inner.interval)
            .field("disabled", &self.inner.disabled.get())
            .field("disposed", &self.inner.disposed.get())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// TickScheduler
// ---------------------------------------------------------------------------

/// Polls a set of interval tickers.
///
/// The scheduler holds tickers weakly; dropping or disposing a ticker removes
/// it on the next poll. Cloning shares the registry.
#[derive(Clone, Default)]
pub struct TickScheduler {
    tickers: Rc<RefCell<Vec<Weak<IntervalInner>>>>,
}

impl TickScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The scheduler shared by this thread.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL_SCHEDULER.with(Clone::clone)
    }

    pub fn register(&self, ticker: &IntervalTicker) {
        self.tickers.borrow_mut().push(Rc::downgrade(&ticker.inner));
    }

    /// Poll every live ticker. Returns how many fired.
    pub fn poll(&self, now: Instant) -> usize {
        let _span = tracing::trace_span!("tick_scheduler_poll").entered();
        let live: Vec<Rc<IntervalInner>> = {
            let mut tickers = self.tickers.borrow_mut();
            tickers.retain(|w| w.upgrade().is_some_and(|t| !t.disposed.get()));
            tickers.iter().filter_map(Weak::upgrade).collect()
        };
        live.iter().filter(|t| t.poll(now)).count()
    }

    /// Number of live tickers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tickers
            .borrow()
            .iter()
            .filter(|w| w.upgrade().is_some_and(|t| !t.disposed.get()))
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for TickScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickScheduler")
            .field("tickers", &self.len())
            .finish()
    }
}

/// A manual ticker for a zero interval, otherwise an interval ticker
/// registered with `scheduler`.
#[must_use]
pub fn create_ticker(interval: Duration, scheduler: &TickScheduler) -> Rc<dyn Ticker> {
    if interval.is_zero() {
        Rc::new(ManualTicker::new())
    } else {
        let ticker = IntervalTicker::new(interval);
        scheduler.register(&ticker);
        Rc::new(ticker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(ticker: &dyn Ticker) -> (Rc<Cell<u32>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let sub = ticker.on_tick(Box::new(move || c.set(c.get() + 1)));
        (count, sub)
    }

    #[test]
    fn manual_ticker_respects_disabled() {
        let ticker = ManualTicker::new();
        let (count, _sub) = counter(&ticker);
        assert!(ticker.tick());
        ticker.set_disabled(true);
        assert!(!ticker.tick());
        ticker.set_disabled(false);
        ticker.tick();
        assert_eq!(count.get(), 2);
        ticker.dispose();
        assert!(!ticker.tick());
    }

    #[test]
    fn interval_ticker_fires_on_boundaries() {
        let ticker = IntervalTicker::new(Duration::from_millis(200));
        let (count, _sub) = counter(&ticker);
        let t0 = Instant::now();
        assert!(!ticker.poll(t0));
        assert!(!ticker.poll(t0 + Duration::from_millis(199)));
        assert!(ticker.poll(t0 + Duration::from_millis(200)));
        assert!(!ticker.poll(t0 + Duration::from_millis(300)));
        assert!(ticker.poll(t0 + Duration::from_millis(400)));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn late_poll_collapses_missed_ticks() {
        let ticker = IntervalTicker::new(Duration::from_millis(100));
        let (count, _sub) = counter(&ticker);
        let t0 = Instant::now();
        ticker.poll(t0);
        assert!(ticker.poll(t0 + Duration::from_millis(1000)));
        assert!(!ticker.poll(t0 + Duration::from_millis(1050)));
        assert!(ticker.poll(t0 + Duration::from_millis(1100)));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn disabling_resets_the_phase() {
        let ticker = IntervalTicker::new(Duration::from_millis(100));
        let (count, _sub) = counter(&ticker);
        let t0 = Instant::now();
        ticker.poll(t0);
        ticker.set_disabled(true);
        assert!(!ticker.poll(t0 + Duration::from_millis(150)));
        ticker.set_disabled(false);
        assert!(!ticker.poll(t0 + Duration::from_millis(160)));
        assert!(!ticker.poll(t0 + Duration::from_millis(200)));
        assert!(ticker.poll(t0 + Duration::from_millis(260)));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn huge_interval_never_fires() {
        let ticker = IntervalTicker::new(Duration::MAX);
        let (count, _sub) = counter(&ticker);
        let t0 = Instant::now();
        assert!(!ticker.poll(t0));
        assert!(!ticker.poll(t0 + Duration::from_secs(3600)));
        assert_eq!(count.get(), 0);

        let scheduler = TickScheduler::new();
        scheduler.register(&ticker);
        assert_eq!(scheduler.poll(t0 + Duration::from_secs(7200)), 0);
    }

    #[test]
    fn scheduler_polls_live_tickers_only() {
        let scheduler = TickScheduler::new();
        let a = create_ticker(Duration::from_millis(100), &scheduler);
        let b = create_ticker(Duration::from_millis(100), &scheduler);
        let manual = create_ticker(Duration::ZERO, &scheduler);
        assert_eq!(scheduler.len(), 2);

        let (count_a, _sa) = counter(a.as_ref());
        let t0 = Instant::now();
        scheduler.poll(t0);
        assert_eq!(scheduler.poll(t0 + Duration::from_millis(100)), 2);

        b.dispose();
        drop(manual);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.poll(t0 + Duration::from_millis(200)), 1);
        assert_eq!(count_a.get(), 2);

        drop(a);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn global_scheduler_is_shared_per_thread() {
        let a = TickScheduler::global();
        let b = TickScheduler::global();
        let ticker = IntervalTicker::new(Duration::from_millis(10));
        a.register(&ticker);
        assert!(!b.is_empty());
    }
}
