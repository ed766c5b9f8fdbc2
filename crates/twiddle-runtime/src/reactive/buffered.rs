#![forbid(unsafe_code)]

//! Fixed-size value history for monitors.

use super::observable::Observable;

/// Oldest entry first; `None` for slots not yet filled.
pub type Buffer<T> = Vec<Option<T>>;

/// An observable history buffer. Every write emits, even when the contents
/// compare equal, so repeated identical reads still reach the view.
pub type BufferedValue<T> = Observable<Buffer<T>>;

/// Create an empty history of `size` slots (at least one).
#[must_use]
pub fn create_buffered_value<T: Clone + 'static>(size: usize) -> BufferedValue<T> {
    Observable::with_equals(vec![None; size.max(1)], |_, _| false)
}

/// `buffer` with `value` appended and the oldest entry dropped.
#[must_use]
pub fn create_pushed_buffer<T: Clone>(buffer: &[Option<T>], value: T) -> Buffer<T> {
    let mut next: Buffer<T> = buffer.iter().skip(1).cloned().collect();
    next.push(Some(value));
    next
}

/// Most recent value in a buffer.
#[must_use]
pub fn latest<T>(buffer: &[Option<T>]) -> Option<&T> {
    buffer.last().and_then(Option::as_ref)
}
