#![forbid(unsafe_code)]

//! Proptest strategies for binding params.

use proptest::prelude::*;

/// Bounds and step of a number input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeStep {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// Integer bounds with a step that divides the span, so every grid point
/// between them is reachable.
pub fn range_step() -> impl Strategy<Value = RangeStep> {
    (-50i32..50, 1i32..20, prop::sample::select(vec![1i32, 2, 5, 10])).prop_map(
        |(min, cells, step)| RangeStep {
            min: f64::from(min),
            max: f64::from(min + cells * step),
            step: f64::from(step),
        },
    )
}

/// Numbers a user might type, including far out of range ones.
pub fn typed_number() -> impl Strategy<Value = f64> {
    (-10_000i32..10_000).prop_map(|n| f64::from(n) / 10.0)
}
