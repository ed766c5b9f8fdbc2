#![forbid(unsafe_code)]

//! Numeric constraints.

use crate::reactive::Observable;

use super::{Constraint, ConstraintKind};

// ---------------------------------------------------------------------------
// StepConstraint
// ---------------------------------------------------------------------------

/// Snaps values to `origin + n * step`.
///
/// A non-positive or non-finite step leaves values unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepConstraint {
    step: f64,
    origin: f64,
}

impl StepConstraint {
    #[must_use]
    pub fn new(step: f64, origin: f64) -> Self {
        Self { step, origin }
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn origin(&self) -> f64 {
        self.origin
    }
}

impl Constraint<f64> for StepConstraint {
    fn constrain(&self, value: f64) -> f64 {
        if !(self.step.is_finite() && self.step > 0.0) || !value.is_finite() {
            return value;
        }
        let o = if self.origin.is_finite() {
            self.origin % self.step
        } else {
            0.0
        };
        let r = ((value - o) / self.step).round();
        o + r * self.step
    }

    fn kind(&self) -> ConstraintKind<'_, f64> {
        ConstraintKind::Step(self)
    }
}

// ---------------------------------------------------------------------------
// RangeConstraint
// ---------------------------------------------------------------------------

/// Clamps values to optional bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeConstraint {
    min: Option<f64>,
    max: Option<f64>,
}

impl RangeConstraint {
    #[must_use]
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.max
    }
}

impl Constraint<f64> for RangeConstraint {
    fn constrain(&self, value: f64) -> f64 {
        let mut result = value;
        if let Some(min) = self.min {
            result = result.max(min);
        }
        if let Some(max) = self.max {
            result = result.min(max);
        }
        result
    }

    fn kind(&self) -> ConstraintKind<'_, f64> {
        ConstraintKind::Range(self)
    }
}

// ---------------------------------------------------------------------------
// DefiniteRangeConstraint
// ---------------------------------------------------------------------------

/// Clamps values to `[min, max]`, where both bounds are observables.
///
/// Slider views share these observables, so moving a bound through the API
/// updates both the constraint and the slider track.
#[derive(Debug, Clone)]
pub struct DefiniteRangeConstraint {
    min: Observable<f64>,
    max: Observable<f64>,
}

impl DefiniteRangeConstraint {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self::from_observables(Observable::new(min), Observable::new(max))
    }

    #[must_use]
    pub fn from_observables(min: Observable<f64>, max: Observable<f64>) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn min(&self) -> &Observable<f64> {
        &self.min
    }

    #[must_use]
    pub fn max(&self) -> &Observable<f64> {
        &self.max
    }
}

impl Constraint<f64> for DefiniteRangeConstraint {
    fn constrain(&self, value: f64) -> f64 {
        value.max(self.min.get()).min(self.max.get())
    }

    fn kind(&self) -> ConstraintKind<'_, f64> {
        ConstraintKind::DefiniteRange(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn step_snaps_to_grid() {
        let c = StepConstraint::new(0.5, 0.0);
        assert_eq!(c.constrain(1.2), 1.0);
        assert_eq!(c.constrain(1.3), 1.5);
        assert_eq!(c.constrain(-0.7), -0.5);
    }

    #[test]
    fn step_grid_is_anchored_at_origin() {
        let c = StepConstraint::new(2.0, 1.0);
        assert_eq!(c.constrain(4.2), 5.0);
        assert_eq!(c.constrain(2.9), 3.0);
    }

    #[test]
    fn degenerate_step_is_identity() {
        assert_eq!(StepConstraint::new(0.0, 0.0).constrain(1.234), 1.234);
        assert_eq!(StepConstraint::new(-1.0, 0.0).constrain(1.234), 1.234);
        assert_eq!(StepConstraint::new(f64::NAN, 0.0).constrain(1.234), 1.234);
    }

    #[test]
    fn range_clamps_each_side_independently() {
        assert_eq!(RangeConstraint::new(Some(0.0), None).constrain(-1.0), 0.0);
        assert_eq!(RangeConstraint::new(Some(0.0), None).constrain(1e9), 1e9);
        assert_eq!(RangeConstraint::new(None, Some(1.0)).constrain(2.0), 1.0);
        assert_eq!(RangeConstraint::new(None, None).constrain(-7.0), -7.0);
    }

    #[test]
    fn definite_range_follows_observable_bounds() {
        let c = DefiniteRangeConstraint::new(0.0, 10.0);
        assert_eq!(c.constrain(11.0), 10.0);
        c.max().set(20.0);
        assert_eq!(c.constrain(11.0), 11.0);
        c.min().set(15.0);
        assert_eq!(c.constrain(11.0), 15.0);
    }

    proptest! {
        #[test]
        fn step_is_idempotent(v in -1e6f64..1e6, step in 0.01f64..100.0, origin in -10f64..10.0) {
            let c = StepConstraint::new(step, origin);
            let once = c.constrain(v);
            let twice = c.constrain(once);
            prop_assert!((once - twice).abs() <= 1e-9 * once.abs().max(1.0));
        }

        #[test]
        fn step_result_is_near_input(v in -1e6f64..1e6, step in 0.01f64..100.0) {
            let c = StepConstraint::new(step, 0.0);
            prop_assert!((c.constrain(v) - v).abs() <= step / 2.0 + 1e-6);
        }

        #[test]
        fn range_result_is_within_bounds(v in -1e6f64..1e6, lo in -100f64..0.0, hi in 0f64..100.0) {
            let r = RangeConstraint::new(Some(lo), Some(hi)).constrain(v);
            prop_assert!(r >= lo && r <= hi);
            let d = DefiniteRangeConstraint::new(lo, hi).constrain(v);
            prop_assert_eq!(r, d);
        }
    }
}
