#![forbid(unsafe_code)]

//! Value constraints applied by an observable's setter.
//!
//! A constraint is a pure, total function `T -> T`. Number bindings compose up
//! to three of them in a fixed order: step, then range, then list.
//!
//! Controllers inspect the composed constraint to choose a view: a list
//! constraint yields a dropdown, a definite range a slider. The lookup goes
//! through [`Constraint::kind`], an explicit discriminant, rather than runtime
//! type inspection.
//!
//! # Invariants
//!
//! 1. `constrain` never panics and always returns a value.
//! 2. A composite applies its children left to right.
//! 3. [`find_constraint`] returns the first match in depth-first order.

mod composite;
mod list;
mod number;

pub use composite::CompositeConstraint;
pub use list::{ListConstraint, ListItem};
pub use number::{DefiniteRangeConstraint, RangeConstraint, StepConstraint};

use std::rc::Rc;

/// A pure value transform.
pub trait Constraint<T> {
    fn constrain(&self, value: T) -> T;

    /// Discriminant used by [`find_constraint`].
    fn kind(&self) -> ConstraintKind<'_, T> {
        ConstraintKind::Opaque
    }
}

/// Borrowed view of a constraint's concrete type.
pub enum ConstraintKind<'a, T> {
    Composite(&'a CompositeConstraint<T>),
    Step(&'a StepConstraint),
    Range(&'a RangeConstraint),
    DefiniteRange(&'a DefiniteRangeConstraint),
    List(&'a ListConstraint<T>),
    /// A constraint that does not take part in lookups.
    Opaque,
}

/// Types that [`find_constraint`] can search for.
pub trait ConstraintLookup<T> {
    fn from_kind<'a>(kind: ConstraintKind<'a, T>) -> Option<&'a Self>;
}

macro_rules! impl_lookup {
    ($ty:ty, $variant:ident) => {
        impl<T> ConstraintLookup<T> for $ty {
            fn from_kind<'a>(kind: ConstraintKind<'a, T>) -> Option<&'a Self> {
                match kind {
                    ConstraintKind::$variant(c) => Some(c),
                    _ => None,
                }
            }
        }
    };
}

impl_lookup!(StepConstraint, Step);
impl_lookup!(RangeConstraint, Range);
impl_lookup!(DefiniteRangeConstraint, DefiniteRange);

impl<T> ConstraintLookup<T> for ListConstraint<T> {
    fn from_kind<'a>(kind: ConstraintKind<'a, T>) -> Option<&'a Self> {
        match kind {
            ConstraintKind::List(c) => Some(c),
            _ => None,
        }
    }
}

impl<T> ConstraintLookup<T> for CompositeConstraint<T> {
    fn from_kind<'a>(kind: ConstraintKind<'a, T>) -> Option<&'a Self> {
        match kind {
            ConstraintKind::Composite(c) => Some(c),
            _ => None,
        }
    }
}

/// Find the first constraint of type `C`, recursing into composites.
///
/// ```
/// use std::rc::Rc;
/// use twiddle_runtime::{CompositeConstraint, Constraint, StepConstraint, RangeConstraint, find_constraint};
///
/// let c = CompositeConstraint::new(vec![
///     Rc::new(StepConstraint::new(0.5, 0.0)) as Rc<dyn Constraint<f64>>,
///     Rc::new(RangeConstraint::new(Some(0.0), None)),
/// ]);
/// assert!(find_constraint::<f64, RangeConstraint>(&c).is_some());
/// ```
#[must_use]
pub fn find_constraint<'a, T, C>(constraint: &'a dyn Constraint<T>) -> Option<&'a C>
where
    C: ConstraintLookup<T>,
{
    match constraint.kind() {
        ConstraintKind::Composite(composite) => composite
            .constraints()
            .iter()
            .find_map(|child| find_constraint::<T, C>(child.as_ref()))
            .or_else(|| C::from_kind(ConstraintKind::Composite(composite))),
        kind => C::from_kind(kind),
    }
}

// ---------------------------------------------------------------------------
// Number constraint helpers
// ---------------------------------------------------------------------------

/// A step constraint anchored at `origin`, when `step` is given.
#[must_use]
pub fn create_step_constraint(step: Option<f64>, origin: f64) -> Option<StepConstraint> {
    step.map(|s| StepConstraint::new(s, origin))
}

/// A definite range when both bounds are given, a one-sided range when one
/// is, and nothing otherwise.
#[must_use]
pub fn create_range_constraint(
    min: Option<f64>,
    max: Option<f64>,
) -> Option<Rc<dyn Constraint<f64>>> {
    match (min, max) {
        (Some(min), Some(max)) => Some(Rc::new(DefiniteRangeConstraint::new(min, max))),
        (None, None) => None,
        (min, max) => Some(Rc::new(RangeConstraint::new(min, max))),
    }
}

/// A list constraint when options are given.
#[must_use]
pub fn create_list_constraint<T: Clone + PartialEq + 'static>(
    options: Option<Vec<ListItem<T>>>,
) -> Option<ListConstraint<T>> {
    options.map(ListConstraint::new)
}

/// Compose the step, range and list constraints of a number binding, in that
/// order.
#[must_use]
pub fn create_number_constraint(
    step: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
    options: Option<Vec<ListItem<f64>>>,
    initial_value: f64,
) -> CompositeConstraint<f64> {
    let mut constraints: Vec<Rc<dyn Constraint<f64>>> = Vec::new();
    if let Some(sc) = create_step_constraint(step, initial_value) {
        constraints.push(Rc::new(sc));
    }
    if let Some(rc) = create_range_constraint(min, max) {
        constraints.push(rc);
    }
    if let Some(lc) = create_list_constraint(options) {
        constraints.push(Rc::new(lc));
    }
    CompositeConstraint::new(constraints)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Double;

    impl Constraint<f64> for Double {
        fn constrain(&self, value: f64) -> f64 {
            value * 2.0
        }
    }

    #[test]
    fn number_constraint_order_is_step_range_list() {
        let c = create_number_constraint(Some(10.0), Some(0.0), Some(25.0), None, 0.0);
        // Step first (27 -> 30), then range clamps to 25.
        assert_eq!(c.constrain(27.0), 25.0);
        assert!(find_constraint::<f64, StepConstraint>(&c).is_some());
        assert!(find_constraint::<f64, DefiniteRangeConstraint>(&c).is_some());
        assert!(find_constraint::<f64, RangeConstraint>(&c).is_none());
        assert!(find_constraint::<f64, ListConstraint<f64>>(&c).is_none());
    }

    #[test]
    fn one_sided_bounds_make_a_plain_range() {
        let c = create_number_constraint(None, Some(1.0), None, None, 5.0);
        assert!(find_constraint::<f64, RangeConstraint>(&c).is_some());
        assert!(find_constraint::<f64, DefiniteRangeConstraint>(&c).is_none());
        assert_eq!(c.constrain(-3.0), 1.0);
    }

    #[test]
    fn empty_composite_is_identity() {
        let c = create_number_constraint(None, None, None, None, 0.0);
        assert!(c.constraints().is_empty());
        assert_eq!(c.constrain(42.5), 42.5);
    }

    #[test]
    fn lookup_recurses_into_nested_composites() {
        let inner = CompositeConstraint::new(vec![
            Rc::new(StepConstraint::new(1.0, 0.0)) as Rc<dyn Constraint<f64>>,
        ]);
        let outer = CompositeConstraint::new(vec![
            Rc::new(Double) as Rc<dyn Constraint<f64>>,
            Rc::new(inner),
        ]);
        let step = find_constraint::<f64, StepConstraint>(&outer);
        assert_eq!(step.map(StepConstraint::step), Some(1.0));
        assert_eq!(outer.constrain(1.3), 3.0);
    }

    #[test]
    fn opaque_constraints_are_never_found() {
        assert!(find_constraint::<f64, StepConstraint>(&Double).is_none());
    }
}
