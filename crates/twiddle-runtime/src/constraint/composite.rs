#![forbid(unsafe_code)]

use std::fmt;
use std::rc::Rc;

use super::{Constraint, ConstraintKind};

/// Ordered constraint chain, applied left to right.
pub struct CompositeConstraint<T> {
    constraints: Vec<Rc<dyn Constraint<T>>>,
}

impl<T> CompositeConstraint<T> {
    #[must_use]
    pub fn new(constraints: Vec<Rc<dyn Constraint<T>>>) -> Self {
        Self { constraints }
    }

    #[must_use]
    pub fn constraints(&self) -> &[Rc<dyn Constraint<T>>] {
        &self.constraints
    }
}

impl<T> Constraint<T> for CompositeConstraint<T> {
    fn constrain(&self, value: T) -> T {
        self.constraints
            .iter()
            .fold(value, |acc, c| c.constrain(acc))
    }

    fn kind(&self) -> ConstraintKind<'_, T> {
        ConstraintKind::Composite(self)
    }
}

impl<T> fmt::Debug for CompositeConstraint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeConstraint")
            .field("len", &self.constraints.len())
            .finish()
    }
}
