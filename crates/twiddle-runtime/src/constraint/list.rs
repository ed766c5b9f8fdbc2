#![forbid(unsafe_code)]

use std::fmt;

use crate::reactive::Observable;

use super::{Constraint, ConstraintKind};

/// A labelled choice.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem<T> {
    pub text: String,
    pub value: T,
}

impl<T> ListItem<T> {
    #[must_use]
    pub fn new(text: impl Into<String>, value: T) -> Self {
        Self {
            text: text.into(),
            value,
        }
    }
}

/// Restricts values to a set of options.
///
/// Values outside the set map to the first option. An empty set accepts
/// everything.
pub struct ListConstraint<T> {
    options: Observable<Vec<ListItem<T>>>,
}

impl<T: Clone + PartialEq + 'static> ListConstraint<T> {
    #[must_use]
    pub fn new(options: Vec<ListItem<T>>) -> Self {
        Self {
            options: Observable::new(options),
        }
    }
}

impl<T: Clone + 'static> ListConstraint<T> {
    /// The options, shared with list views.
    #[must_use]
    pub fn options(&self) -> &Observable<Vec<ListItem<T>>> {
        &self.options
    }
}

impl<T: Clone + PartialEq + 'static> Constraint<T> for ListConstraint<T> {
    fn constrain(&self, value: T) -> T {
        self.options.with(|opts| match opts.first() {
            None => value,
            Some(_) if opts.iter().any(|item| item.value == value) => value,
            Some(first) => first.value.clone(),
        })
    }

    fn kind(&self) -> ConstraintKind<'_, T> {
        ConstraintKind::List(self)
    }
}

impl<T: fmt::Debug> fmt::Debug for ListConstraint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListConstraint")
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<ListItem<f64>> {
        vec![ListItem::new("low", 1.0), ListItem::new("high", 10.0)]
    }

    #[test]
    fn members_pass_through() {
        let c = ListConstraint::new(options());
        assert_eq!(c.constrain(10.0), 10.0);
    }

    #[test]
    fn non_members_map_to_first_option() {
        let c = ListConstraint::new(options());
        assert_eq!(c.constrain(5.0), 1.0);
    }

    #[test]
    fn empty_list_is_identity() {
        let c = ListConstraint::<String>::new(Vec::new());
        assert_eq!(c.constrain("x".into()), "x");
    }

    #[test]
    fn options_can_change_later() {
        let c = ListConstraint::new(options());
        c.options().set(vec![ListItem::new("mid", 5.0)]);
        assert_eq!(c.constrain(10.0), 5.0);
    }
}
