//! Per-query collector of predicates and aggregate selectors.

use super::criterion::{Criterion, SimpleSelector};
use super::restrictions;

/// Fluent collection of criteria for one query.
///
/// Elided predicates (`None`) are ignored, so factory results can be added
/// without checking them first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    predicates: Vec<Criterion>,
    selectors: Vec<SimpleSelector>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one predicate. `None` is a no-op.
    pub fn add(mut self, criterion: impl Into<Option<Criterion>>) -> Self {
        self.push(criterion);
        self
    }

    /// In-place variant of [`Criteria::add`].
    pub fn push(&mut self, criterion: impl Into<Option<Criterion>>) -> &mut Self {
        if let Some(criterion) = criterion.into() {
            self.predicates.push(criterion);
        }
        self
    }

    /// Records an aggregate projection, evaluated by `Repository::select`.
    pub fn select(mut self, selector: SimpleSelector) -> Self {
        self.selectors.push(selector);
        self
    }

    pub fn predicates(&self) -> &[Criterion] {
        &self.predicates
    }

    pub fn selectors(&self) -> &[SimpleSelector] {
        &self.selectors
    }

    /// Returns whether no predicate was collected.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Conjunction of all collected predicates.
    ///
    /// Returns `None` when nothing was collected and the single predicate
    /// unchanged when exactly one was.
    pub fn predicate(&self) -> Option<Criterion> {
        match self.predicates.as_slice() {
            [] => None,
            [single] => Some(single.clone()),
            many => Some(restrictions::and(many.iter().cloned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Criteria;
    use crate::query::criterion::Operator;
    use crate::query::restrictions::{count, eq, gt, like};

    #[test]
    fn elided_predicates_are_not_collected() {
        let criteria = Criteria::new()
            .add(eq("name", "", true))
            .add(like("email", None, true))
            .add(gt("age", 18, true));

        assert_eq!(criteria.predicates().len(), 1);
        assert_eq!(criteria.predicate().unwrap().operator(), Operator::Gt);
    }

    #[test]
    fn empty_criteria_has_no_predicate() {
        let criteria = Criteria::new().select(count("id"));
        assert!(criteria.is_empty());
        assert!(criteria.predicate().is_none());
        assert_eq!(criteria.selectors().len(), 1);
    }

    #[test]
    fn multiple_predicates_are_conjoined_in_order() {
        let mut criteria = Criteria::new();
        criteria.push(eq("a", 1, false)).push(eq("b", 2, false));

        let predicate = criteria.predicate().unwrap();
        let logical = predicate.as_logical().unwrap();
        assert_eq!(logical.operator(), Operator::And);
        let fields: Vec<_> = logical
            .children()
            .iter()
            .map(|child| child.as_simple().unwrap().field())
            .collect();
        assert_eq!(fields, ["a", "b"]);
    }
}
