#![forbid(unsafe_code)]

//! Ordered catalogue of test cases.
//!
//! Insertion order is execution order. Once a [`Registry`] is handed to the
//! controller it is only iterated, never reshaped.

use std::fmt;

use crate::case::TestCase;

/// Ordered list of cases bound to a fixture type `F`.
pub struct Registry<F> {
    cases: Vec<Box<dyn TestCase<F>>>,
}

impl<F> Registry<F> {
    #[must_use]
    pub fn new() -> Self {
        Self { cases: Vec::new() }
    }

    /// Append a case at the end of the execution order.
    pub fn push<C: TestCase<F> + 'static>(&mut self, case: C) {
        self.cases.push(Box::new(case));
    }

    /// Builder-style [`Registry::push`].
    #[must_use]
    pub fn with<C: TestCase<F> + 'static>(mut self, case: C) -> Self {
        self.push(case);
        self
    }

    /// Total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Entry names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.cases.iter().map(|case| case.name())
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut (dyn TestCase<F> + 'static)> {
        self.cases.get_mut(index).map(|case| case.as_mut())
    }

    pub(crate) fn name_at(&self, index: usize) -> Option<&str> {
        self.cases.get(index).map(|case| case.name())
    }
}

impl<F> Default for Registry<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> FromIterator<Box<dyn TestCase<F>>> for Registry<F> {
    fn from_iter<I: IntoIterator<Item = Box<dyn TestCase<F>>>>(iter: I) -> Self {
        Self {
            cases: iter.into_iter().collect(),
        }
    }
}

impl<F> fmt::Debug for Registry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::CaseLog;

    struct Named(&'static str);

    impl TestCase<()> for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn init(&mut self, _fixture: &mut ()) -> bool {
            true
        }

        fn run(&mut self, _fixture: &mut (), log: &mut CaseLog<'_>) {
            log.result(true);
        }
    }

    #[test]
    fn preserves_insertion_order() {
        let registry = Registry::new()
            .with(Named("first"))
            .with(Named("second"))
            .with(Named("third"));
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["first", "second", "third"]
        );
        assert_eq!(registry.name_at(1), Some("second"));
        assert_eq!(registry.name_at(3), None);
    }

    #[test]
    fn collects_from_boxed_cases() {
        let boxed: Vec<Box<dyn TestCase<()>>> = vec![Box::new(Named("a")), Box::new(Named("b"))];
        let registry: Registry<()> = boxed.into_iter().collect();
        assert_eq!(format!("{registry:?}"), r#"["a", "b"]"#);
    }

    #[test]
    fn empty_registry() {
        let registry = Registry::<()>::default();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }
}
