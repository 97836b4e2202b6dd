use std::borrow::Cow;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Unary test over elements of type `T`.
///
/// This is the atom of a generalized regular expression: where a classic regex
/// compares against a fixed character, an [`Expression`](crate::Expression) asks
/// an arbitrary question about the current element.
///
/// Implemented for every `Fn(&T) -> bool` that can be shared between threads.
pub trait ElementTest<T> {
    /// returns true if `element` is accepted by this test.
    fn test(&self, element: &T) -> bool;
}

impl<T, F> ElementTest<T> for F
where
    F: Fn(&T) -> bool,
{
    fn test(&self, element: &T) -> bool {
        self(element)
    }
}

/// A shared, type-erased [`ElementTest`], optionally carrying a name for diagnostics.
///
/// Cloning a predicate is cheap and the clone tests with the very same function.
pub struct Predicate<T> {
    test: Arc<dyn ElementTest<T> + Send + Sync>,
    name: Option<Cow<'static, str>>,
}

impl<T> Predicate<T> {
    /// Wraps a test function in an anonymous predicate.
    pub fn new(test: impl ElementTest<T> + Send + Sync + 'static) -> Self {
        Self {
            test: Arc::new(test),
            name: None,
        }
    }

    /// Wraps a test function in a predicate that shows up as `name` when rendered.
    pub fn named(
        name: impl Into<Cow<'static, str>>,
        test: impl ElementTest<T> + Send + Sync + 'static,
    ) -> Self {
        Self {
            test: Arc::new(test),
            name: Some(name.into()),
        }
    }

    /// Replaces the diagnostic name, keeping the test.
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The diagnostic name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Applies the test to a single element.
    pub fn test(&self, element: &T) -> bool {
        self.test.test(element)
    }

    /// Returns true if both predicates share the same underlying test.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.test, &other.test)
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            test: self.test.clone(),
            name: self.name.clone(),
        }
    }
}

impl<T> Debug for Predicate<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "<predicate>"),
        }
    }
}
