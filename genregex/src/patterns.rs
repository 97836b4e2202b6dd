//! Shorthands for building the predicate leaves of an [`Expression`].
//!
//! ```rust
//! use genregex::patterns::{any, eq, one_of};
//! use genregex::Expression;
//!
//! // a 1, then anything, then a 2 or 3, possibly repeated
//! let e = Expression::concat(eq(1), Expression::concat(any(), Expression::plus(one_of([2, 3]))));
//! let nfa = e.compile_accepting().unwrap();
//!
//! assert!(nfa.is_match([1, 7, 2, 3, 3]));
//! assert!(!nfa.is_match([1, 7]));
//! ```

use crate::{ElementTest, Expression, Predicate};
use itertools::Itertools;
use std::borrow::Cow;
use std::fmt::Debug;

/// Matches one element satisfying `f`.
pub fn test<T>(f: impl ElementTest<T> + Send + Sync + 'static) -> Expression<T> {
    Expression::predicate(Predicate::new(f))
}

/// Like [`test`], but the predicate shows up as `name` when rendered.
pub fn named<T>(
    name: impl Into<Cow<'static, str>>,
    f: impl ElementTest<T> + Send + Sync + 'static,
) -> Expression<T> {
    Expression::predicate(Predicate::named(name, f))
}

/// Matches one element equal to `value`.
pub fn eq<T>(value: T) -> Expression<T>
where
    T: PartialEq + Debug + Send + Sync + 'static,
{
    let name = format!("{value:?}");
    named(name, move |x: &T| *x == value)
}

/// Matches any single element.
pub fn any<T: 'static>() -> Expression<T> {
    named(".", |_: &T| true)
}

/// Matches one element equal to any of `values`.
pub fn one_of<T>(values: impl IntoIterator<Item = T>) -> Expression<T>
where
    T: PartialEq + Debug + Send + Sync + 'static,
{
    let values: Vec<T> = values.into_iter().collect();
    let name = format!("[{}]", values.iter().map(|v| format!("{v:?}")).join(", "));
    named(name, move |x: &T| values.contains(x))
}

/// Matches one element equal to none of `values`.
pub fn none_of<T>(values: impl IntoIterator<Item = T>) -> Expression<T>
where
    T: PartialEq + Debug + Send + Sync + 'static,
{
    let values: Vec<T> = values.into_iter().collect();
    let name = format!("[^{}]", values.iter().map(|v| format!("{v:?}")).join(", "));
    named(name, move |x: &T| !values.contains(x))
}
