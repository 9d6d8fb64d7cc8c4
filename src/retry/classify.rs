//! Decide whether a failure should trigger another attempt.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::io;
use std::sync::Arc;

/// An error that can name its category.
///
/// The category is what [`Classification::Categories`] matches on and what
/// retry warnings report. For an error enum it is usually a fieldless
/// "kind" enum with one variant per error variant. Errors are owned values;
/// borrowed error types are not supported.
pub trait Categorized: 'static {
    type Category: Clone + Eq + Hash + fmt::Debug;

    fn category(&self) -> Self::Category;
}

impl Categorized for io::Error {
    type Category = io::ErrorKind;

    fn category(&self) -> io::ErrorKind {
        self.kind()
    }
}

type Predicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Rule deciding whether an error is retriable.
pub enum Classification<E: Categorized> {
    /// Delegates to a caller-supplied function.
    Predicate(Predicate<E>),
    /// Retriable iff the error's category is in the set.
    Categories(HashSet<E::Category>),
}

impl<E: Categorized> Classification<E> {
    /// Retry on every error.
    pub fn any() -> Self {
        Self::predicate(|_| true)
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Classification::Predicate(Arc::new(f))
    }

    /// Retry only on errors of exactly this category.
    pub fn category(category: E::Category) -> Self {
        Self::categories(std::iter::once(category))
    }

    /// Retry on errors whose category is one of `categories`. Order and
    /// duplicates are irrelevant; the input is collected into a set here.
    pub fn categories<I>(categories: I) -> Self
    where
        I: IntoIterator<Item = E::Category>,
    {
        Classification::Categories(categories.into_iter().collect())
    }

    /// Returns true when `err` should be retried.
    pub fn needs_retry(&self, err: &E) -> bool {
        match self {
            Classification::Predicate(f) => f(err),
            Classification::Categories(set) => set.contains(&err.category()),
        }
    }
}

impl<E: Categorized> Default for Classification<E> {
    fn default() -> Self {
        Self::any()
    }
}

impl<E: Categorized> Clone for Classification<E> {
    fn clone(&self) -> Self {
        match self {
            Classification::Predicate(f) => Classification::Predicate(Arc::clone(f)),
            Classification::Categories(set) => Classification::Categories(set.clone()),
        }
    }
}

impl<E: Categorized> fmt::Debug for Classification<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Predicate(_) => f.write_str("Predicate(..)"),
            Classification::Categories(set) => f.debug_tuple("Categories").field(set).finish(),
        }
    }
}
