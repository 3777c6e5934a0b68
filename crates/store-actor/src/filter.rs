//! # Query Filters
//!
//! A [`Filter`] is a labelled predicate shipped to a store actor with a query. The actor
//! evaluates it against every stored record inside a single request, so the result is a
//! consistent view of the store at one point in its message order.

use std::fmt;

/// A labelled predicate over stored records.
///
/// The label only exists for logging; `ResourceRequest` is `Debug` and shows up in traces.
pub struct Filter<T> {
    label: &'static str,
    predicate: Box<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Filter<T> {
    pub fn new(label: &'static str, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            label,
            predicate: Box::new(predicate),
        }
    }

    /// Matches every record.
    pub fn all() -> Self {
        Self::new("all", |_| true)
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn matches(&self, item: &T) -> bool {
        (self.predicate)(item)
    }
}

impl<T> fmt::Debug for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Filter").field(&self.label).finish()
    }
}
