//! Deferred predicates for recursive and mutually recursive schemas.
//!
//! The thunk runs on first membership check (or never, if the attribute is
//! never validated). Its result is memoized; concurrent first uses race to
//! initialize and all observe the same predicate.

use std::fmt;
use std::sync::OnceLock;

use adt::{SharedPredicate, TypePredicate, Value};

const UNREALIZED: &str = "##unrealized lazy type##";

type Thunk = dyn Fn() -> SharedPredicate + Send + Sync;

/// A predicate resolved on first use.
pub struct Lazy {
    thunk: Box<Thunk>,
    realized: OnceLock<SharedPredicate>,
}

impl Lazy {
    pub fn new(thunk: impl Fn() -> SharedPredicate + Send + Sync + 'static) -> Self {
        Lazy {
            thunk: Box::new(thunk),
            realized: OnceLock::new(),
        }
    }

    /// Whether the thunk has run.
    pub fn is_realized(&self) -> bool {
        self.realized.get().is_some()
    }

    fn wrapped(&self) -> &SharedPredicate {
        self.realized.get_or_init(|| {
            let pred = (self.thunk)();
            tracing::debug!(name = %pred.name(), "lazy type realized");
            pred
        })
    }
}

impl TypePredicate for Lazy {
    fn is_member(&self, value: &Value) -> bool {
        self.wrapped().is_member(value)
    }

    /// The wrapped name once realized. Naming never forces the thunk.
    fn name(&self) -> String {
        self.realized
            .get()
            .map_or_else(|| UNREALIZED.to_string(), |pred| pred.name())
    }
}

impl fmt::Debug for Lazy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Lazy").field(&self.name()).finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
