use adt::{SharedPredicate, TypePredicate, Value};

use crate::shared;

/// `nil`, or a member of the wrapped type.
#[derive(Clone)]
pub struct Nilable {
    inner: SharedPredicate,
}

impl Nilable {
    pub fn new(inner: impl TypePredicate + 'static) -> Self {
        Nilable {
            inner: shared(inner),
        }
    }

    /// The wrapped predicate.
    pub fn inner(&self) -> &SharedPredicate {
        &self.inner
    }
}

impl TypePredicate for Nilable {
    fn is_member(&self, value: &Value) -> bool {
        value.is_nil() || self.inner.is_member(value)
    }

    fn name(&self) -> String {
        format!("ADT::Nilable[{}]", self.inner.name())
    }
}
