//! Homogeneous lists and maps.
//!
//! Membership walks every element, so checking a list of `n` values costs
//! `n` inner checks.

use adt::{SharedPredicate, TypePredicate, Value};

use crate::shared;

/// A list whose every element is a member of `element`.
#[derive(Clone)]
pub struct ListOf {
    element: SharedPredicate,
}

impl ListOf {
    pub fn new(element: impl TypePredicate + 'static) -> Self {
        ListOf {
            element: shared(element),
        }
    }
}

impl TypePredicate for ListOf {
    fn is_member(&self, value: &Value) -> bool {
        match value {
            Value::List(items) => items.read().iter().all(|item| self.element.is_member(item)),
            _ => false,
        }
    }

    fn name(&self) -> String {
        format!("Array[{}]", self.element.name())
    }
}

/// A map whose keys are all `key` members and values all `value` members.
#[derive(Clone)]
pub struct MapOf {
    key: SharedPredicate,
    value: SharedPredicate,
}

impl MapOf {
    pub fn new(key: impl TypePredicate + 'static, value: impl TypePredicate + 'static) -> Self {
        MapOf {
            key: shared(key),
            value: shared(value),
        }
    }
}

impl TypePredicate for MapOf {
    fn is_member(&self, value: &Value) -> bool {
        match value {
            Value::Map(map) => map
                .read()
                .iter()
                .all(|(k, v)| self.key.is_member(k) && self.value.is_member(v)),
            _ => false,
        }
    }

    fn name(&self) -> String {
        format!("Hash[{} => {}]", self.key.name(), self.value.name())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
