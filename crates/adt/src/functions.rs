//! Shared-method bundles.
//!
//! A `Functions` bundle is attached to every variant of a sum type (or to a
//! record type) at construction. Methods receive the instance as an explicit
//! first argument; there is no implicit `self` scope.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::errors::AdtResult;
use crate::{Name, Value};

/// Body of a shared method: `(receiver, arguments) -> result`.
pub type MethodFn = dyn Fn(&Value, &[Value]) -> AdtResult<Value> + Send + Sync;

/// Named methods shared by all instances of one type.
#[derive(Clone, Default)]
pub struct Functions {
    methods: FxHashMap<Name, Arc<MethodFn>>,
}

impl Functions {
    pub fn new() -> Self {
        Functions::default()
    }

    /// Define (or redefine) a method.
    #[must_use]
    pub fn define(
        mut self,
        name: &str,
        body: impl Fn(&Value, &[Value]) -> AdtResult<Value> + Send + Sync + 'static,
    ) -> Self {
        self.methods.insert(Name::intern(name), Arc::new(body));
        self
    }

    pub fn get(&self, name: Name) -> Option<&Arc<MethodFn>> {
        self.methods.get(&name)
    }

    pub fn contains(&self, name: Name) -> bool {
        self.methods.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Method names, sorted for stable output.
    pub fn names(&self) -> Vec<Name> {
        let mut names: Vec<Name> = self.methods.keys().copied().collect();
        names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        names
    }
}

impl fmt::Debug for Functions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.names().iter().map(|n| n.as_str()))
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
