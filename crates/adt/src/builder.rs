//! Declarative collection of constructors for a sum type.

use crate::errors::{duplicate_constructor, reserved_attribute, AdtResult};
use crate::schema::Schema;
use crate::sum::CONSTRUCTOR_KEY;
use crate::{Functions, Name};

/// Collects `(tag, schema)` declarations in order, plus an optional
/// shared-method bundle. Consumed by `SumType::new`.
#[derive(Debug, Default)]
pub struct Builder {
    defs: Vec<(Name, Schema)>,
    functions: Option<Functions>,
}

impl Builder {
    pub fn new() -> Self {
        Builder::default()
    }

    /// Declare a constructor. A tag may be declared once, and its schema
    /// may not use `__constructor__`, which `to_map` writes the tag under.
    pub fn data(&mut self, tag: &str, schema: Schema) -> AdtResult<&mut Self> {
        let tag = Name::intern(tag);
        if self.defs.iter().any(|(t, _)| *t == tag) {
            return Err(duplicate_constructor(tag));
        }
        if schema.names().any(|name| name == CONSTRUCTOR_KEY) {
            return Err(reserved_attribute(tag, CONSTRUCTOR_KEY));
        }
        self.defs.push((tag, schema));
        Ok(self)
    }

    /// Attach shared methods to every variant. Replaces an earlier bundle.
    pub fn functions(&mut self, functions: Functions) -> &mut Self {
        self.functions = Some(functions);
        self
    }

    /// Declared tags, in order.
    pub fn tags(&self) -> impl Iterator<Item = Name> + '_ {
        self.defs.iter().map(|(t, _)| *t)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<(Name, Schema)>, Option<Functions>) {
        (self.defs, self.functions)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
