//! Struct machinery shared by sum type variants and records.
//!
//! A `StructClass` is one generated "class": a tag, an attribute schema, the
//! freeze policy and the optional shared-method bundle. Instances store their
//! attribute values in schema order in an immutable `Fields` slice.
//!
//! # Construction
//!
//! 1. `bind` maps positional or named arguments onto schema slots, filling
//!    missing slots with `nil`.
//! 2. `validate` tests every slot against its declared type. Nothing is
//!    frozen or wrapped until all slots pass.
//! 3. With the freeze policy on, each bound value is frozen (shallow).

use std::fmt;
use std::sync::Arc;

use crate::errors::{
    attribute_type_mismatch, mixed_arguments, too_many_arguments, unknown_attribute,
    unknown_method, AdtResult,
};
use crate::predicate::TypePredicate;
use crate::schema::{Args, Schema};
use crate::{Functions, MapValue, Name, Value};

/// Attribute values of one instance, in schema order.
pub(crate) type Fields = Arc<[Value]>;

pub(crate) struct StructClass {
    tag: Name,
    schema: Schema,
    freeze: bool,
    functions: Option<Arc<Functions>>,
}

impl StructClass {
    pub(crate) fn new(
        tag: Name,
        schema: Schema,
        freeze: bool,
        functions: Option<Arc<Functions>>,
    ) -> Self {
        StructClass {
            tag,
            schema,
            freeze,
            functions,
        }
    }

    #[inline]
    pub(crate) fn tag(&self) -> Name {
        self.tag
    }

    #[inline]
    pub(crate) fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Map arguments onto schema slots.
    ///
    /// `type_name` only feeds error messages and logs.
    pub(crate) fn bind(&self, args: Args, type_name: &str) -> AdtResult<Vec<Value>> {
        let Args { positional, named } = args;
        if !positional.is_empty() && !named.is_empty() {
            return Err(mixed_arguments());
        }
        if positional.len() > self.schema.len() {
            return Err(too_many_arguments(
                type_name,
                self.schema.len(),
                positional.len(),
            ));
        }

        let mut values = vec![Value::Nil; self.schema.len()];
        for (slot, value) in values.iter_mut().zip(positional) {
            *slot = value;
        }
        for (name, value) in named {
            match self.schema.index_of(name) {
                Some(index) => values[index] = value,
                None => tracing::trace!(
                    attribute = %name,
                    type_name,
                    "ignoring argument outside the schema"
                ),
            }
        }
        Ok(values)
    }

    /// Check every slot, then freeze per policy.
    ///
    /// `owner` is the declaring type, consulted for self-typed attributes.
    pub(crate) fn validate(
        &self,
        values: Vec<Value>,
        owner: &dyn TypePredicate,
    ) -> AdtResult<Fields> {
        for ((name, ty), value) in self.schema.iter().zip(&values) {
            if !ty.accepts(value, owner) {
                let expected = ty.type_name(owner);
                let actual = value.type_name();
                tracing::debug!(
                    attribute = %name,
                    %expected,
                    %actual,
                    "attribute type mismatch"
                );
                return Err(attribute_type_mismatch(name, expected, &actual));
            }
        }
        if self.freeze {
            for value in &values {
                value.freeze();
            }
        }
        Ok(Fields::from(values))
    }

    /// Slot of an attribute, if declared.
    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        Name::lookup(name).and_then(|name| self.schema.index_of(name))
    }

    /// Slot of an attribute, or `UnknownAttribute`.
    pub(crate) fn require(&self, name: &str) -> AdtResult<usize> {
        self.index_of(name)
            .ok_or_else(|| unknown_attribute(name))
    }

    pub(crate) fn get<'f>(&self, fields: &'f [Value], name: &str) -> Option<&'f Value> {
        self.index_of(name).and_then(|index| fields.get(index))
    }

    pub(crate) fn attributes<'f>(
        &'f self,
        fields: &'f [Value],
    ) -> impl Iterator<Item = (Name, &'f Value)> + 'f {
        self.schema.names().zip(fields.iter())
    }

    /// Attribute name (as a symbol) to value, in schema order.
    pub(crate) fn to_map(&self, fields: &[Value]) -> MapValue {
        let mut map = MapValue::with_capacity(fields.len() + 1);
        for (name, value) in self.attributes(fields) {
            map.insert(Value::Symbol(name), value.clone());
        }
        map
    }

    /// Current bindings with `updates` applied. Names outside the schema
    /// are ignored, as they are on construction.
    pub(crate) fn merge<N: AsRef<str>>(
        &self,
        fields: &[Value],
        updates: impl IntoIterator<Item = (N, Value)>,
    ) -> Args {
        let mut merged: Vec<(Name, Value)> = self
            .attributes(fields)
            .map(|(name, value)| (name, value.clone()))
            .collect();
        for (name, value) in updates {
            let name = name.as_ref();
            match self.index_of(name) {
                Some(index) => merged[index].1 = value,
                None => tracing::trace!(attribute = name, "ignoring update outside the schema"),
            }
        }
        Args {
            positional: Vec::new(),
            named: merged,
        }
    }

    /// `(a: 1, b: "x")`, or nothing for an empty schema.
    pub(crate) fn fmt_fields(&self, fields: &[Value], f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.schema.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (i, (name, value)) in self.attributes(fields).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        f.write_str(")")
    }

    pub(crate) fn responds_to(&self, method: &str) -> bool {
        Name::lookup(method).is_some_and(|name| {
            self.functions
                .as_ref()
                .is_some_and(|functions| functions.contains(name))
        })
    }

    /// Invoke a shared method with `receiver` as its first argument.
    pub(crate) fn call(
        &self,
        receiver: &Value,
        method: &str,
        args: &[Value],
        type_name: &str,
    ) -> AdtResult<Value> {
        let body = Name::lookup(method)
            .and_then(|name| self.functions.as_ref()?.get(name))
            .ok_or_else(|| unknown_method(method, type_name))?;
        tracing::trace!(method, type_name, "calling shared method");
        body(receiver, args)
    }
}

impl fmt::Debug for StructClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructClass")
            .field("tag", &self.tag)
            .field("schema", &self.schema)
            .field("freeze", &self.freeze)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
