//! The type predicate contract and the host's built-in kinds.
//!
//! Attribute schemas check values through `TypePredicate`. Anything that can
//! answer "is this value a member?" and name itself qualifies: the built-in
//! `Kind`s, `SumType` and `RecordType` handles, and the combinators of the
//! `adt_types` crate.

use std::sync::Arc;

use crate::Value;

/// Membership test for attribute values.
pub trait TypePredicate: Send + Sync {
    /// Whether `value` belongs to this type.
    fn is_member(&self, value: &Value) -> bool;

    /// Name used in error messages and combinator names.
    fn name(&self) -> String;
}

/// Shared, type-erased predicate.
pub type SharedPredicate = Arc<dyn TypePredicate>;

impl<P: TypePredicate + ?Sized> TypePredicate for Arc<P> {
    fn is_member(&self, value: &Value) -> bool {
        (**self).is_member(value)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

impl<P: TypePredicate + ?Sized> TypePredicate for Box<P> {
    fn is_member(&self, value: &Value) -> bool {
        (**self).is_member(value)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

/// Built-in host kinds, one per `Value` shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Nil,
    Bool,
    Int,
    Float,
    Symbol,
    Str,
    List,
    Map,
    Function,
    /// Any sum type instance.
    Variant,
    /// Any record instance.
    Record,
}

impl Kind {
    /// The kind's name, matching `Value::type_name` for non-composite values.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Nil => "nil",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Symbol => "symbol",
            Kind::Str => "str",
            Kind::List => "list",
            Kind::Map => "map",
            Kind::Function => "function",
            Kind::Variant => "variant",
            Kind::Record => "record",
        }
    }

    /// The kind of a value.
    pub fn of(value: &Value) -> Kind {
        match value {
            Value::Nil => Kind::Nil,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Symbol(_) => Kind::Symbol,
            Value::Str(_) => Kind::Str,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
            Value::Function(_) => Kind::Function,
            Value::Variant(_) => Kind::Variant,
            Value::Record(_) => Kind::Record,
        }
    }
}

impl TypePredicate for Kind {
    fn is_member(&self, value: &Value) -> bool {
        Kind::of(value) == *self
    }

    fn name(&self) -> String {
        self.as_str().to_string()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
