//! Standalone record types.
//!
//! Records use the same struct machinery as sum type variants but stand
//! alone: no owning sum type, no `__constructor__` key, no matching.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::errors::AdtResult;
use crate::predicate::TypePredicate;
use crate::schema::{Args, Schema};
use crate::structure::{Fields, StructClass};
use crate::{Functions, MapValue, Name, Value};

/// Display name of a record type created without a name.
const ANONYMOUS_RECORD: &str = "Record";

/// Runtime knobs for a record type.
#[derive(Clone, Debug)]
pub struct RecordOptions {
    /// Freeze attribute values on construction (shallow).
    pub freeze: bool,
    /// Shared methods for every instance.
    pub functions: Option<Functions>,
}

impl Default for RecordOptions {
    fn default() -> Self {
        RecordOptions {
            freeze: true,
            functions: None,
        }
    }
}

struct RecordInner {
    name: Option<Name>,
    class: StructClass,
}

/// Shared handle to a record type.
#[derive(Clone)]
pub struct RecordType(Arc<RecordInner>);

impl RecordType {
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(name = name.unwrap_or(ANONYMOUS_RECORD), attributes = schema.len())
    )]
    pub fn new(name: Option<&str>, schema: Schema, options: RecordOptions) -> Self {
        let tag = Name::intern(name.unwrap_or(ANONYMOUS_RECORD));
        let class = StructClass::new(
            tag,
            schema,
            options.freeze,
            options.functions.map(Arc::new),
        );
        tracing::debug!(freeze = options.freeze, "record type created");
        RecordType(Arc::new(RecordInner {
            name: name.map(Name::intern),
            class,
        }))
    }

    pub fn name(&self) -> Option<Name> {
        self.0.name
    }

    /// The name, or `Record` when anonymous.
    pub fn display_name(&self) -> &'static str {
        self.0.class.tag().as_str()
    }

    pub fn schema(&self) -> &Schema {
        self.0.class.schema()
    }

    /// Build an instance. Positional and named arguments cannot be mixed.
    pub fn construct(&self, args: Args) -> AdtResult<RecordValue> {
        let class = &self.0.class;
        let type_name = self.display_name();
        let fields = class
            .bind(args, type_name)
            .and_then(|values| class.validate(values, self))
            .map_err(|err| err.with_note(format!("while constructing {type_name}")))?;
        tracing::trace!(record = type_name, "constructed");
        Ok(RecordValue {
            ty: self.clone(),
            fields,
        })
    }

    pub fn positional<V: Into<Value>>(
        &self,
        values: impl IntoIterator<Item = V>,
    ) -> AdtResult<RecordValue> {
        self.construct(Args::positional(values))
    }

    pub fn named<N: AsRef<str>, V: Into<Value>>(
        &self,
        pairs: impl IntoIterator<Item = (N, V)>,
    ) -> AdtResult<RecordValue> {
        self.construct(Args::named(pairs))
    }

    /// Rebuild an instance from `to_map` output (symbol or string keys).
    pub fn from_map(&self, map: &MapValue) -> AdtResult<RecordValue> {
        self.construct(Args::from_map(map))
    }
}

impl TypePredicate for RecordType {
    fn is_member(&self, value: &Value) -> bool {
        value.as_record().is_some_and(|r| r.ty == *self)
    }

    fn name(&self) -> String {
        self.display_name().to_string()
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for RecordType {}

impl Hash for RecordType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordType").field(&self.0.class).finish()
    }
}

/// Instance of a record type. Immutable once built.
#[derive(Clone)]
pub struct RecordValue {
    ty: RecordType,
    fields: Fields,
}

impl RecordValue {
    pub fn record_type(&self) -> &RecordType {
        &self.ty
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.ty.0.class.get(&self.fields, name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (Name, &Value)> + '_ {
        self.ty.0.class.attributes(&self.fields)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = Name> + '_ {
        self.ty.schema().names()
    }

    /// Attributes keyed by symbol, in schema order.
    pub fn to_map(&self) -> MapValue {
        self.ty.0.class.to_map(&self.fields)
    }

    /// A new instance with `updates` applied and revalidated.
    pub fn with<N: AsRef<str>, V: Into<Value>>(
        &self,
        updates: impl IntoIterator<Item = (N, V)>,
    ) -> AdtResult<Self> {
        let args = self.ty.0.class.merge(
            &self.fields,
            updates
                .into_iter()
                .map(|(name, value)| (name, value.into())),
        );
        self.ty.construct(args)
    }

    pub fn over(&self, attr: &str, f: impl FnOnce(&Value) -> Value) -> AdtResult<Self> {
        let index = self.ty.0.class.require(attr)?;
        let updated = f(&self.fields[index]);
        self.with([(attr, updated)])
    }

    /// Invoke a shared method with this instance as the receiver.
    pub fn call(&self, method: &str, args: &[Value]) -> AdtResult<Value> {
        let receiver = Value::Record(self.clone());
        self.ty
            .0
            .class
            .call(&receiver, method, args, self.ty.display_name())
    }

    pub fn responds_to(&self, method: &str) -> bool {
        self.ty.0.class.responds_to(method)
    }
}

impl PartialEq for RecordValue {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.fields == other.fields
    }
}

impl Eq for RecordValue {}

impl Hash for RecordValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ty.display_name().hash(state);
        self.fields.hash(state);
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ty.display_name())?;
        self.ty.0.class.fmt_fields(&self.fields, f)
    }
}

impl fmt::Debug for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
