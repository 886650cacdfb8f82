//! Runtime values of the dynamic host.
//!
//! # Reference Semantics
//!
//! Container values (`Str`, `List`, `Map`) live in a `Heap` cell. Cloning
//! the `Value` shares the cell, so updates through one handle are visible
//! through every other. Scalars, functions, variants and records are
//! immutable outright.
//!
//! # Freezing
//!
//! `Value::freeze` flips the cell's one-way frozen flag. It is shallow:
//! freezing a list leaves the list's elements as they were. Variant and
//! record construction freezes each bound attribute when the owning type's
//! freeze policy is on.
//!
//! ```text
//! let s = Value::string("hello");        // mutable until frozen
//! let list = Value::list(vec![]);
//! let sym = Value::symbol("Just");
//! ```

mod function;
mod heap;
mod map;

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

pub use function::{FunctionValue, HostFn};
pub use heap::{Heap, HeapData};
use heap::Walk;
pub use map::MapValue;

use crate::errors::{AdtError, AdtResult};
use crate::record::RecordValue;
use crate::sum::VariantValue;
use crate::Name;

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    // Immediate values
    /// The absence marker.
    Nil,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value. Compared and hashed by bit pattern.
    Float(f64),
    /// Interned symbol, e.g. a constructor tag.
    Symbol(Name),

    // Heap types (shared, freezable)
    /// String value.
    Str(Heap<String>),
    /// List of values.
    List(Heap<Vec<Value>>),
    /// Insertion-ordered map.
    Map(Heap<MapValue>),

    // Immutable composites
    /// Host function.
    Function(FunctionValue),
    /// Instance of a sum type variant.
    Variant(VariantValue),
    /// Instance of a standalone record type.
    Record(RecordValue),
}

impl HeapData for String {
    const TYPE_NAME: &'static str = "str";
}

impl HeapData for Vec<Value> {
    const TYPE_NAME: &'static str = "list";
}

// Factory Methods (the only way to construct heap values)

impl Value {
    /// Create an integer value.
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    /// Create a float value.
    #[inline]
    pub fn float(f: f64) -> Self {
        Value::Float(f)
    }

    /// Create a symbol value, interning its name.
    #[inline]
    pub fn symbol(name: &str) -> Self {
        Value::Symbol(Name::intern(name))
    }

    /// Create a string value.
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    /// Create a list value.
    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    /// Create a map value.
    #[inline]
    pub fn map(entries: MapValue) -> Self {
        Value::Map(Heap::new(entries))
    }

    /// Create a function value.
    pub fn function(
        name: &str,
        func: impl Fn(&[Value]) -> AdtResult<Value> + Send + Sync + 'static,
    ) -> Self {
        Value::Function(FunctionValue::new(name, func))
    }
}

// Accessors

impl Value {
    /// Whether this is the absence marker.
    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<Name> {
        match self {
            Value::Symbol(name) => Some(*name),
            _ => None,
        }
    }

    /// Copy of the string contents.
    pub fn as_string(&self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s.read().clone()),
            _ => None,
        }
    }

    /// Snapshot of the list elements (elements themselves are shared).
    pub fn as_list(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) => Some(items.read().clone()),
            _ => None,
        }
    }

    /// Snapshot of the map entries.
    pub fn as_map(&self) -> Option<MapValue> {
        match self {
            Value::Map(map) => Some(map.read().clone()),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionValue> {
        match self {
            Value::Function(func) => Some(func),
            _ => None,
        }
    }

    pub fn as_variant(&self) -> Option<&VariantValue> {
        match self {
            Value::Variant(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordValue> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Read an attribute of a variant or record instance.
    pub fn attr(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Variant(v) => v.get(name),
            Value::Record(r) => r.get(name),
            _ => None,
        }
    }

    /// The name this value spells when used as a map key.
    ///
    /// Symbols name themselves; strings name an already-interned `Name`.
    pub fn key_name(&self) -> Option<Name> {
        match self {
            Value::Symbol(name) => Some(*name),
            Value::Str(s) => Name::lookup(&s.read()),
            _ => None,
        }
    }

    /// Host type name, as reported in type mismatch errors.
    ///
    /// Variants report their constructor tag, records their display name.
    pub fn type_name(&self) -> Cow<'static, str> {
        match self {
            Value::Nil => Cow::Borrowed("nil"),
            Value::Bool(_) => Cow::Borrowed("bool"),
            Value::Int(_) => Cow::Borrowed("int"),
            Value::Float(_) => Cow::Borrowed("float"),
            Value::Symbol(_) => Cow::Borrowed("symbol"),
            Value::Str(_) => Cow::Borrowed(String::TYPE_NAME),
            Value::List(_) => Cow::Borrowed(<Vec<Value>>::TYPE_NAME),
            Value::Map(_) => Cow::Borrowed(MapValue::TYPE_NAME),
            Value::Function(_) => Cow::Borrowed("function"),
            Value::Variant(v) => Cow::Borrowed(v.constructor().as_str()),
            Value::Record(r) => Cow::Borrowed(r.record_type().display_name()),
        }
    }
}

// Freezing

impl Value {
    /// Freeze this value's own cell (shallow). No-op for immutable values.
    pub fn freeze(&self) {
        match self {
            Value::Str(s) => s.freeze(),
            Value::List(items) => items.freeze(),
            Value::Map(map) => map.freeze(),
            _ => {}
        }
    }

    /// Whether this value rejects in-place updates.
    pub fn is_frozen(&self) -> bool {
        match self {
            Value::Str(s) => s.is_frozen(),
            Value::List(items) => items.is_frozen(),
            Value::Map(map) => map.is_frozen(),
            _ => true,
        }
    }

    /// Append to a string in place.
    pub fn push_str(&self, suffix: &str) -> AdtResult<()> {
        match self {
            Value::Str(s) => s.update(|s| s.push_str(suffix)),
            other => Err(expected_container("push_str", "str", other)),
        }
    }

    /// Append to a list in place.
    pub fn push(&self, item: Value) -> AdtResult<()> {
        match self {
            Value::List(items) => items.update(|items| items.push(item)),
            other => Err(expected_container("push", "list", other)),
        }
    }

    /// Insert into a map in place.
    pub fn insert(&self, key: Value, value: Value) -> AdtResult<Option<Value>> {
        match self {
            Value::Map(map) => map.update(|map| map.insert(key, value)),
            other => Err(expected_container("insert", "map", other)),
        }
    }
}

#[cold]
fn expected_container(method: &str, expected: &str, got: &Value) -> AdtError {
    AdtError::new(format!(
        "`{method}` expects a {expected}, got {}",
        got.type_name()
    ))
}

// Trait Implementations

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Variant(a), Value::Variant(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Use discriminant tags to distinguish variants
        std::mem::discriminant(self).hash(state);

        match self {
            Value::Nil => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Symbol(name) => name.hash(state),
            Value::Str(s) => s.hash(state),
            Value::List(items) => items.hash(state),
            Value::Map(map) => map.hash(state),
            Value::Function(func) => func.hash(state),
            Value::Variant(v) => v.hash(state),
            Value::Record(r) => r.hash(state),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(n) => write!(f, "Float({n:?})"),
            Value::Symbol(name) => write!(f, "Symbol({name})"),
            Value::Str(s) => write!(f, "Str({:?})", &*s.read()),
            Value::List(items) => match items.enter(Walk::Fmt) {
                Some(_walk) => write!(f, "List({:?})", &*items.read()),
                None => f.write_str("List([...])"),
            },
            Value::Map(map) => match map.enter(Walk::Fmt) {
                Some(_walk) => write!(f, "Map({:?})", &*map.read()),
                None => f.write_str("Map({...})"),
            },
            Value::Function(func) => write!(f, "Function({})", func.name()),
            Value::Variant(v) => write!(f, "Variant({v})"),
            Value::Record(r) => write!(f, "Record({r})"),
        }
    }
}

/// Inspect-style rendering: strings quoted, symbols prefixed with `:`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n:?}"),
            Value::Symbol(name) => write!(f, ":{name}"),
            Value::Str(s) => write!(f, "{:?}", &*s.read()),
            Value::List(items) => {
                let Some(_walk) = items.enter(Walk::Fmt) else {
                    return f.write_str("[...]");
                };
                write!(f, "[")?;
                for (i, item) in items.read().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => match map.enter(Walk::Fmt) {
                Some(_walk) => write!(f, "{}", &*map.read()),
                None => f.write_str("{...}"),
            },
            Value::Function(func) => write!(f, "#<function {}>", func.name()),
            Value::Variant(v) => write!(f, "{v}"),
            Value::Record(r) => write!(f, "{r}"),
        }
    }
}

// Conversions

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Name> for Value {
    fn from(name: Name) -> Self {
        Value::Symbol(name)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

impl From<MapValue> for Value {
    fn from(map: MapValue) -> Self {
        Value::map(map)
    }
}

impl From<VariantValue> for Value {
    fn from(v: VariantValue) -> Self {
        Value::Variant(v)
    }
}

impl From<RecordValue> for Value {
    fn from(r: RecordValue) -> Self {
        Value::Record(r)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Nil, Into::into)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
