//! Attribute schemas and constructor arguments.

use std::fmt;
use std::sync::Arc;

use crate::predicate::{SharedPredicate, TypePredicate};
use crate::{MapValue, Name, Value};

/// Declared type of one attribute.
#[derive(Clone)]
pub enum AttrType {
    /// Checked by a predicate.
    Predicate(SharedPredicate),
    /// Must be an instance of the declaring type itself.
    SelfType,
}

impl AttrType {
    /// Membership test; `owner` answers for `SelfType`.
    pub(crate) fn accepts(&self, value: &Value, owner: &dyn TypePredicate) -> bool {
        match self {
            AttrType::Predicate(pred) => pred.is_member(value),
            AttrType::SelfType => owner.is_member(value),
        }
    }

    /// Declared type name; `owner` names `SelfType`.
    pub(crate) fn type_name(&self, owner: &dyn TypePredicate) -> String {
        match self {
            AttrType::Predicate(pred) => pred.name(),
            AttrType::SelfType => owner.name(),
        }
    }
}

impl fmt::Debug for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrType::Predicate(pred) => write!(f, "{}", pred.name()),
            AttrType::SelfType => write!(f, "self"),
        }
    }
}

/// Ordered attribute declarations. Order defines positional binding.
#[derive(Clone, Default)]
pub struct Schema {
    attrs: Vec<(Name, AttrType)>,
}

impl Schema {
    /// An empty schema (a unit constructor).
    pub fn new() -> Self {
        Schema { attrs: Vec::new() }
    }

    /// Declare an attribute checked by `pred`.
    #[must_use]
    pub fn attr(self, name: &str, pred: impl TypePredicate + 'static) -> Self {
        self.attr_shared(name, Arc::new(pred))
    }

    /// Declare an attribute checked by an already shared predicate.
    #[must_use]
    pub fn attr_shared(mut self, name: &str, pred: SharedPredicate) -> Self {
        self.declare(Name::intern(name), AttrType::Predicate(pred));
        self
    }

    /// Declare an attribute holding an instance of the declaring type.
    #[must_use]
    pub fn attr_self(mut self, name: &str) -> Self {
        self.declare(Name::intern(name), AttrType::SelfType);
        self
    }

    /// Redeclaring a name replaces its type and keeps its position.
    fn declare(&mut self, name: Name, ty: AttrType) {
        if let Some(slot) = self.attrs.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = ty;
        } else {
            self.attrs.push((name, ty));
        }
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Whether the schema declares no attributes.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Attribute names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        self.attrs.iter().map(|(n, _)| *n)
    }

    /// Declarations in order.
    pub fn iter(&self) -> impl Iterator<Item = (Name, &AttrType)> + '_ {
        self.attrs.iter().map(|(n, t)| (*n, t))
    }

    /// Position of an attribute.
    pub fn index_of(&self, name: Name) -> Option<usize> {
        self.attrs.iter().position(|(n, _)| *n == name)
    }

    /// Declared type of an attribute.
    pub fn get(&self, name: Name) -> Option<&AttrType> {
        self.attrs.iter().find(|(n, _)| *n == name).map(|(_, t)| t)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.attrs.iter().map(|(n, t)| (n.as_str(), t)))
            .finish()
    }
}

/// Arguments to a constructor: positional OR named, never both.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args {
    pub(crate) positional: Vec<Value>,
    pub(crate) named: Vec<(Name, Value)>,
}

impl Args {
    /// No arguments.
    pub fn new() -> Self {
        Args::default()
    }

    /// Positional arguments, bound in schema order.
    pub fn positional<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Args {
            positional: values.into_iter().map(Into::into).collect(),
            named: Vec::new(),
        }
    }

    /// Named arguments.
    ///
    /// A name that was never interned cannot match any schema and is
    /// dropped here rather than interned.
    pub fn named<N: AsRef<str>, V: Into<Value>>(pairs: impl IntoIterator<Item = (N, V)>) -> Self {
        pairs
            .into_iter()
            .fold(Args::new(), |args, (n, v)| args.set(n.as_ref(), v))
    }

    /// Named arguments from a map with symbol or string keys.
    ///
    /// Entries whose key cannot name an attribute are dropped.
    pub fn from_map(map: &MapValue) -> Self {
        Args {
            positional: Vec::new(),
            named: map
                .iter()
                .filter_map(|(k, v)| k.key_name().map(|n| (n, v.clone())))
                .collect(),
        }
    }

    /// Append a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a named argument.
    #[must_use]
    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        match Name::lookup(name) {
            Some(name) => self.named.push((name, value.into())),
            None => tracing::trace!(attribute = name, "ignoring argument outside every schema"),
        }
        self
    }

    /// Whether no arguments were supplied.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
