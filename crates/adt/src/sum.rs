//! Sum types and their variant instances.
//!
//! A `SumType` owns one `StructClass` per declared constructor. Instances
//! (`VariantValue`) hold a handle to the `SumType` plus the index of their
//! variant, so type identity is handle identity and there is no reference
//! cycle between a type and its variants.
//!
//! # Dispatch
//!
//! `match_with`, `match_effect` and `match_effect_exhaustive` build a fresh
//! `Matcher`, run the caller's registration closure against it, then check
//! coverage and call the handler registered for the receiver's own tag.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::errors::{invalid_constructor, non_exhaustive_match, unknown_constructor, AdtResult};
use crate::matcher::Matcher;
use crate::predicate::TypePredicate;
use crate::schema::{Args, Schema};
use crate::structure::{Fields, StructClass};
use crate::{Builder, MapValue, Name, Value};

/// Reserved map key holding a variant's tag in `to_map` output.
pub const CONSTRUCTOR_KEY: &str = "__constructor__";

/// Predicate name of a sum type created without a name.
const ANONYMOUS_SUM: &str = "ADT::Type";

/// Runtime knobs for a sum type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SumOptions {
    /// Freeze attribute values on construction (shallow).
    pub freeze: bool,
}

impl Default for SumOptions {
    fn default() -> Self {
        SumOptions { freeze: true }
    }
}

struct SumInner {
    name: Option<Name>,
    variants: Vec<StructClass>,
    by_tag: FxHashMap<Name, usize>,
    freeze: bool,
}

/// Shared handle to an immutable sum type registry.
#[derive(Clone)]
pub struct SumType(Arc<SumInner>);

impl SumType {
    /// Generate one variant class per declaration in `builder`.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(name = name.unwrap_or(ANONYMOUS_SUM), constructors = builder.len())
    )]
    pub fn new(builder: Builder, name: Option<&str>, options: SumOptions) -> Self {
        let (defs, functions) = builder.into_parts();
        let functions = functions.map(Arc::new);

        let mut by_tag = FxHashMap::with_capacity_and_hasher(defs.len(), Default::default());
        let variants: Vec<StructClass> = defs
            .into_iter()
            .enumerate()
            .map(|(index, (tag, schema))| {
                by_tag.insert(tag, index);
                StructClass::new(tag, schema, options.freeze, functions.clone())
            })
            .collect();
        tracing::debug!(freeze = options.freeze, "sum type created");

        SumType(Arc::new(SumInner {
            name: name.map(Name::intern),
            variants,
            by_tag,
            freeze: options.freeze,
        }))
    }

    pub fn name(&self) -> Option<Name> {
        self.0.name
    }

    /// The name, or `ADT::Type` when anonymous.
    pub fn display_name(&self) -> &'static str {
        self.0.name.map_or(ANONYMOUS_SUM, Name::as_str)
    }

    /// Constructor tags, in declaration order.
    pub fn constructors(&self) -> impl Iterator<Item = Name> + '_ {
        self.0.variants.iter().map(StructClass::tag)
    }

    /// Number of constructors.
    pub fn len(&self) -> usize {
        self.0.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.variants.is_empty()
    }

    pub fn has_constructor(&self, tag: &str) -> bool {
        self.lookup(tag).is_some()
    }

    pub fn schema(&self, tag: &str) -> Option<&Schema> {
        self.lookup(tag).map(|index| self.0.variants[index].schema())
    }

    pub fn freeze_policy(&self) -> bool {
        self.0.freeze
    }

    /// Constructor handle for `tag`.
    pub fn constructor(&self, tag: &str) -> AdtResult<Constructor> {
        let index = self
            .lookup(tag)
            .ok_or_else(|| invalid_constructor(tag))?;
        Ok(Constructor {
            sum: self.clone(),
            index,
        })
    }

    /// One handle per constructor, in declaration order.
    pub fn constructor_table(&self) -> Vec<Constructor> {
        (0..self.len())
            .map(|index| Constructor {
                sum: self.clone(),
                index,
            })
            .collect()
    }

    /// Build an instance of the variant `tag`.
    pub fn construct(&self, tag: &str, args: Args) -> AdtResult<VariantValue> {
        self.constructor(tag)?.call(args)
    }

    /// Rebuild an instance from `to_map` output.
    ///
    /// Keys may be symbols or strings. The tag is read from
    /// `__constructor__` and may itself be a symbol or a string. Tags are
    /// resolved without interning, so unknown input leaves no trace.
    pub fn from_map(&self, map: &MapValue) -> AdtResult<VariantValue> {
        let key = Name::intern(CONSTRUCTOR_KEY);
        let tag = map.get_name(key).ok_or_else(|| unknown_constructor(None))?;
        let index = match tag {
            Value::Symbol(name) => self.index_of(*name),
            Value::Str(s) => self.lookup(&s.read()),
            _ => None,
        }
        .ok_or_else(|| match tag {
            Value::Symbol(name) => unknown_constructor(Some(name.as_str())),
            Value::Str(s) => unknown_constructor(Some(s.read().as_str())),
            other => unknown_constructor(Some(other.to_string().as_str())),
        })?;

        let mut args = Args::from_map(map);
        args.named.retain(|(name, _)| *name != key);
        self.instantiate(index, args)
    }

    pub(crate) fn index_of(&self, tag: Name) -> Option<usize> {
        self.0.by_tag.get(&tag).copied()
    }

    pub(crate) fn class(&self, index: usize) -> &StructClass {
        &self.0.variants[index]
    }

    fn lookup(&self, tag: &str) -> Option<usize> {
        Name::lookup(tag).and_then(|tag| self.index_of(tag))
    }

    /// `Owner.Tag`, or just `Tag` when anonymous.
    fn qualified(&self, tag: Name) -> String {
        match self.0.name {
            Some(name) => format!("{name}.{tag}"),
            None => tag.as_str().to_string(),
        }
    }

    fn instantiate(&self, index: usize, args: Args) -> AdtResult<VariantValue> {
        let class = self.class(index);
        let type_name = self.qualified(class.tag());
        let fields = class
            .bind(args, &type_name)
            .and_then(|values| class.validate(values, self))
            .map_err(|err| err.with_note(format!("while constructing {type_name}")))?;
        tracing::trace!(variant = %type_name, "constructed");
        Ok(VariantValue {
            sum: self.clone(),
            index,
            fields,
        })
    }
}

impl TypePredicate for SumType {
    fn is_member(&self, value: &Value) -> bool {
        value.as_variant().is_some_and(|v| v.sum == *self)
    }

    fn name(&self) -> String {
        self.display_name().to_string()
    }
}

impl PartialEq for SumType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for SumType {}

impl Hash for SumType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Display for SumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl fmt::Debug for SumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SumType")
            .field("name", &self.display_name())
            .field("constructors", &self.0.variants)
            .finish()
    }
}

/// Factory for one variant of a sum type.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Constructor {
    sum: SumType,
    index: usize,
}

impl Constructor {
    pub fn tag(&self) -> Name {
        self.sum.class(self.index).tag()
    }

    pub fn sum_type(&self) -> &SumType {
        &self.sum
    }

    pub fn schema(&self) -> &Schema {
        self.sum.class(self.index).schema()
    }

    /// Build an instance. Positional and named arguments cannot be mixed.
    pub fn call(&self, args: Args) -> AdtResult<VariantValue> {
        self.sum.instantiate(self.index, args)
    }

    pub fn positional<V: Into<Value>>(
        &self,
        values: impl IntoIterator<Item = V>,
    ) -> AdtResult<VariantValue> {
        self.call(Args::positional(values))
    }

    pub fn named<N: AsRef<str>, V: Into<Value>>(
        &self,
        pairs: impl IntoIterator<Item = (N, V)>,
    ) -> AdtResult<VariantValue> {
        self.call(Args::named(pairs))
    }

    /// Build with no arguments; every attribute binds to `nil`.
    pub fn unit(&self) -> AdtResult<VariantValue> {
        self.call(Args::new())
    }
}

impl fmt::Display for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sum.qualified(self.tag()))
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constructor({self})")
    }
}

/// Instance of one variant of a sum type. Immutable once built.
#[derive(Clone)]
pub struct VariantValue {
    sum: SumType,
    index: usize,
    fields: Fields,
}

impl VariantValue {
    #[inline]
    fn class(&self) -> &StructClass {
        self.sum.class(self.index)
    }

    #[inline]
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    /// The variant's tag. Not shadowed by an attribute named `constructor`.
    pub fn constructor(&self) -> Name {
        self.class().tag()
    }

    /// Alias for `constructor`.
    pub fn tag(&self) -> Name {
        self.constructor()
    }

    pub fn sum_type(&self) -> &SumType {
        &self.sum
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.class().get(&self.fields, name)
    }

    /// `(name, value)` pairs in schema order.
    pub fn attributes(&self) -> impl Iterator<Item = (Name, &Value)> + '_ {
        self.class().attributes(&self.fields)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = Name> + '_ {
        self.class().schema().names()
    }

    /// Attributes keyed by symbol, with `__constructor__` appended last.
    pub fn to_map(&self) -> MapValue {
        let mut map = self.class().to_map(&self.fields);
        map.insert(Value::symbol(CONSTRUCTOR_KEY), Value::Symbol(self.tag()));
        map
    }

    /// A new instance with `updates` applied and revalidated.
    ///
    /// Names outside the schema are ignored. The receiver is unchanged.
    pub fn with<N: AsRef<str>, V: Into<Value>>(
        &self,
        updates: impl IntoIterator<Item = (N, V)>,
    ) -> AdtResult<Self> {
        let args = self.class().merge(
            &self.fields,
            updates
                .into_iter()
                .map(|(name, value)| (name, value.into())),
        );
        self.sum.instantiate(self.index, args)
    }

    /// `with(attr => f(current))`; `UnknownAttribute` if `attr` is undeclared.
    pub fn over(&self, attr: &str, f: impl FnOnce(&Value) -> Value) -> AdtResult<Self> {
        let index = self.class().require(attr)?;
        let updated = f(&self.fields[index]);
        self.with([(attr, updated)])
    }

    /// Invoke a shared method with this instance as the receiver.
    pub fn call(&self, method: &str, args: &[Value]) -> AdtResult<Value> {
        let receiver = Value::Variant(self.clone());
        let type_name = self.sum.qualified(self.tag());
        self.class().call(&receiver, method, args, &type_name)
    }

    pub fn responds_to(&self, method: &str) -> bool {
        self.class().responds_to(method)
    }

    /// Exhaustive match producing a value.
    pub fn match_with<'a, R>(
        &self,
        register: impl FnOnce(&mut Matcher<'a, R>) -> AdtResult<()>,
    ) -> AdtResult<R> {
        let mut matcher = Matcher::new(&self.sum);
        register(&mut matcher)?;
        matcher.ensure_exhaustive()?;
        matcher
            .dispatch(self)
            .ok_or_else(|| non_exhaustive_match(vec![self.tag()]))
    }

    /// Run the handler for this variant, if one was registered.
    pub fn match_effect<'a>(
        &self,
        register: impl FnOnce(&mut Matcher<'a, ()>) -> AdtResult<()>,
    ) -> AdtResult<()> {
        let mut matcher = Matcher::new(&self.sum);
        register(&mut matcher)?;
        matcher.dispatch(self);
        Ok(())
    }

    /// Like `match_effect`, but every constructor must be handled.
    pub fn match_effect_exhaustive<'a>(
        &self,
        register: impl FnOnce(&mut Matcher<'a, ()>) -> AdtResult<()>,
    ) -> AdtResult<()> {
        let mut matcher = Matcher::new(&self.sum);
        register(&mut matcher)?;
        matcher.ensure_exhaustive()?;
        matcher.dispatch(self);
        Ok(())
    }
}

impl PartialEq for VariantValue {
    fn eq(&self, other: &Self) -> bool {
        self.sum == other.sum && self.index == other.index && self.fields == other.fields
    }
}

impl Eq for VariantValue {}

impl Hash for VariantValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag().hash(state);
        self.fields.hash(state);
    }
}

impl fmt::Display for VariantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.sum.name() {
            write!(f, "{name}.")?;
        }
        write!(f, "{}", self.tag())?;
        self.class().fmt_fields(&self.fields, f)
    }
}

impl fmt::Debug for VariantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
