//! Error types for value construction, update and matching.
//!
//! `AdtErrorKind` carries the structured data for each failure; its
//! `Display` impl is the user-facing message. Factory functions
//! (e.g. `attribute_type_mismatch()`) are the public way to build errors.
//!
//! Names that come from callers and may match nothing declared (unknown
//! tags, attributes, methods) are kept as plain strings, never interned.

use std::fmt;

use thiserror::Error;

use crate::Name;

/// Result of a fallible ADT operation.
pub type AdtResult<T> = Result<T, AdtError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AdtErrorKind {
    /// A value failed its declared predicate during construction or update.
    #[error("{attribute} should have type `{expected}`, but it has type `{actual}`")]
    AttributeTypeMismatch {
        attribute: Name,
        expected: String,
        actual: String,
    },

    /// Arguments were supplied in a shape the callee does not accept.
    #[error("{message}")]
    InvalidArgumentCombination { message: String },

    /// A functional update targeted an attribute outside the schema.
    #[error("no attribute {attribute}")]
    UnknownAttribute { attribute: String },

    /// A match handler named a constructor outside the matched type.
    #[error("invalid constructor `:{constructor}`")]
    InvalidConstructorReference { constructor: String },

    /// An exhaustive dispatch is missing handlers.
    #[error("unhandled constructors: {}", FormatTags(.unhandled))]
    NonExhaustiveMatch { unhandled: Vec<Name> },

    /// A builder declared the same constructor twice.
    #[error("constructor `:{constructor}` is already declared")]
    DuplicateConstructor { constructor: Name },

    /// A variant schema declared the attribute `to_map` reserves for the tag.
    #[error("constructor `:{constructor}` declares the reserved attribute `{attribute}`")]
    ReservedAttribute { constructor: Name, attribute: String },

    /// A matcher registered a second handler for the same constructor.
    #[error("constructor `:{constructor}` is already handled")]
    DuplicateHandler { constructor: Name },

    /// A map did not name a known constructor under `__constructor__`.
    #[error("{}", describe_unknown_constructor(.constructor))]
    UnknownConstructor { constructor: Option<String> },

    /// A shared method call named no function in the bundle.
    #[error("no method '{method}' on {type_name}")]
    UnknownMethod { method: String, type_name: String },

    /// Matching was requested on a value that is not a variant.
    #[error("cannot match on a value of type `{type_name}`")]
    NotMatchable { type_name: String },

    /// A frozen container was mutated.
    #[error("can't modify frozen {type_name}")]
    FrozenValue { type_name: String },

    /// Errors raised by user-supplied function bodies.
    #[error("{message}")]
    Custom { message: String },
}

fn describe_unknown_constructor(constructor: &Option<String>) -> String {
    match constructor {
        Some(tag) => format!("unknown constructor `:{tag}`"),
        None => "missing `__constructor__` key".to_string(),
    }
}

/// Renders tags the way the matcher reports them: `:A, :B`.
struct FormatTags<'a>(&'a [Name]);

impl fmt::Display for FormatTags<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, ":{tag}")?;
        }
        Ok(())
    }
}

/// An ADT error with optional context notes.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct AdtError {
    /// Structured error category.
    pub kind: AdtErrorKind,
    /// Secondary context, outermost last (e.g. "while constructing Maybe.Just").
    pub notes: Vec<String>,
}

impl AdtError {
    /// Create an error with just a message.
    ///
    /// Uses `Custom` kind. Prefer the specific factory functions.
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_kind(AdtErrorKind::Custom {
            message: message.into(),
        })
    }

    fn from_kind(kind: AdtErrorKind) -> Self {
        Self {
            kind,
            notes: Vec::new(),
        }
    }

    /// Add a context note to this error.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// The kind of this error.
    pub fn kind(&self) -> &AdtErrorKind {
        &self.kind
    }
}

impl From<AdtErrorKind> for AdtError {
    fn from(kind: AdtErrorKind) -> Self {
        Self::from_kind(kind)
    }
}

// Construction Errors

/// A value failed its attribute's predicate.
#[cold]
pub fn attribute_type_mismatch(attribute: Name, expected: String, actual: &str) -> AdtError {
    AdtError::from_kind(AdtErrorKind::AttributeTypeMismatch {
        attribute,
        expected,
        actual: actual.to_string(),
    })
}

/// Positional and named arguments were mixed.
#[cold]
pub fn mixed_arguments() -> AdtError {
    AdtError::from_kind(AdtErrorKind::InvalidArgumentCombination {
        message: "must construct ADT values with EITHER positional or named arguments, not both"
            .to_string(),
    })
}

/// More positional arguments than the schema declares.
#[cold]
pub fn too_many_arguments(type_name: &str, expected: usize, got: usize) -> AdtError {
    let arg_word = if expected == 1 {
        "argument"
    } else {
        "arguments"
    };
    AdtError::from_kind(AdtErrorKind::InvalidArgumentCombination {
        message: format!("{type_name} takes {expected} positional {arg_word}, got {got}"),
    })
}

/// A builder declared the same constructor twice.
#[cold]
pub fn duplicate_constructor(constructor: Name) -> AdtError {
    AdtError::from_kind(AdtErrorKind::DuplicateConstructor { constructor })
}

/// A variant schema used the reserved tag key as an attribute name.
#[cold]
pub fn reserved_attribute(constructor: Name, attribute: &str) -> AdtError {
    AdtError::from_kind(AdtErrorKind::ReservedAttribute {
        constructor,
        attribute: attribute.to_string(),
    })
}

/// A map carried no usable constructor tag.
#[cold]
pub fn unknown_constructor(constructor: Option<&str>) -> AdtError {
    AdtError::from_kind(AdtErrorKind::UnknownConstructor {
        constructor: constructor.map(str::to_string),
    })
}

// Update Errors

/// Functional update of an attribute outside the schema.
#[cold]
pub fn unknown_attribute(attribute: &str) -> AdtError {
    AdtError::from_kind(AdtErrorKind::UnknownAttribute {
        attribute: attribute.to_string(),
    })
}

/// Mutation of a frozen container.
#[cold]
pub fn frozen_value(type_name: &str) -> AdtError {
    AdtError::from_kind(AdtErrorKind::FrozenValue {
        type_name: type_name.to_string(),
    })
}

// Matching Errors

/// `Matcher::on` called without constructors.
#[cold]
pub fn empty_handler_tags() -> AdtError {
    AdtError::from_kind(AdtErrorKind::InvalidArgumentCombination {
        message: "must supply at least one constructor to `Matcher::on`".to_string(),
    })
}

/// A handler named a constructor the matched type does not declare.
#[cold]
pub fn invalid_constructor(constructor: &str) -> AdtError {
    AdtError::from_kind(AdtErrorKind::InvalidConstructorReference {
        constructor: constructor.to_string(),
    })
}

/// A second handler for an already handled constructor.
#[cold]
pub fn duplicate_handler(constructor: Name) -> AdtError {
    AdtError::from_kind(AdtErrorKind::DuplicateHandler { constructor })
}

/// Exhaustive dispatch with missing handlers.
#[cold]
pub fn non_exhaustive_match(unhandled: Vec<Name>) -> AdtError {
    AdtError::from_kind(AdtErrorKind::NonExhaustiveMatch { unhandled })
}

/// Matching on a value that is not a variant.
#[cold]
pub fn not_matchable(type_name: &str) -> AdtError {
    AdtError::from_kind(AdtErrorKind::NotMatchable {
        type_name: type_name.to_string(),
    })
}

// Method Errors

/// A shared method that the receiver's bundle does not define.
#[cold]
pub fn unknown_method(method: &str, type_name: &str) -> AdtError {
    AdtError::from_kind(AdtErrorKind::UnknownMethod {
        method: method.to_string(),
        type_name: type_name.to_string(),
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
