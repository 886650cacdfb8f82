//! Type predicate combinators for `adt` attribute schemas.
//!
//! Every combinator implements `adt::TypePredicate` and can be nested inside
//! another:
//!
//! ```text
//! Schema::new()
//!     .attr("tags", ListOf::new(Kind::Str))
//!     .attr("scores", MapOf::new(Kind::Symbol, Kind::Int))
//!     .attr("nickname", Nilable::new(Kind::Str))
//! ```
//!
//! Names follow the `Array[T]`, `Hash[K => V]` convention used in type
//! mismatch messages.

mod collection;
mod function;
mod lazy;
mod literal;
mod nilable;
mod union;

use std::sync::Arc;

use adt::{SharedPredicate, TypePredicate};

pub use collection::{ListOf, MapOf};
pub use function::Function;
pub use lazy::Lazy;
pub use literal::{Any, Literal};
pub use nilable::Nilable;
pub use union::Union;

/// Erase a predicate into a shared handle.
pub fn shared(pred: impl TypePredicate + 'static) -> SharedPredicate {
    Arc::new(pred)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
