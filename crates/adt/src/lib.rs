//! Algebraic data types over a dynamic value host.
//!
//! Sum types are declared once at runtime from ordered constructor
//! declarations. Each constructor carries named, predicate-checked
//! attributes; instances are immutable, compare structurally, and support
//! functional updates. Matching dispatches on an instance's tag and, unless
//! asked otherwise, refuses to run until every constructor is handled.
//!
//! ```text
//! let maybe = adt::sum("Maybe", |b| {
//!     b.data("Just", Schema::new().attr("value", Kind::Int))?;
//!     b.data("Nothing", Schema::new())?;
//!     Ok(())
//! })?;
//! let just = maybe.constructor("Just")?.positional([5i64])?;
//! let n = just.match_with(|m| {
//!     m.on(["Just"], |v| v.get("value").and_then(Value::as_int).unwrap_or(0))?;
//!     m.on(["Nothing"], |_| 0)?;
//!     Ok(())
//! })?;
//! ```

mod builder;
pub mod errors;
mod functions;
mod matcher;
mod name;
mod predicate;
mod record;
mod schema;
mod structure;
mod sum;
mod value;

use std::sync::Once;

pub use builder::Builder;
pub use errors::{AdtError, AdtErrorKind, AdtResult};
pub use functions::{Functions, MethodFn};
pub use matcher::Matcher;
pub use name::Name;
pub use predicate::{Kind, SharedPredicate, TypePredicate};
pub use record::{RecordOptions, RecordType, RecordValue};
pub use schema::{Args, AttrType, Schema};
pub use sum::{Constructor, SumOptions, SumType, VariantValue, CONSTRUCTOR_KEY};
pub use value::{FunctionValue, Heap, HeapData, HostFn, MapValue, Value};

/// Declare a sum type with default options (values frozen on construction).
pub fn sum(
    name: &str,
    declare: impl FnOnce(&mut Builder) -> AdtResult<()>,
) -> AdtResult<SumType> {
    sum_with(Some(name), SumOptions::default(), declare)
}

/// Declare a sum type, optionally anonymous, with explicit options.
pub fn sum_with(
    name: Option<&str>,
    options: SumOptions,
    declare: impl FnOnce(&mut Builder) -> AdtResult<()>,
) -> AdtResult<SumType> {
    let mut builder = Builder::new();
    declare(&mut builder)?;
    Ok(SumType::new(builder, name, options))
}

/// Declare a named record type with default options.
pub fn record(name: &str, schema: Schema) -> RecordType {
    RecordType::new(Some(name), schema, RecordOptions::default())
}

/// Exhaustive match on any value. Only variants can be matched.
pub fn match_value<'a, R>(
    value: &Value,
    register: impl FnOnce(&mut Matcher<'a, R>) -> AdtResult<()>,
) -> AdtResult<R> {
    match value {
        Value::Variant(variant) => variant.match_with(register),
        other => Err(errors::not_matchable(&other.type_name())),
    }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber for debugging.
///
/// Set `RUST_LOG=adt=debug` to see type construction and validation
/// failures, or `RUST_LOG=adt=trace` for binding and dispatch.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set; leave an embedding
        // application's own subscriber in place.
        if std::env::var("RUST_LOG").is_ok() {
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .try_init();
        }
    });
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
