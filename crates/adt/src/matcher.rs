//! Exhaustiveness-checked dispatch tables.
//!
//! A `Matcher` lives for exactly one match call:
//!
//! - **open**: the registration closure adds handlers with `on` and
//!   `otherwise`. Each `on` call validates all of its tags before touching
//!   the table, so a failed call registers nothing.
//! - **rejected**: registration failed, or an exhaustive call found
//!   unhandled constructors. The error is returned and no handler runs.
//! - **dispatched**: the handler for the receiver's tag ran (or, for a
//!   non-exhaustive effect, nothing was registered for it).
//!
//! Handlers are reference counted so one closure can serve several tags.

use std::fmt;
use std::rc::Rc;

use crate::errors::{
    duplicate_handler, empty_handler_tags, invalid_constructor, non_exhaustive_match, AdtResult,
};
use crate::sum::{SumType, VariantValue};
use crate::Name;

type Handler<'a, R> = Rc<dyn Fn(&VariantValue) -> R + 'a>;

/// Mapping from constructor to handler for one sum type.
pub struct Matcher<'a, R> {
    sum: SumType,
    /// Indexed by variant, in declaration order.
    handlers: Vec<Option<Handler<'a, R>>>,
}

impl<'a, R> Matcher<'a, R> {
    pub(crate) fn new(sum: &SumType) -> Self {
        Matcher {
            sum: sum.clone(),
            handlers: (0..sum.len()).map(|_| None).collect(),
        }
    }

    /// The sum type being matched.
    pub fn sum_type(&self) -> &SumType {
        &self.sum
    }

    /// Register `handler` for every constructor in `tags`.
    pub fn on<T: AsRef<str>>(
        &mut self,
        tags: impl IntoIterator<Item = T>,
        handler: impl Fn(&VariantValue) -> R + 'a,
    ) -> AdtResult<&mut Self> {
        let mut indices: Vec<usize> = Vec::new();
        for tag in tags {
            let tag = tag.as_ref();
            let index = Name::lookup(tag)
                .and_then(|name| self.sum.index_of(name))
                .ok_or_else(|| invalid_constructor(tag))?;
            if self.handlers[index].is_some() || indices.contains(&index) {
                return Err(duplicate_handler(self.sum.class(index).tag()));
            }
            indices.push(index);
        }
        if indices.is_empty() {
            return Err(empty_handler_tags());
        }

        let handler: Handler<'a, R> = Rc::new(handler);
        for &index in &indices {
            self.handlers[index] = Some(Rc::clone(&handler));
        }
        tracing::trace!(
            sum = %self.sum,
            handled = indices.len(),
            "registered handler"
        );
        Ok(self)
    }

    /// Register `handler` for every constructor not yet handled.
    pub fn otherwise(&mut self, handler: impl Fn(&VariantValue) -> R + 'a) -> &mut Self {
        let handler: Handler<'a, R> = Rc::new(handler);
        for slot in self.handlers.iter_mut().filter(|slot| slot.is_none()) {
            *slot = Some(Rc::clone(&handler));
        }
        self
    }

    /// Whether every constructor has a handler.
    pub fn is_exhaustive(&self) -> bool {
        self.handlers.iter().all(Option::is_some)
    }

    /// Constructors without a handler, in declaration order.
    pub fn unhandled_constructors(&self) -> Vec<Name> {
        self.handlers
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(index, _)| self.sum.class(index).tag())
            .collect()
    }

    pub fn is_handled(&self, tag: &str) -> bool {
        Name::lookup(tag)
            .and_then(|name| self.sum.index_of(name))
            .is_some_and(|index| self.handlers[index].is_some())
    }

    pub(crate) fn ensure_exhaustive(&self) -> AdtResult<()> {
        let unhandled = self.unhandled_constructors();
        if unhandled.is_empty() {
            Ok(())
        } else {
            tracing::debug!(sum = %self.sum, ?unhandled, "non-exhaustive match");
            Err(non_exhaustive_match(unhandled))
        }
    }

    /// Run the handler for `value`'s tag, if any.
    pub(crate) fn dispatch(&self, value: &VariantValue) -> Option<R> {
        debug_assert!(value.sum_type() == &self.sum);
        let handler = self.handlers.get(value.index())?.as_ref()?;
        tracing::trace!(variant = %value.tag(), "dispatching");
        Some(handler(value))
    }
}

impl<R> fmt::Debug for Matcher<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handled: Vec<Name> = self
            .handlers
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| self.sum.class(index).tag())
            .collect();
        f.debug_struct("Matcher")
            .field("sum", &self.sum.display_name())
            .field("handled", &handled)
            .finish()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
