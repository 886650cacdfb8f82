//! Shared, freezable storage for container values.
//!
//! Cloning a `Heap` shares the cell: two `Value::Str` clones observe each
//! other's updates, like references in a dynamic host. Freezing is one-way
//! and shallow: the cell rejects updates afterwards, but values stored
//! inside it keep their own frozen state.
//!
//! A list or map may end up containing itself. Formatting, hashing and
//! equality track the cells they are inside of on the current thread and
//! stop when they reach one again.

use parking_lot::{RwLock, RwLockReadGuard};
use rustc_hash::FxHashSet;
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::{frozen_value, AdtResult};

/// Data that can live in a `Heap` cell.
pub trait HeapData {
    /// Host type name reported when a frozen cell rejects an update.
    const TYPE_NAME: &'static str;
}

struct HeapCell<T> {
    data: RwLock<T>,
    frozen: AtomicBool,
}

/// Reference-counted container cell with a frozen flag.
///
/// Constructed only through the `Value` factory methods.
pub struct Heap<T>(Arc<HeapCell<T>>);

/// A recursive traversal that may revisit cells.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Walk {
    Fmt,
    Hash,
    Eq,
}

type WalkKey = (Walk, *const (), *const ());

thread_local! {
    static ACTIVE_WALKS: RefCell<FxHashSet<WalkKey>> = RefCell::new(FxHashSet::default());
}

/// Marks a cell (or a pair of cells, for equality) as entered until dropped.
pub(crate) struct WalkGuard(WalkKey);

impl WalkGuard {
    /// `None` if the same walk is already inside `key` on this thread.
    fn enter(key: WalkKey) -> Option<WalkGuard> {
        ACTIVE_WALKS
            .with(|active| active.borrow_mut().insert(key))
            .then_some(WalkGuard(key))
    }
}

impl Drop for WalkGuard {
    fn drop(&mut self) {
        let _ = ACTIVE_WALKS.try_with(|active| active.borrow_mut().remove(&self.0));
    }
}

impl<T> Heap<T> {
    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0).cast()
    }

    /// Enter this cell for `walk`, or `None` if the walk is already inside it.
    pub(crate) fn enter(&self, walk: Walk) -> Option<WalkGuard> {
        WalkGuard::enter((walk, self.addr(), ptr::null()))
    }
}

impl<T: HeapData> Heap<T> {
    #[inline]
    pub(crate) fn new(data: T) -> Self {
        Heap(Arc::new(HeapCell {
            data: RwLock::new(data),
            frozen: AtomicBool::new(false),
        }))
    }

    /// Borrow the contents.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.data.read()
    }

    /// Mutate the contents in place.
    ///
    /// Fails with `FrozenValue` once the cell has been frozen.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> AdtResult<R> {
        let mut guard = self.0.data.write();
        if self.is_frozen() {
            return Err(frozen_value(T::TYPE_NAME));
        }
        Ok(f(&mut guard))
    }

    /// Freeze the cell. Idempotent.
    pub fn freeze(&self) {
        // Taking the write lock orders the flag after any in-flight update.
        let _guard = self.0.data.write();
        self.0.frozen.store(true, Ordering::Release);
    }

    /// Whether the cell has been frozen.
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.0.frozen.load(Ordering::Acquire)
    }

    /// Whether both handles share one cell.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for Heap<T> {
    fn clone(&self) -> Self {
        Heap(Arc::clone(&self.0))
    }
}

impl<T: HeapData + PartialEq> PartialEq for Heap<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        // A pair reached again while comparing it is assumed equal.
        match WalkGuard::enter((Walk::Eq, self.addr(), other.addr())) {
            Some(_walk) => *self.read() == *other.read(),
            None => true,
        }
    }
}

impl<T: HeapData + Eq> Eq for Heap<T> {}

impl<T: HeapData + Hash> Hash for Heap<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.enter(Walk::Hash) {
            Some(_walk) => self.read().hash(state),
            None => T::TYPE_NAME.hash(state),
        }
    }
}

impl<T: HeapData + fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.enter(Walk::Fmt) {
            Some(_walk) => fmt::Debug::fmt(&*self.read(), f),
            None => f.write_str("..."),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
