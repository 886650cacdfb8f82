//! Interned identifiers for tags, attribute names and symbols.
//!
//! Every constructor tag, attribute name and symbol value goes through one
//! process-wide interner. Interned strings are leaked, so `Name::as_str`
//! hands out `&'static str` and a `Name` stays valid for the process lifetime.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::LazyLock;

/// Interned string identifier.
///
/// Two names are equal iff their strings are equal. Ordering follows
/// interning order, not string order.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

/// Storage behind the global interner.
struct Interner {
    map: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

static INTERNER: LazyLock<RwLock<Interner>> = LazyLock::new(|| {
    let mut interner = Interner {
        map: FxHashMap::default(),
        strings: Vec::with_capacity(256),
    };
    // Pre-intern the empty string at index 0
    interner.map.insert("", 0);
    interner.strings.push("");
    RwLock::new(interner)
});

impl Name {
    /// Pre-interned empty string.
    pub const EMPTY: Name = Name(0);

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct strings are interned.
    pub fn intern(s: &str) -> Name {
        // Fast path: already interned
        if let Some(&index) = INTERNER.read().map.get(s) {
            return Name(index);
        }

        let mut guard = INTERNER.write();

        // Double-check after acquiring write lock
        if let Some(&index) = guard.map.get(s) {
            return Name(index);
        }

        let index = u32::try_from(guard.strings.len())
            .unwrap_or_else(|_| panic!("name interner exceeded {} entries", u32::MAX));
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        guard.strings.push(leaked);
        guard.map.insert(leaked, index);
        Name(index)
    }

    /// Look up a string without interning it.
    ///
    /// Returns `None` if the string has never been interned, which also means
    /// no tag or attribute can carry that name.
    pub fn lookup(s: &str) -> Option<Name> {
        INTERNER.read().map.get(s).copied().map(Name)
    }

    /// The interned string.
    pub fn as_str(self) -> &'static str {
        let guard = INTERNER.read();
        // Every Name was produced by `intern`, so the index is in bounds.
        guard.strings.get(self.0 as usize).copied().unwrap_or("")
    }

    /// Get raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", self.as_str())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name::intern(s)
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Name::intern(&s)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
