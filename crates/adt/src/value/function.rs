//! Host function values.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::Value;
use crate::errors::AdtResult;
use crate::Name;

/// Signature of a host function body.
pub type HostFn = dyn Fn(&[Value]) -> AdtResult<Value> + Send + Sync;

/// A callable value. Equal only to itself (identity of the body).
#[derive(Clone)]
pub struct FunctionValue {
    name: Name,
    func: Arc<HostFn>,
}

impl FunctionValue {
    /// Wrap a closure as a function value.
    pub fn new(
        name: &str,
        func: impl Fn(&[Value]) -> AdtResult<Value> + Send + Sync + 'static,
    ) -> Self {
        FunctionValue {
            name: Name::intern(name),
            func: Arc::new(func),
        }
    }

    /// Display name given at creation.
    pub fn name(&self) -> Name {
        self.name
    }

    /// Invoke the function.
    pub fn call(&self, args: &[Value]) -> AdtResult<Value> {
        (self.func)(args)
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.func).cast::<()>()
    }
}

impl PartialEq for FunctionValue {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.addr(), other.addr())
    }
}

impl Eq for FunctionValue {}

impl Hash for FunctionValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.addr(), state);
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionValue({})", self.name)
    }
}
