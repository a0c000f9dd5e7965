//! Reference cells.
//!
//! A [`Var`] is a named mutable binding. The dispatcher dereferences a var
//! source exactly once before resolving the call, so rebinding a var's root
//! redirects every later call made through it.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::error::{CallError, CallResult};
use super::object::Object;

/// A namespace-qualified reference cell.
#[derive(Debug)]
pub struct Var {
    namespace: Arc<str>,
    name: Arc<str>,
    root: RwLock<Option<Object>>,
}

impl Var {
    /// Create an unbound var
    pub fn new(namespace: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            root: RwLock::new(None),
        }
    }

    /// Create a var bound to `root`
    pub fn with_root(
        namespace: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
        root: Object,
    ) -> Self {
        let var = Self::new(namespace, name);
        *var.root.write() = Some(root);
        var
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `namespace/name`
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// Replace the root binding
    pub fn bind_root(&self, value: Object) {
        *self.root.write() = Some(value);
    }

    pub fn is_bound(&self) -> bool {
        self.root.read().is_some()
    }

    /// Current root value
    pub fn deref(&self) -> CallResult<Object> {
        self.root
            .read()
            .clone()
            .ok_or_else(|| CallError::UnboundVar(self.qualified_name()))
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#'{}/{}", self.namespace, self.name)
    }
}
