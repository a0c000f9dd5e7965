//! Runtime context.
//!
//! A [`RuntimeContext`] owns the state shared by call sites of one embedding:
//! the var registry, the configuration, and the last error recorded at the C
//! boundary. It is passed explicitly; there is no process-wide instance.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::{init_tracing, ConfigError, RuntimeConfig};
use crate::types::{CallError, Var};

type VarKey = (Arc<str>, Arc<str>);

/// Shared runtime state.
#[derive(Debug)]
pub struct RuntimeContext {
    config: RuntimeConfig,
    vars: DashMap<VarKey, Arc<Var>>,
    last_error: Mutex<Option<String>>,
}

impl RuntimeContext {
    /// Create a context, installing the log subscriber if configured
    pub fn new(config: RuntimeConfig) -> Result<Self, ConfigError> {
        if config.install_log_subscriber {
            init_tracing(&config)?;
        }
        debug!(
            target: "calltron::context",
            namespace = %config.default_namespace,
            "runtime context created"
        );
        Ok(Self {
            config,
            vars: DashMap::new(),
            last_error: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn default_namespace(&self) -> &str {
        &self.config.default_namespace
    }

    // -------------------------------------------------------------------------
    // Vars
    // -------------------------------------------------------------------------

    /// The var named `namespace/name`, created unbound on first use
    pub fn intern_var(&self, namespace: &str, name: &str) -> Arc<Var> {
        let key: VarKey = (Arc::from(namespace), Arc::from(name));
        let entry = self.vars.entry(key).or_insert_with(|| {
            trace!(target: "calltron::context", namespace, name, "interning var");
            Arc::new(Var::new(namespace, name))
        });
        Arc::clone(entry.value())
    }

    /// Intern in the default namespace
    pub fn intern_default(&self, name: &str) -> Arc<Var> {
        self.intern_var(&self.config.default_namespace, name)
    }

    /// The var named `namespace/name`, if interned
    pub fn find_var(&self, namespace: &str, name: &str) -> Option<Arc<Var>> {
        let key: VarKey = (Arc::from(namespace), Arc::from(name));
        self.vars.get(&key).map(|entry| Arc::clone(entry.value()))
    }

    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    // -------------------------------------------------------------------------
    // Last error
    // -------------------------------------------------------------------------

    /// Remember `error` as the most recent failure
    pub fn record_error(&self, error: &CallError) {
        trace!(target: "calltron::context", error = %error, "recording error");
        *self.last_error.lock() = Some(error.to_string());
    }

    /// Take the most recent failure, clearing it
    pub fn take_last_error(&self) -> Option<String> {
        self.last_error.lock().take()
    }

    pub fn clear_error(&self) {
        *self.last_error.lock() = None;
    }
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self {
            config: RuntimeConfig::default(),
            vars: DashMap::new(),
            last_error: Mutex::new(None),
        }
    }
}
