//! Name resolution for rendering and static evaluation.
//!
//! Both tables are explicit values handed to each call, never looked up from the
//! caller's frame, so a render pass only depends on its arguments.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::runtime::{Props, Value, FRAGMENT};

/// A component: called with the element's props (children included).
pub type ComponentFn = dyn Fn(&Props) -> anyhow::Result<Value> + Send + Sync;

#[derive(Clone)]
pub enum Binding {
    Component(Arc<ComponentFn>),
    Fragment,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Component(_) => f.write_str("Binding::Component(..)"),
            Binding::Fragment => f.write_str("Binding::Fragment"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESOLUTION ENVIRONMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Identifier → component table consulted by the renderer.
#[derive(Debug, Clone)]
pub struct Environment {
    bindings: HashMap<String, Binding>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// An environment with `Fragment` bound to the fragment marker, mirroring the
    /// names imported by compiled output.
    pub fn new() -> Self {
        let mut env = Self::empty();
        env.bind_fragment(FRAGMENT);
        env
    }

    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn register<F>(&mut self, name: &str, component: F)
    where
        F: Fn(&Props) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.bindings
            .insert(name.to_string(), Binding::Component(Arc::new(component)));
    }

    pub fn with_component<F>(mut self, name: &str, component: F) -> Self
    where
        F: Fn(&Props) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.register(name, component);
        self
    }

    pub fn bind_fragment(&mut self, name: &str) {
        self.bindings.insert(name.to_string(), Binding::Fragment);
    }

    pub fn resolve(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// EVALUATION SCOPE
// ═══════════════════════════════════════════════════════════════════════════════

/// Identifier → value table for evaluating code splices.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    values: HashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}
