//! Lexically scoped environment chain.
//!
//! Each [`Environment`] owns its local bindings and holds a shared handle
//! to its parent scope. Name resolution walks innermost → outermost.
//! The chain is deliberately *not* a plain stack: a closure keeps a
//! handle to the environment that was current at its definition, so that
//! environment lives as long as its longest holder — possibly well past
//! the call frame that created it.

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One lexical scope: local bindings plus an optional parent scope.
#[derive(Debug, Default)]
pub struct Environment {
    parent: Option<Rc<RefCell<Environment>>>,
    bindings: HashMap<String, Value>,
}

impl Environment {
    /// Create a root scope with no parent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope chained to `parent`.
    pub fn with_parent(parent: Rc<RefCell<Environment>>) -> Self {
        Self {
            parent: Some(parent),
            bindings: HashMap::new(),
        }
    }

    /// Declare a name in this scope, bound to integer 0.
    ///
    /// Returns `false` if the name already exists in this scope (the
    /// caller reports the duplicate-declaration error). Shadowing an
    /// ancestor scope's binding is fine.
    pub fn declare(&mut self, name: &str) -> bool {
        if self.bindings.contains_key(name) {
            return false;
        }
        self.bindings.insert(name.to_string(), Value::Int(0));
        true
    }

    /// Bind a name in this scope, overwriting any local binding.
    ///
    /// Used for intrinsics, call parameters, and function literals, which
    /// are rebindable by design.
    pub fn bind(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    /// Look up a name, searching this scope and then each ancestor.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.get(name) {
            return Some(value.clone());
        }
        self.parent
            .as_ref()
            .and_then(|parent| parent.borrow().get(name))
    }

    /// Overwrite an existing binding in the nearest scope that owns the
    /// name, walking outward. Returns `false` if no scope binds it.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        if let Some(slot) = self.bindings.get_mut(name) {
            *slot = value;
            return true;
        }
        match &self.parent {
            Some(parent) => parent.borrow_mut().assign(name, value),
            None => false,
        }
    }

    /// Whether this scope (ancestors excluded) binds the name.
    pub fn is_declared_locally(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }
}
