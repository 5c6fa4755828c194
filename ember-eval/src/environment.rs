//! Name bindings of the interpreter.

use ember_value::Value;
use std::collections::HashMap;

type Scope = HashMap<String, Value>;

/// A stack of lexical scopes. The bottom scope holds the globals and is never popped.
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Number of scopes, globals included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Binds `ident` in the innermost scope. Shadows any outer binding with the same name.
    pub fn define(&mut self, ident: impl Into<String>, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(ident.into(), value);
        }
    }

    /// Resolves `ident` from the innermost scope outwards.
    pub fn get(&self, ident: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(ident))
    }

    /// Updates the nearest binding of `ident`.
    /// Returns `false` if `ident` is not bound.
    pub fn assign(&mut self, ident: &str, value: Value) -> bool {
        match self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(ident))
        {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Hides every scope but the globals and returns them so that a function body only sees globals.
    /// Must be paired with [`Self::leave_frame`].
    pub fn enter_frame(&mut self) -> Vec<Scope> {
        self.scopes.split_off(1)
    }

    /// Restores the scopes hidden by [`Self::enter_frame`], dropping the scopes of the frame.
    pub fn leave_frame(&mut self, saved: Vec<Scope>) {
        self.scopes.truncate(1);
        self.scopes.extend(saved);
    }
}
