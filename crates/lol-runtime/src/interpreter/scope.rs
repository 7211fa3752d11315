//! Scope arena
//!
//! Scopes are stored in a `Vec` and refer to their parent by index. Index 0
//! is the global scope. Call frames push a scope and truncate the arena back
//! when they finish, so parents always sit at lower indices than children.

use crate::interpreter::Interpreter;
use crate::span::Span;
use crate::value::{RuntimeError, Value};
use std::collections::HashMap;

/// Index of a scope in the arena
pub type ScopeId = usize;

/// The global scope is always the first arena entry
pub const GLOBAL_SCOPE: ScopeId = 0;

/// A single name-to-value mapping with an optional parent
#[derive(Debug, Default)]
pub struct Scope {
    pub(super) vars: HashMap<String, Value>,
    pub(super) parent: Option<ScopeId>,
}

impl Scope {
    pub fn new(parent: Option<ScopeId>) -> Self {
        Self {
            vars: HashMap::new(),
            parent,
        }
    }
}

impl Interpreter {
    /// Walk the scope chain from the current scope outwards
    fn scope_chain(&self) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(self.current_scope), move |&id| self.scopes[id].parent)
    }

    /// Look a name up along the scope chain
    pub(super) fn lookup(&self, name: &str) -> Option<Value> {
        self.scope_chain()
            .find_map(|id| self.scopes[id].vars.get(name).cloned())
    }

    /// Bind a new name in the current scope
    pub(super) fn declare(&mut self, name: &str, value: Value, span: Span) -> Result<(), RuntimeError> {
        let scope = &mut self.scopes[self.current_scope];
        if scope.vars.contains_key(name) {
            return Err(RuntimeError::DuplicateDeclaration {
                name: name.to_string(),
                span,
            });
        }
        scope.vars.insert(name.to_string(), value);
        Ok(())
    }

    /// Whether `name` is already bound in the current scope
    pub(super) fn declared_here(&self, name: &str) -> bool {
        self.scopes[self.current_scope].vars.contains_key(name)
    }

    /// Bind a name in the current scope, replacing any previous binding there
    pub(super) fn define(&mut self, name: &str, value: Value) {
        self.scopes[self.current_scope]
            .vars
            .insert(name.to_string(), value);
    }

    /// Update the innermost existing binding of `name`
    pub(super) fn assign(&mut self, name: &str, value: Value, span: Span) -> Result<(), RuntimeError> {
        let owner = self
            .scope_chain()
            .find(|&id| self.scopes[id].vars.contains_key(name));

        match owner {
            Some(id) => {
                self.scopes[id].vars.insert(name.to_string(), value);
                Ok(())
            }
            None => Err(RuntimeError::UndeclaredVariable {
                name: name.to_string(),
                span,
            }),
        }
    }

    /// Number of live scopes, including the global scope
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Interpreter;

    #[test]
    fn test_declare_and_lookup() {
        let mut interp = Interpreter::new();
        interp.declare("X", Value::Numbr(1), Span::dummy()).unwrap();
        assert_eq!(interp.lookup("X"), Some(Value::Numbr(1)));
        assert_eq!(interp.lookup("Y"), None);
    }

    #[test]
    fn test_duplicate_declaration() {
        let mut interp = Interpreter::new();
        interp.declare("X", Value::Noob, Span::dummy()).unwrap();
        let err = interp.declare("X", Value::Numbr(2), Span::dummy()).unwrap_err();
        assert!(matches!(err, RuntimeError::DuplicateDeclaration { .. }));
    }

    #[test]
    fn test_assign_updates_outer_scope() {
        let mut interp = Interpreter::new();
        interp.declare("X", Value::Numbr(1), Span::dummy()).unwrap();
        interp.scopes.push(Scope::new(Some(GLOBAL_SCOPE)));
        interp.current_scope = 1;

        interp.assign("X", Value::Numbr(2), Span::dummy()).unwrap();
        assert!(interp.scopes[1].vars.is_empty());
        assert_eq!(interp.scopes[GLOBAL_SCOPE].vars.get("X"), Some(&Value::Numbr(2)));
    }

    #[test]
    fn test_assign_undeclared() {
        let mut interp = Interpreter::new();
        let err = interp.assign("NOPE", Value::Noob, Span::dummy()).unwrap_err();
        assert!(matches!(err, RuntimeError::UndeclaredVariable { ref name, .. } if name == "NOPE"));
    }

    #[test]
    fn test_shadowing_in_child_scope() {
        let mut interp = Interpreter::new();
        interp.declare("X", Value::Numbr(1), Span::dummy()).unwrap();
        interp.scopes.push(Scope::new(Some(GLOBAL_SCOPE)));
        interp.current_scope = 1;

        interp.declare("X", Value::Numbr(5), Span::dummy()).unwrap();
        assert_eq!(interp.lookup("X"), Some(Value::Numbr(5)));
        interp.current_scope = GLOBAL_SCOPE;
        assert_eq!(interp.lookup("X"), Some(Value::Numbr(1)));
    }
}
