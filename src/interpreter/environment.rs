// File: src/interpreter/environment.rs
//
// Lexical scoping environment (the symbol table) of the Emo interpreter.
// Implements a stack of scopes where inner scopes shadow outer scopes.

use super::value::Value;
use crate::errors::{find_closest_match, EmoError, SourceLocation};
use crate::glyphs;
use std::collections::HashMap;
use std::fmt::Write as _;
use tracing::trace;

/// Variable storage using lexical scoping
///
/// The Environment maintains a stack of scopes (Vec<HashMap>). Lookups search
/// from the innermost scope (end of Vec) outward. A fresh environment has no
/// scope at all; the interpreter pushes the root scope when a program starts.
///
/// # Examples
///
/// ```
/// use emo::interpreter::{Environment, Value};
/// use emo::errors::SourceLocation;
///
/// let mut env = Environment::new();
/// env.push_scope();
/// env.declare("x", Value::Int(10), SourceLocation::unknown()).unwrap();
///
/// env.push_scope();
/// env.declare("x", Value::Int(20), SourceLocation::unknown()).unwrap();
/// assert_eq!(env.get("x"), Some(&Value::Int(20)));
///
/// env.pop_scope();
/// assert_eq!(env.get("x"), Some(&Value::Int(10)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Environment {
    scopes: Vec<HashMap<String, Value>>,
}

impl Environment {
    /// Create an environment with no scopes
    pub fn new() -> Self {
        Environment { scopes: Vec::new() }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn scopes(&self) -> &[HashMap<String, Value>] {
        &self.scopes
    }

    /// Push a new scope onto the stack (entering a block)
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
        trace!(depth = self.scopes.len(), "push scope");
    }

    /// Pop the innermost scope from the stack (leaving a block)
    pub fn pop_scope(&mut self) {
        self.scopes.pop();
        trace!(depth = self.scopes.len(), "pop scope");
    }

    /// Get a variable, searching from inner to outer scopes
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Index of the innermost scope holding `name`
    pub fn find(&self, name: &str) -> Option<usize> {
        self.scopes.iter().rposition(|scope| scope.contains_key(name))
    }

    /// Read a variable or fail with an undeclared-variable error
    pub fn lookup(&self, name: &str, location: SourceLocation) -> Result<Value, EmoError> {
        self.get(name).cloned().ok_or_else(|| self.undeclared(name, location))
    }

    /// Bind `name` in the innermost scope; fails if that scope already holds it
    pub fn declare(&mut self, name: &str, value: Value, location: SourceLocation) -> Result<(), EmoError> {
        if self.scopes.is_empty() {
            self.push_scope();
        }
        let Some(scope) = self.scopes.last_mut() else {
            return Ok(());
        };
        if scope.contains_key(name) {
            return Err(EmoError::redeclaration(name, location));
        }
        scope.insert(name.to_string(), value);
        Ok(())
    }

    /// Update the innermost binding of `name`; fails if no scope holds it
    pub fn assign(&mut self, name: &str, value: Value, location: SourceLocation) -> Result<(), EmoError> {
        match self.find(name) {
            Some(index) => {
                self.scopes[index].insert(name.to_string(), value);
                Ok(())
            }
            None => Err(self.undeclared(name, location)),
        }
    }

    fn undeclared(&self, name: &str, location: SourceLocation) -> EmoError {
        let err = EmoError::undeclared_variable(name, location);
        let visible = self.scopes.iter().flat_map(|scope| scope.keys().map(String::as_str));
        match find_closest_match(name, visible) {
            Some(close) => err.with_suggestion(close.to_string()),
            None => err.with_help(format!(
                "declare it first with `decl {}` ({})",
                name,
                glyphs::glyph_for("decl").unwrap_or_default()
            )),
        }
    }

    /// Scope-by-scope listing of bound names, outermost first
    pub fn dump(&self) -> String {
        let mut out = String::from("Symbol Table Debug:\n");
        for (index, scope) in self.scopes.iter().enumerate() {
            let mut names: Vec<&String> = scope.keys().collect();
            names.sort();
            let _ = write!(out, "Scope {}:", index);
            for name in names {
                let _ = write!(out, " {}", name);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn here() -> SourceLocation {
        SourceLocation::new(1, 1)
    }

    #[test]
    fn redeclaring_in_same_scope_fails() {
        let mut env = Environment::new();
        env.push_scope();
        env.declare("x", Value::Unit, here()).unwrap();
        let err = env.declare("x", Value::Int(1), here()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Redeclaration);
    }

    #[test]
    fn shadowing_an_outer_scope_is_allowed() {
        let mut env = Environment::new();
        env.push_scope();
        env.declare("x", Value::Int(1), here()).unwrap();
        env.push_scope();
        env.declare("x", Value::Int(2), here()).unwrap();
        env.assign("x", Value::Int(3), here()).unwrap();
        env.pop_scope();
        assert_eq!(env.get("x"), Some(&Value::Int(1)));
    }

    #[test]
    fn assignment_reaches_the_owning_scope() {
        let mut env = Environment::new();
        env.push_scope();
        env.declare("total", Value::Int(0), here()).unwrap();
        env.push_scope();
        env.assign("total", Value::Int(5), here()).unwrap();
        env.pop_scope();
        assert_eq!(env.get("total"), Some(&Value::Int(5)));
    }

    #[test]
    fn undeclared_names_fail_with_a_suggestion() {
        let mut env = Environment::new();
        env.push_scope();
        env.declare("counter", Value::Int(0), here()).unwrap();

        let err = env.assign("countr", Value::Int(1), here()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndeclaredVariable);
        assert_eq!(err.suggestion.as_deref(), Some("counter"));

        let err = env.lookup("zzzzzzzzz", here()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndeclaredVariable);
        assert!(err.suggestion.is_none());
        assert!(err.help.is_some());
    }

    #[test]
    fn dump_lists_names_per_scope() {
        let mut env = Environment::new();
        env.push_scope();
        env.declare("b", Value::Unit, here()).unwrap();
        env.declare("a", Value::Unit, here()).unwrap();
        env.push_scope();
        assert_eq!(env.dump(), "Symbol Table Debug:\nScope 0: a b\nScope 1:\n");
    }
}
