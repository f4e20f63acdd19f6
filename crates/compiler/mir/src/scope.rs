//! # Lexical Scopes
//!
//! The scope tree mirrors the nesting of compound statements in the source.
//! Each scope maps source names to the variable instance declared there;
//! resolution walks from the innermost scope outward, which is what makes
//! shadowing work.

use rustc_hash::FxHashMap;

use crate::{LoweringError, ScopeId, VariableId};

/// One lexical scope: a set of name bindings plus tree links
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    /// Parent scope, `None` only for the function root scope
    pub parent: Option<ScopeId>,

    /// Child scopes, in declaration order
    pub children: Vec<ScopeId>,

    /// Bindings declared directly in this scope
    pub bindings: FxHashMap<String, VariableId>,
}

/// The scope tree of a single function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeTree {
    scopes: index_vec::IndexVec<ScopeId, Scope>,
    root: ScopeId,
}

impl ScopeTree {
    /// Creates a tree containing only the function root scope
    pub fn new() -> Self {
        let mut scopes = index_vec::IndexVec::new();
        let root = scopes.push(Scope::default());
        Self { scopes, root }
    }

    /// Returns the function root scope
    pub const fn root(&self) -> ScopeId {
        self.root
    }

    /// Opens a new child scope under `parent`
    pub fn push_scope(&mut self, parent: ScopeId) -> ScopeId {
        let child = self.scopes.push(Scope {
            parent: Some(parent),
            ..Scope::default()
        });
        self.scopes[parent].children.push(child);
        child
    }

    /// Binds `name` in `scope`
    ///
    /// Redeclaring a name already bound in the *same* scope is an error;
    /// shadowing an outer binding is fine.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        var: VariableId,
    ) -> Result<(), LoweringError> {
        let bindings = &mut self.scopes[scope].bindings;
        if bindings.contains_key(name) {
            return Err(LoweringError::DuplicateDefinition {
                name: name.to_string(),
            });
        }
        bindings.insert(name.to_string(), var);
        Ok(())
    }

    /// Resolves `name` starting at `scope` and walking outward
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<VariableId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = &self.scopes[id];
            if let Some(var) = s.bindings.get(name) {
                return Some(*var);
            }
            current = s.parent;
        }
        None
    }

    /// Returns the scope with the given id
    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    /// Number of scopes in the tree
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_walks_outward() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let inner = tree.push_scope(root);

        tree.declare(root, "x", VariableId::from_raw(0)).unwrap();
        tree.declare(inner, "y", VariableId::from_raw(1)).unwrap();

        assert_eq!(tree.resolve(inner, "x"), Some(VariableId::from_raw(0)));
        assert_eq!(tree.resolve(inner, "y"), Some(VariableId::from_raw(1)));
        assert_eq!(tree.resolve(root, "y"), None);
        assert_eq!(tree.resolve(inner, "z"), None);
    }

    #[test]
    fn shadowing_is_allowed_across_scopes() {
        let mut tree = ScopeTree::new();
        let root = tree.root();
        let inner = tree.push_scope(root);

        tree.declare(root, "x", VariableId::from_raw(0)).unwrap();
        tree.declare(inner, "x", VariableId::from_raw(1)).unwrap();

        assert_eq!(tree.resolve(inner, "x"), Some(VariableId::from_raw(1)));
        assert_eq!(tree.resolve(root, "x"), Some(VariableId::from_raw(0)));
    }

    #[test]
    fn redeclaration_in_same_scope_is_an_error() {
        let mut tree = ScopeTree::new();
        let root = tree.root();

        tree.declare(root, "x", VariableId::from_raw(0)).unwrap();
        let err = tree.declare(root, "x", VariableId::from_raw(1));
        assert!(matches!(
            err,
            Err(LoweringError::DuplicateDefinition { .. })
        ));
    }
}
