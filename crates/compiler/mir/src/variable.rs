//! # Variables
//!
//! A [`Variable`] is a declared storage location: a function parameter, a
//! `let`-style declaration in the source, or a compiler-synthesized slot
//! (the hidden return value, ternary temporaries). Shadowed declarations of
//! the same source name get distinct variables with distinct instance names,
//! so by the time the CFG exists every storage location is unambiguous.

use crate::{BasicBlockId, MirType, ScopeId};

/// A declared storage location within a function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Unique instance name within the function, e.g. `x$0`, `x$1`
    ///
    /// The suffix disambiguates shadowed declarations; it is assigned at
    /// lowering time from a per-source-name counter.
    pub name: String,

    /// The source-level name this instance was declared under
    pub source_name: String,

    /// Semantic type of the stored value
    pub ty: MirType,

    /// The lexical scope the declaration belongs to
    pub scope: ScopeId,

    /// The block containing the allocation for this variable
    ///
    /// `None` until lowering emits the alloc, and reset to `None` if dead
    /// code elimination removes the defining block.
    pub defining_block: Option<BasicBlockId>,
}

impl Variable {
    pub fn new(name: String, source_name: String, ty: MirType, scope: ScopeId) -> Self {
        Self {
            name,
            source_name,
            ty,
            scope,
            defining_block: None,
        }
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}
