//! # Rill Intermediate Representation (MIR)
//!
//! This crate is the middle-end of the Rill compiler. It lowers the parsed
//! AST into a Control Flow Graph of basic blocks, normalizes and prunes that
//! graph, computes dominator and dominance-frontier information, and finally
//! rewrites variable accesses into Static Single Assignment form with
//! explicit phi functions.
//!
//! ## Architecture
//!
//! ```text
//! MirModule
//!   functions: IndexVec<FunctionId, FunctionBlock>
//!
//! FunctionBlock
//!   basic_blocks: IndexVec<BasicBlockId, BasicBlock>
//!   variables:    IndexVec<VariableId, Variable>
//!   scopes:       ScopeTree
//!   entry_block / return_block
//!
//! BasicBlock
//!   operations: Vec<Operation>
//!   terminator: Terminator
//!   preds + dominance annotations + phi map
//! ```
//!
//! ## Pipeline
//!
//! The stages run in a fixed order per function; each stage assumes the
//! invariants established by the previous one:
//!
//! AST -> lowering -> simplify branches -> dead code elimination ->
//! dominators -> immediate dominators -> dominance frontiers -> SSA
//!
//! SSA rewriting is non-destructive: every memory operation keeps its
//! original form and carries its SSA-renamed counterpart alongside it, so
//! both are inspectable after the pipeline runs.

pub use basic_block::{BasicBlock, PhiFunction};
pub use errors::{LoweringError, PipelineError};
pub use function::FunctionBlock;
pub use lowering::{lower_function, lower_module, CfgBuilder};
pub use mir_types::MirType;
pub use module::MirModule;
pub use operation::{BinOp, OpKind, Operation, SsaName, SsaOp};
pub use passes::{
    DeadCodeElimination, DominanceAnalysis, MirPass, PassManager, SimplifyBranches,
    SsaConstruction,
};
pub use pipeline::{compile, run_pipeline, PipelineConfig};
pub use scope::{Scope, ScopeTree};
pub use terminator::Terminator;
pub use value::{Literal, Value};
pub use variable::Variable;

pub mod analysis;
pub mod basic_block;
pub mod errors;
pub mod function;
pub mod lowering;
pub mod mir_types;
pub mod module;
pub mod operation;
pub mod passes;
pub mod pipeline;
pub mod scope;
pub mod terminator;
pub mod value;
pub mod variable;

// --- Core Identifiers ---

index_vec::define_index_type! {
    /// Unique identifier for a function within a MIR module
    pub struct FunctionId = usize;
}

index_vec::define_index_type! {
    /// Unique identifier for a basic block within a function
    pub struct BasicBlockId = usize;
}

index_vec::define_index_type! {
    /// Unique identifier for a value (virtual register) within a function
    pub struct ValueId = usize;
}

index_vec::define_index_type! {
    /// Unique identifier for a declared storage location within a function
    pub struct VariableId = usize;
}

index_vec::define_index_type! {
    /// Unique identifier for a lexical scope within a function
    pub struct ScopeId = usize;
}

// --- Pretty Printing Support ---

/// Trait for pretty-printing MIR constructs
pub trait PrettyPrint {
    fn pretty_print(&self, indent: usize) -> String;
}

/// Helper function to create indentation
pub(crate) fn indent_str(level: usize) -> String {
    "  ".repeat(level)
}
