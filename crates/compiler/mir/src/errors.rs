//! # Error Taxonomy
//!
//! Lowering failures are user-facing (bad programs); pipeline failures wrap
//! those plus internal validation breakage caught between stages.

use thiserror::Error;

/// Errors produced while lowering the AST to MIR
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoweringError {
    #[error("duplicate definition of '{name}'")]
    DuplicateDefinition { name: String },

    #[error("use of undefined variable '{name}'")]
    UndefinedVariable { name: String },

    #[error("malformed AST: {0}")]
    MalformedAst(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

/// Errors produced by the full compilation pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Lowering(#[from] LoweringError),

    #[error("MIR validation failed: {0}")]
    Validation(String),
}
