//! # Compilation Pipeline
//!
//! Front door of the crate: [`compile`] lowers a program and runs the
//! full pass sequence, leaving a validated module in SSA form. The
//! [`PipelineConfig`] switches exist for debugging; the defaults are what
//! every caller wants.

use crate::passes::{
    DeadCodeElimination, DominanceAnalysis, MirPass, PassManager, SimplifyBranches,
    SsaConstruction,
};
use crate::{lower_module, MirModule, PipelineError};

/// Pipeline switches
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// Run branch simplification before dead code elimination
    pub simplify: bool,

    /// Validate the module after lowering and after the passes
    pub validate: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            simplify: true,
            validate: true,
        }
    }
}

/// Runs the pass pipeline over an already-lowered module
pub fn run_pipeline(module: &mut MirModule, config: &PipelineConfig) -> Result<(), PipelineError> {
    if config.validate {
        module.validate().map_err(PipelineError::Validation)?;
    }

    let mut manager = PassManager::new();
    if config.simplify {
        manager = manager.add_pass(SimplifyBranches);
    }
    let mut manager = manager
        .add_pass(DeadCodeElimination)
        .add_pass(DominanceAnalysis)
        .add_pass(SsaConstruction);
    manager.run_on_module(module);

    if config.validate {
        module.validate().map_err(PipelineError::Validation)?;
    }
    Ok(())
}

/// Lowers a program and runs the full pipeline
pub fn compile(
    program: &rill_compiler_ast::Program,
    config: &PipelineConfig,
) -> Result<MirModule, PipelineError> {
    log::info!("compiling {} function(s)", program.functions.len());
    let mut module = lower_module(program)?;
    run_pipeline(&mut module, config)?;
    Ok(module)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
