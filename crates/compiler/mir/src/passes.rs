//! # MIR Passes
//!
//! Small pass framework: a [`MirPass`] transforms or annotates one
//! function, a [`PassManager`] runs an ordered list of passes over a
//! module. The canonical order lives in [`crate::pipeline`]; SSA
//! construction relies on the cleanup and analysis passes before it.

use crate::{analysis, FunctionBlock, MirModule};

pub mod dead_code;
pub mod simplify_branches;
pub mod ssa;

pub use dead_code::DeadCodeElimination;
pub use simplify_branches::SimplifyBranches;
pub use ssa::SsaConstruction;

/// A transformation or analysis over a single function
pub trait MirPass {
    /// Runs the pass; returns true if the function was modified
    fn run(&mut self, function: &mut FunctionBlock) -> bool;

    /// Name used in logs
    fn name(&self) -> &'static str;
}

/// Runs an ordered list of passes over every function of a module
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn MirPass>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pass to the pipeline
    pub fn add_pass(mut self, pass: impl MirPass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Runs all passes, in order, over one function
    pub fn run_on_function(&mut self, function: &mut FunctionBlock) -> bool {
        let mut modified = false;
        for pass in &mut self.passes {
            let changed = pass.run(function);
            if changed {
                log::debug!("pass '{}' modified function '{}'", pass.name(), function.name);
            }
            modified |= changed;
        }
        modified
    }

    /// Runs all passes over every function of a module
    pub fn run_on_module(&mut self, module: &mut MirModule) -> bool {
        let mut modified = false;
        for function in &mut module.functions {
            modified |= self.run_on_function(function);
        }
        modified
    }
}

/// Annotation pass wrapping the dominance computations
///
/// Fills `dominants`, `dominator`, and `frontier` on every block. Control
/// flow is untouched, so the pass never reports a modification.
pub struct DominanceAnalysis;

impl MirPass for DominanceAnalysis {
    fn run(&mut self, function: &mut FunctionBlock) -> bool {
        analysis::compute_dominators(function);
        analysis::compute_immediate_dominators(function);
        analysis::compute_dominance_frontiers(function);
        false
    }

    fn name(&self) -> &'static str {
        "DominanceAnalysis"
    }
}
