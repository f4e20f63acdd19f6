//! # Basic Blocks
//!
//! A basic block is a straight-line run of operations ending in exactly one
//! terminator. Predecessors are stored on the block; successors are always
//! derived from the terminator, so the two views cannot drift apart as long
//! as edits go through the [`crate::FunctionBlock`] edge helpers.
//!
//! Dominance annotations (`dominator`, `dominants`, `frontier`) and the phi
//! map live directly on the block and are filled in by the analysis passes.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{BasicBlockId, Operation, PrettyPrint, SsaName, Terminator, VariableId};

/// A phi function placed at the top of a join block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhiFunction {
    /// The variable this phi merges
    pub var: VariableId,

    /// The fresh SSA version the phi defines, assigned during renaming
    pub result: Option<SsaName>,

    /// One `(predecessor, reaching version)` pair per incoming edge,
    /// filled in during renaming
    pub sources: Vec<(BasicBlockId, SsaName)>,
}

impl PhiFunction {
    pub const fn new(var: VariableId) -> Self {
        Self {
            var,
            result: None,
            sources: Vec::new(),
        }
    }
}

/// A basic block in the control flow graph
#[derive(Debug, Clone, PartialEq)]
pub struct BasicBlock {
    /// Human-readable label, e.g. `entry$0`, `if.then$3`
    pub name: String,

    /// The operations of the block, in execution order
    pub operations: Vec<Operation>,

    /// The single terminator
    pub terminator: Terminator,

    /// Predecessor blocks, one entry per incoming edge
    ///
    /// A block appearing twice as predecessor (both arms of an `If`) is
    /// listed twice.
    pub preds: Vec<BasicBlockId>,

    /// Set by dead code elimination before compaction
    pub dead: bool,

    /// Scratch flag used by graph traversals
    pub marked: bool,

    /// Immediate dominator, `None` for the entry block
    pub dominator: Option<BasicBlockId>,

    /// All blocks this block strictly dominates
    pub dominants: Vec<BasicBlockId>,

    /// Dominance frontier of this block
    pub frontier: FxHashSet<BasicBlockId>,

    /// Phi functions inserted at this block, keyed by variable
    pub phis: FxHashMap<VariableId, PhiFunction>,

    /// Variables whose declaration (alloc) lives in this block
    pub ssa_defines: FxHashSet<VariableId>,
}

impl BasicBlock {
    /// Creates an empty block with an unresolved terminator
    pub fn new(name: String) -> Self {
        Self {
            name,
            operations: Vec::new(),
            terminator: Terminator::unreachable(),
            preds: Vec::new(),
            dead: false,
            marked: false,
            dominator: None,
            dominants: Vec::new(),
            frontier: FxHashSet::default(),
            phis: FxHashMap::default(),
            ssa_defines: FxHashSet::default(),
        }
    }

    /// Appends an operation to the block
    pub fn push_op(&mut self, op: Operation) {
        self.operations.push(op);
    }

    /// Successor blocks, derived from the terminator
    pub fn successors(&self) -> Vec<BasicBlockId> {
        self.terminator.target_blocks()
    }

    /// Records an incoming edge from `pred`
    pub fn add_pred(&mut self, pred: BasicBlockId) {
        self.preds.push(pred);
    }

    /// Removes one incoming edge from `pred`
    ///
    /// Only one occurrence is removed so that a double edge (both arms of a
    /// branch) keeps its remaining copy.
    pub fn remove_pred(&mut self, pred: BasicBlockId) {
        if let Some(pos) = self.preds.iter().position(|p| *p == pred) {
            self.preds.remove(pos);
        }
    }

    /// Returns true if the block carries a real terminator
    pub const fn is_terminated(&self) -> bool {
        self.terminator.is_resolved()
    }

    /// Returns true if the block has no operations and no phis
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty() && self.phis.is_empty()
    }

    /// Clears all dominance annotations
    ///
    /// Called before the dominance passes recompute them, so stale results
    /// from a previous run cannot leak through.
    pub fn reset_dominance(&mut self) {
        self.dominator = None;
        self.dominants.clear();
        self.frontier.clear();
    }

    /// Checks structural invariants of the block in isolation
    pub fn validate(&self) -> Result<(), String> {
        if !self.is_terminated() {
            return Err(format!("block '{}' has an unresolved terminator", self.name));
        }
        for phi in self.phis.values() {
            if phi.sources.len() > self.preds.len() {
                return Err(format!(
                    "block '{}' has a phi with more sources than predecessors",
                    self.name
                ));
            }
        }
        Ok(())
    }
}

impl PrettyPrint for BasicBlock {
    fn pretty_print(&self, indent: usize) -> String {
        let pad = crate::indent_str(indent);
        let mut out = format!("{pad}{}:\n", self.name);

        let mut phi_vars: Vec<_> = self.phis.keys().copied().collect();
        phi_vars.sort();
        for var in phi_vars {
            let phi = &self.phis[&var];
            let result = phi.result.as_deref().unwrap_or("?");
            let sources = phi
                .sources
                .iter()
                .map(|(block, name)| format!("[bb{}: {name}]", block.index()))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!(
                "{}{result} = phi({sources})\n",
                crate::indent_str(indent + 1)
            ));
        }

        for op in &self.operations {
            out.push_str(&op.pretty_print(indent + 1));
            out.push('\n');
        }
        out.push_str(&self.terminator.pretty_print(indent + 1));
        out.push('\n');
        out
    }
}
