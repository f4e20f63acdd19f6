//! # SSA Construction
//!
//! Cytron-style SSA over the variable memory operations, in two steps:
//!
//! 1. **Phi insertion.** For every variable with a cross-block use, phis
//!    are placed over the iterated dominance frontier of its definition
//!    blocks. Variables whose every load is preceded by a same-block
//!    definition never need a phi and are skipped. A phi is only placed
//!    where the variable's allocation block dominates the join, which
//!    keeps out-of-scope variables out of join blocks.
//! 2. **Renaming.** A pre-order walk of the dominator tree maintains a
//!    stack of version names per variable: stores and phis push a fresh
//!    version, loads read the top, and leaving a subtree pops what it
//!    pushed. Phi sources are filled in from each predecessor while the
//!    predecessor is being visited.
//!
//! The rewrite is non-destructive: each `Alloc`/`Load`/`Store` keeps its
//! original operands and gains its SSA counterpart in `Operation::ssa`.
//!
//! Requires [`super::DominanceAnalysis`] to have annotated the function.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::analysis::dominates;
use crate::{
    BasicBlockId, FunctionBlock, OpKind, PhiFunction, SsaName, SsaOp, VariableId,
};

use super::MirPass;

pub struct SsaConstruction;

impl MirPass for SsaConstruction {
    fn run(&mut self, function: &mut FunctionBlock) -> bool {
        let inserted = insert_phis(function);
        let renamed = rename(function);
        inserted || renamed
    }

    fn name(&self) -> &'static str {
        "SsaConstruction"
    }
}

/// Places empty phi functions over iterated dominance frontiers
fn insert_phis(function: &mut FunctionBlock) -> bool {
    // A variable is "global" when some block loads it before defining it,
    // so a version from another block can reach the load.
    let mut globals: FxHashSet<VariableId> = FxHashSet::default();
    let mut def_blocks: FxHashMap<VariableId, Vec<BasicBlockId>> = FxHashMap::default();

    for (id, block) in function.basic_blocks.iter_enumerated() {
        let mut defined_here: FxHashSet<VariableId> = FxHashSet::default();
        for op in &block.operations {
            match &op.kind {
                OpKind::Alloc { var } | OpKind::Store { var, .. } => {
                    defined_here.insert(*var);
                    def_blocks.entry(*var).or_default().push(id);
                }
                OpKind::Load { var, .. } => {
                    if !defined_here.contains(var) {
                        globals.insert(*var);
                    }
                }
                OpKind::BinaryOp { .. } | OpKind::Call { .. } => {}
            }
        }
    }

    let mut inserted = false;
    let vars: Vec<VariableId> = function.variables.iter_enumerated().map(|(v, _)| v).collect();
    for var in vars {
        if !globals.contains(&var) {
            continue;
        }
        let Some(alloc_block) = function.variables[var].defining_block else {
            continue;
        };

        let mut worklist: Vec<BasicBlockId> =
            def_blocks.get(&var).cloned().unwrap_or_default();
        let mut placed: FxHashSet<BasicBlockId> = FxHashSet::default();
        while let Some(def) = worklist.pop() {
            let frontier: Vec<BasicBlockId> =
                function.basic_blocks[def].frontier.iter().copied().collect();
            for join in frontier {
                if placed.contains(&join) {
                    continue;
                }
                // The phi would be meaningless where the variable is not
                // even in scope.
                if !dominates(function, alloc_block, join) {
                    continue;
                }
                function.basic_blocks[join]
                    .phis
                    .insert(var, PhiFunction::new(var));
                placed.insert(join);
                // The phi is itself a definition and can demand further
                // phis downstream.
                worklist.push(join);
                inserted = true;
            }
        }
    }

    if inserted {
        log::debug!("inserted phi functions in function '{}'", function.name);
    }
    inserted
}

/// Reads the current version of `var`, creating version zero on first use
///
/// The lazy creation happens at the allocation, which dominates every
/// other access; the push is recorded in `pushed` so the version goes out
/// of scope with the block that created it.
fn top_name(
    function: &mut FunctionBlock,
    stacks: &mut FxHashMap<VariableId, Vec<SsaName>>,
    pushed: &mut Vec<VariableId>,
    var: VariableId,
) -> SsaName {
    let stack = stacks.entry(var).or_default();
    if let Some(name) = stack.last() {
        return name.clone();
    }
    let name = function.fresh_ssa_name(var);
    stacks.entry(var).or_default().push(name.clone());
    pushed.push(var);
    name
}

/// Renames all memory operations and fills phi results and sources
fn rename(function: &mut FunctionBlock) -> bool {
    let mut children: FxHashMap<BasicBlockId, Vec<BasicBlockId>> = FxHashMap::default();
    for (id, block) in function.basic_blocks.iter_enumerated() {
        if let Some(idom) = block.dominator {
            children.entry(idom).or_default().push(id);
        }
    }

    let mut stacks: FxHashMap<VariableId, Vec<SsaName>> = FxHashMap::default();
    let entry = function.entry_block;
    rename_block(function, entry, &children, &mut stacks)
}

fn rename_block(
    function: &mut FunctionBlock,
    block: BasicBlockId,
    children: &FxHashMap<BasicBlockId, Vec<BasicBlockId>>,
    stacks: &mut FxHashMap<VariableId, Vec<SsaName>>,
) -> bool {
    let mut modified = false;
    let mut pushed: Vec<VariableId> = Vec::new();

    // Phi results are definitions at the very top of the block.
    let mut phi_vars: Vec<VariableId> =
        function.basic_blocks[block].phis.keys().copied().collect();
    phi_vars.sort_unstable();
    for var in phi_vars {
        let name = function.fresh_ssa_name(var);
        stacks.entry(var).or_default().push(name.clone());
        pushed.push(var);
        if let Some(phi) = function.basic_blocks[block].phis.get_mut(&var) {
            phi.result = Some(name);
            modified = true;
        }
    }

    let op_count = function.basic_blocks[block].operations.len();
    for i in 0..op_count {
        let kind = function.basic_blocks[block].operations[i].kind.clone();
        let ssa = match kind {
            OpKind::Alloc { var } => Some(SsaOp::Alloc {
                name: top_name(function, stacks, &mut pushed, var),
            }),
            OpKind::Load { dest, var } => Some(SsaOp::Load {
                dest,
                name: top_name(function, stacks, &mut pushed, var),
            }),
            OpKind::Store { var, value } => {
                let name = function.fresh_ssa_name(var);
                stacks.entry(var).or_default().push(name.clone());
                pushed.push(var);
                Some(SsaOp::Store { name, value })
            }
            OpKind::BinaryOp { .. } | OpKind::Call { .. } => None,
        };
        if ssa.is_some() {
            function.basic_blocks[block].operations[i].ssa = ssa;
            modified = true;
        }
    }

    // Fill the phi sources of every successor with the versions reaching
    // them along this edge.
    for succ in function.basic_blocks[block].successors() {
        let mut vars: Vec<VariableId> =
            function.basic_blocks[succ].phis.keys().copied().collect();
        vars.sort_unstable();
        for var in vars {
            let name = top_name(function, stacks, &mut pushed, var);
            if let Some(phi) = function.basic_blocks[succ].phis.get_mut(&var) {
                phi.sources.push((block, name));
            }
        }
    }

    for child in children.get(&block).cloned().unwrap_or_default() {
        modified |= rename_block(function, child, children, stacks);
    }

    // Leaving the subtree: undo this block's definitions, newest first.
    for var in pushed.into_iter().rev() {
        if let Some(stack) = stacks.get_mut(&var) {
            stack.pop();
        }
    }
    modified
}

#[cfg(test)]
#[path = "ssa_tests.rs"]
mod tests;
