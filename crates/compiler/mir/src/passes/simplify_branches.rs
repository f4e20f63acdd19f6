//! # Branch Simplification
//!
//! Structural cleanup of the freshly lowered graph, run to a fixpoint:
//!
//! 1. A conditional branch whose arms coincide becomes a plain jump.
//! 2. An empty block that only jumps forward is folded away: its
//!    predecessors jump to its target directly. Folding only applies when
//!    the target itself ends in a plain jump, so blocks sitting directly
//!    in front of a branch or return keep their identity.
//!
//! The pass runs before dominance and SSA, so blocks never carry phis
//! here; the emptiness check still covers them for safety.

use crate::{BasicBlockId, FunctionBlock, Terminator};

use super::MirPass;

pub struct SimplifyBranches;

impl MirPass for SimplifyBranches {
    fn run(&mut self, function: &mut FunctionBlock) -> bool {
        let mut modified = false;
        loop {
            let mut changed = false;
            changed |= collapse_trivial_branches(function);
            changed |= fold_empty_blocks(function);
            if !changed {
                break;
            }
            modified = true;
        }
        modified
    }

    fn name(&self) -> &'static str {
        "SimplifyBranches"
    }
}

/// Rewrites `if c then X else X` into `jump X`
fn collapse_trivial_branches(function: &mut FunctionBlock) -> bool {
    let mut modified = false;
    let ids: Vec<BasicBlockId> = function.block_ids().collect();
    for id in ids {
        if let Terminator::If {
            then_target,
            else_target,
            ..
        } = function.basic_blocks[id].terminator
        {
            if then_target == else_target {
                function.set_terminator_with_edges(id, Terminator::jump(then_target));
                modified = true;
            }
        }
    }
    modified
}

/// Retargets predecessors of empty forwarding blocks past them
///
/// The folded block keeps its jump and becomes unreachable; dead code
/// elimination removes it afterwards.
fn fold_empty_blocks(function: &mut FunctionBlock) -> bool {
    let mut modified = false;
    let ids: Vec<BasicBlockId> = function.block_ids().collect();
    for id in ids {
        if id == function.entry_block {
            continue;
        }
        let block = &function.basic_blocks[id];
        if !block.is_empty() || block.preds.is_empty() {
            continue;
        }
        let Terminator::Jump { target } = block.terminator else {
            continue;
        };
        if target == id {
            continue;
        }
        if !matches!(
            function.basic_blocks[target].terminator,
            Terminator::Jump { .. }
        ) {
            continue;
        }

        let mut preds: Vec<BasicBlockId> = function.basic_blocks[id].preds.clone();
        preds.sort_unstable();
        preds.dedup();
        for pred in preds {
            function.replace_edge(pred, id, target);
        }
        modified = true;
    }
    modified
}
