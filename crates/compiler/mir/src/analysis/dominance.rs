//! # Dominance
//!
//! Three passes over one function, run in order:
//!
//! 1. [`compute_dominators`] fills `dominants` on every block: the set of
//!    blocks it strictly dominates. It uses the vertex-removal
//!    formulation: X dominates Y exactly when removing X from the graph
//!    makes Y unreachable from the entry.
//! 2. [`compute_immediate_dominators`] fills `dominator` on every block:
//!    the unique strict dominator with no other dominator between it and
//!    the block. This is the parent link of the dominator tree.
//! 3. [`compute_dominance_frontiers`] fills `frontier`: for each join
//!    block, walks from every predecessor up the dominator tree to the
//!    join's immediate dominator, adding the join along the way.
//!
//! All three expect a graph where every block is reachable, which dead
//! code elimination guarantees.

use crate::{BasicBlockId, FunctionBlock};

/// Computes, for every block, the set of blocks it strictly dominates
///
/// Quadratic in the number of blocks, which is fine at the function sizes
/// this compiler sees and keeps the definition and the code identical.
pub fn compute_dominators(function: &mut FunctionBlock) {
    for block in &mut function.basic_blocks {
        block.reset_dominance();
    }

    let entry = function.entry_block;
    let all: Vec<BasicBlockId> = function.block_ids().collect();

    for x in all.iter().copied() {
        let dominated: Vec<BasicBlockId> = if x == entry {
            // Every path starts at the entry, so it dominates everything.
            all.iter().copied().filter(|b| *b != entry).collect()
        } else {
            // Reachability with X removed. Blocks the walk cannot reach
            // anymore are exactly the blocks X dominates.
            for block in &mut function.basic_blocks {
                block.marked = false;
            }
            function.basic_blocks[x].marked = true;
            function.basic_blocks[entry].marked = true;

            let mut stack = vec![entry];
            while let Some(b) = stack.pop() {
                for succ in function.basic_blocks[b].successors() {
                    if !function.basic_blocks[succ].marked {
                        function.basic_blocks[succ].marked = true;
                        stack.push(succ);
                    }
                }
            }

            all.iter()
                .copied()
                .filter(|b| *b != x && !function.basic_blocks[*b].marked)
                .collect()
        };
        function.basic_blocks[x].dominants = dominated;
    }
}

/// Returns true if `x` dominates `y` (reflexively)
///
/// Requires [`compute_dominators`] to have run.
pub fn dominates(function: &FunctionBlock, x: BasicBlockId, y: BasicBlockId) -> bool {
    x == y || function.basic_blocks[x].dominants.contains(&y)
}

/// Fills the `dominator` (immediate dominator) link on every block
///
/// X is the immediate dominator of Y when X strictly dominates Y and no
/// other strict dominator of Y sits between the two.
pub fn compute_immediate_dominators(function: &mut FunctionBlock) {
    let all: Vec<BasicBlockId> = function.block_ids().collect();

    for y in all.iter().copied() {
        if y == function.entry_block {
            continue;
        }
        let strict_doms: Vec<BasicBlockId> = all
            .iter()
            .copied()
            .filter(|x| *x != y && function.basic_blocks[*x].dominants.contains(&y))
            .collect();

        let idom = strict_doms.iter().copied().find(|x| {
            strict_doms
                .iter()
                .all(|m| m == x || !function.basic_blocks[*x].dominants.contains(m))
        });
        function.basic_blocks[y].dominator = idom;
    }
}

/// Fills the dominance `frontier` set on every block
///
/// Requires [`compute_immediate_dominators`] to have run. Only join
/// blocks (two or more predecessors) can appear in a frontier.
pub fn compute_dominance_frontiers(function: &mut FunctionBlock) {
    let all: Vec<BasicBlockId> = function.block_ids().collect();

    for join in all {
        let preds = function.basic_blocks[join].preds.clone();
        if preds.len() < 2 {
            continue;
        }
        let idom = function.basic_blocks[join].dominator;
        for pred in preds {
            // Walk from the predecessor up the dominator tree; every
            // block strictly below the join's idom sees the join as a
            // frontier block.
            let mut runner = Some(pred);
            while let Some(r) = runner {
                if Some(r) == idom {
                    break;
                }
                function.basic_blocks[r].frontier.insert(join);
                runner = function.basic_blocks[r].dominator;
            }
        }
    }
}
