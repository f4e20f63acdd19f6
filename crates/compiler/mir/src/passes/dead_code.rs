//! # Dead Code Elimination
//!
//! Two steps: mark every block unreachable from the entry as dead, then
//! compact the block arena so only live blocks remain. Compaction
//! renumbers blocks, so every stored [`crate::BasicBlockId`] is remapped:
//! terminator targets, predecessor lists, the return block, and variable
//! definition sites.
//!
//! Lowering produces unreachable blocks as a matter of course (code after
//! `return`, placeholder chains), so this pass runs in every pipeline.

use index_vec::IndexVec;
use rustc_hash::FxHashMap;

use crate::{BasicBlockId, FunctionBlock};

use super::MirPass;

pub struct DeadCodeElimination;

impl MirPass for DeadCodeElimination {
    fn run(&mut self, function: &mut FunctionBlock) -> bool {
        mark_dead(function);
        if function.basic_blocks.iter().all(|b| !b.dead) {
            return false;
        }
        compact(function);
        true
    }

    fn name(&self) -> &'static str {
        "DeadCodeElimination"
    }
}

/// Sets the `dead` flag on every block not reachable from the entry
///
/// Split out from the pass so reachability can be queried without
/// committing to the renumbering. Running it twice yields the same flags.
pub fn mark_dead(function: &mut FunctionBlock) {
    for block in &mut function.basic_blocks {
        block.dead = true;
        block.marked = false;
    }

    let entry = function.entry_block;
    function.basic_blocks[entry].marked = true;
    let mut stack = vec![entry];
    while let Some(id) = stack.pop() {
        function.basic_blocks[id].dead = false;
        for succ in function.basic_blocks[id].successors() {
            if !function.basic_blocks[succ].marked {
                function.basic_blocks[succ].marked = true;
                stack.push(succ);
            }
        }
    }
}

/// Drops dead blocks and renumbers the survivors
fn compact(function: &mut FunctionBlock) {
    let mut remap: FxHashMap<BasicBlockId, BasicBlockId> = FxHashMap::default();
    let mut next = 0usize;
    for (id, block) in function.basic_blocks.iter_enumerated() {
        if !block.dead {
            remap.insert(id, BasicBlockId::from_usize(next));
            next += 1;
        }
    }
    let dead_count = function.basic_blocks.len() - next;
    log::debug!(
        "removing {dead_count} dead block(s) from function '{}'",
        function.name
    );

    let old_blocks = std::mem::take(&mut function.basic_blocks);
    let mut new_blocks = IndexVec::with_capacity(next);
    for (id, mut block) in old_blocks.into_iter_enumerated() {
        if block.dead {
            continue;
        }
        block.terminator.remap_targets(|t| remap[&t]);
        block.preds = block
            .preds
            .iter()
            .filter_map(|p| remap.get(p).copied())
            .collect();
        debug_assert_eq!(new_blocks.len(), remap[&id].index());
        new_blocks.push(block);
    }
    function.basic_blocks = new_blocks;

    // The entry is reachable by definition and always survives.
    function.entry_block = remap[&function.entry_block];
    function.return_block = function
        .return_block
        .and_then(|rb| remap.get(&rb).copied());
    for variable in &mut function.variables {
        variable.defining_block = variable
            .defining_block
            .and_then(|db| remap.get(&db).copied());
    }
}

#[cfg(test)]
#[path = "dead_code_tests.rs"]
mod tests;
