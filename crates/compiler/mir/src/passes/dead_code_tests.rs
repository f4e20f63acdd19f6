//! Dead code elimination tests, including randomized CFGs.

use proptest::prelude::*;

use super::{mark_dead, DeadCodeElimination};
use crate::passes::MirPass;
use crate::{BasicBlockId, FunctionBlock, MirType, Operation, Terminator, Value};

fn new_function() -> FunctionBlock {
    FunctionBlock::new("test".to_string(), MirType::Void)
}

#[test]
fn unreachable_block_is_removed_and_ids_compact() {
    let mut f = new_function();
    let orphan = f.add_block("orphan");
    let exit = f.add_block("exit");
    f.set_terminator_with_edges(f.entry_block, Terminator::jump(exit));
    f.set_terminator_with_edges(orphan, Terminator::jump(exit));
    f.set_terminator_with_edges(exit, Terminator::return_void());

    let modified = DeadCodeElimination.run(&mut f);
    assert!(modified);
    assert_eq!(f.basic_blocks.len(), 2);
    f.validate().unwrap();

    // The surviving exit block was renumbered down.
    let exit = f.block_by_name_prefix("exit").unwrap();
    assert_eq!(exit, BasicBlockId::from_usize(1));
    assert_eq!(
        f.basic_blocks[f.entry_block].terminator,
        Terminator::jump(exit)
    );
    assert_eq!(f.basic_blocks[exit].preds, vec![f.entry_block]);
}

#[test]
fn orphaned_pred_entries_are_dropped() {
    let mut f = new_function();
    let dead = f.add_block("dead");
    let exit = f.add_block("exit");
    f.set_terminator_with_edges(f.entry_block, Terminator::jump(exit));
    // The dead block also feeds the exit; its pred entry must vanish.
    f.set_terminator_with_edges(dead, Terminator::jump(exit));
    f.set_terminator_with_edges(exit, Terminator::return_void());
    assert_eq!(f.basic_blocks[exit].preds.len(), 2);

    DeadCodeElimination.run(&mut f);
    let exit = f.block_by_name_prefix("exit").unwrap();
    assert_eq!(f.basic_blocks[exit].preds, vec![f.entry_block]);
}

#[test]
fn fully_live_graph_is_untouched() {
    let mut f = new_function();
    let exit = f.add_block("exit");
    f.set_terminator_with_edges(f.entry_block, Terminator::jump(exit));
    f.set_terminator_with_edges(exit, Terminator::return_void());

    let modified = DeadCodeElimination.run(&mut f);
    assert!(!modified);
    assert_eq!(f.basic_blocks.len(), 2);
}

#[test]
fn dead_return_block_is_cleared() {
    let mut f = new_function();
    let ret = f.add_block("ret");
    f.return_block = Some(ret);
    f.set_terminator_with_edges(ret, Terminator::return_void());
    // The entry returns directly; the designated return block is orphaned.
    f.set_terminator_with_edges(f.entry_block, Terminator::return_void());

    DeadCodeElimination.run(&mut f);
    assert_eq!(f.return_block, None);
}

#[test]
fn defining_block_of_a_dead_alloc_is_cleared() {
    let mut f = new_function();
    let root = f.scopes.root();
    let var = f.new_variable("x", MirType::Int, root);
    let dead = f.add_block("dead");
    f.variables[var].defining_block = Some(dead);
    f.basic_blocks[dead].push_op(Operation::alloc(var));
    f.set_terminator_with_edges(dead, Terminator::return_void());
    f.set_terminator_with_edges(f.entry_block, Terminator::return_void());

    DeadCodeElimination.run(&mut f);
    assert_eq!(f.variables[var].defining_block, None);
}

#[test]
fn unreachable_cycle_is_removed() {
    let mut f = new_function();
    let a = f.add_block("a");
    let b = f.add_block("b");
    f.set_terminator_with_edges(a, Terminator::jump(b));
    f.set_terminator_with_edges(b, Terminator::jump(a));
    f.set_terminator_with_edges(f.entry_block, Terminator::return_void());

    DeadCodeElimination.run(&mut f);
    assert_eq!(f.basic_blocks.len(), 1);
    f.validate().unwrap();
}

/// Builds a function from `(kind, a, b)` triples, one per block after the
/// entry. Kind selects the terminator; targets are taken modulo the block
/// count so every id is in range.
fn arbitrary_cfg(shape: &[(u8, usize, usize)]) -> FunctionBlock {
    let mut f = new_function();
    let mut ids = vec![f.entry_block];
    for i in 0..shape.len() {
        ids.push(f.add_block(&format!("b{i}")));
    }
    let n = ids.len();
    // The entry always jumps to the first generated block if present.
    if n > 1 {
        f.set_terminator_with_edges(ids[0], Terminator::jump(ids[1 % n]));
    } else {
        f.set_terminator_with_edges(ids[0], Terminator::return_void());
    }
    for (i, (kind, a, b)) in shape.iter().enumerate() {
        let id = ids[i + 1];
        let term = match kind % 3 {
            0 => Terminator::jump(ids[a % n]),
            1 => Terminator::branch(Value::boolean(true), ids[a % n], ids[b % n]),
            _ => Terminator::return_void(),
        };
        f.set_terminator_with_edges(id, term);
    }
    f
}

proptest! {
    #[test]
    fn mark_dead_is_idempotent(shape in prop::collection::vec((any::<u8>(), 0usize..16, 0usize..16), 0..10)) {
        let mut f = arbitrary_cfg(&shape);
        mark_dead(&mut f);
        let first: Vec<bool> = f.basic_blocks.iter().map(|b| b.dead).collect();
        mark_dead(&mut f);
        let second: Vec<bool> = f.basic_blocks.iter().map(|b| b.dead).collect();
        prop_assert_eq!(first, second);
        prop_assert!(!f.basic_blocks[f.entry_block].dead);
    }

    #[test]
    fn elimination_leaves_a_valid_fully_live_graph(shape in prop::collection::vec((any::<u8>(), 0usize..16, 0usize..16), 0..10)) {
        let mut f = arbitrary_cfg(&shape);
        DeadCodeElimination.run(&mut f);
        prop_assert!(f.validate().is_ok());
        mark_dead(&mut f);
        prop_assert!(f.basic_blocks.iter().all(|b| !b.dead));
    }
}
