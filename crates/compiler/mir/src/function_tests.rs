//! Tests for CFG edge maintenance and validation on hand-built functions.

use crate::{FunctionBlock, MirType, Terminator, Value};

fn empty_function() -> FunctionBlock {
    FunctionBlock::new("test".to_string(), MirType::Void)
}

#[test]
fn add_block_names_carry_the_index() {
    let mut f = empty_function();
    let b1 = f.add_block("if.then");
    let b2 = f.add_block("if.merge");

    assert_eq!(f.basic_blocks[f.entry_block].name, "entry$0");
    assert_eq!(f.basic_blocks[b1].name, "if.then$1");
    assert_eq!(f.basic_blocks[b2].name, "if.merge$2");
}

#[test]
fn set_terminator_with_edges_maintains_preds() {
    let mut f = empty_function();
    let a = f.add_block("a");
    let b = f.add_block("b");

    f.set_terminator_with_edges(f.entry_block, Terminator::jump(a));
    assert_eq!(f.basic_blocks[a].preds, vec![f.entry_block]);

    // Retargeting drops the old edge and records the new one.
    f.set_terminator_with_edges(f.entry_block, Terminator::jump(b));
    assert!(f.basic_blocks[a].preds.is_empty());
    assert_eq!(f.basic_blocks[b].preds, vec![f.entry_block]);
}

#[test]
fn branch_with_equal_targets_records_two_pred_entries() {
    let mut f = empty_function();
    let target = f.add_block("merge");

    f.set_terminator_with_edges(
        f.entry_block,
        Terminator::branch(Value::boolean(true), target, target),
    );
    assert_eq!(f.basic_blocks[target].preds, vec![f.entry_block, f.entry_block]);
}

#[test]
fn replace_edge_moves_pred_entries() {
    let mut f = empty_function();
    let old = f.add_block("old");
    let new = f.add_block("new");

    f.set_terminator_with_edges(f.entry_block, Terminator::jump(old));
    f.replace_edge(f.entry_block, old, new);

    assert_eq!(f.basic_blocks[f.entry_block].terminator, Terminator::jump(new));
    assert!(f.basic_blocks[old].preds.is_empty());
    assert_eq!(f.basic_blocks[new].preds, vec![f.entry_block]);
}

#[test]
fn validate_accepts_a_consistent_cfg() {
    let mut f = empty_function();
    let exit = f.add_block("exit");
    f.set_terminator_with_edges(f.entry_block, Terminator::jump(exit));
    f.set_terminator_with_edges(exit, Terminator::return_void());

    assert!(f.validate().is_ok());
}

#[test]
fn validate_rejects_unresolved_terminators() {
    let mut f = empty_function();
    let dangling = f.add_block("dangling");
    f.set_terminator_with_edges(f.entry_block, Terminator::jump(dangling));

    let err = f.validate().unwrap_err();
    assert!(err.contains("unresolved terminator"), "{err}");
}

#[test]
fn validate_rejects_missing_pred_entries() {
    let mut f = empty_function();
    let target = f.add_block("target");
    // Bypass the edge helpers to break the invariant on purpose.
    f.basic_blocks[f.entry_block].terminator = Terminator::jump(target);
    f.basic_blocks[target].terminator = Terminator::return_void();

    assert!(f.validate().is_err());
}

#[test]
fn instance_names_disambiguate_shadowing() {
    let mut f = empty_function();
    let root = f.scopes.root();
    let outer = f.new_variable("x", MirType::Int, root);
    let inner = f.new_variable("x", MirType::Int, root);

    assert_eq!(f.variables[outer].name, "x$0");
    assert_eq!(f.variables[inner].name, "x$1");
    assert_eq!(f.variables[inner].source_name, "x");
}

#[test]
fn ssa_versions_count_up_per_variable() {
    let mut f = empty_function();
    let root = f.scopes.root();
    let x = f.new_variable("x", MirType::Int, root);
    let y = f.new_variable("y", MirType::Int, root);

    assert_eq!(f.fresh_ssa_name(x), "x$0_v.0");
    assert_eq!(f.fresh_ssa_name(x), "x$0_v.1");
    assert_eq!(f.fresh_ssa_name(y), "y$0_v.0");
    assert_eq!(f.fresh_ssa_name(x), "x$0_v.2");
}
