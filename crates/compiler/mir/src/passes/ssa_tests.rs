//! SSA construction tests on hand-built, pre-analyzed CFGs.

use super::SsaConstruction;
use crate::passes::{DominanceAnalysis, MirPass};
use crate::{
    BasicBlockId, FunctionBlock, MirType, Operation, SsaOp, Terminator, Value, VariableId,
};

fn new_function() -> FunctionBlock {
    FunctionBlock::new("test".to_string(), MirType::Void)
}

fn run_ssa(function: &mut FunctionBlock) {
    DominanceAnalysis.run(function);
    SsaConstruction.run(function);
}

fn alloc_in(f: &mut FunctionBlock, block: BasicBlockId, name: &str) -> VariableId {
    let root = f.scopes.root();
    let var = f.new_variable(name, MirType::Int, root);
    f.variables[var].defining_block = Some(block);
    f.basic_blocks[block].ssa_defines.insert(var);
    f.basic_blocks[block].push_op(Operation::alloc(var));
    var
}

fn store_ssa_name(f: &FunctionBlock, block: BasicBlockId, index: usize) -> String {
    match &f.basic_blocks[block].operations[index].ssa {
        Some(SsaOp::Store { name, .. }) => name.clone(),
        other => panic!("expected a renamed store, got {other:?}"),
    }
}

fn load_ssa_name(f: &FunctionBlock, block: BasicBlockId, index: usize) -> String {
    match &f.basic_blocks[block].operations[index].ssa {
        Some(SsaOp::Load { name, .. }) => name.clone(),
        other => panic!("expected a renamed load, got {other:?}"),
    }
}

/// entry: x = 1; branch; then: x = 2; else: x = 3; merge: use x
fn diamond_with_stores() -> (FunctionBlock, [BasicBlockId; 5], VariableId) {
    let mut f = new_function();
    let then_b = f.add_block("then");
    let else_b = f.add_block("else");
    let merge = f.add_block("merge");
    let exit = f.add_block("exit");
    let entry = f.entry_block;

    let x = alloc_in(&mut f, entry, "x");
    f.basic_blocks[entry].push_op(Operation::store(x, Value::int(1)));
    f.set_terminator_with_edges(
        entry,
        Terminator::branch(Value::boolean(true), then_b, else_b),
    );

    f.basic_blocks[then_b].push_op(Operation::store(x, Value::int(2)));
    f.set_terminator_with_edges(then_b, Terminator::jump(merge));

    f.basic_blocks[else_b].push_op(Operation::store(x, Value::int(3)));
    f.set_terminator_with_edges(else_b, Terminator::jump(merge));

    let dest = f.new_value_id();
    f.basic_blocks[merge].push_op(Operation::load(dest, x));
    f.set_terminator_with_edges(merge, Terminator::jump(exit));
    f.set_terminator_with_edges(exit, Terminator::return_void());

    (f, [entry, then_b, else_b, merge, exit], x)
}

#[test]
fn diamond_merge_gets_exactly_one_phi() {
    let (mut f, [entry, then_b, else_b, merge, exit], x) = diamond_with_stores();
    run_ssa(&mut f);

    assert_eq!(f.basic_blocks[merge].phis.len(), 1);
    let phi = &f.basic_blocks[merge].phis[&x];
    assert_eq!(phi.var, x);
    assert_eq!(phi.sources.len(), 2);

    // Each arm feeds its own store version into the phi.
    let then_version = store_ssa_name(&f, then_b, 0);
    let else_version = store_ssa_name(&f, else_b, 0);
    assert!(phi.sources.contains(&(then_b, then_version)));
    assert!(phi.sources.contains(&(else_b, else_version)));

    // The load at the merge reads the phi result, not either store.
    let phi_result = phi.result.clone().unwrap();
    assert_eq!(load_ssa_name(&f, merge, 0), phi_result);

    // No phis anywhere else.
    for b in [entry, then_b, else_b, exit] {
        assert!(f.basic_blocks[b].phis.is_empty());
    }
}

#[test]
fn diamond_versions_are_distinct_and_ordered() {
    let (mut f, [entry, then_b, else_b, _merge, _exit], _x) = diamond_with_stores();
    run_ssa(&mut f);

    let alloc_version = match &f.basic_blocks[entry].operations[0].ssa {
        Some(SsaOp::Alloc { name }) => name.clone(),
        other => panic!("expected a renamed alloc, got {other:?}"),
    };
    assert_eq!(alloc_version, "x$0_v.0");
    assert_eq!(store_ssa_name(&f, entry, 1), "x$0_v.1");
    assert_ne!(store_ssa_name(&f, then_b, 0), store_ssa_name(&f, else_b, 0));
}

/// entry: i = 0; cond: use i, branch(body, exit); body: i = i + 1
fn counting_loop() -> (FunctionBlock, [BasicBlockId; 4], VariableId) {
    let mut f = new_function();
    let cond = f.add_block("cond");
    let body = f.add_block("body");
    let exit = f.add_block("exit");
    let entry = f.entry_block;

    let i = alloc_in(&mut f, entry, "i");
    f.basic_blocks[entry].push_op(Operation::store(i, Value::int(0)));
    f.set_terminator_with_edges(entry, Terminator::jump(cond));

    let cond_load = f.new_value_id();
    f.basic_blocks[cond].push_op(Operation::load(cond_load, i));
    f.set_terminator_with_edges(
        cond,
        Terminator::branch(Value::operand(cond_load), body, exit),
    );

    let body_load = f.new_value_id();
    let sum = f.new_value_id();
    f.basic_blocks[body].push_op(Operation::load(body_load, i));
    f.basic_blocks[body].push_op(Operation::binary_op(
        crate::BinOp::Add,
        sum,
        Value::operand(body_load),
        Value::int(1),
    ));
    f.basic_blocks[body].push_op(Operation::store(i, Value::operand(sum)));
    f.set_terminator_with_edges(body, Terminator::jump(cond));
    f.set_terminator_with_edges(exit, Terminator::return_void());

    (f, [entry, cond, body, exit], i)
}

#[test]
fn loop_variable_gets_a_phi_at_the_header() {
    let (mut f, [entry, cond, body, exit], i) = counting_loop();
    run_ssa(&mut f);

    assert_eq!(f.basic_blocks[cond].phis.len(), 1);
    let phi = &f.basic_blocks[cond].phis[&i];
    assert_eq!(phi.sources.len(), 2);

    let init_version = store_ssa_name(&f, entry, 1);
    let step_version = store_ssa_name(&f, body, 2);
    assert!(phi.sources.contains(&(entry, init_version)));
    assert!(phi.sources.contains(&(body, step_version)));

    // Both loads read the merged version.
    let phi_result = phi.result.clone().unwrap();
    assert_eq!(load_ssa_name(&f, cond, 0), phi_result);
    assert_eq!(load_ssa_name(&f, body, 0), phi_result);

    assert!(f.basic_blocks[entry].phis.is_empty());
    assert!(f.basic_blocks[body].phis.is_empty());
    assert!(f.basic_blocks[exit].phis.is_empty());
}

#[test]
fn block_local_variable_needs_no_phi() {
    // Both arms define-then-use their own copy; nothing crosses blocks.
    let mut f = new_function();
    let then_b = f.add_block("then");
    let else_b = f.add_block("else");
    let merge = f.add_block("merge");
    let entry = f.entry_block;

    let t = alloc_in(&mut f, entry, "t");
    f.set_terminator_with_edges(
        entry,
        Terminator::branch(Value::boolean(true), then_b, else_b),
    );
    for arm in [then_b, else_b] {
        f.basic_blocks[arm].push_op(Operation::store(t, Value::int(1)));
        let dest = f.new_value_id();
        f.basic_blocks[arm].push_op(Operation::load(dest, t));
        f.set_terminator_with_edges(arm, Terminator::jump(merge));
    }
    f.set_terminator_with_edges(merge, Terminator::return_void());

    run_ssa(&mut f);
    assert!(f.basic_blocks[merge].phis.is_empty());
}

#[test]
fn phi_is_not_placed_outside_the_allocation_scope() {
    // The variable lives only in the then arm; its frontier join must not
    // receive a phi because the allocation does not dominate it.
    let mut f = new_function();
    let then_b = f.add_block("then");
    let else_b = f.add_block("else");
    let merge = f.add_block("merge");
    let entry = f.entry_block;

    f.set_terminator_with_edges(
        entry,
        Terminator::branch(Value::boolean(true), then_b, else_b),
    );
    let y = alloc_in(&mut f, then_b, "y");
    f.basic_blocks[then_b].push_op(Operation::store(y, Value::int(1)));
    f.set_terminator_with_edges(then_b, Terminator::jump(merge));
    f.set_terminator_with_edges(else_b, Terminator::jump(merge));
    // A cross-block read makes the variable a phi candidate; only the
    // scope guard keeps the join clean.
    let dest = f.new_value_id();
    f.basic_blocks[merge].push_op(Operation::load(dest, y));
    f.set_terminator_with_edges(merge, Terminator::return_void());

    run_ssa(&mut f);
    assert!(f.basic_blocks[merge].phis.is_empty());
}

#[test]
fn every_version_is_assigned_exactly_once() {
    let (mut f, _, _) = diamond_with_stores();
    run_ssa(&mut f);

    let mut defined: Vec<String> = Vec::new();
    for block in &f.basic_blocks {
        for phi in block.phis.values() {
            defined.push(phi.result.clone().unwrap());
        }
        for op in &block.operations {
            match &op.ssa {
                Some(SsaOp::Store { name, .. }) | Some(SsaOp::Alloc { name }) => {
                    defined.push(name.clone());
                }
                _ => {}
            }
        }
    }
    let mut unique = defined.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), defined.len(), "duplicate SSA definition");
}

#[test]
fn straight_line_code_gets_no_phis_and_sequential_versions() {
    let mut f = new_function();
    let exit = f.add_block("exit");
    let entry = f.entry_block;

    let x = alloc_in(&mut f, entry, "x");
    f.basic_blocks[entry].push_op(Operation::store(x, Value::int(1)));
    f.basic_blocks[entry].push_op(Operation::store(x, Value::int(2)));
    let dest = f.new_value_id();
    f.basic_blocks[entry].push_op(Operation::load(dest, x));
    f.set_terminator_with_edges(entry, Terminator::jump(exit));
    f.set_terminator_with_edges(exit, Terminator::return_void());

    run_ssa(&mut f);

    assert!(f.basic_blocks.iter().all(|b| b.phis.is_empty()));
    assert_eq!(store_ssa_name(&f, entry, 1), "x$0_v.1");
    assert_eq!(store_ssa_name(&f, entry, 2), "x$0_v.2");
    // The load reads the latest store.
    assert_eq!(load_ssa_name(&f, entry, 3), "x$0_v.2");
}
