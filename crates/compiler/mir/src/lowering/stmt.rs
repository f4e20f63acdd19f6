//! # Statement Lowering
//!
//! Each statement kind maps to a fixed CFG shape:
//!
//! - `if` gets an explicit condition block holding the condition
//!   operations and the branch; both arms jump to a merge block.
//! - `for` gets condition, body, step, and exit blocks, with the step and
//!   condition blocks only created when the corresponding header slot is
//!   present. `continue` re-enters at the step block if there is one.
//! - `return` stores into the hidden return slot and leaves through a
//!   local trampoline to the function-wide return block.
//!
//! Lowering never stops mid-statement after a jump away; code following a
//! `return` or `break` lands in a detached block that dead code
//! elimination removes.

use rill_compiler_ast::{Expression, Statement};

use crate::{LoweringError, Operation, Terminator};

use super::builder::{CfgBuilder, LoopTargets};
use super::expr::lower_expression;

/// Lowers one statement, appending to the builder's current block
pub fn lower_statement(builder: &mut CfgBuilder, stmt: &Statement) -> Result<(), LoweringError> {
    match stmt {
        Statement::Compound(statements) => {
            builder.enter_scope();
            for s in statements {
                lower_statement(builder, s)?;
            }
            builder.exit_scope();
            Ok(())
        }

        Statement::Declaration { name, ty, init } => lower_declaration(builder, name, *ty, init),

        Statement::Expression(expr) => {
            // A bare call in statement position is the one place a void
            // call is legal, so it gets no destination register.
            if let Expression::Call { callee, args } = expr {
                let args = args
                    .iter()
                    .map(|a| lower_expression(builder, a))
                    .collect::<Result<Vec<_>, _>>()?;
                builder.push_op(Operation::call(None, callee.clone(), args));
            } else {
                lower_expression(builder, expr)?;
            }
            Ok(())
        }

        Statement::If {
            condition,
            then_branch,
            else_branch,
        } => lower_if(builder, condition, then_branch, else_branch.as_deref()),

        Statement::For {
            init,
            condition,
            step,
            body,
        } => lower_for(
            builder,
            init.as_deref(),
            condition.as_ref(),
            step.as_deref(),
            body,
        ),

        Statement::Break => builder.record_break(),
        Statement::Continue => builder.record_continue(),

        Statement::Return(value) => lower_return(builder, value.as_ref()),

        Statement::Empty => Ok(()),
    }
}

fn lower_declaration(
    builder: &mut CfgBuilder,
    name: &str,
    ty: rill_compiler_ast::TypeSpec,
    init: &Option<Expression>,
) -> Result<(), LoweringError> {
    if !ty.is_storable() {
        return Err(LoweringError::MalformedAst(format!(
            "variable '{name}' declared with type void"
        )));
    }
    let var = builder
        .function
        .new_variable(name, ty.into(), builder.current_scope);
    builder
        .function
        .scopes
        .declare(builder.current_scope, name, var)?;
    builder.emit_alloc(var);

    if let Some(init) = init {
        let value = lower_expression(builder, init)?;
        builder.push_op(Operation::store(var, value));
    }
    Ok(())
}

fn lower_if(
    builder: &mut CfgBuilder,
    condition: &Expression,
    then_branch: &Statement,
    else_branch: Option<&Statement>,
) -> Result<(), LoweringError> {
    let cond_block = builder.function.add_block("if.cond");
    builder.terminate(Terminator::jump(cond_block));
    builder.switch_to(cond_block);
    let cond = lower_expression(builder, condition)?;

    let then_block = builder.function.add_block("if.then");
    let else_block = else_branch.map(|_| builder.function.add_block("if.else"));
    let merge_block = builder.function.add_block("if.merge");

    builder.terminate(Terminator::branch(
        cond,
        then_block,
        else_block.unwrap_or(merge_block),
    ));

    builder.switch_to(then_block);
    lower_statement(builder, then_branch)?;
    builder.terminate(Terminator::jump(merge_block));

    if let (Some(else_block), Some(else_branch)) = (else_block, else_branch) {
        builder.switch_to(else_block);
        lower_statement(builder, else_branch)?;
        builder.terminate(Terminator::jump(merge_block));
    }

    builder.switch_to(merge_block);
    Ok(())
}

fn lower_for(
    builder: &mut CfgBuilder,
    init: Option<&Statement>,
    condition: Option<&Expression>,
    step: Option<&Statement>,
    body: &Statement,
) -> Result<(), LoweringError> {
    // The loop scope covers the header, so a variable declared in `init`
    // is visible in the condition, step, and body but not after the loop.
    builder.enter_scope();
    if let Some(init) = init {
        lower_statement(builder, init)?;
    }

    let cond_block = condition.map(|_| builder.function.add_block("for.cond"));
    let body_block = builder.function.add_block("for.body");
    let step_block = step.map(|_| builder.function.add_block("for.step"));
    let exit_block = builder.function.add_block("for.exit");

    // An absent condition means an unconditional loop entered at the body.
    let header = cond_block.unwrap_or(body_block);
    let reentry = step_block.unwrap_or(header);
    builder.terminate(Terminator::jump(header));

    if let (Some(cond_block), Some(condition)) = (cond_block, condition) {
        builder.switch_to(cond_block);
        let cond = lower_expression(builder, condition)?;
        builder.terminate(Terminator::branch(cond, body_block, exit_block));
    }

    builder.enter_loop(
        body_block,
        LoopTargets {
            merge: exit_block,
            reentry,
        },
    );
    builder.switch_to(body_block);
    lower_statement(builder, body)?;
    builder.terminate(Terminator::jump(reentry));
    builder.exit_loop();

    if let (Some(step_block), Some(step)) = (step_block, step) {
        builder.switch_to(step_block);
        lower_statement(builder, step)?;
        builder.terminate(Terminator::jump(header));
    }

    builder.switch_to(exit_block);
    builder.exit_scope();
    Ok(())
}

fn lower_return(
    builder: &mut CfgBuilder,
    value: Option<&Expression>,
) -> Result<(), LoweringError> {
    match (value, builder.ret_var) {
        (Some(expr), Some(ret_var)) => {
            let value = lower_expression(builder, expr)?;
            builder.push_op(Operation::store(ret_var, value));
        }
        (Some(_), None) => {
            return Err(LoweringError::MalformedAst(
                "return with a value in a void function".to_string(),
            ));
        }
        // A bare `return` in a value-returning function leaves the return
        // slot holding whatever was stored last.
        (None, _) => {}
    }
    builder.jump_to_return();
    Ok(())
}
