//! # Expression Lowering
//!
//! Expressions lower to sequences of operations yielding a [`Value`]. Both
//! operands of `&&` and `||` are always evaluated; the language has no
//! short-circuit semantics, so no control flow is needed for them.
//!
//! Ternaries are the one expression form that branches. They lower through
//! a synthesized variable: allocated before the branch, stored in each arm,
//! and loaded back at the merge, which lets SSA construction treat the
//! merge like any other join point.

use rill_compiler_ast::Expression;

use crate::{LoweringError, MirType, Operation, Terminator, Value};

use super::builder::CfgBuilder;

/// Lowers an expression, appending its operations to the current block
pub fn lower_expression(
    builder: &mut CfgBuilder,
    expr: &Expression,
) -> Result<Value, LoweringError> {
    match expr {
        Expression::IntLiteral(v) => Ok(Value::int(*v)),
        Expression::FloatLiteral(v) => Ok(Value::float(*v)),
        Expression::BoolLiteral(v) => Ok(Value::boolean(*v)),

        Expression::Identifier(name) => {
            let var = builder
                .function
                .scopes
                .resolve(builder.current_scope, name)
                .ok_or_else(|| LoweringError::UndefinedVariable { name: name.clone() })?;
            let dest = builder.function.new_value_id();
            builder.push_op(Operation::load(dest, var));
            Ok(Value::operand(dest))
        }

        Expression::Binary { op, left, right } => {
            let lhs = lower_expression(builder, left)?;
            let rhs = lower_expression(builder, right)?;
            let dest = builder.function.new_value_id();
            builder.push_op(Operation::binary_op((*op).into(), dest, lhs, rhs));
            Ok(Value::operand(dest))
        }

        Expression::Assign { target, value } => {
            let stored = lower_expression(builder, value)?;
            let var = builder
                .function
                .scopes
                .resolve(builder.current_scope, target)
                .ok_or_else(|| LoweringError::UndefinedVariable {
                    name: target.clone(),
                })?;
            builder.push_op(Operation::store(var, stored));
            Ok(stored)
        }

        Expression::Conditional {
            condition,
            then_value,
            else_value,
        } => lower_conditional(builder, condition, then_value, else_value),

        Expression::Call { callee, args } => {
            let args = args
                .iter()
                .map(|a| lower_expression(builder, a))
                .collect::<Result<Vec<_>, _>>()?;
            let dest = builder.function.new_value_id();
            builder.push_op(Operation::call(Some(dest), callee.clone(), args));
            Ok(Value::operand(dest))
        }
    }
}

/// Lowers `cond ? a : b` through a synthesized merge variable
fn lower_conditional(
    builder: &mut CfgBuilder,
    condition: &Expression,
    then_value: &Expression,
    else_value: &Expression,
) -> Result<Value, LoweringError> {
    let ty = infer_type(builder, then_value);
    let var = builder
        .function
        .new_variable("tern", ty, builder.current_scope);
    builder.emit_alloc(var);

    let cond = lower_expression(builder, condition)?;
    let then_block = builder.function.add_block("tern.then");
    let else_block = builder.function.add_block("tern.else");
    let merge_block = builder.function.add_block("tern.merge");
    builder.terminate(Terminator::branch(cond, then_block, else_block));

    builder.switch_to(then_block);
    let then_val = lower_expression(builder, then_value)?;
    builder.push_op(Operation::store(var, then_val));
    builder.terminate(Terminator::jump(merge_block));

    builder.switch_to(else_block);
    let else_val = lower_expression(builder, else_value)?;
    builder.push_op(Operation::store(var, else_val));
    builder.terminate(Terminator::jump(merge_block));

    builder.switch_to(merge_block);
    let dest = builder.function.new_value_id();
    builder.push_op(Operation::load(dest, var));
    Ok(Value::operand(dest))
}

/// Best-effort static type of an expression
///
/// Used only to type synthesized variables. Unresolvable cases fall back to
/// `Int`; a real type error surfaces later, when the expression is lowered.
pub fn infer_type(builder: &CfgBuilder, expr: &Expression) -> MirType {
    match expr {
        Expression::IntLiteral(_) => MirType::Int,
        Expression::FloatLiteral(_) => MirType::Float,
        Expression::BoolLiteral(_) => MirType::Bool,
        Expression::Identifier(name) | Expression::Assign { target: name, .. } => builder
            .function
            .scopes
            .resolve(builder.current_scope, name)
            .map_or(MirType::Int, |var| builder.function.variables[var].ty),
        Expression::Binary { op, left, .. } => {
            use rill_compiler_ast::BinaryOp;
            if op.is_comparison() || matches!(op, BinaryOp::And | BinaryOp::Or) {
                MirType::Bool
            } else {
                infer_type(builder, left)
            }
        }
        Expression::Conditional { then_value, .. } => infer_type(builder, then_value),
        Expression::Call { .. } => MirType::Int,
    }
}
