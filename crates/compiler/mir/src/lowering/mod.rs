//! # AST to MIR Lowering
//!
//! Turns a parsed program into a [`MirModule`] of control flow graphs.
//! One [`CfgBuilder`] is created per function; statements and expressions
//! append operations and grow the graph through it.
//!
//! ## Return protocol
//!
//! Every value-returning function gets a hidden `ret$val` variable
//! allocated in the entry block and a single function-wide return block
//! that loads it and returns. `return e;` stores `e` into the slot and
//! jumps (through a local trampoline) to that block, so the function has
//! exactly one `Return` terminator and merged return values show up as an
//! ordinary phi at the return block after SSA construction.

use rill_compiler_ast::{FunctionDef, Program};

use crate::{
    FunctionBlock, LoweringError, MirModule, MirType, Operation, Terminator, Value, Variable,
};

pub mod builder;
pub mod expr;
pub mod stmt;

pub use builder::CfgBuilder;
pub use expr::lower_expression;
pub use stmt::lower_statement;

/// Name of the hidden return slot
const RET_VAR_NAME: &str = "ret$val";

/// Lowers a whole program to a MIR module
pub fn lower_module(program: &Program) -> Result<MirModule, LoweringError> {
    let mut module = MirModule::new();
    for def in &program.functions {
        if module.lookup_function(&def.name).is_some() {
            return Err(LoweringError::DuplicateDefinition {
                name: def.name.clone(),
            });
        }
        log::debug!("lowering function '{}'", def.name);
        let function = lower_function(def)?;
        module.add_function(function);
    }
    Ok(module)
}

/// Lowers a single function definition
pub fn lower_function(def: &FunctionDef) -> Result<FunctionBlock, LoweringError> {
    let return_type = MirType::from(def.return_type);
    let mut builder = CfgBuilder::new(def.name.clone(), return_type);

    // Parameters live in the root scope. Each gets a storage slot in the
    // entry block, initialized from its incoming argument register.
    for param in &def.params {
        if !param.ty.is_storable() {
            return Err(LoweringError::MalformedAst(format!(
                "parameter '{}' declared with type void",
                param.name
            )));
        }
        let scope = builder.function.scopes.root();
        let var = builder
            .function
            .new_variable(&param.name, param.ty.into(), scope);
        builder.function.scopes.declare(scope, &param.name, var)?;
        builder.emit_alloc(var);

        let incoming = builder.function.new_value_id();
        builder.push_op(Operation::store(var, Value::operand(incoming)));
        builder.function.params.push(var);
        builder.function.param_values.push(incoming);
    }

    // The hidden return slot shares the entry block with the parameters.
    if return_type != MirType::Void {
        let scope = builder.function.scopes.root();
        let ret_var = builder.function.variables.push(Variable::new(
            RET_VAR_NAME.to_string(),
            RET_VAR_NAME.to_string(),
            return_type,
            scope,
        ));
        builder.emit_alloc(ret_var);
        builder.ret_var = Some(ret_var);
    }

    // Fill in the function-wide return block now that the slot exists.
    let return_block = builder.return_block;
    let return_terminator = match builder.ret_var {
        Some(ret_var) => {
            let dest = builder.function.new_value_id();
            builder.function.basic_blocks[return_block].push_op(Operation::load(dest, ret_var));
            Terminator::return_value(Value::operand(dest))
        }
        None => Terminator::return_void(),
    };
    builder
        .function
        .set_terminator_with_edges(return_block, return_terminator);

    lower_statement(&mut builder, &def.body)?;

    // Falling off the end of the body leaves through the return block.
    if !builder.is_terminated() {
        builder.terminate(Terminator::jump(return_block));
    }

    builder.patch_loop_exits();
    log::trace!(
        "lowered '{}': {} blocks, {} variables",
        builder.function.name,
        builder.function.basic_blocks.len(),
        builder.function.variables.len()
    );
    Ok(builder.function)
}
