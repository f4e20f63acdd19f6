//! # CFG Builder
//!
//! Mutable state threaded through lowering: the function under
//! construction, a cursor for the block receiving new operations, the
//! current lexical scope, and the loop bookkeeping for `break`/`continue`.
//!
//! `break` and `continue` do not jump to their final targets directly.
//! Each one terminates the current block into a fresh placeholder block and
//! records which loop it belongs to; once the whole function is lowered,
//! [`CfgBuilder::patch_loop_exits`] retargets every placeholder to the
//! loop's merge or re-entry block. Code following a `break` keeps lowering
//! into a detached block that dead code elimination later removes.

use rustc_hash::FxHashMap;

use crate::{
    BasicBlockId, FunctionBlock, LoweringError, MirType, Operation, ScopeId, Terminator,
    VariableId,
};

/// The jump targets of one enclosing loop
#[derive(Debug, Clone, Copy)]
pub struct LoopTargets {
    /// Where `break` lands: the block after the loop
    pub merge: BasicBlockId,

    /// Where `continue` lands: the step block if present, else the header
    pub reentry: BasicBlockId,
}

/// Builder state for lowering one function body
#[derive(Debug)]
pub struct CfgBuilder {
    /// The function under construction
    pub function: FunctionBlock,

    /// The block new operations are appended to
    pub current_block: BasicBlockId,

    /// The innermost lexical scope
    pub current_scope: ScopeId,

    /// The hidden return slot, `None` for void functions
    pub ret_var: Option<VariableId>,

    /// The function-wide return block
    pub return_block: BasicBlockId,

    /// Body blocks of the enclosing loops, innermost last
    loop_stack: Vec<BasicBlockId>,

    /// Jump targets per loop, keyed by the loop's body block
    loop_targets: FxHashMap<BasicBlockId, LoopTargets>,

    /// `(placeholder, loop body)` pairs awaiting a merge target
    pending_breaks: Vec<(BasicBlockId, BasicBlockId)>,

    /// `(placeholder, loop body)` pairs awaiting a re-entry target
    pending_continues: Vec<(BasicBlockId, BasicBlockId)>,
}

impl CfgBuilder {
    /// Creates a builder with an entry block and a return block
    pub fn new(name: String, return_type: MirType) -> Self {
        let mut function = FunctionBlock::new(name, return_type);
        let current_block = function.entry_block;
        let current_scope = function.scopes.root();
        let return_block = function.add_block("ret");
        function.return_block = Some(return_block);
        Self {
            function,
            current_block,
            current_scope,
            ret_var: None,
            return_block,
            loop_stack: Vec::new(),
            loop_targets: FxHashMap::default(),
            pending_breaks: Vec::new(),
            pending_continues: Vec::new(),
        }
    }

    // --- Block Cursor ---

    /// Appends an operation to the current block
    pub fn push_op(&mut self, op: Operation) {
        self.function.basic_blocks[self.current_block].push_op(op);
    }

    /// Moves the cursor to `block`
    pub fn switch_to(&mut self, block: BasicBlockId) {
        self.current_block = block;
    }

    /// Installs `terminator` on the current block, maintaining edges
    pub fn terminate(&mut self, terminator: Terminator) {
        self.function
            .set_terminator_with_edges(self.current_block, terminator);
    }

    /// Returns true if the current block already has a real terminator
    pub fn is_terminated(&self) -> bool {
        self.function.basic_blocks[self.current_block].is_terminated()
    }

    /// Emits the allocation for `var` into the current block and records
    /// the block as the variable's definition site
    pub fn emit_alloc(&mut self, var: VariableId) {
        self.function.variables[var].defining_block = Some(self.current_block);
        self.function.basic_blocks[self.current_block]
            .ssa_defines
            .insert(var);
        self.push_op(Operation::alloc(var));
    }

    // --- Scopes ---

    /// Opens a child scope and makes it current
    pub fn enter_scope(&mut self) {
        self.current_scope = self.function.scopes.push_scope(self.current_scope);
    }

    /// Returns to the parent scope
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.function.scopes.get(self.current_scope).parent {
            self.current_scope = parent;
        }
    }

    // --- Loops ---

    /// Registers an enclosing loop for the duration of its body
    pub fn enter_loop(&mut self, body: BasicBlockId, targets: LoopTargets) {
        self.loop_targets.insert(body, targets);
        self.loop_stack.push(body);
    }

    /// Leaves the innermost loop
    pub fn exit_loop(&mut self) {
        self.loop_stack.pop();
    }

    fn innermost_loop(&self, kind: &str) -> Result<BasicBlockId, LoweringError> {
        self.loop_stack
            .last()
            .copied()
            .ok_or_else(|| LoweringError::MalformedAst(format!("'{kind}' outside of a loop")))
    }

    /// Lowers a `break`: jump into a placeholder patched later to the merge
    /// block, then keep lowering into a detached block
    pub fn record_break(&mut self) -> Result<(), LoweringError> {
        let body = self.innermost_loop("break")?;
        let placeholder = self.function.add_block("break");
        self.terminate(Terminator::jump(placeholder));
        self.pending_breaks.push((placeholder, body));
        self.open_detached_block();
        Ok(())
    }

    /// Lowers a `continue`: same scheme as `break`, patched to re-entry
    pub fn record_continue(&mut self) -> Result<(), LoweringError> {
        let body = self.innermost_loop("continue")?;
        let placeholder = self.function.add_block("continue");
        self.terminate(Terminator::jump(placeholder));
        self.pending_continues.push((placeholder, body));
        self.open_detached_block();
        Ok(())
    }

    /// Opens an unreachable block for code after a jump away
    fn open_detached_block(&mut self) {
        let block = self.function.add_block("dead");
        self.switch_to(block);
    }

    /// Terminates the current block into a `ret.local` trampoline that
    /// forwards to the function-wide return block
    pub fn jump_to_return(&mut self) {
        let trampoline = self.function.add_block("ret.local");
        let return_block = self.return_block;
        self.terminate(Terminator::jump(trampoline));
        self.function
            .set_terminator_with_edges(trampoline, Terminator::jump(return_block));
        self.open_detached_block();
    }

    /// Resolves every recorded `break` and `continue` placeholder
    ///
    /// Runs once after the whole body is lowered; loop targets for every
    /// recorded placeholder are guaranteed present by then.
    pub fn patch_loop_exits(&mut self) {
        let breaks = std::mem::take(&mut self.pending_breaks);
        for (placeholder, body) in breaks {
            let merge = self.loop_targets[&body].merge;
            self.function
                .set_terminator_with_edges(placeholder, Terminator::jump(merge));
        }
        let continues = std::mem::take(&mut self.pending_continues);
        for (placeholder, body) in continues {
            let reentry = self.loop_targets[&body].reentry;
            self.function
                .set_terminator_with_edges(placeholder, Terminator::jump(reentry));
        }
    }
}
