//! # Function Blocks
//!
//! [`FunctionBlock`] owns everything about one lowered function: the block
//! arena, the variable arena, the scope tree, and the id counters. All CFG
//! edge edits go through the helpers here so that stored predecessor lists
//! and terminator-derived successor lists stay consistent.

use index_vec::IndexVec;
use rustc_hash::FxHashMap;

use crate::{
    BasicBlock, BasicBlockId, MirType, PrettyPrint, ScopeId, ScopeTree, Terminator, Value,
    ValueId, Variable, VariableId,
};

/// A function lowered to a control flow graph
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBlock {
    /// Function name as declared in the source
    pub name: String,

    /// Declared return type
    pub return_type: MirType,

    /// Parameter variables, in declaration order
    pub params: Vec<VariableId>,

    /// The incoming argument registers, one per parameter
    pub param_values: Vec<ValueId>,

    /// The block arena
    pub basic_blocks: IndexVec<BasicBlockId, BasicBlock>,

    /// The single entry block
    pub entry_block: BasicBlockId,

    /// The function-wide return block, once lowering created it
    ///
    /// `None` for functions still under construction, or when dead code
    /// elimination proved the return block unreachable.
    pub return_block: Option<BasicBlockId>,

    /// The variable arena
    pub variables: IndexVec<VariableId, Variable>,

    /// The lexical scope tree
    pub scopes: ScopeTree,

    /// Next virtual register id
    next_value_id: usize,

    /// Per-source-name counters for variable instance names (`x$0`, `x$1`)
    instance_counters: FxHashMap<String, u32>,

    /// Per-variable counters for SSA version names (`x$0_v.2`)
    ssa_counters: FxHashMap<VariableId, u32>,
}

impl FunctionBlock {
    /// Creates a function with a single empty entry block
    pub fn new(name: String, return_type: MirType) -> Self {
        let mut basic_blocks = IndexVec::new();
        let entry_block = basic_blocks.push(BasicBlock::new("entry$0".to_string()));
        Self {
            name,
            return_type,
            params: Vec::new(),
            param_values: Vec::new(),
            basic_blocks,
            entry_block,
            return_block: None,
            variables: IndexVec::new(),
            scopes: ScopeTree::new(),
            next_value_id: 0,
            instance_counters: FxHashMap::default(),
            ssa_counters: FxHashMap::default(),
        }
    }

    // --- Arena Management ---

    /// Adds an empty block labelled `"{label}${index}"`
    pub fn add_block(&mut self, label: &str) -> BasicBlockId {
        let index = self.basic_blocks.len();
        self.basic_blocks
            .push(BasicBlock::new(format!("{label}${index}")))
    }

    pub fn get_block(&self, id: BasicBlockId) -> Option<&BasicBlock> {
        self.basic_blocks.get(id)
    }

    pub fn get_block_mut(&mut self, id: BasicBlockId) -> Option<&mut BasicBlock> {
        self.basic_blocks.get_mut(id)
    }

    /// Allocates a fresh virtual register
    pub fn new_value_id(&mut self) -> ValueId {
        let id = ValueId::from_usize(self.next_value_id);
        self.next_value_id += 1;
        id
    }

    /// Allocates a fresh typed value as a [`Value`]
    pub fn new_typed_value(&mut self) -> Value {
        Value::operand(self.new_value_id())
    }

    /// Creates a new variable instance for `source_name`
    ///
    /// Instance names disambiguate shadowed declarations: the first `x`
    /// becomes `x$0`, a shadowing `x` in a nested scope becomes `x$1`.
    pub fn new_variable(&mut self, source_name: &str, ty: MirType, scope: ScopeId) -> VariableId {
        let counter = self.instance_counters.entry(source_name.to_string()).or_insert(0);
        let name = format!("{source_name}${counter}");
        *counter += 1;
        self.variables.push(Variable::new(
            name,
            source_name.to_string(),
            ty,
            scope,
        ))
    }

    /// Produces the next SSA version name for `var`
    ///
    /// Versions count up from zero per variable: `x$0_v.0`, `x$0_v.1`, ...
    pub fn fresh_ssa_name(&mut self, var: VariableId) -> String {
        let counter = self.ssa_counters.entry(var).or_insert(0);
        let name = format!("{}_v.{}", self.variables[var].name, counter);
        *counter += 1;
        name
    }

    // --- Edge Management ---

    /// Records the edge `from -> to` in `to`'s predecessor list
    ///
    /// Callers set the terminator themselves; this only maintains preds.
    pub fn connect(&mut self, from: BasicBlockId, to: BasicBlockId) {
        self.basic_blocks[to].add_pred(from);
    }

    /// Removes one `from -> to` edge from `to`'s predecessor list
    pub fn disconnect(&mut self, from: BasicBlockId, to: BasicBlockId) {
        self.basic_blocks[to].remove_pred(from);
    }

    /// Installs `terminator` on `block`, updating predecessor lists on both
    /// the old and the new targets
    pub fn set_terminator_with_edges(&mut self, block: BasicBlockId, terminator: Terminator) {
        let old_targets = self.basic_blocks[block].terminator.target_blocks();
        for target in old_targets {
            self.disconnect(block, target);
        }
        let new_targets = terminator.target_blocks();
        self.basic_blocks[block].terminator = terminator;
        for target in new_targets {
            self.connect(block, target);
        }
    }

    /// Redirects one `block -> old_target` edge to `new_target`
    pub fn replace_edge(
        &mut self,
        block: BasicBlockId,
        old_target: BasicBlockId,
        new_target: BasicBlockId,
    ) {
        self.basic_blocks[block]
            .terminator
            .replace_target(old_target, new_target);
        // replace_target rewrites every occurrence, so preds must follow
        // suit for each one it changed.
        while self.basic_blocks[old_target].preds.contains(&block) {
            self.disconnect(block, old_target);
            self.connect(block, new_target);
        }
    }

    // --- Validation ---

    /// Checks CFG invariants: every block terminated, every edge present in
    /// both directions with matching multiplicity, all targets in range
    pub fn validate(&self) -> Result<(), String> {
        if self.basic_blocks.is_empty() {
            return Err(format!("function '{}' has no blocks", self.name));
        }

        for (id, block) in self.basic_blocks.iter_enumerated() {
            block
                .validate()
                .map_err(|e| format!("in function '{}': {e}", self.name))?;

            for target in block.successors() {
                if target.index() >= self.basic_blocks.len() {
                    return Err(format!(
                        "function '{}': block '{}' targets out-of-range bb{}",
                        self.name,
                        block.name,
                        target.index()
                    ));
                }
                let expected = block.successors().iter().filter(|t| **t == target).count();
                let recorded = self.basic_blocks[target]
                    .preds
                    .iter()
                    .filter(|p| **p == id)
                    .count();
                if expected != recorded {
                    return Err(format!(
                        "function '{}': edge {} -> {} recorded {recorded} time(s), expected {expected}",
                        self.name, block.name, self.basic_blocks[target].name
                    ));
                }
            }

            for var in &block.ssa_defines {
                if self.variables[*var].defining_block != Some(id) {
                    return Err(format!(
                        "function '{}': variable '{}' is listed as defined in '{}' but its defining block disagrees",
                        self.name, self.variables[*var].name, block.name
                    ));
                }
            }

            for pred in &block.preds {
                if pred.index() >= self.basic_blocks.len() {
                    return Err(format!(
                        "function '{}': block '{}' lists out-of-range predecessor bb{}",
                        self.name,
                        block.name,
                        pred.index()
                    ));
                }
                if !self.basic_blocks[*pred].successors().contains(&id) {
                    return Err(format!(
                        "function '{}': block '{}' lists '{}' as predecessor but the edge is missing",
                        self.name, block.name, self.basic_blocks[*pred].name
                    ));
                }
            }
        }
        Ok(())
    }

    // --- Queries ---

    /// Returns the ids of all live blocks (all blocks before DCE compaction)
    pub fn block_ids(&self) -> impl Iterator<Item = BasicBlockId> + '_ {
        self.basic_blocks.iter_enumerated().map(|(id, _)| id)
    }

    /// Looks up a variable by its unique instance name, for tests and debug
    /// tooling
    pub fn variable_by_name(&self, name: &str) -> Option<VariableId> {
        self.variables
            .iter_enumerated()
            .find(|(_, v)| v.name == name)
            .map(|(id, _)| id)
    }

    /// Looks up a block by its label
    pub fn block_by_name(&self, name: &str) -> Option<BasicBlockId> {
        self.basic_blocks
            .iter_enumerated()
            .find(|(_, b)| b.name == name)
            .map(|(id, _)| id)
    }

    /// Looks up the first block whose label starts with `prefix`
    ///
    /// Labels carry a creation-order suffix (`if.then$3`), so tests match
    /// on the stable prefix.
    pub fn block_by_name_prefix(&self, prefix: &str) -> Option<BasicBlockId> {
        self.basic_blocks
            .iter_enumerated()
            .find(|(_, b)| b.name.starts_with(prefix))
            .map(|(id, _)| id)
    }
}

impl PrettyPrint for FunctionBlock {
    fn pretty_print(&self, indent: usize) -> String {
        let pad = crate::indent_str(indent);
        let params = self
            .params
            .iter()
            .map(|p| self.variables[*p].to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let mut out = format!("{pad}fn {}({params}) -> {} {{\n", self.name, self.return_type);
        for block in &self.basic_blocks {
            out.push_str(&block.pretty_print(indent + 1));
        }
        out.push_str(&format!("{pad}}}\n"));
        out
    }
}

#[cfg(test)]
#[path = "function_tests.rs"]
mod function_tests;
