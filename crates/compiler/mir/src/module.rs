//! # MIR Modules
//!
//! A module is the unit the pipeline operates on: the lowered functions of
//! one translation unit plus a name index for lookups.

use index_vec::IndexVec;
use rustc_hash::FxHashMap;

use crate::{FunctionBlock, FunctionId, PrettyPrint};

/// A complete MIR module
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MirModule {
    /// All functions, in definition order
    pub functions: IndexVec<FunctionId, FunctionBlock>,

    /// Function name to id index
    pub function_names: FxHashMap<String, FunctionId>,
}

impl MirModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a function and indexes it by name
    pub fn add_function(&mut self, function: FunctionBlock) -> FunctionId {
        let name = function.name.clone();
        let id = self.functions.push(function);
        self.function_names.insert(name, id);
        id
    }

    /// Looks up a function id by name
    pub fn lookup_function(&self, name: &str) -> Option<FunctionId> {
        self.function_names.get(name).copied()
    }

    /// Returns the function with the given name
    pub fn get_function_by_name(&self, name: &str) -> Option<&FunctionBlock> {
        self.lookup_function(name).map(|id| &self.functions[id])
    }

    /// Validates every function in the module
    pub fn validate(&self) -> Result<(), String> {
        for function in &self.functions {
            function.validate()?;
        }
        Ok(())
    }
}

impl PrettyPrint for MirModule {
    fn pretty_print(&self, indent: usize) -> String {
        self.functions
            .iter()
            .map(|f| f.pretty_print(indent))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl std::fmt::Display for MirModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pretty_print(0))
    }
}
