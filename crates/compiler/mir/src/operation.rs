//! # Operations
//!
//! The non-terminator instructions of a basic block. Memory traffic flows
//! through explicit `Alloc`/`Load`/`Store` operations on named variables;
//! SSA construction later attaches a renamed counterpart to each of those
//! without rewriting the originals.

use crate::{LoweringError, PrettyPrint, Value, ValueId, VariableId};

/// Binary operators at the MIR level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Neq,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    And,
    Or,
}

impl From<rill_compiler_ast::BinaryOp> for BinOp {
    fn from(op: rill_compiler_ast::BinaryOp) -> Self {
        use rill_compiler_ast::BinaryOp as Ast;
        match op {
            Ast::Add => Self::Add,
            Ast::Sub => Self::Sub,
            Ast::Mul => Self::Mul,
            Ast::Div => Self::Div,
            Ast::Eq => Self::Eq,
            Ast::Neq => Self::Neq,
            Ast::Less => Self::Less,
            Ast::Greater => Self::Greater,
            Ast::LessEqual => Self::LessEqual,
            Ast::GreaterEqual => Self::GreaterEqual,
            Ast::And => Self::And,
            Ast::Or => Self::Or,
        }
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::And => "&&",
            Self::Or => "||",
        };
        write!(f, "{s}")
    }
}

/// A renamed variable in SSA form, e.g. `x$0_v.3`
pub type SsaName = String;

/// The SSA counterpart of a memory operation
///
/// Filled in by SSA construction; `None` before the pass runs.
#[derive(Debug, Clone, PartialEq)]
pub enum SsaOp {
    /// The allocation defines version zero of the variable
    Alloc { name: SsaName },

    /// The load reads whichever version reaches this point
    Load { dest: ValueId, name: SsaName },

    /// The store defines a fresh version
    Store { name: SsaName, value: Value },
}

impl SsaOp {
    /// Returns the SSA name this operation reads or defines
    pub fn name(&self) -> &SsaName {
        match self {
            Self::Alloc { name } | Self::Load { name, .. } | Self::Store { name, .. } => name,
        }
    }
}

/// The instruction kinds a block may contain
#[derive(Debug, Clone, PartialEq)]
pub enum OpKind {
    /// Reserve storage for a variable
    Alloc { var: VariableId },

    /// Read a variable into a fresh temporary
    Load { dest: ValueId, var: VariableId },

    /// Write a value into a variable
    Store { var: VariableId, value: Value },

    /// `dest = left op right`
    BinaryOp {
        op: BinOp,
        dest: ValueId,
        left: Value,
        right: Value,
    },

    /// Function call; `dest` is `None` for void calls
    Call {
        dest: Option<ValueId>,
        callee: String,
        args: Vec<Value>,
    },
}

/// One operation: the original form plus its SSA-renamed counterpart
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub kind: OpKind,

    /// Set by SSA construction for `Alloc`/`Load`/`Store` operations
    pub ssa: Option<SsaOp>,
}

impl Operation {
    pub const fn new(kind: OpKind) -> Self {
        Self { kind, ssa: None }
    }

    /// Creates an allocation for `var`
    pub const fn alloc(var: VariableId) -> Self {
        Self::new(OpKind::Alloc { var })
    }

    /// Creates a load of `var` into `dest`
    pub const fn load(dest: ValueId, var: VariableId) -> Self {
        Self::new(OpKind::Load { dest, var })
    }

    /// Creates a store of `value` into `var`
    pub const fn store(var: VariableId, value: Value) -> Self {
        Self::new(OpKind::Store { var, value })
    }

    /// Creates a binary operation
    pub const fn binary_op(op: BinOp, dest: ValueId, left: Value, right: Value) -> Self {
        Self::new(OpKind::BinaryOp {
            op,
            dest,
            left,
            right,
        })
    }

    /// Creates a call
    pub const fn call(dest: Option<ValueId>, callee: String, args: Vec<Value>) -> Self {
        Self::new(OpKind::Call { dest, callee, args })
    }

    /// Returns the temporary this operation defines, if any
    pub fn destination(&self) -> Option<ValueId> {
        match &self.kind {
            OpKind::Load { dest, .. } | OpKind::BinaryOp { dest, .. } => Some(*dest),
            OpKind::Call { dest, .. } => *dest,
            OpKind::Alloc { .. } | OpKind::Store { .. } => None,
        }
    }

    /// Returns the temporary this operation defines, erroring for valueless
    /// operations
    ///
    /// Expression lowering uses this to surface misuse of a void call or a
    /// storage operation in value position.
    pub fn result(&self) -> Result<ValueId, LoweringError> {
        self.destination().ok_or_else(|| {
            LoweringError::UnsupportedOperation(format!(
                "operation produces no value: {:?}",
                self.kind
            ))
        })
    }

    /// Returns the variable this operation touches, if it is a memory op
    pub fn touched_variable(&self) -> Option<VariableId> {
        match &self.kind {
            OpKind::Alloc { var } | OpKind::Load { var, .. } | OpKind::Store { var, .. } => {
                Some(*var)
            }
            OpKind::BinaryOp { .. } | OpKind::Call { .. } => None,
        }
    }
}


impl PrettyPrint for Operation {
    fn pretty_print(&self, indent: usize) -> String {
        let pad = crate::indent_str(indent);
        let base = match &self.kind {
            OpKind::Alloc { var } => format!("{pad}alloc v{}", var.index()),
            OpKind::Load { dest, var } => {
                format!("{pad}%{} = load v{}", dest.index(), var.index())
            }
            OpKind::Store { var, value } => {
                format!("{pad}store v{} = {}", var.index(), value.pretty_print(0))
            }
            OpKind::BinaryOp {
                op,
                dest,
                left,
                right,
            } => format!(
                "{pad}%{} = {} {op} {}",
                dest.index(),
                left.pretty_print(0),
                right.pretty_print(0)
            ),
            OpKind::Call { dest, callee, args } => {
                let args = args
                    .iter()
                    .map(|a| a.pretty_print(0))
                    .collect::<Vec<_>>()
                    .join(", ");
                match dest {
                    Some(d) => format!("{pad}%{} = call {callee}({args})", d.index()),
                    None => format!("{pad}call {callee}({args})"),
                }
            }
        };
        match &self.ssa {
            Some(SsaOp::Alloc { name }) => format!("{base}  ; ssa: alloc {name}"),
            Some(SsaOp::Load { dest, name }) => {
                format!("{base}  ; ssa: %{} = {name}", dest.index())
            }
            Some(SsaOp::Store { name, value }) => {
                format!("{base}  ; ssa: {name} = {}", value.pretty_print(0))
            }
            None => base,
        }
    }
}
