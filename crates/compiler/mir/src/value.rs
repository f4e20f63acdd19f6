//! # MIR Values
//!
//! Values represent data flowing through a function: either a literal
//! constant embedded directly, or a reference to a temporary produced by an
//! operation.

use crate::PrettyPrint;

/// Any value usable as an operand
///
/// Temporaries are virtual registers identified by [`crate::ValueId`]; they
/// are produced by loads, binary operations, and calls, and are assigned
/// exactly once by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// A constant literal, embedded directly
    Literal(Literal),

    /// A reference to the temporary produced by an operation
    Operand(crate::ValueId),
}

/// Literal constant values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Value {
    /// Creates a new integer literal value
    pub const fn int(value: i64) -> Self {
        Self::Literal(Literal::Int(value))
    }

    /// Creates a new float literal value
    pub const fn float(value: f64) -> Self {
        Self::Literal(Literal::Float(value))
    }

    /// Creates a new boolean literal value
    pub const fn boolean(value: bool) -> Self {
        Self::Literal(Literal::Bool(value))
    }

    /// Creates a new operand value
    pub const fn operand(id: crate::ValueId) -> Self {
        Self::Operand(id)
    }

    /// Returns true if this is a literal value
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Returns the operand ID if this is an operand
    pub const fn as_operand(&self) -> Option<crate::ValueId> {
        match self {
            Self::Operand(id) => Some(*id),
            Self::Literal(_) => None,
        }
    }
}

impl PrettyPrint for Value {
    fn pretty_print(&self, _indent: usize) -> String {
        match self {
            Self::Literal(lit) => lit.pretty_print(0),
            Self::Operand(id) => format!("%{}", id.index()),
        }
    }
}

impl PrettyPrint for Literal {
    fn pretty_print(&self, _indent: usize) -> String {
        match self {
            Self::Int(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Bool(value) => value.to_string(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pretty_print(0))
    }
}

impl From<crate::ValueId> for Value {
    fn from(id: crate::ValueId) -> Self {
        Self::operand(id)
    }
}

impl From<Literal> for Value {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}
