//! # Rill AST
//!
//! This crate defines the abstract syntax tree produced by the Rill parser.
//! The middle-end consumes these types directly; it never sees source text.
//!
//! The grammar is deliberately closed: every statement and expression kind is
//! a variant of the enums below, and downstream consumers match exhaustively
//! so that adding a variant fails to compile until every consumer handles it.

/// A semantic type in the Rill surface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSpec {
    Int,
    Float,
    Bool,
    Void,
}

impl TypeSpec {
    /// Returns true for types that can back a declared variable
    pub const fn is_storable(&self) -> bool {
        !matches!(self, Self::Void)
    }
}

/// A single function parameter: `int x`
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: TypeSpec,
}

/// A complete function definition
///
/// The body is always a `Statement::Compound`; the parser guarantees this.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub return_type: TypeSpec,
    pub params: Vec<Param>,
    pub body: Statement,
}

/// A whole translation unit: an ordered list of function definitions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub functions: Vec<FunctionDef>,
}

/// The closed set of statement kinds
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `{ ... }` - opens a nested lexical scope
    Compound(Vec<Statement>),

    /// `int x;` or `int x = e;`
    Declaration {
        name: String,
        ty: TypeSpec,
        init: Option<Expression>,
    },

    /// An expression evaluated for its effect (assignments, calls)
    Expression(Expression),

    /// `if (cond) then [else otherwise]`
    If {
        condition: Expression,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },

    /// `for (init; cond; step) body` - every header slot is optional
    For {
        init: Option<Box<Statement>>,
        condition: Option<Expression>,
        step: Option<Box<Statement>>,
        body: Box<Statement>,
    },

    /// `break;`
    Break,

    /// `continue;`
    Continue,

    /// `return;` or `return e;`
    Return(Option<Expression>),

    /// A bare `;`
    Empty,
}

/// Binary operators, in one flat set
///
/// `And`/`Or` are ordinary eager operators in Rill; the language has no
/// short-circuit evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
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

impl BinaryOp {
    /// Returns true if the operator yields a boolean result
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Eq
                | Self::Neq
                | Self::Less
                | Self::Greater
                | Self::LessEqual
                | Self::GreaterEqual
        )
    }
}

/// The closed set of expression kinds
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    IntLiteral(i64),
    FloatLiteral(f64),
    BoolLiteral(bool),

    /// A variable reference
    Identifier(String),

    /// `left op right`
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// `name = value` - assignment is an expression yielding the stored value
    Assign {
        target: String,
        value: Box<Expression>,
    },

    /// `cond ? then_value : else_value`
    Conditional {
        condition: Box<Expression>,
        then_value: Box<Expression>,
        else_value: Box<Expression>,
    },

    /// `callee(args...)`
    Call {
        callee: String,
        args: Vec<Expression>,
    },
}

impl Expression {
    /// Convenience constructor for a binary expression
    pub fn binary(op: BinaryOp, left: Self, right: Self) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Convenience constructor for an identifier
    pub fn ident(name: &str) -> Self {
        Self::Identifier(name.to_string())
    }

    /// Convenience constructor for an assignment
    pub fn assign(target: &str, value: Self) -> Self {
        Self::Assign {
            target: target.to_string(),
            value: Box::new(value),
        }
    }
}
