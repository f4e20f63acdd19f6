//! # MIR Types
//!
//! The small semantic type set carried through the middle-end. There is no
//! inference here; types arrive from the AST and are only propagated.

use rill_compiler_ast::TypeSpec;

/// A semantic type attached to variables and temporaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MirType {
    Int,
    Float,
    Bool,
    Void,
}

impl MirType {
    /// Returns true for types that can back an allocation
    pub const fn is_storable(&self) -> bool {
        !matches!(self, Self::Void)
    }
}

impl From<TypeSpec> for MirType {
    fn from(ty: TypeSpec) -> Self {
        match ty {
            TypeSpec::Int => Self::Int,
            TypeSpec::Float => Self::Float,
            TypeSpec::Bool => Self::Bool,
            TypeSpec::Void => Self::Void,
        }
    }
}

impl std::fmt::Display for MirType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Void => "void",
        };
        write!(f, "{name}")
    }
}
