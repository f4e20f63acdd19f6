//! # Block Terminators
//!
//! Every basic block ends in exactly one terminator. Control flow edges are
//! derived from terminators rather than stored separately, so retargeting a
//! terminator is how edges move.

use crate::{BasicBlockId, PrettyPrint, Value};

/// Control flow terminators for basic blocks
#[derive(Debug, Clone, PartialEq)]
pub enum Terminator {
    /// Unconditional jump to another block
    Jump { target: BasicBlockId },

    /// Conditional branch on a boolean value
    If {
        condition: Value,
        then_target: BasicBlockId,
        else_target: BasicBlockId,
    },

    /// Return from the function
    Return { value: Option<Value> },

    /// Placeholder for blocks under construction or cut off from the CFG
    ///
    /// Lowering leaves this on freshly created blocks until the real
    /// terminator is known; none may survive to the end of lowering.
    Unreachable,
}

impl Terminator {
    /// Creates an unconditional jump
    pub const fn jump(target: BasicBlockId) -> Self {
        Self::Jump { target }
    }

    /// Creates a conditional branch
    pub const fn branch(
        condition: Value,
        then_target: BasicBlockId,
        else_target: BasicBlockId,
    ) -> Self {
        Self::If {
            condition,
            then_target,
            else_target,
        }
    }

    /// Creates a return with a value
    pub const fn return_value(value: Value) -> Self {
        Self::Return { value: Some(value) }
    }

    /// Creates a void return
    pub const fn return_void() -> Self {
        Self::Return { value: None }
    }

    /// Creates an unreachable placeholder
    pub const fn unreachable() -> Self {
        Self::Unreachable
    }

    /// Returns the blocks this terminator can transfer control to
    pub fn target_blocks(&self) -> Vec<BasicBlockId> {
        match self {
            Self::Jump { target } => vec![*target],
            Self::If {
                then_target,
                else_target,
                ..
            } => vec![*then_target, *else_target],
            Self::Return { .. } | Self::Unreachable => vec![],
        }
    }

    /// Replaces every occurrence of `from` among the targets with `to`
    pub fn replace_target(&mut self, from: BasicBlockId, to: BasicBlockId) {
        match self {
            Self::Jump { target } => {
                if *target == from {
                    *target = to;
                }
            }
            Self::If {
                then_target,
                else_target,
                ..
            } => {
                if *then_target == from {
                    *then_target = to;
                }
                if *else_target == from {
                    *else_target = to;
                }
            }
            Self::Return { .. } | Self::Unreachable => {}
        }
    }

    /// Rewrites all block references through `f`
    ///
    /// Used when blocks are compacted and every id shifts.
    pub fn remap_targets(&mut self, mut f: impl FnMut(BasicBlockId) -> BasicBlockId) {
        match self {
            Self::Jump { target } => *target = f(*target),
            Self::If {
                then_target,
                else_target,
                ..
            } => {
                *then_target = f(*then_target);
                *else_target = f(*else_target);
            }
            Self::Return { .. } | Self::Unreachable => {}
        }
    }

    /// Returns true for a real terminator (anything but the placeholder)
    pub const fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unreachable)
    }
}

impl PrettyPrint for Terminator {
    fn pretty_print(&self, indent: usize) -> String {
        let pad = crate::indent_str(indent);
        match self {
            Self::Jump { target } => format!("{pad}jump bb{}", target.index()),
            Self::If {
                condition,
                then_target,
                else_target,
            } => format!(
                "{pad}if {} then bb{} else bb{}",
                condition.pretty_print(0),
                then_target.index(),
                else_target.index()
            ),
            Self::Return { value: Some(v) } => {
                format!("{pad}return {}", v.pretty_print(0))
            }
            Self::Return { value: None } => format!("{pad}return"),
            Self::Unreachable => format!("{pad}unreachable"),
        }
    }
}
