//! # CFG Analyses
//!
//! Dominance computation over a cleaned-up graph. The passes here only
//! annotate blocks; they never change control flow, so they can run at any
//! point after dead code elimination.

pub mod dominance;

pub use dominance::{
    compute_dominance_frontiers, compute_dominators, compute_immediate_dominators, dominates,
};
