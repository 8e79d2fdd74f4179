//! Re-exports [`fastvec`]'s containers.
//!
//! Used where short sequences are collected before being frozen into a
//! boxed slice (parsed member paths, argument lists).

pub use fastvec::{FastVec, fast_vec};
pub use fastvec::{StackVec, stack_vec};
