//! Small shared building blocks for the `ez_*` crates.
//!
//! - [`hash`]: `hashbrown` containers with `foldhash`-based fixed hashers.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId).
//! - [`ReadThroughCache`]: a thread-safe insert-only cache used by the
//!   processor registry and the accessor compilers.
//! - [`vec`]: re-exports of `fastvec` containers.
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod cache;
mod typeid_map;

pub mod hash;
pub mod vec;

// -----------------------------------------------------------------------------
// Top-level exports

pub use cache::ReadThroughCache;
pub use typeid_map::TypeIdMap;
