//! A compact, type-driven binary serializer over `ez_reflect` metadata.
//!
//! ## Menu
//!
//! - [`varint`]: LEB128 and ZigZag integer encoding.
//! - [`binary`]: the [`BinaryWriter`](binary::BinaryWriter) and
//!   [`BinaryReader`](binary::BinaryReader) cursors.
//! - [`processor`]: per-type read/write strategies.
//! - [`ProcessorRegistry`]: resolves and caches the processor of each type.
//! - [`MemberModel`]: the member layout of composite types.
//! - [`Serializer`]: the top-level API.
//!
//! ## Null and empty
//!
//! The cursors have no notion of null: `None` strings and byte arrays are
//! written as empty and always read back as empty. Values that need the
//! distinction are modeled as `Option<T>`, which the processors encode with
//! a presence byte, so `None` and `Some(String::new())` round-trip exactly.
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod api;
mod error;
mod model;
mod registry;

pub mod binary;
pub mod processor;
pub mod varint;

// -----------------------------------------------------------------------------
// Top-level exports

pub use api::{SerializationData, SerializationFormat, Serializer};
pub use error::SerializationError;
pub use model::{MemberModel, ModelMember};
pub use registry::{ProcessorRegistry, TypedProcessor};
