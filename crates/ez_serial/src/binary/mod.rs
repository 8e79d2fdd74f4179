//! Provide the byte-level cursors of the binary format.
//!
//! ## Menu
//!
//! - [`BinaryWriter`]: growable output with position and length tracking.
//! - [`BinaryReader`]: bounds-checked input cursor over a borrowed slice.
//!
//! ## Encoding
//!
//! | Value | Bytes |
//! |-------|-------|
//! | `u8`, `i8`, `bool` | one byte |
//! | `u16`, `u32`, `u64` | varint |
//! | `i16`, `i32`, `i64` | ZigZag varint |
//! | `f32`, `f64` | little-endian, fixed width |
//! | string, byte array | varint length, raw bytes |
//! | array of primitives | varint count, fixed-width little-endian elements |

// -----------------------------------------------------------------------------
// Modules

mod reader;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use reader::BinaryReader;
pub use writer::BinaryWriter;

/// Element count from which array bodies are copied as one block.
pub const BULK_COPY_THRESHOLD: usize = 64;

/// Largest element count accepted for elements that take no bytes, unless
/// more bytes than that remain in the input.
///
/// Such counts cannot be checked against the input length, so a corrupt
/// count would otherwise drive an unbounded decoding loop.
pub const MAX_EMPTY_ELEMENTS: usize = 1 << 16;
