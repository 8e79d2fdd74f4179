//! Runtime reflection and binary serialization.
//!
//! - [`reflect`]: type metadata, compiled member accessors, member paths and
//!   generic-parameter analysis.
//! - [`serial`]: the binary writer and reader and the processor-based
//!   [`Serializer`](serial::Serializer).
//! - [`utils`]: hashing and the read-through cache shared by both.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use ez_reflect as reflect;
pub use ez_serial as serial;
pub use ez_utils as utils;
