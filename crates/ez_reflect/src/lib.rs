//! Runtime type metadata, compiled member accessors and member paths.
//!
//! ## Menu
//!
//! - [`info`]: [`Type`](info::Type), [`TypeInfo`](info::TypeInfo) and the
//!   serialization configuration carried by composite types.
//! - [`member`]: field, property, method and constructor descriptors.
//! - [`registry`]: [`TypeMeta`](registry::TypeMeta) and the shared
//!   [`TypeRegistry`](registry::TypeRegistry).
//! - [`compile`]: the [`ReflectionCompiler`](compile::ReflectionCompiler),
//!   turning descriptors into typed, cached closures.
//! - [`access`]: the member-path language and the
//!   [`ReflectionPathFactory`](access::ReflectionPathFactory).
//! - [`generic`]: generic-parameter dependency analysis and type-argument
//!   inference.
//!
//! Most metadata is produced by [`#[derive(Reflect)]`](derive::Reflect).

// -----------------------------------------------------------------------------
// Extern Self

// The derive macro refers to this crate as `ez_reflect`, including from inside
// the crate itself (tests and doctests).
extern crate self as ez_reflect;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod access;
pub mod compile;
pub mod generic;
pub mod info;
pub mod member;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use ez_reflect_derive as derive;
pub use registry::{GetTypeMeta, TypeMeta, TypeRegistry, TypeRegistryArc};
