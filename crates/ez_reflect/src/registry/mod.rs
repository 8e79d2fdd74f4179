//! Provide the type registry used for metadata querying.
//!
//! ## Menu
//!
//! - [`TypeMeta`]: structural info, flags, member/method/constructor
//!   descriptors and serialization config of one type.
//! - [`BaseInfo`]: the embedded base of a composite type.
//! - [`GetTypeMeta`]: a trait providing a function to create a `TypeMeta` from a type.
//! - [`TypeRegistry`]: a container for storing and querying `TypeMeta`s.
//! - [`TypeRegistryArc`]: the shareable `Arc<RwLock<TypeRegistry>>`.
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`] .
//!
//! We use [`inventory`] crate to implement static registration,
//! not all platforms support it (although major platforms do).
//!
//! If it is not supported, the function returns `false` without causing any
//! errors.
//!
//! ### builtin type menu
//!
//! - `bool` `f32` `f64`
//! - `i8` `i16` `i32` `i64`
//! - `u8` `u16` `u32` `u64`
//! - `String`
//! - `Vec<T>` `Option<T>` (generic, registered on demand)
//!
//! [`inventory`]: https://docs.rs/inventory

// -----------------------------------------------------------------------------
// Modules

mod builtin;
mod type_meta;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use type_meta::{AssignFn, BaseInfo, GetTypeMeta, TypeMeta};
pub use type_registry::{TypeRegistry, TypeRegistryArc};
