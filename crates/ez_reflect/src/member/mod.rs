//! Provide descriptors for the members, methods and constructors of a type.
//!
//! ## Menu
//!
//! - [`MemberDescriptor`]: a field or property, instance or static.
//! - [`MemberAccess`]: erased access, implemented by [`FieldAccess`],
//!   [`PropertyAccess`] and [`StaticAccess`].
//! - [`MethodDescriptor`]: a method with a [`Receiver`] and [`MethodArgs`].
//! - [`ConstructorDescriptor`]: `fn(A) -> T`.

// -----------------------------------------------------------------------------
// Modules

mod access;
mod descriptor;
mod method;

// -----------------------------------------------------------------------------
// Exports

pub use access::{FieldAccess, MemberAccess, MemberValue, PropertyAccess, StaticAccess};
pub use descriptor::{MemberAttributes, MemberDescriptor, MemberKind, Visibility};
pub use method::{ConstructorDescriptor, MethodArgs, MethodDescriptor, Receiver};
