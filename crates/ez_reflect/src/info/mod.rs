//! Provide type identity and structural information.
//!
//! ## Menu
//!
//! - [`Type`]: `TypeId` plus type path strings.
//! - [`TypeInfo`]: the structural kind of a type ([`ReflectKind`] without payload).
//! - [`TypeFlags`]: value/reference/unmanaged classification.
//! - [`EnumInfo`], [`ListInfo`], [`OptionInfo`]: erased operations per kind.
//! - [`Unmanaged`], [`UnmanagedInfo`]: fixed-size byte representations.
//! - [`Generics`]: type arguments of a closed generic type.
//! - [`SerializationConfig`], [`MemberFlags`]: composite serialization opt-in.

// -----------------------------------------------------------------------------
// Modules

mod enum_info;
mod flags;
mod generics;
mod list_info;
mod serialization;
mod ty;
mod type_info;
mod unmanaged;

// -----------------------------------------------------------------------------
// Exports

pub use enum_info::EnumInfo;
pub use flags::TypeFlags;
pub use generics::{Generics, TypeParamInfo};
pub use list_info::{ListInfo, OptionInfo};
pub use serialization::{MemberFlags, SerializationConfig};
pub use ty::Type;
pub use type_info::{PrimitiveKind, ReflectKind, TypeInfo};
pub use unmanaged::{Unmanaged, UnmanagedInfo};
