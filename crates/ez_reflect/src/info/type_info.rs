use core::fmt;

use crate::info::{EnumInfo, ListInfo, OptionInfo};

// -----------------------------------------------------------------------------
// PrimitiveKind

/// The built-in scalar types understood by the binary format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
}

impl PrimitiveKind {
    /// Returns `true` for the eight integer kinds.
    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::U8 | Self::U16 | Self::U32 | Self::U64
        )
    }

    /// Returns `true` for the signed integer kinds.
    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    /// Returns the Rust spelling of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "String",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Structural information about a registered type.
///
/// Composite types are [`TypeInfo::Struct`]; their members live in the
/// [`TypeMeta`](crate::registry::TypeMeta).
#[derive(Clone, Debug)]
pub enum TypeInfo {
    Primitive(PrimitiveKind),
    Struct,
    Enum(EnumInfo),
    List(ListInfo),
    Option(OptionInfo),
    Opaque,
}

impl TypeInfo {
    /// Returns the payload-free kind.
    pub const fn kind(&self) -> ReflectKind {
        match self {
            Self::Primitive(_) => ReflectKind::Primitive,
            Self::Struct => ReflectKind::Struct,
            Self::Enum(_) => ReflectKind::Enum,
            Self::List(_) => ReflectKind::List,
            Self::Option(_) => ReflectKind::Option,
            Self::Opaque => ReflectKind::Opaque,
        }
    }

    #[inline]
    pub const fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_enum(&self) -> Option<&EnumInfo> {
        match self {
            Self::Enum(info) => Some(info),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_list(&self) -> Option<&ListInfo> {
        match self {
            Self::List(info) => Some(info),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_option(&self) -> Option<&OptionInfo> {
        match self {
            Self::Option(info) => Some(info),
            _ => None,
        }
    }
}

/// The kind of a [`TypeInfo`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    Primitive,
    Struct,
    Enum,
    List,
    Option,
    Opaque,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Primitive => "Primitive",
            Self::Struct => "Struct",
            Self::Enum => "Enum",
            Self::List => "List",
            Self::Option => "Option",
            Self::Opaque => "Opaque",
        })
    }
}
