use bitflags::bitflags;

bitflags! {
    /// Which members of a composite type take part in serialization.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MemberFlags: u8 {
        const PUBLIC_FIELDS = 1 << 0;
        const NON_PUBLIC_FIELDS = 1 << 1;
        const PUBLIC_PROPERTIES = 1 << 2;
        const NON_PUBLIC_PROPERTIES = 1 << 3;

        const ALL_FIELDS = Self::PUBLIC_FIELDS.bits() | Self::NON_PUBLIC_FIELDS.bits();
        const ALL_PROPERTIES = Self::PUBLIC_PROPERTIES.bits() | Self::NON_PUBLIC_PROPERTIES.bits();
        const ALL = Self::ALL_FIELDS.bits() | Self::ALL_PROPERTIES.bits();
    }
}

impl Default for MemberFlags {
    /// All fields regardless of visibility.
    #[inline]
    fn default() -> Self {
        Self::ALL_FIELDS
    }
}

/// Marks a type as a serializable composite and selects its members.
///
/// Produced by `#[reflect(serializable(...))]` and stored in the type's
/// [`TypeMeta`](crate::registry::TypeMeta).
///
/// # Examples
///
/// ```
/// use ez_reflect::info::{MemberFlags, SerializationConfig};
///
/// let config = SerializationConfig::default();
/// assert_eq!(config.member_flags, MemberFlags::ALL_FIELDS);
/// assert!(!config.require_explicit_field_opt_in);
/// assert!(config.inherit_to_derived_types);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerializationConfig {
    pub member_flags: MemberFlags,
    /// Non-public fields additionally need `#[reflect(serialize_field)]`.
    pub require_explicit_field_opt_in: bool,
    /// Types embedding this one as `#[reflect(base)]` reuse this config when
    /// they carry none of their own. When `false` such types cannot be
    /// serialized.
    pub inherit_to_derived_types: bool,
}

impl SerializationConfig {
    /// Creates a config selecting `member_flags`, with the other options at their defaults.
    #[inline]
    pub const fn new(member_flags: MemberFlags) -> Self {
        Self {
            member_flags,
            require_explicit_field_opt_in: false,
            inherit_to_derived_types: true,
        }
    }
}

impl Default for SerializationConfig {
    #[inline]
    fn default() -> Self {
        Self::new(MemberFlags::ALL_FIELDS)
    }
}
