use bitflags::bitflags;

bitflags! {
    /// Coarse classification of a registered type.
    ///
    /// Used by generic special constraints and processor resolution.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u8 {
        /// Plain data, copied by value (primitives, `#[reflect(value_type)]`).
        const VALUE_TYPE = 1 << 0;
        /// Owning or heap-backed data (`String`, `Vec<T>`, most structs).
        const REFERENCE_TYPE = 1 << 1;
        /// Has a fixed-size byte representation, see [`Unmanaged`](crate::info::Unmanaged).
        const UNMANAGED = 1 << 2;
    }
}
