use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// Type

/// The identity of a Rust type: its [`TypeId`] plus path strings.
///
/// Paths come from [`core::any::type_name`], so they are suitable for
/// diagnostics and name lookup but not stable across compiler versions.
///
/// Equality and hashing only use the [`TypeId`].
///
/// # Examples
///
/// ```
/// use ez_reflect::info::Type;
///
/// let ty = Type::of::<Vec<i32>>();
/// assert_eq!(ty.path(), "alloc::vec::Vec<i32>");
/// assert_eq!(ty.name(), "Vec<i32>");
/// assert_eq!(ty.ident(), "Vec");
/// assert_eq!(ty.definition(), "alloc::vec::Vec");
/// assert!(ty.is::<Vec<i32>>());
/// ```
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
}

impl Type {
    /// Returns the [`Type`] of `T`.
    #[inline]
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: core::any::type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`].
    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the full type path, e.g. `alloc::vec::Vec<i32>`.
    #[inline(always)]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Returns the type name without module path, e.g. `Vec<i32>`.
    ///
    /// Generic arguments keep their full paths.
    pub fn name(&self) -> &'static str {
        let path = self.path;
        let head = generic_start(path).map_or(path, |at| &path[..at]);
        match head.rfind("::") {
            Some(at) => &path[at + 2..],
            None => path,
        }
    }

    /// Returns the shortest name, without module path and generics, e.g. `Vec`.
    pub fn ident(&self) -> &'static str {
        let name = self.name();
        generic_start(name).map_or(name, |at| &name[..at])
    }

    /// Returns the path of the generic type definition, e.g. `alloc::vec::Vec`.
    ///
    /// Equal to [`path`](Self::path) for non-generic types.
    pub fn definition(&self) -> &'static str {
        let path = self.path;
        generic_start(path).map_or(path, |at| &path[..at])
    }

    /// Returns `true` if this is a generic type instantiation.
    #[inline]
    pub fn is_generic(&self) -> bool {
        generic_start(self.path).is_some()
    }

    /// Check if the given type matches this one.
    #[inline]
    pub fn is<T: Any + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Check if `value` is an instance of this type.
    #[inline]
    pub fn is_type_of(&self, value: &dyn Any) -> bool {
        value.type_id() == self.id
    }
}

// `dyn Trait<T>` and `&[T]` start with a non-path prefix, so only a `<`
// that follows an identifier character counts.
fn generic_start(path: &str) -> Option<usize> {
    let bytes = path.as_bytes();
    bytes
        .iter()
        .enumerate()
        .find(|&(at, &b)| {
            b == b'<' && at > 0 && (bytes[at - 1].is_ascii_alphanumeric() || bytes[at - 1] == b'_')
        })
        .map(|(at, _)| at)
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::Type;

    struct Local;

    #[test]
    fn names_of_plain_types() {
        let ty = Type::of::<i32>();
        assert_eq!(ty.name(), "i32");
        assert_eq!(ty.ident(), "i32");
        assert_eq!(ty.definition(), "i32");
        assert!(!ty.is_generic());

        let ty = Type::of::<Local>();
        assert_eq!(ty.name(), "Local");
        assert!(ty.path().ends_with("::Local"));
    }

    #[test]
    fn names_of_nested_generics() {
        let ty = Type::of::<Option<Vec<String>>>();
        assert_eq!(ty.ident(), "Option");
        assert_eq!(ty.definition(), "core::option::Option");
        assert_eq!(ty.name(), "Option<alloc::vec::Vec<alloc::string::String>>");
        assert!(ty.is_generic());
    }

    #[test]
    fn equality_uses_type_id() {
        assert_eq!(Type::of::<u8>(), Type::of::<u8>());
        assert_ne!(Type::of::<u8>(), Type::of::<i8>());
    }
}
