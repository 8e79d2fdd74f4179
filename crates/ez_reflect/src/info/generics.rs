use alloc::boxed::Box;
use alloc::vec::Vec;
use core::ops::Deref;

use crate::info::Type;

// -----------------------------------------------------------------------------
// TypeParamInfo

/// A generic type parameter of a closed type, with its argument.
///
/// # Examples
///
/// ```
/// use ez_reflect::registry::GetTypeMeta;
///
/// let meta = <Vec<i32>>::get_type_meta();
/// let param = meta.generics().get("T").unwrap();
/// assert!(param.ty().is::<i32>());
/// ```
#[derive(Clone, Debug)]
pub struct TypeParamInfo {
    ty: Type,
    name: &'static str,
}

impl TypeParamInfo {
    /// Creates the info for parameter `name` bound to `T`.
    #[inline]
    pub fn new<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self {
            ty: Type::of::<T>(),
            name,
        }
    }

    /// Returns the generic parameter name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the type argument.
    #[inline]
    pub const fn ty(&self) -> Type {
        self.ty
    }
}

// -----------------------------------------------------------------------------
// Generics

/// The type arguments of a closed generic type, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct Generics(Box<[TypeParamInfo]>);

impl Generics {
    /// Creates an empty set, for non-generic types.
    #[inline]
    pub fn new() -> Self {
        Self(Box::new([]))
    }

    /// Builds from an iterator of parameters.
    pub fn from_params(params: impl IntoIterator<Item = TypeParamInfo>) -> Self {
        Self(params.into_iter().collect::<Vec<_>>().into_boxed_slice())
    }

    /// Adds a parameter.
    pub fn with(self, param: TypeParamInfo) -> Self {
        let mut params = self.0.into_vec();
        params.push(param);
        Self(params.into_boxed_slice())
    }

    /// Returns the parameter named `name`.
    pub fn get(&self, name: &str) -> Option<&TypeParamInfo> {
        self.0.iter().find(|info| info.name == name)
    }

    /// Returns the type arguments in order.
    pub fn types(&self) -> impl ExactSizeIterator<Item = Type> + '_ {
        self.0.iter().map(TypeParamInfo::ty)
    }
}

impl Deref for Generics {
    type Target = [TypeParamInfo];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
