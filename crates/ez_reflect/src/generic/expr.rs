use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::info::Type;

/// A type expression used in generic parameter constraints.
///
/// # Examples
///
/// ```
/// use ez_reflect::generic::TypeExpr;
///
/// // `List<U>`, written against the definition of `Vec`.
/// let expr = TypeExpr::generic_like::<Vec<()>>([TypeExpr::param("U")]);
/// assert_eq!(expr.to_string(), "alloc::vec::Vec<U>");
/// assert!(expr.mentions("U"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    /// A parameter of the definition being described.
    Param(&'static str),
    /// A closed type.
    Concrete(Type),
    /// A generic type applied to argument expressions.
    ///
    /// `definition` is compared with [`Type::definition`]; a definition
    /// without `::` is compared with [`Type::ident`] instead.
    Generic {
        definition: &'static str,
        args: Box<[TypeExpr]>,
    },
}

impl TypeExpr {
    #[inline]
    pub const fn param(name: &'static str) -> Self {
        Self::Param(name)
    }

    #[inline]
    pub fn concrete<T: Any + ?Sized>() -> Self {
        Self::Concrete(Type::of::<T>())
    }

    pub fn generic(definition: &'static str, args: impl IntoIterator<Item = TypeExpr>) -> Self {
        Self::Generic {
            definition,
            args: args.into_iter().collect::<Vec<_>>().into_boxed_slice(),
        }
    }

    /// Uses the definition of `G`, ignoring its arguments.
    pub fn generic_like<G: Any + ?Sized>(args: impl IntoIterator<Item = TypeExpr>) -> Self {
        Self::generic(Type::of::<G>().definition(), args)
    }

    /// Returns `true` if parameter `name` occurs anywhere in the expression.
    pub fn mentions(&self, name: &str) -> bool {
        match self {
            Self::Param(param) => *param == name,
            Self::Concrete(_) => false,
            Self::Generic { args, .. } => args.iter().any(|arg| arg.mentions(name)),
        }
    }

    /// Visits every parameter occurrence, in order.
    pub fn for_each_param(&self, f: &mut impl FnMut(&'static str)) {
        match self {
            Self::Param(param) => f(*param),
            Self::Concrete(_) => {}
            Self::Generic { args, .. } => args.iter().for_each(|arg| arg.for_each_param(f)),
        }
    }

    /// Returns `true` if `ty` is an instantiation of `definition`.
    pub(crate) fn same_definition(definition: &str, ty: &Type) -> bool {
        if definition.contains("::") {
            ty.definition() == definition
        } else {
            ty.ident() == definition
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Param(name) => f.write_str(name),
            Self::Concrete(ty) => f.write_str(ty.path()),
            Self::Generic { definition, args } => {
                write!(f, "{definition}<")?;
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
        }
    }
}

impl From<Type> for TypeExpr {
    #[inline]
    fn from(ty: Type) -> Self {
        Self::Concrete(ty)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use super::TypeExpr;
    use crate::info::Type;

    #[test]
    fn nested_params_in_order() {
        let expr = TypeExpr::generic("Map", [TypeExpr::param("K"), TypeExpr::generic_like::<Vec<()>>([TypeExpr::param("V")])]);
        let mut seen = Vec::new();
        expr.for_each_param(&mut |name| seen.push(name));
        assert_eq!(seen, ["K", "V"]);
        assert!(!expr.mentions("T"));
        assert_eq!(expr.to_string(), "Map<K, alloc::vec::Vec<V>>");
    }

    #[test]
    fn definitions_match_by_path_or_ident() {
        let ty = Type::of::<Vec<i32>>();
        assert!(TypeExpr::same_definition("alloc::vec::Vec", &ty));
        assert!(TypeExpr::same_definition("Vec", &ty));
        assert!(!TypeExpr::same_definition("Option", &ty));
    }
}
