use alloc::string::String;
use core::any::Any;

use crate::access::{PathError, ReflectionPathFactory};
use crate::registry::GetTypeMeta;

/// Marks a string as a member path when expressions are flagged.
pub const EXPRESSION_SIGIL: char = '@';

/// A string that is either a literal or a member path.
///
/// With the expression flag on, only strings starting with
/// [`EXPRESSION_SIGIL`] are paths and everything else is a literal, returned
/// unchanged. With the flag off the string is always a path.
///
/// # Examples
///
/// ```
/// use ez_reflect::access::{ExpressionValue, MemberExpression, ReflectionPathFactory};
/// use ez_reflect::derive::Reflect;
/// use ez_reflect::TypeRegistryArc;
///
/// #[derive(Reflect)]
/// struct Label {
///     text: String,
/// }
///
/// let factory = ReflectionPathFactory::new(TypeRegistryArc::default());
/// let label = Label { text: "hello".into() };
///
/// let literal = MemberExpression::new("plain words", true);
/// assert!(literal.is_literal());
/// assert_eq!(
///     literal.evaluate::<Label, String>(&factory, &label),
///     Ok(ExpressionValue::Literal("plain words")),
/// );
///
/// let path = MemberExpression::new("@text", true);
/// assert_eq!(
///     path.evaluate::<Label, String>(&factory, &label),
///     Ok(ExpressionValue::Value("hello".into())),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberExpression {
    Literal(String),
    Path(String),
}

/// The result of [`MemberExpression::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionValue<'a, V> {
    Literal(&'a str),
    Value(V),
}

impl MemberExpression {
    /// Classifies `source`; `expression_flag` enables the sigil convention.
    pub fn new(source: &str, expression_flag: bool) -> Self {
        if !expression_flag {
            return Self::Path(source.into());
        }
        match source.strip_prefix(EXPRESSION_SIGIL) {
            Some(path) => Self::Path(path.trim_start().into()),
            None => Self::Literal(source.into()),
        }
    }

    #[inline]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Returns the member path, without the sigil.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Path(path) => Some(path),
            Self::Literal(_) => None,
        }
    }

    /// Returns the literal unchanged, or reads the path on `target`.
    pub fn evaluate<'a, T: GetTypeMeta, V: Any + Clone>(
        &'a self,
        factory: &ReflectionPathFactory,
        target: &T,
    ) -> Result<ExpressionValue<'a, V>, PathError> {
        match self {
            Self::Literal(text) => Ok(ExpressionValue::Literal(text)),
            Self::Path(path) => {
                let getter = factory.build_getter::<T, V>(path)?;
                Ok(ExpressionValue::Value(getter.get(target)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MemberExpression;

    #[test]
    fn sigil_selects_paths() {
        assert_eq!(MemberExpression::new("@a.b", true), MemberExpression::Path("a.b".into()));
        assert_eq!(MemberExpression::new("a.b", true), MemberExpression::Literal("a.b".into()));
        assert_eq!(MemberExpression::new("", true), MemberExpression::Literal("".into()));
    }

    #[test]
    fn unflagged_is_always_a_path() {
        assert_eq!(MemberExpression::new("a.b", false).path(), Some("a.b"));
        assert_eq!(MemberExpression::new("@a", false).path(), Some("@a"));
    }
}
