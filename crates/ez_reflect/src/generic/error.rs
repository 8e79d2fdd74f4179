use alloc::string::String;

use thiserror::Error;

/// A malformed [`GenericTypeDefinition`](crate::generic::GenericTypeDefinition).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GenericDefinitionError {
    #[error("`{definition}` declares parameter `{param}` twice")]
    DuplicateParameter {
        definition: &'static str,
        param: &'static str,
    },
    #[error("constraint of `{param}` on `{definition}` mentions unknown parameter `{unknown}`")]
    UnknownParameter {
        definition: &'static str,
        param: &'static str,
        unknown: &'static str,
    },
    #[error("`{definition}` declares both `struct` and `class` constraints on `{param}`")]
    ConflictingSpecialConstraints {
        definition: &'static str,
        param: &'static str,
    },
}

/// A type argument list rejected by
/// [`GenericTypeDefinition::check_type_arguments`](crate::generic::GenericTypeDefinition::check_type_arguments).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("`{definition}` takes {expected} type argument(s), got {actual}")]
    ArgumentCount {
        definition: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("type argument `{ty}` for `{param}` is not registered")]
    Unregistered { param: &'static str, ty: &'static str },
    #[error("type argument `{ty}` for `{param}` must be a reference type")]
    NotReferenceType { param: &'static str, ty: &'static str },
    #[error("type argument `{ty}` for `{param}` must be a value type")]
    NotValueType { param: &'static str, ty: &'static str },
    #[error("type argument `{ty}` for `{param}` must have a default constructor")]
    NoDefaultConstructor { param: &'static str, ty: &'static str },
    #[error("type argument `{ty}` for `{param}` does not satisfy `{constraint}`")]
    Unsatisfied {
        param: &'static str,
        ty: &'static str,
        constraint: String,
    },
}
