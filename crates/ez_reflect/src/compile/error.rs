use thiserror::Error;

/// A descriptor rejected by the [`ReflectionCompiler`](crate::compile::ReflectionCompiler).
///
/// Checks run in a fixed order and stop at the first failure:
///
/// 1. [`NullDescriptor`](Self::NullDescriptor)
/// 2. [`NotStatic`](Self::NotStatic) / [`NotInstance`](Self::NotInstance)
/// 3. setters: [`ReadOnly`](Self::ReadOnly), then [`NonPublicSetter`](Self::NonPublicSetter)
/// 4. property getters: [`NoGetter`](Self::NoGetter)
/// 5. void invokers: [`NotVoid`](Self::NotVoid)
/// 6. typed invokers: [`ArityMismatch`](Self::ArityMismatch)
/// 7. [`TypeMismatch`](Self::TypeMismatch)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompileError {
    #[error("cannot compile {operation}: descriptor is null")]
    NullDescriptor { operation: &'static str },
    #[error("member `{member}` is not static")]
    NotStatic { member: &'static str },
    #[error("member `{member}` is static, expected an instance member")]
    NotInstance { member: &'static str },
    #[error("member `{member}` is read-only")]
    ReadOnly { member: &'static str },
    #[error("the setter of `{member}` is not public and non-public access is not permitted")]
    NonPublicSetter { member: &'static str },
    #[error("property `{member}` has no getter")]
    NoGetter { member: &'static str },
    #[error("method `{method}` returns `{return_type}`, expected a void method")]
    NotVoid {
        method: &'static str,
        return_type: &'static str,
    },
    #[error("method `{method}` takes {actual} parameter(s), expected {expected}")]
    ArityMismatch {
        method: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{what} of `{member}` is `{actual}`, expected `{expected}`")]
    TypeMismatch {
        member: &'static str,
        what: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("type `{ty}` has no {kind} named `{member}`")]
    MemberNotFound {
        ty: &'static str,
        kind: &'static str,
        member: &'static str,
    },
    #[error("type `{ty}` has no constructor taking `{params}`")]
    ConstructorNotFound {
        ty: &'static str,
        params: &'static str,
    },
}
