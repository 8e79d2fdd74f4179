use alloc::string::String;

use thiserror::Error;

use crate::access::ParseError;

// -----------------------------------------------------------------------------
// AccessError

/// A failed erased access, raised when a member or method is used with a
/// target or value of the wrong type.
///
/// Accessors built by the [`ReflectionPathFactory`](crate::access::ReflectionPathFactory)
/// are validated up front, so at call time this only surfaces for
/// descriptors used directly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccessError {
    #[error("instance member `{member}` requires a target")]
    MissingTarget { member: &'static str },
    #[error("member `{member}` expects a target of type `{expected}`")]
    TargetMismatch {
        member: &'static str,
        expected: &'static str,
    },
    #[error("member `{member}` is not readable")]
    NotReadable { member: &'static str },
    #[error("member `{member}` is not writable")]
    NotWritable { member: &'static str },
    #[error("member `{member}` expects a value of type `{expected}`")]
    ValueMismatch {
        member: &'static str,
        expected: &'static str,
    },
    #[error("method `{method}` was invoked with mismatched target or arguments")]
    InvocationMismatch { method: &'static str },
}

// -----------------------------------------------------------------------------
// PathError

/// An error building or evaluating a member path.
///
/// Everything except [`Access`](PathError::Access) is raised when the
/// accessor is built, before any value is touched.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PathError {
    #[error("encountered an error at offset {offset} while parsing `{path}`: {message}")]
    Parse {
        path: String,
        offset: usize,
        message: String,
    },
    #[error("path `{path}` has no static root, expected `-t:<Type> -p:<path>`")]
    MissingStaticRoot { path: String },
    #[error("type `{name}` is not registered")]
    UnknownType { name: String },
    #[error("type `{ty}` has no member `{member}`")]
    MemberNotFound { ty: &'static str, member: String },
    #[error("method `{method}` may only be the last segment of a path")]
    MethodNotTerminal { method: &'static str },
    #[error("`{member}` is not a method and cannot be invoked")]
    NotInvokable { member: &'static str },
    #[error("member `{member}` is static and the path has an instance target")]
    NotInstance { member: &'static str },
    #[error("member `{member}` is not static and the path has a static root")]
    NotStatic { member: &'static str },
    #[error("member `{member}` is not readable")]
    NotReadable { member: &'static str },
    #[error("member `{member}` is not writable")]
    NotWritable { member: &'static str },
    #[error("method `{method}` mutates its receiver and cannot end a getter")]
    ExclusiveReceiver { method: &'static str },
    #[error("method `{method}` returns nothing and cannot end a getter")]
    VoidMethod { method: &'static str },
    #[error("`{member}` has type `{actual}`, expected `{expected}`")]
    TypeMismatch {
        member: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("method `{method}` takes {expected} argument(s), got {actual}")]
    ArgumentCount {
        method: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("argument {index} of method `{method}` cannot be converted to `{expected}`")]
    ArgumentMismatch {
        method: &'static str,
        index: usize,
        expected: &'static str,
    },
    #[error(transparent)]
    Access(#[from] AccessError),
}

impl From<ParseError<'_>> for PathError {
    fn from(err: ParseError<'_>) -> Self {
        Self::Parse {
            path: err.path.into(),
            offset: err.offset,
            message: err.error.into_owned(),
        }
    }
}
