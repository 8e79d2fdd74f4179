use ez_reflect::access::AccessError;
use thiserror::Error;

/// Failures of the binary codec and the processors.
///
/// Every error is fatal to the current call; nothing is retried or replaced
/// by a default value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SerializationError {
    #[error("writer capacity must be positive")]
    InvalidCapacity,
    #[error("unexpected end of stream at {position}: needed {needed} byte(s), {remaining} remaining")]
    EndOfStream {
        position: usize,
        needed: usize,
        remaining: usize,
    },
    #[error("malformed varint at {position}")]
    MalformedVarint { position: usize },
    #[error("varint value {value} does not fit in `{ty}`")]
    VarintOverflow { ty: &'static str, value: i128 },
    #[error("invalid bool byte {value:#04x} at {position}")]
    InvalidBool { position: usize, value: u8 },
    #[error("invalid UTF-8 in string at {position}")]
    InvalidUtf8 { position: usize },
    #[error("position {position} is past the written length {len}")]
    InvalidPosition { position: usize, len: usize },
    #[error("{remaining} trailing byte(s) after the value")]
    TrailingBytes { remaining: usize },
    #[error("type `{type_path}` is not registered")]
    NotRegistered { type_path: &'static str },
    #[error("no processor can handle type `{type_path}`")]
    UnsupportedType { type_path: &'static str },
    #[error(
        "type `{derived}` is not serializable: its base `{base}` does not pass its configuration on to derived types"
    )]
    InheritanceViolation {
        derived: &'static str,
        base: &'static str,
    },
    #[error("type `{type_path}` has no parameterless constructor")]
    MissingDefaultConstructor { type_path: &'static str },
    #[error("discriminant {discriminant} is not a variant of `{type_path}`")]
    InvalidDiscriminant {
        type_path: &'static str,
        discriminant: i64,
    },
    #[error("processor for `{expected}` was given a value of another type")]
    TypeMismatch { expected: &'static str },
    #[error(transparent)]
    Access(#[from] AccessError),
}
