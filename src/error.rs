use thiserror::Error;

use crate::params::ParamKind;
use crate::value::ValueKind;

#[derive(Debug, Error)]
pub enum Error {
    #[error("found more than one {0} parameter")]
    MultipleVariadic(ParamKind),
    #[error("duplicate parameter `{0}`")]
    DuplicateParameter(String),
    #[error("no valid object structure found")]
    InvalidStructure,
    #[error("expected class `{expected}`, found `{found}`")]
    ClassMismatch { expected: String, found: String },
    #[error("missing argument `{0}`")]
    MissingArgument(String),
    #[error("unexpected keyword argument `{0}`")]
    UnexpectedKeyword(String),
    #[error("too many positional arguments for `{0}`")]
    TooManyArguments(String),
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("expected {expected} value, found {found}")]
    TypeMismatch {
        expected: ValueKind,
        found: ValueKind,
    },
    #[error("integer argument out of range")]
    IntegerRange,
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}
