use stew_echo::EchoError;
use stew_ir::format::FormatError;
use stew_ir::metadata::MetadataError;
use stew_ir::value::FactoryError;

/// Failures raised by a host while registering or executing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error("action '{0}' is already registered")]
    DuplicateAction(String),

    #[error("action '{0}' is not registered")]
    UnknownAction(String),

    #[error("semantic type '{name}' used by '{action}' is not registered")]
    UnknownSemanticType { action: String, name: String },

    #[error("format '{0}' is not registered")]
    UnknownFormat(String),

    #[error("no transformer from {from} to {to}")]
    MissingTransformer { from: String, to: String },

    #[error("no recorded input named '{0}'")]
    UnknownRecord(String),

    #[error("record '{0}' is not metadata")]
    NotMetadata(String),

    #[error("'{action}' has no parameter '{parameter}'")]
    UnknownParameter { action: String, parameter: String },

    #[error("'{action}' requires '{parameter}'")]
    MissingParameter { action: String, parameter: String },

    #[error("'{action}': {value} is not a valid {expected} for '{parameter}'")]
    TypeMismatch {
        action: String,
        parameter: String,
        expected: String,
        value: String,
    },

    #[error("'{action}': inputs match no row of its type map")]
    UnresolvedTypeMap { action: String },

    #[error("'{action}' produced {found} outputs, {expected} were bound")]
    OutputBinding {
        action: String,
        expected: usize,
        found: usize,
    },

    #[error("execution runtime failed: {0}")]
    Runtime(String),

    #[error(transparent)]
    Factory(#[from] FactoryError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Echo(#[from] EchoError),
}

/// A failed check against an output handle.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssertionError {
    #[error("output '{output}' is a {found}, expected {expected}")]
    OutputType {
        output: String,
        expected: String,
        found: String,
    },

    #[error("output '{output}' has no file '{path}'")]
    MissingFile { output: String, path: String },

    #[error("output '{output}' is not a collection")]
    NotACollection { output: String },

    #[error("output '{output}' has no member '{key}'")]
    MissingMember { output: String, key: String },

    #[error("no line of '{path}' in output '{output}' matches {expression:?}")]
    NoMatchingLine {
        output: String,
        path: String,
        expression: String,
    },

    #[error("'{path}' in output '{output}' has {found} lines, expected {expected}")]
    LineCount {
        output: String,
        path: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid expression {expression:?}: {message}")]
    InvalidExpression { expression: String, message: String },
}

/// Why a usage example failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UsageError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Assertion(#[from] AssertionError),

    #[error(transparent)]
    Factory(#[from] FactoryError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("example '{example}' passes '{parameter}', which '{action}' does not declare")]
    UnknownParameter {
        example: String,
        action: String,
        parameter: String,
    },

    #[error("example '{example}': expected {expected} outputs, got {found}")]
    OutputCount {
        example: String,
        expected: usize,
        found: usize,
    },
}
