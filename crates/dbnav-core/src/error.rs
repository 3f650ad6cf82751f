//! Error types for dbnav

use thiserror::Error;

use crate::{BackendKind, Operation, RequestField};

/// Errors raised while generating a statement.
///
/// A structurally absent capability is not an error: it is reported as
/// [`StatementResult::Unsupported`](crate::StatementResult::Unsupported).
#[derive(Error, Debug)]
pub enum DialectError {
    #[error("Unsupported type: {logical_type}")]
    UnsupportedType { logical_type: String },

    #[error("Invalid request: {field} {reason}")]
    InvalidRequest { field: RequestField, reason: String },

    #[error("Unknown backend: {tag}")]
    UnknownBackend { tag: String },

    #[error("Capability mismatch: {backend} declares {operation} but cannot render it")]
    CapabilityMismatch {
        backend: BackendKind,
        operation: Operation,
    },

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DialectError {
    pub fn unsupported_type(logical_type: impl Into<String>) -> Self {
        Self::UnsupportedType {
            logical_type: logical_type.into(),
        }
    }

    pub fn invalid(field: RequestField, reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            field,
            reason: reason.into(),
        }
    }

    pub fn unknown_backend(tag: impl Into<String>) -> Self {
        Self::UnknownBackend { tag: tag.into() }
    }

    /// The request field at fault, if this is an `InvalidRequest`
    pub fn invalid_field(&self) -> Option<RequestField> {
        match self {
            Self::InvalidRequest { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// Result type alias for dialect operations
pub type Result<T> = std::result::Result<T, DialectError>;
