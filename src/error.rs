//! Error types for the reporting subsystem.
//!
//! Only programming and configuration faults are represented here. Failures
//! of the output stream itself are handled inside [`crate::sink`] and never
//! reach the caller.

use thiserror::Error;

/// Hard faults raised by renderers, the field registry and the text codec.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("{renderer} does not implement `{operation}`")]
    NotImplemented {
        renderer: &'static str,
        operation: &'static str,
    },

    #[error("tried to encode non-text value {0:?}")]
    NotText(Vec<u8>),

    #[error("unknown output encoding `{0}`")]
    UnknownEncoding(String),

    #[error("unknown output format `{0}`")]
    UnknownFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
