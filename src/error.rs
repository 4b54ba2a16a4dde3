// src/error.rs

use thiserror::Error;

/// Errors raised by catalog and dismissal mutations. All of them are
/// synchronous and handled by the immediate caller; none are retryable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("duplicate ad id: {0}")]
    DuplicateId(String),

    #[error("no such ad id: {0}")]
    NotFound(String),

    #[error("ad {0} is not dismissible")]
    NotDismissible(String),
}
