use std::time::Duration;

use axum::response::{IntoResponse, Response};
use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

use crate::response;

/// MongoDB duplicate-key error code, raised when a write violates a unique
/// index.
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Failures surfaced by [`crate::store::DocumentStore`].
///
/// Zero matching documents is never an error: read operations report absence
/// through `Option`/empty containers instead.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("write rejected by unique constraint: {0}")]
    DuplicateKey(mongodb::error::Error),

    #[error("write failed: {0}")]
    Write(mongodb::error::Error),

    #[error("failed to decode stored document: {0}")]
    Decode(String),

    #[error("store operation exceeded {}s deadline", .0.as_secs())]
    Timeout(Duration),

    #[error("store operation failed: {0}")]
    Store(mongodb::error::Error),
}

impl StoreError {
    /// Classify a driver error. Uniqueness violations become
    /// [`StoreError::DuplicateKey`] so callers can react to them without
    /// string matching; everything else keeps its broad category.
    pub(crate) fn from_driver(err: mongodb::error::Error) -> Self {
        if is_duplicate_key(&err) {
            return StoreError::DuplicateKey(err);
        }
        match err.kind.as_ref() {
            ErrorKind::Write(_) | ErrorKind::BulkWrite(_) => StoreError::Write(err),
            ErrorKind::BsonDeserialization(_) => StoreError::Decode(err.to_string()),
            _ => StoreError::Store(err),
        }
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, StoreError::DuplicateKey(_))
    }
}

/// Check whether a driver error is attributable to a unique-constraint
/// violation, on both single and batched writes.
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_err)) => {
            write_err.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::BulkWrite(failure) => failure
            .write_errors
            .as_ref()
            .is_some_and(|errs| errs.iter().any(|e| e.code == DUPLICATE_KEY_CODE)),
        _ => false,
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        // The underlying cause stays server-side; clients only see the
        // generic database envelope.
        tracing::error!(error = %self, "store operation failed");
        response::database_error()
    }
}
