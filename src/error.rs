//! Error taxonomy for the sync engine.
//!
//! Everything a cycle can fail with collapses into [`SyncError`]. Transport
//! failures (network unreachable, non-2xx, timeout) and local-store failures
//! surface identically to the scheduler: the cycle aborts before or inside the
//! merge transaction with no partial state committed, pending rows stay dirty,
//! and the next trigger retries from scratch.

use sea_orm::{DbErr, TransactionError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    /// The remote endpoint rejected the exchange (non-2xx status).
    #[error("transport error: {0}")]
    Transport(String),

    /// The HTTP request itself failed (connect, timeout, body decode).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The local store failed (connection, transaction, quota).
    #[error("local store error: {0}")]
    Store(#[from] DbErr),

    /// A JSON-encoded column or payload could not be serialized.
    #[error("malformed payload: {0}")]
    Serde(#[from] serde_json::Error),

    /// The requested row does not exist locally.
    #[error("row {0} not found")]
    NotFound(String),
}

impl From<TransactionError<SyncError>> for SyncError {
    fn from(err: TransactionError<SyncError>) -> Self {
        match err {
            TransactionError::Connection(e) => SyncError::Store(e),
            TransactionError::Transaction(e) => e,
        }
    }
}
