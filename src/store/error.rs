//! Store error taxonomy and failure classification.
//!
//! Every store failure maps to exactly one [`FailureKind`]. Only a failure to
//! open a connection is retryable; everything else (bad migration, constraint
//! violation, decode error) is fatal.

use sqlx::migrate::MigrateError;
use thiserror::Error;

/// SQLSTATE 57P03: the server accepts sockets but is still starting up.
const CANNOT_CONNECT_NOW: &str = "57P03";

/// SQLSTATE class 08: connection exception.
const CONNECTION_EXCEPTION_CLASS: &str = "08";

/// Fallback for drivers that report connect failures without a code.
const CANNOT_OPEN_CONNECTION: &str = "could not open a connection";

/// How a store failure should be handled by callers that retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Transient: the store could not be reached yet.
    Retryable,
    /// Anything else. Never retried.
    Fatal,
}

/// Errors surfaced by the persistent store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A connection to the store could not be established.
    #[error("could not open a connection to the store: {0}")]
    Connect(String),

    /// The server answered with an error.
    #[error("database error ({}): {message}", .code.as_deref().unwrap_or("no code"))]
    Database {
        /// SQLSTATE (or driver-specific) code, when the driver supplies one.
        code: Option<String>,
        message: String,
    },

    /// Schema migration could not be applied.
    #[error("migration failed: {0}")]
    Migration(String),

    /// Configuration problems, decode failures and everything unclassified.
    #[error("store error: {0}")]
    Other(String),
}

impl StoreError {
    /// Shorthand for [`classify`].
    pub fn kind(&self) -> FailureKind {
        classify(self)
    }
}

/// Classify a store failure as retryable or fatal.
pub fn classify(err: &StoreError) -> FailureKind {
    match err {
        StoreError::Connect(_) => FailureKind::Retryable,
        StoreError::Database { code, message } => {
            let connection_code = code.as_deref().is_some_and(is_connection_code);
            if connection_code || reports_cannot_open(message) {
                FailureKind::Retryable
            } else {
                FailureKind::Fatal
            }
        }
        StoreError::Migration(_) | StoreError::Other(_) => FailureKind::Fatal,
    }
}

fn is_connection_code(code: &str) -> bool {
    code == CANNOT_CONNECT_NOW || code.starts_with(CONNECTION_EXCEPTION_CLASS)
}

fn reports_cannot_open(message: &str) -> bool {
    message.to_ascii_lowercase().contains(CANNOT_OPEN_CONNECTION)
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(e) => StoreError::Connect(e.to_string()),
            sqlx::Error::PoolTimedOut => {
                StoreError::Connect("timed out waiting for a pooled connection".to_string())
            }
            sqlx::Error::Database(db_err) => StoreError::Database {
                code: db_err.code().map(|c| c.into_owned()),
                message: db_err.message().to_string(),
            },
            other => StoreError::Other(other.to_string()),
        }
    }
}

impl From<MigrateError> for StoreError {
    fn from(err: MigrateError) -> Self {
        match err {
            // Acquiring the migration connection failed; classify the cause.
            MigrateError::Execute(e) => StoreError::from(e),
            other => StoreError::Migration(other.to_string()),
        }
    }
}
