//! Shared Diesel error classification for the repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Coarse outcome of a failed Diesel call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection,
    /// A unique constraint rejected the write.
    UniqueViolation,
    /// Anything else: bad query, constraint, or driver error.
    Query,
}

/// Classify `error` by [`DatabaseErrorKind`] and log the driver detail.
pub(crate) fn classify_diesel_error(error: &DieselError) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DieselFailure::UniqueViolation
        }
        _ => DieselFailure::Query,
    }
}

/// Public message for a failure class. Driver text stays in the logs.
pub(crate) fn failure_message(failure: DieselFailure) -> &'static str {
    match failure {
        DieselFailure::Connection => "database connection error",
        DieselFailure::UniqueViolation => "unique constraint violated",
        DieselFailure::Query => "database error",
    }
}
