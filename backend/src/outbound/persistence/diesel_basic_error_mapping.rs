//! Shared Diesel error mapping for the repositories.
//!
//! Each repository classifies the constraint failures it cares about with
//! [`classify_database_error`] and falls back to [`map_basic_diesel_error`]
//! for everything else.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Name of the exclusion constraint that forbids double bookings.
pub(crate) const BOOKINGS_NO_OVERLAP: &str = "bookings_no_overlap";

/// Constraint-level failures the adapters translate into port variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintFailure {
    Unique,
    ForeignKey,
    /// Exclusion violation or serialization failure on the booking table.
    Overlap,
}

/// Recognise the constraint failures shared by the repositories.
pub(crate) fn classify_database_error(error: &DieselError) -> Option<ConstraintFailure> {
    let DieselError::DatabaseError(kind, info) = error else {
        return None;
    };
    if info.constraint_name() == Some(BOOKINGS_NO_OVERLAP) {
        return Some(ConstraintFailure::Overlap);
    }
    match kind {
        DatabaseErrorKind::SerializationFailure => Some(ConstraintFailure::Overlap),
        DatabaseErrorKind::UniqueViolation => Some(ConstraintFailure::Unique),
        DatabaseErrorKind::ForeignKeyViolation => Some(ConstraintFailure::ForeignKey),
        _ => None,
    }
}

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel failures that carry no domain meaning into query/connection
/// constructors.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::BrokenTransactionManager => connection("database transaction broken"),
        _ => query("database error"),
    }
}
