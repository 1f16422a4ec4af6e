//! Record store error types.

use crate::domain::NoticeId;

/// Failure reported by a [`super::Backend`].
///
/// The split decides recovery: an unavailable backend is replaced by the
/// fallback dataset, a rejection is surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Unreachable, misconfigured, timed out, or missing the table.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The backend refused the operation (constraint, bad data).
    #[error("backend rejected the operation: {0}")]
    Rejected(String),
}

impl From<sqlx::Error> for BackendError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => {
                let code = db.code().unwrap_or_default();
                // Class 08 = connection exception, 42P01 = undefined table.
                if code.starts_with("08") || code == "42P01" {
                    Self::Unavailable(err.to_string())
                } else {
                    Self::Rejected(err.to_string())
                }
            }
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::TypeNotFound { .. } => {
                Self::Rejected(err.to_string())
            }
            _ => Self::Unavailable(err.to_string()),
        }
    }
}

/// Failure reported by the [`super::RecordStore`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backend is unavailable and no fallback dataset is configured.
    #[error("{op}: data source unavailable ({reason})")]
    Unavailable {
        /// Store operation that failed.
        op: &'static str,
        /// Underlying cause.
        reason: String,
    },

    /// The backend (or the fallback dataset) refused the operation.
    #[error("{op} rejected: {reason}")]
    Rejected {
        /// Store operation that failed.
        op: &'static str,
        /// Underlying cause.
        reason: String,
    },

    /// Active notices must be deactivated before deletion.
    #[error("notice {0} is active; deactivate it before deleting")]
    ActiveNotice(NoticeId),
}
