//! Broadcast notices shown to clients.
//!
//! At most one notice is active at a time. That is a convention kept by
//! the record store (publishing or restoring a notice deactivates the
//! current one), not a database constraint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::NoticeId;

/// Title used when the publisher leaves it blank.
pub const DEFAULT_NOTICE_TITLE: &str = "Aviso da Barbearia";

/// A notice, active or archived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Store-assigned identifier.
    pub id: NoticeId,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Whether this is the notice currently broadcast.
    pub active: bool,
    /// Publication time.
    pub created_at: DateTime<Utc>,
    /// Who published it.
    pub created_by: String,
}

/// A notice about to be published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotice {
    /// Short heading.
    pub title: String,
    /// Body text (non-empty).
    pub message: String,
    /// Who publishes it.
    pub created_by: String,
}

/// Rejection of a notice draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoticeDraftError {
    /// The message is blank.
    #[error("notice message is required")]
    EmptyMessage,
}

impl NewNotice {
    /// Builds a draft, trimming input and filling the default title and
    /// publisher.
    ///
    /// # Errors
    ///
    /// Returns [`NoticeDraftError::EmptyMessage`] if the message is blank.
    pub fn new(
        title: Option<&str>,
        message: &str,
        created_by: Option<&str>,
    ) -> Result<Self, NoticeDraftError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(NoticeDraftError::EmptyMessage);
        }
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_NOTICE_TITLE);
        let created_by = created_by
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or("Admin");
        Ok(Self {
            title: title.to_string(),
            message: message.to_string(),
            created_by: created_by.to_string(),
        })
    }

    /// Materializes the notice as the new active one.
    #[must_use]
    pub fn into_notice(self, id: NoticeId, created_at: DateTime<Utc>) -> Notice {
        Notice {
            id,
            title: self.title,
            message: self.message,
            active: true,
            created_at,
            created_by: self.created_by,
        }
    }
}
