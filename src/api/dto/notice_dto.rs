//! Notice publishing request.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{NewNotice, NoticeDraftError};

/// Body of `POST /notices`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PublishNoticeRequest {
    /// Heading; blank uses the default title.
    #[serde(default)]
    pub title: Option<String>,
    /// Body text (required).
    #[serde(default)]
    pub message: String,
    /// Publisher; blank means `Admin`.
    #[serde(default)]
    pub created_by: Option<String>,
}

impl TryFrom<&PublishNoticeRequest> for NewNotice {
    type Error = NoticeDraftError;

    fn try_from(req: &PublishNoticeRequest) -> Result<Self, Self::Error> {
        Self::new(
            req.title.as_deref(),
            &req.message,
            req.created_by.as_deref(),
        )
    }
}
