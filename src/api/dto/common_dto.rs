//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::BarberFilter;
use crate::store::{DataSource, Sourced};

/// Response envelope tagging a payload with its data source.
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T> {
    /// The payload.
    pub data: T,
    /// `backend`, or `fallback` when served from the built-in dataset.
    pub source: DataSource,
}

impl<T> From<Sourced<T>> for DataResponse<T> {
    fn from(sourced: Sourced<T>) -> Self {
        Self {
            data: sourced.value,
            source: sourced.source,
        }
    }
}

/// `?barber=` scope for list endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BarberQuery {
    /// Barber id, or `all` (the default).
    #[param(value_type = Option<String>, example = "renne")]
    #[serde(default)]
    pub barber: Option<BarberFilter>,
}

impl BarberQuery {
    /// The requested scope; absent means all barbers.
    #[must_use]
    pub fn filter(&self) -> BarberFilter {
        self.barber.clone().unwrap_or_default()
    }
}

/// Result of a toggle or delete with no other payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeletedResponse {
    /// Id of the removed record.
    pub id: String,
    /// Always `true`; unknown ids answer 404 instead.
    pub deleted: bool,
    /// Data source that performed the delete.
    #[schema(value_type = String, example = "backend")]
    pub source: DataSource,
}
