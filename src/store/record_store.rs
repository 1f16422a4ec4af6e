//! Uniform CRUD over the configured backend with transparent fallback.
//!
//! Every call goes to the primary backend first, bounded by a timeout.
//! When the backend is missing, unreachable, or slow, the call is served
//! by the in-memory fallback dataset instead and the result is tagged
//! [`DataSource::Fallback`]. A backend that *rejects* an operation is not
//! retried against the fallback: the rejection is surfaced.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::future::BoxFuture;
use serde::Serialize;

use super::backend::Backend;
use super::error::{BackendError, StoreError};
use super::memory::MemoryBackend;
use super::seed::fallback_dataset;
use crate::domain::{
    Appointment, AppointmentId, AppointmentPatch, Barber, BarberFilter, BarberId, BarberPatch,
    NewAppointment, NewNotice, Notice, NoticeId,
};

/// Default bound on a single backend call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// The configured backend.
    Backend,
    /// The local fallback dataset.
    Fallback,
}

impl DataSource {
    /// Combines the sources of a multi-step operation: any fallback step
    /// makes the whole result fallback.
    #[must_use]
    pub const fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Backend, Self::Backend) => Self::Backend,
            _ => Self::Fallback,
        }
    }
}

/// A value tagged with its [`DataSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sourced<T> {
    /// The result.
    pub value: T,
    /// Where it came from.
    pub source: DataSource,
}

impl<T> Sourced<T> {
    /// Transforms the value, keeping the source.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            value: f(self.value),
            source: self.source,
        }
    }

    /// Returns `true` if the fallback dataset served this result.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::Fallback
    }
}

/// Which data source the store is configured around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    /// A backend is configured (the fallback may still serve failures).
    Backend,
    /// No backend; everything is served from the fallback dataset.
    Demo,
}

/// The record store.
///
/// Cheap to share behind an `Arc`; holds no locks of its own.
#[derive(Debug)]
pub struct RecordStore {
    primary: Option<Arc<dyn Backend>>,
    fallback: Option<MemoryBackend>,
    call_timeout: Duration,
}

impl RecordStore {
    /// Creates a store over an optional primary backend and an optional
    /// fallback dataset.
    #[must_use]
    pub fn new(
        primary: Option<Arc<dyn Backend>>,
        fallback: Option<MemoryBackend>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            primary,
            fallback,
            call_timeout,
        }
    }

    /// Store with no backend, serving the seeded fallback dataset.
    #[must_use]
    pub fn demo() -> Self {
        Self::new(
            None,
            Some(MemoryBackend::with_dataset(fallback_dataset())),
            DEFAULT_CALL_TIMEOUT,
        )
    }

    /// Whether a primary backend is configured.
    #[must_use]
    pub fn mode(&self) -> StoreMode {
        if self.primary.is_some() {
            StoreMode::Backend
        } else {
            StoreMode::Demo
        }
    }

    /// Whether failures can be served from the fallback dataset.
    #[must_use]
    pub fn fallback_enabled(&self) -> bool {
        self.fallback.is_some()
    }

    /// Routes one backend call, falling back when the primary is
    /// unavailable.
    async fn route<'a, T, F>(&'a self, op: &'static str, call: F) -> Result<Sourced<T>, StoreError>
    where
        F: Fn(&'a dyn Backend) -> BoxFuture<'a, Result<T, BackendError>>,
    {
        let reason = match &self.primary {
            Some(primary) => {
                match tokio::time::timeout(self.call_timeout, call(primary.as_ref())).await {
                    Ok(Ok(value)) => {
                        return Ok(Sourced {
                            value,
                            source: DataSource::Backend,
                        });
                    }
                    Ok(Err(BackendError::Rejected(reason))) => {
                        tracing::warn!(
                            op,
                            backend = primary.name(),
                            %reason,
                            "backend rejected operation"
                        );
                        return Err(StoreError::Rejected { op, reason });
                    }
                    Ok(Err(BackendError::Unavailable(reason))) => reason,
                    Err(_) => format!("timed out after {:?}", self.call_timeout),
                }
            }
            None => "no backend configured".to_string(),
        };

        let Some(fallback) = &self.fallback else {
            tracing::error!(op, %reason, "backend unavailable and fallback disabled");
            return Err(StoreError::Unavailable { op, reason });
        };

        if self.primary.is_some() {
            tracing::warn!(op, %reason, "backend unavailable, serving fallback dataset");
        } else {
            tracing::debug!(op, "serving fallback dataset");
        }

        match call(fallback as &dyn Backend).await {
            Ok(value) => Ok(Sourced {
                value,
                source: DataSource::Fallback,
            }),
            Err(BackendError::Rejected(reason) | BackendError::Unavailable(reason)) => {
                Err(StoreError::Rejected { op, reason })
            }
        }
    }

    // ---- appointments ----

    /// Lists appointments for one barber or all barbers, ordered by date
    /// then start time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if neither backend nor fallback can serve it.
    pub async fn list_appointments(
        &self,
        filter: &BarberFilter,
    ) -> Result<Sourced<Vec<Appointment>>, StoreError> {
        self.route("list_appointments", |b| b.select_appointments(filter))
            .await
    }

    /// Inserts a validated appointment.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on rejection or total unavailability.
    pub async fn create_appointment(
        &self,
        new: &NewAppointment,
    ) -> Result<Sourced<Appointment>, StoreError> {
        let created = self
            .route("create_appointment", |b| b.insert_appointment(new))
            .await?;
        tracing::info!(
            id = %created.value.id,
            barber = %created.value.barber_id,
            source = ?created.source,
            "appointment created"
        );
        Ok(created)
    }

    /// Looks up one appointment across all barbers.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if neither backend nor fallback can serve it.
    pub async fn get_appointment(
        &self,
        id: AppointmentId,
    ) -> Result<Sourced<Option<Appointment>>, StoreError> {
        let listed = self.list_appointments(&BarberFilter::All).await?;
        Ok(listed.map(|appointments| appointments.into_iter().find(|a| a.id == id)))
    }

    /// Applies a partial update; `None` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on rejection or total unavailability.
    pub async fn update_appointment(
        &self,
        id: AppointmentId,
        patch: &AppointmentPatch,
    ) -> Result<Sourced<Option<Appointment>>, StoreError> {
        self.route("update_appointment", |b| b.update_appointment(id, patch))
            .await
    }

    /// Deletes an appointment; `false` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on rejection or total unavailability.
    pub async fn delete_appointment(&self, id: AppointmentId) -> Result<Sourced<bool>, StoreError> {
        self.route("delete_appointment", |b| b.delete_appointment(id))
            .await
    }

    // ---- barbers ----

    /// Lists the barber roster, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if neither backend nor fallback can serve it.
    pub async fn list_barbers(&self) -> Result<Sourced<Vec<Barber>>, StoreError> {
        self.route("list_barbers", |b| b.select_barbers()).await
    }

    /// Looks up one barber.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if neither backend nor fallback can serve it.
    pub async fn get_barber(&self, id: &BarberId) -> Result<Sourced<Option<Barber>>, StoreError> {
        let listed = self.list_barbers().await?;
        Ok(listed.map(|barbers| barbers.into_iter().find(|b| &b.id == id)))
    }

    /// Adds a barber; a duplicate id is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on rejection or total unavailability.
    pub async fn create_barber(&self, barber: &Barber) -> Result<Sourced<Barber>, StoreError> {
        self.route("create_barber", |b| b.insert_barber(barber))
            .await
    }

    /// Applies a partial update; `None` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on rejection or total unavailability.
    pub async fn update_barber(
        &self,
        id: &BarberId,
        patch: &BarberPatch,
    ) -> Result<Sourced<Option<Barber>>, StoreError> {
        self.route("update_barber", |b| b.update_barber(id, patch))
            .await
    }

    /// Flips a barber between active and inactive.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on rejection or total unavailability.
    pub async fn toggle_barber_status(
        &self,
        id: &BarberId,
    ) -> Result<Sourced<Option<Barber>>, StoreError> {
        let current = self.get_barber(id).await?;
        let Some(barber) = current.value else {
            return Ok(Sourced {
                value: None,
                source: current.source,
            });
        };
        let patch = BarberPatch::status(barber.status.toggled());
        let updated = self.update_barber(id, &patch).await?;
        Ok(Sourced {
            source: current.source.and(updated.source),
            value: updated.value,
        })
    }

    /// Removes a barber. Their appointments stay in the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on rejection or total unavailability.
    pub async fn delete_barber(&self, id: &BarberId) -> Result<Sourced<bool>, StoreError> {
        self.route("delete_barber", |b| b.delete_barber(id)).await
    }

    // ---- notices ----

    /// Lists every notice, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if neither backend nor fallback can serve it.
    pub async fn list_notices(&self) -> Result<Sourced<Vec<Notice>>, StoreError> {
        self.route("list_notices", |b| b.select_notices()).await
    }

    /// The notice currently broadcast, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if neither backend nor fallback can serve it.
    pub async fn active_notice(&self) -> Result<Sourced<Option<Notice>>, StoreError> {
        let listed = self.list_notices().await?;
        Ok(listed.map(|notices| notices.into_iter().find(|n| n.active)))
    }

    /// Publishes a notice, archiving the one currently active.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on rejection or total unavailability.
    pub async fn publish_notice(&self, draft: &NewNotice) -> Result<Sourced<Notice>, StoreError> {
        let archived = self
            .route("publish_notice", |b| b.deactivate_notices())
            .await?;
        let created_at = Utc::now();
        let created = self
            .route("publish_notice", |b| b.insert_notice(draft, created_at))
            .await?;
        tracing::info!(id = %created.value.id, archived = archived.value, "notice published");
        Ok(Sourced {
            source: archived.source.and(created.source),
            value: created.value,
        })
    }

    /// Makes an archived notice the active one again, archiving the
    /// current one. `None` if the id is unknown (nothing changes).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on rejection or total unavailability.
    pub async fn activate_notice(
        &self,
        id: NoticeId,
    ) -> Result<Sourced<Option<Notice>>, StoreError> {
        let listed = self.list_notices().await?;
        if !listed.value.iter().any(|n| n.id == id) {
            return Ok(listed.map(|_| None));
        }
        let archived = self
            .route("activate_notice", |b| b.deactivate_notices())
            .await?;
        let restored = self
            .route("activate_notice", |b| b.set_notice_active(id, true))
            .await?;
        Ok(Sourced {
            source: listed.source.and(archived.source).and(restored.source),
            value: restored.value,
        })
    }

    /// Archives one notice. `None` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on rejection or total unavailability.
    pub async fn deactivate_notice(
        &self,
        id: NoticeId,
    ) -> Result<Sourced<Option<Notice>>, StoreError> {
        self.route("deactivate_notice", |b| b.set_notice_active(id, false))
            .await
    }

    /// Deletes an archived notice; `false` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ActiveNotice`] if the notice is still active,
    /// or another [`StoreError`] on rejection or total unavailability.
    pub async fn delete_notice(&self, id: NoticeId) -> Result<Sourced<bool>, StoreError> {
        let listed = self.list_notices().await?;
        let active = listed.value.iter().find(|n| n.id == id).map(|n| n.active);
        match active {
            None => Ok(listed.map(|_| false)),
            Some(true) => Err(StoreError::ActiveNotice(id)),
            Some(false) => {
                let deleted = self
                    .route("delete_notice", |b| b.delete_notice(id))
                    .await?;
                Ok(Sourced {
                    source: listed.source.and(deleted.source),
                    value: deleted.value,
                })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::AppointmentStatus;
    use crate::store::testing::{Fault, TestBackend};

    fn store_over(primary: Arc<dyn Backend>, fallback: bool) -> RecordStore {
        RecordStore::new(
            Some(primary),
            fallback.then(|| MemoryBackend::with_dataset(fallback_dataset())),
            Duration::from_millis(50),
        )
    }

    #[tokio::test]
    async fn unreachable_backend_is_served_by_fallback() {
        let store = store_over(Arc::new(TestBackend::failing(Fault::Down)), true);
        let Ok(listed) = store.list_appointments(&BarberFilter::All).await else {
            panic!("fallback should serve the listing");
        };
        assert!(listed.is_fallback());
        assert_eq!(listed.value.len(), 7);
    }

    #[tokio::test]
    async fn slow_backend_times_out_into_fallback() {
        let store = store_over(Arc::new(TestBackend::failing(Fault::Slow)), true);
        let Ok(listed) = store.list_barbers().await else {
            panic!("fallback should serve the roster");
        };
        assert_eq!(listed.source, DataSource::Fallback);
        assert_eq!(listed.value.len(), 2);
    }

    #[tokio::test]
    async fn writes_to_an_unreachable_backend_land_in_the_fallback() {
        let store = store_over(Arc::new(TestBackend::failing(Fault::Down)), true);
        let new = NewAppointment {
            barber_id: BarberId::new("lele"),
            client_name: "Lucas".to_string(),
            client_phone: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 6, 28).unwrap_or_default(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
            end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap_or_default(),
            service: "Corte".to_string(),
            price: Decimal::new(30, 0),
            payment_method: "PIX".to_string(),
            status: Some(AppointmentStatus::Scheduled),
        };

        let Ok(created) = store.create_appointment(&new).await else {
            panic!("fallback should accept the booking");
        };
        assert_eq!(created.source, DataSource::Fallback);
        assert_eq!(created.value.id, AppointmentId::new(8));

        let Ok(listed) = store.list_appointments(&BarberFilter::All).await else {
            panic!("fallback should serve the listing");
        };
        assert!(listed.is_fallback());
        assert_eq!(listed.value.len(), 8);
        assert!(listed.value.iter().any(|a| a.id == AppointmentId::new(8)));

        let patch = AppointmentPatch::status(Some(AppointmentStatus::Completed));
        let Ok(updated) = store.update_appointment(AppointmentId::new(8), &patch).await else {
            panic!("fallback should apply the patch");
        };
        assert_eq!(updated.source, DataSource::Fallback);
        assert_eq!(
            updated.value.and_then(|a| a.status),
            Some(AppointmentStatus::Completed)
        );

        let Ok(deleted) = store.delete_appointment(AppointmentId::new(8)).await else {
            panic!("fallback should delete the booking");
        };
        assert!(deleted.value);
        assert!(deleted.is_fallback());

        let Ok(listed) = store.list_appointments(&BarberFilter::All).await else {
            panic!("fallback should serve the listing");
        };
        assert_eq!(listed.value.len(), 7);
    }

    #[tokio::test]
    async fn unreachable_backend_without_fallback_fails() {
        let store = store_over(Arc::new(TestBackend::failing(Fault::Down)), false);
        let result = store.list_appointments(&BarberFilter::All).await;
        assert!(matches!(
            result,
            Err(StoreError::Unavailable {
                op: "list_appointments",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn rejection_is_surfaced_not_masked() {
        let store = store_over(Arc::new(TestBackend::failing(Fault::Reject)), true);
        let result = store.delete_appointment(AppointmentId::new(1)).await;
        assert!(matches!(result, Err(StoreError::Rejected { .. })));
    }

    #[tokio::test]
    async fn healthy_backend_is_tagged_backend() {
        let store = store_over(Arc::new(TestBackend::seeded()), true);
        let Ok(listed) = store
            .list_appointments(&BarberFilter::Only(BarberId::new("renne")))
            .await
        else {
            panic!("listing failed");
        };
        assert_eq!(listed.source, DataSource::Backend);
        assert_eq!(listed.value.len(), 4);
    }

    #[tokio::test]
    async fn demo_store_reports_demo_mode() {
        let store = RecordStore::demo();
        assert_eq!(store.mode(), StoreMode::Demo);
        let Ok(listed) = store.list_notices().await else {
            panic!("listing failed");
        };
        assert!(listed.is_fallback());
    }

    #[tokio::test]
    async fn publishing_archives_the_active_notice() {
        let store = RecordStore::demo();
        let Ok(draft) = NewNotice::new(Some("Feriado"), "Fechado dia 15", None) else {
            panic!("draft rejected");
        };
        let Ok(published) = store.publish_notice(&draft).await else {
            panic!("publish failed");
        };
        let Ok(all) = store.list_notices().await else {
            panic!("listing failed");
        };
        let active: Vec<NoticeId> = all.value.iter().filter(|n| n.active).map(|n| n.id).collect();
        assert_eq!(active, vec![published.value.id]);
    }

    #[tokio::test]
    async fn restoring_a_notice_archives_the_current_one() {
        let store = RecordStore::demo();
        let Ok(draft) = NewNotice::new(None, "Promoção de inverno", None) else {
            panic!("draft rejected");
        };
        let Ok(published) = store.publish_notice(&draft).await else {
            panic!("publish failed");
        };
        let Ok(restored) = store.activate_notice(NoticeId::new(1)).await else {
            panic!("restore failed");
        };
        assert!(restored.value.is_some_and(|n| n.active));
        let Ok(active) = store.active_notice().await else {
            panic!("lookup failed");
        };
        assert_eq!(active.value.map(|n| n.id), Some(NoticeId::new(1)));
        assert_ne!(published.value.id, NoticeId::new(1));
    }

    #[tokio::test]
    async fn active_notice_cannot_be_deleted() {
        let store = RecordStore::demo();
        assert_eq!(
            store.delete_notice(NoticeId::new(1)).await,
            Err(StoreError::ActiveNotice(NoticeId::new(1)))
        );

        let Ok(_) = store.deactivate_notice(NoticeId::new(1)).await else {
            panic!("deactivate failed");
        };
        let Ok(deleted) = store.delete_notice(NoticeId::new(1)).await else {
            panic!("delete failed");
        };
        assert!(deleted.value);
    }

    #[tokio::test]
    async fn toggle_flips_barber_status() {
        let store = RecordStore::demo();
        let id = BarberId::new("lele");
        let Ok(toggled) = store.toggle_barber_status(&id).await else {
            panic!("toggle failed");
        };
        assert!(toggled.value.is_some_and(|b| !b.is_active()));

        let Ok(missing) = store.toggle_barber_status(&BarberId::new("nobody")).await else {
            panic!("toggle failed");
        };
        assert!(missing.value.is_none());
    }
}
