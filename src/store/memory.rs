//! In-memory [`Backend`] used as the fallback dataset and in tests.
//!
//! All three collections live behind a single [`tokio::sync::RwLock`].
//! Reads run concurrently; writes are serialized, which keeps id
//! assignment (`max + 1`) race-free.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::backend::{Backend, appointment_order};
use super::error::BackendError;
use super::seed::Dataset;
use crate::domain::{
    Appointment, AppointmentId, AppointmentPatch, Barber, BarberFilter, BarberId, BarberPatch,
    NewAppointment, NewNotice, Notice, NoticeId,
};

/// Process-local store. Cloning shares the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    tables: Arc<RwLock<Dataset>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend holding `dataset`.
    #[must_use]
    pub fn with_dataset(dataset: Dataset) -> Self {
        Self {
            tables: Arc::new(RwLock::new(dataset)),
        }
    }

    /// Copies out the current contents.
    pub async fn snapshot(&self) -> Dataset {
        self.tables.read().await.clone()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn select_appointments(
        &self,
        filter: &BarberFilter,
    ) -> Result<Vec<Appointment>, BackendError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Appointment> = tables
            .appointments
            .iter()
            .filter(|a| filter.matches(&a.barber_id))
            .cloned()
            .collect();
        rows.sort_by(appointment_order);
        Ok(rows)
    }

    async fn insert_appointment(
        &self,
        new: &NewAppointment,
    ) -> Result<Appointment, BackendError> {
        let mut tables = self.tables.write().await;
        let next = tables
            .appointments
            .iter()
            .map(|a| a.id.get())
            .max()
            .unwrap_or(0)
            + 1;
        let record = new.clone().into_appointment(AppointmentId::new(next));
        tables.appointments.push(record.clone());
        Ok(record)
    }

    async fn update_appointment(
        &self,
        id: AppointmentId,
        patch: &AppointmentPatch,
    ) -> Result<Option<Appointment>, BackendError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .map(|record| {
                patch.apply_to(record);
                record.clone()
            }))
    }

    async fn delete_appointment(&self, id: AppointmentId) -> Result<bool, BackendError> {
        let mut tables = self.tables.write().await;
        let before = tables.appointments.len();
        tables.appointments.retain(|a| a.id != id);
        Ok(tables.appointments.len() != before)
    }

    async fn select_barbers(&self) -> Result<Vec<Barber>, BackendError> {
        let mut rows = self.tables.read().await.barbers.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn insert_barber(&self, barber: &Barber) -> Result<Barber, BackendError> {
        let mut tables = self.tables.write().await;
        if tables.barbers.iter().any(|b| b.id == barber.id) {
            return Err(BackendError::Rejected(format!(
                "barber {} already exists",
                barber.id
            )));
        }
        tables.barbers.push(barber.clone());
        Ok(barber.clone())
    }

    async fn update_barber(
        &self,
        id: &BarberId,
        patch: &BarberPatch,
    ) -> Result<Option<Barber>, BackendError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .barbers
            .iter_mut()
            .find(|b| &b.id == id)
            .map(|record| {
                patch.apply_to(record);
                record.clone()
            }))
    }

    async fn delete_barber(&self, id: &BarberId) -> Result<bool, BackendError> {
        let mut tables = self.tables.write().await;
        let before = tables.barbers.len();
        tables.barbers.retain(|b| &b.id != id);
        Ok(tables.barbers.len() != before)
    }

    async fn select_notices(&self) -> Result<Vec<Notice>, BackendError> {
        let mut rows = self.tables.read().await.notices.clone();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(rows)
    }

    async fn insert_notice(
        &self,
        new: &NewNotice,
        created_at: DateTime<Utc>,
    ) -> Result<Notice, BackendError> {
        let mut tables = self.tables.write().await;
        let next = tables.notices.iter().map(|n| n.id.get()).max().unwrap_or(0) + 1;
        let notice = new.clone().into_notice(NoticeId::new(next), created_at);
        tables.notices.push(notice.clone());
        Ok(notice)
    }

    async fn set_notice_active(
        &self,
        id: NoticeId,
        active: bool,
    ) -> Result<Option<Notice>, BackendError> {
        let mut tables = self.tables.write().await;
        Ok(tables.notices.iter_mut().find(|n| n.id == id).map(|n| {
            n.active = active;
            n.clone()
        }))
    }

    async fn deactivate_notices(&self) -> Result<u64, BackendError> {
        let mut tables = self.tables.write().await;
        let mut changed = 0;
        for notice in tables.notices.iter_mut().filter(|n| n.active) {
            notice.active = false;
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete_notice(&self, id: NoticeId) -> Result<bool, BackendError> {
        let mut tables = self.tables.write().await;
        let before = tables.notices.len();
        tables.notices.retain(|n| n.id != id);
        Ok(tables.notices.len() != before)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::AppointmentStatus;
    use crate::store::seed::fallback_dataset;

    fn new_appointment(barber: &str) -> NewAppointment {
        NewAppointment {
            barber_id: BarberId::new(barber),
            client_name: "Lucas".to_string(),
            client_phone: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 6, 28).unwrap_or_default(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
            end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap_or_default(),
            service: "Corte".to_string(),
            price: Decimal::new(30, 0),
            payment_method: "PIX".to_string(),
            status: Some(AppointmentStatus::Scheduled),
        }
    }

    #[tokio::test]
    async fn insert_assigns_max_plus_one() {
        let backend = MemoryBackend::with_dataset(fallback_dataset());
        let Ok(created) = backend.insert_appointment(&new_appointment("lele")).await else {
            panic!("insert failed");
        };
        assert_eq!(created.id.get(), 8);

        let Ok(deleted) = backend.delete_appointment(AppointmentId::new(8)).await else {
            panic!("delete failed");
        };
        assert!(deleted);
        let Ok(again) = backend.insert_appointment(&new_appointment("lele")).await else {
            panic!("insert failed");
        };
        assert_eq!(again.id.get(), 8);
    }

    #[tokio::test]
    async fn select_filters_by_barber() {
        let backend = MemoryBackend::with_dataset(fallback_dataset());
        let filter = BarberFilter::Only(BarberId::new("lele"));
        let Ok(rows) = backend.select_appointments(&filter).await else {
            panic!("select failed");
        };
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|a| a.barber_id.as_str() == "lele"));
    }

    #[tokio::test]
    async fn update_unknown_id_returns_none() {
        let backend = MemoryBackend::new();
        let patch = AppointmentPatch::status(Some(AppointmentStatus::Completed));
        let Ok(updated) = backend.update_appointment(AppointmentId::new(99), &patch).await else {
            panic!("update failed");
        };
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn duplicate_barber_is_rejected() {
        let backend = MemoryBackend::with_dataset(fallback_dataset());
        let Some(lele) = fallback_dataset().barbers.into_iter().next() else {
            panic!("seed has no barbers");
        };
        let result = backend.insert_barber(&lele).await;
        assert!(matches!(result, Err(BackendError::Rejected(_))));
    }

    #[tokio::test]
    async fn notices_come_newest_first() {
        let backend = MemoryBackend::with_dataset(fallback_dataset());
        let Ok(draft) = NewNotice::new(None, "Fechado amanhã", None) else {
            panic!("draft rejected");
        };
        let Ok(created) = backend.insert_notice(&draft, Utc::now()).await else {
            panic!("insert failed");
        };
        let Ok(rows) = backend.select_notices().await else {
            panic!("select failed");
        };
        assert_eq!(rows.first().map(|n| n.id), Some(created.id));
    }
}
