//! The storage seam shared by the PostgreSQL backend and the in-memory
//! fallback dataset.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::BackendError;
use crate::domain::{
    Appointment, AppointmentId, AppointmentPatch, Barber, BarberFilter, BarberId, BarberPatch,
    NewAppointment, NewNotice, Notice, NoticeId,
};

/// Typed CRUD over the three collections.
///
/// Listing contracts every implementation honors:
///
/// - appointments come ordered by date, then start time (dateless last,
///   a missing start first within its date);
/// - barbers come ordered by name;
/// - notices come newest first.
///
/// Updates and deletes return `None`/`false` when the id is unknown.
#[async_trait]
pub trait Backend: Send + Sync + std::fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Lists appointments visible under `filter`.
    async fn select_appointments(
        &self,
        filter: &BarberFilter,
    ) -> Result<Vec<Appointment>, BackendError>;

    /// Inserts an appointment and returns it with its assigned id.
    async fn insert_appointment(&self, new: &NewAppointment)
    -> Result<Appointment, BackendError>;

    /// Applies `patch` to the appointment with `id`.
    async fn update_appointment(
        &self,
        id: AppointmentId,
        patch: &AppointmentPatch,
    ) -> Result<Option<Appointment>, BackendError>;

    /// Deletes the appointment with `id`.
    async fn delete_appointment(&self, id: AppointmentId) -> Result<bool, BackendError>;

    /// Lists every barber.
    async fn select_barbers(&self) -> Result<Vec<Barber>, BackendError>;

    /// Inserts a barber; a duplicate id is rejected.
    async fn insert_barber(&self, barber: &Barber) -> Result<Barber, BackendError>;

    /// Applies `patch` to the barber with `id`.
    async fn update_barber(
        &self,
        id: &BarberId,
        patch: &BarberPatch,
    ) -> Result<Option<Barber>, BackendError>;

    /// Deletes the barber with `id`. Their appointments are kept.
    async fn delete_barber(&self, id: &BarberId) -> Result<bool, BackendError>;

    /// Lists every notice, newest first.
    async fn select_notices(&self) -> Result<Vec<Notice>, BackendError>;

    /// Inserts a notice as active.
    async fn insert_notice(
        &self,
        new: &NewNotice,
        created_at: DateTime<Utc>,
    ) -> Result<Notice, BackendError>;

    /// Sets the active flag of one notice.
    async fn set_notice_active(
        &self,
        id: NoticeId,
        active: bool,
    ) -> Result<Option<Notice>, BackendError>;

    /// Clears the active flag of every notice; returns how many changed.
    async fn deactivate_notices(&self) -> Result<u64, BackendError>;

    /// Deletes the notice with `id`.
    async fn delete_notice(&self, id: NoticeId) -> Result<bool, BackendError>;
}

/// Listing order for appointments: by date (dateless last), then start
/// time (missing first), then id.
#[must_use]
pub fn appointment_order(a: &Appointment, b: &Appointment) -> Ordering {
    let by_date = match (a.date, b.date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date
        .then_with(|| a.sort_time().cmp(&b.sort_time()))
        .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;

    use super::*;

    fn appt(id: i64, date: Option<(u32, u32)>, start: Option<u32>) -> Appointment {
        Appointment {
            id: AppointmentId::new(id),
            barber_id: BarberId::new("renne"),
            client_name: format!("client {id}"),
            client_phone: String::new(),
            date: date.and_then(|(m, d)| NaiveDate::from_ymd_opt(2025, m, d)),
            start_time: start.and_then(|h| NaiveTime::from_hms_opt(h, 0, 0)),
            end_time: None,
            service: String::new(),
            price: Decimal::ZERO,
            payment_method: String::new(),
            status: None,
        }
    }

    #[test]
    fn orders_by_date_then_time_with_dateless_last() {
        let mut list = vec![
            appt(1, None, Some(8)),
            appt(2, Some((6, 27)), Some(9)),
            appt(3, Some((6, 26)), Some(14)),
            appt(4, Some((6, 26)), None),
            appt(5, Some((6, 26)), Some(9)),
        ];
        list.sort_by(appointment_order);
        let ids: Vec<i64> = list.iter().map(|a| a.id.get()).collect();
        assert_eq!(ids, vec![4, 5, 3, 2, 1]);
    }
}
