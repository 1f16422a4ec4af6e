//! Database row models for appointments, barbers, and notices.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;

use crate::domain::{
    Appointment, AppointmentId, AppointmentStatus, Barber, BarberId, BarberStatus, DaySchedule,
    Notice, NoticeId, Weekday,
};

/// Column list shared by every appointment query.
pub const APPOINTMENT_COLUMNS: &str = "id, barber_id, client_name, client_phone, date, \
     start_time, end_time, service, price, payment_method, status";

/// Column list shared by every barber query.
pub const BARBER_COLUMNS: &str = "id, name, email, phone, status, theme_color, start_time, \
     end_time, available_days, custom_schedule, specialties, commission_percent";

/// Column list shared by every notice query.
pub const NOTICE_COLUMNS: &str = "id, title, message, active, created_at, created_by";

/// A row from the `appointments` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppointmentRow {
    /// Serial id.
    pub id: i64,
    /// Owning barber slug.
    pub barber_id: String,
    /// Client's name.
    pub client_name: String,
    /// Client's phone.
    pub client_phone: String,
    /// Calendar date.
    pub date: Option<NaiveDate>,
    /// Slot start.
    pub start_time: Option<NaiveTime>,
    /// Slot end.
    pub end_time: Option<NaiveTime>,
    /// Service description.
    pub service: String,
    /// Price, `NUMERIC(10,2)`.
    pub price: Decimal,
    /// Payment method.
    pub payment_method: String,
    /// Status text; `NULL` is Unset.
    pub status: Option<String>,
}

impl From<AppointmentRow> for Appointment {
    fn from(row: AppointmentRow) -> Self {
        let status = match row.status.as_deref() {
            Some(raw) => AppointmentStatus::parse_optional(raw).unwrap_or_else(|err| {
                tracing::warn!(
                    id = row.id,
                    error = %err,
                    "unrecognized appointment status, treating as unset"
                );
                None
            }),
            None => None,
        };
        Self {
            id: AppointmentId::new(row.id),
            barber_id: BarberId::new(&row.barber_id),
            client_name: row.client_name,
            client_phone: row.client_phone,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            service: row.service,
            price: row.price.max(Decimal::ZERO),
            payment_method: row.payment_method,
            status,
        }
    }
}

/// A row from the `barbers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BarberRow {
    /// Slug id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Phone.
    pub phone: String,
    /// `active` or `inactive`.
    pub status: String,
    /// CSS color.
    pub theme_color: Option<String>,
    /// Default opening time.
    pub start_time: Option<NaiveTime>,
    /// Default closing time.
    pub end_time: Option<NaiveTime>,
    /// JSONB array of weekday names.
    pub available_days: Json<Vec<Weekday>>,
    /// JSONB object keyed by weekday.
    pub custom_schedule: Option<Json<BTreeMap<Weekday, DaySchedule>>>,
    /// JSONB array of strings.
    pub specialties: Json<Vec<String>>,
    /// 0–100.
    pub commission_percent: i16,
}

/// Reads a stored barber status; anything but an inactive marker is active.
#[must_use]
pub fn barber_status(raw: &str) -> BarberStatus {
    match raw.trim().to_lowercase().as_str() {
        "inactive" | "inativo" => BarberStatus::Inactive,
        _ => BarberStatus::Active,
    }
}

impl From<BarberRow> for Barber {
    fn from(row: BarberRow) -> Self {
        Self {
            id: BarberId::new(&row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            status: barber_status(&row.status),
            theme_color: row.theme_color,
            start_time: row.start_time,
            end_time: row.end_time,
            available_days: row.available_days.0,
            custom_schedule: row.custom_schedule.map(|json| json.0),
            specialties: row.specialties.0,
            commission_percent: u8::try_from(row.commission_percent.clamp(0, 100)).unwrap_or(0),
        }
    }
}

/// A row from the `notices` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NoticeRow {
    /// Serial id.
    pub id: i64,
    /// Heading.
    pub title: String,
    /// Body.
    pub message: String,
    /// Whether it is broadcast.
    pub active: bool,
    /// Publication time.
    pub created_at: DateTime<Utc>,
    /// Publisher.
    pub created_by: String,
}

impl From<NoticeRow> for Notice {
    fn from(row: NoticeRow) -> Self {
        Self {
            id: NoticeId::new(row.id),
            title: row.title,
            message: row.message,
            active: row.active,
            created_at: row.created_at,
            created_by: row.created_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_text_reads_as_unset() {
        let row = AppointmentRow {
            id: 9,
            barber_id: "Renne".to_string(),
            client_name: "Ana".to_string(),
            client_phone: String::new(),
            date: None,
            start_time: None,
            end_time: None,
            service: String::new(),
            price: Decimal::new(-5, 0),
            payment_method: String::new(),
            status: Some("pendente".to_string()),
        };
        let appt = Appointment::from(row);
        assert_eq!(appt.status, None);
        assert_eq!(appt.price, Decimal::ZERO);
        assert_eq!(appt.barber_id.as_str(), "renne");
    }

    #[test]
    fn stored_barber_status_accepts_legacy_values() {
        assert_eq!(barber_status("inativo"), BarberStatus::Inactive);
        assert_eq!(barber_status("ativo"), BarberStatus::Active);
        assert_eq!(barber_status(""), BarberStatus::Active);
    }
}
