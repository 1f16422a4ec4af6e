//! PostgreSQL implementation of the storage backend.
//!
//! Appointments for every barber live in one `appointments` table,
//! partitioned logically by the `barber_id` column. Schema lives in
//! `migrations/`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use super::backend::Backend;
use super::error::BackendError;
use super::models::{
    APPOINTMENT_COLUMNS, AppointmentRow, BARBER_COLUMNS, BarberRow, NOTICE_COLUMNS, NoticeRow,
};
use crate::domain::{
    Appointment, AppointmentId, AppointmentPatch, Barber, BarberFilter, BarberId, BarberPatch,
    NewAppointment, NewNotice, Notice, NoticeId,
};

/// PostgreSQL-backed storage using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    /// Creates a backend over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unavailable`] if the database cannot be
    /// reached or a migration fails.
    pub async fn migrate(&self) -> Result<(), BackendError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| BackendError::Unavailable(format!("migration failed: {e}")))
    }
}

#[async_trait]
impl Backend for PostgresBackend {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn select_appointments(
        &self,
        filter: &BarberFilter,
    ) -> Result<Vec<Appointment>, BackendError> {
        let sql = format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments \
             WHERE ($1::text IS NULL OR barber_id = $1) \
             ORDER BY date ASC NULLS LAST, start_time ASC NULLS FIRST, id ASC"
        );
        let rows = sqlx::query_as::<_, AppointmentRow>(&sql)
            .bind(filter.barber().map(BarberId::as_str))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    async fn insert_appointment(
        &self,
        new: &NewAppointment,
    ) -> Result<Appointment, BackendError> {
        let sql = format!(
            "INSERT INTO appointments (barber_id, client_name, client_phone, date, start_time, \
             end_time, service, price, payment_method, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {APPOINTMENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AppointmentRow>(&sql)
            .bind(new.barber_id.as_str())
            .bind(&new.client_name)
            .bind(&new.client_phone)
            .bind(new.date)
            .bind(new.start_time)
            .bind(new.end_time)
            .bind(&new.service)
            .bind(new.price)
            .bind(&new.payment_method)
            .bind(new.status.map(|s| s.as_str()))
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn update_appointment(
        &self,
        id: AppointmentId,
        patch: &AppointmentPatch,
    ) -> Result<Option<Appointment>, BackendError> {
        let sql = format!(
            "UPDATE appointments SET \
             barber_id = COALESCE($2, barber_id), \
             client_name = COALESCE($3, client_name), \
             client_phone = COALESCE($4, client_phone), \
             date = COALESCE($5, date), \
             start_time = COALESCE($6, start_time), \
             end_time = COALESCE($7, end_time), \
             service = COALESCE($8, service), \
             price = COALESCE($9, price), \
             payment_method = COALESCE($10, payment_method), \
             status = CASE WHEN $11 THEN $12 ELSE status END \
             WHERE id = $1 RETURNING {APPOINTMENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AppointmentRow>(&sql)
            .bind(id.get())
            .bind(patch.barber_id.as_ref().map(BarberId::as_str))
            .bind(patch.client_name.as_deref())
            .bind(patch.client_phone.as_deref())
            .bind(patch.date)
            .bind(patch.start_time)
            .bind(patch.end_time)
            .bind(patch.service.as_deref())
            .bind(patch.price.map(|p| p.max(Decimal::ZERO)))
            .bind(patch.payment_method.as_deref())
            .bind(patch.status.is_some())
            .bind(patch.status.flatten().map(|s| s.as_str()))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Appointment::from))
    }

    async fn delete_appointment(&self, id: AppointmentId) -> Result<bool, BackendError> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn select_barbers(&self) -> Result<Vec<Barber>, BackendError> {
        let sql = format!("SELECT {BARBER_COLUMNS} FROM barbers ORDER BY name ASC, id ASC");
        let rows = sqlx::query_as::<_, BarberRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Barber::from).collect())
    }

    async fn insert_barber(&self, barber: &Barber) -> Result<Barber, BackendError> {
        let sql = format!(
            "INSERT INTO barbers (id, name, email, phone, status, theme_color, start_time, \
             end_time, available_days, custom_schedule, specialties, commission_percent) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING {BARBER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, BarberRow>(&sql)
            .bind(barber.id.as_str())
            .bind(&barber.name)
            .bind(&barber.email)
            .bind(&barber.phone)
            .bind(barber.status.as_str())
            .bind(barber.theme_color.as_deref())
            .bind(barber.start_time)
            .bind(barber.end_time)
            .bind(Json(&barber.available_days))
            .bind(barber.custom_schedule.as_ref().map(Json))
            .bind(Json(&barber.specialties))
            .bind(i16::from(barber.commission_percent.min(100)))
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn update_barber(
        &self,
        id: &BarberId,
        patch: &BarberPatch,
    ) -> Result<Option<Barber>, BackendError> {
        let sql = format!(
            "UPDATE barbers SET \
             name = COALESCE($2, name), \
             email = COALESCE($3, email), \
             phone = COALESCE($4, phone), \
             status = COALESCE($5, status), \
             theme_color = COALESCE($6, theme_color), \
             start_time = COALESCE($7, start_time), \
             end_time = COALESCE($8, end_time), \
             available_days = COALESCE($9, available_days), \
             custom_schedule = COALESCE($10, custom_schedule), \
             specialties = COALESCE($11, specialties), \
             commission_percent = COALESCE($12, commission_percent) \
             WHERE id = $1 RETURNING {BARBER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, BarberRow>(&sql)
            .bind(id.as_str())
            .bind(patch.name.as_deref())
            .bind(patch.email.as_deref())
            .bind(patch.phone.as_deref())
            .bind(patch.status.map(|s| s.as_str()))
            .bind(patch.theme_color.as_deref())
            .bind(patch.start_time)
            .bind(patch.end_time)
            .bind(patch.available_days.as_ref().map(Json))
            .bind(patch.custom_schedule.as_ref().map(Json))
            .bind(patch.specialties.as_ref().map(Json))
            .bind(patch.commission_percent.map(|c| i16::from(c.min(100))))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Barber::from))
    }

    async fn delete_barber(&self, id: &BarberId) -> Result<bool, BackendError> {
        let result = sqlx::query("DELETE FROM barbers WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn select_notices(&self) -> Result<Vec<Notice>, BackendError> {
        let sql = format!("SELECT {NOTICE_COLUMNS} FROM notices ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, NoticeRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Notice::from).collect())
    }

    async fn insert_notice(
        &self,
        new: &NewNotice,
        created_at: DateTime<Utc>,
    ) -> Result<Notice, BackendError> {
        let sql = format!(
            "INSERT INTO notices (title, message, active, created_at, created_by) \
             VALUES ($1, $2, TRUE, $3, $4) RETURNING {NOTICE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, NoticeRow>(&sql)
            .bind(&new.title)
            .bind(&new.message)
            .bind(created_at)
            .bind(&new.created_by)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn set_notice_active(
        &self,
        id: NoticeId,
        active: bool,
    ) -> Result<Option<Notice>, BackendError> {
        let sql =
            format!("UPDATE notices SET active = $2 WHERE id = $1 RETURNING {NOTICE_COLUMNS}");
        let row = sqlx::query_as::<_, NoticeRow>(&sql)
            .bind(id.get())
            .bind(active)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Notice::from))
    }

    async fn deactivate_notices(&self) -> Result<u64, BackendError> {
        let result = sqlx::query("UPDATE notices SET active = FALSE WHERE active")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_notice(&self, id: NoticeId) -> Result<bool, BackendError> {
        let result = sqlx::query("DELETE FROM notices WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
