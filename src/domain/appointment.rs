//! Appointment records, the edit form and partial updates.
//!
//! An [`Appointment`] is what the store holds. Staff never build one
//! directly: they fill an [`AppointmentForm`], which validates into a
//! [`NewAppointment`] (create) or an [`AppointmentPatch`] (edit).

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ids::{AppointmentId, BarberFilter, BarberId};
use super::wire;

/// Payment methods offered in the booking form. Free text is accepted.
pub const SUGGESTED_PAYMENT_METHODS: [&str; 3] = ["Dinheiro", "Cartão", "PIX"];

/// Lifecycle marker of an appointment.
///
/// The field holding it is an `Option`: `None` is the Unset state, which
/// orders and displays like [`AppointmentStatus::Scheduled`] but is kept
/// distinct on round-trips. Any status may change to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    /// Booked, not yet served.
    Scheduled,
    /// Served.
    Completed,
    /// Called off.
    Cancelled,
}

impl AppointmentStatus {
    /// Canonical wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Resolves an optional status, treating Unset as Scheduled.
    #[must_use]
    pub fn effective(status: Option<Self>) -> Self {
        status.unwrap_or(Self::Scheduled)
    }

    /// Parses an optional status; blank text is Unset.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownStatus`] for unrecognized values.
    pub fn parse_optional(raw: &str) -> Result<Option<Self>, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" | "agendado" | "confirmado" | "confirmed" => Ok(Self::Scheduled),
            "completed" | "realizado" | "done" => Ok(Self::Completed),
            "cancelled" | "canceled" | "cancelado" => Ok(Self::Cancelled),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

impl Serialize for AppointmentStatus {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AppointmentStatus {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// `Option<AppointmentStatus>` where `null` and `""` are Unset.
mod opt_status {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<AppointmentStatus>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw {
            None => Ok(None),
            Some(text) => {
                AppointmentStatus::parse_optional(&text).map_err(serde::de::Error::custom)
            }
        }
    }

    /// Tri-state for patches: only invoked when the field is present, so
    /// `null` means "clear" and a missing field stays `None`.
    pub fn deserialize_patch<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Option<AppointmentStatus>>, D::Error> {
        deserialize(d).map(Some)
    }
}

/// A booking held by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    /// Store-assigned identifier.
    pub id: AppointmentId,
    /// Owning barber (partition key).
    pub barber_id: BarberId,
    /// Client's name.
    #[serde(default)]
    pub client_name: String,
    /// Client's phone, free text.
    #[serde(default)]
    pub client_phone: String,
    /// Calendar date; required for grid placement.
    #[serde(default, with = "wire::opt_date")]
    pub date: Option<NaiveDate>,
    /// Start of the slot.
    #[serde(default, with = "wire::opt_time")]
    pub start_time: Option<NaiveTime>,
    /// End of the slot.
    #[serde(default, with = "wire::opt_time")]
    pub end_time: Option<NaiveTime>,
    /// Service description (e.g. "Corte + Barba").
    #[serde(default)]
    pub service: String,
    /// Non-negative price; zero when absent.
    #[serde(default, with = "wire::price")]
    pub price: Decimal,
    /// Payment method, free text.
    #[serde(default)]
    pub payment_method: String,
    /// Lifecycle status; `None` is Unset.
    #[serde(default, deserialize_with = "opt_status::deserialize")]
    pub status: Option<AppointmentStatus>,
}

impl Appointment {
    /// Status with Unset resolved to Scheduled.
    #[must_use]
    pub fn effective_status(&self) -> AppointmentStatus {
        AppointmentStatus::effective(self.status)
    }

    /// Returns `true` if the appointment has been served.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == Some(AppointmentStatus::Completed)
    }

    /// Returns `true` if the appointment was called off.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status == Some(AppointmentStatus::Cancelled)
    }

    /// Start time used for ordering; a missing start sorts as `00:00`.
    #[must_use]
    pub fn sort_time(&self) -> NaiveTime {
        self.start_time.unwrap_or(NaiveTime::MIN)
    }
}

impl AsRef<Self> for Appointment {
    fn as_ref(&self) -> &Self {
        self
    }
}

/// A validated appointment ready to be inserted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAppointment {
    /// Owning barber.
    pub barber_id: BarberId,
    /// Client's name (non-empty).
    pub client_name: String,
    /// Client's phone.
    pub client_phone: String,
    /// Calendar date.
    #[serde(serialize_with = "serialize_date")]
    pub date: NaiveDate,
    /// Start of the slot.
    #[serde(with = "wire::time")]
    pub start_time: NaiveTime,
    /// End of the slot.
    #[serde(with = "wire::time")]
    pub end_time: NaiveTime,
    /// Service description.
    pub service: String,
    /// Non-negative price.
    #[serde(with = "wire::price")]
    pub price: Decimal,
    /// Payment method.
    pub payment_method: String,
    /// Initial status; Scheduled unless the form says otherwise.
    pub status: Option<AppointmentStatus>,
}

fn serialize_date<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&wire::format_date(*date))
}

impl NewAppointment {
    /// Materializes the record once the store has assigned an id.
    #[must_use]
    pub fn into_appointment(self, id: AppointmentId) -> Appointment {
        Appointment {
            id,
            barber_id: self.barber_id,
            client_name: self.client_name,
            client_phone: self.client_phone,
            date: Some(self.date),
            start_time: Some(self.start_time),
            end_time: Some(self.end_time),
            service: self.service,
            price: self.price,
            payment_method: self.payment_method,
            status: self.status,
        }
    }
}

/// Partial update: only `Some` fields change.
///
/// `status` is tri-state: `None` leaves it alone, `Some(None)` clears it
/// to Unset, `Some(Some(s))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppointmentPatch {
    /// Move the appointment to another barber.
    #[serde(default)]
    pub barber_id: Option<BarberId>,
    /// New client name.
    #[serde(default)]
    pub client_name: Option<String>,
    /// New client phone.
    #[serde(default)]
    pub client_phone: Option<String>,
    /// New date.
    #[serde(default, with = "wire::opt_date")]
    pub date: Option<NaiveDate>,
    /// New start time.
    #[serde(default, with = "wire::opt_time")]
    pub start_time: Option<NaiveTime>,
    /// New end time.
    #[serde(default, with = "wire::opt_time")]
    pub end_time: Option<NaiveTime>,
    /// New service description.
    #[serde(default)]
    pub service: Option<String>,
    /// New price.
    #[serde(default)]
    pub price: Option<Decimal>,
    /// New payment method.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Status change (see type docs).
    #[serde(default, deserialize_with = "opt_status::deserialize_patch")]
    pub status: Option<Option<AppointmentStatus>>,
}

impl AppointmentPatch {
    /// Patch that only changes the status.
    #[must_use]
    pub fn status(status: Option<AppointmentStatus>) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the supplied fields to `target`, leaving the rest intact.
    /// The id is never touched.
    pub fn apply_to(&self, target: &mut Appointment) {
        if let Some(barber) = &self.barber_id {
            target.barber_id = barber.clone();
        }
        if let Some(name) = &self.client_name {
            target.client_name.clone_from(name);
        }
        if let Some(phone) = &self.client_phone {
            target.client_phone.clone_from(phone);
        }
        if let Some(date) = self.date {
            target.date = Some(date);
        }
        if let Some(start) = self.start_time {
            target.start_time = Some(start);
        }
        if let Some(end) = self.end_time {
            target.end_time = Some(end);
        }
        if let Some(service) = &self.service {
            target.service.clone_from(service);
        }
        if let Some(price) = self.price {
            target.price = price.max(Decimal::ZERO);
        }
        if let Some(method) = &self.payment_method {
            target.payment_method.clone_from(method);
        }
        if let Some(status) = self.status {
            target.status = status;
        }
    }

    /// Returns `true` if the patch moves either end of the slot.
    #[must_use]
    pub const fn touches_slot(&self) -> bool {
        self.start_time.is_some() || self.end_time.is_some()
    }

    /// Checks the slot `current` would have once this patch is applied.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EndBeforeStart`] if the merged end time
    /// falls before the merged start time.
    pub fn check_against(&self, current: &Appointment) -> Result<(), ValidationError> {
        let start = self.start_time.or(current.start_time);
        let end = self.end_time.or(current.end_time);
        match (start, end) {
            (Some(start), Some(end)) if end < start => Err(ValidationError::EndBeforeStart),
            _ => Ok(()),
        }
    }
}

/// Rejection of user-entered appointment data, raised before any I/O.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was left blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The date is not `YYYY-MM-DD`.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// A time is not `HH:MM`.
    #[error("invalid {field}: {value}")]
    InvalidTime {
        /// Which field.
        field: &'static str,
        /// Offending text.
        value: String,
    },

    /// The slot ends before it starts.
    #[error("end time must not be before start time")]
    EndBeforeStart,

    /// Status text is not one of the known values.
    #[error("unknown status: {0}")]
    UnknownStatus(String),
}

/// The booking form as typed by staff. Every field is raw text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentForm {
    /// Selected barber; optional when the view is already scoped to one.
    #[serde(default)]
    pub barber_id: Option<String>,
    /// Client's name.
    #[serde(default)]
    pub client_name: String,
    /// Client's phone.
    #[serde(default)]
    pub client_phone: String,
    /// Date text (`YYYY-MM-DD`).
    #[serde(default)]
    pub date: String,
    /// Start time text (`HH:MM`).
    #[serde(default)]
    pub start_time: String,
    /// End time text (`HH:MM`).
    #[serde(default)]
    pub end_time: String,
    /// Service description.
    #[serde(default)]
    pub service: String,
    /// Price; numbers or numeric strings, anything else reads as zero.
    #[serde(default, with = "wire::price")]
    pub price: Decimal,
    /// Payment method.
    #[serde(default)]
    pub payment_method: String,
    /// Status text; blank clears it on edit and means Scheduled on create.
    #[serde(default)]
    pub status: Option<String>,
}

/// Date and slot bounds common to create and edit.
struct Slot {
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
}

impl AppointmentForm {
    /// Validates the form for creation.
    ///
    /// The barber comes from the form, or from `filter` when the view is
    /// scoped to one barber; creating from the "all" view without picking
    /// a barber is rejected.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate_new(&self, filter: &BarberFilter) -> Result<NewAppointment, ValidationError> {
        let barber_id = self
            .selected_barber()
            .or_else(|| filter.barber().cloned())
            .ok_or(ValidationError::MissingField("barber"))?;
        let client_name = required(&self.client_name, "client name")?;
        let slot = self.slot()?;
        let status = match self.status.as_deref() {
            Some(raw) => AppointmentStatus::parse_optional(raw)?,
            None => None,
        }
        .or(Some(AppointmentStatus::Scheduled));

        Ok(NewAppointment {
            barber_id,
            client_name,
            client_phone: self.client_phone.trim().to_string(),
            date: slot.date,
            start_time: slot.start,
            end_time: slot.end,
            service: self.service.trim().to_string(),
            price: self.price.max(Decimal::ZERO),
            payment_method: self.payment_method.trim().to_string(),
            status,
        })
    }

    /// Validates the form for editing an existing appointment and turns
    /// it into a patch covering every editable field.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate_edit(&self) -> Result<AppointmentPatch, ValidationError> {
        let client_name = required(&self.client_name, "client name")?;
        let slot = self.slot()?;
        let status = match self.status.as_deref() {
            Some(raw) => Some(AppointmentStatus::parse_optional(raw)?),
            None => Some(None),
        };

        Ok(AppointmentPatch {
            barber_id: self.selected_barber(),
            client_name: Some(client_name),
            client_phone: Some(self.client_phone.trim().to_string()),
            date: Some(slot.date),
            start_time: Some(slot.start),
            end_time: Some(slot.end),
            service: Some(self.service.trim().to_string()),
            price: Some(self.price.max(Decimal::ZERO)),
            payment_method: Some(self.payment_method.trim().to_string()),
            status,
        })
    }

    fn selected_barber(&self) -> Option<BarberId> {
        self.barber_id
            .as_deref()
            .map(BarberId::new)
            .filter(|id| !id.is_empty())
    }

    fn slot(&self) -> Result<Slot, ValidationError> {
        let date_text = required(&self.date, "date")?;
        let start_text = required(&self.start_time, "start time")?;
        let end_text = required(&self.end_time, "end time")?;

        let date = wire::parse_date(&date_text).ok_or(ValidationError::InvalidDate(date_text))?;
        let start = wire::parse_time(&start_text).ok_or(ValidationError::InvalidTime {
            field: "start time",
            value: start_text,
        })?;
        let end = wire::parse_time(&end_text).ok_or(ValidationError::InvalidTime {
            field: "end time",
            value: end_text,
        })?;
        if end < start {
            return Err(ValidationError::EndBeforeStart);
        }
        Ok(Slot { date, start, end })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}
