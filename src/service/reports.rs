//! Period reports: bookings per barber per month, revenue, status mix,
//! and busy hours.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use crate::domain::{Appointment, AppointmentStatus, BarberFilter, BarberId, YearMonth, wire};
use crate::store::{RecordStore, Sourced, StoreError};

/// First and last hour bucket of the busy-hours chart.
pub const HOUR_RANGE: std::ops::RangeInclusive<u32> = 8..=19;

/// Reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    /// Current month.
    #[default]
    Month,
    /// Current calendar quarter; charts span the last three months.
    Quarter,
    /// Current year; charts span the last twelve months.
    Year,
}

impl ReportPeriod {
    /// First date included in the report.
    #[must_use]
    pub fn start(self, today: NaiveDate) -> NaiveDate {
        let (year, month) = match self {
            Self::Month => (today.year(), today.month()),
            Self::Quarter => (today.year(), (today.month0() / 3) * 3 + 1),
            Self::Year => (today.year(), 1),
        };
        NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(today)
    }

    /// Months shown on the per-month charts, oldest first.
    #[must_use]
    pub fn months(self, today: NaiveDate) -> Vec<YearMonth> {
        let span: i32 = match self {
            Self::Month => 1,
            Self::Quarter => 3,
            Self::Year => 12,
        };
        let current = YearMonth::of(today);
        (0..span).rev().map(|back| current.shifted(-back)).collect()
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        })
    }
}

impl FromStr for ReportPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "month" | "mes" | "mês" => Ok(Self::Month),
            "quarter" | "trimestre" => Ok(Self::Quarter),
            "year" | "ano" => Ok(Self::Year),
            other => Err(format!("unknown report period: {other}")),
        }
    }
}

/// Bookings in one month, per barber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBookings {
    /// The month.
    pub month: YearMonth,
    /// Count per barber id.
    pub by_barber: BTreeMap<BarberId, usize>,
}

/// Completed revenue in one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyRevenue {
    /// The month.
    pub month: YearMonth,
    /// Sum of Completed prices.
    #[serde(with = "wire::price")]
    pub revenue: Decimal,
}

/// How many appointments sit in each status. Unset counts as scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatusBreakdown {
    /// Scheduled or unset.
    pub scheduled: usize,
    /// Completed.
    pub completed: usize,
    /// Cancelled.
    pub cancelled: usize,
}

/// Bookings starting in one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourBucket {
    /// Hour of day, 0–23.
    pub hour: u32,
    /// Appointments starting within that hour.
    pub appointments: usize,
}

/// A full report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Window.
    pub period: ReportPeriod,
    /// Barber scope.
    pub barber: BarberFilter,
    /// First date included.
    pub from: NaiveDate,
    /// Appointments in scope.
    pub total: usize,
    /// Bookings per month per barber.
    pub bookings: Vec<MonthlyBookings>,
    /// Completed revenue per month.
    pub revenue: Vec<MonthlyRevenue>,
    /// Status mix.
    pub status: StatusBreakdown,
    /// Busy hours, 08:00 to 19:00.
    pub hours: Vec<HourBucket>,
}

/// Builds a report over `appointments` for the window ending `today`.
#[must_use]
pub fn compute(
    appointments: &[Appointment],
    period: ReportPeriod,
    barber: &BarberFilter,
    today: NaiveDate,
) -> Report {
    let from = period.start(today);
    let in_scope: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| barber.matches(&a.barber_id) && a.date.is_some_and(|d| d >= from))
        .collect();

    let months = period.months(today);
    let in_month = |a: &&&Appointment, month: YearMonth| a.date.is_some_and(|d| month.contains(d));

    let bookings = months
        .iter()
        .map(|&month| {
            let mut by_barber = BTreeMap::new();
            for a in in_scope.iter().filter(|a| in_month(a, month)) {
                *by_barber.entry(a.barber_id.clone()).or_insert(0) += 1;
            }
            MonthlyBookings { month, by_barber }
        })
        .collect();

    let revenue = months
        .iter()
        .map(|&month| MonthlyRevenue {
            month,
            revenue: in_scope
                .iter()
                .filter(|a| a.is_completed() && in_month(a, month))
                .map(|a| a.price)
                .sum(),
        })
        .collect();

    let mut status = StatusBreakdown::default();
    for a in &in_scope {
        match a.effective_status() {
            AppointmentStatus::Scheduled => status.scheduled += 1,
            AppointmentStatus::Completed => status.completed += 1,
            AppointmentStatus::Cancelled => status.cancelled += 1,
        }
    }

    let hours = HOUR_RANGE
        .map(|hour| HourBucket {
            hour,
            appointments: in_scope
                .iter()
                .filter(|a| a.start_time.is_some_and(|t| chrono::Timelike::hour(&t) == hour))
                .count(),
        })
        .collect();

    Report {
        period,
        barber: barber.clone(),
        from,
        total: in_scope.len(),
        bookings,
        revenue,
        status,
        hours,
    }
}

/// Loads the appointment set for `barber` and builds the report.
///
/// # Errors
///
/// Returns [`StoreError`] if the appointment set cannot be loaded.
pub async fn load(
    store: &RecordStore,
    clock: &dyn Clock,
    period: ReportPeriod,
    barber: &BarberFilter,
) -> Result<Sourced<Report>, StoreError> {
    let appointments = store.list_appointments(barber).await?;
    let today = clock.today();
    Ok(appointments.map(|list| compute(&list, period, barber, today)))
}
