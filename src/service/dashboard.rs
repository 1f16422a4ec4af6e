//! Dashboard metrics: today's load, the week, and the month's takings.

use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use super::clock::Clock;
use crate::domain::{
    Appointment, AppointmentStatus, Barber, BarberFilter, BarberId, YearMonth, wire,
};
use crate::store::backend::appointment_order;
use crate::store::{RecordStore, Sourced, StoreError};

/// How many upcoming appointments the dashboard lists.
pub const UPCOMING_LIMIT: usize = 5;

/// One barber's day at a glance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarberDay {
    /// Barber id.
    pub barber_id: BarberId,
    /// Display name.
    pub name: String,
    /// Theme color.
    pub theme_color: String,
    /// Completed appointments today.
    pub completed: usize,
    /// Non-cancelled appointments today.
    pub total: usize,
    /// First still-scheduled appointment today, if any.
    pub next: Option<Appointment>,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    /// Date the metrics were computed for.
    pub today: NaiveDate,
    /// Appointments dated today.
    pub appointments_today: usize,
    /// Appointments in the current Monday–Sunday week.
    pub appointments_week: usize,
    /// Sum of Completed prices this month.
    #[serde(with = "wire::price")]
    pub revenue_month: Decimal,
    /// Distinct client names (case-insensitive) served this month.
    pub clients_month: usize,
    /// Next non-cancelled appointments, soonest first.
    pub upcoming: Vec<Appointment>,
    /// Per-barber status for today, in roster order.
    pub barbers: Vec<BarberDay>,
}

/// Monday and Sunday of the week containing `date`.
#[must_use]
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let from_monday = u64::from(date.weekday().num_days_from_monday());
    let monday = date.checked_sub_days(Days::new(from_monday)).unwrap_or(date);
    let sunday = monday.checked_add_days(Days::new(6)).unwrap_or(date);
    (monday, sunday)
}

fn is_upcoming(appointment: &Appointment, now: NaiveDateTime) -> bool {
    match appointment.date {
        Some(date) if date > now.date() => true,
        Some(date) if date == now.date() => appointment.start_time.is_some_and(|t| t > now.time()),
        _ => false,
    }
}

fn barber_day(barber: &Barber, appointments: &[Appointment], today: NaiveDate) -> BarberDay {
    let mut todays: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.barber_id == barber.id && a.date == Some(today) && !a.is_cancelled())
        .collect();
    todays.sort_by_key(|a| a.sort_time());
    BarberDay {
        barber_id: barber.id.clone(),
        name: barber.name.clone(),
        theme_color: barber.theme_color_or_default().to_string(),
        completed: todays.iter().filter(|a| a.is_completed()).count(),
        total: todays.len(),
        next: todays
            .iter()
            .find(|a| a.effective_status() == AppointmentStatus::Scheduled)
            .map(|a| (*a).clone()),
    }
}

/// Computes the dashboard from the full appointment set.
#[must_use]
pub fn compute(
    appointments: &[Appointment],
    roster: &[Barber],
    now: NaiveDateTime,
) -> DashboardMetrics {
    let today = now.date();
    let (week_start, week_end) = week_bounds(today);
    let month = YearMonth::of(today);

    let completed_this_month: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.is_completed() && a.date.is_some_and(|d| month.contains(d)))
        .collect();

    let mut upcoming: Vec<Appointment> = appointments
        .iter()
        .filter(|a| is_upcoming(a, now) && !a.is_cancelled())
        .cloned()
        .collect();
    upcoming.sort_by(appointment_order);
    upcoming.truncate(UPCOMING_LIMIT);

    let clients: HashSet<String> = completed_this_month
        .iter()
        .map(|a| a.client_name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect();

    DashboardMetrics {
        today,
        appointments_today: appointments.iter().filter(|a| a.date == Some(today)).count(),
        appointments_week: appointments
            .iter()
            .filter(|a| a.date.is_some_and(|d| d >= week_start && d <= week_end))
            .count(),
        revenue_month: completed_this_month.iter().map(|a| a.price).sum(),
        clients_month: clients.len(),
        upcoming,
        barbers: roster
            .iter()
            .map(|b| barber_day(b, appointments, today))
            .collect(),
    }
}

/// Loads everything from the store and computes the dashboard.
///
/// # Errors
///
/// Returns [`StoreError`] if the appointment set cannot be loaded. A
/// missing roster only empties the per-barber section.
pub async fn load(
    store: &RecordStore,
    clock: &dyn Clock,
) -> Result<Sourced<DashboardMetrics>, StoreError> {
    let (appointments, roster) = tokio::join!(
        store.list_appointments(&BarberFilter::All),
        store.list_barbers()
    );
    let appointments = appointments?;
    let (roster, roster_source) = match roster {
        Ok(Sourced { value, source }) => (value, source),
        Err(err) => {
            tracing::warn!(error = %err, "barber roster unavailable for dashboard");
            (Vec::new(), appointments.source)
        }
    };
    let source = appointments.source.and(roster_source);
    let metrics = compute(&appointments.value, &roster, clock.now());
    Ok(Sourced {
        value: metrics,
        source,
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::AppointmentPatch;
    use crate::service::clock::FixedClock;
    use crate::store::fallback_dataset;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .unwrap_or_default()
    }

    #[test]
    fn week_runs_monday_to_sunday() {
        let Some(thursday) = NaiveDate::from_ymd_opt(2025, 6, 26) else {
            panic!("bad date");
        };
        let (monday, sunday) = week_bounds(thursday);
        assert_eq!(monday, NaiveDate::from_ymd_opt(2025, 6, 23).unwrap_or_default());
        assert_eq!(sunday, NaiveDate::from_ymd_opt(2025, 6, 29).unwrap_or_default());
    }

    #[test]
    fn counts_today_and_week() {
        let data = fallback_dataset();
        let metrics = compute(&data.appointments, &data.barbers, at(26, 12, 0));
        assert_eq!(metrics.appointments_today, 5);
        assert_eq!(metrics.appointments_week, 7);
        assert_eq!(metrics.revenue_month, Decimal::ZERO);
    }

    #[test]
    fn upcoming_skips_past_and_cancelled() {
        let mut data = fallback_dataset();
        // Cancel Carlos Lima (15:45 on the 26th).
        if let Some(carlos) = data.appointments.iter_mut().find(|a| a.id.get() == 3) {
            AppointmentPatch::status(Some(AppointmentStatus::Cancelled)).apply_to(carlos);
        }
        let metrics = compute(&data.appointments, &data.barbers, at(26, 12, 0));
        let ids: Vec<i64> = metrics.upcoming.iter().map(|a| a.id.get()).collect();
        // 13:10 and 16:15 today, then 10:00 and 14:30 tomorrow.
        assert_eq!(ids, vec![2, 6, 7, 4]);
    }

    #[test]
    fn revenue_and_clients_count_completed_only() {
        let mut data = fallback_dataset();
        for appt in data.appointments.iter_mut().filter(|a| a.id.get() <= 2) {
            AppointmentPatch::status(Some(AppointmentStatus::Completed)).apply_to(appt);
        }
        if let Some(pedro) = data.appointments.iter_mut().find(|a| a.id.get() == 2) {
            pedro.client_name = "JOÃO SILVA".to_string();
        }
        let metrics = compute(&data.appointments, &data.barbers, at(26, 18, 0));
        assert_eq!(metrics.revenue_month, Decimal::new(70, 0));
        assert_eq!(metrics.clients_month, 1);
    }

    #[test]
    fn barber_day_tracks_progress() {
        let mut data = fallback_dataset();
        if let Some(first) = data.appointments.iter_mut().find(|a| a.id.get() == 1) {
            AppointmentPatch::status(Some(AppointmentStatus::Completed)).apply_to(first);
        }
        let metrics = compute(&data.appointments, &data.barbers, at(26, 8, 0));
        let Some(renne) = metrics.barbers.iter().find(|b| b.barber_id.as_str() == "renne") else {
            panic!("renne missing");
        };
        assert_eq!((renne.completed, renne.total), (1, 3));
        assert_eq!(renne.next.as_ref().map(|a| a.id.get()), Some(2));
    }

    #[tokio::test]
    async fn load_reads_through_the_store() {
        let store = RecordStore::demo();
        let clock = FixedClock::at(at(26, 12, 0));
        let Ok(metrics) = load(&store, &clock).await else {
            panic!("dashboard load failed");
        };
        assert!(metrics.is_fallback());
        assert_eq!(metrics.value.barbers.len(), 2);
    }
}
