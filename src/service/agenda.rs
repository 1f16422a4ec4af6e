//! Agenda controller: the appointment lifecycle behind the calendar view.
//!
//! [`AgendaController`] owns one view's state (barber filter, viewed
//! month, loaded appointments) and keeps the month grid and today's
//! schedule derived from it. Every mutation goes through the
//! [`RecordStore`] and is followed by a reload, so the local set always
//! reflects what the store holds.
//!
//! # Concurrency
//!
//! The state lock is never held across store I/O. Each reload takes a
//! ticket from a monotonic counter when it starts; when its response
//! arrives it is applied only if no later reload has been issued since.
//! A slow response to an old filter can therefore never overwrite a
//! newer one.
//!
//! # Failures
//!
//! Nothing here returns an error. Operations resolve to a
//! [`Notification`] for the user. A reload that cannot get data from
//! anywhere empties the appointment set rather than keeping stale rows.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use crate::domain::{
    Appointment, AppointmentForm, AppointmentId, AppointmentPatch, Barber, BarberFilter, BarberId,
    GridLayout, GridOptions, MonthGrid, YearMonth, build_month_grid, derive_today_schedule,
};
use crate::store::{DataSource, RecordStore, Sourced, StoreError};

/// How an agenda entry is styled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BarberMarker {
    /// The owning barber is on the roster.
    Known {
        /// Barber's display name.
        name: String,
        /// Barber's theme color.
        theme_color: String,
    },
    /// The owning barber is unknown; generic styling.
    Generic,
}

/// An appointment tagged with its originating barber.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgendaEntry {
    /// The record.
    #[serde(flatten)]
    pub appointment: Appointment,
    /// Styling derived from the roster.
    pub barber: BarberMarker,
}

impl AsRef<Appointment> for AgendaEntry {
    fn as_ref(&self) -> &Appointment {
        &self.appointment
    }
}

/// Severity of a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// The operation went through.
    Success,
    /// Nothing went wrong; nothing happened either.
    Info,
    /// Went through, with a caveat (fallback data, missing record).
    Warning,
    /// Did not go through.
    Error,
}

/// A one-shot message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// User-facing text.
    pub message: String,
}

impl Notification {
    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// A success message.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    /// An informational message.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    /// A warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    /// An error.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    /// Whether this reports a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// What happened to a reload's response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "source", rename_all = "snake_case")]
pub enum ReloadStatus {
    /// Applied; the data came from this source.
    Applied(DataSource),
    /// No source could serve the data; the set was emptied.
    Emptied,
    /// A later reload was issued first; this response was dropped.
    Superseded,
}

/// Result of a reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReloadOutcome {
    /// What happened to the response.
    pub status: ReloadStatus,
    /// Message for the user, if any.
    pub notification: Option<Notification>,
}

/// Explicit consent for a destructive operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confirmation {
    /// The user confirmed.
    Granted,
    /// The user declined or was not asked.
    Withheld,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Granted
        } else {
            Self::Withheld
        }
    }
}

/// A copy of the controller state for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgendaView {
    /// Current barber filter.
    pub filter: BarberFilter,
    /// Month shown.
    pub month: YearMonth,
    /// Grid layout.
    pub layout: GridLayout,
    /// Date the today schedule was derived for.
    pub today: NaiveDate,
    /// The loaded set, in store order.
    pub appointments: Vec<AgendaEntry>,
    /// Month grid over the loaded set.
    pub grid: MonthGrid<AgendaEntry>,
    /// Today's appointments by start time.
    pub today_schedule: Vec<AgendaEntry>,
    /// Whether a reload is in flight.
    pub loading: bool,
    /// Source of the last applied reload; `None` before the first one or
    /// after a total failure.
    pub source: Option<DataSource>,
}

#[derive(Debug)]
struct AgendaState {
    filter: BarberFilter,
    month: YearMonth,
    layout: GridLayout,
    today: NaiveDate,
    appointments: Vec<AgendaEntry>,
    grid: MonthGrid<AgendaEntry>,
    today_schedule: Vec<AgendaEntry>,
    loading: bool,
    source: Option<DataSource>,
}

impl AgendaState {
    fn new(today: NaiveDate) -> Self {
        let month = YearMonth::of(today);
        let layout = GridLayout::default();
        Self {
            filter: BarberFilter::All,
            month,
            layout,
            today,
            appointments: Vec::new(),
            grid: build_month_grid(month, &[], grid_options(layout)),
            today_schedule: Vec::new(),
            loading: false,
            source: None,
        }
    }

    fn rederive(&mut self, today: NaiveDate) {
        self.today = today;
        self.grid = build_month_grid(self.month, &self.appointments, grid_options(self.layout));
        self.today_schedule = derive_today_schedule(&self.appointments, today);
    }

    fn view(&self) -> AgendaView {
        AgendaView {
            filter: self.filter.clone(),
            month: self.month,
            layout: self.layout,
            today: self.today,
            appointments: self.appointments.clone(),
            grid: self.grid.clone(),
            today_schedule: self.today_schedule.clone(),
            loading: self.loading,
            source: self.source,
        }
    }
}

fn grid_options(layout: GridLayout) -> GridOptions {
    GridOptions {
        layout,
        ..GridOptions::default()
    }
}

/// Tags each appointment with its barber's marker.
fn tag(appointments: Vec<Appointment>, roster: &[Barber]) -> Vec<AgendaEntry> {
    let by_id: HashMap<&BarberId, &Barber> = roster.iter().map(|b| (&b.id, b)).collect();
    appointments
        .into_iter()
        .map(|appointment| {
            let barber = match by_id.get(&appointment.barber_id) {
                Some(b) => BarberMarker::Known {
                    name: b.name.clone(),
                    theme_color: b.theme_color_or_default().to_string(),
                },
                None => BarberMarker::Generic,
            };
            AgendaEntry {
                appointment,
                barber,
            }
        })
        .collect()
}

/// Loads the appointment set for `filter` together with the barber
/// roster and tags every entry with its marker.
///
/// A roster that cannot be loaded only degrades the markers to
/// [`BarberMarker::Generic`].
///
/// # Errors
///
/// Returns [`StoreError`] if the appointment set cannot be loaded.
pub async fn fetch_entries(
    store: &RecordStore,
    filter: &BarberFilter,
) -> Result<Sourced<Vec<AgendaEntry>>, StoreError> {
    let (appointments, roster) =
        tokio::join!(store.list_appointments(filter), store.list_barbers());
    let roster = match roster {
        Ok(Sourced { value, .. }) => value,
        Err(err) => {
            tracing::warn!(error = %err, "barber roster unavailable, using generic markers");
            Vec::new()
        }
    };
    Ok(appointments?.map(|list| tag(list, &roster)))
}

/// Owns one agenda view and drives appointment changes through the store.
#[derive(Debug)]
pub struct AgendaController {
    store: Arc<RecordStore>,
    clock: Arc<dyn Clock>,
    state: tokio::sync::RwLock<AgendaState>,
    issued: AtomicU64,
}

impl AgendaController {
    /// Creates a controller viewing the current month, all barbers, with
    /// nothing loaded yet.
    #[must_use]
    pub fn new(store: Arc<RecordStore>, clock: Arc<dyn Clock>) -> Self {
        let today = clock.today();
        Self {
            store,
            clock,
            state: tokio::sync::RwLock::new(AgendaState::new(today)),
            issued: AtomicU64::new(0),
        }
    }

    /// Copies out the full view state.
    pub async fn snapshot(&self) -> AgendaView {
        self.state.read().await.view()
    }

    /// The loaded appointment set.
    pub async fn appointments(&self) -> Vec<AgendaEntry> {
        self.state.read().await.appointments.clone()
    }

    /// The current barber filter.
    pub async fn barber_filter(&self) -> BarberFilter {
        self.state.read().await.filter.clone()
    }

    /// Scopes the view to one barber (or all) and reloads.
    pub async fn set_barber_filter(&self, filter: BarberFilter) -> ReloadOutcome {
        tracing::debug!(%filter, "barber filter changed");
        self.state.write().await.filter = filter;
        self.reload().await
    }

    /// Moves the viewed month by `delta` (negative = back) and reloads.
    pub async fn change_month(&self, delta: i32) -> ReloadOutcome {
        {
            let mut state = self.state.write().await;
            state.month = state.month.shifted(delta);
        }
        self.reload().await
    }

    /// Switches between the desktop and mobile grid. No I/O.
    pub async fn set_layout(&self, layout: GridLayout) {
        let today = self.clock.today();
        let mut state = self.state.write().await;
        state.layout = layout;
        state.rederive(today);
    }

    /// Fetches the appointment set for the current filter, together with
    /// the barber roster, and re-derives the grid and today's schedule.
    pub async fn reload(&self) -> ReloadOutcome {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let filter = {
            let mut state = self.state.write().await;
            state.loading = true;
            state.filter.clone()
        };

        let appointments = fetch_entries(&self.store, &filter).await;

        let today = self.clock.today();
        let mut state = self.state.write().await;
        if ticket != self.issued.load(Ordering::SeqCst) {
            tracing::debug!(ticket, %filter, "discarding superseded reload");
            return ReloadOutcome {
                status: ReloadStatus::Superseded,
                notification: None,
            };
        }
        state.loading = false;

        match appointments {
            Ok(Sourced { value, source }) => {
                tracing::debug!(ticket, %filter, count = value.len(), ?source, "agenda reloaded");
                state.appointments = value;
                state.source = Some(source);
                state.rederive(today);
                let notification = (source == DataSource::Fallback).then(|| {
                    Notification::warning("Backend unavailable: showing offline data")
                });
                ReloadOutcome {
                    status: ReloadStatus::Applied(source),
                    notification,
                }
            }
            Err(err) => {
                tracing::error!(ticket, %filter, error = %err, "agenda reload failed");
                state.appointments.clear();
                state.source = None;
                state.rederive(today);
                ReloadOutcome {
                    status: ReloadStatus::Emptied,
                    notification: Some(Notification::error(format!(
                        "Could not load appointments: {err}"
                    ))),
                }
            }
        }
    }

    /// Validates the form, creates the appointment, and reloads.
    ///
    /// Validation happens before any store call. From the all-barbers
    /// view the form must name a barber.
    pub async fn create_appointment(&self, form: &AppointmentForm) -> Notification {
        let filter = self.barber_filter().await;
        let new = match form.validate_new(&filter) {
            Ok(new) => new,
            Err(err) => return Notification::error(capitalize(&err.to_string())),
        };

        match self.store.create_appointment(&new).await {
            Ok(created) => {
                self.reload().await;
                let client = &created.value.client_name;
                if created.is_fallback() {
                    Notification::warning(format!(
                        "Appointment for {client} saved offline (backend unavailable)"
                    ))
                } else {
                    Notification::success(format!("Appointment for {client} created"))
                }
            }
            Err(err) => Notification::error(format!("Could not create appointment: {err}")),
        }
    }

    /// Validates the edit form and applies it to appointment `id`.
    pub async fn update_appointment(
        &self,
        id: AppointmentId,
        barber: &BarberId,
        form: &AppointmentForm,
    ) -> Notification {
        match form.validate_edit() {
            Ok(patch) => self.patch_appointment(id, barber, &patch).await,
            Err(err) => Notification::error(capitalize(&err.to_string())),
        }
    }

    /// Applies a partial update (a status change, typically) to
    /// appointment `id` and reloads.
    pub async fn patch_appointment(
        &self,
        id: AppointmentId,
        barber: &BarberId,
        patch: &AppointmentPatch,
    ) -> Notification {
        if patch.is_empty() {
            return Notification::info("Nothing to update");
        }
        if patch.touches_slot() {
            match self.store.get_appointment(id).await {
                Ok(Sourced {
                    value: Some(current),
                    ..
                }) => {
                    if let Err(err) = patch.check_against(&current) {
                        return Notification::error(capitalize(&err.to_string()));
                    }
                }
                Ok(Sourced { value: None, .. }) => {
                    return Notification::warning(format!("Appointment {id} no longer exists"));
                }
                Err(err) => {
                    return Notification::error(format!("Could not update appointment: {err}"));
                }
            }
        }
        match self.store.update_appointment(id, patch).await {
            Ok(Sourced { value: Some(_), source }) => {
                tracing::info!(%id, %barber, ?source, "appointment updated");
                self.reload().await;
                if source == DataSource::Fallback {
                    Notification::warning("Appointment updated offline (backend unavailable)")
                } else {
                    Notification::success("Appointment updated")
                }
            }
            Ok(Sourced { value: None, .. }) => {
                Notification::warning(format!("Appointment {id} no longer exists"))
            }
            Err(err) => Notification::error(format!("Could not update appointment: {err}")),
        }
    }

    /// Deletes appointment `id` once the user has confirmed, then reloads.
    pub async fn delete_appointment(
        &self,
        id: AppointmentId,
        barber: &BarberId,
        confirmation: Confirmation,
    ) -> Notification {
        if confirmation == Confirmation::Withheld {
            return Notification::info("Deletion cancelled");
        }
        match self.store.delete_appointment(id).await {
            Ok(Sourced { value: true, source }) => {
                tracing::info!(%id, %barber, ?source, "appointment deleted");
                self.reload().await;
                Notification::success("Appointment deleted")
            }
            Ok(Sourced { value: false, .. }) => {
                Notification::warning(format!("Appointment {id} no longer exists"))
            }
            Err(err) => Notification::error(format!("Could not delete appointment: {err}")),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveTime;
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::AppointmentStatus;
    use crate::service::clock::FixedClock;
    use crate::store::testing::{Fault, TestBackend};
    use crate::store::{Backend, MemoryBackend, fallback_dataset};

    fn june_26() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 26).unwrap_or_default()
    }

    fn controller_over(store: RecordStore) -> AgendaController {
        AgendaController::new(Arc::new(store), Arc::new(FixedClock::on(june_26())))
    }

    fn backed_by(backend: &Arc<TestBackend>, fallback: bool) -> RecordStore {
        RecordStore::new(
            Some(Arc::clone(backend) as Arc<dyn Backend>),
            fallback.then(|| MemoryBackend::with_dataset(fallback_dataset())),
            Duration::from_millis(200),
        )
    }

    fn form(client: &str) -> AppointmentForm {
        AppointmentForm {
            barber_id: Some("lele".to_string()),
            client_name: client.to_string(),
            client_phone: "(11) 98888-0000".to_string(),
            date: "2025-06-26".to_string(),
            start_time: "17:00".to_string(),
            end_time: "17:30".to_string(),
            service: "Corte".to_string(),
            price: Decimal::new(30, 0),
            payment_method: "PIX".to_string(),
            status: None,
        }
    }

    #[tokio::test]
    async fn all_view_merges_barbers_with_markers() {
        let agenda = controller_over(RecordStore::demo());
        let outcome = agenda.reload().await;
        assert_eq!(outcome.status, ReloadStatus::Applied(DataSource::Fallback));
        assert!(outcome.notification.is_some_and(|n| n.level == NotificationLevel::Warning));

        let view = agenda.snapshot().await;
        let Some(cell) = view.grid.day(26) else {
            panic!("june 26 missing from grid");
        };
        // renne has three bookings on the 26th, lele two.
        assert_eq!(cell.appointments.len(), 5);
        let renne = cell
            .appointments
            .iter()
            .filter(|e| matches!(&e.barber, BarberMarker::Known { name, .. } if name == "Renne"))
            .count();
        let lele = cell
            .appointments
            .iter()
            .filter(|e| matches!(&e.barber, BarberMarker::Known { name, .. } if name == "Lele"))
            .count();
        assert_eq!((renne, lele), (3, 2));
        assert_eq!(view.today_schedule.len(), 5);
    }

    #[tokio::test]
    async fn unknown_barber_gets_generic_marker() {
        let backend = Arc::new(TestBackend::seeded());
        let Ok(mut new) = form("Zeca").validate_new(&BarberFilter::All) else {
            panic!("valid form rejected");
        };
        new.barber_id = BarberId::new("zeca");
        let Ok(_) = backend.inner.insert_appointment(&new).await else {
            panic!("seed insert failed");
        };

        let agenda = controller_over(backed_by(&backend, false));
        let outcome = agenda.reload().await;
        assert_eq!(outcome.status, ReloadStatus::Applied(DataSource::Backend));
        assert_eq!(outcome.notification, None);

        let entries = agenda.appointments().await;
        let zeca = entries.iter().find(|e| e.appointment.barber_id.as_str() == "zeca");
        assert!(zeca.is_some_and(|e| e.barber == BarberMarker::Generic));
    }

    #[tokio::test]
    async fn filter_scopes_to_one_barber() {
        let agenda = controller_over(RecordStore::demo());
        agenda
            .set_barber_filter(BarberFilter::Only(BarberId::new("lele")))
            .await;
        let entries = agenda.appointments().await;
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.appointment.barber_id.as_str() == "lele"));
    }

    #[tokio::test]
    async fn stale_reload_is_discarded() {
        let backend = Arc::new(TestBackend::seeded());
        let agenda = Arc::new(controller_over(backed_by(&backend, false)));

        let first_gate = backend.gate().await;
        let second_gate = backend.gate().await;

        let first = tokio::spawn({
            let agenda = Arc::clone(&agenda);
            async move { agenda.reload().await }
        });
        let Ok(()) = first_gate.entered.await else {
            panic!("first reload never reached the backend");
        };

        let second = tokio::spawn({
            let agenda = Arc::clone(&agenda);
            async move { agenda.reload().await }
        });
        let Ok(()) = second_gate.entered.await else {
            panic!("second reload never reached the backend");
        };

        let _ = second_gate.release.send(());
        let Ok(latest) = second.await else {
            panic!("second reload panicked");
        };
        assert_eq!(latest.status, ReloadStatus::Applied(DataSource::Backend));

        // The older request now reads a different set; it must not win.
        let Ok(_) = backend.inner.delete_appointment(AppointmentId::new(1)).await else {
            panic!("delete failed");
        };
        let _ = first_gate.release.send(());
        let Ok(stale) = first.await else {
            panic!("first reload panicked");
        };
        assert_eq!(stale.status, ReloadStatus::Superseded);

        let view = agenda.snapshot().await;
        assert_eq!(view.appointments.len(), 7);
        assert!(!view.loading);
    }

    #[tokio::test]
    async fn total_failure_empties_the_view() {
        let backend = Arc::new(TestBackend::seeded());
        let agenda = controller_over(backed_by(&backend, false));
        agenda.reload().await;
        assert_eq!(agenda.appointments().await.len(), 7);

        backend.set_fault(Some(Fault::Down)).await;
        let outcome = agenda.reload().await;
        assert_eq!(outcome.status, ReloadStatus::Emptied);
        assert!(outcome.notification.is_some_and(|n| n.is_error()));

        let view = agenda.snapshot().await;
        assert!(view.appointments.is_empty());
        assert!(view.grid.days().all(|cell| cell.appointments.is_empty()));
        assert!(view.today_schedule.is_empty());
        assert_eq!(view.source, None);
        assert!(!view.loading);
    }

    #[tokio::test]
    async fn blank_client_name_never_reaches_the_store() {
        let backend = Arc::new(TestBackend::seeded());
        let agenda = controller_over(backed_by(&backend, false));

        let note = agenda.create_appointment(&form("  ")).await;
        assert!(note.is_error());
        assert_eq!(note.message, "Client name is required");
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn create_from_all_view_requires_a_barber() {
        let backend = Arc::new(TestBackend::seeded());
        let agenda = controller_over(backed_by(&backend, false));
        let mut unassigned = form("Lucas");
        unassigned.barber_id = None;

        let note = agenda.create_appointment(&unassigned).await;
        assert!(note.is_error());
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn created_appointment_appears_after_reload() {
        let backend = Arc::new(TestBackend::seeded());
        let agenda = controller_over(backed_by(&backend, false));

        let note = agenda.create_appointment(&form("Lucas")).await;
        assert_eq!(note.level, NotificationLevel::Success);

        let entries = agenda.appointments().await;
        let created = entries.iter().find(|e| e.appointment.client_name == "Lucas");
        let Some(created) = created else {
            panic!("created appointment not in the reloaded set");
        };
        assert_eq!(created.appointment.status, Some(AppointmentStatus::Scheduled));
        assert_eq!(created.appointment.id, AppointmentId::new(8));
    }

    #[tokio::test]
    async fn rejected_update_leaves_state_unchanged() {
        let backend = Arc::new(TestBackend::seeded());
        let agenda = controller_over(backed_by(&backend, true));
        agenda.reload().await;
        let before = agenda.snapshot().await;

        backend.set_fault(Some(Fault::Reject)).await;
        let patch = AppointmentPatch::status(Some(AppointmentStatus::Completed));
        let note = agenda
            .patch_appointment(AppointmentId::new(1), &BarberId::new("renne"), &patch)
            .await;
        assert!(note.is_error());
        assert_eq!(agenda.snapshot().await, before);
    }

    #[tokio::test]
    async fn mixed_case_barber_patch_stays_in_the_barber_view() {
        let agenda = controller_over(RecordStore::demo());
        let raw = r#"{"barber_id": "Lele"}"#;
        let Ok(patch) = serde_json::from_str::<AppointmentPatch>(raw) else {
            panic!("barber patch rejected");
        };
        let note = agenda
            .patch_appointment(AppointmentId::new(1), &BarberId::new("renne"), &patch)
            .await;
        assert!(!note.is_error());

        agenda
            .set_barber_filter(BarberFilter::Only(BarberId::new("lele")))
            .await;
        let entries = agenda.appointments().await;
        assert_eq!(entries.len(), 4);
        let Some(moved) = entries.iter().find(|e| e.appointment.id == AppointmentId::new(1)) else {
            panic!("moved appointment missing from the lele view");
        };
        assert_eq!(moved.appointment.barber_id.as_str(), "lele");
        assert!(matches!(&moved.barber, BarberMarker::Known { name, .. } if name == "Lele"));
    }

    #[tokio::test]
    async fn patch_ending_before_its_start_is_refused() {
        let backend = Arc::new(TestBackend::seeded());
        let agenda = controller_over(backed_by(&backend, false));
        let patch = AppointmentPatch {
            start_time: NaiveTime::from_hms_opt(10, 0, 0),
            ..AppointmentPatch::default()
        };
        let note = agenda
            .patch_appointment(AppointmentId::new(1), &BarberId::new("renne"), &patch)
            .await;
        assert!(note.is_error());
        assert_eq!(note.message, "End time must not be before start time");

        let stored = backend.inner.snapshot().await.appointments;
        let first = stored.iter().find(|a| a.id == AppointmentId::new(1));
        assert_eq!(
            first.and_then(|a| a.start_time),
            NaiveTime::from_hms_opt(9, 0, 0)
        );
    }

    #[tokio::test]
    async fn completing_an_appointment_sinks_it_in_its_day() {
        let agenda = controller_over(RecordStore::demo());
        agenda.reload().await;
        let patch = AppointmentPatch::status(Some(AppointmentStatus::Completed));
        let note = agenda
            .patch_appointment(AppointmentId::new(1), &BarberId::new("renne"), &patch)
            .await;
        // Demo mode writes go to the fallback dataset.
        assert_eq!(note.level, NotificationLevel::Warning);

        let view = agenda.snapshot().await;
        let Some(cell) = view.grid.day(26) else {
            panic!("june 26 missing from grid");
        };
        let last = cell.appointments.last().map(|e| e.appointment.id);
        assert_eq!(last, Some(AppointmentId::new(1)));
    }

    #[tokio::test]
    async fn withheld_delete_makes_no_store_call() {
        let backend = Arc::new(TestBackend::seeded());
        let agenda = controller_over(backed_by(&backend, false));

        let note = agenda
            .delete_appointment(
                AppointmentId::new(1),
                &BarberId::new("renne"),
                Confirmation::Withheld,
            )
            .await;
        assert_eq!(note.level, NotificationLevel::Info);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn deleting_unknown_id_warns_and_changes_nothing() {
        let backend = Arc::new(TestBackend::seeded());
        let agenda = controller_over(backed_by(&backend, false));
        agenda.reload().await;

        let note = agenda
            .delete_appointment(
                AppointmentId::new(404),
                &BarberId::new("renne"),
                Confirmation::Granted,
            )
            .await;
        assert_eq!(note.level, NotificationLevel::Warning);
        assert_eq!(backend.inner.snapshot().await.appointments.len(), 7);
    }

    #[tokio::test]
    async fn confirmed_delete_removes_the_appointment() {
        let agenda = controller_over(RecordStore::demo());
        let note = agenda
            .delete_appointment(
                AppointmentId::new(2),
                &BarberId::new("renne"),
                Confirmation::Granted,
            )
            .await;
        assert_eq!(note.level, NotificationLevel::Success);
        let entries = agenda.appointments().await;
        assert_eq!(entries.len(), 6);
        assert!(entries.iter().all(|e| e.appointment.id != AppointmentId::new(2)));
    }

    #[tokio::test]
    async fn month_navigation_rolls_over_years() {
        let agenda = controller_over(RecordStore::demo());
        agenda.change_month(7).await;
        let view = agenda.snapshot().await;
        assert_eq!((view.month.year(), view.month.month()), (2026, 1));
        assert!(view.grid.days().all(|cell| cell.appointments.is_empty()));

        agenda.change_month(-7).await;
        assert_eq!(agenda.snapshot().await.grid.days().count(), 30);
    }

    #[tokio::test]
    async fn layout_switch_drops_leading_blanks() {
        let agenda = controller_over(RecordStore::demo());
        agenda.reload().await;
        assert_eq!(agenda.snapshot().await.grid.leading_blanks(), 6);

        agenda.set_layout(GridLayout::Mobile).await;
        let view = agenda.snapshot().await;
        assert_eq!(view.grid.leading_blanks(), 0);
        assert_eq!(view.grid.days().count(), 30);
    }
}
