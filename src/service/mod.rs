//! Service layer: orchestration over the record store.
//!
//! [`AgendaController`] drives the appointment lifecycle for one calendar
//! view. [`dashboard`] and [`reports`] aggregate the appointment set into
//! read-only summaries. Everything takes its store and [`Clock`] by
//! injection.

pub mod agenda;
pub mod clock;
pub mod dashboard;
pub mod reports;

pub use agenda::{
    AgendaController, AgendaEntry, AgendaView, BarberMarker, Confirmation, Notification,
    NotificationLevel, ReloadOutcome, ReloadStatus, fetch_entries,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use dashboard::DashboardMetrics;
pub use reports::{Report, ReportPeriod};
