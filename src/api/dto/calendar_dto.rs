//! Calendar, schedule and report query parameters and responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::domain::{BarberFilter, GridLayout, MonthGrid, WeekStart, YearMonth};
use crate::service::{AgendaEntry, ReportPeriod};
use crate::store::DataSource;

/// Query for `GET /calendar`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    /// Year; defaults to the current one.
    pub year: Option<i32>,
    /// Month 1–12; defaults to the current one.
    pub month: Option<u32>,
    /// Barber id or `all`.
    #[param(value_type = Option<String>)]
    #[serde(default)]
    pub barber: Option<BarberFilter>,
    /// `desktop` (leading blanks) or `mobile`.
    #[param(value_type = Option<String>)]
    #[serde(default)]
    pub layout: Option<GridLayout>,
    /// `monday` (default) or `sunday`.
    #[param(value_type = Option<String>)]
    #[serde(default)]
    pub week_start: Option<WeekStart>,
}

/// Month grid over the tagged appointment set.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarResponse {
    /// Month shown.
    pub month: YearMonth,
    /// Barber scope.
    pub barber: BarberFilter,
    /// Layout the grid was built for.
    pub layout: GridLayout,
    /// The grid.
    pub grid: MonthGrid<AgendaEntry>,
    /// Data source.
    pub source: DataSource,
}

/// Today's appointments.
#[derive(Debug, Clone, Serialize)]
pub struct TodayScheduleResponse {
    /// The date the schedule was derived for.
    pub date: NaiveDate,
    /// Barber scope.
    pub barber: BarberFilter,
    /// Appointments by start time.
    pub appointments: Vec<AgendaEntry>,
    /// Data source.
    pub source: DataSource,
}

/// Query for `GET /reports`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// `month` (default), `quarter` or `year`.
    pub period: Option<String>,
    /// Barber id or `all`.
    #[param(value_type = Option<String>)]
    #[serde(default)]
    pub barber: Option<BarberFilter>,
}

impl ReportQuery {
    /// Parses the period text.
    ///
    /// # Errors
    ///
    /// Returns the parse message for an unknown period.
    pub fn period(&self) -> Result<ReportPeriod, String> {
        self.period.as_deref().unwrap_or_default().parse()
    }
}
