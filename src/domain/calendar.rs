//! Month grid construction and the today schedule.
//!
//! Both are pure: they read a slice of appointments and return freshly
//! built structures. Anything that exposes an [`Appointment`] through
//! `AsRef` can be laid out, so the agenda can grid its tagged entries
//! directly.
//!
//! Within a day cell, entries are ordered so pending work comes first:
//! Completed appointments sink below everything else, and each bucket is
//! ascending by start time (missing start = `00:00`). Appointments with
//! no date cannot be placed and are collected in
//! [`MonthGrid::unscheduled`].

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::appointment::Appointment;

/// Calendar month, `month` in `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a month, or `None` if the month number or year is out of range.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// The month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Month number, 1-based.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Number of days in the month.
    #[must_use]
    pub fn days(self) -> u32 {
        self.first_day()
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .map_or(31, |last| last.day())
    }

    /// Moves `delta` months forward (negative = backward), rolling over
    /// year boundaries. Saturates at the calendar's limits.
    #[must_use]
    pub fn shifted(self, delta: i32) -> Self {
        let first = self.first_day();
        let moved = if delta >= 0 {
            first.checked_add_months(Months::new(delta.unsigned_abs()))
        } else {
            first.checked_sub_months(Months::new(delta.unsigned_abs()))
        };
        moved.map_or(self, Self::of)
    }

    /// Returns `true` if `date` falls in this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

/// Which weekday opens each grid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    /// Rows run Monday to Sunday.
    #[default]
    Monday,
    /// Rows run Sunday to Saturday.
    Sunday,
}

/// Presentation width the grid is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridLayout {
    /// Leading blank cells align day 1 under its weekday.
    #[default]
    Desktop,
    /// Days only, no leading blanks.
    Mobile,
}

/// Grid construction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridOptions {
    /// With or without leading blanks.
    pub layout: GridLayout,
    /// First column of each row.
    pub week_start: WeekStart,
}

/// One calendar date and the appointments on it, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCell<T> {
    /// Day of month, 1-based.
    pub day: u32,
    /// The date itself.
    pub date: NaiveDate,
    /// Appointments on this date; empty for a free day.
    pub appointments: Vec<T>,
}

/// A grid position: padding or a real day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GridCell<T> {
    /// Padding before day 1.
    Blank,
    /// A day of the month.
    Day(DayCell<T>),
}

impl<T> GridCell<T> {
    /// The day cell, if this is not padding.
    #[must_use]
    pub const fn as_day(&self) -> Option<&DayCell<T>> {
        match self {
            Self::Blank => None,
            Self::Day(cell) => Some(cell),
        }
    }
}

/// A month laid out as a sequence of cells (row-major, 7 per row).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGrid<T> {
    /// The month shown.
    pub month: YearMonth,
    /// Layout the grid was built for.
    pub layout: GridLayout,
    /// Weekday position of day 1 (0 = first column), whatever the layout.
    pub first_weekday_offset: u32,
    /// Blanks followed by one cell per day.
    pub cells: Vec<GridCell<T>>,
    /// Appointments without a date.
    pub unscheduled: Vec<T>,
}

impl<T> MonthGrid<T> {
    /// Day cells only, in date order.
    pub fn days(&self) -> impl Iterator<Item = &DayCell<T>> {
        self.cells.iter().filter_map(GridCell::as_day)
    }

    /// The cell for day `day` of the month.
    #[must_use]
    pub fn day(&self, day: u32) -> Option<&DayCell<T>> {
        self.days().find(|cell| cell.day == day)
    }

    /// Number of leading blank cells.
    #[must_use]
    pub fn leading_blanks(&self) -> usize {
        self.cells
            .iter()
            .take_while(|cell| matches!(cell, GridCell::Blank))
            .count()
    }

    /// Cells grouped into rows of seven (the last row may be shorter).
    pub fn weeks(&self) -> impl Iterator<Item = &[GridCell<T>]> {
        self.cells.chunks(7)
    }
}

/// Weekday position of the first of the month, in `0..7`.
///
/// With a Monday start, a month opening on Sunday lands in column 6.
#[must_use]
pub fn first_weekday_offset(month: YearMonth, week_start: WeekStart) -> u32 {
    let weekday = month.first_day().weekday();
    match week_start {
        WeekStart::Monday => weekday.num_days_from_monday(),
        WeekStart::Sunday => weekday.num_days_from_sunday(),
    }
}

/// Display order within a day: non-Completed first, then by start time.
/// The sort is stable, so ties keep their input order.
pub fn sort_for_day<T: AsRef<Appointment>>(entries: &mut [T]) {
    entries.sort_by_key(|entry| {
        let appt = entry.as_ref();
        (appt.is_completed(), appt.sort_time())
    });
}

/// Lays out `month` with each day's appointments in display order.
///
/// The input is never mutated; matching entries are cloned into their
/// cells.
pub fn build_month_grid<T>(
    month: YearMonth,
    appointments: &[T],
    options: GridOptions,
) -> MonthGrid<T>
where
    T: AsRef<Appointment> + Clone,
{
    let offset = first_weekday_offset(month, options.week_start);
    let blanks = match options.layout {
        GridLayout::Desktop => offset,
        GridLayout::Mobile => 0,
    };
    let day_count = month.days();

    let mut cells: Vec<GridCell<T>> = Vec::with_capacity((blanks + day_count) as usize);
    cells.extend((0..blanks).map(|_| GridCell::Blank));

    for day in 1..=day_count {
        let Some(date) = NaiveDate::from_ymd_opt(month.year(), month.month(), day) else {
            continue;
        };
        let mut daily: Vec<T> = appointments
            .iter()
            .filter(|entry| entry.as_ref().date == Some(date))
            .cloned()
            .collect();
        sort_for_day(&mut daily);
        cells.push(GridCell::Day(DayCell {
            day,
            date,
            appointments: daily,
        }));
    }

    let unscheduled = appointments
        .iter()
        .filter(|entry| entry.as_ref().date.is_none())
        .cloned()
        .collect();

    MonthGrid {
        month,
        layout: options.layout,
        first_weekday_offset: offset,
        cells,
        unscheduled,
    }
}

/// Appointments on `today`, ascending by start time (missing = `00:00`).
///
/// Pure and idempotent.
pub fn derive_today_schedule<T>(appointments: &[T], today: NaiveDate) -> Vec<T>
where
    T: AsRef<Appointment> + Clone,
{
    let mut todays: Vec<T> = appointments
        .iter()
        .filter(|entry| entry.as_ref().date == Some(today))
        .cloned()
        .collect();
    todays.sort_by_key(|entry| entry.as_ref().sort_time());
    todays
}
