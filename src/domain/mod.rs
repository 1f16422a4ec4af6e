//! Domain layer: records, identifiers, and the calendar core.
//!
//! This module contains the shop's data model (appointments, barbers,
//! notices), the wire formats shared by every surface, and the pure
//! calendar functions that turn a set of appointments into a month grid
//! or a day's schedule.

pub mod appointment;
pub mod barber;
pub mod calendar;
pub mod ids;
pub mod notice;
pub mod wire;

pub use appointment::{
    Appointment, AppointmentForm, AppointmentPatch, AppointmentStatus, NewAppointment,
    ValidationError,
};
pub use barber::{Availability, Barber, BarberPatch, BarberStatus, DaySchedule, Weekday};
pub use calendar::{
    DayCell, GridCell, GridLayout, GridOptions, MonthGrid, WeekStart, YearMonth, build_month_grid,
    derive_today_schedule,
};
pub use ids::{AppointmentId, BarberFilter, BarberId, NoticeId};
pub use notice::{NewNotice, Notice, NoticeDraftError};
