//! Barber profiles and working-hour availability.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::ids::BarberId;
use super::wire;

/// Default theme color when a barber has none.
pub const DEFAULT_THEME_COLOR: &str = "#00d4ff";

/// Day of the week, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    /// Monday.
    #[serde(alias = "segunda", alias = "mon")]
    Monday,
    /// Tuesday.
    #[serde(alias = "terca", alias = "terça", alias = "tue")]
    Tuesday,
    /// Wednesday.
    #[serde(alias = "quarta", alias = "wed")]
    Wednesday,
    /// Thursday.
    #[serde(alias = "quinta", alias = "thu")]
    Thursday,
    /// Friday.
    #[serde(alias = "sexta", alias = "fri")]
    Friday,
    /// Saturday.
    #[serde(alias = "sabado", alias = "sábado", alias = "sat")]
    Saturday,
    /// Sunday.
    #[serde(alias = "domingo", alias = "sun")]
    Sunday,
}

impl Weekday {
    /// All days, Monday first.
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

/// Whether a barber is currently taking bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarberStatus {
    /// Working.
    #[default]
    #[serde(alias = "ativo")]
    Active,
    /// Not working.
    #[serde(alias = "inativo")]
    Inactive,
}

impl BarberStatus {
    /// The opposite status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }

    /// Canonical wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// Hours for one weekday in a custom schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Whether the barber works that day.
    pub active: bool,
    /// Opening time.
    #[serde(with = "wire::time")]
    pub start: NaiveTime,
    /// Closing time.
    #[serde(with = "wire::time")]
    pub end: NaiveTime,
}

/// How a barber's availability is expressed.
///
/// Exactly one mode governs a barber: the custom per-day schedule wins
/// whenever it is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability<'a> {
    /// Same hours every listed day.
    Days {
        /// Days worked.
        days: &'a [Weekday],
        /// Opening time.
        start: Option<NaiveTime>,
        /// Closing time.
        end: Option<NaiveTime>,
    },
    /// Per-day hours.
    Custom(&'a BTreeMap<Weekday, DaySchedule>),
}

/// A staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barber {
    /// Slug identifier.
    pub id: BarberId,
    /// Display name.
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: String,
    /// Active or inactive.
    #[serde(default)]
    pub status: BarberStatus,
    /// Display color hint (CSS color).
    #[serde(default)]
    pub theme_color: Option<String>,
    /// Default opening time.
    #[serde(default, with = "wire::opt_time")]
    pub start_time: Option<NaiveTime>,
    /// Default closing time.
    #[serde(default, with = "wire::opt_time")]
    pub end_time: Option<NaiveTime>,
    /// Simple availability: days worked with the default hours.
    #[serde(default)]
    pub available_days: Vec<Weekday>,
    /// Per-day schedule; takes precedence over `available_days`.
    #[serde(default)]
    pub custom_schedule: Option<BTreeMap<Weekday, DaySchedule>>,
    /// Specialties, in display order.
    #[serde(default)]
    pub specialties: Vec<String>,
    /// Commission share, 0–100.
    #[serde(default)]
    pub commission_percent: u8,
}

impl Barber {
    /// Resolves which availability mode governs this barber.
    #[must_use]
    pub fn availability(&self) -> Availability<'_> {
        match &self.custom_schedule {
            Some(schedule) if !schedule.is_empty() => Availability::Custom(schedule),
            _ => Availability::Days {
                days: &self.available_days,
                start: self.start_time,
                end: self.end_time,
            },
        }
    }

    /// Returns `true` if the barber works on `day`.
    #[must_use]
    pub fn works_on(&self, day: Weekday) -> bool {
        match self.availability() {
            Availability::Custom(schedule) => schedule.get(&day).is_some_and(|d| d.active),
            Availability::Days { days, .. } => days.contains(&day),
        }
    }

    /// Working hours on `day`, if the barber works then and hours are known.
    #[must_use]
    pub fn hours_on(&self, day: Weekday) -> Option<(NaiveTime, NaiveTime)> {
        match self.availability() {
            Availability::Custom(schedule) => schedule
                .get(&day)
                .filter(|d| d.active)
                .map(|d| (d.start, d.end)),
            Availability::Days { days, start, end } => {
                if days.contains(&day) {
                    start.zip(end)
                } else {
                    None
                }
            }
        }
    }

    /// Theme color, falling back to the default accent.
    #[must_use]
    pub fn theme_color_or_default(&self) -> &str {
        self.theme_color.as_deref().unwrap_or(DEFAULT_THEME_COLOR)
    }

    /// Returns `true` if the barber is taking bookings.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == BarberStatus::Active
    }
}

/// Partial update of a barber profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarberPatch {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New email.
    #[serde(default)]
    pub email: Option<String>,
    /// New phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// New status.
    #[serde(default)]
    pub status: Option<BarberStatus>,
    /// New theme color.
    #[serde(default)]
    pub theme_color: Option<String>,
    /// New default opening time.
    #[serde(default, with = "wire::opt_time")]
    pub start_time: Option<NaiveTime>,
    /// New default closing time.
    #[serde(default, with = "wire::opt_time")]
    pub end_time: Option<NaiveTime>,
    /// New simple day list.
    #[serde(default)]
    pub available_days: Option<Vec<Weekday>>,
    /// New custom schedule.
    #[serde(default)]
    pub custom_schedule: Option<BTreeMap<Weekday, DaySchedule>>,
    /// New specialties.
    #[serde(default)]
    pub specialties: Option<Vec<String>>,
    /// New commission (clamped to 100).
    #[serde(default)]
    pub commission_percent: Option<u8>,
}

impl BarberPatch {
    /// Patch that only changes the status.
    #[must_use]
    pub fn status(status: BarberStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Applies the supplied fields to `target`. The id is never touched.
    pub fn apply_to(&self, target: &mut Barber) {
        if let Some(name) = &self.name {
            target.name.clone_from(name);
        }
        if let Some(email) = &self.email {
            target.email.clone_from(email);
        }
        if let Some(phone) = &self.phone {
            target.phone.clone_from(phone);
        }
        if let Some(status) = self.status {
            target.status = status;
        }
        if let Some(color) = &self.theme_color {
            target.theme_color = Some(color.clone());
        }
        if let Some(start) = self.start_time {
            target.start_time = Some(start);
        }
        if let Some(end) = self.end_time {
            target.end_time = Some(end);
        }
        if let Some(days) = &self.available_days {
            target.available_days.clone_from(days);
        }
        if let Some(schedule) = &self.custom_schedule {
            target.custom_schedule = Some(schedule.clone());
        }
        if let Some(specialties) = &self.specialties {
            target.specialties.clone_from(specialties);
        }
        if let Some(commission) = self.commission_percent {
            target.commission_percent = commission.min(100);
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
    }

    fn barber() -> Barber {
        Barber {
            id: BarberId::new("lele"),
            name: "Lele".to_string(),
            email: String::new(),
            phone: String::new(),
            status: BarberStatus::Active,
            theme_color: None,
            start_time: Some(hm(9, 0)),
            end_time: Some(hm(17, 0)),
            available_days: vec![Weekday::Monday, Weekday::Tuesday],
            custom_schedule: None,
            specialties: Vec::new(),
            commission_percent: 55,
        }
    }

    #[test]
    fn simple_days_govern_without_custom_schedule() {
        let b = barber();
        assert!(matches!(b.availability(), Availability::Days { .. }));
        assert!(b.works_on(Weekday::Monday));
        assert!(!b.works_on(Weekday::Sunday));
        assert_eq!(b.hours_on(Weekday::Tuesday), Some((hm(9, 0), hm(17, 0))));
    }

    #[test]
    fn custom_schedule_takes_precedence() {
        let mut b = barber();
        let mut schedule = BTreeMap::new();
        schedule.insert(
            Weekday::Saturday,
            DaySchedule {
                active: true,
                start: hm(9, 0),
                end: hm(15, 0),
            },
        );
        schedule.insert(
            Weekday::Monday,
            DaySchedule {
                active: false,
                start: hm(9, 0),
                end: hm(17, 0),
            },
        );
        b.custom_schedule = Some(schedule);

        assert!(matches!(b.availability(), Availability::Custom(_)));
        assert!(!b.works_on(Weekday::Monday));
        assert_eq!(b.hours_on(Weekday::Saturday), Some((hm(9, 0), hm(15, 0))));
    }

    #[test]
    fn portuguese_day_names_deserialize() {
        let json = r#"{"id": "renne", "name": "Renne", "status": "ativo",
            "available_days": ["segunda", "sabado"]}"#;
        let Ok(b) = serde_json::from_str::<Barber>(json) else {
            panic!("deserialization failed");
        };
        assert_eq!(b.available_days, vec![Weekday::Monday, Weekday::Saturday]);
        assert!(b.is_active());
        assert_eq!(b.theme_color_or_default(), DEFAULT_THEME_COLOR);
    }

    #[test]
    fn patch_clamps_commission_and_toggles_status() {
        let mut b = barber();
        BarberPatch {
            commission_percent: Some(250),
            ..BarberPatch::status(b.status.toggled())
        }
        .apply_to(&mut b);
        assert_eq!(b.commission_percent, 100);
        assert_eq!(b.status, BarberStatus::Inactive);
    }
}
