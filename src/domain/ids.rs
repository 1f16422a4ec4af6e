//! Type-safe record identifiers.
//!
//! Appointments and notices are keyed by store-assigned integers; barbers
//! by a short slug (e.g. `"renne"`). Wrapping them in newtypes keeps an
//! appointment id from being passed where a notice id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique identifier of an appointment, assigned by the record store on
/// creation and immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(i64);

impl AppointmentId {
    /// Wraps a raw store id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for AppointmentId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Unique identifier of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoticeId(i64);

impl NoticeId {
    /// Wraps a raw store id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NoticeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NoticeId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Identifier of a barber: a lowercase slug that also serves as the
/// partition key of appointments. Deserializing normalizes like [`BarberId::new`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct BarberId(String);

impl BarberId {
    /// Creates a barber id, trimming and lowercasing the input.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the slug is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BarberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BarberId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for BarberId {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<BarberId> for String {
    fn from(id: BarberId) -> Self {
        id.0
    }
}

/// Which barbers' appointments are loaded and displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum BarberFilter {
    /// Every barber's appointments, merged.
    #[default]
    All,
    /// A single barber's appointments.
    Only(BarberId),
}

impl BarberFilter {
    /// Returns `true` if the given barber passes this filter.
    #[must_use]
    pub fn matches(&self, barber: &BarberId) -> bool {
        match self {
            Self::All => true,
            Self::Only(id) => id == barber,
        }
    }

    /// Returns the selected barber, or `None` for [`BarberFilter::All`].
    #[must_use]
    pub const fn barber(&self) -> Option<&BarberId> {
        match self {
            Self::All => None,
            Self::Only(id) => Some(id),
        }
    }
}

impl FromStr for BarberFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = BarberId::new(s);
        Ok(match id.as_str() {
            "" | "all" | "todos" | "*" => Self::All,
            _ => Self::Only(id),
        })
    }
}

impl fmt::Display for BarberFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(id) => write!(f, "{id}"),
        }
    }
}

impl Serialize for BarberFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BarberFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let Ok(filter) = raw.parse::<Self>();
        Ok(filter)
    }
}
