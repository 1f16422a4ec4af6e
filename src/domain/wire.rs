//! Serde adapters for the canonical wire forms of dates, times and prices.
//!
//! Dates travel as `YYYY-MM-DD`, times as `HH:MM` (reads also accept
//! `HH:MM:SS`, which is how PostgreSQL renders `time` columns). Empty
//! strings and `null` read as absent.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serializer};

/// Canonical date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical wall-clock time format.
pub const TIME_FORMAT: &str = "%H:%M";

/// Parses a `YYYY-MM-DD` date, trimming surrounding whitespace.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Parses an `HH:MM` or `HH:MM:SS` time, trimming surrounding whitespace.
#[must_use]
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

/// Formats a time as zero-padded `HH:MM`.
#[must_use]
pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Reads a price leniently: numbers and numeric strings are accepted,
/// anything absent, negative or unparsable becomes zero.
#[must_use]
pub fn lenient_price(value: Option<&serde_json::Value>) -> Decimal {
    let parsed = match value {
        Some(serde_json::Value::Number(n)) => n.to_string().parse::<Decimal>().ok(),
        Some(serde_json::Value::String(s)) => s.trim().replace(',', ".").parse::<Decimal>().ok(),
        _ => None,
    };
    match parsed {
        Some(price) if price >= Decimal::ZERO => price,
        _ => Decimal::ZERO,
    }
}

/// `Option<NaiveDate>` as `YYYY-MM-DD` or `null`.
pub mod opt_date {
    use super::*;

    /// Serializes the date in canonical form.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => s.serialize_str(&format_date(*date)),
            None => s.serialize_none(),
        }
    }

    /// Deserializes a date; empty strings read as `None`.
    ///
    /// # Errors
    ///
    /// Fails on text that is not a `YYYY-MM-DD` date.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse_date(text)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {text}"))),
        }
    }
}

/// `Option<NaiveTime>` as `HH:MM` or `null`.
pub mod opt_time {
    use super::*;

    /// Serializes the time as `HH:MM`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => s.serialize_str(&format_time(*time)),
            None => s.serialize_none(),
        }
    }

    /// Deserializes a time; empty strings read as `None`.
    ///
    /// # Errors
    ///
    /// Fails on text that is neither `HH:MM` nor `HH:MM:SS`.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse_time(text)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid time: {text}"))),
        }
    }
}

/// Plain `NaiveTime` as `HH:MM`.
pub mod time {
    use super::*;

    /// Serializes the time as `HH:MM`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_time(*value))
    }

    /// Deserializes an `HH:MM` or `HH:MM:SS` time.
    ///
    /// # Errors
    ///
    /// Fails on malformed text.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse_time(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid time: {raw}")))
    }
}

/// `Decimal` price read with [`lenient_price`].
pub mod price {
    use super::*;

    /// Serializes the price as a JSON number.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Decimal, s: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(value, s)
    }

    /// Deserializes any JSON value into a non-negative price.
    ///
    /// # Errors
    ///
    /// Only fails if the input is not valid JSON.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Decimal, D::Error> {
        let value = Option::<serde_json::Value>::deserialize(d)?;
        Ok(lenient_price(value.as_ref()))
    }
}
