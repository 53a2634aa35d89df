// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sport record models: export rows, stored rows pending upload, and the
//! opaque value payload.

use serde::Deserialize;

/// One row of the Mi Fitness sport-record export CSV.
///
/// Column names mirror the export header exactly.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Uid")]
    pub uid: String,
    #[serde(rename = "Sid")]
    pub sid: String,
    #[serde(rename = "Key")]
    pub key: String,
    /// Start time as epoch seconds in the device's time zone
    #[serde(rename = "Time")]
    pub time: i64,
    #[serde(rename = "Category")]
    pub category: String,
    /// Opaque JSON payload (duration, distance, calories, ...)
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "UpdateTime")]
    pub update_time: i64,
}

/// A stored record selected for upload: not yet on Strava, past the cutoff,
/// and not natively recorded there.
#[derive(Debug, Clone)]
pub struct PendingRecord {
    pub id: i64,
    pub key: String,
    pub value: String,
    pub local_datetime: String,
}

/// Numeric fields extracted from a record's `Value` payload.
///
/// The export is inconsistent about number encoding (sometimes JSON numbers,
/// sometimes numeric strings), and older rows omit fields entirely; missing
/// or unreadable numerics fall back to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SportValue {
    /// Elapsed time in seconds
    pub duration: i64,
    /// Distance in meters
    pub distance: i64,
}

impl SportValue {
    /// Parse the payload JSON. Fails only when the payload is not JSON at
    /// all; individual fields degrade to zero.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Ok(Self {
            duration: int_field(&value, "duration"),
            distance: int_field(&value, "distance"),
        })
    }
}

fn int_field(value: &serde_json::Value, key: &str) -> i64 {
    match value.get(key) {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
