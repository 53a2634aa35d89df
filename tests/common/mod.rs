// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::FixedOffset;
use mifit_sync::db::Database;
use mifit_sync::models::RawRow;
use mifit_sync::services::Importer;

/// Epoch for 2024-06-15 12:00:00 UTC, comfortably past the default cutoff.
#[allow(dead_code)]
pub const SUMMER_NOON: i64 = 1718452800;

/// Create an in-memory activity database.
#[allow(dead_code)]
pub fn test_db() -> Database {
    Database::open_in_memory().expect("Failed to open in-memory database")
}

/// Build an export row with fixed owner/source fields.
#[allow(dead_code)]
pub fn raw_row(key: &str, time: i64, value: &str) -> RawRow {
    RawRow {
        uid: "1001".to_string(),
        sid: "band9".to_string(),
        key: key.to_string(),
        time,
        category: "sport".to_string(),
        value: value.to_string(),
        update_time: time + 60,
    }
}

/// Import rows at UTC offset zero so stored wall-clock times equal the
/// epoch's UTC rendering.
#[allow(dead_code)]
pub fn seed_records(db: &Database, rows: &[RawRow]) -> usize {
    Importer::new(db, FixedOffset::east_opt(0).unwrap())
        .import(rows)
        .expect("Failed to seed records")
}
