// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite wrapper with typed operations on the sport-record table.
//!
//! Provides the point lookups the importer needs for dedup and the
//! selection/marker queries the uploader needs for at-most-once delivery.

use crate::error::{AppError, Result};
use crate::models::{PendingRecord, RawRow};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Activity keys matching this pattern were recorded on Strava natively
/// (outdoor activities with GPS) and must never be uploaded back.
const NATIVE_KEY_PATTERN: &str = "outdoor%";

/// SQLite database holding the imported sport records.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database file, creating the schema if it does not exist yet.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| AppError::Database(format!("Failed to open {}: {e}", path.display())))?;
        let db = Self { conn };
        db.migrate()?;
        tracing::debug!(path = %path.display(), "Opened activity database");
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sport_record (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                uid             TEXT NOT NULL,
                sid             TEXT NOT NULL,
                key             TEXT NOT NULL,
                time            INTEGER NOT NULL,
                category        TEXT NOT NULL,
                value           TEXT NOT NULL,
                update_time     INTEGER NOT NULL,
                local_datetime  TEXT,
                strava_id       TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_sport_record_dedup
                ON sport_record(key, time);
            CREATE INDEX IF NOT EXISTS idx_sport_record_pending
                ON sport_record(local_datetime) WHERE strava_id IS NULL;",
        )?;
        Ok(())
    }

    /// Whether a record with this dedup tuple is already stored.
    pub fn record_exists(&self, key: &str, time: i64, value: &str) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM sport_record WHERE key = ?1 AND time = ?2 AND value = ?3",
                params![key, time, value],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Insert a freshly imported row. `local_datetime` starts unset and is
    /// backfilled separately.
    pub fn insert_record(&self, row: &RawRow) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sport_record (uid, sid, key, time, category, value, update_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                row.uid,
                row.sid,
                row.key,
                row.time,
                row.category,
                row.value,
                row.update_time,
            ],
        )?;
        Ok(())
    }

    /// Set the derived wall-clock column, but only where it is still unset
    /// so re-runs cannot shift an already-adjusted timestamp again.
    pub fn backfill_local_datetime(&self, key: &str, time: i64, local_datetime: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE sport_record SET local_datetime = ?1
             WHERE key = ?2 AND time = ?3 AND local_datetime IS NULL",
            params![local_datetime, key, time],
        )?;
        Ok(())
    }

    /// Records eligible for upload: past the cutoff, never uploaded, and not
    /// native to Strava. Ordered oldest-first so uploads land chronologically.
    pub fn pending_uploads(&self, cutoff: &str) -> Result<Vec<PendingRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, key, value, local_datetime FROM sport_record
             WHERE local_datetime >= ?1
               AND strava_id IS NULL
               AND key NOT LIKE ?2
             ORDER BY time ASC",
        )?;
        let rows = stmt.query_map(params![cutoff, NATIVE_KEY_PATTERN], |row| {
            Ok(PendingRecord {
                id: row.get(0)?,
                key: row.get(1)?,
                value: row.get(2)?,
                local_datetime: row.get(3)?,
            })
        })?;

        let mut pending = Vec::new();
        for row in rows {
            pending.push(row?);
        }
        Ok(pending)
    }

    /// Record the Strava-assigned id, permanently excluding the record from
    /// future upload selection.
    pub fn set_strava_id(&self, record_id: i64, strava_id: u64) -> Result<()> {
        self.conn.execute(
            "UPDATE sport_record SET strava_id = ?1 WHERE id = ?2",
            params![strava_id.to_string(), record_id],
        )?;
        Ok(())
    }

    /// Stored Strava id for a record, if any (used by tests and status output).
    pub fn strava_id(&self, record_id: i64) -> Result<Option<String>> {
        let id: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT strava_id FROM sport_record WHERE id = ?1",
                params![record_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id.flatten())
    }

    /// Total number of stored records.
    pub fn record_count(&self) -> Result<i64> {
        let count =
            self.conn
                .query_row("SELECT COUNT(*) FROM sport_record", [], |row| row.get(0))?;
        Ok(count)
    }
}
