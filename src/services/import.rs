// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Idempotent ingestion of export rows into the activity database.

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::RawRow;
use crate::time_utils;
use chrono::FixedOffset;

/// Upserts export rows with duplicate suppression keyed on
/// `(key, time, value)`, backfilling the device-local wall-clock column for
/// new rows.
pub struct Importer<'a> {
    db: &'a Database,
    utc_offset: FixedOffset,
}

impl<'a> Importer<'a> {
    pub fn new(db: &'a Database, utc_offset: FixedOffset) -> Self {
        Self { db, utc_offset }
    }

    /// Import a batch of rows; returns how many were newly inserted.
    ///
    /// Each row dedups against storage, so duplicates inside the batch and
    /// re-runs over the same export are both no-ops. The first storage error
    /// aborts the remaining rows; re-running the import later is safe.
    pub fn import(&self, rows: &[RawRow]) -> Result<usize> {
        let mut inserted = 0;

        for row in rows {
            if self
                .db
                .record_exists(&row.key, row.time, &row.value)
                .map_err(import_error)?
            {
                continue;
            }

            self.db.insert_record(row).map_err(import_error)?;

            let local_datetime = time_utils::local_datetime_string(row.time, self.utc_offset)
                .ok_or_else(|| {
                    AppError::Import(format!(
                        "Record {}@{} has an unrepresentable timestamp",
                        row.key, row.time
                    ))
                })?;
            self.db
                .backfill_local_datetime(&row.key, row.time, &local_datetime)
                .map_err(import_error)?;

            inserted += 1;
        }

        tracing::info!(
            total = rows.len(),
            inserted,
            "Import finished"
        );
        Ok(inserted)
    }
}

fn import_error(err: AppError) -> AppError {
    AppError::Import(err.to_string())
}
