// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Uploading not-yet-synced records to Strava.
//!
//! Selection excludes records already carrying a Strava id and records whose
//! key marks them as native to Strava. Per-record failures are logged and
//! counted, never fatal to the batch; the Strava id is persisted immediately
//! after each successful create so a record can never upload twice.

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{strava_mapping, PendingRecord, SportValue};
use crate::services::strava::{NewActivity, StravaClient};
use crate::time_utils;

/// Provenance tag attached to every uploaded activity.
const UPLOAD_DESCRIPTION: &str = "Sincronizado via Mi Band Sync";

/// Counts reported after an upload pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadOutcome {
    pub uploaded: usize,
    pub skipped: usize,
}

/// Pushes eligible records to Strava and records the assigned ids.
pub struct Uploader<'a> {
    db: &'a Database,
    client: &'a StravaClient,
    cutoff: &'a str,
}

impl<'a> Uploader<'a> {
    pub fn new(db: &'a Database, client: &'a StravaClient, cutoff: &'a str) -> Self {
        Self { db, client, cutoff }
    }

    /// Upload every eligible record, oldest first.
    pub async fn sync(&self, access_token: &str) -> Result<UploadOutcome> {
        let pending = self.db.pending_uploads(self.cutoff)?;
        tracing::info!(count = pending.len(), "Found activities to upload");

        let mut outcome = UploadOutcome::default();

        for record in &pending {
            let Some((sport_type, name)) = strava_mapping(&record.key) else {
                tracing::info!(key = %record.key, "Activity key not mapped, skipping");
                outcome.skipped += 1;
                continue;
            };

            match self.upload_one(access_token, record, sport_type, name).await {
                Ok(strava_id) => {
                    tracing::info!(
                        record_id = record.id,
                        strava_id,
                        start = %record.local_datetime,
                        "Activity uploaded"
                    );
                    outcome.uploaded += 1;
                }
                Err(e) => {
                    tracing::error!(record_id = record.id, error = %e, "Failed to upload activity");
                    outcome.skipped += 1;
                }
            }
        }

        tracing::info!(
            uploaded = outcome.uploaded,
            skipped = outcome.skipped,
            "Upload finished"
        );
        Ok(outcome)
    }

    async fn upload_one(
        &self,
        access_token: &str,
        record: &PendingRecord,
        sport_type: &str,
        name: &str,
    ) -> Result<u64> {
        let value = SportValue::parse(&record.value).map_err(|e| {
            AppError::Upload(format!("Record {} has an unreadable payload: {e}", record.id))
        })?;

        let start_date_local =
            time_utils::strava_start_date(&record.local_datetime).ok_or_else(|| {
                AppError::Upload(format!(
                    "Record {} has a malformed local datetime: {}",
                    record.id, record.local_datetime
                ))
            })?;

        let activity = NewActivity {
            name: name.to_string(),
            activity_type: sport_type.to_string(),
            sport_type: sport_type.to_string(),
            start_date_local,
            elapsed_time: value.duration,
            distance: value.distance,
            description: UPLOAD_DESCRIPTION.to_string(),
        };

        let strava_id = self.client.create_activity(access_token, &activity).await?;

        // Persist the sync marker before anything else can fail. A crash
        // between the create above and this write is the documented
        // duplicate window; Strava offers no idempotency key to close it.
        self.db.set_strava_id(record.id, strava_id)?;

        if let Err(e) = self.client.hide_from_home(access_token, strava_id).await {
            tracing::warn!(strava_id, error = %e, "Could not hide activity from home feed");
        }

        Ok(strava_id)
    }
}
