// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted Strava OAuth token pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Margin before token expiration when we proactively refresh, so an upload
/// batch never starts with a token about to expire mid-request.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// The OAuth token pair persisted between runs.
///
/// Field names match Strava's token endpoint response, so the on-disk JSON
/// is exactly what the endpoint returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp when the access token expires
    pub expires_at: i64,
}

impl Credential {
    /// Whether the access token needs refreshing, with the safety margin.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expires_at - TOKEN_REFRESH_MARGIN_SECS
    }
}
