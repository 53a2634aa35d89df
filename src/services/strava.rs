// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for creating activities and exchanging OAuth tokens.
//!
//! Handles:
//! - Authorization URL construction for the interactive flow
//! - Authorization-code exchange and token refresh
//! - Activity creation with bearer auth
//! - Hiding uploaded activities from the home feed

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    api_base: String,
    oauth_base: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self::with_base_urls(
            client_id,
            client_secret,
            "https://www.strava.com/api/v3",
            "https://www.strava.com",
        )
    }

    /// Create a client against explicit base URLs (used by tests to point at
    /// a mock server).
    pub fn with_base_urls(
        client_id: String,
        client_secret: String,
        api_base: &str,
        oauth_base: &str,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            oauth_base: oauth_base.trim_end_matches('/').to_string(),
            client_id,
            client_secret,
        }
    }

    /// Authorization URL the user is sent to for the interactive flow.
    pub fn authorize_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}/oauth/authorize?\
             client_id={}&\
             response_type=code&\
             redirect_uri={}&\
             approval_prompt=force&\
             scope=activity:write,activity:read",
            self.oauth_base,
            self.client_id,
            urlencoding::encode(redirect_uri),
        )
    }

    /// Exchange an authorization code for the initial token pair.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AppError> {
        let response = self
            .http
            .post(format!("{}/oauth/token", self.oauth_base))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Token exchange request failed: {e}")))?;

        Self::token_response(response).await
    }

    /// Refresh an expired access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, AppError> {
        let response = self
            .http
            .post(format!("{}/oauth/token", self.oauth_base))
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Token refresh request failed: {e}")))?;

        Self::token_response(response).await
    }

    /// Create an activity; returns the Strava-assigned id.
    pub async fn create_activity(
        &self,
        access_token: &str,
        activity: &NewActivity,
    ) -> Result<u64, AppError> {
        let response = self
            .http
            .post(format!("{}/activities", self.api_base))
            .bearer_auth(access_token)
            .form(activity)
            .send()
            .await
            .map_err(|e| AppError::Upload(format!("Activity create request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upload(format!(
                "Activity create failed with HTTP {status}: {body}"
            )));
        }

        let created: CreatedActivity = response
            .json()
            .await
            .map_err(|e| AppError::Upload(format!("Activity create response parse error: {e}")))?;
        Ok(created.id)
    }

    /// Hide an uploaded activity from the home feed. Best-effort; callers
    /// log failures and move on.
    pub async fn hide_from_home(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<(), AppError> {
        let response = self
            .http
            .put(format!("{}/activities/{}", self.api_base, activity_id))
            .bearer_auth(access_token)
            .json(&serde_json::json!({ "hide_from_home": true }))
            .send()
            .await
            .map_err(|e| AppError::Upload(format!("Activity update request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upload(format!(
                "Activity update failed with HTTP {status}: {body}"
            )));
        }
        Ok(())
    }

    /// Check a token-endpoint response and parse the JSON body.
    async fn token_response(response: reqwest::Response) -> Result<TokenResponse, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Strava token endpoint rejected request");
            return Err(AppError::Auth(format!(
                "Token endpoint rejected request with HTTP {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("Failed to parse token response: {e}")))
    }
}

/// Token endpoint response (exchange and refresh share the shape).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

/// Outgoing activity payload for the create endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct NewActivity {
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub sport_type: String,
    /// ISO-8601 with a literal trailing `Z`
    pub start_date_local: String,
    /// Seconds
    pub elapsed_time: i64,
    /// Meters
    pub distance: i64,
    pub description: String,
}

/// Create endpoint response; only the assigned id matters here.
#[derive(Debug, Clone, Deserialize)]
struct CreatedActivity {
    id: u64,
}
