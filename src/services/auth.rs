// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth token lifecycle: reuse a stored token, refresh it silently, or run
//! the first-time interactive authorization.

use crate::error::{AppError, Result};
use crate::models::Credential;
use crate::services::callback;
use crate::services::strava::{StravaClient, TokenResponse};
use crate::services::token_store::TokenStore;
use chrono::Utc;
use std::time::Duration;

/// Owns the decision between reusing, refreshing, and newly obtaining
/// credentials. Every credential change is persisted before a token is
/// handed back.
pub struct AuthService {
    client: StravaClient,
    store: TokenStore,
    callback_port: u16,
    interactive_timeout: Duration,
}

impl AuthService {
    pub fn new(
        client: StravaClient,
        store: TokenStore,
        callback_port: u16,
        interactive_timeout: Duration,
    ) -> Self {
        Self {
            client,
            store,
            callback_port,
            interactive_timeout,
        }
    }

    /// Get a valid (non-expired) access token.
    ///
    /// - Stored and unexpired: returned directly, no network call.
    /// - Stored but expired: refreshed with the stored refresh token. On
    ///   failure the stored credential is left untouched; a transient
    ///   refresh failure must not destroy a possibly-valid refresh token.
    /// - Nothing stored: full interactive browser authorization.
    pub async fn obtain_valid_token(&self) -> Result<String> {
        match self.store.load()? {
            Some(credential) if !credential.is_expired(Utc::now()) => {
                tracing::info!("Stored access token is still valid");
                Ok(credential.access_token)
            }
            Some(credential) => {
                tracing::info!("Access token expired, refreshing");
                self.refresh(&credential).await
            }
            None => {
                tracing::info!("No stored credential, starting interactive authorization");
                self.interactive_authorization().await
            }
        }
    }

    async fn refresh(&self, credential: &Credential) -> Result<String> {
        let tokens = self.client.refresh_token(&credential.refresh_token).await?;
        let credential = self.persist(tokens)?;
        tracing::info!("Token refreshed and persisted");
        Ok(credential.access_token)
    }

    async fn interactive_authorization(&self) -> Result<String> {
        let redirect_uri = format!("http://localhost:{}", self.callback_port);
        let auth_url = self.client.authorize_url(&redirect_uri);

        if open::that(&auth_url).is_err() {
            tracing::warn!(url = %auth_url, "Could not open a browser; visit the URL manually");
        } else {
            tracing::info!("Waiting for authorization in the browser");
        }

        let code =
            callback::wait_for_authorization_code(self.callback_port, self.interactive_timeout)
                .await?;
        tracing::info!("Authorization code received");

        let tokens = self.client.exchange_code(&code).await?;
        let credential = self.persist(tokens)?;
        tracing::info!("Initial token pair persisted");
        Ok(credential.access_token)
    }

    fn persist(&self, tokens: TokenResponse) -> Result<Credential> {
        let credential = Credential {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_at: tokens.expires_at,
        };
        self.store.save(&credential)?;
        Ok(credential)
    }
}
