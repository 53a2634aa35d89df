// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed persistence for the OAuth token pair.

use crate::error::{AppError, Result};
use crate::models::Credential;
use std::fs;
use std::path::PathBuf;

/// Persists the credential as JSON next to the tool, surviving between
/// unattended runs.
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the stored credential. A missing file means no authorization has
    /// happened yet; an unreadable file is an error rather than a silent
    /// reset, since it may still hold a valid refresh token.
    pub fn load(&self) -> Result<Option<Credential>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::Auth(format!(
                    "Failed to read token file {}: {e}",
                    self.path.display()
                )))
            }
        };

        let credential = serde_json::from_str(&raw).map_err(|e| {
            AppError::Auth(format!(
                "Token file {} is not valid JSON: {e}",
                self.path.display()
            ))
        })?;
        Ok(Some(credential))
    }

    /// Persist the credential. Writes to a sibling temp file and renames it
    /// over the target, so a crash mid-write cannot truncate the stored pair.
    pub fn save(&self, credential: &Credential) -> Result<()> {
        let raw = serde_json::to_string_pretty(credential)
            .map_err(|e| AppError::Auth(format!("Failed to serialize credential: {e}")))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, raw).map_err(|e| {
            AppError::Auth(format!(
                "Failed to write token file {}: {e}",
                tmp_path.display()
            ))
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            AppError::Auth(format!(
                "Failed to replace token file {}: {e}",
                self.path.display()
            ))
        })?;

        tracing::debug!(path = %self.path.display(), "Credential persisted");
        Ok(())
    }
}
