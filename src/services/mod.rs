// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod callback;
pub mod import;
pub mod strava;
pub mod token_store;
pub mod upload;

pub use auth::AuthService;
pub use import::Importer;
pub use strava::StravaClient;
pub use token_store::TokenStore;
pub use upload::{UploadOutcome, Uploader};
