// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod credential;
pub mod mapping;
pub mod record;

pub use credential::Credential;
pub use mapping::strava_mapping;
pub use record::{PendingRecord, RawRow, SportValue};
