// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Mi Fitness → Strava sync.
//!
//! Imports sport-record exports from a Mi Fitness data dump into a local
//! SQLite database and uploads not-yet-synced activities to Strava, each
//! exactly once.

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod time_utils;
