// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Locating and reading the Mi Fitness sport-record export.
//!
//! Export folders are named like `20251005_6599729986_MiFitness_c3_data_copy`
//! and contain one CSV per health-center table; the sport records live in
//! `<prefix>_hlth_center_sport_record.csv`.

use crate::error::{AppError, Result};
use crate::models::RawRow;
use std::path::{Path, PathBuf};

const FOLDER_SUFFIX: &str = "_c3_data_copy";
const SPORT_CSV_SUFFIX: &str = "_hlth_center_sport_record.csv";

/// Derive the sport-record CSV path inside an export folder.
pub fn sport_csv_path(export_dir: &Path) -> Result<PathBuf> {
    if !export_dir.is_dir() {
        return Err(AppError::Import(format!(
            "Export folder does not exist: {}",
            export_dir.display()
        )));
    }

    let folder_name = export_dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            AppError::Import(format!(
                "Export folder has no usable name: {}",
                export_dir.display()
            ))
        })?;

    let prefix = folder_name.strip_suffix(FOLDER_SUFFIX).unwrap_or(folder_name);
    let csv_path = export_dir.join(format!("{prefix}{SPORT_CSV_SUFFIX}"));

    if !csv_path.exists() {
        return Err(AppError::Import(format!(
            "Sport record CSV not found: {}",
            csv_path.display()
        )));
    }

    Ok(csv_path)
}

/// Read every row of the sport-record CSV.
pub fn read_rows(csv_path: &Path) -> Result<Vec<RawRow>> {
    let mut rdr = csv::Reader::from_path(csv_path).map_err(|e| {
        AppError::Import(format!("Failed to open {}: {e}", csv_path.display()))
    })?;

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: RawRow =
            result.map_err(|e| AppError::Import(format!("Malformed export row: {e}")))?;
        rows.push(row);
    }

    tracing::info!(count = rows.len(), path = %csv_path.display(), "Read export rows");
    Ok(rows)
}
