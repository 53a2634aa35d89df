// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mapping from Mi Fitness activity keys to Strava sport types.

/// Strava sport type and display name for a Mi Fitness activity key.
///
/// Keys absent from this table are left unsynced; the uploader skips them
/// without treating it as an error.
pub fn strava_mapping(key: &str) -> Option<(&'static str, &'static str)> {
    let mapped = match key {
        "indoor_running" => ("VirtualRun", "esteira"),
        "indoor_walking" => ("Walk", "caminhada na esteira"),
        "indoor_fitness" => ("WeightTraining", "musculação"),
        "climbing_machine" => ("StairStepper", "escada"),
        "elliptical_trainer" => ("Elliptical", "eliptico"),
        "outdoor_running" => ("Run", "corrida"),
        "volleyball" => ("Workout", "Vôlei"),
        _ => return None,
    };
    Some(mapped)
}
