//! FFI bindings for mobile platforms (iOS/Android).
//!
//! This module provides the UniFFI bindings that expose the stateless parts
//! of the library to Kotlin and Swift. All FFI functions are prefixed with
//! `ffi_` to avoid naming conflicts with the internal API. The stateful
//! pipeline lives in [`crate::engine::engine_ffi`].

use log::{error, info};

use crate::chart::{format_duration_ms, render_chart, ChartLayout, ChartScales, DrawCommandRecorder};
use crate::cursor::{lookup, CurrentPoint};
use crate::geo_utils::compute_bounds;
use crate::{
    build_profile, init_logging, points_from_json, segment_points, solve_speed, Bounds, GpsPoint,
    ProfileConfig, TrackProfile,
};

// ============================================================================
// Profile Functions
// ============================================================================

/// Default rider configuration, for pre-filling settings screens.
#[uniffi::export]
pub fn ffi_default_profile_config() -> ProfileConfig {
    ProfileConfig::default()
}

/// Check a configuration. Returns an error message, or an empty string if valid.
#[uniffi::export]
pub fn ffi_validate_profile_config(config: ProfileConfig) -> String {
    match config.validate() {
        Ok(()) => String::new(),
        Err(e) => e.to_string(),
    }
}

/// Build the cumulative profile of a track.
#[uniffi::export]
pub fn ffi_build_profile(points: Vec<GpsPoint>, config: ProfileConfig) -> TrackProfile {
    init_logging();
    info!("[RideProfileRust] ffi_build_profile called with {} points", points.len());
    build_profile(&points, &config)
}

/// Decode a JSON point list. Returns an empty list if the JSON is malformed.
#[uniffi::export]
pub fn ffi_points_from_json(json: String) -> Vec<GpsPoint> {
    points_from_json(&json).unwrap_or_else(|e| {
        error!("[RideProfileRust] {}", e);
        Vec::new()
    })
}

/// Split a track into distance-bounded groups of points.
#[uniffi::export]
pub fn ffi_segment_points(points: Vec<GpsPoint>, min_distance: f64) -> Vec<Vec<GpsPoint>> {
    segment_points(&points, min_distance)
}

/// Modelled speed in km/h for a single grade.
#[uniffi::export]
pub fn ffi_solve_speed(config: ProfileConfig, slope: f64) -> f64 {
    solve_speed(
        config.power,
        config.friction,
        slope,
        config.weight,
        config.drag_coefficient,
        config.max_speed,
        config.speed_step,
    )
    .min(config.max_speed)
}

/// Bounding box of a track, for fitting the map view.
#[uniffi::export]
pub fn ffi_compute_bounds(points: Vec<GpsPoint>) -> Option<Bounds> {
    compute_bounds(&points)
}

// ============================================================================
// Chart Functions
// ============================================================================

/// Format a duration label, e.g. `"1 h 5 m"`.
#[uniffi::export]
pub fn ffi_format_duration(ms: f64, max_value: f64, show_days: bool) -> String {
    format_duration_ms(ms, max_value, show_days)
}

/// Track point under pixel `pointer_x` of a chart drawn with `layout`.
#[uniffi::export]
pub fn ffi_lookup(
    pointer_x: f64,
    layout: ChartLayout,
    profile: TrackProfile,
    max_speed: f64,
) -> Option<CurrentPoint> {
    let scales = ChartScales::new(&layout, &profile, max_speed);
    lookup(pointer_x, &scales, &profile.segments)
}

/// Chart drawing commands as JSON.
#[uniffi::export]
pub fn ffi_render_chart_json(
    layout: ChartLayout,
    profile: TrackProfile,
    max_speed: f64,
    rule_x: Option<f64>,
) -> String {
    let scales = ChartScales::new(&layout, &profile, max_speed);
    let mut recorder = DrawCommandRecorder::new();
    render_chart(&scales, &profile.segments, rule_x, &mut recorder);
    recorder.to_json().unwrap_or_else(|e| {
        error!("[RideProfileRust] {}", e);
        String::new()
    })
}
