//! # Profile Engine
//!
//! Stateful owner of the profile pipeline, so mobile code can push inputs
//! and pull results through thin FFI calls.
//!
//! ## Architecture
//!
//! The engine holds the inputs (track points, rider configuration, chart
//! layout) and the derived outputs (profile, chart scales, cursor). Setting
//! an input marks the outputs that depend on it stale; they are rebuilt in
//! full on the next read. A rebuild never reuses a previous result, so
//! identical inputs always give identical outputs.
//!
//! ```text
//! points, config --> TrackProfile --+--> ChartScales --> render / pointer_move
//!         layout ------------------/
//! ```

use std::sync::Mutex;

use log::{debug, info, warn};
use once_cell::sync::Lazy;

use crate::chart::{render_chart, ChartLayout, ChartRenderer, ChartScales, ColorMode};
use crate::cursor::{CurrentPoint, Cursor};
use crate::error::{ProfileError, Result};
use crate::geo_utils::{compute_bounds, route_line};
use crate::profile::{build_profile, points_from_json, retain_valid, ProfileConfig, TrackProfile};
use crate::{Bounds, GpsPoint};

// ============================================================================
// Profile Engine
// ============================================================================

/// Recompute pipeline for a single track.
pub struct ProfileEngine {
    // Inputs
    points: Vec<GpsPoint>,
    config: ProfileConfig,
    layout: ChartLayout,

    // Derived state
    profile: TrackProfile,
    scales: Option<ChartScales>,
    bounds: Option<Bounds>,
    cursor: Cursor,

    // Dirty tracking
    profile_dirty: bool,
    scales_dirty: bool,
    recompute_count: u32,
}

impl ProfileEngine {
    /// Create an empty engine with default configuration and layout.
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            config: ProfileConfig::default(),
            layout: ChartLayout::default(),
            profile: TrackProfile::default(),
            scales: None,
            bounds: None,
            cursor: Cursor::new(),
            profile_dirty: false,
            scales_dirty: true,
            recompute_count: 0,
        }
    }

    /// Create an empty engine with a custom configuration.
    pub fn with_config(config: ProfileConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Replace the track. Points with invalid coordinates are dropped.
    pub fn set_points(&mut self, points: Vec<GpsPoint>) {
        self.points = retain_valid(points);
        self.bounds = compute_bounds(&self.points);
        self.mark_profile_dirty();
        debug!("[ProfileEngine] Track set: {} points", self.points.len());
    }

    /// Replace the track from a flat `[lat, lon, ele, lat, lon, ele, ...]` buffer.
    ///
    /// A trailing incomplete triple is ignored.
    pub fn set_points_flat(&mut self, flat: &[f64]) {
        let points = flat
            .chunks_exact(3)
            .map(|c| GpsPoint::with_elevation(c[0], c[1], c[2]))
            .collect();
        self.set_points(points);
    }

    /// Replace the track from a JSON array of points.
    ///
    /// On a decoding error the current track is kept.
    pub fn set_points_json(&mut self, json: &str) -> Result<()> {
        let points = points_from_json(json)?;
        self.set_points(points);
        Ok(())
    }

    /// Replace the rider configuration.
    ///
    /// An invalid configuration is rejected and the current one is kept.
    pub fn set_config(&mut self, config: ProfileConfig) -> Result<()> {
        if let Err(e) = config.validate() {
            warn!("[ProfileEngine] Rejected configuration: {}", e);
            return Err(e);
        }
        if config != self.config {
            self.config = config;
            self.mark_profile_dirty();
        }
        Ok(())
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    /// Resize the drawing surface.
    pub fn set_chart_size(&mut self, width: f64, height: f64) {
        if self.layout.width != width || self.layout.height != height {
            self.layout.width = width;
            self.layout.height = height;
            self.scales_dirty = true;
        }
    }

    pub fn set_color_mode(&mut self, color_mode: ColorMode) {
        if self.layout.color_mode != color_mode {
            self.layout.color_mode = color_mode;
            self.scales_dirty = true;
        }
    }

    pub fn set_layout(&mut self, layout: ChartLayout) {
        if self.layout != layout {
            self.layout = layout;
            self.scales_dirty = true;
        }
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    /// Drop the track and every derived result. Configuration and layout are kept.
    pub fn clear(&mut self) {
        self.points.clear();
        self.bounds = None;
        self.cursor = Cursor::new();
        self.mark_profile_dirty();
    }

    fn mark_profile_dirty(&mut self) {
        self.profile_dirty = true;
        self.scales_dirty = true;
    }

    // ========================================================================
    // Outputs
    // ========================================================================

    fn ensure_profile(&mut self) {
        if !self.profile_dirty {
            return;
        }
        self.profile = build_profile(&self.points, &self.config);
        self.profile_dirty = false;
        self.recompute_count += 1;
        info!(
            "[ProfileEngine] Recomputed profile #{}: {} segments",
            self.recompute_count,
            self.profile.segments.len()
        );
    }

    fn ensure_scales(&mut self) {
        self.ensure_profile();
        if !self.scales_dirty && self.scales.is_some() {
            return;
        }
        self.scales = Some(ChartScales::new(
            &self.layout,
            &self.profile,
            self.config.max_speed,
        ));
        self.scales_dirty = false;
        // The chart was rebuilt; the rule reappears on the next pointer move
        self.cursor.clear_rule();
    }

    /// The profile of the current track, rebuilt if any input changed.
    pub fn profile(&mut self) -> &TrackProfile {
        self.ensure_profile();
        &self.profile
    }

    pub fn profile_json(&mut self) -> Result<String> {
        self.ensure_profile();
        serde_json::to_string(&self.profile).map_err(ProfileError::serialization)
    }

    /// Chart scales for the current profile and layout.
    pub fn scales(&mut self) -> &ChartScales {
        self.ensure_scales();
        let (layout, profile, max_speed) = (&self.layout, &self.profile, self.config.max_speed);
        self.scales
            .get_or_insert_with(|| ChartScales::new(layout, profile, max_speed))
    }

    /// Draw the chart, with the cursor rule if the pointer has been over the plot.
    pub fn render(&mut self, renderer: &mut dyn ChartRenderer) {
        self.ensure_scales();
        if let Some(ref scales) = self.scales {
            render_chart(scales, &self.profile.segments, self.cursor.rule_x, renderer);
        }
    }

    /// Follow the pointer to pixel `x` and return the point now displayed.
    pub fn pointer_move(&mut self, x: f64) -> Option<CurrentPoint> {
        self.ensure_scales();
        if let Some(ref scales) = self.scales {
            self.cursor.pointer_move(x, scales, &self.profile.segments);
        }
        self.cursor.current
    }

    pub fn current_point(&self) -> Option<CurrentPoint> {
        self.cursor.current
    }

    /// Bounding box of the track, for fitting the map view.
    pub fn map_bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Track as `[lon, lat]` pairs, for drawing the route line on the map.
    pub fn route_line(&self) -> Vec<[f64; 2]> {
        route_line(&self.points)
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Get engine statistics.
    pub fn stats(&mut self) -> EngineStats {
        self.ensure_profile();
        EngineStats {
            point_count: self.points.len() as u32,
            segment_count: self.profile.segments.len() as u32,
            recompute_count: self.recompute_count,
        }
    }
}

impl Default for ProfileEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Engine statistics for monitoring.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct EngineStats {
    pub point_count: u32,
    pub segment_count: u32,
    /// Number of full profile rebuilds since the engine was created
    pub recompute_count: u32,
}

// ============================================================================
// Global Singleton
// ============================================================================

/// Global engine instance.
///
/// This singleton allows FFI calls to access a shared engine without
/// passing state back and forth across the FFI boundary.
pub static ENGINE: Lazy<Mutex<ProfileEngine>> = Lazy::new(|| Mutex::new(ProfileEngine::new()));

/// Get a lock on the global engine.
///
/// A poisoned lock is recovered: every engine method leaves the inputs
/// consistent, and derived state is rebuilt on demand.
pub fn with_engine<F, R>(f: F) -> R
where
    F: FnOnce(&mut ProfileEngine) -> R,
{
    let mut engine = ENGINE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut engine)
}

// ============================================================================
// FFI Exports
// ============================================================================

#[cfg(feature = "ffi")]
pub mod engine_ffi {
    use super::*;
    use crate::chart::DrawCommandRecorder;
    use log::{error, info};

    /// Initialize the engine (call once at app startup).
    #[uniffi::export]
    pub fn engine_init() {
        crate::init_logging();
        info!("[ProfileEngine] Initialized");
    }

    /// Clear the track and derived results.
    #[uniffi::export]
    pub fn engine_clear() {
        with_engine(|e| e.clear());
        info!("[ProfileEngine] Cleared");
    }

    /// Set the track from a flat `[lat, lon, ele, ...]` buffer.
    #[uniffi::export]
    pub fn engine_set_points(flat_coords: Vec<f64>) {
        info!("[ProfileEngine] Setting track ({} points)", flat_coords.len() / 3);
        with_engine(|e| e.set_points_flat(&flat_coords));
    }

    /// Set the track from a JSON array. Returns false if the JSON is malformed.
    #[uniffi::export]
    pub fn engine_set_points_json(json: String) -> bool {
        match with_engine(|e| e.set_points_json(&json)) {
            Ok(()) => true,
            Err(e) => {
                error!("[ProfileEngine] {}", e);
                false
            }
        }
    }

    /// Set the rider configuration. Returns false if it was rejected.
    #[uniffi::export]
    pub fn engine_set_config(config: ProfileConfig) -> bool {
        with_engine(|e| e.set_config(config)).is_ok()
    }

    #[uniffi::export]
    pub fn engine_get_config() -> ProfileConfig {
        with_engine(|e| e.config().clone())
    }

    #[uniffi::export]
    pub fn engine_set_chart_size(width: f64, height: f64) {
        with_engine(|e| e.set_chart_size(width, height));
    }

    #[uniffi::export]
    pub fn engine_set_color_mode(color_mode: ColorMode) {
        with_engine(|e| e.set_color_mode(color_mode));
    }

    #[uniffi::export]
    pub fn engine_get_profile() -> TrackProfile {
        with_engine(|e| e.profile().clone())
    }

    /// Get the profile as JSON. Returns an empty string if encoding fails.
    #[uniffi::export]
    pub fn engine_get_profile_json() -> String {
        with_engine(|e| e.profile_json()).unwrap_or_else(|e| {
            error!("[ProfileEngine] {}", e);
            String::new()
        })
    }

    /// Get the chart as a JSON array of drawing commands.
    #[uniffi::export]
    pub fn engine_render_json() -> String {
        let mut recorder = DrawCommandRecorder::new();
        with_engine(|e| e.render(&mut recorder));
        recorder.to_json().unwrap_or_else(|e| {
            error!("[ProfileEngine] {}", e);
            String::new()
        })
    }

    /// Move the chart pointer to pixel `x`.
    #[uniffi::export]
    pub fn engine_pointer_move(x: f64) -> Option<CurrentPoint> {
        with_engine(|e| e.pointer_move(x))
    }

    #[uniffi::export]
    pub fn engine_get_current_point() -> Option<CurrentPoint> {
        with_engine(|e| e.current_point())
    }

    #[uniffi::export]
    pub fn engine_get_map_bounds() -> Option<Bounds> {
        with_engine(|e| e.map_bounds())
    }

    /// Get the route line as flat `[lon, lat, lon, lat, ...]` coordinates.
    #[uniffi::export]
    pub fn engine_get_route_line() -> Vec<f64> {
        with_engine(|e| e.route_line().into_iter().flatten().collect())
    }

    /// Get engine statistics.
    #[uniffi::export]
    pub fn engine_get_stats() -> EngineStats {
        with_engine(|e| e.stats())
    }
}

// ============================================================================
// Tests
// ============================================================================
