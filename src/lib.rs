//! # Ride Profile
//!
//! Physical speed and duration profiles for GPS tracks.
//!
//! This library provides:
//! - Distance-bounded segmentation of a raw GPS track
//! - A power-balance speed model (power, rolling friction, drag, weight)
//! - A cumulative distance/time profile with whole-track aggregates
//! - Chart scales, colour mappings and drawing commands for an elevation chart
//! - Pointer-to-segment lookup for interactive charts
//!
//! ## Features
//!
//! - **`parallel`** - Compute segment speeds in parallel with rayon
//! - **`ffi`** - Enable FFI bindings for mobile platforms (iOS/Android)
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use ride_profile::{build_profile, GpsPoint, ProfileConfig};
//!
//! // A short climb heading north
//! let track: Vec<GpsPoint> = (0..20)
//!     .map(|i| GpsPoint::with_elevation(45.0 + i as f64 * 0.001, 6.0, i as f64 * 5.0))
//!     .collect();
//!
//! let profile = build_profile(&track, &ProfileConfig::default());
//!
//! println!(
//!     "{} segments, {:.0}m, +{}m, {}h{:02}",
//!     profile.segments.len(),
//!     profile.total_distance,
//!     profile.total_elevation_gain,
//!     profile.total_duration.hours,
//!     profile.total_duration.minutes,
//! );
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{ProfileError, Result};

// Geographic utilities (haversine, bounds)
pub mod geo_utils;

// Distance-bounded track segmentation
pub mod segmentation;
pub use segmentation::segment_points;

// Power-balance speed model
pub mod speed;
pub use speed::{required_power, solve_speed, DEFAULT_SPEED_STEP};

// Cumulative profile construction
pub mod profile;
pub use profile::{
    build_profile, points_from_json, retain_valid, ProfileConfig, TotalDuration, TrackProfile,
};

// Chart scales, colours, labels and drawing commands
pub mod chart;
pub use chart::{
    render_chart, ChartLayout, ChartRenderer, ChartScales, ColorMode, DrawCommand,
    DrawCommandRecorder, Margins,
};

// Pointer-to-segment lookup
pub mod cursor;
pub use cursor::{find_segment_index, lookup, CurrentPoint, Cursor};

// Stateful recompute pipeline
pub mod engine;
pub use engine::{with_engine, EngineStats, ProfileEngine, ENGINE};

// FFI bindings for mobile platforms (iOS/Android)
#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "ffi")]
uniffi::setup_scaffolding!();

/// Initialize logging for Android (only used in FFI)
#[cfg(all(feature = "ffi", target_os = "android"))]
pub(crate) fn init_logging() {
    use android_logger::Config;
    use log::LevelFilter;

    android_logger::init_once(
        Config::default()
            .with_max_level(LevelFilter::Debug)
            .with_tag("RideProfileRust"),
    );
}

#[cfg(all(feature = "ffi", not(target_os = "android")))]
pub(crate) fn init_logging() {
    // No-op on non-Android platforms
}

/// Milliseconds per hour, used to place cumulative hours on the time axis.
pub const MS_PER_HOUR: f64 = 3_600_000.0;

// ============================================================================
// Core Types
// ============================================================================

/// A GPS sample with latitude, longitude and elevation.
///
/// Deserialization accepts both the long field names and the short GPX-style
/// names (`lat`, `lon`, `ele`). A missing elevation defaults to 0.
///
/// # Example
/// ```
/// use ride_profile::GpsPoint;
/// let point = GpsPoint::with_elevation(45.9237, 6.8694, 1035.0); // Chamonix
/// assert_eq!(point.elevation, 1035.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct GpsPoint {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: f64,
    /// Elevation in meters
    #[serde(default, alias = "ele")]
    pub elevation: f64,
}

impl GpsPoint {
    /// Create a new GPS point at sea level.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: 0.0,
        }
    }

    /// Create a new GPS point with an elevation in meters.
    pub fn with_elevation(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.elevation.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// A GPS point placed on the cumulative profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Elevation in meters
    pub elevation: f64,
    /// Cumulative distance from the start of the track, in meters
    pub distance: f64,
    /// Cumulative travel time from the start of the track, in hours
    pub time: f64,
}

impl TrackPoint {
    /// Place a GPS point at a cumulative distance (m) and time (h).
    pub fn at(point: &GpsPoint, distance: f64, time: f64) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
            elevation: point.elevation,
            distance,
            time,
        }
    }

    /// The underlying GPS sample.
    pub fn point(&self) -> GpsPoint {
        GpsPoint::with_elevation(self.latitude, self.longitude, self.elevation)
    }

    /// Cumulative time in milliseconds, the unit of the chart's time axis.
    pub fn time_ms(&self) -> f64 {
        self.time * MS_PER_HOUR
    }
}

/// A stretch of track travelled at a single modelled speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Segment {
    /// Horizontal length in meters
    pub length: f64,
    /// Grade in percent (0 for a zero-length segment)
    pub slope: f64,
    /// Modelled speed in km/h, never above the configured maximum
    pub speed: f64,
    /// Travel time in hours, always > 0 for a segment in a profile
    pub duration: f64,
    pub start: TrackPoint,
    pub end: TrackPoint,
}

impl Segment {
    /// Whether a cumulative time in milliseconds falls in `[start, end)`.
    pub fn contains_time_ms(&self, time_ms: f64) -> bool {
        self.start.time_ms() <= time_ms && time_ms < self.end.time_ms()
    }
}

/// Bounding box for a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Get the center point of the bounds.
    pub fn center(&self) -> GpsPoint {
        GpsPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
