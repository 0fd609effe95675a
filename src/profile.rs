//! # Track Profile
//!
//! Turns a raw GPS track into a cumulative speed/duration profile.
//!
//! 1. The track is cut into distance-bounded groups ([`segment_points`]).
//! 2. Each group gets a length, a slope, a modelled speed ([`solve_speed`],
//!    clamped to the configured maximum) and a duration.
//! 3. Groups that take no time (zero length, zero speed) are dropped.
//! 4. The remaining segments are chained: each one starts where the previous
//!    one ended, in both distance and time.
//!
//! Whole-track aggregates (distance, elevation gain, duration) are computed
//! alongside. The build is a pure function of its inputs: the same track and
//! configuration always give the same profile.
//!
//! ## Example
//! ```rust
//! use ride_profile::{build_profile, GpsPoint, ProfileConfig};
//!
//! let track: Vec<GpsPoint> = (0..30)
//!     .map(|i| GpsPoint::with_elevation(45.0 + i as f64 * 0.001, 6.0, 200.0))
//!     .collect();
//!
//! let config = ProfileConfig { min_distance: 500.0, ..ProfileConfig::default() };
//! let profile = build_profile(&track, &config);
//!
//! assert!(!profile.segments.is_empty());
//! assert_eq!(profile.segments[0].start.distance, 0.0);
//! assert_eq!(profile.total_elevation_gain, 0);
//! ```

use log::{info, warn};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{ProfileError, Result};
use crate::geo_utils::polyline_length;
use crate::segmentation::segment_points;
use crate::speed::{solve_speed, DEFAULT_SPEED_STEP};
use crate::{GpsPoint, Segment, TrackPoint};

// ============================================================================
// Configuration
// ============================================================================

/// Rider and track parameters for profile construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[serde(default)]
pub struct ProfileConfig {
    /// Sustained rider power in watts.
    /// Default: 150.0
    pub power: f64,

    /// Rolling friction coefficient.
    /// Default: 0.005 (road tyres on tarmac)
    pub friction: f64,

    /// Aerodynamic drag coefficient (Cx).
    /// Default: 0.3
    pub drag_coefficient: f64,

    /// Total weight of rider and bike in kg.
    /// Default: 80.0
    pub weight: f64,

    /// Distance a segment must exceed before the next one starts, in meters.
    /// Default: 1000.0
    pub min_distance: f64,

    /// Speed ceiling in km/h, applied to every segment.
    /// Default: 60.0
    pub max_speed: f64,

    /// Resolution of the speed search in km/h.
    /// Default: 0.5
    pub speed_step: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            power: 150.0,
            friction: 0.005,
            drag_coefficient: 0.3,
            weight: 80.0,
            min_distance: 1000.0,
            max_speed: 60.0,
            speed_step: DEFAULT_SPEED_STEP,
        }
    }
}

impl ProfileConfig {
    /// Check that every parameter is usable by the speed model.
    ///
    /// [`build_profile`] accepts any configuration and degrades gracefully;
    /// this is for callers that want to reject bad user input up front.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("power", self.power),
            ("friction", self.friction),
            ("drag_coefficient", self.drag_coefficient),
            ("weight", self.weight),
            ("min_distance", self.min_distance),
            ("max_speed", self.max_speed),
            ("speed_step", self.speed_step),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ProfileError::invalid_config(
                    field,
                    format!("must be finite, got {}", value),
                ));
            }
        }

        let positive = [
            ("drag_coefficient", self.drag_coefficient),
            ("weight", self.weight),
            ("max_speed", self.max_speed),
            ("speed_step", self.speed_step),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ProfileError::invalid_config(
                    field,
                    format!("must be positive, got {}", value),
                ));
            }
        }

        if self.friction < 0.0 {
            return Err(ProfileError::invalid_config(
                "friction",
                format!("must not be negative, got {}", self.friction),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Profile Types
// ============================================================================

/// A duration split into whole hours and rounded minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct TotalDuration {
    pub hours: u32,
    pub minutes: u32,
}

impl TotalDuration {
    /// Split a duration in hours. Minutes that round up to 60 carry into the hour.
    pub fn from_hours(hours: f64) -> Self {
        if !(hours > 0.0) || !hours.is_finite() {
            return Self::default();
        }
        let total_minutes = hours * 60.0;
        let mut whole_hours = (total_minutes / 60.0).floor() as u32;
        let mut minutes = (total_minutes % 60.0).round() as u32;
        if minutes == 60 {
            whole_hours += 1;
            minutes = 0;
        }
        Self {
            hours: whole_hours,
            minutes,
        }
    }
}

/// The output snapshot of a profile build.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct TrackProfile {
    /// Chained segments, all with a positive duration
    pub segments: Vec<Segment>,
    /// Sum of climbs between consecutive raw points, rounded to the meter
    pub total_elevation_gain: u32,
    /// Length of the raw track in meters
    pub total_distance: f64,
    /// Sum of segment durations
    pub total_duration: TotalDuration,
}

impl TrackProfile {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment boundaries in order: the first start, then every end.
    pub fn boundary_points(&self) -> Vec<TrackPoint> {
        let Some(first) = self.segments.first() else {
            return Vec::new();
        };
        std::iter::once(first.start)
            .chain(self.segments.iter().map(|s| s.end))
            .collect()
    }

    /// Cumulative distance at the end of the last segment, in meters.
    pub fn profile_distance(&self) -> f64 {
        self.segments.last().map(|s| s.end.distance).unwrap_or(0.0)
    }

    /// Cumulative time at the end of the last segment, in milliseconds.
    pub fn max_time_ms(&self) -> f64 {
        self.segments.last().map(|s| s.end.time_ms()).unwrap_or(0.0)
    }

    /// Highest boundary elevation, or 0 for an empty profile.
    pub fn max_elevation(&self) -> f64 {
        self.boundary_points()
            .iter()
            .map(|p| p.elevation)
            .fold(None, |acc: Option<f64>, e| Some(acc.map_or(e, |m| m.max(e))))
            .unwrap_or(0.0)
    }

    /// `(min, max)` slope over all segments, or `(0, 0)` for an empty profile.
    pub fn slope_extent(&self) -> (f64, f64) {
        if self.segments.is_empty() {
            return (0.0, 0.0);
        }
        self.segments
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s.slope), hi.max(s.slope))
            })
    }

    /// Total travel time in hours.
    pub fn duration_hours(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }
}

// ============================================================================
// Profile Construction
// ============================================================================

/// Build the cumulative profile of a track.
///
/// Never fails: an empty or single-point track gives an empty profile with zero
/// aggregates.
pub fn build_profile(points: &[GpsPoint], config: &ProfileConfig) -> TrackProfile {
    let groups = segment_points(points, config.min_distance);

    #[cfg(feature = "parallel")]
    let measured: Vec<Option<Segment>> = groups
        .par_iter()
        .map(|group| measure_group(group, config))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let measured: Vec<Option<Segment>> = groups
        .iter()
        .map(|group| measure_group(group, config))
        .collect();

    let segments = chain_segments(measured.into_iter().flatten().collect());

    let total_duration_hours: f64 = segments.iter().map(|s| s.duration).sum();
    let profile = TrackProfile {
        total_elevation_gain: elevation_gain(points),
        total_distance: polyline_length(points),
        total_duration: TotalDuration::from_hours(total_duration_hours),
        segments,
    };

    info!(
        "[TrackProfile] {} points -> {} segments, {:.0}m, +{}m, {}h{:02}",
        points.len(),
        profile.segments.len(),
        profile.total_distance,
        profile.total_elevation_gain,
        profile.total_duration.hours,
        profile.total_duration.minutes
    );

    profile
}

/// Decode a JSON array of points, dropping points with invalid coordinates.
///
/// Accepts `{"lat", "lon", "ele"}` or `{"latitude", "longitude", "elevation"}`
/// objects; a missing elevation is 0.
pub fn points_from_json(json: &str) -> Result<Vec<GpsPoint>> {
    let points: Vec<GpsPoint> = serde_json::from_str(json)?;
    Ok(retain_valid(points))
}

/// Drop points with non-finite or out-of-range coordinates.
pub fn retain_valid(points: Vec<GpsPoint>) -> Vec<GpsPoint> {
    let total = points.len();
    let valid: Vec<GpsPoint> = points.into_iter().filter(|p| p.is_valid()).collect();
    if valid.len() < total {
        warn!(
            "[TrackProfile] Dropped {} points with invalid coordinates",
            total - valid.len()
        );
    }
    valid
}

/// Length, slope, speed and duration of one group, placed at the origin.
///
/// Returns `None` when the group takes no time to ride.
fn measure_group(group: &[GpsPoint], config: &ProfileConfig) -> Option<Segment> {
    let (first, last) = (group.first()?, group.last()?);

    let length = polyline_length(group);
    let slope = if length == 0.0 {
        0.0
    } else {
        100.0 * (last.elevation - first.elevation) / length
    };
    let speed = solve_speed(
        config.power,
        config.friction,
        slope,
        config.weight,
        config.drag_coefficient,
        config.max_speed,
        config.speed_step,
    )
    .min(config.max_speed);
    let duration = if speed > 0.0 {
        (length / 1000.0) / speed
    } else {
        0.0
    };

    if !(duration > 0.0 && duration.is_finite()) {
        return None;
    }

    Some(Segment {
        length,
        slope,
        speed,
        duration,
        start: TrackPoint::at(first, 0.0, 0.0),
        end: TrackPoint::at(last, 0.0, 0.0),
    })
}

/// Place segments end to end along the distance and time axes.
fn chain_segments(mut segments: Vec<Segment>) -> Vec<Segment> {
    let (mut distance, mut time) = (0.0, 0.0);
    for segment in &mut segments {
        segment.start.distance = distance;
        segment.start.time = time;
        segment.end.distance = distance + segment.length;
        segment.end.time = time + segment.duration;
        distance = segment.end.distance;
        time = segment.end.time;
    }
    segments
}

/// Sum of positive elevation deltas between consecutive points, in whole meters.
fn elevation_gain(points: &[GpsPoint]) -> u32 {
    let gain: f64 = points
        .windows(2)
        .map(|w| w[1].elevation - w[0].elevation)
        .filter(|delta| *delta > 0.0)
        .sum();
    gain.round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MS_PER_HOUR;

    fn climb_then_descent() -> Vec<GpsPoint> {
        // 60 points ~111m apart: up 300m over the first half, down again after
        (0..60)
            .map(|i| {
                let elevation = if i < 30 { i as f64 * 10.0 } else { (59 - i) as f64 * 10.0 };
                GpsPoint::with_elevation(45.0 + i as f64 * 0.001, 6.0, elevation)
            })
            .collect()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ProfileConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_weight = ProfileConfig {
            weight: 0.0,
            ..ProfileConfig::default()
        };
        assert!(matches!(
            bad_weight.validate(),
            Err(ProfileError::InvalidConfig { ref field, .. }) if field == "weight"
        ));

        let bad_power = ProfileConfig {
            power: f64::NAN,
            ..ProfileConfig::default()
        };
        assert!(bad_power.validate().is_err());

        let bad_friction = ProfileConfig {
            friction: -0.1,
            ..ProfileConfig::default()
        };
        assert!(bad_friction.validate().is_err());
    }

    #[test]
    fn test_config_json_uses_defaults_for_missing_fields() {
        let config: ProfileConfig = serde_json::from_str(r#"{"power": 220}"#).unwrap();
        assert_eq!(config.power, 220.0);
        assert_eq!(config.min_distance, 1000.0);
        assert_eq!(config.max_speed, 60.0);
    }

    #[test]
    fn test_total_duration_split() {
        assert_eq!(TotalDuration::from_hours(0.0), TotalDuration::default());
        assert_eq!(
            TotalDuration::from_hours(1.5),
            TotalDuration { hours: 1, minutes: 30 }
        );
        assert_eq!(
            TotalDuration::from_hours(2.0 + 10.4 / 60.0),
            TotalDuration { hours: 2, minutes: 10 }
        );
        // 1h59.7 rounds up to 2h00
        assert_eq!(
            TotalDuration::from_hours(1.0 + 59.7 / 60.0),
            TotalDuration { hours: 2, minutes: 0 }
        );
        assert_eq!(TotalDuration::from_hours(f64::NAN), TotalDuration::default());
    }

    #[test]
    fn test_empty_and_single_point_tracks() {
        let config = ProfileConfig::default();

        let empty = build_profile(&[], &config);
        assert!(empty.is_empty());
        assert_eq!(empty.total_distance, 0.0);
        assert_eq!(empty.total_elevation_gain, 0);
        assert_eq!(empty.total_duration, TotalDuration::default());
        assert_eq!(empty.max_time_ms(), 0.0);
        assert_eq!(empty.max_elevation(), 0.0);
        assert_eq!(empty.slope_extent(), (0.0, 0.0));

        let single = build_profile(&[GpsPoint::with_elevation(45.0, 6.0, 500.0)], &config);
        assert!(single.is_empty());
        assert_eq!(single.total_elevation_gain, 0);
    }

    #[test]
    fn test_segments_are_chained() {
        let config = ProfileConfig {
            min_distance: 400.0,
            ..ProfileConfig::default()
        };
        let profile = build_profile(&climb_then_descent(), &config);

        assert!(profile.segments.len() > 5);
        assert_eq!(profile.segments[0].start.distance, 0.0);
        assert_eq!(profile.segments[0].start.time, 0.0);

        for pair in profile.segments.windows(2) {
            assert_eq!(pair[1].start.distance, pair[0].end.distance);
            assert_eq!(pair[1].start.time, pair[0].end.time);
            assert_eq!(pair[1].start.point(), pair[0].end.point());
        }
        for segment in &profile.segments {
            assert_eq!(segment.end.distance, segment.start.distance + segment.length);
            assert_eq!(segment.end.time, segment.start.time + segment.duration);
            assert!(segment.duration > 0.0);
            assert!(segment.speed <= config.max_speed);
        }

        let total_length: f64 = profile.segments.iter().map(|s| s.length).sum();
        assert!((profile.profile_distance() - total_length).abs() < 1e-6);
        assert!((profile.total_distance - total_length).abs() < 1e-6);
    }

    #[test]
    fn test_slopes_follow_terrain() {
        let config = ProfileConfig {
            min_distance: 400.0,
            ..ProfileConfig::default()
        };
        let profile = build_profile(&climb_then_descent(), &config);

        let first = &profile.segments[0];
        let last = profile.segments.last().unwrap();
        assert!(first.slope > 8.0 && first.slope < 10.0);
        assert!(last.slope < -8.0);
        assert!(first.speed < last.speed);
        assert_eq!(profile.total_elevation_gain, 290);
    }

    #[test]
    fn test_speed_clamped_to_max_speed() {
        let config = ProfileConfig {
            max_speed: 25.0,
            ..ProfileConfig::default()
        };
        let profile = build_profile(&climb_then_descent(), &config);
        assert!(profile.segments.iter().all(|s| s.speed <= 25.0));
        assert!(profile.segments.iter().any(|s| s.speed == 25.0));
    }

    #[test]
    fn test_zero_power_drops_every_segment() {
        let config = ProfileConfig {
            power: 0.0,
            ..ProfileConfig::default()
        };
        let profile = build_profile(&climb_then_descent(), &config);
        assert!(profile.is_empty());
        assert_eq!(profile.total_duration, TotalDuration::default());
        // Aggregates over the raw track do not depend on segmentation
        assert!(profile.total_distance > 6000.0);
        assert_eq!(profile.total_elevation_gain, 290);
    }

    #[test]
    fn test_stationary_points_are_dropped() {
        let p = GpsPoint::with_elevation(45.0, 6.0, 100.0);
        let profile = build_profile(&[p, p, p, p], &ProfileConfig::default());
        assert!(profile.is_empty());
    }

    #[test]
    fn test_total_duration_matches_segments() {
        let profile = build_profile(&climb_then_descent(), &ProfileConfig::default());
        assert_eq!(
            profile.total_duration,
            TotalDuration::from_hours(profile.duration_hours())
        );
        assert_eq!(profile.duration_hours() * MS_PER_HOUR, profile.max_time_ms());
    }

    #[test]
    fn test_build_is_idempotent() {
        let track = climb_then_descent();
        let config = ProfileConfig::default();
        assert_eq!(build_profile(&track, &config), build_profile(&track, &config));
    }

    #[test]
    fn test_points_from_json() {
        let json = r#"[
            {"lat": 45.0, "lon": 6.0, "ele": 100},
            {"lat": 45.001, "lon": 6.0},
            {"lat": 95.0, "lon": 6.0, "ele": 100}
        ]"#;
        let points = points_from_json(json).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].elevation, 0.0);

        assert!(matches!(
            points_from_json("{not json"),
            Err(ProfileError::InvalidInput { .. })
        ));
    }
}
