//! # Geographic Utilities
//!
//! Core geographic computation utilities for GPS track profiles.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance`] | Great-circle distance between two GPS points |
//! | [`polyline_length`] | Total length of a GPS track in meters |
//! | [`compute_bounds`] | Bounding box of a GPS track |
//! | [`route_line`] | `[lon, lat]` pairs for a map route line |
//!
//! ## Example
//!
//! ```rust
//! use ride_profile::{GpsPoint, geo_utils};
//!
//! let track = vec![
//!     GpsPoint::new(45.9237, 6.8694),
//!     GpsPoint::new(45.9250, 6.8710),
//!     GpsPoint::new(45.9270, 6.8730),
//! ];
//!
//! let length = geo_utils::polyline_length(&track);
//! println!("Track length: {:.0}m", length);
//!
//! let bounds = geo_utils::compute_bounds(&track).unwrap();
//! println!("Bounds: {:.4}N to {:.4}N", bounds.min_lat, bounds.max_lat);
//! ```
//!
//! ## Algorithm Notes
//!
//! The haversine formula calculates the great-circle distance between two points
//! on a sphere. Elevation is ignored: every length in a profile is a horizontal
//! length. All functions expect WGS84 coordinates in degrees.

use geo::{Distance, Haversine, Point};

use crate::{Bounds, GpsPoint};

// =============================================================================
// Distance Functions
// =============================================================================

/// Calculate the great-circle distance between two GPS points using the Haversine formula.
///
/// Returns the distance in meters along the Earth's surface. Elevation is ignored.
///
/// # Example
///
/// ```rust
/// use ride_profile::{GpsPoint, geo_utils};
///
/// let london = GpsPoint::new(51.5074, -0.1278);
/// let paris = GpsPoint::new(48.8566, 2.3522);
///
/// let distance = geo_utils::haversine_distance(&london, &paris);
/// assert!((distance - 343_560.0).abs() < 1000.0); // ~344 km
/// ```
#[inline]
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}

/// Calculate the total length of a polyline (GPS track) in meters.
///
/// Sums the haversine distance between consecutive points. Empty or single-point
/// tracks return 0.0.
pub fn polyline_length(points: &[GpsPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

// =============================================================================
// Map Helpers
// =============================================================================

/// Compute the bounding box of a GPS track.
///
/// Returns `None` for an empty track.
///
/// # Example
///
/// ```rust
/// use ride_profile::{GpsPoint, geo_utils};
///
/// let track = vec![
///     GpsPoint::new(45.90, 6.80),
///     GpsPoint::new(45.95, 6.85),
/// ];
///
/// let bounds = geo_utils::compute_bounds(&track).unwrap();
/// assert_eq!(bounds.min_lat, 45.90);
/// assert_eq!(bounds.max_lng, 6.85);
/// ```
pub fn compute_bounds(points: &[GpsPoint]) -> Option<Bounds> {
    if points.is_empty() {
        return None;
    }

    let mut min_lat = f64::MAX;
    let mut max_lat = f64::MIN;
    let mut min_lng = f64::MAX;
    let mut max_lng = f64::MIN;

    for p in points {
        min_lat = min_lat.min(p.latitude);
        max_lat = max_lat.max(p.latitude);
        min_lng = min_lng.min(p.longitude);
        max_lng = max_lng.max(p.longitude);
    }

    Some(Bounds {
        min_lat,
        max_lat,
        min_lng,
        max_lng,
    })
}

/// Track coordinates as `[longitude, latitude]` pairs (GeoJSON order), ready
/// to be drawn as a route line by a map layer.
pub fn route_line(points: &[GpsPoint]) -> Vec<[f64; 2]> {
    points.iter().map(|p| [p.longitude, p.latitude]).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
