//! Distance-bounded track segmentation.
//!
//! A track is cut into groups of consecutive points. A group is closed once
//! the distance travelled inside it exceeds the split threshold, and the next
//! group starts on the point that closed it, so neighbouring groups share
//! exactly one boundary point and no distance is lost between them.

use log::debug;

use crate::geo_utils::haversine_distance;
use crate::GpsPoint;

/// Partition an ordered track into distance-bounded groups of points.
///
/// Each point is appended to the current group before the split decision.
/// The group is closed when its accumulated distance exceeds `min_distance`
/// meters and it holds more than one point; the closing point then also opens
/// the next group.
///
/// - An empty track yields no groups.
/// - A single point yields one single-point group.
/// - When the last point closes a group, a trailing single-point group is left
///   behind. It has zero length and is dropped by the profile builder.
/// - `min_distance <= 0` still terminates: every group holds at least two points.
///
/// # Example
/// ```
/// use ride_profile::{segment_points, GpsPoint};
///
/// let track: Vec<GpsPoint> = (0..5).map(|i| GpsPoint::new(45.0 + i as f64 * 0.001, 6.0)).collect();
/// let groups = segment_points(&track, 150.0);
///
/// // ~111m per step: a group closes every two steps
/// assert_eq!(groups.len(), 3);
/// assert_eq!(groups[0].len(), 3);
/// assert_eq!(groups[0][2], groups[1][0]);
/// ```
pub fn segment_points(points: &[GpsPoint], min_distance: f64) -> Vec<Vec<GpsPoint>> {
    let Some(first) = points.first() else {
        return Vec::new();
    };

    let mut groups: Vec<Vec<GpsPoint>> = Vec::new();
    let mut current: Vec<GpsPoint> = vec![*first];
    let mut running_distance = 0.0;

    for pair in points.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        running_distance += haversine_distance(prev, cur);
        current.push(*cur);

        if running_distance > min_distance && current.len() > 1 {
            groups.push(std::mem::replace(&mut current, vec![*cur]));
            running_distance = 0.0;
        }
    }
    groups.push(current);

    debug!(
        "[Segmentation] {} points -> {} groups (min distance {:.0}m)",
        points.len(),
        groups.len(),
        min_distance
    );

    groups
}
