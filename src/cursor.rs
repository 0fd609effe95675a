//! Pointer-to-segment lookup for the interactive chart.
//!
//! Segments are chained, so their start times are sorted and the segment
//! under a time is found by binary search. A time belongs to the segment
//! whose half-open interval `[start, end)` contains it.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::chart::ChartScales;
use crate::Segment;

/// The track point shown for the pointer position: the speed of the segment
/// under the pointer and the coordinates where that segment starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct CurrentPoint {
    /// km/h
    pub speed: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl CurrentPoint {
    pub fn from_segment(segment: &Segment) -> Self {
        Self {
            speed: segment.speed,
            latitude: segment.start.latitude,
            longitude: segment.start.longitude,
        }
    }
}

/// Index of the segment whose `[start, end)` time interval contains `time_ms`.
///
/// Returns `None` before the first segment, at or after the end of the last
/// one, and for NaN.
pub fn find_segment_index(segments: &[Segment], time_ms: f64) -> Option<usize> {
    let after = segments.partition_point(|s| s.start.time_ms() <= time_ms);
    let index = after.checked_sub(1)?;
    segments[index].contains_time_ms(time_ms).then_some(index)
}

/// Look up the track point under pixel `pointer_x`.
///
/// Positions on or outside the left and right margins give `None`.
pub fn lookup(pointer_x: f64, scales: &ChartScales, segments: &[Segment]) -> Option<CurrentPoint> {
    if !scales.in_plot(pointer_x) {
        return None;
    }
    let time_ms = scales.invert_x(pointer_x);
    find_segment_index(segments, time_ms).map(|i| CurrentPoint::from_segment(&segments[i]))
}

/// The currently displayed track point and the rule drawn at the pointer.
///
/// Only pointer moves inside the plot area update it; moves over the margins
/// keep whatever was shown before.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub current: Option<CurrentPoint>,
    /// Pixel x of the cursor rule
    pub rule_x: Option<f64>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow the pointer to pixel `pointer_x`. Returns true if the cursor moved.
    pub fn pointer_move(&mut self, pointer_x: f64, scales: &ChartScales, segments: &[Segment]) -> bool {
        if !scales.in_plot(pointer_x) {
            return false;
        }

        let time_ms = scales.invert_x(pointer_x);
        self.rule_x = Some(scales.time_x(time_ms) + 0.5);
        if let Some(index) = find_segment_index(segments, time_ms) {
            let point = CurrentPoint::from_segment(&segments[index]);
            debug!(
                "[Cursor] x={:.1} -> segment {} ({:.1} km/h)",
                pointer_x, index, point.speed
            );
            self.current = Some(point);
        }
        true
    }

    /// Forget the rule position, e.g. after the chart was rebuilt.
    pub fn clear_rule(&mut self) {
        self.rule_x = None;
    }
}
