//! # Elevation Chart
//!
//! Scales, colours, labels and drawing commands for the profile chart: time
//! on the x axis, elevation on the y axis, one filled area per segment
//! coloured by speed or slope.

pub mod color;
pub mod format;
pub mod render;
pub mod scale;

pub use color::{DivergingScale, Rgb, Scheme, SequentialScale};
pub use format::{format_distance, format_duration_ms, format_tick};
pub use render::{
    render_chart, segment_region, Axis, AxisOrientation, ChartRenderer, DrawCommand,
    DrawCommandRecorder, FilledRegion, Rule, Tick,
};
pub use scale::{LinearScale, TimeScale};

use serde::{Deserialize, Serialize};

use crate::{Segment, TrackProfile};

/// Pixels per time/distance tick.
const X_TICK_SPACING: f64 = 80.0;
/// Pixels per elevation tick.
const Y_TICK_SPACING: f64 = 40.0;
/// Target tick count for nice distance endpoints.
const DISTANCE_NICE_COUNT: f64 = 10.0;

const ELEVATION_TITLE: &str = "\u{2191} meters";

// ============================================================================
// Layout
// ============================================================================

/// Space reserved around the plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Margins {
    /// Default: 20
    pub right: f64,
    /// Default: 40 (room for elevation labels)
    pub left: f64,
    /// Default: 20
    pub top: f64,
    /// Default: 20
    pub bottom: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            right: 20.0,
            left: 40.0,
            top: 20.0,
            bottom: 20.0,
        }
    }
}

/// Which quantity the segment fills encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
pub enum ColorMode {
    /// Sequential Spectral scale over `[0, max_speed]`
    #[default]
    Speed,
    /// Diverging red/yellow/green scale centred on a flat grade
    Slope,
}

/// Size and styling of the drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
#[serde(default)]
pub struct ChartLayout {
    /// Surface width in pixels.
    /// Default: 800
    pub width: f64,
    /// Surface height in pixels.
    /// Default: 300
    pub height: f64,
    pub margins: Margins,
    /// Default: Speed
    pub color_mode: ColorMode,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 300.0,
            margins: Margins::default(),
            color_mode: ColorMode::default(),
        }
    }
}

// ============================================================================
// Scales
// ============================================================================

/// Every scale the chart needs, derived from a layout and a profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartScales {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub color_mode: ColorMode,
    /// Cumulative time (ms) to x pixels
    pub time: TimeScale,
    /// Cumulative distance (m) to x pixels, with nice endpoints
    pub distance: LinearScale,
    /// Elevation (m) to y pixels, zero at the bottom
    pub elevation: LinearScale,
    pub slope_color: DivergingScale,
    pub speed_color: SequentialScale,
}

impl ChartScales {
    pub fn new(layout: &ChartLayout, profile: &TrackProfile, max_speed: f64) -> Self {
        let m = layout.margins;
        let x_range = [m.left, layout.width - m.right];
        let (min_slope, max_slope) = profile.slope_extent();

        Self {
            width: layout.width,
            height: layout.height,
            margins: m,
            color_mode: layout.color_mode,
            time: TimeScale::new([0.0, profile.max_time_ms()], x_range),
            distance: LinearScale::new([0.0, profile.profile_distance()], x_range)
                .nice(DISTANCE_NICE_COUNT),
            elevation: LinearScale::new(
                [0.0, profile.max_elevation()],
                [layout.height - m.bottom, m.top],
            ),
            slope_color: DivergingScale::new([max_slope, 0.0, min_slope], Scheme::RdYlGn),
            speed_color: SequentialScale::new([0.0, max_speed], Scheme::Spectral),
        }
    }

    /// Pixel x of a cumulative time in milliseconds.
    pub fn time_x(&self, time_ms: f64) -> f64 {
        self.time.apply(time_ms)
    }

    /// Cumulative time in milliseconds under pixel x.
    pub fn invert_x(&self, px: f64) -> f64 {
        self.time.invert(px)
    }

    /// Whether pixel x lies strictly inside the horizontal plot area.
    pub fn in_plot(&self, px: f64) -> bool {
        px > self.margins.left && px < self.width - self.margins.right
    }

    pub fn fill_color(&self, segment: &Segment) -> Rgb {
        match self.color_mode {
            ColorMode::Speed => self.speed_color.color(segment.speed),
            ColorMode::Slope => self.slope_color.color(segment.slope),
        }
    }

    fn x_tick_count(&self) -> f64 {
        self.width / X_TICK_SPACING
    }

    /// Bottom axis with calendar-aligned duration ticks.
    ///
    /// Every label is formatted against the last tick, so all labels share
    /// the same precision.
    pub fn time_axis(&self) -> Axis {
        let values = self.time.ticks(self.x_tick_count());
        let max_value = values.last().copied().unwrap_or(0.0);
        let ticks = values
            .into_iter()
            .map(|value| Tick {
                value,
                position: self.time.apply(value),
                label: format_duration_ms(value, max_value, false),
            })
            .collect();

        Axis {
            orientation: AxisOrientation::Bottom,
            offset: self.height - self.margins.bottom,
            ticks,
            grid_length: None,
            title: None,
            show_domain: true,
        }
    }

    /// Bottom axis in whole meters of cumulative distance.
    pub fn distance_axis(&self) -> Axis {
        let ticks = self
            .distance
            .ticks(self.x_tick_count())
            .into_iter()
            .map(|value| Tick {
                value,
                position: self.distance.apply(value),
                label: format_distance(value),
            })
            .collect();

        Axis {
            orientation: AxisOrientation::Bottom,
            offset: self.height - self.margins.bottom,
            ticks,
            grid_length: None,
            title: None,
            show_domain: true,
        }
    }

    /// Left elevation axis with faint grid lines across the plot.
    pub fn elevation_axis(&self) -> Axis {
        let count = self.height / Y_TICK_SPACING;
        let step = self.elevation.tick_step(count);
        let ticks = self
            .elevation
            .ticks(count)
            .into_iter()
            .map(|value| Tick {
                value,
                position: self.elevation.apply(value),
                label: format_tick(value, step),
            })
            .collect();

        Axis {
            orientation: AxisOrientation::Left,
            offset: self.margins.left,
            ticks,
            grid_length: Some(self.width - self.margins.left - self.margins.right),
            title: Some(ELEVATION_TITLE.to_string()),
            show_domain: false,
        }
    }
}
