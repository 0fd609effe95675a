//! Drawing primitives for the elevation chart.
//!
//! The chart is described as a short sequence of commands (filled segment
//! areas, two axes, an optional cursor rule) sent to a [`ChartRenderer`].
//! Platforms implement the trait on top of their own canvas; the
//! [`DrawCommandRecorder`] keeps the commands as values, for tests or for
//! shipping the chart across the FFI boundary as JSON.

use serde::{Deserialize, Serialize};

use super::color::Rgb;
use super::ChartScales;
use crate::error::{ProfileError, Result};
use crate::Segment;

// ============================================================================
// Primitives
// ============================================================================

/// A closed polygon in pixel coordinates with a solid fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilledRegion {
    /// Vertices as `[x, y]`, in drawing order
    pub polygon: Vec<[f64; 2]>,
    pub fill: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisOrientation {
    /// Horizontal axis with labels below the line
    Bottom,
    /// Vertical axis with labels left of the line
    Left,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Domain value of the tick
    pub value: f64,
    /// Pixel position along the axis
    pub position: f64,
    pub label: String,
}

/// An axis line with its ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub orientation: AxisOrientation,
    /// Pixel position of the axis line across its orientation
    /// (y for a bottom axis, x for a left axis)
    pub offset: f64,
    pub ticks: Vec<Tick>,
    /// Length of grid lines extended from each tick into the plot, if any
    pub grid_length: Option<f64>,
    pub title: Option<String>,
    /// Whether the axis line itself is drawn
    pub show_domain: bool,
}

/// Vertical cursor line at `x`, from `y1` down to `y2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub x: f64,
    pub y1: f64,
    pub y2: f64,
}

// ============================================================================
// Renderer
// ============================================================================

/// A drawing surface for the chart.
pub trait ChartRenderer {
    /// Called once before anything is drawn.
    fn begin(&mut self, _width: f64, _height: f64) {}

    fn fill_region(&mut self, region: &FilledRegion);

    fn draw_axis(&mut self, axis: &Axis);

    fn draw_rule(&mut self, rule: &Rule);
}

/// A recorded drawing command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DrawCommand {
    Begin { width: f64, height: f64 },
    FillRegion(FilledRegion),
    DrawAxis(Axis),
    DrawRule(Rule),
}

/// Renderer that keeps every command it receives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawCommandRecorder {
    pub commands: Vec<DrawCommand>,
}

impl DrawCommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regions(&self) -> impl Iterator<Item = &FilledRegion> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillRegion(region) => Some(region),
            _ => None,
        })
    }

    pub fn axes(&self) -> impl Iterator<Item = &Axis> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::DrawAxis(axis) => Some(axis),
            _ => None,
        })
    }

    pub fn rule(&self) -> Option<&Rule> {
        self.commands.iter().find_map(|c| match c {
            DrawCommand::DrawRule(rule) => Some(rule),
            _ => None,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.commands).map_err(ProfileError::serialization)
    }
}

impl ChartRenderer for DrawCommandRecorder {
    fn begin(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::Begin { width, height });
    }

    fn fill_region(&mut self, region: &FilledRegion) {
        self.commands.push(DrawCommand::FillRegion(region.clone()));
    }

    fn draw_axis(&mut self, axis: &Axis) {
        self.commands.push(DrawCommand::DrawAxis(axis.clone()));
    }

    fn draw_rule(&mut self, rule: &Rule) {
        self.commands.push(DrawCommand::DrawRule(*rule));
    }
}

// ============================================================================
// Chart
// ============================================================================

/// Area of one segment: from the zero-elevation baseline up to the start and
/// end elevations, spanning the segment's time interval.
pub fn segment_region(scales: &ChartScales, segment: &Segment) -> FilledRegion {
    let x0 = scales.time_x(segment.start.time_ms());
    let x1 = scales.time_x(segment.end.time_ms());
    let baseline = scales.elevation.apply(0.0);
    FilledRegion {
        polygon: vec![
            [x0, scales.elevation.apply(segment.start.elevation)],
            [x1, scales.elevation.apply(segment.end.elevation)],
            [x1, baseline],
            [x0, baseline],
        ],
        fill: scales.fill_color(segment),
    }
}

/// Draw the chart: one filled area per segment, the time axis, the elevation
/// axis and, when `rule_x` is set, the cursor rule across the full height.
pub fn render_chart(
    scales: &ChartScales,
    segments: &[Segment],
    rule_x: Option<f64>,
    renderer: &mut dyn ChartRenderer,
) {
    renderer.begin(scales.width, scales.height);
    for segment in segments {
        renderer.fill_region(&segment_region(scales, segment));
    }
    renderer.draw_axis(&scales.time_axis());
    renderer.draw_axis(&scales.elevation_axis());
    if let Some(x) = rule_x {
        renderer.draw_rule(&Rule {
            x,
            y1: scales.height,
            y2: 0.0,
        });
    }
}
