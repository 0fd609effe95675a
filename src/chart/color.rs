//! Colour mappings for segment fills.
//!
//! Both schemes are 11-stop ColorBrewer palettes interpolated with a uniform
//! cubic B-spline per RGB channel, so colours change smoothly across stops.

use serde::{Deserialize, Serialize};

/// ColorBrewer RdYlGn, red to green.
const RD_YL_GN: [[u8; 3]; 11] = [
    [0xa5, 0x00, 0x26],
    [0xd7, 0x30, 0x27],
    [0xf4, 0x6d, 0x43],
    [0xfd, 0xae, 0x61],
    [0xfe, 0xe0, 0x8b],
    [0xff, 0xff, 0xbf],
    [0xd9, 0xef, 0x8b],
    [0xa6, 0xd9, 0x6a],
    [0x66, 0xbd, 0x63],
    [0x1a, 0x98, 0x50],
    [0x00, 0x68, 0x37],
];

/// ColorBrewer Spectral, dark red through yellow to purple-blue.
const SPECTRAL: [[u8; 3]; 11] = [
    [0x9e, 0x01, 0x42],
    [0xd5, 0x3e, 0x4f],
    [0xf4, 0x6d, 0x43],
    [0xfd, 0xae, 0x61],
    [0xfe, 0xe0, 0x8b],
    [0xff, 0xff, 0xbf],
    [0xe6, 0xf5, 0x98],
    [0xab, 0xdd, 0xa4],
    [0x66, 0xc2, 0xa5],
    [0x32, 0x88, 0xbd],
    [0x5e, 0x4f, 0xa2],
];

/// An opaque sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS functional notation, e.g. `rgb(165, 0, 38)`.
    pub fn to_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// Hex notation, e.g. `#a50026`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Colour palettes available to the scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scheme {
    RdYlGn,
    Spectral,
}

impl Scheme {
    fn stops(&self) -> &'static [[u8; 3]; 11] {
        match self {
            Scheme::RdYlGn => &RD_YL_GN,
            Scheme::Spectral => &SPECTRAL,
        }
    }

    /// Colour at `t` in `[0, 1]`; values outside are clamped, NaN maps to the middle.
    pub fn interpolate(&self, t: f64) -> Rgb {
        let stops = self.stops();
        let channel = |c: usize| {
            let values: [f64; 11] = std::array::from_fn(|i| stops[i][c] as f64);
            to_channel(basis_spline(&values, t))
        };
        Rgb::new(channel(0), channel(1), channel(2))
    }
}

fn basis(t1: f64, v0: f64, v1: f64, v2: f64, v3: f64) -> f64 {
    let t2 = t1 * t1;
    let t3 = t2 * t1;
    ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}

/// Uniform B-spline through `values`, passing exactly through both ends.
fn basis_spline(values: &[f64], t: f64) -> f64 {
    let n = values.len() - 1;
    let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
    let i = if t >= 1.0 { n - 1 } else { (t * n as f64).floor() as usize };

    let v1 = values[i];
    let v2 = values[i + 1];
    let v0 = if i > 0 { values[i - 1] } else { 2.0 * v1 - v2 };
    let v3 = if i < n - 1 { values[i + 2] } else { 2.0 * v2 - v1 };
    basis((t - i as f64 / n as f64) * n as f64, v0, v1, v2, v3)
}

fn to_channel(value: f64) -> u8 {
    (value + 0.5).floor().clamp(0.0, 255.0) as u8
}

// ============================================================================
// Scales
// ============================================================================

/// Maps `[lo, hi]` linearly onto a palette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SequentialScale {
    domain: [f64; 2],
    scheme: Scheme,
}

impl SequentialScale {
    pub fn new(domain: [f64; 2], scheme: Scheme) -> Self {
        Self { domain, scheme }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn color(&self, value: f64) -> Rgb {
        let [t0, t1] = self.domain;
        let k = if t0 == t1 { 0.0 } else { 1.0 / (t1 - t0) };
        self.scheme.interpolate((value - t0) * k)
    }
}

/// Maps `[lo, mid]` onto the first half of a palette and `[mid, hi]` onto
/// the second half, so `mid` always gets the central colour.
///
/// The domain may run in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DivergingScale {
    domain: [f64; 3],
    scheme: Scheme,
}

impl DivergingScale {
    pub fn new(domain: [f64; 3], scheme: Scheme) -> Self {
        Self { domain, scheme }
    }

    pub fn domain(&self) -> [f64; 3] {
        self.domain
    }

    pub fn color(&self, value: f64) -> Rgb {
        let [t0, t1, t2] = self.domain;
        let k10 = if t0 == t1 { 0.0 } else { 0.5 / (t1 - t0) };
        let k21 = if t1 == t2 { 0.0 } else { 0.5 / (t2 - t1) };
        let s = if t1 < t0 { -1.0 } else { 1.0 };
        let k = if s * value < s * t1 { k10 } else { k21 };
        self.scheme.interpolate(0.5 + (value - t1) * k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spline_hits_end_stops() {
        assert_eq!(Scheme::Spectral.interpolate(0.0), Rgb::new(0x9e, 0x01, 0x42));
        assert_eq!(Scheme::Spectral.interpolate(1.0), Rgb::new(0x5e, 0x4f, 0xa2));
        assert_eq!(Scheme::RdYlGn.interpolate(-3.0), Rgb::new(0xa5, 0x00, 0x26));
        assert_eq!(Scheme::RdYlGn.interpolate(7.0), Rgb::new(0x00, 0x68, 0x37));
    }

    #[test]
    fn test_spline_smooths_middle_stop() {
        // Blend of stops 4, 5 and 6 with weights 1:4:1
        assert_eq!(Scheme::RdYlGn.interpolate(0.5), Rgb::new(249, 247, 174));
        assert_eq!(Scheme::Spectral.interpolate(0.5), Rgb::new(251, 248, 176));
    }

    #[test]
    fn test_css_and_hex() {
        let c = Rgb::new(165, 0, 38);
        assert_eq!(c.to_css(), "rgb(165, 0, 38)");
        assert_eq!(c.to_hex(), "#a50026");
    }

    #[test]
    fn test_sequential_scale() {
        let scale = SequentialScale::new([0.0, 60.0], Scheme::Spectral);
        assert_eq!(scale.color(0.0), Scheme::Spectral.interpolate(0.0));
        assert_eq!(scale.color(60.0), Scheme::Spectral.interpolate(1.0));
        assert_eq!(scale.color(30.0), Scheme::Spectral.interpolate(0.5));
        assert_eq!(scale.color(90.0), Scheme::Spectral.interpolate(1.0));
    }

    #[test]
    fn test_diverging_scale_reversed_domain() {
        // Steepest climb first: climbs are red, descents green
        let scale = DivergingScale::new([12.0, 0.0, -8.0], Scheme::RdYlGn);
        assert_eq!(scale.color(12.0), Rgb::new(0xa5, 0x00, 0x26));
        assert_eq!(scale.color(0.0), Scheme::RdYlGn.interpolate(0.5));
        assert_eq!(scale.color(-8.0), Rgb::new(0x00, 0x68, 0x37));
        assert_eq!(scale.color(6.0), Scheme::RdYlGn.interpolate(0.25));
        assert_eq!(scale.color(-4.0), Scheme::RdYlGn.interpolate(0.75));
    }

    #[test]
    fn test_diverging_scale_flat_domain() {
        let scale = DivergingScale::new([0.0, 0.0, 0.0], Scheme::RdYlGn);
        assert_eq!(scale.color(0.0), Scheme::RdYlGn.interpolate(0.5));
    }
}
