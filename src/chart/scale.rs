//! Continuous scales for the profile chart.
//!
//! [`LinearScale`] maps a numeric domain onto a pixel range, with optional
//! "nice" endpoint snapping and round-number ticks. [`TimeScale`] maps
//! milliseconds onto pixels and places ticks on UTC calendar boundaries
//! (seconds, minutes, hours, days, weeks, months, years).

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// Thresholds for picking 1, 2, 5 or 10 as the tick step mantissa
const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

const SECOND: f64 = 1_000.0;
const MINUTE: f64 = 60.0 * SECOND;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
const WEEK: f64 = 7.0 * DAY;
const MONTH: f64 = 30.0 * DAY;
const YEAR: f64 = 365.0 * DAY;

/// Round half up, matching browser `Math.round`.
#[inline]
pub(crate) fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// `(i1, i2, inc)`: ticks are `i * inc` for positive `inc`, `i / -inc` otherwise.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let scale = 10f64.powf(-power) / factor;
        i1 = round_half_up(start * scale);
        i2 = round_half_up(stop * scale);
        if i1 / scale < start {
            i1 += 1.0;
        }
        if i2 / scale > stop {
            i2 -= 1.0;
        }
        inc = -scale;
    } else {
        let scale = 10f64.powf(power) * factor;
        i1 = round_half_up(start / scale);
        i2 = round_half_up(stop / scale);
        if i1 * scale < start {
            i1 += 1.0;
        }
        if i2 * scale > stop {
            i2 -= 1.0;
        }
        inc = scale;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Signed tick increment: positive steps are `inc`, sub-unit steps `1 / -inc`.
fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    tick_spec(start, stop, count).2
}

/// Absolute tick step between `start` and `stop` for about `count` ticks.
pub fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    let reverse = stop < start;
    let inc = if reverse {
        tick_increment(stop, start, count)
    } else {
        tick_increment(start, stop, count)
    };
    let step = if inc < 0.0 { 1.0 / -inc } else { inc };
    if reverse {
        -step
    } else {
        step
    }
}

/// Round-number ticks (multiples of 1, 2 or 5 times a power of ten) between
/// `start` and `stop`, about `count` of them.
pub fn ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    if !(count > 0.0) || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (i1, i2, inc) = if reverse {
        tick_spec(stop, start, count)
    } else {
        tick_spec(start, stop, count)
    };
    if !(i2 >= i1) {
        return Vec::new();
    }

    let n = (i2 - i1) as usize + 1;
    let value = |i: f64| if inc < 0.0 { i / -inc } else { i * inc };
    if reverse {
        (0..n).map(|k| value(i2 - k as f64)).collect()
    } else {
        (0..n).map(|k| value(i1 + k as f64)).collect()
    }
}

// ============================================================================
// Linear Scale
// ============================================================================

/// A linear map from a two-value domain onto a two-value range.
///
/// A degenerate domain (or range, when inverting) maps everything to the
/// middle of the output interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Extend the domain outward to round values, for about `count` ticks.
    ///
    /// Non-finite or degenerate domains are left untouched.
    pub fn nice(mut self, count: f64) -> Self {
        let [d0, d1] = self.domain;
        if !d0.is_finite() || !d1.is_finite() || d0 == d1 || !(count > 0.0) {
            return self;
        }

        let reversed = d1 < d0;
        let (mut start, mut stop) = if reversed { (d1, d0) } else { (d0, d1) };
        let mut previous_step: Option<f64> = None;

        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if previous_step == Some(step) {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            previous_step = Some(step);
        }

        self.domain = if reversed { [stop, start] } else { [start, stop] };
        self
    }

    /// Map a domain value to the range.
    pub fn apply(&self, value: f64) -> f64 {
        let t = normalize(self.domain, value);
        self.range[0] + t * (self.range[1] - self.range[0])
    }

    /// Map a range value back to the domain.
    pub fn invert(&self, value: f64) -> f64 {
        let t = normalize(self.range, value);
        self.domain[0] + t * (self.domain[1] - self.domain[0])
    }

    /// Round-number ticks across the domain.
    pub fn ticks(&self, count: f64) -> Vec<f64> {
        ticks(self.domain[0], self.domain[1], count)
    }

    /// Distance between consecutive ticks for `count`.
    pub fn tick_step(&self, count: f64) -> f64 {
        tick_step(self.domain[0], self.domain[1], count)
    }
}

fn normalize([a, b]: [f64; 2], value: f64) -> f64 {
    let span = b - a;
    if span.is_nan() {
        f64::NAN
    } else if span == 0.0 {
        0.5
    } else {
        (value - a) / span
    }
}

// ============================================================================
// Time Scale
// ============================================================================

/// Calendar-aware tick spacing on a millisecond axis.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TickInterval {
    /// Multiples of `step` ms shifted by `offset` ms from the epoch
    Fixed { step: f64, offset: f64 },
    /// UTC midnights whose day-of-month minus one is a multiple of `step`
    Day(u32),
    /// First day of months whose zero-based index is a multiple of `step`
    Month(u32),
    /// First of January of years that are a multiple of `step`
    Year(i32),
}

/// Candidate tick spacings, in increasing duration order.
const TICK_INTERVALS: [(TickInterval, f64); 18] = [
    (TickInterval::Fixed { step: SECOND, offset: 0.0 }, SECOND),
    (TickInterval::Fixed { step: 5.0 * SECOND, offset: 0.0 }, 5.0 * SECOND),
    (TickInterval::Fixed { step: 15.0 * SECOND, offset: 0.0 }, 15.0 * SECOND),
    (TickInterval::Fixed { step: 30.0 * SECOND, offset: 0.0 }, 30.0 * SECOND),
    (TickInterval::Fixed { step: MINUTE, offset: 0.0 }, MINUTE),
    (TickInterval::Fixed { step: 5.0 * MINUTE, offset: 0.0 }, 5.0 * MINUTE),
    (TickInterval::Fixed { step: 15.0 * MINUTE, offset: 0.0 }, 15.0 * MINUTE),
    (TickInterval::Fixed { step: 30.0 * MINUTE, offset: 0.0 }, 30.0 * MINUTE),
    (TickInterval::Fixed { step: HOUR, offset: 0.0 }, HOUR),
    (TickInterval::Fixed { step: 3.0 * HOUR, offset: 0.0 }, 3.0 * HOUR),
    (TickInterval::Fixed { step: 6.0 * HOUR, offset: 0.0 }, 6.0 * HOUR),
    (TickInterval::Fixed { step: 12.0 * HOUR, offset: 0.0 }, 12.0 * HOUR),
    (TickInterval::Day(1), DAY),
    (TickInterval::Day(2), 2.0 * DAY),
    // 1970-01-01 was a Thursday; weeks start on Sunday the 4th
    (TickInterval::Fixed { step: WEEK, offset: 3.0 * DAY }, WEEK),
    (TickInterval::Month(1), MONTH),
    (TickInterval::Month(3), 3.0 * MONTH),
    (TickInterval::Year(1), YEAR),
];

fn pick_interval(start: f64, stop: f64, count: f64) -> TickInterval {
    let target = (stop - start).abs() / count;
    let i = TICK_INTERVALS.partition_point(|(_, duration)| *duration <= target);

    if i == TICK_INTERVALS.len() {
        let step = tick_step(start / YEAR, stop / YEAR, count).floor().max(1.0);
        return TickInterval::Year(step as i32);
    }
    if i == 0 {
        let step = tick_step(start, stop, count).floor().max(1.0);
        return TickInterval::Fixed { step, offset: 0.0 };
    }

    let (lower, lower_duration) = TICK_INTERVALS[i - 1];
    let (upper, upper_duration) = TICK_INTERVALS[i];
    if target / lower_duration < upper_duration / target {
        lower
    } else {
        upper
    }
}

fn month_start_ms(year: i32, month: u32) -> Option<f64> {
    let date = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis() as f64)
}

/// Tick instants of `interval` in `[start, stop)`.
fn interval_range(interval: TickInterval, start: f64, stop: f64) -> Vec<f64> {
    let mut out = Vec::new();
    match interval {
        TickInterval::Fixed { step, offset } => {
            let mut k = ((start - offset) / step).ceil();
            loop {
                let t = k * step + offset;
                if t >= stop {
                    break;
                }
                out.push(t);
                k += 1.0;
            }
        }
        TickInterval::Day(step) => {
            let mut day = (start / DAY).ceil();
            while day * DAY < stop {
                let t = day * DAY;
                let Some(date) = DateTime::from_timestamp_millis(t as i64) else {
                    break;
                };
                if (date.day() - 1) % step == 0 {
                    out.push(t);
                }
                day += 1.0;
            }
        }
        TickInterval::Month(step) => {
            let Some(first) = DateTime::from_timestamp_millis(start.floor() as i64) else {
                return out;
            };
            let (mut year, mut month) = (first.year(), first.month());
            while let Some(t) = month_start_ms(year, month) {
                if t >= stop {
                    break;
                }
                if t >= start && (month - 1) % step == 0 {
                    out.push(t);
                }
                month += 1;
                if month > 12 {
                    month = 1;
                    year += 1;
                }
            }
        }
        TickInterval::Year(step) => {
            let Some(first) = DateTime::from_timestamp_millis(start.floor() as i64) else {
                return out;
            };
            let mut year = first.year();
            while let Some(t) = month_start_ms(year, 1) {
                if t >= stop {
                    break;
                }
                if t >= start && year.rem_euclid(step) == 0 {
                    out.push(t);
                }
                year += 1;
            }
        }
    }
    out
}

/// A linear scale over milliseconds since the epoch with calendar ticks.
///
/// The domain is kept as given (no nice rounding), so the axis ends exactly
/// at the last cumulative time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    linear: LinearScale,
}

impl TimeScale {
    pub fn new(domain_ms: [f64; 2], range: [f64; 2]) -> Self {
        Self {
            linear: LinearScale::new(domain_ms, range),
        }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.linear.domain()
    }

    pub fn range(&self) -> [f64; 2] {
        self.linear.range()
    }

    pub fn apply(&self, time_ms: f64) -> f64 {
        self.linear.apply(time_ms)
    }

    pub fn invert(&self, px: f64) -> f64 {
        self.linear.invert(px)
    }

    /// Calendar-aligned ticks across the domain, about `count` of them.
    pub fn ticks(&self, count: f64) -> Vec<f64> {
        let [d0, d1] = self.linear.domain();
        if !(count > 0.0) || !d0.is_finite() || !d1.is_finite() {
            return Vec::new();
        }
        if d0 == d1 {
            return vec![d0];
        }

        let (start, stop) = if d1 < d0 { (d1, d0) } else { (d0, d1) };
        let interval = pick_interval(start, stop, count);
        let mut out = interval_range(interval, start, stop + 1.0);
        if d1 < d0 {
            out.reverse();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_round_numbers() {
        assert_eq!(ticks(0.0, 10.0, 10.0), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        assert_eq!(ticks(0.0, 1340.0, 5.0), vec![0.0, 200.0, 400.0, 600.0, 800.0, 1000.0, 1200.0]);
        assert_eq!(ticks(0.0, 1.0, 4.0), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert_eq!(ticks(10.0, 0.0, 2.0), vec![10.0, 5.0, 0.0]);
    }

    #[test]
    fn test_ticks_degenerate() {
        assert_eq!(ticks(3.0, 3.0, 10.0), vec![3.0]);
        assert!(ticks(0.0, 10.0, 0.0).is_empty());
        assert!(ticks(0.0, f64::NAN, 10.0).is_empty());
    }

    #[test]
    fn test_nice_snaps_endpoints() {
        let scale = LinearScale::new([0.0, 9_871.3], [40.0, 620.0]).nice(10.0);
        assert_eq!(scale.domain(), [0.0, 10_000.0]);

        let scale = LinearScale::new([0.13, 0.87], [0.0, 1.0]).nice(10.0);
        assert_eq!(scale.domain(), [0.1, 0.9]);

        let degenerate = LinearScale::new([0.0, 0.0], [0.0, 1.0]).nice(10.0);
        assert_eq!(degenerate.domain(), [0.0, 0.0]);
    }

    #[test]
    fn test_apply_and_invert() {
        let scale = LinearScale::new([0.0, 2_000.0], [380.0, 20.0]);
        assert_eq!(scale.apply(0.0), 380.0);
        assert_eq!(scale.apply(2_000.0), 20.0);
        assert_eq!(scale.apply(1_000.0), 200.0);
        assert_eq!(scale.invert(200.0), 1_000.0);
    }

    #[test]
    fn test_degenerate_domain_maps_to_middle() {
        let scale = LinearScale::new([0.0, 0.0], [40.0, 620.0]);
        assert_eq!(scale.apply(123.0), 330.0);
    }

    #[test]
    fn test_tick_step() {
        assert_eq!(tick_step(0.0, 100.0, 10.0), 10.0);
        assert_eq!(tick_step(0.0, 1.0, 10.0), 0.1);
        assert_eq!(tick_step(100.0, 0.0, 10.0), -10.0);
    }

    #[test]
    fn test_time_ticks_hourly() {
        // 4.2 hours over ~4 ticks -> hourly
        let scale = TimeScale::new([0.0, 4.2 * HOUR], [40.0, 620.0]);
        assert_eq!(scale.ticks(4.0), vec![0.0, HOUR, 2.0 * HOUR, 3.0 * HOUR, 4.0 * HOUR]);
    }

    #[test]
    fn test_time_ticks_minutes() {
        let scale = TimeScale::new([0.0, 50.0 * MINUTE], [40.0, 620.0]);
        let ticks = scale.ticks(5.0);
        assert_eq!(ticks.first(), Some(&0.0));
        assert_eq!(ticks[1], 15.0 * MINUTE);
        assert_eq!(ticks.len(), 4);
    }

    #[test]
    fn test_time_ticks_include_domain_end() {
        let scale = TimeScale::new([0.0, 2.0 * HOUR], [0.0, 100.0]);
        let ticks = scale.ticks(2.0);
        assert_eq!(ticks.last(), Some(&(2.0 * HOUR)));
    }

    #[test]
    fn test_time_ticks_sub_second() {
        let scale = TimeScale::new([0.0, 800.0], [0.0, 100.0]);
        assert_eq!(scale.ticks(4.0), vec![0.0, 200.0, 400.0, 600.0, 800.0]);
    }

    #[test]
    fn test_time_ticks_days_and_weeks() {
        let scale = TimeScale::new([0.0, 10.0 * DAY], [0.0, 500.0]);
        let daily = scale.ticks(10.0);
        assert_eq!(daily.len(), 11);
        assert_eq!(daily[1], DAY);

        let scale = TimeScale::new([0.0, 60.0 * DAY], [0.0, 500.0]);
        let weekly = scale.ticks(8.0);
        assert_eq!(weekly[0], 3.0 * DAY);
        assert_eq!(weekly[1], 10.0 * DAY);
    }

    #[test]
    fn test_time_ticks_months() {
        let scale = TimeScale::new([0.0, 360.0 * DAY], [0.0, 500.0]);
        let monthly = scale.ticks(12.0);
        assert_eq!(monthly[0], 0.0);
        assert_eq!(monthly[1], 31.0 * DAY); // February 1st 1970
        assert_eq!(monthly.len(), 12);
    }

    #[test]
    fn test_time_scale_invert() {
        let scale = TimeScale::new([0.0, 3_600_000.0], [40.0, 620.0]);
        assert_eq!(scale.invert(40.0), 0.0);
        assert_eq!(scale.invert(620.0), 3_600_000.0);
        assert_eq!(scale.apply(1_800_000.0), 330.0);
    }
}
