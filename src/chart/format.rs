//! Axis label formatting.

use super::scale::round_half_up;

const MS_PER_SECOND: f64 = 1_000.0;
const MS_PER_MINUTE: f64 = 60.0 * MS_PER_SECOND;
const MS_PER_HOUR: f64 = 60.0 * MS_PER_MINUTE;
const MS_PER_DAY: f64 = 24.0 * MS_PER_HOUR;

/// Human label for a duration in milliseconds, e.g. `"1 h 25 m"`.
///
/// `max_value` is the largest value shown on the same axis and controls the
/// precision: seconds only appear when it is under an hour, milliseconds only
/// when it is under five seconds. Zero components are omitted, so a zero
/// duration gives an empty label. Days are split out only when `show_days` is
/// set; otherwise hours keep counting past 24.
///
/// # Example
/// ```
/// use ride_profile::chart::format_duration_ms;
///
/// assert_eq!(format_duration_ms(3_661_000.0, 7_200_000.0, false), "1 h 1 m");
/// assert_eq!(format_duration_ms(-500.0, 1_000.0, false), "-500 ms");
/// ```
pub fn format_duration_ms(ms: f64, max_value: f64, show_days: bool) -> String {
    let negative = ms < 0.0;
    let mut rest = ms.abs();

    let days = if show_days {
        let d = (rest / MS_PER_DAY).trunc();
        rest -= d * MS_PER_DAY;
        d
    } else {
        0.0
    };
    let hours = (rest / MS_PER_HOUR).trunc();
    rest -= hours * MS_PER_HOUR;
    let minutes = (rest / MS_PER_MINUTE).trunc();
    rest -= minutes * MS_PER_MINUTE;
    let seconds = (rest / MS_PER_SECOND).trunc();
    rest -= seconds * MS_PER_SECOND;

    let mut parts: Vec<String> = Vec::new();
    if days != 0.0 {
        parts.push(format!("{}d", days));
    }
    if hours != 0.0 {
        parts.push(format!("{} h", hours));
    }
    if minutes != 0.0 {
        parts.push(format!("{} m", minutes));
    }
    if max_value < MS_PER_HOUR && seconds != 0.0 {
        parts.push(format!("{} s", seconds));
    }
    if max_value < 5.0 * MS_PER_SECOND && rest != 0.0 {
        parts.push(format!("{} ms", rest));
    }

    let label = parts.join(" ");
    if negative {
        format!("-{}", label)
    } else {
        label
    }
}

/// Whole-number label for the distance axis, without grouping.
pub fn format_distance(meters: f64) -> String {
    with_sign(round_half_up(meters), &format!("{:.0}", round_half_up(meters).abs()))
}

/// Label for a linear tick, with thousands separators and just enough
/// decimals to tell ticks `step` apart.
pub fn format_tick(value: f64, step: f64) -> String {
    let precision = precision_fixed(step);
    let digits = format!("{:.*}", precision, value.abs());
    let (integer, fraction) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut grouped = group_thousands(integer);
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    with_sign(value, &grouped)
}

/// Decimal places needed to show multiples of `step`.
fn precision_fixed(step: f64) -> usize {
    let step = step.abs();
    if !(step > 0.0) || !step.is_finite() {
        return 0;
    }
    let scientific = format!("{:e}", step);
    let exponent = scientific
        .split_once('e')
        .and_then(|(_, e)| e.parse::<i32>().ok())
        .unwrap_or(0);
    (-exponent).max(0) as usize
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Prefix a typographic minus when the value is negative and the digits are
/// not all zero.
fn with_sign(value: f64, digits: &str) -> String {
    let is_zero = digits.chars().all(|c| !c.is_ascii_digit() || c == '0');
    if value < 0.0 && !is_zero {
        format!("\u{2212}{}", digits)
    } else {
        digits.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_hides_seconds_on_long_axes() {
        assert_eq!(format_duration_ms(3_661_000.0, 7_200_000.0, false), "1 h 1 m");
        assert_eq!(format_duration_ms(3_661_000.0, 3_000_000.0, false), "1 h 1 m 1 s");
    }

    #[test]
    fn test_duration_negative_milliseconds() {
        assert_eq!(format_duration_ms(-500.0, 1_000.0, false), "-500 ms");
    }

    #[test]
    fn test_duration_short_axes() {
        assert_eq!(format_duration_ms(90_000.0, 1_800_000.0, false), "1 m 30 s");
        assert_eq!(format_duration_ms(1_250.0, 4_000.0, false), "1 s 250 ms");
        assert_eq!(format_duration_ms(1_250.0, 6_000.0, false), "1 s");
    }

    #[test]
    fn test_duration_zero_is_empty() {
        assert_eq!(format_duration_ms(0.0, 7_200_000.0, false), "");
    }

    #[test]
    fn test_duration_days() {
        let ms = 25.0 * MS_PER_HOUR + 5.0 * MS_PER_MINUTE;
        assert_eq!(format_duration_ms(ms, ms, true), "1d 1 h 5 m");
        assert_eq!(format_duration_ms(ms, ms, false), "25 h 5 m");
        assert_eq!(format_duration_ms(2.0 * MS_PER_HOUR, ms, true), "2 h");
    }

    #[test]
    fn test_distance_labels() {
        assert_eq!(format_distance(2500.0), "2500");
        assert_eq!(format_distance(12_345.6), "12346");
        assert_eq!(format_distance(0.0), "0");
    }

    #[test]
    fn test_tick_labels() {
        assert_eq!(format_tick(1250.0, 250.0), "1,250");
        assert_eq!(format_tick(1_234_567.0, 500_000.0), "1,234,567");
        assert_eq!(format_tick(200.0, 50.0), "200");
        assert_eq!(format_tick(0.5, 0.5), "0.5");
        assert_eq!(format_tick(1.25, 0.05), "1.25");
        assert_eq!(format_tick(-20.0, 10.0), "\u{2212}20");
        assert_eq!(format_tick(-0.0, 10.0), "0");
    }

    #[test]
    fn test_precision_fixed() {
        assert_eq!(precision_fixed(100.0), 0);
        assert_eq!(precision_fixed(1.0), 0);
        assert_eq!(precision_fixed(0.2), 1);
        assert_eq!(precision_fixed(0.05), 2);
        assert_eq!(precision_fixed(0.0), 0);
    }
}
