//! End-to-end tests: raw track in, profile, chart and cursor out.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ride_profile::chart::format_duration_ms;
use ride_profile::{
    build_profile, find_segment_index, lookup, points_from_json, ChartLayout, ChartScales,
    DrawCommandRecorder, GpsPoint, ProfileConfig, ProfileEngine, Segment,
};

/// Meters per degree of latitude on the mean-radius sphere.
const METERS_PER_DEGREE: f64 = 111_195.08;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Points heading north, `spacing` meters apart, at the given elevations.
fn northbound(elevations: &[f64], spacing: f64) -> Vec<GpsPoint> {
    let step = spacing / METERS_PER_DEGREE;
    elevations
        .iter()
        .enumerate()
        .map(|(i, &ele)| GpsPoint::with_elevation(45.0 + i as f64 * step, 6.0, ele))
        .collect()
}

/// Rolling hills: 120 points 100m apart.
fn rolling_track() -> Vec<GpsPoint> {
    let elevations: Vec<f64> = (0..120)
        .map(|i| 400.0 + 150.0 * (i as f64 / 12.0).sin())
        .collect();
    northbound(&elevations, 100.0)
}

fn linear_scan(segments: &[Segment], time_ms: f64) -> Option<usize> {
    segments.iter().position(|s| s.contains_time_ms(time_ms))
}

#[test]
fn test_summit_splits_into_climb_and_descent() {
    init_logger();
    let track = northbound(&[0.0, 10.0, 10.0, 0.0], 400.0);
    let config = ProfileConfig {
        min_distance: 700.0,
        ..ProfileConfig::default()
    };
    let profile = build_profile(&track, &config);

    assert_eq!(profile.total_elevation_gain, 10);
    assert_eq!(profile.segments.len(), 2);
    assert!(profile.segments[0].slope > 0.0);
    assert!(profile.segments[1].slope <= 0.0);
    assert_eq!(profile.segments[0].end.point(), track[2]);
    assert_eq!(profile.segments[1].start.point(), track[2]);
}

#[test]
fn test_default_threshold_keeps_one_flat_segment() {
    init_logger();
    // 1200m in total: the group only closes on the last point
    let track = northbound(&[0.0, 10.0, 10.0, 0.0], 400.0);
    let profile = build_profile(&track, &ProfileConfig::default());

    assert_eq!(profile.total_elevation_gain, 10);
    assert_eq!(profile.segments.len(), 1);
    assert_eq!(profile.segments[0].slope, 0.0);
    assert!((profile.total_distance - 1200.0).abs() < 1.0);
}

#[test]
fn test_profile_invariants_on_rolling_track() {
    init_logger();
    let track = rolling_track();
    let config = ProfileConfig {
        min_distance: 500.0,
        ..ProfileConfig::default()
    };
    let profile = build_profile(&track, &config);

    assert!(profile.segments.len() >= 10);
    let mut expected_distance = 0.0;
    for segment in &profile.segments {
        assert_eq!(segment.start.distance, expected_distance);
        assert_eq!(segment.end.distance, segment.start.distance + segment.length);
        assert!(segment.duration > 0.0);
        assert!(segment.speed > 0.0 && segment.speed <= config.max_speed);
        expected_distance = segment.end.distance;
    }
    let retained: f64 = profile.segments.iter().map(|s| s.length).sum();
    assert!((profile.profile_distance() - retained).abs() < 1e-6);
}

#[test]
fn test_cursor_matches_linear_scan() {
    init_logger();
    let config = ProfileConfig {
        min_distance: 300.0,
        ..ProfileConfig::default()
    };
    let profile = build_profile(&rolling_track(), &config);
    assert!(profile.segments.len() >= 5);

    let max_time = profile.max_time_ms();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..1000 {
        let t = rng.gen_range(-0.1 * max_time..1.1 * max_time);
        assert_eq!(
            find_segment_index(&profile.segments, t),
            linear_scan(&profile.segments, t),
            "time {}",
            t
        );
    }

    // Exact boundaries belong to the segment that starts there
    for (i, segment) in profile.segments.iter().enumerate() {
        let t = segment.start.time_ms();
        assert_eq!(find_segment_index(&profile.segments, t), Some(i));
    }
    assert_eq!(find_segment_index(&profile.segments, max_time), None);
}

#[test]
fn test_pointer_lookup_matches_linear_scan() {
    init_logger();
    let profile = build_profile(&rolling_track(), &ProfileConfig::default());
    let layout = ChartLayout::default();
    let scales = ChartScales::new(&layout, &profile, 60.0);

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..1000 {
        let x = rng.gen_range(0.0..layout.width);
        let expected = if scales.in_plot(x) {
            linear_scan(&profile.segments, scales.invert_x(x)).map(|i| {
                let s = &profile.segments[i];
                (s.speed, s.start.latitude, s.start.longitude)
            })
        } else {
            None
        };
        let found = lookup(x, &scales, &profile.segments).map(|p| (p.speed, p.latitude, p.longitude));
        assert_eq!(found, expected, "pointer x {}", x);
    }
}

#[test]
fn test_pipeline_is_idempotent() {
    init_logger();
    let json = serde_json::to_string(&rolling_track()).unwrap();

    let run = || {
        let mut engine = ProfileEngine::new();
        engine.set_points_json(&json).unwrap();
        engine.set_chart_size(640.0, 240.0);
        engine.pointer_move(320.0);

        let mut recorder = DrawCommandRecorder::new();
        engine.render(&mut recorder);
        (
            engine.profile_json().unwrap(),
            recorder.to_json().unwrap(),
            engine.current_point(),
        )
    };

    assert_eq!(run(), run());
}

#[test]
fn test_json_track_through_chart() {
    init_logger();
    let json = r#"[
        {"lat": 45.900, "lon": 6.870, "ele": 1035},
        {"lat": 45.905, "lon": 6.870, "ele": 1080},
        {"lat": 45.910, "lon": 6.870, "ele": 1130},
        {"lat": 45.915, "lon": 6.870, "ele": 1160},
        {"lat": 45.920, "lon": 6.870, "ele": 1120}
    ]"#;
    let points = points_from_json(json).unwrap();
    let profile = build_profile(
        &points,
        &ProfileConfig {
            min_distance: 500.0,
            ..ProfileConfig::default()
        },
    );
    assert_eq!(profile.total_elevation_gain, 125);
    assert_eq!(profile.segments.len(), 4);

    let scales = ChartScales::new(&ChartLayout::default(), &profile, 60.0);
    let axis = scales.time_axis();
    let last = axis.ticks.last().unwrap().value;
    for tick in &axis.ticks {
        assert_eq!(tick.label, format_duration_ms(tick.value, last, false));
    }
}
