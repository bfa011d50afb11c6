use rstest::*;

use crate::{
    prelude::{blend, LinearPbh, Situation},
    tests::{flying, init_logger},
};

fn with_heading(dt_s: f64, heading_deg: f64) -> Situation {
    flying(dt_s, 10000.0).with_heading_deg(heading_deg)
}

/// Absolute angular distance, in [0, 180]
fn angular_distance(a_deg: f64, b_deg: f64) -> f64 {
    let delta = (a_deg - b_deg).rem_euclid(360.0);
    delta.min(360.0 - delta)
}

#[rstest]
#[case(350.0, 10.0, 0.5, 0.0)]
#[case(10.0, 350.0, 0.5, 0.0)]
#[case(170.0, -170.0, 0.5, 180.0)]
#[case(90.0, 270.0, 0.25, 135.0)]
#[case(0.0, 90.0, 1.0, 90.0)]
#[case(-45.0, 45.0, 0.0, -45.0)]
fn heading_blending(
    #[case] start_deg: f64,
    #[case] end_deg: f64,
    #[case] fraction: f64,
    #[case] expected_deg: f64,
) {
    let (start, end) = (with_heading(0.0, start_deg), with_heading(1.0, end_deg));
    let heading = blend(&start, &end, fraction).heading_deg;
    assert!(
        angular_distance(heading, expected_deg) < 1.0E-9,
        "{} -> {} @ {}: {}",
        start_deg,
        end_deg,
        fraction,
        heading
    );
    assert!((-180.0..=180.0).contains(&heading));
}

#[test]
fn opposite_headings_turn_clockwise() {
    init_logger();
    for start_deg in (-180..180).step_by(30) {
        let start_deg = start_deg as f64;
        let (start, end) = (
            with_heading(0.0, start_deg),
            with_heading(1.0, start_deg + 180.0),
        );
        let heading = LinearPbh::new(0.25, &start, &end).heading_deg();
        assert!(
            angular_distance(heading, start_deg + 45.0) < 1.0E-9,
            "{} @ 0.25: {}",
            start_deg,
            heading
        );
    }

    let (start, end) = (with_heading(0.0, -90.0), with_heading(1.0, 90.0));
    let heading = LinearPbh::new(0.25, &start, &end).heading_deg();
    assert!((heading + 45.0).abs() < 1.0E-9, "{}", heading);
}

#[test]
fn heading_never_exceeds_true_delta() {
    init_logger();
    for start_deg in (0..360).step_by(15) {
        for end_deg in (0..360).step_by(20) {
            let (start, end) = (
                with_heading(0.0, start_deg as f64),
                with_heading(1.0, end_deg as f64),
            );
            let total = angular_distance(start_deg as f64, end_deg as f64);
            let mut previous = start_deg as f64;
            for step in 0..=10 {
                let fraction = step as f64 / 10.0;
                let heading = LinearPbh::new(fraction, &start, &end).heading_deg();
                assert!(angular_distance(heading, start_deg as f64) <= total + 1.0E-9);
                assert!(angular_distance(heading, previous) <= total / 10.0 + 1.0E-9);
                previous = heading;
            }
        }
    }
}
