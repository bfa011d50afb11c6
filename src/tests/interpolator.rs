use std::sync::Arc;

use rstest::*;

use uom::si::{length::foot, velocity::knot};

use crate::{
    prelude::{
        AircraftModel, Config, GroundDetails, InterpolantKind, Interpolator, InterpolatorMode,
        Length, MemoryLogger, OnGround, OnGroundInfo, Setup, Velocity,
    },
    tests::{callsign, flying, init_logger, parked, t0, t0_plus, TestProvider},
};

fn interpolator(provider: &Arc<TestProvider>) -> Interpolator {
    Interpolator::new(
        callsign(),
        Config::default(),
        AircraftModel::default(),
        provider.clone(),
        None,
    )
    .unwrap()
}

#[fixture]
fn climbing() -> Arc<TestProvider> {
    Arc::new(TestProvider::new(vec![
        flying(0.0, 1000.0),
        flying(1.0, 1000.0),
        flying(2.0, 1020.0),
    ]))
}

#[rstest]
#[case(&[0.0, 1.0, 2.0])]
#[case(&[0.0, 1.0, 3.0])]
#[case(&[0.0, 2.5, 3.0])]
#[case(&[0.0, 0.2, 5.0])]
fn spline_passes_through_samples(#[case] times: &[f64]) {
    init_logger();

    let window = times
        .iter()
        .enumerate()
        .map(|(i, dt)| flying(*dt, 1000.0 + 50.0 * i as f64).with_heading_deg(15.0 * i as f64))
        .collect::<Vec<_>>();

    let middle = window[1].clone();
    let provider = Arc::new(TestProvider::new(window));
    let mut interpolator = interpolator(&provider);

    let result = interpolator.get_interpolation(middle.epoch(), &Setup::default(), 0);
    let situation = result.situation.unwrap();

    assert_eq!(result.status.interpolant, Some(InterpolantKind::Spline));
    assert!(result.status.interpolated);
    assert!(
        situation.position().equal_normal_vector(middle.position()),
        "{} != {}",
        situation,
        middle
    );
    assert!((situation.altitude() - middle.altitude()).abs() < Length::new::<foot>(1.0E-6));
    assert!((situation.heading_deg() - middle.heading_deg()).abs() < 1.0E-9);
    assert_eq!(interpolator.invalid_situations(), 0);
}

#[rstest]
fn spline_altitude(climbing: Arc<TestProvider>) {
    init_logger();
    let mut interpolator = interpolator(&climbing);
    let setup = Setup::default();

    let result = interpolator.get_interpolation(t0_plus(1.5), &setup, 0);
    let situation = result.situation.unwrap();

    assert_eq!(situation.epoch(), t0_plus(1.5));
    assert!((situation.altitude().get::<foot>() - 1008.125).abs() < 1.0E-6);
    assert!(situation.on_ground_info().details() == GroundDetails::ByGuessing);
    assert!(!situation.is_on_ground());

    // altitude keeps increasing toward the last sample
    let mut interpolator = self::interpolator(&climbing);
    let mut previous = Length::new::<foot>(1000.0);
    for dt in [1.1, 1.25, 1.5, 1.75, 1.9, 2.0] {
        let result = interpolator.get_interpolation(t0_plus(dt), &setup, 0);
        let altitude = result.situation.unwrap().altitude();
        assert!(altitude > previous, "not increasing at {}s", dt);
        assert!(altitude <= Length::new::<foot>(1020.0 + 1.0E-6));
        previous = altitude;
    }

    assert_eq!(interpolator.invalid_situations(), 0);
    // coefficients are calculated once per window
    assert_eq!(interpolator.stats().recalculations, 1);
}

#[rstest]
fn linear_altitude(climbing: Arc<TestProvider>) {
    init_logger();
    let mut interpolator = interpolator(&climbing);
    let setup = Setup::default().with_mode(InterpolatorMode::Linear);

    let result = interpolator.get_interpolation(t0_plus(1.5), &setup, 0);
    assert_eq!(result.status.interpolant, Some(InterpolantKind::Linear));

    let altitude = result.situation.unwrap().altitude();
    assert!((altitude.get::<foot>() - 1010.0).abs() < 1.0E-6);
}

#[rstest]
fn idempotence(climbing: Arc<TestProvider>) {
    init_logger();
    let mut interpolator = interpolator(&climbing);
    let setup = Setup::default();

    for dt in [0.5, 1.5, 1.5, 1.7] {
        let first = interpolator.get_interpolation(t0_plus(dt), &setup, 3);
        let second = interpolator.get_interpolation(t0_plus(dt), &setup, 3);
        assert_eq!(first, second, "not idempotent at {}s", dt);
    }
}

#[test]
fn single_situation_is_held() {
    init_logger();
    let single = flying(0.0, 5000.0);
    let provider = Arc::new(TestProvider::new(vec![single.clone()]));
    let mut interpolator = interpolator(&provider);

    let result = interpolator.get_interpolation(t0_plus(0.5), &Setup::default(), 0);

    assert_eq!(result.situation, Some(single));
    assert!(result.status.same_situation);
    assert!(result.status.degenerate);
    assert!(!result.status.interpolated);
    assert_eq!(interpolator.invalid_situations(), 1);

    // same query, same inputs
    let again = interpolator.get_interpolation(t0_plus(0.5), &Setup::default(), 0);
    assert_eq!(again, result);
    assert_eq!(interpolator.invalid_situations(), 1);
}

#[test]
fn empty_window() {
    init_logger();
    let provider = Arc::new(TestProvider::default());
    let mut interpolator = interpolator(&provider);

    let result = interpolator.get_interpolation(t0(), &Setup::default(), 0);
    assert!(result.situation.is_none());
    assert!(result.status.degenerate);
    assert_eq!(interpolator.invalid_situations(), 1);
    assert!(interpolator.interpolator_info().contains("1st interpolation: yes"));
}

#[rstest]
fn non_monotonic_query(climbing: Arc<TestProvider>) {
    init_logger();
    let mut interpolator = interpolator(&climbing);
    let setup = Setup::default();

    let latest = interpolator.get_interpolation(t0_plus(1.5), &setup, 0);
    let past = interpolator.get_interpolation(t0_plus(1.0), &setup, 0);

    assert_eq!(past.situation, latest.situation);
    assert!(past.status.degenerate);
    assert_eq!(interpolator.invalid_situations(), 1);

    interpolator.reset_last_interpolation();
    assert!(interpolator.last_situation().is_none());

    let restarted = interpolator.get_interpolation(t0_plus(1.0), &setup, 0);
    assert!(restarted.status.interpolated);
    assert_eq!(interpolator.invalid_situations(), 1);
}

#[rstest]
fn query_beyond_window(climbing: Arc<TestProvider>) {
    init_logger();
    let mut interpolator = interpolator(&climbing);

    let result = interpolator.get_interpolation(t0_plus(3.0), &Setup::default(), 0);
    let situation = result.situation.unwrap();

    assert!(result.status.clamped);
    assert!(result.status.degenerate);
    assert!((situation.altitude().get::<foot>() - 1020.0).abs() < 1.0E-6);
    assert_eq!(situation.epoch(), t0_plus(2.0));
    assert_eq!(interpolator.invalid_situations(), 1);
}

#[test]
fn parked_aircraft() {
    init_logger();
    let on_ground = OnGroundInfo::new(true, GroundDetails::InFromNetwork);
    let window = (0..3)
        .map(|i| parked(i as f64, 364.0).with_on_ground(on_ground))
        .collect::<Vec<_>>();

    let provider = Arc::new(TestProvider::new(window.clone()));
    let mut interpolator = interpolator(&provider);

    let result = interpolator.get_interpolation(t0_plus(1.5), &Setup::default(), 0);
    assert!(result.status.same_situation);
    assert!(!result.status.interpolated);
    assert!(!result.status.degenerate);
    assert_eq!(result.situation.as_ref(), window.last());

    let setup = Setup::default().with_pitch_on_ground_deg(2.5);
    let result = interpolator.get_interpolation(t0_plus(1.6), &setup, 0);
    assert_eq!(result.situation.unwrap().pitch_deg(), 2.5);

    let setup = Setup::default().with_full_interpolation();
    let result = interpolator.get_interpolation(t0_plus(1.7), &setup, 0);
    assert!(result.status.interpolated);
    assert!(result.status.recalculated);

    let situation = result.situation.unwrap();
    assert!(situation.position().equal_normal_vector(window[0].position()));
    assert_eq!(situation.on_ground_info().on_ground(), OnGround::Yes);
    assert_eq!(situation.on_ground_info().details(), GroundDetails::ByInterpolation);
    assert_eq!(interpolator.invalid_situations(), 0);
}

#[test]
fn ground_flag_is_not_forwarded() {
    init_logger();
    let on_ground = OnGroundInfo::new(true, GroundDetails::InFromNetwork);
    let window = (0..3)
        .map(|i| parked(i as f64, 364.0).with_on_ground(on_ground))
        .collect::<Vec<_>>();

    let provider = Arc::new(TestProvider::new(window));
    let mut interpolator = interpolator(&provider);

    let setup = Setup::default().without_ground_flag();
    let result = interpolator.get_interpolation(t0_plus(1.0), &setup, 0);

    let situation = result.situation.unwrap();
    assert_eq!(situation.on_ground_info().on_ground(), OnGround::Unknown);
    assert!(interpolator.last_situation().unwrap().is_on_ground());
}

#[test]
fn ground_factor_interpolation() {
    init_logger();
    let slow = Velocity::new::<knot>(120.0);
    let window = vec![
        flying(0.0, 364.0)
            .with_ground_speed(slow)
            .with_on_ground(OnGroundInfo::new(true, GroundDetails::InFromNetwork)),
        flying(1.0, 364.0)
            .with_ground_speed(slow)
            .with_on_ground(OnGroundInfo::new(true, GroundDetails::InFromNetwork)),
        flying(2.0, 400.0)
            .with_ground_speed(slow)
            .with_on_ground(OnGroundInfo::new(false, GroundDetails::InFromNetwork)),
    ];

    let provider = Arc::new(TestProvider::new(window));
    let mut interpolator = interpolator(&provider);
    let setup = Setup::default();

    let rolling = interpolator
        .get_interpolation(t0_plus(0.5), &setup, 0)
        .situation
        .unwrap();
    assert_eq!(rolling.on_ground_info().on_ground(), OnGround::Yes);
    assert_eq!(rolling.on_ground_info().details(), GroundDetails::ByInterpolation);
    assert_eq!(rolling.on_ground_info().factor(), Some(1.0));

    let rotating = interpolator
        .get_interpolation(t0_plus(1.5), &setup, 0)
        .situation
        .unwrap();
    let factor = rotating.on_ground_info().factor().unwrap();
    assert!((0.0..=1.0).contains(&factor));
    assert_eq!(rotating.on_ground_info().details(), GroundDetails::ByInterpolation);
}

#[test]
fn corrupt_situations_are_dropped() {
    init_logger();
    let window = vec![
        flying(0.0, 1000.0),
        flying(1.0, f64::NAN),
        flying(2.0, 1020.0),
    ];
    let provider = Arc::new(TestProvider::new(window));
    let mut interpolator = interpolator(&provider);

    let result = interpolator.get_interpolation(t0_plus(1.0), &Setup::default(), 0);
    assert_eq!(result.status.situations, 2);
    // spline needs 3 situations
    assert_eq!(result.status.interpolant, Some(InterpolantKind::Linear));
    assert!(result.status.degenerate);

    let altitude = result.situation.unwrap().altitude();
    assert!((altitude.get::<foot>() - 1010.0).abs() < 1.0E-6);
    assert_eq!(interpolator.invalid_situations(), 1);

    // window is sanitized once
    interpolator.get_interpolation(t0_plus(1.2), &Setup::default(), 0);
    assert_eq!(interpolator.invalid_situations(), 1);
}

#[test]
fn window_refresh() {
    init_logger();
    let provider = Arc::new(TestProvider::new(vec![flying(0.0, 1000.0), flying(1.0, 1000.0)]));
    let mut interpolator = interpolator(&provider);
    let setup = Setup::default();

    let result = interpolator.get_interpolation(t0_plus(0.5), &setup, 0);
    assert_eq!(result.status.interpolant, Some(InterpolantKind::Linear));

    provider.set_situations(vec![
        flying(0.0, 1000.0),
        flying(1.0, 1000.0),
        flying(2.0, 1020.0),
    ]);

    let result = interpolator.get_interpolation(t0_plus(1.5), &setup, 0);
    assert_eq!(result.status.interpolant, Some(InterpolantKind::Spline));
    assert!(result.status.recalculated);
    assert_eq!(result.status.situations, 3);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "situation window of another aircraft")]
fn situations_of_another_aircraft() {
    use crate::{
        prelude::{Callsign, Position, Situation},
        tests::{REF_LATITUDE_DEG, REF_LONGITUDE_DEG},
    };

    let intruder = Situation::new(
        Callsign::new("AFR1234"),
        t0_plus(0.5),
        Position::from_geo_deg(REF_LATITUDE_DEG, REF_LONGITUDE_DEG),
        Length::new::<foot>(1000.0),
    );
    let provider = Arc::new(TestProvider::new(vec![
        flying(0.0, 1000.0),
        intruder,
        flying(1.0, 1000.0),
    ]));
    let mut interpolator = interpolator(&provider);
    interpolator.get_interpolation(t0_plus(0.5), &Setup::default(), 0);
}

#[rstest]
fn diagnostics(climbing: Arc<TestProvider>) {
    init_logger();
    let logger = Arc::new(MemoryLogger::new(8));
    let mut interpolator = interpolator(&climbing);
    interpolator.attach_logger(logger.clone());

    for dt in [1.5, 1.6] {
        interpolator.get_interpolation(t0_plus(dt), &Setup::default(), 0);
    }

    let situations = logger.situation_logs();
    assert_eq!(situations.len(), 2);

    let first = &situations[0];
    assert_eq!(first.callsign, callsign());
    assert_eq!(first.counter, 1);
    assert_eq!(first.situations.len(), 3);
    assert_eq!(first.interpolant, Some(InterpolantKind::Spline));
    assert!((first.fraction - 0.5).abs() < 1.0E-9);
    assert_eq!(first.interpolated_time, Some(t0_plus(1.5)));
    assert!(first.recalculated);
    assert!(!situations[1].recalculated);
    assert!(first.result.is_some());
    assert!(!first.to_string().is_empty());

    assert_eq!(logger.parts_logs().len(), 2);

    logger.clear();
    assert!(logger.situation_logs().is_empty());

    interpolator.detach_logger();
    interpolator.get_interpolation(t0_plus(1.7), &Setup::default(), 0);
    assert!(logger.situation_logs().is_empty());
}

#[rstest]
fn interpolator_info(climbing: Arc<TestProvider>) {
    let mut interpolator = interpolator(&climbing);
    interpolator.get_interpolation(t0_plus(1.5), &Setup::default(), 0);

    let info = interpolator.interpolator_info();
    assert!(info.contains("DLH4AB"));
    assert!(info.contains("situations: 3"));
    assert!(info.contains("1st interpolation: no"));
}
