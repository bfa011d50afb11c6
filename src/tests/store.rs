use std::sync::Arc;

use uom::si::length::foot;

use crate::{
    prelude::{
        AircraftModel, Callsign, Config, Error, Interpolator, Parts, RemoteAircraftStore,
        Setup, SituationProvider, StoreEvent,
    },
    tests::{callsign, flying, init_logger, t0, t0_plus},
};

#[test]
fn situations_are_sorted_and_bounded() {
    init_logger();
    let store = RemoteAircraftStore::new(3);
    let callsign = callsign();

    for dt in [3.0, 0.0, 2.0, 1.0, 4.0] {
        store.insert_situation(&callsign, flying(dt, 1000.0)).unwrap();
    }

    let window = store.situations(&callsign);
    assert_eq!(window.len(), 3);
    assert_eq!(window.revision, 5);

    let epochs = window.situations.iter().map(|s| s.epoch()).collect::<Vec<_>>();
    assert_eq!(epochs, vec![t0_plus(2.0), t0_plus(3.0), t0_plus(4.0)]);

    // same instant replaces
    store.insert_situation(&callsign, flying(4.0, 1200.0)).unwrap();
    let window = store.situations(&callsign);
    assert_eq!(window.len(), 3);
    assert_eq!(window.situations[2].altitude(), flying(4.0, 1200.0).altitude());

    let change = store.situation_change(&callsign).unwrap();
    assert_eq!(change.situations, 3);
}

#[test]
fn situation_of_another_aircraft() {
    let store = RemoteAircraftStore::default();
    let other = Callsign::new("AFR1234");
    assert_eq!(
        store.insert_situation(&other, flying(0.0, 1000.0)),
        Err(Error::WrongAircraft {
            expected: other.clone(),
            found: callsign(),
        })
    );
    assert!(store.callsigns().is_empty());
}

#[test]
fn parts_of_unknown_aircraft() {
    let store = RemoteAircraftStore::default();
    let callsign = callsign();

    assert!(!store.insert_parts(&callsign, Parts::new(t0())));
    assert!(store.latest_parts(&callsign).is_none());

    store.insert_situation(&callsign, flying(0.0, 1000.0)).unwrap();
    for dt in [0.0, 1.0, 2.0, 3.0] {
        assert!(store.insert_parts(&callsign, Parts::new(t0_plus(dt)).with_gear_down(dt > 1.0)));
    }

    assert_eq!(store.parts(&callsign).len(), 3);
    let latest = store.latest_parts(&callsign).unwrap();
    assert_eq!(latest.epoch(), t0_plus(3.0));
    assert!(latest.gear_down);
}

#[test]
fn store_events() {
    init_logger();
    let store = RemoteAircraftStore::default();
    let events = store.subscribe();
    let callsign = callsign();

    store.insert_situation(&callsign, flying(0.0, 1000.0)).unwrap();
    store.insert_situation(&callsign, flying(1.0, 1000.0)).unwrap();
    store.insert_parts(&callsign, Parts::new(t0()));
    assert!(store.remove_aircraft(&callsign));
    assert!(!store.remove_aircraft(&callsign));

    let received = events.try_iter().collect::<Vec<_>>();
    assert_eq!(
        received,
        vec![
            StoreEvent::AircraftAdded(callsign.clone()),
            StoreEvent::SituationsChanged(callsign.clone()),
            StoreEvent::SituationsChanged(callsign.clone()),
            StoreEvent::PartsChanged(callsign.clone()),
            StoreEvent::AircraftRemoved(callsign.clone()),
        ]
    );

    assert!(store.situations(&callsign).is_empty());

    // dropped subscribers are forgotten
    drop(events);
    store.insert_situation(&callsign, flying(2.0, 1000.0)).unwrap();
}

#[test]
fn concurrent_snapshots() {
    init_logger();
    let store = Arc::new(RemoteAircraftStore::default());
    let callsign = callsign();
    store.insert_situation(&callsign, flying(0.0, 1000.0)).unwrap();

    std::thread::scope(|scope| {
        let writer = store.clone();
        let writer_callsign = callsign.clone();
        scope.spawn(move || {
            for i in 1..500 {
                writer
                    .insert_situation(&writer_callsign, flying(i as f64 * 0.1, 1000.0))
                    .unwrap();
            }
        });

        for _ in 0..500 {
            let window = store.situations(&callsign);
            assert!(!window.is_empty());
            assert!(window.len() <= 3);
            for pair in window.situations.windows(2) {
                assert!(pair[0].adjusted_epoch() < pair[1].adjusted_epoch());
            }
        }
    });

    assert_eq!(store.situations(&callsign).revision, 500);
}

#[test]
fn revision_survives_removal() {
    init_logger();
    let store = Arc::new(RemoteAircraftStore::default());
    let callsign = callsign();
    for dt in [0.0, 1.0] {
        store.insert_situation(&callsign, flying(dt, 1000.0)).unwrap();
    }
    let first = store.situations(&callsign).revision;

    let mut interpolator = Interpolator::new(
        callsign.clone(),
        Config::default(),
        AircraftModel::default(),
        store.clone(),
        None,
    )
    .unwrap();

    let result = interpolator.get_interpolation(t0_plus(0.5), &Setup::default(), 0);
    let altitude = result.situation.unwrap().altitude().get::<foot>();
    assert!((altitude - 1000.0).abs() < 1.0E-6);

    // aircraft leaves then comes back with as many situations
    assert!(store.remove_aircraft(&callsign));
    for dt in [2.0, 3.0] {
        store.insert_situation(&callsign, flying(dt, 2000.0)).unwrap();
    }
    assert!(store.situations(&callsign).revision > first);

    let result = interpolator.get_interpolation(t0_plus(2.5), &Setup::default(), 0);
    let altitude = result.situation.unwrap().altitude().get::<foot>();
    assert!((altitude - 2000.0).abs() < 1.0E-6, "altitude: {}", altitude);
}
