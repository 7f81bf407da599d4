mod common;

use common::{box_record, init_tracing, FixedPathEphemeris};
use skymast::ephemeris::{EphemerisSample, EphemerisSource, TargetSpec, TimeSpec};
use skymast::footprint::{verify_footprints, FilterOptions};
use skymast::skymast_errors::SkymastError;

#[test]
fn midpoint_hit_and_miss_across_the_sky() {
    init_tracing();
    let ephemeris = FixedPathEphemeris::linear(2459000.5, 100.0, 20.0, 0.1, 0.0, 5);
    let target = TargetSpec::new("2021 AB1");

    // Both exposures cover the same window; only the first sits on the path.
    let records = vec![
        box_record("on-path", 100.0, 20.0, 59001.0, 59002.0),
        box_record("far-away", 110.0, 20.0, 59001.0, 59002.0),
    ];

    let matched = verify_footprints(
        records,
        &target,
        Some(ephemeris.path.as_slice()),
        &FilterOptions::default(),
        &ephemeris,
    )
    .unwrap();

    let ids: Vec<&str> = matched.iter().map(|r| r.obs_id.as_str()).collect();
    assert_eq!(ids, vec!["on-path"]);
}

#[test]
fn matches_come_back_in_midpoint_order() {
    init_tracing();
    let ephemeris = FixedPathEphemeris::linear(2459000.5, 100.0, 20.0, 0.0, 0.0, 8);
    let target = TargetSpec::new("2021 AB1");

    let records = vec![
        box_record("late", 100.0, 20.0, 59005.0, 59006.0),
        box_record("early", 100.0, 20.0, 59001.0, 59002.0),
        box_record("middle", 100.0, 20.0, 59003.0, 59004.0),
    ];

    let matched = verify_footprints(
        records,
        &target,
        Some(ephemeris.path.as_slice()),
        &FilterOptions::default(),
        &ephemeris,
    )
    .unwrap();

    let ids: Vec<&str> = matched.iter().map(|r| r.obs_id.as_str()).collect();
    assert_eq!(ids, vec!["early", "middle", "late"]);
}

#[test]
fn empty_candidate_list_skips_the_ephemeris_request() {
    init_tracing();
    let ephemeris = FixedPathEphemeris::linear(2459000.5, 100.0, 20.0, 0.0, 0.0, 3);
    let target = TargetSpec::new("2021 AB1");

    let matched = verify_footprints(
        Vec::new(),
        &target,
        Some(ephemeris.path.as_slice()),
        &FilterOptions::default(),
        &ephemeris,
    )
    .unwrap();

    assert!(matched.is_empty());
    assert_eq!(*ephemeris.calls.borrow(), 0);
}

#[test]
fn tess_exposures_before_its_first_footprints_are_dropped() {
    init_tracing();
    let ephemeris = FixedPathEphemeris::linear(2459000.5, 100.0, 20.0, 0.0, 0.0, 3);
    let from_tess = TargetSpec {
        location: Some("@tess".into()),
        ..TargetSpec::new("2021 AB1")
    };

    // Both would match geometrically; the first predates any TESS footprint.
    let records = || {
        vec![
            box_record("pre-launch", 100.0, 20.0, 56000.0, 56001.0),
            box_record("science", 100.0, 20.0, 59000.25, 59000.75),
        ]
    };

    let matched = verify_footprints(
        records(),
        &from_tess,
        Some(ephemeris.path.as_slice()),
        &FilterOptions::default(),
        &ephemeris,
    )
    .unwrap();

    let ids: Vec<&str> = matched.iter().map(|r| r.obs_id.as_str()).collect();
    assert_eq!(ids, vec!["science"]);
    assert_eq!(*ephemeris.calls.borrow(), 1);

    // The cut is tied to the observing location; a geocentric query keeps both.
    let geocentric = TargetSpec::new("2021 AB1");
    let matched = verify_footprints(
        records(),
        &geocentric,
        Some(ephemeris.path.as_slice()),
        &FilterOptions::default(),
        &ephemeris,
    )
    .unwrap();
    assert_eq!(matched.len(), 2);
}

#[test]
fn tess_cut_emptying_the_list_skips_the_ephemeris_request() {
    init_tracing();
    let ephemeris = FixedPathEphemeris::linear(2459000.5, 100.0, 20.0, 0.0, 0.0, 3);
    let target = TargetSpec {
        location: Some("@TESS".into()),
        ..TargetSpec::new("2021 AB1")
    };

    let records = vec![box_record("pre-launch", 100.0, 20.0, 56000.0, 56001.0)];
    let matched = verify_footprints(
        records,
        &target,
        Some(ephemeris.path.as_slice()),
        &FilterOptions::default(),
        &ephemeris,
    )
    .unwrap();

    assert!(matched.is_empty());
    assert_eq!(*ephemeris.calls.borrow(), 0);
}

#[test]
fn circle_footprint_contains_the_target_at_its_center() {
    init_tracing();
    let ephemeris = FixedPathEphemeris::linear(2459000.5, 100.2, 20.0, 0.0, 0.0, 4);
    let target = TargetSpec::new("2021 AB1");

    let mut record = box_record("circle", 100.2, 20.0, 59001.0, 59002.0);
    record.s_region = "CIRCLE 100.2 20.0 0.3".into();

    let options = FilterOptions {
        match_radius: None,
        aggressive_check: false,
    };
    let matched = verify_footprints(
        vec![record],
        &target,
        Some(ephemeris.path.as_slice()),
        &options,
        &ephemeris,
    )
    .unwrap();

    assert_eq!(matched.len(), 1);
}

#[test]
fn tolerance_radius_rescues_footprint_edge_misses() {
    init_tracing();
    // Constant position 0.005 deg east of the footprint edge.
    let ephemeris = FixedPathEphemeris::linear(2459000.5, 100.505, 20.0, 0.0, 0.0, 4);
    let target = TargetSpec::new("2021 AB1");
    let record = || vec![box_record("edge", 100.0, 20.0, 59001.0, 59002.0)];

    let with_radius = verify_footprints(
        record(),
        &target,
        Some(ephemeris.path.as_slice()),
        &FilterOptions::default(),
        &ephemeris,
    )
    .unwrap();
    assert_eq!(with_radius.len(), 1);

    for disabled in [
        FilterOptions {
            match_radius: None,
            aggressive_check: false,
        },
        FilterOptions {
            match_radius: Some(-1.0),
            aggressive_check: false,
        },
    ] {
        let matched = verify_footprints(
            record(),
            &target,
            Some(ephemeris.path.as_slice()),
            &disabled,
            &ephemeris,
        )
        .unwrap();
        assert!(matched.is_empty());
    }
}

#[test]
fn undecodable_region_text_is_skipped_not_fatal() {
    init_tracing();
    let ephemeris = FixedPathEphemeris::linear(2459000.5, 100.0, 20.0, 0.0, 0.0, 4);
    let target = TargetSpec::new("2021 AB1");

    let mut weird = box_record("weird", 100.0, 20.0, 59001.0, 59002.0);
    weird.s_region = "BANANA 1 2 3".into();
    let records = vec![weird, box_record("good", 100.0, 20.0, 59001.0, 59002.0)];

    let matched = verify_footprints(
        records,
        &target,
        Some(ephemeris.path.as_slice()),
        &FilterOptions::default(),
        &ephemeris,
    )
    .unwrap();

    let ids: Vec<&str> = matched.iter().map(|r| r.obs_id.as_str()).collect();
    assert_eq!(ids, vec!["good"]);
}

#[test]
fn aggressive_check_windows_the_refined_scan() {
    init_tracing();
    // The target crosses the footprint days before the exposure starts.
    let ephemeris = FixedPathEphemeris::linear(2459000.5, 100.0, 20.0, 0.5, 0.0, 10);
    let target = TargetSpec::new("2021 AB1");
    let record = || vec![box_record("late-exposure", 100.0, 20.0, 59004.0, 59005.0)];

    let relaxed = FilterOptions {
        match_radius: None,
        aggressive_check: false,
    };
    let windowed = FilterOptions {
        match_radius: None,
        aggressive_check: true,
    };

    let matched = verify_footprints(
        record(),
        &target,
        Some(ephemeris.path.as_slice()),
        &relaxed,
        &ephemeris,
    )
    .unwrap();
    assert_eq!(matched.len(), 1);

    let matched = verify_footprints(
        record(),
        &target,
        Some(ephemeris.path.as_slice()),
        &windowed,
        &ephemeris,
    )
    .unwrap();
    assert!(matched.is_empty());
}

#[test]
fn midpoint_count_mismatch_is_an_error() {
    init_tracing();

    struct MiscountingEphemeris;
    impl EphemerisSource for MiscountingEphemeris {
        fn fetch(
            &self,
            _target: &TargetSpec,
            _times: &TimeSpec,
        ) -> Result<Vec<EphemerisSample>, SkymastError> {
            Ok(Vec::new())
        }
    }

    let target = TargetSpec::new("2021 AB1");
    let error = verify_footprints(
        vec![box_record("lonely", 100.0, 20.0, 59001.0, 59002.0)],
        &target,
        None,
        &FilterOptions::default(),
        &MiscountingEphemeris,
    )
    .unwrap_err();

    assert!(matches!(error, SkymastError::HorizonsPayload(_)));
}
