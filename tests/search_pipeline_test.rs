mod common;

use std::cell::RefCell;

use common::{box_record, init_tracing, FixedPathEphemeris};
use skymast::archive::{ArchiveQuery, ObservationArchive, ObservationRecord};
use skymast::search::{run_search, SearchRequest};
use skymast::skymast_errors::SkymastError;
use skymast::stcs::parse_s_region;
use skymast::stcs::winding::is_counter_clockwise;

/// Canned archive that records the query it was given.
struct FixedArchive {
    records: Vec<ObservationRecord>,
    last_query: RefCell<Option<ArchiveQuery>>,
}

impl FixedArchive {
    fn new(records: Vec<ObservationRecord>) -> Self {
        FixedArchive {
            records,
            last_query: RefCell::new(None),
        }
    }
}

impl ObservationArchive for FixedArchive {
    fn query(&self, query: &ArchiveQuery) -> Result<Vec<ObservationRecord>, SkymastError> {
        *self.last_query.borrow_mut() = Some(query.clone());
        Ok(self.records.clone())
    }
}

fn fortnight_request() -> SearchRequest {
    SearchRequest::builder()
        .target("2021 AB1")
        .start("2021-01-01")
        .stop("2021-01-14")
        .mission("TESS")
        .max_records(25)
        .build()
        .unwrap()
}

#[test]
fn pipeline_returns_only_verified_observations() {
    init_tracing();
    // 2021-01-01 00:00 UTC is JD 2459215.5; the target drifts 0.1 deg/day in RA.
    let ephemeris = FixedPathEphemeris::linear(2459215.5, 100.0, 20.0, 0.1, 0.0, 14);
    let archive = FixedArchive::new(vec![
        box_record("on-path", 100.5, 20.0, 59218.0, 59219.0),
        box_record("far-away", 110.0, 20.0, 59220.0, 59221.0),
    ]);

    let outcome = run_search(&fortnight_request(), &ephemeris, &archive).unwrap();

    let ids: Vec<&str> = outcome.records.iter().map(|r| r.obs_id.as_str()).collect();
    assert_eq!(ids, vec!["on-path"]);
    assert_eq!(outcome.path.len(), 14);

    // One request for the trajectory, one batched request for the midpoints.
    assert_eq!(*ephemeris.calls.borrow(), 2);

    assert!(is_counter_clockwise(&outcome.search_region.region));
    assert!(parse_s_region(&outcome.search_region.region).is_ok());

    let query = archive.last_query.borrow().clone().unwrap();
    assert_eq!(query.region, outcome.search_region.region);
    assert_eq!(query.missions, vec!["TESS".to_string()]);
    assert_eq!(query.max_records, 25);
    let t_min = query.t_min.unwrap();
    let t_max = query.t_max.unwrap();
    assert!((t_min - 59215.0).abs() < 1e-6);
    assert!((t_max - 59228.0).abs() < 1e-6);
}

#[test]
fn time_constraint_can_be_lifted() {
    init_tracing();
    let ephemeris = FixedPathEphemeris::linear(2459215.5, 100.0, 20.0, 0.1, 0.0, 14);
    let archive = FixedArchive::new(Vec::new());

    let request = SearchRequest::builder()
        .target("2021 AB1")
        .start("2021-01-01")
        .stop("2021-01-14")
        .constrain_time(false)
        .build()
        .unwrap();

    run_search(&request, &ephemeris, &archive).unwrap();

    let query = archive.last_query.borrow().clone().unwrap();
    assert_eq!(query.t_min, None);
    assert_eq!(query.t_max, None);
}

#[test]
fn no_candidates_means_no_second_ephemeris_call() {
    init_tracing();
    let ephemeris = FixedPathEphemeris::linear(2459215.5, 100.0, 20.0, 0.1, 0.0, 14);
    let archive = FixedArchive::new(Vec::new());

    let outcome = run_search(&fortnight_request(), &ephemeris, &archive).unwrap();

    assert!(outcome.records.is_empty());
    assert_eq!(*ephemeris.calls.borrow(), 1);
}
