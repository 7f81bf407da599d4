//! Search orchestration.
//!
//! [`SearchRequest`] collects every knob of an archive search behind a
//! validating builder; [`run_search`] drives the pipeline: sample the target
//! trajectory, thicken it into a search region, query the archive, then keep
//! only the observations whose footprint really contained the target.

use std::cmp::Ordering::Greater;

use tracing::debug;

use crate::archive::{ArchiveQuery, ObservationArchive, ObservationRecord};
use crate::constants::{Degree, DEFAULT_MAX_RECORDS, DEFAULT_SEARCH_RADIUS};
use crate::ephemeris::{EphemerisSample, EphemerisSource, IdType, TargetSpec, TimeSpec};
use crate::footprint::{verify_footprints, FilterOptions};
use crate::search_region::SearchRegion;
use crate::skymast_errors::SkymastError;
use crate::time::validate_time_range;

/// Parameters of one moving-target archive search.
///
/// Build through [`SearchRequest::builder`], which checks the parameters for
/// consistency. The defaults mirror a typical small-body search: geocentric
/// ephemeris, one-day sampling, a half-width of half an arcminute and the
/// same tolerance radius for the verification pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Target identifier, interpreted according to `id_type`.
    pub target: String,
    pub id_type: IdType,
    /// Observer location code; `None` selects the geocenter.
    pub location: Option<String>,
    /// Window start, calendar date `YYYY-MM-DD`.
    pub start: String,
    /// Window end, calendar date `YYYY-MM-DD`.
    pub stop: String,
    /// Trajectory sampling step passed to the ephemeris service.
    pub step: String,
    /// Half-width of the search region ribbon, degrees.
    pub half_width: Degree,
    /// Tolerance radius of the verification pass, degrees. `None` or a
    /// negative value keeps exact point-in-footprint matches only.
    pub match_radius: Option<Degree>,
    /// Restrict the archive query to these collections; empty means all.
    pub missions: Vec<String>,
    /// Cap on the number of archive rows.
    pub max_records: usize,
    /// Window the refined verification scan on each record's time bounds.
    pub aggressive_check: bool,
    /// Constrain the archive query to the search window.
    pub constrain_time: bool,
}

impl Default for SearchRequest {
    fn default() -> Self {
        SearchRequest {
            target: String::new(),
            id_type: IdType::default(),
            location: None,
            start: String::new(),
            stop: String::new(),
            step: "1d".into(),
            half_width: DEFAULT_SEARCH_RADIUS,
            match_radius: Some(DEFAULT_SEARCH_RADIUS),
            missions: Vec::new(),
            max_records: DEFAULT_MAX_RECORDS,
            aggressive_check: false,
            constrain_time: true,
        }
    }
}

impl SearchRequest {
    pub fn builder() -> SearchRequestBuilder {
        SearchRequestBuilder::new()
    }
}

/// Builder for [`SearchRequest`] with validation at `build()` time.
#[derive(Debug, Clone, Default)]
pub struct SearchRequestBuilder {
    request: SearchRequest,
}

impl SearchRequestBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            request: SearchRequest::default(),
        }
    }

    pub fn target(mut self, v: impl Into<String>) -> Self {
        self.request.target = v.into();
        self
    }
    pub fn id_type(mut self, v: IdType) -> Self {
        self.request.id_type = v;
        self
    }
    pub fn location(mut self, v: impl Into<String>) -> Self {
        self.request.location = Some(v.into());
        self
    }
    pub fn start(mut self, v: impl Into<String>) -> Self {
        self.request.start = v.into();
        self
    }
    pub fn stop(mut self, v: impl Into<String>) -> Self {
        self.request.stop = v.into();
        self
    }
    pub fn step(mut self, v: impl Into<String>) -> Self {
        self.request.step = v.into();
        self
    }
    pub fn half_width(mut self, v: Degree) -> Self {
        self.request.half_width = v;
        self
    }
    /// Tolerance radius for the verification pass; a negative value disables
    /// the circular fallback.
    pub fn match_radius(mut self, v: Degree) -> Self {
        self.request.match_radius = Some(v);
        self
    }
    pub fn mission(mut self, v: impl Into<String>) -> Self {
        self.request.missions.push(v.into());
        self
    }
    pub fn missions(mut self, v: Vec<String>) -> Self {
        self.request.missions = v;
        self
    }
    pub fn max_records(mut self, v: usize) -> Self {
        self.request.max_records = v;
        self
    }
    pub fn aggressive_check(mut self, v: bool) -> Self {
        self.request.aggressive_check = v;
        self
    }
    pub fn constrain_time(mut self, v: bool) -> Self {
        self.request.constrain_time = v;
        self
    }

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Finalize the builder and produce a [`SearchRequest`].
    ///
    /// Validation rules
    /// -----------------
    /// * `target` must not be blank.
    /// * `start` and `stop` must be `YYYY-MM-DD` dates forming a window of at
    ///   most 30 days.
    /// * `step` must not be blank.
    /// * `half_width > 0.0` – a flat ribbon encloses nothing.
    /// * `max_records >= 1`.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(SearchRequest)` when every rule holds.
    /// * `Err(SkymastError)` naming the first violated rule.
    pub fn build(self) -> Result<SearchRequest, SkymastError> {
        let r = &self.request;

        if r.target.trim().is_empty() {
            return Err(SkymastError::InvalidSearchRequest(
                "target identifier must not be blank".into(),
            ));
        }
        validate_time_range(&r.start, &r.stop)?;
        if r.step.trim().is_empty() {
            return Err(SkymastError::InvalidSearchRequest(
                "sampling step must not be blank".into(),
            ));
        }
        if !Self::gt0(r.half_width) {
            return Err(SkymastError::InvalidSearchRequest(
                "half_width must be strictly positive".into(),
            ));
        }
        if r.max_records == 0 {
            return Err(SkymastError::InvalidSearchRequest(
                "max_records must be at least 1".into(),
            ));
        }

        Ok(self.request)
    }
}

/// Everything produced by one archive search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// The polygon the archive was queried with.
    pub search_region: SearchRegion,
    /// The sampled trajectory the region was built from.
    pub path: Vec<EphemerisSample>,
    /// Observations whose footprint contained the target, in midpoint order.
    pub records: Vec<ObservationRecord>,
}

/// Run the full search pipeline against explicit service implementations.
///
/// The steps, in order:
///
/// 1. sample the target trajectory over the requested window,
/// 2. thicken it into the search region polygon,
/// 3. query the archive for candidate pointings inside that polygon,
/// 4. verify each candidate footprint against the target's position.
///
/// [`crate::skymast::Skymast::search`] binds this to the production Horizons
/// and TAP backends; tests inject table-driven fakes.
pub fn run_search<E, A>(
    request: &SearchRequest,
    ephemeris: &E,
    archive: &A,
) -> Result<SearchOutcome, SkymastError>
where
    E: EphemerisSource,
    A: ObservationArchive,
{
    let (start_epoch, stop_epoch) = validate_time_range(&request.start, &request.stop)?;

    let target = TargetSpec {
        id: request.target.clone(),
        id_type: request.id_type,
        location: request.location.clone(),
    };
    let times = TimeSpec::Range {
        start: request.start.clone(),
        stop: request.stop.clone(),
        step: request.step.clone(),
    };
    let path = ephemeris.fetch(&target, &times)?;
    debug!("trajectory sampled at {} epochs", path.len());

    let search_region = SearchRegion::from_path(&path, request.half_width)?;

    let mut query = ArchiveQuery::new(search_region.region.clone());
    query.missions = request.missions.clone();
    query.max_records = request.max_records;
    if request.constrain_time {
        query.t_min = Some(start_epoch.to_mjd_utc_days());
        query.t_max = Some(stop_epoch.to_mjd_utc_days());
    }
    let candidates = archive.query(&query)?;
    debug!("{} candidate observations in the search region", candidates.len());

    let options = FilterOptions {
        match_radius: request.match_radius,
        aggressive_check: request.aggressive_check,
    };
    let records = verify_footprints(candidates, &target, Some(path.as_slice()), &options, ephemeris)?;

    Ok(SearchOutcome {
        search_region,
        path,
        records,
    })
}
