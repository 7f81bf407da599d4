//! Observation archive access.
//!
//! [`ObservationRecord`] is the typed row shared by the whole pipeline; the
//! [`ObservationArchive`] trait hides the actual archive behind a seam so the
//! verification pass can be tested against in-memory fixtures. The production
//! implementation is [`tap::TapArchive`].

pub mod tap;

use std::collections::HashMap;

use ahash::RandomState;

use crate::constants::{Degree, JulianDate, DEFAULT_MAX_RECORDS, JDTOMJD, MJD};
use crate::skymast_errors::SkymastError;
use crate::time::{jd_to_iso, mjd_to_iso};

/// Archive columns not consumed by the pipeline, keyed by column name.
pub type ExtraColumns = HashMap<String, String, RandomState>;

/// One candidate observation returned by the archive.
///
/// The typed fields are the ones the verification pass needs; everything else
/// the archive returned is kept verbatim in [`extra`](Self::extra). The
/// midpoint epoch and the ISO-8601 date annotations are derived once at
/// construction so downstream consumers never recompute them.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    pub obs_id: String,
    pub obs_collection: String,
    pub target_name: String,
    pub instrument_name: String,
    /// Footprint reference position, ICRS degrees.
    pub s_ra: Degree,
    pub s_dec: Degree,
    /// Exposure start, MJD UTC.
    pub t_min: MJD,
    /// Exposure end, MJD UTC.
    pub t_max: MJD,
    /// Raw footprint region text as published by the archive.
    pub s_region: String,
    /// Exposure midpoint, JD UTC.
    pub t_mid: JulianDate,
    /// ISO-8601 rendering of [`t_mid`](Self::t_mid).
    pub obs_mid_date: String,
    /// ISO-8601 rendering of [`t_min`](Self::t_min).
    pub start_date: String,
    /// ISO-8601 rendering of [`t_max`](Self::t_max).
    pub end_date: String,
    pub extra: ExtraColumns,
}

impl ObservationRecord {
    /// Build a record from its required archive columns.
    ///
    /// Derives the exposure midpoint `(t_min + t_max) / 2` as a Julian Date
    /// and the human-readable date annotations. Optional columns start empty
    /// and are filled by the archive decoder.
    pub fn new(
        obs_id: impl Into<String>,
        s_ra: Degree,
        s_dec: Degree,
        t_min: MJD,
        t_max: MJD,
        s_region: impl Into<String>,
    ) -> Self {
        let t_mid = (t_min + t_max) / 2.0 + JDTOMJD;
        ObservationRecord {
            obs_id: obs_id.into(),
            obs_collection: String::new(),
            target_name: String::new(),
            instrument_name: String::new(),
            s_ra,
            s_dec,
            t_min,
            t_max,
            s_region: s_region.into(),
            t_mid,
            obs_mid_date: jd_to_iso(t_mid),
            start_date: mjd_to_iso(t_min),
            end_date: mjd_to_iso(t_max),
            extra: ExtraColumns::default(),
        }
    }
}

/// Parameters of one archive search.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveQuery {
    /// Spatial constraint as a `POLYGON lon lat ...` region string.
    pub region: String,
    /// Optional exposure time window, MJD UTC. Both bounds must be present
    /// for the window to apply.
    pub t_min: Option<MJD>,
    pub t_max: Option<MJD>,
    /// Restrict to these collections; empty means all.
    pub missions: Vec<String>,
    /// Cap on the number of returned rows.
    pub max_records: usize,
}

impl ArchiveQuery {
    pub fn new(region: impl Into<String>) -> Self {
        ArchiveQuery {
            region: region.into(),
            t_min: None,
            t_max: None,
            missions: Vec::new(),
            max_records: DEFAULT_MAX_RECORDS,
        }
    }
}

/// Access to an archive of pointed observations.
pub trait ObservationArchive {
    fn query(&self, query: &ArchiveQuery) -> Result<Vec<ObservationRecord>, SkymastError>;
}
