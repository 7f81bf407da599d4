//! Footprint verification.
//!
//! The archive query only guarantees that a footprint's *reference position*
//! fell inside the search polygon, so every candidate still has to be checked
//! against the target's actual position. The pass works in two tiers:
//!
//! 1. a coarse test of the target position at the exposure midpoint against
//!    the decoded footprint,
//! 2. for survivorless records, a refined scan of the whole sampled
//!    trajectory against the same footprint.
//!
//! All midpoint positions are fetched in a single batched ephemeris request.
//! A record whose region text cannot be decoded is reported unmatched with a
//! warning instead of failing the pass.

use tracing::{debug, warn};

use crate::archive::ObservationRecord;
use crate::constants::{Degree, JulianDate, DEFAULT_SEARCH_RADIUS, JDTOMJD, TESS_FOOTPRINT_FLOOR_JD};
use crate::ephemeris::{EphemerisSample, EphemerisSource, TargetSpec, TimeSpec};
use crate::skymast_errors::SkymastError;
use crate::stcs::containment::{circle_intersects_ring, point_in_circle, point_in_ring};
use crate::stcs::parse_s_region;

/// Options governing the footprint verification pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    /// Radius of the tolerance circle drawn around the target position,
    /// degrees. `None` or a negative value disables the circular fallback and
    /// keeps only exact point-in-footprint matches.
    pub match_radius: Option<Degree>,
    /// Restrict the refined scan to trajectory samples inside each record's
    /// own time bounds. Faster, but drops matches when the archive time
    /// metadata is loose. Off by default.
    pub aggressive_check: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        FilterOptions {
            match_radius: Some(DEFAULT_SEARCH_RADIUS),
            aggressive_check: false,
        }
    }
}

/// Coarse match of one target position against one decoded footprint.
///
/// The position matches when it falls inside the footprint ring, or, with a
/// tolerance radius configured, when the footprint reference position falls
/// inside the tolerance circle or the circle reaches the ring at all.
fn position_matches(
    target: (Degree, Degree),
    reference: (Degree, Degree),
    ring: &[(Degree, Degree)],
    match_radius: Option<Degree>,
) -> bool {
    if point_in_ring(target, ring) {
        return true;
    }
    match match_radius {
        Some(radius) if radius >= 0.0 => {
            point_in_circle(reference, target, radius)
                || circle_intersects_ring(target, radius, ring)
        }
        _ => false,
    }
}

/// Refined scan: does any trajectory sample land in the footprint?
fn trajectory_matches(
    trajectory: &[EphemerisSample],
    record: &ObservationRecord,
    ring: &[(Degree, Degree)],
    options: &FilterOptions,
) -> bool {
    trajectory.iter().any(|sample| {
        if options.aggressive_check {
            let sample_mjd = sample.epoch_jd - JDTOMJD;
            if sample_mjd < record.t_min || sample_mjd > record.t_max {
                return false;
            }
        }
        position_matches(
            (sample.ra, sample.dec),
            (record.s_ra, record.s_dec),
            ring,
            options.match_radius,
        )
    })
}

fn check_record(
    record: &ObservationRecord,
    midpoint: &EphemerisSample,
    trajectory: Option<&[EphemerisSample]>,
    options: &FilterOptions,
) -> Result<bool, SkymastError> {
    let ring = parse_s_region(&record.s_region)?.to_polygon_ring();
    if position_matches(
        (midpoint.ra, midpoint.dec),
        (record.s_ra, record.s_dec),
        &ring,
        options.match_radius,
    ) {
        return Ok(true);
    }
    match trajectory {
        Some(trajectory) => Ok(trajectory_matches(trajectory, record, &ring, options)),
        None => Ok(false),
    }
}

#[cfg(feature = "progress")]
fn verification_bar(total: u64) -> indicatif::ProgressBar {
    let pb = indicatif::ProgressBar::new(total.max(1));
    pb.set_style(
        indicatif::ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise}",
        )
        .expect("indicatif template"),
    );
    pb
}

/// Keep only the records whose footprint contained the moving target.
///
/// The records are sorted by exposure midpoint, the target position at every
/// midpoint is fetched in one batched request, and each record is then tested
/// with [`FilterOptions`] in effect. Records observed from TESS before its
/// first science footprints exist (JD 2456778.5) are dropped up front.
///
/// Arguments
/// -----------------
/// * `records`: Candidate observations from the archive query.
/// * `target`: Body and observing site the candidates were searched for.
/// * `trajectory`: The sampled path used to build the search region, enabling
///   the refined scan when present.
/// * `options`: Tolerance radius and refined-scan behavior.
/// * `ephemeris`: Source used for the batched midpoint positions.
///
/// Return
/// ----------
/// * The matching records, still in midpoint order. An empty candidate list
///   short-circuits to an empty result without any ephemeris request.
pub fn verify_footprints<E: EphemerisSource>(
    mut records: Vec<ObservationRecord>,
    target: &TargetSpec,
    trajectory: Option<&[EphemerisSample]>,
    options: &FilterOptions,
    ephemeris: &E,
) -> Result<Vec<ObservationRecord>, SkymastError> {
    if records.is_empty() {
        return Ok(records);
    }

    records.sort_by(|a, b| a.t_mid.total_cmp(&b.t_mid));

    if let Some(location) = &target.location {
        if location.eq_ignore_ascii_case("@TESS") {
            let before = records.len();
            records.retain(|record| record.t_mid > TESS_FOOTPRINT_FLOOR_JD);
            if before != records.len() {
                debug!(
                    "dropped {} records predating the first TESS footprints",
                    before - records.len()
                );
            }
            if records.is_empty() {
                return Ok(records);
            }
        }
    }

    let midpoints: Vec<JulianDate> = records.iter().map(|record| record.t_mid).collect();
    let positions = ephemeris.fetch(target, &TimeSpec::Epochs(midpoints))?;
    if positions.len() != records.len() {
        return Err(SkymastError::HorizonsPayload(format!(
            "midpoint ephemeris returned {} rows for {} records",
            positions.len(),
            records.len()
        )));
    }

    #[cfg(feature = "progress")]
    let pb = verification_bar(records.len() as u64);

    let mut matched = Vec::with_capacity(records.len());
    for (record, midpoint) in records.into_iter().zip(&positions) {
        let keep = match check_record(&record, midpoint, trajectory, options) {
            Ok(keep) => keep,
            Err(error) => {
                warn!(
                    "footprint of {} not checkable, assuming no match: {error}",
                    record.obs_id
                );
                false
            }
        };
        if keep {
            matched.push(record);
        }

        #[cfg(feature = "progress")]
        pb.inc(1);
    }

    #[cfg(feature = "progress")]
    pb.finish_and_clear();

    debug!("{} of {} footprints contained the target", matched.len(), positions.len());
    Ok(matched)
}
