//! Winding-direction tests and correction for polygon region strings.
//!
//! Containment tests downstream expect counter-clockwise rings. The test here is a planar
//! signed loop over (lon, lat) vertices with two sky-specific fixups applied first:
//!
//! * rings straddling the RA 0/360 discontinuity are made contiguous by shifting the
//!   vertices on the low side of the mean longitude by +360°;
//! * rings near a celestial pole (|mean latitude| ≥ [`POLE_REPROJECTION_LATITUDE`]) are
//!   re-expressed in galactic coordinates for the test, where they are far from any pole.
//!
//! The sign convention is inverted with respect to the usual Cartesian shoelace: right
//! ascension increases leftward on the sky, so a positive loop sum here means
//! counter-clockwise as seen on a sky plot. Callers that cannot tolerate a failure
//! (batch filters) get the lenient string-level API, which logs and assumes the winding
//! is correct when a ring cannot be interpreted.

use itertools::Itertools;
use tracing::warn;

use crate::constants::{Degree, POLE_REPROJECTION_LATITUDE};
use crate::ref_frame::ring_to_galactic;
use crate::skymast_errors::SkymastError;

/// Signed loop sum over a closed ring, after wraparound and pole fixups.
///
/// Positive result means counter-clockwise. A duplicated closing vertex is dropped before
/// the test; fewer than 3 remaining vertices is a degenerate ring.
pub fn ring_is_counter_clockwise(ring: &[(Degree, Degree)]) -> Result<bool, SkymastError> {
    let mut ring = ring.to_vec();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 {
        return Err(SkymastError::DegenerateRing(format!(
            "{} distinct vertices, need at least 3",
            ring.len()
        )));
    }

    let mean_lat = ring.iter().map(|&(_, lat)| lat).sum::<f64>() / ring.len() as f64;
    if mean_lat.abs() >= POLE_REPROJECTION_LATITUDE {
        ring = ring_to_galactic(&ring);
    }

    unwrap_longitudes(&mut ring);

    let mut total = 0.0;
    for i in 0..ring.len() {
        let (lon1, lat1) = ring[i];
        let (lon2, lat2) = ring[(i + 1) % ring.len()];
        total += (lon2 - lon1) * (lat2 + lat1);
    }
    Ok(total > 0.0)
}

/// Make a ring contiguous in longitude when it straddles the 0/360 boundary.
///
/// A spread of 180° or more across vertices of a small ring can only come from the
/// discontinuity; vertices below the mean longitude are shifted up by one turn.
fn unwrap_longitudes(ring: &mut [(Degree, Degree)]) {
    let max_lon = ring.iter().map(|&(lon, _)| lon).fold(f64::MIN, f64::max);
    let min_lon = ring.iter().map(|&(lon, _)| lon).fold(f64::MAX, f64::min);
    let delta = (max_lon - min_lon).rem_euclid(360.0);
    if delta < 180.0 {
        return;
    }

    let mean_lon = ring.iter().map(|&(lon, _)| lon).sum::<f64>() / ring.len() as f64;
    for vertex in ring.iter_mut() {
        if vertex.0 < mean_lon {
            vertex.0 += 360.0;
        }
    }
}

/// Extract the ring of a `POLYGON` region string, strictly.
///
/// Unlike [`super::parse_s_region`], every token after the keyword must be numeric: a
/// stray label here usually indicates a multi-part region whose winding is not
/// well defined as a single ring.
fn strict_polygon_ring(region_text: &str) -> Result<Vec<(Degree, Degree)>, SkymastError> {
    let mut tokens = region_text.split_whitespace();
    let Some(shape) = tokens.next() else {
        return Err(SkymastError::UnsupportedRegionShape(String::from(
            "<empty>",
        )));
    };
    if !shape.eq_ignore_ascii_case("POLYGON") {
        return Err(SkymastError::UnsupportedRegionShape(shape.to_string()));
    }

    let values = tokens
        .map(|token| {
            token.parse::<f64>().map_err(|_| {
                SkymastError::MalformedRegion(format!("non-numeric ring token: {token}"))
            })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    if values.len() % 2 != 0 {
        return Err(SkymastError::MalformedRegion(format!(
            "odd coordinate count ({}) in ring",
            values.len()
        )));
    }
    Ok(values.iter().tuples().map(|(&lon, &lat)| (lon, lat)).collect())
}

/// Winding test on a `POLYGON` region string.
///
/// Degenerate or uninterpretable input logs a warning and reports `true` (winding assumed
/// correct) so that a single malformed region never takes down a filtering pass.
pub fn is_counter_clockwise(region_text: &str) -> bool {
    let ring = match strict_polygon_ring(region_text) {
        Ok(ring) => ring,
        Err(err) => {
            warn!("assuming correct winding for uninterpretable region: {err}");
            return true;
        }
    };
    match ring_is_counter_clockwise(&ring) {
        Ok(ccw) => ccw,
        Err(err) => {
            warn!("assuming correct winding for degenerate ring: {err}");
            true
        }
    }
}

/// Reverse the vertex order of a `POLYGON` region string, keeping the leading keyword.
pub fn reverse_region(region_text: &str) -> Result<String, SkymastError> {
    let ring = strict_polygon_ring(region_text)?;
    let shape = region_text
        .split_whitespace()
        .next()
        .unwrap_or("POLYGON");

    let flipped = ring
        .iter()
        .rev()
        .map(|(lon, lat)| format!("{lon} {lat}"))
        .join(" ");
    Ok(format!("{shape} {flipped}"))
}

/// Canonicalize a `POLYGON` region string to counter-clockwise winding.
///
/// Idempotent: a ring that already tests counter-clockwise is returned unchanged.
pub fn ensure_counter_clockwise(region_text: &str) -> String {
    if is_counter_clockwise(region_text) {
        return region_text.to_string();
    }
    match reverse_region(region_text) {
        Ok(reversed) => reversed,
        Err(err) => {
            warn!("leaving region unchanged, reversal failed: {err}");
            region_text.to_string()
        }
    }
}
