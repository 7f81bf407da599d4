//! Search region construction.
//!
//! The archive is queried with a single polygon that covers the whole
//! trajectory of the target over the requested window. The polygon is a
//! ribbon: the path swept down by the half-width, then back up along the
//! other side. Offsets are applied in declination only, which keeps the
//! construction robust at every position angle of motion while slightly
//! thinning the effective width for paths moving mostly north-south; the
//! per-observation verification pass catches anything the ribbon overreaches.

use itertools::Itertools;

use crate::constants::Degree;
use crate::ephemeris::EphemerisSample;
use crate::skymast_errors::SkymastError;
use crate::stcs::winding::ensure_counter_clockwise;

/// The archive search polygon built around a target trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRegion {
    /// Region text, `POLYGON lon lat ...`, counter-clockwise.
    pub region: String,
    /// Half-width of the ribbon, degrees.
    pub half_width: Degree,
}

impl SearchRegion {
    /// Thicken an ephemeris path into a closed search polygon.
    ///
    /// The ring walks the path once at `dec - half_width` and returns along
    /// the reversed path at `dec + half_width`, so it always holds an even
    /// number of vertices, two per sample, and is reoriented counter-clockwise
    /// before use.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: Trajectory samples in time order, at least two.
    /// * `half_width`: Ribbon half-width in degrees, strictly positive.
    ///
    /// Return
    /// ----------
    /// * The search region, or a [`SkymastError::DegeneratePath`] /
    ///   [`SkymastError::DegenerateRing`] when the inputs cannot enclose any
    ///   area.
    pub fn from_path(path: &[EphemerisSample], half_width: Degree) -> Result<Self, SkymastError> {
        if path.len() < 2 {
            return Err(SkymastError::DegeneratePath(format!(
                "{} trajectory samples, need at least 2",
                path.len()
            )));
        }
        if !(half_width > 0.0) {
            return Err(SkymastError::DegenerateRing(format!(
                "ribbon half-width must be strictly positive, got {half_width}"
            )));
        }

        let lower = path.iter().map(|s| (s.ra, s.dec - half_width));
        let upper = path.iter().rev().map(|s| (s.ra, s.dec + half_width));
        let region = format!(
            "POLYGON {}",
            lower
                .chain(upper)
                .map(|(lon, lat)| format!("{lon} {lat}"))
                .join(" ")
        );

        Ok(SearchRegion {
            region: ensure_counter_clockwise(&region),
            half_width,
        })
    }
}
