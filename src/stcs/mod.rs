//! # Simplified STC-S region handling
//!
//! Archive footprints and constructed search regions share one textual encoding, a strict
//! subset of STC-S:
//!
//! ```text
//! POLYGON <lon1> <lat1> <lon2> <lat2> ... <lonN> <latN>
//! CIRCLE <lon> <lat> <radius>
//! ```
//!
//! All values are degrees, space-separated, with no enclosing punctuation. This module owns
//! the conversion between that wire format and the typed [`SkyRegion`] representation, plus
//! the expansion of circles into polygons so that downstream containment tests only ever
//! deal with rings.
//!
//! Parsing is deliberately lenient about stray non-numeric tokens (frame labels such as
//! `ICRS` or `J2000` appear in real archive metadata) but strict about the leading shape
//! keyword: anything other than `POLYGON` or `CIRCLE` is reported as unsupported and the
//! caller decides how to degrade.

pub mod containment;
pub mod winding;

use std::fmt;

use itertools::Itertools;
use nalgebra::{Rotation3, Vector3};

use crate::constants::{Degree, CIRCLE_POLYGON_RESOLUTION, DPI, RADEG};
use crate::ref_frame::unit_to_radec;
use crate::skymast_errors::SkymastError;

/// A spatial region on the sky.
///
/// The two shapes the archive wire format can express. A polygon ring is implicitly
/// closed (the last vertex connects back to the first); rings used for containment tests
/// are expected to be counter-clockwise, which the search-region builder guarantees via
/// [`winding::ensure_counter_clockwise`].
#[derive(Debug, Clone, PartialEq)]
pub enum SkyRegion {
    Polygon {
        vertices: Vec<(Degree, Degree)>,
    },
    Circle {
        center: (Degree, Degree),
        radius: Degree,
    },
}

impl SkyRegion {
    /// View this region as a polygon ring, expanding circles to
    /// [`CIRCLE_POLYGON_RESOLUTION`] vertices.
    pub fn to_polygon_ring(&self) -> Vec<(Degree, Degree)> {
        match self {
            SkyRegion::Polygon { vertices } => vertices.clone(),
            SkyRegion::Circle { center, radius } => {
                circle_to_ring(*center, *radius, CIRCLE_POLYGON_RESOLUTION)
            }
        }
    }
}

impl fmt::Display for SkyRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkyRegion::Polygon { vertices } => {
                write!(
                    f,
                    "POLYGON {}",
                    vertices
                        .iter()
                        .map(|(lon, lat)| format!("{lon} {lat}"))
                        .join(" ")
                )
            }
            SkyRegion::Circle { center, radius } => {
                write!(f, "CIRCLE {} {} {}", center.0, center.1, radius)
            }
        }
    }
}

/// Parse a region string into a [`SkyRegion`].
///
/// Only the first whitespace token decides the shape, case-insensitively. For `POLYGON`,
/// every following token that parses as a float is consumed; numeric tokens pair up in
/// order, even index → longitude, odd index → latitude. For `CIRCLE`, the first three
/// numeric tokens are center longitude, center latitude and radius.
///
/// Arguments
/// -----------------
/// * `text`: The region string, e.g. `POLYGON 10 10 20 10 20 20` or `CIRCLE 50 10 0.01`.
///
/// Return
/// ----------
/// * The parsed [`SkyRegion`], or [`SkymastError::UnsupportedRegionShape`] /
///   [`SkymastError::MalformedRegion`].
///
/// See also
/// ------------
/// * [`SkyRegion::to_polygon_ring`] – Circle expansion for containment tests.
/// * [`winding::is_counter_clockwise`] – Winding test on the same wire format.
pub fn parse_s_region(text: &str) -> Result<SkyRegion, SkymastError> {
    let trimmed = text.trim();
    let Some(shape) = trimmed.split_whitespace().next() else {
        return Err(SkymastError::UnsupportedRegionShape(String::from(
            "<empty>",
        )));
    };

    let values: Vec<f64> = trimmed
        .split_whitespace()
        .skip(1)
        .filter_map(|token| token.parse::<f64>().ok())
        .collect();

    if shape.eq_ignore_ascii_case("POLYGON") {
        if values.is_empty() {
            return Err(SkymastError::MalformedRegion(format!(
                "polygon without coordinates: {trimmed}"
            )));
        }
        if values.len() % 2 != 0 {
            return Err(SkymastError::MalformedRegion(format!(
                "odd coordinate count ({}) in polygon: {trimmed}",
                values.len()
            )));
        }
        let vertices = values
            .iter()
            .tuples()
            .map(|(&lon, &lat)| (lon, lat))
            .collect();
        Ok(SkyRegion::Polygon { vertices })
    } else if shape.eq_ignore_ascii_case("CIRCLE") {
        if values.len() < 3 {
            return Err(SkymastError::MalformedRegion(format!(
                "circle needs center and radius: {trimmed}"
            )));
        }
        Ok(SkyRegion::Circle {
            center: (values[0], values[1]),
            radius: values[2],
        })
    } else {
        Err(SkymastError::UnsupportedRegionShape(shape.to_string()))
    }
}

/// Expand a circle into a ring of `resolution` vertices.
///
/// A small circle of the requested angular radius is sampled around the north pole, then
/// rotated onto the center with Rz(lon)·Ry(90°−lat). Sampling before rotation keeps the
/// vertices evenly spaced on the sphere regardless of the center's latitude.
pub fn circle_to_ring(
    center: (Degree, Degree),
    radius: Degree,
    resolution: usize,
) -> Vec<(Degree, Degree)> {
    let rot = Rotation3::from_axis_angle(&Vector3::z_axis(), center.0 * RADEG)
        * Rotation3::from_axis_angle(&Vector3::y_axis(), (90.0 - center.1) * RADEG);

    let radius_rad = radius * RADEG;
    (0..resolution)
        .map(|i| {
            let lon = DPI * i as f64 / resolution as f64;
            let on_pole = Vector3::new(
                radius_rad.sin() * lon.cos(),
                radius_rad.sin() * lon.sin(),
                radius_rad.cos(),
            );
            unit_to_radec(&(rot * on_pole))
        })
        .collect()
}
