//! Equatorial → Galactic frame rotation.
//!
//! Used by the winding test to re-express rings that sit close to a celestial pole in a
//! frame where they are far from any pole, so that the planar signed-loop test keeps a
//! meaningful sign. The rotation is applied to unit vectors on the sphere; nothing here is
//! ever stored back into a region string.

use nalgebra::{Rotation3, Vector3};

use crate::constants::{Degree, RADEG};

/// North galactic pole, ICRS right ascension (IAU, J2000).
const NGP_RA: Degree = 192.85948;
/// North galactic pole, ICRS declination (IAU, J2000).
const NGP_DEC: Degree = 27.12825;
/// Galactic longitude of the north celestial pole (IAU, J2000).
const NCP_GALACTIC_LON: Degree = 122.93192;

/// Unit vector on the sphere for a (ra, dec) pair in degrees.
pub(crate) fn radec_to_unit(ra: Degree, dec: Degree) -> Vector3<f64> {
    let (ra_r, dec_r) = (ra * RADEG, dec * RADEG);
    Vector3::new(
        dec_r.cos() * ra_r.cos(),
        dec_r.cos() * ra_r.sin(),
        dec_r.sin(),
    )
}

/// Back-conversion of a unit vector into (ra, dec) degrees, with ra normalized to [0, 360).
pub(crate) fn unit_to_radec(v: &Vector3<f64>) -> (Degree, Degree) {
    let dec = v.z.clamp(-1.0, 1.0).asin() / RADEG;
    let mut ra = v.y.atan2(v.x) / RADEG;
    if ra < 0.0 {
        ra += 360.0;
    }
    (ra, dec)
}

/// Rotation taking equatorial (ICRS) unit vectors into the Galactic frame.
///
/// Composed from elementary axis rotations: spin the pole's right ascension to zero, tilt
/// the celestial pole onto the galactic pole, then set the zero point of galactic
/// longitude.
pub(crate) fn galactic_rotation() -> Rotation3<f64> {
    let rz_pole = Rotation3::from_axis_angle(&Vector3::z_axis(), -NGP_RA * RADEG);
    let ry_align = Rotation3::from_axis_angle(&Vector3::y_axis(), -(90.0 - NGP_DEC) * RADEG);
    let rz_spin = Rotation3::from_axis_angle(&Vector3::z_axis(), (NCP_GALACTIC_LON - 180.0) * RADEG);
    rz_spin * ry_align * rz_pole
}

/// Re-express a ring of (ra, dec) vertices in galactic (l, b) coordinates.
pub(crate) fn ring_to_galactic(ring: &[(Degree, Degree)]) -> Vec<(Degree, Degree)> {
    let rot = galactic_rotation();
    ring.iter()
        .map(|&(ra, dec)| unit_to_radec(&(rot * radec_to_unit(ra, dec))))
        .collect()
}
