//! Planar containment tests on decoded regions.
//!
//! Footprints and match circles are small (arcminutes to a few degrees), so the tests
//! work directly on (lon, lat) treated as planar coordinates, the same approximation the
//! archive metadata itself is built with. No wraparound handling happens here: rings
//! decoded from archive rows are contiguous, and the search pipeline never feeds a
//! straddling ring to a containment test.

use crate::constants::Degree;

/// Ray-casting point-in-ring test.
///
/// The ring is implicitly closed. Returns `false` for rings with fewer than 3 vertices.
pub fn point_in_ring(point: (Degree, Degree), ring: &[(Degree, Degree)]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let (px, py) = point;
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Planar point-in-circle test (boundary inclusive).
pub fn point_in_circle(point: (Degree, Degree), center: (Degree, Degree), radius: Degree) -> bool {
    let dx = point.0 - center.0;
    let dy = point.1 - center.1;
    dx * dx + dy * dy <= radius * radius
}

/// Distance from a point to a segment.
fn point_segment_distance(
    point: (Degree, Degree),
    a: (Degree, Degree),
    b: (Degree, Degree),
) -> f64 {
    let (px, py) = point;
    let (ax, ay) = a;
    let (bx, by) = b;

    let (dx, dy) = (bx - ax, by - ay);
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
    }

    let t = (((px - ax) * dx + (py - ay) * dy) / length_sq).clamp(0.0, 1.0);
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

/// Whether a circle and a ring overlap.
///
/// True when the circle's center lies inside the ring, or when any ring edge passes
/// within the radius. The second clause also covers a ring entirely swallowed by the
/// circle, since such a ring has all its edges within the radius.
pub fn circle_intersects_ring(
    center: (Degree, Degree),
    radius: Degree,
    ring: &[(Degree, Degree)],
) -> bool {
    if point_in_ring(center, ring) {
        return true;
    }
    if ring.len() < 2 {
        return false;
    }

    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        if point_segment_distance(center, ring[j], ring[i]) <= radius {
            return true;
        }
        j = i;
    }
    false
}
