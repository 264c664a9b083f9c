//! Ternary projection and boundary-inclusive polygon containment.
//!
//! Composition space is mapped onto an equilateral triangle with side 100:
//! pure clay sits at the origin, pure sand at `(100, 0)` and pure silt at
//! the apex `(50, 86.6…)`. The same projection is applied to sample points
//! and to every catalog vertex.

use geo::{Coord, LineString, Polygon};
use soil_texture_models::Coordinate;

/// Distance (in projected percent units) within which a point counts as
/// lying on a polygon edge.
pub const BOUNDARY_EPSILON: f64 = 1e-9;

const HALF_SQRT_3: f64 = 0.866_025_403_784_438_6;

/// Projects a composition onto the 2-D ternary plane.
#[must_use]
pub fn project(coordinate: Coordinate) -> Coord<f64> {
    Coord {
        x: coordinate.sand + coordinate.silt / 2.0,
        y: coordinate.silt * HALF_SQRT_3,
    }
}

/// Builds a projected [`Polygon`] from composition-space vertices.
#[must_use]
pub fn to_polygon(vertices: &[Coordinate]) -> Polygon<f64> {
    let exterior: Vec<Coord<f64>> = vertices.iter().copied().map(project).collect();
    Polygon::new(LineString::from(exterior), vec![])
}

/// Returns `true` if `point` lies inside the ring or within
/// [`BOUNDARY_EPSILON`] of one of its edges.
///
/// The ring is closed implicitly; a repeated closing vertex is harmless.
/// Uses the winding-number rule, so rings may be given in either
/// orientation and may be concave.
pub fn ring_contains<I>(ring: I, point: Coord<f64>) -> bool
where
    I: IntoIterator<Item = Coord<f64>>,
{
    let mut vertices = ring.into_iter();
    let Some(first) = vertices.next() else {
        return false;
    };

    let mut winding = 0_i32;
    let mut start = first;

    for end in vertices.chain(std::iter::once(first)) {
        if on_segment(point, start, end) {
            return true;
        }
        winding += crossing(start, end, point);
        start = end;
    }

    winding != 0
}

/// Returns `true` if the sample falls inside (or on the boundary of) the
/// polygon described by `vertices`.
#[must_use]
pub fn polygon_contains(vertices: &[Coordinate], point: Coordinate) -> bool {
    ring_contains(vertices.iter().copied().map(project), project(point))
}

/// Signed area of the parallelogram spanned by `a → b` and `a → p`.
/// Positive when `p` is left of the directed edge.
fn cross(a: Coord<f64>, b: Coord<f64>, p: Coord<f64>) -> f64 {
    (b.x - a.x).mul_add(p.y - a.y, -((p.x - a.x) * (b.y - a.y)))
}

/// Winding contribution of edge `a → b` for a rightward ray from `p`.
fn crossing(a: Coord<f64>, b: Coord<f64>, p: Coord<f64>) -> i32 {
    if a.y <= p.y {
        if b.y > p.y && cross(a, b, p) > 0.0 {
            return 1;
        }
    } else if b.y <= p.y && cross(a, b, p) < 0.0 {
        return -1;
    }
    0
}

fn on_segment(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length = dx.hypot(dy);

    if length <= BOUNDARY_EPSILON {
        return (p.x - a.x).hypot(p.y - a.y) <= BOUNDARY_EPSILON;
    }

    if cross(a, b, p).abs() / length > BOUNDARY_EPSILON {
        return false;
    }

    // Projection of p onto the edge, as a distance from a.
    let along = (p.x - a.x).mul_add(dx, (p.y - a.y) * dy) / length;
    along >= -BOUNDARY_EPSILON && along <= length + BOUNDARY_EPSILON
}
