use crate::math::Point2;

use super::Triangle;

/// Tests whether a query circle overlaps a mesh triangle.
///
/// `centroid_distance` is the precomputed distance from `center` to the
/// triangle's centroid (the caller already has it from the broad phase).
///
/// The predicate is deliberately looser than a true circle-polygon
/// intersection:
/// 1. the circle contains the centroid, or
/// 2. the circle's center lies inside the triangle (half-plane test
///    against the outward edge normals), or
/// 3. some triangle vertex lies within the circle.
///
/// Case 3 handles the circle clipping a corner without containing the
/// centroid.
#[must_use]
pub fn circle_overlaps_triangle(
    triangle: &Triangle,
    center: Point2,
    radius: f64,
    centroid_distance: f64,
) -> bool {
    if centroid_distance <= radius {
        return true;
    }

    if center_inside(triangle, center) {
        return true;
    }

    triangle
        .vertices()
        .iter()
        .any(|v| (v - center).norm() <= radius)
}

/// Half-plane test: a point is inside the triangle iff it is on the inward
/// side of every edge, i.e. `(p - v_i) . n_i <= 0` for all three outward
/// normals.
fn center_inside(triangle: &Triangle, p: Point2) -> bool {
    triangle
        .vertices()
        .iter()
        .zip(triangle.normals())
        .all(|(v, n)| (p - v).dot(n) <= 0.0)
}
