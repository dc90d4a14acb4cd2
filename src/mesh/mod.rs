mod occupancy;

pub use occupancy::circle_overlaps_triangle;

use crate::error::{MeshError, Result};
use crate::math::{Point2, Vector2, TOLERANCE};

/// Parameters controlling mesh construction.
#[derive(Debug, Clone, Copy)]
pub struct MeshParams {
    /// Number of lattice rows.
    pub rows: usize,
    /// Number of lattice columns.
    pub cols: usize,
    /// Lattice edge length.
    pub edge_length: f64,
    /// Offset applied to every lattice point.
    pub origin: Vector2,
}

/// A single mesh triangle with precomputed edge normals and centroid.
///
/// `normals[i]` is the outward unit normal of the edge from `vertices[i]`
/// to `vertices[(i + 1) % 3]`. The occupancy flag is owned by the mesh and
/// mutated only through [`Mesh::set_occupied`].
#[derive(Debug, Clone)]
pub struct Triangle {
    vertices: [Point2; 3],
    normals: [Vector2; 3],
    centroid: Point2,
    occupied: bool,
}

impl Triangle {
    /// Builds a triangle from three vertices, computing outward unit edge
    /// normals and the centroid.
    ///
    /// Each edge vector is rotated 90 degrees and the result is flipped
    /// where needed so that the normal points away from the centroid. The
    /// two triangle orientations produced by the alternating diagonal
    /// split wind differently, so the flip cannot be baked into the
    /// rotation direction.
    #[must_use]
    pub fn new(v0: Point2, v1: Point2, v2: Point2) -> Self {
        let vertices = [v0, v1, v2];
        let centroid = Point2::new(
            (v0.x + v1.x + v2.x) / 3.0,
            (v0.y + v1.y + v2.y) / 3.0,
        );

        let mut normals = [Vector2::zeros(); 3];
        for i in 0..3 {
            let a = vertices[i];
            let b = vertices[(i + 1) % 3];
            let edge = b - a;
            let mut normal = Vector2::new(-edge.y, edge.x);
            let len = normal.norm();
            if len > TOLERANCE {
                normal /= len;
            }
            if (centroid - a).dot(&normal) > 0.0 {
                normal = -normal;
            }
            normals[i] = normal;
        }

        Self {
            vertices,
            normals,
            centroid,
            occupied: false,
        }
    }

    /// The three vertices.
    #[must_use]
    pub fn vertices(&self) -> &[Point2; 3] {
        &self.vertices
    }

    /// The three outward unit edge normals.
    #[must_use]
    pub fn normals(&self) -> &[Vector2; 3] {
        &self.normals
    }

    /// The centroid (arithmetic mean of the vertices), computed once at
    /// construction.
    #[must_use]
    pub fn centroid(&self) -> Point2 {
        self.centroid
    }

    /// Whether some vesicle currently claims this triangle.
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.occupied
    }
}

/// A triangulated tiling of the simulation area over a hexagonally-offset
/// point lattice.
///
/// Triangle indices are stable for the mesh's lifetime: no triangle is
/// inserted or removed after construction, and the index is the identity
/// used by the occupancy bookkeeping.
#[derive(Debug, Clone)]
pub struct Mesh {
    points: Vec<Point2>,
    triangles: Vec<Triangle>,
}

impl Mesh {
    /// Builds the lattice and its triangulation.
    ///
    /// Lattice point at row `j`, column `i` sits at
    /// `x = i*L + (j mod 2)*L/2 + origin.x`, `y = j*L*sqrt(3)/2 + origin.y`,
    /// so adjacent rows interlock hexagonally. Each 2x2 block of lattice
    /// points yields two triangles; the diagonal split alternates with row
    /// parity to keep the triangulation isotropic.
    #[must_use]
    pub fn build(params: &MeshParams) -> Self {
        let points = Self::generate_lattice(params);
        let triangles = Self::triangulate(&points, params.rows, params.cols);
        Self { points, triangles }
    }

    #[allow(clippy::cast_precision_loss)]
    fn generate_lattice(params: &MeshParams) -> Vec<Point2> {
        let l = params.edge_length;
        let row_height = l * 3.0_f64.sqrt() / 2.0;
        let mut points = Vec::with_capacity(params.rows * params.cols);
        for j in 0..params.rows {
            let shift = if j % 2 == 1 { l / 2.0 } else { 0.0 };
            for i in 0..params.cols {
                points.push(Point2::new(
                    i as f64 * l + shift + params.origin.x,
                    j as f64 * row_height + params.origin.y,
                ));
            }
        }
        points
    }

    fn triangulate(points: &[Point2], rows: usize, cols: usize) -> Vec<Triangle> {
        if rows < 2 || cols < 2 {
            return Vec::new();
        }
        let mut triangles = Vec::with_capacity(2 * (rows - 1) * (cols - 1));
        for j in 0..rows - 1 {
            for i in 0..cols - 1 {
                let idx = j * cols + i;
                let p0 = points[idx];
                let p1 = points[idx + 1];
                let p2 = points[idx + cols];
                let p3 = points[idx + cols + 1];

                if j % 2 == 0 {
                    triangles.push(Triangle::new(p0, p1, p2));
                    triangles.push(Triangle::new(p1, p3, p2));
                } else {
                    triangles.push(Triangle::new(p0, p1, p3));
                    triangles.push(Triangle::new(p0, p3, p2));
                }
            }
        }
        triangles
    }

    /// The lattice points.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// The triangles, indexed by their stable identity.
    #[must_use]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Maximum x-coordinate over all lattice points.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::EmptyMesh`] if the lattice has no points.
    pub fn max_x(&self) -> Result<f64> {
        self.max_coordinate(|p| p.x)
    }

    /// Maximum y-coordinate over all lattice points.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::EmptyMesh`] if the lattice has no points.
    pub fn max_y(&self) -> Result<f64> {
        self.max_coordinate(|p| p.y)
    }

    fn max_coordinate(&self, coord: impl Fn(&Point2) -> f64) -> Result<f64> {
        if self.points.is_empty() {
            return Err(MeshError::EmptyMesh.into());
        }
        Ok(self
            .points
            .iter()
            .map(coord)
            .fold(f64::NEG_INFINITY, f64::max))
    }

    pub(crate) fn set_occupied(&mut self, index: usize, occupied: bool) {
        self.triangles[index].occupied = occupied;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(rows: usize, cols: usize, edge_length: f64) -> MeshParams {
        MeshParams {
            rows,
            cols,
            edge_length,
            origin: Vector2::new(0.0, 0.0),
        }
    }

    #[test]
    fn lattice_rows_interlock() {
        let mesh = Mesh::build(&params(3, 3, 10.0));
        assert_eq!(mesh.points().len(), 9);

        // Row 0 starts at x = 0; row 1 is shifted by half an edge.
        assert_relative_eq!(mesh.points()[0].x, 0.0);
        assert_relative_eq!(mesh.points()[3].x, 5.0);
        assert_relative_eq!(mesh.points()[6].x, 0.0);

        let row_height = 10.0 * 3.0_f64.sqrt() / 2.0;
        assert_relative_eq!(mesh.points()[3].y, row_height);
        assert_relative_eq!(mesh.points()[6].y, 2.0 * row_height);
    }

    #[test]
    fn lattice_honors_origin() {
        let mesh = Mesh::build(&MeshParams {
            rows: 2,
            cols: 2,
            edge_length: 4.0,
            origin: Vector2::new(50.0, 50.0),
        });
        assert_relative_eq!(mesh.points()[0].x, 50.0);
        assert_relative_eq!(mesh.points()[0].y, 50.0);
        assert_relative_eq!(mesh.points()[1].x, 54.0);
    }

    #[test]
    fn triangle_count_matches_block_grid() {
        // (rows-1) x (cols-1) blocks, two triangles each.
        let mesh = Mesh::build(&params(3, 3, 10.0));
        assert_eq!(mesh.triangle_count(), 8);

        let mesh = Mesh::build(&params(5, 7, 1.0));
        assert_eq!(mesh.triangle_count(), 2 * 4 * 6);
    }

    #[test]
    fn degenerate_grids_have_no_triangles() {
        assert_eq!(Mesh::build(&params(1, 5, 1.0)).triangle_count(), 0);
        assert_eq!(Mesh::build(&params(5, 1, 1.0)).triangle_count(), 0);
    }

    #[test]
    fn normals_are_unit_length() {
        let mesh = Mesh::build(&params(4, 4, 10.0));
        for tri in mesh.triangles() {
            for n in tri.normals() {
                assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn normals_point_outward_for_every_triangle() {
        // The centroid must be strictly on the inward side of every edge,
        // for both winding variants produced by the alternating split.
        let mesh = Mesh::build(&params(5, 5, 10.0));
        for tri in mesh.triangles() {
            let c = tri.centroid();
            for (v, n) in tri.vertices().iter().zip(tri.normals()) {
                assert!(
                    (c - v).dot(n) < 0.0,
                    "normal points inward for vertex {v:?}"
                );
            }
        }
    }

    #[test]
    fn centroid_is_vertex_mean() {
        let tri = Triangle::new(
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(0.0, 3.0),
        );
        assert_relative_eq!(tri.centroid().x, 1.0);
        assert_relative_eq!(tri.centroid().y, 1.0);
    }

    #[test]
    fn bounds_cover_the_lattice() {
        let mesh = Mesh::build(&params(3, 3, 10.0));
        // Odd rows extend half an edge further right.
        assert_relative_eq!(mesh.max_x().unwrap(), 25.0);
        assert_relative_eq!(mesh.max_y().unwrap(), 10.0 * 3.0_f64.sqrt());
    }

    #[test]
    fn empty_lattice_bounds_fail() {
        let mesh = Mesh::build(&params(0, 0, 10.0));
        assert!(mesh.max_x().is_err());
        assert!(mesh.max_y().is_err());
    }

    #[test]
    fn triangles_start_unoccupied() {
        let mesh = Mesh::build(&params(3, 3, 10.0));
        assert!(mesh.triangles().iter().all(|t| !t.is_occupied()));
    }
}
