use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tracing::{debug, trace};

use crate::error::{Result, SimulationError};
use crate::math::{Point2, Vector2};
use crate::mesh::{circle_overlaps_triangle, Mesh};

use super::{Snapshot, TriangleView, Vesicle, VesicleParams, VesicleView};

/// Rejection threshold for the annulus vector sum of the boundary
/// heuristic. An isotropic triangle distribution around a vesicle sums to
/// near zero; a magnitude above this means triangles are missing on one
/// side, i.e. the vesicle sits near or over the mesh boundary.
const BOUNDARY_SUM_THRESHOLD: f64 = 50.0;

/// The set of all vesicles plus the mesh they diffuse on.
///
/// This is the sole mutator of the mesh occupancy flags. The central
/// consistency invariant: a triangle's occupied flag is true iff its index
/// appears in some vesicle's claimed set, and no operation (accepted or
/// rejected) may let the two drift apart.
#[derive(Debug)]
pub struct Vesicles {
    mesh: Mesh,
    vesicles: Vec<Vesicle>,
    rng: StdRng,
}

impl Vesicles {
    /// Creates an empty vesicle set over `mesh`.
    ///
    /// `seed` fixes the RNG for reproducible runs; `None` seeds from the
    /// thread RNG.
    #[must_use]
    pub fn new(mesh: Mesh, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::seed_from_u64(rand::rng().random()),
        };
        Self {
            mesh,
            vesicles: Vec::new(),
            rng,
        }
    }

    /// The mesh the vesicles diffuse on.
    #[must_use]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// The vesicles, in insertion order.
    #[must_use]
    pub fn vesicles(&self) -> &[Vesicle] {
        &self.vesicles
    }

    /// Number of vesicles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vesicles.len()
    }

    /// Whether no vesicle has been placed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vesicles.is_empty()
    }

    /// Attempts to place one new vesicle at a uniformly random position
    /// inside `[r, max_x - r] x [r, max_y - r]`, rejection-sampling up to
    /// `max_attempts` candidates.
    ///
    /// Returns `Ok(true)` when a vesicle was placed and `Ok(false)` when
    /// every attempt was rejected. Exhaustion is a documented best-effort
    /// outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] for invalid vesicle
    /// parameters, [`SimulationError::RadiusExceedsBounds`] when the
    /// sampling window is empty, and [`MeshError::EmptyMesh`]
    /// (via the bounds queries) for a mesh without lattice points.
    ///
    /// [`MeshError::EmptyMesh`]: crate::error::MeshError::EmptyMesh
    pub fn place(&mut self, params: &VesicleParams, max_attempts: usize) -> Result<bool> {
        params.validate()?;
        let max_x = self.mesh.max_x()?;
        let max_y = self.mesh.max_y()?;
        let r = params.radius;
        if max_x - r < r || max_y - r < r {
            return Err(SimulationError::RadiusExceedsBounds {
                radius: r,
                max_x,
                max_y,
            }
            .into());
        }

        for _ in 0..max_attempts {
            let center = Point2::new(
                self.rng.random_range(r..=max_x - r),
                self.rng.random_range(r..=max_y - r),
            );
            if let Some(claimed) = self.validate(r, &[], center) {
                trace!(x = center.x, y = center.y, "placed vesicle");
                self.vesicles.push(Vesicle::new(center, params, claimed));
                return Ok(true);
            }
        }

        debug!(max_attempts, "placement exhausted without a valid position");
        Ok(false)
    }

    /// Places up to `count` vesicles, best effort.
    ///
    /// Returns the number actually placed, which may be smaller than
    /// `count` when the mesh is crowded.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Vesicles::place`].
    pub fn place_many(
        &mut self,
        params: &VesicleParams,
        count: usize,
        max_attempts: usize,
    ) -> Result<usize> {
        let mut placed = 0;
        for _ in 0..count {
            if self.place(params, max_attempts)? {
                placed += 1;
            }
        }
        Ok(placed)
    }

    /// Advances every vesicle by one Brownian step.
    ///
    /// Each vesicle independently draws an isotropic Gaussian displacement
    /// scaled by `sqrt(2 * D * dt)`, and the move is committed only if the
    /// candidate position validates against the shared occupancy map. A
    /// rejected move leaves the vesicle exactly as it was; it waits for
    /// the next tick's independent draw.
    pub fn step(&mut self) {
        let mut accepted = 0_usize;
        let mut rejected = 0_usize;

        for i in 0..self.vesicles.len() {
            let (center, radius, scale) = {
                let v = &self.vesicles[i];
                let scale = (2.0 * v.diffusion_coeff() * v.dt()).sqrt();
                (v.center(), v.radius(), scale)
            };
            let old_claimed = self.vesicles[i].claimed().to_vec();

            let zx: f64 = self.rng.sample(StandardNormal);
            let zy: f64 = self.rng.sample(StandardNormal);
            let candidate = center + Vector2::new(scale * zx, scale * zy);

            if let Some(claimed) = self.validate(radius, &old_claimed, candidate) {
                self.vesicles[i].commit(candidate, claimed);
                accepted += 1;
            } else {
                rejected += 1;
            }
        }

        trace!(accepted, rejected, "diffusion tick");
    }

    /// Takes an owned, consistent copy of the render-relevant state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            triangles: self
                .mesh
                .triangles()
                .iter()
                .map(|t| TriangleView {
                    vertices: *t.vertices(),
                    occupied: t.is_occupied(),
                })
                .collect(),
            vesicles: self
                .vesicles
                .iter()
                .map(|v| VesicleView {
                    center: v.center(),
                    position: v.position(),
                    radius: v.radius(),
                })
                .collect(),
        }
    }

    /// Validates a candidate position of radius `radius` against the mesh,
    /// treating the triangles in `old_claimed` as the candidate's own
    /// previous territory.
    ///
    /// On acceptance, atomically reassigns the occupancy flags (clears
    /// `old_claimed`, sets the new set) and returns the new claimed set.
    /// On rejection, returns `None` and mutates nothing.
    fn validate(&mut self, radius: f64, old_claimed: &[usize], center: Point2) -> Option<Vec<usize>> {
        // Broad phase plus boundary annulus in one pass over all centroids.
        let mut candidates = Vec::new();
        let mut distances = Vec::with_capacity(self.mesh.triangle_count());
        let mut drift = Vector2::zeros();
        for (i, tri) in self.mesh.triangles().iter().enumerate() {
            let diff = tri.centroid() - center;
            let d = diff.norm();
            distances.push(d);
            if d <= 3.0 * radius {
                candidates.push(i);
            }
            if radius <= d && d <= 2.0 * radius {
                drift += diff;
            }
        }

        // A lopsided annulus means the mesh is missing on one side of the
        // candidate: it is near or over the boundary.
        if drift.norm() > BOUNDARY_SUM_THRESHOLD {
            return None;
        }

        // Entirely off the mesh.
        if candidates.is_empty() {
            return None;
        }

        let mut new_claimed = Vec::new();
        for &i in &candidates {
            let tri = &self.mesh.triangles()[i];
            if circle_overlaps_triangle(tri, center, radius, distances[i]) {
                if tri.is_occupied() && !old_claimed.contains(&i) {
                    // Another vesicle's territory.
                    return None;
                }
                new_claimed.push(i);
            }
        }

        for &i in old_claimed {
            self.mesh.set_occupied(i, false);
        }
        for &i in &new_claimed {
            self.mesh.set_occupied(i, true);
        }
        Some(new_claimed)
    }
}
