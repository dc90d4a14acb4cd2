use crate::math::{Point2, Vector2};

use super::VesicleParams;

/// A single diffusing vesicle.
///
/// The display position trails the center by the radius on each axis so a
/// renderer can draw the bounding square directly. `claimed` holds the
/// indices of the mesh triangles this vesicle currently occupies; only
/// [`Vesicles`](super::Vesicles) mutates it, in lockstep with the mesh
/// occupancy flags.
#[derive(Debug, Clone)]
pub struct Vesicle {
    center: Point2,
    position: Point2,
    radius: f64,
    diffusion_coeff: f64,
    dt: f64,
    sample_count: usize,
    claimed: Vec<usize>,
}

impl Vesicle {
    pub(crate) fn new(center: Point2, params: &VesicleParams, claimed: Vec<usize>) -> Self {
        Self {
            center,
            position: Self::display_position(center, params.radius),
            radius: params.radius,
            diffusion_coeff: params.diffusion_coeff,
            dt: params.dt,
            sample_count: params.sample_count,
            claimed,
        }
    }

    /// Moves the vesicle to an accepted candidate position, replacing its
    /// claimed-triangle set. The caller has already updated the mesh
    /// occupancy flags to match.
    pub(crate) fn commit(&mut self, center: Point2, claimed: Vec<usize>) {
        self.center = center;
        self.position = Self::display_position(center, self.radius);
        self.claimed = claimed;
    }

    fn display_position(center: Point2, radius: f64) -> Point2 {
        center - Vector2::new(radius, radius)
    }

    /// Center of the vesicle.
    #[must_use]
    pub fn center(&self) -> Point2 {
        self.center
    }

    /// Display position (center offset by the radius on each axis).
    #[must_use]
    pub fn position(&self) -> Point2 {
        self.position
    }

    /// Vesicle radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Diffusion coefficient `D`.
    #[must_use]
    pub fn diffusion_coeff(&self) -> f64 {
        self.diffusion_coeff
    }

    /// Timestep used for each diffusion draw.
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of perimeter samples (inert; see [`VesicleParams`]).
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Indices of the mesh triangles this vesicle currently claims.
    #[must_use]
    pub fn claimed(&self) -> &[usize] {
        &self.claimed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> VesicleParams {
        VesicleParams {
            radius: 2.0,
            diffusion_coeff: 1.0,
            dt: 0.1,
            sample_count: 0,
        }
    }

    #[test]
    fn display_position_trails_center() {
        let v = Vesicle::new(Point2::new(10.0, 7.0), &params(), vec![3]);
        assert_relative_eq!(v.position().x, 8.0);
        assert_relative_eq!(v.position().y, 5.0);
        assert_eq!(v.claimed(), &[3]);
    }

    #[test]
    fn commit_moves_center_position_and_claims() {
        let mut v = Vesicle::new(Point2::new(10.0, 7.0), &params(), vec![3]);
        v.commit(Point2::new(11.0, 6.0), vec![4, 5]);
        assert_relative_eq!(v.center().x, 11.0);
        assert_relative_eq!(v.position().x, 9.0);
        assert_relative_eq!(v.position().y, 4.0);
        assert_eq!(v.claimed(), &[4, 5]);
    }
}
