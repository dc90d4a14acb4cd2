mod engine;
mod vesicle;

pub use engine::Vesicles;
pub use vesicle::Vesicle;

use crate::error::{Result, SimulationError};
use crate::math::Point2;

/// Per-vesicle configuration supplied at placement time.
#[derive(Debug, Clone, Copy)]
pub struct VesicleParams {
    /// Vesicle radius.
    pub radius: f64,
    /// Diffusion coefficient `D` in the Einstein relation.
    pub diffusion_coeff: f64,
    /// Timestep used for each diffusion draw.
    pub dt: f64,
    /// Number of perimeter samples. Stored but currently unused by the
    /// occupancy test; kept for a future sample-based overlap predicate.
    pub sample_count: usize,
}

impl VesicleParams {
    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if the radius or
    /// timestep is non-finite or non-positive, or if the diffusion
    /// coefficient is non-finite or negative.
    pub fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(SimulationError::InvalidParameter {
                parameter: "radius",
                value: self.radius,
            }
            .into());
        }
        if !self.diffusion_coeff.is_finite() || self.diffusion_coeff < 0.0 {
            return Err(SimulationError::InvalidParameter {
                parameter: "diffusion_coeff",
                value: self.diffusion_coeff,
            }
            .into());
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimulationError::InvalidParameter {
                parameter: "dt",
                value: self.dt,
            }
            .into());
        }
        Ok(())
    }
}

/// Render-facing copy of one triangle.
#[derive(Debug, Clone)]
pub struct TriangleView {
    /// The three vertices.
    pub vertices: [Point2; 3],
    /// Occupancy flag at snapshot time.
    pub occupied: bool,
}

/// Render-facing copy of one vesicle.
#[derive(Debug, Clone, Copy)]
pub struct VesicleView {
    /// Center of the vesicle.
    pub center: Point2,
    /// Display position (center offset by the radius on each axis).
    pub position: Point2,
    /// Vesicle radius.
    pub radius: f64,
}

/// A consistent copy of the simulation state for rendering.
///
/// A renderer running on another thread must never observe a torn
/// occupancy map, so it takes an owned snapshot once per frame instead of
/// reading the live engine.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// All mesh triangles, in stable index order.
    pub triangles: Vec<TriangleView>,
    /// All vesicles, in insertion order.
    pub vesicles: Vec<VesicleView>,
}
