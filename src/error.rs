use thiserror::Error;

/// Top-level error type for the vesica diffusion engine.
#[derive(Debug, Error)]
pub enum VesicaError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// Errors related to mesh construction and queries.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("mesh has no lattice points")]
    EmptyMesh,
}

/// Errors related to vesicle placement and diffusion.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("parameter {parameter} = {value} must be finite and positive")]
    InvalidParameter { parameter: &'static str, value: f64 },

    #[error("vesicle radius {radius} does not fit the mesh bounds {max_x} x {max_y}")]
    RadiusExceedsBounds { radius: f64, max_x: f64, max_y: f64 },
}

/// Convenience type alias for results using [`VesicaError`].
pub type Result<T> = std::result::Result<T, VesicaError>;
