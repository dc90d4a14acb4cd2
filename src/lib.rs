pub mod error;
pub mod math;
pub mod mesh;
pub mod sim;

pub use error::{Result, VesicaError};
