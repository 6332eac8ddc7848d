//! Scene-side inputs of the orchestrator
//!
//! - Camera: projection parameters and cached view / projection matrices
//! - Aabb: world-space bounds of shadow casters

pub mod camera;

pub use camera::{Aabb, Camera, ProjectionType};
