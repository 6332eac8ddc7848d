//! Full-screen passes recorded by the sequencer itself.

pub mod camera_velocity;
pub mod composite;

pub use camera_velocity::{CameraVelocityPass, VelocityConstants};
pub use composite::{CompositeConstants, CompositeInputs, CompositePass};
