//! Scene components for the viewer.
//!
//! This crate provides:
//! - The viewer camera
//! - The orbit behaviour that circles it around the model

pub mod camera;
pub mod orbit;

pub use camera::Camera;
pub use orbit::{OrbitInput, OrbitRotator, spherical_to_cartesian};
