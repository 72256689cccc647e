//! Glint math - vectors, rays and intervals for the ray tracer.
//!
//! Geometry is double precision throughout. [`Vector3`] is a plain
//! immutable 3-vector; [`UnitVector3`] is a vector known by construction to
//! have length one, or to be the distinguished zero vector.

// Re-export glam for convenience
pub use glam::DVec3;

mod interval;
mod ray;
mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{AlgebraError, AlgebraResult, UnitVector3, Vector3};

