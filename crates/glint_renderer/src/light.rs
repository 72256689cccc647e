//! Point light sources.

use crate::scene::{SceneError, SceneResult};

/// A point light.
///
/// A light carries no position of its own; the scene pairs each light with
/// the position it was placed at, so one definition can be placed many times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    intensity: f64,
}

impl Light {
    /// Create a light. The intensity must be finite and positive.
    pub fn new(intensity: f64) -> SceneResult<Self> {
        if !(intensity.is_finite() && intensity > 0.0) {
            return Err(SceneError::InvalidLightIntensity(intensity));
        }
        Ok(Self { intensity })
    }

    #[inline]
    pub fn intensity(&self) -> f64 {
        self.intensity
    }
}
