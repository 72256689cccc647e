//! Surface materials for local shading.

use glam::DVec3;

/// Color type alias (RGB values typically 0-1)
pub type Color = DVec3;

/// Reflectance coefficients and base color of a surface.
///
/// The albedos are independent weights and need not sum to one. A material
/// with zero reflection and refraction albedo is opaque and non-reflective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Weight of the Lambertian term
    pub diffuse_albedo: f64,
    /// Weight of the Phong highlight
    pub specular_albedo: f64,
    /// Base color (RGB, 0-1)
    pub diffuse_color: Color,
    /// Phong exponent; larger is a tighter highlight
    pub specular_exponent: f64,
    /// Weight of the mirrored ray's color
    pub reflection_albedo: f64,
    /// Weight of the transmitted ray's color
    pub refractive_albedo: f64,
    /// Index of refraction (1.0 = vacuum, 1.5 = glass)
    pub refractive_index: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse_albedo: 1.0,
            specular_albedo: 0.0,
            diffuse_color: Color::splat(0.5),
            specular_exponent: 1.0,
            reflection_albedo: 0.0,
            refractive_albedo: 0.0,
            refractive_index: 1.0,
        }
    }
}

impl Material {
    /// A purely diffuse material of the given color.
    pub fn new(diffuse_color: Color) -> Self {
        Self {
            diffuse_color,
            ..Default::default()
        }
    }

    /// Set the diffuse and specular weights.
    pub fn with_albedo(mut self, diffuse: f64, specular: f64) -> Self {
        self.diffuse_albedo = diffuse;
        self.specular_albedo = specular;
        self
    }

    pub fn with_specular_exponent(mut self, exponent: f64) -> Self {
        self.specular_exponent = exponent;
        self
    }

    /// Set the weight of the reflected color.
    pub fn with_reflection(mut self, albedo: f64) -> Self {
        self.reflection_albedo = albedo;
        self
    }

    /// Set the weight of the refracted color and the index of refraction.
    pub fn with_refraction(mut self, albedo: f64, refractive_index: f64) -> Self {
        self.refractive_albedo = albedo;
        self.refractive_index = refractive_index;
        self
    }

    /// True if the surface spawns a reflection ray.
    #[inline]
    pub fn is_reflective(&self) -> bool {
        self.reflection_albedo != 0.0
    }

    /// True if the surface spawns a refraction ray.
    #[inline]
    pub fn is_refractive(&self) -> bool {
        self.refractive_albedo != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_material_is_opaque() {
        let material = Material::new(Color::new(1.0, 0.0, 0.0));
        assert!(!material.is_reflective());
        assert!(!material.is_refractive());
        assert_eq!(material.diffuse_albedo, 1.0);
    }

    #[test]
    fn test_builder() {
        let glass = Material::new(Color::new(0.6, 0.7, 0.8))
            .with_albedo(0.0, 0.5)
            .with_specular_exponent(125.0)
            .with_reflection(0.1)
            .with_refraction(0.8, 1.5);

        assert!(glass.is_reflective());
        assert!(glass.is_refractive());
        assert_eq!(glass.refractive_index, 1.5);
        assert_eq!(glass.specular_exponent, 125.0);
    }
}
