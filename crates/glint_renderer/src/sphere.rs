//! Sphere primitive for ray tracing.

use glint_math::{Ray, Vector3};

use crate::hittable::{SceneObject, SurfaceHit};
use crate::scene::{SceneError, SceneResult};
use crate::Material;

/// A sphere of fixed radius. Its positioning is the center point.
#[derive(Debug, Clone)]
pub struct Sphere {
    radius: f64,
    material: Material,
}

impl Sphere {
    /// Create a new sphere. The radius must be finite and positive.
    pub fn new(radius: f64, material: Material) -> SceneResult<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SceneError::InvalidRadius(radius));
        }
        Ok(Self { radius, material })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Distances along the ray to both boundary crossings, near one first.
    ///
    /// Either may be negative (behind the origin). Returns `None` when the
    /// ray's line passes farther from the center than the radius.
    pub fn intersection_distances(&self, center: Vector3, ray: &Ray) -> Option<(f64, f64)> {
        let to_center = center - ray.origin();
        let projection = ray.direction().dot(to_center);
        let center_dist_squared = to_center.norm_squared() - projection * projection;
        let radius_squared = self.radius * self.radius;
        if center_dist_squared > radius_squared {
            return None;
        }

        let half_chord = (radius_squared - center_dist_squared).sqrt();
        Some((projection - half_chord, projection + half_chord))
    }
}

impl SceneObject for Sphere {
    type Positioning = Vector3;

    fn cast<'a>(&'a self, center: &Vector3, ray: &Ray) -> Option<SurfaceHit<'a>> {
        let (near, far) = self.intersection_distances(*center, ray)?;

        // Nearest root in front of the origin
        let distance = if near >= 0.0 { near } else { far };
        if distance < 0.0 {
            return None;
        }

        let point = ray.at(distance);
        Some(SurfaceHit {
            point,
            normal: (point - *center).normalize(),
            material: &self.material,
            distance,
        })
    }

    fn kind(&self) -> &'static str {
        "Sphere"
    }
}
