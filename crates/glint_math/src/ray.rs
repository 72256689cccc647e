use crate::{UnitVector3, Vector3};

/// A ray in 3D space with an origin and a unit direction.
///
/// Because the direction is unit length, the parameter `t` of [`Ray::at`]
/// is also the distance travelled from the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: UnitVector3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vector3, direction: UnitVector3) -> Self {
        Self { origin, direction }
    }

    /// Create a ray from `origin` towards `target`.
    pub fn towards(origin: Vector3, target: Vector3) -> Self {
        Self::new(origin, (target - origin).normalize())
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vector3 {
        self.origin
    }

    /// Get the direction of the ray.
    #[inline]
    pub fn direction(&self) -> UnitVector3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f64) -> Vector3 {
        self.origin + self.direction * t
    }
}
