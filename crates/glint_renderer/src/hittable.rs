//! The `SceneObject` capability and the records produced by a ray hit.

use std::fmt;

use glint_math::{Ray, UnitVector3, Vector3};

use crate::scene::ObjectIdentity;
use crate::Material;

/// Result of a successful ray-primitive intersection.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit<'a> {
    /// World-space point of intersection
    pub point: Vector3,
    /// Unit surface normal at the intersection
    pub normal: UnitVector3,
    /// Material at the intersection point
    pub material: &'a Material,
    /// Distance from the ray origin to `point`
    pub distance: f64,
}

impl<'a> SurfaceHit<'a> {
    /// Tag the hit with the identity of the object that produced it.
    pub fn attach(self, object: &'a ObjectIdentity) -> SurfacePoint<'a> {
        SurfacePoint {
            object,
            point: self.point,
            normal: self.normal,
            material: self.material,
            distance: self.distance,
        }
    }
}

/// A hit resolved against the scene: the nearest surface along a ray.
#[derive(Debug, Clone, Copy)]
pub struct SurfacePoint<'a> {
    /// The object that was hit (identity only)
    pub object: &'a ObjectIdentity,
    pub point: Vector3,
    pub normal: UnitVector3,
    pub material: &'a Material,
    pub distance: f64,
}

/// A primitive that can be placed in a scene and hit by rays.
///
/// The placement is kept apart from the shape: `Positioning` says where the
/// primitive sits, the implementor holds its intrinsic parameters.
pub trait SceneObject: fmt::Debug + Send + Sync {
    /// World-space placement of this kind of primitive.
    type Positioning: fmt::Debug + Send + Sync;

    /// Intersect a ray with this primitive placed at `positioning`.
    ///
    /// Returns the nearest contact in front of the ray origin, if any.
    fn cast<'a>(&'a self, positioning: &Self::Positioning, ray: &Ray) -> Option<SurfaceHit<'a>>;

    /// Short human-readable name for the primitive kind.
    fn kind(&self) -> &'static str;
}

/// Object-safe view of a primitive bound to its positioning.
pub(crate) trait Castable: fmt::Debug + Send + Sync {
    fn cast<'a>(&'a self, ray: &Ray) -> Option<SurfaceHit<'a>>;
}

/// A primitive together with the positioning it was placed at.
#[derive(Debug)]
pub(crate) struct PositionedObject<O: SceneObject> {
    pub positioning: O::Positioning,
    pub object: O,
}

impl<O: SceneObject> Castable for PositionedObject<O> {
    fn cast<'a>(&'a self, ray: &Ray) -> Option<SurfaceHit<'a>> {
        self.object.cast(&self.positioning, ray)
    }
}
