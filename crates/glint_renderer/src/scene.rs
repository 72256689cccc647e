//! Scene registry: positioned lights and objects plus global settings.
//!
//! A scene is built incrementally by the caller and is read-only while a
//! [`Camera`] renders it.

use std::fmt;
use std::hash::{Hash, Hasher};

use glint_math::{Ray, UnitVector3, Vector3};
use thiserror::Error;

use crate::hittable::{Castable, PositionedObject, SceneObject, SurfacePoint};
use crate::{Camera, Color, Light};

/// Largest |a · b| accepted for two unit vectors to count as perpendicular.
pub const PERPENDICULAR_TOLERANCE: f64 = 1e-9;

/// Errors raised when building a scene or setting up a render.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("The {what} are not perpendicular to each other (dot product {dot})")]
    NotPerpendicular { what: &'static str, dot: f64 },

    #[error("Degenerate {0}")]
    DegenerateDirection(&'static str),

    #[error("Invalid sphere radius: {0}")]
    InvalidRadius(f64),

    #[error("Invalid grid pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid light intensity: {0}")]
    InvalidLightIntensity(f64),

    #[error("Invalid field of view: {0} radians")]
    InvalidFieldOfView(f64),

    #[error("Cannot render an empty {width}x{height} image")]
    EmptyImage { width: u32, height: u32 },

    #[error("Invalid render config: {0}")]
    InvalidRenderConfig(String),
}

/// Result type for scene construction.
pub type SceneResult<T> = Result<T, SceneError>;

pub(crate) fn check_perpendicular(
    a: UnitVector3,
    b: UnitVector3,
    what: &'static str,
) -> SceneResult<()> {
    let dot = a.dot(b);
    if dot.abs() > PERPENDICULAR_TOLERANCE {
        return Err(SceneError::NotPerpendicular { what, dot });
    }
    Ok(())
}

/// Handle to an object placed in a scene.
///
/// Ids are assigned in increasing order per scene and never reused.
/// Two identities are equal when their ids are equal.
#[derive(Debug, Clone)]
pub struct ObjectIdentity {
    id: u32,
    name: String,
}

impl ObjectIdentity {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for ObjectIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ObjectIdentity {}

impl Hash for ObjectIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]({})", self.id, self.name)
    }
}

/// A light paired with where it was placed.
#[derive(Debug, Clone, Copy)]
struct Lighting {
    position: Vector3,
    light: Light,
}

#[derive(Debug)]
struct SceneEntry {
    identity: ObjectIdentity,
    object: Box<dyn Castable>,
}

/// A complete scene: lights, objects, background and ambient medium.
#[derive(Debug)]
pub struct Scene {
    background: Color,
    refractive_index: f64,
    next_id: u32,
    lights: Vec<Lighting>,
    objects: Vec<SceneEntry>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            background: Color::ZERO,
            refractive_index: 1.0,
            next_id: 1,
            lights: Vec::new(),
            objects: Vec::new(),
        }
    }
}

impl Scene {
    /// Create an empty scene with a black background in vacuum.
    pub fn new() -> Self {
        Self::default()
    }

    /// Color returned by rays that hit nothing.
    pub fn set_background_color(&mut self, color: Color) {
        self.background = color;
    }

    pub fn background_color(&self) -> Color {
        self.background
    }

    /// Refractive index of the medium surrounding every object.
    pub fn set_refractive_index(&mut self, index: f64) {
        self.refractive_index = index;
    }

    pub fn refractive_index(&self) -> f64 {
        self.refractive_index
    }

    /// Place a light at `position`.
    pub fn put_light(&mut self, light: Light, position: Vector3) {
        log::debug!(
            "Placed light (intensity {}) at {}",
            light.intensity(),
            position
        );
        self.lights.push(Lighting { position, light });
    }

    /// Place an object, naming it after its primitive kind.
    pub fn put_object<O>(&mut self, object: O, positioning: O::Positioning) -> ObjectIdentity
    where
        O: SceneObject + 'static,
    {
        let name = object.kind().to_string();
        self.put_named_object(object, positioning, name)
    }

    /// Place an object under an explicit name.
    pub fn put_named_object<O>(
        &mut self,
        object: O,
        positioning: O::Positioning,
        name: impl Into<String>,
    ) -> ObjectIdentity
    where
        O: SceneObject + 'static,
    {
        let identity = ObjectIdentity {
            id: self.next_id,
            name: name.into(),
        };
        self.next_id += 1;

        log::debug!("Placed {} {} at {:?}", object.kind(), identity, positioning);

        self.objects.push(SceneEntry {
            identity: identity.clone(),
            object: Box::new(PositionedObject {
                positioning,
                object,
            }),
        });
        identity
    }

    /// Create a camera looking into this scene.
    ///
    /// `forward` and `up` must be non-zero and perpendicular, and the field
    /// of view (radians) must lie strictly between 0 and π.
    pub fn setup_camera(
        &self,
        position: Vector3,
        forward: UnitVector3,
        up: UnitVector3,
        field_of_view: f64,
    ) -> SceneResult<Camera<'_>> {
        if forward.is_zero() {
            return Err(SceneError::DegenerateDirection("camera forward direction"));
        }
        if up.is_zero() {
            return Err(SceneError::DegenerateDirection("camera up direction"));
        }
        check_perpendicular(forward, up, "camera forward and up directions")?;
        if !(field_of_view > 0.0 && field_of_view < std::f64::consts::PI) {
            return Err(SceneError::InvalidFieldOfView(field_of_view));
        }

        log::debug!(
            "Camera at {} facing {} (up {}, fov {:.3} rad)",
            position,
            forward,
            up,
            field_of_view
        );
        Ok(Camera::new(self, position, forward, up, field_of_view))
    }

    /// Get the number of objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Get the number of lights.
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Identities of all objects, in insertion order.
    pub fn identities(&self) -> impl Iterator<Item = &ObjectIdentity> {
        self.objects.iter().map(|entry| &entry.identity)
    }

    /// Look up an object's identity by id.
    pub fn identity(&self, id: u32) -> Option<&ObjectIdentity> {
        self.identities().find(|identity| identity.id == id)
    }

    /// Positions and lights, in insertion order.
    pub fn lights(&self) -> impl Iterator<Item = (Vector3, &Light)> {
        self.lights.iter().map(|l| (l.position, &l.light))
    }

    /// Find the nearest surface along `ray` closer than `far_plane`.
    ///
    /// Linear scan over every object; ties keep the earlier object.
    pub fn intersect(&self, ray: &Ray, far_plane: f64) -> Option<SurfacePoint<'_>> {
        let mut closest_so_far = f64::MAX;
        let mut nearest = None;

        for entry in &self.objects {
            if let Some(hit) = entry.object.cast(ray) {
                if hit.distance < closest_so_far {
                    closest_so_far = hit.distance;
                    nearest = Some(hit.attach(&entry.identity));
                }
            }
        }

        // Ignore rays that travel too far
        nearest.filter(|_| closest_so_far < far_plane)
    }
}
