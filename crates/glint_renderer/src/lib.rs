//! Glint renderer - a recursive Whitted-style CPU ray tracer.
//!
//! A [`Scene`] holds positioned lights and objects. A [`Camera`] obtained
//! from [`Scene::setup_camera`] casts one primary ray per pixel and follows
//! each ray through shading, shadows, reflection and refraction. Rendering
//! is split into tiles that run in parallel on the rayon pool.

mod camera;
mod hittable;
mod light;
mod material;
mod plane;
mod renderer;
mod scene;
mod sphere;
mod tile;

pub use camera::{Camera, Projection};
pub use hittable::{SceneObject, SurfaceHit, SurfacePoint};
pub use light::Light;
pub use material::{Color, Material};
pub use plane::{
    GridPattern, GridPatternParallelogramPlane, ParallelogramPlanePositioning, PlanePositioning,
};
pub use renderer::{color_to_rgb, reflect, refract, tone_map, ImageBuffer, RenderConfig, Tracer};
pub use scene::{ObjectIdentity, Scene, SceneError, SceneResult, PERPENDICULAR_TOLERANCE};
pub use sphere::Sphere;
pub use tile::{render_tile, render_tiles, Tile, TileResult};

/// Re-export the math types from glint_math
pub use glint_math::{Interval, Ray, UnitVector3, Vector3};
