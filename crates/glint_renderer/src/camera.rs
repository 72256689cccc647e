//! Camera for ray generation and rendering.

use std::time::Instant;

use glint_math::{Ray, UnitVector3, Vector3};

use crate::renderer::{ImageBuffer, RenderConfig, Tracer};
use crate::scene::{SceneError, SceneResult};
use crate::tile::{render_tile, render_tiles, Tile, TileResult};
use crate::{Color, Scene};

/// A view onto one scene.
///
/// Created by [`Scene::setup_camera`], which checks that `forward` and `up`
/// are perpendicular. The camera only borrows the scene, so the scene stays
/// frozen for as long as any camera on it exists.
#[derive(Debug, Clone)]
pub struct Camera<'s> {
    scene: &'s Scene,
    position: Vector3,
    forward: UnitVector3,
    up: UnitVector3,
    field_of_view: f64,
    config: RenderConfig,
}

impl<'s> Camera<'s> {
    pub(crate) fn new(
        scene: &'s Scene,
        position: Vector3,
        forward: UnitVector3,
        up: UnitVector3,
        field_of_view: f64,
    ) -> Self {
        Self {
            scene,
            position,
            forward,
            up,
            field_of_view,
            config: RenderConfig::default(),
        }
    }

    /// Replace the render settings.
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// The scene this camera looks into.
    pub fn scene(&self) -> &'s Scene {
        self.scene
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn forward(&self) -> UnitVector3 {
        self.forward
    }

    pub fn up(&self) -> UnitVector3 {
        self.up
    }

    /// Field of view in radians.
    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Build the view-plane frame for an image of the given size.
    pub fn projection(&self, width: u32, height: u32) -> Projection {
        Projection {
            position: self.position,
            screen_center: self.position + self.forward,
            screen_x: self.forward.cross(self.up).normalize(),
            screen_y: self.up,
            half_extent: (self.field_of_view / 2.0).tan(),
            aspect_ratio: width as f64 / height as f64,
            width,
            height,
        }
    }

    /// Render the scene to a `width`×`height` image, in parallel.
    pub fn render(&self, width: u32, height: u32) -> SceneResult<ImageBuffer> {
        self.render_with(width, height, |full, shade| {
            render_tiles(full, self.config.tile_threshold, shade)
        })
    }

    /// Render the scene on the calling thread only.
    ///
    /// Produces exactly the same image as [`Camera::render`].
    pub fn render_sequential(&self, width: u32, height: u32) -> SceneResult<ImageBuffer> {
        self.render_with(width, height, |full, shade| vec![render_tile(full, shade)])
    }

    fn render_with<R>(&self, width: u32, height: u32, run: R) -> SceneResult<ImageBuffer>
    where
        R: FnOnce(Tile, &(dyn Fn(u32, u32) -> Color + Sync)) -> Vec<TileResult>,
    {
        if width == 0 || height == 0 {
            return Err(SceneError::EmptyImage { width, height });
        }
        self.config.validate()?;

        let projection = self.projection(width, height);
        let tracer = Tracer::new(self.scene, &self.config);
        let shade = |x: u32, y: u32| tracer.trace(&projection.ray_for_pixel(x, y));

        log::info!(
            "Rendering {}x{} ({} objects, {} lights)",
            width,
            height,
            self.scene.object_count(),
            self.scene.light_count()
        );
        let start = Instant::now();

        let results = run(Tile::full(width, height), &shade);

        let mut image = ImageBuffer::new(width, height);
        let tile_count = results.len();
        for result in &results {
            image.blit(result);
        }

        log::info!(
            "Render complete: {} tiles in {:.2}s",
            tile_count,
            start.elapsed().as_secs_f64()
        );
        Ok(image)
    }
}

/// The view plane of a camera for one image size.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    position: Vector3,
    screen_center: Vector3,
    screen_x: UnitVector3,
    screen_y: UnitVector3,
    half_extent: f64,
    aspect_ratio: f64,
    width: u32,
    height: u32,
}

impl Projection {
    /// Primary ray through the center of pixel `(i, j)`.
    ///
    /// Columns run left to right and rows top to bottom.
    pub fn ray_for_pixel(&self, i: u32, j: u32) -> Ray {
        let ndc_x = 2.0 * (i as f64 + 0.5) / self.width as f64 - 1.0;
        let ndc_y = 1.0 - 2.0 * (j as f64 + 0.5) / self.height as f64;

        let view_point = self.screen_center
            + self.screen_x * (ndc_x * self.half_extent * self.aspect_ratio)
            + self.screen_y * (ndc_y * self.half_extent);
        Ray::towards(self.position, view_point)
    }
}
