//! Core recursive ray tracer.
//!
//! Implements Whitted-style shading with:
//! - Phong diffuse and specular terms from point lights, with hard shadows
//! - Mirror reflection and Snell refraction, recursing to a fixed depth
//! - Tone mapping that rescales bright colors instead of clipping them

use glint_math::{Interval, Ray, UnitVector3, Vector3};
use image::RgbImage;

use crate::hittable::SurfacePoint;
use crate::scene::{SceneError, SceneResult};
use crate::tile::TileResult;
use crate::{Color, Scene};

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Rays deeper than this contribute the background color
    pub max_depth: u32,
    /// Hits at or beyond this distance count as misses
    pub far_plane: f64,
    /// Offset of secondary ray origins from the surface
    pub surface_offset: f64,
    /// Tiles with at most this many pixels are rendered sequentially
    pub tile_threshold: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            far_plane: 1000.0,
            surface_offset: 1e-3,
            tile_threshold: 100,
        }
    }
}

impl RenderConfig {
    /// Check that every setting is usable.
    pub fn validate(&self) -> SceneResult<()> {
        if !(self.far_plane > 0.0) {
            return Err(SceneError::InvalidRenderConfig(format!(
                "far plane must be positive, got {}",
                self.far_plane
            )));
        }
        if !(self.surface_offset.is_finite() && self.surface_offset > 0.0) {
            return Err(SceneError::InvalidRenderConfig(format!(
                "surface offset must be positive, got {}",
                self.surface_offset
            )));
        }
        if self.tile_threshold == 0 {
            return Err(SceneError::InvalidRenderConfig(
                "tile threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Traces rays through a scene.
///
/// Borrows the scene immutably, so any number of tracers may run on
/// different threads at once.
#[derive(Debug, Clone, Copy)]
pub struct Tracer<'a> {
    scene: &'a Scene,
    config: &'a RenderConfig,
}

impl<'a> Tracer<'a> {
    pub fn new(scene: &'a Scene, config: &'a RenderConfig) -> Self {
        Self { scene, config }
    }

    /// Color seen along a primary ray.
    pub fn trace(&self, ray: &Ray) -> Color {
        self.cast_ray(ray, 0)
            .unwrap_or_else(|| self.scene.background_color())
    }

    /// Compute the color seen by a ray at the given recursion depth.
    ///
    /// Returns `None` when the ray hits nothing or the depth limit is
    /// exceeded; the caller substitutes the background color.
    pub fn cast_ray(&self, ray: &Ray, depth: u32) -> Option<Color> {
        if depth > self.config.max_depth {
            return None;
        }

        let surface = self.scene.intersect(ray, self.config.far_plane)?;
        let material = surface.material;
        let background = self.scene.background_color();

        let reflect_color = if material.is_reflective() {
            let direction = reflect(ray.direction(), surface.normal);
            self.cast_secondary(&surface, direction, depth)
                .unwrap_or(background)
        } else {
            Color::ZERO
        };

        let refract_color = if material.is_refractive() {
            refract(
                ray.direction(),
                surface.normal,
                self.scene.refractive_index(),
                material.refractive_index,
            )
            .and_then(|direction| self.cast_secondary(&surface, direction, depth))
            .unwrap_or(background)
        } else {
            Color::ZERO
        };

        let mut diffuse_intensity = 0.0;
        let mut specular_intensity = 0.0;
        for (light_position, light) in self.scene.lights() {
            let light_dir = (light_position - surface.point).normalize();
            if self.is_shadowed(&surface, light_position, light_dir) {
                continue;
            }

            diffuse_intensity += light.intensity() * light_dir.dot(surface.normal).max(0.0);

            let highlight = reflect(-light_dir, surface.normal).dot(-ray.direction());
            if highlight > 0.0 {
                specular_intensity +=
                    light.intensity() * highlight.powf(material.specular_exponent);
            }
        }

        let color = material.diffuse_color * (diffuse_intensity * material.diffuse_albedo)
            + Color::splat(specular_intensity * material.specular_albedo)
            + reflect_color * material.reflection_albedo
            + refract_color * material.refractive_albedo;
        Some(tone_map(color))
    }

    /// Follow a reflected or refracted ray leaving `surface`.
    fn cast_secondary(
        &self,
        surface: &SurfacePoint<'_>,
        direction: UnitVector3,
        depth: u32,
    ) -> Option<Color> {
        let origin = offset_origin(
            surface.point,
            surface.normal,
            direction,
            self.config.surface_offset,
        );
        self.cast_ray(&Ray::new(origin, direction), depth + 1)
    }

    /// True if anything lies between the surface point and the light.
    fn is_shadowed(
        &self,
        surface: &SurfacePoint<'_>,
        light_position: Vector3,
        light_dir: UnitVector3,
    ) -> bool {
        let light_distance = (light_position - surface.point).norm();
        let origin = offset_origin(
            surface.point,
            surface.normal,
            light_dir,
            self.config.surface_offset,
        );
        self.scene
            .intersect(&Ray::new(origin, light_dir), self.config.far_plane)
            .is_some_and(|occluder| occluder.distance < light_distance)
    }
}

/// Reflect a direction about a normal.
#[inline]
pub fn reflect(direction: UnitVector3, normal: UnitVector3) -> UnitVector3 {
    (direction - normal * (2.0 * direction.dot(normal))).normalize()
}

/// Refract a direction through a surface by Snell's law.
///
/// `outside_index` is the medium the normal points into. When the ray
/// travels against the normal it is entering; otherwise it is leaving and
/// the indices swap. Returns `None` on total internal reflection.
pub fn refract(
    direction: UnitVector3,
    normal: UnitVector3,
    outside_index: f64,
    inside_index: f64,
) -> Option<UnitVector3> {
    let mut cos_incidence = Interval::COSINE.clamp(-direction.dot(normal));
    let mut normal = normal;
    let (mut from, mut to) = (outside_index, inside_index);
    if cos_incidence < 0.0 {
        cos_incidence = -cos_incidence;
        normal = -normal;
        std::mem::swap(&mut from, &mut to);
    }

    let ratio = from / to;
    let k = 1.0 - ratio * ratio * (1.0 - cos_incidence * cos_incidence);
    if k < 0.0 {
        return None;
    }
    Some((direction * ratio + normal * (ratio * cos_incidence - k.sqrt())).normalize())
}

/// Scale a color down so its brightest channel is at most 1.
///
/// Channel ratios are preserved; colors already in range are unchanged.
#[inline]
pub fn tone_map(color: Color) -> Color {
    let max = color.max_element();
    if max > 1.0 {
        color / max
    } else {
        color
    }
}

/// Move `point` off the surface to the side `direction` leaves towards.
#[inline]
fn offset_origin(
    point: Vector3,
    normal: UnitVector3,
    direction: UnitVector3,
    epsilon: f64,
) -> Vector3 {
    if direction.dot(normal) < 0.0 {
        point - normal * epsilon
    } else {
        point + normal * epsilon
    }
}

/// Convert a color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let channel = |c: f64| (255.0 * Interval::UNIT.clamp(c)).round() as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}

/// Image buffer for storing render output, row-major from the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Copy a rendered tile into place.
    pub fn blit(&mut self, result: &TileResult) {
        let tile = result.tile;
        if tile.width == 0 {
            return;
        }
        for (row, pixels) in result.pixels.chunks(tile.width as usize).enumerate() {
            let start = self.index(tile.x, tile.y + row as u32);
            self.pixels[start..start + pixels.len()].copy_from_slice(pixels);
        }
    }

    /// Convert to packed RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|color| color_to_rgb(*color))
            .collect()
    }

    /// Convert to an `image` crate buffer for display or saving.
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(color_to_rgb(self.get(x, y)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Light, Material, Sphere, Tile};

    const EPS: f64 = 1e-9;

    fn matte(color: Color) -> Material {
        Material::new(color)
    }

    fn mirror() -> Material {
        Material::new(Color::ZERO)
            .with_albedo(0.0, 0.0)
            .with_reflection(1.0)
    }

    #[test]
    fn test_tone_map_preserves_ratios() {
        let mapped = tone_map(Color::new(2.0, 1.0, 0.0));
        assert!((mapped - Color::new(1.0, 0.5, 0.0)).length() < EPS);

        let in_range = Color::new(0.2, 0.9, 1.0);
        assert_eq!(tone_map(in_range), in_range);
    }

    #[test]
    fn test_reflect() {
        let incoming = UnitVector3::new(1.0, -1.0, 0.0);
        let reflected = reflect(incoming, UnitVector3::Y);
        assert!((reflected.as_vector() - UnitVector3::new(1.0, 1.0, 0.0).as_vector()).norm() < EPS);
    }

    #[test]
    fn test_refract_straight_through() {
        let refracted = refract(-UnitVector3::Y, UnitVector3::Y, 1.0, 1.5).unwrap();
        assert!((refracted.as_vector() - Vector3::new(0.0, -1.0, 0.0)).norm() < EPS);
    }

    #[test]
    fn test_refract_bends_towards_normal_when_entering() {
        let incoming = UnitVector3::new(1.0, -1.0, 0.0);
        let refracted = refract(incoming, UnitVector3::Y, 1.0, 1.5).unwrap();

        let sin_in = incoming.x();
        let sin_out = refracted.x();
        assert!((sin_in / sin_out - 1.5).abs() < 1e-6);
        assert!(refracted.y() < 0.0);
    }

    #[test]
    fn test_refract_total_internal_reflection() {
        // Leaving glass at a grazing angle: the ray travels along the normal
        let grazing = UnitVector3::new(1.0, 0.2, 0.0);
        assert!(refract(grazing, UnitVector3::Y, 1.0, 1.5).is_none());

        // The same angle entering glass refracts fine
        assert!(refract(-grazing, UnitVector3::Y, 1.0, 1.5).is_some());
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Color::new(0.0, 0.5, 1.0)), [0, 128, 255]);
        assert_eq!(color_to_rgb(Color::new(-1.0, 2.0, 0.25)), [0, 255, 64]);
    }

    #[test]
    fn test_image_buffer() {
        let mut image = ImageBuffer::new(3, 2);
        image.set(2, 1, Color::ONE);

        assert_eq!(image.get(2, 1), Color::ONE);
        assert_eq!(image.get(0, 0), Color::ZERO);
        assert_eq!(image.to_rgb8().len(), 3 * 2 * 3);
        assert_eq!(image.to_image().get_pixel(2, 1).0, [255, 255, 255]);
    }

    #[test]
    fn test_blit_places_tile() {
        let mut image = ImageBuffer::new(4, 4);
        let tile = Tile::new(1, 2, 2, 2);
        let pixels = (0..4).map(|i| Color::splat(i as f64)).collect();
        image.blit(&TileResult { tile, pixels });

        assert_eq!(image.get(1, 2), Color::splat(0.0));
        assert_eq!(image.get(2, 2), Color::splat(1.0));
        assert_eq!(image.get(1, 3), Color::splat(2.0));
        assert_eq!(image.get(2, 3), Color::splat(3.0));
        assert_eq!(image.get(3, 3), Color::ZERO);
    }

    #[test]
    fn test_blit_ignores_zero_width_tile() {
        let mut image = ImageBuffer::new(2, 2);
        let tile = Tile::new(1, 0, 0, 2);
        image.blit(&TileResult {
            tile,
            pixels: vec![Color::ONE],
        });
        assert!(image.pixels.iter().all(|&pixel| pixel == Color::ZERO));
    }

    #[test]
    fn test_config_validation() {
        assert!(RenderConfig::default().validate().is_ok());

        let zero_threshold = RenderConfig {
            tile_threshold: 0,
            ..Default::default()
        };
        assert!(zero_threshold.validate().is_err());

        let no_offset = RenderConfig {
            surface_offset: 0.0,
            ..Default::default()
        };
        assert!(no_offset.validate().is_err());
    }

    /// Sphere at the origin lit from +z, seen along -z.
    fn lit_sphere_scene() -> Scene {
        let mut scene = Scene::new();
        scene.set_background_color(Color::new(0.2, 0.7, 0.8));
        scene.put_object(
            Sphere::new(1.0, matte(Color::new(0.4, 0.4, 0.3))).unwrap(),
            Vector3::ZERO,
        );
        scene.put_light(Light::new(1.0).unwrap(), Vector3::new(0.0, 0.0, 10.0));
        scene
    }

    #[test]
    fn test_miss_returns_background() {
        let scene = lit_sphere_scene();
        let config = RenderConfig::default();
        let tracer = Tracer::new(&scene, &config);

        let ray = Ray::new(Vector3::new(5.0, 0.0, 5.0), -UnitVector3::Z);
        assert_eq!(tracer.cast_ray(&ray, 0), None);
        assert_eq!(tracer.trace(&ray), scene.background_color());
    }

    #[test]
    fn test_lit_point_gets_diffuse_color() {
        let scene = lit_sphere_scene();
        let config = RenderConfig::default();
        let tracer = Tracer::new(&scene, &config);

        let ray = Ray::new(Vector3::new(0.0, 0.0, 5.0), -UnitVector3::Z);
        let color = tracer.trace(&ray);

        // Light straight along the normal: full diffuse, no specular albedo
        assert!((color - Color::new(0.4, 0.4, 0.3)).length() < 1e-6);
    }

    #[test]
    fn test_occluder_removes_light_contribution() {
        let mut scene = lit_sphere_scene();
        let config = RenderConfig::default();
        let ray = Ray::new(Vector3::new(0.0, 0.0, 5.0), -UnitVector3::Z);

        let lit = Tracer::new(&scene, &config).trace(&ray);
        assert!(lit.length() > 0.0);

        scene.put_object(
            Sphere::new(0.5, matte(Color::ONE)).unwrap(),
            Vector3::new(0.0, 0.0, 6.0),
        );
        let tracer = Tracer::new(&scene, &config);
        // Camera ray enters below the occluder, the shadow ray runs into it
        let shadowed = tracer.trace(&Ray::new(Vector3::new(0.0, 0.0, 2.0), -UnitVector3::Z));
        assert_eq!(shadowed, Color::ZERO);
    }

    #[test]
    fn test_recursion_terminates_between_mirrors() {
        let mut scene = Scene::new();
        let background = Color::new(0.1, 0.2, 0.3);
        scene.set_background_color(background);
        scene.put_object(Sphere::new(1.0, mirror()).unwrap(), Vector3::new(0.0, 0.0, -3.0));
        scene.put_object(Sphere::new(1.0, mirror()).unwrap(), Vector3::new(0.0, 0.0, 3.0));
        let config = RenderConfig::default();
        let tracer = Tracer::new(&scene, &config);

        // Bounces back and forth along the z axis forever without a depth limit
        let ray = Ray::new(Vector3::ZERO, -UnitVector3::Z);
        let color = tracer.cast_ray(&ray, 0).unwrap();
        assert!((color - background).length() < EPS);

        // Past the depth limit the ray contributes nothing at all
        assert_eq!(tracer.cast_ray(&ray, config.max_depth + 1), None);
    }

    #[test]
    fn test_glass_sphere_shows_what_is_behind_it() {
        let mut scene = Scene::new();
        scene.set_background_color(Color::ZERO);
        let glass = Material::new(Color::ZERO)
            .with_albedo(0.0, 0.0)
            .with_refraction(1.0, 1.5);
        scene.put_object(Sphere::new(1.0, glass).unwrap(), Vector3::ZERO);
        scene.put_object(
            Sphere::new(1.0, matte(Color::new(0.0, 1.0, 0.0))).unwrap(),
            Vector3::new(0.0, 0.0, -5.0),
        );
        scene.put_light(Light::new(1.0).unwrap(), Vector3::new(0.0, 0.0, -2.0));
        let config = RenderConfig::default();
        let tracer = Tracer::new(&scene, &config);

        // Straight through the center: no bending, lands on the green sphere
        let color = tracer.trace(&Ray::new(Vector3::new(0.0, 0.0, 5.0), -UnitVector3::Z));
        assert!(color.y > 0.5);
        assert_eq!(color.x, 0.0);
    }
}
