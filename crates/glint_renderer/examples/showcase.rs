//! Showcase scene for the Glint ray tracer.
//!
//! Renders four spheres (ivory, glass, rubber and mirror) over a
//! checkerboard floor and saves the result as a PNG.
//!
//! Usage: cargo run --release --example showcase [output.png] [width] [height]

use anyhow::{Context, Result};
use glint_renderer::{
    Color, GridPattern, GridPatternParallelogramPlane, Light, Material, PlanePositioning, Scene,
    Sphere, UnitVector3, Vector3,
};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "showcase.png".to_string());
    let width: u32 = match args.next() {
        Some(value) => value.parse().context("width must be a positive integer")?,
        None => 1024,
    };
    let height: u32 = match args.next() {
        Some(value) => value.parse().context("height must be a positive integer")?,
        None => 768,
    };

    let scene = build_scene()?;
    let camera = scene.setup_camera(
        Vector3::ZERO,
        -UnitVector3::Z,
        UnitVector3::Y,
        std::f64::consts::FRAC_PI_3,
    )?;

    let image = camera.render(width, height)?;
    image
        .to_image()
        .save(&output)
        .with_context(|| format!("failed to save {}", output))?;
    log::info!("Saved {}", output);

    Ok(())
}

fn build_scene() -> Result<Scene> {
    let ivory = Material::new(Color::new(0.4, 0.4, 0.3))
        .with_albedo(0.6, 0.3)
        .with_specular_exponent(50.0)
        .with_reflection(0.1);
    let glass = Material::new(Color::new(0.6, 0.7, 0.8))
        .with_albedo(0.0, 0.5)
        .with_specular_exponent(125.0)
        .with_reflection(0.1)
        .with_refraction(0.8, 1.5);
    let red_rubber = Material::new(Color::new(0.3, 0.1, 0.1))
        .with_albedo(0.9, 0.1)
        .with_specular_exponent(10.0);
    let mirror = Material::new(Color::ONE)
        .with_albedo(0.0, 10.0)
        .with_specular_exponent(1425.0)
        .with_reflection(0.8);

    let mut scene = Scene::new();
    scene.set_background_color(Color::new(0.2, 0.7, 0.8));

    scene.put_named_object(Sphere::new(2.0, ivory)?, Vector3::new(-3.0, 0.0, -16.0), "ivory");
    scene.put_named_object(Sphere::new(2.0, glass)?, Vector3::new(-1.0, -1.5, -12.0), "glass");
    scene.put_named_object(
        Sphere::new(3.0, red_rubber)?,
        Vector3::new(1.5, -0.5, -18.0),
        "red rubber",
    );
    scene.put_named_object(Sphere::new(4.0, mirror)?, Vector3::new(7.0, 5.0, -18.0), "mirror");

    let light_tile = Material::new(Color::new(0.3, 0.3, 0.3)).with_albedo(1.0, 0.0);
    let dark_tile = Material::new(Color::new(0.3, 0.2, 0.1)).with_albedo(1.0, 0.0);
    let floor = GridPatternParallelogramPlane::new(
        20.0,
        20.0,
        GridPattern::checkerboard(2.0, light_tile, dark_tile)?,
    )?;
    let floor_positioning =
        PlanePositioning::new(Vector3::new(-10.0, -4.0, -30.0), UnitVector3::X, UnitVector3::Z)?;
    scene.put_named_object(floor, floor_positioning.into(), "floor");

    scene.put_light(Light::new(1.5)?, Vector3::new(-20.0, 20.0, 20.0));
    scene.put_light(Light::new(1.8)?, Vector3::new(30.0, 50.0, -25.0));
    scene.put_light(Light::new(1.7)?, Vector3::new(30.0, 20.0, 30.0));

    for identity in scene.identities() {
        log::debug!("Scene object {}", identity);
    }

    Ok(scene)
}
