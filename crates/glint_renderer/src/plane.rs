//! Finite textured planes.
//!
//! A [`GridPatternParallelogramPlane`] is a `width` x `height` quad spanned
//! by two edge directions from an origin, tiled with a grid of materials.

use glint_math::{Interval, Ray, UnitVector3, Vector3};

use crate::hittable::{SceneObject, SurfaceHit};
use crate::scene::{check_perpendicular, SceneError, SceneResult};
use crate::Material;

/// Placement of a plane whose edge directions are perpendicular.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanePositioning {
    origin: Vector3,
    direction_x: UnitVector3,
    direction_y: UnitVector3,
}

impl PlanePositioning {
    /// Create a positioning. Fails unless both directions are non-zero and
    /// perpendicular to each other.
    pub fn new(
        origin: Vector3,
        direction_x: UnitVector3,
        direction_y: UnitVector3,
    ) -> SceneResult<Self> {
        check_non_zero(direction_x, "plane direction x")?;
        check_non_zero(direction_y, "plane direction y")?;
        check_perpendicular(direction_x, direction_y, "plane directions")?;
        Ok(Self {
            origin,
            direction_x,
            direction_y,
        })
    }

    pub fn origin(&self) -> Vector3 {
        self.origin
    }

    pub fn direction_x(&self) -> UnitVector3 {
        self.direction_x
    }

    pub fn direction_y(&self) -> UnitVector3 {
        self.direction_y
    }
}

/// Placement of a plane whose edge directions may form any non-zero angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallelogramPlanePositioning {
    origin: Vector3,
    direction_x: UnitVector3,
    direction_y: UnitVector3,
}

impl ParallelogramPlanePositioning {
    /// Create a positioning. Fails if either direction is zero or the two
    /// are parallel, since they would not span a plane.
    pub fn new(
        origin: Vector3,
        direction_x: UnitVector3,
        direction_y: UnitVector3,
    ) -> SceneResult<Self> {
        check_non_zero(direction_x, "parallelogram direction x")?;
        check_non_zero(direction_y, "parallelogram direction y")?;
        if direction_x.cross(direction_y).is_zero() {
            return Err(SceneError::DegenerateDirection("parallel parallelogram directions"));
        }
        Ok(Self {
            origin,
            direction_x,
            direction_y,
        })
    }

    pub fn origin(&self) -> Vector3 {
        self.origin
    }

    pub fn direction_x(&self) -> UnitVector3 {
        self.direction_x
    }

    pub fn direction_y(&self) -> UnitVector3 {
        self.direction_y
    }
}

impl From<PlanePositioning> for ParallelogramPlanePositioning {
    fn from(p: PlanePositioning) -> Self {
        Self {
            origin: p.origin,
            direction_x: p.direction_x,
            direction_y: p.direction_y,
        }
    }
}

fn check_non_zero(direction: UnitVector3, what: &'static str) -> SceneResult<()> {
    if direction.is_zero() {
        Err(SceneError::DegenerateDirection(what))
    } else {
        Ok(())
    }
}

/// A 2-D tiling of materials over local plane coordinates.
#[derive(Debug, Clone)]
pub struct GridPattern {
    box_width: f64,
    box_height: f64,
    columns: usize,
    rows: usize,
    /// Column-major: `materials[column * rows + row]`
    materials: Vec<Material>,
}

impl GridPattern {
    /// Create a pattern from a grid of materials indexed `[column][row]`.
    ///
    /// Every column must have the same non-zero number of rows, and the
    /// cell dimensions must be finite and positive.
    pub fn new(box_width: f64, box_height: f64, grid: Vec<Vec<Material>>) -> SceneResult<Self> {
        if !(box_width.is_finite() && box_width > 0.0 && box_height.is_finite() && box_height > 0.0)
        {
            return Err(SceneError::InvalidPattern(format!(
                "cell size must be positive, got {}x{}",
                box_width, box_height
            )));
        }

        let columns = grid.len();
        let rows = grid.first().map_or(0, Vec::len);
        if columns == 0 || rows == 0 {
            return Err(SceneError::InvalidPattern("material grid is empty".to_string()));
        }
        if let Some(column) = grid.iter().position(|column| column.len() != rows) {
            return Err(SceneError::InvalidPattern(format!(
                "column {} has {} rows, expected {}",
                column,
                grid[column].len(),
                rows
            )));
        }

        Ok(Self {
            box_width,
            box_height,
            columns,
            rows,
            materials: grid.into_iter().flatten().collect(),
        })
    }

    /// A pattern of a single material.
    pub fn solid(material: Material) -> Self {
        Self {
            box_width: 1.0,
            box_height: 1.0,
            columns: 1,
            rows: 1,
            materials: vec![material],
        }
    }

    /// A two-material checkerboard of square cells.
    pub fn checkerboard(cell_size: f64, even: Material, odd: Material) -> SceneResult<Self> {
        Self::new(cell_size, cell_size, vec![vec![even, odd], vec![odd, even]])
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Grid cell `(column, row)` covering local coordinates `(x, y)`.
    pub fn cell_at(&self, x: f64, y: f64) -> (usize, usize) {
        let column = ((x / self.box_width).floor() as i64).rem_euclid(self.columns as i64);
        let row = ((y / self.box_height).floor() as i64).rem_euclid(self.rows as i64);
        (column as usize, row as usize)
    }

    /// Material covering local coordinates `(x, y)`.
    pub fn material_at(&self, x: f64, y: f64) -> &Material {
        let (column, row) = self.cell_at(x, y);
        &self.materials[column * self.rows + row]
    }
}

/// A finite parallelogram, textured with a [`GridPattern`].
#[derive(Debug, Clone)]
pub struct GridPatternParallelogramPlane {
    width: f64,
    height: f64,
    pattern: GridPattern,
}

impl GridPatternParallelogramPlane {
    /// Create a plane spanning `[0, width] x [0, height]` in local coordinates.
    pub fn new(width: f64, height: f64, pattern: GridPattern) -> SceneResult<Self> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(SceneError::InvalidPattern(format!(
                "plane size must be positive, got {}x{}",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            pattern,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn pattern(&self) -> &GridPattern {
        &self.pattern
    }
}

impl SceneObject for GridPatternParallelogramPlane {
    type Positioning = ParallelogramPlanePositioning;

    fn cast<'a>(
        &'a self,
        positioning: &ParallelogramPlanePositioning,
        ray: &Ray,
    ) -> Option<SurfaceHit<'a>> {
        let mut normal = positioning.direction_x.cross(positioning.direction_y).normalize();
        let mut flux = normal.dot(ray.direction());
        if flux == 0.0 {
            return None;
        }
        // Always report the face the ray arrives at
        if flux > 0.0 {
            normal = -normal;
            flux = -flux;
        }

        let distance = (positioning.origin - ray.origin()).dot(normal) / flux;
        let point = ray.at(distance);
        if (point - ray.origin()).dot(ray.direction()) <= 0.0 {
            return None;
        }

        let local = point - positioning.origin;
        let x = local.dot(positioning.direction_x);
        if !Interval::new(0.0, self.width).contains(x) {
            return None;
        }
        let y = local.dot(positioning.direction_y);
        if !Interval::new(0.0, self.height).contains(y) {
            return None;
        }

        Some(SurfaceHit {
            point,
            normal,
            material: self.pattern.material_at(x, y),
            distance,
        })
    }

    fn kind(&self) -> &'static str {
        "GridPatternParallelogramPlane"
    }
}
