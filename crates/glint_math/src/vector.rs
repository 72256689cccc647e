//! Immutable 3-vectors and unit vectors.
//!
//! All operations are pure and return new values. The zero vector is a
//! regular [`Vector3`] value with degenerate algebra: it absorbs cross
//! products, passes through additions, and has no defined angle.

use std::fmt;
use std::ops::{Add, Deref, Mul, Neg, Sub};

use glam::DVec3;
use thiserror::Error;

/// Errors raised by degenerate vector algebra.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgebraError {
    #[error("Divided by zero")]
    DivisionByZero,

    #[error("Undefined angle with zero vector")]
    UndefinedAngle,
}

/// Result type for algebra operations.
pub type AlgebraResult<T> = Result<T, AlgebraError>;

/// An immutable vector in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3(DVec3);

impl Vector3 {
    /// The zero vector.
    pub const ZERO: Vector3 = Vector3(DVec3::ZERO);

    /// Create a new vector from its components.
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self(DVec3::new(x, y, z))
    }

    #[inline]
    pub fn x(self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn y(self) -> f64 {
        self.0.y
    }

    #[inline]
    pub fn z(self) -> f64 {
        self.0.z
    }

    /// Get the underlying glam vector.
    #[inline]
    pub fn as_dvec3(self) -> DVec3 {
        self.0
    }

    /// Returns true for the zero vector (either sign of zero).
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == DVec3::ZERO
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: impl Into<Vector3>) -> f64 {
        self.0.dot(other.into().0)
    }

    /// Cross product. Crossing with the zero vector yields the zero vector.
    #[inline]
    pub fn cross(self, other: impl Into<Vector3>) -> Vector3 {
        Self(self.0.cross(other.into().0))
    }

    /// Euclidean length.
    #[inline]
    pub fn norm(self) -> f64 {
        self.0.length()
    }

    #[inline]
    pub fn norm_squared(self) -> f64 {
        self.0.length_squared()
    }

    /// Scale to unit length. The zero vector normalizes to [`UnitVector3::ZERO`].
    #[inline]
    pub fn normalize(self) -> UnitVector3 {
        UnitVector3::from_vector(self)
    }

    /// Divide every component by `scalar`.
    ///
    /// Dividing the zero vector is a no-op for any scalar, zero included.
    pub fn divide(self, scalar: f64) -> AlgebraResult<Vector3> {
        if self.is_zero() {
            return Ok(self);
        }
        if scalar == 0.0 {
            return Err(AlgebraError::DivisionByZero);
        }
        Ok(Self(self.0 / scalar))
    }

    /// Angle in radians between two vectors, in [0, π].
    pub fn angle_between(self, other: impl Into<Vector3>) -> AlgebraResult<f64> {
        let other = other.into();
        if self.is_zero() || other.is_zero() {
            return Err(AlgebraError::UndefinedAngle);
        }
        let cos = self.normalize().dot(other.normalize()).clamp(-1.0, 1.0);
        Ok(cos.acos())
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{},{},{}}}", self.0.x, self.0.y, self.0.z)
    }
}

impl From<DVec3> for Vector3 {
    fn from(v: DVec3) -> Self {
        Self(v)
    }
}

impl From<Vector3> for DVec3 {
    fn from(v: Vector3) -> Self {
        v.0
    }
}

impl<V: Into<Vector3>> Add<V> for Vector3 {
    type Output = Vector3;

    #[inline]
    fn add(self, rhs: V) -> Vector3 {
        Self(self.0 + rhs.into().0)
    }
}

impl<V: Into<Vector3>> Sub<V> for Vector3 {
    type Output = Vector3;

    #[inline]
    fn sub(self, rhs: V) -> Vector3 {
        Self(self.0 - rhs.into().0)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    #[inline]
    fn mul(self, scalar: f64) -> Vector3 {
        Self(self.0 * scalar)
    }
}

impl Mul<Vector3> for f64 {
    type Output = Vector3;

    #[inline]
    fn mul(self, v: Vector3) -> Vector3 {
        v * self
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    #[inline]
    fn neg(self) -> Vector3 {
        Self(-self.0)
    }
}

/// Deviation from 1 still treated as unit length.
const UNIT_NORM_TOLERANCE: f64 = 4.0 * f64::EPSILON;

/// A direction vector of length one, or the distinguished zero vector.
///
/// The only way to obtain one is through normalization (or the axis
/// constants), so code that receives a `UnitVector3` never re-normalizes.
/// Dereferences to [`Vector3`] for the read-only algebra.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UnitVector3(Vector3);

impl UnitVector3 {
    pub const ZERO: UnitVector3 = UnitVector3(Vector3::ZERO);
    pub const X: UnitVector3 = UnitVector3(Vector3::new(1.0, 0.0, 0.0));
    pub const Y: UnitVector3 = UnitVector3(Vector3::new(0.0, 1.0, 0.0));
    pub const Z: UnitVector3 = UnitVector3(Vector3::new(0.0, 0.0, 1.0));

    /// Normalize the given components.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self::from_vector(Vector3::new(x, y, z))
    }

    /// Normalize a vector. A zero-length vector yields [`UnitVector3::ZERO`].
    ///
    /// Vectors already within rounding of unit length are kept as they are,
    /// so normalizing twice gives the same bits.
    pub fn from_vector(v: Vector3) -> Self {
        let norm = v.norm();
        if norm == 0.0 {
            Self::ZERO
        } else if (norm - 1.0).abs() <= UNIT_NORM_TOLERANCE {
            Self(v)
        } else {
            Self(Vector3(v.0 / norm))
        }
    }

    /// Length of the vector: exactly 1, or 0 for the zero vector.
    #[inline]
    pub fn norm(self) -> f64 {
        if self.0.is_zero() {
            0.0
        } else {
            1.0
        }
    }

    /// Already normalized.
    #[inline]
    pub fn normalize(self) -> UnitVector3 {
        self
    }

    #[inline]
    pub fn as_vector(self) -> Vector3 {
        self.0
    }
}

impl Deref for UnitVector3 {
    type Target = Vector3;

    fn deref(&self) -> &Vector3 {
        &self.0
    }
}

impl fmt::Display for UnitVector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<UnitVector3> for Vector3 {
    fn from(v: UnitVector3) -> Self {
        v.0
    }
}

impl Neg for UnitVector3 {
    type Output = UnitVector3;

    #[inline]
    fn neg(self) -> UnitVector3 {
        Self(-self.0)
    }
}

impl<V: Into<Vector3>> Add<V> for UnitVector3 {
    type Output = Vector3;

    #[inline]
    fn add(self, rhs: V) -> Vector3 {
        self.0 + rhs
    }
}

impl<V: Into<Vector3>> Sub<V> for UnitVector3 {
    type Output = Vector3;

    #[inline]
    fn sub(self, rhs: V) -> Vector3 {
        self.0 - rhs
    }
}

impl Mul<f64> for UnitVector3 {
    type Output = Vector3;

    #[inline]
    fn mul(self, scalar: f64) -> Vector3 {
        self.0 * scalar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::FRAC_PI_2;

    const TOLERANCE: f64 = 1e-9;

    fn random_vector(rng: &mut StdRng) -> Vector3 {
        Vector3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
        )
    }

    fn assert_close(a: Vector3, b: Vector3) {
        assert!((a - b).norm() < TOLERANCE, "{} != {}", a, b);
    }

    #[test]
    fn test_normalized_vectors_have_unit_length() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let unit = random_vector(&mut rng).normalize();
            assert!((unit.as_vector().norm() - 1.0).abs() < TOLERANCE);
            assert_eq!(unit.norm(), 1.0);
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let once = random_vector(&mut rng).normalize();
            assert_eq!(once.normalize(), once);
            assert_eq!(once.as_vector().normalize(), once);
        }
    }

    #[test]
    fn test_cross_is_anticommutative_and_dot_symmetric() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let a = random_vector(&mut rng);
            let b = random_vector(&mut rng);
            assert_close(a.cross(b), -b.cross(a));
            assert!((a.dot(b) - b.dot(a)).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_cross_is_right_handed() {
        assert_eq!(UnitVector3::X.cross(UnitVector3::Y), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(UnitVector3::Y.cross(UnitVector3::Z), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(UnitVector3::Z.cross(UnitVector3::X), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_zero_vector_algebra() {
        let v = Vector3::new(1.0, -2.0, 3.0);

        assert!(Vector3::ZERO.cross(v).is_zero());
        assert!(v.cross(Vector3::ZERO).is_zero());
        assert_eq!(Vector3::ZERO.normalize(), UnitVector3::ZERO);
        assert_eq!(UnitVector3::ZERO.normalize(), UnitVector3::ZERO);
        assert_eq!(UnitVector3::ZERO.norm(), 0.0);

        assert_eq!(Vector3::ZERO + v, v);
        assert_eq!(Vector3::ZERO - v, -v);
        assert!((Vector3::ZERO * 5.0).is_zero());
        assert_eq!(Vector3::ZERO.dot(v), 0.0);
    }

    #[test]
    fn test_divide() {
        let v = Vector3::new(2.0, 4.0, 6.0);
        assert_eq!(v.divide(2.0), Ok(Vector3::new(1.0, 2.0, 3.0)));
        assert_eq!(v.divide(0.0), Err(AlgebraError::DivisionByZero));

        // Scaling the zero vector is a no-op, even by zero
        assert_eq!(Vector3::ZERO.divide(0.0), Ok(Vector3::ZERO));
    }

    #[test]
    fn test_angle_between() {
        let angle = UnitVector3::X.angle_between(UnitVector3::Y).unwrap();
        assert!((angle - FRAC_PI_2).abs() < TOLERANCE);

        let opposite = Vector3::new(3.0, 0.0, 0.0).angle_between(Vector3::new(-1.0, 0.0, 0.0));
        assert!((opposite.unwrap() - std::f64::consts::PI).abs() < TOLERANCE);

        assert_eq!(
            Vector3::ZERO.angle_between(UnitVector3::X),
            Err(AlgebraError::UndefinedAngle)
        );
        assert_eq!(
            UnitVector3::X.angle_between(Vector3::ZERO),
            Err(AlgebraError::UndefinedAngle)
        );
    }

    #[test]
    fn test_unit_vector_negation_stays_unit() {
        let unit = Vector3::new(0.0, 3.0, 4.0).normalize();
        let negated = -unit;
        assert_close(negated.as_vector(), Vector3::new(0.0, -0.6, -0.8));
        assert_eq!(negated.norm(), 1.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Vector3::new(1.0, 2.5, -3.0).to_string(), "{1,2.5,-3}");
    }
}
