//! Math utilities and types
//!
//! Provides the 2D value types used by the simulation. `Vector2f` is a plain
//! `Copy` struct with game-friendly semantics (normalizing a zero vector is a
//! no-op); heavier linear algebra goes through `nalgebra`.

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

pub use nalgebra::{Rotation2, Vector2};

/// nalgebra 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D vector with `f32` components
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2f {
    /// Horizontal component
    pub x: f32,
    /// Vertical component
    pub y: f32,
}

impl Vector2f {
    /// The zero vector
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Unit vector along +X
    pub const UNIT_X: Self = Self { x: 1.0, y: 0.0 };

    /// Create a new vector
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Squared length, avoids the square root
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector in the same direction.
    ///
    /// A zero-length vector is returned unchanged instead of producing NaNs.
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len)
        } else {
            self
        }
    }

    /// Dot product
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// True when both components are exactly zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl From<Vec2> for Vector2f {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2f> for Vec2 {
    fn from(v: Vector2f) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<(f32, f32)> for Vector2f {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Vector2f {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2f {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vector2f {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

impl Mul<Vector2f> for f32 {
    type Output = Vector2f;

    fn mul(self, vec: Vector2f) -> Vector2f {
        vec * self
    }
}

impl Div<f32> for Vector2f {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self::new(self.x / scalar, self.y / scalar)
    }
}

impl Neg for Vector2f {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl AddAssign for Vector2f {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vector2f {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl MulAssign<f32> for Vector2f {
    fn mul_assign(&mut self, scalar: f32) {
        self.x *= scalar;
        self.y *= scalar;
    }
}

impl DivAssign<f32> for Vector2f {
    fn div_assign(&mut self, scalar: f32) {
        self.x /= scalar;
        self.y /= scalar;
    }
}

impl AbsDiffEq for Vector2f {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon) && self.y.abs_diff_eq(&other.y, epsilon)
    }
}

impl RelativeEq for Vector2f {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
    }
}

/// Position, rotation and scale of a 2D object.
///
/// Rotation is stored in degrees and is never wrapped; `forward()` stays
/// well defined for any angle through trig periodicity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in world units
    pub position: Vector2f,

    /// Rotation in degrees, counter-clockwise from +X
    pub rotation: f32,

    /// Scale factors
    pub scale: Vector2f,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector2f::ZERO,
            rotation: 0.0,
            scale: Vector2f::new(1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vector2f) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder pattern: Set rotation in degrees
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Unit direction the transform faces: `(cos θ, sin θ)`
    pub fn forward(&self) -> Vector2f {
        let rotation = Rotation2::new(utils::deg_to_rad(self.rotation));
        (rotation * Vec2::x()).into()
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_arithmetic() {
        let a = Vector2f::new(1.0, 2.0);
        let b = Vector2f::new(3.0, -4.0);

        assert_eq!(a + b, Vector2f::new(4.0, -2.0));
        assert_eq!(a - b, Vector2f::new(-2.0, 6.0));
        assert_eq!(a * 2.0, Vector2f::new(2.0, 4.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(b / 2.0, Vector2f::new(1.5, -2.0));

        let mut c = a;
        c += b;
        c -= a;
        assert_eq!(c, b);
        c *= 3.0;
        c /= 3.0;
        assert_eq!(c, b);
    }

    #[test]
    fn test_length_and_dot() {
        let v = Vector2f::new(3.0, 4.0);
        assert_eq!(v.length(), 5.0);
        assert_eq!(v.length_squared(), 25.0);
        assert_eq!(v.dot(Vector2f::new(2.0, 1.0)), 10.0);
    }

    #[test]
    fn test_normalized_has_unit_length() {
        for v in [
            Vector2f::new(3.0, 4.0),
            Vector2f::new(-0.001, 0.0002),
            Vector2f::new(1000.0, -250.0),
        ] {
            assert_relative_eq!(v.normalized().length(), 1.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_normalized_zero_is_unchanged() {
        let zero = Vector2f::ZERO;
        assert_eq!(zero.normalized(), zero);
        assert!(!zero.normalized().x.is_nan());
    }

    #[test]
    fn test_nalgebra_conversion() {
        let v = Vector2f::new(1.5, -2.5);
        let na: Vec2 = v.into();
        assert_eq!(Vector2f::from(na), v);
    }

    #[test]
    fn test_transform_identity_defaults() {
        let transform = Transform::identity();
        assert_eq!(transform.position, Vector2f::ZERO);
        assert_eq!(transform.rotation, 0.0);
        assert_eq!(transform.scale, Vector2f::new(1.0, 1.0));
    }

    #[test]
    fn test_forward_direction() {
        let transform = Transform::identity();
        assert_relative_eq!(transform.forward(), Vector2f::UNIT_X, epsilon = EPSILON);

        let up = Transform::identity().with_rotation(90.0);
        assert_relative_eq!(up.forward(), Vector2f::new(0.0, 1.0), epsilon = EPSILON);

        // Rotation is not wrapped, forward follows trig periodicity
        let wrapped = Transform::identity().with_rotation(450.0);
        assert_relative_eq!(wrapped.forward(), up.forward(), epsilon = EPSILON);

        let negative = Transform::identity().with_rotation(-90.0);
        assert_relative_eq!(negative.forward(), Vector2f::new(0.0, -1.0), epsilon = EPSILON);
    }
}
