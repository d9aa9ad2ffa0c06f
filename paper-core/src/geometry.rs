//! Geometric primitives for canvas-logical space.
//!
//! Canvas-logical coordinates have their origin at the canvas center, so a
//! 1024×768 canvas spans `[-512, 512] × [-384, 384]`.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A point in canvas-logical or view space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point2D {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A translation in canvas-logical or view space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2D {
    /// Horizontal component.
    pub dx: f64,
    /// Vertical component.
    pub dy: f64,
}

impl Vector2D {
    /// The zero vector.
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    /// Create a new vector.
    #[must_use]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Whether both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.dx.is_finite() && self.dy.is_finite()
    }
}

impl Add for Vector2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

impl AddAssign for Vector2D {
    fn add_assign(&mut self, rhs: Self) {
        self.dx += rhs.dx;
        self.dy += rhs.dy;
    }
}

impl Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.dx, -self.dy)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.dx * rhs, self.dy * rhs)
    }
}

impl Div<f64> for Vector2D {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.dx / rhs, self.dy / rhs)
    }
}

impl Add<Vector2D> for Point2D {
    type Output = Self;

    fn add(self, rhs: Vector2D) -> Self {
        Self::new(self.x + rhs.dx, self.y + rhs.dy)
    }
}

impl AddAssign<Vector2D> for Point2D {
    fn add_assign(&mut self, rhs: Vector2D) {
        self.x += rhs.dx;
        self.y += rhs.dy;
    }
}

impl Sub for Point2D {
    type Output = Vector2D;

    fn sub(self, rhs: Self) -> Vector2D {
        Vector2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size2D {
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Size2D {
    /// The empty size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether the size is finite with a strictly positive area.
    #[must_use]
    pub fn is_usable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl Mul<f64> for Size2D {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.width * rhs, self.height * rhs)
    }
}

/// An axis-aligned rectangle described by its min/max corners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Smallest x.
    pub min_x: f64,
    /// Smallest y.
    pub min_y: f64,
    /// Largest x.
    pub max_x: f64,
    /// Largest y.
    pub max_y: f64,
}

impl Rect {
    /// Create a rectangle from its corners.
    #[must_use]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// A rectangle of `size` centered on `center`.
    #[must_use]
    pub fn centered(center: Point2D, size: Size2D) -> Self {
        let half_w = size.width / 2.0;
        let half_h = size.height / 2.0;
        Self::new(
            center.x - half_w,
            center.y - half_h,
            center.x + half_w,
            center.y + half_h,
        )
    }

    /// Width of the rectangle.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the rectangle.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Whether the rectangle has no area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// Smallest rectangle containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Whether `point` lies inside or on the edge of the rectangle.
    #[must_use]
    pub fn contains(&self, point: Point2D) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

/// A planar rotation stored in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle {
    radians: f64,
}

impl Angle {
    /// No rotation.
    pub const ZERO: Self = Self { radians: 0.0 };

    /// Create an angle from radians.
    #[must_use]
    pub const fn from_radians(radians: f64) -> Self {
        Self { radians }
    }

    /// Create an angle from degrees.
    #[must_use]
    pub fn from_degrees(degrees: f64) -> Self {
        Self::from_radians(degrees.to_radians())
    }

    /// The angle in radians.
    #[must_use]
    pub const fn radians(self) -> f64 {
        self.radians
    }

    /// The angle in degrees.
    #[must_use]
    pub fn degrees(self) -> f64 {
        self.radians.to_degrees()
    }

    /// Whether the angle is finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.radians.is_finite()
    }
}

impl Add for Angle {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_radians(self.radians + rhs.radians)
    }
}

/// Placement of an object on the canvas.
///
/// `position` is the object's center in canvas-logical coordinates. The
/// rendered size is `base_size * scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Center of the object in canvas-logical coordinates.
    pub position: Point2D,
    /// Uniform scale factor applied to `base_size`.
    pub scale: f64,
    /// Rotation around `position`.
    pub rotation: Angle,
    /// Unscaled size of the object.
    pub base_size: Size2D,
}

impl Transform {
    /// An unscaled, unrotated transform at the canvas origin.
    #[must_use]
    pub fn with_size(base_size: Size2D) -> Self {
        Self {
            position: Point2D::ZERO,
            scale: 1.0,
            rotation: Angle::ZERO,
            base_size,
        }
    }

    /// Rendered size after scaling.
    #[must_use]
    pub fn current_size(&self) -> Size2D {
        self.base_size * self.scale
    }

    /// Axis-aligned bounding box, ignoring rotation.
    #[must_use]
    pub fn bounding_rect(&self) -> Rect {
        Rect::centered(self.position, self.current_size())
    }

    /// Whether every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.scale.is_finite()
            && self.rotation.is_finite()
            && self.base_size.width.is_finite()
            && self.base_size.height.is_finite()
    }

    /// Raise `scale` to at least `floor`.
    #[must_use]
    pub fn clamped_scale(mut self, floor: f64) -> Self {
        self.scale = self.scale.max(floor);
        self
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::with_size(Size2D::new(100.0, 100.0))
    }
}

/// Clamp `value` into `[lower, upper]`, collapsing an inverted range to its midpoint.
#[must_use]
pub fn clamp_or_center(value: f64, lower: f64, upper: f64) -> f64 {
    if lower > upper {
        (lower + upper) / 2.0
    } else {
        value.clamp(lower, upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_size_follows_scale() {
        let mut transform = Transform::with_size(Size2D::new(40.0, 20.0));
        transform.scale = 2.5;
        let size = transform.current_size();
        assert!((size.width - 100.0).abs() < f64::EPSILON);
        assert!((size.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clamped_scale_applies_floor() {
        let mut transform = Transform::default();
        transform.scale = -3.0;
        assert!((transform.clamped_scale(0.1).scale - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounding_rect_is_centered() {
        let mut transform = Transform::with_size(Size2D::new(40.0, 40.0));
        transform.position = Point2D::new(10.0, -10.0);
        let rect = transform.bounding_rect();
        assert_eq!(rect, Rect::new(-10.0, -30.0, 30.0, 10.0));
    }

    #[test]
    fn test_union_and_contains() {
        let a = Rect::new(-1.0, -1.0, 1.0, 1.0);
        let b = Rect::new(0.0, 0.0, 5.0, 2.0);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(-1.0, -1.0, 5.0, 2.0));
        assert!(u.contains(Point2D::new(4.0, 1.5)));
        assert!(!u.contains(Point2D::new(6.0, 0.0)));
    }

    #[test]
    fn test_degenerate_rect() {
        assert!(Rect::default().is_degenerate());
        assert!(Rect::new(0.0, 0.0, 1.0, 0.0).is_degenerate());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_degenerate());
    }

    #[test]
    fn test_clamp_or_center_collapses_inverted_range() {
        assert!((clamp_or_center(5.0, 0.0, 2.0) - 2.0).abs() < f64::EPSILON);
        assert!((clamp_or_center(5.0, 4.0, 2.0) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_angle_degrees_roundtrip() {
        let angle = Angle::from_degrees(90.0) + Angle::from_degrees(90.0);
        assert!((angle.degrees() - 180.0).abs() < 1e-9);
    }
}
