//! Geometric primitives for board-space and screen-space calculations.
//!
//! This module provides the fundamental geometric types used throughout pcbsvg
//! for describing element positions, extents and the real-to-screen mapping.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned rectangle defined by minimum and maximum coordinates
//! - [`Insets`] - Padding values for four sides
//! - [`BoundsAccumulator`] - Folds extents into a single rectangle, skipping non-finite input
//! - [`Transform`] - An affine map `[a b c d e f]` from board space to screen space
//!
//! # Coordinate Systems
//!
//! Board space is measured in millimeters with Y increasing upward:
//!
//! ```text
//!    +Y
//!     ▲
//!     │
//!     │
//!   (0,0) ────────► +X
//! ```
//!
//! Screen space follows SVG: origin at the top-left, Y increasing downward.
//! The [`Transform`] produced by [`Transform::from_point_pairs`] flips the Y
//! axis, so every transform built from board data is mirrored.

use std::fmt;

use thiserror::Error;

/// Smallest reference length accepted when deriving a transform.
const DEGENERATE_EPSILON: f64 = 1e-9;

/// Errors raised by geometric constructions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// The reference vector used to derive a transform has (near) zero length
    /// or contains non-finite coordinates.
    #[error("degenerate reference vector from ({x1}, {y1}) to ({x2}, {y2})")]
    DegenerateReference { x1: f64, y1: f64, x2: f64, y2: f64 },
}

/// A 2D point.
///
/// # Examples
///
/// ```
/// # use pcbsvg_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Returns `true` if both coordinates are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Returns the point halfway between this point and `other`.
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Euclidean length of the vector from the origin to this point.
    pub fn hypot(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        self.sub_point(other).hypot()
    }

    /// Multiplies both coordinates by `factor`.
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Rotates this point counter-clockwise by `degrees` around `center`.
    ///
    /// Counter-clockwise refers to a Y-up coordinate system, which is how
    /// board-space rotations are specified.
    pub fn rotate_about(self, center: Point, degrees: f64) -> Self {
        if degrees == 0.0 {
            return self;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Self {
            x: center.x + dx * cos - dy * sin,
            y: center.y + dx * sin + dy * cos,
        }
    }

    /// Moves the point by `distance` along the direction of `degrees`
    /// (measured counter-clockwise from +X).
    pub fn offset_polar(self, degrees: f64, distance: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            x: self.x + cos * distance,
            y: self.y + sin * distance,
        }
    }

    /// Creates a bounds of the given size with this point as its center
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_center(self, size)
    }
}

/// A width and height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the width
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height
    pub fn height(self) -> f64 {
        self.height
    }

    /// Returns a new size with padding added on all sides
    pub fn add_padding(self, insets: Insets) -> Self {
        Self {
            width: self.width + insets.horizontal_sum(),
            height: self.height + insets.vertical_sum(),
        }
    }

    /// Multiplies both dimensions by `factor`.
    pub fn scale(self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Returns `true` if either dimension is zero or negative.
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An axis-aligned rectangle described by its minimum and maximum corners.
///
/// `Bounds` is orientation-agnostic: in board space `min_y` is the bottom
/// edge, in screen space it is the top edge.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    /// Creates bounds from two corner coordinates, normalizing their order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    /// Creates a new bounds with the given center point and size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width() / 2.0;
        let half_height = size.height() / 2.0;
        Self::new(
            center.x() - half_width,
            center.y() - half_height,
            center.x() + half_width,
            center.y() + half_height,
        )
    }

    /// Creates a new bounds with the given minimum corner and size
    pub fn new_from_min(min: Point, size: Size) -> Self {
        Self::new(
            min.x(),
            min.y(),
            min.x() + size.width(),
            min.y() + size.height(),
        )
    }

    /// Smallest bounds containing every point, or `None` for an empty slice.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let mut accumulator = BoundsAccumulator::new();
        for point in points {
            accumulator.include_point(*point);
        }
        accumulator.finish()
    }

    pub fn min_x(self) -> f64 {
        self.min_x
    }

    pub fn min_y(self) -> f64 {
        self.min_y
    }

    pub fn max_x(self) -> f64 {
        self.max_x
    }

    pub fn max_y(self) -> f64 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns the dimensions of the bounds as a [`Size`].
    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Returns `true` if every coordinate is finite.
    pub fn is_finite(self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
    }

    /// Returns `true` if the bounds enclose a strictly positive area.
    pub fn has_area(self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Returns `true` if `other` lies entirely inside these bounds.
    pub fn contains(self, other: Bounds) -> bool {
        self.min_x <= other.min_x
            && self.min_y <= other.min_y
            && self.max_x >= other.max_x
            && self.max_y >= other.max_y
    }

    /// Returns `true` if the two bounds overlap or touch.
    pub fn intersects(self, other: Bounds) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Returns the four corners, counter-clockwise starting at the minimum corner.
    pub fn corners(self) -> [Point; 4] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }

    /// Merges two bounds to create a larger bounds that contains both
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by the given offset
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x(),
            min_y: self.min_y + offset.y(),
            max_x: self.max_x + offset.x(),
            max_y: self.max_y + offset.y(),
        }
    }

    /// Expands the bounds by the given insets.
    ///
    /// `top` is applied to `max_y` and `bottom` to `min_y`, matching board
    /// space where Y grows upward.
    pub fn add_padding(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x - insets.left(),
            min_y: self.min_y - insets.bottom(),
            max_x: self.max_x + insets.right(),
            max_y: self.max_y + insets.top(),
        }
    }

    /// Axis-aligned bounds of this rectangle after rotating it by `degrees`
    /// counter-clockwise around `center`.
    pub fn rotated_about(&self, center: Point, degrees: f64) -> Self {
        if degrees == 0.0 {
            return *self;
        }
        let corners = self.corners().map(|corner| corner.rotate_about(center, degrees));
        Bounds::from_points(&corners).unwrap_or(*self)
    }
}

/// Padding or margin values for the four sides of a rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f64,
    right: f64,
    bottom: f64,
    left: f64,
}

impl Insets {
    /// Creates new insets with the specified values for each side
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value for all sides
    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn top(self) -> f64 {
        self.top
    }

    pub fn right(self) -> f64 {
        self.right
    }

    pub fn bottom(self) -> f64 {
        self.bottom
    }

    pub fn left(self) -> f64 {
        self.left
    }

    /// Returns the sum of left and right insets
    pub fn horizontal_sum(self) -> f64 {
        self.left + self.right
    }

    /// Returns the sum of top and bottom insets
    pub fn vertical_sum(self) -> f64 {
        self.top + self.bottom
    }

    /// Multiplies every side by `factor`.
    pub fn scale(self, factor: f64) -> Self {
        Self::new(
            self.top * factor,
            self.right * factor,
            self.bottom * factor,
            self.left * factor,
        )
    }
}

/// Folds points and rectangles into the smallest enclosing [`Bounds`].
///
/// Non-finite input is ignored so a single malformed value can never poison
/// the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsAccumulator {
    bounds: Option<Bounds>,
}

impl BoundsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Includes a single point.
    pub fn include_point(&mut self, point: Point) {
        if !point.is_finite() {
            return;
        }
        self.include_bounds(Bounds::new(point.x(), point.y(), point.x(), point.y()));
    }

    /// Includes a rectangle.
    pub fn include_bounds(&mut self, bounds: Bounds) {
        if !bounds.is_finite() {
            return;
        }
        self.bounds = Some(match self.bounds {
            Some(current) => current.merge(&bounds),
            None => bounds,
        });
    }

    /// Returns `true` if nothing has been included yet.
    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Returns the accumulated bounds, if anything finite was included.
    pub fn finish(self) -> Option<Bounds> {
        self.bounds
    }
}

/// An affine transform `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
///
/// This is the matrix form used by SVG's `matrix(a,b,c,d,e,f)`.
///
/// # Examples
///
/// ```
/// # use pcbsvg_core::geometry::{Point, Transform};
/// let transform = Transform::from_point_pairs(
///     Point::new(-5.0, 5.0),
///     Point::new(0.0, 0.0),
///     Point::new(5.0, -5.0),
///     Point::new(100.0, 100.0),
/// )
/// .unwrap();
///
/// let origin = transform.apply(Point::new(0.0, 0.0));
/// assert!((origin.x() - 50.0).abs() < 1e-9);
/// assert!((origin.y() - 50.0).abs() < 1e-9);
/// assert!(transform.is_mirrored());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Derives a uniform-scale, Y-flipping transform from two reference pairs.
    ///
    /// `real_a` maps exactly onto `screen_a`; the scale is the ratio of the
    /// screen reference distance to the real one, so `real_b` lands on
    /// `screen_b` whenever the two pairs describe the same aspect ratio.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegenerateReference`] if either reference
    /// vector has (near) zero length, the real one overflows, or any
    /// coordinate is non-finite.
    pub fn from_point_pairs(
        real_a: Point,
        screen_a: Point,
        real_b: Point,
        screen_b: Point,
    ) -> Result<Self, GeometryError> {
        let degenerate = || GeometryError::DegenerateReference {
            x1: real_a.x(),
            y1: real_a.y(),
            x2: real_b.x(),
            y2: real_b.y(),
        };

        if ![real_a, screen_a, real_b, screen_b]
            .iter()
            .all(|point| point.is_finite())
        {
            return Err(degenerate());
        }

        let real_length = real_a.distance(real_b);
        let screen_length = screen_a.distance(screen_b);
        if !real_length.is_finite()
            || real_length < DEGENERATE_EPSILON
            || screen_length < DEGENERATE_EPSILON
        {
            return Err(degenerate());
        }

        let scale = screen_length / real_length;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(degenerate());
        }

        Ok(Self::new(
            scale,
            0.0,
            0.0,
            -scale,
            screen_a.x() - scale * real_a.x(),
            screen_a.y() + scale * real_a.y(),
        ))
    }

    /// Maps a board-space point to screen space.
    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            self.a * point.x() + self.c * point.y() + self.e,
            self.b * point.x() + self.d * point.y() + self.f,
        )
    }

    /// Maps a board-space length to screen space (uniform scale).
    pub fn apply_length(&self, length: f64) -> f64 {
        length * self.scale()
    }

    /// Uniform scale factor of the transform.
    pub fn scale(&self) -> f64 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }

    /// Returns `true` if the transform reverses orientation (negative determinant).
    pub fn is_mirrored(&self) -> bool {
        self.a * self.d - self.b * self.c < 0.0
    }

    /// Converts a counter-clockwise board-space angle into the SVG `rotate()`
    /// angle that produces the same visual rotation on screen.
    pub fn map_angle(&self, degrees: f64) -> f64 {
        if self.is_mirrored() { -degrees } else { degrees }
    }

    /// Returns `true` if every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        [self.a, self.b, self.c, self.d, self.e, self.f]
            .iter()
            .all(|v| v.is_finite())
    }

    /// The six coefficients in SVG order.
    pub fn coefficients(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

impl fmt::Display for Transform {
    /// Formats as `matrix(a,b,c,d,e,f)` with full precision; non-finite
    /// coefficients are written as `0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self
            .coefficients()
            .iter()
            .map(|v| if v.is_finite() { v.to_string() } else { "0".to_string() })
            .collect();
        write!(f, "matrix({})", values.join(","))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_rotate_about() {
        let p = Point::new(1.0, 0.0).rotate_about(Point::default(), 90.0);
        assert_approx_eq!(f64, p.x(), 0.0, epsilon = 1e-9);
        assert_approx_eq!(f64, p.y(), 1.0, epsilon = 1e-9);

        let q = Point::new(3.0, 2.0).rotate_about(Point::new(2.0, 2.0), 180.0);
        assert_approx_eq!(f64, q.x(), 1.0, epsilon = 1e-9);
        assert_approx_eq!(f64, q.y(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_point_offset_polar() {
        let p = Point::new(1.0, 1.0).offset_polar(90.0, 2.0);
        assert_approx_eq!(f64, p.x(), 1.0, epsilon = 1e-9);
        assert_approx_eq!(f64, p.y(), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bounds_new_normalizes() {
        let bounds = Bounds::new(5.0, 3.0, -1.0, -2.0);
        assert_eq!(bounds.min_x(), -1.0);
        assert_eq!(bounds.min_y(), -2.0);
        assert_eq!(bounds.max_x(), 5.0);
        assert_eq!(bounds.max_y(), 3.0);
    }

    #[test]
    fn test_bounds_from_center() {
        let bounds = Bounds::new_from_center(Point::new(1.0, 1.0), Size::new(4.0, 2.0));
        assert_eq!(bounds.min_x(), -1.0);
        assert_eq!(bounds.max_x(), 3.0);
        assert_eq!(bounds.min_y(), 0.0);
        assert_eq!(bounds.max_y(), 2.0);
        assert_eq!(bounds.center(), Point::new(1.0, 1.0));
    }

    #[test]
    fn test_bounds_add_padding() {
        let bounds = Bounds::new(0.0, 0.0, 10.0, 10.0).add_padding(Insets::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(bounds.min_x(), -4.0);
        assert_eq!(bounds.max_x(), 12.0);
        assert_eq!(bounds.min_y(), -3.0);
        assert_eq!(bounds.max_y(), 11.0);
    }

    #[test]
    fn test_bounds_rotated_about() {
        let bounds = Bounds::new(-2.0, -1.0, 2.0, 1.0).rotated_about(Point::default(), 90.0);
        assert_approx_eq!(f64, bounds.width(), 2.0, epsilon = 1e-9);
        assert_approx_eq!(f64, bounds.height(), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bounds_contains() {
        let outer = Bounds::new(-5.0, -5.0, 5.0, 5.0);
        assert!(outer.contains(Bounds::new(-1.0, -1.0, 1.0, 1.0)));
        assert!(outer.contains(outer));
        assert!(!outer.contains(Bounds::new(-6.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_bounds_intersects() {
        let board = Bounds::new(-5.0, -5.0, 5.0, 5.0);
        assert!(board.intersects(Bounds::new(4.0, 4.0, 6.0, 6.0)));
        assert!(board.intersects(Bounds::new(5.0, 0.0, 7.0, 1.0)));
        assert!(!board.intersects(Bounds::new(19.5, -0.5, 20.5, 0.5)));
    }

    #[test]
    fn test_accumulator_skips_non_finite() {
        let mut accumulator = BoundsAccumulator::new();
        assert!(accumulator.is_empty());

        accumulator.include_point(Point::new(f64::NAN, 1.0));
        accumulator.include_bounds(Bounds::new(0.0, 0.0, f64::INFINITY, 1.0));
        assert!(accumulator.is_empty());

        accumulator.include_point(Point::new(1.0, 2.0));
        accumulator.include_point(Point::new(-1.0, 5.0));
        let bounds = accumulator.finish().unwrap();
        assert_eq!(bounds, Bounds::new(-1.0, 2.0, 1.0, 5.0));
    }

    #[test]
    fn test_transform_from_point_pairs() {
        let transform = Transform::from_point_pairs(
            Point::new(-10.0, 10.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, -10.0),
            Point::new(200.0, 200.0),
        )
        .unwrap();

        assert_approx_eq!(f64, transform.scale(), 10.0, epsilon = 1e-9);
        assert!(transform.is_mirrored());

        let p = transform.apply(Point::new(10.0, -10.0));
        assert_approx_eq!(f64, p.x(), 200.0, epsilon = 1e-9);
        assert_approx_eq!(f64, p.y(), 200.0, epsilon = 1e-9);

        let origin = transform.apply(Point::new(0.0, 0.0));
        assert_approx_eq!(f64, origin.x(), 100.0, epsilon = 1e-9);
        assert_approx_eq!(f64, origin.y(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_transform_degenerate_reference() {
        let result = Transform::from_point_pairs(
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(10.0, 10.0),
        );
        assert!(matches!(
            result,
            Err(GeometryError::DegenerateReference { .. })
        ));

        let result = Transform::from_point_pairs(
            Point::new(f64::NAN, 0.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(10.0, 10.0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_transform_rejects_overflowing_reference() {
        let result = Transform::from_point_pairs(
            Point::new(-1.5e308, 1.5e308),
            Point::new(0.0, 0.0),
            Point::new(1.5e308, -1.5e308),
            Point::new(800.0, 600.0),
        );
        assert!(matches!(
            result,
            Err(GeometryError::DegenerateReference { .. })
        ));
    }

    #[test]
    fn test_transform_map_angle() {
        assert_eq!(Transform::identity().map_angle(30.0), 30.0);
        let flipped = Transform::new(2.0, 0.0, 0.0, -2.0, 0.0, 0.0);
        assert_eq!(flipped.map_angle(30.0), -30.0);
    }

    #[test]
    fn test_transform_display() {
        let transform = Transform::new(2.5, 0.0, 0.0, -2.5, 100.0, f64::NAN);
        assert_eq!(transform.to_string(), "matrix(2.5,0,0,-2.5,100,0)");
    }
}
