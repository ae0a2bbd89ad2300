//! Path primitives for board geometry.
//!
//! Every primitive takes board-space parameters (millimeters, counter-clockwise
//! rotations) plus a [`Transform`] and produces screen-space SVG path data
//! through [`PathBuilder`]. Each primitive has a matching extent function that
//! reports the board-space bounds the bounds pass folds.
//!
//! [`Shape`] bundles the closed primitives so element records can describe
//! their geometry once and have it drawn, measured and used as a solder-mask
//! opening from the same value.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use log::warn;

use crate::{
    draw::format::fmt_num,
    geometry::{Bounds, BoundsAccumulator, Point, Size, Transform},
};

/// Below this length two points are considered coincident.
const COINCIDENT_EPSILON: f64 = 1e-9;

/// Most slots [`slot_tiling`] lays along one route.
pub const MAX_SLOTS: usize = 10_000;

/// Incremental writer for SVG path data in screen space.
///
/// Points passed in are board-space and mapped through the transform; numbers
/// are rounded to one decimal. Arc sweep flags are expressed in board-space
/// orientation and flipped when the transform mirrors.
#[derive(Debug)]
pub struct PathBuilder<'t> {
    transform: &'t Transform,
    data: Vec<String>,
}

impl<'t> PathBuilder<'t> {
    pub fn new(transform: &'t Transform) -> Self {
        Self {
            transform,
            data: Vec::new(),
        }
    }

    fn push_point(&mut self, command: &str, point: Point) {
        let screen = self.transform.apply(point);
        self.data.push(format!(
            "{command} {} {}",
            fmt_num(screen.x()),
            fmt_num(screen.y())
        ));
    }

    /// Starts a new subpath at `point`.
    pub fn move_to(&mut self, point: Point) -> &mut Self {
        self.push_point("M", point);
        self
    }

    /// Straight segment to `point`.
    pub fn line_to(&mut self, point: Point) -> &mut Self {
        self.push_point("L", point);
        self
    }

    /// Elliptical arc to `point`.
    ///
    /// # Arguments
    ///
    /// * `rx`, `ry` - Board-space radii
    /// * `x_rotation` - Board-space rotation of the ellipse x-axis, in degrees
    /// * `large_arc` - Whether the arc spans more than 180°
    /// * `ccw` - Whether the arc runs counter-clockwise in board space
    /// * `point` - Board-space end point
    pub fn arc_to(
        &mut self,
        rx: f64,
        ry: f64,
        x_rotation: f64,
        large_arc: bool,
        ccw: bool,
        point: Point,
    ) -> &mut Self {
        let screen = self.transform.apply(point);
        let sweep = ccw != self.transform.is_mirrored();
        self.data.push(format!(
            "A {} {} {} {} {} {} {}",
            fmt_num(self.transform.apply_length(rx)),
            fmt_num(self.transform.apply_length(ry)),
            fmt_num(self.transform.map_angle(x_rotation)),
            u8::from(large_arc),
            u8::from(sweep),
            fmt_num(screen.x()),
            fmt_num(screen.y())
        ));
        self
    }

    /// Closes the current subpath.
    pub fn close(&mut self) -> &mut Self {
        self.data.push("Z".to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the accumulated path data.
    pub fn finish(self) -> String {
        self.data.join(" ")
    }
}

/// A polygon vertex with the bulge of the edge that leaves it.
///
/// A bulge of `0` is a straight edge; otherwise it is the tangent of a quarter
/// of the arc's included angle, positive for counter-clockwise arcs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingVertex {
    pub point: Point,
    pub bulge: f64,
}

impl RingVertex {
    pub fn new(point: Point, bulge: f64) -> Self {
        Self { point, bulge }
    }
}

/// Parameters for tiling a route with slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotParams {
    pub slot_width: f64,
    pub slot_length: f64,
    pub spacing: f64,
    pub corner_radius: f64,
}

/// A closed, fillable board-space shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Rectangle rotated about its center with optionally rounded corners.
    Rect {
        center: Point,
        size: Size,
        rotation: f64,
        corner_radius: f64,
    },
    Circle {
        center: Point,
        radius: f64,
    },
    /// Rectangle whose short ends are fully rounded.
    Pill {
        center: Point,
        size: Size,
        rotation: f64,
    },
    /// Ellipse inscribed in `size`.
    Oval {
        center: Point,
        size: Size,
        rotation: f64,
    },
    Polygon {
        points: Vec<Point>,
    },
    /// Outer ring with optional holes, edges may bulge into arcs.
    Ring {
        outer: Vec<RingVertex>,
        inner: Vec<Vec<RingVertex>>,
    },
}

impl Shape {
    /// A rectangle, or `None` unless both dimensions are positive and finite.
    pub fn rect(center: Point, size: Size, rotation: f64, corner_radius: f64) -> Option<Self> {
        valid_size(size).then_some(Self::Rect {
            center,
            size,
            rotation,
            corner_radius: corner_radius.max(0.0),
        })
    }

    /// A circle, or `None` unless `radius` is positive and finite.
    pub fn circle(center: Point, radius: f64) -> Option<Self> {
        (radius.is_finite() && radius > 0.0).then_some(Self::Circle { center, radius })
    }

    pub fn pill(center: Point, size: Size, rotation: f64) -> Option<Self> {
        valid_size(size).then_some(Self::Pill {
            center,
            size,
            rotation,
        })
    }

    pub fn oval(center: Point, size: Size, rotation: f64) -> Option<Self> {
        valid_size(size).then_some(Self::Oval {
            center,
            size,
            rotation,
        })
    }

    /// A polygon, or `None` with fewer than three finite points.
    pub fn polygon(points: Vec<Point>) -> Option<Self> {
        (points.len() >= 3 && points.iter().all(|p| p.is_finite()))
            .then_some(Self::Polygon { points })
    }

    /// A ring, or `None` with fewer than two finite outer vertices.
    pub fn ring(outer: Vec<RingVertex>, inner: Vec<Vec<RingVertex>>) -> Option<Self> {
        let finite = |ring: &[RingVertex]| {
            ring.iter()
                .all(|v| v.point.is_finite() && v.bulge.is_finite())
        };
        if outer.len() < 2 || !finite(&outer) {
            return None;
        }
        let inner = inner
            .into_iter()
            .filter(|ring| ring.len() >= 2 && finite(ring))
            .collect();
        Some(Self::Ring { outer, inner })
    }

    /// Screen-space path data for this shape.
    pub fn to_path(&self, transform: &Transform) -> String {
        match self {
            Self::Rect {
                center,
                size,
                rotation,
                corner_radius,
            } => rect_path(*center, *size, *rotation, *corner_radius, transform),
            Self::Circle { center, radius } => circle_path(*center, *radius, transform),
            Self::Pill {
                center,
                size,
                rotation,
            } => pill_path(*center, *size, *rotation, transform),
            Self::Oval {
                center,
                size,
                rotation,
            } => oval_path(*center, *size, *rotation, transform),
            Self::Polygon { points } => polygon_path(points, 0.0, transform),
            Self::Ring { outer, inner } => {
                let mut paths = vec![ring_path(outer, transform)];
                paths.extend(inner.iter().map(|ring| ring_path(ring, transform)));
                paths.retain(|path| !path.is_empty());
                paths.join(" ")
            }
        }
    }

    /// Board-space extent of this shape.
    pub fn extent(&self) -> Bounds {
        match self {
            Self::Rect {
                center,
                size,
                rotation,
                ..
            }
            | Self::Pill {
                center,
                size,
                rotation,
            } => rect_extent(*center, *size, *rotation),
            Self::Circle { center, radius } => circle_extent(*center, *radius),
            Self::Oval {
                center,
                size,
                rotation,
            } => oval_extent(*center, *size, *rotation),
            Self::Polygon { points } => polygon_extent(points).unwrap_or_default(),
            Self::Ring { outer, .. } => ring_extent(outer).unwrap_or_default(),
        }
    }

    /// Returns `true` if the path has holes that need `fill-rule="evenodd"`.
    pub fn has_holes(&self) -> bool {
        matches!(self, Self::Ring { inner, .. } if !inner.is_empty())
    }
}

fn valid_size(size: Size) -> bool {
    size.width().is_finite() && size.height().is_finite() && !size.is_empty()
}

/// Rectangle path, rotated counter-clockwise by `rotation` degrees about
/// `center`. `corner_radius` is clamped to half the shorter side.
pub fn rect_path(
    center: Point,
    size: Size,
    rotation: f64,
    corner_radius: f64,
    transform: &Transform,
) -> String {
    let half_w = size.width() / 2.0;
    let half_h = size.height() / 2.0;
    let radius = corner_radius.clamp(0.0, half_w.min(half_h));
    let local = |x: f64, y: f64| {
        Point::new(center.x() + x, center.y() + y).rotate_about(center, rotation)
    };

    let mut path = PathBuilder::new(transform);
    if radius <= 0.0 {
        path.move_to(local(-half_w, -half_h))
            .line_to(local(half_w, -half_h))
            .line_to(local(half_w, half_h))
            .line_to(local(-half_w, half_h))
            .close();
        return path.finish();
    }

    // Counter-clockwise in board space, starting after the bottom-left corner.
    let segments = [
        (local(half_w - radius, -half_h), local(half_w, -half_h + radius)),
        (local(half_w, half_h - radius), local(half_w - radius, half_h)),
        (local(-half_w + radius, half_h), local(-half_w, half_h - radius)),
        (local(-half_w, -half_h + radius), local(-half_w + radius, -half_h)),
    ];
    path.move_to(local(-half_w + radius, -half_h));
    let mut cursor = local(-half_w + radius, -half_h);
    for (line_end, arc_end) in segments {
        if cursor.distance(line_end) > COINCIDENT_EPSILON {
            path.line_to(line_end);
        }
        path.arc_to(radius, radius, 0.0, false, true, arc_end);
        cursor = arc_end;
    }
    path.close();
    path.finish()
}

/// Axis-aligned extent of a rotated rectangle.
pub fn rect_extent(center: Point, size: Size, rotation: f64) -> Bounds {
    Bounds::new_from_center(center, size).rotated_about(center, rotation)
}

/// Circle drawn as two half arcs.
pub fn circle_path(center: Point, radius: f64, transform: &Transform) -> String {
    let right = Point::new(center.x() + radius, center.y());
    let left = Point::new(center.x() - radius, center.y());
    let mut path = PathBuilder::new(transform);
    path.move_to(right)
        .arc_to(radius, radius, 0.0, false, true, left)
        .arc_to(radius, radius, 0.0, false, true, right)
        .close();
    path.finish()
}

pub fn circle_extent(center: Point, radius: f64) -> Bounds {
    Bounds::new_from_center(center, Size::new(radius * 2.0, radius * 2.0))
}

/// Closed polygon through `points`, rotated about the center of their bounds.
///
/// Returns an empty string for fewer than three points.
pub fn polygon_path(points: &[Point], rotation: f64, transform: &Transform) -> String {
    if points.len() < 3 {
        return String::new();
    }
    let pivot = Bounds::from_points(points)
        .map(Bounds::center)
        .unwrap_or_default();

    let mut path = PathBuilder::new(transform);
    for (index, point) in points.iter().enumerate() {
        let rotated = point.rotate_about(pivot, rotation);
        if index == 0 {
            path.move_to(rotated);
        } else {
            path.line_to(rotated);
        }
    }
    path.close();
    path.finish()
}

pub fn polygon_extent(points: &[Point]) -> Option<Bounds> {
    Bounds::from_points(points)
}

/// Open polyline through `points`, for stroked features.
pub fn polyline_path(points: &[Point], transform: &Transform) -> String {
    let mut path = PathBuilder::new(transform);
    for (index, point) in points.iter().enumerate() {
        if index == 0 {
            path.move_to(*point);
        } else {
            path.line_to(*point);
        }
    }
    path.finish()
}

/// Extent of a polyline stroked with `stroke_width`.
pub fn polyline_extent(points: &[Point], stroke_width: f64) -> Option<Bounds> {
    let half = stroke_width.max(0.0) / 2.0;
    Bounds::from_points(points).map(|bounds| {
        Bounds::new(
            bounds.min_x() - half,
            bounds.min_y() - half,
            bounds.max_x() + half,
            bounds.max_y() + half,
        )
    })
}

/// Geometry of one bulged edge.
struct BulgeArc {
    radius: f64,
    large_arc: bool,
    ccw: bool,
    center: Point,
}

fn bulge_arc(start: Point, end: Point, bulge: f64) -> Option<BulgeArc> {
    let chord = start.distance(end);
    if chord <= COINCIDENT_EPSILON || bulge == 0.0 || !bulge.is_finite() {
        return None;
    }
    let abs_bulge = bulge.abs();
    let radius = chord * (1.0 + bulge * bulge) / (4.0 * abs_bulge);
    let sagitta = abs_bulge * chord / 2.0;

    // Unit normal to the left of start → end.
    let dx = (end.x() - start.x()) / chord;
    let dy = (end.y() - start.y()) / chord;
    let left = Point::new(-dy, dx);

    // A counter-clockwise minor arc has its center to the left of the chord.
    let offset = (radius - sagitta) * bulge.signum();
    let center = start.midpoint(end).add_point(left.scale(offset));

    Some(BulgeArc {
        radius,
        large_arc: abs_bulge > 1.0,
        ccw: bulge > 0.0,
        center,
    })
}

/// Closed ring through `vertices`; each vertex's bulge shapes the edge that
/// leaves it. Zero-length edges are skipped.
///
/// Returns an empty string for fewer than two vertices.
pub fn ring_path(vertices: &[RingVertex], transform: &Transform) -> String {
    if vertices.len() < 2 {
        return String::new();
    }

    let mut path = PathBuilder::new(transform);
    path.move_to(vertices[0].point);
    for (index, vertex) in vertices.iter().enumerate() {
        let next = vertices[(index + 1) % vertices.len()].point;
        if vertex.point.distance(next) <= COINCIDENT_EPSILON {
            continue;
        }
        match bulge_arc(vertex.point, next, vertex.bulge) {
            Some(arc) => {
                path.arc_to(arc.radius, arc.radius, 0.0, arc.large_arc, arc.ccw, next);
            }
            None => {
                path.line_to(next);
            }
        }
    }
    path.close();
    path.finish()
}

/// Normalizes an angle into `[0, TAU)`.
fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

/// Extent of the circular arc around `center` from `start` to `end`.
fn arc_extent(accumulator: &mut BoundsAccumulator, start: Point, end: Point, arc: &BulgeArc) {
    accumulator.include_point(start);
    accumulator.include_point(end);

    let start_angle = (start.y() - arc.center.y()).atan2(start.x() - arc.center.x());
    let end_angle = (end.y() - arc.center.y()).atan2(end.x() - arc.center.x());
    // Sweep measured counter-clockwise from `from`.
    let (from, sweep) = if arc.ccw {
        (start_angle, normalize_angle(end_angle - start_angle))
    } else {
        (end_angle, normalize_angle(start_angle - end_angle))
    };

    for axis in [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2] {
        if normalize_angle(axis - from) <= sweep {
            accumulator.include_point(arc.center.offset_polar(axis.to_degrees(), arc.radius));
        }
    }
}

/// Extent of a ring, including the parts of bulged edges that extend past
/// the vertices.
pub fn ring_extent(vertices: &[RingVertex]) -> Option<Bounds> {
    let mut accumulator = BoundsAccumulator::new();
    for (index, vertex) in vertices.iter().enumerate() {
        let next = vertices[(index + 1) % vertices.len()].point;
        match bulge_arc(vertex.point, next, vertex.bulge) {
            Some(arc) => arc_extent(&mut accumulator, vertex.point, next, &arc),
            None => accumulator.include_point(vertex.point),
        }
    }
    accumulator.finish()
}

/// Pill: a rectangle whose corner radius is half its shorter side.
pub fn pill_path(center: Point, size: Size, rotation: f64, transform: &Transform) -> String {
    let radius = size.width().min(size.height()) / 2.0;
    rect_path(center, size, rotation, radius, transform)
}

/// Ellipse drawn as two half arcs, with the ellipse axes rotated by `rotation`.
pub fn oval_path(center: Point, size: Size, rotation: f64, transform: &Transform) -> String {
    let rx = size.width() / 2.0;
    let ry = size.height() / 2.0;
    let start = Point::new(center.x() + rx, center.y()).rotate_about(center, rotation);
    let opposite = Point::new(center.x() - rx, center.y()).rotate_about(center, rotation);

    let mut path = PathBuilder::new(transform);
    path.move_to(start)
        .arc_to(rx, ry, rotation, false, true, opposite)
        .arc_to(rx, ry, rotation, false, true, start)
        .close();
    path.finish()
}

/// Exact axis-aligned extent of a rotated ellipse.
pub fn oval_extent(center: Point, size: Size, rotation: f64) -> Bounds {
    let rx = size.width() / 2.0;
    let ry = size.height() / 2.0;
    let (sin, cos) = rotation.to_radians().sin_cos();
    let half_w = (rx * rx * cos * cos + ry * ry * sin * sin).sqrt();
    let half_h = (rx * rx * sin * sin + ry * ry * cos * cos).sqrt();
    Bounds::new_from_center(center, Size::new(half_w * 2.0, half_h * 2.0))
}

/// Point at arc length `distance` along `route`, clamped to its ends.
fn point_along(route: &[Point], cumulative: &[f64], distance: f64) -> Point {
    for (index, window) in route.windows(2).enumerate() {
        let (start_len, end_len) = (cumulative[index], cumulative[index + 1]);
        if distance <= end_len {
            let segment = end_len - start_len;
            if segment <= COINCIDENT_EPSILON {
                return window[0];
            }
            let t = ((distance - start_len) / segment).clamp(0.0, 1.0);
            return Point::new(
                window[0].x() + (window[1].x() - window[0].x()) * t,
                window[0].y() + (window[1].y() - window[0].y()) * t,
            );
        }
    }
    route.last().copied().unwrap_or_default()
}

/// Tiles `route` with slots.
///
/// With period `p = slot_length + spacing` and route length `L`, the route
/// carries `⌊L / p⌋` slots; slot `i` spans arc lengths
/// `[i·p, i·p + slot_length]` and becomes a rectangle along the chord
/// between its end points, `slot_width` wide.
///
/// Returns `None` when a parameter is not strictly positive, the route has
/// fewer than two points or the route would carry more than [`MAX_SLOTS`]
/// slots; callers then fall back to a solid stroked route.
///
/// # Examples
///
/// ```
/// # use pcbsvg_core::draw::{SlotParams, slot_tiling};
/// # use pcbsvg_core::geometry::Point;
/// let route = [Point::new(0.0, 0.0), Point::new(18.0, 0.0)];
/// let params = SlotParams { slot_width: 1.0, slot_length: 6.0, spacing: 0.6, corner_radius: 0.0 };
/// assert_eq!(slot_tiling(&route, params).unwrap().len(), 2);
/// ```
pub fn slot_tiling(route: &[Point], params: SlotParams) -> Option<Vec<Shape>> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if route.len() < 2
        || !valid(params.slot_width)
        || !valid(params.slot_length)
        || !valid(params.spacing)
        || !route.iter().all(|p| p.is_finite())
    {
        return None;
    }

    let mut cumulative = Vec::with_capacity(route.len());
    cumulative.push(0.0);
    for window in route.windows(2) {
        let last = cumulative.last().copied().unwrap_or(0.0);
        cumulative.push(last + window[0].distance(window[1]));
    }
    let total = cumulative.last().copied().unwrap_or(0.0);

    let period = params.slot_length + params.spacing;
    let count = (total / period).floor();
    if count > MAX_SLOTS as f64 {
        warn!(length = total, period = period, max = MAX_SLOTS; "Too many slots for route");
        return None;
    }
    let count = count as usize;

    let slots = (0..count)
        .filter_map(|index| {
            let start_distance = index as f64 * period;
            let end_distance = (start_distance + params.slot_length).min(total);
            let start = point_along(route, &cumulative, start_distance);
            let end = point_along(route, &cumulative, end_distance);
            let length = start.distance(end);
            let angle = (end.y() - start.y()).atan2(end.x() - start.x()).to_degrees();
            Shape::rect(
                start.midpoint(end),
                Size::new(length, params.slot_width),
                angle,
                params.corner_radius,
            )
        })
        .collect();
    Some(slots)
}
