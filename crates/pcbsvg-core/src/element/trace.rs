//! Copper traces and pours.

use serde::Deserialize;

use crate::{
    draw::{RingVertex, Shape},
    element::{Coord, FillPattern, LayerRef, point_of, points_of},
    geometry::{Point, Size},
    units::{Angle, Length, OptionLengthExt, degrees_or_zero},
};

/// A `wire` route point: copper continues on `layer` with `width`.
#[derive(Debug, Clone, Deserialize)]
pub struct WirePoint {
    pub x: Option<Length>,
    pub y: Option<Length>,
    pub width: Option<Length>,
    pub layer: LayerRef,
}

/// A `via` route point: the route changes layer here.
#[derive(Debug, Clone, Deserialize)]
pub struct ViaPoint {
    pub x: Option<Length>,
    pub y: Option<Length>,
    pub from_layer: Option<LayerRef>,
    pub to_layer: Option<LayerRef>,
}

/// One point of a trace route, tagged by `route_type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "route_type", rename_all = "snake_case")]
pub enum RoutePoint {
    Wire(WirePoint),
    Via(ViaPoint),
    #[serde(other)]
    Unknown,
}

impl RoutePoint {
    pub fn point(&self) -> Option<Point> {
        match self {
            Self::Wire(wire) => point_of(wire.x, wire.y),
            Self::Via(via) => point_of(via.x, via.y),
            Self::Unknown => None,
        }
    }

    fn wire(&self) -> Option<&WirePoint> {
        match self {
            Self::Wire(wire) => Some(wire),
            _ => None,
        }
    }
}

/// A single stroked straight piece of a trace.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceSegment<'a> {
    pub start: Point,
    pub end: Point,
    pub width: f64,
    pub layer: &'a LayerRef,
}

/// `pcb_trace`
#[derive(Debug, Clone, Deserialize)]
pub struct Trace {
    pub pcb_trace_id: Option<String>,
    pub source_trace_id: Option<String>,
    #[serde(default)]
    pub route: Vec<RoutePoint>,
    pub is_covered_with_solder_mask: Option<bool>,
}

impl Trace {
    /// Splits the route into stroked segments.
    ///
    /// Each segment takes its layer and width from its starting wire point,
    /// or from its ending wire point when it starts at a via. Segments
    /// between two vias, and segments with an invalid end point or
    /// non-positive width, are dropped.
    pub fn segments(&self) -> Vec<TraceSegment<'_>> {
        self.route
            .windows(2)
            .filter_map(|pair| {
                let (from, to) = (&pair[0], &pair[1]);
                let wire = from.wire().or_else(|| to.wire())?;
                let width = wire.width.positive()?;
                Some(TraceSegment {
                    start: from.point()?,
                    end: to.point()?,
                    width,
                    layer: &wire.layer,
                })
            })
            .collect()
    }
}

/// A vertex of a b-rep ring; a non-zero `bulge` turns the outgoing edge into an arc.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RingPoint {
    pub x: Option<Length>,
    pub y: Option<Length>,
    pub bulge: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrepRing {
    #[serde(default)]
    pub vertices: Vec<RingPoint>,
}

/// Boundary representation: one outer ring and any number of holes.
#[derive(Debug, Clone, Deserialize)]
pub struct BrepShape {
    #[serde(default)]
    pub outer_ring: BrepRing,
    #[serde(default)]
    pub inner_rings: Vec<BrepRing>,
}

fn ring_vertices(ring: &BrepRing) -> Vec<RingVertex> {
    ring.vertices
        .iter()
        .filter_map(|vertex| {
            let point = point_of(vertex.x, vertex.y)?;
            Some(RingVertex::new(
                point,
                vertex.bulge.filter(|b| b.is_finite()).unwrap_or(0.0),
            ))
        })
        .collect()
}

/// Converts a b-rep into a fillable [`Shape::Ring`].
pub fn brep_to_shape(brep: &BrepShape) -> Option<Shape> {
    Shape::ring(
        ring_vertices(&brep.outer_ring),
        brep.inner_rings.iter().map(ring_vertices).collect(),
    )
}

/// Shape tag of a `pcb_copper_pour`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PourShape {
    Rect,
    Polygon,
    Brep,
    Unknown(String),
}

impl From<String> for PourShape {
    fn from(value: String) -> Self {
        match value.as_str() {
            "rect" => Self::Rect,
            "polygon" => Self::Polygon,
            "brep" => Self::Brep,
            _ => Self::Unknown(value),
        }
    }
}

/// `pcb_copper_pour`
#[derive(Debug, Clone, Deserialize)]
pub struct CopperPour {
    pub pcb_copper_pour_id: Option<String>,
    pub shape: PourShape,
    pub layer: LayerRef,
    pub center: Option<Coord>,
    pub width: Option<Length>,
    pub height: Option<Length>,
    #[serde(alias = "ccw_rotation")]
    pub rotation: Option<Angle>,
    #[serde(default)]
    pub points: Vec<Coord>,
    pub brep_shape: Option<BrepShape>,
    pub is_covered_with_solder_mask: Option<bool>,
    pub fill_pattern: Option<FillPattern>,
}

impl CopperPour {
    pub fn shape(&self) -> Option<Shape> {
        match self.shape {
            PourShape::Rect => Shape::rect(
                self.center.as_ref()?.point()?,
                Size::new(self.width.positive()?, self.height.positive()?),
                degrees_or_zero(self.rotation),
                0.0,
            ),
            PourShape::Polygon => Shape::polygon(points_of(&self.points)),
            PourShape::Brep => brep_to_shape(self.brep_shape.as_ref()?),
            PourShape::Unknown(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::geometry::Bounds;

    fn trace(route: serde_json::Value) -> Trace {
        serde_json::from_value(json!({ "pcb_trace_id": "t1", "route": route })).unwrap()
    }

    #[test]
    fn test_trace_segments_follow_wire_layers() {
        let trace = trace(json!([
            {"route_type": "wire", "x": 0, "y": 0, "width": 0.2, "layer": "top"},
            {"route_type": "via", "x": 1, "y": 0, "from_layer": "top", "to_layer": "bottom"},
            {"route_type": "wire", "x": 1, "y": 0, "width": 0.3, "layer": "bottom"},
            {"route_type": "wire", "x": 2, "y": 1, "width": 0.3, "layer": "bottom"}
        ]));
        let segments = trace.segments();
        assert_eq!(segments.len(), 3);
        assert_eq!(*segments[0].layer, LayerRef::Top);
        assert_eq!(segments[0].width, 0.2);
        assert_eq!(*segments[1].layer, LayerRef::Bottom);
        assert_eq!(*segments[2].layer, LayerRef::Bottom);
        assert_eq!(segments[2].end, Point::new(2.0, 1.0));
    }

    #[test]
    fn test_trace_single_point_has_no_segments() {
        let trace = trace(json!([
            {"route_type": "wire", "x": 0, "y": 0, "width": 0.2, "layer": "top"}
        ]));
        assert!(trace.segments().is_empty());
    }

    #[test]
    fn test_trace_skips_invalid_points() {
        let trace = trace(json!([
            {"route_type": "wire", "x": 0, "y": 0, "width": 0.2, "layer": "top"},
            {"route_type": "wire", "x": "oops", "y": 0, "width": 0.2, "layer": "top"},
            {"route_type": "teleport", "x": 4, "y": 0}
        ]));
        assert!(trace.segments().is_empty());
    }

    #[test]
    fn test_pour_shapes() {
        let pour: CopperPour = serde_json::from_value(json!({
            "shape": "rect", "layer": "top",
            "center": {"x": 0, "y": 0}, "width": 4, "height": 2
        }))
        .unwrap();
        assert_eq!(
            pour.shape().unwrap().extent(),
            Bounds::new(-2.0, -1.0, 2.0, 1.0)
        );

        let pour: CopperPour = serde_json::from_value(json!({
            "shape": "brep", "layer": "bottom",
            "brep_shape": {
                "outer_ring": {"vertices": [
                    {"x": 0, "y": 0}, {"x": 4, "y": 0}, {"x": 4, "y": 4}, {"x": 0, "y": 4}
                ]},
                "inner_rings": [{"vertices": [
                    {"x": 1, "y": 1}, {"x": 2, "y": 1, "bulge": 1}, {"x": 2, "y": 2}
                ]}]
            }
        }))
        .unwrap();
        let shape = pour.shape().unwrap();
        assert!(shape.has_holes());
        assert_eq!(shape.extent(), Bounds::new(0.0, 0.0, 4.0, 4.0));
    }

    #[test]
    fn test_pour_polygon_needs_three_points() {
        let pour: CopperPour = serde_json::from_value(json!({
            "shape": "polygon", "layer": "top",
            "points": [{"x": 0, "y": 0}, {"x": 1, "y": 0}]
        }))
        .unwrap();
        assert!(pour.shape().is_none());
    }
}
