//! Annotations: dimension notes, net labels, debug objects, ports, source
//! traces and diagnostics.

use std::fmt;

use serde::Deserialize;

use crate::{
    draw::{LINE_HEIGHT_RATIO, measure},
    element::{Coord, DEFAULT_FONT_SIZE_MM, LayerRef, point_of},
    geometry::{Bounds, Point, Size},
    units::{Length, OptionLengthExt},
};

/// Arrow length used when a dimension has none, in millimeters.
pub const DEFAULT_ARROW_SIZE_MM: f64 = 1.0;

/// `pcb_fabrication_note_dimension`
#[derive(Debug, Clone, Deserialize)]
pub struct Dimension {
    #[serde(default)]
    pub from: Coord,
    #[serde(default)]
    pub to: Coord,
    pub text: Option<String>,
    pub font_size: Option<Length>,
    pub arrow_size: Option<Length>,
    pub offset_distance: Option<Length>,
    pub offset_direction: Option<Coord>,
    pub color: Option<String>,
    pub layer: Option<LayerRef>,
}

/// Resolved dimension geometry, all in board space.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionGeometry {
    /// Measured points.
    pub from: Point,
    pub to: Point,
    /// Dimension line ends, `from`/`to` shifted by the offset vector.
    pub line_from: Point,
    pub line_to: Point,
    /// Unit vector the dimension line is offset along.
    pub normal: Point,
    pub arrow_size: f64,
    pub font_size: f64,
    pub label: String,
    pub label_anchor: Point,
    /// Label rotation in degrees, kept within `(-90, 90]` so it never reads upside down.
    pub label_rotation: f64,
}

impl Dimension {
    pub fn font_size_mm(&self) -> f64 {
        self.font_size.positive().unwrap_or(DEFAULT_FONT_SIZE_MM)
    }

    /// Resolves the dimension, or `None` when an end point is missing or both coincide.
    pub fn geometry(&self) -> Option<DimensionGeometry> {
        let from = self.from.point()?;
        let to = self.to.point()?;
        let delta = to.sub_point(from);
        let length = delta.hypot();
        if length <= f64::EPSILON {
            return None;
        }

        let normal = self
            .offset_direction
            .as_ref()
            .and_then(Coord::point)
            .filter(|direction| direction.hypot() > f64::EPSILON)
            .map(|direction| direction.scale(1.0 / direction.hypot()))
            .unwrap_or_else(|| Point::new(-delta.y() / length, delta.x() / length));
        let offset = normal.scale(self.offset_distance.or_zero());
        let line_from = from.add_point(offset);
        let line_to = to.add_point(offset);

        let font_size = self.font_size_mm();
        let label = self
            .text
            .clone()
            .unwrap_or_else(|| format_millimeters(length));
        let label_anchor = line_from
            .midpoint(line_to)
            .add_point(normal.scale(font_size * LINE_HEIGHT_RATIO / 2.0));

        let mut label_rotation = delta.y().atan2(delta.x()).to_degrees();
        if label_rotation > 90.0 {
            label_rotation -= 180.0;
        } else if label_rotation <= -90.0 {
            label_rotation += 180.0;
        }

        Some(DimensionGeometry {
            from,
            to,
            line_from,
            line_to,
            normal,
            arrow_size: self.arrow_size.positive().unwrap_or(DEFAULT_ARROW_SIZE_MM),
            font_size,
            label,
            label_anchor,
            label_rotation,
        })
    }
}

/// Formats a measured length with at most two decimals, e.g. `2.5mm`.
fn format_millimeters(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{text}mm")
}

/// Side of a net label its connection point sits on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum AnchorSide {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

impl From<String> for AnchorSide {
    fn from(value: String) -> Self {
        match value.as_str() {
            "right" => Self::Right,
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            _ => Self::Left,
        }
    }
}

/// `schematic_net_label`
#[derive(Debug, Clone, Deserialize)]
pub struct NetLabel {
    #[serde(default)]
    pub center: Coord,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub anchor_side: AnchorSide,
    pub anchor_position: Option<Coord>,
    pub color: Option<String>,
}

/// Flag-shaped net label outline with its text placement.
#[derive(Debug, Clone, PartialEq)]
pub struct NetLabelGeometry {
    /// Closed outline, the first point being the connection tip.
    pub outline: Vec<Point>,
    pub text_center: Point,
}

impl NetLabel {
    /// Lays out the label for `font_size` (board units).
    ///
    /// The tip sits on `anchor_position` when given; otherwise the whole
    /// outline is centered on `center`.
    pub fn geometry(&self, font_size: f64) -> Option<NetLabelGeometry> {
        let anchor = match &self.anchor_position {
            Some(anchor) => Some(anchor.point()?),
            None => None,
        };
        let text = measure(&self.text, font_size, true);
        let padding = font_size * 0.4;
        let body = Size::new(
            text.width() + 2.0 * padding,
            font_size * LINE_HEIGHT_RATIO + padding,
        );
        let tip = body.height() / 2.0;
        let (hw, hh) = (body.width() / 2.0, body.height() / 2.0);

        let origin = anchor.unwrap_or_default();
        let (ax, ay) = (origin.x(), origin.y());
        let (outline, text_center) = match self.anchor_side {
            AnchorSide::Left => (
                vec![
                    Point::new(ax, ay),
                    Point::new(ax + tip, ay + hh),
                    Point::new(ax + tip + body.width(), ay + hh),
                    Point::new(ax + tip + body.width(), ay - hh),
                    Point::new(ax + tip, ay - hh),
                ],
                Point::new(ax + tip + hw, ay),
            ),
            AnchorSide::Right => (
                vec![
                    Point::new(ax, ay),
                    Point::new(ax - tip, ay - hh),
                    Point::new(ax - tip - body.width(), ay - hh),
                    Point::new(ax - tip - body.width(), ay + hh),
                    Point::new(ax - tip, ay + hh),
                ],
                Point::new(ax - tip - hw, ay),
            ),
            AnchorSide::Top => (
                vec![
                    Point::new(ax, ay),
                    Point::new(ax + hw, ay - tip),
                    Point::new(ax + hw, ay - tip - body.height()),
                    Point::new(ax - hw, ay - tip - body.height()),
                    Point::new(ax - hw, ay - tip),
                ],
                Point::new(ax, ay - tip - hh),
            ),
            AnchorSide::Bottom => (
                vec![
                    Point::new(ax, ay),
                    Point::new(ax - hw, ay + tip),
                    Point::new(ax - hw, ay + tip + body.height()),
                    Point::new(ax + hw, ay + tip + body.height()),
                    Point::new(ax + hw, ay + tip),
                ],
                Point::new(ax, ay + tip + hh),
            ),
        };

        if anchor.is_some() {
            return Some(NetLabelGeometry {
                outline,
                text_center,
            });
        }

        let center = self.center.point()?;
        let shift = center.sub_point(Bounds::from_points(&outline)?.center());
        Some(NetLabelGeometry {
            outline: outline.into_iter().map(|p| p.add_point(shift)).collect(),
            text_center: text_center.add_point(shift),
        })
    }
}

/// Shape tag of a `pcb_debug_object`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum DebugShape {
    Rect,
    Line,
    Unknown(String),
}

impl From<String> for DebugShape {
    fn from(value: String) -> Self {
        match value.as_str() {
            "rect" => Self::Rect,
            "line" => Self::Line,
            _ => Self::Unknown(value),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DebugSize {
    pub width: Option<Length>,
    pub height: Option<Length>,
}

/// `pcb_debug_object`
#[derive(Debug, Clone, Deserialize)]
pub struct DebugObject {
    pub shape: DebugShape,
    pub center: Option<Coord>,
    pub size: Option<DebugSize>,
    pub start: Option<Coord>,
    pub end: Option<Coord>,
    #[serde(alias = "title")]
    pub label: Option<String>,
    pub color: Option<String>,
}

impl DebugObject {
    pub fn rect(&self) -> Option<Bounds> {
        let size = self.size?;
        let size = Size::new(size.width.value()?.abs(), size.height.value()?.abs());
        Some(Bounds::new_from_center(self.center.as_ref()?.point()?, size))
    }

    pub fn line(&self) -> Option<(Point, Point)> {
        Some((self.start.as_ref()?.point()?, self.end.as_ref()?.point()?))
    }
}

/// A pin label that may be written as a number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PinNumber {
    Number(i64),
    Text(String),
}

impl fmt::Display for PinNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// `pcb_port`
#[derive(Debug, Clone, Deserialize)]
pub struct Port {
    pub pcb_port_id: String,
    pub source_port_id: Option<String>,
    pub pcb_component_id: Option<String>,
    pub x: Option<Length>,
    pub y: Option<Length>,
    #[serde(default)]
    pub layers: Vec<LayerRef>,
    pub pin_number: Option<PinNumber>,
}

impl Port {
    pub fn point(&self) -> Option<Point> {
        point_of(self.x, self.y)
    }
}

/// `source_trace`: the logical connection a routed `pcb_trace` realizes.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceTrace {
    pub source_trace_id: String,
    #[serde(default)]
    pub connected_source_port_ids: Vec<String>,
}

/// A checker diagnostic such as `pcb_trace_error` or `pcb_placement_error`.
#[derive(Debug, Clone, Deserialize)]
pub struct Diagnostic {
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: String,
    pub center: Option<Coord>,
    #[serde(default)]
    pub pcb_port_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_dimension_default_label_and_normal() {
        let dimension: Dimension = serde_json::from_value(json!({
            "from": {"x": 0, "y": 0}, "to": {"x": 2.5, "y": 0}, "offset_distance": 2
        }))
        .unwrap();
        let geometry = dimension.geometry().unwrap();
        assert_eq!(geometry.label, "2.5mm");
        assert_approx_eq!(f64, geometry.normal.y(), 1.0);
        assert_approx_eq!(f64, geometry.line_from.y(), 2.0);
        assert_approx_eq!(f64, geometry.line_to.x(), 2.5);
        assert_approx_eq!(f64, geometry.label_rotation, 0.0);
        assert_approx_eq!(f64, geometry.arrow_size, DEFAULT_ARROW_SIZE_MM);
    }

    #[test]
    fn test_dimension_label_never_upside_down() {
        let dimension: Dimension = serde_json::from_value(json!({
            "from": {"x": 5, "y": 0}, "to": {"x": 0, "y": 0}, "text": "5 mm",
            "offset_direction": {"x": 0, "y": -3}
        }))
        .unwrap();
        let geometry = dimension.geometry().unwrap();
        assert_eq!(geometry.label, "5 mm");
        assert_approx_eq!(f64, geometry.label_rotation, 0.0);
        assert_approx_eq!(f64, geometry.normal.y(), -1.0);
    }

    #[test]
    fn test_dimension_degenerate() {
        let dimension: Dimension = serde_json::from_value(json!({
            "from": {"x": 1, "y": 1}, "to": {"x": 1, "y": 1}
        }))
        .unwrap();
        assert!(dimension.geometry().is_none());
    }

    #[test]
    fn test_net_label_tip_on_anchor() {
        let label: NetLabel = serde_json::from_value(json!({
            "center": {"x": 0, "y": 0}, "text": "VCC", "anchor_side": "right",
            "anchor_position": {"x": 10, "y": 5}
        }))
        .unwrap();
        let geometry = label.geometry(1.0).unwrap();
        assert_eq!(geometry.outline[0], Point::new(10.0, 5.0));
        assert!(geometry.text_center.x() < 10.0);
    }

    #[test]
    fn test_net_label_centered_without_anchor() {
        let label: NetLabel = serde_json::from_value(json!({
            "center": {"x": 3, "y": -2}, "text": "GND", "anchor_side": "top"
        }))
        .unwrap();
        let geometry = label.geometry(1.0).unwrap();
        let bounds = Bounds::from_points(&geometry.outline).unwrap();
        assert_approx_eq!(f64, bounds.center().x(), 3.0);
        assert_approx_eq!(f64, bounds.center().y(), -2.0);
    }

    #[test]
    fn test_debug_object_and_pin_number() {
        let object: DebugObject = serde_json::from_value(json!({
            "shape": "rect", "center": {"x": 0, "y": 0},
            "size": {"width": 2, "height": 1}, "title": "keepout"
        }))
        .unwrap();
        assert_eq!(object.rect(), Some(Bounds::new(-1.0, -0.5, 1.0, 0.5)));
        assert_eq!(object.label.as_deref(), Some("keepout"));

        let port: Port = serde_json::from_value(json!({
            "pcb_port_id": "p1", "x": 0, "y": 0, "pin_number": 3
        }))
        .unwrap();
        assert_eq!(port.pin_number.unwrap().to_string(), "3");
    }
}
