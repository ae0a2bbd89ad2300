//! Non-copper markings: courtyards, silkscreen and fabrication notes.

use serde::Deserialize;

use crate::{
    draw::{AnchorAlignment, Shape},
    element::{Coord, LayerRef, point_of, points_of},
    geometry::{Insets, Point, Size},
    units::{Angle, Length, OptionLengthExt, degrees_or_zero},
};

/// Font size used when a text record has none, in millimeters.
pub const DEFAULT_FONT_SIZE_MM: f64 = 1.0;

fn font_size_or_default(font_size: Option<Length>) -> f64 {
    font_size.positive().unwrap_or(DEFAULT_FONT_SIZE_MM)
}

/// `pcb_courtyard_rect`
#[derive(Debug, Clone, Deserialize)]
pub struct CourtyardRect {
    #[serde(default)]
    pub center: Coord,
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub layer: LayerRef,
}

impl CourtyardRect {
    pub fn shape(&self) -> Option<Shape> {
        Shape::rect(
            self.center.point()?,
            Size::new(self.width.positive()?, self.height.positive()?),
            0.0,
            0.0,
        )
    }
}

/// `pcb_courtyard_circle`
#[derive(Debug, Clone, Deserialize)]
pub struct CourtyardCircle {
    #[serde(default)]
    pub center: Coord,
    pub radius: Option<Length>,
    pub layer: LayerRef,
}

impl CourtyardCircle {
    pub fn shape(&self) -> Option<Shape> {
        Shape::circle(self.center.point()?, self.radius.positive()?)
    }
}

/// `pcb_courtyard_polygon`
#[derive(Debug, Clone, Deserialize)]
pub struct CourtyardPolygon {
    #[serde(default)]
    pub points: Vec<Coord>,
    pub layer: LayerRef,
}

impl CourtyardPolygon {
    pub fn shape(&self) -> Option<Shape> {
        Shape::polygon(points_of(&self.points))
    }
}

/// `pcb_silkscreen_line`
#[derive(Debug, Clone, Deserialize)]
pub struct SilkscreenLine {
    pub x1: Option<Length>,
    pub y1: Option<Length>,
    pub x2: Option<Length>,
    pub y2: Option<Length>,
    pub stroke_width: Option<Length>,
    pub layer: LayerRef,
}

impl SilkscreenLine {
    pub fn endpoints(&self) -> Option<(Point, Point)> {
        Some((point_of(self.x1, self.y1)?, point_of(self.x2, self.y2)?))
    }
}

/// `pcb_silkscreen_rect`
#[derive(Debug, Clone, Deserialize)]
pub struct SilkscreenRect {
    #[serde(default)]
    pub center: Coord,
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub stroke_width: Option<Length>,
    pub is_filled: Option<bool>,
    pub corner_radius: Option<Length>,
    pub layer: LayerRef,
}

impl SilkscreenRect {
    pub fn shape(&self) -> Option<Shape> {
        Shape::rect(
            self.center.point()?,
            Size::new(self.width.positive()?, self.height.positive()?),
            0.0,
            self.corner_radius.or_zero(),
        )
    }
}

/// `pcb_silkscreen_circle`
#[derive(Debug, Clone, Deserialize)]
pub struct SilkscreenCircle {
    #[serde(default)]
    pub center: Coord,
    pub radius: Option<Length>,
    pub stroke_width: Option<Length>,
    pub layer: LayerRef,
}

impl SilkscreenCircle {
    pub fn shape(&self) -> Option<Shape> {
        Shape::circle(self.center.point()?, self.radius.positive()?)
    }
}

/// `pcb_silkscreen_path`
#[derive(Debug, Clone, Deserialize)]
pub struct SilkscreenPath {
    #[serde(default)]
    pub route: Vec<Coord>,
    pub stroke_width: Option<Length>,
    pub layer: LayerRef,
}

impl SilkscreenPath {
    /// Valid route points, or `None` with fewer than two.
    pub fn points(&self) -> Option<Vec<Point>> {
        let points = points_of(&self.route);
        (points.len() >= 2).then_some(points)
    }
}

/// Per-side knockout padding around silkscreen text.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct KnockoutPadding {
    pub left: Option<Length>,
    pub right: Option<Length>,
    pub top: Option<Length>,
    pub bottom: Option<Length>,
}

impl KnockoutPadding {
    /// Board-space insets, each missing side falling back to `default`.
    pub fn insets(&self, default: f64) -> Insets {
        let side = |value: Option<Length>| value.value().filter(|v| *v >= 0.0).unwrap_or(default);
        Insets::new(
            side(self.top),
            side(self.right),
            side(self.bottom),
            side(self.left),
        )
    }
}

/// `pcb_silkscreen_text`
#[derive(Debug, Clone, Deserialize)]
pub struct SilkscreenText {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub anchor_position: Coord,
    #[serde(default)]
    pub anchor_alignment: AnchorAlignment,
    pub font_size: Option<Length>,
    #[serde(alias = "ccw_rotation")]
    pub rotation: Option<Angle>,
    pub is_mirrored: Option<bool>,
    pub is_knockout: Option<bool>,
    pub knockout_padding: Option<KnockoutPadding>,
    pub knockout_corner_radius: Option<Length>,
    pub knockout_border_width: Option<Length>,
    pub layer: LayerRef,
    pub pcb_component_id: Option<String>,
}

impl SilkscreenText {
    pub fn font_size_mm(&self) -> f64 {
        font_size_or_default(self.font_size)
    }

    pub fn rotation(&self) -> f64 {
        degrees_or_zero(self.rotation)
    }

    pub fn is_knockout(&self) -> bool {
        self.is_knockout.unwrap_or(false)
    }

    /// Whether the text reads mirrored: explicitly, or by sitting on the bottom side.
    pub fn is_mirrored(&self) -> bool {
        self.is_mirrored.unwrap_or(self.layer == LayerRef::Bottom)
    }

    /// Board-space knockout padding.
    pub fn knockout_insets(&self) -> Insets {
        let default = self.font_size_mm() * crate::draw::KNOCKOUT_PADDING_RATIO;
        self.knockout_padding
            .map(|padding| padding.insets(default))
            .unwrap_or_else(|| Insets::uniform(default))
    }
}

/// `pcb_fabrication_note_path`
#[derive(Debug, Clone, Deserialize)]
pub struct FabricationPath {
    #[serde(default)]
    pub route: Vec<Coord>,
    pub stroke_width: Option<Length>,
    pub color: Option<String>,
    pub layer: Option<LayerRef>,
}

impl FabricationPath {
    pub fn points(&self) -> Option<Vec<Point>> {
        let points = points_of(&self.route);
        (points.len() >= 2).then_some(points)
    }
}

/// `pcb_fabrication_note_text`
#[derive(Debug, Clone, Deserialize)]
pub struct FabricationText {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub anchor_position: Coord,
    #[serde(default)]
    pub anchor_alignment: AnchorAlignment,
    pub font_size: Option<Length>,
    #[serde(alias = "ccw_rotation")]
    pub rotation: Option<Angle>,
    pub color: Option<String>,
    pub layer: Option<LayerRef>,
}

impl FabricationText {
    pub fn font_size_mm(&self) -> f64 {
        font_size_or_default(self.font_size)
    }
}

/// `pcb_fabrication_note_rect`
#[derive(Debug, Clone, Deserialize)]
pub struct FabricationRect {
    #[serde(default)]
    pub center: Coord,
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub stroke_width: Option<Length>,
    pub is_filled: Option<bool>,
    pub color: Option<String>,
    pub layer: Option<LayerRef>,
}

impl FabricationRect {
    pub fn shape(&self) -> Option<Shape> {
        Shape::rect(
            self.center.point()?,
            Size::new(self.width.positive()?, self.height.positive()?),
            0.0,
            0.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use serde_json::json;

    use super::*;
    use crate::geometry::Bounds;

    #[test]
    fn test_courtyard_shapes() {
        let rect: CourtyardRect = serde_json::from_value(json!({
            "center": {"x": 1, "y": 1}, "width": 2, "height": 4, "layer": "top"
        }))
        .unwrap();
        assert_eq!(rect.shape().unwrap().extent(), Bounds::new(0.0, -1.0, 2.0, 3.0));

        let polygon: CourtyardPolygon = serde_json::from_value(json!({
            "points": [{"x": 0, "y": 0}, {"x": 1, "y": 0}, {"x": 1, "y": 1}],
            "layer": "bottom"
        }))
        .unwrap();
        assert!(polygon.shape().is_some());
    }

    #[test]
    fn test_silkscreen_text_defaults() {
        let text: SilkscreenText = serde_json::from_value(json!({
            "text": "U1", "anchor_position": {"x": 0, "y": 0}, "layer": "bottom"
        }))
        .unwrap();
        assert_eq!(text.font_size_mm(), DEFAULT_FONT_SIZE_MM);
        assert_eq!(text.anchor_alignment, AnchorAlignment::Center);
        assert!(text.is_mirrored());
        assert!(!text.is_knockout());
        assert_approx_eq!(f64, text.knockout_insets().left(), 0.2);
    }

    #[test]
    fn test_silkscreen_text_knockout_padding() {
        let text: SilkscreenText = serde_json::from_value(json!({
            "text": "GND",
            "anchor_position": {"x": 0, "y": 0},
            "anchor_alignment": "top_left",
            "font_size": "2mm",
            "ccw_rotation": 90,
            "is_knockout": true,
            "knockout_padding": {"left": 0.5, "top": "0.1mm"},
            "layer": "top"
        }))
        .unwrap();
        let insets = text.knockout_insets();
        assert_approx_eq!(f64, insets.left(), 0.5);
        assert_approx_eq!(f64, insets.top(), 0.1);
        assert_approx_eq!(f64, insets.right(), 0.4);
        assert_approx_eq!(f64, text.rotation(), 90.0);
        assert!(!text.is_mirrored());
    }

    #[test]
    fn test_silkscreen_path_points() {
        let path: SilkscreenPath = serde_json::from_value(json!({
            "route": [{"x": 0, "y": 0}], "stroke_width": 0.1, "layer": "top"
        }))
        .unwrap();
        assert!(path.points().is_none());

        let line: SilkscreenLine = serde_json::from_value(json!({
            "x1": 0, "y1": 0, "x2": "1in", "y2": 0, "stroke_width": 0.1, "layer": "top"
        }))
        .unwrap();
        let (_, end) = line.endpoints().unwrap();
        assert_approx_eq!(f64, end.x(), 25.4);
    }
}
