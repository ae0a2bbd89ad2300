//! Pads, plated holes, holes, vias and solder paste.

use serde::Deserialize;

use crate::{
    draw::Shape,
    element::{Coord, LayerRef, point_of, points_of},
    geometry::{Point, Size},
    units::{Angle, Length, OptionLengthExt, degrees_or_zero},
};

/// Shape tag of a `pcb_smtpad` or `pcb_solder_paste`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PadShape {
    Rect,
    RotatedRect,
    Circle,
    Pill,
    RotatedPill,
    Polygon,
    Unknown(String),
}

impl From<String> for PadShape {
    fn from(value: String) -> Self {
        match value.as_str() {
            "rect" => Self::Rect,
            "rotated_rect" => Self::RotatedRect,
            "circle" => Self::Circle,
            "pill" => Self::Pill,
            "rotated_pill" => Self::RotatedPill,
            "polygon" => Self::Polygon,
            _ => Self::Unknown(value),
        }
    }
}

/// `pcb_smtpad`
#[derive(Debug, Clone, Deserialize)]
pub struct SmtPad {
    pub pcb_smtpad_id: Option<String>,
    pub shape: PadShape,
    pub x: Option<Length>,
    pub y: Option<Length>,
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub radius: Option<Length>,
    #[serde(alias = "rect_border_radius")]
    pub corner_radius: Option<Length>,
    #[serde(alias = "ccw_rotation")]
    pub rotation: Option<Angle>,
    #[serde(default)]
    pub points: Vec<Coord>,
    pub layer: LayerRef,
    pub is_covered_with_solder_mask: Option<bool>,
    pub pcb_component_id: Option<String>,
    pub pcb_port_id: Option<String>,
}

impl SmtPad {
    /// The pad outline, or `None` if its geometry is missing or invalid.
    pub fn shape(&self) -> Option<Shape> {
        let rotation = degrees_or_zero(self.rotation);
        let polygon = || Shape::polygon(points_of(&self.points));
        pad_shape(
            &self.shape,
            point_of(self.x, self.y),
            self.width,
            self.height,
            self.radius,
            self.corner_radius.or_zero(),
            rotation,
            polygon,
        )
    }
}

/// `pcb_solder_paste`
#[derive(Debug, Clone, Deserialize)]
pub struct SolderPaste {
    pub shape: PadShape,
    pub x: Option<Length>,
    pub y: Option<Length>,
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub radius: Option<Length>,
    #[serde(alias = "ccw_rotation")]
    pub rotation: Option<Angle>,
    pub layer: LayerRef,
}

impl SolderPaste {
    pub fn shape(&self) -> Option<Shape> {
        pad_shape(
            &self.shape,
            point_of(self.x, self.y),
            self.width,
            self.height,
            self.radius,
            0.0,
            degrees_or_zero(self.rotation),
            || None,
        )
    }
}

#[allow(clippy::too_many_arguments)]
fn pad_shape(
    shape: &PadShape,
    center: Option<Point>,
    width: Option<Length>,
    height: Option<Length>,
    radius: Option<Length>,
    corner_radius: f64,
    rotation: f64,
    polygon: impl FnOnce() -> Option<Shape>,
) -> Option<Shape> {
    if let PadShape::Polygon = shape {
        return polygon();
    }
    let center = center?;
    let size = || Some(Size::new(width.positive()?, height.positive()?));
    match shape {
        PadShape::Rect => Shape::rect(center, size()?, rotation, corner_radius),
        PadShape::RotatedRect => Shape::rect(center, size()?, rotation, corner_radius),
        PadShape::Circle => Shape::circle(center, radius.positive()?),
        PadShape::Pill | PadShape::RotatedPill => Shape::pill(center, size()?, rotation),
        PadShape::Polygon | PadShape::Unknown(_) => None,
    }
}

/// Shape tag of a `pcb_plated_hole`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PlatedHoleShape {
    Circle,
    Oval,
    Pill,
    RotatedPill,
    CircularHoleWithRectPad,
    PillHoleWithRectPad,
    RotatedPillHoleWithRectPad,
    Unknown(String),
}

impl From<String> for PlatedHoleShape {
    fn from(value: String) -> Self {
        match value.as_str() {
            "circle" => Self::Circle,
            "oval" => Self::Oval,
            "pill" => Self::Pill,
            "rotated_pill" => Self::RotatedPill,
            "circular_hole_with_rect_pad" => Self::CircularHoleWithRectPad,
            "pill_hole_with_rect_pad" => Self::PillHoleWithRectPad,
            "rotated_pill_hole_with_rect_pad" => Self::RotatedPillHoleWithRectPad,
            _ => Self::Unknown(value),
        }
    }
}

/// `pcb_plated_hole`
#[derive(Debug, Clone, Deserialize)]
pub struct PlatedHole {
    pub pcb_plated_hole_id: Option<String>,
    pub shape: PlatedHoleShape,
    pub x: Option<Length>,
    pub y: Option<Length>,
    pub outer_diameter: Option<Length>,
    pub hole_diameter: Option<Length>,
    pub outer_width: Option<Length>,
    pub outer_height: Option<Length>,
    pub hole_width: Option<Length>,
    pub hole_height: Option<Length>,
    pub rect_pad_width: Option<Length>,
    pub rect_pad_height: Option<Length>,
    pub rect_border_radius: Option<Length>,
    pub hole_offset_x: Option<Length>,
    pub hole_offset_y: Option<Length>,
    #[serde(alias = "ccw_rotation")]
    pub rotation: Option<Angle>,
    pub hole_rotation: Option<Angle>,
    pub rect_rotation: Option<Angle>,
    #[serde(default)]
    pub layers: Vec<LayerRef>,
    pub is_covered_with_solder_mask: Option<bool>,
    pub pcb_component_id: Option<String>,
}

/// Copper annulus and drilled hole of a plated hole.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatedHoleGeometry {
    pub pad: Shape,
    pub hole: Option<Shape>,
}

impl PlatedHole {
    /// Resolves the pad and hole outlines around the shared anchor `(x, y)`.
    pub fn geometry(&self) -> Option<PlatedHoleGeometry> {
        let anchor = point_of(self.x, self.y)?;
        let rotation = degrees_or_zero(self.rotation);
        let outer_size = || {
            Some(Size::new(
                self.outer_width.positive()?,
                self.outer_height.positive()?,
            ))
        };
        let hole_size = || {
            Some(Size::new(
                self.hole_width.positive()?,
                self.hole_height.positive()?,
            ))
        };
        let rect_pad = |rect_rotation: f64| {
            Shape::rect(
                anchor,
                Size::new(self.rect_pad_width.positive()?, self.rect_pad_height.positive()?),
                rect_rotation,
                self.rect_border_radius.or_zero(),
            )
        };
        let hole_center = Point::new(
            anchor.x() + self.hole_offset_x.or_zero(),
            anchor.y() + self.hole_offset_y.or_zero(),
        );

        let (pad, hole) = match self.shape {
            PlatedHoleShape::Circle => (
                Shape::circle(anchor, self.outer_diameter.positive()? / 2.0)?,
                self.hole_diameter
                    .positive()
                    .and_then(|d| Shape::circle(anchor, d / 2.0)),
            ),
            PlatedHoleShape::Oval => (
                Shape::oval(anchor, outer_size()?, rotation)?,
                hole_size().and_then(|size| Shape::oval(anchor, size, rotation)),
            ),
            PlatedHoleShape::Pill | PlatedHoleShape::RotatedPill => (
                Shape::pill(anchor, outer_size()?, rotation)?,
                hole_size().and_then(|size| Shape::pill(anchor, size, rotation)),
            ),
            PlatedHoleShape::CircularHoleWithRectPad => (
                rect_pad(degrees_or_zero(self.rect_rotation))?,
                self.hole_diameter
                    .positive()
                    .and_then(|d| Shape::circle(hole_center, d / 2.0)),
            ),
            PlatedHoleShape::PillHoleWithRectPad => (
                rect_pad(degrees_or_zero(self.rect_rotation))?,
                hole_size().and_then(|size| Shape::pill(hole_center, size, 0.0)),
            ),
            PlatedHoleShape::RotatedPillHoleWithRectPad => (
                rect_pad(degrees_or_zero(self.rect_rotation))?,
                hole_size().and_then(|size| {
                    Shape::pill(hole_center, size, degrees_or_zero(self.hole_rotation))
                }),
            ),
            PlatedHoleShape::Unknown(_) => return None,
        };
        Some(PlatedHoleGeometry { pad, hole })
    }
}

/// Shape tag of a `pcb_hole`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum HoleShape {
    Circle,
    Square,
    Oval,
    Pill,
    RotatedPill,
    Rect,
    Unknown(String),
}

impl From<String> for HoleShape {
    fn from(value: String) -> Self {
        match value.as_str() {
            "circle" | "round" => Self::Circle,
            "square" => Self::Square,
            "oval" => Self::Oval,
            "pill" => Self::Pill,
            "rotated_pill" => Self::RotatedPill,
            "rect" => Self::Rect,
            _ => Self::Unknown(value),
        }
    }
}

/// `pcb_hole`
#[derive(Debug, Clone, Deserialize)]
pub struct Hole {
    #[serde(alias = "shape")]
    pub hole_shape: HoleShape,
    pub x: Option<Length>,
    pub y: Option<Length>,
    pub hole_diameter: Option<Length>,
    pub hole_width: Option<Length>,
    pub hole_height: Option<Length>,
    #[serde(alias = "ccw_rotation")]
    pub rotation: Option<Angle>,
}

impl Hole {
    pub fn shape(&self) -> Option<Shape> {
        let center = point_of(self.x, self.y)?;
        let rotation = degrees_or_zero(self.rotation);
        let size = || Some(Size::new(self.hole_width.positive()?, self.hole_height.positive()?));
        match self.hole_shape {
            HoleShape::Circle => Shape::circle(center, self.hole_diameter.positive()? / 2.0),
            HoleShape::Square => {
                let side = self.hole_diameter.positive()?;
                Shape::rect(center, Size::new(side, side), rotation, 0.0)
            }
            HoleShape::Oval => Shape::oval(center, size()?, rotation),
            HoleShape::Pill | HoleShape::RotatedPill => Shape::pill(center, size()?, rotation),
            HoleShape::Rect => Shape::rect(center, size()?, rotation, 0.0),
            HoleShape::Unknown(_) => None,
        }
    }
}

/// `pcb_via`
#[derive(Debug, Clone, Deserialize)]
pub struct Via {
    pub pcb_via_id: Option<String>,
    pub x: Option<Length>,
    pub y: Option<Length>,
    pub outer_diameter: Option<Length>,
    pub hole_diameter: Option<Length>,
    #[serde(default)]
    pub layers: Vec<LayerRef>,
    pub is_covered_with_solder_mask: Option<bool>,
}

impl Via {
    /// Copper ring and drill of the via.
    pub fn geometry(&self) -> Option<PlatedHoleGeometry> {
        let center = point_of(self.x, self.y)?;
        Some(PlatedHoleGeometry {
            pad: Shape::circle(center, self.outer_diameter.positive()? / 2.0)?,
            hole: self
                .hole_diameter
                .positive()
                .and_then(|d| Shape::circle(center, d / 2.0)),
        })
    }
}
