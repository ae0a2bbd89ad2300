//! Board cutouts.

use serde::Deserialize;

use crate::{
    draw::{Shape, SlotParams, slot_tiling},
    element::{BrepShape, Coord, brep_to_shape, points_of},
    geometry::{Point, Size},
    units::{Angle, Length, OptionLengthExt, degrees_or_zero},
};

/// Shape tag of a `pcb_cutout`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum CutoutShape {
    Rect,
    Polygon,
    Path,
    Brep,
    Unknown(String),
}

impl From<String> for CutoutShape {
    fn from(value: String) -> Self {
        match value.as_str() {
            "rect" => Self::Rect,
            "polygon" => Self::Polygon,
            "path" => Self::Path,
            "brep" => Self::Brep,
            _ => Self::Unknown(value),
        }
    }
}

/// Resolved material removed by a cutout.
#[derive(Debug, Clone, PartialEq)]
pub enum CutoutGeometry {
    /// A single filled region.
    Solid(Shape),
    /// Slots tiled along a route.
    Slots(Vec<Shape>),
    /// A route milled with a tool of `width`, drawn as a stroked polyline.
    Stroke { points: Vec<Point>, width: f64 },
}

/// `pcb_cutout`
#[derive(Debug, Clone, Deserialize)]
pub struct Cutout {
    pub pcb_cutout_id: Option<String>,
    pub shape: CutoutShape,
    pub center: Option<Coord>,
    pub width: Option<Length>,
    pub height: Option<Length>,
    #[serde(alias = "ccw_rotation")]
    pub rotation: Option<Angle>,
    pub corner_radius: Option<Length>,
    #[serde(default)]
    pub points: Vec<Coord>,
    #[serde(default)]
    pub route: Vec<Coord>,
    pub slot_width: Option<Length>,
    pub slot_length: Option<Length>,
    pub space_between_slots: Option<Length>,
    pub slot_corner_radius: Option<Length>,
    pub brep_shape: Option<BrepShape>,
}

impl Cutout {
    pub fn geometry(&self) -> Option<CutoutGeometry> {
        match self.shape {
            CutoutShape::Rect => Shape::rect(
                self.center.as_ref()?.point()?,
                Size::new(self.width.positive()?, self.height.positive()?),
                degrees_or_zero(self.rotation),
                self.corner_radius.or_zero(),
            )
            .map(CutoutGeometry::Solid),
            CutoutShape::Polygon => {
                Shape::polygon(points_of(&self.points)).map(CutoutGeometry::Solid)
            }
            CutoutShape::Brep => {
                brep_to_shape(self.brep_shape.as_ref()?).map(CutoutGeometry::Solid)
            }
            CutoutShape::Path => self.path_geometry(),
            CutoutShape::Unknown(_) => None,
        }
    }

    fn path_geometry(&self) -> Option<CutoutGeometry> {
        let points = points_of(&self.route);
        if points.len() < 2 {
            return None;
        }
        let slot_width = self.slot_width.positive()?;
        let params = SlotParams {
            slot_width,
            slot_length: self.slot_length.value().unwrap_or(0.0),
            spacing: self.space_between_slots.value().unwrap_or(0.0),
            corner_radius: self.slot_corner_radius.or_zero(),
        };
        match slot_tiling(&points, params) {
            Some(slots) if !slots.is_empty() => Some(CutoutGeometry::Slots(slots)),
            _ => Some(CutoutGeometry::Stroke {
                points,
                width: slot_width,
            }),
        }
    }
}
