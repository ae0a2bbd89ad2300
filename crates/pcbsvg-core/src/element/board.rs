//! Structural records: boards, panels, groups and components.

use serde::Deserialize;

use crate::{
    element::Coord,
    geometry::{Bounds, Point, Size},
    units::{Angle, Length, OptionLengthExt},
};

/// An image fill tiled across a board or pour.
#[derive(Debug, Clone, Deserialize)]
pub struct FillPattern {
    pub image_url: String,
    pub scale: Option<f64>,
    #[serde(alias = "ccw_rotation")]
    pub rotation: Option<Angle>,
    pub tile_size: Option<Length>,
}

/// `pcb_board`
#[derive(Debug, Clone, Deserialize)]
pub struct Board {
    pub pcb_board_id: Option<String>,
    #[serde(default)]
    pub center: Coord,
    pub width: Option<Length>,
    pub height: Option<Length>,
    #[serde(default)]
    pub outline: Vec<Coord>,
    pub pcb_panel_id: Option<String>,
    pub num_layers: Option<u32>,
    pub thickness: Option<Length>,
    pub fill_pattern: Option<FillPattern>,
}

impl Board {
    /// The outline polygon, if at least three valid points are present.
    pub fn outline_points(&self) -> Option<Vec<Point>> {
        let points: Vec<Point> = self.outline.iter().filter_map(Coord::point).collect();
        (points.len() >= 3).then_some(points)
    }

    /// The axis-aligned board rectangle from center, width and height.
    pub fn rect(&self) -> Option<Bounds> {
        centered_rect(&self.center, self.width, self.height)
    }

    /// The board rectangle, falling back to the bounds of the outline.
    pub fn extent(&self) -> Option<Bounds> {
        match self.outline_points() {
            Some(points) => Bounds::from_points(&points),
            None => self.rect(),
        }
    }
}

/// `pcb_panel`
#[derive(Debug, Clone, Deserialize)]
pub struct Panel {
    pub pcb_panel_id: Option<String>,
    #[serde(default)]
    pub center: Coord,
    pub width: Option<Length>,
    pub height: Option<Length>,
}

impl Panel {
    pub fn rect(&self) -> Option<Bounds> {
        centered_rect(&self.center, self.width, self.height)
    }
}

/// `pcb_group`
#[derive(Debug, Clone, Deserialize)]
pub struct Group {
    pub pcb_group_id: String,
    pub name: Option<String>,
    pub center: Option<Coord>,
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub anchor_position: Option<Coord>,
    pub parent_pcb_group_id: Option<String>,
    pub pcb_board_id: Option<String>,
}

impl Group {
    /// The explicit group rectangle, when center, width and height are all valid.
    pub fn rect(&self) -> Option<Bounds> {
        self.center
            .as_ref()
            .and_then(|center| centered_rect(center, self.width, self.height))
    }

    /// The anchor the group positions its members from: the explicit anchor
    /// position, else the center.
    pub fn anchor(&self) -> Option<Point> {
        self.anchor_position
            .as_ref()
            .and_then(Coord::point)
            .or_else(|| self.center.as_ref().and_then(Coord::point))
    }
}

/// `pcb_component`
#[derive(Debug, Clone, Deserialize)]
pub struct Component {
    pub pcb_component_id: String,
    #[serde(default)]
    pub center: Coord,
    pub width: Option<Length>,
    pub height: Option<Length>,
    #[serde(alias = "ccw_rotation")]
    pub rotation: Option<Angle>,
    pub pcb_group_id: Option<String>,
    pub layer: Option<super::LayerRef>,
    pub reference_designator: Option<String>,
    pub manufacturer_part_number: Option<String>,
}

impl Component {
    /// The component body rectangle, or a point extent when no size is given.
    pub fn extent(&self) -> Option<Bounds> {
        let center = self.center.point()?;
        let size = Size::new(self.width.or_zero().max(0.0), self.height.or_zero().max(0.0));
        Some(Bounds::new_from_center(center, size))
    }
}

/// Rectangle from a center and two strictly positive dimensions.
pub(crate) fn centered_rect(
    center: &Coord,
    width: Option<Length>,
    height: Option<Length>,
) -> Option<Bounds> {
    let center = center.point()?;
    let size = Size::new(width.positive()?, height.positive()?);
    Some(Bounds::new_from_center(center, size))
}
