//! Circuit element data model.
//!
//! A circuit document is a flat JSON array of records discriminated by their
//! `type` tag. [`Element`] is the closed set of records the renderer knows;
//! any other tag deserializes to [`Element::Unknown`] and renders nothing.
//!
//! Lengths are normalized to millimeters while deserializing (see
//! [`crate::units`]), so every record exposes plain `f64` geometry through its
//! shape helpers. Helpers return `None` when required geometry is missing or
//! invalid, and such an element is skipped by both the bounds pass and the
//! generators.
//!
//! Records refer to each other by id (`pcb_component_id`, `pcb_group_id`,
//! ...). Those references are resolved through [`ElementIndex`].

mod annotation;
mod board;
mod cutout;
mod index;
mod layer;
mod marking;
mod pad;
mod trace;

use serde::Deserialize;

use crate::{geometry::Point, units::Length};

pub use annotation::{
    AnchorSide, DEFAULT_ARROW_SIZE_MM, DebugObject, DebugShape, DebugSize, Diagnostic, Dimension,
    DimensionGeometry, NetLabel, NetLabelGeometry, PinNumber, Port, SourceTrace,
};
pub use board::{Board, Component, FillPattern, Group, Panel};
pub use cutout::{Cutout, CutoutGeometry, CutoutShape};
pub use index::ElementIndex;
pub use layer::{LayerRef, MAX_INNER_LAYER, Side};
pub use marking::{
    CourtyardCircle, CourtyardPolygon, CourtyardRect, DEFAULT_FONT_SIZE_MM, FabricationPath,
    FabricationRect, FabricationText, KnockoutPadding, SilkscreenCircle, SilkscreenLine,
    SilkscreenPath, SilkscreenRect, SilkscreenText,
};
pub use pad::{
    Hole, HoleShape, PadShape, PlatedHole, PlatedHoleGeometry, PlatedHoleShape, SmtPad,
    SolderPaste, Via,
};
pub use trace::{
    BrepRing, BrepShape, CopperPour, PourShape, RingPoint, RoutePoint, Trace, TraceSegment,
    ViaPoint, WirePoint, brep_to_shape,
};

/// A board-space point as it appears in circuit JSON: `{ "x": .., "y": .. }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Coord {
    pub x: Option<Length>,
    pub y: Option<Length>,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Some(Length::mm(x)),
            y: Some(Length::mm(y)),
        }
    }

    /// The point, or `None` if either coordinate is missing or invalid.
    pub fn point(&self) -> Option<Point> {
        point_of(self.x, self.y)
    }
}

/// Resolves a point from a pair of optional coordinates.
pub(crate) fn point_of(x: Option<Length>, y: Option<Length>) -> Option<Point> {
    Some(Point::new(x?.get()?, y?.get()?))
}

/// Resolves every valid point of a list, dropping invalid entries.
pub(crate) fn points_of(coords: &[Coord]) -> Vec<Point> {
    coords.iter().filter_map(Coord::point).collect()
}

/// One record of a circuit document.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Element {
    #[serde(rename = "pcb_board")]
    Board(Board),
    #[serde(rename = "pcb_panel")]
    Panel(Panel),
    #[serde(rename = "pcb_group")]
    Group(Group),
    #[serde(rename = "pcb_component")]
    Component(Component),
    #[serde(rename = "pcb_smtpad")]
    SmtPad(SmtPad),
    #[serde(rename = "pcb_plated_hole")]
    PlatedHole(PlatedHole),
    #[serde(rename = "pcb_hole")]
    Hole(Hole),
    #[serde(rename = "pcb_via")]
    Via(Via),
    #[serde(rename = "pcb_trace")]
    Trace(Trace),
    #[serde(rename = "pcb_copper_pour")]
    CopperPour(CopperPour),
    #[serde(rename = "pcb_courtyard_rect")]
    CourtyardRect(CourtyardRect),
    #[serde(rename = "pcb_courtyard_circle")]
    CourtyardCircle(CourtyardCircle),
    #[serde(rename = "pcb_courtyard_polygon")]
    CourtyardPolygon(CourtyardPolygon),
    #[serde(rename = "pcb_silkscreen_line")]
    SilkscreenLine(SilkscreenLine),
    #[serde(rename = "pcb_silkscreen_rect")]
    SilkscreenRect(SilkscreenRect),
    #[serde(rename = "pcb_silkscreen_circle")]
    SilkscreenCircle(SilkscreenCircle),
    #[serde(rename = "pcb_silkscreen_path")]
    SilkscreenPath(SilkscreenPath),
    #[serde(rename = "pcb_silkscreen_text")]
    SilkscreenText(SilkscreenText),
    #[serde(rename = "pcb_fabrication_note_path")]
    FabricationPath(FabricationPath),
    #[serde(rename = "pcb_fabrication_note_text")]
    FabricationText(FabricationText),
    #[serde(rename = "pcb_fabrication_note_rect")]
    FabricationRect(FabricationRect),
    #[serde(rename = "pcb_cutout")]
    Cutout(Cutout),
    #[serde(
        rename = "pcb_fabrication_note_dimension",
        alias = "pcb_note_dimension"
    )]
    Dimension(Dimension),
    #[serde(rename = "schematic_net_label")]
    NetLabel(NetLabel),
    #[serde(rename = "pcb_debug_object")]
    DebugObject(DebugObject),
    #[serde(rename = "pcb_port")]
    Port(Port),
    #[serde(rename = "source_trace")]
    SourceTrace(SourceTrace),
    #[serde(rename = "pcb_solder_paste")]
    SolderPaste(SolderPaste),
    #[serde(
        rename = "pcb_trace_error",
        alias = "pcb_placement_error",
        alias = "pcb_via_clearance_error",
        alias = "pcb_footprint_overlap_error",
        alias = "pcb_port_not_matched_error"
    )]
    Diagnostic(Diagnostic),
    #[serde(other)]
    Unknown,
}

impl Element {
    /// The `type` tag this element is emitted with as `data-type`.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Board(_) => "pcb_board",
            Self::Panel(_) => "pcb_panel",
            Self::Group(_) => "pcb_group",
            Self::Component(_) => "pcb_component",
            Self::SmtPad(_) => "pcb_smtpad",
            Self::PlatedHole(_) => "pcb_plated_hole",
            Self::Hole(_) => "pcb_hole",
            Self::Via(_) => "pcb_via",
            Self::Trace(_) => "pcb_trace",
            Self::CopperPour(_) => "pcb_copper_pour",
            Self::CourtyardRect(_) => "pcb_courtyard_rect",
            Self::CourtyardCircle(_) => "pcb_courtyard_circle",
            Self::CourtyardPolygon(_) => "pcb_courtyard_polygon",
            Self::SilkscreenLine(_) => "pcb_silkscreen_line",
            Self::SilkscreenRect(_) => "pcb_silkscreen_rect",
            Self::SilkscreenCircle(_) => "pcb_silkscreen_circle",
            Self::SilkscreenPath(_) => "pcb_silkscreen_path",
            Self::SilkscreenText(_) => "pcb_silkscreen_text",
            Self::FabricationPath(_) => "pcb_fabrication_note_path",
            Self::FabricationText(_) => "pcb_fabrication_note_text",
            Self::FabricationRect(_) => "pcb_fabrication_note_rect",
            Self::Cutout(_) => "pcb_cutout",
            Self::Dimension(_) => "pcb_fabrication_note_dimension",
            Self::NetLabel(_) => "schematic_net_label",
            Self::DebugObject(_) => "pcb_debug_object",
            Self::Port(_) => "pcb_port",
            Self::SourceTrace(_) => "source_trace",
            Self::SolderPaste(_) => "pcb_solder_paste",
            Self::Diagnostic(diagnostic) => {
                diagnostic.error_type.as_deref().unwrap_or("pcb_error")
            }
            Self::Unknown => "unknown",
        }
    }
}
