//! Drawing primitives for board rendering.
//!
//! This module provides the building blocks the SVG generators combine:
//!
//! - [`RenderLayer`] and [`LayeredOutput`] stack nodes in physical layer order
//! - Path primitives ([`rect_path`], [`ring_path`], [`slot_tiling`], …) and the
//!   [`Shape`] enum turn board-space geometry into screen-space path data
//! - [`StrokeDefinition`] and [`apply_stroke!`](crate::apply_stroke!) style outlines
//! - [`Text`] and [`Knockout`] lay out labels and knockout masks
//! - [`fmt_num`] formats every drawing number

mod format;
mod layer;
mod path;
mod stroke;
mod text;

pub use format::{fmt_num, round1};
pub use layer::{CopperFeature, CopperLayer, LayeredOutput, RenderLayer, SvgNode};
pub use path::{
    MAX_SLOTS, PathBuilder, RingVertex, Shape, SlotParams, circle_extent, circle_path, oval_extent,
    oval_path, pill_path, polygon_extent, polygon_path, polyline_extent, polyline_path,
    rect_extent, rect_path, ring_extent, ring_path, slot_tiling,
};
pub use stroke::{StrokeCap, StrokeDefinition, StrokeJoin, StrokeStyle};
pub use text::{
    AnchorAlignment, GLYPH_ADVANCE_RATIO, KNOCKOUT_PADDING_RATIO, Knockout, KnockoutParts,
    LINE_HEIGHT_RATIO, Text, TextClass, TextDefinition, anchor_transform, measure,
    split_negation, text_extent,
};
