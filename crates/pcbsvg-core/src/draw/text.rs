//! Text layout and knockout rendering.
//!
//! Text is laid out with approximate font metrics so that rendering is a pure
//! function of its input: every glyph advances `0.6 × font size` and lines
//! are stacked `1.2 × font size` apart.
//!
//! # Overview
//!
//! - [`TextClass`] - Nominal board-space sizes for the kinds of text on a board
//! - [`AnchorAlignment`] - Which point of the text block sits on the anchor
//! - [`TextDefinition`] - Reusable text style configuration (screen space)
//! - [`Text`] - A renderable text element combining content with a [`TextDefinition`]
//! - [`Knockout`] - Renders text as a cutout from a filled box using an SVG mask
//!
//! # Quick Start
//!
//! ```
//! # use pcbsvg_core::color::Color;
//! # use pcbsvg_core::draw::{AnchorAlignment, Text, TextDefinition};
//! # use pcbsvg_core::geometry::Point;
//! let mut style = TextDefinition::new(Color::builtin("#f2eda1"), 10.0);
//! style.set_alignment(AnchorAlignment::BottomLeft);
//!
//! let text = Text::new(&style, "U1\nATmega");
//! let size = text.calculate_size();
//! assert!((size.width() - 36.0).abs() < 1e-9);
//! assert!((size.height() - 24.0).abs() < 1e-9);
//!
//! let node = text.render(Point::new(50.0, 50.0), 0.0);
//! assert!(node.to_string().contains("ATmega"));
//! ```

use serde::Deserialize;
use svg::node::{Text as SvgText, element as svg_element};

use crate::{
    color::Color,
    draw::format::fmt_num,
    geometry::{Bounds, Insets, Point, Size},
};

/// Horizontal advance of one glyph as a fraction of the font size.
pub const GLYPH_ADVANCE_RATIO: f64 = 0.6;

/// Distance between stacked lines as a fraction of the font size.
pub const LINE_HEIGHT_RATIO: f64 = 1.2;

/// Default knockout padding as a fraction of the font size.
pub const KNOCKOUT_PADDING_RATIO: f64 = 0.2;

const DEFAULT_FONT_FAMILY: &str = "Arial, sans-serif";

/// Prefixes marking an active-low signal name.
const NEGATION_PREFIXES: [&str; 2] = ["N_", "~"];

/// Kinds of text with a nominal board-space size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextClass {
    PinNumber,
    ReferenceDesignator,
    ManufacturerCode,
    NetLabel,
    Diagnostic,
    /// An explicit size in millimeters.
    Explicit(f64),
}

impl TextClass {
    /// Nominal font size in millimeters.
    pub fn nominal_size(self) -> f64 {
        match self {
            Self::PinNumber => 0.6,
            Self::ReferenceDesignator => 1.0,
            Self::ManufacturerCode => 0.6,
            Self::NetLabel => 0.8,
            Self::Diagnostic => 0.6,
            Self::Explicit(size) => size,
        }
    }

    /// Screen font size for a transform with uniform `scale`.
    pub fn screen_size(self, scale: f64) -> f64 {
        self.nominal_size() * scale
    }
}

/// Which point of the text block is placed on the anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum AnchorAlignment {
    #[default]
    Center,
    CenterLeft,
    CenterRight,
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl From<String> for AnchorAlignment {
    fn from(value: String) -> Self {
        match value.as_str() {
            "center_left" => Self::CenterLeft,
            "center_right" => Self::CenterRight,
            "top_left" => Self::TopLeft,
            "top_center" => Self::TopCenter,
            "top_right" => Self::TopRight,
            "bottom_left" => Self::BottomLeft,
            "bottom_center" => Self::BottomCenter,
            "bottom_right" => Self::BottomRight,
            _ => Self::Center,
        }
    }
}

impl AnchorAlignment {
    /// Fractions `(fx, fy)` of the block size from its top-left corner to
    /// the anchor, with Y growing downward.
    fn fractions(self) -> (f64, f64) {
        match self {
            Self::Center => (0.5, 0.5),
            Self::CenterLeft => (0.0, 0.5),
            Self::CenterRight => (1.0, 0.5),
            Self::TopLeft => (0.0, 0.0),
            Self::TopCenter => (0.5, 0.0),
            Self::TopRight => (1.0, 0.0),
            Self::BottomLeft => (0.0, 1.0),
            Self::BottomCenter => (0.5, 1.0),
            Self::BottomRight => (1.0, 1.0),
        }
    }

    /// Offset from the anchor to the block's top-left corner (Y down).
    pub fn block_offset(self, size: Size) -> Point {
        let (fx, fy) = self.fractions();
        Point::new(-size.width() * fx, -size.height() * fy)
    }

    /// The SVG `text-anchor` value that keeps every line aligned on the anchor.
    pub fn text_anchor(self) -> &'static str {
        match self.fractions().0 {
            f if f == 0.0 => "start",
            f if f == 1.0 => "end",
            _ => "middle",
        }
    }
}

/// Splits an active-low prefix off `line`.
///
/// Returns whether the line is negated and the text to display.
pub fn split_negation(line: &str) -> (bool, &str) {
    NEGATION_PREFIXES
        .iter()
        .find_map(|prefix| line.strip_prefix(prefix))
        .filter(|rest| !rest.is_empty())
        .map_or((false, line), |rest| (true, rest))
}

/// Size of a text block with the approximate metrics, in the font's units.
pub fn measure(content: &str, font_size: f64, negation_aware: bool) -> Size {
    if content.is_empty() || !font_size.is_finite() || font_size <= 0.0 {
        return Size::default();
    }
    let lines: Vec<&str> = content.split('\n').collect();
    let widest = lines
        .iter()
        .map(|line| {
            let shown = if negation_aware {
                split_negation(line).1
            } else {
                line
            };
            shown.chars().count()
        })
        .max()
        .unwrap_or(0);
    Size::new(
        widest as f64 * GLYPH_ADVANCE_RATIO * font_size,
        lines.len() as f64 * LINE_HEIGHT_RATIO * font_size,
    )
}

/// Board-space extent of a text block anchored at `anchor` (Y up), rotated
/// counter-clockwise by `rotation` and grown by `padding`.
pub fn text_extent(
    anchor: Point,
    content: &str,
    font_size: f64,
    alignment: AnchorAlignment,
    rotation: f64,
    padding: Insets,
) -> Option<Bounds> {
    let size = measure(content, font_size, true);
    if size.is_empty() {
        return None;
    }
    let offset = alignment.block_offset(size);
    let left = anchor.x() + offset.x() - padding.left();
    let right = anchor.x() + offset.x() + size.width() + padding.right();
    // Y flips: the block's top edge is above the anchor in board space.
    let top = anchor.y() - offset.y() + padding.top();
    let bottom = anchor.y() - offset.y() - size.height() - padding.bottom();
    Some(Bounds::new(left, bottom, right, top).rotated_about(anchor, rotation))
}

/// Reusable text style, in screen units.
#[derive(Debug, Clone)]
pub struct TextDefinition {
    font_family: String,
    font_size: f64,
    color: Color,
    alignment: AnchorAlignment,
    negation_aware: bool,
    mirrored: bool,
}

impl TextDefinition {
    pub fn new(color: Color, font_size: f64) -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size,
            color,
            alignment: AnchorAlignment::Center,
            negation_aware: false,
            mirrored: false,
        }
    }

    pub fn set_alignment(&mut self, alignment: AnchorAlignment) {
        self.alignment = alignment;
    }

    /// Render `N_`/`~` prefixed lines with an overline instead of the prefix.
    pub fn set_negation_aware(&mut self, negation_aware: bool) {
        self.negation_aware = negation_aware;
    }

    /// Mirror the text horizontally about its anchor (bottom-side silkscreen).
    pub fn set_mirrored(&mut self, mirrored: bool) {
        self.mirrored = mirrored;
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn color(&self) -> &Color {
        &self.color
    }

    pub fn alignment(&self) -> AnchorAlignment {
        self.alignment
    }
}

/// The `transform` attribute for text rotated by `rotation` screen degrees
/// about `anchor`, optionally mirrored about the anchor's vertical.
pub fn anchor_transform(anchor: Point, rotation: f64, mirrored: bool) -> Option<String> {
    let mut parts = Vec::new();
    if rotation.is_finite() && rotation != 0.0 {
        parts.push(format!(
            "rotate({} {} {})",
            fmt_num(rotation),
            fmt_num(anchor.x()),
            fmt_num(anchor.y())
        ));
    }
    if mirrored {
        parts.push(format!("matrix(-1,0,0,1,{},0)", fmt_num(anchor.x() * 2.0)));
    }
    (!parts.is_empty()).then(|| parts.join(" "))
}

/// A text element in screen space.
#[derive(Debug, Clone)]
pub struct Text<'a> {
    definition: &'a TextDefinition,
    content: &'a str,
}

impl<'a> Text<'a> {
    pub fn new(definition: &'a TextDefinition, content: &'a str) -> Self {
        Self {
            definition,
            content,
        }
    }

    pub fn content(&self) -> &str {
        self.content
    }

    /// Size of the whole block (widest line × stacked line heights).
    pub fn calculate_size(&self) -> Size {
        measure(
            self.content,
            self.definition.font_size,
            self.definition.negation_aware,
        )
    }

    /// The unrotated block rectangle for an anchor at `anchor`.
    pub fn block_bounds(&self, anchor: Point) -> Bounds {
        let size = self.calculate_size();
        let offset = self.definition.alignment.block_offset(size);
        Bounds::new_from_min(anchor.add_point(offset), size)
    }

    /// Renders the text with the definition's color, rotated by `rotation`
    /// screen degrees about `anchor`.
    pub fn render(&self, anchor: Point, rotation: f64) -> svg_element::Text {
        let element = self.render_lines(anchor, self.definition.color.as_str());
        match anchor_transform(anchor, rotation, self.definition.mirrored) {
            Some(transform) => element.set("transform", transform),
            None => element,
        }
    }

    /// Unrotated text filled with `fill`, for use inside masks.
    fn render_lines(&self, anchor: Point, fill: &str) -> svg_element::Text {
        let definition = self.definition;
        let block = self.block_bounds(anchor);
        let line_height = definition.font_size * LINE_HEIGHT_RATIO;

        let mut rendered = svg_element::Text::new("")
            .set("x", fmt_num(anchor.x()))
            .set("y", fmt_num(block.min_y()))
            .set("fill", fill.to_string())
            .set("font-family", definition.font_family.clone())
            .set("font-size", fmt_num(definition.font_size))
            .set("text-anchor", definition.alignment.text_anchor())
            .set("dominant-baseline", "central");

        for (index, line) in self.content.split('\n').enumerate() {
            let y = block.min_y() + (index as f64 + 0.5) * line_height;
            let tspan = svg_element::TSpan::new("")
                .set("x", fmt_num(anchor.x()))
                .set("y", fmt_num(y));
            let (negated, shown) = if definition.negation_aware {
                split_negation(line)
            } else {
                (false, line)
            };
            let tspan = if negated {
                tspan.add(
                    svg_element::TSpan::new("")
                        .set("text-decoration", "overline")
                        .add(SvgText::new(shown)),
                )
            } else {
                tspan.add(SvgText::new(shown))
            };
            rendered = rendered.add(tspan);
        }
        rendered
    }
}

/// The two halves of a knockout: a mask for the document's `<defs>` and the
/// masked box to place on a layer.
#[derive(Debug)]
pub struct KnockoutParts {
    pub mask: svg_element::Mask,
    pub node: svg_element::Group,
    /// Unrotated screen-space box.
    pub bounds: Bounds,
}

/// Text rendered as a cutout from a filled box.
#[derive(Debug, Clone, Default)]
pub struct Knockout {
    padding: Option<Insets>,
    corner_radius: f64,
    border_width: f64,
}

impl Knockout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-side padding in screen units; defaults to `0.2 × font size`.
    pub fn set_padding(&mut self, padding: Insets) {
        self.padding = Some(padding);
    }

    pub fn set_corner_radius(&mut self, corner_radius: f64) {
        self.corner_radius = corner_radius.max(0.0);
    }

    pub fn set_border_width(&mut self, border_width: f64) {
        self.border_width = border_width.max(0.0);
    }

    fn padding_for(&self, text: &Text) -> Insets {
        self.padding
            .unwrap_or_else(|| Insets::uniform(text.definition.font_size * KNOCKOUT_PADDING_RATIO))
    }

    /// The unrotated box: the text block grown by the padding on each side.
    pub fn box_bounds(&self, text: &Text, anchor: Point) -> Bounds {
        let block = text.block_bounds(anchor);
        let padding = self.padding_for(text);
        Bounds::new(
            block.min_x() - padding.left(),
            block.min_y() - padding.top(),
            block.max_x() + padding.right(),
            block.max_y() + padding.bottom(),
        )
    }

    /// Builds the mask and the masked box for `text` at `anchor`.
    ///
    /// The box, the mask contents and the text share the anchor frame; the
    /// returned group carries the rotation, so box dimensions never depend on
    /// the angle.
    pub fn render(&self, text: &Text, anchor: Point, rotation: f64, mask_id: &str) -> KnockoutParts {
        let bounds = self.box_bounds(text, anchor);
        let rect = |fill: &str| {
            let rect = svg_element::Rectangle::new()
                .set("x", fmt_num(bounds.min_x()))
                .set("y", fmt_num(bounds.min_y()))
                .set("width", fmt_num(bounds.width()))
                .set("height", fmt_num(bounds.height()))
                .set("fill", fill.to_string());
            if self.corner_radius > 0.0 {
                rect.set("rx", fmt_num(self.corner_radius))
            } else {
                rect
            }
        };

        let mask = svg_element::Mask::new()
            .set("id", mask_id.to_string())
            .set("maskUnits", "userSpaceOnUse")
            .set("x", fmt_num(bounds.min_x()))
            .set("y", fmt_num(bounds.min_y()))
            .set("width", fmt_num(bounds.width()))
            .set("height", fmt_num(bounds.height()))
            .add(rect("white"))
            .add(text.render_lines(anchor, "black"));

        let color = text.definition.color.as_str();
        let mut knockout_box = rect(color).set("mask", format!("url(#{mask_id})"));
        if self.border_width > 0.0 {
            knockout_box = knockout_box
                .set("stroke", color.to_string())
                .set("stroke-width", fmt_num(self.border_width));
        }

        let mut node = svg_element::Group::new().add(knockout_box);
        if let Some(transform) = anchor_transform(anchor, rotation, text.definition.mirrored) {
            node = node.set("transform", transform);
        }

        KnockoutParts { mask, node, bounds }
    }
}
