//! SVG document assembly.
//!
//! [`Svg`] is the per-call render context: it holds the viewport transform,
//! the resolved palette and the `<defs>` registered while generating, and
//! hands out document-unique mask and pattern ids. The generators live in
//! the submodules as further `impl Svg` blocks, one per element family, and
//! each returns a [`LayeredOutput`] that is merged here before the layer
//! compositor orders it.

mod annotation;
mod board;
mod copper;
mod debug;
mod drill;
mod marking;
mod mask;

use indexmap::IndexMap;
use log::{debug, info, trace};
use svg::{Document, Node, node::element as svg_element};

use pcbsvg_core::{
    apply_stroke,
    color::Color,
    draw::{
        AnchorAlignment, LayeredOutput, RenderLayer, Shape, StrokeDefinition, SvgNode, Text,
        TextDefinition, fmt_num, polyline_path,
    },
    element::{Element, ElementIndex, FillPattern, Side},
    geometry::{Point, Transform},
    units::{OptionLengthExt, degrees_or_zero},
};

use crate::{
    bounds::Viewport,
    config::RenderOptions,
    style::{DEFAULT_PATTERN_TILE_MM, Palette},
};

/// Font size of overlay labels (group names, offsets, grid), in pixels.
const OVERLAY_FONT_PX: f64 = 10.0;

/// Sets `data-type` and, when given, `data-pcb-layer` on a node.
fn tag<N: Node>(mut node: N, data_type: &str, pcb_layer: Option<&str>) -> N {
    node.assign("data-type", data_type.to_string());
    if let Some(layer) = pcb_layer {
        node.assign("data-pcb-layer", layer.to_string());
    }
    node
}

/// Per-call render context.
pub struct Svg<'a> {
    options: &'a RenderOptions,
    index: &'a ElementIndex<'a>,
    palette: Palette,
    viewport: Viewport,
    transform: Transform,
    defs: Vec<SvgNode>,
    id_counters: IndexMap<&'static str, usize>,
    patterns: IndexMap<String, String>,
}

impl<'a> Svg<'a> {
    pub fn new(
        options: &'a RenderOptions,
        index: &'a ElementIndex<'a>,
        viewport: Viewport,
    ) -> Self {
        Self {
            options,
            index,
            palette: Palette::from_options(options),
            viewport,
            transform: viewport.transform(),
            defs: Vec::new(),
            id_counters: IndexMap::new(),
            patterns: IndexMap::new(),
        }
    }

    /// Renders every element and overlay of the main document.
    pub fn render_elements(&mut self, elements: &[Element]) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        for element in elements {
            let rendered = self.render_element(element);
            trace!(
                element_type = element.type_name(),
                nodes = rendered.len();
                "Rendered element"
            );
            output.merge(rendered);
        }

        if self.options.show_solder_mask() {
            output.merge(self.render_solder_mask(elements));
        }
        if let Some(grid) = self.options.grid() {
            output.merge(self.render_grid(*grid));
        }
        output.merge(self.render_debug_points());
        if self.options.show_group_borders() {
            output.merge(self.render_group_borders());
        }
        if self.options.show_anchor_offsets() {
            output.merge(self.render_anchor_offsets());
        }
        if self.options.show_rats_nest() {
            output.merge(self.render_rats_nest(elements));
        }
        if self.options.show_errors() {
            output.merge(self.render_diagnostics(elements));
        }

        debug!(
            nodes = output.len(),
            silkscreen_top = output.count(RenderLayer::Silkscreen(Side::Top)),
            drill = output.count(RenderLayer::Drill),
            diagnostics = output.count(RenderLayer::Diagnostic);
            "Elements rendered"
        );
        output
    }

    fn render_element(&mut self, element: &Element) -> LayeredOutput {
        match element {
            Element::Board(board) => self.render_board(board),
            Element::Panel(panel) => self.render_panel(panel),
            Element::Component(component) => self.render_component_annotation(component),
            Element::SmtPad(pad) => self.render_smtpad(pad),
            Element::PlatedHole(hole) => self.render_plated_hole(hole),
            Element::Via(via) => self.render_via(via),
            Element::Trace(trace) => self.render_trace(trace),
            Element::CopperPour(pour) => self.render_copper_pour(pour),
            Element::Hole(hole) => self.render_hole(hole),
            Element::Cutout(cutout) => self.render_cutout(cutout),
            Element::CourtyardRect(courtyard) => {
                self.render_courtyard(courtyard.shape(), element.type_name(), &courtyard.layer)
            }
            Element::CourtyardCircle(courtyard) => {
                self.render_courtyard(courtyard.shape(), element.type_name(), &courtyard.layer)
            }
            Element::CourtyardPolygon(courtyard) => {
                self.render_courtyard(courtyard.shape(), element.type_name(), &courtyard.layer)
            }
            Element::SilkscreenLine(line) => self.render_silkscreen_line(line),
            Element::SilkscreenRect(rect) => self.render_silkscreen_rect(rect),
            Element::SilkscreenCircle(circle) => self.render_silkscreen_circle(circle),
            Element::SilkscreenPath(path) => self.render_silkscreen_path(path),
            Element::SilkscreenText(text) => self.render_silkscreen_text(text),
            Element::FabricationPath(path) => self.render_fabrication_path(path),
            Element::FabricationText(text) => self.render_fabrication_text(text),
            Element::FabricationRect(rect) => self.render_fabrication_rect(rect),
            Element::Dimension(dimension) => self.render_dimension(dimension),
            Element::NetLabel(label) => self.render_net_label(label),
            Element::DebugObject(object) => self.render_debug_object(object),
            Element::Port(port) => self.render_pin_number(port),
            // Solder paste only appears in single-layer exports; groups,
            // source traces and diagnostics are drawn as overlays.
            Element::SolderPaste(_)
            | Element::Group(_)
            | Element::SourceTrace(_)
            | Element::Diagnostic(_)
            | Element::Unknown => LayeredOutput::new(),
        }
    }

    /// Renders the single-layer solder paste export for `side`.
    pub fn render_paste_layer(&mut self, elements: &[Element], side: Side) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        for element in elements {
            match element {
                Element::Board(board) => output.merge(self.render_board(board)),
                Element::SolderPaste(paste) if paste.layer.side() == Some(side) => {
                    output.merge(self.render_solder_paste(paste, side));
                }
                _ => {}
            }
        }
        output
    }

    /// Serializes the document: root attributes, `<defs>`, background and
    /// the composited layers.
    pub fn into_document(self, output: LayeredOutput) -> Document {
        let canvas = self.viewport.canvas();
        let width = fmt_num(canvas.width());
        let height = fmt_num(canvas.height());

        let mut document = Document::new()
            .set("xmlns", "http://www.w3.org/2000/svg")
            .set("width", width.clone())
            .set("height", height.clone())
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("data-real-to-screen-transform", self.transform.to_string())
            .set(
                "data-software-used-string",
                format!("pcbsvg@{}", env!("CARGO_PKG_VERSION")),
            );

        if !self.defs.is_empty() {
            let mut defs = svg_element::Definitions::new();
            for def in self.defs {
                defs = defs.add(def);
            }
            document = document.add(defs);
        }

        document = document.add(
            svg_element::Rectangle::new()
                .set("class", "boundary")
                .set("data-type", "pcb_background")
                .set("x", 0)
                .set("y", 0)
                .set("width", width)
                .set("height", height)
                .set("fill", self.palette.background()),
        );

        let layers = output.render();
        info!(layers = layers.len(); "Assembling SVG document");
        for layer in layers {
            document = document.add(layer);
        }
        document
    }

    /// Returns the next document-unique id with `prefix`, e.g. `pattern-0`.
    fn next_id(&mut self, prefix: &'static str) -> String {
        let counter = self.id_counters.entry(prefix).or_insert(0);
        let id = format!("{prefix}-{counter}");
        *counter += 1;
        id
    }

    fn add_def(&mut self, node: impl Node) {
        self.defs.push(Box::new(node));
    }

    /// Registers a tiled image fill and returns its `fill` value.
    ///
    /// Identical patterns share one definition.
    fn pattern_fill(&mut self, pattern: &FillPattern) -> Option<String> {
        if pattern.image_url.trim().is_empty() {
            return None;
        }
        let tile = self
            .transform
            .apply_length(pattern.tile_size.positive().unwrap_or(DEFAULT_PATTERN_TILE_MM));
        let scale = pattern
            .scale
            .filter(|scale| scale.is_finite() && *scale > 0.0)
            .unwrap_or(1.0);
        let rotation = self.transform.map_angle(degrees_or_zero(pattern.rotation));
        let pattern_transform = format!("rotate({}) scale({scale})", fmt_num(rotation));

        let key = format!("{}|{tile}|{pattern_transform}", pattern.image_url);
        if let Some(id) = self.patterns.get(&key) {
            return Some(format!("url(#{id})"));
        }

        let id = self.next_id("pattern");
        self.add_def(
            svg_element::Pattern::new()
                .set("id", id.clone())
                .set("patternUnits", "userSpaceOnUse")
                .set("width", fmt_num(tile))
                .set("height", fmt_num(tile))
                .set("patternTransform", pattern_transform)
                .add(
                    svg_element::Image::new()
                        .set("href", pattern.image_url.clone())
                        .set("width", fmt_num(tile))
                        .set("height", fmt_num(tile)),
                ),
        );
        let fill = format!("url(#{id})");
        self.patterns.insert(key, id);
        Some(fill)
    }

    /// A filled screen-space path for a board-space shape.
    fn fill_path(&self, shape: &Shape, fill: impl Into<svg::node::Value>) -> svg_element::Path {
        let path = svg_element::Path::new()
            .set("d", shape.to_path(&self.transform))
            .set("fill", fill);
        if shape.has_holes() {
            path.set("fill-rule", "evenodd")
        } else {
            path
        }
    }

    /// An unfilled outline of a board-space shape.
    fn outline_path(&self, shape: &Shape, stroke: &StrokeDefinition) -> svg_element::Path {
        let path = svg_element::Path::new()
            .set("d", shape.to_path(&self.transform))
            .set("fill", "none");
        apply_stroke!(path, stroke)
    }

    /// A stroked open polyline through board-space points.
    fn stroke_path(&self, points: &[Point], stroke: &StrokeDefinition) -> svg_element::Path {
        let path = svg_element::Path::new()
            .set("d", polyline_path(points, &self.transform))
            .set("fill", "none");
        apply_stroke!(path, stroke)
    }

    /// Screen stroke for a board-space width.
    fn stroke(&self, color: &Color, width_mm: f64) -> StrokeDefinition {
        StrokeDefinition::solid(color.clone(), self.transform.apply_length(width_mm))
    }

    fn rounded_stroke(&self, color: &Color, width_mm: f64) -> StrokeDefinition {
        StrokeDefinition::rounded(color.clone(), self.transform.apply_length(width_mm))
    }

    /// A text style for a board-space font size.
    fn text_definition(&self, color: &Color, font_mm: f64) -> TextDefinition {
        TextDefinition::new(color.clone(), self.transform.apply_length(font_mm))
    }

    /// Board-anchored text, rotated counter-clockwise by `rotation` degrees.
    fn board_text(
        &self,
        definition: &TextDefinition,
        content: &str,
        anchor: Point,
        rotation: f64,
    ) -> svg_element::Text {
        Text::new(definition, content).render(
            self.transform.apply(anchor),
            self.transform.map_angle(rotation),
        )
    }

    /// Screen-anchored overlay label.
    fn overlay_label(
        &self,
        color: &Color,
        content: &str,
        screen_anchor: Point,
        alignment: AnchorAlignment,
    ) -> svg_element::Text {
        let mut definition = TextDefinition::new(color.clone(), OVERLAY_FONT_PX);
        definition.set_alignment(alignment);
        Text::new(&definition, content).render(screen_anchor, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn render(value: serde_json::Value, options: &RenderOptions) -> String {
        let elements: Vec<Element> = serde_json::from_value(value).unwrap();
        let index = ElementIndex::new(&elements);
        let viewport = Viewport::compute(&elements, &index, options);
        let mut svg = Svg::new(options, &index, viewport);
        let output = svg.render_elements(&elements);
        svg.into_document(output).to_string()
    }

    #[test]
    fn test_next_id_per_prefix() {
        let options = RenderOptions::default();
        let elements = Vec::new();
        let index = ElementIndex::new(&elements);
        let viewport = Viewport::compute(&elements, &index, &options);
        let mut svg = Svg::new(&options, &index, viewport);

        assert_eq!(svg.next_id("knockout-mask"), "knockout-mask-0");
        assert_eq!(svg.next_id("knockout-mask"), "knockout-mask-1");
        assert_eq!(svg.next_id("pattern"), "pattern-0");
    }

    #[test]
    fn test_document_root_attributes() {
        let document = render(json!([]), &RenderOptions::default());
        assert!(document.contains(r#"width="800""#));
        assert!(document.contains(r#"viewBox="0 0 800 600""#));
        assert!(document.contains("data-real-to-screen-transform=\"matrix("));
        assert!(document.contains("data-software-used-string=\"pcbsvg@"));
        assert!(document.contains(r##"fill="#000""##));
        assert!(!document.contains("<defs"));
    }

    #[test]
    fn test_identical_patterns_share_definition() {
        let document = render(
            json!([
                {"type": "pcb_board", "center": {"x": 0, "y": 0}, "width": 10, "height": 10,
                 "fill_pattern": {"image_url": "tile.png"}},
                {"type": "pcb_board", "center": {"x": 20, "y": 0}, "width": 10, "height": 10,
                 "fill_pattern": {"image_url": "tile.png"}}
            ]),
            &RenderOptions::default(),
        );
        assert_eq!(document.matches("<pattern").count(), 1);
        assert_eq!(document.matches("url(#pattern-0)").count(), 2);
    }
}
