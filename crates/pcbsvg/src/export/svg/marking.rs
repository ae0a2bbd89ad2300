//! Courtyards, silkscreen and fabrication notes.

use log::trace;

use pcbsvg_core::{
    apply_stroke,
    draw::{Knockout, LayeredOutput, RenderLayer, Shape, Text},
    element::{
        FabricationPath, FabricationRect, FabricationText, LayerRef, Side, SilkscreenCircle,
        SilkscreenLine, SilkscreenPath, SilkscreenRect, SilkscreenText,
    },
    units::{OptionLengthExt, degrees_or_zero},
};

use super::{Svg, tag};
use crate::style::{
    COURTYARD_STROKE_MM, FABRICATION_STROKE_MM, SILKSCREEN_STROKE_MM, stroke_width_or,
};

fn silkscreen_layer(layer: &LayerRef) -> RenderLayer {
    RenderLayer::Silkscreen(layer.side().unwrap_or(Side::Top))
}

impl Svg<'_> {
    pub(super) fn render_courtyard(
        &mut self,
        shape: Option<Shape>,
        data_type: &str,
        layer: &LayerRef,
    ) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        if !self.options.show_courtyards() {
            return output;
        }
        let Some(shape) = shape else {
            trace!(data_type = data_type; "Skipping courtyard without geometry");
            return output;
        };

        let stroke = self.stroke(self.palette.courtyard(), COURTYARD_STROKE_MM);
        let path = self.outline_path(&shape, &stroke).set("class", "pcb-courtyard");
        output.add_to_layer(
            RenderLayer::Courtyard,
            Box::new(tag(path, data_type, Some(layer.to_string().as_str()))),
        );
        output
    }

    pub(super) fn render_silkscreen_line(&mut self, line: &SilkscreenLine) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let Some((start, end)) = line.endpoints() else {
            return output;
        };

        let width = stroke_width_or(line.stroke_width, SILKSCREEN_STROKE_MM);
        let stroke = self.rounded_stroke(self.palette.silkscreen_for(&line.layer), width);
        let path = self
            .stroke_path(&[start, end], &stroke)
            .set("class", "pcb-silkscreen");
        output.add_to_layer(
            silkscreen_layer(&line.layer),
            Box::new(tag(
                path,
                "pcb_silkscreen_line",
                Some(line.layer.to_string().as_str()),
            )),
        );
        output
    }

    pub(super) fn render_silkscreen_rect(&mut self, rect: &SilkscreenRect) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let Some(shape) = rect.shape() else {
            return output;
        };

        let color = self.palette.silkscreen_for(&rect.layer);
        let path = if rect.is_filled.unwrap_or(false) {
            self.fill_path(&shape, color)
        } else {
            let width = stroke_width_or(rect.stroke_width, SILKSCREEN_STROKE_MM);
            self.outline_path(&shape, &self.stroke(color, width))
        };
        output.add_to_layer(
            silkscreen_layer(&rect.layer),
            Box::new(tag(
                path.set("class", "pcb-silkscreen"),
                "pcb_silkscreen_rect",
                Some(rect.layer.to_string().as_str()),
            )),
        );
        output
    }

    pub(super) fn render_silkscreen_circle(&mut self, circle: &SilkscreenCircle) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let Some(shape) = circle.shape() else {
            return output;
        };

        let width = stroke_width_or(circle.stroke_width, SILKSCREEN_STROKE_MM);
        let stroke = self.stroke(self.palette.silkscreen_for(&circle.layer), width);
        let path = self.outline_path(&shape, &stroke).set("class", "pcb-silkscreen");
        output.add_to_layer(
            silkscreen_layer(&circle.layer),
            Box::new(tag(
                path,
                "pcb_silkscreen_circle",
                Some(circle.layer.to_string().as_str()),
            )),
        );
        output
    }

    pub(super) fn render_silkscreen_path(&mut self, path: &SilkscreenPath) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let Some(points) = path.points() else {
            return output;
        };

        let width = stroke_width_or(path.stroke_width, SILKSCREEN_STROKE_MM);
        let stroke = self.rounded_stroke(self.palette.silkscreen_for(&path.layer), width);
        let node = self
            .stroke_path(&points, &stroke)
            .set("class", "pcb-silkscreen");
        output.add_to_layer(
            silkscreen_layer(&path.layer),
            Box::new(tag(
                node,
                "pcb_silkscreen_path",
                Some(path.layer.to_string().as_str()),
            )),
        );
        output
    }

    /// Plain or knockout silkscreen text.
    ///
    /// Knockout text registers its mask in `<defs>` under a document-unique
    /// `knockout-mask-N` id.
    pub(super) fn render_silkscreen_text(&mut self, text: &SilkscreenText) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let Some(anchor) = text.anchor_position.point() else {
            return output;
        };
        if text.text.is_empty() {
            return output;
        }

        let color = self.palette.silkscreen_for(&text.layer).clone();
        let mut definition = self.text_definition(&color, text.font_size_mm());
        definition.set_alignment(text.anchor_alignment);
        definition.set_mirrored(text.is_mirrored());

        let layer = silkscreen_layer(&text.layer);
        let layer_name = text.layer.to_string();
        let screen_anchor = self.transform.apply(anchor);
        let screen_rotation = self.transform.map_angle(text.rotation());

        if !text.is_knockout() {
            let node = Text::new(&definition, &text.text).render(screen_anchor, screen_rotation);
            output.add_to_layer(
                layer,
                Box::new(tag(
                    node.set("class", "pcb-silkscreen-text"),
                    "pcb_silkscreen_text",
                    Some(layer_name.as_str()),
                )),
            );
            return output;
        }

        let scale = self.transform.scale();
        let mut knockout = Knockout::new();
        knockout.set_padding(text.knockout_insets().scale(scale));
        knockout.set_corner_radius(text.knockout_corner_radius.or_zero() * scale);
        knockout.set_border_width(text.knockout_border_width.or_zero() * scale);

        let mask_id = self.next_id("knockout-mask");
        let parts = knockout.render(
            &Text::new(&definition, &text.text),
            screen_anchor,
            screen_rotation,
            &mask_id,
        );
        self.add_def(parts.mask);
        output.add_to_layer(
            layer,
            Box::new(tag(
                parts.node.set("class", "pcb-silkscreen-text-knockout"),
                "pcb_silkscreen_text",
                Some(layer_name.as_str()),
            )),
        );
        output
    }

    pub(super) fn render_fabrication_path(&mut self, path: &FabricationPath) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let Some(points) = path.points() else {
            return output;
        };

        let color = self
            .palette
            .element_color(path.color.as_deref(), self.palette.fabrication());
        let width = stroke_width_or(path.stroke_width, FABRICATION_STROKE_MM);
        let node = self
            .stroke_path(&points, &self.rounded_stroke(&color, width))
            .set("class", "pcb-fabrication-note-path");
        output.add_to_layer(
            RenderLayer::Fabrication,
            Box::new(tag(node, "pcb_fabrication_note_path", None)),
        );
        output
    }

    pub(super) fn render_fabrication_rect(&mut self, rect: &FabricationRect) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let Some(shape) = rect.shape() else {
            return output;
        };

        let color = self
            .palette
            .element_color(rect.color.as_deref(), self.palette.fabrication());
        let width = stroke_width_or(rect.stroke_width, FABRICATION_STROKE_MM);
        let stroke = self.stroke(&color, width);
        let node = if rect.is_filled.unwrap_or(false) {
            apply_stroke!(self.fill_path(&shape, &color), &stroke)
        } else {
            self.outline_path(&shape, &stroke)
        };
        output.add_to_layer(
            RenderLayer::Fabrication,
            Box::new(tag(
                node.set("class", "pcb-fabrication-note-rect"),
                "pcb_fabrication_note_rect",
                None,
            )),
        );
        output
    }

    pub(super) fn render_fabrication_text(&mut self, text: &FabricationText) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let Some(anchor) = text.anchor_position.point() else {
            return output;
        };
        if text.text.is_empty() {
            return output;
        }

        let color = self
            .palette
            .element_color(text.color.as_deref(), self.palette.fabrication());
        let mut definition = self.text_definition(&color, text.font_size_mm());
        definition.set_alignment(text.anchor_alignment);
        let node = self.board_text(
            &definition,
            &text.text,
            anchor,
            degrees_or_zero(text.rotation),
        );
        output.add_to_layer(
            RenderLayer::Fabrication,
            Box::new(tag(
                node.set("class", "pcb-fabrication-note-text"),
                "pcb_fabrication_note_text",
                None,
            )),
        );
        output
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use pcbsvg_core::element::{Element, ElementIndex};

    use super::*;
    use crate::{bounds::Viewport, config::RenderOptions};

    fn render_with(value: serde_json::Value, options: &RenderOptions) -> String {
        let elements: Vec<Element> = serde_json::from_value(value).unwrap();
        let index = ElementIndex::new(&elements);
        let viewport = Viewport::compute(&elements, &index, options);
        let mut svg = Svg::new(options, &index, viewport);
        let output = svg.render_elements(&elements);
        svg.into_document(output).to_string()
    }

    #[test]
    fn test_courtyards_hidden_by_default() {
        let courtyard = json!([
            {"type": "pcb_courtyard_rect", "center": {"x": 0, "y": 0}, "width": 2, "height": 2, "layer": "top"}
        ]);
        let hidden = render_with(courtyard.clone(), &RenderOptions::default());
        assert!(!hidden.contains("pcb_courtyard_rect"));

        let shown = render_with(courtyard, &RenderOptions::default().with_courtyards(true));
        assert!(shown.contains(r#"data-type="pcb_courtyard_rect""#));
        assert!(shown.contains(r#"data-layer="courtyard""#));
    }

    #[test]
    fn test_silkscreen_side_layers() {
        let document = render_with(
            json!([
                {"type": "pcb_silkscreen_line", "x1": 0, "y1": 0, "x2": 1, "y2": 1, "layer": "bottom"},
                {"type": "pcb_silkscreen_path", "route": [{"x": 0, "y": 0}, {"x": 2, "y": 0}], "layer": "top"}
            ]),
            &RenderOptions::default(),
        );
        let bottom = document.find(r#"data-layer="silkscreen-bottom""#).unwrap();
        let top = document.find(r#"data-layer="silkscreen-top""#).unwrap();
        assert!(bottom < top);
        assert!(document.contains("#5da9e9"));
    }

    #[test]
    fn test_knockout_text_masks_are_unique() {
        let document = render_with(
            json!([
                {"type": "pcb_silkscreen_text", "text": "U1", "anchor_position": {"x": 0, "y": 0},
                 "layer": "top", "is_knockout": true},
                {"type": "pcb_silkscreen_text", "text": "U2", "anchor_position": {"x": 3, "y": 0},
                 "layer": "top", "is_knockout": true, "knockout_corner_radius": 0.2}
            ]),
            &RenderOptions::default(),
        );
        assert!(document.contains(r#"id="knockout-mask-0""#));
        assert!(document.contains(r#"id="knockout-mask-1""#));
        assert!(document.contains("url(#knockout-mask-1)"));
        assert!(document.contains("<defs>"));
    }

    #[test]
    fn test_bottom_text_mirrored() {
        let document = render_with(
            json!([
                {"type": "pcb_silkscreen_text", "text": "R1", "anchor_position": {"x": 0, "y": 0}, "layer": "bottom"}
            ]),
            &RenderOptions::default(),
        );
        assert!(document.contains("matrix(-1,0,0,1,"));
        assert!(RenderLayer::Silkscreen(Side::Bottom) < RenderLayer::Silkscreen(Side::Top));
    }

    #[test]
    fn test_fabrication_element_color() {
        let document = render_with(
            json!([
                {"type": "pcb_fabrication_note_text", "text": "NOTE", "anchor_position": {"x": 0, "y": 0}, "color": "orange"},
                {"type": "pcb_fabrication_note_path", "route": [{"x": 0, "y": 0}, {"x": 1, "y": 0}]}
            ]),
            &RenderOptions::default(),
        );
        assert!(document.contains(r#"fill="orange""#));
        assert!(document.contains(r#"stroke="rgba(255, 255, 255, 0.5)""#));
    }
}
