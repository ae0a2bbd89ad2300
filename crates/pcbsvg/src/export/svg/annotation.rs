//! Dimension notes, net labels, component text and diagnostics.

use log::{debug, trace};
use svg::node::element as svg_element;

use pcbsvg_core::{
    apply_stroke,
    draw::{
        AnchorAlignment, LINE_HEIGHT_RATIO, LayeredOutput, RenderLayer, Shape, StrokeDefinition,
        Text, TextClass, TextDefinition, fmt_num,
    },
    element::{Component, Diagnostic, Dimension, DimensionGeometry, Element, NetLabel, Port},
    geometry::Point,
};

use super::{Svg, tag};
use crate::style::ANNOTATION_STROKE_MM;

/// Smallest diagnostic font, in pixels.
const MIN_DIAGNOSTIC_FONT_PX: f64 = 8.0;
/// Diagnostic marker radius, in pixels.
const DIAGNOSTIC_MARKER_PX: f64 = 4.0;
/// Screen inset of unpositioned diagnostics from the top-left corner.
const DIAGNOSTIC_INSET_PX: f64 = 10.0;

/// Arrowhead triangle with its tip on `tip`, opening along `direction`.
fn arrowhead(tip: Point, direction: Point, normal: Point, size: f64) -> Option<Shape> {
    let base = tip.add_point(direction.scale(size));
    let half = normal.scale(size / 2.0);
    Shape::polygon(vec![tip, base.add_point(half), base.sub_point(half)])
}

impl Svg<'_> {
    /// Extension lines, the measured line with arrowheads, and its label.
    pub(super) fn render_dimension(&mut self, dimension: &Dimension) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let Some(geometry) = dimension.geometry() else {
            trace!("Skipping dimension with coincident or missing end points");
            return output;
        };
        let DimensionGeometry {
            from,
            to,
            line_from,
            line_to,
            normal,
            arrow_size,
            font_size,
            ref label,
            label_anchor,
            label_rotation,
        } = geometry;

        let color = self
            .palette
            .element_color(dimension.color.as_deref(), self.palette.fabrication());
        let stroke = self.stroke(&color, ANNOTATION_STROKE_MM);
        let mut group = svg_element::Group::new().set("class", "pcb-fabrication-note-dimension");

        if from != line_from {
            group = group.add(self.stroke_path(&[from, line_from], &stroke));
            group = group.add(self.stroke_path(&[to, line_to], &stroke));
        }
        group = group.add(self.stroke_path(&[line_from, line_to], &stroke));

        let length = line_from.distance(line_to);
        let direction = line_to.sub_point(line_from).scale(1.0 / length);
        let heads = [
            arrowhead(line_from, direction, normal, arrow_size),
            arrowhead(line_to, direction.scale(-1.0), normal, arrow_size),
        ];
        for head in heads.iter().flatten() {
            group = group.add(self.fill_path(head, &color));
        }

        let definition = self.text_definition(&color, font_size);
        group = group.add(self.board_text(&definition, label, label_anchor, label_rotation));

        output.add_to_layer(
            RenderLayer::Annotation,
            Box::new(tag(group, "pcb_fabrication_note_dimension", None)),
        );
        output
    }

    /// Flag-shaped outline with negation-aware text.
    pub(super) fn render_net_label(&mut self, label: &NetLabel) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        if label.text.is_empty() {
            return output;
        }
        let font_size = TextClass::NetLabel.nominal_size();
        let Some(geometry) = label.geometry(font_size) else {
            return output;
        };
        let Some(outline) = Shape::polygon(geometry.outline) else {
            return output;
        };

        let color = self
            .palette
            .element_color(label.color.as_deref(), self.palette.net_label());
        let stroke = self.stroke(&color, ANNOTATION_STROKE_MM);
        let mut definition = self.text_definition(&color, font_size);
        definition.set_negation_aware(true);

        let group = svg_element::Group::new()
            .set("class", "net-label")
            .add(self.outline_path(&outline, &stroke))
            .add(self.board_text(&definition, &label.text, geometry.text_center, 0.0));
        output.add_to_layer(
            RenderLayer::Annotation,
            Box::new(tag(group, "schematic_net_label", None)),
        );
        output
    }

    /// Reference designator at the component center with the manufacturer
    /// part number on the line below.
    pub(super) fn render_component_annotation(&mut self, component: &Component) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let Some(center) = component.center.point() else {
            return output;
        };
        let color = self.palette.fabrication().clone();

        let refdes_size = TextClass::ReferenceDesignator.nominal_size();
        if let Some(refdes) = component
            .reference_designator
            .as_deref()
            .filter(|s| !s.is_empty())
        {
            let definition = self.text_definition(&color, refdes_size);
            let node = self
                .board_text(&definition, refdes, center, 0.0)
                .set("class", "pcb-component-refdes");
            output.add_to_layer(
                RenderLayer::Fabrication,
                Box::new(tag(node, "pcb_component", None)),
            );
        }

        if let Some(mpn) = component
            .manufacturer_part_number
            .as_deref()
            .filter(|s| !s.is_empty())
        {
            let definition =
                self.text_definition(&color, TextClass::ManufacturerCode.nominal_size());
            let below = Point::new(center.x(), center.y() - refdes_size * LINE_HEIGHT_RATIO);
            let node = self
                .board_text(&definition, mpn, below, 0.0)
                .set("class", "pcb-component-mpn");
            output.add_to_layer(
                RenderLayer::Fabrication,
                Box::new(tag(node, "pcb_component", None)),
            );
        }
        output
    }

    pub(super) fn render_pin_number(&mut self, port: &Port) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let (Some(pin_number), Some(point)) = (&port.pin_number, port.point()) else {
            return output;
        };

        let definition =
            self.text_definition(self.palette.fabrication(), TextClass::PinNumber.nominal_size());
        let node = self
            .board_text(&definition, &pin_number.to_string(), point, 0.0)
            .set("class", "pcb-port-pin-number");
        output.add_to_layer(
            RenderLayer::Fabrication,
            Box::new(tag(node, "pcb_port", None)),
        );
        output
    }

    /// Diagnostics with a message, as a marker and text at their location.
    ///
    /// A diagnostic is placed at its `center`, else at its first resolvable
    /// port; the rest are listed from the top-left corner of the canvas.
    pub(super) fn render_diagnostics(&mut self, elements: &[Element]) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let color = self.palette.diagnostic().clone();
        let font_px = TextClass::Diagnostic
            .screen_size(self.transform.scale())
            .max(MIN_DIAGNOSTIC_FONT_PX);
        let mut definition = TextDefinition::new(color.clone(), font_px);
        definition.set_alignment(AnchorAlignment::CenterLeft);

        let mut unplaced = 0_usize;
        let mut unplaced_lines = 0_usize;
        for element in elements {
            let Element::Diagnostic(diagnostic) = element else {
                continue;
            };
            if diagnostic.message.trim().is_empty() {
                continue;
            }

            let node = match self.diagnostic_location(diagnostic) {
                Some(location) => {
                    let screen = self.transform.apply(location);
                    let marker = svg_element::Circle::new()
                        .set("cx", fmt_num(screen.x()))
                        .set("cy", fmt_num(screen.y()))
                        .set("r", fmt_num(DIAGNOSTIC_MARKER_PX))
                        .set("fill", "none");
                    let outline = StrokeDefinition::solid(color.clone(), 1.0);
                    let marker = apply_stroke!(marker, &outline);
                    let text_anchor =
                        Point::new(screen.x() + DIAGNOSTIC_MARKER_PX * 1.5, screen.y());
                    let text =
                        Text::new(&definition, &diagnostic.message).render(text_anchor, 0.0);
                    svg_element::Group::new().add(marker).add(text)
                }
                None => {
                    let lines = diagnostic.message.split('\n').count();
                    let line_px = font_px * LINE_HEIGHT_RATIO;
                    let y = DIAGNOSTIC_INSET_PX
                        + (unplaced_lines as f64 + lines as f64 / 2.0) * line_px;
                    unplaced += 1;
                    unplaced_lines += lines;
                    svg_element::Group::new().add(
                        Text::new(&definition, &diagnostic.message)
                            .render(Point::new(DIAGNOSTIC_INSET_PX, y), 0.0),
                    )
                }
            };

            output.add_to_layer(
                RenderLayer::Diagnostic,
                Box::new(tag(node.set("class", "pcb-error"), element.type_name(), None)),
            );
        }

        if !output.is_empty() {
            debug!(diagnostics = output.len(), unplaced = unplaced; "Diagnostics rendered");
        }
        output
    }

    fn diagnostic_location(&self, diagnostic: &Diagnostic) -> Option<Point> {
        if let Some(center) = diagnostic.center.as_ref().and_then(|c| c.point()) {
            return Some(center);
        }
        diagnostic
            .pcb_port_ids
            .iter()
            .find_map(|id| self.index.port(id)?.point())
    }
}
