//! Non-plated holes and board cutouts.

use log::trace;

use pcbsvg_core::{
    draw::{LayeredOutput, RenderLayer},
    element::{Cutout, CutoutGeometry, Hole},
};

use super::{Svg, tag};

impl Svg<'_> {
    pub(super) fn render_hole(&mut self, hole: &Hole) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let Some(shape) = hole.shape() else {
            trace!(hole_shape:? = hole.hole_shape; "Skipping hole without geometry");
            return output;
        };

        let path = self
            .fill_path(&shape, self.palette.drill())
            .set("class", "pcb-hole");
        output.add_to_layer(RenderLayer::Drill, Box::new(tag(path, "pcb_hole", None)));
        output
    }

    /// Cutouts draw as filled regions, a row of slots, or, when the route
    /// is too short for one slot, a single stroke of the slot width.
    pub(super) fn render_cutout(&mut self, cutout: &Cutout) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let Some(geometry) = cutout.geometry() else {
            trace!(shape:? = cutout.shape; "Skipping cutout without geometry");
            return output;
        };

        let drill = self.palette.drill();
        match geometry {
            CutoutGeometry::Solid(shape) => {
                let path = self.fill_path(&shape, drill).set("class", "pcb-cutout");
                output.add_to_layer(RenderLayer::Drill, Box::new(tag(path, "pcb_cutout", None)));
            }
            CutoutGeometry::Slots(slots) => {
                for slot in &slots {
                    let path = self.fill_path(slot, drill).set("class", "pcb-cutout-slot");
                    output.add_to_layer(
                        RenderLayer::Drill,
                        Box::new(tag(path, "pcb_cutout", None)),
                    );
                }
            }
            CutoutGeometry::Stroke { points, width } => {
                let stroke = self.rounded_stroke(drill, width);
                let path = self
                    .stroke_path(&points, &stroke)
                    .set("class", "pcb-cutout-slot");
                output.add_to_layer(RenderLayer::Drill, Box::new(tag(path, "pcb_cutout", None)));
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use pcbsvg_core::element::{Element, ElementIndex};

    use super::*;
    use crate::{bounds::Viewport, config::RenderOptions};

    fn render_all(value: serde_json::Value) -> LayeredOutput {
        let elements: Vec<Element> = serde_json::from_value(value).unwrap();
        let options = RenderOptions::default();
        let index = ElementIndex::new(&elements);
        let viewport = Viewport::compute(&elements, &index, &options);
        let mut svg = Svg::new(&options, &index, viewport);
        svg.render_elements(&elements)
    }

    #[test]
    fn test_hole_shapes() {
        let output = render_all(json!([
            {"type": "pcb_hole", "hole_shape": "circle", "x": 0, "y": 0, "hole_diameter": 1},
            {"type": "pcb_hole", "hole_shape": "pill", "x": 3, "y": 0, "hole_width": 2, "hole_height": 1},
            {"type": "pcb_hole", "hole_shape": "hexagon", "x": 6, "y": 0, "hole_diameter": 1}
        ]));
        assert_eq!(output.count(RenderLayer::Drill), 2);
    }

    #[test]
    fn test_cutout_slots() {
        let output = render_all(json!([
            {"type": "pcb_cutout", "shape": "path",
             "route": [{"x": 0, "y": 0}, {"x": 18, "y": 0}],
             "slot_width": 1, "slot_length": 6, "space_between_slots": 0.6}
        ]));
        assert_eq!(output.count(RenderLayer::Drill), 2);
    }

    #[test]
    fn test_short_cutout_route_degrades_to_stroke() {
        let output = render_all(json!([
            {"type": "pcb_cutout", "shape": "path",
             "route": [{"x": 0, "y": 0}, {"x": 2, "y": 0}],
             "slot_width": 0.5, "slot_length": 6}
        ]));
        let rendered: String = output.render().iter().map(|node| node.to_string()).collect();
        assert!(rendered.contains(r#"fill="none""#));
        assert!(rendered.contains(r#"stroke-linecap="round""#));
    }
}
