//! Solder mask coverage.

use log::{debug, trace};
use svg::node::element as svg_element;

use pcbsvg_core::{
    draw::{LayeredOutput, RenderLayer, Shape},
    element::{Board, Element, TraceSegment},
    geometry::Size,
};

use super::{Svg, tag};

/// Stadium covering a stroked trace segment, round caps included.
fn segment_opening(segment: &TraceSegment) -> Option<Shape> {
    let length = segment.start.distance(segment.end);
    let center = segment.start.midpoint(segment.end);
    if length <= f64::EPSILON {
        return Shape::circle(center, segment.width / 2.0);
    }
    let delta = segment.end.sub_point(segment.start);
    let angle = delta.y().atan2(delta.x()).to_degrees();
    Shape::pill(center, Size::new(length + segment.width, segment.width), angle)
}

/// Openings for every feature explicitly left uncovered.
fn mask_openings(elements: &[Element]) -> Vec<Shape> {
    let uncovered = |flag: Option<bool>| flag == Some(false);
    let mut openings = Vec::new();
    for element in elements {
        match element {
            Element::SmtPad(pad) if uncovered(pad.is_covered_with_solder_mask) => {
                openings.extend(pad.shape());
            }
            Element::PlatedHole(hole) if uncovered(hole.is_covered_with_solder_mask) => {
                openings.extend(hole.geometry().map(|geometry| geometry.pad));
            }
            Element::Via(via) if uncovered(via.is_covered_with_solder_mask) => {
                openings.extend(via.geometry().map(|geometry| geometry.pad));
            }
            Element::Trace(trace) if uncovered(trace.is_covered_with_solder_mask) => {
                openings.extend(trace.segments().iter().filter_map(segment_opening));
            }
            Element::CopperPour(pour) if uncovered(pour.is_covered_with_solder_mask) => {
                openings.extend(pour.shape());
            }
            _ => {}
        }
    }
    openings
}

fn board_shape(board: &Board) -> Option<Shape> {
    match board.outline_points() {
        Some(points) => Shape::polygon(points),
        None => board
            .rect()
            .and_then(|rect| Shape::rect(rect.center(), rect.to_size(), 0.0, 0.0)),
    }
}

impl Svg<'_> {
    /// One mask path per board. The openings that touch a board are painted
    /// black into that board's `<mask>`, each as its own path, so
    /// overlapping openings stay open.
    pub(super) fn render_solder_mask(&mut self, elements: &[Element]) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let openings = mask_openings(elements);

        for board in self.index.boards() {
            let Some(shape) = board_shape(board) else {
                continue;
            };
            let extent = shape.extent();
            let board_path = shape.to_path(&self.transform);
            let mask_id = self.next_id("soldermask");

            let mut mask = svg_element::Mask::new()
                .set("id", mask_id.clone())
                .set("maskUnits", "userSpaceOnUse")
                .add(
                    svg_element::Path::new()
                        .set("d", board_path.clone())
                        .set("fill", "white"),
                );
            let mut cut = 0;
            for opening in openings
                .iter()
                .filter(|opening| opening.extent().intersects(extent))
            {
                mask = mask.add(
                    svg_element::Path::new()
                        .set("d", opening.to_path(&self.transform))
                        .set("fill", "black"),
                );
                cut += 1;
            }
            self.add_def(mask);

            let path = svg_element::Path::new()
                .set("d", board_path)
                .set("fill", self.palette.solder_mask())
                .set("mask", format!("url(#{mask_id})"))
                .set("class", "pcb-soldermask");
            output.add_to_layer(
                RenderLayer::SolderMask,
                Box::new(tag(path, "pcb_soldermask", None)),
            );
            trace!(mask_id = mask_id.as_str(), openings = cut; "Board solder mask rendered");
        }

        debug!(boards = output.len(), openings = openings.len(); "Solder mask rendered");
        output
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use serde_json::json;

    use pcbsvg_core::{
        element::{ElementIndex, LayerRef},
        geometry::Point,
    };

    use super::*;
    use crate::{bounds::Viewport, config::RenderOptions};

    fn elements(value: serde_json::Value) -> Vec<Element> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_segment_opening_covers_caps() {
        let layer = LayerRef::Top;
        let segment = TraceSegment {
            start: Point::new(0.0, 0.0),
            end: Point::new(4.0, 0.0),
            width: 1.0,
            layer: &layer,
        };
        let extent = segment_opening(&segment).unwrap().extent();
        assert_approx_eq!(f64, extent.min_x(), -0.5, epsilon = 1e-9);
        assert_approx_eq!(f64, extent.max_x(), 4.5, epsilon = 1e-9);
        assert_approx_eq!(f64, extent.height(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_only_uncovered_features_open() {
        let elements = elements(json!([
            {"type": "pcb_smtpad", "shape": "rect", "x": 0, "y": 0, "width": 1, "height": 1,
             "layer": "top", "is_covered_with_solder_mask": false},
            {"type": "pcb_smtpad", "shape": "rect", "x": 2, "y": 0, "width": 1, "height": 1,
             "layer": "top"},
            {"type": "pcb_via", "x": 3, "y": 3, "outer_diameter": 0.6, "hole_diameter": 0.3,
             "is_covered_with_solder_mask": true},
            {"type": "pcb_trace", "is_covered_with_solder_mask": false, "route": [
                {"route_type": "wire", "x": 0, "y": 0, "width": 0.2, "layer": "top"},
                {"route_type": "wire", "x": 2, "y": 0, "width": 0.2, "layer": "top"},
                {"route_type": "wire", "x": 2, "y": 2, "width": 0.2, "layer": "top"}
            ]}
        ]));
        assert_eq!(mask_openings(&elements).len(), 3);
    }

    fn render(elements: &[Element]) -> String {
        let options = RenderOptions::default().with_solder_mask(true);
        let index = ElementIndex::new(elements);
        let viewport = Viewport::compute(elements, &index, &options);
        let mut svg = Svg::new(&options, &index, viewport);
        let output = svg.render_solder_mask(elements);
        svg.into_document(output).to_string()
    }

    #[test]
    fn test_board_without_id_gets_mask() {
        let elements = elements(json!([
            {"type": "pcb_board", "center": {"x": 0, "y": 0}, "width": 10, "height": 10}
        ]));
        let svg = render(&elements);
        assert!(svg.contains(r#"class="pcb-soldermask""#));
        assert!(svg.contains(r#"mask="url(#soldermask-0)""#));
    }

    #[test]
    fn test_openings_only_cut_their_own_board() {
        let elements = elements(json!([
            {"type": "pcb_board", "pcb_board_id": "a", "center": {"x": 0, "y": 0}, "width": 10, "height": 10},
            {"type": "pcb_board", "pcb_board_id": "b", "center": {"x": 20, "y": 0}, "width": 10, "height": 10},
            {"type": "pcb_smtpad", "shape": "rect", "x": 20, "y": 0, "width": 1, "height": 1,
             "layer": "top", "is_covered_with_solder_mask": false}
        ]));
        let svg = render(&elements);

        let first = svg.find(r#"id="soldermask-0""#).unwrap();
        let second = svg.find(r#"id="soldermask-1""#).unwrap();
        let board_a = &svg[first..second];
        let board_b = &svg[second..];
        assert!(!board_a.contains(r#"fill="black""#));
        let board_b_mask = &board_b[..board_b.find("</mask>").unwrap()];
        assert_eq!(board_b_mask.matches(r#"fill="black""#).count(), 1);
        assert!(!svg.contains("evenodd"));
    }

    #[test]
    fn test_trace_joint_openings_stay_open() {
        let elements = elements(json!([
            {"type": "pcb_board", "center": {"x": 0, "y": 0}, "width": 10, "height": 10},
            {"type": "pcb_trace", "is_covered_with_solder_mask": false, "route": [
                {"route_type": "wire", "x": -3, "y": 0, "width": 0.5, "layer": "top"},
                {"route_type": "wire", "x": 0, "y": 0, "width": 0.5, "layer": "top"},
                {"route_type": "wire", "x": 0, "y": 3, "width": 0.5, "layer": "top"}
            ]}
        ]));
        let svg = render(&elements);

        // Each segment is its own black path; no fill rule can flip the
        // overlapping caps at the joint back to covered.
        assert_eq!(svg.matches(r#"fill="black""#).count(), 2);
        assert!(!svg.contains("fill-rule"));
    }
}
