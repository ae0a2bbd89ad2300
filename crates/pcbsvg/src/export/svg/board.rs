//! Board and panel outlines.

use log::warn;

use pcbsvg_core::{
    apply_stroke,
    draw::{LayeredOutput, RenderLayer, Shape},
    element::{Board, Panel},
    geometry::Bounds,
};

use super::{Svg, tag};
use crate::style::BOARD_OUTLINE_STROKE_MM;

fn rect_shape(rect: Bounds) -> Option<Shape> {
    Shape::rect(rect.center(), rect.to_size(), 0.0, 0.0)
}

impl Svg<'_> {
    /// Board outline, filled with the board's pattern when it has one.
    pub(super) fn render_board(&mut self, board: &Board) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        let shape = match board.outline_points() {
            Some(points) => Shape::polygon(points),
            None => board.rect().and_then(rect_shape),
        };
        let Some(shape) = shape else {
            warn!(
                pcb_board_id = board.pcb_board_id.as_deref().unwrap_or("");
                "Skipping board without outline or size"
            );
            return output;
        };

        let fill = board
            .fill_pattern
            .as_ref()
            .and_then(|pattern| self.pattern_fill(pattern))
            .unwrap_or_else(|| "none".to_string());
        let stroke = self.stroke(self.palette.board_outline(), BOARD_OUTLINE_STROKE_MM);

        let path = apply_stroke!(self.fill_path(&shape, fill), &stroke).set("class", "pcb-board");
        output.add_to_layer(
            RenderLayer::Board,
            Box::new(tag(path, "pcb_board", None)),
        );
        output
    }

    pub(super) fn render_panel(&mut self, panel: &Panel) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let Some(shape) = panel.rect().and_then(rect_shape) else {
            return output;
        };

        let stroke = self.stroke(self.palette.board_outline(), BOARD_OUTLINE_STROKE_MM);
        let path = self.outline_path(&shape, &stroke).set("class", "pcb-panel");
        output.add_to_layer(
            RenderLayer::Panel,
            Box::new(tag(path, "pcb_panel", None)),
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

    fn render_one(value: serde_json::Value) -> LayeredOutput {
        let elements: Vec<Element> = serde_json::from_value(json!([value])).unwrap();
        let options = RenderOptions::default();
        let index = ElementIndex::new(&elements);
        let viewport = Viewport::compute(&elements, &index, &options);
        let mut svg = Svg::new(&options, &index, viewport);
        match &elements[0] {
            Element::Board(board) => svg.render_board(board),
            Element::Panel(panel) => svg.render_panel(panel),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_board_rect() {
        let output = render_one(json!({
            "type": "pcb_board", "center": {"x": 0, "y": 0}, "width": 10, "height": 10
        }));
        assert_eq!(output.count(RenderLayer::Board), 1);
    }

    #[test]
    fn test_board_outline_preferred() {
        let output = render_one(json!({
            "type": "pcb_board", "center": {"x": 0, "y": 0},
            "outline": [{"x": 0, "y": 0}, {"x": 4, "y": 0}, {"x": 0, "y": 3}]
        }));
        let rendered = format!("{}", output.render()[0]);
        assert!(rendered.contains(r#"data-type="pcb_board""#));
        assert_eq!(rendered.matches(" L ").count(), 2);
    }

    #[test]
    fn test_board_without_geometry_renders_nothing() {
        let output = render_one(json!({"type": "pcb_board", "center": {"x": 0, "y": 0}}));
        assert!(output.is_empty());
    }

    #[test]
    fn test_panel() {
        let output = render_one(json!({
            "type": "pcb_panel", "center": {"x": 0, "y": 0}, "width": 50, "height": 40
        }));
        assert_eq!(output.count(RenderLayer::Panel), 1);
    }
}
