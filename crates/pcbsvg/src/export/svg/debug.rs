//! Debug overlays: debug objects, grid, marked points, group borders,
//! anchor offsets and the rats nest.
//!
//! Overlays are drawn with screen-sized strokes and labels so they stay
//! readable at any zoom.

use log::{trace, warn};
use svg::node::element as svg_element;

use pcbsvg_core::{
    color::Color,
    draw::{AnchorAlignment, LayeredOutput, RenderLayer, Shape, StrokeDefinition, fmt_num},
    element::{DebugObject, DebugShape, Element, Group},
    geometry::{Bounds, BoundsAccumulator, Point},
};

use super::{Svg, tag};
use crate::config::GridOptions;

/// Overlay stroke width, in pixels.
const OVERLAY_STROKE_PX: f64 = 1.0;
/// Debug point marker radius, in pixels.
const DEBUG_POINT_RADIUS_PX: f64 = 3.0;
/// Most grid lines drawn along one axis.
const MAX_GRID_LINES: usize = 1000;
/// Most grid cells that still get labels.
const MAX_LABELED_CELLS: usize = 10_000;
/// Gap between a marker and its label, in pixels.
const LABEL_GAP_PX: f64 = 4.0;

/// Formats an offset with at most two decimals.
fn fmt_offset(value: f64) -> String {
    let text = format!("{:.2}", if value.abs() < 0.005 { 0.0 } else { value });
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Grid line positions covering `min..=max` at multiples of `cell`.
fn grid_positions(min: f64, max: f64, cell: f64) -> Option<Vec<f64>> {
    let first = (min / cell).floor();
    let last = (max / cell).ceil();
    let count = last - first + 1.0;
    if !count.is_finite() || count > MAX_GRID_LINES as f64 {
        return None;
    }
    Some((0..count as usize).map(|i| (first + i as f64) * cell).collect())
}

/// Orders `points` by repeatedly stepping to the nearest unvisited one,
/// starting from the first.
fn nearest_neighbour_order(mut points: Vec<Point>) -> Vec<Point> {
    if points.is_empty() {
        return points;
    }
    let mut ordered = vec![points.remove(0)];
    while !points.is_empty() {
        let last = ordered[ordered.len() - 1];
        let nearest = points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| last.distance(**a).total_cmp(&last.distance(**b)))
            .map(|(position, _)| position)
            .unwrap_or(0);
        ordered.push(points.remove(nearest));
    }
    ordered
}

impl Svg<'_> {
    fn overlay_stroke(&self, color: &Color) -> StrokeDefinition {
        StrokeDefinition::solid(color.clone(), OVERLAY_STROKE_PX)
    }

    fn overlay_dashed(&self, color: &Color) -> StrokeDefinition {
        StrokeDefinition::dashed(color.clone(), OVERLAY_STROKE_PX)
    }

    pub(super) fn render_debug_object(&mut self, object: &DebugObject) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let color = self
            .palette
            .element_color(object.color.as_deref(), self.palette.debug());
        let stroke = self.overlay_stroke(&color);

        let (node, label_at) = match &object.shape {
            DebugShape::Rect => {
                let Some(rect) = object.rect() else {
                    return output;
                };
                let Some(shape) = Shape::rect(rect.center(), rect.to_size(), 0.0, 0.0) else {
                    return output;
                };
                (self.outline_path(&shape, &stroke), rect.center())
            }
            DebugShape::Line => {
                let Some((start, end)) = object.line() else {
                    return output;
                };
                (self.stroke_path(&[start, end], &stroke), start.midpoint(end))
            }
            DebugShape::Unknown(shape) => {
                trace!(shape = shape.as_str(); "Skipping debug object with unknown shape");
                return output;
            }
        };

        let mut group = svg_element::Group::new().add(node);
        if let Some(label) = object.label.as_deref().filter(|label| !label.is_empty()) {
            group = group.add(self.overlay_label(
                &color,
                label,
                self.transform.apply(label_at),
                AnchorAlignment::Center,
            ));
        }
        output.add_to_layer(
            RenderLayer::Debug,
            Box::new(tag(group, "pcb_debug_object", None)),
        );
        output
    }

    /// Grid lines over the drawing bounds, optionally labeled per cell.
    pub(super) fn render_grid(&mut self, grid: GridOptions) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let cell = grid.cell_size;
        if !cell.is_finite() || cell <= 0.0 {
            warn!(cell_size = cell; "Skipping grid with non-positive cell size");
            return output;
        }

        let bounds = self.viewport.bounds();
        let (Some(xs), Some(ys)) = (
            grid_positions(bounds.min_x(), bounds.max_x(), cell),
            grid_positions(bounds.min_y(), bounds.max_y(), cell),
        ) else {
            warn!(cell_size = cell; "Skipping grid with too many lines");
            return output;
        };

        let color = self.palette.debug().clone();
        let stroke = self.overlay_stroke(&color);
        let (first_x, last_x) = (xs[0], xs[xs.len() - 1]);
        let (first_y, last_y) = (ys[0], ys[ys.len() - 1]);

        let mut group = svg_element::Group::new()
            .set("class", "pcb-grid")
            .set("opacity", "0.3");
        for &x in &xs {
            let line = [Point::new(x, first_y), Point::new(x, last_y)];
            group = group.add(self.stroke_path(&line, &stroke));
        }
        for &y in &ys {
            let line = [Point::new(first_x, y), Point::new(last_x, y)];
            group = group.add(self.stroke_path(&line, &stroke));
        }

        let cells = xs.len().saturating_sub(1) * ys.len().saturating_sub(1);
        if grid.label_cells && cells <= MAX_LABELED_CELLS {
            for x in &xs[..xs.len() - 1] {
                for y in &ys[..ys.len() - 1] {
                    let corner = self.transform.apply(Point::new(*x, *y));
                    let anchor = Point::new(corner.x() + 2.0, corner.y() - 2.0);
                    group = group.add(self.overlay_label(
                        &color,
                        &format!("{},{}", fmt_offset(*x), fmt_offset(*y)),
                        anchor,
                        AnchorAlignment::BottomLeft,
                    ));
                }
            }
        }

        output.add_to_layer(RenderLayer::Background, Box::new(tag(group, "pcb_grid", None)));
        output
    }

    pub(super) fn render_debug_points(&mut self) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let color = self.palette.debug().clone();

        for point in self.options.debug_points() {
            let board = Point::new(point.x, point.y);
            if !board.is_finite() {
                continue;
            }
            let screen = self.transform.apply(board);
            let mut group = svg_element::Group::new().add(
                svg_element::Circle::new()
                    .set("cx", fmt_num(screen.x()))
                    .set("cy", fmt_num(screen.y()))
                    .set("r", fmt_num(DEBUG_POINT_RADIUS_PX))
                    .set("fill", &color),
            );
            if let Some(label) = point.label.as_deref().filter(|label| !label.is_empty()) {
                let anchor =
                    Point::new(screen.x() + DEBUG_POINT_RADIUS_PX + LABEL_GAP_PX, screen.y());
                group = group.add(self.overlay_label(
                    &color,
                    label,
                    anchor,
                    AnchorAlignment::CenterLeft,
                ));
            }
            output.add_to_layer(RenderLayer::Debug, Box::new(tag(group, "debug_point", None)));
        }
        output
    }

    /// The explicit group rectangle, else the union of its components.
    fn group_rect(&self, group: &Group) -> Option<Bounds> {
        group.rect().or_else(|| {
            let mut accumulator = BoundsAccumulator::new();
            for component in self.index.components_in_group(&group.pcb_group_id) {
                if let Some(extent) = component.extent() {
                    accumulator.include_bounds(extent);
                }
            }
            accumulator.finish()
        })
    }

    pub(super) fn render_group_borders(&mut self) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let color = self.palette.group_border().clone();
        let stroke = self.overlay_dashed(&color);

        for group in self.index.groups() {
            let Some(rect) = self.group_rect(group) else {
                trace!(pcb_group_id = group.pcb_group_id.as_str(); "Group has no extent");
                continue;
            };
            let Some(shape) = Shape::rect(rect.center(), rect.to_size(), 0.0, 0.0) else {
                continue;
            };

            let mut node = svg_element::Group::new()
                .set("class", "pcb-group-border")
                .add(self.outline_path(&shape, &stroke));
            if let Some(name) = group.name.as_deref().filter(|name| !name.is_empty()) {
                let corner = self.transform.apply(Point::new(rect.min_x(), rect.max_y()));
                node = node.add(self.overlay_label(
                    &color,
                    name,
                    Point::new(corner.x(), corner.y() - LABEL_GAP_PX),
                    AnchorAlignment::BottomLeft,
                ));
            }
            output.add_to_layer(RenderLayer::GroupBorder, Box::new(tag(node, "pcb_group", None)));
        }
        output
    }

    /// Lines from each group anchor to its components and to its board's
    /// center, labeled with the offset.
    pub(super) fn render_anchor_offsets(&mut self) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let color = self.palette.anchor_offset().clone();

        for group in self.index.groups() {
            let Some(anchor) = group.anchor() else {
                continue;
            };

            let mut targets: Vec<Point> = self
                .index
                .components_in_group(&group.pcb_group_id)
                .into_iter()
                .filter_map(|component| component.center.point())
                .collect();
            if let Some(board_center) = self
                .index
                .board_of_group(&group.pcb_group_id)
                .and_then(|board| board.extent())
                .map(Bounds::center)
            {
                targets.push(board_center);
            }

            for target in targets {
                output.add_to_layer(
                    RenderLayer::AnchorOffset,
                    Box::new(tag(self.offset_marker(anchor, target, &color), "pcb_group", None)),
                );
            }
        }
        output
    }

    fn offset_marker(
        &self,
        from: Point,
        to: Point,
        color: &Color,
    ) -> svg_element::Group {
        let delta = to.sub_point(from);
        let label = format!("Δx {}, Δy {}", fmt_offset(delta.x()), fmt_offset(delta.y()));
        let screen_mid = self.transform.apply(from.midpoint(to));
        svg_element::Group::new()
            .set("class", "anchor-offset")
            .add(self.stroke_path(&[from, to], &self.overlay_stroke(color)))
            .add(self.overlay_label(
                color,
                &label,
                Point::new(screen_mid.x() + LABEL_GAP_PX, screen_mid.y()),
                AnchorAlignment::CenterLeft,
            ))
    }

    /// Dashed nearest-neighbour lines between the ports of every unrouted
    /// source trace.
    pub(super) fn render_rats_nest(&mut self, elements: &[Element]) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let stroke = self.overlay_dashed(self.palette.rats_nest());

        for element in elements {
            let Element::SourceTrace(source_trace) = element else {
                continue;
            };
            if self.index.is_routed(source_trace) {
                continue;
            }
            let points: Vec<Point> = source_trace
                .connected_source_port_ids
                .iter()
                .filter_map(|id| self.index.port_for_source(id)?.point())
                .collect();
            if points.len() < 2 {
                continue;
            }

            let ordered = nearest_neighbour_order(points);
            let path = self.stroke_path(&ordered, &stroke).set("class", "rats-nest");
            output.add_to_layer(RenderLayer::RatsNest, Box::new(tag(path, "source_trace", None)));
        }
        output
    }
}
