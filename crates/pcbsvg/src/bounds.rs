//! Drawing bounds and the board-to-screen viewport.
//!
//! The bounds pass folds the real-world extent of every drawable record,
//! computed from the same shape helpers the generators draw with, into one
//! rectangle. [`Viewport::compute`] then fits that rectangle into the canvas
//! with a uniform, Y-flipping [`Transform`].

use log::{debug, trace, warn};

use pcbsvg_core::{
    draw::{AnchorAlignment, TextClass, polyline_extent, text_extent},
    element::{
        Board, Cutout, CutoutGeometry, DebugObject, Dimension, Element, ElementIndex,
        FabricationText, NetLabel, SilkscreenText, Trace,
    },
    geometry::{Bounds, BoundsAccumulator, GeometryError, Insets, Point, Size, Transform},
    units::degrees_or_zero,
};

use crate::{
    config::{DEFAULT_HEIGHT, DEFAULT_WIDTH, RenderOptions, ViewportTarget},
    style::{
        COURTYARD_STROKE_MM, FABRICATION_STROKE_MM, SILKSCREEN_STROKE_MM, stroke_width_or,
    },
};

/// Margin added around the folded extents, in millimeters.
pub const PADDING_MM: f64 = 1.0;

fn default_bounds() -> Bounds {
    Bounds::new(-10.0, -10.0, 10.0, 10.0)
}

/// The drawing rectangle, canvas size and transform of one conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    bounds: Bounds,
    canvas: Size,
    transform: Transform,
}

impl Viewport {
    /// Computes the viewport for `elements` under `options`.
    ///
    /// The result is always finite: degenerate input falls back to the
    /// default `[-10, -10]–[10, 10]` rectangle.
    pub fn compute(elements: &[Element], index: &ElementIndex, options: &RenderOptions) -> Self {
        let bounds = drawing_bounds(elements, index, options);
        let board = aspect_board(index, options).and_then(Board::extent);
        let canvas = canvas_size(options, board);

        let (bounds, transform) = match fit(bounds, canvas) {
            Ok(transform) => (bounds, transform),
            Err(err) => {
                warn!(err:% = err; "Falling back to default viewport");
                let fallback = default_bounds();
                (fallback, fit(fallback, canvas).unwrap_or_default())
            }
        };

        debug!(
            bounds:? = bounds,
            canvas:? = canvas,
            transform:% = transform;
            "Viewport computed"
        );

        Self {
            bounds,
            canvas,
            transform,
        }
    }

    /// Board-space rectangle mapped onto the canvas.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Canvas size in pixels.
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }
}

fn usable(bounds: Bounds) -> bool {
    bounds.is_finite()
        && bounds.has_area()
        && bounds.width().is_finite()
        && bounds.height().is_finite()
}

fn drawing_bounds(elements: &[Element], index: &ElementIndex, options: &RenderOptions) -> Bounds {
    if let Some(rect) = options.viewport() {
        let bounds = Bounds::new(rect.min_x, rect.min_y, rect.max_x, rect.max_y);
        if usable(bounds) {
            return bounds;
        }
        warn!(viewport:? = rect; "Ignoring degenerate explicit viewport");
    }

    if let Some(target) = options.viewport_target() {
        match target_rect(index, target) {
            Some(bounds) if usable(bounds) => return bounds,
            _ => warn!(target:? = target; "Viewport target not found"),
        }
    }

    let outline_only = !options.draw_padding_outside_board()
        && elements.iter().any(is_outline);

    let mut accumulator = BoundsAccumulator::new();
    for element in elements {
        if outline_only && !is_outline(element) {
            continue;
        }
        if let Some(extent) = element_extent(element, options) {
            trace!(element_type = element.type_name(), extent:? = extent; "Folded extent");
            accumulator.include_bounds(extent);
        }
    }

    let Some(bounds) = accumulator.finish() else {
        return default_bounds();
    };
    let bounds = if outline_only {
        bounds
    } else {
        bounds.add_padding(Insets::uniform(PADDING_MM))
    };

    if usable(bounds) {
        bounds
    } else {
        default_bounds()
    }
}

fn is_outline(element: &Element) -> bool {
    matches!(element, Element::Board(_) | Element::Panel(_))
}

fn target_rect(index: &ElementIndex, target: &ViewportTarget) -> Option<Bounds> {
    if let Some(panel_id) = target.pcb_panel_id.as_deref() {
        return index.panel(panel_id)?.rect();
    }
    index.board(target.pcb_board_id.as_deref()?)?.extent()
}

/// The board whose aspect ratio the canvas matches: the viewport target
/// board, else the first board.
fn aspect_board<'a>(index: &ElementIndex<'a>, options: &RenderOptions) -> Option<&'a Board> {
    if !options.match_board_aspect_ratio() {
        return None;
    }
    options
        .viewport_target()
        .and_then(|target| target.pcb_board_id.as_deref())
        .and_then(|id| index.board(id))
        .or_else(|| index.boards().next())
}

fn canvas_size(options: &RenderOptions, board: Option<Bounds>) -> Size {
    let sanitize = |value: f64, default: f64| {
        if value.is_finite() && value > 0.0 {
            value
        } else {
            default
        }
    };
    let width = sanitize(options.width(), DEFAULT_WIDTH);
    let height = sanitize(options.height(), DEFAULT_HEIGHT);

    let Some(board) = board.filter(|board| usable(*board)) else {
        return Size::new(width, height);
    };
    let board_ratio = board.width() / board.height();
    let matched = if width / height > board_ratio {
        Size::new(width, width / board_ratio)
    } else {
        Size::new(height * board_ratio, height)
    };
    if matched.width().is_finite() && matched.height().is_finite() && !matched.is_empty() {
        matched
    } else {
        warn!(board:? = board; "Board aspect ratio out of range, keeping canvas size");
        Size::new(width, height)
    }
}

/// Maps `bounds` onto the canvas with a uniform scale, centering the content.
fn fit(bounds: Bounds, canvas: Size) -> Result<Transform, GeometryError> {
    let scale = (canvas.width() / bounds.width()).min(canvas.height() / bounds.height());
    let content = bounds.to_size().scale(scale);
    let offset_x = (canvas.width() - content.width()) / 2.0;
    let offset_y = (canvas.height() - content.height()) / 2.0;

    Transform::from_point_pairs(
        Point::new(bounds.min_x(), bounds.max_y()),
        Point::new(offset_x, offset_y),
        Point::new(bounds.max_x(), bounds.min_y()),
        Point::new(offset_x + content.width(), offset_y + content.height()),
    )
}

/// Board-space extent of one record, or `None` if it draws nothing in the
/// main document.
pub(crate) fn element_extent(element: &Element, options: &RenderOptions) -> Option<Bounds> {
    match element {
        Element::Board(board) => board.extent(),
        Element::Panel(panel) => panel.rect(),
        Element::Group(group) => group.rect().filter(|_| options.show_group_borders()),
        Element::Component(component) => component.extent(),
        Element::SmtPad(pad) => pad.shape().map(|shape| shape.extent()),
        Element::SolderPaste(paste) => paste.shape().map(|shape| shape.extent()),
        Element::PlatedHole(hole) => hole.geometry().map(|geometry| geometry.pad.extent()),
        Element::Via(via) => via.geometry().map(|geometry| geometry.pad.extent()),
        Element::Hole(hole) => hole.shape().map(|shape| shape.extent()),
        Element::Trace(trace) => trace_extent(trace),
        Element::CopperPour(pour) => pour.shape().map(|shape| shape.extent()),
        Element::CourtyardRect(courtyard) if options.show_courtyards() => courtyard
            .shape()
            .map(|shape| grow(shape.extent(), COURTYARD_STROKE_MM)),
        Element::CourtyardCircle(courtyard) if options.show_courtyards() => courtyard
            .shape()
            .map(|shape| grow(shape.extent(), COURTYARD_STROKE_MM)),
        Element::CourtyardPolygon(courtyard) if options.show_courtyards() => courtyard
            .shape()
            .map(|shape| grow(shape.extent(), COURTYARD_STROKE_MM)),
        Element::CourtyardRect(_) | Element::CourtyardCircle(_) | Element::CourtyardPolygon(_) => {
            None
        }
        Element::SilkscreenLine(line) => {
            let (start, end) = line.endpoints()?;
            polyline_extent(
                &[start, end],
                stroke_width_or(line.stroke_width, SILKSCREEN_STROKE_MM),
            )
        }
        Element::SilkscreenRect(rect) => rect.shape().map(|shape| {
            grow(
                shape.extent(),
                stroke_width_or(rect.stroke_width, SILKSCREEN_STROKE_MM),
            )
        }),
        Element::SilkscreenCircle(circle) => circle.shape().map(|shape| {
            grow(
                shape.extent(),
                stroke_width_or(circle.stroke_width, SILKSCREEN_STROKE_MM),
            )
        }),
        Element::SilkscreenPath(path) => polyline_extent(
            &path.points()?,
            stroke_width_or(path.stroke_width, SILKSCREEN_STROKE_MM),
        ),
        Element::SilkscreenText(text) => silkscreen_text_extent(text),
        Element::FabricationPath(path) => polyline_extent(
            &path.points()?,
            stroke_width_or(path.stroke_width, FABRICATION_STROKE_MM),
        ),
        Element::FabricationText(text) => fabrication_text_extent(text),
        Element::FabricationRect(rect) => rect.shape().map(|shape| {
            grow(
                shape.extent(),
                stroke_width_or(rect.stroke_width, FABRICATION_STROKE_MM),
            )
        }),
        Element::Cutout(cutout) => cutout_extent(cutout),
        Element::Dimension(dimension) => dimension_extent(dimension),
        Element::NetLabel(label) => net_label_extent(label),
        Element::DebugObject(object) => debug_object_extent(object),
        Element::Port(port) => port.point().map(point_bounds),
        Element::SourceTrace(_) | Element::Diagnostic(_) | Element::Unknown => None,
    }
}

/// Grows a filled extent by half a stroke on every side.
fn grow(bounds: Bounds, stroke_width: f64) -> Bounds {
    bounds.add_padding(Insets::uniform(stroke_width / 2.0))
}

fn point_bounds(point: Point) -> Bounds {
    Bounds::new(point.x(), point.y(), point.x(), point.y())
}

fn merge_all(extents: impl IntoIterator<Item = Bounds>) -> Option<Bounds> {
    let mut accumulator = BoundsAccumulator::new();
    for extent in extents {
        accumulator.include_bounds(extent);
    }
    accumulator.finish()
}

fn trace_extent(trace: &Trace) -> Option<Bounds> {
    merge_all(
        trace
            .segments()
            .into_iter()
            .filter_map(|segment| polyline_extent(&[segment.start, segment.end], segment.width)),
    )
}

fn cutout_extent(cutout: &Cutout) -> Option<Bounds> {
    match cutout.geometry()? {
        CutoutGeometry::Solid(shape) => Some(shape.extent()),
        CutoutGeometry::Slots(slots) => merge_all(slots.iter().map(|slot| slot.extent())),
        CutoutGeometry::Stroke { points, width } => polyline_extent(&points, width),
    }
}

fn silkscreen_text_extent(text: &SilkscreenText) -> Option<Bounds> {
    let anchor = text.anchor_position.point()?;
    let padding = if text.is_knockout() {
        text.knockout_insets()
    } else {
        Insets::default()
    };
    let extent = text_extent(
        anchor,
        &text.text,
        text.font_size_mm(),
        text.anchor_alignment,
        text.rotation(),
        padding,
    )?;
    if !text.is_mirrored() {
        return Some(extent);
    }
    // Mirroring reflects the block about the anchor's vertical.
    let reflected = Bounds::new(
        2.0 * anchor.x() - extent.max_x(),
        extent.min_y(),
        2.0 * anchor.x() - extent.min_x(),
        extent.max_y(),
    );
    Some(extent.merge(&reflected))
}

fn fabrication_text_extent(text: &FabricationText) -> Option<Bounds> {
    text_extent(
        text.anchor_position.point()?,
        &text.text,
        text.font_size_mm(),
        text.anchor_alignment,
        degrees_or_zero(text.rotation),
        Insets::default(),
    )
}

fn dimension_extent(dimension: &Dimension) -> Option<Bounds> {
    let geometry = dimension.geometry()?;
    let lines = Bounds::from_points(&[
        geometry.from,
        geometry.to,
        geometry.line_from,
        geometry.line_to,
    ])?
    .add_padding(Insets::uniform(geometry.arrow_size / 2.0));
    let label = text_extent(
        geometry.label_anchor,
        &geometry.label,
        geometry.font_size,
        AnchorAlignment::Center,
        geometry.label_rotation,
        Insets::default(),
    );
    Some(match label {
        Some(label) => lines.merge(&label),
        None => lines,
    })
}

fn net_label_extent(label: &NetLabel) -> Option<Bounds> {
    let geometry = label.geometry(TextClass::NetLabel.nominal_size())?;
    Bounds::from_points(&geometry.outline)
}

fn debug_object_extent(object: &DebugObject) -> Option<Bounds> {
    object.rect().or_else(|| {
        let (start, end) = object.line()?;
        Bounds::from_points(&[start, end])
    })
}
