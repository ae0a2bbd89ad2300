//! Render options for pcbsvg documents.
//!
//! [`RenderOptions`] controls the canvas, the palette and which overlays are
//! drawn. Every field has a default, so options can be deserialized from a
//! partial TOML or JSON document; the keys of the circuit tooling's
//! camelCase option bag are accepted as aliases.
//!
//! # Example
//!
//! ```
//! # use pcbsvg::config::RenderOptions;
//! let options: RenderOptions = serde_json::from_str(
//!     r##"{ "backgroundColor": "#fff", "showSolderMask": true }"##,
//! )
//! .unwrap();
//! assert!(options.show_solder_mask());
//! assert_eq!(options.width(), 800.0);
//! ```

use serde::Deserialize;

use pcbsvg_core::color::Color;

use crate::PcbSvgError;

/// Default canvas width in pixels.
pub const DEFAULT_WIDTH: f64 = 800.0;
/// Default canvas height in pixels.
pub const DEFAULT_HEIGHT: f64 = 600.0;

/// Options for one conversion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    width: f64,
    height: f64,
    #[serde(alias = "backgroundColor")]
    background_color: Option<String>,
    colors: ColorOverrides,
    #[serde(alias = "showSolderMask")]
    show_solder_mask: bool,
    #[serde(alias = "showCourtyards")]
    show_courtyards: bool,
    #[serde(alias = "showGroupBorders", alias = "showPcbGroups")]
    show_group_borders: bool,
    #[serde(alias = "showAnchorOffsets")]
    show_anchor_offsets: bool,
    #[serde(alias = "showRatsNest")]
    show_rats_nest: bool,
    #[serde(alias = "showErrors", alias = "shouldDrawErrors")]
    show_errors: bool,
    #[serde(alias = "drawPaddingOutsideBoard")]
    draw_padding_outside_board: bool,
    #[serde(alias = "matchBoardAspectRatio")]
    match_board_aspect_ratio: bool,
    viewport: Option<ViewportRect>,
    #[serde(alias = "viewportTarget")]
    viewport_target: Option<ViewportTarget>,
    grid: Option<GridOptions>,
    #[serde(alias = "debugPoints")]
    debug_points: Vec<DebugPoint>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background_color: None,
            colors: ColorOverrides::default(),
            show_solder_mask: false,
            show_courtyards: false,
            show_group_borders: false,
            show_anchor_offsets: false,
            show_rats_nest: false,
            show_errors: true,
            draw_padding_outside_board: true,
            match_board_aspect_ratio: false,
            viewport: None,
            viewport_target: None,
            grid: None,
            debug_points: Vec::new(),
        }
    }
}

impl RenderOptions {
    /// Requested canvas width in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Requested canvas height in pixels.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns [`PcbSvgError::Config`] if the configured color string cannot
    /// be parsed into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, PcbSvgError> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(|err| PcbSvgError::Config(format!("Invalid background color: {err}")))
    }

    pub fn colors(&self) -> &ColorOverrides {
        &self.colors
    }

    pub fn show_solder_mask(&self) -> bool {
        self.show_solder_mask
    }

    pub fn show_courtyards(&self) -> bool {
        self.show_courtyards
    }

    pub fn show_group_borders(&self) -> bool {
        self.show_group_borders
    }

    pub fn show_anchor_offsets(&self) -> bool {
        self.show_anchor_offsets
    }

    pub fn show_rats_nest(&self) -> bool {
        self.show_rats_nest
    }

    pub fn show_errors(&self) -> bool {
        self.show_errors
    }

    /// When `false` and the document has boards or panels, the drawing is
    /// fitted to them alone, without padding.
    pub fn draw_padding_outside_board(&self) -> bool {
        self.draw_padding_outside_board
    }

    pub fn match_board_aspect_ratio(&self) -> bool {
        self.match_board_aspect_ratio
    }

    /// Explicit board-space drawing rectangle.
    pub fn viewport(&self) -> Option<&ViewportRect> {
        self.viewport.as_ref()
    }

    /// Board or panel to fit the drawing to.
    pub fn viewport_target(&self) -> Option<&ViewportTarget> {
        self.viewport_target.as_ref()
    }

    pub fn grid(&self) -> Option<&GridOptions> {
        self.grid.as_ref()
    }

    pub fn debug_points(&self) -> &[DebugPoint] {
        &self.debug_points
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn with_colors(mut self, colors: ColorOverrides) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_solder_mask(mut self, show: bool) -> Self {
        self.show_solder_mask = show;
        self
    }

    pub fn with_courtyards(mut self, show: bool) -> Self {
        self.show_courtyards = show;
        self
    }

    pub fn with_group_borders(mut self, show: bool) -> Self {
        self.show_group_borders = show;
        self
    }

    pub fn with_anchor_offsets(mut self, show: bool) -> Self {
        self.show_anchor_offsets = show;
        self
    }

    pub fn with_rats_nest(mut self, show: bool) -> Self {
        self.show_rats_nest = show;
        self
    }

    pub fn with_errors(mut self, show: bool) -> Self {
        self.show_errors = show;
        self
    }

    pub fn with_padding_outside_board(mut self, draw: bool) -> Self {
        self.draw_padding_outside_board = draw;
        self
    }

    pub fn with_board_aspect_ratio(mut self, matched: bool) -> Self {
        self.match_board_aspect_ratio = matched;
        self
    }

    pub fn with_viewport(mut self, viewport: ViewportRect) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn with_viewport_target(mut self, target: ViewportTarget) -> Self {
        self.viewport_target = Some(target);
        self
    }

    pub fn with_grid(mut self, grid: GridOptions) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn with_debug_points(mut self, points: Vec<DebugPoint>) -> Self {
        self.debug_points = points;
        self
    }
}

/// Per-category palette overrides, as CSS color strings.
///
/// `copper_inner` overrides inner layers by position: the first entry is
/// `inner1`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColorOverrides {
    pub background: Option<String>,
    pub copper_top: Option<String>,
    pub copper_bottom: Option<String>,
    pub copper_inner: Vec<String>,
    pub solder_mask: Option<String>,
    pub solder_paste: Option<String>,
    pub silkscreen_top: Option<String>,
    pub silkscreen_bottom: Option<String>,
    pub fabrication: Option<String>,
    pub drill: Option<String>,
    pub board_outline: Option<String>,
    pub courtyard: Option<String>,
    pub debug: Option<String>,
    pub group_border: Option<String>,
    pub anchor_offset: Option<String>,
    pub rats_nest: Option<String>,
    pub net_label: Option<String>,
    pub diagnostic: Option<String>,
}

/// A board-space rectangle in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ViewportRect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl ViewportRect {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

/// Names the panel or board whose rectangle becomes the viewport.
///
/// A panel id takes precedence over a board id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewportTarget {
    pub pcb_panel_id: Option<String>,
    pub pcb_board_id: Option<String>,
}

/// Background grid overlay.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GridOptions {
    /// Cell edge in millimeters.
    #[serde(alias = "cellSize")]
    pub cell_size: f64,
    /// Label each cell with its `x,y` origin.
    #[serde(default, alias = "labelCells")]
    pub label_cells: bool,
}

/// A marked board-space point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DebugPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub label: Option<String>,
}
