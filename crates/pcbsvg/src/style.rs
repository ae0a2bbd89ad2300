//! Color and style resolution.
//!
//! [`Palette`] holds one [`Color`] per drawing category. Defaults mirror
//! the usual board-viewer look; [`Palette::from_options`] layers the
//! caller's overrides on top, rejecting any that is not a CSS color.

use log::warn;

use pcbsvg_core::{
    color::Color,
    draw::CopperLayer,
    element::{LayerRef, Side},
    units::{Length, OptionLengthExt},
};

use crate::config::RenderOptions;

/// Silkscreen stroke width when a record omits `stroke_width`.
pub const SILKSCREEN_STROKE_MM: f64 = 0.1;
/// Fabrication note stroke width when a record omits `stroke_width`.
pub const FABRICATION_STROKE_MM: f64 = 0.1;
/// Courtyard outline width.
pub const COURTYARD_STROKE_MM: f64 = 0.05;
/// Dimension lines and other thin annotation strokes.
pub const ANNOTATION_STROKE_MM: f64 = 0.05;
/// Board and panel outline width.
pub const BOARD_OUTLINE_STROKE_MM: f64 = 0.1;
/// Pattern tile edge when a fill pattern omits `tile_size`.
pub const DEFAULT_PATTERN_TILE_MM: f64 = 1.0;

const INNER_COPPER: [&str; 6] = [
    "rgb(255, 140, 0)",
    "rgb(255, 215, 0)",
    "rgb(50, 205, 50)",
    "rgb(0, 191, 255)",
    "rgb(138, 43, 226)",
    "rgb(255, 20, 147)",
];

/// Resolved colors for one conversion.
#[derive(Debug, Clone)]
pub struct Palette {
    background: Color,
    copper_top: Color,
    copper_bottom: Color,
    copper_inner: Vec<Color>,
    solder_mask: Color,
    solder_paste: Color,
    silkscreen_top: Color,
    silkscreen_bottom: Color,
    fabrication: Color,
    drill: Color,
    board_outline: Color,
    courtyard: Color,
    debug: Color,
    group_border: Color,
    anchor_offset: Color,
    rats_nest: Color,
    net_label: Color,
    diagnostic: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::builtin("#000"),
            copper_top: Color::builtin("rgb(200, 52, 52)"),
            copper_bottom: Color::builtin("rgb(77, 127, 196)"),
            copper_inner: INNER_COPPER.iter().map(|css| Color::builtin(css)).collect(),
            solder_mask: Color::builtin("rgba(12, 55, 33, 0.8)"),
            solder_paste: Color::builtin("rgb(160, 160, 160)"),
            silkscreen_top: Color::builtin("#f2eda1"),
            silkscreen_bottom: Color::builtin("#5da9e9"),
            fabrication: Color::builtin("rgba(255, 255, 255, 0.5)"),
            drill: Color::builtin("#FF26E2"),
            board_outline: Color::builtin("rgba(255, 255, 255, 0.5)"),
            courtyard: Color::builtin("#FF00FF"),
            debug: Color::builtin("#00ffff"),
            group_border: Color::builtin("#999999"),
            anchor_offset: Color::builtin("#ffffff"),
            rats_nest: Color::builtin("#f2eda1"),
            net_label: Color::builtin("#ffffff"),
            diagnostic: Color::builtin("#ff4d4d"),
        }
    }
}

impl Palette {
    /// The default palette with the overrides of `options` applied.
    ///
    /// `background_color` wins over `colors.background`.
    pub fn from_options(options: &RenderOptions) -> Self {
        let mut palette = Self::default();
        let colors = options.colors();

        let overrides = [
            ("background", &colors.background, &mut palette.background),
            ("copper_top", &colors.copper_top, &mut palette.copper_top),
            ("copper_bottom", &colors.copper_bottom, &mut palette.copper_bottom),
            ("solder_mask", &colors.solder_mask, &mut palette.solder_mask),
            ("solder_paste", &colors.solder_paste, &mut palette.solder_paste),
            ("silkscreen_top", &colors.silkscreen_top, &mut palette.silkscreen_top),
            (
                "silkscreen_bottom",
                &colors.silkscreen_bottom,
                &mut palette.silkscreen_bottom,
            ),
            ("fabrication", &colors.fabrication, &mut palette.fabrication),
            ("drill", &colors.drill, &mut palette.drill),
            ("board_outline", &colors.board_outline, &mut palette.board_outline),
            ("courtyard", &colors.courtyard, &mut palette.courtyard),
            ("debug", &colors.debug, &mut palette.debug),
            ("group_border", &colors.group_border, &mut palette.group_border),
            ("anchor_offset", &colors.anchor_offset, &mut palette.anchor_offset),
            ("rats_nest", &colors.rats_nest, &mut palette.rats_nest),
            ("net_label", &colors.net_label, &mut palette.net_label),
            ("diagnostic", &colors.diagnostic, &mut palette.diagnostic),
        ];
        for (category, value, slot) in overrides {
            if let Some(color) = value.as_deref().and_then(|css| parse_override(category, css)) {
                *slot = color;
            }
        }

        for (position, css) in colors.copper_inner.iter().enumerate() {
            let Some(color) = parse_override("copper_inner", css) else {
                continue;
            };
            match palette.copper_inner.get_mut(position) {
                Some(slot) => *slot = color,
                None => palette.copper_inner.push(color),
            }
        }

        match options.background_color() {
            Ok(Some(color)) => palette.background = color,
            Ok(None) => {}
            Err(err) => warn!(err:% = err; "Keeping default background color"),
        }

        palette
    }

    pub fn background(&self) -> &Color {
        &self.background
    }

    /// Copper color of a layer; inner layers cycle through the inner palette.
    pub fn copper(&self, layer: CopperLayer) -> &Color {
        match layer {
            CopperLayer::Top => &self.copper_top,
            CopperLayer::Bottom => &self.copper_bottom,
            CopperLayer::Inner(index) => {
                if self.copper_inner.is_empty() {
                    return &self.copper_top;
                }
                let position = usize::from(index.max(1) - 1) % self.copper_inner.len();
                &self.copper_inner[position]
            }
        }
    }

    pub fn solder_mask(&self) -> &Color {
        &self.solder_mask
    }

    pub fn solder_paste(&self) -> &Color {
        &self.solder_paste
    }

    pub fn silkscreen(&self, side: Side) -> &Color {
        match side {
            Side::Top => &self.silkscreen_top,
            Side::Bottom => &self.silkscreen_bottom,
        }
    }

    /// Silkscreen color for a layer reference; anything but `bottom` draws
    /// as top.
    pub fn silkscreen_for(&self, layer: &LayerRef) -> &Color {
        self.silkscreen(layer.side().unwrap_or(Side::Top))
    }

    pub fn fabrication(&self) -> &Color {
        &self.fabrication
    }

    pub fn drill(&self) -> &Color {
        &self.drill
    }

    pub fn board_outline(&self) -> &Color {
        &self.board_outline
    }

    pub fn courtyard(&self) -> &Color {
        &self.courtyard
    }

    pub fn debug(&self) -> &Color {
        &self.debug
    }

    pub fn group_border(&self) -> &Color {
        &self.group_border
    }

    pub fn anchor_offset(&self) -> &Color {
        &self.anchor_offset
    }

    pub fn rats_nest(&self) -> &Color {
        &self.rats_nest
    }

    pub fn net_label(&self) -> &Color {
        &self.net_label
    }

    pub fn diagnostic(&self) -> &Color {
        &self.diagnostic
    }

    /// An element's own `color` attribute, or `fallback` when it is absent
    /// or not a CSS color.
    pub fn element_color(&self, color: Option<&str>, fallback: &Color) -> Color {
        color
            .and_then(|css| parse_override("element", css))
            .unwrap_or_else(|| fallback.clone())
    }
}

/// A record's stroke width, or `default` when absent or not positive.
pub fn stroke_width_or(width: Option<Length>, default: f64) -> f64 {
    width.positive().unwrap_or(default)
}

fn parse_override(category: &str, css: &str) -> Option<Color> {
    match Color::new(css) {
        Ok(color) => Some(color),
        Err(err) => {
            warn!(category = category, err:% = err; "Ignoring invalid color override");
            None
        }
    }
}
