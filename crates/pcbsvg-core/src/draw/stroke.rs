//! Stroke and line-style definitions.
//!
//! # Overview
//!
//! Exported types:
//! - [`StrokeDefinition`]: color, screen-space width, style, cap and join
//! - [`StrokeStyle`]: line patterns (solid, dashed, dotted, custom)
//! - [`StrokeCap`]: how line endpoints are rendered (butt, round, square)
//! - [`StrokeJoin`]: how line corners are rendered (miter, round, bevel)
//! - [`apply_stroke!`](crate::apply_stroke!): applies stroke attributes to SVG elements
//!
//! Widths are screen-space pixels; callers scale board-space widths through
//! the render transform before building a definition.
//!
//! # Example
//!
//! ```
//! use pcbsvg_core::color::Color;
//! use pcbsvg_core::draw::{StrokeCap, StrokeDefinition};
//! use svg::node::element as svg_element;
//!
//! let mut stroke = StrokeDefinition::solid(Color::builtin("#f2eda1"), 1.5);
//! stroke.set_cap(StrokeCap::Round);
//!
//! let path = svg_element::Path::new().set("d", "M 0 0 L 10 0");
//! let path = pcbsvg_core::apply_stroke!(path, &stroke);
//! assert!(path.to_string().contains(r#"stroke-linecap="round""#));
//! ```

use std::str::FromStr;

use crate::color::Color;

/// Line pattern, mapped to `stroke-dasharray`.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    /// A raw `stroke-dasharray` value.
    Custom(String),
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            // Any other value is treated as a custom dasharray pattern
            _ => Ok(Self::Custom(s.to_string())),
        }
    }
}

impl StrokeStyle {
    /// The `stroke-dasharray` value, or `None` for solid lines.
    pub fn to_svg_value(&self) -> Option<String> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("5,5".to_string()),
            Self::Dotted => Some("2,3".to_string()),
            Self::Custom(pattern) => Some(pattern.clone()),
        }
    }
}

/// Line endpoint shape.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl StrokeCap {
    pub fn to_svg_value(&self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

impl FromStr for StrokeCap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "butt" => Ok(Self::Butt),
            "round" => Ok(Self::Round),
            "square" => Ok(Self::Square),
            _ => Err(format!(
                "invalid stroke cap `{s}`, valid values: butt, round, square"
            )),
        }
    }
}

/// Line corner shape.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl StrokeJoin {
    pub fn to_svg_value(&self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::Round => "round",
            Self::Bevel => "bevel",
        }
    }
}

impl FromStr for StrokeJoin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "miter" => Ok(Self::Miter),
            "round" => Ok(Self::Round),
            "bevel" => Ok(Self::Bevel),
            _ => Err(format!(
                "invalid stroke join `{s}`, valid values: miter, round, bevel"
            )),
        }
    }
}

/// Complete stroke description for one SVG element.
#[derive(Debug, Clone)]
pub struct StrokeDefinition {
    color: Color,
    width: f64,
    style: StrokeStyle,
    cap: StrokeCap,
    join: StrokeJoin,
}

impl StrokeDefinition {
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
            cap: StrokeCap::Butt,
            join: StrokeJoin::Miter,
        }
    }

    pub fn solid(color: Color, width: f64) -> Self {
        Self::new(color, width)
    }

    pub fn dashed(color: Color, width: f64) -> Self {
        let mut stroke = Self::new(color, width);
        stroke.set_style(StrokeStyle::Dashed);
        stroke
    }

    /// Round caps and joins, as used for copper traces and silkscreen lines.
    pub fn rounded(color: Color, width: f64) -> Self {
        let mut stroke = Self::new(color, width);
        stroke.set_cap(StrokeCap::Round);
        stroke.set_join(StrokeJoin::Round);
        stroke
    }

    pub fn color(&self) -> &Color {
        &self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn cap(&self) -> StrokeCap {
        self.cap
    }

    pub fn join(&self) -> StrokeJoin {
        self.join
    }

    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }

    pub fn set_cap(&mut self, cap: StrokeCap) {
        self.cap = cap;
    }

    pub fn set_join(&mut self, join: StrokeJoin) {
        self.join = join;
    }
}

/// Applies every stroke attribute of a [`StrokeDefinition`] to an SVG element.
///
/// Evaluates to the updated element. The width is rounded like every other
/// drawing number.
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_string())
            .set(
                "stroke-width",
                $crate::draw::fmt_num($stroke.width()),
            )
            .set("stroke-linecap", $stroke.cap().to_svg_value())
            .set("stroke-linejoin", $stroke.join().to_svg_value());

        if let Some(dasharray) = $stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use svg::node::element as svg_element;

    #[test]
    fn test_stroke_constructors() {
        let color = Color::builtin("red");

        let solid = StrokeDefinition::solid(color.clone(), 2.0);
        assert_eq!(solid.width(), 2.0);
        assert_eq!(*solid.style(), StrokeStyle::Solid);
        assert_eq!(solid.cap(), StrokeCap::Butt);

        let dashed = StrokeDefinition::dashed(color.clone(), 1.5);
        assert_eq!(*dashed.style(), StrokeStyle::Dashed);

        let rounded = StrokeDefinition::rounded(color, 1.0);
        assert_eq!(rounded.cap(), StrokeCap::Round);
        assert_eq!(rounded.join(), StrokeJoin::Round);
    }

    #[test]
    fn test_stroke_style_dasharray() {
        assert_eq!(StrokeStyle::Solid.to_svg_value(), None);
        assert_eq!(StrokeStyle::Dashed.to_svg_value(), Some("5,5".to_string()));
        assert_eq!(StrokeStyle::Dotted.to_svg_value(), Some("2,3".to_string()));
        let custom = StrokeStyle::Custom("15,3".to_string());
        assert_eq!(custom.to_svg_value(), Some("15,3".to_string()));
    }

    #[test]
    fn test_stroke_from_str() {
        assert_eq!("dashed".parse::<StrokeStyle>().unwrap(), StrokeStyle::Dashed);
        assert_eq!("round".parse::<StrokeCap>().unwrap(), StrokeCap::Round);
        assert!("pointy".parse::<StrokeCap>().is_err());
        assert_eq!("bevel".parse::<StrokeJoin>().unwrap(), StrokeJoin::Bevel);
        assert!("sharp".parse::<StrokeJoin>().is_err());
    }

    #[test]
    fn test_apply_stroke_sets_attributes() {
        let stroke = StrokeDefinition::dashed(Color::builtin("#999999"), 1.26);
        let line = crate::apply_stroke!(svg_element::Line::new(), &stroke);
        let rendered = line.to_string();
        assert!(rendered.contains(r##"stroke="#999999""##));
        assert!(rendered.contains(r#"stroke-width="1.3""#));
        assert!(rendered.contains(r#"stroke-dasharray="5,5""#));
    }
}
