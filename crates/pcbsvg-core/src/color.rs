//! Color handling for pcbsvg documents
//!
//! This module provides the [`Color`] type which validates CSS color strings
//! with the `DynamicColor` type from the color crate while keeping the
//! caller's original spelling for output, so `#fff` is emitted as `#fff`.

use std::{fmt, str::FromStr};

use color::DynamicColor;

/// A validated CSS color that remembers its source text.
#[derive(Clone, PartialEq, Debug)]
pub struct Color {
    source: String,
    alpha: f32,
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use pcbsvg_core::color::Color;
    ///
    /// let white = Color::new("#fff").unwrap();
    /// assert_eq!(white.to_string(), "#fff");
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        let trimmed = color_str.trim();
        match DynamicColor::from_str(trimmed) {
            Ok(color) => Ok(Self {
                source: trimmed.to_string(),
                alpha: color.components[3],
            }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Creates a color from a built-in palette constant.
    ///
    /// Built-in constants are known-good CSS; should one fail to parse it is
    /// still emitted verbatim and treated as opaque.
    pub fn builtin(css: &'static str) -> Self {
        Self::new(css).unwrap_or_else(|_| Self {
            source: css.to_string(),
            alpha: 1.0,
        })
    }

    /// The color exactly as supplied by the caller (whitespace-trimmed).
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the alpha (transparency) component of this color.
    ///
    /// # Returns
    ///
    /// The alpha value as a `f32` between 0.0 and 1.0, where:
    /// - 0.0 = fully transparent
    /// - 1.0 = fully opaque
    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.source.clone())
    }
}
