//! Length and angle normalization.
//!
//! Circuit data mixes bare numbers (millimeters) with unit-suffixed strings
//! such as `"0.1in"` or `"25mil"`. Every length is normalized to millimeters
//! once, at deserialization time, so the rest of the pipeline only ever sees
//! `f64` millimeters.
//!
//! # Grammar
//!
//! ```text
//! length  := number [ws] [suffix]
//! number  := ['+' | '-'] digits ['.' digits] [('e' | 'E') ['+' | '-'] digits]
//! suffix  := "mm" | "cm" | "m" | "um" | "in" | "mil"
//! ```
//!
//! Anything else is a [`UnitError`]. A [`Length`] that failed validation
//! during deserialization is kept as an *invalid* value rather than aborting
//! the whole document.

use std::{fmt, str::FromStr};

use log::warn;
use serde::{
    Deserialize, Deserializer,
    de::{self, Visitor},
};
use thiserror::Error;

/// Errors produced while parsing a length or angle literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("empty length literal")]
    Empty,

    #[error("invalid number in length literal `{0}`")]
    InvalidNumber(String),

    #[error("unknown unit suffix `{suffix}` in `{literal}`")]
    UnknownSuffix { literal: String, suffix: String },

    #[error("length literal `{0}` is not finite")]
    NonFinite(String),
}

/// Millimeter factor for each accepted suffix.
const LENGTH_SUFFIXES: &[(&str, f64)] = &[
    ("mm", 1.0),
    ("cm", 10.0),
    ("m", 1000.0),
    ("um", 0.001),
    ("in", 25.4),
    ("mil", 0.0254),
];

/// Degree factor for each accepted angle suffix.
const ANGLE_SUFFIXES: &[(&str, f64)] = &[("deg", 1.0)];

/// Splits `literal` into its numeric prefix and the remaining suffix.
///
/// The numeric prefix follows the `number` production of the module grammar;
/// the split never consumes characters that could start a unit suffix.
fn split_number(literal: &str) -> (&str, &str) {
    let bytes = literal.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    literal.split_at(end)
}

/// Parses `literal` against a suffix table. An empty suffix yields the
/// value unchanged.
fn parse_with_suffixes(literal: &str, suffixes: &[(&str, f64)]) -> Result<f64, UnitError> {
    let trimmed = literal.trim();
    if trimmed.is_empty() {
        return Err(UnitError::Empty);
    }

    let (number, rest) = split_number(trimmed);
    let value: f64 = number
        .parse()
        .map_err(|_| UnitError::InvalidNumber(trimmed.to_string()))?;

    let suffix = rest.trim_start();
    let factor = if suffix.is_empty() {
        1.0
    } else {
        suffixes
            .iter()
            .find(|(name, _)| *name == suffix)
            .map(|(_, factor)| *factor)
            .ok_or_else(|| UnitError::UnknownSuffix {
                literal: trimmed.to_string(),
                suffix: suffix.to_string(),
            })?
    };

    let normalized = value * factor;
    if !normalized.is_finite() {
        return Err(UnitError::NonFinite(trimmed.to_string()));
    }
    Ok(normalized)
}

/// Parses a length literal into millimeters.
///
/// # Examples
///
/// ```
/// # use pcbsvg_core::units::parse_length;
/// assert_eq!(parse_length("2.5").unwrap(), 2.5);
/// assert_eq!(parse_length("1in").unwrap(), 25.4);
/// assert_eq!(parse_length("3 cm").unwrap(), 30.0);
/// assert!(parse_length("3inch").is_err());
/// ```
///
/// # Errors
///
/// Returns a [`UnitError`] for empty input, malformed numbers, unknown
/// suffixes and non-finite results.
pub fn parse_length(literal: &str) -> Result<f64, UnitError> {
    parse_with_suffixes(literal, LENGTH_SUFFIXES)
}

/// Parses an angle literal (`"45"`, `"45deg"`) into degrees.
///
/// # Errors
///
/// Returns a [`UnitError`] under the same conditions as [`parse_length`].
pub fn parse_angle(literal: &str) -> Result<f64, UnitError> {
    parse_with_suffixes(literal, ANGLE_SUFFIXES)
}

/// A length normalized to millimeters.
///
/// A `Length` is either valid (a finite millimeter value) or *invalid*, the
/// result of a literal that failed validation. Invalid lengths read as
/// `None` and never take part in bounds computation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Length {
    mm: Option<f64>,
}

impl Length {
    /// Creates a valid length; non-finite input yields an invalid length.
    pub fn mm(value: f64) -> Self {
        Self {
            mm: value.is_finite().then_some(value),
        }
    }

    /// The invalid length.
    pub fn invalid() -> Self {
        Self { mm: None }
    }

    /// Millimeter value, or `None` if the length is invalid.
    pub fn get(self) -> Option<f64> {
        self.mm
    }

    /// Millimeter value, with invalid lengths reading as `0`.
    pub fn or_zero(self) -> f64 {
        self.mm.unwrap_or(0.0)
    }

    /// Returns `true` if the length holds a finite value.
    pub fn is_valid(self) -> bool {
        self.mm.is_some()
    }
}

impl FromStr for Length {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_length(s).map(Self::mm)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mm {
            Some(value) => write!(f, "{value}mm"),
            None => write!(f, "<invalid>"),
        }
    }
}

/// Extension for optional lengths, the common shape of element fields.
pub trait OptionLengthExt {
    /// The valid millimeter value, flattening missing and invalid.
    fn value(self) -> Option<f64>;

    /// The valid millimeter value, or `0`.
    fn or_zero(self) -> f64;

    /// The valid millimeter value if strictly positive.
    fn positive(self) -> Option<f64>;
}

impl OptionLengthExt for Option<Length> {
    fn value(self) -> Option<f64> {
        self.and_then(Length::get)
    }

    fn or_zero(self) -> f64 {
        self.value().unwrap_or(0.0)
    }

    fn positive(self) -> Option<f64> {
        self.value().filter(|v| *v > 0.0)
    }
}

/// Serde visitor shared by lengths and angles.
struct UnitVisitor {
    kind: &'static str,
    suffixes: &'static [(&'static str, f64)],
}

impl Visitor<'_> for UnitVisitor {
    type Value = Option<f64>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "a number or a {} string", self.kind)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.is_finite() {
            Ok(Some(v))
        } else {
            warn!(kind = self.kind; "Ignoring non-finite value");
            Ok(None)
        }
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        match parse_with_suffixes(v, self.suffixes) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(kind = self.kind, literal = v, err:% = err; "Invalid unit literal");
                Ok(None)
            }
        }
    }
}

impl<'de> Deserialize<'de> for Length {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mm = deserializer.deserialize_any(UnitVisitor {
            kind: "length",
            suffixes: LENGTH_SUFFIXES,
        })?;
        Ok(Self { mm })
    }
}

/// An angle in degrees, counter-clockwise in board space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Angle {
    degrees: Option<f64>,
}

impl Angle {
    pub fn degrees(value: f64) -> Self {
        Self {
            degrees: value.is_finite().then_some(value),
        }
    }

    /// Degree value, with invalid angles reading as `0`.
    pub fn or_zero(self) -> f64 {
        self.degrees.unwrap_or(0.0)
    }
}

impl<'de> Deserialize<'de> for Angle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let degrees = deserializer.deserialize_any(UnitVisitor {
            kind: "angle",
            suffixes: ANGLE_SUFFIXES,
        })?;
        Ok(Self { degrees })
    }
}

/// Reads an optional angle, with missing and invalid angles reading as `0`.
pub fn degrees_or_zero(angle: Option<Angle>) -> f64 {
    angle.map(Angle::or_zero).unwrap_or(0.0)
}
