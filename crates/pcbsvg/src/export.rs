//! Document export.
//!
//! [`svg`] turns resolved elements into the layered SVG document.

pub mod svg;
