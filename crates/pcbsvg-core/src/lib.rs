//! pcbsvg Core Types and Definitions
//!
//! This crate provides the foundational types for rendering circuit boards
//! to SVG. It includes:
//!
//! - **Units**: Length and angle normalization to millimeters ([`units`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Points, bounds and the board-to-screen transform ([`geometry`] module)
//! - **Elements**: The circuit element data model and id index ([`element`] module)
//! - **Draw**: Layers, paths, strokes and text primitives ([`draw`] module)

pub mod color;
pub mod draw;
pub mod element;
pub mod geometry;
pub mod units;
