//! CLI logic for the pcbsvg tool.
//!
//! This module contains the core CLI logic: load options, read the circuit
//! JSON, render it and write the SVG.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, ExportLayer};

use std::fs;

use log::info;

use pcbsvg::{PcbSvgError, SvgBuilder, parse_elements};

/// Run the pcbsvg CLI application
///
/// This function processes the input file through the pcbsvg pipeline
/// and writes the resulting SVG to the output file.
///
/// # Errors
///
/// Returns `PcbSvgError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Input that is not a JSON array
pub fn run(args: &Args) -> Result<(), PcbSvgError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing circuit"
    );

    let options = config::load_config(args.config.as_ref())?;
    let source = fs::read_to_string(&args.input)?;

    let builder = SvgBuilder::new(options);
    let elements = parse_elements(&source)?;
    let svg = match args.layer {
        Some(layer) => builder.render_solder_paste(&elements, layer.side()),
        None => builder.render_svg(&elements),
    };

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
