//! Command-line argument definitions for the pcbsvg CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, the exported layer and logging verbosity.

use clap::{Parser, ValueEnum};

use pcbsvg::element::Side;

/// Single-layer exports selectable with `--layer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportLayer {
    /// Solder paste on the top side
    SolderPasteTop,
    /// Solder paste on the bottom side
    SolderPasteBottom,
}

impl ExportLayer {
    pub fn side(self) -> Side {
        match self {
            Self::SolderPasteTop => Side::Top,
            Self::SolderPasteBottom => Side::Bottom,
        }
    }
}

/// Command-line arguments for the pcbsvg tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input circuit JSON file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Export a single layer instead of the full board
    #[arg(long, value_enum)]
    pub layer: Option<ExportLayer>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
