//! Error adapter for converting PcbSvgError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. JSON syntax errors
//! carry a line and column, which are mapped back to a labeled span in the
//! input document.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use pcbsvg::PcbSvgError;

/// Adapter for a JSON syntax or shape error.
pub struct JsonErrorAdapter<'a> {
    err: &'a serde_json::Error,
    src: &'a str,
}

impl<'a> JsonErrorAdapter<'a> {
    /// Create a new JSON error adapter.
    pub fn new(err: &'a serde_json::Error, src: &'a str) -> Self {
        Self { err, src }
    }

    /// Byte span of the reported position, if it falls inside the source.
    fn span(&self) -> Option<SourceSpan> {
        line_column_offset(self.src, self.err.line(), self.err.column())
            .map(|offset| SourceSpan::new(offset.into(), 0))
    }
}

impl fmt::Debug for JsonErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonErrorAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for JsonErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid circuit JSON")
    }
}

impl std::error::Error for JsonErrorAdapter<'_> {}

impl MietteDiagnostic for JsonErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("pcbsvg::parse"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(
            "the input must be a JSON array of circuit element records",
        ))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span()?;
        let label = LabeledSpan::new_primary_with_span(Some(self.err.to_string()), span);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for [`PcbSvgError`] variants without source information.
pub struct ErrorAdapter<'a>(pub &'a PcbSvgError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            PcbSvgError::Io(_) => "pcbsvg::io",
            PcbSvgError::Parse { .. } => "pcbsvg::parse",
            PcbSvgError::Config(_) => "pcbsvg::config",
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A JSON error with a location in the input.
    Json(JsonErrorAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Json(j) => fmt::Display::fmt(j, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Json(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Json(j) => j.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Json(j) => j.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Json(j) => j.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Json(j) => j.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Converts a 1-based line and column into a byte offset in `src`.
///
/// `serde_json` reports column 0 when the error sits at the very start of a
/// line, and may report a position one past the end of the input.
fn line_column_offset(src: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    let line_text = src[line_start..].split('\n').next().unwrap_or("");
    let column_offset = line_text
        .char_indices()
        .nth(column.saturating_sub(1))
        .map_or(line_text.len(), |(offset, _)| offset);
    Some((line_start + column_offset).min(src.len()))
}

/// Convert a [`PcbSvgError`] into a list of reportable errors.
pub fn to_reportables(err: &PcbSvgError) -> Vec<Reportable<'_>> {
    match err {
        PcbSvgError::Parse { err, src } => {
            vec![Reportable::Json(JsonErrorAdapter::new(err, src))]
        }
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_column_offset() {
        let src = "[\n  {\"type\": 1},\n  oops\n]";
        assert_eq!(line_column_offset(src, 1, 1), Some(0));
        assert_eq!(line_column_offset(src, 3, 3), Some(src.find("oops").unwrap()));
        assert_eq!(line_column_offset(src, 9, 1), Some(src.len()));
        assert_eq!(line_column_offset(src, 0, 1), None);
    }

    #[test]
    fn test_parse_error_has_label() {
        let src = "[\n  {\"type\": \"pcb_board\"},\n  oops\n]";
        let err = pcbsvg::parse_elements(src).unwrap_err();

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        assert_eq!(reportables[0].to_string(), "Invalid circuit JSON");

        let labels: Vec<_> = reportables[0].labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        let oops = src.find("oops").unwrap();
        assert!((oops..oops + 4).contains(&labels[0].offset()));
    }

    #[test]
    fn test_non_parse_error() {
        let err = PcbSvgError::Config("bad option".to_string());

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Configuration error: bad option");
                assert_eq!(e.code().unwrap().to_string(), "pcbsvg::config");
            }
            Reportable::Json(_) => panic!("Expected Error"),
        }
    }
}
