//! pcbsvg - Render circuit board JSON as layered SVG.
//!
//! Parses a circuit document (a JSON array of typed records such as
//! `pcb_board`, `pcb_smtpad` or `pcb_trace`) and renders it into a single SVG
//! string whose groups stack features in physical board order.

pub mod config;

mod bounds;
mod error;
mod export;
mod style;

pub use pcbsvg_core::{color, draw, element, geometry, units};

pub use bounds::Viewport;
pub use error::PcbSvgError;

use log::{debug, info, warn};

use config::RenderOptions;
use element::{Element, ElementIndex, Side};
use export::svg::Svg;

/// Parses a circuit JSON document into its elements.
///
/// The document must be a JSON array. A record that fails to deserialize
/// (an unknown tag or a malformed field) becomes [`Element::Unknown`] and
/// renders nothing, so one bad record never rejects the document.
///
/// # Errors
///
/// Returns [`PcbSvgError::Parse`] when the input is not a JSON array.
///
/// # Examples
///
/// ```
/// let elements = pcbsvg::parse_elements(
///     r#"[{"type": "pcb_board", "center": {"x": 0, "y": 0}, "width": 10, "height": 10}]"#,
/// )
/// .unwrap();
/// assert_eq!(elements.len(), 1);
/// assert!(pcbsvg::parse_elements("{}").is_err());
/// ```
pub fn parse_elements(json: &str) -> Result<Vec<Element>, PcbSvgError> {
    info!("Parsing circuit JSON");
    let records: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|err| PcbSvgError::new_parse_error(err, json))?;

    let elements: Vec<Element> = records
        .into_iter()
        .enumerate()
        .map(|(position, record)| {
            let record_type = record
                .get("type")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("")
                .to_string();
            serde_json::from_value(record).unwrap_or_else(|err| {
                warn!(
                    position = position,
                    record_type = record_type.as_str(),
                    err:% = err;
                    "Ignoring malformed record"
                );
                Element::Unknown
            })
        })
        .collect();

    debug!(elements = elements.len(); "Circuit JSON parsed");
    Ok(elements)
}

/// Builder for rendering circuit elements to SVG.
///
/// # Examples
///
/// ```
/// use pcbsvg::{SvgBuilder, config::RenderOptions};
///
/// let elements = pcbsvg::parse_elements(
///     r#"[{"type": "pcb_board", "center": {"x": 0, "y": 0}, "width": 10, "height": 10}]"#,
/// )
/// .unwrap();
///
/// let builder = SvgBuilder::new(RenderOptions::default().with_background_color("#fff"));
/// let svg = builder.render_svg(&elements);
/// assert!(svg.starts_with("<svg"));
/// assert!(svg.contains(r##"fill="#fff""##));
/// ```
#[derive(Debug, Default)]
pub struct SvgBuilder {
    options: RenderOptions,
}

impl SvgBuilder {
    /// Create a new builder with the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Computes the drawing rectangle, canvas and transform for `elements`.
    pub fn viewport(&self, elements: &[Element]) -> Viewport {
        let index = ElementIndex::new(elements);
        Viewport::compute(elements, &index, &self.options)
    }

    /// Renders the full layered document.
    ///
    /// Rendering never fails: malformed geometry is skipped and the output
    /// contains only finite numbers.
    pub fn render_svg(&self, elements: &[Element]) -> String {
        info!(elements = elements.len(); "Rendering SVG");
        let index = ElementIndex::new(elements);
        let viewport = Viewport::compute(elements, &index, &self.options);

        let mut svg = Svg::new(&self.options, &index, viewport);
        let output = svg.render_elements(elements);
        let document = svg.into_document(output).to_string();

        info!(bytes = document.len(); "SVG rendered successfully");
        document
    }

    /// Renders the solder paste of one side over the board outlines.
    ///
    /// The viewport is computed exactly as for [`SvgBuilder::render_svg`].
    pub fn render_solder_paste(&self, elements: &[Element], side: Side) -> String {
        info!(side = side.name(); "Rendering solder paste layer");
        let index = ElementIndex::new(elements);
        let viewport = Viewport::compute(elements, &index, &self.options);

        let mut svg = Svg::new(&self.options, &index, viewport);
        let output = svg.render_paste_layer(elements, side);
        svg.into_document(output).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_malformed_records_as_unknown() {
        let elements = parse_elements(
            r#"[
                {"type": "pcb_board", "center": {"x": 0, "y": 0}, "width": 10, "height": 10},
                {"type": "pcb_smtpad", "shape": "rect"},
                {"type": "something_new", "x": 1},
                42
            ]"#,
        )
        .unwrap();

        assert_eq!(elements.len(), 4);
        assert!(matches!(elements[0], Element::Board(_)));
        assert!(matches!(elements[1], Element::Unknown));
        assert!(matches!(elements[2], Element::Unknown));
        assert!(matches!(elements[3], Element::Unknown));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = parse_elements(r#"{"type": "pcb_board"}"#).unwrap_err();
        assert!(matches!(err, PcbSvgError::Parse { .. }));

        let err = parse_elements("[1, 2").unwrap_err();
        assert!(matches!(err, PcbSvgError::Parse { .. }));
    }

    #[test]
    fn test_render_empty_document() {
        let svg = SvgBuilder::default().render_svg(&[]);
        assert!(svg.contains(r#"data-type="pcb_background""#));
        assert!(!svg.contains("data-layer"));
    }

    #[test]
    fn test_render_solder_paste_only() {
        let elements = parse_elements(
            r#"[
                {"type": "pcb_board", "center": {"x": 0, "y": 0}, "width": 10, "height": 10},
                {"type": "pcb_smtpad", "shape": "rect", "x": 0, "y": 0, "width": 1, "height": 1, "layer": "top"},
                {"type": "pcb_solder_paste", "shape": "rect", "x": 0, "y": 0, "width": 0.8, "height": 0.8, "layer": "top"},
                {"type": "pcb_solder_paste", "shape": "circle", "x": 2, "y": 0, "radius": 0.3, "layer": "bottom"}
            ]"#,
        )
        .unwrap();
        let builder = SvgBuilder::default();

        let top = builder.render_solder_paste(&elements, Side::Top);
        assert!(top.contains(r#"data-layer="solder-paste-top""#));
        assert!(!top.contains("solder-paste-bottom"));
        assert!(!top.contains("pcb_smtpad"));
        assert!(top.contains(r#"data-layer="board""#));

        let full = builder.render_svg(&elements);
        assert!(!full.contains("solder-paste"));
    }
}
