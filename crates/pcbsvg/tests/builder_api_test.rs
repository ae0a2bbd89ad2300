//! Integration tests for the SvgBuilder API

use pcbsvg::{
    SvgBuilder,
    config::{GridOptions, RenderOptions},
    element::Side,
    parse_elements,
};

const BOARD_WITH_PAD: &str = r#"[
    {"type": "pcb_board", "center": {"x": 0, "y": 0}, "width": 10, "height": 10},
    {"type": "pcb_smtpad", "shape": "rect", "x": 1, "y": 1, "width": 1, "height": 0.5, "layer": "top"}
]"#;

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found in output"))
}

/// Every numeric token must parse as a finite number.
fn assert_finite(svg: &str) {
    assert!(!svg.contains("NaN"), "output contains NaN");
    assert!(!svg.contains("inf"), "output contains an infinity");
}

#[test]
fn test_builder_api_exists() {
    let _builder = SvgBuilder::default();
}

#[test]
fn test_render_board_with_pad() {
    let elements = parse_elements(BOARD_WITH_PAD).expect("Failed to parse elements");
    let svg = SvgBuilder::default().render_svg(&elements);

    assert!(svg.starts_with("<svg"), "Output should start with the root tag");
    assert!(svg.ends_with("</svg>"), "Output should be complete SVG");
    assert!(svg.contains(r#"width="800""#));
    assert!(svg.contains(r#"height="600""#));
    assert!(svg.contains(r#"viewBox="0 0 800 600""#));
    assert!(position(&svg, "pcb_board") < position(&svg, "pcb_smtpad"));
    assert_finite(&svg);
}

#[test]
fn test_layers_stack_in_board_order() {
    let elements = parse_elements(
        r#"[
            {"type": "pcb_silkscreen_text", "text": "U1", "anchor_position": {"x": 0, "y": 3},
             "font_size": 1, "layer": "top"},
            {"type": "pcb_hole", "hole_shape": "circle", "x": 3, "y": 3, "hole_diameter": 1},
            {"type": "pcb_smtpad", "shape": "rect", "x": 1, "y": 1, "width": 1, "height": 1, "layer": "top"},
            {"type": "pcb_board", "center": {"x": 0, "y": 0}, "width": 10, "height": 10}
        ]"#,
    )
    .unwrap();
    let svg = SvgBuilder::default().render_svg(&elements);

    let board = position(&svg, r#"data-layer="board""#);
    let copper = position(&svg, r#"data-layer="copper-top""#);
    let drill = position(&svg, r#"data-layer="drill""#);
    let silkscreen = position(&svg, r#"data-layer="silkscreen-top""#);
    assert!(board < copper);
    assert!(copper < drill);
    assert!(drill < silkscreen);
}

#[test]
fn test_rendering_is_deterministic() {
    let elements = parse_elements(BOARD_WITH_PAD).unwrap();
    let builder = SvgBuilder::new(RenderOptions::default().with_grid(GridOptions {
        cell_size: 1.0,
        label_cells: true,
    }));
    assert_eq!(builder.render_svg(&elements), builder.render_svg(&elements));
}

#[test]
fn test_background_color_option() {
    let elements = parse_elements(BOARD_WITH_PAD).unwrap();

    let light = SvgBuilder::new(RenderOptions::default().with_background_color("#fff"))
        .render_svg(&elements);
    assert!(light.contains(r##"fill="#fff""##));

    let dark = SvgBuilder::default().render_svg(&elements);
    assert!(dark.contains(r##"fill="#000""##));
}

#[test]
fn test_transform_attribute_matches_viewport() {
    let elements = parse_elements(BOARD_WITH_PAD).unwrap();
    let builder = SvgBuilder::default();
    let viewport = builder.viewport(&elements);
    let svg = builder.render_svg(&elements);

    let expected = format!(r#"data-real-to-screen-transform="{}""#, viewport.transform());
    assert!(svg.contains(&expected), "missing {expected}");

    // The board center lands on the canvas center.
    let center = viewport.transform().apply(pcbsvg::geometry::Point::new(0.0, 0.0));
    assert!((center.x() - 400.0).abs() < 1e-6);
    assert!((center.y() - 300.0).abs() < 1e-6);
}

#[test]
fn test_cutout_slots_render_on_drill_layer() {
    let elements = parse_elements(
        r#"[
            {"type": "pcb_board", "center": {"x": 9, "y": 0}, "width": 20, "height": 10},
            {"type": "pcb_cutout", "shape": "path",
             "route": [{"x": 0, "y": 0}, {"x": 18, "y": 0}],
             "slot_width": 1, "slot_length": 6, "space_between_slots": 0.6}
        ]"#,
    )
    .unwrap();
    let svg = SvgBuilder::default().render_svg(&elements);

    assert_eq!(svg.matches(r#"class="pcb-cutout-slot""#).count(), 2);
    assert!(svg.contains(r#"data-layer="drill""#));
}

#[test]
fn test_solder_mask_overlay() {
    let source = r#"[
        {"type": "pcb_board", "center": {"x": 0, "y": 0}, "width": 10, "height": 10},
        {"type": "pcb_smtpad", "shape": "rect", "x": 1, "y": 1, "width": 1, "height": 1,
         "layer": "top", "is_covered_with_solder_mask": false}
    ]"#;
    let elements = parse_elements(source).unwrap();

    let without = SvgBuilder::default().render_svg(&elements);
    assert!(!without.contains("pcb-soldermask"));

    let with =
        SvgBuilder::new(RenderOptions::default().with_solder_mask(true)).render_svg(&elements);
    assert!(with.contains(r#"class="pcb-soldermask""#));
    assert!(with.contains(r#"<mask id="soldermask-0""#));
    assert!(with.contains(r#"mask="url(#soldermask-0)""#));
    assert_eq!(with.matches(r#"fill="black""#).count(), 1);
}

#[test]
fn test_solder_paste_export() {
    let elements = parse_elements(
        r#"[
            {"type": "pcb_board", "center": {"x": 0, "y": 0}, "width": 10, "height": 10},
            {"type": "pcb_solder_paste", "shape": "circle", "x": 2, "y": 0, "radius": 0.3,
             "layer": "bottom"}
        ]"#,
    )
    .unwrap();
    let builder = SvgBuilder::default();

    let bottom = builder.render_solder_paste(&elements, Side::Bottom);
    assert!(bottom.contains(r#"data-layer="solder-paste-bottom""#));

    let top = builder.render_solder_paste(&elements, Side::Top);
    assert!(!top.contains("solder-paste-bottom"));
    assert!(!top.contains("pcb_solder_paste"));
}

#[test]
fn test_malformed_geometry_never_fails() {
    let elements = parse_elements(
        r#"[
            {"type": "pcb_board", "center": {"x": 0, "y": 0}, "width": 0, "height": 0},
            {"type": "pcb_trace", "route": []},
            {"type": "pcb_smtpad", "shape": "polygon", "points": [], "layer": "top"},
            {"type": "pcb_silkscreen_text", "text": "", "anchor_position": {"x": 1e9, "y": 0},
             "font_size": 1, "layer": "top"}
        ]"#,
    )
    .unwrap();
    let svg = SvgBuilder::default().render_svg(&elements);
    assert!(svg.starts_with("<svg"));
    assert_finite(&svg);
}
