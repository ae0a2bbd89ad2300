//! Property tests over generated circuit documents.

use proptest::prelude::*;
use serde_json::json;

use pcbsvg::{SvgBuilder, config::RenderOptions, element::Element, parse_elements};

fn coordinate() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => -50.0f64..50.0,
        1 => -1e12f64..1e12,
        1 => prop::sample::select(vec![-1e308, -1e-300, 0.0, 1e-300, 1e308]),
    ]
}

fn extent() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => 0.0f64..20.0,
        1 => prop::sample::select(vec![0.0, 1e-9, 1e9, 1e300]),
    ]
}

fn layer() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["top", "bottom", "inner1", "nowhere"])
}

fn board() -> impl Strategy<Value = serde_json::Value> {
    (coordinate(), coordinate(), extent(), extent(), prop::bool::ANY).prop_map(
        |(x, y, width, height, with_id)| {
            let mut board = json!({
                "type": "pcb_board", "center": {"x": x, "y": y}, "width": width, "height": height
            });
            if with_id {
                board["pcb_board_id"] = json!(format!("board_{x}_{y}"));
            }
            board
        },
    )
}

fn pad() -> impl Strategy<Value = serde_json::Value> {
    (
        coordinate(),
        coordinate(),
        extent(),
        extent(),
        layer(),
        prop::option::of(prop::bool::ANY),
    )
        .prop_map(|(x, y, width, height, layer, covered)| {
            json!({
                "type": "pcb_smtpad", "shape": "rect", "x": x, "y": y,
                "width": width, "height": height, "layer": layer,
                "is_covered_with_solder_mask": covered
            })
        })
}

fn trace() -> impl Strategy<Value = serde_json::Value> {
    (
        prop::collection::vec((coordinate(), coordinate()), 0..6),
        prop::bool::ANY,
    )
        .prop_map(|(points, covered)| {
            let route: Vec<_> = points
                .into_iter()
                .map(|(x, y)| json!({"route_type": "wire", "x": x, "y": y, "width": 0.2, "layer": "top"}))
                .collect();
            json!({"type": "pcb_trace", "route": route, "is_covered_with_solder_mask": covered})
        })
}

fn cutout() -> impl Strategy<Value = serde_json::Value> {
    (
        prop::collection::vec((coordinate(), coordinate()), 0..5),
        0.0f64..2.0,
        prop_oneof![0.001f64..10.0, Just(1e-9)],
        prop_oneof![0.001f64..10.0, Just(1e-9)],
    )
        .prop_map(|(points, width, length, spacing)| {
            let route: Vec<_> = points.into_iter().map(|(x, y)| json!({"x": x, "y": y})).collect();
            json!({
                "type": "pcb_cutout", "shape": "path", "route": route,
                "slot_width": width, "slot_length": length, "space_between_slots": spacing
            })
        })
}

fn knockout_text() -> impl Strategy<Value = serde_json::Value> {
    (
        coordinate(),
        coordinate(),
        "[A-Z0-9~_\n]{0,12}",
        prop_oneof![0.0f64..3.0, Just(1e300)],
        -720.0f64..720.0,
    )
        .prop_map(|(x, y, text, font_size, rotation)| {
            json!({
                "type": "pcb_silkscreen_text", "text": text,
                "anchor_position": {"x": x, "y": y}, "font_size": font_size,
                "rotation": rotation, "is_knockout": true, "layer": "top"
            })
        })
}

fn document() -> impl Strategy<Value = Vec<serde_json::Value>> {
    prop::collection::vec(
        prop_oneof![board(), pad(), trace(), cutout(), knockout_text()],
        0..12,
    )
}

fn options() -> impl Strategy<Value = RenderOptions> {
    (prop::bool::ANY, prop::bool::ANY, prop::bool::ANY).prop_map(|(mask, aspect, padding)| {
        RenderOptions::default()
            .with_solder_mask(mask)
            .with_board_aspect_ratio(aspect)
            .with_padding_outside_board(padding)
    })
}

fn elements(records: Vec<serde_json::Value>) -> Vec<Element> {
    parse_elements(&serde_json::Value::Array(records).to_string()).unwrap()
}

fn numbers(svg: &str) -> impl Iterator<Item = &str> {
    svg.split(|c: char| !(c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '+'))
        .filter(|token| token.starts_with(|c: char| c.is_ascii_digit() || c == '-'))
}

proptest! {
    #[test]
    fn prop_output_numbers_are_finite(records in document(), options in options()) {
        let svg = SvgBuilder::new(options).render_svg(&elements(records));
        prop_assert!(!svg.contains("NaN"));
        for token in numbers(&svg) {
            if let Ok(value) = token.parse::<f64>() {
                prop_assert!(value.is_finite(), "non-finite number {token}");
            }
        }
    }

    #[test]
    fn prop_rendering_is_idempotent(records in document(), options in options()) {
        let elements = elements(records);
        let builder = SvgBuilder::new(options);
        prop_assert_eq!(builder.render_svg(&elements), builder.render_svg(&elements));
    }

    #[test]
    fn prop_transform_is_finite_and_uniform(records in document(), options in options()) {
        let viewport = SvgBuilder::new(options).viewport(&elements(records));
        let transform = viewport.transform();
        prop_assert!(transform.is_finite());
        prop_assert!(transform.scale() > 0.0);

        let [a, b, c, d, _, _] = transform.coefficients();
        prop_assert!(b.abs() < 1e-12 && c.abs() < 1e-12);
        prop_assert!((a + d).abs() < 1e-9 * a.abs().max(1.0));
    }

    #[test]
    fn prop_board_renders_before_pads(records in document()) {
        let svg = SvgBuilder::default().render_svg(&elements(records));
        if let (Some(board), Some(pad)) = (svg.find("data-layer=\"board\""), svg.find("pcb_smtpad")) {
            prop_assert!(board < pad);
        }
    }

    #[test]
    fn prop_every_mask_path_has_its_own_definition(records in document()) {
        let elements = elements(records);
        let boards = elements.iter().filter(|element| matches!(element, Element::Board(_))).count();
        let svg = SvgBuilder::new(RenderOptions::default().with_solder_mask(true)).render_svg(&elements);

        let masked = svg.matches("class=\"pcb-soldermask\"").count();
        prop_assert!(masked <= boards);
        for id in 0..masked {
            let definition = format!("<mask id=\"soldermask-{id}\"");
            let reference = format!("mask=\"url(#soldermask-{id})\"");
            prop_assert!(svg.contains(&definition));
            prop_assert_eq!(svg.matches(&reference).count(), 1);
        }
    }
}
