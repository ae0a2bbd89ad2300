//! Layer-based rendering system for SVG output.
//!
//! This module provides a type-safe layer system that places every emitted
//! SVG node on the physical or logical layer it belongs to, so the document
//! stacks features the way a manufactured board does.
//!
//! # Overview
//!
//! The layer system consists of:
//! - [`RenderLayer`]: An enum defining available rendering layers in order
//! - [`LayeredOutput`]: A structure for collecting SVG nodes by layer
//!
//! # Example
//!
//! ```
//! # use pcbsvg_core::draw::{CopperFeature, CopperLayer, RenderLayer, LayeredOutput};
//! # use svg::node::element::{Path, Rectangle};
//!
//! let mut output = LayeredOutput::new();
//!
//! // A top pad is added first but still renders above the board.
//! let pad = Path::new().set("d", "M 0 0 L 1 0 L 1 1 Z");
//! output.add_to_layer(
//!     RenderLayer::Copper { layer: CopperLayer::Top, feature: CopperFeature::Pad },
//!     Box::new(pad),
//! );
//! output.add_to_layer(RenderLayer::Board, Box::new(Rectangle::new()));
//!
//! let svg_nodes = output.render();
//! assert_eq!(svg_nodes.len(), 2);
//! ```

use std::borrow::Cow;

use svg::node::element as svg_element;

use crate::element::{LayerRef, Side};

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// A copper layer in physical stacking order, bottom first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CopperLayer {
    Bottom,
    Inner(u8),
    Top,
}

impl CopperLayer {
    /// The copper layer a [`LayerRef`] names, if any.
    pub fn from_layer_ref(layer: &LayerRef) -> Option<Self> {
        match layer {
            LayerRef::Top => Some(Self::Top),
            LayerRef::Bottom => Some(Self::Bottom),
            LayerRef::Inner(index) => Some(Self::Inner(*index)),
            LayerRef::Unknown(_) => None,
        }
    }

    pub fn name(self) -> Cow<'static, str> {
        match self {
            Self::Bottom => Cow::Borrowed("bottom"),
            Self::Top => Cow::Borrowed("top"),
            Self::Inner(index) => Cow::Owned(format!("inner{index}")),
        }
    }
}

/// Kind of copper feature; later variants sit above earlier ones on the
/// same copper layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CopperFeature {
    Pour,
    Trace,
    Pad,
}

impl CopperFeature {
    pub fn name(self) -> &'static str {
        match self {
            Self::Pour => "pour",
            Self::Trace => "trace",
            Self::Pad => "pad",
        }
    }
}

/// Defines the rendering layers for SVG output.
///
/// Layers are rendered from bottom to top in the order defined by variant declaration.
/// The `Ord` derive uses declaration order, so the first variant renders first (bottom),
/// and the last variant renders last (top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Canvas background - renders first
    Background,
    /// Panel outlines
    Panel,
    /// Board outlines and board fills
    Board,
    /// Copper features, ordered by layer and then feature kind
    Copper {
        layer: CopperLayer,
        feature: CopperFeature,
    },
    /// Plated holes and vias, which pass through every copper layer
    PlatedHole,
    /// Non-plated holes and cutouts
    Drill,
    /// Solder mask overlay
    SolderMask,
    /// Solder paste, used by single-layer exports
    SolderPaste(Side),
    /// Silkscreen markings
    Silkscreen(Side),
    /// Fabrication notes and component annotations
    Fabrication,
    /// Dimension notes and net labels
    Annotation,
    /// Component courtyards
    Courtyard,
    /// Group border overlay
    GroupBorder,
    /// Anchor offset overlay
    AnchorOffset,
    /// Debug objects, grid and debug points
    Debug,
    /// Unrouted connection lines
    RatsNest,
    /// Error overlay - renders last
    Diagnostic,
}

impl RenderLayer {
    /// Returns the `data-layer` name for this layer.
    pub fn name(&self) -> Cow<'static, str> {
        match self {
            Self::Background => Cow::Borrowed("background"),
            Self::Panel => Cow::Borrowed("panel"),
            Self::Board => Cow::Borrowed("board"),
            Self::Copper { layer, .. } => Cow::Owned(format!("copper-{}", layer.name())),
            Self::PlatedHole => Cow::Borrowed("plated-hole"),
            Self::Drill => Cow::Borrowed("drill"),
            Self::SolderMask => Cow::Borrowed("solder-mask"),
            Self::SolderPaste(side) => Cow::Owned(format!("solder-paste-{side}")),
            Self::Silkscreen(side) => Cow::Owned(format!("silkscreen-{side}")),
            Self::Fabrication => Cow::Borrowed("fabrication"),
            Self::Annotation => Cow::Borrowed("annotation"),
            Self::Courtyard => Cow::Borrowed("courtyard"),
            Self::GroupBorder => Cow::Borrowed("group-border"),
            Self::AnchorOffset => Cow::Borrowed("anchor-offset"),
            Self::Debug => Cow::Borrowed("debug"),
            Self::RatsNest => Cow::Borrowed("rats-nest"),
            Self::Diagnostic => Cow::Borrowed("diagnostic"),
        }
    }

    /// The copper feature kind, emitted as `data-feature` on copper groups.
    pub fn feature(&self) -> Option<&'static str> {
        match self {
            Self::Copper { feature, .. } => Some(feature.name()),
            _ => None,
        }
    }
}

/// Represents SVG nodes grouped by rendering layer.
///
/// This struct collects SVG nodes and organizes them by layer. When rendered,
/// nodes are emitted in layer order (bottom to top), ensuring correct z-ordering.
/// Nodes on the same layer keep their insertion order.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    /// Creates a new empty `LayeredOutput`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single node to the specified layer.
    ///
    /// Nodes are appended to the layer in the order they are added.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Merges all layers from another `LayeredOutput` into this one.
    ///
    /// Nodes from the other output are appended after this output's nodes.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    /// Returns `true` if there are no nodes in any layer.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of collected nodes.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Number of nodes collected on `layer`.
    pub fn count(&self, layer: RenderLayer) -> usize {
        self.items.iter().filter(|(l, _)| *l == layer).count()
    }

    /// Renders all layers to SVG groups, consuming the output.
    ///
    /// Each contiguous run of one layer becomes an SVG `<g>` element with a
    /// `data-layer` attribute identifying the layer (and `data-feature` for
    /// copper). Layers are rendered from bottom to top based on the `Ord`
    /// implementation of `RenderLayer`.
    ///
    /// This method consumes the `LayeredOutput` to avoid cloning SVG nodes.
    ///
    /// # Returns
    ///
    /// A vector of SVG group nodes, one per non-empty layer, in rendering order.
    pub fn render(mut self) -> Vec<SvgNode> {
        if self.is_empty() {
            return Vec::new();
        }

        // Sort all items by layer - Stable sorting
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result = Vec::new();
        let mut current_layer = self.items[0].0;
        let mut current_group = layer_group(current_layer);

        for (layer, node) in self.items {
            if layer != current_layer {
                // Finish previous layer group
                result.push(Box::new(current_group) as SvgNode);

                // Start new layer group
                current_layer = layer;
                current_group = layer_group(layer);
            }

            current_group = current_group.add(node);
        }

        // Add final group
        result.push(Box::new(current_group) as SvgNode);

        result
    }
}

fn layer_group(layer: RenderLayer) -> svg_element::Group {
    let group = svg_element::Group::new().set("data-layer", layer.name().into_owned());
    match layer.feature() {
        Some(feature) => group.set("data-feature", feature),
        None => group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svg::node::element::Rectangle;

    fn copper(layer: CopperLayer, feature: CopperFeature) -> RenderLayer {
        RenderLayer::Copper { layer, feature }
    }

    fn render_to_string(output: LayeredOutput) -> String {
        output
            .render()
            .iter()
            .map(|node| node.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_layered_output_new() {
        let output = LayeredOutput::new();
        assert!(output.is_empty());
        assert_eq!(output.len(), 0);
    }

    #[test]
    fn test_layered_output_merge() {
        let mut output1 = LayeredOutput::new();
        output1.add_to_layer(RenderLayer::Board, Box::new(Rectangle::new()));

        let mut output2 = LayeredOutput::new();
        output2.add_to_layer(RenderLayer::Drill, Box::new(Rectangle::new()));

        output1.merge(output2);
        assert_eq!(output1.len(), 2);

        let nodes = output1.render();
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_layered_output_merge_same_layer() {
        let mut output1 = LayeredOutput::new();
        output1.add_to_layer(RenderLayer::Fabrication, Box::new(Rectangle::new()));

        let mut output2 = LayeredOutput::new();
        output2.add_to_layer(RenderLayer::Fabrication, Box::new(Rectangle::new()));

        output1.merge(output2);
        assert_eq!(output1.count(RenderLayer::Fabrication), 2);

        let nodes = output1.render();
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_render_layer_physical_order() {
        let ordered = [
            RenderLayer::Background,
            RenderLayer::Panel,
            RenderLayer::Board,
            copper(CopperLayer::Bottom, CopperFeature::Pour),
            copper(CopperLayer::Bottom, CopperFeature::Pad),
            copper(CopperLayer::Inner(1), CopperFeature::Trace),
            copper(CopperLayer::Inner(2), CopperFeature::Pour),
            copper(CopperLayer::Top, CopperFeature::Pour),
            copper(CopperLayer::Top, CopperFeature::Trace),
            copper(CopperLayer::Top, CopperFeature::Pad),
            RenderLayer::PlatedHole,
            RenderLayer::Drill,
            RenderLayer::SolderMask,
            RenderLayer::SolderPaste(Side::Top),
            RenderLayer::Silkscreen(Side::Bottom),
            RenderLayer::Silkscreen(Side::Top),
            RenderLayer::Fabrication,
            RenderLayer::Annotation,
            RenderLayer::Courtyard,
            RenderLayer::GroupBorder,
            RenderLayer::AnchorOffset,
            RenderLayer::Debug,
            RenderLayer::RatsNest,
            RenderLayer::Diagnostic,
        ];
        for window in ordered.windows(2) {
            assert!(window[0] < window[1], "{:?} < {:?}", window[0], window[1]);
        }
    }

    #[test]
    fn test_render_is_stable_within_layer() {
        let mut output = LayeredOutput::new();
        output.add_to_layer(
            copper(CopperLayer::Top, CopperFeature::Pad),
            Box::new(Rectangle::new().set("id", "first")),
        );
        output.add_to_layer(RenderLayer::Board, Box::new(Rectangle::new().set("id", "board")));
        output.add_to_layer(
            copper(CopperLayer::Top, CopperFeature::Pad),
            Box::new(Rectangle::new().set("id", "second")),
        );

        let rendered = render_to_string(output);
        let board = rendered.find("board").unwrap();
        let first = rendered.find("first").unwrap();
        let second = rendered.find("second").unwrap();
        assert!(board < first);
        assert!(first < second);
    }

    #[test]
    fn test_copper_group_attributes() {
        let mut output = LayeredOutput::new();
        output.add_to_layer(
            copper(CopperLayer::Inner(3), CopperFeature::Trace),
            Box::new(Rectangle::new()),
        );
        let rendered = render_to_string(output);
        assert!(rendered.contains(r#"data-layer="copper-inner3""#));
        assert!(rendered.contains(r#"data-feature="trace""#));
    }

    #[test]
    fn test_copper_layer_from_layer_ref() {
        assert_eq!(
            CopperLayer::from_layer_ref(&LayerRef::Inner(4)),
            Some(CopperLayer::Inner(4))
        );
        assert_eq!(
            CopperLayer::from_layer_ref(&LayerRef::Unknown("mech".to_string())),
            None
        );
    }
}
