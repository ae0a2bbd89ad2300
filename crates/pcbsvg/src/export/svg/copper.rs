//! Copper features: pads, plated holes, vias, traces, pours and paste.

use log::{trace, warn};

use pcbsvg_core::{
    draw::{CopperFeature, CopperLayer, LayeredOutput, RenderLayer},
    element::{
        CopperPour, LayerRef, PlatedHole, PlatedHoleGeometry, Side, SmtPad, SolderPaste, Trace,
        Via,
    },
};

use super::{Svg, tag};

fn copper_layer(layer: &LayerRef, data_type: &str) -> Option<CopperLayer> {
    let copper = CopperLayer::from_layer_ref(layer);
    if copper.is_none() {
        warn!(data_type = data_type, layer:? = layer; "Skipping copper on unknown layer");
    }
    copper
}

impl Svg<'_> {
    pub(super) fn render_smtpad(&mut self, pad: &SmtPad) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let Some(layer) = copper_layer(&pad.layer, "pcb_smtpad") else {
            return output;
        };
        let Some(shape) = pad.shape() else {
            trace!(pcb_smtpad_id:? = pad.pcb_smtpad_id; "Skipping pad without geometry");
            return output;
        };

        let path = self
            .fill_path(&shape, self.palette.copper(layer))
            .set("class", "pcb-pad");
        output.add_to_layer(
            RenderLayer::Copper {
                layer,
                feature: CopperFeature::Pad,
            },
            Box::new(tag(path, "pcb_smtpad", Some(layer.name().as_ref()))),
        );
        output
    }

    pub(super) fn render_plated_hole(&mut self, hole: &PlatedHole) -> LayeredOutput {
        match hole.geometry() {
            Some(geometry) => self.render_through_feature(&geometry, "pcb_plated_hole"),
            None => {
                trace!(
                    pcb_plated_hole_id:? = hole.pcb_plated_hole_id;
                    "Skipping plated hole without geometry"
                );
                LayeredOutput::new()
            }
        }
    }

    pub(super) fn render_via(&mut self, via: &Via) -> LayeredOutput {
        match via.geometry() {
            Some(geometry) => self.render_through_feature(&geometry, "pcb_via"),
            None => LayeredOutput::new(),
        }
    }

    /// Copper annulus with its drill drawn on top.
    fn render_through_feature(
        &self,
        geometry: &PlatedHoleGeometry,
        data_type: &str,
    ) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        let pad = self.fill_path(&geometry.pad, self.palette.copper(CopperLayer::Top));
        output.add_to_layer(
            RenderLayer::PlatedHole,
            Box::new(tag(pad, data_type, Some("top"))),
        );

        if let Some(hole) = &geometry.hole {
            let drill = self
                .fill_path(hole, self.palette.drill())
                .set("class", "pcb-hole-inner");
            output.add_to_layer(
                RenderLayer::PlatedHole,
                Box::new(tag(drill, data_type, Some("drill"))),
            );
        }
        output
    }

    /// One stroked path per segment, on the segment's own layer.
    pub(super) fn render_trace(&mut self, trace: &Trace) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        for segment in trace.segments() {
            let Some(layer) = copper_layer(segment.layer, "pcb_trace") else {
                continue;
            };
            let stroke = self.rounded_stroke(self.palette.copper(layer), segment.width);
            let path = self
                .stroke_path(&[segment.start, segment.end], &stroke)
                .set("class", "pcb-trace");
            output.add_to_layer(
                RenderLayer::Copper {
                    layer,
                    feature: CopperFeature::Trace,
                },
                Box::new(tag(path, "pcb_trace", Some(layer.name().as_ref()))),
            );
        }
        output
    }

    pub(super) fn render_copper_pour(&mut self, pour: &CopperPour) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let Some(layer) = copper_layer(&pour.layer, "pcb_copper_pour") else {
            return output;
        };
        let Some(shape) = pour.shape() else {
            trace!(
                pcb_copper_pour_id:? = pour.pcb_copper_pour_id;
                "Skipping pour without geometry"
            );
            return output;
        };

        let fill = pour
            .fill_pattern
            .as_ref()
            .and_then(|pattern| self.pattern_fill(pattern))
            .unwrap_or_else(|| self.palette.copper(layer).to_string());
        let path = self.fill_path(&shape, fill).set("class", "pcb-copper-pour");
        output.add_to_layer(
            RenderLayer::Copper {
                layer,
                feature: CopperFeature::Pour,
            },
            Box::new(tag(path, "pcb_copper_pour", Some(layer.name().as_ref()))),
        );
        output
    }

    pub(super) fn render_solder_paste(&mut self, paste: &SolderPaste, side: Side) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let Some(shape) = paste.shape() else {
            return output;
        };

        let path = self.fill_path(&shape, self.palette.solder_paste());
        output.add_to_layer(
            RenderLayer::SolderPaste(side),
            Box::new(tag(path, "pcb_solder_paste", Some(side.name()))),
        );
        output
    }
}
