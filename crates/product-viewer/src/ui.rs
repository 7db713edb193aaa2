//! Screen-space overlay: hotspot labels and the HUD line.

use crate::hotspot::HotspotSet;

/// Draws one clickable label per hotspot at its projected screen position
/// and returns the indices of the hotspots clicked this frame.
///
/// `screen_pos` is in physical pixels; egui works in logical points, so the
/// position is rescaled by the current pixels-per-point factor.
pub fn draw_hotspots(ctx: &egui::Context, hotspots: &HotspotSet) -> Vec<usize> {
    let ppp = ctx.pixels_per_point();
    let mut clicked = Vec::new();

    for (index, hotspot) in hotspots.iter().enumerate() {
        let pos = egui::pos2(hotspot.screen_pos.x / ppp, hotspot.screen_pos.y / ppp);

        let response = egui::Area::new(egui::Id::new(("hotspot", index)))
            .fixed_pos(pos)
            .pivot(egui::Align2::CENTER_CENTER)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                ui.add(
                    egui::Button::new(
                        egui::RichText::new(&hotspot.label).color(egui::Color32::WHITE),
                    )
                    .fill(egui::Color32::from_black_alpha(160))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::from_white_alpha(96)))
                    .rounding(egui::Rounding::same(6.0)),
                )
            });

        if response.inner.clicked() {
            clicked.push(index);
        }
    }

    clicked
}

/// One informational line in the corner: which model is shown and how many
/// hotspots it carries.
pub fn draw_hud(ctx: &egui::Context, model_name: &str, hotspot_count: usize) {
    egui::Area::new(egui::Id::new("hud"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(12.0, -12.0))
        .order(egui::Order::Background)
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(format!("{model_name} · {hotspot_count} hotspots"))
                    .color(egui::Color32::from_white_alpha(140))
                    .small(),
            );
        });
}
