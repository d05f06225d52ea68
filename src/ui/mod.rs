pub mod graphs;

use crate::effect::Census;
use crate::stats::SkyStats;

/// Overlay visibility and the pause switch it controls.
#[derive(Default)]
pub struct UiState {
    pub show_overlay: bool,
    pub paused: bool,
}

/// Per-frame facts the overlay displays.
pub struct OverlayInfo<'a> {
    pub fps: i32,
    pub ticks: u64,
    pub tier: &'static str,
    pub census: &'a [(&'static str, Census)],
}

/// Draw the debug overlay (if open) and flush egui.
pub fn draw_ui(ui_state: &mut UiState, info: &OverlayInfo<'_>, stats: &SkyStats) {
    egui_macroquad::ui(|ctx| {
        if !ui_state.show_overlay {
            return;
        }
        egui::Window::new("Sky")
            .default_pos(egui::pos2(12.0, 12.0))
            .default_size(egui::vec2(260.0, 320.0))
            .resizable(true)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(format!("FPS {}", info.fps));
                    ui.separator();
                    ui.label(format!("tick {}", info.ticks));
                    ui.separator();
                    ui.label(format!("tier {}", info.tier));
                });
                let pause_label = if ui_state.paused { "Resume" } else { "Pause" };
                if ui.button(pause_label).clicked() {
                    ui_state.paused = !ui_state.paused;
                }

                ui.separator();
                egui::Grid::new("census").striped(true).show(ui, |ui| {
                    ui.strong("layer");
                    ui.strong("units");
                    ui.strong("fragments");
                    ui.end_row();
                    for (layer, census) in info.census {
                        ui.label(*layer);
                        ui.label(census.units.to_string());
                        ui.label(census.fragments.to_string());
                        ui.end_row();
                    }
                });

                ui.separator();
                graphs::draw_graphs(ui, stats);
            });
    });

    egui_macroquad::draw();
}
