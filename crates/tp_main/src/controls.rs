use bevy::prelude::*;
use bevy_egui::egui::{self, Slider};
use bevy_egui::EguiContexts;
use tp_render::RenderMode;

use crate::preview::TerrainNoise;
use crate::settings::PreviewSettings;

pub const PANEL_WIDTH: f32 = 260.0;

pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, ui_controls);
    }
}

fn ui_controls(
    mut contexts: EguiContexts,
    mut settings: ResMut<PreviewSettings>,
    mut noise: ResMut<TerrainNoise>,
) {
    // Edit a copy so that change detection only fires on real edits.
    let mut draft = settings.clone();
    let mut randomize = false;

    egui::SidePanel::left("controls")
        .exact_width(PANEL_WIDTH)
        .resizable(false)
        .show(contexts.ctx_mut(), |ui| {
            ui.heading("Noise");
            ui.add(Slider::new(&mut draft.noise.size, 8..=256).text("size"));
            ui.add(
                Slider::new(&mut draft.noise.zoom, 0.005..=0.5)
                    .logarithmic(true)
                    .text("zoom"),
            );
            ui.add(Slider::new(&mut draft.noise.fbm.octaves, 1..=10).text("octaves"));
            ui.add(Slider::new(&mut draft.noise.fbm.persistence, 0.05..=1.0).text("persistence"));
            ui.add(Slider::new(&mut draft.noise.fbm.lacunarity, 1.0..=4.0).text("lacunarity"));

            ui.separator();
            ui.heading("View");
            ui.horizontal(|ui| {
                ui.selectable_value(&mut draft.render.mode, RenderMode::Flat, "Flat");
                ui.selectable_value(&mut draft.render.mode, RenderMode::Isometric, "Isometric");
            });
            ui.add(Slider::new(&mut draft.render.threshold, -1.0..=1.0).text("threshold"));
            ui.add(Slider::new(&mut draft.render.cell_size, 1..=16).text("cell size"));
            ui.add(Slider::new(&mut draft.render.tile_height, 0.0..=96.0).text("tile height"));

            ui.separator();
            ui.label(format!("seed: {}", noise.0.current_seed()));
            if ui.button("Randomize").clicked() {
                randomize = true;
            }
            ui.label("R: randomize, P: export PNG, H: export heightmap");
        });

    if *settings != draft {
        *settings = draft;
    }

    if randomize {
        noise.randomize();
    }
}
