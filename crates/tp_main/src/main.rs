mod controls;
mod preview;
mod settings;

use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_egui::EguiPlugin;

use crate::controls::ControlsPlugin;
use crate::preview::PreviewPlugin;
use crate::settings::{load_settings_or_default, DEFAULT_SETTINGS_PATH};

fn main() {
    let settings_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_owned());

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Terrain Preview".into(),
                    resolution: WindowResolution::new(1280., 800.),
                    ..default()
                }),
                ..default()
            })
            .set(ImagePlugin::default_nearest()),
    )
    .insert_resource(ClearColor(Color::rgb(0.08, 0.086, 0.118)))
    .add_plugins(EguiPlugin);

    // The log subscriber only exists once DefaultPlugins are built.
    let settings = load_settings_or_default(&settings_path);

    app.add_plugins((PreviewPlugin { settings }, ControlsPlugin))
        .run();
}
