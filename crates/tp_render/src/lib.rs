mod flat;
mod iso;
mod palette;

use serde::{Deserialize, Serialize};
use tp_grid::Grid;

pub use crate::flat::render_flat;
pub use crate::iso::render_isometric;
pub use crate::palette::{ColorStop, Palette};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    #[default]
    Flat,
    Isometric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(default)]
    pub mode: RenderMode,
    /// Pixels per grid cell (tile half-width in isometric mode).
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,
    /// Cells below this value are drawn as empty.
    #[serde(default)]
    pub threshold: f64,
    /// Height in pixels of a full-value prism in isometric mode.
    #[serde(default = "default_tile_height")]
    pub tile_height: f32,
    #[serde(default)]
    pub palette: Palette,
}

fn default_cell_size() -> u32 {
    4
}

fn default_tile_height() -> f32 {
    24.0
}

impl Default for RenderSettings {
    fn default() -> RenderSettings {
        RenderSettings {
            mode: RenderMode::default(),
            cell_size: default_cell_size(),
            threshold: 0.0,
            tile_height: default_tile_height(),
            palette: Palette::default(),
        }
    }
}

pub fn render(grid: &Grid<f64>, settings: &RenderSettings) -> Grid<[u8; 4]> {
    match settings.mode {
        RenderMode::Flat => render_flat(grid, settings),
        RenderMode::Isometric => render_isometric(grid, settings),
    }
}

#[cfg(test)]
mod tests {
    use bevy::prelude::UVec2;
    use tp_grid::{generate_noise_grid, NoiseGridSettings};
    use tp_noise::NoiseField;

    use super::*;

    #[test]
    fn dispatches_on_mode() {
        let grid = generate_noise_grid(
            &NoiseField::new(1.0),
            &NoiseGridSettings {
                size: 8,
                ..NoiseGridSettings::default()
            },
        );

        let mut settings = RenderSettings::default();
        assert_eq!(render(&grid, &settings), render_flat(&grid, &settings));

        settings.mode = RenderMode::Isometric;
        let iso = render(&grid, &settings);
        assert_eq!(iso, render_isometric(&grid, &settings));
        assert_ne!(iso.size(), UVec2::splat(8 * settings.cell_size));
    }
}
