use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use tp_noise::{Fbm, FbmSettings, Noise, NoiseField};

use crate::Grid;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseGridSettings {
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    #[serde(default)]
    pub fbm: FbmSettings,
}

fn default_size() -> u32 {
    128
}

fn default_zoom() -> f64 {
    0.05
}

impl Default for NoiseGridSettings {
    fn default() -> NoiseGridSettings {
        NoiseGridSettings {
            size: default_size(),
            zoom: default_zoom(),
            fbm: FbmSettings::default(),
        }
    }
}

/// Samples the fractal sum of `field` at every cell of a `size x size` grid,
/// with cell coordinates scaled by `zoom`.
pub fn generate_noise_grid(field: &NoiseField, settings: &NoiseGridSettings) -> Grid<f64> {
    let _scope = info_span!("generate_noise_grid").entered();

    let fbm = Fbm::new(field, settings.fbm);
    let zoom = settings.zoom;

    Grid::par_from_fn(UVec2::splat(settings.size), |cell| {
        fbm.get(cell.as_dvec2() * zoom)
    })
}
