use std::path::Path;

use anyhow::Context;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use tp_grid::NoiseGridSettings;
use tp_render::RenderSettings;

pub const DEFAULT_SETTINGS_PATH: &str = "assets/preview.ron";

#[derive(Debug, Clone, Default, PartialEq, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Fixed seed; a random one is drawn at startup when absent.
    pub seed: Option<f64>,
    pub noise: NoiseGridSettings,
    pub render: RenderSettings,
}

pub fn load_settings(path: impl AsRef<Path>) -> anyhow::Result<PreviewSettings> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let settings =
        ron::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(settings)
}

pub fn load_settings_or_default(path: impl AsRef<Path>) -> PreviewSettings {
    let path = path.as_ref();
    match load_settings(path) {
        Ok(settings) => {
            info!("loaded preview settings from {}", path.display());
            settings
        }
        Err(e) => {
            warn!("using default preview settings: {e:?}");
            PreviewSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use tp_render::RenderMode;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings: PreviewSettings = ron::from_str(
            "(seed: Some(12345.0), noise: (size: 64, fbm: (octaves: 6)), render: (mode: Isometric))",
        )
        .unwrap();

        assert_eq!(settings.seed, Some(12345.0));
        assert_eq!(settings.noise.size, 64);
        assert_eq!(settings.noise.zoom, NoiseGridSettings::default().zoom);
        assert_eq!(settings.noise.fbm.octaves, 6);
        assert_eq!(settings.noise.fbm.persistence, 0.5);
        assert_eq!(settings.render.mode, RenderMode::Isometric);
        assert_eq!(settings.render.palette, RenderSettings::default().palette);
    }

    #[test]
    fn bundled_settings_parse() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../", "assets/preview.ron");
        assert!(load_settings(path).is_ok());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_settings("does/not/exist.ron").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.ron"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        assert_eq!(
            load_settings_or_default("does/not/exist.ron"),
            PreviewSettings::default()
        );
    }
}
