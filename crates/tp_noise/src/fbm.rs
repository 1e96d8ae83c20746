use bevy::math::DVec2;
use serde::{Deserialize, Serialize};

use super::Noise;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct FbmSettings {
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_persistence")]
    pub persistence: f64,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f64,
}

fn default_octaves() -> u32 {
    4
}

fn default_persistence() -> f64 {
    0.5
}

fn default_lacunarity() -> f64 {
    2.0
}

impl Default for FbmSettings {
    fn default() -> FbmSettings {
        FbmSettings {
            octaves: default_octaves(),
            persistence: default_persistence(),
            lacunarity: default_lacunarity(),
        }
    }
}

/// Sums `settings.octaves` layers of `source`, normalized by the total amplitude.
///
/// Returns `0.0` when the amplitudes sum to zero (no octaves at all, or
/// persistence values that cancel out).
pub fn fractal_sum<S: Noise + ?Sized>(source: &S, pos: DVec2, settings: &FbmSettings) -> f64 {
    let mut total = 0.0;
    let mut total_amplitude = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;

    for _ in 0..settings.octaves {
        total += amplitude * source.get(pos * frequency);
        total_amplitude += amplitude;
        amplitude *= settings.persistence;
        frequency *= settings.lacunarity;
    }

    if total_amplitude == 0.0 {
        return 0.0;
    }

    total / total_amplitude
}

#[derive(Debug, Clone)]
pub struct Fbm<S> {
    source: S,
    settings: FbmSettings,
}

impl<S: Noise> Fbm<S> {
    pub fn new(source: S, settings: FbmSettings) -> Fbm<S> {
        Fbm { source, settings }
    }
}

impl<S: Noise> Noise for Fbm<S> {
    fn get(&self, pos: DVec2) -> f64 {
        fractal_sum(&self.source, pos, &self.settings)
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use super::*;
    use crate::NoiseField;

    #[test]
    fn single_octave_is_plain_sample() {
        let field = NoiseField::new(12345.0);
        let mut rng = Pcg32::seed_from_u64(4);

        for _ in 0..1000 {
            let x = rng.gen_range(-100.0..100.0);
            let y = rng.gen_range(-100.0..100.0);
            let persistence = rng.gen_range(-3.0..3.0);
            let lacunarity = rng.gen_range(-3.0..5.0);
            assert_eq!(
                field.fractal_sample(x, y, 1, persistence, lacunarity),
                field.sample(x, y)
            );
        }
    }

    #[test]
    fn fractal_sum_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(5);

        for seed in [3.0, 99.0, 12345.0] {
            let field = NoiseField::new(seed);
            for _ in 0..5000 {
                let x = rng.gen_range(-200.0..200.0);
                let y = rng.gen_range(-200.0..200.0);
                let octaves = rng.gen_range(1..=10);
                let persistence = rng.gen_range(0.01..0.99);
                let lacunarity = rng.gen_range(1.0..4.0);
                let v = field.fractal_sample(x, y, octaves, persistence, lacunarity);
                assert!((-1.0..=1.0).contains(&v), "fbm({x}, {y}) = {v}");
            }
        }
    }

    #[test]
    fn zero_amplitude_sum_is_zero() {
        let field = NoiseField::new(8.0);
        assert_eq!(field.fractal_sample(0.3, 0.7, 0, 0.5, 2.0), 0.0);
        assert_eq!(field.fractal_sample(0.3, 0.7, 2, -1.0, 2.0), 0.0);
    }

    #[test]
    fn wrapper_matches_fractal_sample() {
        let field = NoiseField::new(2024.0);
        let settings = FbmSettings {
            octaves: 5,
            persistence: 0.6,
            lacunarity: 2.2,
        };
        let fbm = Fbm::new(&field, settings);

        let pos = DVec2::new(13.37, -4.2);
        assert_eq!(fbm.get(pos), field.fractal_sample(pos.x, pos.y, 5, 0.6, 2.2));
    }

    #[test]
    fn settings_fill_missing_fields() {
        let settings: FbmSettings = ron::from_str("(octaves: 6)").unwrap();
        assert_eq!(settings.octaves, 6);
        assert_eq!(settings.persistence, 0.5);
        assert_eq!(settings.lacunarity, 2.0);
    }
}
