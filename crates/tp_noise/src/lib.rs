mod fbm;
mod perlin;

use bevy::math::DVec2;

pub use crate::fbm::{fractal_sum, Fbm, FbmSettings};
pub use crate::perlin::NoiseField;

pub trait Noise {
    fn get(&self, pos: DVec2) -> f64;
}

impl<N: Noise + ?Sized> Noise for &N {
    fn get(&self, pos: DVec2) -> f64 {
        (**self).get(pos)
    }
}
