use bevy::math::DVec2;
use rand::Rng;

use super::{fractal_sum, FbmSettings, Noise};

const TABLE_SIZE: usize = 512;

const LCG_MULTIPLIER: i64 = 16807;
const LCG_MODULUS: i64 = 2147483647;

const GRADIENTS: [DVec2; 8] = [
    DVec2::new(1.0, 1.0),
    DVec2::new(-1.0, 1.0),
    DVec2::new(1.0, -1.0),
    DVec2::new(-1.0, -1.0),
    DVec2::new(1.0, 0.0),
    DVec2::new(-1.0, 0.0),
    DVec2::new(0.0, 1.0),
    DVec2::new(0.0, -1.0),
];

/// Seeded 2D gradient noise.
///
/// Both tables are stored twice over (slot `i` and `i + 256` agree), so corner
/// hashing never has to wrap an index.
#[derive(Debug, Clone)]
pub struct NoiseField {
    seed: f64,
    perm: Box<[u8; TABLE_SIZE]>,
    grads: Box<[DVec2; TABLE_SIZE]>,
}

impl NoiseField {
    pub fn new(seed: f64) -> NoiseField {
        let perm = shuffled_permutation(seed);
        let perm: [u8; TABLE_SIZE] = std::array::from_fn(|i| perm[i & 255]);
        let grads = perm.map(|v| GRADIENTS[(v % 8) as usize]);

        NoiseField {
            seed,
            perm: Box::new(perm),
            grads: Box::new(grads),
        }
    }

    /// Seeds the field with a value drawn from `rng` in `[0, 1)`.
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> NoiseField {
        NoiseField::new(rng.gen::<f64>())
    }

    /// Seeds the field from the thread-local entropy source.
    pub fn from_entropy() -> NoiseField {
        NoiseField::from_rng(&mut rand::thread_rng())
    }

    /// Rebuilds both tables from `value`, discarding the previous ones.
    pub fn seed(&mut self, value: f64) {
        *self = NoiseField::new(value);
    }

    pub fn current_seed(&self) -> f64 {
        self.seed
    }

    pub fn permutation(&self) -> &[u8; TABLE_SIZE] {
        &self.perm
    }

    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let xi = ((x0 as i64) & 255) as usize;
        let yi = ((y0 as i64) & 255) as usize;
        let fx = x - x0;
        let fy = y - y0;

        let p0 = self.perm[yi] as usize;
        let p1 = self.perm[yi + 1] as usize;

        let n00 = self.grads[xi + p0].dot(DVec2::new(fx, fy));
        let n01 = self.grads[xi + p1].dot(DVec2::new(fx, fy - 1.0));
        let n10 = self.grads[xi + 1 + p0].dot(DVec2::new(fx - 1.0, fy));
        let n11 = self.grads[xi + 1 + p1].dot(DVec2::new(fx - 1.0, fy - 1.0));

        let u = fade(fx);
        lerp(lerp(n00, n10, u), lerp(n01, n11, u), fade(fy))
    }

    pub fn fractal_sample(
        &self,
        x: f64,
        y: f64,
        octaves: u32,
        persistence: f64,
        lacunarity: f64,
    ) -> f64 {
        let settings = FbmSettings {
            octaves,
            persistence,
            lacunarity,
        };

        fractal_sum(self, DVec2::new(x, y), &settings)
    }
}

impl Default for NoiseField {
    fn default() -> NoiseField {
        NoiseField::from_entropy()
    }
}

impl Noise for NoiseField {
    fn get(&self, pos: DVec2) -> f64 {
        self.sample(pos.x, pos.y)
    }
}

fn shuffled_permutation(seed: f64) -> [u8; 256] {
    // Unit-interval seeds would all floor to zero.
    let seed = if seed > 0.0 && seed < 1.0 {
        seed * 65536.0
    } else {
        seed
    };

    let mut seed = seed.floor() as i64;
    if seed < 256 {
        seed |= seed << 8;
    }

    let mut state = seed.rem_euclid(LCG_MODULUS);
    let mut perm: [u8; 256] = std::array::from_fn(|i| i as u8);

    for i in (1..256).rev() {
        state = (state * LCG_MULTIPLIER) % LCG_MODULUS;
        let r = ((state as f64 / LCG_MODULUS as f64) * (i + 1) as f64).floor() as usize;
        perm.swap(i, r);
    }

    perm
}

#[inline(always)]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline(always)]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}
