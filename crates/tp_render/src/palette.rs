use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub value: f64,
    pub color: [u8; 3],
}

/// Piecewise-linear color ramp over noise values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Sorted by `value`.
    pub stops: Vec<ColorStop>,
    /// Background, and the color of cells below the threshold.
    pub empty: [u8; 3],
}

impl Default for Palette {
    fn default() -> Palette {
        let stop = |value, color| ColorStop { value, color };
        Palette {
            stops: vec![
                stop(-1.0, [18, 40, 92]),
                stop(-0.2, [42, 96, 170]),
                stop(0.0, [214, 200, 140]),
                stop(0.08, [96, 160, 72]),
                stop(0.35, [46, 104, 52]),
                stop(0.6, [118, 108, 98]),
                stop(0.8, [240, 240, 246]),
            ],
            empty: [20, 22, 30],
        }
    }
}

impl Palette {
    pub fn color(&self, value: f64) -> [u8; 3] {
        let Some(first) = self.stops.first() else {
            return self.empty;
        };

        if value.is_nan() || value <= first.value {
            return first.color;
        }

        for pair in self.stops.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if value <= hi.value {
                let span = hi.value - lo.value;
                let t = if span > 0.0 { (value - lo.value) / span } else { 1.0 };
                return mix(lo.color, hi.color, t);
            }
        }

        self.stops[self.stops.len() - 1].color
    }
}

fn mix(a: [u8; 3], b: [u8; 3], t: f64) -> [u8; 3] {
    std::array::from_fn(|i| (a[i] as f64 + (b[i] as f64 - a[i] as f64) * t).round() as u8)
}

/// Scales a color towards black; `factor` is clamped to `[0, 1]`.
pub(crate) fn shade(color: [u8; 3], factor: f32) -> [u8; 3] {
    let factor = factor.clamp(0.0, 1.0);
    color.map(|c| (c as f32 * factor).round() as u8)
}
