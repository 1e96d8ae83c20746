use bevy::prelude::*;
use tp_grid::Grid;

use crate::RenderSettings;

/// Top-down view: every cell becomes a `cell_size` square.
pub fn render_flat(grid: &Grid<f64>, settings: &RenderSettings) -> Grid<[u8; 4]> {
    let _scope = info_span!("render_flat").entered();

    let cell_size = settings.cell_size.max(1);
    let colors = grid.par_map(|_, &value| {
        let [r, g, b] = if value >= settings.threshold {
            settings.palette.color(value)
        } else {
            settings.palette.empty
        };
        [r, g, b, 255]
    });

    Grid::par_from_fn(grid.size() * cell_size, |pixel| {
        colors[pixel / cell_size as i32]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> RenderSettings {
        RenderSettings {
            cell_size: 3,
            threshold: 0.1,
            ..RenderSettings::default()
        }
    }

    #[test]
    fn cells_become_squares() {
        let grid = Grid::from_fn(UVec2::new(2, 2), |cell| if cell.x == 0 { 0.5 } else { -0.5 });
        let settings = settings();
        let image = render_flat(&grid, &settings);

        assert_eq!(image.size(), UVec2::new(6, 6));

        let [r, g, b] = settings.palette.color(0.5);
        for y in 0..6 {
            for x in 0..3 {
                assert_eq!(image[IVec2::new(x, y)], [r, g, b, 255]);
            }
        }
    }

    #[test]
    fn below_threshold_is_empty() {
        let grid = Grid::new(UVec2::new(1, 1), 0.05);
        let settings = settings();
        let image = render_flat(&grid, &settings);

        let [r, g, b] = settings.palette.empty;
        assert!(image.values().all(|&px| px == [r, g, b, 255]));
    }
}
