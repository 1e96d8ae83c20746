use bevy::prelude::*;
use raqote::{AntialiasMode, DrawOptions, DrawTarget, PathBuilder, SolidSource, Source};
use tp_grid::Grid;

use crate::palette::shade;
use crate::RenderSettings;

const LEFT_SHADE: f32 = 0.75;
const RIGHT_SHADE: f32 = 0.55;

/// Isometric view: solid cells become prisms whose height follows the noise
/// value above the threshold, empty cells are left as background.
pub fn render_isometric(grid: &Grid<f64>, settings: &RenderSettings) -> Grid<[u8; 4]> {
    let _scope = info_span!("render_isometric").entered();

    let size = grid.size();
    let half_width = settings.cell_size.max(1) as f32;
    let half_height = half_width / 2.0;
    let rise = settings.tile_height.max(0.0);

    let width = (size.x + size.y) as f32 * half_width;
    let height = (size.x + size.y) as f32 * half_height + rise;
    let image_size = UVec2::new(width.ceil() as u32, height.ceil() as u32).max(UVec2::ONE);

    let mut target = DrawTarget::new(image_size.x as i32, image_size.y as i32);
    target.clear(solid(settings.palette.empty));

    let span = (1.0 - settings.threshold).max(f64::EPSILON);

    // Row-major order already paints back to front: cells that can overlap a
    // prism on screen always come later.
    for (cell, &value) in grid.entries() {
        if value.is_nan() || value < settings.threshold {
            continue;
        }

        let elevation = ((value - settings.threshold) / span).clamp(0.0, 1.0) as f32 * rise;
        let center = Vec2::new(
            (cell.x - cell.y + size.y as i32) as f32 * half_width,
            (cell.x + cell.y + 1) as f32 * half_height + rise,
        );

        let color = settings.palette.color(value);
        let tile = Tile {
            center,
            half_width,
            half_height,
        };

        tile.draw_side(&mut target, elevation, -1.0, shade(color, LEFT_SHADE));
        tile.draw_side(&mut target, elevation, 1.0, shade(color, RIGHT_SHADE));
        tile.draw_top(&mut target, elevation, color);
    }

    let data = target
        .get_data()
        .iter()
        .map(|&v| [(v >> 16) as u8, (v >> 8) as u8, v as u8, (v >> 24) as u8])
        .collect::<Vec<_>>();

    Grid::from_data(image_size, data)
}

struct Tile {
    center: Vec2,
    half_width: f32,
    half_height: f32,
}

impl Tile {
    fn draw_top(&self, target: &mut DrawTarget, elevation: f32, color: [u8; 3]) {
        let c = self.center - Vec2::Y * elevation;
        fill(
            target,
            &[
                c - Vec2::Y * self.half_height,
                c + Vec2::X * self.half_width,
                c + Vec2::Y * self.half_height,
                c - Vec2::X * self.half_width,
            ],
            color,
        );
    }

    /// `side` is -1 for the left face and 1 for the right face.
    fn draw_side(&self, target: &mut DrawTarget, elevation: f32, side: f32, color: [u8; 3]) {
        if elevation <= 0.0 {
            return;
        }

        let bottom = self.center + Vec2::Y * self.half_height;
        let outer = self.center + Vec2::X * self.half_width * side;
        let lift = Vec2::Y * elevation;

        fill(target, &[outer - lift, bottom - lift, bottom, outer], color);
    }
}

fn fill(target: &mut DrawTarget, points: &[Vec2], color: [u8; 3]) {
    let mut path = PathBuilder::new();
    path.move_to(points[0].x, points[0].y);
    for point in &points[1..] {
        path.line_to(point.x, point.y);
    }
    path.close();

    target.fill(
        &path.finish(),
        &Source::Solid(solid(color)),
        &DrawOptions {
            antialias: AntialiasMode::None,
            ..default()
        },
    );
}

fn solid([r, g, b]: [u8; 3]) -> SolidSource {
    SolidSource { r, g, b, a: 255 }
}
