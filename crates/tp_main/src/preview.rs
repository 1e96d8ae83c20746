use std::path::{Path, PathBuf};

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::PrimaryWindow;
use bytemuck::cast_slice;
use tp_grid::{generate_noise_grid, Grid};
use tp_noise::NoiseField;
use tp_render::render;

use crate::controls::PANEL_WIDTH;
use crate::settings::PreviewSettings;

pub struct PreviewPlugin {
    pub settings: PreviewSettings,
}

impl Plugin for PreviewPlugin {
    fn build(&self, app: &mut App) {
        let field = match self.settings.seed {
            Some(seed) => NoiseField::new(seed),
            None => NoiseField::from_entropy(),
        };

        info!("noise field seeded with {}", field.current_seed());

        app.insert_resource(self.settings.clone())
            .insert_resource(TerrainNoise(field))
            .add_systems(Startup, setup)
            .add_systems(
                Update,
                (
                    handle_input,
                    redraw_preview.after(handle_input),
                    fit_to_window.after(redraw_preview),
                ),
            );
    }
}

#[derive(Resource)]
pub struct TerrainNoise(pub NoiseField);

impl TerrainNoise {
    pub fn randomize(&mut self) {
        self.0.seed(rand::random::<f64>());
        info!("noise field reseeded with {}", self.0.current_seed());
    }
}

#[derive(Resource)]
struct PreviewTexture(Handle<Image>);

#[derive(Component)]
struct PreviewSprite;

fn setup(mut commands: Commands, mut images: ResMut<Assets<Image>>) {
    let handle = images.add(to_image(&Grid::new(UVec2::ONE, [0, 0, 0, 255])));

    commands.spawn(Camera2dBundle {
        tonemapping: Tonemapping::None,
        ..default()
    });
    commands.spawn((
        SpriteBundle {
            texture: handle.clone(),
            ..default()
        },
        PreviewSprite,
    ));
    commands.insert_resource(PreviewTexture(handle));
}

fn handle_input(
    input: Res<Input<KeyCode>>,
    settings: Res<PreviewSettings>,
    mut noise: ResMut<TerrainNoise>,
) {
    if input.just_pressed(KeyCode::R) {
        noise.randomize();
    }

    if input.just_pressed(KeyCode::P) {
        match export_preview(&settings, &noise.0, Path::new(".")) {
            Ok(path) => info!("exported preview to {}", path.display()),
            Err(e) => error!("failed to export preview: {e:?}"),
        }
    }

    if input.just_pressed(KeyCode::H) {
        match export_heightmap(&settings, &noise.0, Path::new(".")) {
            Ok(path) => info!("exported heightmap to {}", path.display()),
            Err(e) => error!("failed to export heightmap: {e:?}"),
        }
    }
}

fn render_preview(settings: &PreviewSettings, field: &NoiseField) -> Grid<[u8; 4]> {
    let grid = generate_noise_grid(field, &settings.noise);
    render(&grid, &settings.render)
}

fn export_preview(
    settings: &PreviewSettings,
    field: &NoiseField,
    dir: &Path,
) -> anyhow::Result<PathBuf> {
    let _scope = info_span!("export_preview").entered();

    let path = dir.join(format!("terrain_{}.png", field.current_seed()));
    render_preview(settings, field).save_png(&path)?;
    Ok(path)
}

fn export_heightmap(
    settings: &PreviewSettings,
    field: &NoiseField,
    dir: &Path,
) -> anyhow::Result<PathBuf> {
    let _scope = info_span!("export_heightmap").entered();

    let grid = generate_noise_grid(field, &settings.noise);
    info!(
        "heightmap values span [{:.3}, {:.3}]",
        grid.min_value(),
        grid.max_value()
    );

    let path = dir.join(format!("heightmap_{}.png", field.current_seed()));
    grid.save_png(&path)?;
    Ok(path)
}

fn redraw_preview(
    settings: Res<PreviewSettings>,
    noise: Res<TerrainNoise>,
    texture: Option<Res<PreviewTexture>>,
    mut images: ResMut<Assets<Image>>,
) {
    let Some(texture) = texture else { return };

    if !settings.is_changed() && !noise.is_changed() && !texture.is_added() {
        return;
    }

    let _scope = info_span!("redraw_preview").entered();

    let pixels = render_preview(&settings, &noise.0);
    let Some(image) = images.get_mut(&texture.0) else { return };
    *image = to_image(&pixels);
}

fn fit_to_window(
    q_window: Query<&Window, With<PrimaryWindow>>,
    texture: Option<Res<PreviewTexture>>,
    images: Res<Assets<Image>>,
    mut q_sprite: Query<&mut Transform, With<PreviewSprite>>,
) {
    let Some(texture) = texture else { return };
    let Ok(window) = q_window.get_single() else { return };
    let Some(image) = images.get(&texture.0) else { return };
    let Ok(mut transform) = q_sprite.get_single_mut() else { return };

    let available = Vec2::new((window.width() - PANEL_WIDTH).max(1.0), window.height());
    let scale = (available / image.size()).min_element() * 0.95;

    transform.scale = Vec3::new(scale, scale, 1.0);
    transform.translation.x = PANEL_WIDTH / 2.0;
}

fn to_image(pixels: &Grid<[u8; 4]>) -> Image {
    let size = pixels.size();
    Image::new(
        Extent3d {
            width: size.x,
            height: size.y,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        cast_slice(pixels.data()).to_vec(),
        TextureFormat::Rgba8UnormSrgb,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_matches_pixels() {
        let pixels = Grid::from_fn(UVec2::new(3, 2), |cell| [cell.x as u8, cell.y as u8, 7, 255]);
        let image = to_image(&pixels);

        assert_eq!(image.size(), Vec2::new(3.0, 2.0));
        assert_eq!(image.data.len(), 3 * 2 * 4);
        assert_eq!(&image.data[4..8], &[1, 0, 7, 255]);
    }

    #[test]
    fn preview_follows_settings() {
        let field = NoiseField::new(12345.0);
        let mut settings = PreviewSettings::default();
        settings.noise.size = 16;

        let flat = render_preview(&settings, &field);
        assert_eq!(flat.size(), UVec2::splat(16 * settings.render.cell_size));

        settings.noise.fbm.octaves = 1;
        assert_ne!(render_preview(&settings, &field), flat);
    }

    #[test]
    fn exports_name_files_after_the_seed() {
        let field = NoiseField::new(321.0);
        let mut settings = PreviewSettings::default();
        settings.noise.size = 8;

        let dir = std::env::temp_dir().join(format!("tp_main_export_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let preview = export_preview(&settings, &field, &dir).unwrap();
        assert_eq!(preview, dir.join("terrain_321.png"));
        assert!(preview.is_file());

        let heightmap = export_heightmap(&settings, &field, &dir).unwrap();
        assert_eq!(heightmap, dir.join("heightmap_321.png"));
        assert!(heightmap.is_file());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_to_missing_directory_fails() {
        let field = NoiseField::new(1.0);
        let mut settings = PreviewSettings::default();
        settings.noise.size = 4;

        let dir = Path::new("/nonexistent/tp_main");
        assert!(export_preview(&settings, &field, dir).is_err());
        assert!(export_heightmap(&settings, &field, dir).is_err());
    }
}
