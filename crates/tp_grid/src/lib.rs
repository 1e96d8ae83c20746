mod noise;

use std::ops::{Index, IndexMut};
use std::path::Path;

use anyhow::Context;
use bevy::prelude::*;
use bytemuck::cast_slice;
use rayon::prelude::*;

pub use crate::noise::{generate_noise_grid, NoiseGridSettings};

#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    size: UVec2,
    data: Box<[T]>,
}

impl<T> Grid<T> {
    pub fn new(size: UVec2, fill: T) -> Grid<T>
    where
        T: Clone,
    {
        assert!(size.x < i32::MAX as u32);
        assert!(size.y < i32::MAX as u32);

        Grid {
            size,
            data: vec![fill; (size.x as usize) * (size.y as usize)].into(),
        }
    }

    pub fn from_data(size: UVec2, data: impl Into<Box<[T]>>) -> Grid<T> {
        let data = data.into();
        assert_eq!(data.len(), (size.x as usize) * (size.y as usize));
        Grid { size, data }
    }

    pub fn from_fn(size: UVec2, f: impl FnMut(IVec2) -> T) -> Grid<T> {
        let data = (0..size.y as i32)
            .flat_map(move |y| (0..size.x as i32).map(move |x| IVec2::new(x, y)))
            .map(f)
            .collect::<Vec<T>>();
        Grid::from_data(size, data)
    }

    pub fn par_from_fn(size: UVec2, f: impl (Fn(IVec2) -> T) + Send + Sync) -> Grid<T>
    where
        T: Send,
    {
        let data = (0..(size.x as usize) * (size.y as usize))
            .into_par_iter()
            .map(move |idx| {
                let x = (idx % (size.x as usize)) as i32;
                let y = (idx / (size.x as usize)) as i32;
                IVec2::new(x, y)
            })
            .map(f)
            .collect::<Vec<T>>();
        Grid::from_data(size, data)
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn index(&self, cell: IVec2) -> usize {
        (cell.y as usize) * (self.size.x as usize) + (cell.x as usize)
    }

    pub fn contains_cell(&self, cell: IVec2) -> bool {
        (cell.x >= 0 && (cell.x as u32) < self.size.x)
            && (cell.y >= 0 && (cell.y as u32) < self.size.y)
    }

    pub fn get(&self, cell: IVec2) -> Option<&T> {
        if self.contains_cell(cell) {
            let index = self.index(cell);
            self.data.get(index)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, cell: IVec2) -> Option<&mut T> {
        if self.contains_cell(cell) {
            let index = self.index(cell);
            self.data.get_mut(index)
        } else {
            None
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = IVec2> {
        let size = self.size;
        (0..size.y as i32).flat_map(move |y| (0..size.x as i32).map(move |x| IVec2::new(x, y)))
    }

    pub fn par_cells(&self) -> impl IndexedParallelIterator<Item = IVec2> {
        let size = self.size;
        (0..(size.x as usize) * (size.y as usize))
            .into_par_iter()
            .map(move |idx| {
                let x = (idx % (size.x as usize)) as i32;
                let y = (idx / (size.x as usize)) as i32;
                IVec2::new(x, y)
            })
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    pub fn par_values(&self) -> impl IndexedParallelIterator<Item = &T>
    where
        T: Sync,
    {
        self.data.par_iter()
    }

    pub fn entries(&self) -> impl Iterator<Item = (IVec2, &T)> {
        self.cells().zip(self.values())
    }

    pub fn par_entries(&self) -> impl IndexedParallelIterator<Item = (IVec2, &T)>
    where
        T: Sync,
    {
        self.par_cells().zip(self.par_values())
    }

    pub fn par_map<U>(&self, f: impl Fn(IVec2, &T) -> U + Send + Sync) -> Grid<U>
    where
        T: Sync,
        U: Send,
    {
        let data = self
            .par_entries()
            .map(|(cell, value)| f(cell, value))
            .collect::<Vec<_>>();
        Grid::from_data(self.size, data)
    }
}

impl<T> Index<IVec2> for Grid<T> {
    type Output = T;

    fn index(&self, cell: IVec2) -> &Self::Output {
        self.get(cell).unwrap_or_else(|| panic_oob(cell, self.size))
    }
}

impl<T> IndexMut<IVec2> for Grid<T> {
    fn index_mut(&mut self, cell: IVec2) -> &mut Self::Output {
        let size = self.size;
        self.get_mut(cell).unwrap_or_else(|| panic_oob(cell, size))
    }
}

#[cold]
#[inline(never)]
fn panic_oob(cell: IVec2, size: UVec2) -> ! {
    panic!("cell {cell} is out of bounds of a {size} grid")
}

impl Grid<f64> {
    pub fn min_value(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_value(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Writes the grid as an 8-bit grayscale PNG, mapping `[-1, 1]` to `0..=255`.
    pub fn save_png(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let _scope = info_span!("save_png").entered();

        let path = path.as_ref();
        let data = self
            .data
            .iter()
            .map(|&v| ((v.clamp(-1.0, 1.0) * 0.5 + 0.5) * 255.0).round() as u8)
            .collect::<Vec<_>>();

        image::save_buffer(path, &data, self.size.x, self.size.y, image::ColorType::L8)
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

impl Grid<[u8; 4]> {
    pub fn save_png(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let _scope = info_span!("save_png").entered();

        let path = path.as_ref();
        image::save_buffer(
            path,
            cast_slice(&self.data),
            self.size.x,
            self.size.y,
            image::ColorType::Rgba8,
        )
        .with_context(|| format!("failed to write {}", path.display()))
    }
}
