//! Generic grid for per-tile data

use crate::core::types::Vec2;

/// Dense 2D grid anchored at the world origin
#[derive(Debug, Clone)]
pub struct Grid<T: Clone + Default> {
    pub width: usize,
    pub height: usize,
    pub cell_size: f32,
    data: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    pub fn new(width: usize, height: usize, cell_size: f32) -> Self {
        Self::filled(width, height, cell_size, T::default())
    }

    pub fn filled(width: usize, height: usize, cell_size: f32, value: T) -> Self {
        Self {
            width,
            height,
            cell_size,
            data: vec![value; width * height],
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            Some(&self.data[y * self.width + x])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x < self.width && y < self.height {
            Some(&mut self.data[y * self.width + x])
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = value;
        }
    }

    /// Signed-coordinate lookup; `None` outside the grid
    #[inline]
    pub fn get_signed(&self, x: i32, y: i32) -> Option<&T> {
        if x < 0 || y < 0 {
            return None;
        }
        self.get(x as usize, y as usize)
    }

    /// Cell containing a world position, `None` outside the grid
    pub fn world_to_cell(&self, pos: Vec2) -> Option<(usize, usize)> {
        let x = (pos.x / self.cell_size).floor();
        let y = (pos.y / self.cell_size).floor();
        if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
            return None;
        }
        Some((x as usize, y as usize))
    }

    /// Cell center in world coordinates
    pub fn cell_center(&self, x: usize, y: usize) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) * self.cell_size,
            (y as f32 + 0.5) * self.cell_size,
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}
