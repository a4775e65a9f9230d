//! Tile terrain consumed by vegetation growth
//!
//! Terrain generation proper is a collaborator of the simulation; this
//! module provides the capability trait the core depends on, an in-memory
//! implementation, and a small seeded generator for headless runs.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::TILE_SIZE;
use crate::spatial::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileType {
    #[default]
    Grass,
    Water,
    Bush,
    Wetland,
}

impl TileType {
    /// Whether grass can grow on this tile
    pub fn grows_grass(self) -> bool {
        matches!(self, TileType::Grass | TileType::Wetland)
    }

    /// Whether animals can be placed here
    pub fn is_passable(self) -> bool {
        !matches!(self, TileType::Water)
    }
}

/// What the vegetation stage needs from the terrain
pub trait TerrainProvider {
    fn tile_type(&self, x: usize, y: usize) -> TileType;
    fn grass_amount(&self, x: usize, y: usize) -> f32;
    fn set_grass_amount(&mut self, x: usize, y: usize, amount: f32);
    /// Width and height in tiles
    fn size(&self) -> (usize, usize);
}

/// In-memory tile map with per-tile grass
#[derive(Debug, Clone)]
pub struct Terrain {
    tiles: Grid<TileType>,
    grass: Grid<f32>,
}

impl Terrain {
    /// Uniform terrain of one tile type; growable tiles start at `grass`
    pub fn filled(width: usize, height: usize, tile: TileType, grass: f32) -> Self {
        let amount = if tile.grows_grass() { grass } else { 0.0 };
        Self {
            tiles: Grid::filled(width, height, TILE_SIZE, tile),
            grass: Grid::filled(width, height, TILE_SIZE, amount),
        }
    }

    /// Grassland with a few ponds ringed by wetland and scattered bush
    ///
    /// Deterministic for a given seed.
    pub fn generate(width: usize, height: usize, seed: u64, initial_grass: f32) -> Self {
        let mut terrain = Self::filled(width, height, TileType::Grass, initial_grass);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        if width < 4 || height < 4 {
            return terrain;
        }

        let ponds = (width * height / 400).max(1);
        for _ in 0..ponds {
            let cx = rng.gen_range(0..width) as i32;
            let cy = rng.gen_range(0..height) as i32;
            let radius = rng.gen_range(1..=3) as i32;
            for dy in -(radius + 1)..=(radius + 1) {
                for dx in -(radius + 1)..=(radius + 1) {
                    let dist_sq = dx * dx + dy * dy;
                    let tile = if dist_sq <= radius * radius {
                        TileType::Water
                    } else if dist_sq <= (radius + 1) * (radius + 1) {
                        TileType::Wetland
                    } else {
                        continue;
                    };
                    terrain.paint(cx + dx, cy + dy, tile, initial_grass);
                }
            }
        }

        let bushes = width * height / 60;
        for _ in 0..bushes {
            let x = rng.gen_range(0..width) as i32;
            let y = rng.gen_range(0..height) as i32;
            if terrain.tiles.get_signed(x, y) == Some(&TileType::Grass) {
                terrain.paint(x, y, TileType::Bush, initial_grass);
            }
        }

        terrain
    }

    /// Overwrite one tile, never turning water back into land
    fn paint(&mut self, x: i32, y: i32, tile: TileType, initial_grass: f32) {
        match self.tiles.get_signed(x, y) {
            None | Some(TileType::Water) => {}
            Some(_) => {
                let (x, y) = (x as usize, y as usize);
                self.tiles.set(x, y, tile);
                self.grass.set(x, y, if tile.grows_grass() { initial_grass } else { 0.0 });
            }
        }
    }

    pub fn set_tile_type(&mut self, x: usize, y: usize, tile: TileType) {
        self.tiles.set(x, y, tile);
        if !tile.grows_grass() {
            self.grass.set(x, y, 0.0);
        }
    }
}

impl TerrainProvider for Terrain {
    fn tile_type(&self, x: usize, y: usize) -> TileType {
        self.tiles.get(x, y).copied().unwrap_or(TileType::Water)
    }

    fn grass_amount(&self, x: usize, y: usize) -> f32 {
        self.grass.get(x, y).copied().unwrap_or(0.0)
    }

    fn set_grass_amount(&mut self, x: usize, y: usize, amount: f32) {
        self.grass.set(x, y, amount.max(0.0));
    }

    fn size(&self) -> (usize, usize) {
        (self.tiles.width, self.tiles.height)
    }
}
