//! Grass growth and grass lookups
//!
//! The grass field wraps a `TerrainProvider` and is owned by the world. The
//! vegetation stage grows it once per tick; the grass search, grass eating
//! and behavior stages read and consume it.

use crate::core::config::VegetationConfig;
use crate::core::types::{Vec2, TILE_SIZE};
use crate::ecs::access::VegetationAccess;
use crate::ecs::world::World;
use crate::simulation::system::System;
use crate::terrain::{TerrainProvider, TileType};

/// Per-tile grass amounts over a terrain
pub struct Vegetation {
    terrain: Box<dyn TerrainProvider>,
    config: VegetationConfig,
    width: usize,
    height: usize,
    /// Grass tiles with water in their 8-neighborhood, computed once
    near_water: Vec<bool>,
}

impl Vegetation {
    pub fn new(terrain: Box<dyn TerrainProvider>, config: VegetationConfig) -> Self {
        let (width, height) = terrain.size();
        let mut near_water = vec![false; width * height];
        for y in 0..height {
            for x in 0..width {
                if terrain.tile_type(x, y) != TileType::Grass {
                    continue;
                }
                near_water[y * width + x] = neighbors(x, y, width, height)
                    .any(|(nx, ny)| terrain.tile_type(nx, ny) == TileType::Water);
            }
        }
        Self { terrain, config, width, height, near_water }
    }

    pub fn terrain(&self) -> &dyn TerrainProvider {
        self.terrain.as_ref()
    }

    /// Width and height in tiles
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn config(&self) -> &VegetationConfig {
        &self.config
    }

    /// Advance growth on every tile by `dt` seconds
    pub fn grow(&mut self, dt: f32) {
        let max = self.config.max_grass;
        for y in 0..self.height {
            for x in 0..self.width {
                let tile = self.terrain.tile_type(x, y);
                if !tile.grows_grass() {
                    continue;
                }
                let current = self.terrain.grass_amount(x, y);
                if current >= max {
                    continue;
                }

                let mut rate = self.config.growth_rate;
                if tile == TileType::Wetland {
                    rate *= self.config.wetland_multiplier;
                }
                if self.near_water[y * self.width + x] {
                    rate *= self.config.near_water_multiplier;
                }
                self.terrain.set_grass_amount(x, y, (current + rate * dt).min(max));
            }
        }
    }

    fn tile_of(&self, pos: Vec2) -> Option<(usize, usize)> {
        let x = (pos.x / TILE_SIZE).floor();
        let y = (pos.y / TILE_SIZE).floor();
        if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
            return None;
        }
        Some((x as usize, y as usize))
    }

    /// Grass on the tile under `pos`; 0 outside the map
    pub fn grass_at(&self, pos: Vec2) -> f32 {
        self.tile_of(pos).map_or(0.0, |(x, y)| self.terrain.grass_amount(x, y))
    }

    /// Remove up to `amount` grass from the tile under `pos`, returning what
    /// was actually removed
    pub fn consume_grass_at(&mut self, pos: Vec2, amount: f32) -> f32 {
        let Some((x, y)) = self.tile_of(pos) else { return 0.0 };
        let available = self.terrain.grass_amount(x, y);
        let consumed = amount.max(0.0).min(available);
        if consumed > 0.0 {
            self.terrain.set_grass_amount(x, y, available - consumed);
        }
        consumed
    }

    /// Center of the closest tile holding at least `min_amount` grass
    ///
    /// Searches rings of increasing radius around the tile under `center`
    /// and stops at the first ring with a qualifying tile. The tile under
    /// `center` is always considered; other tiles only if their center lies
    /// within `radius`.
    pub fn find_nearest_grass(&self, center: Vec2, radius: f32, min_amount: f32) -> Option<Vec2> {
        let cx = (center.x / TILE_SIZE).floor() as i32;
        let cy = (center.y / TILE_SIZE).floor() as i32;
        let max_ring = (radius.max(0.0) / TILE_SIZE).ceil() as i32;
        let radius_sq = radius * radius;

        for ring in 0..=max_ring {
            let mut best: Option<(f32, Vec2)> = None;
            for dy in -ring..=ring {
                for dx in -ring..=ring {
                    if dx.abs().max(dy.abs()) != ring {
                        continue;
                    }
                    let (tx, ty) = (cx + dx, cy + dy);
                    if tx < 0 || ty < 0 || tx as usize >= self.width || ty as usize >= self.height {
                        continue;
                    }
                    let tile_center = Vec2::new((tx as f32 + 0.5) * TILE_SIZE, (ty as f32 + 0.5) * TILE_SIZE);
                    let dist_sq = center.distance_squared(&tile_center);
                    if ring > 0 && dist_sq > radius_sq {
                        continue;
                    }
                    if self.terrain.grass_amount(tx as usize, ty as usize) < min_amount {
                        continue;
                    }
                    if best.map_or(true, |(d, _)| dist_sq < d) {
                        best = Some((dist_sq, tile_center));
                    }
                }
            }
            if let Some((_, pos)) = best {
                return Some(pos);
            }
        }
        None
    }

    /// Sum of grass over the whole map
    pub fn total_grass(&self) -> f32 {
        let mut total = 0.0;
        for y in 0..self.height {
            for x in 0..self.width {
                total += self.terrain.grass_amount(x, y);
            }
        }
        total
    }

    /// Number of tiles holding at least `min_amount` grass
    pub fn grassy_tiles(&self, min_amount: f32) -> usize {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.terrain.grass_amount(x, y) >= min_amount)
            .count()
    }
}

fn neighbors(x: usize, y: usize, width: usize, height: usize) -> impl Iterator<Item = (usize, usize)> {
    (-1i32..=1).flat_map(move |dy| {
        (-1i32..=1).filter_map(move |dx| {
            if dx == 0 && dy == 0 {
                return None;
            }
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
                None
            } else {
                Some((nx as usize, ny as usize))
            }
        })
    })
}

/// Pipeline stage: grass growth
#[derive(Debug, Default)]
pub struct VegetationSystem;

impl VegetationSystem {
    pub fn new() -> Self {
        Self
    }

    pub fn run<W: VegetationAccess>(&mut self, world: &mut W, dt: f32) {
        world.vegetation_mut().grow(dt);
    }
}

impl System for VegetationSystem {
    fn name(&self) -> &'static str {
        "vegetation"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        self.run(world, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Terrain;

    fn vegetation(terrain: Terrain) -> Vegetation {
        Vegetation::new(Box::new(terrain), VegetationConfig::default())
    }

    #[test]
    fn test_growth_rates_by_tile() {
        let mut terrain = Terrain::filled(5, 1, TileType::Grass, 0.0);
        terrain.set_tile_type(0, 0, TileType::Water);
        terrain.set_tile_type(2, 0, TileType::Wetland);
        terrain.set_tile_type(3, 0, TileType::Bush);
        let mut veg = vegetation(terrain);

        veg.grow(2.0);

        let at = |x: usize| veg.terrain().grass_amount(x, 0);
        assert_eq!(at(0), 0.0, "water does not grow");
        assert!((at(1) - 1.0 * 0.3).abs() < 1e-5, "grass beside water grows slowly");
        assert!((at(2) - 1.0 * 1.5).abs() < 1e-5, "wetland grows faster");
        assert_eq!(at(3), 0.0, "bush does not grow");
        assert!((at(4) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_growth_caps_at_max() {
        let mut veg = vegetation(Terrain::filled(1, 1, TileType::Grass, 99.9));
        veg.grow(10.0);
        assert_eq!(veg.terrain().grass_amount(0, 0), 100.0);
    }

    #[test]
    fn test_consume_returns_what_was_taken() {
        let mut veg = vegetation(Terrain::filled(2, 2, TileType::Grass, 3.0));
        let pos = Vec2::new(10.0, 10.0);
        assert_eq!(veg.consume_grass_at(pos, 2.0), 2.0);
        assert_eq!(veg.consume_grass_at(pos, 2.0), 1.0);
        assert_eq!(veg.consume_grass_at(pos, 2.0), 0.0);
        assert_eq!(veg.grass_at(pos), 0.0);
        assert_eq!(veg.consume_grass_at(Vec2::new(-5.0, 0.0), 2.0), 0.0);
    }

    #[test]
    fn test_find_nearest_grass_prefers_own_tile() {
        let veg = vegetation(Terrain::filled(5, 5, TileType::Grass, 50.0));
        let center = Vec2::new(2.5 * TILE_SIZE, 2.5 * TILE_SIZE);
        assert_eq!(veg.find_nearest_grass(center, 3.0 * TILE_SIZE, 10.0), Some(center));
    }

    #[test]
    fn test_find_nearest_grass_stops_at_first_ring() {
        let mut terrain = Terrain::filled(7, 7, TileType::Grass, 0.0);
        terrain.set_grass_amount(4, 3, 20.0); // ring 1
        terrain.set_grass_amount(6, 3, 90.0); // ring 3
        let veg = vegetation(terrain);

        let center = Vec2::new(3.5 * TILE_SIZE, 3.5 * TILE_SIZE);
        let found = veg.find_nearest_grass(center, 4.0 * TILE_SIZE, 10.0);
        assert_eq!(found, Some(Vec2::new(4.5 * TILE_SIZE, 3.5 * TILE_SIZE)));

        assert_eq!(veg.find_nearest_grass(center, 0.5 * TILE_SIZE, 10.0), None, "ring 1 is out of reach");
        assert_eq!(veg.find_nearest_grass(center, 4.0 * TILE_SIZE, 95.0), None);
    }

    #[test]
    fn test_totals() {
        let veg = vegetation(Terrain::filled(2, 3, TileType::Grass, 10.0));
        assert_eq!(veg.total_grass(), 60.0);
        assert_eq!(veg.grassy_tiles(10.0), 6);
        assert_eq!(veg.grassy_tiles(11.0), 0);
    }
}
