//! Initial population placement
//!
//! Placement draws from its own RNG (seeded `world.seed + 1000`) so adding
//! or removing animals does not shift the simulation's random stream.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::PopulationConfig;
use crate::core::error::Result;
use crate::core::types::{AnimalType, EntityId, Vec2, TILE_SIZE};
use crate::ecs::world::World;
use crate::entity::factory::create_animal;
use crate::entity::registry::AnimalRegistry;

/// Offset added to the world seed for the placement RNG
pub const PLACEMENT_SEED_OFFSET: u64 = 1000;
/// Keep spawns this many tiles away from the world edge
const EDGE_MARGIN_TILES: f32 = 2.0;
/// Rabbits spawn within this many tiles of their group centre
const GROUP_SPREAD_TILES: f32 = 2.0;
const MAX_ATTEMPTS: usize = 100;

/// Entities created by `populate`
#[derive(Debug, Clone, Default)]
pub struct Spawned {
    pub rabbits: Vec<EntityId>,
    pub wolves: Vec<EntityId>,
}

impl Spawned {
    pub fn len(&self) -> usize {
        self.rabbits.len() + self.wolves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct Placer {
    rng: ChaCha8Rng,
    min: f32,
    max_x: f32,
    max_y: f32,
}

impl Placer {
    fn new(world: &World) -> Self {
        let margin = EDGE_MARGIN_TILES * TILE_SIZE;
        Self {
            rng: ChaCha8Rng::seed_from_u64(world.config().world.seed.wrapping_add(PLACEMENT_SEED_OFFSET)),
            min: margin,
            max_x: (world.width() - margin).max(margin),
            max_y: (world.height() - margin).max(margin),
        }
    }

    fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.min, self.max_x), p.y.clamp(self.min, self.max_y))
    }

    fn anywhere(&mut self) -> Vec2 {
        let x = if self.max_x > self.min { self.rng.gen_range(self.min..self.max_x) } else { self.min };
        let y = if self.max_y > self.min { self.rng.gen_range(self.min..self.max_y) } else { self.min };
        Vec2::new(x, y)
    }

    fn near(&mut self, center: Vec2, spread: f32) -> Vec2 {
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let dist = self.rng.gen_range(0.0..spread);
        self.clamp(center + Vec2::from_angle(angle) * dist)
    }
}

fn is_passable(world: &World, pos: Vec2) -> bool {
    let (w, h) = world.vegetation().size();
    if pos.x < 0.0 || pos.y < 0.0 {
        return false;
    }
    let (tx, ty) = ((pos.x / TILE_SIZE) as usize, (pos.y / TILE_SIZE) as usize);
    tx < w && ty < h && world.vegetation().terrain().tile_type(tx, ty).is_passable()
}

/// Retry `candidate` until it lands on a passable tile
fn passable_spot(world: &World, placer: &mut Placer, mut candidate: impl FnMut(&mut Placer) -> Vec2) -> Option<Vec2> {
    (0..MAX_ATTEMPTS).map(|_| candidate(placer)).find(|&p| is_passable(world, p))
}

/// Spawn the configured number of rabbits and wolves
///
/// Rabbits are placed in groups around a shared centre. Wolves are placed
/// one at a time, preferring spots at least `min_wolf_distance_tiles` from
/// every other wolf; if none is found the last passable candidate is used.
pub fn populate(world: &mut World, registry: &AnimalRegistry, config: &PopulationConfig) -> Result<Spawned> {
    let mut placer = Placer::new(world);
    let mut spawned = Spawned::default();

    let group_size = config.rabbit_group_size.max(1);
    let spread = GROUP_SPREAD_TILES * TILE_SIZE;
    while spawned.rabbits.len() < config.rabbits {
        let Some(center) = passable_spot(world, &mut placer, Placer::anywhere) else {
            tracing::warn!(placed = spawned.rabbits.len(), "no passable tile for rabbit group");
            break;
        };
        let members = group_size.min(config.rabbits - spawned.rabbits.len());
        for _ in 0..members {
            let pos = passable_spot(world, &mut placer, |p| p.near(center, spread)).unwrap_or(center);
            spawned.rabbits.push(create_animal(world, registry, AnimalType::Rabbit, pos)?);
        }
    }

    let min_distance = config.min_wolf_distance_tiles * TILE_SIZE;
    let mut wolf_positions: Vec<Vec2> = Vec::with_capacity(config.wolves);
    for _ in 0..config.wolves {
        let mut fallback = None;
        let mut chosen = None;
        for _ in 0..MAX_ATTEMPTS {
            let candidate = placer.anywhere();
            if !is_passable(world, candidate) {
                continue;
            }
            fallback = Some(candidate);
            if wolf_positions.iter().all(|p| p.distance(&candidate) >= min_distance) {
                chosen = Some(candidate);
                break;
            }
        }
        let Some(pos) = chosen.or(fallback) else {
            tracing::warn!(placed = spawned.wolves.len(), "no passable tile for wolf");
            break;
        };
        if chosen.is_none() {
            tracing::debug!(x = pos.x, y = pos.y, "wolf spacing relaxed");
        }
        wolf_positions.push(pos);
        spawned.wolves.push(create_animal(world, registry, AnimalType::Wolf, pos)?);
    }

    tracing::info!(rabbits = spawned.rabbits.len(), wolves = spawned.wolves.len(), "population placed");
    Ok(spawned)
}
