//! Pipeline stages and the standard ordering
//!
//! Order matters: each stage reads state its predecessors wrote in the
//! same tick. Grass search must create an `EatingState` before behavior
//! decides to hold still; the animation stage runs last so combat and
//! feeding see a settled frame on the next tick.

pub mod animation;
pub mod attack;
pub mod behavior;
pub mod boundary;
pub mod collision;
pub mod consumption;
pub mod corpse;
pub mod corpse_eating;
pub mod damage_flash;
pub mod grass_eating;
pub mod grass_search;
pub mod movement;
pub mod satiation;
pub mod speed;
pub mod starvation;
pub mod system;
pub mod vegetation;

pub use animation::AnimationSystem;
pub use attack::AttackSystem;
pub use behavior::BehaviorSystem;
pub use boundary::BoundarySystem;
pub use collision::CollisionSystem;
pub use consumption::{Bite, DiscreteConsumption, FoodSource, FrameTracker, GrassPatch, Remains};
pub use corpse::{convert_to_carrion, convert_to_corpse, CorpseSystem};
pub use corpse_eating::CorpseEatingSystem;
pub use damage_flash::DamageFlashSystem;
pub use grass_eating::GrassEatingSystem;
pub use grass_search::GrassSearchSystem;
pub use movement::MovementSystem;
pub use satiation::SatiationSystem;
pub use speed::SpeedSystem;
pub use starvation::StarvationSystem;
pub use system::{Pipeline, System};
pub use vegetation::{Vegetation, VegetationSystem};

use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::ecs::world::World;
use crate::entity::population::{populate, Spawned};
use crate::entity::registry::AnimalRegistry;
use crate::terrain::Terrain;

/// Every stage, in the order the simulation depends on
pub fn standard_pipeline(config: &SimulationConfig) -> Pipeline {
    Pipeline::new()
        .with(VegetationSystem::new())
        .with(SatiationSystem::new(config.satiation.clone()))
        .with(GrassSearchSystem::new(&config.vegetation))
        .with(GrassEatingSystem::new(&config.vegetation, &config.feeding, &config.satiation))
        .with(BehaviorSystem::new(&config.movement, &config.vegetation))
        .with(SpeedSystem::new(config.satiation.clone()))
        .with(MovementSystem::new())
        .with(CollisionSystem::new(config.movement.clone()))
        .with(BoundarySystem::new(config.movement.clone()))
        .with(AttackSystem::new(config.combat.clone(), config.feeding.clone()))
        .with(DamageFlashSystem::new())
        .with(CorpseSystem::new(&config.feeding))
        .with(CorpseEatingSystem::new(&config.feeding, &config.satiation))
        .with(StarvationSystem::new(config.satiation.clone()))
        .with(AnimationSystem::new())
}

/// A ready-to-run world: generated terrain, the standard pipeline and the
/// configured population
pub fn build_world(config: SimulationConfig, registry: &AnimalRegistry) -> Result<(World, Spawned)> {
    let tiles = config.world.size_tiles as usize;
    let terrain = Terrain::generate(tiles, tiles, config.world.seed, config.vegetation.initial_grass);
    let pipeline = standard_pipeline(&config);
    let population = config.population.clone();

    let mut world = World::with_terrain(config, Box::new(terrain))?;
    world.set_pipeline(pipeline);
    let spawned = populate(&mut world, registry, &population)?;
    Ok((world, spawned))
}
