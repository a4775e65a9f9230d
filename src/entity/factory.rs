//! Assembling an animal entity from its species stats

use crate::core::error::Result;
use crate::core::types::{AnimalType, EntityId, Vec2};
use crate::ecs::world::World;
use crate::entity::components::{Animation, Behavior, Health, Position, Satiation, Size, Speed, Velocity};
use crate::entity::registry::AnimalRegistry;

/// Spawn an animal of `kind` at `position` with its full component set
pub fn create_animal(world: &mut World, registry: &AnimalRegistry, kind: AnimalType, position: Vec2) -> Result<EntityId> {
    let config = registry.create_config(kind);
    let id = world.create_entity()?;

    // Size before Position so the spatial entry gets the right radius on insert
    world.add(id, Size { radius: config.collision_radius, attack_range: config.attack_range });
    world.add(id, Position::from(position));
    world.add(id, Velocity::default());
    world.add(id, Health::full(config.max_health));
    world.add(id, Satiation::new(registry.initial_satiation(kind)));
    world.add(id, Speed { base: config.base_speed, current: config.base_speed });
    world.add(id, kind);
    world.add(id, Behavior::from_config(&config));
    world.add(id, config);
    world.add(id, Animation::default());

    tracing::debug!(entity = %id, species = kind.name(), x = position.x, y = position.y, "spawned animal");
    Ok(id)
}
