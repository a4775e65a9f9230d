//! Behavior AI: picks each animal's velocity for this tick
//!
//! Dispatch is by `Behavior::kind` onto a `BehaviorStrategy`. Strategies
//! only choose a velocity (and may reset the wander timer or cancel
//! grazing); moving is left to the position stage.

pub mod herbivore;
pub mod predator;
pub mod wander;

use crate::core::config::{MovementConfig, VegetationConfig};
use crate::core::types::{BehaviorType, EntityId, Vec2};
use crate::ecs::access::BehaviorWorld;
use crate::ecs::component::ComponentMask;
use crate::ecs::world::World;
use crate::entity::components::{AttackState, Behavior, EatingState, Position, Satiation, Size, Speed, Velocity};
use crate::simulation::system::System;

pub use herbivore::HerbivoreStrategy;
pub use predator::PredatorStrategy;
pub use wander::WanderRange;

/// Snapshot of the deciding animal
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Current speed in tiles per second
    pub speed: f32,
    pub satiation: f32,
    pub radius: f32,
    pub eating: bool,
}

pub trait BehaviorStrategy {
    /// Velocity for this tick
    fn decide<W: BehaviorWorld>(&self, world: &mut W, actor: &Actor, behavior: &mut Behavior) -> Vec2;
}

pub struct BehaviorSystem {
    herbivore: HerbivoreStrategy,
    predator: PredatorStrategy,
    scratch: Vec<EntityId>,
}

impl BehaviorSystem {
    pub fn new(movement: &MovementConfig, vegetation: &VegetationConfig) -> Self {
        let wander = WanderRange { min: movement.wander_speed_min, max: movement.wander_speed_max };
        Self {
            herbivore: HerbivoreStrategy::new(movement, vegetation.min_grass_amount, wander),
            predator: PredatorStrategy::new(wander),
            scratch: Vec::new(),
        }
    }

    pub fn run<W: BehaviorWorld>(&mut self, world: &mut W, dt: f32) {
        let mut ids = std::mem::take(&mut self.scratch);
        world.collect_with(ComponentMask::BEHAVIOR | ComponentMask::POSITION | ComponentMask::VELOCITY, &mut ids);

        for &id in &ids {
            let Some(mut behavior) = world.get::<Behavior>(id) else { continue };
            behavior.direction_timer -= dt;

            if world.has::<AttackState>(id) {
                world.set(id, behavior);
                continue;
            }

            let Some(actor) = snapshot(world, id) else {
                world.set(id, behavior);
                continue;
            };
            let velocity = match behavior.kind {
                BehaviorType::Herbivore => self.herbivore.decide(world, &actor, &mut behavior),
                BehaviorType::Predator => self.predator.decide(world, &actor, &mut behavior),
            };

            world.set(id, behavior);
            world.set(id, Velocity::from(velocity));
        }

        self.scratch = ids;
    }
}

fn snapshot<W: BehaviorWorld>(world: &W, id: EntityId) -> Option<Actor> {
    Some(Actor {
        id,
        position: world.get::<Position>(id)?.vec(),
        velocity: world.get::<Velocity>(id)?.vec(),
        speed: world.get::<Speed>(id).map_or(0.0, |s| s.current),
        satiation: world.get::<Satiation>(id).map_or(Satiation::MAX, |s| s.value),
        radius: world.get::<Size>(id).map_or(0.0, |s| s.radius),
        eating: world.has::<EatingState>(id),
    })
}

impl System for BehaviorSystem {
    fn name(&self) -> &'static str {
        "behavior"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        self.run(world, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::AnimalType;
    use crate::entity::{create_animal, AnimalRegistry};

    #[test]
    fn test_attackers_are_frozen() {
        let config = SimulationConfig::default();
        let mut system = BehaviorSystem::new(&config.movement, &config.vegetation);
        let mut world = World::new(config).unwrap();
        let registry = AnimalRegistry::default();
        let wolf = create_animal(&mut world, &registry, AnimalType::Wolf, Vec2::new(400.0, 400.0)).unwrap();
        world.set(wolf, Velocity::new(1.0, 2.0));
        world.add(wolf, AttackState::begin(EntityId(99)));
        let timer = world.get::<Behavior>(wolf).unwrap().direction_timer;

        system.run(&mut world, 0.5);
        assert_eq!(world.get::<Velocity>(wolf), Some(Velocity::new(1.0, 2.0)));
        assert_eq!(world.get::<Behavior>(wolf).unwrap().direction_timer, timer - 0.5);
    }

    #[test]
    fn test_dispatch_by_kind() {
        let config = SimulationConfig::default();
        let mut system = BehaviorSystem::new(&config.movement, &config.vegetation);
        let mut world = World::new(config).unwrap();
        let registry = AnimalRegistry::default();
        let rabbit = create_animal(&mut world, &registry, AnimalType::Rabbit, Vec2::new(400.0, 400.0)).unwrap();
        let wolf = create_animal(&mut world, &registry, AnimalType::Wolf, Vec2::new(550.0, 400.0)).unwrap();

        system.run(&mut world, 0.1);
        // The rabbit sees the wolf and runs away from it along -x
        let v = world.get::<Velocity>(rabbit).unwrap();
        assert!(v.x < 0.0, "rabbit should flee, got {:?}", v);
        // The wolf is sated (70 >= 60) and wanders
        assert!(!world.get::<Velocity>(wolf).unwrap().is_zero());
    }
}
