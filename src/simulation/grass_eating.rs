//! Grass eating: one bite per eat-clip loop

use crate::core::config::{FeedingConfig, SatiationConfig, VegetationConfig};
use crate::core::types::EntityId;
use crate::ecs::access::{ComponentAccess, VegetationAccess};
use crate::ecs::component::ComponentMask;
use crate::ecs::world::World;
use crate::entity::components::{EatingState, FoodKind, Satiation};
use crate::simulation::consumption::{Bite, DiscreteConsumption, FoodSource, GrassPatch};
use crate::simulation::system::System;

#[derive(Debug)]
pub struct GrassEatingSystem {
    consumption: DiscreteConsumption,
    patch: GrassPatch,
    full_at: f32,
    scratch: Vec<EntityId>,
}

impl GrassEatingSystem {
    pub fn new(vegetation: &VegetationConfig, feeding: &FeedingConfig, satiation: &SatiationConfig) -> Self {
        Self {
            consumption: DiscreteConsumption::new(FoodKind::Grass, feeding.grass_per_bite, feeding.grass_nutrition),
            patch: GrassPatch { reach: vegetation.grass_reach(), min_amount: vegetation.min_grass_amount },
            full_at: Satiation::MAX - satiation.full_tolerance,
            scratch: Vec::new(),
        }
    }

    pub fn run<W: ComponentAccess + VegetationAccess>(&mut self, world: &mut W, _dt: f32) {
        let mut ids = std::mem::take(&mut self.scratch);
        world.collect_with(ComponentMask::EATING_STATE | ComponentMask::POSITION, &mut ids);

        for &id in &ids {
            if !world.get::<EatingState>(id).is_some_and(|s| s.target_kind == FoodKind::Grass) {
                continue;
            }
            if self.patch.available(&*world, id) <= 0.0 {
                self.stop(world, id, "grass ran out");
                continue;
            }

            if let Bite::Took { taken, gained, .. } = self.consumption.bite(world, id, &mut self.patch) {
                tracing::trace!(entity = %id, taken, gained, "grass bite");
            }

            let full = world.get::<Satiation>(id).map_or(true, |s| s.value >= self.full_at);
            if full {
                self.stop(world, id, "full");
            } else if self.patch.available(&*world, id) <= 0.0 {
                self.stop(world, id, "grass ran out");
            }
        }

        self.consumption.prune(world);
        self.scratch = ids;
    }

    fn stop<W: ComponentAccess>(&mut self, world: &mut W, id: EntityId, reason: &'static str) {
        world.remove::<EatingState>(id);
        self.consumption.forget(id);
        tracing::trace!(entity = %id, reason, "stopped grazing");
    }
}

impl System for GrassEatingSystem {
    fn name(&self) -> &'static str {
        "grass_eating"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        self.run(world, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::{Vec2, TILE_SIZE};
    use crate::entity::animation::AnimationKind;
    use crate::entity::components::{Animation, Position};
    use crate::terrain::{Terrain, TileType};

    fn eat(frame: u8) -> Animation {
        Animation { kind: AnimationKind::Eat, frame, timer: 0.0, playing: true, facing_right: true }
    }

    fn setup(grass: f32, satiation: f32) -> (World, GrassEatingSystem, EntityId) {
        let mut config = SimulationConfig::default();
        config.vegetation.initial_grass = grass;
        let system = GrassEatingSystem::new(&config.vegetation, &config.feeding, &config.satiation);
        let terrain = Terrain::filled(1, 1, TileType::Grass, grass);
        let mut world = World::with_terrain(config, Box::new(terrain)).unwrap();
        let e = world.create_entity().unwrap();
        world.add(e, Position::from(Vec2::new(0.5 * TILE_SIZE, 0.5 * TILE_SIZE)));
        world.add(e, Satiation::new(satiation));
        world.add(e, EatingState::grass());
        world.add(e, eat(0));
        (world, system, e)
    }

    #[test]
    fn test_bites_only_on_frame_transitions() {
        let (mut world, mut system, rabbit) = setup(100.0, 40.0);
        let mut history = Vec::new();
        for frame in [0, 1, 1, 0, 0, 1] {
            world.set(rabbit, eat(frame));
            system.run(&mut world, 1.0 / 60.0);
            history.push(world.get::<Satiation>(rabbit).unwrap().value);
        }
        assert_eq!(history, vec![40.0, 50.0, 50.0, 50.0, 50.0, 60.0]);
        assert_eq!(world.vegetation().terrain().grass_amount(0, 0), 90.0);
        assert_eq!(world.get::<EatingState>(rabbit).unwrap().nutrition_gained, 20.0);
    }

    #[test]
    fn test_stops_when_full() {
        let (mut world, mut system, rabbit) = setup(100.0, 95.0);
        system.run(&mut world, 0.1);
        world.set(rabbit, eat(1));
        system.run(&mut world, 0.1);
        assert_eq!(world.get::<Satiation>(rabbit).unwrap().value, 100.0);
        assert!(!world.has::<EatingState>(rabbit));
    }

    #[test]
    fn test_stops_without_grass() {
        let (mut world, mut system, rabbit) = setup(3.0, 20.0);
        system.run(&mut world, 0.1);
        assert!(!world.has::<EatingState>(rabbit), "below minimum amount");
    }
}
