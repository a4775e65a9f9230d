//! Grass search: hungry herbivores standing by grass start eating

use crate::core::config::VegetationConfig;
use crate::core::types::{BehaviorType, EntityId};
use crate::ecs::access::{ComponentAccess, VegetationAccess};
use crate::ecs::component::ComponentMask;
use crate::ecs::world::World;
use crate::entity::components::{Behavior, EatingState, Position, Satiation};
use crate::simulation::system::System;

#[derive(Debug)]
pub struct GrassSearchSystem {
    reach: f32,
    min_amount: f32,
    scratch: Vec<EntityId>,
}

impl GrassSearchSystem {
    pub fn new(config: &VegetationConfig) -> Self {
        Self { reach: config.grass_reach(), min_amount: config.min_grass_amount, scratch: Vec::new() }
    }

    pub fn run<W: ComponentAccess + VegetationAccess>(&mut self, world: &mut W, _dt: f32) {
        let mut ids = std::mem::take(&mut self.scratch);
        world.collect_with(ComponentMask::POSITION | ComponentMask::BEHAVIOR | ComponentMask::SATIATION, &mut ids);

        for &id in &ids {
            if world.has::<EatingState>(id) {
                continue;
            }
            let (Some(behavior), Some(satiation), Some(pos)) =
                (world.get::<Behavior>(id), world.get::<Satiation>(id), world.get::<Position>(id))
            else {
                continue;
            };
            if behavior.kind != BehaviorType::Herbivore || satiation.value >= behavior.satiation_threshold {
                continue;
            }
            if world.vegetation().find_nearest_grass(pos.vec(), self.reach, self.min_amount).is_some() {
                world.add(id, EatingState::grass());
                tracing::trace!(entity = %id, satiation = satiation.value, "started grazing");
            }
        }

        self.scratch = ids;
    }
}

impl System for GrassSearchSystem {
    fn name(&self) -> &'static str {
        "grass_search"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        self.run(world, dt);
    }
}
