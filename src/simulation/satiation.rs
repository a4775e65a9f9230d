//! Satiation decay
//!
//! Satiation drains at a fixed rate while an animal is not eating. Large
//! animals drain at a reduced rate.

use crate::core::config::SatiationConfig;
use crate::core::types::EntityId;
use crate::ecs::access::ComponentAccess;
use crate::ecs::component::ComponentMask;
use crate::ecs::world::World;
use crate::entity::components::{EatingState, Satiation, Size};
use crate::simulation::system::System;

#[derive(Debug)]
pub struct SatiationSystem {
    config: SatiationConfig,
    scratch: Vec<EntityId>,
}

impl SatiationSystem {
    pub fn new(config: SatiationConfig) -> Self {
        Self { config, scratch: Vec::new() }
    }

    pub fn run<W: ComponentAccess>(&mut self, world: &mut W, dt: f32) {
        let mut ids = std::mem::take(&mut self.scratch);
        world.collect_with(ComponentMask::SATIATION, &mut ids);

        for &id in &ids {
            if world.has::<EatingState>(id) {
                continue;
            }
            let Some(mut satiation) = world.get::<Satiation>(id) else { continue };

            let mut rate = self.config.decay_rate;
            if world.get::<Size>(id).is_some_and(|s| s.radius > self.config.large_animal_radius) {
                rate *= self.config.large_animal_multiplier;
            }
            satiation.value = (satiation.value - rate * dt).max(0.0);
            world.set(id, satiation);
        }

        self.scratch = ids;
    }
}

impl System for SatiationSystem {
    fn name(&self) -> &'static str {
        "satiation"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        self.run(world, dt);
    }
}
