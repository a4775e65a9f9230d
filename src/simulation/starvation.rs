//! Starvation damage at empty satiation

use ahash::AHashMap;

use crate::core::config::SatiationConfig;
use crate::core::types::EntityId;
use crate::ecs::access::LifecycleWorld;
use crate::ecs::component::ComponentMask;
use crate::ecs::world::World;
use crate::entity::components::{Health, Satiation};
use crate::simulation::system::System;

/// Deals `starvation_damage` every `starvation_interval` seconds spent at
/// zero satiation. A starved animal is destroyed outright, leaving no
/// corpse.
#[derive(Debug)]
pub struct StarvationSystem {
    config: SatiationConfig,
    timers: AHashMap<EntityId, f32>,
    scratch: Vec<EntityId>,
}

impl StarvationSystem {
    pub fn new(config: SatiationConfig) -> Self {
        Self { config, timers: AHashMap::new(), scratch: Vec::new() }
    }

    pub fn run<W: LifecycleWorld>(&mut self, world: &mut W, dt: f32) {
        let mut ids = std::mem::take(&mut self.scratch);
        world.collect_with(ComponentMask::SATIATION | ComponentMask::HEALTH, &mut ids);

        for &id in &ids {
            let starving = world.get::<Satiation>(id).is_some_and(|s| s.value <= 0.0);
            if !starving {
                self.timers.remove(&id);
                continue;
            }

            let timer = self.timers.entry(id).or_insert(0.0);
            *timer += dt;
            if *timer < self.config.starvation_interval {
                continue;
            }
            *timer -= self.config.starvation_interval;

            let Some(mut health) = world.get::<Health>(id) else { continue };
            health.apply_damage(self.config.starvation_damage);
            if health.is_dead() {
                self.timers.remove(&id);
                world.destroy_entity(id);
                tracing::debug!(entity = %id, "starved to death");
            } else {
                world.set(id, health);
            }
        }

        self.timers.retain(|&id, _| world.is_alive(id));
        self.scratch = ids;
    }
}

impl System for StarvationSystem {
    fn name(&self) -> &'static str {
        "starvation"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        self.run(world, dt);
    }
}
