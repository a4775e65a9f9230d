//! Speed modulation: overfed and injured animals slow down

use crate::core::config::SatiationConfig;
use crate::core::types::EntityId;
use crate::ecs::access::ComponentAccess;
use crate::ecs::component::ComponentMask;
use crate::ecs::world::World;
use crate::entity::components::{Health, Satiation, Speed};
use crate::simulation::system::System;

#[derive(Debug)]
pub struct SpeedSystem {
    config: SatiationConfig,
    scratch: Vec<EntityId>,
}

impl SpeedSystem {
    pub fn new(config: SatiationConfig) -> Self {
        Self { config, scratch: Vec::new() }
    }

    /// Multiplier applied to base speed
    ///
    /// Above the overfed threshold speed falls off linearly with satiation;
    /// below full health it scales with the health ratio.
    pub fn multiplier(&self, satiation: Option<Satiation>, health: Option<Health>) -> f32 {
        let mut multiplier = 1.0;
        if let Some(s) = satiation {
            if s.value > self.config.overfed_threshold {
                multiplier = 1.0 + self.config.overfed_threshold / Satiation::MAX - s.value / Satiation::MAX;
            }
        }
        if let Some(h) = health {
            if h.current < h.max {
                multiplier *= h.ratio();
            }
        }
        multiplier.max(self.config.min_speed_multiplier)
    }

    pub fn run<W: ComponentAccess>(&mut self, world: &mut W, _dt: f32) {
        let mut ids = std::mem::take(&mut self.scratch);
        world.collect_with(ComponentMask::SPEED, &mut ids);

        for &id in &ids {
            let Some(mut speed) = world.get::<Speed>(id) else { continue };
            speed.current = speed.base * self.multiplier(world.get::<Satiation>(id), world.get::<Health>(id));
            world.set(id, speed);
        }

        self.scratch = ids;
    }
}

impl System for SpeedSystem {
    fn name(&self) -> &'static str {
        "speed"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        self.run(world, dt);
    }
}
