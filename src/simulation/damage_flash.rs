//! Hit highlight fade-out

use crate::core::types::EntityId;
use crate::ecs::access::ComponentAccess;
use crate::ecs::component::ComponentMask;
use crate::ecs::world::World;
use crate::entity::components::DamageFlash;
use crate::simulation::system::System;

#[derive(Debug, Default)]
pub struct DamageFlashSystem {
    scratch: Vec<EntityId>,
}

impl DamageFlashSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run<W: ComponentAccess>(&mut self, world: &mut W, dt: f32) {
        let mut ids = std::mem::take(&mut self.scratch);
        world.collect_with(ComponentMask::DAMAGE_FLASH, &mut ids);

        for &id in &ids {
            let Some(mut flash) = world.get::<DamageFlash>(id) else { continue };
            flash.timer -= dt;
            if flash.timer <= 0.0 {
                world.remove::<DamageFlash>(id);
                continue;
            }
            flash.intensity = if flash.duration > 0.0 { flash.timer / flash.duration } else { 0.0 };
            world.set(id, flash);
        }

        self.scratch = ids;
    }
}

impl System for DamageFlashSystem {
    fn name(&self) -> &'static str {
        "damage_flash"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        self.run(world, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;

    #[test]
    fn test_fades_then_disappears() {
        let mut world = World::new(SimulationConfig::default()).unwrap();
        let e = world.create_entity().unwrap();
        world.add(e, DamageFlash::new(0.2));
        let mut system = DamageFlashSystem::new();

        system.run(&mut world, 0.1);
        let flash = world.get::<DamageFlash>(e).unwrap();
        assert!((flash.intensity - 0.5).abs() < 1e-5);

        system.run(&mut world, 0.1);
        assert!(!world.has::<DamageFlash>(e));
    }
}
