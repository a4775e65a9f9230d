//! Position integration

use crate::core::types::{EntityId, TILE_SIZE};
use crate::ecs::access::MovementWorld;
use crate::ecs::component::ComponentMask;
use crate::ecs::world::World;
use crate::entity::components::{EatingState, Position, Velocity};
use crate::simulation::system::System;

/// Moves every animal by `velocity * dt`; velocities are tiles per second
#[derive(Debug, Default)]
pub struct MovementSystem {
    scratch: Vec<EntityId>,
}

impl MovementSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run<W: MovementWorld>(&mut self, world: &mut W, dt: f32) {
        let mut ids = std::mem::take(&mut self.scratch);
        world.collect_with(ComponentMask::POSITION | ComponentMask::VELOCITY, &mut ids);

        for &id in &ids {
            if world.has::<EatingState>(id) {
                world.set(id, Velocity::default());
                continue;
            }
            let (Some(pos), Some(vel)) = (world.get::<Position>(id), world.get::<Velocity>(id)) else { continue };
            if vel.is_zero() {
                continue;
            }
            world.set(id, Position::from(pos.vec() + vel.vec() * (dt * TILE_SIZE)));
        }

        self.scratch = ids;
    }
}

impl System for MovementSystem {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        self.run(world, dt);
    }
}
