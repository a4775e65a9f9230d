//! Keep animals inside the world

use crate::core::config::MovementConfig;
use crate::core::types::EntityId;
use crate::ecs::access::MovementWorld;
use crate::ecs::component::ComponentMask;
use crate::ecs::world::World;
use crate::entity::components::{EatingState, Position, Size, Velocity};
use crate::simulation::system::System;

/// Clamps positions to `[margin + r, size - margin - r]` and reflects,
/// damped, the velocity component of each clamped axis
#[derive(Debug)]
pub struct BoundarySystem {
    config: MovementConfig,
    scratch: Vec<EntityId>,
}

impl BoundarySystem {
    pub fn new(config: MovementConfig) -> Self {
        Self { config, scratch: Vec::new() }
    }

    pub fn run<W: MovementWorld>(&mut self, world: &mut W, _dt: f32) {
        let mut ids = std::mem::take(&mut self.scratch);
        world.collect_with(ComponentMask::POSITION | ComponentMask::VELOCITY, &mut ids);
        let bounds = world.world_size();

        for &id in &ids {
            if world.has::<EatingState>(id) {
                continue;
            }
            let (Some(pos), Some(vel)) = (world.get::<Position>(id), world.get::<Velocity>(id)) else { continue };
            let radius = world.get::<Size>(id).map_or(0.0, |s| s.radius);

            let min = self.config.boundary_margin + radius;
            let max_x = (bounds.x - self.config.boundary_margin - radius).max(min);
            let max_y = (bounds.y - self.config.boundary_margin - radius).max(min);
            let clamped = Position::new(pos.x.clamp(min, max_x), pos.y.clamp(min, max_y));
            if clamped == pos {
                continue;
            }

            let reflect = |v: f32| {
                let r = -v * self.config.reflection_damping;
                if r.abs() < self.config.min_reflect_speed {
                    0.0
                } else {
                    r
                }
            };
            // Only the axis that hit a wall bounces
            let vx = if clamped.x != pos.x { reflect(vel.x) } else { vel.x };
            let vy = if clamped.y != pos.y { reflect(vel.y) } else { vel.y };
            world.set(id, clamped);
            world.set(id, Velocity::new(vx, vy));
            tracing::trace!(entity = %id, x = clamped.x, y = clamped.y, "clamped to world bounds");
        }

        self.scratch = ids;
    }
}

impl System for BoundarySystem {
    fn name(&self) -> &'static str {
        "boundary"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        self.run(world, dt);
    }
}
