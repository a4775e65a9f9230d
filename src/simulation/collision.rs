//! Circle-circle collision resolution
//!
//! Each unordered pair is resolved once, lower id first. Predator-prey
//! pairs only get their velocities damped (plus a soft push when deeply
//! overlapping) so prey is not knocked away from an attacker; every other
//! pair is separated positionally and loses the closing part of its
//! velocity.

use crate::core::config::MovementConfig;
use crate::core::types::{EntityId, Vec2, TILE_SIZE};
use crate::ecs::access::MovementWorld;
use crate::ecs::component::ComponentMask;
use crate::ecs::world::World;
use crate::entity::components::{EatingState, Position, Size, Speed, Velocity};
use crate::simulation::system::System;

const MIN_NORMAL_DISTANCE: f32 = 1e-4;

#[derive(Debug, Clone, Copy)]
struct Body {
    id: EntityId,
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    predator: bool,
}

#[derive(Debug)]
pub struct CollisionSystem {
    config: MovementConfig,
    scratch: Vec<EntityId>,
}

impl CollisionSystem {
    pub fn new(config: MovementConfig) -> Self {
        Self { config, scratch: Vec::new() }
    }

    pub fn run<W: MovementWorld>(&mut self, world: &mut W, _dt: f32) {
        let mut ids = std::mem::take(&mut self.scratch);
        world.collect_with(ComponentMask::POSITION | ComponentMask::SIZE | ComponentMask::VELOCITY, &mut ids);

        for &a in &ids {
            let Some(first) = body(world, a) else { continue };
            let search = first.radius * self.config.collision_search_multiplier + self.config.collision_safety_margin;

            for b in world.query_radius(first.pos, search) {
                if b <= a {
                    continue;
                }
                // Re-read: earlier pairs this tick may have moved either body
                let (Some(first), Some(second)) = (body(world, a), body(world, b)) else { continue };
                self.resolve(world, first, second);
            }
        }

        self.scratch = ids;
    }

    fn resolve<W: MovementWorld>(&self, world: &mut W, mut first: Body, mut second: Body) {
        let offset = second.pos - first.pos;
        let dist = offset.length();
        let touching = first.radius + second.radius;
        let safe = touching + self.config.collision_safety_margin;

        let penetration = if dist < touching {
            touching - dist
        } else if dist < safe {
            safe - dist
        } else {
            return;
        };
        let normal = if dist > MIN_NORMAL_DISTANCE { offset * (1.0 / dist) } else { Vec2::new(1.0, 0.0) };

        if first.predator != second.predator {
            first.vel = first.vel * self.config.predator_prey_damping;
            second.vel = second.vel * self.config.predator_prey_damping;
            if penetration > self.config.soft_push_threshold {
                first.vel -= normal * self.config.soft_push_force;
                second.vel += normal * self.config.soft_push_force;
            }
        } else {
            let separation = (penetration * self.config.separation_force_multiplier).min(self.config.max_separation_per_tick);
            first.pos -= normal * separation;
            second.pos += normal * separation;

            let closing = first.vel.dot(&normal);
            if closing > 0.0 {
                first.vel -= normal * closing;
            }
            let closing = second.vel.dot(&-normal);
            if closing > 0.0 {
                second.vel += normal * closing;
            }

            if penetration > self.config.penetration_threshold {
                let push = penetration / TILE_SIZE * self.config.push_force_multiplier;
                first.vel -= normal * push;
                second.vel += normal * push;
            }

            world.set(first.id, Position::from(first.pos));
            world.set(second.id, Position::from(second.pos));
        }

        for b in [first, second] {
            let vel = match world.get::<Speed>(b.id) {
                Some(speed) => b.vel.clamp_length(speed.base),
                None => b.vel,
            };
            world.set(b.id, Velocity::from(vel));
        }
    }
}

fn body<W: MovementWorld>(world: &W, id: EntityId) -> Option<Body> {
    if world.has::<EatingState>(id) {
        return None;
    }
    let size = world.get::<Size>(id)?;
    Some(Body {
        id,
        pos: world.get::<Position>(id)?.vec(),
        vel: world.get::<Velocity>(id)?.vec(),
        radius: size.radius,
        predator: size.attack_range > 0.0,
    })
}

impl System for CollisionSystem {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        self.run(world, dt);
    }
}
