//! Herbivore strategy: flee, graze, wander
//!
//! Priorities, first match wins:
//! 1. a predator in vision: run directly away (cancels grazing)
//! 2. hungry or grazing: stay put beside grass, else head for the nearest
//!    grass in vision, else wander looking for some
//! 3. sated: wander slowly

use crate::core::config::MovementConfig;
use crate::core::types::{BehaviorType, Vec2};
use crate::ecs::access::BehaviorWorld;
use crate::entity::components::{Behavior, EatingState, Position};
use crate::simulation::behavior::wander::{wander, WanderRange};
use crate::simulation::behavior::{Actor, BehaviorStrategy};

/// Neighbors closer than this are ignored when steering away
const MIN_AVOID_DISTANCE: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct HerbivoreStrategy {
    flee_boundary_zone: f32,
    flee_boundary_strength: f32,
    avoidance_radius_multiplier: f32,
    avoidance_weight: f32,
    grass_proximity_multiplier: f32,
    min_grass_amount: f32,
    wander: WanderRange,
}

impl HerbivoreStrategy {
    pub fn new(movement: &MovementConfig, min_grass_amount: f32, wander: WanderRange) -> Self {
        Self {
            flee_boundary_zone: movement.flee_boundary_zone,
            flee_boundary_strength: movement.flee_boundary_strength,
            avoidance_radius_multiplier: movement.neighbor_avoidance_multiplier,
            avoidance_weight: movement.neighbor_avoidance_weight,
            grass_proximity_multiplier: movement.grass_proximity_multiplier,
            min_grass_amount,
            wander,
        }
    }

    fn flee<W: BehaviorWorld>(&self, world: &mut W, actor: &Actor, behavior: &mut Behavior) -> Option<Vec2> {
        let threat = world.nearest_matching(actor.position, behavior.vision_range, |other| {
            other != actor.id && world.get::<Behavior>(other).is_some_and(|b| b.kind == BehaviorType::Predator)
        })?;
        let threat_pos = world.get::<Position>(threat)?.vec();

        if actor.eating {
            world.remove::<EatingState>(actor.id);
            tracing::trace!(entity = %actor.id, predator = %threat, "grazing interrupted");
        }

        let away = (actor.position - threat_pos).normalize();
        let direction = (away + self.boundary_repulsion(actor.position, world.world_size())).normalize();
        behavior.direction_timer = behavior.min_direction_time;
        Some(direction * actor.speed)
    }

    /// Push away from edges within the boundary zone, capped in strength
    pub fn boundary_repulsion(&self, position: Vec2, world_size: Vec2) -> Vec2 {
        let zone_x = world_size.x * self.flee_boundary_zone;
        let zone_y = world_size.y * self.flee_boundary_zone;
        let mut push = Vec2::ZERO;

        if zone_x > 0.0 {
            if position.x < zone_x {
                push.x += (zone_x - position.x) / zone_x;
            }
            if position.x > world_size.x - zone_x {
                push.x -= (zone_x - (world_size.x - position.x)) / zone_x;
            }
        }
        if zone_y > 0.0 {
            if position.y < zone_y {
                push.y += (zone_y - position.y) / zone_y;
            }
            if position.y > world_size.y - zone_y {
                push.y -= (zone_y - (world_size.y - position.y)) / zone_y;
            }
        }

        push.clamp_length(self.flee_boundary_strength)
    }

    /// Steering away from nearby animals, inversely weighted by distance
    fn avoidance<W: BehaviorWorld>(&self, world: &W, actor: &Actor) -> Vec2 {
        let radius = actor.radius * self.avoidance_radius_multiplier;
        if radius <= 0.0 {
            return Vec2::ZERO;
        }

        let mut force = Vec2::ZERO;
        for other in world.query_radius(actor.position, radius) {
            if other == actor.id || !world.has::<Behavior>(other) {
                continue;
            }
            let Some(pos) = world.get::<Position>(other) else { continue };
            let offset = actor.position - pos.vec();
            let dist = offset.length();
            if dist > MIN_AVOID_DISTANCE && dist < radius {
                force += offset * (1.0 / (dist * dist));
            }
        }
        force.clamp_length(self.avoidance_weight)
    }

    fn graze<W: BehaviorWorld>(&self, world: &mut W, actor: &Actor, behavior: &mut Behavior) -> Vec2 {
        if actor.eating {
            return Vec2::ZERO;
        }

        let proximity = actor.radius * self.grass_proximity_multiplier;
        if world.vegetation().find_nearest_grass(actor.position, proximity, self.min_grass_amount).is_some() {
            return Vec2::ZERO;
        }

        match world.vegetation().find_nearest_grass(actor.position, behavior.vision_range, self.min_grass_amount) {
            Some(grass) => {
                let toward = (grass - actor.position).normalize();
                let steered = toward + self.avoidance(world, actor);
                let direction = if steered.is_zero() { toward } else { steered.normalize() };
                behavior.direction_timer = behavior.min_direction_time;
                direction * (actor.speed * behavior.search_speed)
            }
            None => wander(world, behavior, actor.velocity, actor.speed * behavior.wandering_speed, self.wander),
        }
    }
}

impl BehaviorStrategy for HerbivoreStrategy {
    fn decide<W: BehaviorWorld>(&self, world: &mut W, actor: &Actor, behavior: &mut Behavior) -> Vec2 {
        if let Some(escape) = self.flee(world, actor, behavior) {
            return escape;
        }
        if actor.satiation < behavior.satiation_threshold || actor.eating {
            return self.graze(world, actor, behavior);
        }
        wander(world, behavior, actor.velocity, actor.speed * behavior.content_speed, self.wander)
    }
}
