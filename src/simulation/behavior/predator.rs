//! Predator strategy: hold still while feeding, hunt when hungry

use crate::core::types::{BehaviorType, Vec2};
use crate::ecs::access::BehaviorWorld;
use crate::entity::components::{Behavior, Corpse, Position};
use crate::simulation::behavior::wander::{wander, WanderRange};
use crate::simulation::behavior::{Actor, BehaviorStrategy};

#[derive(Debug, Clone)]
pub struct PredatorStrategy {
    wander: WanderRange,
}

impl PredatorStrategy {
    pub fn new(wander: WanderRange) -> Self {
        Self { wander }
    }
}

impl BehaviorStrategy for PredatorStrategy {
    fn decide<W: BehaviorWorld>(&self, world: &mut W, actor: &Actor, behavior: &mut Behavior) -> Vec2 {
        if actor.eating {
            return Vec2::ZERO;
        }

        if actor.satiation >= behavior.satiation_threshold {
            return wander(world, behavior, actor.velocity, actor.speed * behavior.content_speed, self.wander);
        }

        let prey = world.nearest_matching(actor.position, behavior.vision_range, |other| {
            other != actor.id
                && !world.has::<Corpse>(other)
                && world.get::<Behavior>(other).is_some_and(|b| b.kind == BehaviorType::Herbivore)
        });
        match prey.and_then(|p| world.get::<Position>(p)) {
            Some(target) => {
                behavior.direction_timer = behavior.min_direction_time;
                (target.vec() - actor.position).normalize() * (actor.speed * behavior.search_speed)
            }
            None => wander(world, behavior, actor.velocity, actor.speed * behavior.wandering_speed, self.wander),
        }
    }
}
