//! Predators feeding on corpses and carrion

use crate::core::config::{FeedingConfig, SatiationConfig};
use crate::core::types::{BehaviorType, EntityId};
use crate::ecs::access::FeedingWorld;
use crate::ecs::component::ComponentMask;
use crate::ecs::world::World;
use crate::entity::components::{AttackState, Behavior, Carrion, Corpse, EatingState, FoodKind, Position, Satiation};
use crate::simulation::consumption::{Bite, DiscreteConsumption, Remains};
use crate::simulation::corpse::convert_to_carrion;
use crate::simulation::system::System;

#[derive(Debug)]
pub struct CorpseEatingSystem {
    consumption: DiscreteConsumption,
    eating_range: f32,
    full_at: f32,
    scratch: Vec<EntityId>,
}

impl CorpseEatingSystem {
    pub fn new(feeding: &FeedingConfig, satiation: &SatiationConfig) -> Self {
        Self {
            consumption: DiscreteConsumption::new(FoodKind::Animal, feeding.corpse_bite, feeding.corpse_nutrition_value),
            eating_range: feeding.eating_range,
            full_at: Satiation::MAX - satiation.full_tolerance,
            scratch: Vec::new(),
        }
    }

    pub fn run<W: FeedingWorld>(&mut self, world: &mut W, _dt: f32) {
        let mut ids = std::mem::take(&mut self.scratch);

        world.collect_with(ComponentMask::BEHAVIOR | ComponentMask::POSITION | ComponentMask::SATIATION, &mut ids);
        for &id in &ids {
            if let Some(target) = self.find_remains(world, id) {
                world.add(id, EatingState::remains(target));
                tracing::trace!(entity = %id, target = %target, "started eating remains");
            }
        }

        world.collect_with(ComponentMask::EATING_STATE, &mut ids);
        for &id in &ids {
            let Some(state) = world.get::<EatingState>(id) else { continue };
            if state.target_kind == FoodKind::Animal {
                self.feed(world, id, state.target);
            }
        }

        self.consumption.prune(world);
        self.scratch = ids;
    }

    /// Nearest remains in eating range for a hungry, idle predator
    fn find_remains<W: FeedingWorld>(&self, world: &W, id: EntityId) -> Option<EntityId> {
        if world.has::<EatingState>(id) || world.has::<AttackState>(id) {
            return None;
        }
        let behavior = world.get::<Behavior>(id)?;
        if behavior.kind != BehaviorType::Predator || world.get::<Satiation>(id)?.value >= behavior.satiation_threshold {
            return None;
        }
        let pos = world.get::<Position>(id)?.vec();
        world.nearest_matching(pos, self.eating_range, |other| world.has::<Corpse>(other) || world.has::<Carrion>(other))
    }

    fn feed<W: FeedingWorld>(&mut self, world: &mut W, id: EntityId, target: EntityId) {
        if !world.is_alive(target) || !(world.has::<Corpse>(target) || world.has::<Carrion>(target)) {
            self.stop(world, id);
            return;
        }

        let full = world.get::<Satiation>(id).map_or(true, |s| s.value >= self.full_at);
        if full {
            if !convert_to_carrion(world, target, id) {
                if let Some(mut carrion) = world.get::<Carrion>(target) {
                    carrion.abandoned_by = id;
                    world.set(target, carrion);
                }
            }
            self.stop(world, id);
            return;
        }

        if let Bite::Took { taken, gained, remaining } = self.consumption.bite(world, id, &mut Remains { target }) {
            tracing::trace!(entity = %id, target = %target, taken, gained, remaining, "remains bite");
            if remaining <= 0.0 {
                world.destroy_entity(target);
                self.stop(world, id);
                tracing::debug!(entity = %id, target = %target, "remains finished");
            }
        }
    }

    fn stop<W: FeedingWorld>(&mut self, world: &mut W, id: EntityId) {
        world.remove::<EatingState>(id);
        self.consumption.forget(id);
    }
}

impl System for CorpseEatingSystem {
    fn name(&self) -> &'static str {
        "corpse_eating"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        self.run(world, dt);
    }
}
