//! Remains: conversion from animals, decay, and the death sweep
//!
//! A killed herbivore stays the same entity. `convert_to_corpse` strips
//! what made it a living animal and attaches a `Corpse`; position, species
//! and animation stay for the renderer. A corpse abandoned half-eaten
//! becomes `Carrion`, which also loses nutrition as it rots.

use crate::core::config::FeedingConfig;
use crate::core::types::EntityId;
use crate::ecs::access::{ComponentAccess, LifecycleWorld};
use crate::ecs::component::ComponentMask;
use crate::ecs::world::World;
use crate::entity::animation::AnimationKind;
use crate::entity::components::{
    Animation, AttackState, Behavior, Carrion, Corpse, EatingState, Health, Satiation, Size, Speed, Velocity,
};
use crate::simulation::system::System;

/// Turn a dead animal into a fresh corpse in place
pub fn convert_to_corpse<W: ComponentAccess>(world: &mut W, id: EntityId, config: &FeedingConfig) -> bool {
    if !world.is_alive(id) {
        return false;
    }

    world.remove::<Velocity>(id);
    world.remove::<Behavior>(id);
    world.remove::<Size>(id);
    world.remove::<Speed>(id);
    world.remove::<Satiation>(id);
    world.remove::<AttackState>(id);
    world.remove::<EatingState>(id);

    world.add(
        id,
        Corpse {
            nutritional_value: config.corpse_nutrition,
            max_nutritional_value: config.corpse_nutrition,
            decay_timer: config.corpse_decay_time,
        },
    );

    if let Some(mut anim) = world.get::<Animation>(id) {
        anim.kind = AnimationKind::DeathDying;
        anim.frame = 0;
        anim.timer = 0.0;
        anim.playing = false;
        world.set(id, anim);
    }

    tracing::debug!(entity = %id, "animal became a corpse");
    true
}

/// Turn a corpse into carrion, keeping its nutrition and decay timer.
/// Returns false if `id` holds no corpse.
pub fn convert_to_carrion<W: ComponentAccess>(world: &mut W, id: EntityId, abandoned_by: EntityId) -> bool {
    let Some(corpse) = world.get::<Corpse>(id) else { return false };
    world.remove::<Corpse>(id);
    world.add(
        id,
        Carrion {
            nutritional_value: corpse.nutritional_value,
            max_nutritional_value: corpse.max_nutritional_value,
            decay_timer: corpse.decay_timer,
            abandoned_by,
        },
    );
    tracing::debug!(entity = %id, by = %abandoned_by, remaining = corpse.nutritional_value, "corpse abandoned");
    true
}

/// Decays corpses and carrion and sweeps up dead animals
#[derive(Debug)]
pub struct CorpseSystem {
    decay_time: f32,
    scratch: Vec<EntityId>,
    eaten: Vec<EntityId>,
    doomed: Vec<EntityId>,
}

impl CorpseSystem {
    pub fn new(config: &FeedingConfig) -> Self {
        Self { decay_time: config.corpse_decay_time, scratch: Vec::new(), eaten: Vec::new(), doomed: Vec::new() }
    }

    pub fn run<W: LifecycleWorld>(&mut self, world: &mut W, dt: f32) {
        let mut ids = std::mem::take(&mut self.scratch);
        self.doomed.clear();

        // Remains currently being eaten do not rot
        world.collect_with(ComponentMask::EATING_STATE, &mut ids);
        self.eaten.clear();
        self.eaten.extend(ids.iter().filter_map(|&id| world.get::<EatingState>(id)).map(|s| s.target));
        self.eaten.sort_unstable();

        world.collect_with(ComponentMask::CORPSE, &mut ids);
        for &id in &ids {
            let Some(mut corpse) = world.get::<Corpse>(id) else { continue };
            if self.eaten.binary_search(&id).is_err() {
                corpse.decay_timer -= dt;
            }
            if corpse.nutritional_value <= 0.0 || corpse.decay_timer <= 0.0 {
                self.doomed.push(id);
            } else {
                world.set(id, corpse);
            }
        }

        world.collect_with(ComponentMask::CARRION, &mut ids);
        for &id in &ids {
            let Some(mut carrion) = world.get::<Carrion>(id) else { continue };
            carrion.decay_timer -= dt;
            if self.decay_time > 0.0 {
                carrion.nutritional_value -= carrion.max_nutritional_value / self.decay_time * dt;
            }
            carrion.nutritional_value = carrion.nutritional_value.max(0.0);
            if carrion.nutritional_value <= 0.0 || carrion.decay_timer <= 0.0 {
                self.doomed.push(id);
            } else {
                world.set(id, carrion);
            }
        }

        world.collect_with(ComponentMask::HEALTH, &mut ids);
        for &id in &ids {
            if world.has::<Corpse>(id) || world.has::<Carrion>(id) {
                continue;
            }
            if world.get::<Health>(id).is_some_and(|h| h.is_dead()) {
                self.doomed.push(id);
            }
        }

        for &id in &self.doomed {
            if world.destroy_entity(id) {
                tracing::debug!(entity = %id, "remains removed");
            }
        }

        self.scratch = ids;
    }
}

impl System for CorpseSystem {
    fn name(&self) -> &'static str {
        "corpse"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        self.run(world, dt);
    }
}
