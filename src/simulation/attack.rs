//! Predator attacks
//!
//! An attack lives in an `AttackState` on the predator and is clocked by
//! the attack clip: the strike lands when the clip reaches
//! `ACTION_FRAME`, at most once per swing. The swing ends when the clip
//! finishes or is replaced, or after a timer fallback if the clip stalls.
//! A kill turns the victim into a corpse and the predator starts eating it
//! straight away.

use ahash::AHashMap;

use crate::core::config::{CombatConfig, FeedingConfig};
use crate::core::types::{BehaviorType, EntityId};
use crate::ecs::access::CombatWorld;
use crate::ecs::component::ComponentMask;
use crate::ecs::world::World;
use crate::entity::animation::{AnimationKind, ACTION_FRAME};
use crate::entity::components::{
    AnimalConfig, Animation, AttackPhase, AttackState, Behavior, Corpse, DamageFlash, EatingState, Health, Position,
    Satiation, Size,
};
use crate::simulation::corpse::convert_to_corpse;
use crate::simulation::system::System;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Swing {
    Continue,
    End,
    Killed,
}

#[derive(Debug)]
pub struct AttackSystem {
    combat: CombatConfig,
    feeding: FeedingConfig,
    cooldowns: AHashMap<EntityId, f32>,
    scratch: Vec<EntityId>,
}

impl AttackSystem {
    pub fn new(combat: CombatConfig, feeding: FeedingConfig) -> Self {
        Self { combat, feeding, cooldowns: AHashMap::new(), scratch: Vec::new() }
    }

    /// Seconds until `id` may attack again
    pub fn cooldown(&self, id: EntityId) -> f32 {
        self.cooldowns.get(&id).copied().unwrap_or(0.0)
    }

    pub fn run<W: CombatWorld>(&mut self, world: &mut W, dt: f32) {
        self.cooldowns.retain(|_, remaining| {
            *remaining -= dt;
            *remaining > 0.0
        });

        let mut ids = std::mem::take(&mut self.scratch);

        world.collect_with(ComponentMask::BEHAVIOR | ComponentMask::POSITION | ComponentMask::SIZE, &mut ids);
        for &id in &ids {
            if self.can_start(world, id) {
                if let Some(target) = self.find_target(world, id) {
                    world.add(id, AttackState::begin(target));
                    if let Some(mut anim) = world.get::<Animation>(id) {
                        anim.play(AnimationKind::Attack);
                        world.set(id, anim);
                    }
                    tracing::trace!(attacker = %id, target = %target, "attack started");
                }
            }
        }

        world.collect_with(ComponentMask::ATTACK_STATE, &mut ids);
        for &id in &ids {
            match self.swing(world, id, dt) {
                Swing::Continue => {}
                Swing::End => {
                    world.remove::<AttackState>(id);
                    self.start_cooldown(world, id);
                }
                Swing::Killed => self.start_cooldown(world, id),
            }
        }

        self.cooldowns.retain(|&id, _| world.is_alive(id));
        self.scratch = ids;
    }

    fn can_start<W: CombatWorld>(&self, world: &W, id: EntityId) -> bool {
        let Some(behavior) = world.get::<Behavior>(id) else { return false };
        if behavior.kind != BehaviorType::Predator {
            return false;
        }
        if !world.get::<Size>(id).is_some_and(|s| s.attack_range > 0.0) {
            return false;
        }
        if world.has::<AttackState>(id) || world.has::<EatingState>(id) || self.cooldown(id) > 0.0 {
            return false;
        }
        world.get::<Satiation>(id).is_some_and(|s| s.value < behavior.satiation_threshold)
    }

    /// Nearest herbivore in vision, if it is inside attack reach
    fn find_target<W: CombatWorld>(&self, world: &W, attacker: EntityId) -> Option<EntityId> {
        let pos = world.get::<Position>(attacker)?.vec();
        let vision = world.get::<Behavior>(attacker)?.vision_range;

        let target = world.nearest_matching(pos, vision, |candidate| {
            candidate != attacker
                && !world.has::<Corpse>(candidate)
                && world.get::<Behavior>(candidate).is_some_and(|b| b.kind == BehaviorType::Herbivore)
        })?;

        in_reach(world, attacker, target).then_some(target)
    }

    fn swing<W: CombatWorld>(&mut self, world: &mut W, id: EntityId, dt: f32) -> Swing {
        let Some(mut state) = world.get::<AttackState>(id) else { return Swing::Continue };
        state.total_timer += dt;
        state.phase_timer += dt;

        let target = state.target;
        let target_standing = world.is_alive(target)
            && !world.has::<Corpse>(target)
            && world.get::<Health>(target).is_some_and(|h| !h.is_dead());
        if !target_standing {
            return Swing::End;
        }

        let anim = world.get::<Animation>(id);
        if anim.is_some_and(|a| a.kind != AnimationKind::Attack) {
            return Swing::End;
        }

        if anim.is_some_and(|a| a.frame == ACTION_FRAME) && !state.has_struck {
            state.phase = AttackPhase::Strike;
            state.phase_timer = 0.0;
            state.has_struck = true;
            world.set(id, state);

            // A target that slipped out of reach during the windup uses up the swing
            if !in_reach(world, id, target) {
                tracing::trace!(attacker = %id, target = %target, "target out of reach at strike");
            } else if self.strike(world, id, target) {
                world.remove::<AttackState>(id);
                world.add(id, EatingState::remains(target));
                return Swing::Killed;
            }
        }

        if anim.is_some_and(|a| !a.playing) {
            return Swing::End;
        }
        if state.total_timer >= self.combat.windup_fallback + self.combat.strike_fallback {
            return Swing::End;
        }

        world.set(id, state);
        Swing::Continue
    }

    /// Roll to hit and apply damage; true if the target died
    fn strike<W: CombatWorld>(&self, world: &mut W, attacker: EntityId, target: EntityId) -> bool {
        let config = world.get::<AnimalConfig>(attacker).unwrap_or_default();
        let roll = world.random_f32();
        if roll >= config.hit_chance {
            tracing::trace!(attacker = %attacker, target = %target, roll, "attack missed");
            return false;
        }

        let Some(mut health) = world.get::<Health>(target) else { return false };
        let killed = health.apply_damage(config.attack_damage);
        world.set(target, health);
        world.add(target, DamageFlash::new(self.combat.damage_flash_duration));
        tracing::debug!(
            attacker = %attacker,
            target = %target,
            damage = config.attack_damage,
            remaining = health.current,
            "attack hit"
        );

        if killed {
            convert_to_corpse(world, target, &self.feeding);
            tracing::debug!(attacker = %attacker, victim = %target, "prey killed");
        }
        killed
    }

    fn start_cooldown<W: CombatWorld>(&mut self, world: &W, id: EntityId) {
        let cooldown = world.get::<AnimalConfig>(id).map_or(0.0, |c| c.attack_cooldown);
        if cooldown > 0.0 {
            self.cooldowns.insert(id, cooldown);
        }
    }
}

/// Target centre within the attacker's reach plus the target's radius
fn in_reach<W: CombatWorld>(world: &W, attacker: EntityId, target: EntityId) -> bool {
    let (Some(pos), Some(size), Some(target_pos)) =
        (world.get::<Position>(attacker), world.get::<Size>(attacker), world.get::<Position>(target))
    else {
        return false;
    };
    let target_radius = world.get::<Size>(target).map_or(0.0, |s| s.radius);
    let limit = size.attack_range + target_radius;
    pos.vec().distance_squared(&target_pos.vec()) <= limit * limit
}

impl System for AttackSystem {
    fn name(&self) -> &'static str {
        "attack"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        self.run(world, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::{AnimalType, Vec2};
    use crate::entity::{create_animal, AnimalRegistry};

    fn setup(hit_chance: f32) -> (World, AttackSystem, EntityId, EntityId) {
        let config = SimulationConfig::default();
        let system = AttackSystem::new(config.combat.clone(), config.feeding.clone());
        let mut world = World::new(config).unwrap();
        let registry = AnimalRegistry::default();
        let wolf = create_animal(&mut world, &registry, AnimalType::Wolf, Vec2::new(400.0, 400.0)).unwrap();
        let rabbit = create_animal(&mut world, &registry, AnimalType::Rabbit, Vec2::new(430.0, 400.0)).unwrap();
        world.set(wolf, Satiation::new(10.0));
        let mut config = world.get::<AnimalConfig>(wolf).unwrap();
        config.hit_chance = hit_chance;
        world.set(wolf, config);
        (world, system, wolf, rabbit)
    }

    fn set_frame(world: &mut World, id: EntityId, frame: u8) {
        let mut anim = world.get::<Animation>(id).unwrap();
        anim.frame = frame;
        world.set(id, anim);
    }

    #[test]
    fn test_attack_starts_in_reach() {
        let (mut world, mut system, wolf, rabbit) = setup(1.0);
        system.run(&mut world, 0.01);

        let state = world.get::<AttackState>(wolf).unwrap();
        assert_eq!(state.target, rabbit);
        assert_eq!(state.phase, AttackPhase::Windup);
        let anim = world.get::<Animation>(wolf).unwrap();
        assert_eq!((anim.kind, anim.frame, anim.playing), (AnimationKind::Attack, 0, true));
    }

    #[test]
    fn test_out_of_reach_or_sated_does_not_attack() {
        let (mut world, mut system, wolf, rabbit) = setup(1.0);
        world.set(rabbit, Position::new(600.0, 400.0));
        system.run(&mut world, 0.01);
        assert!(!world.has::<AttackState>(wolf));

        world.set(rabbit, Position::new(430.0, 400.0));
        world.set(wolf, Satiation::new(90.0));
        system.run(&mut world, 0.01);
        assert!(!world.has::<AttackState>(wolf));
    }

    #[test]
    fn test_strike_lands_once_on_action_frame() {
        let (mut world, mut system, wolf, rabbit) = setup(1.0);
        let damage = world.get::<AnimalConfig>(wolf).unwrap().attack_damage;
        let full = world.get::<Health>(rabbit).unwrap().current;

        let mut health = Vec::new();
        for frame in [0, 0, 1, 1] {
            if world.has::<AttackState>(wolf) {
                set_frame(&mut world, wolf, frame);
            }
            system.run(&mut world, 0.01);
            health.push(world.get::<Health>(rabbit).unwrap().current);
        }
        assert_eq!(health, vec![full, full, full - damage, full - damage]);
        assert!(world.has::<DamageFlash>(rabbit));
        assert!(world.get::<AttackState>(wolf).unwrap().has_struck);
    }

    #[test]
    fn test_miss_consumes_the_swing() {
        let (mut world, mut system, wolf, rabbit) = setup(0.0);
        let full = world.get::<Health>(rabbit).unwrap().current;
        system.run(&mut world, 0.01);
        set_frame(&mut world, wolf, 1);
        system.run(&mut world, 0.01);
        system.run(&mut world, 0.01);
        assert_eq!(world.get::<Health>(rabbit).unwrap().current, full);
        assert!(world.get::<AttackState>(wolf).unwrap().has_struck);
    }

    #[test]
    fn test_target_escaping_reach_takes_no_damage() {
        let (mut world, mut system, wolf, rabbit) = setup(1.0);
        let full = world.get::<Health>(rabbit).unwrap().current;
        system.run(&mut world, 0.01);
        assert!(world.has::<AttackState>(wolf));

        world.set(rabbit, Position::new(1200.0, 1200.0));
        set_frame(&mut world, wolf, 1);
        system.run(&mut world, 0.01);

        assert_eq!(world.get::<Health>(rabbit).unwrap().current, full);
        assert!(!world.has::<DamageFlash>(rabbit));
        let state = world.get::<AttackState>(wolf).unwrap();
        assert!(state.has_struck, "the action frame is spent");

        // Coming back into reach later in the same swing does not re-arm it
        world.set(rabbit, Position::new(430.0, 400.0));
        system.run(&mut world, 0.01);
        assert_eq!(world.get::<Health>(rabbit).unwrap().current, full);
    }

    #[test]
    fn test_kill_converts_and_starts_eating() {
        let (mut world, mut system, wolf, rabbit) = setup(1.0);
        world.set(rabbit, Health { current: 5, max: 50 });
        system.run(&mut world, 0.01);
        set_frame(&mut world, wolf, 1);
        system.run(&mut world, 0.01);

        assert!(world.has::<Corpse>(rabbit));
        assert!(!world.has::<AttackState>(wolf));
        assert_eq!(world.get::<EatingState>(wolf), Some(EatingState::remains(rabbit)));
        assert!(system.cooldown(wolf) > 0.0);
    }

    #[test]
    fn test_finished_clip_ends_attack_with_cooldown() {
        let (mut world, mut system, wolf, _) = setup(0.0);
        system.run(&mut world, 0.01);
        let mut anim = world.get::<Animation>(wolf).unwrap();
        anim.playing = false;
        world.set(wolf, anim);
        system.run(&mut world, 0.01);

        assert!(!world.has::<AttackState>(wolf));
        assert!(system.cooldown(wolf) > 0.0);
        system.run(&mut world, 0.01);
        assert!(!world.has::<AttackState>(wolf), "still cooling down");
    }

    #[test]
    fn test_stalled_clip_times_out() {
        let (mut world, mut system, wolf, _) = setup(0.0);
        system.run(&mut world, 0.01);
        system.run(&mut world, 0.6);
        assert!(!world.has::<AttackState>(wolf));
    }
}
