//! Animation stage: pick each animal's clip and advance it
//!
//! Runs last in the pipeline, so the frame it leaves behind is what the
//! combat and feeding stages see on the next tick.

use crate::core::types::EntityId;
use crate::ecs::access::ComponentAccess;
use crate::ecs::component::ComponentMask;
use crate::ecs::world::World;
use crate::entity::animation::{advance, AnimationKind};
use crate::entity::components::{Animation, AttackState, Carrion, Corpse, EatingState, Speed, Velocity};
use crate::simulation::system::System;

/// Below this speed (tiles per second) an animal is idle
pub const IDLE_SPEED: f32 = 0.1;
/// Fraction of base speed above which an animal runs
pub const RUN_FRACTION: f32 = 0.75;
/// Horizontal speed needed to turn around
const FACING_THRESHOLD: f32 = 0.01;

/// Clip an entity should be showing given its state
pub fn resolve_clip<W: ComponentAccess>(world: &W, id: EntityId) -> AnimationKind {
    if world.has::<Corpse>(id) || world.has::<Carrion>(id) {
        return AnimationKind::DeathDying;
    }
    if world.has::<EatingState>(id) {
        return AnimationKind::Eat;
    }
    if world.has::<AttackState>(id) {
        return AnimationKind::Attack;
    }

    let speed = world.get::<Velocity>(id).map_or(0.0, |v| v.vec().length());
    if speed < IDLE_SPEED {
        return AnimationKind::Idle;
    }
    let base = world.get::<Speed>(id).map_or(speed, |s| s.base);
    if speed < base * RUN_FRACTION {
        AnimationKind::Walk
    } else {
        AnimationKind::Run
    }
}

#[derive(Debug, Default)]
pub struct AnimationSystem {
    scratch: Vec<EntityId>,
}

impl AnimationSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run<W: ComponentAccess>(&mut self, world: &mut W, dt: f32) {
        let mut ids = std::mem::take(&mut self.scratch);
        world.collect_with(ComponentMask::ANIMATION, &mut ids);

        for &id in &ids {
            let Some(mut anim) = world.get::<Animation>(id) else { continue };
            let desired = resolve_clip(world, id);

            // A swing in progress always plays out, unless the attacker died
            let swinging = anim.kind == AnimationKind::Attack && anim.playing;
            if anim.kind != desired && (!swinging || desired == AnimationKind::DeathDying) {
                anim.play(desired);
            }

            if let Some(vel) = world.get::<Velocity>(id) {
                if vel.x.abs() > FACING_THRESHOLD {
                    anim.facing_right = vel.x > 0.0;
                }
            }

            advance(&mut anim, dt);
            world.set(id, anim);
        }

        self.scratch = ids;
    }
}

impl System for AnimationSystem {
    fn name(&self) -> &'static str {
        "animation"
    }

    fn update(&mut self, world: &mut World, dt: f32) {
        self.run(world, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;

    fn animal(world: &mut World, vel: Velocity) -> EntityId {
        let e = world.create_entity().unwrap();
        world.add(e, vel);
        world.add(e, Speed { base: 2.0, current: 2.0 });
        world.add(e, Animation::default());
        e
    }

    #[test]
    fn test_clip_by_speed() {
        let mut world = World::new(SimulationConfig::default()).unwrap();
        let idle = animal(&mut world, Velocity::new(0.05, 0.0));
        let walk = animal(&mut world, Velocity::new(1.0, 0.0));
        let run = animal(&mut world, Velocity::new(-1.8, 0.0));

        AnimationSystem::new().run(&mut world, 0.01);
        assert_eq!(world.get::<Animation>(idle).unwrap().kind, AnimationKind::Idle);
        assert_eq!(world.get::<Animation>(walk).unwrap().kind, AnimationKind::Walk);
        let running = world.get::<Animation>(run).unwrap();
        assert_eq!(running.kind, AnimationKind::Run);
        assert!(!running.facing_right);
    }

    #[test]
    fn test_state_priority() {
        let mut world = World::new(SimulationConfig::default()).unwrap();
        let e = animal(&mut world, Velocity::new(2.0, 0.0));
        world.add(e, AttackState::begin(EntityId(9)));
        assert_eq!(resolve_clip(&world, e), AnimationKind::Attack);
        world.add(e, EatingState::grass());
        assert_eq!(resolve_clip(&world, e), AnimationKind::Eat);
        world.add(e, Corpse::default());
        assert_eq!(resolve_clip(&world, e), AnimationKind::DeathDying);
    }

    #[test]
    fn test_attack_clip_not_interrupted() {
        let mut world = World::new(SimulationConfig::default()).unwrap();
        let e = animal(&mut world, Velocity::new(2.0, 0.0));
        let mut anim = Animation::default();
        anim.play(AnimationKind::Attack);
        world.set(e, anim);

        let mut system = AnimationSystem::new();
        let step = AnimationKind::Attack.clip().frame_duration();
        system.run(&mut world, step);
        let anim = world.get::<Animation>(e).unwrap();
        assert_eq!((anim.kind, anim.frame), (AnimationKind::Attack, 1));

        system.run(&mut world, step);
        assert!(!world.get::<Animation>(e).unwrap().playing);
        system.run(&mut world, 0.01);
        assert_eq!(world.get::<Animation>(e).unwrap().kind, AnimationKind::Run);
    }
}
