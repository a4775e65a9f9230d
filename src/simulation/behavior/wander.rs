//! Random wandering shared by every strategy

use std::f32::consts::TAU;

use crate::core::types::Vec2;
use crate::ecs::access::RandomAccess;
use crate::entity::components::Behavior;

/// Random speed factor applied on each new heading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WanderRange {
    pub min: f32,
    pub max: f32,
}

/// Keep `current` until the direction timer expires, then pick a random
/// heading at `max_speed` scaled into the wander range and restart the
/// timer somewhere between the behavior's min and max direction time.
pub fn wander<W: RandomAccess>(
    world: &mut W,
    behavior: &mut Behavior,
    current: Vec2,
    max_speed: f32,
    range: WanderRange,
) -> Vec2 {
    if behavior.direction_timer > 0.0 {
        return current;
    }

    let heading = Vec2::from_angle(world.random_f32() * TAU);
    let factor = world.random_range(range.min, range.max);
    behavior.direction_timer = world.random_range(behavior.min_direction_time, behavior.max_direction_time);
    heading * (max_speed * factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::ecs::world::World;

    fn behavior(timer: f32) -> Behavior {
        Behavior { direction_timer: timer, min_direction_time: 2.0, max_direction_time: 5.0, ..Behavior::default() }
    }

    const RANGE: WanderRange = WanderRange { min: 0.8, max: 1.2 };

    #[test]
    fn test_keeps_velocity_while_timer_runs() {
        let mut world = World::new(SimulationConfig::default()).unwrap();
        let mut b = behavior(1.0);
        let current = Vec2::new(0.3, -0.4);
        assert_eq!(wander(&mut world, &mut b, current, 3.0, RANGE), current);
        assert_eq!(b.direction_timer, 1.0);
    }

    #[test]
    fn test_new_heading_on_expiry() {
        let mut world = World::new(SimulationConfig::default()).unwrap();
        let mut b = behavior(0.0);
        let v = wander(&mut world, &mut b, Vec2::ZERO, 2.0, RANGE);
        let speed = v.length();
        assert!(speed >= 2.0 * 0.8 - 1e-4 && speed <= 2.0 * 1.2 + 1e-4, "speed {}", speed);
        assert!((2.0..5.0).contains(&b.direction_timer));
    }

    #[test]
    fn test_same_seed_same_heading() {
        let pick = || {
            let mut world = World::new(SimulationConfig::default()).unwrap();
            let mut b = behavior(-0.1);
            wander(&mut world, &mut b, Vec2::ZERO, 1.0, RANGE)
        };
        assert_eq!(pick(), pick());
    }
}
