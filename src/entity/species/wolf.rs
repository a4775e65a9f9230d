//! Wolf: the predator

use crate::core::types::TILE_SIZE;
use crate::entity::components::AnimalConfig;
use crate::entity::species::{
    AnimalConfigFactory, COLLISION_RADIUS_MULTIPLIER, CONTENT_SPEED_MULTIPLIER, HUNTING_SPEED_MULTIPLIER,
    WANDERING_SPEED_MULTIPLIER,
};

pub const WOLF_BASE_RADIUS: f32 = 0.75 * TILE_SIZE;
pub const WOLF_MAX_HEALTH: i16 = 100;
/// Tiles per second
pub const WOLF_BASE_SPEED: f32 = 3.2;
pub const WOLF_ATTACK_RANGE_MULTIPLIER: f32 = 1.25;
pub const WOLF_VISION_MULTIPLIER: f32 = 16.0;
pub const WOLF_SATIATION_THRESHOLD: f32 = 60.0;
pub const WOLF_INITIAL_SATIATION: f32 = 70.0;
pub const WOLF_MIN_DIRECTION_TIME: f32 = 2.0;
pub const WOLF_MAX_DIRECTION_TIME: f32 = 5.0;
/// Two bites kill a rabbit
pub const WOLF_ATTACK_DAMAGE: i16 = 25;
pub const WOLF_ATTACK_COOLDOWN: f32 = 1.0;
pub const WOLF_HIT_CHANCE: f32 = 0.8;

#[derive(Debug, Clone, Copy, Default)]
pub struct WolfConfigFactory;

impl AnimalConfigFactory for WolfConfigFactory {
    fn create_config(&self) -> AnimalConfig {
        AnimalConfig {
            base_radius: WOLF_BASE_RADIUS,
            max_health: WOLF_MAX_HEALTH,
            base_speed: WOLF_BASE_SPEED,

            collision_radius: WOLF_BASE_RADIUS * COLLISION_RADIUS_MULTIPLIER,
            attack_range: WOLF_BASE_RADIUS * WOLF_ATTACK_RANGE_MULTIPLIER,
            vision_range: WOLF_BASE_RADIUS * WOLF_VISION_MULTIPLIER,

            satiation_threshold: WOLF_SATIATION_THRESHOLD,
            // Wolves never flee
            flee_threshold: 0.0,

            search_speed: HUNTING_SPEED_MULTIPLIER,
            wandering_speed: WANDERING_SPEED_MULTIPLIER,
            content_speed: CONTENT_SPEED_MULTIPLIER,

            min_direction_time: WOLF_MIN_DIRECTION_TIME,
            max_direction_time: WOLF_MAX_DIRECTION_TIME,

            attack_damage: WOLF_ATTACK_DAMAGE,
            attack_cooldown: WOLF_ATTACK_COOLDOWN,
            hit_chance: WOLF_HIT_CHANCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::BehaviorType;

    #[test]
    fn test_wolf_stats_derive_from_base_radius() {
        let config = WolfConfigFactory.create_config();
        assert_eq!(config.attack_range, WOLF_BASE_RADIUS * WOLF_ATTACK_RANGE_MULTIPLIER);
        assert_eq!(config.vision_range, WOLF_BASE_RADIUS * WOLF_VISION_MULTIPLIER);
        assert_eq!(config.behavior_type(), BehaviorType::Predator);
        assert!(config.hit_chance > 0.0 && config.hit_chance <= 1.0);
    }

    #[test]
    fn test_wolf_outsizes_rabbit() {
        use crate::entity::species::RabbitConfigFactory;
        let wolf = WolfConfigFactory.create_config();
        let rabbit = RabbitConfigFactory.create_config();
        assert!(wolf.collision_radius > rabbit.collision_radius);
        assert!(wolf.vision_range > rabbit.vision_range);
        assert!(wolf.base_speed > rabbit.base_speed, "wolves must be able to catch rabbits");
    }
}
