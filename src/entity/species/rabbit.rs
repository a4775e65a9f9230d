//! Rabbit: the herbivore

use crate::core::types::TILE_SIZE;
use crate::entity::components::AnimalConfig;
use crate::entity::species::{
    AnimalConfigFactory, COLLISION_RADIUS_MULTIPLIER, CONTENT_SPEED_MULTIPLIER, SEARCH_SPEED_MULTIPLIER,
    WANDERING_SPEED_MULTIPLIER,
};

pub const RABBIT_BASE_RADIUS: f32 = 0.5 * TILE_SIZE;
pub const RABBIT_MAX_HEALTH: i16 = 50;
/// Tiles per second
pub const RABBIT_BASE_SPEED: f32 = 2.5;
pub const RABBIT_VISION_MULTIPLIER: f32 = 12.0;
pub const RABBIT_FLEE_DISTANCE_MULTIPLIER: f32 = 8.0;
pub const RABBIT_SATIATION_THRESHOLD: f32 = 70.0;
pub const RABBIT_INITIAL_SATIATION: f32 = 80.0;
pub const RABBIT_MIN_DIRECTION_TIME: f32 = 1.5;
pub const RABBIT_MAX_DIRECTION_TIME: f32 = 4.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct RabbitConfigFactory;

impl AnimalConfigFactory for RabbitConfigFactory {
    fn create_config(&self) -> AnimalConfig {
        AnimalConfig {
            base_radius: RABBIT_BASE_RADIUS,
            max_health: RABBIT_MAX_HEALTH,
            base_speed: RABBIT_BASE_SPEED,

            collision_radius: RABBIT_BASE_RADIUS * COLLISION_RADIUS_MULTIPLIER,
            attack_range: 0.0,
            vision_range: RABBIT_BASE_RADIUS * RABBIT_VISION_MULTIPLIER,

            satiation_threshold: RABBIT_SATIATION_THRESHOLD,
            flee_threshold: RABBIT_BASE_RADIUS * RABBIT_FLEE_DISTANCE_MULTIPLIER,

            search_speed: SEARCH_SPEED_MULTIPLIER,
            wandering_speed: WANDERING_SPEED_MULTIPLIER,
            content_speed: CONTENT_SPEED_MULTIPLIER,

            min_direction_time: RABBIT_MIN_DIRECTION_TIME,
            max_direction_time: RABBIT_MAX_DIRECTION_TIME,

            attack_damage: 0,
            attack_cooldown: 0.0,
            hit_chance: 0.0,
        }
    }
}
