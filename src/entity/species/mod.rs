//! Per-species stat factories
//!
//! Every secondary stat is derived from a species' base radius through a
//! named multiplier, so resizing a species rescales its reach and vision
//! consistently.

pub mod rabbit;
pub mod wolf;

use crate::core::types::TILE_SIZE;
use crate::entity::components::AnimalConfig;

pub use rabbit::RabbitConfigFactory;
pub use wolf::WolfConfigFactory;

/// Collision radius as a multiple of base radius
pub const COLLISION_RADIUS_MULTIPLIER: f32 = 1.0;

/// Herbivore speed multiplier while walking to grass
pub const SEARCH_SPEED_MULTIPLIER: f32 = 0.8;
/// Predator speed multiplier while chasing prey
pub const HUNTING_SPEED_MULTIPLIER: f32 = 1.0;
/// Speed multiplier while hungry with nothing in sight
pub const WANDERING_SPEED_MULTIPLIER: f32 = 0.6;
/// Speed multiplier while sated
pub const CONTENT_SPEED_MULTIPLIER: f32 = 0.35;

/// Produces the stat bundle for one species
pub trait AnimalConfigFactory {
    fn create_config(&self) -> AnimalConfig;
}

/// Fallback for species without a registered factory: a small,
/// short-sighted herbivore
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConfigFactory;

impl AnimalConfigFactory for DefaultConfigFactory {
    fn create_config(&self) -> AnimalConfig {
        let base_radius = 0.5 * TILE_SIZE;
        AnimalConfig {
            base_radius,
            max_health: 50,
            base_speed: 2.0,
            collision_radius: base_radius * COLLISION_RADIUS_MULTIPLIER,
            attack_range: 0.0,
            vision_range: base_radius * 8.0,
            satiation_threshold: 60.0,
            flee_threshold: base_radius * 6.0,
            search_speed: SEARCH_SPEED_MULTIPLIER,
            wandering_speed: WANDERING_SPEED_MULTIPLIER,
            content_speed: CONTENT_SPEED_MULTIPLIER,
            min_direction_time: 2.0,
            max_direction_time: 4.0,
            attack_damage: 0,
            attack_cooldown: 0.0,
            hit_chance: 0.0,
        }
    }
}
