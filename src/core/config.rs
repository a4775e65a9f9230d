//! Simulation configuration with documented constants
//!
//! Tuning values for every pipeline stage live here, grouped by the stage
//! that reads them. Species stats are not part of this file: they are
//! derived by the per-species config factories in `entity::species`.
//!
//! Distances are world units (one tile = `TILE_SIZE`), speeds are tiles per
//! second, times are seconds.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SavannaError};
use crate::core::types::TILE_SIZE;

/// Complete simulation configuration
///
/// Every section falls back to its defaults when missing from a TOML file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default)]
    pub vegetation: VegetationConfig,
    #[serde(default)]
    pub satiation: SatiationConfig,
    #[serde(default)]
    pub movement: MovementConfig,
    #[serde(default)]
    pub combat: CombatConfig,
    #[serde(default)]
    pub feeding: FeedingConfig,
}

/// World dimensions and determinism
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width and height of the square world in tiles
    pub size_tiles: u32,

    /// Seed for the world RNG (wander headings, hit rolls)
    ///
    /// Two worlds with the same seed and the same inputs produce the same
    /// trajectory.
    pub seed: u64,

    /// Upper bound on simultaneously live entities
    ///
    /// Component arrays are allocated once at this size.
    pub max_entities: usize,

    /// Fixed tick rate used by runners to derive `dt`
    pub ticks_per_second: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size_tiles: 50,
            seed: 42,
            max_entities: 1000,
            ticks_per_second: 60,
        }
    }
}

/// Initial population placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub rabbits: usize,
    pub wolves: usize,
    /// Rabbits are placed in groups of up to this many
    pub rabbit_group_size: usize,
    /// Minimum spacing between wolves at placement (tiles)
    pub min_wolf_distance_tiles: f32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            rabbits: 30,
            wolves: 3,
            rabbit_group_size: 3,
            min_wolf_distance_tiles: 8.0,
        }
    }
}

/// Grass growth and lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationConfig {
    /// Grass on a tile never grows past this amount
    pub max_grass: f32,

    /// Grass units gained per second on a plain grass tile
    pub growth_rate: f32,

    /// Growth multiplier on wetland tiles
    pub wetland_multiplier: f32,

    /// Growth multiplier on grass tiles bordering water
    pub near_water_multiplier: f32,

    /// Grass amount on growable tiles of the default terrain
    pub initial_grass: f32,

    /// Tiles below this amount are not considered edible
    pub min_grass_amount: f32,

    /// How far (tiles) a herbivore reaches for grass when starting or
    /// continuing a meal
    pub grass_reach_tiles: f32,
}

impl Default for VegetationConfig {
    fn default() -> Self {
        Self {
            max_grass: 100.0,
            growth_rate: 0.5,
            wetland_multiplier: 1.5,
            near_water_multiplier: 0.3,
            initial_grass: 60.0,
            min_grass_amount: 5.0,
            grass_reach_tiles: 1.0,
        }
    }
}

impl VegetationConfig {
    /// Grass reach in world units
    pub fn grass_reach(&self) -> f32 {
        self.grass_reach_tiles * TILE_SIZE
    }
}

/// Appetite, starvation and the speed modifiers derived from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SatiationConfig {
    /// Satiation points lost per second
    ///
    /// At 1.0, a rabbit drops from its initial 80 to its hunger threshold
    /// of 70 in ten seconds.
    pub decay_rate: f32,

    /// Collision radius (world units) above which an animal counts as large
    pub large_animal_radius: f32,

    /// Decay multiplier applied to large animals
    pub large_animal_multiplier: f32,

    /// Satiation within this distance of 100 counts as full
    pub full_tolerance: f32,

    /// Above this satiation animals slow down from overeating
    pub overfed_threshold: f32,

    /// Floor for the combined satiation/health speed multiplier
    pub min_speed_multiplier: f32,

    /// Health lost per starvation interval at zero satiation
    pub starvation_damage: i16,

    /// Seconds between starvation damage ticks
    pub starvation_interval: f32,
}

impl Default for SatiationConfig {
    fn default() -> Self {
        Self {
            decay_rate: 1.0,
            large_animal_radius: 20.0,
            large_animal_multiplier: 0.5,
            full_tolerance: 0.1,
            overfed_threshold: 80.0,
            min_speed_multiplier: 0.1,
            starvation_damage: 5,
            starvation_interval: 1.0,
        }
    }
}

/// Movement, collision and boundary tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // === BOUNDARY ===
    /// Gap kept between an animal's edge and the world edge (world units)
    pub boundary_margin: f32,

    /// Fraction of velocity kept when bouncing off the boundary
    pub reflection_damping: f32,

    /// Reflected velocity components below this (tiles/s) are zeroed
    pub min_reflect_speed: f32,

    // === COLLISION ===
    /// Broad-phase search radius as a multiple of collision radius
    pub collision_search_multiplier: f32,

    /// Pairs closer than the sum of radii plus this margin are separated
    pub collision_safety_margin: f32,

    /// Fraction of penetration each entity is moved per tick
    pub separation_force_multiplier: f32,

    /// Largest positional push applied per tick (world units)
    pub max_separation_per_tick: f32,

    /// Velocity kept by both animals in a predator/prey contact
    pub predator_prey_damping: f32,

    /// Predator/prey penetration (world units) above which they are nudged
    pub soft_push_threshold: f32,

    /// Velocity nudge (tiles/s) for deep predator/prey contacts
    pub soft_push_force: f32,

    /// Penetration (world units) above which a push-apart impulse is added
    pub penetration_threshold: f32,

    /// Push-apart impulse per tile of penetration (tiles/s)
    pub push_force_multiplier: f32,

    // === STEERING ===
    /// Edge zone, as a fraction of world size, where fleeing prey is pushed
    /// back toward the interior
    pub flee_boundary_zone: f32,

    /// Strength of that push at the very edge
    pub flee_boundary_strength: f32,

    /// Herbivores within this multiple of collision radius are avoided
    /// while walking to grass
    pub neighbor_avoidance_multiplier: f32,

    /// Weight of neighbor avoidance relative to the grass heading
    pub neighbor_avoidance_weight: f32,

    /// Multiple of collision radius within which grass counts as adjacent
    pub grass_proximity_multiplier: f32,

    /// Random speed multiplier range picked on each new wander heading
    pub wander_speed_min: f32,
    pub wander_speed_max: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            boundary_margin: 0.1 * TILE_SIZE,
            reflection_damping: 0.8,
            min_reflect_speed: 0.05,
            collision_search_multiplier: 1.1,
            collision_safety_margin: 1.0,
            separation_force_multiplier: 0.5,
            max_separation_per_tick: 0.5 * TILE_SIZE,
            predator_prey_damping: 0.7,
            soft_push_threshold: 8.0,
            soft_push_force: 0.5,
            penetration_threshold: 1.0,
            push_force_multiplier: 10.0,
            flee_boundary_zone: 0.05,
            flee_boundary_strength: 0.5,
            neighbor_avoidance_multiplier: 2.0,
            neighbor_avoidance_weight: 0.5,
            grass_proximity_multiplier: 1.0,
            wander_speed_min: 0.8,
            wander_speed_max: 1.2,
        }
    }
}

/// Attack state machine tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Windup length assumed when the attack clip stalls
    pub windup_fallback: f32,

    /// Strike length assumed when the attack clip stalls
    ///
    /// An attack older than `windup_fallback + strike_fallback` is ended
    /// regardless of animation state. The defaults exceed the attack clip
    /// length (2 frames at 6 fps) so the fallback only fires on stalls.
    pub strike_fallback: f32,

    /// Lifetime of the hit flash attached to a damaged animal
    pub damage_flash_duration: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            windup_fallback: 0.17,
            strike_fallback: 0.33,
            damage_flash_duration: 0.16,
        }
    }
}

/// Bite sizes and remains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedingConfig {
    /// Grass units removed from the tile per bite
    pub grass_per_bite: f32,

    /// Satiation gained per grass unit
    pub grass_nutrition: f32,

    /// Nutrition stored in a fresh corpse
    pub corpse_nutrition: f32,

    /// Seconds an untouched corpse lasts; carrion loses
    /// `corpse_nutrition / corpse_decay_time` per second
    pub corpse_decay_time: f32,

    /// Nutrition removed from remains per bite
    pub corpse_bite: f32,

    /// Satiation gained per nutrition unit of remains
    pub corpse_nutrition_value: f32,

    /// Distance (world units) at which a predator can start eating remains
    pub eating_range: f32,
}

impl Default for FeedingConfig {
    fn default() -> Self {
        Self {
            grass_per_bite: 5.0,
            grass_nutrition: 2.0,
            corpse_nutrition: 50.0,
            corpse_decay_time: 60.0,
            corpse_bite: 10.0,
            corpse_nutrition_value: 1.0,
            eating_range: 1.5 * TILE_SIZE,
        }
    }
}

impl SimulationConfig {
    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// World side length in world units
    pub fn world_size(&self) -> f32 {
        self.world.size_tiles as f32 * TILE_SIZE
    }

    /// Fixed timestep matching `ticks_per_second`
    pub fn fixed_dt(&self) -> f32 {
        1.0 / self.world.ticks_per_second as f32
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, value: f32) -> Result<()> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(SavannaError::InvalidConfig(format!("{} must be positive, got {}", name, value)))
            }
        }
        fn unit(name: &str, value: f32) -> Result<()> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(SavannaError::InvalidConfig(format!("{} must be in [0, 1], got {}", name, value)))
            }
        }

        if self.world.size_tiles == 0 {
            return Err(SavannaError::InvalidConfig("world.size_tiles must be positive".into()));
        }
        if self.world.max_entities == 0 {
            return Err(SavannaError::InvalidConfig("world.max_entities must be positive".into()));
        }
        if self.world.ticks_per_second == 0 {
            return Err(SavannaError::InvalidConfig("world.ticks_per_second must be positive".into()));
        }

        positive("vegetation.max_grass", self.vegetation.max_grass)?;
        positive("vegetation.growth_rate", self.vegetation.growth_rate)?;
        positive("vegetation.grass_reach_tiles", self.vegetation.grass_reach_tiles)?;
        if self.vegetation.initial_grass < 0.0 || self.vegetation.initial_grass > self.vegetation.max_grass {
            return Err(SavannaError::InvalidConfig(format!(
                "vegetation.initial_grass must be in [0, {}], got {}",
                self.vegetation.max_grass, self.vegetation.initial_grass
            )));
        }

        positive("satiation.decay_rate", self.satiation.decay_rate)?;
        positive("satiation.starvation_interval", self.satiation.starvation_interval)?;
        unit("satiation.min_speed_multiplier", self.satiation.min_speed_multiplier)?;

        unit("movement.reflection_damping", self.movement.reflection_damping)?;
        unit("movement.predator_prey_damping", self.movement.predator_prey_damping)?;
        unit("movement.flee_boundary_zone", self.movement.flee_boundary_zone)?;
        positive("movement.collision_search_multiplier", self.movement.collision_search_multiplier)?;
        if self.movement.wander_speed_min > self.movement.wander_speed_max {
            return Err(SavannaError::InvalidConfig(format!(
                "movement.wander_speed_min ({}) exceeds wander_speed_max ({})",
                self.movement.wander_speed_min, self.movement.wander_speed_max
            )));
        }
        if self.movement.boundary_margin < 0.0 || self.movement.boundary_margin * 2.0 >= self.world_size() {
            return Err(SavannaError::InvalidConfig("movement.boundary_margin does not fit the world".into()));
        }

        positive("combat.windup_fallback", self.combat.windup_fallback)?;
        positive("combat.strike_fallback", self.combat.strike_fallback)?;
        positive("combat.damage_flash_duration", self.combat.damage_flash_duration)?;

        positive("feeding.grass_per_bite", self.feeding.grass_per_bite)?;
        positive("feeding.corpse_nutrition", self.feeding.corpse_nutrition)?;
        positive("feeding.corpse_decay_time", self.feeding.corpse_decay_time)?;
        positive("feeding.corpse_bite", self.feeding.corpse_bite)?;
        positive("feeding.eating_range", self.feeding.eating_range)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.world_size(), 50.0 * TILE_SIZE);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            [world]
            seed = 7

            [population]
            wolves = 5
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.size_tiles, 50);
        assert_eq!(config.population.wolves, 5);
        assert_eq!(config.population.rabbits, 30);
        assert_eq!(config.feeding, FeedingConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = SimulationConfig::default();
        config.movement.wander_speed_min = 2.0;
        config.movement.wander_speed_max = 1.0;
        assert!(matches!(config.validate(), Err(SavannaError::InvalidConfig(_))));

        let mut config = SimulationConfig::default();
        config.vegetation.growth_rate = 0.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.world.size_tiles = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = SimulationConfig::from_toml_str("[world\nseed = ");
        assert!(matches!(result, Err(SavannaError::TomlError(_))));
    }

    #[test]
    fn test_load_sample_config() {
        let config = SimulationConfig::load("data/simulation.toml").expect("Should load sample config");
        assert!(config.validate().is_ok());
        assert!(config.population.rabbits > 0);
    }
}
