//! Component data attached to animals
//!
//! All components are plain `Copy` data so the store can keep them in dense
//! arrays and zero a slot on destruction.

use serde::{Deserialize, Serialize};

use crate::core::types::{BehaviorType, EntityId, Vec2};
use crate::entity::animation::AnimationKind;

/// Location in world units; mirrored into the spatial index
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn vec(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<Vec2> for Position {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Velocity in tiles per second
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn vec(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl From<Vec2> for Velocity {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: i16,
    pub max: i16,
}

impl Health {
    pub fn full(max: i16) -> Self {
        Self { current: max, max }
    }

    /// Subtract damage, never dropping below zero. Returns true if this
    /// brought the animal to zero.
    pub fn apply_damage(&mut self, damage: i16) -> bool {
        let was_alive = self.current > 0;
        self.current = self.current.saturating_sub(damage.max(0)).max(0);
        was_alive && self.current == 0
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    pub fn ratio(&self) -> f32 {
        if self.max <= 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }
}

/// Fullness on a 0-100 scale
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Satiation {
    pub value: f32,
}

impl Satiation {
    pub const MAX: f32 = 100.0;

    pub fn new(value: f32) -> Self {
        Self { value: value.clamp(0.0, Self::MAX) }
    }

    pub fn add(&mut self, amount: f32) {
        self.value = (self.value + amount).clamp(0.0, Self::MAX);
    }
}

/// Collision radius and attack reach, both world units
///
/// An attack range of zero marks a non-predator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub radius: f32,
    pub attack_range: f32,
}

/// Speeds in tiles per second
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Speed {
    pub base: f32,
    pub current: f32,
}

/// Stat bundle produced by a species factory at creation time
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimalConfig {
    pub base_radius: f32,
    pub max_health: i16,
    pub base_speed: f32,

    pub collision_radius: f32,
    pub attack_range: f32,
    pub vision_range: f32,

    pub satiation_threshold: f32,
    /// Species flee distance, reported to tooling; fleeing itself is
    /// triggered by `vision_range`
    pub flee_threshold: f32,

    pub search_speed: f32,
    pub wandering_speed: f32,
    pub content_speed: f32,

    pub min_direction_time: f32,
    pub max_direction_time: f32,

    pub attack_damage: i16,
    pub attack_cooldown: f32,
    pub hit_chance: f32,
}

impl AnimalConfig {
    pub fn behavior_type(&self) -> BehaviorType {
        if self.attack_range > 0.0 {
            BehaviorType::Predator
        } else {
            BehaviorType::Herbivore
        }
    }
}

/// Strategy selector plus the config values the strategy reads every tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    pub kind: BehaviorType,
    /// Counts down; a new wander heading is picked at zero
    pub direction_timer: f32,
    pub satiation_threshold: f32,
    pub search_speed: f32,
    pub wandering_speed: f32,
    pub content_speed: f32,
    pub vision_range: f32,
    pub min_direction_time: f32,
    pub max_direction_time: f32,
}

impl Behavior {
    pub fn from_config(config: &AnimalConfig) -> Self {
        Self {
            kind: config.behavior_type(),
            direction_timer: 0.0,
            satiation_threshold: config.satiation_threshold,
            search_speed: config.search_speed,
            wandering_speed: config.wandering_speed,
            content_speed: config.content_speed,
            vision_range: config.vision_range,
            min_direction_time: config.min_direction_time,
            max_direction_time: config.max_direction_time,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackPhase {
    #[default]
    Windup,
    Strike,
}

/// Present only while a predator is mid-attack
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackState {
    pub target: EntityId,
    pub phase: AttackPhase,
    pub phase_timer: f32,
    pub total_timer: f32,
    pub has_struck: bool,
}

impl AttackState {
    pub fn begin(target: EntityId) -> Self {
        Self {
            target,
            phase: AttackPhase::Windup,
            phase_timer: 0.0,
            total_timer: 0.0,
            has_struck: false,
        }
    }
}

/// Which stage owns an `EatingState`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    #[default]
    Grass,
    Animal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EatingState {
    /// Remains being eaten; `EntityId::INVALID` for grass
    pub target: EntityId,
    pub target_kind: FoodKind,
    /// Fraction of the remains already eaten (0-1)
    pub progress: f32,
    pub nutrition_gained: f32,
}

impl EatingState {
    pub fn grass() -> Self {
        Self { target: EntityId::INVALID, target_kind: FoodKind::Grass, progress: 0.0, nutrition_gained: 0.0 }
    }

    pub fn remains(target: EntityId) -> Self {
        Self { target, target_kind: FoodKind::Animal, progress: 0.0, nutrition_gained: 0.0 }
    }
}

/// Fresh remains of a killed herbivore
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpse {
    pub nutritional_value: f32,
    pub max_nutritional_value: f32,
    pub decay_timer: f32,
}

/// Remains abandoned before they were finished
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Carrion {
    pub nutritional_value: f32,
    pub max_nutritional_value: f32,
    pub decay_timer: f32,
    pub abandoned_by: EntityId,
}

/// Hit highlight for the renderer; fades to zero then disappears
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageFlash {
    pub timer: f32,
    pub duration: f32,
    pub intensity: f32,
}

impl DamageFlash {
    pub fn new(duration: f32) -> Self {
        Self { timer: duration, duration, intensity: 1.0 }
    }
}

/// Playback state of the current clip
///
/// Combat and eating read `frame` as their clock: a strike or a bite is
/// granted only when the frame moves onto index 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub kind: AnimationKind,
    pub frame: u8,
    pub timer: f32,
    pub playing: bool,
    pub facing_right: bool,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            kind: AnimationKind::Idle,
            frame: 0,
            timer: 0.0,
            playing: true,
            facing_right: true,
        }
    }
}

impl Animation {
    /// Switch clip and restart it from frame 0
    pub fn play(&mut self, kind: AnimationKind) {
        self.kind = kind;
        self.frame = 0;
        self.timer = 0.0;
        self.playing = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage_clamps_at_zero() {
        let mut health = Health::full(50);
        assert!(!health.apply_damage(25));
        assert_eq!(health.current, 25);
        assert!(health.apply_damage(40));
        assert_eq!(health.current, 0);
        // Already dead: no second kill reported
        assert!(!health.apply_damage(10));
        assert_eq!(health.current, 0);
    }

    #[test]
    fn test_satiation_stays_in_range() {
        let mut s = Satiation::new(95.0);
        s.add(20.0);
        assert_eq!(s.value, 100.0);
        s.add(-150.0);
        assert_eq!(s.value, 0.0);
        assert_eq!(Satiation::new(-3.0).value, 0.0);
    }

    #[test]
    fn test_behavior_type_follows_attack_range() {
        let mut config = AnimalConfig::default();
        assert_eq!(config.behavior_type(), BehaviorType::Herbivore);
        config.attack_range = 10.0;
        assert_eq!(config.behavior_type(), BehaviorType::Predator);
    }

    #[test]
    fn test_behavior_copies_decision_stats() {
        let config = AnimalConfig {
            attack_range: 30.0,
            vision_range: 384.0,
            satiation_threshold: 60.0,
            flee_threshold: 128.0,
            search_speed: 1.0,
            ..AnimalConfig::default()
        };
        let behavior = Behavior::from_config(&config);
        assert_eq!(behavior.kind, BehaviorType::Predator);
        assert_eq!(behavior.vision_range, 384.0);
        assert_eq!(behavior.satiation_threshold, 60.0);
        assert_eq!(behavior.search_speed, 1.0);
        assert_eq!(behavior.direction_timer, 0.0);
    }

    #[test]
    fn test_animation_play_restarts_clip() {
        let mut anim = Animation { kind: AnimationKind::Walk, frame: 3, timer: 0.1, playing: false, facing_right: false };
        anim.play(AnimationKind::Attack);
        assert_eq!(anim.kind, AnimationKind::Attack);
        assert_eq!(anim.frame, 0);
        assert_eq!(anim.timer, 0.0);
        assert!(anim.playing);
        assert!(!anim.facing_right, "facing is preserved");
    }
}
