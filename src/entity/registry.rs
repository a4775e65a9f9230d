//! Species registry
//!
//! Maps each `AnimalType` to the factory that produces its stats, plus the
//! satiation a freshly spawned animal of that species starts with.

use ahash::AHashMap;

use crate::core::types::AnimalType;
use crate::entity::components::AnimalConfig;
use crate::entity::species::rabbit::RABBIT_INITIAL_SATIATION;
use crate::entity::species::wolf::WOLF_INITIAL_SATIATION;
use crate::entity::species::{AnimalConfigFactory, DefaultConfigFactory, RabbitConfigFactory, WolfConfigFactory};

/// Satiation for species registered without an explicit value
pub const DEFAULT_INITIAL_SATIATION: f32 = 75.0;

pub struct AnimalRegistry {
    factories: AHashMap<AnimalType, Box<dyn AnimalConfigFactory>>,
    initial_satiation: AHashMap<AnimalType, f32>,
    fallback: Box<dyn AnimalConfigFactory>,
}

impl Default for AnimalRegistry {
    /// Registry with rabbits and wolves registered
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(AnimalType::Rabbit, Box::new(RabbitConfigFactory), RABBIT_INITIAL_SATIATION);
        registry.register(AnimalType::Wolf, Box::new(WolfConfigFactory), WOLF_INITIAL_SATIATION);
        registry
    }
}

impl AnimalRegistry {
    /// Registry with no species; everything resolves to the fallback
    pub fn empty() -> Self {
        Self {
            factories: AHashMap::new(),
            initial_satiation: AHashMap::new(),
            fallback: Box::new(DefaultConfigFactory),
        }
    }

    /// Register or replace a species
    pub fn register(&mut self, kind: AnimalType, factory: Box<dyn AnimalConfigFactory>, initial_satiation: f32) {
        self.factories.insert(kind, factory);
        self.initial_satiation.insert(kind, initial_satiation);
    }

    pub fn is_registered(&self, kind: AnimalType) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Stats for `kind`, from the fallback factory when unregistered
    pub fn create_config(&self, kind: AnimalType) -> AnimalConfig {
        match self.factories.get(&kind) {
            Some(factory) => factory.create_config(),
            None => self.fallback.create_config(),
        }
    }

    pub fn initial_satiation(&self, kind: AnimalType) -> f32 {
        self.initial_satiation.get(&kind).copied().unwrap_or(DEFAULT_INITIAL_SATIATION)
    }
}
