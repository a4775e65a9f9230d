pub mod config;
pub mod error;
pub mod types;

pub use config::SimulationConfig;
pub use error::{Result, SavannaError};
pub use types::{AnimalType, BehaviorType, EntityId, Vec2, TILE_SIZE};
