//! Animal components, species stats and spawning

pub mod animation;
pub mod components;
pub mod factory;
pub mod population;
pub mod registry;
pub mod species;

pub use animation::{AnimationClip, AnimationKind, ACTION_FRAME};
pub use components::*;
pub use factory::create_animal;
pub use population::{populate, Spawned};
pub use registry::AnimalRegistry;
