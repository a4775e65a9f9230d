//! Savanna - deterministic predator/prey ecosystem simulation

pub mod core;
pub mod ecs;
pub mod entity;
pub mod simulation;
pub mod spatial;
pub mod terrain;
