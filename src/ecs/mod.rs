//! Entity-component storage, queries and world ownership

pub mod access;
pub mod component;
pub mod entity;
pub mod query;
pub mod world;

pub use access::{
    BehaviorWorld, CombatWorld, ComponentAccess, FeedingWorld, LifecycleAccess, LifecycleWorld, MovementWorld,
    RandomAccess, SpatialAccess, VegetationAccess,
};
pub use component::{Component, ComponentKind, ComponentMask};
pub use world::{PopulationStats, World};
