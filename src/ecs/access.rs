//! Narrow capabilities handed to pipeline stages
//!
//! Stages are written against these traits instead of `World` so each one
//! only sees what it needs. A behavior stage, for instance, has no way to
//! create or destroy entities.

use std::ops::ControlFlow;

use crate::core::types::{EntityId, Vec2};
use crate::ecs::component::{Component, ComponentMask};
use crate::simulation::vegetation::Vegetation;

/// Liveness, component access and mask queries
pub trait ComponentAccess {
    fn is_alive(&self, id: EntityId) -> bool;
    fn has<C: Component>(&self, id: EntityId) -> bool;
    fn get<C: Component>(&self, id: EntityId) -> Option<C>;
    /// Overwrite an existing component; false if absent
    fn set<C: Component>(&mut self, id: EntityId, value: C) -> bool;
    /// Attach or overwrite a component; false if the entity is not alive
    fn add<C: Component>(&mut self, id: EntityId, value: C) -> bool;
    fn remove<C: Component>(&mut self, id: EntityId) -> bool;

    /// Fill `out` with live entities matching `mask`, ascending id order
    fn collect_with(&self, mask: ComponentMask, out: &mut Vec<EntityId>);
    fn count_with(&self, mask: ComponentMask) -> usize;
    fn find_first(&self, mask: ComponentMask, pred: impl FnMut(EntityId) -> bool) -> Option<EntityId>;
    fn for_each_with_break(&self, mask: ComponentMask, f: impl FnMut(EntityId) -> ControlFlow<()>);
}

/// World bounds and spatial index queries
pub trait SpatialAccess {
    /// World width and height in world units
    fn world_size(&self) -> Vec2;
    fn query_radius(&self, center: Vec2, radius: f32) -> Vec<EntityId>;
    /// Closest entity whose centre is within `radius` and which passes `pred`
    fn nearest_matching(&self, center: Vec2, radius: f32, pred: impl FnMut(EntityId) -> bool) -> Option<EntityId>;
}

/// Draws from the world's deterministic RNG
pub trait RandomAccess {
    /// Uniform in `[0, 1)`
    fn random_f32(&mut self) -> f32;
    /// Uniform in `[min, max)`; returns `min` when the range is empty
    fn random_range(&mut self, min: f32, max: f32) -> f32;
}

/// The grass field
pub trait VegetationAccess {
    fn vegetation(&self) -> &Vegetation;
    fn vegetation_mut(&mut self) -> &mut Vegetation;
}

/// Entity creation and destruction
pub trait LifecycleAccess {
    fn create_entity(&mut self) -> Option<EntityId>;
    fn destroy_entity(&mut self, id: EntityId) -> bool;
}

/// Movement, collision and boundary stages
pub trait MovementWorld: ComponentAccess + SpatialAccess {}
impl<T: ComponentAccess + SpatialAccess> MovementWorld for T {}

/// Behavior AI and grass search
pub trait BehaviorWorld: ComponentAccess + SpatialAccess + RandomAccess + VegetationAccess {}
impl<T: ComponentAccess + SpatialAccess + RandomAccess + VegetationAccess> BehaviorWorld for T {}

/// Attack state machine
pub trait CombatWorld: ComponentAccess + SpatialAccess + RandomAccess + LifecycleAccess {}
impl<T: ComponentAccess + SpatialAccess + RandomAccess + LifecycleAccess> CombatWorld for T {}

/// Grass and remains eating
pub trait FeedingWorld: ComponentAccess + SpatialAccess + VegetationAccess + LifecycleAccess {}
impl<T: ComponentAccess + SpatialAccess + VegetationAccess + LifecycleAccess> FeedingWorld for T {}

/// Decay and death handling
pub trait LifecycleWorld: ComponentAccess + LifecycleAccess {}
impl<T: ComponentAccess + LifecycleAccess> LifecycleWorld for T {}
