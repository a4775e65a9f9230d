//! Pipeline stages and their ordering
//!
//! The pipeline runs each registered stage exactly once per tick, in
//! registration order. Later stages consume state produced by earlier ones
//! in the same tick, so the order is part of correctness.

use crate::ecs::world::World;

/// One pipeline stage
pub trait System {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Advance this stage by `dt` seconds
    fn update(&mut self, world: &mut World, dt: f32);
}

/// Ordered list of stages
#[derive(Default)]
pub struct Pipeline {
    systems: Vec<Box<dyn System>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stage after all existing ones
    pub fn add(&mut self, system: Box<dyn System>) {
        self.systems.push(system);
    }

    /// Builder form of `add`
    pub fn with(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Stage names in execution order
    pub fn names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    /// Run every stage once
    pub fn run(&mut self, world: &mut World, dt: f32) {
        for system in &mut self.systems {
            tracing::trace!(system = system.name(), tick = world.current_tick(), "running stage");
            system.update(world, dt);
        }
    }
}
