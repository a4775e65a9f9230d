//! Frame-gated feeding shared by grass and remains eating
//!
//! A bite happens only when an eater's eat clip moves from frame 0 onto
//! `ACTION_FRAME`. `FrameTracker` remembers the previous frame per eater;
//! `FoodSource` abstracts over what is being eaten so both feeding stages
//! go through the same `DiscreteConsumption::bite`.

use ahash::AHashMap;

use crate::core::types::{EntityId, Vec2};
use crate::ecs::access::{ComponentAccess, VegetationAccess};
use crate::entity::animation::{AnimationKind, ACTION_FRAME};
use crate::entity::components::{Animation, Carrion, Corpse, EatingState, FoodKind, Position, Satiation};

/// Previous eat-clip frame for each eater
#[derive(Debug, Default)]
pub struct FrameTracker {
    previous: AHashMap<EntityId, u8>,
}

impl FrameTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current frame; true exactly when it just moved 0 -> 1
    ///
    /// Anything other than a playing eat clip resets the memory, so the
    /// first observation after (re)starting never counts as a bite.
    pub fn observe(&mut self, id: EntityId, anim: &Animation) -> bool {
        if anim.kind != AnimationKind::Eat || !anim.playing {
            self.previous.remove(&id);
            return false;
        }
        let previous = self.previous.insert(id, anim.frame);
        previous == Some(0) && anim.frame == ACTION_FRAME
    }

    pub fn forget(&mut self, id: EntityId) {
        self.previous.remove(&id);
    }

    /// Drop every entry `keep` rejects
    pub fn retain(&mut self, mut keep: impl FnMut(EntityId) -> bool) {
        self.previous.retain(|&id, _| keep(id));
    }

    pub fn len(&self) -> usize {
        self.previous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_empty()
    }
}

/// Something an eater can take bites from
pub trait FoodSource<W: ?Sized> {
    /// Food left that this eater could reach
    fn available(&self, world: &W, eater: EntityId) -> f32;
    /// Remove up to `amount`; returns what was actually taken
    fn take(&mut self, world: &mut W, eater: EntityId, amount: f32) -> f32;
    /// Fraction of the source eaten so far (0-1)
    fn progress(&self, world: &W) -> f32;
}

/// Grass on the nearest qualifying tile within reach of the eater
#[derive(Debug, Clone, Copy)]
pub struct GrassPatch {
    pub reach: f32,
    pub min_amount: f32,
}

impl GrassPatch {
    fn tile<W: ComponentAccess + VegetationAccess + ?Sized>(&self, world: &W, eater: EntityId) -> Option<Vec2> {
        let pos = world.get::<Position>(eater)?.vec();
        world.vegetation().find_nearest_grass(pos, self.reach, self.min_amount)
    }
}

impl<W: ComponentAccess + VegetationAccess + ?Sized> FoodSource<W> for GrassPatch {
    fn available(&self, world: &W, eater: EntityId) -> f32 {
        self.tile(world, eater).map_or(0.0, |tile| world.vegetation().grass_at(tile))
    }

    fn take(&mut self, world: &mut W, eater: EntityId, amount: f32) -> f32 {
        match self.tile(world, eater) {
            Some(tile) => world.vegetation_mut().consume_grass_at(tile, amount),
            None => 0.0,
        }
    }

    fn progress(&self, _world: &W) -> f32 {
        0.0
    }
}

/// A corpse or carrion entity
#[derive(Debug, Clone, Copy)]
pub struct Remains {
    pub target: EntityId,
}

impl<W: ComponentAccess + ?Sized> FoodSource<W> for Remains {
    fn available(&self, world: &W, _eater: EntityId) -> f32 {
        if let Some(corpse) = world.get::<Corpse>(self.target) {
            corpse.nutritional_value
        } else if let Some(carrion) = world.get::<Carrion>(self.target) {
            carrion.nutritional_value
        } else {
            0.0
        }
    }

    fn take(&mut self, world: &mut W, _eater: EntityId, amount: f32) -> f32 {
        if let Some(mut corpse) = world.get::<Corpse>(self.target) {
            let taken = amount.min(corpse.nutritional_value).max(0.0);
            corpse.nutritional_value -= taken;
            world.set(self.target, corpse);
            taken
        } else if let Some(mut carrion) = world.get::<Carrion>(self.target) {
            let taken = amount.min(carrion.nutritional_value).max(0.0);
            carrion.nutritional_value -= taken;
            world.set(self.target, carrion);
            taken
        } else {
            0.0
        }
    }

    fn progress(&self, world: &W) -> f32 {
        let (value, max) = if let Some(c) = world.get::<Corpse>(self.target) {
            (c.nutritional_value, c.max_nutritional_value)
        } else if let Some(c) = world.get::<Carrion>(self.target) {
            (c.nutritional_value, c.max_nutritional_value)
        } else {
            return 1.0;
        };
        if max > 0.0 {
            (1.0 - value / max).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// Outcome of one feeding tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bite {
    /// Not on a bite frame this tick
    Waiting,
    /// A bite landed
    Took {
        /// Food removed from the source
        taken: f32,
        /// Satiation actually added
        gained: f32,
        /// Food left in the source afterwards
        remaining: f32,
    },
}

/// Frame tracking plus bite sizing for one feeding stage
#[derive(Debug)]
pub struct DiscreteConsumption {
    kind: FoodKind,
    bite_size: f32,
    nutrition_per_unit: f32,
    tracker: FrameTracker,
}

impl DiscreteConsumption {
    pub fn new(kind: FoodKind, bite_size: f32, nutrition_per_unit: f32) -> Self {
        Self { kind, bite_size, nutrition_per_unit, tracker: FrameTracker::new() }
    }

    pub fn kind(&self) -> FoodKind {
        self.kind
    }

    /// Take a bite if the eater's clip just reached the bite frame
    ///
    /// On a bite, satiation rises by `taken * nutrition_per_unit` (capped
    /// at full) and the eater's `EatingState` records the gain and source
    /// progress.
    pub fn bite<W, S>(&mut self, world: &mut W, eater: EntityId, source: &mut S) -> Bite
    where
        W: ComponentAccess + ?Sized,
        S: FoodSource<W>,
    {
        let Some(anim) = world.get::<Animation>(eater) else {
            self.tracker.forget(eater);
            return Bite::Waiting;
        };
        if !self.tracker.observe(eater, &anim) {
            return Bite::Waiting;
        }

        let taken = source.take(world, eater, self.bite_size);
        let mut gained = 0.0;
        if let Some(mut satiation) = world.get::<Satiation>(eater) {
            let before = satiation.value;
            satiation.add(taken * self.nutrition_per_unit);
            gained = satiation.value - before;
            world.set(eater, satiation);
        }

        let progress = source.progress(world);
        if let Some(mut state) = world.get::<EatingState>(eater) {
            state.nutrition_gained += gained;
            state.progress = progress;
            world.set(eater, state);
        }

        Bite::Took { taken, gained, remaining: source.available(world, eater) }
    }

    pub fn forget(&mut self, eater: EntityId) {
        self.tracker.forget(eater);
    }

    /// Drop tracker entries for entities no longer eating this kind of food
    pub fn prune<W: ComponentAccess + ?Sized>(&mut self, world: &W) {
        let kind = self.kind;
        self.tracker.retain(|id| world.get::<EatingState>(id).is_some_and(|s| s.target_kind == kind));
    }

    pub fn tracked(&self) -> usize {
        self.tracker.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::TILE_SIZE;
    use crate::ecs::world::World;

    fn eat_frame(frame: u8) -> Animation {
        Animation { kind: AnimationKind::Eat, frame, timer: 0.0, playing: true, facing_right: true }
    }

    #[test]
    fn test_tracker_fires_only_on_zero_to_one() {
        let mut tracker = FrameTracker::new();
        let id = EntityId(1);
        let fired: Vec<bool> = [1, 0, 0, 1, 1, 0, 1].iter().map(|&f| tracker.observe(id, &eat_frame(f))).collect();
        assert_eq!(fired, vec![false, false, false, true, false, false, true]);
    }

    #[test]
    fn test_tracker_resets_off_eat_clip() {
        let mut tracker = FrameTracker::new();
        let id = EntityId(1);
        tracker.observe(id, &eat_frame(0));
        let walking = Animation { kind: AnimationKind::Walk, ..eat_frame(0) };
        assert!(!tracker.observe(id, &walking));
        assert!(tracker.is_empty());
        assert!(!tracker.observe(id, &eat_frame(1)), "first observation only initialises");
    }

    fn eater(world: &mut World, pos: Vec2, satiation: f32) -> EntityId {
        let e = world.create_entity().unwrap();
        world.add(e, Position::from(pos));
        world.add(e, Satiation::new(satiation));
        world.add(e, eat_frame(0));
        e
    }

    #[test]
    fn test_remains_bites_and_caps_satiation() {
        let mut world = World::new(SimulationConfig::default()).unwrap();
        let wolf = eater(&mut world, Vec2::new(100.0, 100.0), 95.0);
        world.add(wolf, EatingState::remains(EntityId::INVALID));
        let corpse = world.create_entity().unwrap();
        world.add(corpse, Corpse { nutritional_value: 50.0, max_nutritional_value: 50.0, decay_timer: 60.0 });

        let mut consumption = DiscreteConsumption::new(FoodKind::Animal, 10.0, 1.0);
        let mut source = Remains { target: corpse };
        assert_eq!(consumption.bite(&mut world, wolf, &mut source), Bite::Waiting);

        world.set(wolf, eat_frame(1));
        let bite = consumption.bite(&mut world, wolf, &mut source);
        assert_eq!(bite, Bite::Took { taken: 10.0, gained: 5.0, remaining: 40.0 });
        assert_eq!(world.get::<Satiation>(wolf).unwrap().value, 100.0);
        let state = world.get::<EatingState>(wolf).unwrap();
        assert_eq!(state.nutrition_gained, 5.0);
        assert!((state.progress - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_grass_patch_consumes_nearest_tile() {
        let mut world = World::new(SimulationConfig::default()).unwrap();
        let pos = Vec2::new(2.5 * TILE_SIZE, 2.5 * TILE_SIZE);
        let rabbit = eater(&mut world, pos, 10.0);
        let before = world.vegetation().grass_at(pos);

        let mut consumption = DiscreteConsumption::new(FoodKind::Grass, 5.0, 2.0);
        let mut patch = GrassPatch { reach: TILE_SIZE, min_amount: 5.0 };
        consumption.bite(&mut world, rabbit, &mut patch);
        world.set(rabbit, eat_frame(1));
        let bite = consumption.bite(&mut world, rabbit, &mut patch);

        assert!(matches!(bite, Bite::Took { taken, gained, .. } if taken == 5.0 && gained == 10.0));
        assert_eq!(world.vegetation().grass_at(pos), before - 5.0);
    }

    #[test]
    fn test_prune_drops_non_eaters() {
        let mut world = World::new(SimulationConfig::default()).unwrap();
        let rabbit = eater(&mut world, Vec2::new(50.0, 50.0), 10.0);
        world.add(rabbit, EatingState::grass());
        let mut consumption = DiscreteConsumption::new(FoodKind::Grass, 5.0, 2.0);
        consumption.bite(&mut world, rabbit, &mut GrassPatch { reach: TILE_SIZE, min_amount: 5.0 });
        assert_eq!(consumption.tracked(), 1);

        world.remove::<EatingState>(rabbit);
        consumption.prune(&world);
        assert_eq!(consumption.tracked(), 0);
    }
}
