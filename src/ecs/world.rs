//! ECS World - owns entities, components, the spatial index, the grass
//! field, the RNG and the system pipeline

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SavannaError};
use crate::core::types::{AnimalType, EntityId, Tick, Vec2, TILE_SIZE};
use crate::ecs::access::{ComponentAccess, LifecycleAccess, RandomAccess, SpatialAccess, VegetationAccess};
use crate::ecs::component::{Component, ComponentMask, ComponentStore};
use crate::ecs::entity::EntityRegistry;
use crate::entity::components::{Position, Size};
use crate::simulation::system::{Pipeline, System};
use crate::simulation::vegetation::Vegetation;
use crate::spatial::SparseHashGrid;
use crate::terrain::{Terrain, TerrainProvider, TileType};

/// Live population counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct PopulationStats {
    pub rabbits: usize,
    pub wolves: usize,
    pub corpses: usize,
    pub carrion: usize,
}

/// The simulation world
pub struct World {
    config: SimulationConfig,
    entities: EntityRegistry,
    components: ComponentStore,
    spatial: SparseHashGrid,
    vegetation: Vegetation,
    rng: ChaCha8Rng,
    pipeline: Pipeline,
    width: f32,
    height: f32,
    current_tick: Tick,
    elapsed: f32,
}

impl World {
    /// World over uniform grassland sized from the config
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let tiles = config.world.size_tiles as usize;
        let terrain = Terrain::filled(tiles, tiles, TileType::Grass, config.vegetation.initial_grass);
        Self::with_terrain(config, Box::new(terrain))
    }

    /// World over a caller-supplied terrain; the world spans the terrain
    pub fn with_terrain(config: SimulationConfig, terrain: Box<dyn TerrainProvider>) -> Result<Self> {
        config.validate()?;
        let (tiles_w, tiles_h) = terrain.size();
        if tiles_w == 0 || tiles_h == 0 {
            return Err(SavannaError::InvalidConfig("terrain must have at least one tile".into()));
        }

        let capacity = config.world.max_entities;
        let rng = ChaCha8Rng::seed_from_u64(config.world.seed);
        let vegetation = Vegetation::new(terrain, config.vegetation.clone());

        Ok(Self {
            entities: EntityRegistry::new(capacity),
            components: ComponentStore::new(capacity + 1),
            spatial: SparseHashGrid::new(TILE_SIZE),
            vegetation,
            rng,
            pipeline: Pipeline::default(),
            width: tiles_w as f32 * TILE_SIZE,
            height: tiles_h as f32 * TILE_SIZE,
            current_tick: 0,
            elapsed: 0.0,
            config,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    /// Simulated seconds since creation
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn entity_count(&self) -> usize {
        self.entities.live_count()
    }

    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter_alive()
    }

    pub fn spatial(&self) -> &SparseHashGrid {
        &self.spatial
    }

    // === PIPELINE ===

    /// Append a stage to the pipeline
    pub fn add_system(&mut self, system: Box<dyn System>) {
        self.pipeline.add(system);
    }

    pub fn set_pipeline(&mut self, pipeline: Pipeline) {
        self.pipeline = pipeline;
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Advance every registered stage once, in registration order
    pub fn tick(&mut self, dt: f32) {
        let mut pipeline = std::mem::take(&mut self.pipeline);
        pipeline.run(self, dt);
        self.pipeline = pipeline;
        self.current_tick += 1;
        self.elapsed += dt;
    }

    // === ENTITIES ===

    /// Allocate a new entity with no components
    pub fn create_entity(&mut self) -> Result<EntityId> {
        match self.entities.create() {
            Some(id) => Ok(id),
            None => {
                tracing::warn!(capacity = self.entities.capacity(), "entity capacity exhausted");
                Err(SavannaError::EntityLimit(self.entities.capacity()))
            }
        }
    }

    /// Destroy an entity, clearing all of its components and its spatial entry
    pub fn destroy_entity(&mut self, id: EntityId) -> bool {
        if !self.entities.destroy(id) {
            return false;
        }
        self.components.clear_entity(id);
        self.spatial.remove(id);
        true
    }

    #[inline]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.is_alive(id)
    }

    // === COMPONENTS ===

    pub fn has<C: Component>(&self, id: EntityId) -> bool {
        self.is_alive(id) && self.components.has::<C>(id)
    }

    pub fn get<C: Component>(&self, id: EntityId) -> Option<C> {
        if !self.is_alive(id) {
            return None;
        }
        self.components.get::<C>(id)
    }

    /// Attach or overwrite a component on a live entity
    pub fn add<C: Component>(&mut self, id: EntityId, value: C) -> bool {
        if !self.is_alive(id) || !self.components.insert(id, value) {
            return false;
        }
        if C::KIND.is_spatial() {
            self.sync_spatial(id);
        }
        true
    }

    /// Overwrite an existing component
    pub fn set<C: Component>(&mut self, id: EntityId, value: C) -> bool {
        if !self.is_alive(id) || !self.components.replace(id, value) {
            return false;
        }
        if C::KIND.is_spatial() {
            self.sync_spatial(id);
        }
        true
    }

    pub fn remove<C: Component>(&mut self, id: EntityId) -> bool {
        if !self.is_alive(id) || !self.components.remove::<C>(id) {
            return false;
        }
        if C::KIND.is_spatial() {
            self.sync_spatial(id);
        }
        true
    }

    /// Component mask of a live entity
    pub fn mask(&self, id: EntityId) -> ComponentMask {
        if self.is_alive(id) {
            self.components.mask(id)
        } else {
            ComponentMask::EMPTY
        }
    }

    pub(crate) fn store(&self) -> &ComponentStore {
        &self.components
    }

    /// Mirror position and radius into the spatial index
    fn sync_spatial(&mut self, id: EntityId) {
        match self.components.get::<Position>(id) {
            Some(pos) => {
                let radius = self.components.get::<Size>(id).map_or(0.0, |s| s.radius);
                self.spatial.update(id, pos.vec(), radius);
            }
            None => {
                self.spatial.remove(id);
            }
        }
    }

    // === SPATIAL ===

    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<EntityId> {
        self.spatial.query_radius(center, radius)
    }

    pub fn query_nearest(&self, center: Vec2, max_radius: f32) -> Option<EntityId> {
        self.spatial.query_nearest(center, max_radius)
    }

    /// Nearest live entity of a species within `max_radius`
    pub fn find_nearest_by_type(&self, center: Vec2, max_radius: f32, animal: AnimalType) -> Option<EntityId> {
        self.spatial.query_nearest_by(center, max_radius, |id| self.get::<AnimalType>(id) == Some(animal))
    }

    // === RESOURCES ===

    pub fn vegetation(&self) -> &Vegetation {
        &self.vegetation
    }

    pub fn vegetation_mut(&mut self) -> &mut Vegetation {
        &mut self.vegetation
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Counts of live animals and remains
    pub fn population_stats(&self) -> PopulationStats {
        use crate::entity::components::{Carrion, Corpse};

        let mut stats = PopulationStats::default();
        for id in self.entities.iter_alive() {
            if self.components.has::<Corpse>(id) {
                stats.corpses += 1;
            } else if self.components.has::<Carrion>(id) {
                stats.carrion += 1;
            } else {
                match self.components.get::<AnimalType>(id) {
                    Some(AnimalType::Rabbit) => stats.rabbits += 1,
                    Some(AnimalType::Wolf) => stats.wolves += 1,
                    _ => {}
                }
            }
        }
        stats
    }
}

impl ComponentAccess for World {
    fn is_alive(&self, id: EntityId) -> bool {
        World::is_alive(self, id)
    }

    fn has<C: Component>(&self, id: EntityId) -> bool {
        World::has::<C>(self, id)
    }

    fn get<C: Component>(&self, id: EntityId) -> Option<C> {
        World::get::<C>(self, id)
    }

    fn set<C: Component>(&mut self, id: EntityId, value: C) -> bool {
        World::set(self, id, value)
    }

    fn add<C: Component>(&mut self, id: EntityId, value: C) -> bool {
        World::add(self, id, value)
    }

    fn remove<C: Component>(&mut self, id: EntityId) -> bool {
        World::remove::<C>(self, id)
    }

    fn collect_with(&self, mask: ComponentMask, out: &mut Vec<EntityId>) {
        World::collect_with(self, mask, out)
    }

    fn count_with(&self, mask: ComponentMask) -> usize {
        World::count_with(self, mask)
    }

    fn find_first(&self, mask: ComponentMask, pred: impl FnMut(EntityId) -> bool) -> Option<EntityId> {
        World::find_first(self, mask, pred)
    }

    fn for_each_with_break(&self, mask: ComponentMask, f: impl FnMut(EntityId) -> std::ops::ControlFlow<()>) {
        World::for_each_with_break(self, mask, f)
    }
}

impl SpatialAccess for World {
    fn world_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    fn query_radius(&self, center: Vec2, radius: f32) -> Vec<EntityId> {
        World::query_radius(self, center, radius)
    }

    fn nearest_matching(&self, center: Vec2, radius: f32, pred: impl FnMut(EntityId) -> bool) -> Option<EntityId> {
        self.spatial.query_nearest_by(center, radius, pred)
    }
}

impl RandomAccess for World {
    fn random_f32(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }
}

impl VegetationAccess for World {
    fn vegetation(&self) -> &Vegetation {
        &self.vegetation
    }

    fn vegetation_mut(&mut self) -> &mut Vegetation {
        &mut self.vegetation
    }
}

impl LifecycleAccess for World {
    fn create_entity(&mut self) -> Option<EntityId> {
        World::create_entity(self).ok()
    }

    fn destroy_entity(&mut self, id: EntityId) -> bool {
        World::destroy_entity(self, id)
    }
}
