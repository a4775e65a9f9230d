//! Structure-of-Arrays component storage
//!
//! Each component type gets one dense array indexed by entity id plus a
//! presence bitset. Access goes through the `Component` trait so a single
//! generic accessor serves every kind.

use std::ops::{BitOr, BitOrAssign};

use crate::core::types::{AnimalType, EntityId};
use crate::entity::components::{
    AnimalConfig, Animation, AttackState, Behavior, Carrion, Corpse, DamageFlash, EatingState, Health,
    Position, Satiation, Size, Speed, Velocity,
};

/// The fixed set of component kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ComponentKind {
    Position,
    Velocity,
    Health,
    Satiation,
    Size,
    Speed,
    AnimalType,
    AnimalConfig,
    Behavior,
    AttackState,
    EatingState,
    Corpse,
    Carrion,
    DamageFlash,
    Animation,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 15] = [
        ComponentKind::Position,
        ComponentKind::Velocity,
        ComponentKind::Health,
        ComponentKind::Satiation,
        ComponentKind::Size,
        ComponentKind::Speed,
        ComponentKind::AnimalType,
        ComponentKind::AnimalConfig,
        ComponentKind::Behavior,
        ComponentKind::AttackState,
        ComponentKind::EatingState,
        ComponentKind::Corpse,
        ComponentKind::Carrion,
        ComponentKind::DamageFlash,
        ComponentKind::Animation,
    ];

    pub const fn mask(self) -> ComponentMask {
        ComponentMask(1 << self as u32)
    }

    /// Kinds whose changes must be mirrored into the spatial index
    pub const fn is_spatial(self) -> bool {
        matches!(self, ComponentKind::Position | ComponentKind::Size)
    }
}

/// Set of component kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ComponentMask(u32);

impl ComponentMask {
    pub const EMPTY: ComponentMask = ComponentMask(0);

    pub const POSITION: ComponentMask = ComponentKind::Position.mask();
    pub const VELOCITY: ComponentMask = ComponentKind::Velocity.mask();
    pub const HEALTH: ComponentMask = ComponentKind::Health.mask();
    pub const SATIATION: ComponentMask = ComponentKind::Satiation.mask();
    pub const SIZE: ComponentMask = ComponentKind::Size.mask();
    pub const SPEED: ComponentMask = ComponentKind::Speed.mask();
    pub const ANIMAL_TYPE: ComponentMask = ComponentKind::AnimalType.mask();
    pub const ANIMAL_CONFIG: ComponentMask = ComponentKind::AnimalConfig.mask();
    pub const BEHAVIOR: ComponentMask = ComponentKind::Behavior.mask();
    pub const ATTACK_STATE: ComponentMask = ComponentKind::AttackState.mask();
    pub const EATING_STATE: ComponentMask = ComponentKind::EatingState.mask();
    pub const CORPSE: ComponentMask = ComponentKind::Corpse.mask();
    pub const CARRION: ComponentMask = ComponentKind::Carrion.mask();
    pub const DAMAGE_FLASH: ComponentMask = ComponentKind::DamageFlash.mask();
    pub const ANIMATION: ComponentMask = ComponentKind::Animation.mask();

    /// True if every kind in `other` is also in `self`
    #[inline]
    pub const fn contains(self, other: ComponentMask) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn has(self, kind: ComponentKind) -> bool {
        self.contains(kind.mask())
    }

    pub fn insert(&mut self, kind: ComponentKind) {
        self.0 |= kind.mask().0;
    }

    pub fn remove(&mut self, kind: ComponentKind) {
        self.0 &= !kind.mask().0;
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for ComponentMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        ComponentMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for ComponentMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Dense array of one component type with a presence bitset
pub struct ComponentStorage<T> {
    data: Vec<T>,
    present: Vec<u64>,
}

impl<T: Copy + Default> ComponentStorage<T> {
    /// Storage for ids `0..capacity`
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![T::default(); capacity],
            present: vec![0; capacity / 64 + 1],
        }
    }

    #[inline]
    fn bit(id: EntityId) -> (usize, u64) {
        let index = id.index();
        (index / 64, 1u64 << (index % 64))
    }

    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        let (word, bit) = Self::bit(id);
        self.present.get(word).map_or(false, |w| w & bit != 0)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        if self.contains(id) {
            self.data.get(id.index())
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        if self.contains(id) {
            self.data.get_mut(id.index())
        } else {
            None
        }
    }

    /// Store a value and mark it present. Returns false if the id is out of
    /// range.
    pub fn insert(&mut self, id: EntityId, value: T) -> bool {
        let (word, bit) = Self::bit(id);
        match (self.data.get_mut(id.index()), self.present.get_mut(word)) {
            (Some(slot), Some(w)) => {
                *slot = value;
                *w |= bit;
                true
            }
            _ => false,
        }
    }

    /// Clear presence and zero the slot. Returns true if a value was present.
    pub fn remove(&mut self, id: EntityId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let (word, bit) = Self::bit(id);
        self.present[word] &= !bit;
        self.data[id.index()] = T::default();
        true
    }
}

/// Maps a component type to its kind and its array in the store
pub trait Component: Copy + Default + 'static {
    const KIND: ComponentKind;

    fn storage(store: &ComponentStore) -> &ComponentStorage<Self>;
    fn storage_mut(store: &mut ComponentStore) -> &mut ComponentStorage<Self>;
}

macro_rules! component_store {
    ($($field:ident: $ty:ty => $kind:ident),* $(,)?) => {
        /// One storage per component kind plus a per-entity mask
        pub struct ComponentStore {
            $(pub(crate) $field: ComponentStorage<$ty>,)*
            masks: Vec<ComponentMask>,
        }

        impl ComponentStore {
            pub fn new(capacity: usize) -> Self {
                Self {
                    $($field: ComponentStorage::new(capacity),)*
                    masks: vec![ComponentMask::EMPTY; capacity],
                }
            }

            /// Remove every component of `id` and zero its slots
            pub fn clear_entity(&mut self, id: EntityId) {
                $(self.$field.remove(id);)*
                if let Some(mask) = self.masks.get_mut(id.index()) {
                    *mask = ComponentMask::EMPTY;
                }
            }

            /// Presence bit of one kind, read straight from its storage
            pub fn storage_has(&self, id: EntityId, kind: ComponentKind) -> bool {
                match kind {
                    $(ComponentKind::$kind => self.$field.contains(id),)*
                }
            }
        }

        $(
            impl Component for $ty {
                const KIND: ComponentKind = ComponentKind::$kind;

                #[inline]
                fn storage(store: &ComponentStore) -> &ComponentStorage<Self> {
                    &store.$field
                }

                #[inline]
                fn storage_mut(store: &mut ComponentStore) -> &mut ComponentStorage<Self> {
                    &mut store.$field
                }
            }
        )*
    };
}

component_store! {
    positions: Position => Position,
    velocities: Velocity => Velocity,
    healths: Health => Health,
    satiations: Satiation => Satiation,
    sizes: Size => Size,
    speeds: Speed => Speed,
    animal_types: AnimalType => AnimalType,
    animal_configs: AnimalConfig => AnimalConfig,
    behaviors: Behavior => Behavior,
    attack_states: AttackState => AttackState,
    eating_states: EatingState => EatingState,
    corpses: Corpse => Corpse,
    carrions: Carrion => Carrion,
    damage_flashes: DamageFlash => DamageFlash,
    animations: Animation => Animation,
}

impl ComponentStore {
    /// Mask of kinds attached to `id`
    #[inline]
    pub fn mask(&self, id: EntityId) -> ComponentMask {
        self.masks.get(id.index()).copied().unwrap_or_default()
    }

    pub fn has<C: Component>(&self, id: EntityId) -> bool {
        C::storage(self).contains(id)
    }

    pub fn get<C: Component>(&self, id: EntityId) -> Option<C> {
        C::storage(self).get(id).copied()
    }

    /// Attach or overwrite a component
    pub fn insert<C: Component>(&mut self, id: EntityId, value: C) -> bool {
        if !C::storage_mut(self).insert(id, value) {
            return false;
        }
        if let Some(mask) = self.masks.get_mut(id.index()) {
            mask.insert(C::KIND);
        }
        true
    }

    /// Overwrite a component only if already present
    pub fn replace<C: Component>(&mut self, id: EntityId, value: C) -> bool {
        match C::storage_mut(self).get_mut(id) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn remove<C: Component>(&mut self, id: EntityId) -> bool {
        if !C::storage_mut(self).remove(id) {
            return false;
        }
        if let Some(mask) = self.masks.get_mut(id.index()) {
            mask.remove(C::KIND);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_contains() {
        let mask = ComponentMask::POSITION | ComponentMask::VELOCITY;
        assert!(mask.contains(ComponentMask::POSITION));
        assert!(mask.contains(ComponentMask::POSITION | ComponentMask::VELOCITY));
        assert!(!mask.contains(ComponentMask::HEALTH));
        assert!(mask.contains(ComponentMask::EMPTY));
    }

    #[test]
    fn test_storage_insert_remove_zeroes_slot() {
        let mut storage: ComponentStorage<Health> = ComponentStorage::new(8);
        let id = EntityId(3);
        assert!(storage.insert(id, Health::full(10)));
        assert_eq!(storage.get(id).map(|h| h.current), Some(10));

        assert!(storage.remove(id));
        assert!(!storage.contains(id));
        assert!(storage.get(id).is_none());
        assert!(!storage.remove(id), "second remove reports nothing removed");
        assert_eq!(storage.data[3], Health::default());
    }

    #[test]
    fn test_storage_out_of_range_is_rejected() {
        let mut storage: ComponentStorage<Satiation> = ComponentStorage::new(4);
        assert!(!storage.insert(EntityId(4), Satiation::new(1.0)));
        assert!(!storage.insert(EntityId(1000), Satiation::new(1.0)));
        assert!(!storage.contains(EntityId(1000)));
    }

    #[test]
    fn test_store_mask_tracks_storage() {
        let mut store = ComponentStore::new(16);
        let id = EntityId(5);
        store.insert(id, Position::new(1.0, 2.0));
        store.insert(id, Satiation::new(50.0));

        assert!(store.mask(id).has(ComponentKind::Position));
        assert!(store.storage_has(id, ComponentKind::Satiation));
        assert!(!store.replace(id, Velocity::new(1.0, 0.0)), "replace needs an existing value");

        store.remove::<Position>(id);
        assert!(!store.mask(id).has(ComponentKind::Position));
        assert!(store.mask(id).has(ComponentKind::Satiation));

        store.clear_entity(id);
        assert!(store.mask(id).is_empty());
        for kind in ComponentKind::ALL {
            assert!(!store.storage_has(id, kind));
        }
    }
}
