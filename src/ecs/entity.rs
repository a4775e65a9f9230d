//! Entity id allocation and liveness

use crate::core::types::EntityId;

/// Hands out small integer ids and recycles destroyed ones
///
/// Ids start at 1. Destroyed ids go on a free list and are reused before
/// fresh ids are minted, so the id space stays dense for the component
/// arrays.
pub struct EntityRegistry {
    next_id: u32,
    free_list: Vec<EntityId>,
    alive: Vec<bool>,
    live_count: usize,
    capacity: usize,
}

impl EntityRegistry {
    /// Registry for at most `capacity` simultaneously live entities
    pub fn new(capacity: usize) -> Self {
        Self {
            next_id: 1,
            free_list: Vec::new(),
            alive: vec![false; capacity + 1],
            live_count: 0,
            capacity,
        }
    }

    /// Allocate an id, or `None` when every slot is in use
    pub fn create(&mut self) -> Option<EntityId> {
        let id = match self.free_list.pop() {
            Some(id) => id,
            None => {
                if self.next_id as usize > self.capacity {
                    return None;
                }
                let id = EntityId(self.next_id);
                self.next_id += 1;
                id
            }
        };
        self.alive[id.index()] = true;
        self.live_count += 1;
        Some(id)
    }

    /// Release an id. Returns false if it was not alive.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        self.alive[id.index()] = false;
        self.free_list.push(id);
        self.live_count -= 1;
        true
    }

    #[inline]
    pub fn is_alive(&self, id: EntityId) -> bool {
        id.is_valid() && self.alive.get(id.index()).copied().unwrap_or(false)
    }

    pub fn live_count(&self) -> usize {
        self.live_count
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// One past the highest id ever issued
    pub fn id_bound(&self) -> u32 {
        self.next_id
    }

    /// Live ids in ascending order
    pub fn iter_alive(&self) -> impl Iterator<Item = EntityId> + '_ {
        (1..self.next_id).map(EntityId).filter(move |id| self.alive[id.index()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_start_at_one() {
        let mut registry = EntityRegistry::new(10);
        assert_eq!(registry.create(), Some(EntityId(1)));
        assert_eq!(registry.create(), Some(EntityId(2)));
        assert!(!registry.is_alive(EntityId::INVALID));
    }

    #[test]
    fn test_destroyed_ids_are_recycled() {
        let mut registry = EntityRegistry::new(10);
        let a = registry.create().unwrap();
        let _b = registry.create().unwrap();

        assert!(registry.destroy(a));
        assert!(!registry.is_alive(a));
        assert!(!registry.destroy(a), "double destroy is rejected");

        let c = registry.create().unwrap();
        assert_eq!(c, a, "free list is used before fresh ids");
        assert!(registry.is_alive(c));
        assert_eq!(registry.live_count(), 2);
    }

    #[test]
    fn test_capacity_exhaustion() {
        let mut registry = EntityRegistry::new(3);
        for _ in 0..3 {
            assert!(registry.create().is_some());
        }
        assert_eq!(registry.create(), None);

        registry.destroy(EntityId(2));
        assert_eq!(registry.create(), Some(EntityId(2)));
    }

    #[test]
    fn test_out_of_range_is_not_alive() {
        let registry = EntityRegistry::new(3);
        assert!(!registry.is_alive(EntityId(500)));
    }

    #[test]
    fn test_iter_alive_in_id_order() {
        let mut registry = EntityRegistry::new(10);
        for _ in 0..5 {
            registry.create();
        }
        registry.destroy(EntityId(2));
        registry.destroy(EntityId(4));
        let ids: Vec<_> = registry.iter_alive().collect();
        assert_eq!(ids, vec![EntityId(1), EntityId(3), EntityId(5)]);
    }
}
