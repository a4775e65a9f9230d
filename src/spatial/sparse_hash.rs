//! Sparse hash grid for radius and nearest-neighbor queries

use ahash::AHashMap;
use ordered_float::OrderedFloat;

use crate::core::types::{EntityId, Vec2};

#[derive(Debug, Clone, Copy)]
struct Entry {
    pos: Vec2,
    radius: f32,
    cell: (i32, i32),
}

/// Uniform grid keyed by cell coordinate
///
/// Every indexed entity remembers its position, radius and cell so moves
/// within a cell are a field update. Results are returned in ascending id
/// order so callers iterate deterministically.
pub struct SparseHashGrid {
    cell_size: f32,
    cells: AHashMap<(i32, i32), Vec<EntityId>>,
    entries: AHashMap<EntityId, Entry>,
    /// Largest radius ever indexed; widens the cell scan so large entities
    /// whose centre sits in a far cell are still found
    max_radius: f32,
}

impl SparseHashGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: AHashMap::new(),
            entries: AHashMap::new(),
            max_radius: 0.0,
        }
    }

    #[inline]
    fn cell_coord(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.entries.contains_key(&entity)
    }

    /// Stored position and radius of an indexed entity
    pub fn entry(&self, entity: EntityId) -> Option<(Vec2, f32)> {
        self.entries.get(&entity).map(|e| (e.pos, e.radius))
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.entries.clear();
        self.max_radius = 0.0;
    }

    /// Insert or move an entity
    pub fn update(&mut self, entity: EntityId, pos: Vec2, radius: f32) {
        let cell = self.cell_coord(pos);
        let radius = radius.max(0.0);
        if radius > self.max_radius {
            self.max_radius = radius;
        }

        if let Some(entry) = self.entries.get_mut(&entity) {
            let old_cell = entry.cell;
            entry.pos = pos;
            entry.radius = radius;
            entry.cell = cell;
            if old_cell == cell {
                return;
            }
            Self::detach(&mut self.cells, old_cell, entity);
        } else {
            self.entries.insert(entity, Entry { pos, radius, cell });
        }
        self.cells.entry(cell).or_default().push(entity);
    }

    pub fn remove(&mut self, entity: EntityId) -> bool {
        match self.entries.remove(&entity) {
            Some(entry) => {
                Self::detach(&mut self.cells, entry.cell, entity);
                true
            }
            None => false,
        }
    }

    fn detach(cells: &mut AHashMap<(i32, i32), Vec<EntityId>>, cell: (i32, i32), entity: EntityId) {
        if let Some(list) = cells.get_mut(&cell) {
            list.retain(|&e| e != entity);
            if list.is_empty() {
                cells.remove(&cell);
            }
        }
    }

    /// Entities whose circle touches the query circle
    ///
    /// An entity is included when the distance between centres is at most
    /// `radius + entity_radius`, so every entity whose centre lies within
    /// `radius` is always present.
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<EntityId> {
        let mut out = Vec::new();
        self.query_radius_into(center, radius, &mut out);
        out
    }

    /// Same as `query_radius`, writing into a caller-owned buffer
    pub fn query_radius_into(&self, center: Vec2, radius: f32, out: &mut Vec<EntityId>) {
        out.clear();
        let reach = radius.max(0.0) + self.max_radius;
        let (min_x, min_y) = self.cell_coord(Vec2::new(center.x - reach, center.y - reach));
        let (max_x, max_y) = self.cell_coord(Vec2::new(center.x + reach, center.y + reach));

        for cy in min_y..=max_y {
            for cx in min_x..=max_x {
                let Some(list) = self.cells.get(&(cx, cy)) else { continue };
                for &entity in list {
                    if let Some(entry) = self.entries.get(&entity) {
                        let limit = radius + entry.radius;
                        if center.distance_squared(&entry.pos) <= limit * limit {
                            out.push(entity);
                        }
                    }
                }
            }
        }
        out.sort_unstable();
    }

    /// Closest indexed entity whose centre is within `max_radius`
    ///
    /// Ties go to the lower id.
    pub fn query_nearest(&self, center: Vec2, max_radius: f32) -> Option<EntityId> {
        self.query_nearest_by(center, max_radius, |_| true)
    }

    /// Closest entity within `max_radius` that passes `filter`
    pub fn query_nearest_by(
        &self,
        center: Vec2,
        max_radius: f32,
        mut filter: impl FnMut(EntityId) -> bool,
    ) -> Option<EntityId> {
        let max_sq = max_radius * max_radius;
        self.query_radius(center, max_radius)
            .into_iter()
            .filter_map(|entity| {
                let entry = self.entries.get(&entity)?;
                let dist_sq = center.distance_squared(&entry.pos);
                (dist_sq <= max_sq).then_some((entity, dist_sq))
            })
            .filter(|&(entity, _)| filter(entity))
            .min_by_key(|&(entity, dist_sq)| (OrderedFloat(dist_sq), entity))
            .map(|(entity, _)| entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_moves_between_cells() {
        let mut grid = SparseHashGrid::new(32.0);
        let e = EntityId(1);
        grid.update(e, Vec2::new(10.0, 10.0), 5.0);
        assert_eq!(grid.query_radius(Vec2::new(10.0, 10.0), 1.0), vec![e]);

        grid.update(e, Vec2::new(200.0, 200.0), 5.0);
        assert!(grid.query_radius(Vec2::new(10.0, 10.0), 1.0).is_empty());
        assert_eq!(grid.query_radius(Vec2::new(200.0, 200.0), 1.0), vec![e]);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_query_includes_entity_radius() {
        let mut grid = SparseHashGrid::new(32.0);
        let big = EntityId(1);
        grid.update(big, Vec2::new(100.0, 0.0), 30.0);

        // Centre is 100 away: a radius-75 query touches the 30-radius circle
        assert_eq!(grid.query_radius(Vec2::new(0.0, 0.0), 75.0), vec![big]);
        assert!(grid.query_radius(Vec2::new(0.0, 0.0), 60.0).is_empty());
        // Nearest only accepts centres inside the radius
        assert_eq!(grid.query_nearest(Vec2::new(0.0, 0.0), 75.0), None);
    }

    #[test]
    fn test_nearest_prefers_closest_then_lowest_id() {
        let mut grid = SparseHashGrid::new(32.0);
        grid.update(EntityId(3), Vec2::new(10.0, 0.0), 0.0);
        grid.update(EntityId(2), Vec2::new(-10.0, 0.0), 0.0);
        grid.update(EntityId(1), Vec2::new(50.0, 0.0), 0.0);

        assert_eq!(grid.query_nearest(Vec2::ZERO, 100.0), Some(EntityId(2)));
        assert_eq!(grid.query_nearest_by(Vec2::ZERO, 100.0, |e| e != EntityId(2)), Some(EntityId(3)));
        assert_eq!(grid.query_nearest(Vec2::ZERO, 5.0), None);
    }

    #[test]
    fn test_remove() {
        let mut grid = SparseHashGrid::new(32.0);
        grid.update(EntityId(1), Vec2::new(5.0, 5.0), 1.0);
        assert!(grid.remove(EntityId(1)));
        assert!(!grid.remove(EntityId(1)));
        assert!(grid.is_empty());
        assert!(grid.query_radius(Vec2::new(5.0, 5.0), 10.0).is_empty());
    }

    #[test]
    fn test_negative_coordinates() {
        let mut grid = SparseHashGrid::new(32.0);
        grid.update(EntityId(7), Vec2::new(-40.0, -3.0), 0.0);
        assert_eq!(grid.query_radius(Vec2::new(-35.0, 0.0), 10.0), vec![EntityId(7)]);
    }
}
