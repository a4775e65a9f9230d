//! Mask queries over live entities
//!
//! All iteration runs in ascending id order. The `*_into`/`collect` forms
//! write into caller-owned buffers so stages can reuse one allocation
//! across ticks.

use std::ops::ControlFlow;

use crate::core::types::EntityId;
use crate::ecs::component::ComponentMask;
use crate::ecs::world::World;

impl World {
    #[inline]
    fn matching(&self, mask: ComponentMask) -> impl Iterator<Item = EntityId> + '_ {
        self.entities().filter(move |&id| self.store().mask(id).contains(mask))
    }

    /// Call `f` for every live entity that has all kinds in `mask`
    pub fn for_each_with(&self, mask: ComponentMask, mut f: impl FnMut(EntityId)) {
        for id in self.matching(mask) {
            f(id);
        }
    }

    /// Like `for_each_with`, stopping when `f` breaks
    pub fn for_each_with_break(&self, mask: ComponentMask, mut f: impl FnMut(EntityId) -> ControlFlow<()>) {
        for id in self.matching(mask) {
            if f(id).is_break() {
                return;
            }
        }
    }

    /// Replace the contents of `out` with matching entities
    pub fn collect_with(&self, mask: ComponentMask, out: &mut Vec<EntityId>) {
        out.clear();
        out.extend(self.matching(mask));
    }

    pub fn count_with(&self, mask: ComponentMask) -> usize {
        self.matching(mask).count()
    }

    /// Lowest-id matching entity that satisfies `pred`
    pub fn find_first(&self, mask: ComponentMask, mut pred: impl FnMut(EntityId) -> bool) -> Option<EntityId> {
        self.matching(mask).find(|&id| pred(id))
    }

    /// Replace the contents of `out` with matching entities passing `pred`
    pub fn filter_with(&self, mask: ComponentMask, mut pred: impl FnMut(EntityId) -> bool, out: &mut Vec<EntityId>) {
        out.clear();
        out.extend(self.matching(mask).filter(|&id| pred(id)));
    }
}
