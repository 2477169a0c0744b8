//! Identifiers and a simple allocator for fragments and shatter cycles.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FragmentId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CycleId(pub u32);

/// Monotonic allocator for FragmentId and CycleId.
/// Fragment ids are never reused across cycles, so a stale id from an
/// interrupted cycle can never alias a live fragment.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_fragment: u32,
    next_cycle: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_fragment(&mut self) -> FragmentId {
        let id = FragmentId(self.next_fragment);
        self.next_fragment = self.next_fragment.wrapping_add(1);
        id
    }

    #[inline]
    pub fn alloc_cycle(&mut self) -> CycleId {
        let id = CycleId(self.next_cycle);
        self.next_cycle = self.next_cycle.wrapping_add(1);
        id
    }
}
