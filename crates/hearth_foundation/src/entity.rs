//! Entity handles with generational indices.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Handle to an entity stored in the world arena.
///
/// The generation counter changes whenever an arena slot is reused, so a
/// handle kept past the destruction of its entity is detected as stale
/// instead of silently aliasing the slot's new occupant.
///
/// # Layout
/// - `index`: slot in the arena
/// - `generation`: generation of the slot when the handle was issued
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityId {
    /// Slot index in the arena.
    pub index: u64,
    /// Generation counter for stale handle detection.
    pub generation: u32,
}

impl EntityId {
    /// Creates a new entity handle with the given index and generation.
    #[must_use]
    pub const fn new(index: u64, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}
