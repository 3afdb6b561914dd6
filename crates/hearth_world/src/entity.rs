//! Entity arena with generational indices.
//!
//! The `EntityArena` owns every node in the world. Tree edges are stored as
//! [`EntityId`] handles inside the nodes, so the arena is the only owner and
//! parent/child back-references never form reference-counting cycles.

// Allow u64 to usize casts - we target 64-bit systems
#![allow(clippy::cast_possible_truncation)]

use hearth_foundation::{EntityId, Error, Result};

use crate::node::EntityNode;

#[derive(Debug)]
struct Slot {
    /// Even generations are free, odd generations are alive.
    generation: u32,
    node: Option<EntityNode>,
}

/// Stores entity nodes and tracks slot generations.
///
/// Slots are reused from a free list. When a node is removed, its slot's
/// generation is incremented so old handles no longer validate.
#[derive(Debug, Default)]
pub struct EntityArena {
    slots: Vec<Slot>,
    free_list: Vec<u64>,
    live_count: usize,
}

impl EntityArena {
    /// Creates a new empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a node and returns its handle.
    ///
    /// Reuses slots from the free list when available.
    pub fn insert(&mut self, node: EntityNode) -> EntityId {
        self.live_count += 1;

        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            // was even/free, now odd/alive
            slot.generation += 1;
            slot.node = Some(node);
            EntityId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u64;
            // New slots start at generation 1 (odd = alive)
            self.slots.push(Slot {
                generation: 1,
                node: Some(node),
            });
            EntityId::new(index, 1)
        }
    }

    /// Removes a node and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is stale or was never issued.
    pub fn remove(&mut self, id: EntityId) -> Result<EntityNode> {
        self.validate(id)?;

        let slot = &mut self.slots[id.index as usize];
        // was odd/alive, now even/free
        slot.generation += 1;
        let node = slot
            .node
            .take()
            .ok_or_else(|| Error::entity_not_found(id))?;
        self.free_list.push(id.index);
        self.live_count -= 1;

        Ok(node)
    }

    /// Checks if a handle refers to a live node.
    #[must_use]
    pub fn exists(&self, id: EntityId) -> bool {
        self.slots
            .get(id.index as usize)
            .is_some_and(|slot| slot.generation == id.generation && id.generation % 2 == 1)
    }

    /// Validates that a handle refers to a live node.
    ///
    /// # Errors
    ///
    /// Returns `StaleEntity` if the slot has been reused since the handle was
    /// issued, or `EntityNotFound` if it never existed or is currently free.
    pub fn validate(&self, id: EntityId) -> Result<()> {
        let Some(slot) = self.slots.get(id.index as usize) else {
            return Err(Error::entity_not_found(id));
        };

        if slot.generation != id.generation {
            return Err(Error::stale_entity(id));
        }

        if slot.generation % 2 == 0 {
            return Err(Error::entity_not_found(id));
        }

        Ok(())
    }

    /// Returns the node for a live handle.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&EntityNode> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    /// Returns the node for a live handle, mutably.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityNode> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Returns true if there are no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Iterates over all live nodes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &EntityNode)> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.node
                .as_ref()
                .map(|node| (EntityId::new(idx as u64, slot.generation), node))
        })
    }
}
