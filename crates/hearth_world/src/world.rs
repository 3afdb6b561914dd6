//! The world: an arena of entity nodes linked into a containment tree.
//!
//! The `World` is the single owner of every entity. Containment is stored
//! as handles (`parent`, `children`) inside the nodes, and all changes to
//! those links go through [`World::add`] and [`World::remove`], which keep
//! the parent/children biconditional intact and announce the change.

use std::collections::HashMap;

use hearth_foundation::{Deliver, EntityId, Error, ErrorKind, Result};
use tracing::{debug, warn};

use crate::action::perform;
use crate::entity::EntityArena;
use crate::node::EntityNode;
use crate::verbs::containment::{Arrival, Departure};

/// Mutable world state, owned by the driver.
#[derive(Debug, Default)]
pub struct World {
    /// Node storage.
    arena: EntityArena,
    /// Top-level entities (usually areas), in registration order.
    roots: Vec<EntityId>,
    /// Named starting locations.
    starting: HashMap<String, EntityId>,
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.arena.len()
    }

    /// Iterates all live entity handles.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.arena.iter().map(|(id, _)| id)
    }

    /// Checks if an entity exists.
    #[must_use]
    pub fn exists(&self, id: EntityId) -> bool {
        self.arena.exists(id)
    }

    // --- Lifecycle ---

    /// Stores a detached node and returns its handle.
    pub fn spawn(&mut self, node: EntityNode) -> EntityId {
        let id = self.arena.insert(node);
        debug!(entity = %id, "spawned");
        id
    }

    /// Destroys a detached, empty entity and returns its node.
    ///
    /// # Errors
    ///
    /// Returns `StillAttached` if the entity has a parent or is a root,
    /// `HasContents` if it still contains other entities, or an arena error
    /// if the handle is not live.
    pub fn destroy(&mut self, id: EntityId) -> Result<EntityNode> {
        let node = self.node(id)?;
        if node.parent.is_some() || self.roots.contains(&id) {
            return Err(Error::new(ErrorKind::StillAttached(id)));
        }
        if !node.children.is_empty() {
            return Err(Error::new(ErrorKind::HasContents(id)));
        }

        self.starting.retain(|_, room| *room != id);
        let node = self.arena.remove(id)?;
        debug!(entity = %id, "destroyed");
        Ok(node)
    }

    /// Returns the node for a live handle.
    ///
    /// # Errors
    ///
    /// Returns an arena error if the handle is stale or was never issued.
    pub fn node(&self, id: EntityId) -> Result<&EntityNode> {
        self.arena.validate(id)?;
        self.arena.get(id).ok_or_else(|| Error::entity_not_found(id))
    }

    /// Returns the node for a live handle, mutably.
    ///
    /// Tree links are not reachable through the returned reference.
    ///
    /// # Errors
    ///
    /// Returns an arena error if the handle is stale or was never issued.
    pub fn node_mut(&mut self, id: EntityId) -> Result<&mut EntityNode> {
        self.arena.validate(id)?;
        self.arena
            .get_mut(id)
            .ok_or_else(|| Error::entity_not_found(id))
    }

    /// Returns the node for a handle, if live.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&EntityNode> {
        self.arena.get(id)
    }

    /// Returns an entity's display name.
    ///
    /// # Errors
    ///
    /// Returns an arena error if the handle is not live.
    pub fn name(&self, id: EntityId) -> Result<&str> {
        self.node(id).map(EntityNode::name)
    }

    // --- Bootstrap ---

    /// Registers a detached entity as a tree root.
    ///
    /// Registering the same root twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyAttached` if the entity has a parent.
    pub fn attach_root(&mut self, id: EntityId) -> Result<()> {
        if let Some(parent) = self.node(id)?.parent {
            return Err(Error::already_attached(id, parent));
        }
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
        Ok(())
    }

    /// Tree roots in registration order.
    #[must_use]
    pub fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    /// Tags a room as a named starting location, replacing any previous room.
    ///
    /// # Errors
    ///
    /// Returns an arena error if the room is not live.
    pub fn set_starting(&mut self, tag: impl Into<String>, room: EntityId) -> Result<()> {
        self.arena.validate(room)?;
        self.starting.insert(tag.into(), room);
        Ok(())
    }

    /// Looks up a starting location by tag.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLocation` if nothing is registered under the tag.
    pub fn starting(&self, tag: &str) -> Result<EntityId> {
        self.starting
            .get(tag)
            .copied()
            .filter(|room| self.arena.exists(*room))
            .ok_or_else(|| Error::unknown_location(tag))
    }

    /// Adds or replaces an exit from one room to another.
    ///
    /// # Errors
    ///
    /// Returns an arena error if either room is not live.
    pub fn add_exit(
        &mut self,
        room: EntityId,
        direction: impl Into<String>,
        destination: EntityId,
    ) -> Result<()> {
        self.arena.validate(destination)?;
        self.node_mut(room)?.set_exit(direction, destination);
        Ok(())
    }

    // --- Tree lookups ---

    /// Returns an entity's container.
    #[must_use]
    pub fn parent_of(&self, id: EntityId) -> Option<EntityId> {
        self.arena.get(id).and_then(|node| node.parent)
    }

    /// Returns an entity's contents in insertion order.
    ///
    /// A dead handle has no contents.
    #[must_use]
    pub fn children_of(&self, id: EntityId) -> &[EntityId] {
        match self.arena.get(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// Returns the other contents of an entity's container, in tree order.
    ///
    /// `None` means the entity has no container, which is distinct from
    /// `Some(vec![])`: a container holding nothing else.
    #[must_use]
    pub fn siblings_of(&self, id: EntityId) -> Option<Vec<EntityId>> {
        let parent = self.parent_of(id)?;
        Some(
            self.children_of(parent)
                .iter()
                .copied()
                .filter(|sibling| *sibling != id)
                .collect(),
        )
    }

    /// Returns true if `ancestor` is `id` or contains it at any depth.
    #[must_use]
    pub fn is_within(&self, id: EntityId, ancestor: EntityId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent_of(node);
        }
        false
    }

    // --- Containment ---

    /// Puts `child` inside `parent` and announces the arrival.
    ///
    /// The links are set together or not at all.
    ///
    /// # Errors
    ///
    /// - `AlreadyAttached` if the child already has a container
    /// - `StillAttached` if the child is a registered root
    /// - `ContainmentCycle` if the parent is the child or inside it
    /// - an arena error if either handle is not live
    pub fn add(&mut self, parent: EntityId, child: EntityId, out: &dyn Deliver) -> Result<()> {
        self.arena.validate(parent)?;
        if let Some(current) = self.node(child)?.parent {
            return Err(Error::already_attached(child, current));
        }
        if self.roots.contains(&child) {
            return Err(Error::new(ErrorKind::StillAttached(child)));
        }
        if self.is_within(parent, child) {
            return Err(Error::new(ErrorKind::ContainmentCycle { parent, child }));
        }

        self.link(parent, child)?;
        debug!(parent = %parent, child = %child, "added");

        perform(&mut Arrival::new(parent, child), self, out)?;
        Ok(())
    }

    /// Takes `child` out of `parent` and announces the departure.
    ///
    /// If the pair is not a consistent parent and child the tree is left as
    /// found and nothing is sent.
    ///
    /// # Errors
    ///
    /// Returns `NotAChild` for an inconsistent pair, or an arena error if
    /// either handle is not live.
    pub fn remove(&mut self, parent: EntityId, child: EntityId, out: &dyn Deliver) -> Result<()> {
        let listed = self.node(parent)?.children.contains(&child);
        let linked = self.node(child)?.parent == Some(parent);

        if !(listed && linked) {
            warn!(
                parent = %parent,
                child = %child,
                listed,
                linked,
                "remove of an entity that is not a child"
            );
            return Err(Error::not_a_child(parent, child));
        }

        self.unlink(parent, child)?;
        debug!(parent = %parent, child = %child, "removed");

        perform(&mut Departure::new(parent, child), self, out)?;
        Ok(())
    }

    /// Moves `obj` from `from` to `to`: a [`remove`](Self::remove) followed
    /// by an [`add`](Self::add).
    ///
    /// Not atomic. If the add fails after the remove succeeded, `obj` is
    /// left detached and the add's error is returned.
    ///
    /// # Errors
    ///
    /// Returns the error of whichever half failed.
    pub fn move_entity(
        &mut self,
        from: EntityId,
        to: EntityId,
        obj: EntityId,
        out: &dyn Deliver,
    ) -> Result<()> {
        self.remove(from, obj, out)?;
        if let Err(err) = self.add(to, obj, out) {
            warn!(from = %from, to = %to, entity = %obj, error = %err, "move left entity detached");
            return Err(err);
        }
        Ok(())
    }

    fn link(&mut self, parent: EntityId, child: EntityId) -> Result<()> {
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    fn unlink(&mut self, parent: EntityId, child: EntityId) -> Result<()> {
        self.node_mut(parent)?.children.retain(|c| *c != child);
        self.node_mut(child)?.parent = None;
        Ok(())
    }

    // --- Invariants ---

    /// Verifies the containment biconditional over the whole arena.
    ///
    /// For every node B with parent A, B appears exactly once in A's
    /// children; every child listed by A names A as its parent; roots have
    /// no parent.
    ///
    /// # Errors
    ///
    /// Returns an `Internal` error describing the first violation found.
    pub fn check_invariants(&self) -> Result<()> {
        for (id, node) in self.arena.iter() {
            if let Some(parent) = node.parent {
                let Some(container) = self.arena.get(parent) else {
                    return Err(internal(format!("{id} has dead parent {parent}")));
                };
                let count = container.children.iter().filter(|c| **c == id).count();
                if count != 1 {
                    return Err(internal(format!(
                        "{id} appears {count} times in the children of its parent {parent}"
                    )));
                }
            }
            for child in &node.children {
                let Some(contained) = self.arena.get(*child) else {
                    return Err(internal(format!("{id} lists dead child {child}")));
                };
                if contained.parent != Some(id) {
                    return Err(internal(format!(
                        "{id} lists {child} as a child but its parent is {:?}",
                        contained.parent
                    )));
                }
            }
        }
        for root in &self.roots {
            if self.parent_of(*root).is_some() {
                return Err(internal(format!("root {root} has a parent")));
            }
        }
        Ok(())
    }
}

fn internal(message: String) -> Error {
    Error::new(ErrorKind::Internal(message))
}
