//! Notices announcing containment changes.
//!
//! These are performed by [`World::add`] and [`World::remove`]; nothing
//! registers them as verbs.

use hearth_foundation::{EntityId, Result};

use crate::action::Action;
use crate::notice::{Notice, Slot};
use crate::world::World;

/// `entity` has just been put inside `container`.
#[derive(Debug, Clone, Copy)]
pub struct Arrival {
    container: EntityId,
    entity: EntityId,
}

impl Arrival {
    /// Creates the notice for one arrival.
    #[must_use]
    pub fn new(container: EntityId, entity: EntityId) -> Self {
        Self { container, entity }
    }
}

impl Action for Arrival {
    fn name(&self) -> &str {
        "arrival"
    }

    fn caller(&self) -> EntityId {
        self.container
    }

    fn respond(&self, world: &World, _outcome: bool, notice: &mut Notice) -> Result<()> {
        let entity = world.name(self.entity)?;
        let container = world.name(self.container)?;

        notice.target = Some(self.entity);
        notice.tell(Slot::Caller, format!("{entity} enters you."));
        notice.tell(Slot::Target, format!("You enter {container}."));
        notice.tell(Slot::CallerChildren, format!("{entity} enters."));
        Ok(())
    }
}

/// `entity` has just been taken out of `container`.
#[derive(Debug, Clone, Copy)]
pub struct Departure {
    container: EntityId,
    entity: EntityId,
}

impl Departure {
    /// Creates the notice for one departure.
    #[must_use]
    pub fn new(container: EntityId, entity: EntityId) -> Self {
        Self { container, entity }
    }
}

impl Action for Departure {
    fn name(&self) -> &str {
        "departure"
    }

    fn caller(&self) -> EntityId {
        self.container
    }

    fn respond(&self, world: &World, _outcome: bool, notice: &mut Notice) -> Result<()> {
        let entity = world.name(self.entity)?;
        let container = world.name(self.container)?;

        notice.target = Some(self.entity);
        notice.tell(Slot::Caller, format!("{entity} leaves you."));
        notice.tell(Slot::Target, format!("You leave {container}."));
        notice.tell(Slot::CallerChildren, format!("{entity} leaves."));
        Ok(())
    }
}
