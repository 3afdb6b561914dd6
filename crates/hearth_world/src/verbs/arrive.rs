//! Entering the world for the first time.

use hearth_foundation::{Deliver, EntityId, Result};

use crate::action::{Action, perform};
use crate::notice::{Notice, Slot};
use crate::verbs::look::Look;
use crate::world::World;

/// Puts a fresh body into a starting room and shows it around.
#[derive(Debug, Clone, Copy)]
pub struct Arrive {
    caller: EntityId,
    room: EntityId,
}

impl Arrive {
    /// Creates an arrival of `caller` into `room`.
    #[must_use]
    pub fn new(caller: EntityId, room: EntityId) -> Self {
        Self { caller, room }
    }
}

impl Action for Arrive {
    fn name(&self) -> &str {
        "arrive"
    }

    fn caller(&self) -> EntityId {
        self.caller
    }

    fn action(&mut self, world: &mut World, out: &dyn Deliver) -> Result<bool> {
        world.add(self.room, self.caller, out)?;
        Ok(true)
    }

    fn respond(&self, world: &World, _outcome: bool, notice: &mut Notice) -> Result<()> {
        notice.tell(Slot::Caller, "You arrive into this world.");
        notice.tell(
            Slot::CallerSiblings,
            format!("{} arrives into this world.", world.name(self.caller)?),
        );
        Ok(())
    }

    fn post_action(&mut self, world: &mut World, out: &dyn Deliver, _outcome: bool) -> Result<()> {
        perform(&mut Look::new(self.caller), world, out)?;
        Ok(())
    }
}
