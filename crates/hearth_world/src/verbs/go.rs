//! `go <direction>`: follow an exit of the caller's room.

use hearth_foundation::{Deliver, EntityId, Result};

use crate::action::{Action, Invocation, perform};
use crate::notice::{Notice, Slot};
use crate::verbs::look::Look;
use crate::world::World;

/// Usage shown by `help go`.
pub const USAGE: &str = "Usage: go <direction>\nLeaves the room through the named exit.";

/// Moves the caller through an exit, then shows the new room.
///
/// The move itself is announced by the containment notices of both rooms.
#[derive(Debug, Clone)]
pub struct Go {
    caller: EntityId,
    direction: String,
}

impl Go {
    /// Creates a go for `caller` towards `direction`.
    #[must_use]
    pub fn new(caller: EntityId, direction: impl Into<String>) -> Self {
        Self {
            caller,
            direction: direction.into(),
        }
    }

    /// Factory registered in command tables.
    #[must_use]
    pub fn build(invocation: Invocation) -> Box<dyn Action + Send> {
        Box::new(Self::new(invocation.issuer, invocation.trail))
    }
}

impl Action for Go {
    fn name(&self) -> &str {
        "go"
    }

    fn caller(&self) -> EntityId {
        self.caller
    }

    fn action(&mut self, world: &mut World, out: &dyn Deliver) -> Result<bool> {
        if self.direction.is_empty() {
            return Ok(false);
        }
        let Some(room) = world.parent_of(self.caller) else {
            return Ok(false);
        };
        let Some(destination) = world.node(room)?.exit(&self.direction) else {
            return Ok(false);
        };

        world.move_entity(room, destination, self.caller, out)?;
        Ok(true)
    }

    fn respond(&self, _world: &World, outcome: bool, notice: &mut Notice) -> Result<()> {
        if outcome {
            return Ok(());
        }
        if self.direction.is_empty() {
            notice.tell(Slot::Caller, "Where do you want to go?");
        } else {
            notice.tell(
                Slot::Caller,
                format!("There is no {} exit.", self.direction),
            );
        }
        Ok(())
    }

    fn post_action(&mut self, world: &mut World, out: &dyn Deliver, outcome: bool) -> Result<()> {
        if outcome {
            perform(&mut Look::new(self.caller), world, out)?;
        }
        Ok(())
    }
}
