//! `quit`: leave the world.

use hearth_foundation::{Deliver, EntityId, Result};
use tracing::debug;

use crate::action::{Action, Invocation};
use crate::notice::{Notice, Slot};
use crate::world::World;

/// Usage shown by `help quit`.
pub const USAGE: &str = "Usage: quit\nLeaves this world and closes your connection.";

/// Tells the room, then detaches the caller, hangs up its connection and
/// reclaims the body.
#[derive(Debug, Clone)]
pub struct Quit {
    caller: EntityId,
    quitting: bool,
}

impl Quit {
    /// Creates a quit for `caller`. Any trailing text cancels it.
    #[must_use]
    pub fn new(caller: EntityId, trail: &str) -> Self {
        Self {
            caller,
            quitting: trail.is_empty(),
        }
    }

    /// Factory registered in command tables.
    #[must_use]
    pub fn build(invocation: Invocation) -> Box<dyn Action + Send> {
        Box::new(Self::new(invocation.issuer, &invocation.trail))
    }
}

impl Action for Quit {
    fn name(&self) -> &str {
        "quit"
    }

    fn caller(&self) -> EntityId {
        self.caller
    }

    fn action(&mut self, _world: &mut World, _out: &dyn Deliver) -> Result<bool> {
        Ok(self.quitting)
    }

    fn respond(&self, world: &World, outcome: bool, notice: &mut Notice) -> Result<()> {
        if !outcome {
            notice.tell(Slot::Caller, "Quit what?");
            return Ok(());
        }

        notice.tell(Slot::Caller, "Goodbye, see you soon.");
        notice.tell(
            Slot::CallerSiblings,
            format!("{} has left this world.", world.name(self.caller)?),
        );
        Ok(())
    }

    fn post_action(&mut self, world: &mut World, out: &dyn Deliver, outcome: bool) -> Result<()> {
        if !outcome {
            return Ok(());
        }
        if let Some(room) = world.parent_of(self.caller) {
            world.remove(room, self.caller, out)?;
        }
        out.hang_up(self.caller);

        // A body still holding things is kept so its contents are not lost.
        if world.children_of(self.caller).is_empty() && !world.roots().contains(&self.caller) {
            world.destroy(self.caller)?;
        } else {
            debug!(entity = %self.caller, "quit body kept for its contents");
        }
        Ok(())
    }
}
