//! `look`: describe the caller's surroundings.

use hearth_foundation::{EntityId, Result};

use crate::action::{Action, Invocation};
use crate::notice::{Notice, Slot};
use crate::world::World;

/// Usage shown by `help look`.
pub const USAGE: &str = "Usage: look\nShows the room you are in, its exits and who else is here.";

/// Shows the caller's container, its exits and the other occupants.
#[derive(Debug, Clone, Copy)]
pub struct Look {
    caller: EntityId,
}

impl Look {
    /// Creates a look for `caller`.
    #[must_use]
    pub fn new(caller: EntityId) -> Self {
        Self { caller }
    }

    /// Factory registered in command tables.
    #[must_use]
    pub fn build(invocation: Invocation) -> Box<dyn Action + Send> {
        Box::new(Self::new(invocation.issuer))
    }
}

impl Action for Look {
    fn name(&self) -> &str {
        "look"
    }

    fn caller(&self) -> EntityId {
        self.caller
    }

    fn respond(&self, world: &World, _outcome: bool, notice: &mut Notice) -> Result<()> {
        notice.tell(Slot::Caller, render(world, self.caller)?);
        Ok(())
    }
}

/// Renders what `viewer` sees from inside its container.
///
/// # Errors
///
/// Returns an arena error if the viewer or an occupant is not live.
pub fn render(world: &World, viewer: EntityId) -> Result<String> {
    let Some(room) = world.parent_of(viewer) else {
        return Ok("You are not in a room!".to_string());
    };
    let node = world.node(room)?;

    let mut lines = vec![node.name().to_string()];
    if let Some(description) = node.description() {
        lines.push(description.to_string());
    }

    let exits: Vec<&str> = node.exits().iter().map(|e| e.direction.as_str()).collect();
    if exits.is_empty() {
        lines.push("There are no obvious exits.".to_string());
    } else {
        lines.push(format!("Obvious exits are {}.", exits.join(", ")));
    }

    for occupant in node.children() {
        if *occupant != viewer {
            lines.push(format!(" {}", world.name(*occupant)?));
        }
    }

    Ok(lines.join("\n"))
}
