//! `say` and `emote`.

use hearth_foundation::{EntityId, Result};

use crate::action::{Action, Invocation};
use crate::notice::{Notice, Slot};
use crate::world::World;

/// Usage shown by `help say`.
pub const SAY_USAGE: &str = "Usage: say <message>\nSends <message> to everyone listening in the room.";

/// Usage shown by `help emote`.
pub const EMOTE_USAGE: &str = "Usage: emote <message>\nShows everyone in the room that you are doing <message>.";

/// Speaks to everyone sharing the caller's container.
#[derive(Debug, Clone)]
pub struct Say {
    caller: EntityId,
    text: String,
}

impl Say {
    /// Creates a say from `caller`.
    #[must_use]
    pub fn new(caller: EntityId, text: impl Into<String>) -> Self {
        Self {
            caller,
            text: text.into(),
        }
    }

    /// Factory registered in command tables.
    #[must_use]
    pub fn build(invocation: Invocation) -> Box<dyn Action + Send> {
        Box::new(Self::new(invocation.issuer, invocation.trail))
    }
}

impl Action for Say {
    fn name(&self) -> &str {
        "say"
    }

    fn caller(&self) -> EntityId {
        self.caller
    }

    fn respond(&self, world: &World, _outcome: bool, notice: &mut Notice) -> Result<()> {
        if self.text.is_empty() {
            notice.tell(
                Slot::Caller,
                "Keeping what you want to say to yourself is detrimental to your health.",
            );
            return Ok(());
        }

        let name = world.name(self.caller)?;
        notice.tell(Slot::Caller, format!("You say, \"{}\"", self.text));
        notice.tell(Slot::CallerSiblings, format!("{name} says, \"{}\"", self.text));
        Ok(())
    }
}

/// Shows an action to everyone sharing the caller's container.
#[derive(Debug, Clone)]
pub struct Emote {
    caller: EntityId,
    text: String,
}

impl Emote {
    /// Creates an emote from `caller`.
    #[must_use]
    pub fn new(caller: EntityId, text: impl Into<String>) -> Self {
        Self {
            caller,
            text: text.into(),
        }
    }

    /// Factory registered in command tables.
    #[must_use]
    pub fn build(invocation: Invocation) -> Box<dyn Action + Send> {
        Box::new(Self::new(invocation.issuer, invocation.trail))
    }
}

impl Action for Emote {
    fn name(&self) -> &str {
        "emote"
    }

    fn caller(&self) -> EntityId {
        self.caller
    }

    fn respond(&self, world: &World, _outcome: bool, notice: &mut Notice) -> Result<()> {
        if self.text.is_empty() {
            notice.tell(Slot::Caller, "What do you want to emote?");
            return Ok(());
        }

        let line = format!("::: {} {} :::", world.name(self.caller)?, self.text);
        notice.tell(Slot::Caller, line.clone());
        notice.tell(Slot::CallerSiblings, line);
        Ok(())
    }
}
