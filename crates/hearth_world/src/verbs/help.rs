//! `help [verb]`.

use std::fmt::Write as _;

use hearth_foundation::{EntityId, Result};

use crate::action::{Action, Invocation};
use crate::notice::{Notice, Slot};
use crate::resolver::CommandResolver;
use crate::world::World;

/// Usage shown by `help` and `help help`.
pub const USAGE: &str = "Usage: help [<command>]\nWith no argument, lists the commands you can use. \
With a command, shows how to use it.";

/// Lists reachable verbs, or shows one verb's usage.
#[derive(Debug, Clone)]
pub struct Help {
    caller: EntityId,
    topic: String,
}

impl Help {
    /// Creates a help request for `caller`; an empty topic lists verbs.
    #[must_use]
    pub fn new(caller: EntityId, topic: impl Into<String>) -> Self {
        Self {
            caller,
            topic: topic.into(),
        }
    }

    /// Factory registered in command tables.
    #[must_use]
    pub fn build(invocation: Invocation) -> Box<dyn Action + Send> {
        Box::new(Self::new(invocation.issuer, invocation.trail))
    }
}

impl Action for Help {
    fn name(&self) -> &str {
        "help"
    }

    fn caller(&self) -> EntityId {
        self.caller
    }

    fn respond(&self, world: &World, _outcome: bool, notice: &mut Notice) -> Result<()> {
        if !self.topic.is_empty() {
            let text = CommandResolver::lookup(world, self.caller, &self.topic).map_or(
                "There is no help available on that topic.",
                |found| found.entry.usage,
            );
            notice.tell(Slot::Caller, text);
            return Ok(());
        }

        let mut text = format!("{USAGE}\nValid commands are:");
        for (verb, _) in CommandResolver::available_verbs(world, self.caller) {
            // Writing to a String cannot fail.
            let _ = write!(text, "\n  - {verb}");
        }
        notice.tell(Slot::Caller, text);
        Ok(())
    }
}
