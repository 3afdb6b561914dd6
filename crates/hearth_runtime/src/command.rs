//! Queue elements.

use std::fmt;

use hearth_foundation::{Deliver, EntityId, Result};
use hearth_world::{Action, World};

/// Work that needs the world but is not a verb, such as spawning a body for
/// a new connection.
pub trait Task: Send + fmt::Debug {
    /// Short description used in logs and error context.
    fn describe(&self) -> &str;

    /// Runs against the world on the driver thread.
    ///
    /// # Errors
    ///
    /// Errors are logged by the driver and reported to the sender.
    fn run(self: Box<Self>, world: &mut World, out: &dyn Deliver) -> Result<()>;
}

/// What a command asks the driver to do.
pub enum Payload {
    /// A raw input line to resolve against the sender's surroundings.
    Line(String),
    /// An already constructed action.
    Action(Box<dyn Action + Send>),
    /// Arbitrary world work.
    Task(Box<dyn Task>),
}

impl Payload {
    /// Short label for logs: the verb of a line, or the action or task name.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Line(line) => line.split_whitespace().next().unwrap_or(""),
            Self::Action(action) => action.name(),
            Self::Task(task) => task.describe(),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(line) => f.debug_tuple("Line").field(line).finish(),
            Self::Action(action) => f.debug_tuple("Action").field(action).finish(),
            Self::Task(task) => f.debug_tuple("Task").field(task).finish(),
        }
    }
}

/// One queued command.
#[derive(Debug)]
pub struct Command {
    /// Enqueue sequence number, unique per queue.
    pub id: u64,
    /// Entity that submitted it; `None` for system-originated work.
    pub sender: Option<EntityId>,
    /// What to do.
    pub payload: Payload,
}
