//! Error types for the Hearth system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityId;

/// The main error type for Hearth operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about the command being executed.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an already-attached error.
    #[must_use]
    pub fn already_attached(child: EntityId, parent: EntityId) -> Self {
        Self::new(ErrorKind::AlreadyAttached { child, parent })
    }

    /// Creates a not-a-child error.
    #[must_use]
    pub fn not_a_child(parent: EntityId, child: EntityId) -> Self {
        Self::new(ErrorKind::NotAChild { parent, child })
    }

    /// Creates an unknown command error.
    #[must_use]
    pub fn unknown_command(verb: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownCommand(verb.into()))
    }

    /// Creates an action failure error.
    #[must_use]
    pub fn action_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ActionFailure(message.into()))
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn entity_not_found(id: EntityId) -> Self {
        Self::new(ErrorKind::EntityNotFound(id))
    }

    /// Creates a stale entity handle error.
    #[must_use]
    pub fn stale_entity(id: EntityId) -> Self {
        Self::new(ErrorKind::StaleEntity(id))
    }

    /// Creates an unknown starting location error.
    #[must_use]
    pub fn unknown_location(tag: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownLocation(tag.into()))
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config(message.into()))
    }

    /// Returns true if this error must stop the driver.
    ///
    /// Everything except a closed queue or an internal fault is resolved
    /// at or below the driver and the world keeps running.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind, ErrorKind::QueueClosed | ErrorKind::Internal(_))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// `add` on an entity that already has a parent.
    #[error("{child} is already inside {parent}")]
    AlreadyAttached {
        /// The entity that was being added.
        child: EntityId,
        /// The parent it is currently attached to.
        parent: EntityId,
    },

    /// `remove` or `move` on a pair that is not parent and child.
    #[error("{child} is not inside {parent}")]
    NotAChild {
        /// The supposed parent.
        parent: EntityId,
        /// The supposed child.
        child: EntityId,
    },

    /// No command table reachable from the issuer contains the verb.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// An action, response builder, or post-action step failed.
    #[error("action failed: {0}")]
    ActionFailure(String),

    /// Entity was not found in the arena.
    #[error("entity not found: {0:?}")]
    EntityNotFound(EntityId),

    /// Entity handle is stale (generation mismatch).
    #[error("stale entity reference: {0:?}")]
    StaleEntity(EntityId),

    /// Entity cannot be destroyed while it has a parent or is a root.
    #[error("entity is still attached: {0:?}")]
    StillAttached(EntityId),

    /// Entity cannot be destroyed while it still contains other entities.
    #[error("entity still has contents: {0:?}")]
    HasContents(EntityId),

    /// Adding the child would place an entity inside itself.
    #[error("adding {child} to {parent} would create a containment cycle")]
    ContainmentCycle {
        /// The would-be parent.
        parent: EntityId,
        /// The would-be child.
        child: EntityId,
    },

    /// No starting location is registered under the tag.
    #[error("no starting location tagged {0:?}")]
    UnknownLocation(String),

    /// The command queue has no consumer left.
    #[error("command queue is closed")]
    QueueClosed,

    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about the command during which an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Sequence number of the queued command.
    pub command: Option<u64>,
    /// Entity that submitted the command, if any.
    pub sender: Option<EntityId>,
    /// Verb or request name being executed.
    pub verb: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the command sequence number.
    #[must_use]
    pub fn with_command(mut self, command: u64) -> Self {
        self.command = Some(command);
        self
    }

    /// Sets the sender.
    #[must_use]
    pub fn with_sender(mut self, sender: Option<EntityId>) -> Self {
        self.sender = sender;
        self
    }

    /// Sets the verb or request name.
    #[must_use]
    pub fn with_verb(mut self, verb: impl Into<String>) -> Self {
        self.verb = Some(verb.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        if let Some(command) = self.command {
            write!(f, "command {command}")?;
            sep = ", ";
        }
        if let Some(sender) = self.sender {
            write!(f, "{sep}sender {sender}")?;
            sep = ", ";
        }
        if let Some(verb) = &self.verb {
            write!(f, "{sep}verb {verb:?}")?;
        }
        Ok(())
    }
}
