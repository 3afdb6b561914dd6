//! The action protocol.
//!
//! Every command is an [`Action`] with three hooks, run in order by
//! [`perform`]:
//!
//! 1. `action` mutates the world and reports an outcome
//! 2. `respond` fills a [`Notice`] from that outcome, which is then sent
//! 3. `post_action` runs side effects that must follow the broadcast
//!
//! A notify-only action implements `respond` and leaves the other hooks at
//! their defaults.

use std::fmt;

use hearth_foundation::{Deliver, EntityId, Result};

use crate::node::Audience;
use crate::notice::Notice;
use crate::world::World;

/// The issuer, owner and text of one resolved command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    /// Entity that typed the command.
    pub issuer: EntityId,
    /// Entity whose command table held the verb.
    pub owner: EntityId,
    /// Which of the owner's tables matched.
    pub audience: Audience,
    /// The verb as typed.
    pub verb: String,
    /// Text after the verb; empty when there is none.
    pub trail: String,
}

impl Invocation {
    /// Creates an invocation of one of the issuer's own verbs.
    #[must_use]
    pub fn own(issuer: EntityId, verb: impl Into<String>, trail: impl Into<String>) -> Self {
        Self {
            issuer,
            owner: issuer,
            audience: Audience::Itself,
            verb: verb.into(),
            trail: trail.into(),
        }
    }
}

/// Constructs an action from an invocation.
pub type ActionFactory = fn(Invocation) -> Box<dyn Action + Send>;

/// A command that can be performed against the world.
pub trait Action: fmt::Debug {
    /// Short name used in logs and error context.
    fn name(&self) -> &str;

    /// The entity performing the action.
    fn caller(&self) -> EntityId;

    /// Mutates the world before anyone is told.
    ///
    /// # Errors
    ///
    /// Any error aborts the action before the broadcast.
    fn action(&mut self, _world: &mut World, _out: &dyn Deliver) -> Result<bool> {
        Ok(true)
    }

    /// Fills the notice's participants and messages from the outcome.
    ///
    /// # Errors
    ///
    /// Any error aborts the action before the broadcast.
    fn respond(&self, world: &World, outcome: bool, notice: &mut Notice) -> Result<()>;

    /// Runs after the broadcast.
    ///
    /// # Errors
    ///
    /// Errors are reported after observers have already been told.
    fn post_action(&mut self, _world: &mut World, _out: &dyn Deliver, _outcome: bool) -> Result<()> {
        Ok(())
    }
}

/// Runs an action through `action`, `respond`, send and `post_action`.
///
/// Returns the outcome of `action`. Nothing is rolled back when a later
/// step fails.
///
/// # Errors
///
/// Returns the first error raised by any hook.
pub fn perform(action: &mut dyn Action, world: &mut World, out: &dyn Deliver) -> Result<bool> {
    let outcome = action.action(world, out)?;

    let mut notice = Notice::new(action.caller());
    action.respond(world, outcome, &mut notice)?;
    notice.send(world, out);

    action.post_action(world, out, outcome)?;
    Ok(outcome)
}
