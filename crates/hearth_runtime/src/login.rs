//! Bringing a new connection into the world.

use std::sync::Arc;

use crossbeam_channel::Sender;
use hearth_foundation::{Deliver, EntityId, Result};
use hearth_world::verbs::{self, Arrive};
use hearth_world::{World, perform};
use tracing::{debug, info, warn};

use crate::command::Task;
use crate::sessions::{SessionLink, Sessions};

/// Spawns a player body, binds it to a session and performs an arrival at
/// a starting location.
#[derive(Debug)]
pub struct EnterWorld {
    name: String,
    starting_location: String,
    session: Option<(Arc<Sessions>, SessionLink)>,
    reply: Option<Sender<EntityId>>,
}

impl EnterWorld {
    /// Creates the task for a player called `name` arriving at the location
    /// tagged `starting_location`.
    #[must_use]
    pub fn new(name: impl Into<String>, starting_location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            starting_location: starting_location.into(),
            session: None,
            reply: None,
        }
    }

    /// Builder method to bind the new body to a session before it arrives.
    #[must_use]
    pub fn with_session(mut self, sessions: Arc<Sessions>, link: SessionLink) -> Self {
        self.session = Some((sessions, link));
        self
    }

    /// Builder method to receive the new body's handle.
    #[must_use]
    pub fn with_reply(mut self, reply: Sender<EntityId>) -> Self {
        self.reply = Some(reply);
        self
    }
}

impl Task for EnterWorld {
    fn describe(&self) -> &str {
        "enter world"
    }

    fn run(self: Box<Self>, world: &mut World, out: &dyn Deliver) -> Result<()> {
        let Self {
            name,
            starting_location,
            session,
            reply,
        } = *self;

        let room = world.starting(&starting_location)?;
        let body = world.spawn(verbs::player(name));

        if let Some(reply) = reply {
            if reply.send(body).is_err() {
                // Nobody is waiting for this body any more.
                debug!(entity = %body, "entry abandoned before arrival");
                world.destroy(body)?;
                return Ok(());
            }
        }
        let sessions = session.map(|(sessions, link)| {
            sessions.bind(body, link);
            sessions
        });
        info!(entity = %body, room = %room, "player entering");

        if let Err(err) = perform(&mut Arrive::new(body, room), world, out) {
            warn!(entity = %body, error = %err, "arrival failed, discarding body");
            discard_body(world, sessions.as_deref(), body, out);
            return Err(err);
        }
        Ok(())
    }
}

/// Undoes a partial entry: hangs up the session and frees the body.
fn discard_body(world: &mut World, sessions: Option<&Sessions>, body: EntityId, out: &dyn Deliver) {
    if let Some(sessions) = sessions {
        sessions.hang_up(body);
    }
    if let Some(parent) = world.parent_of(body) {
        if let Err(err) = world.remove(parent, body, out) {
            warn!(entity = %body, error = %err, "cannot detach discarded body");
            return;
        }
    }
    if let Err(err) = world.destroy(body) {
        warn!(entity = %body, error = %err, "cannot destroy discarded body");
    }
}
