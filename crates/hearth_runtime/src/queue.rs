//! The command queue between connections and the driver.
//!
//! Any number of [`Submitter`]s push from any thread; the single [`Inbox`]
//! is drained by the driver. The channel is unbounded, so submitting never
//! waits on the driver, and it is FIFO in the order sends complete: two
//! commands submitted in sequence from one thread are received in that
//! order.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use hearth_foundation::{EntityId, Error, ErrorKind, Result};
use hearth_world::Action;
use tracing::debug;

use crate::command::{Command, Payload, Task};

/// Creates a connected submitter and inbox.
#[must_use]
pub fn channel() -> (Submitter, Inbox) {
    let (sender, receiver) = crossbeam_channel::unbounded();
    (
        Submitter {
            sender,
            sequence: Arc::new(AtomicU64::new(1)),
        },
        Inbox { receiver },
    )
}

/// Producer handle. Cheap to clone; safe to use from many threads.
#[derive(Clone, Debug)]
pub struct Submitter {
    sender: Sender<Command>,
    sequence: Arc<AtomicU64>,
}

impl Submitter {
    /// Enqueues a payload and returns the command's sequence number.
    ///
    /// # Errors
    ///
    /// Returns `QueueClosed` if the inbox has been dropped.
    pub fn enqueue(&self, sender: Option<EntityId>, payload: Payload) -> Result<u64> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        let label = payload.label().to_string();
        self.sender
            .send(Command {
                id,
                sender,
                payload,
            })
            .map_err(|_| Error::new(ErrorKind::QueueClosed))?;
        debug!(command = id, sender = ?sender, label = %label, "enqueued");
        Ok(id)
    }

    /// Enqueues a raw line typed by `issuer`.
    ///
    /// # Errors
    ///
    /// Returns `QueueClosed` if the inbox has been dropped.
    pub fn submit(&self, issuer: EntityId, line: impl Into<String>) -> Result<u64> {
        self.enqueue(Some(issuer), Payload::Line(line.into()))
    }

    /// Enqueues a constructed action.
    ///
    /// # Errors
    ///
    /// Returns `QueueClosed` if the inbox has been dropped.
    pub fn submit_action(
        &self,
        sender: Option<EntityId>,
        action: Box<dyn Action + Send>,
    ) -> Result<u64> {
        self.enqueue(sender, Payload::Action(action))
    }

    /// Enqueues a task.
    ///
    /// # Errors
    ///
    /// Returns `QueueClosed` if the inbox has been dropped.
    pub fn submit_task(&self, sender: Option<EntityId>, task: Box<dyn Task>) -> Result<u64> {
        self.enqueue(sender, Payload::Task(task))
    }
}

/// Consumer end, owned by the driver.
#[derive(Debug)]
pub struct Inbox {
    receiver: Receiver<Command>,
}

impl Inbox {
    /// Takes the oldest command without waiting.
    ///
    /// # Errors
    ///
    /// Returns `QueueClosed` once every submitter is gone and the queue is
    /// empty.
    pub fn try_next(&self) -> Result<Option<Command>> {
        match self.receiver.try_recv() {
            Ok(command) => Ok(Some(command)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(Error::new(ErrorKind::QueueClosed)),
        }
    }

    /// Number of commands waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Returns true if nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
