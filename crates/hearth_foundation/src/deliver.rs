//! Output delivery from the world core to connections.
//!
//! The core never touches sockets. When an action produces text for an
//! entity, it calls [`Deliver::deliver`]; whoever owns the connections
//! decides whether that entity is listening.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::entity::EntityId;

/// Sink for rendered text addressed to entities.
///
/// Implementations must tolerate deliveries to entities that have no live
/// connection (rooms, items, players who have gone offline) by ignoring them.
pub trait Deliver: Send + Sync {
    /// Pushes `text` to the connection owning `to`, if there is one.
    fn deliver(&self, to: EntityId, text: &str);

    /// Marks the connection owning `who` as offline.
    fn hang_up(&self, _who: EntityId) {}
}

/// A [`Deliver`] that drops everything.
///
/// Useful while building the world before any connection exists.
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl Deliver for Discard {
    fn deliver(&self, _to: EntityId, _text: &str) {}
}

/// One recorded delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    /// Recipient.
    pub to: EntityId,
    /// Text sent.
    pub text: String,
}

#[derive(Debug, Default)]
struct Log {
    deliveries: Vec<Delivery>,
    hung_up: Vec<EntityId>,
}

/// A [`Deliver`] that records every delivery and hang-up in order.
#[derive(Debug, Default)]
pub struct Transcript {
    log: Mutex<Log>,
}

impl Transcript {
    /// Creates an empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Log> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns every delivery so far, oldest first.
    #[must_use]
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.lock().deliveries.clone()
    }

    /// Returns the texts delivered to one entity, oldest first.
    #[must_use]
    pub fn received_by(&self, who: EntityId) -> Vec<String> {
        self.lock()
            .deliveries
            .iter()
            .filter(|d| d.to == who)
            .map(|d| d.text.clone())
            .collect()
    }

    /// Returns the entities that received `text`, in delivery order.
    #[must_use]
    pub fn recipients_of(&self, text: &str) -> Vec<EntityId> {
        self.lock()
            .deliveries
            .iter()
            .filter(|d| d.text == text)
            .map(|d| d.to)
            .collect()
    }

    /// Returns the entities hung up so far, in order.
    #[must_use]
    pub fn hung_up(&self) -> Vec<EntityId> {
        self.lock().hung_up.clone()
    }

    /// Returns the number of deliveries recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().deliveries.len()
    }

    /// Returns true if nothing has been delivered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().deliveries.is_empty()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        let mut log = self.lock();
        log.deliveries.clear();
        log.hung_up.clear();
    }
}

impl Deliver for Transcript {
    fn deliver(&self, to: EntityId, text: &str) {
        self.lock().deliveries.push(Delivery {
            to,
            text: text.to_string(),
        });
    }

    fn hang_up(&self, who: EntityId) {
        self.lock().hung_up.push(who);
    }
}
