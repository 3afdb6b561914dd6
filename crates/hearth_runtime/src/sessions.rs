//! Registry of live connections, keyed by the entity each one drives.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crossbeam_channel::Sender;
use hearth_foundation::{Deliver, EntityId};
use tracing::{debug, trace};

/// A connection's outbound side, as seen by the registry.
#[derive(Clone, Debug)]
pub struct SessionLink {
    outbound: Sender<String>,
    online: Arc<AtomicBool>,
}

impl SessionLink {
    /// Creates a link that is online.
    #[must_use]
    pub fn new(outbound: Sender<String>) -> Self {
        Self {
            outbound,
            online: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Shared online flag; the connection's own threads watch it.
    #[must_use]
    pub fn online_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.online)
    }

    /// Returns true until the session is hung up.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }
}

/// Maps entities to live connections and implements [`Deliver`] over them.
///
/// Deliveries to entities without a live session are dropped.
#[derive(Debug, Default)]
pub struct Sessions {
    links: RwLock<HashMap<EntityId, SessionLink>>,
}

impl Sessions {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<EntityId, SessionLink>> {
        self.links.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<EntityId, SessionLink>> {
        self.links.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Binds an entity to a connection, replacing any previous binding.
    pub fn bind(&self, entity: EntityId, link: SessionLink) {
        debug!(entity = %entity, "session bound");
        if let Some(old) = self.write().insert(entity, link) {
            old.online.store(false, Ordering::Release);
        }
    }

    /// Removes an entity's binding without marking it offline.
    pub fn unbind(&self, entity: EntityId) -> Option<SessionLink> {
        self.write().remove(&entity)
    }

    /// Returns true if the entity has a live session.
    #[must_use]
    pub fn is_online(&self, entity: EntityId) -> bool {
        self.read().get(&entity).is_some_and(SessionLink::is_online)
    }

    /// Number of bound sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if no sessions are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

impl Deliver for Sessions {
    fn deliver(&self, to: EntityId, text: &str) {
        let links = self.read();
        let Some(link) = links.get(&to) else {
            return;
        };
        if !link.is_online() {
            return;
        }
        trace!(to = %to, "send");
        // A closed channel means the connection is already going away.
        let _ = link.outbound.send(text.to_string());
    }

    fn hang_up(&self, who: EntityId) {
        if let Some(link) = self.write().remove(&who) {
            link.online.store(false, Ordering::Release);
            debug!(entity = %who, "session hung up");
        }
    }
}
