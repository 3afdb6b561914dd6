//! Relationship-scoped notices: who gets told what when something happens.
//!
//! A [`Notice`] names the participants of one invocation (caller, optional
//! target and second), four relationship sets, and up to seven message
//! slots. Sending delivers each filled slot to its participants in a fixed
//! order:
//!
//! 1. caller
//! 2. target
//! 3. second
//! 4. caller's siblings
//! 5. caller's children
//! 6. target's siblings
//! 7. target's children
//!
//! Unfilled slots are never sent, and a recipient gets at most one copy of
//! a slot's message.

use hearth_foundation::{Deliver, Delivery, EntityId};
use tracing::trace;

use crate::world::World;

/// Who belongs to a relationship set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Recipients {
    /// Nobody.
    #[default]
    Nobody,
    /// Exactly these entities, duplicates removed. Replaces derivation.
    Listed(Vec<EntityId>),
    /// The anchor's live contents minus caller, target and second.
    Derived,
}

/// A message slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The entity performing the invocation.
    Caller,
    /// The entity acted upon.
    Target,
    /// A second entity involved.
    Second,
    /// The caller's siblings.
    CallerSiblings,
    /// The caller's contents.
    CallerChildren,
    /// The target's siblings.
    TargetSiblings,
    /// The target's contents.
    TargetChildren,
}

impl Slot {
    /// All slots in send order.
    pub const ALL: [Slot; 7] = [
        Slot::Caller,
        Slot::Target,
        Slot::Second,
        Slot::CallerSiblings,
        Slot::CallerChildren,
        Slot::TargetSiblings,
        Slot::TargetChildren,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// One invocation's participants and messages.
#[derive(Clone, Debug)]
pub struct Notice {
    /// The entity performing the invocation.
    pub caller: EntityId,
    /// The entity acted upon.
    pub target: Option<EntityId>,
    /// A second entity involved.
    pub second: Option<EntityId>,
    /// The caller's siblings.
    pub caller_siblings: Recipients,
    /// The caller's contents.
    pub caller_children: Recipients,
    /// The target's siblings.
    pub target_siblings: Recipients,
    /// The target's contents.
    pub target_children: Recipients,
    messages: [Option<String>; 7],
}

impl Notice {
    /// Creates a notice with only a caller, no sets and no messages.
    #[must_use]
    pub fn new(caller: EntityId) -> Self {
        Self {
            caller,
            target: None,
            second: None,
            caller_siblings: Recipients::Nobody,
            caller_children: Recipients::Nobody,
            target_siblings: Recipients::Nobody,
            target_children: Recipients::Nobody,
            messages: Default::default(),
        }
    }

    /// Sets the target.
    #[must_use]
    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the second participant.
    #[must_use]
    pub fn with_second(mut self, second: EntityId) -> Self {
        self.second = Some(second);
        self
    }

    /// Fills a message slot.
    ///
    /// For relationship slots, a set still at [`Recipients::Nobody`] is
    /// switched to [`Recipients::Derived`]; an explicit list is kept.
    pub fn tell(&mut self, slot: Slot, text: impl Into<String>) {
        if let Some(set) = self.recipients_mut(slot) {
            if *set == Recipients::Nobody {
                *set = Recipients::Derived;
            }
        }
        self.messages[slot.index()] = Some(text.into());
    }

    /// Builder form of [`tell`](Self::tell).
    #[must_use]
    pub fn telling(mut self, slot: Slot, text: impl Into<String>) -> Self {
        self.tell(slot, text);
        self
    }

    /// Replaces a relationship set. Has no effect on single-entity slots.
    pub fn set_recipients(&mut self, slot: Slot, recipients: Recipients) {
        if let Some(set) = self.recipients_mut(slot) {
            *set = recipients;
        }
    }

    /// Returns a slot's message, if filled.
    #[must_use]
    pub fn message(&self, slot: Slot) -> Option<&str> {
        self.messages[slot.index()].as_deref()
    }

    /// Returns true if no slot is filled.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        self.messages.iter().all(Option::is_none)
    }

    fn recipients(&self, slot: Slot) -> Option<&Recipients> {
        match slot {
            Slot::CallerSiblings => Some(&self.caller_siblings),
            Slot::CallerChildren => Some(&self.caller_children),
            Slot::TargetSiblings => Some(&self.target_siblings),
            Slot::TargetChildren => Some(&self.target_children),
            Slot::Caller | Slot::Target | Slot::Second => None,
        }
    }

    fn recipients_mut(&mut self, slot: Slot) -> Option<&mut Recipients> {
        match slot {
            Slot::CallerSiblings => Some(&mut self.caller_siblings),
            Slot::CallerChildren => Some(&mut self.caller_children),
            Slot::TargetSiblings => Some(&mut self.target_siblings),
            Slot::TargetChildren => Some(&mut self.target_children),
            Slot::Caller | Slot::Target | Slot::Second => None,
        }
    }

    /// The entity whose contents a derived set is taken from.
    fn anchor(&self, world: &World, slot: Slot) -> Option<EntityId> {
        match slot {
            Slot::CallerSiblings => world.parent_of(self.caller),
            Slot::CallerChildren => Some(self.caller),
            Slot::TargetSiblings => self.target.and_then(|t| world.parent_of(t)),
            Slot::TargetChildren => self.target,
            Slot::Caller | Slot::Target | Slot::Second => None,
        }
    }

    /// Resolves the recipients of one slot against the current tree.
    #[must_use]
    pub fn recipients_of(&self, world: &World, slot: Slot) -> Vec<EntityId> {
        match slot {
            Slot::Caller => vec![self.caller],
            Slot::Target => self.target.into_iter().collect(),
            Slot::Second => self.second.into_iter().collect(),
            _ => match self.recipients(slot) {
                None | Some(Recipients::Nobody) => Vec::new(),
                Some(Recipients::Listed(list)) => {
                    let mut unique = Vec::with_capacity(list.len());
                    for id in list {
                        if !unique.contains(id) {
                            unique.push(*id);
                        }
                    }
                    unique
                }
                Some(Recipients::Derived) => self.anchor(world, slot).map_or_else(Vec::new, |anchor| {
                    world
                        .children_of(anchor)
                        .iter()
                        .copied()
                        .filter(|id| !self.is_participant(*id))
                        .collect()
                }),
            },
        }
    }

    fn is_participant(&self, id: EntityId) -> bool {
        id == self.caller || self.target == Some(id) || self.second == Some(id)
    }

    /// Computes every delivery this notice would make, in send order.
    #[must_use]
    pub fn deliveries(&self, world: &World) -> Vec<(Slot, Delivery)> {
        let mut out = Vec::new();
        for slot in Slot::ALL {
            let Some(text) = self.message(slot) else {
                continue;
            };
            for to in self.recipients_of(world, slot) {
                out.push((
                    slot,
                    Delivery {
                        to,
                        text: text.to_string(),
                    },
                ));
            }
        }
        out
    }

    /// Sends every filled slot to its recipients.
    pub fn send(&self, world: &World, out: &dyn Deliver) {
        for (slot, delivery) in self.deliveries(world) {
            trace!(to = %delivery.to, ?slot, text = %delivery.text, "deliver");
            out.deliver(delivery.to, &delivery.text);
        }
    }
}
