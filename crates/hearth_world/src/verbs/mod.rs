//! Built-in verbs and the entity kits that register them.
//!
//! Verbs are plain data on entities; a kit is just a node builder that
//! registers the usual set for its kind.

pub mod arrive;
pub mod containment;
pub mod go;
pub mod help;
pub mod look;
pub mod quit;
pub mod speech;

use crate::node::{Audience, EntityKind, EntityNode};

pub use arrive::Arrive;
pub use containment::{Arrival, Departure};
pub use go::Go;
pub use help::Help;
pub use look::Look;
pub use quit::Quit;
pub use speech::{Emote, Say};

/// A player body with `look`, `say`, `emote`, `quit` and `help`.
#[must_use]
pub fn player(name: impl Into<String>) -> EntityNode {
    EntityNode::new(name)
        .with_kind(EntityKind::Player)
        .with_verb(Audience::Itself, "look", Look::build, look::USAGE)
        .with_verb(Audience::Itself, "say", Say::build, speech::SAY_USAGE)
        .with_verb(Audience::Itself, "emote", Emote::build, speech::EMOTE_USAGE)
        .with_verb(Audience::Itself, "quit", Quit::build, quit::USAGE)
        .with_verb(Audience::Itself, "help", Help::build, help::USAGE)
}

/// A room that offers `go` to whatever it contains.
#[must_use]
pub fn room(name: impl Into<String>, description: impl Into<String>) -> EntityNode {
    EntityNode::new(name)
        .with_kind(EntityKind::Room)
        .with_description(description)
        .with_verb(Audience::Contents, "go", Go::build, go::USAGE)
}

/// An area grouping rooms.
#[must_use]
pub fn area(name: impl Into<String>) -> EntityNode {
    EntityNode::new(name).with_kind(EntityKind::Area)
}
