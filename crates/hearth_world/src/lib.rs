//! The world core for Hearth: the containment tree, notices, actions and
//! command resolution.
//!
//! This crate provides:
//! - [`EntityArena`] - Generational storage for entity nodes
//! - [`World`] - The containment tree with add/remove/move and invariants
//! - [`Notice`] - Relationship-scoped messages and their send order
//! - [`Action`] - The command protocol run by [`perform`]
//! - [`CommandResolver`] - Finds which entity owns a verb
//! - [`verbs`] - Built-in verbs and entity kits

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod action;
pub mod entity;
pub mod node;
pub mod notice;
pub mod resolver;
pub mod verbs;
pub mod world;

pub use action::{Action, ActionFactory, Invocation, perform};
pub use entity::EntityArena;
pub use node::{Audience, CommandTables, EntityKind, EntityNode, Exit, VerbEntry, VerbTable};
pub use notice::{Notice, Recipients, Slot};
pub use resolver::{CommandResolver, Resolved};
pub use world::World;
