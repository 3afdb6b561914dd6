//! Core types for Hearth.
//!
//! This crate provides:
//! - [`EntityId`] - Generational handles for entities in the world arena
//! - [`Error`] - Error type shared by every layer, with [`ErrorKind`] for matching
//! - [`Deliver`] - The interface the core uses to push text to connections
//! - [`Transcript`] - A recording [`Deliver`] sink for tests and tooling

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod deliver;
pub mod entity;
pub mod error;

pub use deliver::{Deliver, Delivery, Discard, Transcript};
pub use entity::EntityId;
pub use error::{Error, ErrorContext, ErrorKind};

/// Result type alias using the Hearth error type.
pub type Result<T> = std::result::Result<T, Error>;
