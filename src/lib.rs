//! Hearth - text-world server core
//!
//! This crate re-exports all layers of the Hearth system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: hearth_runtime     Command queue, driver, sessions, config, listener
//! Layer 1: hearth_world       Containment tree, notices, actions, resolver, verbs
//! Layer 0: hearth_foundation  Core types (EntityId, Error, Deliver)
//! ```

pub use hearth_foundation as foundation;
pub use hearth_runtime as runtime;
pub use hearth_world as world;
