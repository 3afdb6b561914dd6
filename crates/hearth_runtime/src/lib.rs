//! Runtime for Hearth: the command queue, the driver that owns the world,
//! and the adapters around it.
//!
//! This crate provides:
//! - [`Submitter`] / [`Inbox`] - The concurrent FIFO between connections and the driver
//! - [`Driver`] - The single-threaded scheduler that drains the queue
//! - [`Sessions`] - Entity to connection registry implementing [`Deliver`](hearth_foundation::Deliver)
//! - [`EnterWorld`] - Spawns and places a body for a new connection
//! - [`Config`] - TOML configuration
//! - [`Gateway`] - Line-oriented TCP listener

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bootstrap;
pub mod command;
pub mod config;
pub mod driver;
pub mod listener;
pub mod logging;
pub mod login;
pub mod queue;
pub mod sessions;

pub use command::{Command, Payload, Task};
pub use config::{Config, DriverConfig, ListenerConfig};
pub use driver::{Driver, DriverHandle, DriverStats, FAILURE_MESSAGE, Heartbeat};
pub use listener::Gateway;
pub use login::EnterWorld;
pub use queue::{Inbox, Submitter, channel};
pub use sessions::{SessionLink, Sessions};
