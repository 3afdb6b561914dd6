//! The driver: the single consumer of the command queue and sole owner of
//! the world.
//!
//! Each pass drains the queue one command at a time, oldest first. A
//! command runs to completion, through its post-action step, before the
//! next is taken. After the drain the heartbeat hooks run if their interval
//! has elapsed. When a pass finds nothing to do the driver sleeps for the
//! idle quantum.
//!
//! A command that fails or panics is logged with its identity and the
//! sender is told something went wrong; the driver moves on. Only fatal
//! errors stop it.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use hearth_foundation::{Deliver, EntityId, Error, ErrorContext, ErrorKind, Result};
use hearth_world::{CommandResolver, World, perform};
use tracing::{debug, error, info, trace, warn};

use crate::command::{Command, Payload};
use crate::config::DriverConfig;
use crate::queue::{self, Inbox, Submitter};

/// Sent to the sender of a command that failed unexpectedly.
pub const FAILURE_MESSAGE: &str = "A serious error has occurred!";

/// A maintenance hook run on the heartbeat interval.
pub trait Heartbeat: Send {
    /// Name used in logs.
    fn name(&self) -> &str {
        "heartbeat"
    }

    /// Runs once per elapsed interval, on the driver thread.
    fn beat(&mut self, world: &mut World, out: &dyn Deliver);
}

/// Counters kept by the driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriverStats {
    /// Passes completed.
    pub passes: u64,
    /// Commands that completed without error.
    pub executed: u64,
    /// Commands that failed or panicked.
    pub failed: u64,
    /// Lines whose verb no reachable table holds.
    pub unknown: u64,
    /// Heartbeats run.
    pub heartbeats: u64,
}

/// Serializes all world mutation.
pub struct Driver {
    world: World,
    inbox: Inbox,
    submitter: Submitter,
    out: Arc<dyn Deliver>,
    config: DriverConfig,
    heartbeats: Vec<Box<dyn Heartbeat>>,
    last_heartbeat: Instant,
    stats: DriverStats,
}

impl Driver {
    /// Creates a driver owning `world` and sending output to `out`.
    #[must_use]
    pub fn new(world: World, out: Arc<dyn Deliver>, config: DriverConfig) -> Self {
        let (submitter, inbox) = queue::channel();
        Self {
            world,
            inbox,
            submitter,
            out,
            config,
            heartbeats: Vec::new(),
            last_heartbeat: Instant::now(),
            stats: DriverStats::default(),
        }
    }

    /// Builder method to register a heartbeat hook.
    #[must_use]
    pub fn with_heartbeat(mut self, hook: Box<dyn Heartbeat>) -> Self {
        self.heartbeats.push(hook);
        self
    }

    /// Returns a handle for enqueueing commands.
    #[must_use]
    pub fn submitter(&self) -> Submitter {
        self.submitter.clone()
    }

    /// The world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The world, mutably. Only meaningful while the driver is not running.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The driver's configuration.
    #[must_use]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Counters so far.
    #[must_use]
    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    /// Executes queued commands until the queue is empty.
    ///
    /// Returns how many commands were taken.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error; non-fatal failures are handled here.
    pub fn drain(&mut self) -> Result<usize> {
        let mut taken = 0;
        while let Some(command) = self.inbox.try_next()? {
            taken += 1;
            self.execute(command)?;
        }
        Ok(taken)
    }

    /// One drain followed by a heartbeat check.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error.
    pub fn pass(&mut self) -> Result<usize> {
        let taken = self.drain()?;
        if self.last_heartbeat.elapsed() >= self.config.heartbeat() {
            self.heartbeat();
        }
        self.stats.passes += 1;
        Ok(taken)
    }

    /// Runs passes until `stop` is set, sleeping when idle.
    ///
    /// # Errors
    ///
    /// Returns the fatal error that stopped the driver.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<()> {
        info!(
            idle_ms = self.config.idle_quantum_ms,
            heartbeat_ms = self.config.heartbeat_ms,
            "driver started"
        );
        while !stop.load(Ordering::Acquire) {
            match self.pass() {
                Ok(0) => thread::sleep(self.config.idle_quantum()),
                Ok(_) => {}
                Err(err) => {
                    error!(error = %err, "driver stopped by fatal error");
                    return Err(err);
                }
            }
        }
        info!(stats = ?self.stats, "driver stopped");
        Ok(())
    }

    /// Moves the driver onto its own thread.
    ///
    /// # Errors
    ///
    /// Returns an `Internal` error if the thread cannot be started.
    pub fn spawn(mut self) -> Result<DriverHandle> {
        let stop = Arc::new(AtomicBool::new(false));
        let submitter = self.submitter();
        let flag = Arc::clone(&stop);
        let thread = thread::Builder::new()
            .name("hearth-driver".to_string())
            .spawn(move || {
                let result = self.run(&flag);
                (self, result)
            })
            .map_err(|e| Error::new(ErrorKind::Internal(format!("cannot start driver: {e}"))))?;

        Ok(DriverHandle {
            stop,
            thread,
            submitter,
        })
    }

    fn heartbeat(&mut self) {
        self.last_heartbeat = Instant::now();
        self.stats.heartbeats += 1;
        trace!(count = self.stats.heartbeats, "heartbeat");
        for hook in &mut self.heartbeats {
            trace!(hook = hook.name(), "beat");
            let world = &mut self.world;
            let out = self.out.as_ref();
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| hook.beat(world, out))) {
                error!(
                    hook = hook.name(),
                    panic = %panic_message(panic.as_ref()),
                    "heartbeat hook panicked"
                );
            }
        }
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        let Command {
            id,
            sender,
            payload,
        } = command;
        let label = payload.label().to_string();
        debug!(command = id, sender = ?sender, label = %label, "dequeued");

        let world = &mut self.world;
        let out = self.out.as_ref();
        let outcome = catch_unwind(AssertUnwindSafe(|| run_payload(world, out, sender, payload)));

        let context = ErrorContext::new()
            .with_command(id)
            .with_sender(sender)
            .with_verb(label);

        match outcome {
            Ok(Ok(())) => {
                self.stats.executed += 1;
            }
            Ok(Err(err)) => {
                if let ErrorKind::UnknownCommand(verb) = &err.kind {
                    self.stats.unknown += 1;
                    debug!(command = id, verb = %verb, "unknown command");
                    if let Some(to) = sender {
                        self.out
                            .deliver(to, &format!("\"{verb}\" is not a valid command."));
                    }
                    return Ok(());
                }

                let err = err.with_context(context.clone());
                if err.is_fatal() {
                    return Err(err);
                }
                self.stats.failed += 1;
                warn!(error = %err, context = %context, "command failed");
                self.report_failure(sender);
            }
            Err(panic) => {
                self.stats.failed += 1;
                error!(
                    panic = %panic_message(panic.as_ref()),
                    context = %context,
                    "command panicked"
                );
                self.report_failure(sender);
            }
        }
        Ok(())
    }

    fn report_failure(&self, sender: Option<EntityId>) {
        if let Some(to) = sender {
            self.out.deliver(to, FAILURE_MESSAGE);
        }
    }
}

fn run_payload(
    world: &mut World,
    out: &dyn Deliver,
    sender: Option<EntityId>,
    payload: Payload,
) -> Result<()> {
    match payload {
        Payload::Line(line) => {
            let Some(issuer) = sender else {
                warn!(line = %line, "line without a sender ignored");
                return Ok(());
            };
            if let Some(mut action) = CommandResolver::resolve(world, issuer, &line)? {
                perform(action.as_mut(), world, out)?;
            }
            Ok(())
        }
        Payload::Action(mut action) => perform(action.as_mut(), world, out).map(|_| ()),
        Payload::Task(task) => task.run(world, out),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// A driver running on its own thread.
#[derive(Debug)]
pub struct DriverHandle {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<(Driver, Result<()>)>,
    submitter: Submitter,
}

impl DriverHandle {
    /// Returns a handle for enqueueing commands.
    #[must_use]
    pub fn submitter(&self) -> Submitter {
        self.submitter.clone()
    }

    /// Returns true once the driver thread has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Stops the driver after its current pass and hands it back.
    ///
    /// # Errors
    ///
    /// Returns the fatal error that stopped the driver, or an `Internal`
    /// error if the driver thread itself panicked.
    pub fn stop(self) -> Result<Driver> {
        self.stop.store(true, Ordering::Release);
        let (driver, result) = self
            .thread
            .join()
            .map_err(|_| Error::new(ErrorKind::Internal("driver thread panicked".to_string())))?;
        result.map(|()| driver)
    }
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("queued", &self.inbox.len())
            .field("heartbeats", &self.heartbeats.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
