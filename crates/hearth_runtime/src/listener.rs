//! A line-oriented TCP front door.
//!
//! One thread per connection reads lines and submits them; a second thread
//! per connection writes whatever the world delivers. Neither touches the
//! world directly. Telnet negotiation is not interpreted.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use hearth_foundation::EntityId;
use tracing::{debug, info, warn};

use crate::config::ListenerConfig;
use crate::login::EnterWorld;
use crate::queue::Submitter;
use crate::sessions::{SessionLink, Sessions};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);
const NAME_PROMPT: &str = "What is your name? ";
const MAX_NAME_LEN: usize = 32;

/// Everything a connection needs to reach the world.
#[derive(Clone, Debug)]
pub struct Gateway {
    submitter: Submitter,
    sessions: Arc<Sessions>,
    config: ListenerConfig,
    starting_location: String,
}

impl Gateway {
    /// Creates a gateway submitting to the given queue.
    #[must_use]
    pub fn new(
        submitter: Submitter,
        sessions: Arc<Sessions>,
        config: ListenerConfig,
        starting_location: impl Into<String>,
    ) -> Self {
        Self {
            submitter,
            sessions,
            config,
            starting_location: starting_location.into(),
        }
    }

    /// Accepts connections until `stop` is set, one thread each.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be switched to
    /// non-blocking mode.
    pub fn serve(&self, listener: &TcpListener, stop: &AtomicBool) -> io::Result<()> {
        listener.set_nonblocking(true)?;
        info!(addr = ?listener.local_addr().ok(), "listening");

        while !stop.load(Ordering::Acquire) {
            match listener.accept() {
                Ok((stream, peer)) => self.spawn_connection(stream, peer),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => thread::sleep(ACCEPT_BACKOFF),
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    thread::sleep(ACCEPT_BACKOFF);
                }
            }
        }
        Ok(())
    }

    fn spawn_connection(&self, stream: TcpStream, peer: SocketAddr) {
        let gateway = self.clone();
        let spawned = thread::Builder::new()
            .name(format!("hearth-conn-{peer}"))
            .spawn(move || {
                if let Err(e) = gateway.handle(stream) {
                    debug!(peer = %peer, error = %e, "connection ended with error");
                }
            });
        if let Err(e) = spawned {
            warn!(peer = %peer, error = %e, "cannot start connection thread");
        }
    }

    /// Runs one connection to completion on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error on the connection.
    pub fn handle(&self, stream: TcpStream) -> io::Result<()> {
        stream.set_nonblocking(false)?;
        let peer = stream.peer_addr().ok();
        let mut writer = stream.try_clone()?;
        let mut reader = BufReader::new(stream);

        write_line(&mut writer, &self.config.greeting)?;
        writer.write_all(NAME_PROMPT.as_bytes())?;
        writer.flush()?;

        let name = loop {
            let Some(line) = read_line(&mut reader, self.config.max_line_len)? else {
                return Ok(());
            };
            let name: String = line.trim().chars().take(MAX_NAME_LEN).collect();
            if !name.is_empty() {
                break name;
            }
            writer.write_all(NAME_PROMPT.as_bytes())?;
            writer.flush()?;
        };

        let (outbound, inbound) = crossbeam_channel::unbounded();
        let link = SessionLink::new(outbound);
        let online = link.online_flag();
        let (reply, entered) = crossbeam_channel::bounded(1);

        let task = EnterWorld::new(name, self.starting_location.clone())
            .with_session(Arc::clone(&self.sessions), link)
            .with_reply(reply);
        if self.submitter.submit_task(None, Box::new(task)).is_err() {
            write_line(&mut writer, "The world is not accepting visitors right now.")?;
            return Ok(());
        }

        let entity = match entered.recv_timeout(self.config.enter_timeout()) {
            Ok(entity) => entity,
            Err(RecvTimeoutError::Timeout) => {
                self.abandon_entry(entered);
                write_line(&mut writer, "The world is not accepting visitors right now.")?;
                return Ok(());
            }
            Err(RecvTimeoutError::Disconnected) => {
                write_line(&mut writer, "The world is not accepting visitors right now.")?;
                return Ok(());
            }
        };
        info!(peer = ?peer, entity = %entity, "connection entered world");

        let writer_thread = thread::spawn(move || pump_output(inbound, writer));
        self.pump_input(entity, &mut reader, &online);

        if self.sessions.is_online(entity) {
            // Transport-level disconnect: leave the world as if by `quit`.
            let _ = self.submitter.submit(entity, "quit");
        }
        let _ = writer_thread.join();
        info!(peer = ?peer, entity = %entity, "connection closed");
        Ok(())
    }

    /// Hands a pending entry to a watcher thread that sends the body away as
    /// soon as the driver gets round to creating it.
    fn abandon_entry(&self, entered: Receiver<EntityId>) {
        let submitter = self.submitter.clone();
        let spawned = thread::Builder::new()
            .name("hearth-abandoned-entry".to_string())
            .spawn(move || {
                if let Ok(entity) = entered.recv() {
                    info!(entity = %entity, "entry arrived after its connection gave up");
                    let _ = submitter.submit(entity, "quit");
                }
            });
        if let Err(e) = spawned {
            warn!(error = %e, "cannot watch abandoned entry");
        }
    }

    fn pump_input(&self, entity: EntityId, reader: &mut BufReader<TcpStream>, online: &AtomicBool) {
        while online.load(Ordering::Acquire) {
            match read_line(reader, self.config.max_line_len) {
                Ok(Some(line)) => {
                    if self.submitter.submit(entity, line).is_err() {
                        break;
                    }
                }
                Ok(None) | Err(_) => break,
            }
        }
    }
}

/// Writes delivered text until the session's channel closes, then shuts the
/// socket so the reading side wakes up.
fn pump_output(inbound: Receiver<String>, mut writer: TcpStream) {
    for text in inbound {
        if write_line(&mut writer, &text).is_err() {
            break;
        }
    }
    let _ = writer.shutdown(Shutdown::Both);
}

fn write_line(writer: &mut impl Write, text: &str) -> io::Result<()> {
    writer.write_all(text.replace('\n', "\r\n").as_bytes())?;
    writer.write_all(b"\r\n")?;
    writer.flush()
}

/// Reads one line, dropping the terminator and anything past `max_len`
/// bytes. Returns `None` at end of stream.
///
/// At most `max_len + 1` bytes are buffered; the rest of an overlong line
/// is skipped without being stored.
fn read_line(reader: &mut impl BufRead, max_len: usize) -> io::Result<Option<String>> {
    let mut buf = Vec::new();
    let limit = u64::try_from(max_len).unwrap_or(u64::MAX).saturating_add(1);
    if reader.by_ref().take(limit).read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    if buf.last() != Some(&b'\n') && buf.len() > max_len {
        skip_past_newline(reader)?;
    }
    while matches!(buf.last(), Some(b'\n' | b'\r')) {
        buf.pop();
    }
    buf.truncate(max_len);
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Discards input up to and including the next newline, or to end of stream.
fn skip_past_newline(reader: &mut impl BufRead) -> io::Result<()> {
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(());
        }
        if let Some(at) = available.iter().position(|b| *b == b'\n') {
            reader.consume(at + 1);
            return Ok(());
        }
        let len = available.len();
        reader.consume(len);
    }
}
