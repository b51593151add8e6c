//! A connected, authenticated session.
//!
//! The session is the hinge between the connection's I/O tasks and the tick
//! scheduler. The reader task feeds complete lines into a bounded channel;
//! the scheduler drains at most one line per pass. Outbound text goes the
//! other way through an unbounded channel the writer task drains.
//!
//! I/O tasks never hold an `Arc<Session>`. They share only the quit flag,
//! the close notifier, and their channel ends, so dropping the session out
//! of the registry is enough to wind the connection down.

use crate::state::player::Player;
use parking_lot::{Mutex, RwLock};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::{Notify, mpsc};

/// Lines buffered between the reader task and the scheduler. The reader
/// blocks (applying TCP backpressure) once a client gets this far ahead.
pub const INBOUND_LINE_BUFFER: usize = 32;

/// Why `try_take_line` produced nothing.
#[derive(Debug, PartialEq, Eq)]
pub enum LinePoll {
    /// No complete line this pass.
    Empty,
    /// One command line, ready to dispatch.
    Line(String),
    /// The reader task is gone; the connection is dead.
    Disconnected,
}

pub struct Session {
    /// Character name; the `name` verb can change it mid-session.
    name: RwLock<String>,
    pub addr: SocketAddr,
    pub admin: bool,
    pub player: Mutex<Player>,
    frozen: AtomicBool,
    /// Earliest instant the scheduler may dispatch for this session again.
    /// Buffered lines keep waiting while this lies in the future.
    next_action: Mutex<Instant>,
    quit: Arc<AtomicBool>,
    closed: Arc<Notify>,
    outbound: mpsc::UnboundedSender<String>,
    inbound: Mutex<mpsc::Receiver<String>>,
}

impl Session {
    pub fn new(
        name: String,
        addr: SocketAddr,
        admin: bool,
        player: Player,
        quit: Arc<AtomicBool>,
        closed: Arc<Notify>,
        outbound: mpsc::UnboundedSender<String>,
        inbound: mpsc::Receiver<String>,
    ) -> Self {
        Self {
            name: RwLock::new(name),
            addr,
            admin,
            player: Mutex::new(player),
            frozen: AtomicBool::new(false),
            next_action: Mutex::new(Instant::now()),
            quit,
            closed,
            outbound,
            inbound: Mutex::new(inbound),
        }
    }

    pub fn name(&self) -> String {
        self.name.read().clone()
    }

    pub fn name_matches(&self, other: &str) -> bool {
        self.name.read().eq_ignore_ascii_case(other)
    }

    pub fn set_name(&self, name: String) {
        *self.name.write() = name;
    }

    /// Queue markup text for the writer task. A dead writer just means the
    /// session is already on its way out; the scheduler will reap it.
    pub fn send(&self, msg: impl Into<String>) {
        let _ = self.outbound.send(msg.into());
    }

    /// Queue the prompt line.
    pub fn send_prompt(&self) {
        let name = self.name();
        let prompt = self.player.lock().build_prompt(&name, self.admin);
        self.send(prompt);
    }

    /// Pull at most one buffered command line.
    pub fn try_take_line(&self) -> LinePoll {
        match self.inbound.lock().try_recv() {
            Ok(line) => LinePoll::Line(line),
            Err(mpsc::error::TryRecvError::Empty) => LinePoll::Empty,
            Err(mpsc::error::TryRecvError::Disconnected) => LinePoll::Disconnected,
        }
    }

    /// Whether the scheduler may dispatch for this session at `now`.
    pub fn is_ready(&self, now: Instant) -> bool {
        now >= *self.next_action.lock()
    }

    /// Hold the session's input until `at`.
    pub fn defer_until(&self, at: Instant) {
        *self.next_action.lock() = at;
    }

    /// Mark the session for removal on the next scheduler pass.
    pub fn request_quit(&self) {
        self.quit.store(true, Ordering::Release);
    }

    pub fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::Acquire)
    }

    pub fn set_frozen(&self, frozen: bool) {
        self.frozen.store(frozen, Ordering::Release);
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }

    pub fn at(&self) -> crate::world::Coordinate {
        self.player.lock().at
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Wake the reader so it notices the teardown even while the peer
        // is idle.
        self.closed.notify_waiters();
    }
}
