//! The roster of admitted sessions.
//!
//! A single mutex around an insertion-ordered `Vec` serializes admission,
//! removal, and whole-world broadcasts. The scheduler takes a snapshot each
//! pass and dispatches outside the lock, so handlers are free to broadcast.
//!
//! Lock order: registry before any session's player lock, never the other
//! way around.

use crate::state::session::Session;
use crate::world::Coordinate;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<Vec<Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a freshly authenticated session. Fails if a session with the
    /// same name (case-insensitively) is already online; the final word on
    /// name uniqueness happens here, under the lock.
    pub fn admit(&self, session: Session) -> Option<Arc<Session>> {
        let name = session.name();
        let mut sessions = self.sessions.lock();
        if sessions.iter().any(|s| s.name_matches(&name)) {
            return None;
        }
        let session = Arc::new(session);
        sessions.push(Arc::clone(&session));
        Some(session)
    }

    /// Drop a session from the roster, returning it for persistence.
    pub fn remove(&self, name: &str) -> Option<Arc<Session>> {
        let mut sessions = self.sessions.lock();
        let idx = sessions.iter().position(|s| s.name_matches(name))?;
        Some(sessions.remove(idx))
    }

    pub fn find(&self, name: &str) -> Option<Arc<Session>> {
        self.sessions
            .lock()
            .iter()
            .find(|s| s.name_matches(name))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    /// Insertion-ordered copy of the roster for a scheduler pass.
    pub fn snapshot(&self) -> Vec<Arc<Session>> {
        self.sessions.lock().clone()
    }

    /// Send to everyone. Recipients also get a fresh prompt, since the text
    /// lands in the middle of whatever they were typing.
    pub fn message_all(&self, msg: &str) {
        for session in self.sessions.lock().iter() {
            session.send(msg);
            session.send_prompt();
        }
    }

    pub fn message_all_except(&self, msg: &str, except: &str) {
        for session in self.sessions.lock().iter() {
            if !session.name_matches(except) {
                session.send(msg);
                session.send_prompt();
            }
        }
    }

    /// World-wide notice in the standard info dressing.
    pub fn info_all(&self, msg: &str) {
        self.message_all(&format!("#YInfo -> #n{msg}"));
    }

    /// Send to everyone standing at `at`, except the actor.
    pub fn message_room(&self, at: Coordinate, msg: &str, except: &str) {
        for session in self.sessions.lock().iter() {
            if session.name_matches(except) {
                continue;
            }
            if session.at() == at {
                session.send(msg);
                session.send_prompt();
            }
        }
    }

    /// Direct message by name, with the trailing prompt refresh.
    pub fn message_by_name(&self, name: &str, msg: &str) {
        if let Some(session) = self.find(name) {
            session.send(format!("{msg}\n\r"));
            session.send_prompt();
        }
    }

    /// The `who` roster body.
    pub fn who_status(&self) -> String {
        let mut out = String::new();
        for session in self.sessions.lock().iter() {
            let status = if session.admin {
                "\t#rAdmin#n\t".to_string()
            } else {
                format!("\t{}\t", session.player.lock().level)
            };
            let title = session.player.lock().title.clone();
            out.push_str(&format!("{status}#c{}#n {title}#n\n\r", session.name()));
        }
        out
    }

    /// Names of other sessions standing at `at`, as look-output lines.
    pub fn occupants_line(&self, at: Coordinate, except: &str) -> String {
        let mut out = String::new();
        for session in self.sessions.lock().iter() {
            if session.name_matches(except) {
                continue;
            }
            if session.at() == at {
                out.push_str(&format!(
                    "#Y{}#n is standing here, chilling.\n",
                    session.name()
                ));
            }
        }
        out
    }

    /// Freeze or thaw a named session. Returns false if nobody by that
    /// name is online.
    pub fn set_frozen(&self, name: &str, frozen: bool) -> bool {
        match self.find(name) {
            Some(session) => {
                session.set_frozen(frozen);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::player::Player;
    use crate::state::session::INBOUND_LINE_BUFFER;
    use crate::store::Profile;
    use std::sync::atomic::AtomicBool;
    use tokio::sync::{Notify, mpsc};

    fn session(name: &str) -> (Session, mpsc::UnboundedReceiver<String>) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (_in_tx, in_rx) = mpsc::channel(INBOUND_LINE_BUFFER);
        let session = Session::new(
            name.to_string(),
            "127.0.0.1:4000".parse().unwrap(),
            false,
            Player::from_profile(&Profile::fresh(name)),
            Arc::new(AtomicBool::new(false)),
            Arc::new(Notify::new()),
            out_tx,
            in_rx,
        );
        (session, out_rx)
    }

    #[tokio::test]
    async fn test_admit_rejects_duplicate_names() {
        let registry = SessionRegistry::new();
        let (a, _rx_a) = session("Alice");
        let (b, _rx_b) = session("ALICE");
        assert!(registry.admit(a).is_some());
        assert!(registry.admit(b).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_is_case_insensitive() {
        let registry = SessionRegistry::new();
        let (a, _rx) = session("Alice");
        registry.admit(a);
        assert!(registry.remove("alice").is_some());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_preserves_admission_order() {
        let registry = SessionRegistry::new();
        let mut rxs = Vec::new();
        for name in ["Cara", "Alice", "Bob"] {
            let (s, rx) = session(name);
            registry.admit(s);
            rxs.push(rx);
        }
        let names: Vec<String> = registry.snapshot().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Cara", "Alice", "Bob"]);
    }

    #[tokio::test]
    async fn test_message_all_except_skips_actor() {
        let registry = SessionRegistry::new();
        let (a, mut rx_a) = session("Alice");
        let (b, mut rx_b) = session("Bob");
        registry.admit(a);
        registry.admit(b);

        registry.message_all_except("hi\n\r", "Alice");
        assert_eq!(rx_b.recv().await.unwrap(), "hi\n\r");
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_room_message_targets_by_location() {
        let registry = SessionRegistry::new();
        let (a, _rx_a) = session("Alice");
        let (b, mut rx_b) = session("Bob");
        let (c, mut rx_c) = session("Cara");
        let elsewhere = Coordinate::new(0, 0);
        c.player.lock().at = elsewhere;

        registry.admit(a);
        registry.admit(b);
        registry.admit(c);

        let home = crate::world::HOME;
        registry.message_room(home, "dance!\n\r", "Alice");
        assert_eq!(rx_b.recv().await.unwrap(), "dance!\n\r");
        assert!(rx_c.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_set_frozen_by_name() {
        let registry = SessionRegistry::new();
        let (a, _rx) = session("Alice");
        registry.admit(a);
        assert!(registry.set_frozen("alice", true));
        assert!(registry.find("Alice").unwrap().is_frozen());
        assert!(!registry.set_frozen("Ghost", true));
    }
}
