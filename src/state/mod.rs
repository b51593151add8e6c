//! Shared server state.

pub mod player;
pub mod registry;
pub mod session;

pub use player::Player;
pub use registry::SessionRegistry;
pub use session::{LinePoll, Session};

use crate::config::Config;
use crate::error::StoreError;
use crate::games::Hangman;
use crate::store::ProfileStore;
use crate::world::World;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;
use tracing::info;

/// Config-derived identity, fixed for the life of the process.
pub struct RealmInfo {
    pub name: String,
    pub admin: String,
    pub motd: String,
    pub tick_ms: u64,
}

/// Everything the server shares: the roster, the world, persistence, and
/// the one hangman board. One `Arc<Realm>` threads through every task.
pub struct Realm {
    pub info: RealmInfo,
    pub registry: SessionRegistry,
    pub world: RwLock<World>,
    pub store: ProfileStore,
    /// Names mid-handshake, reserved so two simultaneous connections can't
    /// both create "Alice". Keys are lowercased.
    pub pending_names: DashMap<String, ()>,
    pub hangman: Mutex<Hangman>,
    shutdown: AtomicBool,
    fatal: Notify,
    fatal_reason: Mutex<Option<String>>,
}

impl Realm {
    pub fn new(config: &Config) -> Result<Self, StoreError> {
        let mut rng = match config.world.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut world = World::new();
        world.build(config.world.rooms, &mut rng);
        world.seed_items(config.world.items, &mut rng);
        info!(
            rooms = world.room_count(),
            items = config.world.items,
            seeded = config.world.seed.is_some(),
            "World carved"
        );

        let store = ProfileStore::open(&config.data.dir)?;

        Ok(Self {
            info: RealmInfo {
                name: config.server.name.clone(),
                admin: config.server.admin.clone(),
                motd: config.server.motd.clone(),
                tick_ms: config.server.tick_ms,
            },
            registry: SessionRegistry::new(),
            world: RwLock::new(world),
            store,
            pending_names: DashMap::new(),
            hangman: Mutex::new(Hangman::new()),
            shutdown: AtomicBool::new(false),
            fatal: Notify::new(),
            fatal_reason: Mutex::new(None),
        })
    }

    pub fn is_admin(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(&self.info.admin)
    }

    /// Reserve a character name for the duration of a handshake. Returns
    /// false if another handshake or an online session already holds it.
    pub fn reserve_name(&self, name: &str) -> bool {
        let key = name.to_lowercase();
        if self.registry.find(name).is_some() {
            return false;
        }
        match self.pending_names.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(v) => {
                v.insert(());
                true
            }
        }
    }

    pub fn release_name(&self, name: &str) {
        self.pending_names.remove(&name.to_lowercase());
    }

    /// Report an unrecoverable failure from a connection task. `main`
    /// observes it through [`Realm::fatal_raised`] and exits the process;
    /// persistence failures during admission must not be survived.
    pub fn raise_fatal(&self, reason: impl Into<String>) {
        *self.fatal_reason.lock() = Some(reason.into());
        self.fatal.notify_one();
    }

    /// Resolves once [`Realm::raise_fatal`] has been called.
    pub async fn fatal_raised(&self) -> String {
        self.fatal.notified().await;
        self.fatal_reason
            .lock()
            .take()
            .unwrap_or_else(|| "unknown fatal error".to_string())
    }

    /// Flip the shutdown latch; the scheduler notices on its next pass.
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    pub(crate) fn test_realm() -> (TempDir, std::sync::Arc<Realm>) {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.data.dir = dir.path().to_path_buf();
        config.world.rooms = 30;
        config.world.items = 5;
        config.world.seed = Some(42);
        (dir, std::sync::Arc::new(Realm::new(&config).unwrap()))
    }

    #[test]
    fn test_admin_check_ignores_case() {
        let (_dir, realm) = test_realm();
        assert!(realm.is_admin("ember"));
        assert!(realm.is_admin("EMBER"));
        assert!(!realm.is_admin("alice"));
    }

    #[test]
    fn test_name_reservation_blocks_double_claim() {
        let (_dir, realm) = test_realm();
        assert!(realm.reserve_name("Alice"));
        assert!(!realm.reserve_name("ALICE"));
        realm.release_name("alice");
        assert!(realm.reserve_name("Alice"));
    }

    #[tokio::test]
    async fn test_fatal_signal_carries_reason() {
        let (_dir, realm) = test_realm();
        realm.raise_fatal("credential store gone");
        assert_eq!(realm.fatal_raised().await, "credential store gone");
    }

    #[test]
    fn test_shutdown_latch() {
        let (_dir, realm) = test_realm();
        assert!(!realm.shutdown_requested());
        realm.request_shutdown();
        assert!(realm.shutdown_requested());
    }
}
