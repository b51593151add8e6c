//! The tick scheduler.
//!
//! The world advances in fixed passes (100ms by default). Each pass visits
//! every admitted session in admission order and dispatches at most one
//! buffered command line per session, so no client can starve the others
//! by typing faster. Sessions whose next-action time lies in the future are
//! skipped with their input left buffered. Sessions flagged to quit are
//! persisted and removed at the end of the pass; a persistence failure
//! there takes the process down rather than silently losing a character.

use crate::dispatch;
use crate::state::{LinePoll, Realm};
use anyhow::Context;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::{self, MissedTickBehavior};
use tracing::info;

pub async fn run(realm: Arc<Realm>) -> anyhow::Result<()> {
    let mut ticker = time::interval(Duration::from_millis(realm.info.tick_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(tick_ms = realm.info.tick_ms, "Scheduler running");

    loop {
        ticker.tick().await;

        if realm.shutdown_requested() {
            save_all(&realm)?;
            info!("Shutdown: all profiles saved");
            return Ok(());
        }

        run_pass(&realm)?;
    }
}

/// One scheduler pass: dispatch, then reap.
fn run_pass(realm: &Arc<Realm>) -> anyhow::Result<()> {
    // Dispatch outside the registry lock so handlers can broadcast.
    let snapshot = realm.registry.snapshot();
    let now = Instant::now();
    for session in &snapshot {
        if session.quit_requested() || !session.is_ready(now) {
            continue;
        }
        match session.try_take_line() {
            LinePoll::Empty => {}
            LinePoll::Disconnected => session.request_quit(),
            LinePoll::Line(line) => {
                // Bare newlines don't count as a command
                if !line.is_empty() {
                    dispatch::dispatch(realm, session, &line);
                }
            }
        }
    }

    // Reap quitters: persist first, then remove and announce.
    for session in snapshot {
        if !session.quit_requested() {
            continue;
        }
        let name = session.name();
        let profile = session.player.lock().to_profile(&name);
        realm
            .store
            .save_profile(&profile)
            .with_context(|| format!("persisting {name} at logout"))?;
        if realm.registry.remove(&name).is_some() {
            info!(name = %name, addr = %session.addr, "Session closed");
            realm
                .registry
                .info_all(&format!("{name} has logged out of {}.", realm.info.name));
        }
    }
    Ok(())
}

fn save_all(realm: &Arc<Realm>) -> anyhow::Result<()> {
    for session in realm.registry.snapshot() {
        let name = session.name();
        let profile = session.player.lock().to_profile(&name);
        realm
            .store
            .save_profile(&profile)
            .with_context(|| format!("persisting {name} at shutdown"))?;
        session.send("The world is saved. Goodbye.\n\r");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::session::tests::test_session;
    use crate::state::tests::test_realm;
    use crate::world::{Direction, HOME};

    #[tokio::test]
    async fn test_deferred_sessions_are_skipped() {
        let (_dir, realm) = test_realm();
        let (session, mut out_rx, in_tx) = test_session("Alice");
        let session = realm.registry.admit(session).unwrap();

        in_tx.send("chat hello".to_string()).await.unwrap();
        session.defer_until(Instant::now() + Duration::from_secs(60));
        run_pass(&realm).unwrap();
        assert!(out_rx.try_recv().is_err(), "deferred session was dispatched");

        // Any number of passes later, still nothing until the time elapses
        run_pass(&realm).unwrap();
        assert!(out_rx.try_recv().is_err());

        session.defer_until(Instant::now());
        run_pass(&realm).unwrap();
        assert_eq!(out_rx.try_recv().unwrap(), "You chat, \"hello\".\n\r");
    }

    #[tokio::test]
    async fn test_pass_visits_in_admission_order_with_effects_visible() {
        let (_dir, realm) = test_realm();
        let (alice, _alice_rx, alice_tx) = test_session("Alice");
        let (bob, mut bob_rx, bob_tx) = test_session("Bob");
        let alice = realm.registry.admit(alice).unwrap();
        let _bob = realm.registry.admit(bob).unwrap();

        // The walk always carves at least one neighbor of home
        let verb = {
            let world = realm.world.read();
            Direction::ALL
                .iter()
                .copied()
                .find(|d| world.room_exists(HOME.step(*d)))
                .map(|d| d.name().to_lowercase())
                .unwrap()
        };

        // Both lines land in the same pass. Alice was admitted first, so
        // her step runs before Bob's look, and Bob already sees her gone.
        alice_tx.send(verb).await.unwrap();
        bob_tx.send("look".to_string()).await.unwrap();
        run_pass(&realm).unwrap();

        assert_ne!(alice.at(), HOME);
        let mut seen = String::new();
        while let Ok(msg) = bob_rx.try_recv() {
            seen.push_str(&msg);
        }
        assert!(seen.contains("There are no players in this room."));
        assert!(!seen.contains("Alice#n is standing here"));
    }

    #[tokio::test]
    async fn test_quitter_is_persisted_and_removed() {
        let (_dir, realm) = test_realm();
        let (session, _out_rx, in_tx) = test_session("Alice");
        let session = realm.registry.admit(session).unwrap();

        in_tx.send("quit".to_string()).await.unwrap();
        run_pass(&realm).unwrap();

        assert!(realm.registry.is_empty());
        assert!(realm.store.profile_exists("Alice"));
        drop(session);
    }
}
