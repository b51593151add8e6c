//! Saving, recalling, quitting, and the hangman board.

use crate::games::hangman::GuessOutcome;
use crate::state::{Realm, Session};
use crate::text::{argument_n, one_argument};
use crate::world::HOME;
use std::sync::Arc;
use tracing::error;

/// Write the character sheet out. A failed save is reported, not fatal;
/// the scheduler's logout persistence is the hard gate.
pub fn save(realm: &Arc<Realm>, session: &Arc<Session>, _rest: &str) {
    session.send("Saving player file.\n\r");
    persist(realm, session);
}

pub(crate) fn persist(realm: &Arc<Realm>, session: &Arc<Session>) -> bool {
    let name = session.name();
    let profile = session.player.lock().to_profile(&name);
    match realm.store.save_profile(&profile) {
        Ok(()) => true,
        Err(e) => {
            error!(name = %name, error = %e, "Profile save failed");
            session.send("Your profile could not be saved!\n\r");
            false
        }
    }
}

pub fn recall(realm: &Arc<Realm>, session: &Arc<Session>, _rest: &str) {
    {
        let mut player = session.player.lock();
        player.at = HOME;
        player.health = player.max_health;
    }
    session.send(
        "Your eyes close, your body flickers with fluidic energy, and you \
         materialize in your home location.\n\r",
    );
    super::info::render_look(realm, session, false);
}

pub fn quit(realm: &Arc<Realm>, session: &Arc<Session>, _rest: &str) {
    session.send("Saving player file.\n\r");
    persist(realm, session);
    session.request_quit();
}

/// `hangman start <word>` / `hangman status` / `hangman play <letter>`.
pub fn hangman(realm: &Arc<Realm>, session: &Arc<Session>, rest: &str) {
    let sub = one_argument(rest).to_lowercase();

    if sub.starts_with("start") {
        let word = argument_n(rest, 2);
        realm.hangman.lock().start(word, &mut rand::thread_rng());
        realm
            .registry
            .info_all(&format!("{} has started a game of hangman!", session.name()));
    } else if sub.starts_with("status") {
        let status = realm.hangman.lock().status();
        session.send(status);
    } else if sub.starts_with("play") {
        let Some(letter) = argument_n(rest, 2).chars().next() else {
            session.send("Play which letter?\n\r");
            return;
        };
        let outcome = realm
            .hangman
            .lock()
            .try_letter(letter.to_ascii_lowercase());
        match outcome {
            GuessOutcome::Win => realm
                .registry
                .info_all("#GHangman Game Over! #YPlayers Win!"),
            GuessOutcome::Loss => realm
                .registry
                .info_all("#GHangman Game Over! #RPlayers Lose."),
            GuessOutcome::Continue | GuessOutcome::Rejected => {}
        }
    } else {
        session.send(
            "Try \"hangman start <word>\", \"hangman status\", or \
             \"hangman play <letter>\".\n\r",
        );
    }
}
