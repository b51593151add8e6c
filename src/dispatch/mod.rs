//! Command dispatch.
//!
//! Verbs resolve by a linear scan of an ordered table: the typed word
//! matches the first command it is a prefix of. Table order is therefore
//! part of the player-visible contract ("e" is east, "s" is south, never
//! save) and must not be reordered.

mod commands;

use crate::state::{Realm, Session};
use crate::text::one_argument;
use std::sync::Arc;

type Handler = fn(&Arc<Realm>, &Arc<Session>, &str);

struct Command {
    name: &'static str,
    handler: Handler,
}

macro_rules! cmd {
    ($name:literal, $handler:path) => {
        Command {
            name: $name,
            handler: $handler,
        }
    };
}

/// Commands anyone can use, in match-priority order.
static PUBLIC_COMMANDS: &[Command] = &[
    cmd!("east", commands::movement::east),
    cmd!("north", commands::movement::north),
    cmd!("south", commands::movement::south),
    cmd!("west", commands::movement::west),
    cmd!("save", commands::misc::save),
    cmd!("chat", commands::social::chat),
    cmd!("name", commands::social::name),
    cmd!("look", commands::info::look),
    cmd!("recall", commands::misc::recall),
    cmd!("get", commands::items::get),
    cmd!("grab", commands::items::get),
    cmd!("drop", commands::items::drop),
    cmd!("inventory", commands::items::inventory),
    cmd!("remove", commands::items::remove),
    cmd!("equipment", commands::items::equipment),
    cmd!("wear", commands::items::wear),
    cmd!("commands", commands::info::commands),
    cmd!("score", commands::info::score),
    cmd!("who", commands::info::who),
    cmd!("map", commands::info::map),
    cmd!("credits", commands::info::credits),
    cmd!("title", commands::social::title),
    cmd!("hangman", commands::misc::hangman),
    cmd!("laugh", commands::social::laugh),
    cmd!("dance", commands::social::dance),
    cmd!("quit", commands::misc::quit),
];

/// Commands reserved for the configured administrator.
static ADMIN_COMMANDS: &[Command] = &[
    cmd!("ilist", commands::admin::item_list),
    cmd!("itemlist", commands::admin::item_list),
    cmd!("shutdown", commands::admin::shutdown),
    cmd!("freeze", commands::admin::freeze),
    cmd!("unfreeze", commands::admin::unfreeze),
    cmd!("info", commands::admin::info),
];

const HUH: &str = "Huh? Type \"commands\" for a list of commands.";

fn find(table: &'static [Command], verb: &str) -> Option<&'static Command> {
    table.iter().find(|c| c.name.starts_with(verb))
}

/// Names for the `commands` listing, in table order.
pub fn public_command_names() -> impl Iterator<Item = &'static str> {
    PUBLIC_COMMANDS.iter().map(|c| c.name)
}

pub fn admin_command_names() -> impl Iterator<Item = &'static str> {
    ADMIN_COMMANDS.iter().map(|c| c.name)
}

/// Interpret one line of player input.
///
/// Dead characters may only `quit` or `recall`; frozen sessions get nothing
/// at all. A prompt follows every handled line unless the session is on its
/// way out.
pub fn dispatch(realm: &Arc<Realm>, session: &Arc<Session>, input: &str) {
    let input = input.trim();
    let verb = one_argument(input).to_lowercase();
    let rest = match input.find(' ') {
        Some(idx) => &input[idx + 1..],
        None => "",
    };

    let dead = session.player.lock().is_dead();
    let allowed_while_dead = "quit".starts_with(verb.as_str()) || "recall".starts_with(verb.as_str());

    if (!dead || allowed_while_dead) && !verb.is_empty() && !session.is_frozen() {
        let command = find(PUBLIC_COMMANDS, &verb).or_else(|| {
            if session.admin {
                find(ADMIN_COMMANDS, &verb)
            } else {
                None
            }
        });

        match command {
            Some(command) => (command.handler)(realm, session, rest),
            None => session.send(format!("{HUH}\n\r")),
        }

        if !session.quit_requested() {
            session.send_prompt();
        }
    } else if dead {
        session.send("You are dead. :( You can can recall (try again) or quit.\n\r");
        session.send_prompt();
    } else if session.is_frozen() {
        session.send("Your input is frozen!");
    } else {
        // Whitespace-only input
        session.send(HUH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::session::tests::test_session;
    use crate::state::tests::test_realm;
    use crate::world::HOME;

    #[test]
    fn test_dead_characters_limited_to_recall_and_quit() {
        let (_dir, realm) = test_realm();
        let (session, mut out_rx, _in_tx) = test_session("Alice");
        let session = realm.registry.admit(session).unwrap();
        session.player.lock().health = 0;

        // Movement is refused with the fixed message and no effect
        dispatch(&realm, &session, "north");
        assert_eq!(
            out_rx.try_recv().unwrap(),
            "You are dead. :( You can can recall (try again) or quit.\n\r"
        );
        assert_eq!(session.at(), HOME);
        while out_rx.try_recv().is_ok() {}

        // The recall prefix still runs and restores the body
        dispatch(&realm, &session, "rec");
        assert!(session.player.lock().health > 0);
        while out_rx.try_recv().is_ok() {}

        // So does the quit prefix
        session.player.lock().health = 0;
        dispatch(&realm, &session, "q");
        assert!(session.quit_requested());
    }

    #[test]
    fn test_frozen_session_gets_fixed_message_only() {
        let (_dir, realm) = test_realm();
        let (session, mut out_rx, _in_tx) = test_session("Alice");
        let session = realm.registry.admit(session).unwrap();
        session.set_frozen(true);

        dispatch(&realm, &session, "look");
        assert_eq!(out_rx.try_recv().unwrap(), "Your input is frozen!");
        assert!(out_rx.try_recv().is_err());
    }

    #[test]
    fn test_single_letters_resolve_by_table_order() {
        assert_eq!(find(PUBLIC_COMMANDS, "e").map(|c| c.name), Some("east"));
        assert_eq!(find(PUBLIC_COMMANDS, "n").map(|c| c.name), Some("north"));
        assert_eq!(find(PUBLIC_COMMANDS, "s").map(|c| c.name), Some("south"));
        assert_eq!(find(PUBLIC_COMMANDS, "w").map(|c| c.name), Some("west"));
    }

    #[test]
    fn test_longer_prefixes_reach_later_entries() {
        assert_eq!(find(PUBLIC_COMMANDS, "sa").map(|c| c.name), Some("save"));
        assert_eq!(find(PUBLIC_COMMANDS, "wh").map(|c| c.name), Some("who"));
        assert_eq!(find(PUBLIC_COMMANDS, "sc").map(|c| c.name), Some("score"));
        assert_eq!(find(PUBLIC_COMMANDS, "q").map(|c| c.name), Some("quit"));
    }

    #[test]
    fn test_unknown_verb_matches_nothing() {
        assert!(find(PUBLIC_COMMANDS, "xyzzy").is_none());
        assert!(find(PUBLIC_COMMANDS, "easter").is_none());
    }

    #[test]
    fn test_admin_table_order() {
        assert_eq!(find(ADMIN_COMMANDS, "i").map(|c| c.name), Some("ilist"));
        assert_eq!(find(ADMIN_COMMANDS, "info").map(|c| c.name), Some("info"));
        assert_eq!(find(ADMIN_COMMANDS, "f").map(|c| c.name), Some("freeze"));
    }
}
