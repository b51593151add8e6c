//! Social verbs: chatting, emotes, renaming, titles.

use crate::state::{Realm, Session};
use crate::text::{capitalize_first, one_argument};
use std::sync::Arc;
use tracing::error;

const MAX_TITLE: usize = 35;

pub fn chat(realm: &Arc<Realm>, session: &Arc<Session>, rest: &str) {
    if rest.is_empty() {
        session.send("You didn't add a message!\n\r");
        return;
    }
    let name = session.name();
    realm
        .registry
        .message_all_except(&format!("{name} chats, \"{rest}\".\n\r"), &name);
    session.send(format!("You chat, \"{rest}\".\n\r"));
}

pub fn laugh(realm: &Arc<Realm>, session: &Arc<Session>, _rest: &str) {
    let name = session.name();
    realm.registry.message_room(
        session.at(),
        &format!("{name} begins laughing hysterically!\n\r"),
        &name,
    );
    session.send("You begin laughing hysterically.\n\r");
}

pub fn dance(realm: &Arc<Realm>, session: &Arc<Session>, _rest: &str) {
    let name = session.name();
    realm.registry.message_room(
        session.at(),
        &format!("{name} begins dancing enthusiastically!\n\r"),
        &name,
    );
    session.send("You begin dancing enthusiastically.\n\r");
}

/// Rename the character. The new name must not collide with anyone online
/// or mid-handshake; admin standing stays with the login name. The secret
/// follows the character, so the new name can log back in later.
pub fn name(realm: &Arc<Realm>, session: &Arc<Session>, rest: &str) {
    let new_name = one_argument(rest);
    if new_name.is_empty() {
        session.send("Name yourself what?\n\r");
        return;
    }
    let new_name = capitalize_first(new_name);
    let recapitalize = session.name_matches(&new_name);
    if !recapitalize
        && (realm.registry.find(&new_name).is_some()
            || realm.pending_names.contains_key(&new_name.to_lowercase()))
    {
        session.send("That name is already taken.\n\r");
        return;
    }
    if !recapitalize {
        let old_name = session.name();
        if let Err(e) = realm.store.clone_credential(&old_name, &new_name) {
            error!(from = %old_name, to = %new_name, error = %e, "Rename failed");
            session.send("That name could not be claimed!\n\r");
            return;
        }
    }
    session.set_name(new_name.clone());
    session.send(format!("Your name has been set to {new_name}.\n\r"));
}

pub fn title(_realm: &Arc<Realm>, session: &Arc<Session>, rest: &str) {
    let mut title = rest.to_string();
    title.truncate(MAX_TITLE);
    session.player.lock().title = title;
    session.send("Title set.\n\r");
}
