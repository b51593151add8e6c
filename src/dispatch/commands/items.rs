//! Item verbs: picking up, dropping, carrying, and wearing.

use crate::state::{Realm, Session};
use crate::text::one_argument;
use std::sync::Arc;

pub fn get(realm: &Arc<Realm>, session: &Arc<Session>, rest: &str) {
    let keyword = one_argument(rest);
    if keyword.is_empty() {
        session.send("Get what?\n\r");
        return;
    }

    let at = session.at();
    let mut world = realm.world.write();
    let Some(room) = world.room_mut(at) else {
        session.send(format!("The room doesn't contain {keyword}.\n\r"));
        return;
    };
    let found = room.find_item(keyword).map(|i| i.id);
    match found.and_then(|id| room.take_item(id)) {
        Some(item) => {
            let name = item.name.clone();
            session.player.lock().inventory.add(item);
            session.send(format!("You picked up {name}.\n\r"));
        }
        None => session.send(format!("The room doesn't contain {keyword}.\n\r")),
    }
}

pub fn drop(realm: &Arc<Realm>, session: &Arc<Session>, rest: &str) {
    let keyword = one_argument(rest);
    if keyword.is_empty() {
        session.send("Drop what?\n\r");
        return;
    }

    let taken = {
        let mut player = session.player.lock();
        let id = player.inventory.find(keyword).map(|i| i.id);
        id.and_then(|id| player.inventory.take(id))
    };
    match taken {
        Some(item) => {
            let name = item.name.clone();
            let at = session.at();
            if let Some(room) = realm.world.write().room_mut(at) {
                room.items.push(item);
            }
            session.send(format!("{name} was dropped from inventory.\n\r"));
        }
        None => session.send(format!("You are not carrying {keyword}.\n\r")),
    }
}

pub fn inventory(_realm: &Arc<Realm>, session: &Arc<Session>, _rest: &str) {
    let listing = session.player.lock().inventory.display();
    session.send(listing);
}

pub fn wear(_realm: &Arc<Realm>, session: &Arc<Session>, rest: &str) {
    let keyword = one_argument(rest);
    if keyword.is_empty() {
        return;
    }

    let msg = {
        let mut player = session.player.lock();
        let id = player.inventory.find(keyword).map(|i| i.id);
        match id.and_then(|id| player.inventory.take(id)) {
            Some(item) => {
                let (msg, displaced) = player.equipment.wear(item);
                if let Some(old) = displaced {
                    player.inventory.add(old);
                }
                msg
            }
            None => format!("You don't seem to have {keyword} to equip.\n\r"),
        }
    };
    session.send(msg);
}

pub fn remove(_realm: &Arc<Realm>, session: &Arc<Session>, rest: &str) {
    let keyword = one_argument(rest);
    if keyword.is_empty() {
        return;
    }

    let msg = {
        let mut player = session.player.lock();
        let slot = player.equipment.find(keyword).map(|i| i.slot);
        match slot.and_then(|slot| player.equipment.remove(slot)) {
            Some(item) => {
                let msg = format!("You remove {}.\n\r", item.name);
                player.inventory.add(item);
                msg
            }
            None => format!("You don't seem to have {keyword} to unequip.\n\r"),
        }
    };
    session.send(msg);
}

pub fn equipment(_realm: &Arc<Realm>, session: &Arc<Session>, _rest: &str) {
    let display = session.player.lock().equipment.display();
    session.send(display);
}
