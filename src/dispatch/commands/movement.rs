//! Movement verbs.

use crate::dispatch::commands::info;
use crate::state::{Realm, Session};
use crate::world::Direction;
use std::sync::Arc;

fn step(realm: &Arc<Realm>, session: &Arc<Session>, dir: Direction) {
    let to = session.at().step(dir);
    let exists = realm.world.read().room_exists(to);
    if exists {
        {
            let mut player = session.player.lock();
            player.at = to;
            player.discover(to);
        }
        info::render_look(realm, session, false);
    } else {
        session.send(format!("*bump* You can't go {}!\n\r", dir.name()));
    }
}

pub fn east(realm: &Arc<Realm>, session: &Arc<Session>, _rest: &str) {
    step(realm, session, Direction::East);
}

pub fn north(realm: &Arc<Realm>, session: &Arc<Session>, _rest: &str) {
    step(realm, session, Direction::North);
}

pub fn south(realm: &Arc<Realm>, session: &Arc<Session>, _rest: &str) {
    step(realm, session, Direction::South);
}

pub fn west(realm: &Arc<Realm>, session: &Arc<Session>, _rest: &str) {
    step(realm, session, Direction::West);
}
