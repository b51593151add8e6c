//! Administrator verbs.

use crate::state::{Realm, Session};
use crate::text::{capitalize_first, one_argument};
use std::sync::Arc;
use tracing::info;

pub fn item_list(realm: &Arc<Realm>, session: &Arc<Session>, _rest: &str) {
    let mut out =
        "(#yLocation#n)\t[#yItemID#n: #yItemName#n] #yLevel#n\n\r".to_string();
    let world = realm.world.read();
    for (at, item) in world.all_items() {
        out.push_str(&format!(
            "({}, {})\t[#y{}#n: {}]#n {}\n\r",
            at.x, at.y, item.id, item.name, item.level
        ));
    }
    drop(world);
    session.send(out);
}

/// Flip the shutdown latch. The scheduler saves everyone and the process
/// exits cleanly on its next pass.
pub fn shutdown(realm: &Arc<Realm>, session: &Arc<Session>, _rest: &str) {
    info!(admin = %session.name(), "Shutdown requested");
    realm.registry.info_all("The world is shutting down!");
    realm.request_shutdown();
}

pub fn freeze(realm: &Arc<Realm>, session: &Arc<Session>, rest: &str) {
    let target = capitalize_first(&one_argument(rest).to_lowercase());
    if target.is_empty() {
        session.send("Freeze whom?\n\r");
        return;
    }
    if realm.registry.set_frozen(&target, true) {
        session.send(format!("{target} was frozen successfully.\n\r"));
        realm.registry.message_by_name(
            &target,
            &format!(
                "Your input has been frozen. You are unable to play {}.",
                realm.info.name
            ),
        );
    } else {
        session.send(format!("Could not find {target}. Please try again.\n\r"));
    }
}

pub fn unfreeze(realm: &Arc<Realm>, session: &Arc<Session>, rest: &str) {
    let target = capitalize_first(&one_argument(rest).to_lowercase());
    if target.is_empty() {
        session.send("Unfreeze whom?\n\r");
        return;
    }
    if realm.registry.set_frozen(&target, false) {
        session.send(format!("{target} was unfrozen successfully.\n\r"));
        realm.registry.message_by_name(
            &target,
            &format!(
                "\n\rYour input has been unfrozen. You are now able to play {} again.",
                realm.info.name
            ),
        );
    } else {
        session.send(format!("Could not find {target}. Please try again.\n\r"));
    }
}

/// Broadcast the argument verbatim as a world notice.
pub fn info(realm: &Arc<Realm>, _session: &Arc<Session>, rest: &str) {
    realm.registry.info_all(rest);
}
