//! Informational verbs: look, the maps, who, score, commands, credits.

use crate::dispatch::{admin_command_names, public_command_names};
use crate::state::{Player, Realm, Session};
use crate::text::{smush_left, wrap};
use crate::world::{Coordinate, World};
use std::sync::Arc;

/// Columns of room text before re-wrapping.
const LOOK_WIDTH: usize = 90;

pub fn look(realm: &Arc<Realm>, session: &Arc<Session>, _rest: &str) {
    render_look(realm, session, false);
}

/// Render the room: header, exits, description, occupants, and floor items,
/// with the minimap merged in on the left.
pub fn render_look(realm: &Arc<Realm>, session: &Arc<Session>, leading_newline: bool) {
    if leading_newline {
        session.send("\n\r");
    }
    let name = session.name();

    let (at, mut text, items, mini) = {
        let world = realm.world.read();
        let player = session.player.lock();
        let at = player.at;
        let Some(room) = world.room(at) else {
            session.send("You float in an empty void.\n\r");
            return;
        };
        let mut text = format!("[#y{}, {}#n]: #g{}#n\n", at.x, at.y, room.name);
        text.push_str(&world.exits_line(at));
        text.push_str(&room.description);
        text.push('\n');
        (at, text, room.inventory_line(), minimap(&world, &player))
    };

    // Occupants come from the registry; the player lock is already released.
    let occupants = realm.registry.occupants_line(at, &name);
    if occupants.is_empty() {
        text.push_str("There are no players in this room.\n");
    } else {
        text.push_str(&occupants);
    }
    text.push_str(&items);

    let text = wrap(&text, LOOK_WIDTH);
    session.send(smush_left(&mini, &text));
}

/// The 3x3 minimap beside the room description. Undiscovered-but-real rooms
/// show red; discovered ones green; the player's cell is a cyan P.
fn minimap(world: &World, player: &Player) -> String {
    let size = 1;
    let (px, py) = (player.at.x, player.at.y);
    let disc = |x: i32, y: i32| player.has_discovered(x, y);
    let exists = |x: i32, y: i32| world.room_exists(Coordinate::new(x, y));

    let mut map = String::new();
    for y in (py - size..=py + size).rev() {
        for x in px - size..=px + size {
            if disc(x, y) || exists(x, y) {
                let left = if disc(x - 1, y) && disc(x, y) {
                    "-"
                } else if exists(x - 1, y) {
                    "#r-#n"
                } else {
                    " "
                };
                let right = if disc(x + 1, y) && disc(x, y) {
                    "-"
                } else if exists(x + 1, y) {
                    "#r-#n"
                } else {
                    " "
                };
                let cell = if px == x && py == y {
                    "#CP#n"
                } else if !disc(x, y) {
                    "#rO#n"
                } else {
                    "#gO#n"
                };
                map.push_str(left);
                map.push_str(cell);
                map.push_str(right);
            } else {
                map.push_str("   ");
            }
        }
        map.push_str("\n\r");
        for x in px - size..=px + size {
            if disc(x, y) && disc(x, y - 1) {
                map.push_str(" | ");
            } else if exists(x, y) && exists(x, y - 1) {
                map.push_str(" #r|#n ");
            } else {
                map.push_str("   ");
            }
        }
        map.push_str("\n\r");
    }
    map
}

/// The overhead map: a wider sweep of discovered rooms. Admins see the
/// whole grid in range, discovered or not.
pub fn map(realm: &Arc<Realm>, session: &Arc<Session>, _rest: &str) {
    let size = 6;
    let world = realm.world.read();
    let player = session.player.lock();
    let (px, py) = (player.at.x, player.at.y);
    let disc = |x: i32, y: i32| player.has_discovered(x, y);
    let exists = |x: i32, y: i32| world.room_exists(Coordinate::new(x, y));

    let mut map = String::new();
    for y in ((py - size + 1)..=(py + size)).rev() {
        let mut line = String::new();
        for x in px - size..px + size {
            if disc(x, y) || (session.admin && exists(x, y)) {
                let left = if disc(x - 1, y) && disc(x, y) { "-" } else { "#y*#n" };
                let right = if disc(x + 1, y) && disc(x, y) { "-" } else { "#y*#n" };
                let cell = if px == x && py == y { "#CP#n" } else { " " };
                if exists(x, y) {
                    line.push_str(&format!("{left}#r[{cell}#r]#n{right}"));
                } else {
                    line.push_str("#y*****#n");
                }
            } else {
                line.push_str("#y*****#n");
            }
        }
        if line.contains('[') {
            map.push_str(&line);
            map.push_str("\n\r");
        }

        let mut below = String::new();
        for x in px - size..px + size {
            if disc(x, y) && disc(x, y - 1) {
                below.push_str("#y* #n| #y*#n");
            } else {
                below.push_str("#y*****#n");
            }
        }
        map.push_str(&below);
        map.push_str("\n\r");
    }
    drop(player);

    let border = format!("#y{}#n\n\r", "*".repeat(60));
    session.send(format!("{border}{map}{border}"));
}

pub fn who(realm: &Arc<Realm>, session: &Arc<Session>, _rest: &str) {
    let header = format!(
        "#r{} Players #yonline in {}:#n\n\n\r",
        realm.registry.len(),
        realm.info.name
    );
    session.send(header + &realm.registry.who_status());
}

pub fn score(realm: &Arc<Realm>, session: &Arc<Session>, _rest: &str) {
    let name = session.name();
    let world = realm.world.read();
    let player = session.player.lock();
    let room_name = world
        .room(player.at)
        .map(|r| r.name.clone())
        .unwrap_or_else(|| "nowhere".to_string());
    let out = format!(
        "#yName:#n {name}\n\r\
         #rHealth:#n #C{}#n/#C{}#n\n\r\
         #gLocation:#n ({}, {})\n\r\
         #bIn Room:#n {room_name}\n\r",
        player.health, player.max_health, player.at.x, player.at.y
    );
    drop(player);
    session.send(out);
}

pub fn commands(_realm: &Arc<Realm>, session: &Arc<Session>, _rest: &str) {
    let mut out = String::from("Here is a command list:\n\r");
    let mut width = 0;
    for name in public_command_names() {
        out.push_str(&format!("{name:<12}"));
        width += 12;
        if width > 80 {
            width = 0;
            out.push_str("\n\r");
        }
    }

    if session.admin {
        out.push_str(
            "\n\r--------------------------- #g== | #yAdmin Commands#n #g| \
             ==#n ---------------------------\n\r",
        );
        width = 0;
        for name in admin_command_names() {
            out.push_str(&format!("{name:>12}"));
            width += 12;
            if width > 80 {
                width = 0;
                out.push_str("\n\r");
            }
        }
    }

    out.push_str("\n\r");
    session.send(out);
}

pub fn credits(_realm: &Arc<Realm>, session: &Arc<Session>, _rest: &str) {
    session.send(
        "EmberWorld is a small multi-user world in the spirit of the Aber, DIKU, \
         Circle, Rom, and GodWars MUD families of the '90s and early 2000s.\n\n\r\
         #RCredit goes to b'ger whose ASCII artwork was used for the equipment \
         model. The ASCII artwork was found at:\n\r\
         \t- http://www.chris.com/ascii/index.php?art=people/vikings\n\r",
    );
}
