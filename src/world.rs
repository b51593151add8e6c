//! World topology: the room grid, exits, and procedural build.
//!
//! Rooms live on a fixed square grid. The home location sits at the center
//! and the rest of the map is carved by a random walk at startup. All world
//! access happens through [`World`]; callers hold the realm's world lock.

use crate::items::Item;
use rand::Rng;
use std::collections::HashMap;

/// Grid bound in each axis; coordinates are `0..MAX_ROOMS`.
pub const MAX_ROOMS: i32 = 200;

/// Every character starts (and recalls to) this coordinate.
pub const HOME: Coordinate = Coordinate { x: 100, y: 100 };

/// A grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn in_bounds(self) -> bool {
        self.x >= 0 && self.x < MAX_ROOMS && self.y >= 0 && self.y < MAX_ROOMS
    }

    pub fn step(self, dir: Direction) -> Self {
        match dir {
            Direction::North => Self::new(self.x, self.y + 1),
            Direction::East => Self::new(self.x + 1, self.y),
            Direction::South => Self::new(self.x, self.y - 1),
            Direction::West => Self::new(self.x - 1, self.y),
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A cardinal direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Capitalized name for movement messages ("You can't go East!").
    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::East => "East",
            Direction::South => "South",
            Direction::West => "West",
        }
    }
}

/// One room on the grid.
#[derive(Debug, Clone)]
pub struct Room {
    pub name: String,
    pub description: String,
    pub items: Vec<Item>,
}

impl Room {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            items: Vec::new(),
        }
    }

    /// Find a floor item whose keyword matches, case-insensitively.
    pub fn find_item(&self, keyword: &str) -> Option<&Item> {
        let keyword = keyword.to_lowercase();
        self.items
            .iter()
            .find(|i| i.keyword.to_lowercase().starts_with(&keyword))
    }

    pub fn take_item(&mut self, id: u32) -> Option<Item> {
        let idx = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(idx))
    }

    /// Markup listing of the floor contents.
    pub fn inventory_line(&self) -> String {
        if self.items.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        for item in &self.items {
            out.push_str(&format!("#c{}#n is lying here.\n", item.name));
        }
        out
    }
}

// Name/description fragments the builder draws from.
const ROOM_NAMES: &[&str] = &[
    "A Dusty Crossroads",
    "The Old Market Square",
    "A Narrow Alley",
    "The Ember Commons",
    "A Crumbling Courtyard",
    "The Lantern Walk",
    "A Quiet Garden",
    "The Abandoned Forge",
    "A Winding Path",
    "The Moss-Grown Steps",
    "A Shadowed Arcade",
    "The Fountain Plaza",
];

const ROOM_DESCRIPTIONS: &[&str] = &[
    "Dust motes drift through shafts of pale light.",
    "Faded banners flap weakly overhead.",
    "The cobblestones here are worn smooth by countless feet.",
    "A faint smell of woodsmoke hangs in the air.",
    "Ivy has claimed most of the nearby stonework.",
    "Somewhere out of sight, water drips steadily.",
    "The ground is littered with old leaves and older secrets.",
    "A cold draft slips past, headed somewhere in a hurry.",
];

/// The room grid.
pub struct World {
    rooms: HashMap<Coordinate, Room>,
}

impl World {
    /// Create a world containing only the home room.
    pub fn new() -> Self {
        let mut rooms = HashMap::new();
        rooms.insert(
            HOME,
            Room::new(
                "The Heart of the World",
                "A warm hearth burns at the center of everything. \
                 New arrivals flicker into being here.",
            ),
        );
        Self { rooms }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn room_exists(&self, at: Coordinate) -> bool {
        at.in_bounds() && self.rooms.contains_key(&at)
    }

    pub fn room(&self, at: Coordinate) -> Option<&Room> {
        self.rooms.get(&at)
    }

    pub fn room_mut(&mut self, at: Coordinate) -> Option<&mut Room> {
        self.rooms.get_mut(&at)
    }

    /// Markup line naming the open exits from `at`.
    pub fn exits_line(&self, at: Coordinate) -> String {
        let mut names = Vec::new();
        for dir in Direction::ALL {
            if self.room_exists(at.step(dir)) {
                names.push(dir.name());
            }
        }
        if names.is_empty() {
            "[#cExits: none#n]\n".to_string()
        } else {
            format!("[#cExits: {}#n]\n", names.join(" "))
        }
    }

    /// Carve `count` additional rooms with a random walk from home.
    pub fn build(&mut self, count: usize, rng: &mut impl Rng) {
        let mut at = HOME;
        let mut carved = 0;
        // The walk revisits rooms freely; only new cells count.
        while carved < count {
            let dir = Direction::ALL[rng.gen_range(0..4)];
            let next = at.step(dir);
            if !next.in_bounds() {
                continue;
            }
            at = next;
            if !self.rooms.contains_key(&at) {
                let name = ROOM_NAMES[rng.gen_range(0..ROOM_NAMES.len())];
                let desc = ROOM_DESCRIPTIONS[rng.gen_range(0..ROOM_DESCRIPTIONS.len())];
                self.rooms.insert(at, Room::new(name, desc));
                carved += 1;
            }
        }
    }

    /// Scatter `count` catalog items across random rooms.
    pub fn seed_items(&mut self, count: usize, rng: &mut impl Rng) {
        let coords: Vec<Coordinate> = self.rooms.keys().copied().collect();
        if coords.is_empty() {
            return;
        }
        for n in 0..count {
            let at = coords[rng.gen_range(0..coords.len())];
            let item = crate::items::catalog_item(n as u32, rng);
            if let Some(room) = self.rooms.get_mut(&at) {
                room.items.push(item);
            }
        }
    }

    /// Every placed item with its location, for the admin item list.
    pub fn all_items(&self) -> Vec<(Coordinate, &Item)> {
        let mut out: Vec<(Coordinate, &Item)> = self
            .rooms
            .iter()
            .flat_map(|(at, room)| room.items.iter().map(move |i| (*at, i)))
            .collect();
        out.sort_by_key(|(_, i)| i.id);
        out
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
