//! The in-world character body attached to a session.

use crate::items::{Equipment, Inventory};
use crate::store::Profile;
use crate::world::{Coordinate, HOME};
use std::collections::HashSet;

/// Mutable character state. Lives behind the session's player lock; only
/// scheduler passes and broadcast helpers touch it.
pub struct Player {
    pub title: String,
    pub rank: String,
    pub short_description: String,
    pub long_description: String,
    pub level: u32,
    pub health: i32,
    pub max_health: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub at: Coordinate,
    pub discovered: HashSet<(i32, i32)>,
    pub inventory: Inventory,
    pub equipment: Equipment,
}

impl Player {
    /// Materialize a body from a stored sheet. Characters always enter the
    /// world at home, whatever room they saved in.
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            title: profile.title.clone(),
            rank: profile.rank.clone(),
            short_description: profile.short_description.clone(),
            long_description: profile.long_description.clone(),
            level: profile.level,
            health: profile.health,
            max_health: profile.max_health,
            mana: profile.mana,
            max_mana: profile.max_mana,
            at: HOME,
            discovered: profile.discovered.clone(),
            inventory: Inventory::new(),
            equipment: Equipment::new(),
        }
    }

    pub fn to_profile(&self, name: &str) -> Profile {
        Profile {
            name: name.to_string(),
            title: self.title.clone(),
            rank: self.rank.clone(),
            short_description: self.short_description.clone(),
            long_description: self.long_description.clone(),
            level: self.level,
            max_health: self.max_health,
            max_mana: self.max_mana,
            health: self.health,
            mana: self.mana,
            discovered: self.discovered.clone(),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn discover(&mut self, at: Coordinate) {
        self.discovered.insert((at.x, at.y));
    }

    pub fn has_discovered(&self, x: i32, y: i32) -> bool {
        self.discovered.contains(&(x, y))
    }

    /// The prompt line: name tinted by rank, health tinted by how close to
    /// death the body is.
    pub fn build_prompt(&self, name: &str, admin: bool) -> String {
        let hcolor = match self.health / 10 {
            10.. => "#C",
            8..=9 => "#g",
            4..=7 => "#y",
            _ => "#r",
        };
        let ncolor = if admin { "#g" } else { "#y" };
        format!(
            "\r\n<{ncolor}{name}#n: {hcolor}{}#n/#C{}#n> ",
            self.health, self.max_health
        )
    }
}
