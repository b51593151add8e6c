//! Flat-file persistence for player profiles and credentials.
//!
//! Layout under the data directory:
//!
//! ```text
//! data/
//!   profiles/<name>          line-oriented character sheet
//!   profiles/<name>.rooms    discovered coordinates, "-1" terminated
//!   credentials/<name>       the account secret
//! ```
//!
//! File names are the lowercased character name. Writes go through a temp
//! file and rename so a crash mid-save never truncates an existing profile.

use crate::error::StoreError;
use crate::world::{Coordinate, HOME};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A persisted character sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub rank: String,
    pub short_description: String,
    pub long_description: String,
    pub level: u32,
    pub max_health: i32,
    pub max_mana: i32,
    pub health: i32,
    pub mana: i32,
    pub discovered: HashSet<(i32, i32)>,
}

impl Profile {
    /// Starting sheet for a freshly created character.
    pub fn fresh(name: &str) -> Self {
        let mut discovered = HashSet::new();
        discovered.insert((HOME.x, HOME.y));
        Self {
            name: name.to_string(),
            title: "the Newcomer".to_string(),
            rank: "Citizen".to_string(),
            short_description: "An unremarkable traveler.".to_string(),
            long_description: "They look like they just arrived.".to_string(),
            level: 1,
            max_health: 100,
            max_mana: 100,
            health: 100,
            mana: 100,
            discovered,
        }
    }
}

/// Handle to the on-disk store. Cheap to share behind an `Arc`.
pub struct ProfileStore {
    profiles: PathBuf,
    credentials: PathBuf,
}

impl ProfileStore {
    /// Open (and create, if missing) the store under `root`.
    pub fn open(root: &Path) -> Result<Self, StoreError> {
        let profiles = root.join("profiles");
        let credentials = root.join("credentials");
        fs::create_dir_all(&profiles)?;
        fs::create_dir_all(&credentials)?;
        Ok(Self {
            profiles,
            credentials,
        })
    }

    fn profile_path(&self, name: &str) -> PathBuf {
        self.profiles.join(name.to_lowercase())
    }

    fn rooms_path(&self, name: &str) -> PathBuf {
        self.profiles.join(format!("{}.rooms", name.to_lowercase()))
    }

    fn credential_path(&self, name: &str) -> PathBuf {
        self.credentials.join(name.to_lowercase())
    }

    /// Whether a character of this name has ever been saved.
    pub fn profile_exists(&self, name: &str) -> bool {
        self.profile_path(name).is_file()
    }

    /// Record the secret for a new character.
    pub fn create_credential(&self, name: &str, secret: &str) -> Result<(), StoreError> {
        write_atomic(&self.credential_path(name), secret)?;
        Ok(())
    }

    /// Carry a character's secret over to a new name, for renames. The old
    /// credential is left behind so the old profile stays loadable.
    pub fn clone_credential(&self, from: &str, to: &str) -> Result<(), StoreError> {
        match fs::copy(self.credential_path(from), self.credential_path(to)) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::MissingCredential(from.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Compare a typed secret against the stored one.
    pub fn verify_credential(&self, name: &str, secret: &str) -> Result<bool, StoreError> {
        let path = self.credential_path(name);
        let stored = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::MissingCredential(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(stored.trim_end_matches(['\n', '\r']) == secret)
    }

    pub fn load_profile(&self, name: &str) -> Result<Profile, StoreError> {
        let path = self.profile_path(name);
        let content = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::MissingProfile(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        // The sheet mixes u32 and i32 fields, so the parser is generic.
        fn parse_num<T: std::str::FromStr>(
            name: &str,
            field: &str,
            value: &str,
        ) -> Result<T, StoreError> {
            value.trim().parse().map_err(|_| StoreError::Malformed {
                name: name.to_string(),
                detail: format!("bad number in field: {field}"),
            })
        }

        let mut lines = content.lines();
        let mut next = |field: &str| {
            lines.next().map(str::to_string).ok_or_else(|| StoreError::Malformed {
                name: name.to_string(),
                detail: format!("missing field: {field}"),
            })
        };

        let profile_name = next("name")?;
        let title = next("title")?;
        let rank = next("rank")?;
        let short_description = next("short description")?;
        let long_description = next("long description")?;
        let level = parse_num(name, "level", &next("level")?)?;
        let max_health = parse_num(name, "max health", &next("max health")?)?;
        let max_mana = parse_num(name, "max mana", &next("max mana")?)?;
        let health = parse_num(name, "health", &next("health")?)?;
        let mana = parse_num(name, "mana", &next("mana")?)?;

        let discovered = self.load_discovered(name)?;

        Ok(Profile {
            name: profile_name,
            title,
            rank,
            short_description,
            long_description,
            level,
            max_health,
            max_mana,
            health,
            mana,
            discovered,
        })
    }

    fn load_discovered(&self, name: &str) -> Result<HashSet<(i32, i32)>, StoreError> {
        let path = self.rooms_path(name);
        let content = match fs::read_to_string(&path) {
            Ok(s) => s,
            // A missing rooms file just means the home room
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let mut set = HashSet::new();
                set.insert((HOME.x, HOME.y));
                return Ok(set);
            }
            Err(e) => return Err(e.into()),
        };

        let mut set = HashSet::new();
        let mut nums = content.split_whitespace().map(|t| {
            t.parse::<i32>().map_err(|_| StoreError::Malformed {
                name: name.to_string(),
                detail: format!("bad coordinate token: {t}"),
            })
        });
        loop {
            let x = match nums.next() {
                Some(x) => x?,
                None => break,
            };
            if x == -1 {
                break;
            }
            let y = nums.next().transpose()?.ok_or_else(|| StoreError::Malformed {
                name: name.to_string(),
                detail: "dangling x coordinate".to_string(),
            })?;
            set.insert((x, y));
        }
        if set.is_empty() {
            set.insert((HOME.x, HOME.y));
        }
        Ok(set)
    }

    pub fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut sheet = String::new();
        sheet.push_str(&profile.name);
        sheet.push('\n');
        sheet.push_str(&profile.title);
        sheet.push('\n');
        sheet.push_str(&profile.rank);
        sheet.push('\n');
        sheet.push_str(&profile.short_description);
        sheet.push('\n');
        sheet.push_str(&profile.long_description);
        sheet.push('\n');
        sheet.push_str(&format!(
            "{}\n{}\n{}\n{}\n{}\n",
            profile.level, profile.max_health, profile.max_mana, profile.health, profile.mana
        ));
        // Trailing metadata; the loader reads positionally and ignores it
        sheet.push_str(&format!("saved {}\n", chrono::Utc::now().to_rfc3339()));
        write_atomic(&self.profile_path(&profile.name), &sheet)?;

        let mut rooms = String::new();
        for (x, y) in &profile.discovered {
            rooms.push_str(&format!("{x} {y} "));
        }
        if profile.discovered.is_empty() {
            rooms.push_str(&format!("{} {} ", HOME.x, HOME.y));
        }
        rooms.push_str("-1\n");
        write_atomic(&self.rooms_path(&profile.name), &rooms)?;

        debug!(name = %profile.name, rooms = profile.discovered.len(), "Profile saved");
        Ok(())
    }
}

fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ProfileStore) {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let (_dir, store) = store();
        let mut profile = Profile::fresh("Alice");
        profile.title = "the Wanderer".to_string();
        profile.health = 73;
        profile.discovered.insert((101, 100));
        store.save_profile(&profile).unwrap();

        let loaded = store.load_profile("alice").unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_profile_exists_is_case_insensitive() {
        let (_dir, store) = store();
        assert!(!store.profile_exists("Bob"));
        store.save_profile(&Profile::fresh("Bob")).unwrap();
        assert!(store.profile_exists("bob"));
        assert!(store.profile_exists("BOB"));
    }

    #[test]
    fn test_credentials() {
        let (_dir, store) = store();
        store.create_credential("Alice", "sesame").unwrap();
        assert!(store.verify_credential("alice", "sesame").unwrap());
        assert!(!store.verify_credential("alice", "Sesame").unwrap());
        assert!(matches!(
            store.verify_credential("bob", "x"),
            Err(StoreError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_signed_and_unsigned_fields_both_load() {
        let (_dir, store) = store();
        let mut profile = Profile::fresh("Dana");
        profile.level = 7;
        profile.health = -5;
        store.save_profile(&profile).unwrap();

        let loaded = store.load_profile("dana").unwrap();
        assert_eq!(loaded.level, 7);
        assert_eq!(loaded.health, -5);
    }

    #[test]
    fn test_clone_credential_follows_rename() {
        let (_dir, store) = store();
        store.create_credential("Alice", "sesame").unwrap();
        store.clone_credential("Alice", "Alicia").unwrap();
        assert!(store.verify_credential("alicia", "sesame").unwrap());
        assert!(matches!(
            store.clone_credential("Ghost", "Wisp"),
            Err(StoreError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_missing_profile() {
        let (_dir, store) = store();
        assert!(matches!(
            store.load_profile("ghost"),
            Err(StoreError::MissingProfile(_))
        ));
    }

    #[test]
    fn test_malformed_profile() {
        let (_dir, store) = store();
        std::fs::write(store.profile_path("Eve"), "Eve\nthe Short\n").unwrap();
        assert!(matches!(
            store.load_profile("Eve"),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn test_empty_rooms_file_falls_back_to_home() {
        let (_dir, store) = store();
        store.save_profile(&Profile::fresh("Cara")).unwrap();
        std::fs::write(store.rooms_path("Cara"), "-1\n").unwrap();
        let loaded = store.load_profile("cara").unwrap();
        assert!(loaded.discovered.contains(&(HOME.x, HOME.y)));
    }
}
