// crates/countrydb-core/src/favorites.rs

//! Favorite countries, per user or anonymous.
//!
//! The store is a keyed collaborator: the anonymous list lives under
//! `"favorites"`, a signed-in user's under `"favorites:{user_id}"`. Lists are
//! ordered sets of country codes (insertion order, no duplicates).

use crate::error::Result;
use log::debug;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Storage key for a user scope.
pub fn scope_key(user: Option<&str>) -> String {
    match user {
        Some(id) if !id.is_empty() => format!("favorites:{id}"),
        _ => "favorites".to_string(),
    }
}

/// Read/add/remove contract over a user-scoped ordered set of country codes.
pub trait FavoritesStore: Send + Sync {
    fn list(&self, user: Option<&str>) -> Result<Vec<String>>;

    /// Runs `edit` on the scope's list as one read-modify-write. The list is
    /// written back only when `edit` returns `true`; the return value is
    /// whatever `edit` returned.
    fn update(
        &self,
        user: Option<&str>,
        edit: &mut dyn FnMut(&mut Vec<String>) -> bool,
    ) -> Result<bool>;

    /// Stores `codes` as the complete list for the scope.
    fn save(&self, user: Option<&str>, codes: &[String]) -> Result<()> {
        self.update(user, &mut |list| {
            *list = codes.to_vec();
            true
        })
        .map(|_| ())
    }

    fn contains(&self, user: Option<&str>, code: &str) -> Result<bool> {
        Ok(self.list(user)?.iter().any(|c| c == code))
    }

    /// Appends `code` unless already present. Returns whether it was added.
    fn add(&self, user: Option<&str>, code: &str) -> Result<bool> {
        self.update(user, &mut |codes| {
            if codes.iter().any(|c| c == code) {
                return false;
            }
            codes.push(code.to_string());
            true
        })
    }

    /// Removes `code`. Returns whether it was present.
    fn remove(&self, user: Option<&str>, code: &str) -> Result<bool> {
        self.update(user, &mut |codes| {
            let before = codes.len();
            codes.retain(|c| c != code);
            codes.len() != before
        })
    }

    /// Adds or removes; returns the new membership.
    fn toggle(&self, user: Option<&str>, code: &str) -> Result<bool> {
        let mut member = false;
        self.update(user, &mut |codes| {
            match codes.iter().position(|c| c == code) {
                Some(i) => {
                    codes.remove(i);
                    member = false;
                }
                None => {
                    codes.push(code.to_string());
                    member = true;
                }
            }
            true
        })?;
        Ok(member)
    }
}

type Lists = BTreeMap<String, Vec<String>>;

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryFavorites {
    lists: Mutex<Lists>,
}

impl MemoryFavorites {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Lists> {
        self.lists.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl FavoritesStore for MemoryFavorites {
    fn list(&self, user: Option<&str>) -> Result<Vec<String>> {
        Ok(self.lock().get(&scope_key(user)).cloned().unwrap_or_default())
    }

    fn update(
        &self,
        user: Option<&str>,
        edit: &mut dyn FnMut(&mut Vec<String>) -> bool,
    ) -> Result<bool> {
        let mut lists = self.lock();
        let key = scope_key(user);
        let mut codes = lists.get(&key).cloned().unwrap_or_default();
        let changed = edit(&mut codes);
        if changed {
            lists.insert(key, codes);
        }
        Ok(changed)
    }
}

/// All scopes in one JSON object on disk: `{"favorites": ["FRA"], ...}`.
///
/// A missing file reads as empty. Writes go through a temporary file and a
/// rename so a crash cannot leave half a document behind.
#[derive(Debug)]
pub struct FileFavorites {
    path: PathBuf,
    // Held across read, edit and write. Other processes are not excluded.
    guard: Mutex<()>,
}

impl FileFavorites {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Lists> {
        match File::open(&self.path) {
            Ok(file) => Ok(serde_json::from_reader(BufReader::new(file))?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Lists::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, lists: &Lists) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, lists)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;
        debug!("favorites written to {}", self.path.display());
        Ok(())
    }
}

impl FavoritesStore for FileFavorites {
    fn list(&self, user: Option<&str>) -> Result<Vec<String>> {
        let _guard = self.guard.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.read_all()?.remove(&scope_key(user)).unwrap_or_default())
    }

    fn update(
        &self,
        user: Option<&str>,
        edit: &mut dyn FnMut(&mut Vec<String>) -> bool,
    ) -> Result<bool> {
        let _guard = self.guard.lock().unwrap_or_else(|e| e.into_inner());
        let mut lists = self.read_all()?;
        let key = scope_key(user);
        let mut codes = lists.remove(&key).unwrap_or_default();
        if !edit(&mut codes) {
            return Ok(false);
        }
        lists.insert(key, codes);
        self.write_all(&lists)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn FavoritesStore) {
        assert!(store.list(None).unwrap().is_empty());
        assert!(store.add(None, "FRA").unwrap());
        assert!(store.add(None, "JPN").unwrap());
        assert!(!store.add(None, "FRA").unwrap());
        assert_eq!(store.list(None).unwrap(), vec!["FRA", "JPN"]);

        // scopes are independent
        assert!(store.add(Some("u1"), "DEU").unwrap());
        assert!(!store.contains(None, "DEU").unwrap());
        assert!(store.contains(Some("u1"), "DEU").unwrap());

        assert!(store.remove(None, "FRA").unwrap());
        assert!(!store.remove(None, "FRA").unwrap());
        assert_eq!(store.list(None).unwrap(), vec!["JPN"]);

        assert!(store.toggle(None, "ESP").unwrap());
        assert!(!store.toggle(None, "ESP").unwrap());
        assert_eq!(store.list(None).unwrap(), vec!["JPN"]);
    }

    #[test]
    fn scope_keys() {
        assert_eq!(scope_key(None), "favorites");
        assert_eq!(scope_key(Some("")), "favorites");
        assert_eq!(scope_key(Some("abc")), "favorites:abc");
    }

    #[test]
    fn memory_store() {
        exercise(&MemoryFavorites::new());
    }

    #[test]
    fn file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("favorites.json");
        exercise(&FileFavorites::new(&path));

        let reopened = FileFavorites::new(&path);
        assert_eq!(reopened.list(None).unwrap(), vec!["JPN"]);
        assert_eq!(reopened.list(Some("u1")).unwrap(), vec!["DEU"]);
    }

    fn add_from_threads(store: &dyn FavoritesStore) {
        std::thread::scope(|s| {
            for i in 0..8 {
                s.spawn(move || store.add(None, &format!("C{i:02}")).unwrap());
            }
        });
        let mut codes = store.list(None).unwrap();
        codes.sort();
        let expected: Vec<String> = (0..8).map(|i| format!("C{i:02}")).collect();
        assert_eq!(codes, expected);
    }

    #[test]
    fn concurrent_adds_are_all_kept() {
        for _ in 0..10 {
            add_from_threads(&MemoryFavorites::new());

            let dir = tempfile::tempdir().unwrap();
            add_from_threads(&FileFavorites::new(dir.path().join("favorites.json")));
        }
    }

    #[test]
    fn save_replaces_the_scope() {
        let store = MemoryFavorites::new();
        store.add(None, "FRA").unwrap();
        store.add(Some("u1"), "DEU").unwrap();
        store.save(None, &["JPN".to_string(), "ESP".to_string()]).unwrap();
        assert_eq!(store.list(None).unwrap(), vec!["JPN", "ESP"]);
        assert_eq!(store.list(Some("u1")).unwrap(), vec!["DEU"]);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        fs::write(&path, "not json").unwrap();
        assert!(FileFavorites::new(&path).list(None).is_err());
    }
}
