//! EntryStore — flat-file entry storage
//!
//! One markdown file per entry inside a single directory. Titles are unique
//! under case-insensitive comparison; an in-memory index maps the lowercased
//! title to the canonical (case-preserving) title stored on disk.

use super::{file_ops, search};
use chrono::{DateTime, Utc};
use parking_lot::{RwLock, RwLockWriteGuard};
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Entry \"{0}\" already exists")]
    AlreadyExists(String),
    #[error("Invalid entry title: {0:?}")]
    InvalidTitle(String),
    #[error("Entry store I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type EntryResult<T> = Result<T, EntryError>;

/// A stored entry, carrying its canonical title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub content: String,
}

/// File-level facts about an entry, for the JSON API
#[derive(Debug, Clone, Serialize)]
pub struct EntrySummary {
    pub title: String,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

type TitleIndex = HashMap<String, String>;

pub struct EntryStore {
    entries_dir: PathBuf,
    index: RwLock<TitleIndex>,
}

impl EntryStore {
    /// Open the store over `entries_dir`, creating the directory and building the index
    pub fn new(entries_dir: PathBuf) -> EntryResult<Self> {
        std::fs::create_dir_all(&entries_dir)?;

        let store = Self {
            entries_dir,
            index: RwLock::new(HashMap::new()),
        };
        store.reindex()?;

        Ok(store)
    }

    pub fn entries_dir(&self) -> &Path {
        &self.entries_dir
    }

    /// Rebuild the title index from the directory contents
    pub fn reindex(&self) -> EntryResult<usize> {
        self.refresh()?;
        let count = self.index.read().len();
        log::info!("[ENTRIES] Indexed {} entry files in {:?}", count, self.entries_dir);
        Ok(count)
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    /// All entry titles, sorted
    pub fn list_entries(&self) -> EntryResult<Vec<String>> {
        self.refresh()
    }

    /// All entries with size and modification time
    pub fn list_summaries(&self) -> EntryResult<Vec<EntrySummary>> {
        let mut summaries = Vec::new();
        for title in self.list_entries()? {
            let path = file_ops::entry_path(&self.entries_dir, &title);
            let metadata = match std::fs::metadata(&path) {
                Ok(m) => m,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            summaries.push(EntrySummary {
                title,
                size: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }
        Ok(summaries)
    }

    /// Canonical title for a case-insensitive lookup.
    /// Rescans the directory once on a miss so hand-added files are found.
    pub fn canonical_title(&self, title: &str) -> EntryResult<Option<String>> {
        let key = file_ops::title_key(title);

        let cached = self.index.read().get(&key).cloned();
        if cached.is_some() {
            return Ok(cached);
        }

        self.refresh()?;
        Ok(self.index.read().get(&key).cloned())
    }

    /// Look up an entry case-insensitively. Absence is `Ok(None)`.
    pub fn get_entry(&self, title: &str) -> EntryResult<Option<Entry>> {
        let Some(canonical) = self.canonical_title(title)? else {
            log::debug!("[ENTRIES] No entry for {:?}", title);
            return Ok(None);
        };

        let path = file_ops::entry_path(&self.entries_dir, &canonical);
        match file_ops::read_entry(&path)? {
            Some(content) => Ok(Some(Entry {
                title: canonical,
                content,
            })),
            None => {
                // Removed from disk behind our back
                self.index.write().remove(&file_ops::title_key(&canonical));
                Ok(None)
            }
        }
    }

    /// Write or overwrite an entry without an existence check.
    /// A case-insensitive match overwrites the existing file under its canonical title.
    pub fn save_entry(&self, title: &str, content: &str) -> EntryResult<String> {
        if !file_ops::is_valid_title(title) {
            return Err(EntryError::InvalidTitle(title.to_string()));
        }

        let key = file_ops::title_key(title);
        let mut index = self.lock_fresh()?;
        let canonical = index.get(&key).cloned().unwrap_or_else(|| title.to_string());

        file_ops::write_entry(&file_ops::entry_path(&self.entries_dir, &canonical), content)?;
        index.insert(key, canonical.clone());

        log::info!("[ENTRIES] Saved entry {:?} ({} bytes)", canonical, content.len());
        Ok(canonical)
    }

    /// Create a new entry. The duplicate check and the write happen under one lock.
    pub fn create_entry(&self, title: &str, content: &str) -> EntryResult<String> {
        if !file_ops::is_valid_title(title) {
            return Err(EntryError::InvalidTitle(title.to_string()));
        }

        let key = file_ops::title_key(title);
        let mut index = self.lock_fresh()?;
        if let Some(existing) = index.get(&key) {
            return Err(EntryError::AlreadyExists(existing.clone()));
        }

        file_ops::write_entry(&file_ops::entry_path(&self.entries_dir, title), content)?;
        index.insert(key, title.to_string());

        log::info!("[ENTRIES] Created entry {:?}", title);
        Ok(title.to_string())
    }

    /// Uniformly chosen entry title, or None when the store is empty
    pub fn random_entry<R: Rng + ?Sized>(&self, rng: &mut R) -> EntryResult<Option<String>> {
        let titles = self.list_entries()?;
        Ok(search::pick_random(&titles, rng).cloned())
    }

    /// Scan the directory, rebuild the index, return the sorted titles
    fn refresh(&self) -> EntryResult<Vec<String>> {
        let titles = self.scan()?;
        rebuild_index(&mut self.index.write(), &titles);
        Ok(titles)
    }

    /// Write-lock the index after bringing it up to date with the directory
    fn lock_fresh(&self) -> EntryResult<RwLockWriteGuard<'_, TitleIndex>> {
        let mut index = self.index.write();
        let titles = self.scan()?;
        rebuild_index(&mut index, &titles);
        Ok(index)
    }

    fn scan(&self) -> EntryResult<Vec<String>> {
        let mut titles: Vec<String> = file_ops::list_entry_files(&self.entries_dir)?
            .iter()
            .filter_map(|path| file_ops::title_from_path(path))
            .collect();
        titles.sort();
        Ok(titles)
    }
}

fn rebuild_index(index: &mut TitleIndex, titles: &[String]) {
    index.clear();
    for title in titles {
        let key = file_ops::title_key(title);
        if let Some(existing) = index.get(&key) {
            log::warn!("[ENTRIES] Ignoring {:?}, it differs from {:?} only by case", title, existing);
            continue;
        }
        index.insert(key, title.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;
    use tempfile::tempdir;

    fn store_with(entries: &[(&str, &str)]) -> (tempfile::TempDir, EntryStore) {
        let dir = tempdir().unwrap();
        let entries_dir = dir.path().join("entries");
        std::fs::create_dir_all(&entries_dir).unwrap();
        for (title, content) in entries {
            std::fs::write(entries_dir.join(format!("{}.md", title)), content).unwrap();
        }
        let store = EntryStore::new(entries_dir).expect("Failed to create store");
        (dir, store)
    }

    #[test]
    fn test_new_creates_directory() {
        let dir = tempdir().unwrap();
        let entries_dir = dir.path().join("does/not/exist");
        let store = EntryStore::new(entries_dir.clone()).unwrap();
        assert!(entries_dir.is_dir());
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_entries_sorted() {
        let (_dir, store) = store_with(&[("Python", "p"), ("CSS", "c"), ("Django", "d")]);
        assert_eq!(store.list_entries().unwrap(), vec!["CSS", "Django", "Python"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_get_entry_absent() {
        let (_dir, store) = store_with(&[("Python", "p")]);
        assert!(store.get_entry("Rust").unwrap().is_none());
        assert!(store.get_entry("").unwrap().is_none());
        assert!(store.get_entry("../Python").unwrap().is_none());
    }

    #[test]
    fn test_get_entry_case_insensitive() {
        let (_dir, store) = store_with(&[("Python", "# Python")]);
        let entry = store.get_entry("pYTHON").unwrap().unwrap();
        assert_eq!(entry.title, "Python");
        assert_eq!(entry.content, "# Python");
    }

    #[test]
    fn test_save_then_get() {
        let (_dir, store) = store_with(&[]);
        store.save_entry("Rust", "# Rust\n\nFast.").unwrap();
        let entry = store.get_entry("Rust").unwrap().unwrap();
        assert_eq!(entry.content, "# Rust\n\nFast.");

        store.save_entry("Rust", "Overwritten").unwrap();
        assert_eq!(store.get_entry("Rust").unwrap().unwrap().content, "Overwritten");
    }

    #[test]
    fn test_save_keeps_canonical_title() {
        let (dir, store) = store_with(&[("Python", "old")]);
        let canonical = store.save_entry("python", "new").unwrap();
        assert_eq!(canonical, "Python");
        assert_eq!(store.list_entries().unwrap(), vec!["Python"]);
        let on_disk = std::fs::read_to_string(dir.path().join("entries/Python.md")).unwrap();
        assert_eq!(on_disk, "new");
    }

    #[test]
    fn test_save_rejects_path_titles() {
        let (_dir, store) = store_with(&[]);
        let result = store.save_entry("../escape", "x");
        assert!(matches!(result, Err(EntryError::InvalidTitle(_))));
    }

    #[test]
    fn test_create_duplicate_prevention() {
        let (_dir, store) = store_with(&[("Python", "original")]);

        let result = store.create_entry("python", "replacement");
        match result {
            Err(EntryError::AlreadyExists(existing)) => assert_eq!(existing, "Python"),
            other => panic!("expected AlreadyExists, got {:?}", other),
        }
        assert_eq!(store.get_entry("Python").unwrap().unwrap().content, "original");
    }

    #[test]
    fn test_create_new_entry() {
        let (_dir, store) = store_with(&[]);
        assert_eq!(store.create_entry("Git", "# Git").unwrap(), "Git");
        assert_eq!(store.canonical_title("GIT").unwrap(), Some("Git".to_string()));
    }

    #[test]
    fn test_hand_added_file_is_found() {
        let (dir, store) = store_with(&[]);
        std::fs::write(dir.path().join("entries/HTML.md"), "# HTML").unwrap();
        assert_eq!(store.canonical_title("html").unwrap(), Some("HTML".to_string()));
    }

    #[test]
    fn test_removed_file_is_absent() {
        let (dir, store) = store_with(&[("Git", "g")]);
        std::fs::remove_file(dir.path().join("entries/Git.md")).unwrap();
        assert!(store.get_entry("Git").unwrap().is_none());
    }

    #[test]
    fn test_list_summaries() {
        let (_dir, store) = store_with(&[("Git", "12345")]);
        let summaries = store.list_summaries().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].title, "Git");
        assert_eq!(summaries[0].size, 5);
        assert!(summaries[0].modified.is_some());
    }

    #[test]
    fn test_random_entry_empty_store() {
        let (_dir, store) = store_with(&[]);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(store.random_entry(&mut rng).unwrap().is_none());
    }

    #[test]
    fn test_random_entry_visits_all() {
        let titles = ["CSS", "Django", "Git", "HTML", "Python"];
        let (_dir, store) = store_with(&titles.map(|t| (t, "body")));
        let mut rng = StdRng::seed_from_u64(42);

        let mut seen = HashSet::new();
        for _ in 0..500 {
            let picked = store.random_entry(&mut rng).unwrap().unwrap();
            assert!(titles.contains(&picked.as_str()));
            seen.insert(picked);
        }
        assert_eq!(seen.len(), titles.len());
    }
}
