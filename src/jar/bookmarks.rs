// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Bookmark storage

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::error::{Error, Result};

/// Named URL storage a browser can save to and navigate from.
///
/// Implementations are shared across tasks, so every method takes `&self`.
pub trait BookmarksJar: Send + Sync {
    /// Save `url` under `name`, failing with `DuplicateName` if taken
    fn save(&self, name: &str, url: &str) -> Result<()>;

    /// URL saved under `name`, `NotFound` if absent
    fn read(&self, name: &str) -> Result<String>;

    /// Remove `name`, returns whether it existed
    fn remove(&self, name: &str) -> bool;

    /// Whether `name` is saved
    fn has(&self, name: &str) -> bool;

    /// Snapshot of every bookmark
    fn all(&self) -> BTreeMap<String, String>;
}

/// Bookmarks held in memory for the lifetime of the jar
#[derive(Debug, Default)]
pub struct MemoryBookmarks {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryBookmarks {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookmarksJar for MemoryBookmarks {
    fn save(&self, name: &str, url: &str) -> Result<()> {
        insert_new(&mut self.entries.write(), name, url)
    }

    fn read(&self, name: &str) -> Result<String> {
        lookup(&self.entries.read(), name)
    }

    fn remove(&self, name: &str) -> bool {
        self.entries.write().remove(name).is_some()
    }

    fn has(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    fn all(&self) -> BTreeMap<String, String> {
        self.entries.read().clone()
    }
}

/// Bookmarks persisted as a JSON object of name to URL.
///
/// The file is rewritten after every mutation.
#[derive(Debug)]
pub struct FileBookmarks {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileBookmarks {
    /// Load bookmarks from `path`, creating the file if it does not exist
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        let jar = Self {
            path,
            entries: RwLock::new(entries),
        };
        jar.persist(&jar.entries.read())?;

        tracing::debug!(path = %jar.path.display(), "Opened bookmarks file");
        Ok(jar)
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl BookmarksJar for FileBookmarks {
    fn save(&self, name: &str, url: &str) -> Result<()> {
        let mut entries = self.entries.write();
        insert_new(&mut entries, name, url)?;
        if let Err(e) = self.persist(&entries) {
            entries.remove(name);
            return Err(e);
        }
        Ok(())
    }

    fn read(&self, name: &str) -> Result<String> {
        lookup(&self.entries.read(), name)
    }

    fn remove(&self, name: &str) -> bool {
        let mut entries = self.entries.write();
        if entries.remove(name).is_none() {
            return false;
        }
        if let Err(e) = self.persist(&entries) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to persist bookmark removal"
            );
        }
        true
    }

    fn has(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    fn all(&self) -> BTreeMap<String, String> {
        self.entries.read().clone()
    }
}

fn insert_new(entries: &mut BTreeMap<String, String>, name: &str, url: &str) -> Result<()> {
    if entries.contains_key(name) {
        return Err(Error::DuplicateName(name.to_string()));
    }
    entries.insert(name.to_string(), url.to_string());
    Ok(())
}

fn lookup(entries: &BTreeMap<String, String>, name: &str) -> Result<String> {
    entries
        .get(name)
        .cloned()
        .ok_or_else(|| Error::not_found("Bookmark", name))
}
