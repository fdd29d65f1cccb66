//! File-backed vector store.
//!
//! A collection is a JSON Lines file `<dir>/<collection>.jsonl`, one
//! [`Item`] per line. The whole collection is held in memory while the store
//! is open; changes reach disk on [`VectorStore::flush`] or
//! [`VectorStore::close`].

use crate::core::Item;
use crate::errors::{ClusterError, StoreError};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An open collection of embedded items.
///
/// Open it once, pass it by reference, and call [`close`](Self::close) when
/// done. Dropping a store with unsaved changes loses them and logs a
/// warning.
#[derive(Debug)]
pub struct VectorStore {
    dir: PathBuf,
    collection: String,
    items: Vec<Item>,
    ids: HashSet<String>,
    dirty: bool,
}

impl VectorStore {
    /// Open `collection` under `dir`, creating both if needed.
    ///
    /// # Errors
    ///
    /// [`StoreError::Corrupt`] if a stored line is not a valid item, and the
    /// same errors as [`add`](Self::add) if stored items are inconsistent.
    pub fn open(dir: &Path, collection: &str) -> Result<Self, StoreError> {
        fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        let mut store = Self {
            dir: dir.to_path_buf(),
            collection: collection.to_string(),
            items: Vec::new(),
            ids: HashSet::new(),
            dirty: false,
        };

        let path = store.path();
        if path.exists() {
            let stored = read_items(&path)?;
            store.add(stored)?;
            store.dirty = false;
        } else {
            File::create(&path).map_err(|e| StoreError::io(&path, e))?;
        }

        debug!(collection, items = store.count(), "Opened vector store");
        Ok(store)
    }

    /// Path of the collection file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.jsonl", self.collection))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Append items. Either every item is added or none is.
    ///
    /// # Errors
    ///
    /// - [`StoreError::DuplicateId`] if an id is already stored or repeats
    ///   within `items`
    /// - [`StoreError::Cluster`] if an embedding's length differs from the
    ///   collection's, or holds a non-finite value
    pub fn add(&mut self, items: Vec<Item>) -> Result<usize, StoreError> {
        let expected = self
            .dimensions()
            .or_else(|| items.first().map(|item| item.embedding.len()));

        let mut batch_ids = HashSet::new();
        for (offset, item) in items.iter().enumerate() {
            let index = self.items.len() + offset;
            if self.ids.contains(&item.id) || !batch_ids.insert(item.id.as_str()) {
                return Err(StoreError::DuplicateId(item.id.clone()));
            }
            if let Some(expected) = expected {
                if item.embedding.len() != expected {
                    return Err(ClusterError::DimensionMismatch {
                        index,
                        expected,
                        found: item.embedding.len(),
                    }
                    .into());
                }
            }
            if let Some(position) = item.embedding.iter().position(|v| !v.is_finite()) {
                return Err(ClusterError::NonFiniteEmbedding { index, position }.into());
            }
        }

        let added = items.len();
        for item in items {
            self.ids.insert(item.id.clone());
            self.items.push(item);
        }
        if added > 0 {
            self.dirty = true;
        }
        Ok(added)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Embedding length shared by every stored item.
    pub fn dimensions(&self) -> Option<usize> {
        self.items.first().map(|item| item.embedding.len())
    }

    /// Up to `limit` items from the start of the collection.
    pub fn peek(&self, limit: usize) -> &[Item] {
        &self.items[..limit.min(self.items.len())]
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.items.clear();
            self.ids.clear();
            self.dirty = true;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the collection to disk atomically (temp file, then rename).
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        let path = self.path();
        let tmp = path.with_extension("jsonl.tmp");
        write_items(&tmp, &self.items)?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::io(&path, e))?;
        self.dirty = false;
        debug!(collection = %self.collection, items = self.count(), "Flushed vector store");
        Ok(())
    }

    /// Flush and release the store.
    pub fn close(mut self) -> Result<(), StoreError> {
        self.flush()
    }
}

impl Drop for VectorStore {
    fn drop(&mut self) {
        if self.dirty {
            warn!(
                collection = %self.collection,
                "Vector store dropped with unsaved changes; call close() to persist them"
            );
        }
    }
}

fn read_items(path: &Path) -> Result<Vec<Item>, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
    let mut items = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| StoreError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(&line).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        items.push(item);
    }
    Ok(items)
}

fn write_items(path: &Path, items: &[Item]) -> Result<(), StoreError> {
    let file = File::create(path).map_err(|e| StoreError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for item in items {
        serde_json::to_writer(&mut writer, item).map_err(|e| StoreError::io(path, e.into()))?;
        writer.write_all(b"\n").map_err(|e| StoreError::io(path, e))?;
    }
    writer.flush().map_err(|e| StoreError::io(path, e))?;
    Ok(())
}
