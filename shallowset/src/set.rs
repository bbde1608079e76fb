/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This software may be used and distributed according to the terms of the
 * GNU General Public License version 2.
 */

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use types::CommitId;
use util::errors::from_err_msg_path;
use util::file::atomic_write;

use crate::errors::Result;
use crate::errors::ShallowError;

/// Name of the backing file inside the store directory.
pub const SHALLOW_FILE: &str = "shallow";

/// `ShallowSet` tracks the commits marking the boundary of a truncated
/// history: commits that are present locally but whose parents are not.
///
/// The set is persisted in the `shallow` file of the store directory.
/// A missing file means the repository is not shallow. The parsed set is
/// cached behind an `Arc`; repeated reads return the same instance until
/// a mutation replaces it or `invalidate()` drops it. The cache does not
/// watch the file for modifications by other processes.
///
/// One store instance is expected per opened repository, owned by the
/// repository handle. All operations are blocking; a single mutex
/// serializes cache access and mutation sequences, so sharing an
/// instance across threads is safe.
pub struct ShallowSet {
    path: PathBuf,
    cache: Mutex<Option<Arc<HashSet<CommitId>>>>,
}

impl ShallowSet {
    /// Bind a shallow set to `store_dir/shallow`. Does not touch the
    /// filesystem; the file is read lazily on first access.
    pub fn open(store_dir: impl AsRef<Path>) -> Self {
        Self {
            path: store_dir.as_ref().join(SHALLOW_FILE),
            cache: Mutex::new(None),
        }
    }

    /// Path of the backing file. Callers coordinating higher-level
    /// locking key off this location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the current boundary set.
    ///
    /// The first read parses the file; a missing file is the empty set,
    /// and that result is cached too, so later reads skip the
    /// filesystem entirely. Reading never creates the file.
    pub fn get(&self) -> Result<Arc<HashSet<CommitId>>> {
        let mut cache = self.cache.lock();
        match &*cache {
            Some(nodes) => Ok(nodes.clone()),
            None => {
                let nodes = Arc::new(self.load()?);
                *cache = Some(nodes.clone());
                Ok(nodes)
            }
        }
    }

    /// Whether `node` is a boundary commit.
    pub fn contains(&self, node: &CommitId) -> Result<bool> {
        Ok(self.get()?.contains(node))
    }

    /// Merge `nodes` into the persisted set.
    ///
    /// An empty `nodes` is a no-op: the file is not created and the
    /// cache keeps its previous value. If every id is already present
    /// the file is left untouched as well. Otherwise the union is
    /// written atomically and becomes the new cached set. A failed
    /// write leaves both the file and the cache as they were.
    pub fn add(&self, nodes: &HashSet<CommitId>) -> Result<()> {
        if nodes.is_empty() {
            return Ok(());
        }
        let mut cache = self.cache.lock();
        let current = match &*cache {
            Some(current) => current.clone(),
            None => Arc::new(self.load()?),
        };
        let merged: HashSet<CommitId> = current.union(nodes).copied().collect();
        if merged.len() == current.len() {
            tracing::trace!(path = %self.path.display(), "shallow set unchanged");
            *cache = Some(current);
            return Ok(());
        }
        self.write(&merged)?;
        *cache = Some(Arc::new(merged));
        Ok(())
    }

    /// Replace the persisted set wholesale.
    ///
    /// An empty replacement removes the backing file (the repository is
    /// no longer shallow) rather than leaving an empty file behind. A
    /// non-empty one atomically rewrites it.
    pub fn replace(&self, nodes: &HashSet<CommitId>) -> Result<()> {
        let mut cache = self.cache.lock();
        if nodes.is_empty() {
            match fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => {
                    return Err(
                        from_err_msg_path(err, "error removing shallow file", &self.path).into(),
                    );
                }
            }
            tracing::debug!(path = %self.path.display(), "removed shallow file");
        } else {
            self.write(nodes)?;
        }
        *cache = Some(Arc::new(nodes.clone()));
        Ok(())
    }

    /// Drop the cached set so the next read re-parses the file.
    ///
    /// The cache never invalidates itself when the file is changed by
    /// another process; callers that need that freshness invalidate
    /// explicitly.
    pub fn invalidate(&self) {
        *self.cache.lock() = None;
    }

    fn load(&self) -> Result<HashSet<CommitId>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(HashSet::new());
            }
            Err(err) => {
                return Err(from_err_msg_path(err, "error reading shallow file", &self.path).into());
            }
        };
        let mut nodes = HashSet::new();
        for line in text.lines() {
            // Tolerate blank lines; a hand-edited file may carry them.
            if line.is_empty() {
                continue;
            }
            let node =
                CommitId::from_hex(line.as_bytes()).map_err(|err| ShallowError::CorruptEntry {
                    line: line.to_string(),
                    source: err,
                })?;
            nodes.insert(node);
        }
        tracing::debug!(path = %self.path.display(), count = nodes.len(), "loaded shallow set");
        Ok(nodes)
    }

    fn write(&self, nodes: &HashSet<CommitId>) -> Result<()> {
        debug_assert!(!nodes.is_empty());
        let mut hexes: Vec<String> = nodes.iter().map(|node| node.to_hex()).collect();
        hexes.sort_unstable();
        let mut text = hexes.join("\n");
        text.push('\n');
        atomic_write(&self.path, &text, false)?;
        tracing::debug!(path = %self.path.display(), count = nodes.len(), "wrote shallow set");
        Ok(())
    }
}
