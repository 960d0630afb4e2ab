//! Persisted verdict cache.
//!
//! The cache is what makes a multi-day sweep resumable: every verdict is
//! recorded under the fully-qualified name, the whole state is written to
//! disk on every termination path, and a later run merges the snapshot back
//! in and skips names it already knows.
//!
//! On disk the snapshot is a bincode-encoded pair of name maps, read and
//! written whole; there is no streaming or partial access.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::ScanError;
use crate::types::Verdict;

/// In-memory verdict store with whole-file persistence.
///
/// Invariant: a name is present in at most one of the two maps. `record`
/// maintains this by removing the name from the opposite map on insert.
///
/// The maps carry `name -> true` entries rather than plain sets so the
/// snapshot layout matches the shape the scanner has always persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultCache {
    exists: BTreeMap<String, bool>,
    available: BTreeMap<String, bool>,
}

impl ResultCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a persisted snapshot into this cache.
    ///
    /// A missing file is not an error; the scan simply starts from the
    /// current in-memory state. A present-but-unreadable snapshot is an
    /// error: silently discarding it would re-check (and re-bill network
    /// traffic for) every name it contained.
    pub fn load(&mut self, path: &Path) -> Result<(), ScanError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no cache snapshot, starting empty");
            return Ok(());
        }

        let bytes = fs::read(path)
            .map_err(|e| ScanError::cache(path.to_string_lossy(), format!("read failed: {}", e)))?;

        let snapshot: ResultCache = bincode::deserialize(&bytes).map_err(|e| {
            ScanError::cache(
                path.to_string_lossy(),
                format!("snapshot decode failed: {}", e),
            )
        })?;

        self.exists.extend(snapshot.exists);
        self.available.extend(snapshot.available);

        tracing::info!(
            path = %path.display(),
            exists = self.exists.len(),
            available = self.available.len(),
            "cache snapshot merged"
        );
        Ok(())
    }

    /// Whether this name already has an `exists` verdict.
    ///
    /// This is the scan loop's skip test. Names marked available are not
    /// skipped here; the engine never re-checks them either because
    /// `record` is only reached for unknown names.
    pub fn contains(&self, name: &str) -> bool {
        self.exists.contains_key(name)
    }

    /// The verdict recorded for a name, if any.
    pub fn verdict(&self, name: &str) -> Option<Verdict> {
        if self.exists.contains_key(name) {
            Some(Verdict::Exists)
        } else if self.available.contains_key(name) {
            Some(Verdict::Available)
        } else {
            None
        }
    }

    /// Record a verdict, evicting any opposite verdict for the same name.
    pub fn record(&mut self, name: &str, verdict: Verdict) {
        match verdict {
            Verdict::Exists => {
                self.available.remove(name);
                self.exists.insert(name.to_string(), true);
            }
            Verdict::Available => {
                self.exists.remove(name);
                self.available.insert(name.to_string(), true);
            }
        }
    }

    /// Persist the full cache state to `path`.
    ///
    /// Writes to a sibling temp file and renames it into place, so a crash
    /// mid-write leaves the previous snapshot intact.
    pub fn save(&self, path: &Path) -> Result<(), ScanError> {
        let bytes = bincode::serialize(self).map_err(|e| {
            ScanError::cache(
                path.to_string_lossy(),
                format!("snapshot encode failed: {}", e),
            )
        })?;

        let tmp_path = path.with_extension("cache.tmp");
        {
            let mut file = fs::File::create(&tmp_path).map_err(|e| {
                ScanError::cache(
                    tmp_path.to_string_lossy(),
                    format!("create failed: {}", e),
                )
            })?;
            file.write_all(&bytes).map_err(|e| {
                ScanError::cache(tmp_path.to_string_lossy(), format!("write failed: {}", e))
            })?;
            file.sync_all().map_err(|e| {
                ScanError::cache(tmp_path.to_string_lossy(), format!("sync failed: {}", e))
            })?;
        }
        fs::rename(&tmp_path, path).map_err(|e| {
            ScanError::cache(path.to_string_lossy(), format!("rename failed: {}", e))
        })?;

        tracing::info!(
            path = %path.display(),
            exists = self.exists.len(),
            available = self.available.len(),
            "cache snapshot written"
        );
        Ok(())
    }

    /// All names currently marked available, in lexicographic order.
    pub fn available_names(&self) -> Vec<String> {
        self.available.keys().cloned().collect()
    }

    /// Number of names with an `exists` verdict.
    pub fn exists_count(&self) -> usize {
        self.exists.len()
    }

    /// Number of names with an `available` verdict.
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    /// Total number of recorded verdicts.
    pub fn len(&self) -> usize {
        self.exists.len() + self.available.len()
    }

    /// Whether the cache holds no verdicts at all.
    pub fn is_empty(&self) -> bool {
        self.exists.is_empty() && self.available.is_empty()
    }
}
