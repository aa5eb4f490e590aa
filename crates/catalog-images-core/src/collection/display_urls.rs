//! Transient display URLs for images that only exist in memory.
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::types::CandidateFile;

/// Hands out URLs the presentation layer can render a local file from.
///
/// The collection never calls an allocator while holding its own lock, so
/// implementations may read the collection back.
pub trait DisplayUrlAllocator: Send + Sync {
    /// Create a URL for the file; it stays valid until released
    fn allocate(&self, file: &CandidateFile) -> String;

    /// Invalidate a URL returned by `allocate`
    fn release(&self, url: &str);
}

/// Allocator issuing `blob:local/<n>` references and tracking which are live
#[derive(Debug, Default)]
pub struct LocalUrlAllocator {
    next: AtomicU64,
    live: Mutex<HashSet<String>>,
}

impl LocalUrlAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().map(|live| live.len()).unwrap_or(0)
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.live
            .lock()
            .map(|live| live.contains(url))
            .unwrap_or(false)
    }
}

impl DisplayUrlAllocator for LocalUrlAllocator {
    fn allocate(&self, file: &CandidateFile) -> String {
        let url = format!("blob:local/{}", self.next.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut live) = self.live.lock() {
            live.insert(url.clone());
        }
        debug!("Allocated {} for '{}'", url, file.name);
        url
    }

    fn release(&self, url: &str) {
        let removed = self
            .live
            .lock()
            .map(|mut live| live.remove(url))
            .unwrap_or(false);
        if !removed {
            warn!("Release of unknown or already released display URL: {}", url);
        }
    }
}

/// Release tracking for the URLs a collection owns (url -> owning entry id).
///
/// Only tracked URLs are ever released, and `take` forgets a URL before it is
/// released, so each one is released exactly once.
#[derive(Debug, Default)]
pub(crate) struct DisplayUrlRegistry {
    owners: HashMap<String, String>,
}

impl DisplayUrlRegistry {
    pub(crate) fn track(&mut self, url: String, entry_id: String) {
        self.owners.insert(url, entry_id);
    }

    /// Stop tracking `url`, returning its owner if it was tracked
    pub(crate) fn take(&mut self, url: &str) -> Option<String> {
        self.owners.remove(url)
    }

    /// Stop tracking everything, returning the URLs
    pub(crate) fn drain(&mut self) -> Vec<String> {
        self.owners.drain().map(|(url, _)| url).collect()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.owners.len()
    }
}
