//! The ordered set of images attached to one product.
//!
//! A collection mixes pending entries (files picked in this session, kept in
//! memory until the form is saved) and persisted entries loaded from the
//! store. Whenever it is non-empty exactly one entry is featured.
//!
//! All methods take `&self`. The entry list sits behind a mutex that is never
//! held while content is hashed or while the URL allocator runs, and
//! `add_files` runs under a single-flight guard so two submissions can never
//! interleave.
mod display_urls;
mod single_flight;

pub use display_urls::{DisplayUrlAllocator, LocalUrlAllocator};
pub use single_flight::{FlightGuard, SingleFlight};

use display_urls::DisplayUrlRegistry;
use log::{info, warn};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::identity::{compute_identity, Identity};
use crate::logging::log_collection_change;
use crate::types::{CandidateFile, ImageEntry, MediaKind, PersistedImage};
use crate::validation::{validate, ValidationReport};

/// Prefix marking ids of entries that are not stored yet
pub const LOCAL_ID_PREFIX: &str = "local-";

/// Result of a successful `add_files` call
#[derive(Debug, Clone)]
pub struct AddOutcome {
    /// Ids of the new entries, in input order
    pub added: Vec<String>,

    /// Classification of the candidates that fit in the collection
    pub report: ValidationReport,

    /// Candidates dropped unexamined for lack of capacity
    pub truncated: usize,
}

#[derive(Debug, Default)]
struct CollectionState {
    entries: Vec<ImageEntry>,
    urls: DisplayUrlRegistry,
    next_local_id: u64,
}

impl CollectionState {
    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn has_featured(&self) -> bool {
        self.entries.iter().any(|e| e.is_featured)
    }

    fn identities(&self) -> HashSet<Identity> {
        self.entries
            .iter()
            .filter_map(|e| e.identity.clone())
            .collect()
    }

    fn fresh_local_id(&mut self) -> String {
        loop {
            self.next_local_id += 1;
            let id = format!("{}{}", LOCAL_ID_PREFIX, self.next_local_id);
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    /// Make the first entry featured when nothing else is
    fn promote_first(&mut self) {
        if !self.has_featured() {
            if let Some(first) = self.entries.first_mut() {
                first.is_featured = true;
                log_collection_change("promote_featured", &first.id, None);
            }
        }
    }
}

/// Image set of a product being edited
pub struct ImageCollection {
    config: Config,
    state: Mutex<CollectionState>,
    flight: SingleFlight,
    allocator: Arc<dyn DisplayUrlAllocator>,
}

impl ImageCollection {
    /// Create an empty collection using [`LocalUrlAllocator`]
    pub fn new(config: Config) -> Self {
        Self::with_allocator(config, Arc::new(LocalUrlAllocator::new()))
    }

    pub fn with_allocator(config: Config, allocator: Arc<dyn DisplayUrlAllocator>) -> Self {
        Self {
            config,
            state: Mutex::new(CollectionState::default()),
            flight: SingleFlight::new(),
            allocator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn state(&self) -> MutexGuard<'_, CollectionState> {
        // Entries stay consistent between statements, so a poisoned lock is still usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Release URLs the collection no longer owns; call without the lock held
    fn release_urls(&self, urls: impl IntoIterator<Item = String>) {
        for url in urls {
            self.allocator.release(&url);
        }
    }

    /// Replace the content with images loaded from the store.
    ///
    /// Records are ordered by `display_order`. The record flagged as featured
    /// wins, otherwise the first one is featured. Records repeating an id
    /// already loaded are skipped.
    pub fn load_persisted(&self, mut records: Vec<PersistedImage>) -> usize {
        records.sort_by_key(|r| r.display_order);

        let mut state = self.state();
        state.entries.clear();
        let released = state.urls.drain();

        let mut featured_seen = false;
        for record in records {
            if state.position(&record.id).is_some() {
                warn!("Skipping repeated stored image id {}", record.id);
                continue;
            }
            let is_featured = record.is_featured && !featured_seen;
            featured_seen |= is_featured;
            state.entries.push(ImageEntry {
                id: record.id,
                display_url: record.url,
                source_file: None,
                is_featured,
                media_kind: MediaKind::Image,
                identity: None,
                display_order: Some(record.display_order),
            });
        }
        state.promote_first();

        if state.entries.len() > self.config.capacity {
            warn!(
                "Loaded {} stored images, more than the capacity of {}",
                state.entries.len(),
                self.config.capacity
            );
        }
        let loaded = state.entries.len();
        drop(state);

        self.release_urls(released);
        info!("Loaded {} stored images", loaded);
        loaded
    }

    /// Validate a batch of files and append the accepted ones.
    ///
    /// Only as many leading candidates as there are free slots are examined,
    /// the rest are dropped. Duplicates and invalid files are reported in the
    /// outcome and never fail the call.
    ///
    /// # Errors
    ///
    /// - [`Error::ConcurrentSubmission`] if another call is still running
    /// - [`Error::CapacityExhausted`] if the collection is already full
    pub fn add_files(&self, mut candidates: Vec<CandidateFile>) -> Result<AddOutcome> {
        let _flight = self.flight.try_acquire().ok_or_else(|| {
            warn!(
                "Rejected submission of {} files: another one is in progress",
                candidates.len()
            );
            Error::ConcurrentSubmission
        })?;

        let capacity = self.config.capacity;
        let (remaining, existing) = {
            let state = self.state();
            (
                capacity.saturating_sub(state.entries.len()),
                state.identities(),
            )
        };

        if remaining == 0 {
            warn!("Rejected submission of {} files: collection is full", candidates.len());
            return Err(Error::CapacityExhausted { capacity });
        }

        let truncated = candidates.len().saturating_sub(remaining);
        candidates.truncate(remaining);

        let report = validate(&candidates, &self.config.validator, &existing);

        // The allocator is never called with the lock held
        let mut urls: Vec<String> = report
            .valid
            .iter()
            .map(|valid| self.allocator.allocate(&valid.file))
            .collect();

        let mut state = self.state();
        // Stored images may have been loaded while hashing
        let room = capacity.saturating_sub(state.entries.len());
        if report.valid.len() > room {
            warn!(
                "Only {} of {} accepted files still fit in the collection",
                room,
                report.valid.len()
            );
        }
        let unused = urls.split_off(room.min(urls.len()));

        let claim_featured = !state.has_featured();
        let mut added = Vec::new();
        for (valid, display_url) in report.valid.iter().zip(urls) {
            let id = state.fresh_local_id();
            state.urls.track(display_url.clone(), id.clone());

            let is_featured = claim_featured && added.is_empty();
            state.entries.push(ImageEntry {
                id: id.clone(),
                display_url,
                source_file: Some(valid.file.clone()),
                is_featured,
                media_kind: MediaKind::Image,
                identity: Some(valid.identity.clone()),
                display_order: None,
            });
            log_collection_change("add", &id, Some(&valid.file.name));
            added.push(id);
        }
        drop(state);
        self.release_urls(unused);

        info!(
            "Added {} images ({} duplicate, {} invalid, {} over capacity)",
            added.len(),
            report.duplicates.len(),
            report.invalid.len(),
            truncated
        );

        Ok(AddOutcome {
            added,
            report,
            truncated,
        })
    }

    /// Make `id` the featured entry; returns false if there is no such entry
    pub fn set_featured(&self, id: &str) -> bool {
        let mut state = self.state();
        if state.position(id).is_none() {
            return false;
        }

        for entry in state.entries.iter_mut() {
            entry.is_featured = entry.id == id;
        }
        log_collection_change("set_featured", id, None);
        true
    }

    /// Remove an entry and release its display URL.
    ///
    /// Removing the featured entry promotes the first remaining one.
    pub fn remove(&self, id: &str) -> Option<ImageEntry> {
        let mut state = self.state();
        let index = state.position(id)?;

        let removed = state.entries.remove(index);
        let owned = state.urls.take(&removed.display_url);
        log_collection_change("remove", id, None);

        if removed.is_featured {
            state.promote_first();
        }
        drop(state);

        if owned.is_some() {
            self.release_urls([removed.display_url.clone()]);
        }
        Some(removed)
    }

    /// Swap the content of an entry for a new file (e.g. after cropping).
    ///
    /// The entry keeps its id, position and featured flag. The new display
    /// URL is installed before the old one is released. Returns false if
    /// there is no such entry.
    pub fn replace_content(&self, id: &str, file: CandidateFile) -> bool {
        // Hash and allocate before locking
        let identity = compute_identity(&file, self.config.validator.identity);
        let display_url = self.allocator.allocate(&file);

        let mut state = self.state();
        let Some(index) = state.position(id) else {
            drop(state);
            self.release_urls([display_url]);
            return false;
        };

        state.urls.track(display_url.clone(), id.to_string());

        let entry = &mut state.entries[index];
        let old_url = std::mem::replace(&mut entry.display_url, display_url);
        log_collection_change("replace_content", id, Some(&file.name));
        entry.source_file = Some(file);
        entry.identity = Some(identity);

        let owned = state.urls.take(&old_url);
        drop(state);

        if owned.is_some() {
            self.release_urls([old_url]);
        }
        true
    }

    /// Remove every entry, releasing all display URLs
    pub fn clear(&self) {
        let released = {
            let mut state = self.state();
            state.entries.clear();
            state.urls.drain()
        };
        self.release_urls(released);
    }

    /// Snapshot of the entries in collection order
    pub fn entries(&self) -> Vec<ImageEntry> {
        self.state().entries.clone()
    }

    pub fn get(&self, id: &str) -> Option<ImageEntry> {
        let state = self.state();
        state.position(id).map(|index| state.entries[index].clone())
    }

    pub fn featured(&self) -> Option<ImageEntry> {
        self.state().entries.iter().find(|e| e.is_featured).cloned()
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn remaining_capacity(&self) -> usize {
        self.config.capacity.saturating_sub(self.len())
    }

    /// Whether an `add_files` call is running
    pub fn is_submitting(&self) -> bool {
        self.flight.is_in_flight()
    }
}

impl Drop for ImageCollection {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        for url in state.urls.drain() {
            self.allocator.release(&url);
        }
    }
}
