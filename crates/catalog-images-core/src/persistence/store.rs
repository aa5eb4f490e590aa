use log::{debug, info};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use super::error::{PersistenceError, PersistenceResult};
use super::models::NewImageRecord;
use crate::identity::content_digest;
use crate::types::{CandidateFile, PersistedImage};

/// Table of product images in the backing store
pub trait ImageStore {
    /// Images of a product, in display order
    fn load_product_images(&self, product_id: &str) -> PersistenceResult<Vec<PersistedImage>>;

    fn delete_images(&self, ids: &[String]) -> PersistenceResult<()>;

    fn insert_images(&self, records: &[NewImageRecord]) -> PersistenceResult<Vec<PersistedImage>>;

    /// Rewrite order and featured flag of existing images
    fn update_images(&self, records: &[PersistedImage]) -> PersistenceResult<()>;
}

/// Remote object storage
pub trait ObjectUploader {
    /// Store the file and return its public URL
    fn upload(&self, file: &CandidateFile, owner_id: &str, category: &str)
        -> PersistenceResult<String>;
}

/// In-memory image table
#[derive(Debug, Default)]
pub struct MemoryImageStore {
    rows: Mutex<Vec<(String, PersistedImage)>>,
    next_id: AtomicU64,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> PersistenceResult<std::sync::MutexGuard<'_, Vec<(String, PersistedImage)>>> {
        self.rows
            .lock()
            .map_err(|_| PersistenceError::Backend("image table lock poisoned".to_string()))
    }
}

impl ImageStore for MemoryImageStore {
    fn load_product_images(&self, product_id: &str) -> PersistenceResult<Vec<PersistedImage>> {
        let mut images: Vec<PersistedImage> = self
            .rows()?
            .iter()
            .filter(|(owner, _)| owner == product_id)
            .map(|(_, image)| image.clone())
            .collect();
        images.sort_by_key(|image| image.display_order);
        Ok(images)
    }

    fn delete_images(&self, ids: &[String]) -> PersistenceResult<()> {
        let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let mut rows = self.rows()?;
        let before = rows.len();
        rows.retain(|(_, image)| !ids.contains(image.id.as_str()));
        debug!("Deleted {} image rows", before - rows.len());
        Ok(())
    }

    fn insert_images(&self, records: &[NewImageRecord]) -> PersistenceResult<Vec<PersistedImage>> {
        let mut rows = self.rows()?;
        let inserted: Vec<PersistedImage> = records
            .iter()
            .map(|record| {
                let id = format!("img-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
                let image = record.clone().into_persisted(id);
                rows.push((record.product_id.clone(), image.clone()));
                image
            })
            .collect();
        info!("Inserted {} image rows", inserted.len());
        Ok(inserted)
    }

    fn update_images(&self, records: &[PersistedImage]) -> PersistenceResult<()> {
        let mut rows = self.rows()?;
        for record in records {
            let row = rows
                .iter_mut()
                .find(|(_, image)| image.id == record.id)
                .ok_or_else(|| PersistenceError::NotFound(record.id.clone()))?;
            row.1 = record.clone();
        }
        Ok(())
    }
}

/// Uploader keeping objects in memory under `memory://<owner>/<category>/<digest>`
#[derive(Debug, Default)]
pub struct MemoryUploader {
    objects: Mutex<Vec<String>>,
}

impl MemoryUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs of every stored object, in upload order
    pub fn uploaded(&self) -> Vec<String> {
        self.objects
            .lock()
            .map(|objects| objects.clone())
            .unwrap_or_default()
    }
}

impl ObjectUploader for MemoryUploader {
    fn upload(
        &self,
        file: &CandidateFile,
        owner_id: &str,
        category: &str,
    ) -> PersistenceResult<String> {
        let digest = content_digest(&file.source).map_err(|e| match e {
            crate::Error::Io(io) => PersistenceError::Content(io),
            other => PersistenceError::Backend(other.to_string()),
        })?;

        let url = format!("memory://{}/{}/{}", owner_id, category, digest.to_hex());
        self.objects
            .lock()
            .map_err(|_| PersistenceError::Backend("object list lock poisoned".to_string()))?
            .push(url.clone());
        debug!("Uploaded '{}' to {}", file.name, url);
        Ok(url)
    }
}
