//! Loading a product's images into a collection and writing them back.
use log::info;
use std::collections::HashSet;

use super::models::NewImageRecord;
use super::store::{ImageStore, ObjectUploader};
use crate::collection::ImageCollection;
use crate::error::{Error, Result};
use crate::types::{CandidateFile, ImageEntry, PersistedImage};

/// A pending entry that has to be uploaded
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub entry_id: String,
    pub file: CandidateFile,
    pub display_order: u32,
    pub is_featured: bool,
}

/// Store operations needed to make the backing store match a collection
#[derive(Debug, Clone, Default)]
pub struct SavePlan {
    /// Stored images that were removed or had their content replaced
    pub delete: Vec<String>,

    /// Stored images kept as they are, with their new order and flag
    pub update: Vec<PersistedImage>,

    /// Images that exist only in memory
    pub upload: Vec<PendingUpload>,
}

/// Work out the store operations for `entries`, given the ids the product
/// had when it was loaded. Display order follows collection order.
pub fn plan_save(entries: &[ImageEntry], original_ids: &[String]) -> SavePlan {
    let mut plan = SavePlan::default();
    let mut kept: HashSet<&str> = HashSet::new();

    for (order, entry) in entries.iter().enumerate() {
        let display_order = order as u32;
        match &entry.source_file {
            Some(file) => plan.upload.push(PendingUpload {
                entry_id: entry.id.clone(),
                file: file.clone(),
                display_order,
                is_featured: entry.is_featured,
            }),
            None => {
                kept.insert(entry.id.as_str());
                plan.update.push(PersistedImage {
                    id: entry.id.clone(),
                    url: entry.display_url.clone(),
                    display_order,
                    is_featured: entry.is_featured,
                });
            }
        }
    }

    plan.delete = original_ids
        .iter()
        .filter(|id| !kept.contains(id.as_str()))
        .cloned()
        .collect();

    plan
}

/// Load the stored images of a product into `collection`.
///
/// Returns the loaded ids, to be passed back to [`save_product`].
pub fn load_product(
    collection: &ImageCollection,
    store: &dyn ImageStore,
    product_id: &str,
) -> Result<Vec<String>> {
    let images = store.load_product_images(product_id)?;
    let ids = images.iter().map(|image| image.id.clone()).collect();
    collection.load_persisted(images);
    Ok(ids)
}

/// Write the collection back to the store.
///
/// Every pending entry is uploaded first; an upload failure stops the save
/// before the store is touched. Returns the product's images as stored
/// afterwards.
pub fn save_product(
    collection: &ImageCollection,
    store: &dyn ImageStore,
    uploader: &dyn ObjectUploader,
    product_id: &str,
    original_ids: &[String],
) -> Result<Vec<PersistedImage>> {
    let plan = plan_save(&collection.entries(), original_ids);
    let category = &collection.config().upload_category;

    let mut records = Vec::with_capacity(plan.upload.len());
    for pending in &plan.upload {
        let url = uploader
            .upload(&pending.file, product_id, category)
            .map_err(|e| Error::Upload {
                entry_id: pending.entry_id.clone(),
                reason: e.to_string(),
            })?;
        records.push(NewImageRecord {
            product_id: product_id.to_string(),
            url,
            display_order: pending.display_order,
            is_featured: pending.is_featured,
        });
    }

    if !plan.delete.is_empty() {
        store.delete_images(&plan.delete)?;
    }
    if !plan.update.is_empty() {
        store.update_images(&plan.update)?;
    }
    if !records.is_empty() {
        store.insert_images(&records)?;
    }

    info!(
        "Saved images of product {}: {} deleted, {} kept, {} uploaded",
        product_id,
        plan.delete.len(),
        plan.update.len(),
        records.len()
    );

    Ok(store.load_product_images(product_id)?)
}
