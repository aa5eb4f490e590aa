use serde::{Deserialize, Serialize};

use crate::types::PersistedImage;

/// Image record to insert; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewImageRecord {
    pub product_id: String,
    pub url: String,
    pub display_order: u32,
    pub is_featured: bool,
}

impl NewImageRecord {
    /// Stored form of this record under `id`
    pub fn into_persisted(self, id: String) -> PersistedImage {
        PersistedImage {
            id,
            url: self.url,
            display_order: self.display_order,
            is_featured: self.is_featured,
        }
    }
}
