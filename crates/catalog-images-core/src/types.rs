use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::identity::Identity;

/// Where the bytes of a candidate file live
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Content already read into memory (drag and drop, crop output)
    Memory(Arc<[u8]>),

    /// Content read lazily from disk when it is hashed
    Disk(PathBuf),
}

/// A file picked by the user, not yet accepted into a collection
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// File name as reported by the picker
    pub name: String,

    /// File size in bytes
    pub byte_size: u64,

    /// MIME type, e.g. `image/png`
    pub media_type: String,

    /// Last modified timestamp in epoch milliseconds
    pub last_modified: i64,

    /// Content of the file
    pub source: FileSource,
}

impl CandidateFile {
    pub fn new(
        name: impl Into<String>,
        byte_size: u64,
        media_type: impl Into<String>,
        last_modified: i64,
        source: FileSource,
    ) -> Self {
        Self {
            name: name.into(),
            byte_size,
            media_type: media_type.into(),
            last_modified,
            source,
        }
    }

    /// Build an in-memory candidate; the size is taken from the content
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        last_modified: i64,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes: Arc<[u8]> = bytes.into();
        Self::new(
            name,
            bytes.len() as u64,
            media_type,
            last_modified,
            FileSource::Memory(bytes),
        )
    }
}

/// Kind of media an entry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
}

/// One image of a product, either pending upload or already stored
#[derive(Debug, Clone)]
pub struct ImageEntry {
    /// Stored id, or a `local-` id for pending entries
    pub id: String,

    /// URL the presentation layer renders
    pub display_url: String,

    /// Present only while the image exists in memory only
    pub source_file: Option<CandidateFile>,

    /// Whether this is the product's featured image
    pub is_featured: bool,

    pub media_kind: MediaKind,

    /// Identity used for duplicate detection, when known
    pub identity: Option<Identity>,

    /// Position reported by the store for persisted entries
    pub display_order: Option<u32>,
}

impl ImageEntry {
    /// Whether the entry still has to be uploaded
    pub fn is_pending(&self) -> bool {
        self.source_file.is_some()
    }
}

/// Image metadata as returned by the backing store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedImage {
    pub id: String,
    pub url: String,
    pub display_order: u32,
    #[serde(default)]
    pub is_featured: bool,
}
