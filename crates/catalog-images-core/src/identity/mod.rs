//! File identities used for duplicate detection.
//!
//! Two identities exist: a cheap metadata signature and a content hash. The
//! signature treats two files with the same name, size, media type and
//! modification time as the same file, whatever their bytes are.
mod crypto_hash;

pub use crypto_hash::{compute_cryptographic, content_digest};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::config::IdentityStrategy;
use crate::logging::log_hash_fallback;
use crate::types::CandidateFile;

/// Identity of a file for duplicate detection.
///
/// Identities compare by kind and value: a signature never equals a content
/// hash, even when the strings match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Identity {
    /// Metadata signature, see [`file_signature`]
    Signature(String),

    /// Lower-case hex Blake3 digest of the content
    ContentHash(String),
}

impl Identity {
    pub fn as_str(&self) -> &str {
        match self {
            Identity::Signature(s) | Identity::ContentHash(s) => s,
        }
    }

    /// Whether this identity came from the weak metadata signature
    pub fn is_signature(&self) -> bool {
        matches!(self, Identity::Signature(_))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Metadata signature of a file: `name-size-type-mtime`
pub fn file_signature(file: &CandidateFile) -> String {
    format!(
        "{}-{}-{}-{}",
        file.name, file.byte_size, file.media_type, file.last_modified
    )
}

/// Compute the identity of a file with the given strategy.
///
/// A content hash that cannot be computed degrades to the signature for this
/// file only. The failure is logged and never reported to the caller.
pub fn compute_identity(file: &CandidateFile, strategy: IdentityStrategy) -> Identity {
    match strategy {
        IdentityStrategy::Signature => Identity::Signature(file_signature(file)),
        IdentityStrategy::ContentHash => match content_digest(&file.source) {
            Ok(hash) => Identity::ContentHash(hash.to_hex().to_string()),
            Err(e) => {
                log_hash_fallback(&file.name, &e);
                Identity::Signature(file_signature(file))
            }
        },
    }
}

/// Identities of already accepted files, for use as a validator reference set
pub fn identities_of<'a>(
    files: impl IntoIterator<Item = &'a CandidateFile>,
    strategy: IdentityStrategy,
) -> HashSet<Identity> {
    files
        .into_iter()
        .map(|file| compute_identity(file, strategy))
        .collect()
}
