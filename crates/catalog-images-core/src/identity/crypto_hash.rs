//! Computes the cryptographic hash of a candidate's content using the Blake3 algorithm.
//!
//! Disk-backed content is read in chunks so large files never have to be held
//! in memory; in-memory content is hashed directly.
//!
//! # Errors
//!
//! Hashing a disk-backed file fails if the file cannot be opened or read.
use crate::error::Result;
use crate::types::FileSource;
use blake3::Hash as Blake3Hash;

use std::{fs::File, io::Read, path::Path};

/// Compute the cryptographic hash of a file using the Blake3 algorithm
pub fn compute_cryptographic<P: AsRef<Path>>(path: P) -> Result<Blake3Hash> {
    // Open the file with explicit scope to ensure it's closed promptly
    let hash = {
        let mut file = File::open(&path)?;
        let mut hasher = blake3::Hasher::new();

        let mut buffer = [0; 8192]; // 8KB buffer
        loop {
            let bytes_read = file.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        hasher.finalize()
    };

    Ok(hash)
}

/// Digest the content behind a file source
pub fn content_digest(source: &FileSource) -> Result<Blake3Hash> {
    match source {
        FileSource::Memory(bytes) => Ok(blake3::hash(bytes)),
        FileSource::Disk(path) => compute_cryptographic(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_disk_and_memory_digests_agree() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shirt.png");
        // Larger than one read buffer
        let content: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
        File::create(&path).unwrap().write_all(&content).unwrap();

        let from_disk = content_digest(&FileSource::Disk(path)).unwrap();
        let from_memory = content_digest(&FileSource::Memory(Arc::from(content))).unwrap();

        assert_eq!(from_disk, from_memory);
        assert_eq!(from_disk.to_hex().len(), 64);
    }

    #[test]
    fn test_known_digest() {
        let hash = content_digest(&FileSource::Memory(Arc::from(&b""[..]))).unwrap();
        // Blake3 of the empty input
        assert_eq!(
            hash.to_hex().as_str(),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = content_digest(&FileSource::Disk("/path/that/does/not/exist.png".into()));
        assert!(result.is_err());
    }
}
