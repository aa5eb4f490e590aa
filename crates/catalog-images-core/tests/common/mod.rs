#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use catalog_images_core::{CandidateFile, Config, FileSource, IdentityStrategy};

pub const MIB: u64 = 1024 * 1024;
pub const MTIME: i64 = 1_700_000_000_000;

/// Candidate described by metadata only; its content is never readable
pub fn described(name: &str, byte_size: u64, media_type: &str) -> CandidateFile {
    CandidateFile::new(
        name,
        byte_size,
        media_type,
        MTIME,
        FileSource::Disk(PathBuf::from("/nonexistent/catalog-images").join(name)),
    )
}

pub fn png(name: &str) -> CandidateFile {
    CandidateFile::from_bytes(name, "image/png", MTIME, name.as_bytes().to_vec())
}

pub fn signature_config(capacity: usize) -> Config {
    let mut config = Config {
        capacity,
        ..Default::default()
    };
    config.validator.identity = IdentityStrategy::Signature;
    config
}

/// Write `content` to `dir/name` and return the path
pub fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    File::create(&path).unwrap().write_all(content).unwrap();
    path
}

/// Route library logs to the test harness; safe to call from every test
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
