use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::{CandidateFile, FileSource};

/// Media type for a file extension, empty when unknown
pub fn media_type_from_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "tif" | "tiff" => "image/tiff",
        "heic" => "image/heic",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "",
    }
}

/// Build a disk-backed candidate from a file's metadata
pub fn candidate_from_path(path: &Path) -> Result<CandidateFile> {
    if !path.exists() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }

    let metadata = fs::metadata(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let media_type = path
        .extension()
        .and_then(|e| e.to_str())
        .map(media_type_from_extension)
        .unwrap_or("");

    Ok(CandidateFile::new(
        name,
        metadata.len(),
        media_type,
        modified_millis(&metadata),
        FileSource::Disk(path.to_path_buf()),
    ))
}

/// Expand files and directories into candidates, in the order given.
///
/// Directories are walked recursively with entries sorted by name. Files
/// that cannot be read are logged and skipped.
pub fn collect_candidates<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<CandidateFile>> {
    let mut candidates = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                match candidate_from_path(entry.path()) {
                    Ok(candidate) => candidates.push(candidate),
                    Err(e) => log::warn!("Skipping {}: {}", entry.path().display(), e),
                }
            }
        } else {
            candidates.push(candidate_from_path(path)?);
        }
    }

    Ok(candidates)
}

/// Last modified time in epoch milliseconds, 0 when unavailable
fn modified_millis(metadata: &fs::Metadata) -> i64 {
    metadata
        .modified()
        .ok()
        .and_then(|time| time.duration_since(SystemTime::UNIX_EPOCH).ok())
        .map(|duration| i64::try_from(duration.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

// -- Tests --
