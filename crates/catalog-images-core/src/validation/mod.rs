//! Classification of candidate files into valid, duplicate and invalid.
//!
//! Each candidate goes through the checks in a fixed order and the first one
//! that matches decides its bucket:
//! - size limit
//! - allowed media type
//! - duplicate of an already accepted file
//! - duplicate of an earlier file in the same batch
//!
//! The validator holds no state between calls. Every call starts with an
//! empty within-batch set, so concurrent calls sharing the same reference set
//! never see each other's batches.
mod report;

pub use report::{
    DuplicateFile, DuplicateKind, InvalidFile, Notice, NoticeCategory, RejectionReason,
    ValidFile, ValidationReport,
};

use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::HashSet;

use crate::config::{IdentityStrategy, ValidatorConfig};
use crate::identity::{compute_identity, Identity};
use crate::types::CandidateFile;

/// Top-level part of a media type (`image` for `image/png`)
fn media_type_prefix(media_type: &str) -> &str {
    media_type.split('/').next().unwrap_or(media_type)
}

/// Whether a media type is accepted by the allowed list.
///
/// A media type passes when it equals an allowed entry, or when its top-level
/// part equals the top-level part of an allowed entry.
pub fn is_media_type_allowed(media_type: &str, allowed: &[String]) -> bool {
    let prefix = media_type_prefix(media_type);
    if prefix.is_empty() {
        return false;
    }

    allowed.iter().any(|entry| {
        entry.eq_ignore_ascii_case(media_type)
            || media_type_prefix(entry).eq_ignore_ascii_case(prefix)
    })
}

/// Size and type checks, in that order
fn check_constraints(file: &CandidateFile, config: &ValidatorConfig) -> Option<RejectionReason> {
    let limit = config.max_file_size_bytes();
    if file.byte_size > limit {
        return Some(RejectionReason::SizeExceeded {
            byte_size: file.byte_size,
            limit,
        });
    }

    if !is_media_type_allowed(&file.media_type, &config.allowed_media_types) {
        return Some(RejectionReason::TypeNotAllowed {
            media_type: file.media_type.clone(),
        });
    }

    None
}

/// Identities for the given files, in the same order.
///
/// Content hashes are computed in parallel; rayon's indexed collect keeps the
/// results aligned with the input.
fn compute_identities(files: &[&CandidateFile], config: &ValidatorConfig) -> Vec<Identity> {
    let strategy = config.identity;
    if strategy == IdentityStrategy::Signature || files.len() < 2 {
        return files
            .iter()
            .map(|file| compute_identity(file, strategy))
            .collect();
    }

    let hash_all = || {
        files
            .par_iter()
            .map(|file| compute_identity(file, strategy))
            .collect::<Vec<_>>()
    };

    if config.threads == 0 {
        return hash_all();
    }

    match rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
    {
        Ok(pool) => pool.install(hash_all),
        Err(e) => {
            warn!("Failed to build hashing thread pool, using global pool: {}", e);
            hash_all()
        }
    }
}

/// Classify a batch of candidate files.
///
/// Every candidate ends up in exactly one bucket of the report, and each
/// bucket keeps the input order. `existing` holds the identities of files
/// that were accepted before this call; it must have been built with the
/// same identity strategy as `config.identity`.
pub fn validate(
    candidates: &[CandidateFile],
    config: &ValidatorConfig,
    existing: &HashSet<Identity>,
) -> ValidationReport {
    let checks: Vec<Option<RejectionReason>> = candidates
        .iter()
        .map(|file| check_constraints(file, config))
        .collect();

    // Only files that passed size and type checks are hashed
    let survivors: Vec<&CandidateFile> = candidates
        .iter()
        .zip(&checks)
        .filter(|(_, rejection)| rejection.is_none())
        .map(|(file, _)| file)
        .collect();
    let mut identities = compute_identities(&survivors, config).into_iter();

    let mut report = ValidationReport::default();
    let mut accepted: HashSet<Identity> = HashSet::new();

    for (file, rejection) in candidates.iter().zip(checks) {
        if let Some(reason) = rejection {
            debug!("Rejected '{}': {}", file.name, reason);
            report.invalid.push(InvalidFile {
                name: file.name.clone(),
                reason,
            });
            continue;
        }

        // One identity per survivor, consumed in the same order
        let Some(identity) = identities.next() else {
            break;
        };

        let duplicate = if existing.contains(&identity) {
            Some(DuplicateKind::AgainstExisting)
        } else if accepted.contains(&identity) {
            Some(DuplicateKind::WithinBatch)
        } else {
            None
        };

        match duplicate {
            Some(kind) => {
                debug!("Duplicate '{}' ({:?})", file.name, kind);
                report.duplicates.push(DuplicateFile {
                    name: file.name.clone(),
                    kind,
                });
            }
            None => {
                debug!("Accepted '{}' as {}", file.name, identity);
                accepted.insert(identity.clone());
                report.valid.push(ValidFile {
                    file: file.clone(),
                    identity,
                });
            }
        }
    }

    info!(
        "Validated {} files: {} valid, {} duplicate, {} invalid",
        candidates.len(),
        report.valid.len(),
        report.duplicates.len(),
        report.invalid.len()
    );

    report
}
