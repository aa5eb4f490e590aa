use serde::Serialize;
use std::fmt;

use crate::identity::Identity;
use crate::types::CandidateFile;

/// Why a candidate was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code")]
pub enum RejectionReason {
    /// File is larger than the configured limit
    SizeExceeded { byte_size: u64, limit: u64 },

    /// Media type is not in the allowed list
    TypeNotAllowed { media_type: String },
}

impl RejectionReason {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            RejectionReason::SizeExceeded { .. } => "SizeExceeded",
            RejectionReason::TypeNotAllowed { .. } => "TypeNotAllowed",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::SizeExceeded { byte_size, limit } => write!(
                f,
                "file is {:.1} MiB, the limit is {} MiB",
                *byte_size as f64 / (1024.0 * 1024.0),
                limit / (1024 * 1024)
            ),
            RejectionReason::TypeNotAllowed { media_type } if media_type.is_empty() => {
                write!(f, "file type is unknown")
            }
            RejectionReason::TypeNotAllowed { media_type } => {
                write!(f, "file type '{}' is not allowed", media_type)
            }
        }
    }
}

/// Where a duplicate was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DuplicateKind {
    /// Same identity as a file accepted before this batch
    AgainstExisting,

    /// Same identity as an earlier file of this batch
    WithinBatch,
}

/// A candidate that passed every check
#[derive(Debug, Clone)]
pub struct ValidFile {
    pub file: CandidateFile,
    pub identity: Identity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateFile {
    pub name: String,
    pub kind: DuplicateKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidFile {
    pub name: String,
    pub reason: RejectionReason,
}

/// Outcome of one validator call
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub valid: Vec<ValidFile>,
    pub duplicates: Vec<DuplicateFile>,
    pub invalid: Vec<InvalidFile>,
}

impl ValidationReport {
    /// Number of classified candidates
    pub fn total(&self) -> usize {
        self.valid.len() + self.duplicates.len() + self.invalid.len()
    }

    pub fn duplicate_names(&self) -> Vec<&str> {
        self.duplicates.iter().map(|d| d.name.as_str()).collect()
    }

    /// Whether nothing was rejected or skipped
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty() && self.invalid.is_empty()
    }

    /// One notice per rejection category that occurred, in a fixed order
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = Vec::new();

        for category in [NoticeCategory::SizeExceeded, NoticeCategory::TypeNotAllowed] {
            let names: Vec<String> = self
                .invalid
                .iter()
                .filter(|f| NoticeCategory::of(&f.reason) == category)
                .map(|f| f.name.clone())
                .collect();
            if !names.is_empty() {
                notices.push(Notice { category, names });
            }
        }

        if !self.duplicates.is_empty() {
            notices.push(Notice {
                category: NoticeCategory::Duplicate,
                names: self.duplicates.iter().map(|d| d.name.clone()).collect(),
            });
        }

        notices
    }
}

/// Grouping used to report rejections once per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeCategory {
    SizeExceeded,
    TypeNotAllowed,
    Duplicate,
}

impl NoticeCategory {
    fn of(reason: &RejectionReason) -> Self {
        match reason {
            RejectionReason::SizeExceeded { .. } => NoticeCategory::SizeExceeded,
            RejectionReason::TypeNotAllowed { .. } => NoticeCategory::TypeNotAllowed,
        }
    }
}

/// A user-facing message covering every file of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub category: NoticeCategory,
    pub names: Vec<String>,
}

impl Notice {
    pub fn count(&self) -> usize {
        self.names.len()
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.category {
            NoticeCategory::SizeExceeded => "too large",
            NoticeCategory::TypeNotAllowed => "of an unsupported type",
            NoticeCategory::Duplicate => "already added",
        };
        let noun = if self.count() == 1 { "file" } else { "files" };
        write!(
            f,
            "{} {} {}: {}",
            self.count(),
            noun,
            what,
            self.names.join(", ")
        )
    }
}
