//! Core functionality for staging product listing images.
//!
//! This library provides the client-side logic behind a product image
//! uploader:
//! - File identities (metadata signatures and Blake3 content hashes)
//! - Validation of picked files against size, type and duplicate rules
//! - An image collection that keeps exactly one featured image
//! - Loading and saving a product's images through store traits

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use collection::{AddOutcome, ImageCollection};
pub use config::*;
pub use error::{Error, Result};
pub use types::*;
pub use validation::{validate, ValidationReport};

// -- Public Modules --
pub mod collection;
pub mod config;
pub mod discovery;
pub mod identity;
pub mod logging;
pub mod persistence;
pub mod types;
pub mod validation;
