//! Artsync-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across artsync:
//!
//! - **Typed IDs**: Type-safe UUID wrapper for catalog items
//! - **Core Types**: Enums for item kinds, image slot types, and image formats
//! - **Path Utilities**: Image extension detection and path comparison helpers
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use artsync_common::{ImageType, ItemId, Error, Result};
//! use artsync_common::paths::is_image_file;
//! use std::path::Path;
//!
//! let item_id = ItemId::new();
//!
//! assert!(ImageType::Backdrop.is_repeatable());
//! assert!(!ImageType::Primary.is_repeatable());
//!
//! assert!(is_image_file(Path::new("poster.jpg")));
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("item"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
