//! Artsync - Image reconciliation for media catalog entries
//!
//! Given a catalog entry and a set of image providers, artsync makes the
//! entry's image references match what exists on disk and what the providers
//! offer, within the capacity configured for the entry's kind.
//!
//! - [`images`]: the reference model, validation, local merge and storage
//! - [`providers`]: the three provider capabilities and their registry
//! - [`refresh`]: the per-entry refresh pass
//! - [`scan`]: concurrent passes over a whole library

pub mod config;
pub mod directory;
pub mod images;
pub mod providers;
pub mod refresh;
pub mod scan;
