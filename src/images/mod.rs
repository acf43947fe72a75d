//! Image slot model, local reconciliation and storage.
//!
//! [`validate_images`] and [`merge_images`] fold what is on disk into an
//! entry's references. [`ImageStore`] persists downloaded bytes and assigns
//! their final paths.

mod candidate;
mod merge;
mod model;
mod storage;
mod validate;

pub use candidate::{
    DynamicImageResult, DynamicImageSource, LocalImageCandidate, RemoteImageCandidate,
};
pub use merge::merge_images;
pub use model::{CatalogEntry, ImageReference, ImageSlots};
pub use storage::{FsImageStore, ImageStore, SaveImageRequest};
pub use validate::{validate_images, Validation};
