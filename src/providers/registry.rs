//! Provider registry for managing [`ImageProvider`] implementations.
//!
//! The [`ProviderRegistry`] keeps providers in registration order. That order
//! is the priority order used within each capability during a refresh pass.

use std::sync::Arc;

use artsync_common::ImageType;

use super::{DynamicImageProvider, ImageProvider, LocalImageProvider, RemoteImageProvider};
use crate::images::CatalogEntry;

/// An ordered set of image providers.
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use artsync::providers::{FolderImageProvider, ProviderRegistry};
///
/// let mut registry = ProviderRegistry::new();
/// registry.register_local(Arc::new(FolderImageProvider::new()));
///
/// let providers = registry.for_entry(&entry, &[ImageType::Primary]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<ImageProvider>,
}

impl ProviderRegistry {
    /// Create an empty registry with no providers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider at the end of the priority order.
    pub fn register(&mut self, provider: ImageProvider) {
        self.providers.push(provider);
    }

    pub fn register_local(&mut self, provider: Arc<dyn LocalImageProvider>) {
        self.register(ImageProvider::Local(provider));
    }

    pub fn register_dynamic(&mut self, provider: Arc<dyn DynamicImageProvider>) {
        self.register(ImageProvider::Dynamic(provider));
    }

    pub fn register_remote(&mut self, provider: Arc<dyn RemoteImageProvider>) {
        self.register(ImageProvider::Remote(provider));
    }

    /// Every registered provider, in registration order.
    pub fn all(&self) -> &[ImageProvider] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Look up a provider by its name.
    pub fn get(&self, name: &str) -> Option<&ImageProvider> {
        self.providers.iter().find(|p| p.name() == name)
    }

    /// Providers that apply to `entry` for at least one of `types`.
    pub fn for_entry(&self, entry: &CatalogEntry, types: &[ImageType]) -> Vec<ImageProvider> {
        self.providers
            .iter()
            .filter(|p| p.supports(entry, types))
            .cloned()
            .collect()
    }
}
