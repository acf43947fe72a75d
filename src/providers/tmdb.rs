//! TMDB (The Movie Database) image provider.
//!
//! Implements [`RemoteImageProvider`] by querying the TMDB v3 `images`
//! endpoints for movies and series that carry a `tmdb` provider id.
//!
//! Features:
//! - Token-bucket rate limiting at 4 requests / second via [`governor`].
//! - Automatic retry on HTTP 429 with `Retry-After` header support (max 3 retries).
//! - 30-second request timeout.
//! - Candidates ordered by language preference, then community vote.

use std::cmp::Ordering;
use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::Context;
use artsync_common::{ImageType, ItemKind};
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{http, FetchError, FetchedImage, RemoteImageProvider, RemoteImageQuery};
use crate::images::{CatalogEntry, RemoteImageCandidate};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/original";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RETRIES: u32 = 3;
const REQUESTS_PER_SECOND: u32 = 4;

/// Provider id key looked up on the entry.
pub const PROVIDER_ID: &str = "tmdb";

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbImagesResponse {
    posters: Option<Vec<TmdbImage>>,
    backdrops: Option<Vec<TmdbImage>>,
    logos: Option<Vec<TmdbImage>>,
}

#[derive(Debug, Clone, Deserialize)]
struct TmdbImage {
    file_path: String,
    width: u32,
    height: u32,
    iso_639_1: Option<String>,
    #[serde(default)]
    vote_average: f64,
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// TMDB artwork provider.
///
/// # Examples
///
/// ```no_run
/// use artsync::providers::TmdbImageProvider;
///
/// let provider = TmdbImageProvider::new("your-api-key".into(), "en".into()).unwrap();
/// ```
pub struct TmdbImageProvider {
    client: reqwest::Client,
    api_key: String,
    language: String,
    api_base: String,
    image_base: String,
    rate_limiter: DirectRateLimiter,
}

impl TmdbImageProvider {
    /// Create a provider for the public TMDB endpoints.
    ///
    /// `language` is the preferred artwork language as ISO 639-1, e.g. `"en"`.
    pub fn new(api_key: String, language: String) -> anyhow::Result<Self> {
        Self::with_base_urls(api_key, language, TMDB_BASE_URL, TMDB_IMAGE_BASE)
    }

    /// Create a provider talking to custom API and image hosts.
    pub fn with_base_urls(
        api_key: String,
        language: String,
        api_base: &str,
        image_base: &str,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build TMDB HTTP client")?;

        let quota = Quota::per_second(
            NonZeroU32::new(REQUESTS_PER_SECOND).context("rate limit must be non-zero")?,
        );

        Ok(Self {
            client,
            api_key,
            language,
            api_base: api_base.trim_end_matches('/').to_string(),
            image_base: image_base.trim_end_matches('/').to_string(),
            rate_limiter: RateLimiter::direct(quota),
        })
    }

    /// Returns `true` when an API key is configured.
    pub fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Execute a GET request with rate limiting and 429-retry logic.
    async fn get(&self, url: &str) -> anyhow::Result<reqwest::Response> {
        let mut retries = 0u32;
        loop {
            self.rate_limiter.until_ready().await;

            let resp = self
                .client
                .get(url)
                .send()
                .await
                .context("TMDB request failed")?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(
                    retry = retries,
                    wait_secs = wait,
                    "TMDB returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            return resp
                .error_for_status()
                .context("TMDB request returned error");
        }
    }

    /// Build a full API URL with the API key and extra query parameters.
    fn url(&self, path: &str, extra_params: &[(&str, &str)]) -> String {
        let mut url = format!("{}{path}?api_key={}", self.api_base, self.api_key);
        for (key, value) in extra_params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoded(value));
        }
        url
    }

    fn image_url(&self, file_path: &str) -> String {
        format!("{}{file_path}", self.image_base)
    }

    /// Language ordering: preferred language, then language-neutral, then the rest.
    fn language_rank(&self, language: Option<&str>) -> u8 {
        match language {
            Some(l) if l.eq_ignore_ascii_case(&self.language) => 0,
            None => 1,
            Some(_) => 2,
        }
    }

    fn to_candidates(
        &self,
        image_type: ImageType,
        mut images: Vec<TmdbImage>,
    ) -> Vec<RemoteImageCandidate> {
        images.sort_by(|a, b| {
            self.language_rank(a.iso_639_1.as_deref())
                .cmp(&self.language_rank(b.iso_639_1.as_deref()))
                .then_with(|| {
                    b.vote_average
                        .partial_cmp(&a.vote_average)
                        .unwrap_or(Ordering::Equal)
                })
        });

        images
            .into_iter()
            .enumerate()
            .map(|(rank, img)| RemoteImageCandidate {
                image_type,
                url: self.image_url(&img.file_path),
                width: Some(img.width),
                height: Some(img.height),
                language: img.iso_639_1,
                rank,
                provider_name: PROVIDER_ID.to_string(),
            })
            .collect()
    }
}

/// Minimal percent-encoding for query parameter values.
fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0x0f) as usize]));
            }
        }
    }
    out
}

const HEX: [u8; 16] = *b"0123456789ABCDEF";

/// TMDB path segment for an entry kind.
fn media_segment(kind: ItemKind) -> Option<&'static str> {
    match kind {
        ItemKind::Movie => Some("movie"),
        ItemKind::Series => Some("tv"),
        _ => None,
    }
}

#[async_trait]
impl RemoteImageProvider for TmdbImageProvider {
    fn name(&self) -> &'static str {
        PROVIDER_ID
    }

    fn supported_types(&self, entry: &CatalogEntry) -> Vec<ImageType> {
        if !self.is_available() || media_segment(entry.kind).is_none() {
            return Vec::new();
        }
        vec![ImageType::Primary, ImageType::Backdrop, ImageType::Logo]
    }

    async fn candidates(
        &self,
        entry: &CatalogEntry,
        query: &RemoteImageQuery,
    ) -> anyhow::Result<Vec<RemoteImageCandidate>> {
        let (Some(segment), Some(tmdb_id)) = (media_segment(entry.kind), entry.provider_id(PROVIDER_ID))
        else {
            debug!(item_id = %entry.id, "No TMDB id, skipping image lookup");
            return Ok(Vec::new());
        };

        let language = query.language.as_deref().unwrap_or(&self.language);
        let include = format!("{language},null");
        let params: Vec<(&str, &str)> = if query.include_all_languages {
            Vec::new()
        } else {
            vec![("include_image_language", include.as_str())]
        };

        let url = self.url(&format!("/{segment}/{tmdb_id}/images"), &params);
        debug!(item_id = %entry.id, tmdb_id, "TMDB get images");

        let resp: TmdbImagesResponse = self
            .get(&url)
            .await?
            .json()
            .await
            .context("failed to parse TMDB images response")?;

        let mut candidates = Vec::new();
        for (image_type, images) in [
            (ImageType::Primary, resp.posters),
            (ImageType::Backdrop, resp.backdrops),
            (ImageType::Logo, resp.logos),
        ] {
            if query.wants(image_type) {
                candidates.extend(self.to_candidates(image_type, images.unwrap_or_default()));
            }
        }

        Ok(candidates)
    }

    async fn fetch(&self, url: &str) -> Result<FetchedImage, FetchError> {
        http::get_image(&self.client, url).await
    }
}
