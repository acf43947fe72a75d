//! Plain HTTP image download.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::StatusCode;
use tracing::debug;

use super::{FetchError, FetchedImage};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client shared by providers that do not bring their own.
pub fn shared_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default()
    })
}

/// GET `url` and return the body.
pub async fn get_image(client: &reqwest::Client, url: &str) -> Result<FetchedImage, FetchError> {
    debug!(url, "Downloading image");

    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound(url.to_string()));
    }
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let data = resp.bytes().await.map_err(|e| FetchError::Transport {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    Ok(FetchedImage { data, content_type })
}
