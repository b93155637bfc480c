//! Re-hosting of images whose URLs expire with the chat session that produced them.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::RehostError;

const DEFAULT_IMGBB_URL: &str = "https://api.imgbb.com/1/upload";

static EPHEMERAL_HOST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(cdn\.discordapp\.com|media\.discordapp\.net)$").unwrap()
});

/// Returns `true` when `url` is served by a chat CDN whose links expire.
///
/// Hosts written in fully qualified form (`cdn.discordapp.com.`) match too.
/// Unparseable URLs are treated as durable and left for the API to reject.
pub fn is_ephemeral_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    parsed.host_str().is_some_and(|host| {
        let host = host.strip_suffix('.').unwrap_or(host);
        EPHEMERAL_HOST_RE.is_match(host)
    })
}

/// Turns an image into a publicly fetchable, durable URL.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Uploads raw image bytes and returns their public URL.
    async fn upload(&self, image: &[u8]) -> Result<String, RehostError>;

    /// Fetches the image at `source_url` and uploads it.
    async fn rehost(&self, source_url: &str) -> Result<String, RehostError>;
}

/// An [`ImageHost`] backed by the ImgBB upload API.
#[derive(Clone)]
pub struct ImgbbHost {
    client: reqwest::Client,
    api_key: String,
    upload_url: String,
}

#[derive(Deserialize)]
struct ImgbbResponse {
    data: ImgbbImage,
}

#[derive(Deserialize)]
struct ImgbbImage {
    url: String,
}

impl ImgbbHost {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::new_with_url(api_key, DEFAULT_IMGBB_URL)
    }

    /// Creates a host that uploads to a custom endpoint, e.g. a mock server.
    pub fn new_with_url(api_key: impl Into<String>, upload_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            upload_url: upload_url.into(),
        }
    }
}

#[async_trait]
impl ImageHost for ImgbbHost {
    async fn upload(&self, image: &[u8]) -> Result<String, RehostError> {
        let encoded = general_purpose::STANDARD.encode(image);
        let form = [("key", self.api_key.as_str()), ("image", encoded.as_str())];

        let response = self
            .client
            .post(&self.upload_url)
            .form(&form)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(RehostError::Upload {
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: ImgbbResponse = serde_json::from_str(&body)
            .map_err(|e| RehostError::InvalidResponse(e.to_string()))?;
        debug!(url = %parsed.data.url, "image uploaded to ImgBB");
        Ok(parsed.data.url)
    }

    async fn rehost(&self, source_url: &str) -> Result<String, RehostError> {
        let response = self.client.get(source_url).send().await?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(RehostError::Download {
                status: response.status().as_u16(),
            });
        }
        let bytes = response.bytes().await?;
        debug!(source = source_url, size = bytes.len(), "downloaded image for re-hosting");
        self.upload(&bytes).await
    }
}
