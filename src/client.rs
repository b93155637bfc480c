use std::env;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::error::{LumaError, RehostError, ValidationError};
use crate::payload::GenerationPayload;
use crate::poll::{PollConfig, PollOutcome, Poller};
use crate::rehost::{is_ephemeral_url, ImageHost, ImgbbHost};
use crate::request::GenerationRequest;
use crate::types::{
    GenerationHandle, GenerationList, GenerationState, GenerationStatus, SubmitResponse,
};

const DEFAULT_API_URL: &str = "https://api.lumalabs.ai/dream-machine/v1/";

/// The main client for interacting with the Dream Machine API.
///
/// It holds the shared `reqwest::Client`, the base URL for all API requests
/// and the optional image host used to re-host chat CDN images.
/// It is designed to be cloneable and safe to share across tasks.
#[derive(Clone)]
pub struct LumaClient {
    client: reqwest::Client,
    base_url: Url,
    image_host: Option<Arc<dyn ImageHost>>,
}

impl LumaClient {
    /// Creates a new `LumaClient`.
    ///
    /// This method initializes the client with an API key. It first checks for the `api_key`
    /// parameter. If it's `None`, it falls back to the `LUMA_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// - `LumaError::MissingApiKey` if the API key is not provided in either way.
    /// - `LumaError::RequestFailed` if the internal HTTP client fails to build.
    pub fn new(api_key: Option<String>) -> Result<Self, LumaError> {
        let Some(key) = api_key.or_else(|| env::var("LUMA_API_KEY").ok()) else {
            return Err(LumaError::MissingApiKey);
        };
        Self::new_with_url(key, DEFAULT_API_URL)
    }

    /// Creates a new `LumaClient` with a custom base URL.
    ///
    /// This is useful for testing or for connecting to a proxy of the API.
    /// A missing trailing slash is added so endpoint paths join below the base.
    ///
    /// # Errors
    ///
    /// - `LumaError::InvalidApiKey` if the key cannot be sent as a header.
    /// - `LumaError::RequestFailed` if the internal HTTP client fails to build.
    /// - `LumaError::UrlParseFailed` if the provided `base_url` is invalid.
    pub fn new_with_url(api_key: String, base_url: &str) -> Result<Self, LumaError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };

        Ok(Self {
            client,
            base_url,
            image_host: None,
        })
    }

    /// Creates a client from process configuration, wiring ImgBB re-hosting when a key is set.
    pub fn from_config(config: &Config) -> Result<Self, LumaError> {
        let base_url = config.luma_base_url.as_deref().unwrap_or(DEFAULT_API_URL);
        let client = Self::new_with_url(config.luma_api_key.clone(), base_url)?;

        Ok(match &config.imgbb_api_key {
            Some(key) => {
                let host = match &config.imgbb_upload_url {
                    Some(upload_url) => ImgbbHost::new_with_url(key.clone(), upload_url.clone()),
                    None => ImgbbHost::new(key.clone()),
                };
                client.with_image_host(Arc::new(host))
            }
            None => client,
        })
    }

    /// Sets the host used to re-host images on ephemeral chat CDNs.
    pub fn with_image_host(mut self, host: Arc<dyn ImageHost>) -> Self {
        self.image_host = Some(host);
        self
    }

    /// Submits a generation.
    ///
    /// The request is validated first, then every ephemeral image URL it uses is
    /// re-hosted in order. Any failure along the way aborts the submission before
    /// the generation endpoint is contacted. Non-2xx responses are never retried.
    ///
    /// # Returns
    ///
    /// A [`GenerationHandle`] carrying the id to poll.
    pub async fn submit(&self, request: &GenerationRequest) -> Result<GenerationHandle, LumaError> {
        request.validate()?;
        let resolved = self.resolve_urls(request).await?;
        let payload = GenerationPayload::from_request(&resolved);
        let kind = request.kind();

        let url = self.base_url.join(kind.endpoint())?;
        debug!(
            mode = request.mode_name(),
            %url,
            ?payload,
            "submitting generation"
        );

        let response = self.client.post(url).json(&payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(mode = request.mode_name(), status = status.as_u16(), "submission rejected");
            return Err(LumaError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let accepted: SubmitResponse = serde_json::from_str(&body)?;
        info!(
            mode = request.mode_name(),
            generation_id = %accepted.id,
            state = %accepted.state,
            "generation submitted"
        );
        Ok(GenerationHandle {
            id: accepted.id,
            state: accepted.state,
            kind,
        })
    }

    /// Retrieves the status of a generation.
    ///
    /// This is the query behind every poll cycle. The id is sent as a single
    /// percent-encoded path segment.
    ///
    /// # Errors
    ///
    /// - `LumaError::Validation` if the id is blank, `.` or `..`.
    pub async fn get_generation(
        &self,
        generation_id: &str,
    ) -> Result<GenerationStatus, LumaError> {
        let url = self.generation_url(generation_id)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(generation_id, status = status.as_u16(), %body, "status response");

        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(LumaError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Lists the account's generations, newest first.
    pub async fn list_generations(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<GenerationList, LumaError> {
        let url = self.base_url.join("generations")?;
        let response = self
            .client
            .get(url)
            .query(&[("limit", limit), ("offset", offset)])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(LumaError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Checks that the videos an extension request builds on have completed.
    ///
    /// The first and second video are queried one after the other. Requests of
    /// any other mode pass without a query.
    ///
    /// # Errors
    ///
    /// - `LumaError::NotCompleted` naming the first video that is not finished.
    pub async fn verify_extension_sources(
        &self,
        request: &GenerationRequest,
    ) -> Result<(), LumaError> {
        let GenerationRequest::VideoExtend {
            video_id1,
            video_id2,
            ..
        } = request
        else {
            return Ok(());
        };

        for id in std::iter::once(video_id1).chain(video_id2.iter()) {
            let status = self.get_generation(id).await?;
            if status.state != GenerationState::Completed {
                return Err(LumaError::NotCompleted {
                    generation_id: id.clone(),
                    state: status.state,
                });
            }
        }
        Ok(())
    }

    /// A poller for `handle` with the default limits for its kind.
    pub fn poller(&self, handle: &GenerationHandle) -> Poller<'_> {
        self.poller_with_config(handle, PollConfig::for_kind(handle.kind))
    }

    pub fn poller_with_config(&self, handle: &GenerationHandle, config: PollConfig) -> Poller<'_> {
        Poller::new(self, handle, config)
    }

    /// Waits for a generation to finish, handing every checkpoint to `on_checkpoint`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use luma_relay::{GenerationRequest, LumaClient, PollOutcome};
    /// # #[tokio::main]
    /// # async fn main() -> anyhow::Result<()> {
    /// let client = LumaClient::new(Some("your_api_key".to_string()))?;
    /// let handle = client.submit(&GenerationRequest::image("a cat")).await?;
    /// let outcome = client
    ///     .wait_for_generation(&handle, |checkpoint| println!("{:?}", checkpoint))
    ///     .await;
    /// if let PollOutcome::Succeeded { artifact_url, .. } = outcome {
    ///     println!("done: {}", artifact_url);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn wait_for_generation<F>(
        &self,
        handle: &GenerationHandle,
        mut on_checkpoint: F,
    ) -> PollOutcome
    where
        F: FnMut(&PollOutcome),
    {
        let mut poller = self.poller(handle);
        loop {
            let outcome = poller.wait().await;
            if outcome.is_terminal() {
                return outcome;
            }
            on_checkpoint(&outcome);
        }
    }

    /// `generations/{id}` below the base URL, with `id` as one encoded segment.
    fn generation_url(&self, generation_id: &str) -> Result<Url, LumaError> {
        if matches!(generation_id.trim(), "" | "." | "..") {
            return Err(ValidationError::InvalidGenerationId(generation_id.to_string()).into());
        }
        let mut url = self.base_url.join("generations/")?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push(generation_id);
        Ok(url)
    }

    /// Returns a copy of `request` whose ephemeral URLs are replaced by durable ones.
    async fn resolve_urls(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationRequest, LumaError> {
        let mut resolved = request.clone();
        match &mut resolved {
            GenerationRequest::Image { .. } | GenerationRequest::TextToVideo { .. } => {}
            GenerationRequest::ImageWithRefs { refs, .. } => {
                for reference in refs.iter_mut() {
                    reference.url = self.durable_url(&reference.url).await?;
                }
            }
            GenerationRequest::ImageWithStyle { style, .. } => {
                style.url = self.durable_url(&style.url).await?;
            }
            GenerationRequest::ImageWithCharacters { images, .. } => {
                for image in images.iter_mut() {
                    *image = self.durable_url(image).await?;
                }
            }
            GenerationRequest::ImageModify { image_url, .. } => {
                *image_url = self.durable_url(image_url).await?;
            }
            GenerationRequest::ImageToVideo {
                start_image,
                end_image,
                ..
            } => {
                *start_image = self.durable_url(start_image).await?;
                if let Some(end) = end_image {
                    *end = self.durable_url(end).await?;
                }
            }
            GenerationRequest::VideoExtend {
                mode, image_url, ..
            } => {
                // Only modes with an image keyframe send the image.
                if let (true, Some(url)) = (mode.requires_image(), image_url) {
                    *url = self.durable_url(url).await?;
                }
            }
        }
        Ok(resolved)
    }

    async fn durable_url(&self, url: &str) -> Result<String, LumaError> {
        if !is_ephemeral_url(url) {
            return Ok(url.to_string());
        }
        let host = self
            .image_host
            .as_ref()
            .ok_or_else(|| RehostError::NotConfigured(url.to_string()))?;

        debug!(source = url, "re-hosting ephemeral image");
        match host.rehost(url).await {
            Ok(durable) => Ok(durable),
            Err(err) => {
                warn!(source = url, error = %err, "re-hosting failed");
                Err(err.into())
            }
        }
    }
}
