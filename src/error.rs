use crate::types::GenerationState;

#[derive(Debug, thiserror::Error)]
pub enum LumaError {
    #[error("API key is missing. Please provide it or set the LUMA_API_KEY environment variable.")]
    MissingApiKey,
    #[error("API key contains characters that are not valid in an HTTP header")]
    InvalidApiKey(#[from] reqwest::header::InvalidHeaderValue),
    #[error("Network request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Failed to parse API response: {0}")]
    ResponseParseFailed(#[from] serde_json::Error),
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("URL parsing failed: {0}")]
    UrlParseFailed(#[from] url::ParseError),
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),
    #[error("Image re-hosting failed: {0}")]
    Rehost(#[from] RehostError),
    #[error("Generation {generation_id} must be completed first (current state: {state})")]
    NotCompleted {
        generation_id: String,
        state: GenerationState,
    },
}

/// Rejections raised before any network call is made.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("weight {weight} is outside the allowed range {min} to {max}")]
    WeightOutOfRange { weight: f64, min: f64, max: f64 },
    #[error("at least one image is required")]
    NoImages,
    #[error("{count} images supplied, at most {max} are allowed")]
    TooManyImages { count: usize, max: usize },
    #[error("a source video id is required")]
    MissingVideoId,
    #[error("extension mode `{mode}` requires an image URL")]
    MissingImage { mode: &'static str },
    #[error("interpolation requires a second video id")]
    MissingSecondVideo,
    #[error("image URL must not be empty")]
    BlankImageUrl,
    #[error("`{0}` is not a valid generation id")]
    InvalidGenerationId(String),
    #[error("unknown {kind} `{value}`")]
    UnknownOption { kind: &'static str, value: String },
}

#[derive(Debug, thiserror::Error)]
pub enum RehostError {
    #[error("URL {0} is on an ephemeral host but no image host is configured")]
    NotConfigured(String),
    #[error("failed to download source image: status {status}")]
    Download { status: u16 },
    #[error("image host rejected the upload: status {status}")]
    Upload { status: u16 },
    #[error("image host request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("image host returned an unexpected response: {0}")]
    InvalidResponse(String),
}
