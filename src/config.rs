use std::env;

use crate::error::LumaError;

/// Process configuration, read once at start and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub luma_api_key: String,
    /// Overrides the Dream Machine API base URL.
    pub luma_base_url: Option<String>,
    /// Enables re-hosting of chat CDN images through ImgBB.
    pub imgbb_api_key: Option<String>,
    pub imgbb_upload_url: Option<String>,
}

impl Config {
    /// Reads configuration from the environment, loading a `.env` file first if one exists.
    ///
    /// # Errors
    ///
    /// - `LumaError::MissingApiKey` if `LUMA_API_KEY` is unset or empty.
    pub fn from_env() -> Result<Self, LumaError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LumaError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            luma_api_key: get("LUMA_API_KEY").ok_or(LumaError::MissingApiKey)?,
            luma_base_url: get("LUMA_BASE_URL"),
            imgbb_api_key: get("IMGBB_API_KEY"),
            imgbb_upload_url: get("IMGBB_UPLOAD_URL"),
        })
    }
}
