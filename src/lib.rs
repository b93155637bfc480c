//! An async Rust client for the Luma Dream Machine generation API.
//!
//! This crate submits image and video generations, shapes their payloads for
//! every supported mode, and polls long-running generations until they finish.
//! It is built to sit behind a chat bot: images posted to a chat CDN are
//! re-hosted before submission, and polling yields periodic checkpoints the
//! caller can relay as progress messages.
//!
//! ## Features
//! - Plain, reference, style, character and modification image generation.
//! - Text-to-video, image-to-video and video extension or interpolation.
//! - Validation of weights and mode parameters before any network call.
//! - A resumable poller with checkpoints, bounded retries and a per-kind timeout.
//! - Pluggable image re-hosting, with an ImgBB implementation.
//!
//! ## Example
//!
//! ```no_run
//! use luma_relay::{GenerationRequest, LumaClient, PollOutcome};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let client = LumaClient::new(None)?;
//! let handle = client.submit(&GenerationRequest::image("a cat")).await?;
//!
//! let mut poller = client.poller(&handle);
//! loop {
//!     match poller.wait().await {
//!         PollOutcome::ProgressNotice { elapsed, remote_status } => {
//!             println!("still {} after {}s", remote_status, elapsed.as_secs());
//!         }
//!         PollOutcome::Succeeded { artifact_url, .. } => {
//!             println!("{}", artifact_url);
//!             break;
//!         }
//!         other => {
//!             println!("{:?}", other);
//!             break;
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
mod payload;
pub mod poll;
pub mod rehost;
pub mod request;
pub mod types;

pub use client::LumaClient;
pub use config::Config;
pub use error::{LumaError, RehostError, ValidationError};
pub use poll::{PollConfig, PollOutcome, Poller};
pub use rehost::{is_ephemeral_url, ImageHost, ImgbbHost};
pub use request::{GenerationRequest, MAX_REFERENCE_IMAGES};
pub use types::{
    AspectRatio, Assets, CameraMotion, ExtendMode, GenerationHandle, GenerationKind,
    GenerationList, GenerationState, GenerationStatus, ImageModel, ReferenceImage,
    DEFAULT_MODIFY_WEIGHT, DEFAULT_REFERENCE_WEIGHT,
};
