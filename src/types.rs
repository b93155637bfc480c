use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Weight applied to a reference image when none is given.
pub const DEFAULT_REFERENCE_WEIGHT: f64 = 0.85;

/// Weight applied to an image modification when none is given.
pub const DEFAULT_MODIFY_WEIGHT: f64 = 0.45;

/// Output aspect ratio of an image or video.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "4:3")]
    Landscape,
    #[default]
    #[serde(rename = "16:9")]
    Wide,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Wide => "16:9",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = ValidationError;

    /// Accepts either the wire form (`"16:9"`) or the chat choice name (`"wide"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1:1" | "square" => Ok(AspectRatio::Square),
            "3:4" | "portrait" => Ok(AspectRatio::Portrait),
            "4:3" | "landscape" => Ok(AspectRatio::Landscape),
            "16:9" | "wide" => Ok(AspectRatio::Wide),
            other => Err(ValidationError::UnknownOption {
                kind: "aspect ratio",
                value: other.to_string(),
            }),
        }
    }
}

/// Image model used by the image generation endpoint.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
pub enum ImageModel {
    /// Higher quality, slower.
    #[default]
    #[serde(rename = "photon-1")]
    Photon1,
    #[serde(rename = "photon-flash-1")]
    PhotonFlash1,
}

impl ImageModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageModel::Photon1 => "photon-1",
            ImageModel::PhotonFlash1 => "photon-flash-1",
        }
    }
}

impl fmt::Display for ImageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageModel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "photon-1" => Ok(ImageModel::Photon1),
            "photon-flash-1" => Ok(ImageModel::PhotonFlash1),
            other => Err(ValidationError::UnknownOption {
                kind: "model",
                value: other.to_string(),
            }),
        }
    }
}

/// A camera movement, expressed to the video model as a prompt prefix.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CameraMotion {
    OrbitLeft,
    OrbitRight,
    ZoomIn,
    ZoomOut,
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    DollyIn,
    DollyOut,
}

impl CameraMotion {
    /// The phrase prepended to the prompt, including its trailing separator.
    pub fn phrase(&self) -> &'static str {
        match self {
            CameraMotion::OrbitLeft => "camera orbit left, ",
            CameraMotion::OrbitRight => "camera orbit right, ",
            CameraMotion::ZoomIn => "camera zoom in, ",
            CameraMotion::ZoomOut => "camera zoom out, ",
            CameraMotion::PanLeft => "camera pan left, ",
            CameraMotion::PanRight => "camera pan right, ",
            CameraMotion::PanUp => "camera pan up, ",
            CameraMotion::PanDown => "camera pan down, ",
            CameraMotion::DollyIn => "camera dolly in, ",
            CameraMotion::DollyOut => "camera dolly out, ",
        }
    }
}

impl FromStr for CameraMotion {
    type Err = ValidationError;

    /// Parses names like `"Dolly In"`, `"dolly_in"` or `"dolly-in"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();
        match normalized.as_str() {
            "orbitleft" => Ok(CameraMotion::OrbitLeft),
            "orbitright" => Ok(CameraMotion::OrbitRight),
            "zoomin" => Ok(CameraMotion::ZoomIn),
            "zoomout" => Ok(CameraMotion::ZoomOut),
            "panleft" => Ok(CameraMotion::PanLeft),
            "panright" => Ok(CameraMotion::PanRight),
            "panup" => Ok(CameraMotion::PanUp),
            "pandown" => Ok(CameraMotion::PanDown),
            "dollyin" => Ok(CameraMotion::DollyIn),
            "dollyout" => Ok(CameraMotion::DollyOut),
            _ => Err(ValidationError::UnknownOption {
                kind: "camera motion",
                value: s.to_string(),
            }),
        }
    }
}

/// How an existing video is extended.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ExtendMode {
    /// Continue forward from the end of the video.
    Extend,
    /// Add content before the start of the video.
    Reverse,
    /// Continue forward until reaching a given end image.
    ExtendEnd,
    /// Lead into the video from a given start image.
    ReverseStart,
    /// Transition from one video into another.
    Interpolate,
}

impl ExtendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtendMode::Extend => "extend",
            ExtendMode::Reverse => "reverse",
            ExtendMode::ExtendEnd => "extend_end",
            ExtendMode::ReverseStart => "reverse_start",
            ExtendMode::Interpolate => "interpolate",
        }
    }

    pub fn requires_image(&self) -> bool {
        matches!(self, ExtendMode::ExtendEnd | ExtendMode::ReverseStart)
    }
}

impl fmt::Display for ExtendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtendMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "extend" => Ok(ExtendMode::Extend),
            "reverse" => Ok(ExtendMode::Reverse),
            "extend_end" => Ok(ExtendMode::ExtendEnd),
            "reverse_start" => Ok(ExtendMode::ReverseStart),
            "interpolate" => Ok(ExtendMode::Interpolate),
            other => Err(ValidationError::UnknownOption {
                kind: "extension mode",
                value: other.to_string(),
            }),
        }
    }
}

/// A reference image and how strongly it should influence the output.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ReferenceImage {
    pub url: String,
    pub weight: f64,
}

impl ReferenceImage {
    pub fn new(url: impl Into<String>, weight: f64) -> Self {
        Self {
            url: url.into(),
            weight,
        }
    }

    /// A reference carrying [`DEFAULT_REFERENCE_WEIGHT`].
    pub fn with_default_weight(url: impl Into<String>) -> Self {
        Self::new(url, DEFAULT_REFERENCE_WEIGHT)
    }
}

/// Whether a generation produces an image or a video.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum GenerationKind {
    Image,
    Video,
}

impl GenerationKind {
    /// Endpoint path, relative to the API base URL, used for submission.
    pub(crate) fn endpoint(&self) -> &'static str {
        match self {
            GenerationKind::Image => "generations/image",
            GenerationKind::Video => "generations",
        }
    }
}

/// The lifecycle state reported by the remote API.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum GenerationState {
    Queued,
    Dreaming,
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationState::Queued => "queued",
            GenerationState::Dreaming => "dreaming",
            GenerationState::Processing => "processing",
            GenerationState::Completed => "completed",
            GenerationState::Failed => "failed",
            GenerationState::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Identifies a submitted generation. Its id is the only key used for status queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationHandle {
    pub id: String,
    pub state: GenerationState,
    pub kind: GenerationKind,
}

/// (Internal) The body returned when a generation is accepted.
#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResponse {
    pub(crate) id: String,
    #[serde(default = "default_submitted_state")]
    pub(crate) state: GenerationState,
}

fn default_submitted_state() -> GenerationState {
    GenerationState::Queued
}

/// Output media of a generation.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Assets {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
}

/// The status and outputs of a generation as reported by the API.
#[derive(Debug, Deserialize, Clone)]
pub struct GenerationStatus {
    pub id: String,
    pub state: GenerationState,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assets: Option<Assets>,
}

impl GenerationStatus {
    /// The finished asset for the given kind of generation, if present.
    pub fn artifact_url(&self, kind: GenerationKind) -> Option<&str> {
        let assets = self.assets.as_ref()?;
        match kind {
            GenerationKind::Image => assets.image.as_deref(),
            GenerationKind::Video => assets.video.as_deref(),
        }
    }
}

/// A page of generations belonging to the account.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct GenerationList {
    #[serde(default)]
    pub generations: Vec<GenerationStatus>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_accepts_choice_names() {
        assert_eq!("wide".parse::<AspectRatio>(), Ok(AspectRatio::Wide));
        assert_eq!("3:4".parse::<AspectRatio>(), Ok(AspectRatio::Portrait));
        assert!("2:1".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn camera_motion_ignores_separators() {
        assert_eq!("Dolly In".parse::<CameraMotion>(), Ok(CameraMotion::DollyIn));
        assert_eq!("pan_up".parse::<CameraMotion>(), Ok(CameraMotion::PanUp));
        assert_eq!(CameraMotion::OrbitLeft.phrase(), "camera orbit left, ");
    }

    #[test]
    fn unrecognized_state_is_unknown() {
        let body = r#"{"id":"g","state":"sleeping","assets":{"video":"v.mp4"}}"#;
        let status: GenerationStatus = serde_json::from_str(body).unwrap();
        assert_eq!(status.state, GenerationState::Unknown);
        assert_eq!(status.artifact_url(GenerationKind::Video), Some("v.mp4"));
        assert_eq!(status.artifact_url(GenerationKind::Image), None);
    }
}
