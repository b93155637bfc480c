use std::ops::RangeInclusive;

use crate::error::ValidationError;
use crate::types::{
    AspectRatio, CameraMotion, ExtendMode, GenerationKind, ImageModel, ReferenceImage,
};

/// Most images that may accompany a reference or character request.
pub const MAX_REFERENCE_IMAGES: usize = 4;

const REFERENCE_WEIGHT_RANGE: RangeInclusive<f64> = 0.1..=1.0;
const MODIFY_WEIGHT_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// One generation to submit, covering every mode the API supports.
///
/// Requests are validated by [`GenerationRequest::validate`] before any
/// network call. URLs may point at ephemeral chat hosts; the client re-hosts
/// them before building the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationRequest {
    /// A plain text-to-image generation.
    Image {
        prompt: String,
        aspect_ratio: AspectRatio,
        model: ImageModel,
    },
    /// An image guided by up to four weighted reference images.
    ImageWithRefs {
        prompt: String,
        aspect_ratio: AspectRatio,
        model: ImageModel,
        refs: Vec<ReferenceImage>,
    },
    /// An image matching the style of a single reference.
    ImageWithStyle {
        prompt: String,
        aspect_ratio: AspectRatio,
        model: ImageModel,
        style: ReferenceImage,
    },
    /// An image featuring the character shown in up to four images.
    ImageWithCharacters {
        prompt: String,
        aspect_ratio: AspectRatio,
        model: ImageModel,
        images: Vec<String>,
    },
    /// A modification of an existing image. Low weights (0.1 or less) suit color changes.
    ImageModify {
        prompt: String,
        model: ImageModel,
        image_url: String,
        weight: f64,
    },
    TextToVideo {
        prompt: String,
        aspect_ratio: AspectRatio,
        loop_video: bool,
        camera: Option<CameraMotion>,
    },
    /// A video anchored on a start frame and, optionally, an end frame.
    ImageToVideo {
        prompt: String,
        start_image: String,
        end_image: Option<String>,
        aspect_ratio: AspectRatio,
        loop_video: bool,
        camera: Option<CameraMotion>,
    },
    /// Extends or interpolates previously generated videos.
    VideoExtend {
        prompt: String,
        mode: ExtendMode,
        video_id1: String,
        video_id2: Option<String>,
        image_url: Option<String>,
        camera: Option<CameraMotion>,
    },
}

impl GenerationRequest {
    /// A plain image request with the default aspect ratio and model.
    pub fn image(prompt: impl Into<String>) -> Self {
        GenerationRequest::Image {
            prompt: prompt.into(),
            aspect_ratio: AspectRatio::default(),
            model: ImageModel::default(),
        }
    }

    /// A text-to-video request with the default aspect ratio, no loop and no camera motion.
    pub fn text_to_video(prompt: impl Into<String>) -> Self {
        GenerationRequest::TextToVideo {
            prompt: prompt.into(),
            aspect_ratio: AspectRatio::default(),
            loop_video: false,
            camera: None,
        }
    }

    pub fn kind(&self) -> GenerationKind {
        match self {
            GenerationRequest::Image { .. }
            | GenerationRequest::ImageWithRefs { .. }
            | GenerationRequest::ImageWithStyle { .. }
            | GenerationRequest::ImageWithCharacters { .. }
            | GenerationRequest::ImageModify { .. } => GenerationKind::Image,
            GenerationRequest::TextToVideo { .. }
            | GenerationRequest::ImageToVideo { .. }
            | GenerationRequest::VideoExtend { .. } => GenerationKind::Video,
        }
    }

    /// A short name for the mode, used in logs.
    pub fn mode_name(&self) -> &'static str {
        match self {
            GenerationRequest::Image { .. } => "image",
            GenerationRequest::ImageWithRefs { .. } => "image_with_refs",
            GenerationRequest::ImageWithStyle { .. } => "image_with_style",
            GenerationRequest::ImageWithCharacters { .. } => "image_with_characters",
            GenerationRequest::ImageModify { .. } => "image_modify",
            GenerationRequest::TextToVideo { .. } => "text_to_video",
            GenerationRequest::ImageToVideo { .. } => "image_to_video",
            GenerationRequest::VideoExtend { .. } => "video_extend",
        }
    }

    /// Checks weights, image counts and per-mode companion parameters.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            GenerationRequest::Image { .. } | GenerationRequest::TextToVideo { .. } => Ok(()),
            GenerationRequest::ImageWithRefs { refs, .. } => {
                check_count(refs.len())?;
                refs.iter().try_for_each(|r| {
                    check_url(&r.url)?;
                    check_weight(r.weight, &REFERENCE_WEIGHT_RANGE)
                })
            }
            GenerationRequest::ImageWithStyle { style, .. } => {
                check_url(&style.url)?;
                check_weight(style.weight, &REFERENCE_WEIGHT_RANGE)
            }
            GenerationRequest::ImageWithCharacters { images, .. } => {
                check_count(images.len())?;
                images.iter().try_for_each(|url| check_url(url))
            }
            GenerationRequest::ImageModify {
                image_url, weight, ..
            } => {
                check_url(image_url)?;
                check_weight(*weight, &MODIFY_WEIGHT_RANGE)
            }
            GenerationRequest::ImageToVideo {
                start_image,
                end_image,
                ..
            } => {
                check_url(start_image)?;
                end_image.as_deref().map_or(Ok(()), check_url)
            }
            GenerationRequest::VideoExtend {
                mode,
                video_id1,
                video_id2,
                image_url,
                ..
            } => {
                if video_id1.trim().is_empty() {
                    return Err(ValidationError::MissingVideoId);
                }
                if mode.requires_image() && is_blank(image_url) {
                    return Err(ValidationError::MissingImage {
                        mode: mode.as_str(),
                    });
                }
                if *mode == ExtendMode::Interpolate && is_blank(video_id2) {
                    return Err(ValidationError::MissingSecondVideo);
                }
                Ok(())
            }
        }
    }
}

fn check_weight(weight: f64, range: &RangeInclusive<f64>) -> Result<(), ValidationError> {
    // NaN fails `contains`, so it is rejected too.
    if range.contains(&weight) {
        Ok(())
    } else {
        Err(ValidationError::WeightOutOfRange {
            weight,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

fn check_count(count: usize) -> Result<(), ValidationError> {
    match count {
        0 => Err(ValidationError::NoImages),
        n if n > MAX_REFERENCE_IMAGES => Err(ValidationError::TooManyImages {
            count: n,
            max: MAX_REFERENCE_IMAGES,
        }),
        _ => Ok(()),
    }
}

fn check_url(url: &str) -> Result<(), ValidationError> {
    if url.trim().is_empty() {
        Err(ValidationError::BlankImageUrl)
    } else {
        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
