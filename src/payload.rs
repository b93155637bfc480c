use std::borrow::Cow;

use serde::Serialize;

use crate::request::GenerationRequest;
use crate::types::{AspectRatio, CameraMotion, ExtendMode, ImageModel, ReferenceImage};

/// (Internal) The JSON body sent to a generation endpoint.
///
/// Every mode is a subset of these fields; absent fields are omitted.
#[derive(Serialize, Debug)]
pub(crate) struct GenerationPayload<'a> {
    pub(crate) prompt: Cow<'a, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) aspect_ratio: Option<AspectRatio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) model: Option<ImageModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) image_ref: Option<&'a [ReferenceImage]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) style_ref: Option<[&'a ReferenceImage; 1]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) character_ref: Option<CharacterRef<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) modify_image_ref: Option<ReferenceImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) keyframes: Option<Keyframes<'a>>,
    #[serde(rename = "loop", skip_serializing_if = "Option::is_none")]
    pub(crate) loop_video: Option<bool>,
}

#[derive(Serialize, Debug)]
pub(crate) struct CharacterRef<'a> {
    pub(crate) identity0: Identity<'a>,
}

#[derive(Serialize, Debug)]
pub(crate) struct Identity<'a> {
    pub(crate) images: &'a [String],
}

#[derive(Serialize, Debug)]
pub(crate) struct Keyframes<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) frame0: Option<Keyframe<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) frame1: Option<Keyframe<'a>>,
}

/// A keyframe source: a still image or the output of an earlier generation.
#[derive(Serialize, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum Keyframe<'a> {
    Image { url: &'a str },
    Generation { id: &'a str },
}

impl<'a> GenerationPayload<'a> {
    fn new(prompt: Cow<'a, str>) -> Self {
        Self {
            prompt,
            aspect_ratio: None,
            model: None,
            image_ref: None,
            style_ref: None,
            character_ref: None,
            modify_image_ref: None,
            keyframes: None,
            loop_video: None,
        }
    }

    /// Shapes a validated request whose URLs have already been made durable.
    pub(crate) fn from_request(request: &'a GenerationRequest) -> Self {
        match request {
            GenerationRequest::Image {
                prompt,
                aspect_ratio,
                model,
            } => Self {
                aspect_ratio: Some(*aspect_ratio),
                model: Some(*model),
                ..Self::new(Cow::Borrowed(prompt.as_str()))
            },
            GenerationRequest::ImageWithRefs {
                prompt,
                aspect_ratio,
                model,
                refs,
            } => Self {
                aspect_ratio: Some(*aspect_ratio),
                model: Some(*model),
                image_ref: Some(refs.as_slice()),
                ..Self::new(Cow::Borrowed(prompt.as_str()))
            },
            GenerationRequest::ImageWithStyle {
                prompt,
                aspect_ratio,
                model,
                style,
            } => Self {
                aspect_ratio: Some(*aspect_ratio),
                model: Some(*model),
                style_ref: Some([style]),
                ..Self::new(Cow::Borrowed(prompt.as_str()))
            },
            GenerationRequest::ImageWithCharacters {
                prompt,
                aspect_ratio,
                model,
                images,
            } => Self {
                aspect_ratio: Some(*aspect_ratio),
                model: Some(*model),
                character_ref: Some(CharacterRef {
                    identity0: Identity {
                        images: images.as_slice(),
                    },
                }),
                ..Self::new(Cow::Borrowed(prompt.as_str()))
            },
            GenerationRequest::ImageModify {
                prompt,
                model,
                image_url,
                weight,
            } => Self {
                model: Some(*model),
                modify_image_ref: Some(ReferenceImage::new(image_url.clone(), *weight)),
                ..Self::new(Cow::Borrowed(prompt.as_str()))
            },
            GenerationRequest::TextToVideo {
                prompt,
                aspect_ratio,
                loop_video,
                camera,
            } => Self {
                aspect_ratio: Some(*aspect_ratio),
                loop_video: Some(*loop_video),
                ..Self::new(with_camera(prompt, *camera))
            },
            GenerationRequest::ImageToVideo {
                prompt,
                start_image,
                end_image,
                aspect_ratio,
                loop_video,
                camera,
            } => Self {
                aspect_ratio: Some(*aspect_ratio),
                loop_video: Some(*loop_video),
                keyframes: Some(Keyframes {
                    frame0: Some(Keyframe::Image {
                        url: start_image.as_str(),
                    }),
                    frame1: end_image.as_deref().map(|url| Keyframe::Image { url }),
                }),
                ..Self::new(with_camera(prompt, *camera))
            },
            GenerationRequest::VideoExtend {
                prompt,
                mode,
                video_id1,
                video_id2,
                image_url,
                camera,
            } => Self {
                keyframes: Some(extension_keyframes(
                    *mode,
                    video_id1,
                    video_id2.as_deref(),
                    image_url.as_deref(),
                )),
                ..Self::new(with_camera(prompt, *camera))
            },
        }
    }
}

fn with_camera(prompt: &str, camera: Option<CameraMotion>) -> Cow<'_, str> {
    match camera {
        Some(motion) => Cow::Owned(format!("{}{}", motion.phrase(), prompt)),
        None => Cow::Borrowed(prompt),
    }
}

/// Slot population per extension mode. Companion values are guaranteed by validation.
fn extension_keyframes<'a>(
    mode: ExtendMode,
    video_id1: &'a str,
    video_id2: Option<&'a str>,
    image_url: Option<&'a str>,
) -> Keyframes<'a> {
    let source = Keyframe::Generation { id: video_id1 };
    let image = image_url.map(|url| Keyframe::Image { url });
    match mode {
        ExtendMode::Extend => Keyframes {
            frame0: Some(source),
            frame1: None,
        },
        ExtendMode::Reverse => Keyframes {
            frame0: None,
            frame1: Some(source),
        },
        ExtendMode::ExtendEnd => Keyframes {
            frame0: Some(source),
            frame1: image,
        },
        ExtendMode::ReverseStart => Keyframes {
            frame0: image,
            frame1: Some(source),
        },
        ExtendMode::Interpolate => Keyframes {
            frame0: Some(source),
            frame1: video_id2.map(|id| Keyframe::Generation { id }),
        },
    }
}
