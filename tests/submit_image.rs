mod common;

use common::{accepted, client_for, client_with_host, request_count, FakeHost, DISCORD_URL};
use luma_relay::{
    AspectRatio, GenerationKind, GenerationRequest, GenerationState, ImageModel, LumaError,
    ReferenceImage, RehostError, ValidationError,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_plain_image_submission() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generations/image"))
        .and(body_json(json!({
            "prompt": "a cat",
            "aspect_ratio": "1:1",
            "model": "photon-1"
        })))
        .respond_with(accepted("gen_1"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = GenerationRequest::Image {
        prompt: "a cat".into(),
        aspect_ratio: AspectRatio::Square,
        model: ImageModel::Photon1,
    };
    let handle = client.submit(&request).await.unwrap();

    assert_eq!(handle.id, "gen_1");
    assert_eq!(handle.state, GenerationState::Queued);
    assert_eq!(handle.kind, GenerationKind::Image);
}

#[tokio::test]
async fn test_reference_images_are_rehosted_in_order() {
    let server = MockServer::start().await;
    let host = FakeHost::new();

    Mock::given(method("POST"))
        .and(path("/generations/image"))
        .and(body_json(json!({
            "prompt": "similar style",
            "aspect_ratio": "16:9",
            "model": "photon-flash-1",
            "image_ref": [
                { "url": "https://i.ibb.co/durable/0.png", "weight": 0.7 },
                { "url": "https://example.com/b.png", "weight": 0.85 }
            ]
        })))
        .respond_with(accepted("gen_refs"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with_host(&server, host.clone());
    let request = GenerationRequest::ImageWithRefs {
        prompt: "similar style".into(),
        aspect_ratio: AspectRatio::Wide,
        model: ImageModel::PhotonFlash1,
        refs: vec![
            ReferenceImage::new(DISCORD_URL, 0.7),
            ReferenceImage::with_default_weight("https://example.com/b.png"),
        ],
    };
    let handle = client.submit(&request).await.unwrap();

    assert_eq!(handle.id, "gen_refs");
    assert_eq!(host.calls(), vec![DISCORD_URL.to_string()]);
}

#[tokio::test]
async fn test_style_reference_is_sent_as_list() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generations/image"))
        .and(body_json(json!({
            "prompt": "in this style",
            "aspect_ratio": "4:3",
            "model": "photon-1",
            "style_ref": [{ "url": "https://example.com/style.png", "weight": 0.8 }]
        })))
        .respond_with(accepted("gen_style"))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::ImageWithStyle {
        prompt: "in this style".into(),
        aspect_ratio: AspectRatio::Landscape,
        model: ImageModel::Photon1,
        style: ReferenceImage::new("https://example.com/style.png", 0.8),
    };
    let handle = client_for(&server).submit(&request).await.unwrap();
    assert_eq!(handle.id, "gen_style");
}

#[tokio::test]
async fn test_character_reference_shape() {
    let server = MockServer::start().await;
    let host = FakeHost::new();

    Mock::given(method("POST"))
        .and(path("/generations/image"))
        .and(body_json(json!({
            "prompt": "same person, different pose",
            "aspect_ratio": "3:4",
            "model": "photon-1",
            "character_ref": {
                "identity0": {
                    "images": ["https://example.com/face.png", "https://i.ibb.co/durable/0.png"]
                }
            }
        })))
        .respond_with(accepted("gen_char"))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::ImageWithCharacters {
        prompt: "same person, different pose".into(),
        aspect_ratio: AspectRatio::Portrait,
        model: ImageModel::Photon1,
        images: vec!["https://example.com/face.png".into(), DISCORD_URL.into()],
    };
    let handle = client_with_host(&server, host).submit(&request).await.unwrap();
    assert_eq!(handle.id, "gen_char");
}

#[tokio::test]
async fn test_modify_omits_aspect_ratio() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generations/image"))
        .and(body_json(json!({
            "prompt": "make the background blue",
            "model": "photon-1",
            "modify_image_ref": { "url": "https://example.com/photo.png", "weight": 0.05 }
        })))
        .respond_with(accepted("gen_mod"))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::ImageModify {
        prompt: "make the background blue".into(),
        model: ImageModel::Photon1,
        image_url: "https://example.com/photo.png".into(),
        weight: 0.05,
    };
    let handle = client_for(&server).submit(&request).await.unwrap();
    assert_eq!(handle.id, "gen_mod");
}

#[tokio::test]
async fn test_out_of_range_weight_sends_nothing() {
    let server = MockServer::start().await;
    let host = FakeHost::new();
    let client = client_with_host(&server, host.clone());

    let request = GenerationRequest::ImageWithRefs {
        prompt: "a cat".into(),
        aspect_ratio: AspectRatio::Square,
        model: ImageModel::Photon1,
        refs: vec![ReferenceImage::new(DISCORD_URL, 1.5)],
    };
    let err = client.submit(&request).await.unwrap_err();

    assert!(matches!(
        err,
        LumaError::Validation(ValidationError::WeightOutOfRange { .. })
    ));
    assert_eq!(request_count(&server).await, 0);
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn test_rejected_submission_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/generations/image"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"detail":"prompt not allowed"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .submit(&GenerationRequest::image("something"))
        .await
        .unwrap_err();

    match err {
        LumaError::Api { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, r#"{"detail":"prompt not allowed"}"#);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_ephemeral_url_without_host_is_rejected() {
    let server = MockServer::start().await;

    let request = GenerationRequest::ImageModify {
        prompt: "recolor".into(),
        model: ImageModel::Photon1,
        image_url: DISCORD_URL.into(),
        weight: 0.45,
    };
    let err = client_for(&server).submit(&request).await.unwrap_err();

    assert!(matches!(err, LumaError::Rehost(RehostError::NotConfigured(_))));
    assert_eq!(request_count(&server).await, 0);
}
