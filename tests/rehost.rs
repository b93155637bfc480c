use luma_relay::{ImageHost, ImgbbHost, RehostError};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// base64 of b"pngbytes!"
const ENCODED: &str = "cG5nYnl0ZXMh";

fn host_for(server: &MockServer) -> ImgbbHost {
    ImgbbHost::new_with_url("imgbb-key", format!("{}/1/upload", server.uri()))
}

async fn mount_upload(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/1/upload"))
        .and(body_string_contains("key=imgbb-key"))
        .and(body_string_contains(format!("image={}", ENCODED)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "url": "https://i.ibb.co/abc/cat.png" },
            "success": true,
            "status": 200
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_upload_sends_key_and_base64_image() {
    let server = MockServer::start().await;
    mount_upload(&server).await;

    let url = host_for(&server).upload(b"pngbytes!").await.unwrap();
    assert_eq!(url, "https://i.ibb.co/abc/cat.png");
}

#[tokio::test]
async fn test_rehost_downloads_then_uploads() {
    let server = MockServer::start().await;
    mount_upload(&server).await;

    Mock::given(method("GET"))
        .and(path("/attachments/1/2/cat.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"pngbytes!".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let source = format!("{}/attachments/1/2/cat.png", server.uri());
    let url = host_for(&server).rehost(&source).await.unwrap();
    assert_eq!(url, "https://i.ibb.co/abc/cat.png");
}

#[tokio::test]
async fn test_failed_download_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/attachments/expired.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = format!("{}/attachments/expired.png", server.uri());
    let err = host_for(&server).rehost(&source).await.unwrap_err();
    assert!(matches!(err, RehostError::Download { status: 404 }));
}

#[tokio::test]
async fn test_rejected_upload_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1/upload"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status_code": 400,
            "error": { "message": "Invalid API v1 key." }
        })))
        .mount(&server)
        .await;

    let err = host_for(&server).upload(b"pngbytes!").await.unwrap_err();
    assert!(matches!(err, RehostError::Upload { status: 400 }));
}

#[tokio::test]
async fn test_malformed_upload_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = host_for(&server).upload(b"pngbytes!").await.unwrap_err();
    assert!(matches!(err, RehostError::InvalidResponse(_)));
}
