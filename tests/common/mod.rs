#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use luma_relay::{ImageHost, LumaClient, RehostError};
use serde_json::{json, Value};
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

pub const DISCORD_URL: &str = "https://cdn.discordapp.com/attachments/1/2/cat.png?ex=65f";

pub fn client_for(server: &MockServer) -> LumaClient {
    LumaClient::new_with_url("test_api_key".to_string(), &server.uri()).unwrap()
}

pub fn client_with_host(server: &MockServer, host: Arc<FakeHost>) -> LumaClient {
    client_for(server).with_image_host(host)
}

pub fn accepted(id: &str) -> ResponseTemplate {
    ResponseTemplate::new(201).set_body_json(json!({ "id": id, "state": "queued" }))
}

pub fn generation_body(id: &str, state: &str, image: Option<&str>, video: Option<&str>) -> Value {
    json!({
        "id": id,
        "state": state,
        "failure_reason": null,
        "created_at": "2024-11-03T12:00:00.000000Z",
        "assets": { "image": image, "video": video }
    })
}

pub fn status(id: &str, state: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(generation_body(id, state, None, None))
}

/// Records every re-hosted URL and hands back `https://i.ibb.co/durable/<n>.png`.
#[derive(Default)]
pub struct FakeHost {
    pub calls: Mutex<Vec<String>>,
    fail: bool,
}

impl FakeHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageHost for FakeHost {
    async fn upload(&self, _image: &[u8]) -> Result<String, RehostError> {
        unimplemented!("the client only re-hosts by URL")
    }

    async fn rehost(&self, source_url: &str) -> Result<String, RehostError> {
        if self.fail {
            return Err(RehostError::Upload { status: 400 });
        }
        let mut calls = self.calls.lock().unwrap();
        calls.push(source_url.to_string());
        Ok(format!("https://i.ibb.co/durable/{}.png", calls.len() - 1))
    }
}

/// Serves `steps` in order, repeating the last one once the script runs out.
pub struct Scripted {
    served: AtomicUsize,
    steps: Vec<ResponseTemplate>,
}

impl Scripted {
    pub fn new(steps: Vec<ResponseTemplate>) -> Self {
        assert!(!steps.is_empty());
        Self {
            served: AtomicUsize::new(0),
            steps,
        }
    }

    /// `count` copies of `first`, followed by `then`.
    pub fn after(count: usize, first: ResponseTemplate, then: ResponseTemplate) -> Self {
        let mut steps = vec![first; count];
        steps.push(then);
        Self::new(steps)
    }
}

impl Respond for Scripted {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let index = self.served.fetch_add(1, Ordering::SeqCst);
        self.steps[index.min(self.steps.len() - 1)].clone()
    }
}

pub async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}
