//! This example submits a text-to-video generation with an optional camera
//! motion and waits for the video.
//!
//! Usage:
//! `cargo run --example text_to_video -- "<PROMPT>" [CAMERA_MOTION]`
//!
//! Camera motions are names such as `"dolly in"` or `pan_left`.

use std::env;

use luma_relay::{AspectRatio, CameraMotion, Config, GenerationRequest, LumaClient, PollOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let client = LumaClient::from_config(&Config::from_env()?)?;

    let mut args = env::args().skip(1);
    let prompt = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("Please provide a prompt as the first argument."))?;
    let camera = args.next().map(|name| name.parse::<CameraMotion>()).transpose()?;

    let request = GenerationRequest::TextToVideo {
        prompt,
        aspect_ratio: AspectRatio::Wide,
        loop_video: false,
        camera,
    };
    let handle = client.submit(&request).await?;
    println!("⏳ Video generation started (ID: `{}`)", handle.id);

    let mut poller = client.poller(&handle);
    loop {
        match poller.wait().await {
            PollOutcome::ProgressNotice {
                elapsed,
                remote_status,
            } => println!(
                "⏳ Still generating... ({} seconds elapsed)\nStatus: {}",
                elapsed.as_secs(),
                remote_status
            ),
            PollOutcome::Succeeded { artifact_url, .. } => {
                println!("✅ Video generation complete!\n🎥 Video: {}", artifact_url);
                break;
            }
            other => {
                println!("❌ Video generation did not finish: {:?}", other);
                break;
            }
        }
    }

    Ok(())
}
