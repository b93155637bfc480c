//! This example extends a finished video.
//!
//! The source videos are checked for completion before anything is submitted.
//!
//! Usage:
//! `cargo run --example extend_video -- <MODE> "<PROMPT>" <VIDEO_ID> [SECOND_VIDEO_ID | IMAGE_URL]`
//!
//! `MODE` is one of `extend`, `reverse`, `extend_end`, `reverse_start`, `interpolate`.

use std::env;

use luma_relay::{Config, ExtendMode, GenerationRequest, LumaClient, PollOutcome};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let client = LumaClient::from_config(&Config::from_env()?)?;

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 3 {
        anyhow::bail!(
            "Usage: extend_video <MODE> <PROMPT> <VIDEO_ID> [SECOND_VIDEO_ID | IMAGE_URL]"
        );
    }
    let mode: ExtendMode = args[0].parse()?;
    let companion = args.get(3).cloned();

    let (video_id2, image_url) = match mode {
        ExtendMode::Interpolate => (companion, None),
        _ => (None, companion),
    };
    let request = GenerationRequest::VideoExtend {
        prompt: args[1].clone(),
        mode,
        video_id1: args[2].clone(),
        video_id2,
        image_url,
        camera: None,
    };

    request.validate()?;
    client.verify_extension_sources(&request).await?;

    let handle = client.submit(&request).await?;
    println!("⏳ Video extension started (ID: `{}`)", handle.id);

    let outcome = client
        .wait_for_generation(&handle, |checkpoint| {
            println!("⏳ Still extending... {:?}", checkpoint)
        })
        .await;

    if let PollOutcome::Succeeded { artifact_url, .. } = outcome {
        println!(
            "✅ Video extension complete!\n🎥 Video: {}\n📝 Generation ID: `{}`",
            artifact_url, handle.id
        );
    } else {
        println!("❌ Extension failed: {:?}", outcome);
    }

    Ok(())
}
