//! This example demonstrates the full image workflow:
//! 1. Submitting an image generation from a prompt.
//! 2. Polling until it finishes, printing a line at every checkpoint.
//!
//! To run this example, you must have the `LUMA_API_KEY` environment variable set.
//! Set `IMGBB_API_KEY` as well to pass Discord-hosted reference images.
//!
//! Usage:
//! `cargo run --example generate_image -- "<PROMPT>" [ASPECT] [REFERENCE_URL]`

use std::env;

use luma_relay::{
    AspectRatio, Config, GenerationRequest, ImageModel, LumaClient, PollOutcome, ReferenceImage,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let client = LumaClient::from_config(&Config::from_env()?)?;

    let mut args = env::args().skip(1);
    let prompt = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("Please provide a prompt as the first argument."))?;
    let aspect_ratio: AspectRatio = match args.next() {
        Some(aspect) => aspect.parse()?,
        None => AspectRatio::default(),
    };

    let request = match args.next() {
        Some(reference) => GenerationRequest::ImageWithRefs {
            prompt,
            aspect_ratio,
            model: ImageModel::Photon1,
            refs: vec![ReferenceImage::with_default_weight(reference)],
        },
        None => GenerationRequest::Image {
            prompt,
            aspect_ratio,
            model: ImageModel::Photon1,
        },
    };

    let handle = client.submit(&request).await?;
    println!(
        "⏳ Generation started (ID: `{}`)\nStatus: {}\nAspect: {}",
        handle.id, handle.state, aspect_ratio
    );

    let outcome = client
        .wait_for_generation(&handle, |checkpoint| {
            if let PollOutcome::ProgressNotice {
                elapsed,
                remote_status,
            } = checkpoint
            {
                println!(
                    "⏳ Still generating... ({} seconds elapsed)\nStatus: {}",
                    elapsed.as_secs(),
                    remote_status
                );
            }
        })
        .await;

    match outcome {
        PollOutcome::Succeeded {
            artifact_url,
            elapsed,
        } => println!(
            "✅ Generation complete! ({} seconds)\n🖼️ Image: {}",
            elapsed.as_secs(),
            artifact_url
        ),
        PollOutcome::Failed { reason } => println!(
            "❌ Generation failed: {}\nLook it up later with get_generation and ID `{}`",
            reason, handle.id
        ),
        PollOutcome::TimedOut {
            elapsed,
            generation_id,
        } => println!(
            "❌ Gave up after {} seconds. Check the status later with ID `{}`",
            elapsed.as_secs(),
            generation_id
        ),
        other => println!("Unexpected outcome: {:?}", other),
    }

    Ok(())
}
