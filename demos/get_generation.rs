use luma_relay::{Config, LumaClient};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let client = LumaClient::from_config(&Config::from_env()?)?;

    let generation_id = env::args()
        .nth(1)
        .ok_or_else(|| {
            anyhow::anyhow!("Please provide a generation ID as a command-line argument.")
        })?;

    let status = client.get_generation(&generation_id).await?;
    println!("Generation `{}`: {}", status.id, status.state);
    if let Some(reason) = &status.failure_reason {
        println!("Failure reason: {}", reason);
    }
    if let Some(assets) = &status.assets {
        if let Some(image) = &assets.image {
            println!("Image: {}", image);
        }
        if let Some(video) = &assets.video {
            println!("Video: {}", video);
        }
    }

    Ok(())
}
