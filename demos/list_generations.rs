use luma_relay::{Config, LumaClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let client = LumaClient::from_config(&Config::from_env()?)?;

    let page = client.list_generations(10, 0).await?;
    for generation in &page.generations {
        let created = generation
            .created_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());
        println!("{}  {:<10}  {}", generation.id, generation.state.to_string(), created);
    }
    if page.has_more {
        println!("... more generations available");
    }

    Ok(())
}
