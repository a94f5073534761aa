use anyhow::Result;
use multi_inventory_preview::{PreviewConfig, serve};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "multi_inventory_preview=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    // .env 不存在时忽略
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = PreviewConfig::load();
    serve(config).await?;
    Ok(())
}
