mod cache;
mod config;
mod models;
mod pages;
mod server;
mod sources;

use cache::PageCache;
use config::Config;
use pages::Site;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🏠 Housing Catalog");
    info!("==================");

    let config = Config::from_env()?;
    let source = sources::from_config(&config)?;
    info!(
        "Serving listings from {} (page size {}, revalidate every {}s)",
        source.source_name(),
        config.page_size,
        config.revalidate.as_secs()
    );

    let site = Arc::new(Site::from_config(&config, source));
    let cache = PageCache::new(site, config.cache_capacity);

    server::serve(&config.bind_addr, cache).await
}
