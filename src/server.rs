use crate::cache::PageCache;
use crate::pages::PageKey;
use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(cache: Arc<PageCache>) -> Router {
    Router::new()
        .route("/", get(catalog))
        .route("/{id}", get(detail))
        .layer(TraceLayer::new_for_http())
        .with_state(cache)
}

async fn catalog(State(cache): State<Arc<PageCache>>) -> Response {
    cache.get(&PageKey::Catalog).await.to_response()
}

async fn detail(State(cache): State<Arc<PageCache>>, Path(id): Path<String>) -> Response {
    cache.get(&PageKey::Detail(id)).await.to_response()
}

/// Bind, prebuild pages in the background, and serve until shutdown
pub async fn serve(bind_addr: &str, cache: Arc<PageCache>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("🌐 Listening on http://{}", listener.local_addr()?);

    let warm = Arc::clone(&cache);
    tokio::spawn(async move {
        warm.prewarm().await;
    });

    axum::serve(listener, router(cache))
        .await
        .context("HTTP server failed")
}
