//! Stale-while-revalidate page cache.
//!
//! Pages are stored as immutable `Arc`s and replaced whole, so a reader
//! always gets either the previous page or the regenerated one. Each key has
//! at most one regeneration in flight. The store is a bounded LRU, so
//! requests for arbitrary ids evict old pages rather than grow memory.

use crate::pages::{catalog_page, PageKey, RenderedPage, Site};
use anyhow::Result;
use lru::LruCache;
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(Clone)]
struct Entry {
    page: Arc<RenderedPage>,
    stored_at: Instant,
}

pub struct PageCache {
    site: Arc<Site>,
    entries: Mutex<LruCache<PageKey, Entry>>,
    refreshing: Mutex<HashSet<PageKey>>,
}

impl PageCache {
    pub fn new(site: Arc<Site>, capacity: NonZeroUsize) -> Arc<Self> {
        Arc::new(Self {
            site,
            entries: Mutex::new(LruCache::new(capacity)),
            refreshing: Mutex::new(HashSet::new()),
        })
    }

    /// Serve a page: fresh from cache, stale while a refresh runs in the
    /// background, or generated on the spot when nothing is cached yet.
    pub async fn get(self: &Arc<Self>, key: &PageKey) -> Arc<RenderedPage> {
        let cached = self.entries.lock().await.get(key).cloned();

        match cached {
            Some(entry) if entry.stored_at.elapsed() < self.site.revalidate() => {
                debug!("Cache hit for {}", key);
                entry.page
            }
            Some(entry) => {
                debug!("Serving stale {} while it regenerates", key);
                self.spawn_refresh(key.clone()).await;
                entry.page
            }
            None => match self.generate(key).await {
                Ok(page) => page,
                Err(e) => {
                    warn!("Could not generate {}: {:#}", key, e);
                    Arc::new(RenderedPage::unavailable())
                }
            },
        }
    }

    /// Generate a page now and store it
    pub async fn generate(&self, key: &PageKey) -> Result<Arc<RenderedPage>> {
        let page = self.site.generate(key).await?;
        Ok(self.store(key.clone(), page).await)
    }

    /// Generate the catalog and every listed detail page ahead of the first
    /// visitor. Failures are logged; those pages render on first request.
    pub async fn prewarm(&self) -> usize {
        let catalog = self.site.catalog().await;
        if catalog.degraded {
            warn!("Skipping prewarm of detail pages, listing source unavailable");
            return 0;
        }

        self.store(PageKey::Catalog, catalog_page(&catalog)).await;

        let mut warmed = 0;
        for property in &catalog.properties {
            let key = PageKey::Detail(property.id.clone());
            match self.generate(&key).await {
                Ok(_) => warmed += 1,
                Err(e) => warn!("Could not prebuild {}: {:#}", key, e),
            }
        }

        info!("✅ Prebuilt catalog and {} detail pages", warmed);
        warmed
    }

    async fn store(&self, key: PageKey, page: RenderedPage) -> Arc<RenderedPage> {
        let mut entries = self.entries.lock().await;

        if page.degraded {
            if let Some(existing) = entries.peek(&key).filter(|e| !e.page.degraded) {
                debug!("Keeping healthy copy of {} over degraded output", key);
                return existing.page.clone();
            }
        }

        let page = Arc::new(page);
        entries.put(
            key,
            Entry {
                page: page.clone(),
                stored_at: Instant::now(),
            },
        );
        page
    }

    async fn spawn_refresh(self: &Arc<Self>, key: PageKey) {
        if !self.refreshing.lock().await.insert(key.clone()) {
            debug!("Regeneration of {} already in flight", key);
            return;
        }

        let cache = Arc::clone(self);
        tokio::spawn(async move {
            match cache.generate(&key).await {
                Ok(_) => info!("🔄 Regenerated {}", key),
                Err(e) => warn!("Regeneration of {} failed, keeping previous page: {:#}", key, e),
            }
            cache.refreshing.lock().await.remove(&key);
        });
    }
}
