pub mod catalog;
pub mod detail;
pub mod layout;

use crate::config::Config;
use crate::models::Normalizer;
use crate::sources::RecordSource;
use anyhow::Result;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub use catalog::Catalog;
pub use detail::DetailOutcome;

/// Identifies one generated page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageKey {
    Catalog,
    Detail(String),
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageKey::Catalog => write!(f, "/"),
            PageKey::Detail(id) => write!(f, "/{}", id),
        }
    }
}

/// A finished page, ready to be cached and served as-is
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub status: StatusCode,
    pub html: String,
    /// Built from a failed fetch; never replaces a healthy copy
    pub degraded: bool,
    pub generated_at: DateTime<Utc>,
}

impl RenderedPage {
    pub fn new(status: StatusCode, html: String) -> Self {
        Self {
            status,
            html,
            degraded: false,
            generated_at: Utc::now(),
        }
    }

    pub fn degraded(mut self) -> Self {
        self.degraded = true;
        self
    }

    pub fn unavailable() -> Self {
        Self::new(StatusCode::BAD_GATEWAY, layout::unavailable_page()).degraded()
    }

    pub fn to_response(&self) -> Response {
        let mut response = (self.status, Html(self.html.clone())).into_response();
        let modified = self.generated_at.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        if let Ok(value) = HeaderValue::from_str(&modified) {
            response.headers_mut().insert(header::LAST_MODIFIED, value);
        }
        response
    }
}

pub fn catalog_page(catalog: &Catalog) -> RenderedPage {
    let page = RenderedPage::new(StatusCode::OK, catalog::render(catalog));
    if catalog.degraded {
        page.degraded()
    } else {
        page
    }
}

/// Everything needed to generate pages from the current upstream state
pub struct Site {
    source: Arc<dyn RecordSource>,
    normalizer: Normalizer,
    page_size: usize,
    revalidate: Duration,
}

impl Site {
    pub fn new(
        source: Arc<dyn RecordSource>,
        normalizer: Normalizer,
        page_size: usize,
        revalidate: Duration,
    ) -> Self {
        Self {
            source,
            normalizer,
            page_size,
            revalidate,
        }
    }

    pub fn from_config(config: &Config, source: Arc<dyn RecordSource>) -> Self {
        Self::new(
            source,
            Normalizer::from_config(config),
            config.page_size,
            config.revalidate,
        )
    }

    /// How long a generated page stays fresh
    pub fn revalidate(&self) -> Duration {
        self.revalidate
    }

    pub async fn catalog(&self) -> Catalog {
        catalog::fetch(self.source.as_ref(), &self.normalizer, self.page_size).await
    }

    /// Generate a page from scratch.
    ///
    /// The catalog always renders (degraded when the source is down), and a
    /// missing listing renders the 404 page. An error means the detail
    /// source was unreachable and nothing should be cached.
    pub async fn generate(&self, key: &PageKey) -> Result<RenderedPage> {
        match key {
            PageKey::Catalog => Ok(catalog_page(&self.catalog().await)),
            PageKey::Detail(id) => {
                let page = match detail::fetch(self.source.as_ref(), &self.normalizer, id).await? {
                    DetailOutcome::Found(property) => {
                        RenderedPage::new(StatusCode::OK, detail::render(&property))
                    }
                    DetailOutcome::NotFound => {
                        RenderedPage::new(StatusCode::NOT_FOUND, layout::not_found_page())
                    }
                };
                Ok(page)
            }
        }
    }
}
