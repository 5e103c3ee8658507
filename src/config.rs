use anyhow::{bail, Context, Result};
use reqwest::Url;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

/// Largest page the upstream table API serves in one request
pub const MAX_PAGE_SIZE: usize = 100;

const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";
const DEFAULT_SITE_URL: &str = "https://tu-dominio.com";
const DEFAULT_IMAGE_BASE_URL: &str = "https://panama-green.com/wp-content/uploads/wpallimport/files";
const DEFAULT_SHARE_SERVICE_URL: &str = "https://api.whatsapp.com/send";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_REVALIDATE_SECS: u64 = 60;
const DEFAULT_CACHE_CAPACITY: usize = 512;

/// Credentials and table coordinates for the listing table
#[derive(Debug, Clone)]
pub struct AirtableConfig {
    pub api_key: String,
    pub base_id: String,
    pub table_name: String,
    pub api_url: String,
}

/// Where listing records come from
#[derive(Debug, Clone)]
pub enum SourceConfig {
    Airtable(AirtableConfig),
    /// Offline mode backed by a JSON file in list-response shape
    Fixture(PathBuf),
}

/// Site configuration, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceConfig,
    pub site_url: String,
    pub image_base_url: String,
    pub share_service_url: Url,
    pub revalidate: Duration,
    pub page_size: usize,
    /// Most pages held in memory; least recently served go first
    pub cache_capacity: NonZeroUsize,
    pub bind_addr: String,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let source = match get("LISTINGS_FIXTURE") {
            Some(path) => SourceConfig::Fixture(PathBuf::from(path)),
            None => {
                let require = |key: &str| {
                    get(key).with_context(|| format!("{} must be set (or use LISTINGS_FIXTURE)", key))
                };
                SourceConfig::Airtable(AirtableConfig {
                    api_key: require("AIRTABLE_API_KEY")?,
                    base_id: require("AIRTABLE_BASE_ID")?,
                    table_name: require("AIRTABLE_TABLE_NAME")?,
                    api_url: get("AIRTABLE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                })
            }
        };

        let share_service_url = get("SHARE_SERVICE_URL")
            .unwrap_or_else(|| DEFAULT_SHARE_SERVICE_URL.to_string());
        let share_service_url = Url::parse(&share_service_url)
            .with_context(|| format!("Invalid SHARE_SERVICE_URL: {}", share_service_url))?;

        let revalidate_secs = match get("REVALIDATE_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid REVALIDATE_SECS: {}", v))?,
            None => DEFAULT_REVALIDATE_SECS,
        };

        let page_size = match get("PAGE_SIZE") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid PAGE_SIZE: {}", v))?,
            None => MAX_PAGE_SIZE,
        };
        if page_size == 0 {
            bail!("PAGE_SIZE must be at least 1");
        }

        let cache_capacity = match get("PAGE_CACHE_CAPACITY") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid PAGE_CACHE_CAPACITY: {}", v))?,
            None => DEFAULT_CACHE_CAPACITY,
        };
        let cache_capacity = NonZeroUsize::new(cache_capacity)
            .context("PAGE_CACHE_CAPACITY must be at least 1")?;

        Ok(Self {
            source,
            site_url: get("SITE_URL").unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            image_base_url: get("IMAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string()),
            share_service_url,
            revalidate: Duration::from_secs(revalidate_secs),
            page_size: page_size.min(MAX_PAGE_SIZE),
            cache_capacity,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }
}
