pub mod airtable;
pub mod fixture;
pub mod traits;
pub mod types;

pub use airtable::AirtableSource;
pub use fixture::FixtureSource;
pub use traits::{RecordLookup, RecordSource};

use crate::config::{Config, SourceConfig};
use anyhow::Result;
use std::sync::Arc;

/// Build the record source selected by the configuration
pub fn from_config(config: &Config) -> Result<Arc<dyn RecordSource>> {
    let source: Arc<dyn RecordSource> = match &config.source {
        SourceConfig::Airtable(airtable) => Arc::new(AirtableSource::new(airtable.clone())?),
        SourceConfig::Fixture(path) => Arc::new(FixtureSource::from_path(path)?),
    };
    Ok(source)
}
