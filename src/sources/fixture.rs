use crate::models::RawRecord;
use crate::sources::traits::{RecordLookup, RecordSource};
use crate::sources::types::ListResponse;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

/// In-memory listing table, loaded from a saved list response
pub struct FixtureSource {
    records: Vec<RawRecord>,
}

impl FixtureSource {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    /// Load records from a JSON file shaped like `{"records": [...]}`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        let body: ListResponse = serde_json::from_str(&content)
            .with_context(|| format!("Invalid fixture {}", path.display()))?;

        info!("📋 Loaded {} fixture records from {}", body.records.len(), path.display());
        Ok(Self::new(body.records))
    }
}

#[async_trait]
impl RecordSource for FixtureSource {
    async fn list_records(&self, page_size: usize) -> Result<Vec<RawRecord>> {
        Ok(self.records.iter().take(page_size).cloned().collect())
    }

    async fn get_record(&self, id: &str) -> RecordLookup {
        match self.records.iter().find(|r| r.id == id) {
            Some(record) => RecordLookup::Found(record.clone()),
            None => RecordLookup::NotFound,
        }
    }

    fn source_name(&self) -> &'static str {
        "Fixture"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> RawRecord {
        RawRecord {
            id: id.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_respects_page_size() {
        let source = FixtureSource::new((0..5).map(|i| record(&format!("rec{}", i))).collect());
        let ids: Vec<_> = source
            .list_records(3)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["rec0", "rec1", "rec2"]);
    }

    #[tokio::test]
    async fn test_get_record() {
        let source = FixtureSource::new(vec![record("recA")]);
        assert!(matches!(source.get_record("recA").await, RecordLookup::Found(_)));
        assert!(matches!(source.get_record("recB").await, RecordLookup::NotFound));
    }

    #[test]
    fn test_bundled_fixture_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/listings.json");
        let source = FixtureSource::from_path(path).unwrap();
        assert!(!source.records.is_empty());
    }

    #[test]
    fn test_missing_fixture_file() {
        assert!(FixtureSource::from_path("does/not/exist.json").is_err());
    }
}
