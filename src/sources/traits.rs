use crate::models::RawRecord;
use anyhow::Result;
use async_trait::async_trait;

/// Outcome of a single-record fetch
#[derive(Debug)]
pub enum RecordLookup {
    Found(RawRecord),
    /// The source answered and the record does not exist
    NotFound,
    /// The source could not be reached or answered with an error
    Unavailable(anyhow::Error),
}

/// Read-only access to the listing table.
/// Pages depend on this trait so the upstream can be swapped for fixtures.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch a single page of at most `page_size` records, in table order
    async fn list_records(&self, page_size: usize) -> Result<Vec<RawRecord>>;

    /// Fetch one record by its identifier
    async fn get_record(&self, id: &str) -> RecordLookup;

    /// Get the name of the record source
    fn source_name(&self) -> &'static str;
}
