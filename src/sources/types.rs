use crate::models::RawRecord;
use serde::Deserialize;

/// Body of a table list request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub records: Vec<RawRecord>,
    /// Cursor for the next page; only one page is ever requested
    #[serde(default)]
    pub offset: Option<String>,
}
