use crate::config::{AirtableConfig, MAX_PAGE_SIZE};
use crate::models::RawRecord;
use crate::sources::traits::{RecordLookup, RecordSource};
use crate::sources::types::ListResponse;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Listing table served by the Airtable REST API
pub struct AirtableSource {
    client: Client,
    api_key: String,
    table_url: Url,
}

impl AirtableSource {
    pub fn new(config: AirtableConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        let table_url = table_url(&config)?;
        debug!("Listing table at {}", table_url);

        Ok(Self {
            client,
            api_key: config.api_key,
            table_url,
        })
    }

    fn record_url(&self, id: &str) -> Url {
        let mut url = self.table_url.clone();
        // table_url was checked to be a base URL when it was built
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }

    async fn fetch_record(&self, id: &str) -> Result<Option<RawRecord>> {
        let url = self.record_url(id);
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("Failed to fetch listing record")?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            bail!("Airtable returned status {} for record {}", status, id);
        }

        let record = response
            .json::<RawRecord>()
            .await
            .context("Failed to decode listing record")?;
        Ok(Some(record))
    }
}

#[async_trait]
impl RecordSource for AirtableSource {
    async fn list_records(&self, page_size: usize) -> Result<Vec<RawRecord>> {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("pageSize", &page_size.clamp(1, MAX_PAGE_SIZE).to_string());

        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("Failed to fetch listing table")?;

        if !response.status().is_success() {
            warn!("Airtable returned status: {}", response.status());
            bail!("Failed to fetch listing table: {}", response.status());
        }

        let body = response
            .json::<ListResponse>()
            .await
            .context("Failed to decode listing table response")?;

        if body.offset.is_some() {
            debug!("Table has more than {} records; serving the first page only", page_size);
        }
        info!("Fetched {} records from Airtable", body.records.len());

        Ok(body.records)
    }

    async fn get_record(&self, id: &str) -> RecordLookup {
        match self.fetch_record(id).await {
            Ok(Some(record)) => RecordLookup::Found(record),
            Ok(None) => {
                debug!("Record {} not found", id);
                RecordLookup::NotFound
            }
            Err(e) => RecordLookup::Unavailable(e),
        }
    }

    fn source_name(&self) -> &'static str {
        "Airtable"
    }
}

/// `{api_url}/{base_id}/{table_name}` with each segment percent-encoded
fn table_url(config: &AirtableConfig) -> Result<Url> {
    let mut url = Url::parse(&config.api_url)
        .with_context(|| format!("Invalid Airtable API URL: {}", config.api_url))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("Airtable API URL cannot be a base: {}", config.api_url))?
        .pop_if_empty()
        .push(&config.base_id)
        .push(&config.table_name);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    fn config(api_url: &str) -> AirtableConfig {
        AirtableConfig {
            api_key: "secret".to_string(),
            base_id: "app123".to_string(),
            table_name: "Listados MLS".to_string(),
            api_url: api_url.to_string(),
        }
    }

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == "Bearer secret")
            .unwrap_or(false)
    }

    async fn list(headers: HeaderMap) -> impl IntoResponse {
        if !authorized(&headers) {
            return (AxumStatus::UNAUTHORIZED, Json(json!({}))).into_response();
        }
        Json(json!({
            "records": [
                {"id": "rec1", "fields": {"street_name": "Calle 50"}},
                {"id": "rec2", "fields": {}}
            ]
        }))
        .into_response()
    }

    async fn record(Path((_, _, id)): Path<(String, String, String)>) -> impl IntoResponse {
        match id.as_str() {
            "rec1" => Json(json!({"id": "rec1", "fields": {"street_name": "Calle 50"}})).into_response(),
            "broken" => AxumStatus::INTERNAL_SERVER_ERROR.into_response(),
            _ => AxumStatus::NOT_FOUND.into_response(),
        }
    }

    /// Local stand-in for the table API, returns its base URL
    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v0", addr)
    }

    fn upstream() -> Router {
        Router::new()
            .route("/v0/{base}/{table}", get(list))
            .route("/v0/{base}/{table}/{id}", get(record))
    }

    #[test]
    fn test_table_url_encodes_segments() {
        let source = AirtableSource::new(config("https://api.airtable.com/v0/")).unwrap();
        assert_eq!(
            source.table_url.as_str(),
            "https://api.airtable.com/v0/app123/Listados%20MLS"
        );
        assert_eq!(
            source.record_url("rec1").as_str(),
            "https://api.airtable.com/v0/app123/Listados%20MLS/rec1"
        );
    }

    #[test]
    fn test_rejects_unusable_api_url() {
        assert!(AirtableSource::new(config("not a url")).is_err());
        assert!(AirtableSource::new(config("mailto:ops@example.com")).is_err());
    }

    #[tokio::test]
    async fn test_list_records() {
        let base = spawn_upstream(upstream()).await;
        let source = AirtableSource::new(config(&base)).unwrap();

        let records = source.list_records(100).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "rec1");
        assert_eq!(records[1].id, "rec2");
    }

    #[tokio::test]
    async fn test_list_records_rejected() {
        let base = spawn_upstream(upstream()).await;
        let mut bad_key = config(&base);
        bad_key.api_key = "wrong".to_string();
        let source = AirtableSource::new(bad_key).unwrap();

        assert!(source.list_records(100).await.is_err());
    }

    #[tokio::test]
    async fn test_get_record_outcomes() {
        let base = spawn_upstream(upstream()).await;
        let source = AirtableSource::new(config(&base)).unwrap();

        match source.get_record("rec1").await {
            RecordLookup::Found(record) => assert_eq!(record.id, "rec1"),
            other => panic!("expected record, got {:?}", other),
        }
        assert!(matches!(source.get_record("recMissing").await, RecordLookup::NotFound));
        assert!(matches!(source.get_record("broken").await, RecordLookup::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        // Nothing listens on the discard port
        let source = AirtableSource::new(config("http://127.0.0.1:9/v0")).unwrap();
        assert!(source.list_records(10).await.is_err());
        assert!(matches!(source.get_record("rec1").await, RecordLookup::Unavailable(_)));
    }
}
