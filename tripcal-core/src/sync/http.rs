//! Remote table API over HTTP.
//!
//! `GET {api}/{table}/rows` answers `{"data": [...]}` with an `ETag` header;
//! `PUT {api}/{table}` takes `{"rows": [...]}` and honours `If-Match`,
//! answering 412 when the table moved on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{TripCalError, TripCalResult};
use crate::rows::Row;
use crate::sync::{CommitOutcome, RemoteTable, TableSnapshot};

#[derive(Deserialize)]
struct RowsResponse {
    #[serde(default)]
    data: Vec<Row>,
}

#[derive(Serialize)]
struct CommitRequest<'a> {
    rows: &'a [Row],
}

/// One table behind the remote table API.
#[derive(Debug, Clone)]
pub struct HttpTable {
    client: Client,
    api_url: String,
    table: String,
    token: String,
}

impl HttpTable {
    pub fn new(api_url: &str, table: &str, token: &str, timeout: Duration) -> TripCalResult<Self> {
        Url::parse(api_url)
            .map_err(|e| TripCalError::Config(format!("Invalid table API URL '{api_url}': {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TripCalError::Table(format!("Failed to build HTTP client: {e}")))?;

        Ok(HttpTable {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            table: table.to_string(),
            token: token.to_string(),
        })
    }

    fn rows_url(&self) -> String {
        format!("{}/{}/rows", self.api_url, self.table)
    }

    fn table_url(&self) -> String {
        format!("{}/{}", self.api_url, self.table)
    }
}

#[async_trait]
impl RemoteTable for HttpTable {
    fn name(&self) -> &str {
        &self.table
    }

    async fn fetch(&self) -> TripCalResult<TableSnapshot> {
        let response = self
            .client
            .get(self.rows_url())
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TripCalError::Table(format!(
                "GET {} returned HTTP {}: {}",
                self.rows_url(),
                status.as_u16(),
                body
            )));
        }

        let etag = response
            .headers()
            .get(header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body: RowsResponse = response
            .json()
            .await
            .map_err(|e| TripCalError::Table(format!("Invalid rows response: {e}")))?;

        Ok(TableSnapshot {
            rows: body.data,
            etag,
        })
    }

    async fn commit(&self, rows: &[Row], if_match: Option<&str>) -> TripCalResult<CommitOutcome> {
        let mut request = self
            .client
            .put(self.table_url())
            .bearer_auth(&self.token)
            .json(&CommitRequest { rows });
        if let Some(etag) = if_match {
            request = request.header(header::IF_MATCH, etag);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();

        if status.is_success() {
            return Ok(CommitOutcome::Committed);
        }
        if status == StatusCode::PRECONDITION_FAILED {
            return Ok(CommitOutcome::PreconditionFailed);
        }

        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok(CommitOutcome::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

fn transport_error(err: reqwest::Error) -> TripCalError {
    if err.is_timeout() {
        TripCalError::Table("request to remote table timed out".into())
    } else {
        TripCalError::Table(err.to_string())
    }
}
