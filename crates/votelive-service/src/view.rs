//! HTTP client resolving viewer links.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use votelive_core::config::BackendConfig;
use votelive_core::error::{AppError, ErrorKind};
use votelive_core::result::AppResult;
use votelive_core::traits::ViewDirectory;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewRecord {
    elec_id: String,
}

/// Resolves view ids to their owning election via the CRUD backend.
#[derive(Debug, Clone)]
pub struct ViewClient {
    /// HTTP client.
    http: reqwest::Client,
    /// Backend base URL, no trailing slash.
    base_url: String,
}

impl ViewClient {
    /// Creates a new client against the configured backend.
    pub fn new(backend: &BackendConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(backend.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            http,
            base_url: backend.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ViewDirectory for ViewClient {
    async fn election_for_view(&self, view_id: &str) -> AppResult<Option<String>> {
        let url = format!("{}/api/views/{}", self.base_url, view_id);
        let response = self.http.get(&url).send().await.map_err(external)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status().map_err(external)?;
        let record: ViewRecord = response.json().await.map_err(external)?;
        Ok(Some(record.elec_id))
    }
}

fn external(e: reqwest::Error) -> AppError {
    AppError::with_source(
        ErrorKind::ExternalService,
        format!("Backend request failed: {e}"),
        e,
    )
}
