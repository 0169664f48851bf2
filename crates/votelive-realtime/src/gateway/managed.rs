//! Managed delivery through an external push API.
//!
//! For serverless deployments the process never holds a socket; frames are
//! POSTed to the routing service keyed by connection id, and the service
//! reports gone connections with a 404 or 410.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use votelive_core::config::ManagedGatewayConfig;
use votelive_core::error::{AppError, ErrorKind};
use votelive_core::result::AppResult;

use super::TransportGateway;

/// Gateway over an external connection-routing service.
#[derive(Debug, Clone)]
pub struct ManagedGateway {
    /// HTTP client.
    http: reqwest::Client,
    /// Push endpoint base URL, no trailing slash.
    push_endpoint: String,
}

impl ManagedGateway {
    /// Creates a gateway against the configured push endpoint.
    pub fn new(config: &ManagedGatewayConfig) -> AppResult<Self> {
        if config.push_endpoint.is_empty() {
            return Err(AppError::configuration(
                "Managed transport selected but no push endpoint configured",
            ));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            http,
            push_endpoint: config.push_endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn connection_url(&self, connection_id: &str) -> String {
        format!("{}/connections/{}", self.push_endpoint, connection_id)
    }
}

#[async_trait]
impl TransportGateway for ManagedGateway {
    async fn send(&self, connection_id: &str, text: &str) -> AppResult<()> {
        let response = self
            .http
            .post(self.connection_url(connection_id))
            .body(text.to_string())
            .send()
            .await
            .map_err(external)?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::GONE => Err(AppError::connection(format!(
                "Push API reports connection gone: {connection_id}"
            ))),
            _ => {
                response.error_for_status().map_err(external)?;
                Ok(())
            }
        }
    }

    async fn close(&self, connection_id: &str) -> AppResult<()> {
        let response = self
            .http
            .delete(self.connection_url(connection_id))
            .send()
            .await
            .map_err(external)?;

        // Already-gone connections make close a no-op.
        if matches!(
            response.status(),
            StatusCode::NOT_FOUND | StatusCode::GONE
        ) {
            return Ok(());
        }
        response.error_for_status().map_err(external)?;
        Ok(())
    }
}

fn external(e: reqwest::Error) -> AppError {
    AppError::with_source(
        ErrorKind::ExternalService,
        format!("Push API request failed: {e}"),
        e,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_endpoint_is_a_configuration_error() {
        let config = ManagedGatewayConfig {
            push_endpoint: String::new(),
        };
        let err = ManagedGateway::new(&config).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn connection_url_joins_without_double_slash() {
        let config = ManagedGatewayConfig {
            push_endpoint: "https://push.example.com/prod/".to_string(),
        };
        let gateway = ManagedGateway::new(&config).unwrap();
        assert_eq!(
            gateway.connection_url("c1"),
            "https://push.example.com/prod/connections/c1"
        );
    }
}
