use async_trait::async_trait;
use std::time::Duration;

use crate::client::RegistrySource;
use crate::metadata::PackageMetadata;
use depgraph_constants::{CONNECT_TIMEOUT_SECS, MAX_ATTEMPTS, REQUEST_TIMEOUT_SECS, USER_AGENT};
use depgraph_error::{DepgraphError, Result};

// Abbreviated metadata carries everything the resolver reads and is a
// fraction of the size of the full document.
const ACCEPT: &str = "application/vnd.npm.install-v1+json; q=1.0, application/json; q=0.8";

/// npm-compatible registry reached over HTTP.
pub struct HttpRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRegistry {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(25)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .tcp_nodelay(true)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DepgraphError::Network {
                name: base_url.to_string(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn package_url(&self, name: &str) -> String {
        let encoded_name = urlencoding::encode(name);
        format!("{}/{encoded_name}", self.base_url)
    }
}

fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status == reqwest::StatusCode::INTERNAL_SERVER_ERROR
        || status == reqwest::StatusCode::SERVICE_UNAVAILABLE
}

async fn backoff(base_ms: u64, attempts: u32) {
    let delay = std::cmp::min(base_ms * u64::from(attempts), 5000);
    tokio::time::sleep(Duration::from_millis(delay)).await;
}

#[async_trait]
impl RegistrySource for HttpRegistry {
    async fn fetch_metadata(&self, name: &str) -> Result<PackageMetadata> {
        let url = self.package_url(name);
        let mut attempts = 0;

        loop {
            attempts += 1;

            let resp = match self
                .client
                .get(&url)
                .header("Accept", ACCEPT)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    if attempts < MAX_ATTEMPTS {
                        depgraph_logger::debug(&format!(
                            "Retrying {name} after transport error: {e}"
                        ));
                        backoff(1000, attempts).await;
                        continue;
                    }
                    let message = if e.is_timeout() {
                        format!("request timed out after {attempts} attempts")
                    } else if e.is_connect() {
                        format!("connection failed: {e}")
                    } else {
                        e.to_string()
                    };
                    return Err(DepgraphError::Network {
                        name: name.to_string(),
                        message,
                    });
                }
            };

            let status = resp.status();
            if !status.is_success() {
                if attempts < MAX_ATTEMPTS && is_retryable_status(status) {
                    backoff(1000, attempts).await;
                    continue;
                }
                return Err(DepgraphError::RegistryStatus {
                    name: name.to_string(),
                    status: status.as_u16(),
                });
            }

            let text = match resp.text().await {
                Ok(text) => text,
                Err(e) => {
                    if attempts < MAX_ATTEMPTS {
                        backoff(500, attempts).await;
                        continue;
                    }
                    return Err(DepgraphError::Network {
                        name: name.to_string(),
                        message: format!("failed to read response body: {e}"),
                    });
                }
            };

            let mut metadata: PackageMetadata =
                serde_json::from_str(&text).map_err(|e| DepgraphError::MalformedMetadata {
                    name: name.to_string(),
                    message: format!("response length {}: {e}", text.len()),
                })?;
            if metadata.name.is_empty() {
                metadata.name = name.to_string();
            }

            return Ok(metadata);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_names_are_encoded() {
        let registry = HttpRegistry::new("https://registry.example.com/").unwrap();
        assert_eq!(
            registry.package_url("@types/node"),
            "https://registry.example.com/%40types%2Fnode"
        );
        assert_eq!(
            registry.package_url("react"),
            "https://registry.example.com/react"
        );
    }

    #[test]
    fn test_only_transient_statuses_are_retried() {
        assert!(is_retryable_status(reqwest::StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(reqwest::StatusCode::SERVICE_UNAVAILABLE));
        assert!(!is_retryable_status(reqwest::StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(reqwest::StatusCode::FORBIDDEN));
    }
}
