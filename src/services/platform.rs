//! External platform client
//!
//! Boundary to the code-hosting platform this service recommends from.
//! The crawler's traversal and the repo fetch are opaque here: each call
//! either succeeds or fails, and callers decide what to do with the
//! outcome. No timeout or retry is layered on top; a stalled upstream
//! call stalls the requesting request.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::CrawlDepth;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Platform request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Platform returned status {status} for {operation}")]
    Upstream { operation: String, status: u16 },
}

/// Operations this service invokes on the external platform
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Unconditionally re-fetch the user's owned/starred repositories
    async fn refresh_user_repos(&self, user_id: i64) -> Result<(), PlatformError>;

    /// Crawl the user's social graph outward to `depth` hops, without
    /// forcing re-fetch of already-fresh intermediate nodes
    async fn crawl_from_user(&self, user_id: i64, depth: CrawlDepth) -> Result<(), PlatformError>;
}

/// HTTP implementation backed by the crawler sidecar API
#[derive(Debug, Clone)]
pub struct HttpPlatformClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPlatformClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn check(operation: &str, response: &reqwest::Response) -> Result<(), PlatformError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(PlatformError::Upstream {
                operation: operation.to_string(),
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl PlatformClient for HttpPlatformClient {
    async fn refresh_user_repos(&self, user_id: i64) -> Result<(), PlatformError> {
        let url = format!("{}/users/{}/refresh_repos", self.base_url, user_id);
        let response = self.http.post(&url).send().await?;
        Self::check("refresh_user_repos", &response)
    }

    async fn crawl_from_user(&self, user_id: i64, depth: CrawlDepth) -> Result<(), PlatformError> {
        let url = format!(
            "{}/users/{}/crawl?depth={}",
            self.base_url,
            user_id,
            depth.hops()
        );
        let response = self.http.post(&url).send().await?;
        Self::check("crawl_from_user", &response)
    }
}
