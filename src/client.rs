//! # Module: Dashboard API Client
//!
//! ## Responsibility
//! The seam between the engine and the caching service. [`DashboardApi`]
//! names the five calls the dashboard makes; [`HttpDashboardApi`] implements
//! them over HTTP with `reqwest`.
//!
//! ## Guarantees
//! - Every call is scoped by the `user` query parameter
//! - Non-2xx answers become [`DashboardError::Status`], never a decoded value
//! - Query parameters are URL-encoded
//!
//! ## NOT Responsible For
//! - Deciding whether a failure is silent or toast-reported (that belongs to
//!   the coordinator)
//! - Retrying (polls simply try again next cycle)

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::model::{SearchResult, Snapshot};
use crate::{DashboardError, Identity};

/// Export representation requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Full JSON dump.
    Json,
    /// Cache table as CSV.
    Csv,
}

impl ExportFormat {
    /// Value of the `format` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// Name of the downloaded file.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Json => "cachecraft_export.json",
            Self::Csv => "cachecraft_export.csv",
        }
    }

    /// MIME type of the downloaded file.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
        }
    }
}

/// Body of an export response, ready to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPayload {
    /// Which representation this is.
    pub format: ExportFormat,
    /// Raw bytes as received (JSON is pretty-printed before saving).
    pub body: Vec<u8>,
}

impl ExportPayload {
    /// Writes the payload into `dir` under the format's file name.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Io`] if the directory or file cannot be written.
    pub async fn save_into(&self, dir: &Path) -> Result<PathBuf, DashboardError> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(self.format.file_name());
        tokio::fs::write(&path, &self.body).await?;
        Ok(path)
    }
}

/// The calls the dashboard makes against the caching service.
///
/// Implemented over HTTP by [`HttpDashboardApi`] and in memory by
/// [`crate::mock::MockBackend`].
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// `GET /dashboard`: the current snapshot for `user`.
    async fn fetch_dashboard(&self, user: &Identity) -> Result<Snapshot, DashboardError>;

    /// `GET /search`: look up one query.
    async fn search(&self, query: &str, user: &Identity) -> Result<SearchResult, DashboardError>;

    /// `POST /set_confidence`: persist the prefetch threshold.
    async fn set_confidence(&self, confidence: f64, user: &Identity)
        -> Result<(), DashboardError>;

    /// `POST /refresh`: force a backend refetch of one cache entry.
    async fn refresh(&self, query: &str, user: &Identity) -> Result<(), DashboardError>;

    /// `GET /export`: dump the user's cache in the requested format.
    async fn export(
        &self,
        format: ExportFormat,
        user: &Identity,
    ) -> Result<ExportPayload, DashboardError>;
}

#[derive(Debug, Serialize)]
struct ConfidenceBody {
    confidence: f64,
}

/// HTTP implementation of [`DashboardApi`].
///
/// ## Example
///
/// ```no_run
/// use std::time::Duration;
/// use cachecraft_dashboard::HttpDashboardApi;
///
/// let api = HttpDashboardApi::new("http://localhost:8000", Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct HttpDashboardApi {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpDashboardApi {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
            timeout,
        }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<reqwest::Response, DashboardError> {
        let response = request.timeout(self.timeout).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(endpoint, status = status.as_u16(), "non-success response");
            return Err(DashboardError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn fetch_dashboard(&self, user: &Identity) -> Result<Snapshot, DashboardError> {
        let request = self
            .client
            .get(self.url("/dashboard"))
            .query(&[("user", user.as_str())]);
        let response = self.send(request, "/dashboard").await?;
        Ok(response.json::<Snapshot>().await?)
    }

    async fn search(&self, query: &str, user: &Identity) -> Result<SearchResult, DashboardError> {
        let request = self
            .client
            .get(self.url("/search"))
            .query(&[("query", query), ("user", user.as_str())]);
        let response = self.send(request, "/search").await?;
        Ok(response.json::<SearchResult>().await?)
    }

    async fn set_confidence(
        &self,
        confidence: f64,
        user: &Identity,
    ) -> Result<(), DashboardError> {
        let request = self
            .client
            .post(self.url("/set_confidence"))
            .query(&[("user", user.as_str())])
            .json(&ConfidenceBody { confidence });
        self.send(request, "/set_confidence").await?;
        Ok(())
    }

    async fn refresh(&self, query: &str, user: &Identity) -> Result<(), DashboardError> {
        let request = self
            .client
            .post(self.url("/refresh"))
            .query(&[("query", query), ("user", user.as_str())]);
        self.send(request, "/refresh").await?;
        Ok(())
    }

    async fn export(
        &self,
        format: ExportFormat,
        user: &Identity,
    ) -> Result<ExportPayload, DashboardError> {
        let request = self
            .client
            .get(self.url("/export"))
            .query(&[("format", format.as_query()), ("user", user.as_str())]);
        let response = self.send(request, "/export").await?;
        let body = match format {
            ExportFormat::Json => {
                let value: serde_json::Value = response.json().await?;
                serde_json::to_vec_pretty(&value)
                    .map_err(|e| DashboardError::Decode(e.to_string()))?
            }
            ExportFormat::Csv => response.bytes().await?.to_vec(),
        };
        Ok(ExportPayload { format, body })
    }
}
