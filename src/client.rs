//! HTTP gateway to the Santuri API.
//!
//! [`ApiClient`] issues one request per logical operation and folds every
//! failure mode (transport error, timeout, non-2xx status, malformed body)
//! into [`ApiError`]. Tools talk to it through the [`DocsApi`] trait so they
//! can be exercised against an in-process fake.
//!
//! # Endpoints
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | `POST` | `/api/mcp/search` | [`SearchResponse`] |
//! | `GET`  | `/api/mcp/sources?stackId=` | [`SourcesResponse`] |

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{SearchRequest, SearchResponse, Source, SourcesResponse};

pub const SEARCH_PATH: &str = "/api/mcp/search";
pub const SOURCES_PATH: &str = "/api/mcp/sources";

/// Operations the tools need from the remote API.
#[async_trait]
pub trait DocsApi: Send + Sync {
    /// Run a search. Results come back in the API's relevance order.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ApiError>;

    /// List the sources visible in `stack_id`, or all sources when `None`.
    async fn list_sources(&self, stack_id: Option<&str>) -> Result<Vec<Source>, ApiError>;

    /// Find a source by id or slug.
    async fn get_source(
        &self,
        id_or_slug: &str,
        stack_id: Option<&str>,
    ) -> Result<Option<Source>, ApiError> {
        let sources = self.list_sources(stack_id).await?;
        Ok(sources
            .into_iter()
            .find(|s| s.id == id_or_slug || s.slug == id_or_slug))
    }
}

/// Error body sent by the API on non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Authenticated (or anonymous) client for the Santuri API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<ApiConfig>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: Arc<ApiConfig>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("santuri-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self { config, http })
    }

    /// Send one request and decode the JSON reply as `T`.
    ///
    /// A body that fails to serialize surfaces from `send` as a
    /// [`ApiError::Transport`]; [`ApiError::Decode`] is kept for replies.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.config.api_url, path);
        tracing::debug!(%method, %url, "api request");

        let mut req = self
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(key) = &self.config.api_key {
            req = req.bearer_auth(key);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| self.transport_error(e))?;
        let status = resp.status();

        if !status.is_success() {
            let message = resp
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("API request failed with status {}", status.as_u16()));
            tracing::warn!(status = status.as_u16(), %url, %message, "api request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = resp.bytes().await.map_err(|e| self.transport_error(e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout {
                secs: self.config.timeout_secs,
            }
        } else {
            tracing::warn!(error = %err, "api transport error");
            ApiError::Transport(err)
        }
    }
}

#[async_trait]
impl DocsApi for ApiClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ApiError> {
        self.request(Method::POST, SEARCH_PATH, &[], Some(request))
            .await
    }

    async fn list_sources(&self, stack_id: Option<&str>) -> Result<Vec<Source>, ApiError> {
        let query: Vec<(&str, &str)> = stack_id.map(|id| ("stackId", id)).into_iter().collect();
        let resp: SourcesResponse = self
            .request(Method::GET, SOURCES_PATH, &query, None::<&()>)
            .await?;
        Ok(resp.sources)
    }
}
