//! GitHub REST API client for eztag.
//!
//! Every call carries the pinned API version header and, when the session
//! holds one, the bearer token. Non-2xx responses become
//! [`ApiError::Status`] with the body's `message` when present.
//! There is no caching and no retry at this layer.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::types::errors::ApiError;
use crate::types::github::{
    BranchSummary, CommitDetail, CreateRefRequest, CreateTagObjectRequest, GitRef, GitTagObject,
    Repository, TagSummary, User,
};
use crate::types::session::Session;
use crate::types::settings::GitHubSettings;

/// Session shared between the controller (writer) and the API client (reader).
pub type SharedSession = Arc<RwLock<Session>>;

/// Page size used when listing repositories.
pub const REPOS_PER_PAGE: usize = 100;

/// Typed GitHub endpoints used by the finder, the enricher, and the tag creator.
#[async_trait]
pub trait GitHubApiTrait: Send + Sync {
    async fn get_current_user(&self) -> Result<User, ApiError>;
    /// One page (1-based) of the user's own repositories, most recently updated first.
    async fn list_repositories(&self, page: u32) -> Result<Vec<Repository>, ApiError>;
    async fn list_branches(&self, repo: &str) -> Result<Vec<BranchSummary>, ApiError>;
    async fn list_tags(&self, repo: &str) -> Result<Vec<TagSummary>, ApiError>;
    async fn get_commit(&self, repo: &str, sha: &str) -> Result<CommitDetail, ApiError>;
    async fn get_tag_ref(&self, repo: &str, tag: &str) -> Result<GitRef, ApiError>;
    async fn get_tag_object(&self, repo: &str, sha: &str) -> Result<GitTagObject, ApiError>;
    async fn get_branch(&self, repo: &str, branch: &str) -> Result<BranchSummary, ApiError>;
    async fn create_tag_object(
        &self,
        repo: &str,
        request: &CreateTagObjectRequest,
    ) -> Result<GitTagObject, ApiError>;
    async fn create_ref(&self, repo: &str, request: &CreateRefRequest) -> Result<GitRef, ApiError>;
}

/// reqwest-backed client.
#[derive(Clone)]
pub struct GitHubClient {
    base_url: String,
    http: Client,
    session: SharedSession,
}

impl GitHubClient {
    /// Creates a client for the configured API base URL.
    ///
    /// # Errors
    /// [`ApiError::Network`] when the underlying HTTP client cannot be built.
    pub fn new(
        settings: &GitHubSettings,
        timeout: Duration,
        session: SharedSession,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("eztag/", env!("CARGO_PKG_VERSION"))),
        );
        let version = HeaderValue::from_str(&settings.api_version)
            .map_err(|e| ApiError::Network(format!("invalid API version header: {}", e)))?;
        headers.insert("X-GitHub-Api-Version", version);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            http,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn bearer(&self) -> Option<String> {
        let session = match self.session.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        session.access_token().map(|t| format!("Bearer {}", t))
    }

    /// Sends `method endpoint` with an optional JSON body and decodes the JSON reply.
    ///
    /// A missing token does not short-circuit; the request goes out without
    /// `Authorization` and the server decides.
    pub async fn call<T, B>(&self, endpoint: &str, method: Method, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%method, %url, "github api call");

        let mut request = self.http.request(method, &url);
        if let Some(auth) = self.bearer() {
            request = request.header(AUTHORIZATION, auth);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &text));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.call::<T, Value>(endpoint, Method::GET, None).await
    }
}

/// Builds the error for a non-success response from its raw body.
pub fn status_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status));
    ApiError::Status { status, message }
}

#[async_trait]
impl GitHubApiTrait for GitHubClient {
    async fn get_current_user(&self) -> Result<User, ApiError> {
        self.get("/user").await
    }

    async fn list_repositories(&self, page: u32) -> Result<Vec<Repository>, ApiError> {
        self.get(&format!(
            "/user/repos?type=owner&sort=updated&per_page={}&page={}",
            REPOS_PER_PAGE, page
        ))
        .await
    }

    async fn list_branches(&self, repo: &str) -> Result<Vec<BranchSummary>, ApiError> {
        self.get(&format!("/repos/{}/branches", repo)).await
    }

    async fn list_tags(&self, repo: &str) -> Result<Vec<TagSummary>, ApiError> {
        self.get(&format!("/repos/{}/tags", repo)).await
    }

    async fn get_commit(&self, repo: &str, sha: &str) -> Result<CommitDetail, ApiError> {
        self.get(&format!("/repos/{}/commits/{}", repo, sha)).await
    }

    async fn get_tag_ref(&self, repo: &str, tag: &str) -> Result<GitRef, ApiError> {
        self.get(&format!("/repos/{}/git/refs/tags/{}", repo, tag)).await
    }

    async fn get_tag_object(&self, repo: &str, sha: &str) -> Result<GitTagObject, ApiError> {
        self.get(&format!("/repos/{}/git/tags/{}", repo, sha)).await
    }

    async fn get_branch(&self, repo: &str, branch: &str) -> Result<BranchSummary, ApiError> {
        self.get(&format!("/repos/{}/branches/{}", repo, branch)).await
    }

    async fn create_tag_object(
        &self,
        repo: &str,
        request: &CreateTagObjectRequest,
    ) -> Result<GitTagObject, ApiError> {
        self.call(&format!("/repos/{}/git/tags", repo), Method::POST, Some(request))
            .await
    }

    async fn create_ref(&self, repo: &str, request: &CreateRefRequest) -> Result<GitRef, ApiError> {
        self.call(&format!("/repos/{}/git/refs", repo), Method::POST, Some(request))
            .await
    }
}
