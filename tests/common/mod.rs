//! Shared fixtures for the integration tests: an in-memory GitHub API double
//! that records every call, plus builders for the wire types.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use eztag::services::github_api::GitHubApiTrait;
use eztag::types::errors::ApiError;
use eztag::types::github::{
    BranchSummary, CommitData, CommitDetail, CommitRef, CreateRefRequest, CreateTagObjectRequest,
    GitObject, GitRef, GitTagObject, Repository, Signature, TagSummary, User,
};

/// Fixed "now" used across tests.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

pub fn not_found() -> ApiError {
    ApiError::Status {
        status: 404,
        message: "Not Found".to_string(),
    }
}

pub fn signature(date: DateTime<Utc>) -> Signature {
    Signature {
        name: "Mona".to_string(),
        email: "mona@example.com".to_string(),
        date,
    }
}

pub fn commit(sha: &str, date: DateTime<Utc>, message: &str) -> CommitDetail {
    CommitDetail {
        sha: sha.to_string(),
        commit: CommitData {
            message: message.to_string(),
            committer: Some(signature(date)),
        },
    }
}

pub fn branch_summary(name: &str, sha: &str) -> BranchSummary {
    BranchSummary {
        name: name.to_string(),
        commit: CommitRef { sha: sha.to_string() },
    }
}

pub fn tag_summary(name: &str, sha: &str) -> TagSummary {
    TagSummary {
        name: name.to_string(),
        commit: CommitRef { sha: sha.to_string() },
    }
}

pub fn lightweight_ref(tag: &str, sha: &str) -> GitRef {
    GitRef {
        ref_name: format!("refs/tags/{}", tag),
        object: GitObject {
            sha: sha.to_string(),
            object_type: "commit".to_string(),
        },
    }
}

pub fn annotated_ref(tag: &str, object_sha: &str) -> GitRef {
    GitRef {
        ref_name: format!("refs/tags/{}", tag),
        object: GitObject {
            sha: object_sha.to_string(),
            object_type: "tag".to_string(),
        },
    }
}

pub fn tag_object(tag: &str, sha: &str, message: Option<&str>, date: Option<DateTime<Utc>>) -> GitTagObject {
    GitTagObject {
        sha: sha.to_string(),
        tag: tag.to_string(),
        message: message.map(str::to_string),
        tagger: date.map(signature),
    }
}

pub fn repo(full_name: &str, updated_days_ago: i64) -> Repository {
    let name = full_name.rsplit('/').next().unwrap_or(full_name).to_string();
    Repository {
        full_name: full_name.to_string(),
        name,
        description: None,
        language: Some("Rust".to_string()),
        updated_at: days_ago(updated_days_ago),
        html_url: format!("https://github.com/{}", full_name),
        archived: false,
    }
}

pub fn user() -> User {
    User {
        login: "octocat".to_string(),
        name: Some("The Octocat".to_string()),
        email: None,
        avatar_url: "https://avatars.example/octocat".to_string(),
    }
}

/// Scripted GitHub API. Lookups missing from the maps answer 404.
#[derive(Default)]
pub struct MockGitHubApi {
    pub user: Option<User>,
    pub repo_pages: Vec<Vec<Repository>>,
    pub branches: Vec<BranchSummary>,
    pub tags: Vec<TagSummary>,
    pub branches_error: Option<ApiError>,
    pub commits: HashMap<String, CommitDetail>,
    pub tag_refs: HashMap<String, GitRef>,
    pub tag_objects: HashMap<String, GitTagObject>,
    pub branch_heads: HashMap<String, String>,
    pub create_tag_object_error: Option<ApiError>,
    pub create_ref_error: Option<ApiError>,
    pub calls: Mutex<Vec<String>>,
    pub created_tag_objects: Mutex<Vec<CreateTagObjectRequest>>,
    pub created_refs: Mutex<Vec<CreateRefRequest>>,
}

impl MockGitHubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_commit(mut self, detail: CommitDetail) -> Self {
        self.commits.insert(detail.sha.clone(), detail);
        self
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls whose name starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

#[async_trait]
impl GitHubApiTrait for MockGitHubApi {
    async fn get_current_user(&self) -> Result<User, ApiError> {
        self.record("get_current_user".to_string());
        self.user.clone().ok_or(ApiError::Status {
            status: 401,
            message: "Bad credentials".to_string(),
        })
    }

    async fn list_repositories(&self, page: u32) -> Result<Vec<Repository>, ApiError> {
        self.record(format!("list_repositories:{}", page));
        Ok(self
            .repo_pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_branches(&self, repo: &str) -> Result<Vec<BranchSummary>, ApiError> {
        self.record(format!("list_branches:{}", repo));
        match &self.branches_error {
            Some(e) => Err(e.clone()),
            None => Ok(self.branches.clone()),
        }
    }

    async fn list_tags(&self, repo: &str) -> Result<Vec<TagSummary>, ApiError> {
        self.record(format!("list_tags:{}", repo));
        Ok(self.tags.clone())
    }

    async fn get_commit(&self, _repo: &str, sha: &str) -> Result<CommitDetail, ApiError> {
        self.record(format!("get_commit:{}", sha));
        self.commits.get(sha).cloned().ok_or_else(not_found)
    }

    async fn get_tag_ref(&self, _repo: &str, tag: &str) -> Result<GitRef, ApiError> {
        self.record(format!("get_tag_ref:{}", tag));
        self.tag_refs.get(tag).cloned().ok_or_else(not_found)
    }

    async fn get_tag_object(&self, _repo: &str, sha: &str) -> Result<GitTagObject, ApiError> {
        self.record(format!("get_tag_object:{}", sha));
        self.tag_objects.get(sha).cloned().ok_or_else(not_found)
    }

    async fn get_branch(&self, _repo: &str, branch: &str) -> Result<BranchSummary, ApiError> {
        self.record(format!("get_branch:{}", branch));
        self.branch_heads
            .get(branch)
            .map(|sha| branch_summary(branch, sha))
            .ok_or_else(not_found)
    }

    async fn create_tag_object(
        &self,
        _repo: &str,
        request: &CreateTagObjectRequest,
    ) -> Result<GitTagObject, ApiError> {
        self.record(format!("create_tag_object:{}", request.tag));
        if let Some(e) = &self.create_tag_object_error {
            return Err(e.clone());
        }
        self.created_tag_objects.lock().unwrap().push(request.clone());
        Ok(GitTagObject {
            sha: format!("tagobj-{}", request.tag),
            tag: request.tag.clone(),
            message: Some(request.message.clone()),
            tagger: Some(request.tagger.clone()),
        })
    }

    async fn create_ref(&self, _repo: &str, request: &CreateRefRequest) -> Result<GitRef, ApiError> {
        self.record(format!("create_ref:{}", request.ref_name));
        if let Some(e) = &self.create_ref_error {
            return Err(e.clone());
        }
        self.created_refs.lock().unwrap().push(request.clone());
        Ok(GitRef {
            ref_name: request.ref_name.clone(),
            object: GitObject {
                sha: request.sha.clone(),
                object_type: "commit".to_string(),
            },
        })
    }
}
