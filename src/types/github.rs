use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder branch association attached to every enriched tag.
///
/// Precise branch containment is not computed; every tag reports `main`.
pub const PLACEHOLDER_BRANCH: &str = "main";

/// Message reported for tags without an annotated tagger message.
pub const DEFAULT_TAG_MESSAGE: &str = "No message";

/// GitHub user profile as returned by `GET /user`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: String,
}

impl User {
    /// Name shown to the user and written as tagger name: display name, or login.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.login,
        }
    }

    /// Public email, or the GitHub no-reply address for the login.
    pub fn commit_email(&self) -> String {
        match self.email.as_deref() {
            Some(email) if !email.is_empty() => email.to_string(),
            _ => format!("{}@users.noreply.github.com", self.login),
        }
    }
}

/// A repository owned by the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Repository {
    pub full_name: String,
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub html_url: String,
    #[serde(default)]
    pub archived: bool,
}

/// Commit pointer embedded in branch and tag listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitRef {
    pub sha: String,
}

/// Entry of `GET /repos/{repo}/branches` and `GET /repos/{repo}/branches/{branch}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BranchSummary {
    pub name: String,
    pub commit: CommitRef,
}

/// Entry of `GET /repos/{repo}/tags`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagSummary {
    pub name: String,
    pub commit: CommitRef,
}

/// Response of `GET /repos/{repo}/commits/{sha}`; only the fields we read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitDetail {
    pub sha: String,
    pub commit: CommitData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitData {
    pub message: String,
    pub committer: Option<Signature>,
}

/// Name/email/date triple used by committers and taggers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub date: DateTime<Utc>,
}

/// Response of `GET /repos/{repo}/git/refs/tags/{tag}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub object: GitObject,
}

/// Object a ref points at. `object_type` is `"commit"` for lightweight tags
/// and `"tag"` for annotated ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitObject {
    pub sha: String,
    #[serde(rename = "type")]
    pub object_type: String,
}

impl GitObject {
    pub fn is_annotated_tag(&self) -> bool {
        self.object_type == "tag"
    }
}

/// Response of `GET /repos/{repo}/git/tags/{sha}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitTagObject {
    pub sha: String,
    pub tag: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub tagger: Option<Signature>,
}

/// Body of `POST /repos/{repo}/git/tags`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateTagObjectRequest {
    pub tag: String,
    pub message: String,
    pub object: String,
    #[serde(rename = "type")]
    pub object_type: String,
    pub tagger: Signature,
}

/// Body of `POST /repos/{repo}/git/refs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateRefRequest {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
}

/// A branch of the repository being viewed, with head commit metadata when known.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Branch {
    pub name: String,
    pub head_sha: String,
    pub last_commit_date: Option<DateTime<Utc>>,
    pub last_commit_message: Option<String>,
}

impl Branch {
    /// Branch with unknown commit info.
    pub fn unknown(summary: &BranchSummary) -> Self {
        Self {
            name: summary.name.clone(),
            head_sha: summary.commit.sha.clone(),
            last_commit_date: None,
            last_commit_message: None,
        }
    }

    pub fn has_commit_info(&self) -> bool {
        self.last_commit_date.is_some()
    }
}

/// A tag of the repository being viewed, enriched with date and message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub name: String,
    pub commit_sha: String,
    pub created_date: Option<DateTime<Utc>>,
    pub message: String,
    pub branches: Vec<String>,
}

impl Tag {
    /// Record used when the tag's commit cannot be fetched.
    pub fn fallback(summary: &TagSummary) -> Self {
        Self {
            name: summary.name.clone(),
            commit_sha: summary.commit.sha.clone(),
            created_date: None,
            message: DEFAULT_TAG_MESSAGE.to_string(),
            branches: vec![PLACEHOLDER_BRANCH.to_string()],
        }
    }
}

/// Response of the auth server's config endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    #[serde(default)]
    pub client_id: Option<String>,
}

/// Response of the auth server's token exchange endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenExchangeResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
