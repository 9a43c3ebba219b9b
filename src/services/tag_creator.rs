//! Annotated tag creation.
//!
//! Resolves the branch head, creates the tag object, then the
//! `refs/tags/{name}` reference. A failed step stops the sequence.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::services::github_api::GitHubApiTrait;
use crate::types::errors::{TagCreateError, ValidationError};
use crate::types::github::{CreateRefRequest, CreateTagObjectRequest, Signature, User};

/// Progress of a tag creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagCreationStage {
    Idle,
    BranchResolved,
    TagObjectCreated,
    RefCreated,
}

/// User input for a new tag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewTag {
    pub name: String,
    pub message: Option<String>,
    pub branch: Option<String>,
}

/// What was created.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedTag {
    pub name: String,
    pub sha: String,
    pub ref_name: String,
}

/// Validated form of [`NewTag`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTag {
    pub name: String,
    pub message: String,
    pub branch: String,
}

impl NewTag {
    /// Trims input and applies the default message `"Tag {name}"`.
    pub fn validate(&self) -> Result<ValidatedTag, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingTagName);
        }
        let branch = match self.branch.as_deref().map(str::trim) {
            Some(b) if !b.is_empty() => b,
            _ => return Err(ValidationError::MissingBranch),
        };
        let message = match self.message.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => format!("Tag {}", name),
        };
        Ok(ValidatedTag {
            name: name.to_string(),
            message,
            branch: branch.to_string(),
        })
    }
}

/// Drives one tag creation and records how far it got.
pub struct TagCreator<'a, A: GitHubApiTrait + ?Sized> {
    api: &'a A,
    stage: TagCreationStage,
}

impl<'a, A: GitHubApiTrait + ?Sized> TagCreator<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            stage: TagCreationStage::Idle,
        }
    }

    /// Last stage reached.
    pub fn stage(&self) -> TagCreationStage {
        self.stage
    }

    /// Returns to `Idle` once the caller has refreshed its tag list.
    pub fn finish(&mut self) {
        self.stage = TagCreationStage::Idle;
    }

    /// Creates `input` on `repo` with `tagger` as author, dated `now`.
    ///
    /// # Errors
    /// [`TagCreateError::Validation`] before any request, or the first
    /// [`TagCreateError::Api`] encountered. On error the stage stays at the
    /// last completed step.
    pub async fn create(
        &mut self,
        repo: &str,
        input: &NewTag,
        tagger: &User,
        now: DateTime<Utc>,
    ) -> Result<CreatedTag, TagCreateError> {
        self.stage = TagCreationStage::Idle;
        let tag = input.validate()?;

        // Fresh lookup so the tag never points at a stale head.
        let branch = self.api.get_branch(repo, &tag.branch).await?;
        let sha = branch.commit.sha;
        self.stage = TagCreationStage::BranchResolved;

        let object = CreateTagObjectRequest {
            tag: tag.name.clone(),
            message: tag.message,
            object: sha.clone(),
            object_type: "commit".to_string(),
            tagger: Signature {
                name: tagger.display_name().to_string(),
                email: tagger.commit_email(),
                date: now,
            },
        };
        if let Err(e) = self.api.create_tag_object(repo, &object).await {
            warn!(repo, tag = %tag.name, error = %e, "creating tag object failed");
            return Err(e.into());
        }
        self.stage = TagCreationStage::TagObjectCreated;

        let reference = CreateRefRequest {
            ref_name: format!("refs/tags/{}", tag.name),
            sha: sha.clone(),
        };
        if let Err(e) = self.api.create_ref(repo, &reference).await {
            warn!(repo, tag = %tag.name, error = %e, "creating tag ref failed");
            return Err(e.into());
        }
        self.stage = TagCreationStage::RefCreated;

        info!(repo, tag = %tag.name, %sha, "tag created");
        Ok(CreatedTag {
            name: tag.name,
            sha,
            ref_name: reference.ref_name,
        })
    }
}
