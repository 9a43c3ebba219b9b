//! Tag detail enrichment.
//!
//! Attaches a creation date and message to the first [`MAX_ENRICHED_TAGS`]
//! tags. The pointed-to commit's committer date is the baseline; annotated
//! tags override it with the tagger date and tag message. Every failure is
//! contained to its own tag.

use futures::future::join_all;
use tracing::debug;

use crate::services::github_api::GitHubApiTrait;
use crate::services::ordering::sort_recent_first;
use crate::types::errors::ApiError;
use crate::types::github::{Tag, TagSummary, DEFAULT_TAG_MESSAGE, PLACEHOLDER_BRANCH};

/// Tags enriched per view; later tags are dropped from the result.
pub const MAX_ENRICHED_TAGS: usize = 20;

/// Enriches one tag, falling back to [`Tag::fallback`] when its commit is unavailable.
pub async fn enrich_tag<A>(api: &A, repo: &str, summary: &TagSummary) -> Tag
where
    A: GitHubApiTrait + ?Sized,
{
    let commit = match api.get_commit(repo, &summary.commit.sha).await {
        Ok(commit) => commit,
        Err(e) => {
            debug!(tag = %summary.name, error = %e, "tag commit lookup failed");
            return Tag::fallback(summary);
        }
    };

    let mut tag = Tag {
        name: summary.name.clone(),
        commit_sha: summary.commit.sha.clone(),
        created_date: commit.commit.committer.map(|c| c.date),
        message: DEFAULT_TAG_MESSAGE.to_string(),
        branches: vec![PLACEHOLDER_BRANCH.to_string()],
    };

    match apply_annotation(api, repo, &mut tag).await {
        Ok(true) => {}
        Ok(false) => debug!(tag = %tag.name, "lightweight tag, keeping commit date"),
        Err(e) => debug!(tag = %tag.name, error = %e, "tag ref lookup failed, keeping commit date"),
    }
    tag
}

/// Overwrites date and message from the annotated tag object, if there is one.
///
/// Returns whether tagger information was applied.
async fn apply_annotation<A>(api: &A, repo: &str, tag: &mut Tag) -> Result<bool, ApiError>
where
    A: GitHubApiTrait + ?Sized,
{
    let git_ref = api.get_tag_ref(repo, &tag.name).await?;
    if !git_ref.object.is_annotated_tag() {
        return Ok(false);
    }

    let object = api.get_tag_object(repo, &git_ref.object.sha).await?;
    let Some(tagger) = object.tagger else {
        return Ok(false);
    };

    tag.created_date = Some(tagger.date);
    tag.message = object
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_TAG_MESSAGE.to_string());
    Ok(true)
}

/// Enriches the first [`MAX_ENRICHED_TAGS`] tags concurrently, most recent first.
pub async fn enrich_tags<A>(api: &A, repo: &str, tags: &[TagSummary]) -> Vec<Tag>
where
    A: GitHubApiTrait + ?Sized,
{
    let capped = &tags[..tags.len().min(MAX_ENRICHED_TAGS)];
    let mut enriched = join_all(capped.iter().map(|summary| enrich_tag(api, repo, summary))).await;
    sort_recent_first(&mut enriched, |t| t.created_date.as_ref());
    enriched
}
