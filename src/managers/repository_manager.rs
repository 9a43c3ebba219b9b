//! Repository list and detail view model for eztag.
//!
//! Holds what the current screens display: the repository list, and for the
//! open repository its recent branches and enriched tags. Collections are
//! replaced wholesale on every fetch; filtering and sorting only reorder or
//! hide what was fetched.

use std::str::FromStr;

use crate::services::ordering::{insertion_sort_by, sort_recent_first};
use crate::types::github::{Branch, Repository, Tag};

/// Sort keys offered for the repository and branch lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    /// Most recently updated or committed first.
    Updated,
    /// Most recently created first (tags).
    Created,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortKey::Name),
            "updated" => Ok(SortKey::Updated),
            "created" => Ok(SortKey::Created),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

fn by_name_ci(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Case-insensitive substring match on name or description.
pub fn filter_repositories<'a>(repos: &'a [Repository], query: &str) -> Vec<&'a Repository> {
    let query = query.trim().to_lowercase();
    repos
        .iter()
        .filter(|repo| {
            query.is_empty()
                || repo.name.to_lowercase().contains(&query)
                || repo
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&query))
        })
        .collect()
}

pub fn sort_repositories(repos: &mut [Repository], key: SortKey) {
    match key {
        SortKey::Name => repos.sort_by(|a, b| by_name_ci(&a.name, &b.name)),
        SortKey::Updated | SortKey::Created => repos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
    }
}

pub fn sort_branches(branches: &mut [Branch], key: SortKey) {
    match key {
        SortKey::Name => insertion_sort_by(branches, |a, b| by_name_ci(&a.name, &b.name)),
        SortKey::Updated | SortKey::Created => {
            sort_recent_first(branches, |b| b.last_commit_date.as_ref())
        }
    }
}

pub fn sort_tags(tags: &mut [Tag], key: SortKey) {
    match key {
        SortKey::Name => insertion_sort_by(tags, |a, b| by_name_ci(&a.name, &b.name)),
        SortKey::Updated | SortKey::Created => sort_recent_first(tags, |t| t.created_date.as_ref()),
    }
}

/// State behind the list and detail screens.
#[derive(Debug, Default)]
pub struct RepositoryManager {
    repositories: Vec<Repository>,
    branches: Vec<Branch>,
    tags: Vec<Tag>,
}

impl RepositoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the list, dropping archived repositories.
    pub fn set_repositories(&mut self, repos: Vec<Repository>) {
        self.repositories = repos.into_iter().filter(|r| !r.archived).collect();
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    pub fn find(&self, full_name: &str) -> Option<&Repository> {
        self.repositories.iter().find(|r| r.full_name == full_name)
    }

    pub fn filter(&self, query: &str) -> Vec<&Repository> {
        filter_repositories(&self.repositories, query)
    }

    pub fn sort_repositories(&mut self, key: SortKey) {
        sort_repositories(&mut self.repositories, key);
    }

    pub fn set_detail(&mut self, branches: Vec<Branch>, tags: Vec<Tag>) {
        self.branches = branches;
        self.tags = tags;
    }

    pub fn clear_detail(&mut self) {
        self.branches.clear();
        self.tags.clear();
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn sort_branches(&mut self, key: SortKey) {
        sort_branches(&mut self.branches, key);
    }

    pub fn sort_tags(&mut self, key: SortKey) {
        sort_tags(&mut self.tags, key);
    }

    /// Forgets everything, as on sign-out.
    pub fn clear(&mut self) {
        self.repositories.clear();
        self.clear_detail();
    }
}
