// eztag services
// Services provide core functionality: crypto, settings, the GitHub API and
// OAuth clients, and the branch/tag processing built on them.

pub mod branch_finder;
pub mod crypto_service;
pub mod github_api;
pub mod oauth;
pub mod ordering;
pub mod settings_engine;
pub mod tag_creator;
pub mod tag_enricher;
