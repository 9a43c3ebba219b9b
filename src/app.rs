//! App Core for eztag.
//!
//! Central controller owning the session store, the navigation controller,
//! and the view model. Every user action goes through a method here; a
//! failed whole operation leaves the current screen in place and returns one
//! error for display.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::database::connection::Database;
use crate::managers::navigation_manager::{NavigationManager, NavigationManagerTrait};
use crate::managers::repository_manager::{RepositoryManager, SortKey};
use crate::managers::session_manager::{SessionManager, SessionManagerTrait};
use crate::platform;
use crate::services::branch_finder::find_recent_branches;
use crate::services::crypto_service::CryptoService;
use crate::services::github_api::{GitHubApiTrait, GitHubClient, REPOS_PER_PAGE};
use crate::services::oauth::{generate_state, OAuthClient};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::tag_creator::{CreatedTag, NewTag, TagCreator};
use crate::services::tag_enricher::enrich_tags;
use crate::types::errors::{AppError, AuthError, ConfigError, SessionError, TagCreateError};
use crate::types::github::Repository;
use crate::types::navigation::NavigationState;

/// Upper bound on repository pages requested per list fetch.
pub const MAX_REPOSITORY_PAGES: u32 = 10;

/// Source of "now" for the recent-branch window and tagger dates.
pub type Clock = fn() -> DateTime<Utc>;

/// Central application struct.
pub struct App {
    pub settings_engine: SettingsEngine,
    pub session_manager: SessionManager,
    pub navigation: NavigationManager,
    pub repositories: RepositoryManager,
    api: Arc<dyn GitHubApiTrait>,
    oauth: OAuthClient,
    crypto: CryptoService,
    client_id: Option<String>,
    clock: Clock,
}

impl App {
    /// Builds the app from loaded settings and an open database, talking to
    /// the configured GitHub API.
    pub fn new(settings_engine: SettingsEngine, db: Arc<Database>) -> Result<Self, AppError> {
        let session_manager = SessionManager::new(db)?;
        let settings = settings_engine.get_settings();
        let api = GitHubClient::new(
            &settings.github,
            Duration::from_secs(settings.network.request_timeout_secs),
            session_manager.shared(),
        )?;
        Self::assemble(settings_engine, session_manager, Arc::new(api))
    }

    /// Like [`App::new`] but with a caller-supplied API implementation.
    pub fn with_api(
        settings_engine: SettingsEngine,
        db: Arc<Database>,
        api: Arc<dyn GitHubApiTrait>,
    ) -> Result<Self, AppError> {
        let session_manager = SessionManager::new(db)?;
        Self::assemble(settings_engine, session_manager, api)
    }

    /// Loads settings and opens the token database from the platform paths
    /// (or their `EZTAG_CONFIG` / `EZTAG_DATA_DIR` overrides). An unreadable
    /// settings file is logged and replaced by defaults.
    pub fn open_default() -> Result<Self, AppError> {
        let mut settings_engine = SettingsEngine::new(None);
        if let Err(e) = settings_engine.load() {
            warn!(
                path = %settings_engine.get_config_path().display(),
                error = %e,
                "settings unreadable, using defaults"
            );
        }
        let db_path = platform::database_path();
        let db = Database::open(&db_path)
            .map_err(|e| SessionError::DatabaseError(format!("{}: {}", db_path.display(), e)))?;
        Self::new(settings_engine, Arc::new(db))
    }

    fn assemble(
        settings_engine: SettingsEngine,
        session_manager: SessionManager,
        api: Arc<dyn GitHubApiTrait>,
    ) -> Result<Self, AppError> {
        let settings = settings_engine.get_settings();
        let oauth = OAuthClient::new(
            &settings.auth,
            &settings.github,
            Duration::from_secs(settings.network.request_timeout_secs),
        )?;
        Ok(Self {
            settings_engine,
            session_manager,
            navigation: NavigationManager::new(),
            repositories: RepositoryManager::new(),
            api,
            oauth,
            crypto: CryptoService::new(),
            client_id: None,
            clock: Utc::now,
        })
    }

    /// Replaces the clock; used to pin "now" in tests.
    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn current_screen(&self) -> &NavigationState {
        self.navigation.current()
    }

    /// Startup: load the client id, then finish the authorization callback
    /// if its state matches the sign-in started by this run, else resume a
    /// stored session, else show the sign-in screen.
    ///
    /// A callback with an unknown state is ignored here; it never discards a
    /// stored session. A missing client id is logged but does not stop
    /// startup; it only blocks [`App::begin_sign_in`].
    pub async fn initialize(
        &mut self,
        callback: Option<(&str, &str)>,
    ) -> Result<NavigationState, AppError> {
        match self.oauth.fetch_client_id().await {
            Ok(id) => self.client_id = Some(id),
            Err(e) => warn!(error = %e, "sign-in unavailable"),
        }

        let callback = match callback {
            Some((_, state)) if !self.session_manager.oauth_state_matches(state) => {
                debug!("ignoring authorization callback with unknown state");
                None
            }
            other => other,
        };

        if let Some((code, state)) = callback {
            self.complete_sign_in(code, state).await?;
        } else if self.session_manager.restore()? {
            self.load_user().await?;
        } else {
            self.navigation.navigate(NavigationState::Auth, false);
        }
        Ok(self.current_screen().clone())
    }

    /// Starts the authorization-code flow and returns the redirect URL.
    pub fn begin_sign_in(&mut self) -> Result<String, AppError> {
        let client_id = self.client_id.clone().ok_or(ConfigError::MissingClientId)?;
        let state = generate_state(&self.crypto)
            .map_err(|e| SessionError::CryptoError(e.to_string()))?;
        let url = self.oauth.authorize_url(&client_id, &state)?;
        self.session_manager.begin_oauth(state);
        Ok(url)
    }

    /// Handles the provider's redirect back with `code` and `state`.
    ///
    /// Any failure before a token is stored lands on the sign-in screen.
    pub async fn complete_sign_in(&mut self, code: &str, state: &str) -> Result<(), AppError> {
        if let Err(e) = self.session_manager.verify_oauth_state(state) {
            self.navigation.navigate(NavigationState::Auth, false);
            return Err(e.into());
        }

        let token = match self.oauth.exchange_code(code).await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "token exchange failed");
                self.navigation.navigate(NavigationState::Auth, false);
                return Err(e.into());
            }
        };

        self.session_manager.sign_in(&token)?;
        self.load_user().await
    }

    /// Fetches the signed-in user, then their repositories. An unusable token
    /// signs the user out.
    pub async fn load_user(&mut self) -> Result<(), AppError> {
        let user = match self.api.get_current_user().await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "failed to fetch user, signing out");
                self.sign_out()?;
                return Err(e.into());
            }
        };
        info!(login = %user.login, "signed in");
        self.session_manager.set_user(user)?;
        self.load_repositories().await
    }

    /// Shows the repository list and refreshes it from the API, page by page.
    pub async fn load_repositories(&mut self) -> Result<(), AppError> {
        self.navigation.navigate(NavigationState::RepoList, false);

        let mut all = Vec::new();
        for page in 1..=MAX_REPOSITORY_PAGES {
            let batch = self.api.list_repositories(page).await.map_err(|e| {
                warn!(error = %e, "failed to load repositories");
                e
            })?;
            let last = batch.len() < REPOS_PER_PAGE;
            all.extend(batch);
            if last {
                break;
            }
        }

        self.repositories.set_repositories(all);
        info!(count = self.repositories.repositories().len(), "repositories loaded");
        Ok(())
    }

    /// Opens the detail screen of a repository from the loaded list.
    pub async fn open_repository(&mut self, full_name: &str, skip_history: bool) -> Result<(), AppError> {
        let repo = self
            .repositories
            .find(full_name)
            .cloned()
            .ok_or_else(|| AppError::RepositoryNotFound(full_name.to_string()))?;
        self.navigation
            .navigate(NavigationState::RepoDetail(repo.clone()), skip_history);
        self.load_repository_details(&repo).await
    }

    /// Replaces branches and tags with a fresh fetch for `repo`.
    pub async fn load_repository_details(&mut self, repo: &Repository) -> Result<(), AppError> {
        self.repositories.clear_detail();
        let name = repo.full_name.as_str();
        let api = Arc::clone(&self.api);

        let (branch_list, tag_list) =
            futures::try_join!(api.list_branches(name), api.list_tags(name)).map_err(|e| {
                warn!(repo = name, error = %e, "failed to load repository details");
                e
            })?;

        let now = (self.clock)();
        let branches = find_recent_branches(api.as_ref(), name, &branch_list, now).await;
        let tags = enrich_tags(api.as_ref(), name, &tag_list).await;
        self.repositories.set_detail(branches, tags);
        Ok(())
    }

    /// Creates an annotated tag on the open repository, then refreshes its
    /// branches and tags.
    pub async fn create_tag(&mut self, input: NewTag) -> Result<CreatedTag, AppError> {
        input.validate().map_err(TagCreateError::from)?;

        let repo = self
            .navigation
            .current()
            .repository()
            .cloned()
            .ok_or(AppError::NoRepositorySelected)?;
        let tagger = self
            .session_manager
            .snapshot()
            .user()
            .cloned()
            .ok_or(AuthError::NotSignedIn)?;

        let api = Arc::clone(&self.api);
        let mut creator = TagCreator::new(api.as_ref());
        let created = creator
            .create(&repo.full_name, &input, &tagger, (self.clock)())
            .await?;

        if let Err(e) = self.load_repository_details(&repo).await {
            warn!(error = %e, "tag created but refresh failed");
        }
        creator.finish();
        Ok(created)
    }

    /// Forgets the session, the lists, and returns to the sign-in screen.
    pub fn sign_out(&mut self) -> Result<(), AppError> {
        self.session_manager.sign_out()?;
        self.repositories.clear();
        self.navigation.navigate(NavigationState::Auth, false);
        Ok(())
    }

    /// History back. Re-fetches details when landing on a repository.
    pub async fn go_back(&mut self) -> Result<NavigationState, AppError> {
        let has_session = self.session_manager.is_authenticated();
        let popped = self.navigation.back(has_session);
        self.restore_popped(popped).await
    }

    /// History forward. Re-fetches details when landing on a repository.
    pub async fn go_forward(&mut self) -> Result<NavigationState, AppError> {
        let has_session = self.session_manager.is_authenticated();
        let popped = self.navigation.forward(has_session);
        self.restore_popped(popped).await
    }

    async fn restore_popped(&mut self, popped: Option<NavigationState>) -> Result<NavigationState, AppError> {
        if let Some(NavigationState::RepoDetail(repo)) = &popped {
            self.load_repository_details(repo).await?;
        }
        Ok(self.current_screen().clone())
    }

    pub fn sort_repositories(&mut self, key: SortKey) {
        self.repositories.sort_repositories(key);
    }

    pub fn sort_branches(&mut self, key: SortKey) {
        self.repositories.sort_branches(key);
    }

    pub fn sort_tags(&mut self, key: SortKey) {
        self.repositories.sort_tags(key);
    }
}
