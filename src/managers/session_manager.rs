//! Session Store for eztag.
//!
//! Holds the in-memory [`Session`] shared with the API client, persists the
//! access token encrypted in SQLite so it survives restarts, and keeps the
//! OAuth anti-CSRF state for the current run only.

use std::sync::{Arc, RwLock, RwLockWriteGuard};

use rusqlite::params;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::database::connection::Database;
use crate::services::crypto_service::{CryptoService, CryptoServiceTrait};
use crate::services::github_api::SharedSession;
use crate::types::credential::EncryptedData;
use crate::types::errors::{AuthError, SessionError};
use crate::types::github::User;
use crate::types::session::Session;

/// Token encryption key derived from a fixed identifier.
const TOKEN_KEY_PASSPHRASE: &str = "eztag-token-key-v1";
const TOKEN_KEY_SALT: &[u8] = b"eztag-token-salt";

/// Trait defining session store operations.
pub trait SessionManagerTrait {
    /// Loads a persisted token into the session. Returns whether one was found.
    fn restore(&self) -> Result<bool, SessionError>;
    /// Persists `token` and makes it the current session's token.
    fn sign_in(&self, token: &str) -> Result<(), SessionError>;
    fn set_user(&self, user: User) -> Result<(), SessionError>;
    /// Clears the in-memory session and the persisted token.
    fn sign_out(&self) -> Result<(), SessionError>;
    fn stored_token(&self) -> Result<Option<String>, SessionError>;
    fn snapshot(&self) -> Session;
    fn is_authenticated(&self) -> bool;
    /// Remembers the `state` sent with the authorization redirect.
    fn begin_oauth(&mut self, state: String);
    /// Consumes the pending state and checks the callback's `state` against it.
    fn verify_oauth_state(&mut self, state: &str) -> Result<(), AuthError>;
    fn has_pending_oauth(&self) -> bool;
    /// Whether `state` equals the pending state, without consuming it.
    fn oauth_state_matches(&self, state: &str) -> bool;
}

/// Session store backed by SQLite + CryptoService.
pub struct SessionManager {
    db: Arc<Database>,
    crypto: CryptoService,
    encryption_key: Zeroizing<Vec<u8>>,
    session: SharedSession,
    pending_state: Option<String>,
}

impl SessionManager {
    /// Creates a store with an empty session. Call [`SessionManagerTrait::restore`]
    /// to pick up a persisted token.
    pub fn new(db: Arc<Database>) -> Result<Self, SessionError> {
        let crypto = CryptoService::new();
        let encryption_key = crypto
            .derive_key(TOKEN_KEY_PASSPHRASE, TOKEN_KEY_SALT)
            .map_err(|e| SessionError::CryptoError(e.to_string()))?;

        Ok(Self {
            db,
            crypto,
            encryption_key,
            session: Arc::new(RwLock::new(Session::new())),
            pending_state: None,
        })
    }

    /// Handle given to the API client so every call sees the current token.
    pub fn shared(&self) -> SharedSession {
        Arc::clone(&self.session)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        match self.session.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn persist_token(&self, token: &str) -> Result<(), SessionError> {
        let encrypted = self
            .crypto
            .encrypt_aes256gcm(token.as_bytes(), &self.encryption_key)
            .map_err(|e| SessionError::CryptoError(e.to_string()))?;
        let now = chrono::Utc::now().timestamp();

        self.db
            .connection()
            .execute(
                "INSERT OR REPLACE INTO auth_token (id, encrypted_token, iv, auth_tag, updated_at) VALUES ('default', ?1, ?2, ?3, ?4)",
                params![encrypted.ciphertext, encrypted.iv, encrypted.auth_tag, now],
            )
            .map_err(|e| SessionError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

impl SessionManagerTrait for SessionManager {
    fn restore(&self) -> Result<bool, SessionError> {
        match self.stored_token()? {
            Some(token) => {
                self.write().set_token(token);
                info!("restored stored access token");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn sign_in(&self, token: &str) -> Result<(), SessionError> {
        self.persist_token(token)?;
        self.write().set_token(token);
        Ok(())
    }

    fn set_user(&self, user: User) -> Result<(), SessionError> {
        self.write().set_user(user)
    }

    fn sign_out(&self) -> Result<(), SessionError> {
        self.write().clear();
        self.db
            .connection()
            .execute("DELETE FROM auth_token", [])
            .map_err(|e| SessionError::DatabaseError(e.to_string()))?;
        info!("signed out");
        Ok(())
    }

    fn stored_token(&self) -> Result<Option<String>, SessionError> {
        let conn = self.db.connection();
        let result = conn.query_row(
            "SELECT encrypted_token, iv, auth_tag FROM auth_token WHERE id = 'default'",
            [],
            |row| {
                Ok(EncryptedData {
                    ciphertext: row.get(0)?,
                    iv: row.get(1)?,
                    auth_tag: row.get(2)?,
                })
            },
        );

        match result {
            Ok(encrypted) => {
                let decrypted = self
                    .crypto
                    .decrypt_aes256gcm(&encrypted, &self.encryption_key)
                    .map_err(|e| SessionError::CryptoError(e.to_string()))?;
                let token = String::from_utf8(decrypted)
                    .map_err(|e| SessionError::CryptoError(e.to_string()))?;
                Ok(Some(token))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(SessionError::DatabaseError(e.to_string())),
        }
    }

    fn snapshot(&self) -> Session {
        match self.session.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated()
    }

    fn begin_oauth(&mut self, state: String) {
        self.pending_state = Some(state);
    }

    fn verify_oauth_state(&mut self, state: &str) -> Result<(), AuthError> {
        match self.pending_state.take() {
            Some(expected) if expected == state => Ok(()),
            _ => {
                debug!("oauth callback state did not match");
                Err(AuthError::StateMismatch)
            }
        }
    }

    fn has_pending_oauth(&self) -> bool {
        self.pending_state.is_some()
    }

    fn oauth_state_matches(&self, state: &str) -> bool {
        self.pending_state.as_deref() == Some(state)
    }
}
