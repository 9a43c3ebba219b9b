use std::fmt;

use zeroize::Zeroize;

use super::errors::SessionError;
use super::github::User;

/// Authentication state of the running application.
///
/// A user is only ever attached to a session that already holds a token.
#[derive(Clone, Default, PartialEq)]
pub struct Session {
    access_token: Option<String>,
    user: Option<User>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session holding a token but no user identity yet.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            user: None,
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Replaces the token and drops any previously loaded user.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.clear();
        self.access_token = Some(token.into());
    }

    pub fn set_user(&mut self, user: User) -> Result<(), SessionError> {
        if self.access_token.is_none() {
            return Err(SessionError::NoToken);
        }
        self.user = Some(user);
        Ok(())
    }

    /// Wipes the token from memory and forgets the user.
    pub fn clear(&mut self) {
        if let Some(mut token) = self.access_token.take() {
            token.zeroize();
        }
        self.user = None;
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .finish()
    }
}
