use serde::{Deserialize, Serialize};

/// Top-level application settings container.
///
/// Missing sections and fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppSettings {
    pub github: GitHubSettings,
    pub auth: AuthSettings,
    pub network: NetworkSettings,
}

/// GitHub REST API endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GitHubSettings {
    pub api_base_url: String,
    pub api_version: String,
    pub authorize_url: String,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.github.com".to_string(),
            api_version: "2022-11-28".to_string(),
            authorize_url: "https://github.com/login/oauth/authorize".to_string(),
        }
    }
}

/// Settings for the server that holds the OAuth client secret.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthSettings {
    /// Base URL serving `/api/config` and `/api/oauth/token`.
    pub server_url: String,
    /// Where GitHub sends the user back after authorization.
    pub redirect_uri: String,
    pub scope: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            redirect_uri: "http://localhost:8080/".to_string(),
            scope: "repo public_repo user".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkSettings {
    pub request_timeout_secs: u64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
        }
    }
}
