use std::fmt;

// === CryptoError ===

/// Errors related to cryptographic operations.
#[derive(Debug)]
pub enum CryptoError {
    /// Failed to derive encryption key from password.
    KeyDerivation(String),
    /// Encryption operation failed.
    Encryption(String),
    /// Decryption operation failed.
    Decryption(String),
    /// Failed to generate random bytes.
    RandomGeneration(String),
    /// The provided key is invalid.
    InvalidKey(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::KeyDerivation(msg) => write!(f, "Key derivation failed: {}", msg),
            CryptoError::Encryption(msg) => write!(f, "Encryption failed: {}", msg),
            CryptoError::Decryption(msg) => write!(f, "Decryption failed: {}", msg),
            CryptoError::RandomGeneration(msg) => {
                write!(f, "Random generation failed: {}", msg)
            }
            CryptoError::InvalidKey(msg) => write!(f, "Invalid key: {}", msg),
        }
    }
}

impl std::error::Error for CryptoError {}

// === SessionError ===

/// Errors related to the session store.
#[derive(Debug)]
pub enum SessionError {
    /// Database operation failed.
    DatabaseError(String),
    /// Cryptographic operation failed during token encryption/decryption.
    CryptoError(String),
    /// A user identity was attached to a session without an access token.
    NoToken,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::DatabaseError(msg) => {
                write!(f, "Session database error: {}", msg)
            }
            SessionError::CryptoError(msg) => {
                write!(f, "Session crypto error: {}", msg)
            }
            SessionError::NoToken => write!(f, "Session has no access token"),
        }
    }
}

impl std::error::Error for SessionError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === ConfigError ===

/// Errors loading the OAuth client configuration. Blocks sign-in.
#[derive(Debug)]
pub enum ConfigError {
    /// The auth server did not provide a client id.
    MissingClientId,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingClientId => write!(f, "Application not properly configured"),
        }
    }
}

impl std::error::Error for ConfigError {}

// === AuthError ===

/// Errors in the sign-in lifecycle. The application falls back to the sign-in screen.
#[derive(Debug)]
pub enum AuthError {
    /// The auth server refused or failed the code exchange.
    TokenExchange(String),
    /// The callback's state did not match the one issued at sign-in.
    StateMismatch,
    /// The operation needs a signed-in user.
    NotSignedIn,
    /// The auth server could not be reached.
    NetworkError(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::TokenExchange(msg) => write!(f, "Token exchange failed: {}", msg),
            AuthError::StateMismatch => write!(f, "OAuth state mismatch"),
            AuthError::NotSignedIn => write!(f, "Not signed in"),
            AuthError::NetworkError(msg) => write!(f, "Auth server network error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

// === ApiError ===

/// Errors returned by the GitHub API client.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The API answered outside the 2xx range.
    Status { status: u16, message: String },
    /// The request could not be sent or the response not received.
    Network(String),
    /// The response body did not match the expected shape.
    InvalidResponse(String),
}

impl ApiError {
    /// HTTP status of the failed call, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Status { message, .. } => write!(f, "{}", message),
            ApiError::Network(msg) => write!(f, "GitHub network error: {}", msg),
            ApiError::InvalidResponse(msg) => write!(f, "Invalid GitHub response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

// === ValidationError ===

/// Input errors for tag creation. Raised before any network call.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingTagName,
    MissingBranch,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingTagName => write!(f, "Please enter a tag name"),
            ValidationError::MissingBranch => write!(f, "Please select a branch"),
        }
    }
}

impl std::error::Error for ValidationError {}

// === TagCreateError ===

/// Failure of the create-tag-object / create-ref sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum TagCreateError {
    Validation(ValidationError),
    Api(ApiError),
}

impl fmt::Display for TagCreateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagCreateError::Validation(e) => write!(f, "{}", e),
            TagCreateError::Api(e) => write!(f, "Failed to create tag: {}", e),
        }
    }
}

impl std::error::Error for TagCreateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TagCreateError::Validation(e) => Some(e),
            TagCreateError::Api(e) => Some(e),
        }
    }
}

impl From<ValidationError> for TagCreateError {
    fn from(e: ValidationError) -> Self {
        TagCreateError::Validation(e)
    }
}

impl From<ApiError> for TagCreateError {
    fn from(e: ApiError) -> Self {
        TagCreateError::Api(e)
    }
}

// === AppError ===

/// Whole-operation failure surfaced to the front end as a single message.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Auth(AuthError),
    Api(ApiError),
    TagCreate(TagCreateError),
    Session(SessionError),
    Settings(SettingsError),
    /// The operation needs a repository detail view to be open.
    NoRepositorySelected,
    /// The requested repository is not in the loaded list.
    RepositoryNotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "{}", e),
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Api(e) => write!(f, "{}", e),
            AppError::TagCreate(e) => write!(f, "{}", e),
            AppError::Session(e) => write!(f, "{}", e),
            AppError::Settings(e) => write!(f, "{}", e),
            AppError::NoRepositorySelected => write!(f, "No repository selected"),
            AppError::RepositoryNotFound(name) => write!(f, "Repository not found: {}", name),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        AppError::Api(e)
    }
}

impl From<TagCreateError> for AppError {
    fn from(e: TagCreateError) -> Self {
        AppError::TagCreate(e)
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl From<SettingsError> for AppError {
    fn from(e: SettingsError) -> Self {
        AppError::Settings(e)
    }
}
