//! Error types for bumpkin operations.

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for bumpkin operations.
#[derive(Error, Debug)]
pub enum BumpkinError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unsupported package manager: {0}")]
    UnsupportedPackageManager(String),

    // Forge errors
    #[error("Forge operation failed: {0}")]
    ForgeError(String),

    #[error("Merge request rejected with 405 Method Not Allowed: {0}")]
    MergeMethodNotAllowed(String),

    #[error("Merge request rejected with 406 Not Acceptable: {0}")]
    MergeNotAcceptable(String),

    // Network/API errors
    #[error("Network request failed: {0}")]
    NetworkError(String),

    #[error("API authentication failed: {0}")]
    AuthenticationError(String),

    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    // Ecosystem collaborator errors
    #[error("Ecosystem error for {package_manager}: {message}")]
    EcosystemError {
        package_manager: String,
        message: String,
    },

    #[error("Ecosystem helper command '{command}' failed: {message}")]
    HelperError { command: String, message: String },

    #[error("Failed to update {} dependencies: {}", .0.len(), .0.join(", "))]
    DependencyFailures(Vec<String>),

    // Parsing errors
    #[error("JSON parse error: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Regular expression error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using BumpkinError
pub type Result<T> = std::result::Result<T, BumpkinError>;

impl BumpkinError {
    /// Create a forge error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        Self::ForgeError(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an ecosystem error for a package manager
    pub fn ecosystem(
        package_manager: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::EcosystemError {
            package_manager: package_manager.into(),
            message: msg.into(),
        }
    }

    /// Create a helper error for a failed helper command
    pub fn helper(command: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::HelperError {
            command: command.into(),
            message: msg.into(),
        }
    }

    /// Map a merge request status rejection onto the matching error. Only
    /// 405 and 406 get dedicated variants since they mean the merge request
    /// isn't ready to accept "merge when pipeline succeeds" yet.
    pub fn merge_rejection(status: StatusCode, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        match status {
            StatusCode::METHOD_NOT_ALLOWED => Self::MergeMethodNotAllowed(msg),
            StatusCode::NOT_ACCEPTABLE => Self::MergeNotAcceptable(msg),
            _ => Self::ForgeError(format!(
                "merge request rejected: status {status}, msg: {msg}"
            )),
        }
    }

    /// Whether the error is a merge rejection worth retrying.
    pub fn is_transient_merge_rejection(&self) -> bool {
        matches!(
            self,
            Self::MergeMethodNotAllowed(_) | Self::MergeNotAcceptable(_)
        )
    }
}

// Implement From for std::io::Error - wraps in Other variant for generic I/O errors
impl From<std::io::Error> for BumpkinError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}

// Implement From for reqwest errors (network/API)
impl From<reqwest::Error> for BumpkinError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::NetworkError(err.to_string())
        } else if err.is_status() {
            match err.status().map(|s| s.as_u16()) {
                Some(401) | Some(403) => {
                    Self::AuthenticationError(err.to_string())
                }
                Some(429) => Self::RateLimitExceeded,
                _ => Self::NetworkError(err.to_string()),
            }
        } else {
            Self::NetworkError(err.to_string())
        }
    }
}

// Implement From for reqwest header errors (needs custom message)
impl From<reqwest::header::InvalidHeaderValue> for BumpkinError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Self::AuthenticationError(format!("Invalid header value: {}", err))
    }
}

// Implement From for octocrab errors (GitHub API)
impl From<octocrab::Error> for BumpkinError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. }
                if source.message.contains("rate limit") =>
            {
                Self::RateLimitExceeded
            }
            _ => Self::ForgeError(format!("GitHub API error: {}", err)),
        }
    }
}

// Implement From for gitlab errors
impl From<gitlab::api::ApiError<gitlab::RestError>> for BumpkinError {
    fn from(err: gitlab::api::ApiError<gitlab::RestError>) -> Self {
        Self::ForgeError(format!("GitLab API error: {}", err))
    }
}

impl From<gitlab::GitlabError> for BumpkinError {
    fn from(err: gitlab::GitlabError) -> Self {
        Self::ForgeError(format!("GitLab error: {}", err))
    }
}

// Builder errors from the gitlab endpoint builders used by the forge

impl From<gitlab::api::projects::ProjectBuilderError> for BumpkinError {
    fn from(err: gitlab::api::projects::ProjectBuilderError) -> Self {
        Self::Other(color_eyre::Report::msg(format!("Builder error: {}", err)))
    }
}

impl From<gitlab::api::projects::merge_requests::MergeRequestsBuilderError>
    for BumpkinError
{
    fn from(
        err: gitlab::api::projects::merge_requests::MergeRequestsBuilderError,
    ) -> Self {
        Self::Other(color_eyre::Report::msg(format!("Builder error: {}", err)))
    }
}

impl From<gitlab::api::projects::merge_requests::CreateMergeRequestBuilderError>
    for BumpkinError
{
    fn from(
        err: gitlab::api::projects::merge_requests::CreateMergeRequestBuilderError,
    ) -> Self {
        Self::Other(color_eyre::Report::msg(format!("Builder error: {}", err)))
    }
}

impl From<gitlab::api::projects::merge_requests::EditMergeRequestBuilderError>
    for BumpkinError
{
    fn from(
        err: gitlab::api::projects::merge_requests::EditMergeRequestBuilderError,
    ) -> Self {
        Self::Other(color_eyre::Report::msg(format!("Builder error: {}", err)))
    }
}

impl From<gitlab::api::projects::merge_requests::MergeMergeRequestBuilderError>
    for BumpkinError
{
    fn from(
        err: gitlab::api::projects::merge_requests::MergeMergeRequestBuilderError,
    ) -> Self {
        Self::Other(color_eyre::Report::msg(format!("Builder error: {}", err)))
    }
}

impl From<gitlab::api::projects::repository::commits::CreateCommitBuilderError>
    for BumpkinError
{
    fn from(
        err: gitlab::api::projects::repository::commits::CreateCommitBuilderError,
    ) -> Self {
        Self::Other(color_eyre::Report::msg(format!("Builder error: {}", err)))
    }
}

impl From<gitlab::api::projects::repository::commits::CommitActionBuilderError>
    for BumpkinError
{
    fn from(
        err: gitlab::api::projects::repository::commits::CommitActionBuilderError,
    ) -> Self {
        Self::Other(color_eyre::Report::msg(format!("Builder error: {}", err)))
    }
}

impl From<gitlab::api::projects::labels::LabelsBuilderError> for BumpkinError {
    fn from(err: gitlab::api::projects::labels::LabelsBuilderError) -> Self {
        Self::Other(color_eyre::Report::msg(format!("Builder error: {}", err)))
    }
}

impl From<gitlab::api::projects::labels::CreateLabelBuilderError>
    for BumpkinError
{
    fn from(
        err: gitlab::api::projects::labels::CreateLabelBuilderError,
    ) -> Self {
        Self::Other(color_eyre::Report::msg(format!("Builder error: {}", err)))
    }
}
