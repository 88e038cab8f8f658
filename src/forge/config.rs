//! Configuration for Git forge platform connections.
use secrecy::SecretString;

/// Label applied to every dependency update pull request.
pub const DEPENDENCIES_LABEL: &str = "dependencies";
/// Default color for labels created by bumpkin in hex format.
pub const DEFAULT_LABEL_COLOR: &str = "0366d6";

/// Remote repository connection configuration for authenticating and
/// interacting with forge platforms.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Remote forge host (e.g., "github.com").
    pub host: String,
    /// Base URL of the forge REST API.
    pub api_endpoint: String,
    /// Full repository path (e.g., "owner/repo").
    pub path: String,
    /// Access token for authentication.
    pub token: SecretString,
    /// Skip every write request.
    pub dry_run: bool,
}

impl RemoteConfig {
    /// Everything before the last path segment.
    pub fn owner(&self) -> &str {
        self.path
            .rsplit_once('/')
            .map(|(owner, _)| owner)
            .unwrap_or_default()
    }

    /// Last path segment.
    pub fn repo(&self) -> &str {
        self.path
            .rsplit_once('/')
            .map(|(_, repo)| repo)
            .unwrap_or(&self.path)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: "".to_string(),
            api_endpoint: "".to_string(),
            path: "".to_string(),
            token: SecretString::from("".to_string()),
            dry_run: false,
        }
    }
}
