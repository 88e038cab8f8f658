//! Host scoped credentials shared read-only with every collaborator.
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, ser::SerializeStruct};
use std::sync::Arc;

/// Username sent alongside access tokens for git sources.
pub const GIT_SOURCE_USERNAME: &str = "x-access-token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    GitSource,
}

/// A secret scoped to a single host.
#[derive(Debug, Clone)]
pub struct Credential {
    pub kind: CredentialKind,
    pub host: String,
    pub username: String,
    pub password: SecretString,
}

impl Credential {
    /// Create a git source credential for the host using an access token.
    pub fn git_source(host: impl Into<String>, token: SecretString) -> Self {
        Self {
            kind: CredentialKind::GitSource,
            host: host.into(),
            username: GIT_SOURCE_USERNAME.into(),
            password: token,
        }
    }
}

// Credentials are only ever serialized for the ecosystem helper, which needs
// the actual token to talk to registries and hosts.
impl Serialize for Credential {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut s = serializer.serialize_struct("Credential", 4)?;
        s.serialize_field("type", &self.kind)?;
        s.serialize_field("host", &self.host)?;
        s.serialize_field("username", &self.username)?;
        s.serialize_field("password", self.password.expose_secret())?;
        s.end()
    }
}

/// Ordered, immutable list of credentials. Built once from resolved
/// configuration and cloned cheaply into each collaborator.
#[derive(Debug, Clone, Default)]
pub struct Credentials(Arc<[Credential]>);

impl Serialize for Credentials {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.0.iter())
    }
}

impl Credentials {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self(credentials.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Credential> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First credential registered for the host.
    pub fn for_host(&self, host: &str) -> Option<&Credential> {
        self.0.iter().find(|c| c.host.eq_ignore_ascii_case(host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new(vec![
            Credential::git_source(
                "github.com",
                SecretString::from("github-token".to_string()),
            ),
            Credential::git_source(
                "gitlab.example.com",
                SecretString::from("gitlab-token".to_string()),
            ),
        ])
    }

    #[test]
    fn finds_credential_for_host() {
        let credentials = credentials();

        let found = credentials.for_host("GitLab.example.com").unwrap();
        assert_eq!(found.password.expose_secret(), "gitlab-token");
        assert_eq!(found.username, GIT_SOURCE_USERNAME);
        assert!(credentials.for_host("dev.azure.com").is_none());
    }

    #[test]
    fn preserves_insertion_order() {
        let credentials = credentials();

        let hosts: Vec<&str> =
            credentials.iter().map(|c| c.host.as_str()).collect();
        assert_eq!(hosts, vec!["github.com", "gitlab.example.com"]);
    }

    #[test]
    fn serializes_in_git_source_shape() {
        let json = serde_json::to_value(credentials()).unwrap();
        assert_eq!(json[0]["type"], "git_source");
        assert_eq!(json[0]["host"], "github.com");
        assert_eq!(json[0]["username"], "x-access-token");
        assert_eq!(json[0]["password"], "github-token");
        assert_eq!(json[1]["host"], "gitlab.example.com");
        assert_eq!(json.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn serializes_empty_credentials_as_empty_list() {
        let json = serde_json::to_string(&Credentials::default()).unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn debug_output_redacts_tokens() {
        let output = format!("{:?}", credentials());
        assert!(!output.contains("github-token"));
    }
}
