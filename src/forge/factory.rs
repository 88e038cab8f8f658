//! Factory for creating forge implementations based on configuration.
use log::*;

use crate::{
    Result,
    config::{Credentials, Provider, Source},
    error::BumpkinError,
    forge::{
        azure::Azure,
        config::RemoteConfig,
        github::Github,
        gitlab::{Gitlab, GitlabMerger},
        manager::ForgeManager,
        traits::Forge,
    },
    merge::MergeClient,
};

/// Factory for creating forge implementations.
pub struct ForgeFactory;

impl ForgeFactory {
    /// Build the remote configuration for a source from the credential
    /// registered for its host.
    pub fn remote_config(
        source: &Source,
        credentials: &Credentials,
        dry_run: bool,
    ) -> Result<RemoteConfig> {
        let credential =
            credentials.for_host(&source.hostname).ok_or_else(|| {
                BumpkinError::invalid_config(format!(
                    "no credential configured for host {}",
                    source.hostname
                ))
            })?;

        Ok(RemoteConfig {
            host: source.hostname.clone(),
            api_endpoint: source.api_endpoint.clone(),
            path: source.repo.clone(),
            token: credential.password.clone(),
            dry_run,
        })
    }

    /// Create a ForgeManager for the source's hosting provider.
    pub async fn create(
        source: &Source,
        credentials: &Credentials,
        dry_run: bool,
    ) -> Result<ForgeManager> {
        let config = Self::remote_config(source, credentials, dry_run)?;

        debug!("connecting to {} at {}", source.provider, config.api_endpoint);

        let forge: Box<dyn Forge> = match source.provider {
            Provider::Github | Provider::GithubEnterprise => {
                Box::new(Github::new(config).await?)
            }
            Provider::Gitlab => Box::new(Gitlab::new(config).await?),
            Provider::Azure => Box::new(Azure::new(config).await?),
        };

        Ok(ForgeManager::new(forge))
    }

    /// Create the client used to auto-merge merge requests. Only GitLab
    /// supports merge when pipeline succeeds.
    pub async fn create_merge_client(
        source: &Source,
        credentials: &Credentials,
    ) -> Result<Box<dyn MergeClient>> {
        if source.provider != Provider::Gitlab {
            return Err(BumpkinError::invalid_config(format!(
                "auto-merge is only supported for gitlab, not {}",
                source.provider
            )));
        }

        let config = Self::remote_config(source, credentials, false)?;

        Ok(Box::new(GitlabMerger::new(&config).await?))
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn remote_config_uses_credential_for_source_host() {
        let config = ForgeFactory::remote_config(
            &create_test_source(),
            &create_test_credentials(),
            true,
        )
        .unwrap();

        assert_eq!(config.host, "gitlab.com");
        assert_eq!(config.api_endpoint, "https://gitlab.com/api/v4");
        assert_eq!(config.path, "group/project");
        assert_eq!(config.token.expose_secret(), "gitlab-token");
        assert!(config.dry_run);
    }

    #[test]
    fn remote_config_requires_credential_for_host() {
        let mut source = create_test_source();
        source.hostname = "gitlab.example.com".into();

        let err = ForgeFactory::remote_config(
            &source,
            &create_test_credentials(),
            false,
        )
        .unwrap_err();

        assert!(matches!(err, BumpkinError::InvalidConfig(_)));
        assert!(err.to_string().contains("gitlab.example.com"));
    }

    #[tokio::test]
    async fn merge_client_requires_gitlab() {
        let mut source = create_test_source();
        source.provider = Provider::Github;
        source.hostname = "github.com".into();

        let result =
            ForgeFactory::create_merge_client(&source, &create_test_credentials())
                .await;

        assert!(matches!(result, Err(BumpkinError::InvalidConfig(_))));
    }
}
