//! Source descriptor and hosting provider selection.
use secrecy::SecretString;
use serde::Serialize;
use std::fmt;

use crate::{Result, cli::HostingArgs, error::BumpkinError};

pub const GITHUB_HOSTNAME: &str = "github.com";
pub const DEFAULT_GITLAB_HOSTNAME: &str = "gitlab.com";
pub const DEFAULT_AZURE_HOSTNAME: &str = "dev.azure.com";

/// Hosting provider the run operates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Github,
    GithubEnterprise,
    Gitlab,
    Azure,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::Github => "github",
            Provider::GithubEnterprise => "github-enterprise",
            Provider::Gitlab => "gitlab",
            Provider::Azure => "azure",
        };
        f.write_str(name)
    }
}

/// Identifies the repository, directory and branch a run works on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub provider: Provider,
    /// Host serving the repository (e.g. "gitlab.com").
    pub hostname: String,
    /// Base URL of the provider's REST API.
    pub api_endpoint: String,
    /// Full name of the repository (e.g. "namespace/project").
    pub repo: String,
    /// Directory holding the dependency files, "/" for the repo root.
    pub directory: String,
    /// Target branch, the repository default branch when absent.
    pub branch: Option<String>,
}

/// Hosting provider chosen from the configured tokens, with the token that
/// selected it.
#[derive(Debug, Clone)]
pub struct ResolvedProvider {
    pub provider: Provider,
    pub hostname: String,
    pub api_endpoint: String,
    pub token: Option<SecretString>,
}

type ProviderResolver = fn(&HostingArgs) -> Result<ResolvedProvider>;

/// Candidates in priority order. The first candidate whose token is set
/// wins; plain GitHub always matches and is the fallback.
///
/// Order is part of the contract: GitHub Enterprise > GitLab > Azure >
/// GitHub.
const PROVIDER_PRIORITY: [(fn(&HostingArgs) -> bool, ProviderResolver); 4] = [
    (
        |args| is_set(&args.github_enterprise_access_token),
        resolve_github_enterprise,
    ),
    (|args| is_set(&args.gitlab_access_token), resolve_gitlab),
    (|args| is_set(&args.azure_access_token), resolve_azure),
    (|_| true, resolve_github),
];

/// Select the hosting provider for the run.
pub fn resolve_provider(args: &HostingArgs) -> Result<ResolvedProvider> {
    for (selected, resolve) in PROVIDER_PRIORITY.iter() {
        if selected(args) {
            return resolve(args);
        }
    }

    // the final candidate always matches
    resolve_github(args)
}

fn is_set(value: &Option<String>) -> bool {
    value.as_ref().is_some_and(|v| !v.trim().is_empty())
}

fn secret(value: &Option<String>) -> Option<SecretString> {
    value
        .as_ref()
        .filter(|v| !v.trim().is_empty())
        .map(|v| SecretString::from(v.clone()))
}

fn hostname_or(value: &Option<String>, default: &str) -> String {
    value
        .as_ref()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn resolve_github_enterprise(args: &HostingArgs) -> Result<ResolvedProvider> {
    let hostname = args
        .github_enterprise_hostname
        .as_ref()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| {
            BumpkinError::invalid_config(
                "GITHUB_ENTERPRISE_HOSTNAME must be set when using a GitHub Enterprise token",
            )
        })?;

    Ok(ResolvedProvider {
        provider: Provider::GithubEnterprise,
        api_endpoint: format!("https://{hostname}/api/v3/"),
        hostname,
        token: secret(&args.github_enterprise_access_token),
    })
}

fn resolve_gitlab(args: &HostingArgs) -> Result<ResolvedProvider> {
    let hostname =
        hostname_or(&args.gitlab_hostname, DEFAULT_GITLAB_HOSTNAME);

    Ok(ResolvedProvider {
        provider: Provider::Gitlab,
        api_endpoint: format!("https://{hostname}/api/v4"),
        hostname,
        token: secret(&args.gitlab_access_token),
    })
}

fn resolve_azure(args: &HostingArgs) -> Result<ResolvedProvider> {
    let hostname = hostname_or(&args.azure_hostname, DEFAULT_AZURE_HOSTNAME);

    Ok(ResolvedProvider {
        provider: Provider::Azure,
        api_endpoint: format!("https://{hostname}/"),
        hostname,
        token: secret(&args.azure_access_token),
    })
}

fn resolve_github(args: &HostingArgs) -> Result<ResolvedProvider> {
    Ok(ResolvedProvider {
        provider: Provider::Github,
        hostname: GITHUB_HOSTNAME.into(),
        api_endpoint: "https://api.github.com/".into(),
        token: secret(&args.github_access_token),
    })
}
