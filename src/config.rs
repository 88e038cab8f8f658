//! Run configuration resolved once from CLI arguments and environment.
//!
//! Everything the orchestrator and its collaborators need is resolved here,
//! before any network call, so configuration problems surface immediately.
use log::*;

use crate::{
    Result,
    cli::{Args, DEFAULT_DIRECTORY},
    error::BumpkinError,
};

pub mod credentials;
pub mod package_manager;
pub mod source;

pub use credentials::{Credential, Credentials};
pub use package_manager::PackageManager;
pub use source::{Provider, Source};

use source::{GITHUB_HOSTNAME, resolve_provider};

/// Merge attempts allowed when none (or a non-positive count) is configured.
pub const DEFAULT_MAX_MERGE_ATTEMPTS: u32 = 3;

/// How the run reacts to a dependency whose update fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the run at the first failing dependency.
    #[default]
    Abort,
    /// Log the failure, move on, and fail the run once every dependency has
    /// been processed.
    Continue,
}

/// Settings for GitLab "merge when pipeline succeeds".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoMergeConfig {
    pub max_attempts: u32,
}

/// Fully resolved configuration for one update run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: Source,
    pub credentials: Credentials,
    pub package_manager: PackageManager,
    pub assignee: Option<u64>,
    pub auto_merge: Option<AutoMergeConfig>,
    pub failure_policy: FailurePolicy,
    pub dry_run: bool,
}

impl RunConfig {
    pub fn resolve(args: &Args) -> Result<Self> {
        let repo = args
            .project_path
            .as_ref()
            .map(|p| p.trim().trim_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                BumpkinError::invalid_config(
                    "PROJECT_PATH must be set to the full name of the repository",
                )
            })?;

        let package_manager = if args.package_manager.trim().is_empty() {
            PackageManager::default()
        } else {
            args.package_manager.parse()?
        };

        let directory = if args.directory_path.trim().is_empty() {
            DEFAULT_DIRECTORY.to_string()
        } else {
            args.directory_path.trim().to_string()
        };

        let provider = resolve_provider(&args.hosting)?;

        let credentials = resolve_credentials(args, &provider)?;

        let source = Source {
            provider: provider.provider,
            hostname: provider.hostname,
            api_endpoint: provider.api_endpoint,
            repo,
            directory,
            branch: args.branch.clone().filter(|b| !b.trim().is_empty()),
        };

        let assignee = resolve_assignee(
            args.pull_requests_assignee.as_deref(),
            args.gitlab_assignee_id.as_deref(),
        )?;

        let auto_merge = resolve_auto_merge(
            &source,
            args.gitlab_auto_merge.as_deref(),
            args.gitlab_max_retry_count.as_deref(),
        );

        let failure_policy = if args.continue_on_error {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        };

        debug!(
            "resolved config: provider: {}, host: {}, repo: {}, directory: {}, package_manager: {}",
            source.provider,
            source.hostname,
            source.repo,
            source.directory,
            package_manager
        );

        Ok(Self {
            source,
            credentials,
            package_manager,
            assignee,
            auto_merge,
            failure_policy,
            dry_run: args.dry_run,
        })
    }
}

/// The github.com credential always comes first when its token is set,
/// followed by the credential of the selected provider.
fn resolve_credentials(
    args: &Args,
    provider: &source::ResolvedProvider,
) -> Result<Credentials> {
    let mut credentials = vec![];

    if let Some(token) = args
        .hosting
        .github_access_token
        .as_ref()
        .filter(|t| !t.trim().is_empty())
    {
        credentials.push(Credential::git_source(
            GITHUB_HOSTNAME,
            token.clone().into(),
        ));
    }

    match (provider.provider, provider.token.clone()) {
        (Provider::Github, _) => {
            if credentials.is_empty() {
                return Err(BumpkinError::invalid_config(
                    "must set GITHUB_ACCESS_TOKEN or a token for GitHub Enterprise, GitLab or Azure",
                ));
            }
        }
        (_, Some(token)) => {
            credentials.push(Credential::git_source(
                provider.hostname.clone(),
                token,
            ));
        }
        (provider, None) => {
            return Err(BumpkinError::invalid_config(format!(
                "no access token resolved for {provider}"
            )));
        }
    }

    Ok(Credentials::new(credentials))
}

/// First non-blank of the explicit assignee or the GitLab assignee id.
pub fn resolve_assignee(
    explicit: Option<&str>,
    gitlab: Option<&str>,
) -> Result<Option<u64>> {
    let Some(value) = [explicit, gitlab]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
    else {
        return Ok(None);
    };

    value.parse::<u64>().map(Some).map_err(|_| {
        BumpkinError::invalid_config(format!(
            "assignee must be a numeric user id, got: {value}"
        ))
    })
}

/// Whether a toggle value turns the feature on. Any value other than an
/// explicit "off" spelling counts as on.
pub fn is_enabled(value: Option<&str>) -> bool {
    match value.map(|v| v.trim().to_lowercase()) {
        None => false,
        Some(v) => !matches!(v.as_str(), "" | "0" | "false" | "no" | "off"),
    }
}

/// Resolve the maximum merge attempts, falling back to
/// [`DEFAULT_MAX_MERGE_ATTEMPTS`] when unset, unparsable, or not positive.
pub fn resolve_max_attempts(value: Option<&str>) -> u32 {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return DEFAULT_MAX_MERGE_ATTEMPTS;
    };

    match raw.parse::<i64>() {
        Ok(count) if count >= 1 => {
            u32::try_from(count).unwrap_or(u32::MAX)
        }
        Ok(_) => DEFAULT_MAX_MERGE_ATTEMPTS,
        Err(_) => {
            warn!(
                "ignoring non-numeric GITLAB_MAX_RETRY_COUNT '{raw}': using {DEFAULT_MAX_MERGE_ATTEMPTS}"
            );
            DEFAULT_MAX_MERGE_ATTEMPTS
        }
    }
}

fn resolve_auto_merge(
    source: &Source,
    toggle: Option<&str>,
    max_retry_count: Option<&str>,
) -> Option<AutoMergeConfig> {
    if !is_enabled(toggle) {
        return None;
    }

    if source.provider != Provider::Gitlab {
        warn!(
            "GITLAB_AUTO_MERGE is set but the provider is {}: auto-merge is only supported on GitLab",
            source.provider
        );
        return None;
    }

    Some(AutoMergeConfig {
        max_attempts: resolve_max_attempts(max_retry_count),
    })
}
