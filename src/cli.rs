//! CLI argument parsing. Every option can also be supplied through the
//! environment variable named in its `env` attribute.
use clap::{Args as ClapArgs, Parser};
use std::path::PathBuf;

/// Default directory holding dependency files.
pub const DEFAULT_DIRECTORY: &str = "/";

/// Default package manager when none is configured.
pub const DEFAULT_PACKAGE_MANAGER: &str = "bundler";

/// Checks every top-level dependency of a repository for updates and opens
/// a pull request per update.
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, env = "PROJECT_PATH")]
    /// Full name of the repository to update (e.g. namespace/project).
    pub project_path: Option<String>,

    #[arg(long, env = "DIRECTORY_PATH", default_value = DEFAULT_DIRECTORY)]
    /// Directory where the base dependency files are.
    pub directory_path: String,

    #[arg(long, env = "PACKAGE_MANAGER", default_value = DEFAULT_PACKAGE_MANAGER)]
    /// Package manager to run updates for (bundler, pip, npm-and-yarn,
    /// maven, gradle, cargo, hex, composer, nuget, dep, go-modules, elm,
    /// submodules, docker, terraform).
    pub package_manager: String,

    #[arg(long)]
    /// Branch to open pull requests against. Defaults to the repository's
    /// default branch.
    pub branch: Option<String>,

    #[command(flatten)]
    pub hosting: HostingArgs,

    #[arg(long, env = "PULL_REQUESTS_ASSIGNEE")]
    /// Numeric id of the user to assign pull requests to.
    pub pull_requests_assignee: Option<String>,

    #[arg(long, env = "GITLAB_ASSIGNEE_ID")]
    /// Numeric GitLab user id to assign merge requests to. Used when
    /// PULL_REQUESTS_ASSIGNEE is not set.
    pub gitlab_assignee_id: Option<String>,

    #[arg(long, env = "GITLAB_AUTO_MERGE")]
    /// Enable "merge when pipeline succeeds" on created GitLab merge requests.
    pub gitlab_auto_merge: Option<String>,

    #[arg(long, env = "GITLAB_MAX_RETRY_COUNT")]
    /// Retries allowed while GitLab rejects auto-merge. Defaults to 3.
    pub gitlab_max_retry_count: Option<String>,

    #[arg(long, env = "ECOSYSTEM_HELPER")]
    /// External program implementing file fetching, parsing, update
    /// checking and file updating for the selected package manager.
    pub ecosystem_helper: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    /// Keep processing remaining dependencies when one fails.
    pub continue_on_error: bool,

    #[arg(long, default_value_t = false)]
    /// Check and update dependencies without writing anything to the forge.
    pub dry_run: bool,

    #[arg(long, default_value_t = false)]
    /// Enable debug logging.
    pub debug: bool,
}

/// Tokens and hostname overrides for each hosting provider.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct HostingArgs {
    #[arg(long, env = "GITHUB_ACCESS_TOKEN", hide_env_values = true)]
    /// GitHub access token with read access to public repos.
    pub github_access_token: Option<String>,

    #[arg(long, env = "GITHUB_ENTERPRISE_ACCESS_TOKEN", hide_env_values = true)]
    /// GitHub Enterprise access token with API permission.
    pub github_enterprise_access_token: Option<String>,

    #[arg(long, env = "GITHUB_ENTERPRISE_HOSTNAME")]
    /// GitHub Enterprise hostname (e.g. ghe.mydomain.com).
    pub github_enterprise_hostname: Option<String>,

    #[arg(long, env = "GITLAB_ACCESS_TOKEN", hide_env_values = true)]
    /// GitLab access token with API permission.
    pub gitlab_access_token: Option<String>,

    #[arg(long, env = "GITLAB_HOSTNAME")]
    /// GitLab hostname. Defaults to gitlab.com.
    pub gitlab_hostname: Option<String>,

    #[arg(long, env = "AZURE_ACCESS_TOKEN", hide_env_values = true)]
    /// Azure DevOps access token.
    pub azure_access_token: Option<String>,

    #[arg(long, env = "AZURE_HOSTNAME")]
    /// Azure DevOps hostname. Defaults to dev.azure.com.
    pub azure_hostname: Option<String>,
}
