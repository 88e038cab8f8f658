//! Common test helper functions shared across test modules.
use secrecy::SecretString;

use crate::{
    config::{
        Credential, Credentials, FailurePolicy, PackageManager, Provider,
        RunConfig, Source,
    },
    ecosystem::types::{
        Dependency, DependencyFile, FetchedFiles, FileSet, Requirement,
        UpdatedDependency,
    },
    forge::config::RemoteConfig,
};

/// Creates a GitLab source for "group/project" at the repository root.
pub fn create_test_source() -> Source {
    Source {
        provider: Provider::Gitlab,
        hostname: "gitlab.com".into(),
        api_endpoint: "https://gitlab.com/api/v4".into(),
        repo: "group/project".into(),
        directory: "/".into(),
        branch: None,
    }
}

pub fn create_test_credentials() -> Credentials {
    Credentials::new(vec![
        Credential::git_source(
            "github.com",
            SecretString::from("github-token".to_string()),
        ),
        Credential::git_source(
            "gitlab.com",
            SecretString::from("gitlab-token".to_string()),
        ),
    ])
}

pub fn create_test_remote_config() -> RemoteConfig {
    RemoteConfig {
        host: "gitlab.com".into(),
        api_endpoint: "https://gitlab.com/api/v4".into(),
        path: "group/project".into(),
        token: SecretString::from("gitlab-token".to_string()),
        dry_run: false,
    }
}

pub fn create_test_files() -> FileSet {
    FileSet::new(vec![
        DependencyFile::new("/", "Gemfile", "gem \"foo\", \"~> 1.0\"\n"),
        DependencyFile::new("/", "Gemfile.lock", "foo (1.0)\n"),
    ])
}

pub fn create_test_fetched_files() -> FetchedFiles {
    FetchedFiles {
        files: create_test_files(),
        commit: "abc123".into(),
    }
}

pub fn requirement(file: &str, constraint: &str) -> Requirement {
    Requirement {
        file: file.into(),
        requirement: Some(constraint.into()),
        groups: vec![],
    }
}

/// Top-level dependency declared in the Gemfile.
pub fn create_test_dependency(name: &str, version: &str) -> Dependency {
    Dependency::new(
        name,
        Some(version.into()),
        vec![requirement("Gemfile", &format!("~> {version}"))],
    )
}

pub fn create_test_updated_dependency(
    name: &str,
    from: &str,
    to: &str,
) -> UpdatedDependency {
    UpdatedDependency {
        name: name.into(),
        version: Some(to.into()),
        previous_version: Some(from.into()),
        requirements: vec![requirement("Gemfile", &format!("~> {to}"))],
        previous_requirements: vec![requirement(
            "Gemfile",
            &format!("~> {from}"),
        )],
    }
}

pub fn create_test_run_config() -> RunConfig {
    RunConfig {
        source: create_test_source(),
        credentials: create_test_credentials(),
        package_manager: PackageManager::Bundler,
        assignee: None,
        auto_merge: None,
        failure_policy: FailurePolicy::Abort,
        dry_run: false,
    }
}
