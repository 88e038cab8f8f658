//! Unified interface for Git forge platforms (GitHub, GitLab, Azure DevOps).
//!
//! Provides token-based authentication, branch commits, pull request
//! operations, labels and assignees through a common trait.

/// Azure DevOps API client implementation.
pub mod azure;

/// Configuration and authentication for forge platforms.
pub mod config;

/// Builds the forge for a source.
pub mod factory;

/// GitHub API client implementation for GitHub.com and Enterprise.
pub mod github;

/// GitLab API client implementation for GitLab.com and self-hosted instances.
pub mod gitlab;

/// Dry-run aware wrapper around a forge.
pub mod manager;

/// Request and response types shared by every forge.
pub mod request;

/// Common traits for forge platform abstraction.
pub mod traits;
