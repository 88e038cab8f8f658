use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Pull request (or merge request) opened on a forge.
pub struct PullRequest {
    /// Number for GitHub and Azure, iid for GitLab.
    pub number: u64,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to find an open pull request by branch names.
pub struct GetPrRequest {
    pub head_branch: String,
    pub base_branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to create a new pull request.
pub struct CreatePrRequest {
    pub head_branch: String,
    pub base_branch: String,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to add labels to a pull request.
pub struct PrLabelsRequest {
    pub pr_number: u64,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to assign users, by numeric id, to a pull request.
pub struct PrAssigneesRequest {
    pub pr_number: u64,
    pub assignees: Vec<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileChangeType {
    /// File exists at the base commit
    Update,
    /// File was generated by the update, e.g. a new lockfile
    Create,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    /// Relative path to the file starting from repo root
    pub path: String,
    /// Full replacement contents. Files are updated or created, nothing is
    /// ever deleted.
    pub content: String,
    pub change_type: FileChangeType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to commit file changes on top of `base_commit` and point
/// `branch` at the new commit, replacing the branch if it already exists.
pub struct CreateBranchRequest {
    pub branch: String,
    pub base_commit: String,
    pub message: String,
    pub file_changes: Vec<FileChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Commit {
    pub sha: String,
}
