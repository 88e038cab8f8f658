//! Opens one pull request per dependency update.
use async_trait::async_trait;
use log::*;
#[cfg(test)]
use mockall::automock;

use crate::{
    Result,
    config::{PackageManager, Source},
    ecosystem::types::{FileSet, UpdatedDependency},
    forge::{
        config::DEPENDENCIES_LABEL,
        manager::ForgeManager,
        request::{
            CreateBranchRequest, CreatePrRequest, FileChange, FileChangeType,
            GetPrRequest, PrAssigneesRequest, PrLabelsRequest, PullRequest,
        },
    },
};

pub mod message;

/// Everything needed to propose one dependency update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRequest {
    /// Commit the dependency files were read at.
    pub base_commit: String,
    /// Dependency files as fetched at `base_commit`.
    pub base_files: FileSet,
    pub dependencies: Vec<UpdatedDependency>,
    /// Regenerated dependency files.
    pub files: FileSet,
    pub assignee: Option<u64>,
    /// Also apply the package manager's language label.
    pub label_language: bool,
}

/// Creates the pull request for an update, or declines with `None` when
/// one is already open.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PullRequestCreator: Send + Sync {
    async fn create(
        &self,
        req: &PullRequestRequest,
    ) -> Result<Option<PullRequest>>;
}

/// Pull request creator backed by a hosting forge.
pub struct ForgePullRequestCreator {
    forge: ForgeManager,
    source: Source,
    package_manager: PackageManager,
}

impl ForgePullRequestCreator {
    pub fn new(
        forge: ForgeManager,
        source: Source,
        package_manager: PackageManager,
    ) -> Self {
        Self {
            forge,
            source,
            package_manager,
        }
    }

    fn base_branch(&self) -> String {
        self.source
            .branch
            .clone()
            .unwrap_or_else(|| self.forge.default_branch())
    }

    fn labels(&self, label_language: bool) -> Vec<String> {
        let mut labels = vec![DEPENDENCIES_LABEL.to_string()];

        if label_language {
            labels.push(self.package_manager.language_label().to_string());
        }

        labels
    }
}

#[async_trait]
impl PullRequestCreator for ForgePullRequestCreator {
    async fn create(
        &self,
        req: &PullRequestRequest,
    ) -> Result<Option<PullRequest>> {
        let base_branch = self.base_branch();
        let head_branch = message::branch_name(
            self.package_manager,
            &self.source.directory,
            &req.dependencies,
        )?;

        if let Some(pr) = self
            .forge
            .find_open_pr(GetPrRequest {
                head_branch: head_branch.clone(),
                base_branch: base_branch.clone(),
            })
            .await?
        {
            info!(
                "pull request #{} already open for {head_branch}: skipping",
                pr.number
            );
            return Ok(None);
        }

        let title = message::title(&self.source.directory, &req.dependencies);

        let file_changes = req
            .files
            .iter()
            .map(|file| {
                let path = file.path();
                let change_type = if req.base_files.contains_path(&path) {
                    FileChangeType::Update
                } else {
                    FileChangeType::Create
                };
                FileChange {
                    path,
                    content: file.content.clone(),
                    change_type,
                }
            })
            .collect();

        self.forge
            .create_branch(CreateBranchRequest {
                branch: head_branch.clone(),
                base_commit: req.base_commit.clone(),
                message: title.clone(),
                file_changes,
            })
            .await?;

        let pr = self
            .forge
            .create_pr(CreatePrRequest {
                head_branch,
                base_branch,
                title,
                body: message::body(&req.dependencies),
            })
            .await?;

        info!(
            "opened pull request #{}{}",
            pr.number,
            pr.url
                .as_deref()
                .map(|url| format!(": {url}"))
                .unwrap_or_default()
        );

        self.forge
            .add_pr_labels(PrLabelsRequest {
                pr_number: pr.number,
                labels: self.labels(req.label_language),
            })
            .await?;

        if let Some(assignee) = req.assignee {
            self.forge
                .add_pr_assignees(PrAssigneesRequest {
                    pr_number: pr.number,
                    assignees: vec![assignee],
                })
                .await?;
        }

        Ok(Some(pr))
    }
}

#[cfg(test)]
mod tests;
