//! Implements the Forge trait for Gitlab
use async_trait::async_trait;
use gitlab::{
    AsyncGitlab,
    api::{
        ApiError, AsyncQuery, ignore,
        merge_requests::MergeRequestState,
        projects::{
            Project,
            labels::{CreateLabel, Labels},
            merge_requests::{
                CreateMergeRequest, EditMergeRequest, MergeMergeRequest,
                MergeRequests,
            },
            repository::commits::{
                CommitAction, CommitActionType, CreateCommit,
            },
        },
    },
};
use log::*;
use secrecy::ExposeSecret;

use crate::{
    Result,
    error::BumpkinError,
    forge::{
        config::{DEFAULT_LABEL_COLOR, RemoteConfig},
        request::{
            Commit, CreateBranchRequest, CreatePrRequest, FileChangeType,
            GetPrRequest, PrAssigneesRequest, PrLabelsRequest, PullRequest,
        },
        traits::Forge,
    },
    merge::{AcceptMergeRequest, MergeClient},
};

mod types;

use types::{CreatedCommit, LabelInfo, MergeRequestInfo, ProjectInfo};

async fn connect(config: &RemoteConfig) -> Result<AsyncGitlab> {
    let token = config.token.expose_secret();

    let gl = gitlab::GitlabBuilder::new(config.host.clone(), token)
        .build_async()
        .await?;

    Ok(gl)
}

/// GitLab forge implementation using the async gitlab client for commits,
/// merge requests, labels and assignees.
pub struct Gitlab {
    config: RemoteConfig,
    gl: AsyncGitlab,
    project_id: String,
    default_branch: String,
}

impl Gitlab {
    pub async fn new(config: RemoteConfig) -> Result<Self> {
        let project_id = config.path.clone();

        let gl = connect(&config).await?;

        let endpoint = Project::builder().project(&project_id).build()?;
        let project: ProjectInfo = endpoint.query_async(&gl).await?;

        let default_branch = project.default_branch.ok_or_else(|| {
            BumpkinError::forge(format!(
                "failed to find default branch for gitlab project: {project_id}"
            ))
        })?;

        Ok(Self {
            config,
            gl,
            project_id,
            default_branch,
        })
    }

    async fn get_repo_labels(&self) -> Result<Vec<LabelInfo>> {
        let endpoint = Labels::builder().project(&self.project_id).build()?;

        let labels: Vec<LabelInfo> = endpoint.query_async(&self.gl).await?;

        Ok(labels)
    }

    async fn create_label(&self, label_name: String) -> Result<LabelInfo> {
        let endpoint = CreateLabel::builder()
            .project(&self.project_id)
            .name(label_name)
            .color(format!("#{}", DEFAULT_LABEL_COLOR))
            .description("".to_string())
            .build()?;

        let label: LabelInfo = endpoint.query_async(&self.gl).await?;

        Ok(label)
    }
}

#[async_trait]
impl Forge for Gitlab {
    fn remote_config(&self) -> RemoteConfig {
        self.config.clone()
    }

    fn default_branch(&self) -> String {
        self.default_branch.clone()
    }

    async fn find_open_pr(
        &self,
        req: GetPrRequest,
    ) -> Result<Option<PullRequest>> {
        let endpoint = MergeRequests::builder()
            .project(&self.project_id)
            .state(MergeRequestState::Opened)
            .source_branch(req.head_branch.as_str())
            .target_branch(req.base_branch.as_str())
            .build()?;

        let result: std::result::Result<
            Vec<MergeRequestInfo>,
            ApiError<gitlab::RestError>,
        > = endpoint.query_async(&self.gl).await;

        match result {
            Ok(merge_requests) => {
                Ok(merge_requests.into_iter().next().map(|mr| PullRequest {
                    number: mr.iid,
                    url: mr.web_url,
                }))
            }
            Err(ApiError::GitlabWithStatus { status, msg }) => {
                if status == reqwest::StatusCode::NOT_FOUND {
                    Ok(None)
                } else {
                    let msg = format!(
                        "request for merge request failed: status {status}, msg: {msg}"
                    );
                    error!("{msg}");
                    Err(BumpkinError::forge(msg))
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn create_branch(
        &self,
        req: CreateBranchRequest,
    ) -> Result<Commit> {
        let mut actions = vec![];

        for change in req.file_changes.iter() {
            let action = CommitAction::builder()
                .action(match change.change_type {
                    FileChangeType::Update => CommitActionType::Update,
                    FileChangeType::Create => CommitActionType::Create,
                })
                .file_path(change.path.as_str())
                .content(change.content.as_bytes())
                .build()?;
            actions.push(action);
        }

        info!(
            "committing {} file(s) to {} from {}",
            actions.len(),
            req.branch,
            req.base_commit
        );

        let endpoint = CreateCommit::builder()
            .project(&self.project_id)
            .branch(req.branch.as_str())
            .start_sha(req.base_commit.as_str())
            .commit_message(req.message.as_str())
            .force(true)
            .actions(actions)
            .build()?;

        let commit: CreatedCommit = endpoint.query_async(&self.gl).await?;

        info!("created commit for branch: sha: {}", commit.id);

        Ok(Commit { sha: commit.id })
    }

    async fn create_pr(&self, req: CreatePrRequest) -> Result<PullRequest> {
        let endpoint = CreateMergeRequest::builder()
            .project(&self.project_id)
            .source_branch(req.head_branch.as_str())
            .target_branch(req.base_branch.as_str())
            .title(req.title.as_str())
            .description(req.body.as_str())
            .build()?;

        let merge_request: MergeRequestInfo =
            endpoint.query_async(&self.gl).await?;

        Ok(PullRequest {
            number: merge_request.iid,
            url: merge_request.web_url,
        })
    }

    async fn add_pr_labels(&self, req: PrLabelsRequest) -> Result<()> {
        let all_labels = self.get_repo_labels().await?;

        let mut labels = vec![];

        for name in req.labels {
            if let Some(label) = all_labels.iter().find(|l| l.name == name) {
                labels.push(label.name.clone());
            } else {
                let label = self.create_label(name).await?;
                labels.push(label.name);
            }
        }

        let endpoint = EditMergeRequest::builder()
            .project(&self.project_id)
            .merge_request(req.pr_number)
            .labels(labels.iter())
            .build()?;

        ignore(endpoint).query_async(&self.gl).await?;

        Ok(())
    }

    async fn add_pr_assignees(&self, req: PrAssigneesRequest) -> Result<()> {
        let endpoint = EditMergeRequest::builder()
            .project(&self.project_id)
            .merge_request(req.pr_number)
            .assignees(req.assignees.into_iter())
            .build()?;

        ignore(endpoint).query_async(&self.gl).await?;

        Ok(())
    }
}

/// Accepts merge requests with "merge when pipeline succeeds".
pub struct GitlabMerger {
    gl: AsyncGitlab,
}

impl GitlabMerger {
    pub async fn new(config: &RemoteConfig) -> Result<Self> {
        Ok(Self {
            gl: connect(config).await?,
        })
    }
}

#[async_trait]
impl MergeClient for GitlabMerger {
    async fn accept_merge_request(
        &self,
        req: AcceptMergeRequest,
    ) -> Result<()> {
        let endpoint = MergeMergeRequest::builder()
            .project(req.repo.as_str())
            .merge_request(req.iid)
            .merge_when_pipeline_succeeds(true)
            .should_remove_source_branch(true)
            .build()?;

        match ignore(endpoint).query_async(&self.gl).await {
            Ok(()) => Ok(()),
            Err(ApiError::GitlabWithStatus { status, msg }) => {
                Err(BumpkinError::merge_rejection(status, msg))
            }
            Err(err) => Err(err.into()),
        }
    }
}
