//! Implements the Forge trait for Azure DevOps
use async_trait::async_trait;
use base64::{Engine, prelude::BASE64_STANDARD};
use log::*;
use reqwest::{
    Client, StatusCode, Url,
    header::{HeaderMap, HeaderValue},
};
use secrecy::ExposeSecret;

use crate::{
    Result,
    error::BumpkinError,
    forge::{
        config::RemoteConfig,
        request::{
            Commit, CreateBranchRequest, CreatePrRequest, FileChangeType,
            GetPrRequest, PrAssigneesRequest, PrLabelsRequest, PullRequest,
        },
        traits::Forge,
    },
};

mod types;

use types::{
    AzureList, AzurePullRequest, AzureRef, AzureRepository, Change,
    CreateLabel, CreatePull, ItemPath, NewContent, Push, PushCommit,
    PushResponse, RefUpdate, ZERO_OBJECT_ID,
};

const API_VERSION: &str = "6.0";

fn branch_ref(branch: &str) -> String {
    format!("refs/heads/{branch}")
}

fn change_kind(change_type: FileChangeType) -> &'static str {
    match change_type {
        FileChangeType::Update => "edit",
        FileChangeType::Create => "add",
    }
}

/// Splits "org/project/_git/repo" (or "org/project/repo") into the
/// project path and repository name.
fn split_repo_path(path: &str) -> Result<(String, String)> {
    let trimmed = path.trim_matches('/');

    let (project, repo) = match trimmed.split_once("/_git/") {
        Some(parts) => parts,
        None => trimmed.rsplit_once('/').ok_or_else(|| {
            BumpkinError::invalid_config(format!(
                "azure repository must look like org/project/_git/repo: {path}"
            ))
        })?,
    };

    if project.is_empty() || repo.is_empty() || !project.contains('/') {
        return Err(BumpkinError::invalid_config(format!(
            "azure repository must look like org/project/_git/repo: {path}"
        )));
    }

    Ok((project.to_string(), repo.to_string()))
}

/// Azure DevOps forge implementation using reqwest against the git REST
/// API: pushes, pull requests and labels.
pub struct Azure {
    config: RemoteConfig,
    base_url: Url,
    web_url: String,
    client: Client,
    default_branch: String,
}

impl Azure {
    pub async fn new(config: RemoteConfig) -> Result<Self> {
        let token = config.token.expose_secret();

        let mut headers = HeaderMap::new();

        let credentials = BASE64_STANDARD.encode(format!(":{token}"));
        let token_value =
            HeaderValue::from_str(format!("Basic {credentials}").as_str())?;

        headers.append("Authorization", token_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let (project, repo) = split_repo_path(&config.path)?;

        let base_url = Url::parse(&format!(
            "{}/{project}/_apis/git/repositories/{repo}/",
            config.api_endpoint.trim_end_matches('/')
        ))?;

        let web_url = format!("https://{}/{project}/_git/{repo}", config.host);

        let request = client
            .get(base_url.clone())
            .query(&[("api-version", API_VERSION)])
            .build()?;
        let response = client.execute(request).await?;
        let result = response.error_for_status()?;
        let repository: AzureRepository = result.json().await?;

        let default_branch = repository
            .default_branch
            .map(|b| b.trim_start_matches("refs/heads/").to_string())
            .ok_or_else(|| {
                BumpkinError::forge(format!(
                    "failed to find default branch for azure repo: {}",
                    config.path
                ))
            })?;

        Ok(Self {
            config,
            base_url,
            web_url,
            client,
            default_branch,
        })
    }

    async fn get_branch_ref(&self, branch: &str) -> Result<Option<AzureRef>> {
        let url = self.base_url.join("refs")?;
        let request = self
            .client
            .get(url)
            .query(&[
                ("filter", format!("heads/{branch}").as_str()),
                ("api-version", API_VERSION),
            ])
            .build()?;
        let response = self.client.execute(request).await?;
        let result = response.error_for_status()?;
        let refs: AzureList<AzureRef> = result.json().await?;

        let name = branch_ref(branch);

        Ok(refs.value.into_iter().find(|r| r.name == name))
    }

    // Pushes cannot force-update a ref, so an existing branch is deleted
    // before being recreated from the base commit.
    async fn delete_branch_if_exists(&self, branch: &str) -> Result<()> {
        let Some(existing) = self.get_branch_ref(branch).await? else {
            return Ok(());
        };

        info!("branch {branch} already exists: replacing");

        let url = self.base_url.join("refs")?;
        let request = self
            .client
            .post(url)
            .query(&[("api-version", API_VERSION)])
            .json(&vec![RefUpdate {
                name: existing.name,
                old_object_id: existing.object_id,
                new_object_id: Some(ZERO_OBJECT_ID.into()),
            }])
            .build()?;
        let response = self.client.execute(request).await?;
        response.error_for_status()?;

        Ok(())
    }
}

#[async_trait]
impl Forge for Azure {
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
        let url = self.base_url.join("pullrequests")?;
        let source = branch_ref(&req.head_branch);
        let target = branch_ref(&req.base_branch);
        let request = self
            .client
            .get(url)
            .query(&[
                ("searchCriteria.status", "active"),
                ("searchCriteria.sourceRefName", source.as_str()),
                ("searchCriteria.targetRefName", target.as_str()),
                ("api-version", API_VERSION),
            ])
            .build()?;
        let response = self.client.execute(request).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let result = response.error_for_status()?;
        let prs: AzureList<AzurePullRequest> = result.json().await?;

        Ok(prs.value.into_iter().next().map(|pr| PullRequest {
            number: pr.pull_request_id,
            url: Some(format!(
                "{}/pullrequest/{}",
                self.web_url, pr.pull_request_id
            )),
        }))
    }

    async fn create_branch(
        &self,
        req: CreateBranchRequest,
    ) -> Result<Commit> {
        self.delete_branch_if_exists(&req.branch).await?;

        let changes = req
            .file_changes
            .into_iter()
            .map(|change| Change {
                change_type: change_kind(change.change_type).into(),
                item: ItemPath {
                    path: format!("/{}", change.path.trim_start_matches('/')),
                },
                new_content: NewContent {
                    content: change.content,
                    content_type: "rawtext".into(),
                },
            })
            .collect();

        let push = Push {
            ref_updates: vec![RefUpdate {
                name: branch_ref(&req.branch),
                old_object_id: ZERO_OBJECT_ID.into(),
                new_object_id: None,
            }],
            commits: vec![PushCommit {
                comment: req.message,
                parents: vec![req.base_commit],
                changes,
            }],
        };

        let url = self.base_url.join("pushes")?;
        let request = self
            .client
            .post(url)
            .query(&[("api-version", API_VERSION)])
            .json(&push)
            .build()?;
        let response = self.client.execute(request).await?;
        let result = response.error_for_status()?;
        let pushed: PushResponse = result.json().await?;

        let commit = pushed.commits.into_iter().next().ok_or_else(|| {
            BumpkinError::forge("azure push response contained no commits")
        })?;

        info!("created commit for branch: sha: {}", commit.commit_id);

        Ok(Commit {
            sha: commit.commit_id,
        })
    }

    async fn create_pr(&self, req: CreatePrRequest) -> Result<PullRequest> {
        let url = self.base_url.join("pullrequests")?;
        let request = self
            .client
            .post(url)
            .query(&[("api-version", API_VERSION)])
            .json(&CreatePull {
                source_ref_name: branch_ref(&req.head_branch),
                target_ref_name: branch_ref(&req.base_branch),
                title: req.title,
                description: req.body,
            })
            .build()?;
        let response = self.client.execute(request).await?;
        let result = response.error_for_status()?;
        let pr: AzurePullRequest = result.json().await?;

        Ok(PullRequest {
            number: pr.pull_request_id,
            url: Some(format!(
                "{}/pullrequest/{}",
                self.web_url, pr.pull_request_id
            )),
        })
    }

    async fn add_pr_labels(&self, req: PrLabelsRequest) -> Result<()> {
        let url = self
            .base_url
            .join(&format!("pullrequests/{}/labels", req.pr_number))?;

        for name in req.labels {
            let request = self
                .client
                .post(url.clone())
                .query(&[("api-version", API_VERSION)])
                .json(&CreateLabel { name })
                .build()?;
            let response = self.client.execute(request).await?;
            response.error_for_status()?;
        }

        Ok(())
    }

    async fn add_pr_assignees(&self, req: PrAssigneesRequest) -> Result<()> {
        warn!(
            "azure devops does not support numeric assignees: skipping {:?} for PR {}",
            req.assignees, req.pr_number
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_git_style_repo_path() {
        let (project, repo) = split_repo_path("org/project/_git/repo").unwrap();
        assert_eq!(project, "org/project");
        assert_eq!(repo, "repo");
    }

    #[test]
    fn splits_plain_repo_path() {
        let (project, repo) = split_repo_path("/org/project/repo/").unwrap();
        assert_eq!(project, "org/project");
        assert_eq!(repo, "repo");
    }

    #[test]
    fn rejects_repo_path_without_project() {
        assert!(matches!(
            split_repo_path("repo"),
            Err(BumpkinError::InvalidConfig(_))
        ));
        assert!(split_repo_path("org/repo").is_err());
    }

    #[test]
    fn maps_file_change_types_to_push_change_types() {
        assert_eq!(change_kind(FileChangeType::Update), "edit");
        assert_eq!(change_kind(FileChangeType::Create), "add");
    }

    #[test]
    fn formats_branch_refs() {
        assert_eq!(
            branch_ref("bumpkin/bundler/foo-1.1"),
            "refs/heads/bumpkin/bundler/foo-1.1"
        );
    }
}
