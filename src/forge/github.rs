//! Implements the Forge trait for GitHub and GitHub Enterprise
use async_trait::async_trait;
use log::*;
use octocrab::{Octocrab, params};

use crate::{
    Result,
    error::BumpkinError,
    forge::{
        config::{DEFAULT_LABEL_COLOR, RemoteConfig},
        request::{
            Commit, CreateBranchRequest, CreatePrRequest, GetPrRequest,
            PrAssigneesRequest, PrLabelsRequest, PullRequest,
        },
        traits::Forge,
    },
};

mod types;

use types::{
    GithubTree, GithubTreeEntry, GithubUser, TREE_BLOB_MODE, TREE_BLOB_TYPE,
    Tree,
};

/// GitHub forge implementation using Octocrab for API interactions with
/// git data, pull requests, labels and assignees.
pub struct Github {
    config: RemoteConfig,
    base_uri: String,
    instance: Octocrab,
    default_branch: String,
}

impl Github {
    /// Create GitHub client with personal access token authentication
    /// against the configured API endpoint.
    pub async fn new(config: RemoteConfig) -> Result<Self> {
        let base_uri = config.api_endpoint.trim_end_matches('/').to_string();
        let builder = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(base_uri.clone())?;
        let instance = builder.build()?;

        let repo = instance.repos(config.owner(), config.repo()).get().await?;
        let default_branch = repo.default_branch.ok_or_else(|| {
            BumpkinError::forge(format!(
                "failed to find default branch for github repo: {}",
                config.path
            ))
        })?;

        Ok(Self {
            config,
            base_uri,
            instance,
            default_branch,
        })
    }

    async fn create_tree(&self, tree: GithubTree) -> Result<Tree> {
        let endpoint = format!(
            "{}/repos/{}/git/trees",
            self.base_uri, self.config.path
        );

        let body = serde_json::json!(tree);

        info!("creating tree starting from: {}", tree.base_tree);

        let tree: Tree = self.instance.post(endpoint, Some(&body)).await?;

        info!("created new tree: {}", tree.sha);

        Ok(tree)
    }

    async fn create_commit(
        &self,
        message: &str,
        parent_sha: &str,
        tree_sha: &str,
    ) -> Result<Commit> {
        let endpoint = format!(
            "{}/repos/{}/git/commits",
            self.base_uri, self.config.path
        );

        let body = serde_json::json!({
          "message": message,
          "tree": tree_sha,
          "parents": [parent_sha],
        });

        let commit: Commit = self.instance.post(endpoint, Some(&body)).await?;

        Ok(commit)
    }

    async fn login_for_id(&self, id: u64) -> Result<String> {
        let user: GithubUser = self
            .instance
            .get(format!("{}/user/{id}", self.base_uri), None::<&()>)
            .await?;

        Ok(user.login)
    }
}

#[async_trait]
impl Forge for Github {
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
        let prs = self
            .instance
            .pulls(self.config.owner(), self.config.repo())
            .list()
            .state(params::State::Open)
            .head(format!("{}:{}", self.config.owner(), req.head_branch))
            .base(req.base_branch)
            .send()
            .await?;

        Ok(prs.items.into_iter().next().map(|pr| PullRequest {
            number: pr.number,
            url: pr.html_url.map(|url| url.to_string()),
        }))
    }

    async fn create_branch(
        &self,
        req: CreateBranchRequest,
    ) -> Result<Commit> {
        let tree = req
            .file_changes
            .into_iter()
            .map(|change| GithubTreeEntry {
                path: change.path,
                mode: TREE_BLOB_MODE.into(),
                kind: TREE_BLOB_TYPE.into(),
                content: change.content,
            })
            .collect();

        let tree = self
            .create_tree(GithubTree {
                base_tree: req.base_commit.clone(),
                tree,
            })
            .await?;

        let commit = self
            .create_commit(&req.message, &req.base_commit, &tree.sha)
            .await?;

        info!("created commit for branch: sha: {}", commit.sha);

        let target_ref = self
            .instance
            .repos(self.config.owner(), self.config.repo())
            .get_ref(&params::repos::Reference::Branch(req.branch.clone()))
            .await;

        if target_ref.is_ok() {
            info!("branch {} already exists: updating", req.branch);
            let endpoint = format!(
                "{}/repos/{}/git/refs/heads/{}",
                self.base_uri, self.config.path, req.branch
            );
            let _: serde_json::Value = self
                .instance
                .patch(
                    endpoint,
                    Some(&serde_json::json!({
                      "sha": commit.sha,
                      "force": true
                    })),
                )
                .await?;

            return Ok(commit);
        }

        info!("creating branch {}", req.branch);

        self.instance
            .repos(self.config.owner(), self.config.repo())
            .create_ref(
                &params::repos::Reference::Branch(req.branch),
                commit.sha.clone(),
            )
            .await?;

        Ok(commit)
    }

    async fn create_pr(&self, req: CreatePrRequest) -> Result<PullRequest> {
        let pr = self
            .instance
            .pulls(self.config.owner(), self.config.repo())
            .create(req.title, req.head_branch, req.base_branch)
            .body(req.body)
            .send()
            .await?;

        Ok(PullRequest {
            number: pr.number,
            url: pr.html_url.map(|url| url.to_string()),
        })
    }

    async fn add_pr_labels(&self, req: PrLabelsRequest) -> Result<()> {
        let all_labels = self
            .instance
            .issues(self.config.owner(), self.config.repo())
            .list_labels_for_repo()
            .per_page(100)
            .send()
            .await?;

        let mut labels = vec![];

        for name in req.labels {
            if let Some(label) =
                all_labels.items.iter().find(|l| l.name == name)
            {
                labels.push(label.name.clone())
            } else {
                let label = self
                    .instance
                    .issues(self.config.owner(), self.config.repo())
                    .create_label(name, DEFAULT_LABEL_COLOR, "")
                    .await?;
                labels.push(label.name);
            }
        }

        self.instance
            .issues(self.config.owner(), self.config.repo())
            .add_labels(req.pr_number, &labels)
            .await?;

        Ok(())
    }

    async fn add_pr_assignees(&self, req: PrAssigneesRequest) -> Result<()> {
        let mut logins = vec![];

        for id in req.assignees {
            logins.push(self.login_for_id(id).await?);
        }

        let logins: Vec<&str> = logins.iter().map(String::as_str).collect();

        self.instance
            .issues(self.config.owner(), self.config.repo())
            .add_assignees(req.pr_number, &logins)
            .await?;

        Ok(())
    }
}
