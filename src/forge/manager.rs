//! Manager that wraps forge implementations
use log::*;

use crate::{
    Result,
    forge::{
        config::RemoteConfig,
        request::{
            Commit, CreateBranchRequest, CreatePrRequest, GetPrRequest,
            PrAssigneesRequest, PrLabelsRequest, PullRequest,
        },
        traits::Forge,
    },
};

pub struct ForgeManager {
    forge: Box<dyn Forge>,
    remote_config: RemoteConfig,
}

impl ForgeManager {
    pub fn new(forge: Box<dyn Forge>) -> Self {
        let remote_config = forge.remote_config();
        Self {
            forge,
            remote_config,
        }
    }

    pub fn remote_config(&self) -> RemoteConfig {
        self.remote_config.clone()
    }

    pub fn default_branch(&self) -> String {
        self.forge.default_branch()
    }

    pub async fn find_open_pr(
        &self,
        req: GetPrRequest,
    ) -> Result<Option<PullRequest>> {
        debug!(
            "looking for open pull request: {} -> {}",
            req.head_branch, req.base_branch
        );
        self.forge.find_open_pr(req).await
    }

    pub async fn create_branch(
        &self,
        req: CreateBranchRequest,
    ) -> Result<Commit> {
        if self.remote_config.dry_run {
            warn!("dry_run: would create branch: req: {:#?}", req);
            return Ok(Commit { sha: "fff".into() });
        }
        self.forge.create_branch(req).await
    }

    pub async fn create_pr(&self, req: CreatePrRequest) -> Result<PullRequest> {
        if self.remote_config.dry_run {
            warn!("dry_run: would create PR: req: {:#?}", req);
            return Ok(PullRequest {
                number: 0,
                url: None,
            });
        }

        self.forge.create_pr(req).await
    }

    pub async fn add_pr_labels(&self, req: PrLabelsRequest) -> Result<()> {
        if self.remote_config.dry_run {
            warn!("dry_run: would add PR labels: req: {:#?}", req);
            return Ok(());
        }
        self.forge.add_pr_labels(req).await
    }

    pub async fn add_pr_assignees(
        &self,
        req: PrAssigneesRequest,
    ) -> Result<()> {
        if self.remote_config.dry_run {
            warn!("dry_run: would add PR assignees: req: {:#?}", req);
            return Ok(());
        }
        self.forge.add_pr_assignees(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::traits::MockForge;

    fn dry_run_forge() -> MockForge {
        let mut mock_forge = MockForge::new();
        mock_forge
            .expect_remote_config()
            .returning(|| RemoteConfig {
                dry_run: true,
                ..Default::default()
            });
        mock_forge
    }

    #[tokio::test]
    async fn find_open_pr_queries_forge_in_dry_run() {
        let mut mock_forge = dry_run_forge();
        mock_forge
            .expect_find_open_pr()
            .with(mockall::predicate::eq(GetPrRequest {
                head_branch: "bumpkin/bundler/foo-1.1".into(),
                base_branch: "main".into(),
            }))
            .times(1)
            .returning(|_| {
                Ok(Some(PullRequest {
                    number: 3,
                    url: None,
                }))
            });

        let manager = ForgeManager::new(Box::new(mock_forge));
        let pr = manager
            .find_open_pr(GetPrRequest {
                head_branch: "bumpkin/bundler/foo-1.1".into(),
                base_branch: "main".into(),
            })
            .await
            .unwrap();

        assert_eq!(pr.unwrap().number, 3);
    }

    #[tokio::test]
    async fn dry_run_prevents_create_branch() {
        let mut mock_forge = dry_run_forge();
        mock_forge.expect_create_branch().never();

        let manager = ForgeManager::new(Box::new(mock_forge));

        let req = CreateBranchRequest {
            branch: "bumpkin/bundler/foo-1.1".into(),
            base_commit: "abc123".into(),
            message: "Bump foo from 1.0 to 1.1".into(),
            file_changes: vec![],
        };
        let result = manager.create_branch(req).await.unwrap();

        assert_eq!(result.sha, "fff");
    }

    #[tokio::test]
    async fn dry_run_prevents_create_pr() {
        let mut mock_forge = dry_run_forge();
        mock_forge.expect_create_pr().never();

        let manager = ForgeManager::new(Box::new(mock_forge));
        let req = CreatePrRequest {
            title: "test".to_string(),
            body: "test body".to_string(),
            head_branch: "branch".to_string(),
            base_branch: "main".to_string(),
        };
        let result = manager.create_pr(req).await.unwrap();

        assert_eq!(result.number, 0);
        assert!(result.url.is_none());
    }

    #[tokio::test]
    async fn dry_run_prevents_add_pr_labels() {
        let mut mock_forge = dry_run_forge();
        mock_forge.expect_add_pr_labels().never();

        let manager = ForgeManager::new(Box::new(mock_forge));
        let req = PrLabelsRequest {
            pr_number: 42,
            labels: vec!["dependencies".to_string()],
        };
        let result = manager.add_pr_labels(req).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn dry_run_prevents_add_pr_assignees() {
        let mut mock_forge = dry_run_forge();
        mock_forge.expect_add_pr_assignees().never();

        let manager = ForgeManager::new(Box::new(mock_forge));
        let req = PrAssigneesRequest {
            pr_number: 42,
            assignees: vec![7],
        };
        let result = manager.add_pr_assignees(req).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn writes_pass_through_without_dry_run() {
        let mut mock_forge = MockForge::new();
        mock_forge
            .expect_remote_config()
            .returning(RemoteConfig::default);
        mock_forge.expect_create_pr().times(1).returning(|_| {
            Ok(PullRequest {
                number: 12,
                url: Some("https://gitlab.com/group/project/-/merge_requests/12".into()),
            })
        });
        mock_forge.expect_add_pr_labels().times(1).returning(|_| Ok(()));

        let manager = ForgeManager::new(Box::new(mock_forge));
        let pr = manager
            .create_pr(CreatePrRequest {
                title: "Bump foo from 1.0 to 1.1".into(),
                body: "".into(),
                head_branch: "bumpkin/bundler/foo-1.1".into(),
                base_branch: "main".into(),
            })
            .await
            .unwrap();

        assert_eq!(pr.number, 12);

        manager
            .add_pr_labels(PrLabelsRequest {
                pr_number: pr.number,
                labels: vec!["dependencies".into()],
            })
            .await
            .unwrap();
    }
}
