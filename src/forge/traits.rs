//! Traits related to remote git forges
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{
    Result,
    forge::{
        config::RemoteConfig,
        request::{
            Commit, CreateBranchRequest, CreatePrRequest, GetPrRequest,
            PrAssigneesRequest, PrLabelsRequest, PullRequest,
        },
    },
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Forge: Send + Sync {
    fn remote_config(&self) -> RemoteConfig;
    fn default_branch(&self) -> String;
    async fn find_open_pr(
        &self,
        req: GetPrRequest,
    ) -> Result<Option<PullRequest>>;
    async fn create_branch(&self, req: CreateBranchRequest) -> Result<Commit>;
    async fn create_pr(&self, req: CreatePrRequest) -> Result<PullRequest>;
    async fn add_pr_labels(&self, req: PrLabelsRequest) -> Result<()>;
    async fn add_pr_assignees(&self, req: PrAssigneesRequest) -> Result<()>;
}
