//! Bounded retry loop around "merge when pipeline succeeds".
use async_trait::async_trait;
use log::*;
#[cfg(test)]
use mockall::automock;
use std::time::Duration;

use crate::{Result, config::DEFAULT_MAX_MERGE_ATTEMPTS};

/// Identifies the merge request to accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptMergeRequest {
    /// Full project path, e.g. "group/project".
    pub repo: String,
    pub iid: u64,
}

/// Hosting client able to accept a merge request once its pipeline passes
/// and delete the source branch afterwards.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MergeClient: Send + Sync {
    /// Fails with a transient merge rejection while the merge request is not
    /// yet ready to be accepted.
    async fn accept_merge_request(&self, req: AcceptMergeRequest)
    -> Result<()>;
}

/// Wait between merge attempts.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Backoff: Send + Sync {
    async fn wait(&self, attempt: u32);
}

/// Constant backoff.
#[derive(Debug, Clone, Copy)]
pub struct FixedBackoff(pub Duration);

impl Default for FixedBackoff {
    fn default() -> Self {
        Self(Duration::from_secs(1))
    }
}

#[async_trait]
impl Backoff for FixedBackoff {
    async fn wait(&self, _attempt: u32) {
        tokio::time::sleep(self.0).await;
    }
}

/// Attempt bookkeeping for a single merge request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    pub attempts: u32,
    pub max_attempts: u32,
}

impl RetryState {
    /// Non-positive maximums fall back to the default.
    pub fn new(max_attempts: u32) -> Self {
        let max_attempts = if max_attempts < 1 {
            DEFAULT_MAX_MERGE_ATTEMPTS
        } else {
            max_attempts
        };

        Self {
            attempts: 0,
            max_attempts,
        }
    }

    /// Records a rejection, returns false once retries are exhausted.
    pub fn record_rejection(&mut self) -> bool {
        self.attempts += 1;
        self.attempts <= self.max_attempts
    }
}

/// Accepts the merge request, retrying transient rejections with a backoff
/// until `max_attempts` retries have been spent.
pub async fn auto_merge(
    client: &dyn MergeClient,
    backoff: &dyn Backoff,
    repo: &str,
    iid: u64,
    max_attempts: u32,
) -> Result<()> {
    let mut state = RetryState::new(max_attempts);

    loop {
        let req = AcceptMergeRequest {
            repo: repo.to_string(),
            iid,
        };

        match client.accept_merge_request(req).await {
            Ok(()) => {
                info!("merge request !{iid} will merge when pipeline succeeds");
                return Ok(());
            }
            Err(err) if err.is_transient_merge_rejection() => {
                if !state.record_rejection() {
                    error!(
                        "giving up on merge request !{iid} after {} retries",
                        state.max_attempts
                    );
                    return Err(err);
                }

                warn!(
                    "merge request !{iid} not ready ({err}), retry {}/{}",
                    state.attempts, state.max_attempts
                );

                backoff.wait(state.attempts).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Configured auto-merge step run after each submitted merge request.
pub struct AutoMerger {
    client: Box<dyn MergeClient>,
    backoff: Box<dyn Backoff>,
    max_attempts: u32,
    dry_run: bool,
}

impl AutoMerger {
    pub fn new(
        client: Box<dyn MergeClient>,
        max_attempts: u32,
        dry_run: bool,
    ) -> Self {
        Self {
            client,
            backoff: Box::new(FixedBackoff::default()),
            max_attempts,
            dry_run,
        }
    }

    pub fn with_backoff(mut self, backoff: Box<dyn Backoff>) -> Self {
        self.backoff = backoff;
        self
    }

    pub async fn auto_merge(&self, repo: &str, iid: u64) -> Result<()> {
        if self.dry_run {
            warn!("dry_run: would enable auto-merge for {repo}!{iid}");
            return Ok(());
        }

        auto_merge(
            self.client.as_ref(),
            self.backoff.as_ref(),
            repo,
            iid,
            self.max_attempts,
        )
        .await
    }
}
