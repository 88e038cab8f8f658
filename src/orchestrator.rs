//! Drives a dependency update run from fetch to merge.
use derive_builder::Builder;
use log::*;
use std::{rc::Rc, sync::Arc};

use crate::{
    Result,
    config::{FailurePolicy, RunConfig},
    decision::{UpdateDecision, decide},
    ecosystem::{
        traits::Ecosystem,
        types::{Dependency, FetchedFiles, RequirementsToUnlock},
    },
    error::BumpkinError,
    merge::AutoMerger,
    pull_request::{PullRequestCreator, PullRequestRequest},
};

/// What happened to a single top-level dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyOutcome {
    UpToDate,
    /// Out of date, but no unlock level allows an update.
    NotUpdatable,
    /// The pull request for this update is already open.
    AlreadyOpen,
    Submitted {
        pr_number: u64,
        strategy: RequirementsToUnlock,
        auto_merge: bool,
    },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyReport {
    pub name: String,
    pub outcome: DependencyOutcome,
}

/// Outcome of every top-level dependency, in parser order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub reports: Vec<DependencyReport>,
}

impl RunSummary {
    fn record(&mut self, dependency: &Dependency, outcome: DependencyOutcome) {
        self.reports.push(DependencyReport {
            name: dependency.name.clone(),
            outcome,
        });
    }

    pub fn submitted(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, DependencyOutcome::Submitted { .. }))
            .count()
    }

    pub fn failed(&self) -> Vec<String> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, DependencyOutcome::Failed(_)))
            .map(|r| r.name.clone())
            .collect()
    }
}

#[derive(Builder)]
#[builder(pattern = "owned", build_fn(private, name = "_build"))]
pub struct OrchestratorParams {
    #[builder(setter(into))]
    pub config: Rc<RunConfig>,
    pub ecosystem: Arc<dyn Ecosystem>,
    pub pr_creator: Box<dyn PullRequestCreator>,
    #[builder(default, setter(strip_option))]
    pub auto_merger: Option<AutoMerger>,
}

impl OrchestratorParamsBuilder {
    pub fn build(self) -> Result<Orchestrator> {
        let params = self._build().map_err(|e| {
            BumpkinError::invalid_config(format!(
                "Failed to build orchestrator: {}",
                e
            ))
        })?;
        Ok(Orchestrator::new(params))
    }
}

pub struct Orchestrator {
    config: Rc<RunConfig>,
    ecosystem: Arc<dyn Ecosystem>,
    pr_creator: Box<dyn PullRequestCreator>,
    auto_merger: Option<AutoMerger>,
}

impl Orchestrator {
    pub fn builder() -> OrchestratorParamsBuilder {
        OrchestratorParamsBuilder::default()
    }

    pub fn new(params: OrchestratorParams) -> Self {
        Self {
            config: params.config,
            ecosystem: params.ecosystem,
            pr_creator: params.pr_creator,
            auto_merger: params.auto_merger,
        }
    }

    /// Fetches and parses the dependency files, then updates every
    /// top-level dependency in parser order.
    pub async fn run(&self) -> Result<RunSummary> {
        let config = &self.config;

        info!(
            "fetching {} dependency files for {}",
            config.package_manager, config.source.repo
        );

        let fetched = self
            .ecosystem
            .file_fetcher(&config.source, &config.credentials)?
            .fetch()
            .await?;

        info!("parsing dependencies information");

        let dependencies = self
            .ecosystem
            .file_parser(&config.source, &config.credentials)?
            .parse(&fetched.files)
            .await?;

        let mut summary = RunSummary::default();

        for dependency in dependencies.iter().filter(|d| d.top_level) {
            match self.update_dependency(dependency, &fetched).await {
                Ok(outcome) => summary.record(dependency, outcome),
                Err(err) => match config.failure_policy {
                    FailurePolicy::Abort => return Err(err),
                    FailurePolicy::Continue => {
                        error!("failed to update {}: {err}", dependency.name);
                        summary.record(
                            dependency,
                            DependencyOutcome::Failed(err.to_string()),
                        );
                    }
                },
            }
        }

        let failed = summary.failed();

        if !failed.is_empty() {
            return Err(BumpkinError::DependencyFailures(failed));
        }

        info!("Done");

        Ok(summary)
    }

    async fn update_dependency(
        &self,
        dependency: &Dependency,
        fetched: &FetchedFiles,
    ) -> Result<DependencyOutcome> {
        let config = &self.config;

        let checker = self.ecosystem.update_checker(
            dependency,
            &fetched.files,
            &config.credentials,
        )?;

        let (strategy, updated) =
            match decide(dependency, checker.as_ref()).await? {
                UpdateDecision::UpToDate => {
                    return Ok(DependencyOutcome::UpToDate);
                }
                UpdateDecision::Impossible => {
                    return Ok(DependencyOutcome::NotUpdatable);
                }
                UpdateDecision::Update {
                    strategy,
                    dependencies,
                } => (strategy, dependencies),
            };

        info!(
            "updating {} (from {})…",
            dependency.name,
            dependency.display_version()
        );

        let files = self
            .ecosystem
            .file_updater(&updated, &fetched.files, &config.credentials)?
            .updated_dependency_files()
            .await?;

        let pr = self
            .pr_creator
            .create(&PullRequestRequest {
                base_commit: fetched.commit.clone(),
                base_files: fetched.files.clone(),
                dependencies: updated,
                files,
                assignee: config.assignee,
                label_language: true,
            })
            .await?;

        info!("submitted");

        let Some(pr) = pr else {
            info!("pull request for {} already exists", dependency.name);
            return Ok(DependencyOutcome::AlreadyOpen);
        };

        let auto_merge = match &self.auto_merger {
            Some(merger) => {
                merger.auto_merge(&config.source.repo, pr.number).await?;
                true
            }
            None => false,
        };

        Ok(DependencyOutcome::Submitted {
            pr_number: pr.number,
            strategy,
            auto_merge,
        })
    }
}
