//! Collaborator contracts implemented per package manager.
//!
//! The core never parses manifests or resolves versions itself; it drives
//! these traits in a fixed order and reacts to their answers.
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{
    Result,
    config::{Credentials, Source},
    ecosystem::types::{
        Dependency, FetchedFiles, FileSet, RequirementsToUnlock,
        UpdatedDependency,
    },
};

/// Reads dependency files and the base commit from the repository.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FileFetcher: Send + Sync {
    async fn fetch(&self) -> Result<FetchedFiles>;
}

/// Turns dependency files into dependencies.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FileParser: Send + Sync {
    async fn parse(&self, files: &FileSet) -> Result<Vec<Dependency>>;
}

/// Answers update questions for a single dependency.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UpdateChecker: Send + Sync {
    async fn is_up_to_date(&self) -> Result<bool>;

    async fn requirements_unlocked_or_can_be(&self) -> Result<bool>;

    async fn can_update(
        &self,
        requirements_to_unlock: RequirementsToUnlock,
    ) -> Result<bool>;

    async fn updated_dependencies(
        &self,
        requirements_to_unlock: RequirementsToUnlock,
    ) -> Result<Vec<UpdatedDependency>>;
}

/// Regenerates dependency files for a set of updated dependencies.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FileUpdater: Send + Sync {
    async fn updated_dependency_files(&self) -> Result<FileSet>;
}

/// Factory for one package manager's collaborators. Checkers and updaters
/// are created fresh for every dependency.
#[cfg_attr(test, automock)]
pub trait Ecosystem: Send + Sync {
    fn file_fetcher(
        &self,
        source: &Source,
        credentials: &Credentials,
    ) -> Result<Box<dyn FileFetcher>>;

    fn file_parser(
        &self,
        source: &Source,
        credentials: &Credentials,
    ) -> Result<Box<dyn FileParser>>;

    fn update_checker(
        &self,
        dependency: &Dependency,
        files: &FileSet,
        credentials: &Credentials,
    ) -> Result<Box<dyn UpdateChecker>>;

    fn file_updater(
        &self,
        dependencies: &[UpdatedDependency],
        files: &FileSet,
        credentials: &Credentials,
    ) -> Result<Box<dyn FileUpdater>>;
}
