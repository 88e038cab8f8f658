//! Ecosystem backed by an external helper program.
//!
//! Every collaborator call spawns the helper once, writes a single JSON
//! request to its stdin and reads a single JSON document from its stdout.
//! The command name is passed both as the last argument and as the
//! `command` field of the request. `source` is only sent with `fetch` and
//! `parse`:
//!
//! ```text
//! $ helper can_update < {"command":"can_update","package_manager":"cargo",
//!                        "credentials":[..],"dependency":{..},
//!                        "files":[..],"requirements_to_unlock":"own"}
//! true
//! ```
//!
//! | command                           | response                      |
//! |-----------------------------------|-------------------------------|
//! | `fetch`                           | `{"files": [..], "commit": ..}` |
//! | `parse`                           | `[dependency, ..]`            |
//! | `up_to_date`                      | `bool`                        |
//! | `requirements_unlocked_or_can_be` | `bool`                        |
//! | `can_update`                      | `bool`                        |
//! | `updated_dependencies`            | `[updated dependency, ..]`    |
//! | `updated_dependency_files`        | `[file, ..]`                  |
//!
//! A non-zero exit status fails the call with the helper's stderr.
use async_trait::async_trait;
use log::*;
use serde::{Serialize, de::DeserializeOwned};
use std::{path::PathBuf, process::Stdio};
use tokio::{io::AsyncWriteExt, process::Command};

use crate::{
    Result,
    config::{Credentials, PackageManager, Source},
    ecosystem::{
        traits::{
            Ecosystem, FileFetcher, FileParser, FileUpdater, UpdateChecker,
        },
        types::{
            Dependency, FetchedFiles, FileSet, RequirementsToUnlock,
            UpdatedDependency,
        },
    },
    error::BumpkinError,
};

#[derive(Debug, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
enum HelperCommand<'a> {
    Fetch,
    Parse {
        files: &'a FileSet,
    },
    UpToDate {
        dependency: &'a Dependency,
        files: &'a FileSet,
    },
    RequirementsUnlockedOrCanBe {
        dependency: &'a Dependency,
        files: &'a FileSet,
    },
    CanUpdate {
        dependency: &'a Dependency,
        files: &'a FileSet,
        requirements_to_unlock: RequirementsToUnlock,
    },
    UpdatedDependencies {
        dependency: &'a Dependency,
        files: &'a FileSet,
        requirements_to_unlock: RequirementsToUnlock,
    },
    UpdatedDependencyFiles {
        dependencies: &'a [UpdatedDependency],
        files: &'a FileSet,
    },
}

impl HelperCommand<'_> {
    fn name(&self) -> &'static str {
        match self {
            HelperCommand::Fetch => "fetch",
            HelperCommand::Parse { .. } => "parse",
            HelperCommand::UpToDate { .. } => "up_to_date",
            HelperCommand::RequirementsUnlockedOrCanBe { .. } => {
                "requirements_unlocked_or_can_be"
            }
            HelperCommand::CanUpdate { .. } => "can_update",
            HelperCommand::UpdatedDependencies { .. } => "updated_dependencies",
            HelperCommand::UpdatedDependencyFiles { .. } => {
                "updated_dependency_files"
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct HelperRequest<'a> {
    #[serde(flatten)]
    command: &'a HelperCommand<'a>,
    package_manager: PackageManager,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a Source>,
    credentials: &'a Credentials,
}

/// Spawns the helper program for one package manager.
#[derive(Debug, Clone)]
struct HelperClient {
    program: PathBuf,
    args: Vec<String>,
    package_manager: PackageManager,
    /// Only set for fetch and parse calls.
    source: Option<Source>,
    credentials: Credentials,
}

impl HelperClient {
    async fn call<T: DeserializeOwned>(
        &self,
        command: HelperCommand<'_>,
    ) -> Result<T> {
        let name = command.name();

        let payload = serde_json::to_vec(&HelperRequest {
            command: &command,
            package_manager: self.package_manager,
            source: self.source.as_ref(),
            credentials: &self.credentials,
        })?;

        debug!(
            "invoking ecosystem helper {} {name}",
            self.program.display()
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(name)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| {
                BumpkinError::helper(
                    name,
                    format!(
                        "failed to spawn {}: {err}",
                        self.program.display()
                    ),
                )
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            BumpkinError::helper(name, "helper stdin was not captured")
        })?;

        let write = async move {
            let result = stdin.write_all(&payload).await;
            drop(stdin);
            result
        };

        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output?;

        let stderr = String::from_utf8_lossy(&output.stderr);

        if !stderr.trim().is_empty() {
            debug!("helper {name} stderr: {}", stderr.trim());
        }

        if !output.status.success() {
            return Err(BumpkinError::helper(
                name,
                format!("{}: {}", output.status, stderr.trim()),
            ));
        }

        // helpers that answer without reading the request close stdin early
        if let Err(err) = written {
            debug!("helper {name} did not consume its request: {err}");
        }

        serde_json::from_slice(&output.stdout).map_err(|err| {
            BumpkinError::helper(name, format!("malformed response: {err}"))
        })
    }
}

/// Ecosystem whose collaborators all delegate to an external program.
#[derive(Debug, Clone)]
pub struct HelperEcosystem {
    program: PathBuf,
    args: Vec<String>,
    package_manager: PackageManager,
}

impl HelperEcosystem {
    pub fn new(
        program: impl Into<PathBuf>,
        package_manager: PackageManager,
    ) -> Self {
        Self {
            program: program.into(),
            args: vec![],
            package_manager,
        }
    }

    /// Arguments passed to the program ahead of the command name.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    fn client(
        &self,
        source: Option<&Source>,
        credentials: &Credentials,
    ) -> HelperClient {
        HelperClient {
            program: self.program.clone(),
            args: self.args.clone(),
            package_manager: self.package_manager,
            source: source.cloned(),
            credentials: credentials.clone(),
        }
    }
}

impl Ecosystem for HelperEcosystem {
    fn file_fetcher(
        &self,
        source: &Source,
        credentials: &Credentials,
    ) -> Result<Box<dyn FileFetcher>> {
        Ok(Box::new(HelperFetcher {
            client: self.client(Some(source), credentials),
        }))
    }

    fn file_parser(
        &self,
        source: &Source,
        credentials: &Credentials,
    ) -> Result<Box<dyn FileParser>> {
        Ok(Box::new(HelperParser {
            client: self.client(Some(source), credentials),
        }))
    }

    fn update_checker(
        &self,
        dependency: &Dependency,
        files: &FileSet,
        credentials: &Credentials,
    ) -> Result<Box<dyn UpdateChecker>> {
        Ok(Box::new(HelperChecker {
            client: self.client(None, credentials),
            dependency: dependency.clone(),
            files: files.clone(),
        }))
    }

    fn file_updater(
        &self,
        dependencies: &[UpdatedDependency],
        files: &FileSet,
        credentials: &Credentials,
    ) -> Result<Box<dyn FileUpdater>> {
        Ok(Box::new(HelperUpdater {
            client: self.client(None, credentials),
            dependencies: dependencies.to_vec(),
            files: files.clone(),
        }))
    }
}

struct HelperFetcher {
    client: HelperClient,
}

#[async_trait]
impl FileFetcher for HelperFetcher {
    async fn fetch(&self) -> Result<FetchedFiles> {
        self.client.call(HelperCommand::Fetch).await
    }
}

struct HelperParser {
    client: HelperClient,
}

#[async_trait]
impl FileParser for HelperParser {
    async fn parse(&self, files: &FileSet) -> Result<Vec<Dependency>> {
        self.client.call(HelperCommand::Parse { files }).await
    }
}

struct HelperChecker {
    client: HelperClient,
    dependency: Dependency,
    files: FileSet,
}

#[async_trait]
impl UpdateChecker for HelperChecker {
    async fn is_up_to_date(&self) -> Result<bool> {
        self.client
            .call(HelperCommand::UpToDate {
                dependency: &self.dependency,
                files: &self.files,
            })
            .await
    }

    async fn requirements_unlocked_or_can_be(&self) -> Result<bool> {
        self.client
            .call(HelperCommand::RequirementsUnlockedOrCanBe {
                dependency: &self.dependency,
                files: &self.files,
            })
            .await
    }

    async fn can_update(
        &self,
        requirements_to_unlock: RequirementsToUnlock,
    ) -> Result<bool> {
        self.client
            .call(HelperCommand::CanUpdate {
                dependency: &self.dependency,
                files: &self.files,
                requirements_to_unlock,
            })
            .await
    }

    async fn updated_dependencies(
        &self,
        requirements_to_unlock: RequirementsToUnlock,
    ) -> Result<Vec<UpdatedDependency>> {
        self.client
            .call(HelperCommand::UpdatedDependencies {
                dependency: &self.dependency,
                files: &self.files,
                requirements_to_unlock,
            })
            .await
    }
}

struct HelperUpdater {
    client: HelperClient,
    dependencies: Vec<UpdatedDependency>,
    files: FileSet,
}

#[async_trait]
impl FileUpdater for HelperUpdater {
    async fn updated_dependency_files(&self) -> Result<FileSet> {
        self.client
            .call(HelperCommand::UpdatedDependencyFiles {
                dependencies: &self.dependencies,
                files: &self.files,
            })
            .await
    }
}
