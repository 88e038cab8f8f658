//! Data exchanged with ecosystem collaborators.
use serde::{Deserialize, Serialize};
use std::fmt;

/// How much of the declared version constraints an update may rewrite.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RequirementsToUnlock {
    /// Leave every declared requirement untouched.
    None,
    /// Rewrite only the dependency's own requirement.
    Own,
    /// Rewrite any requirement, including those of other dependencies.
    All,
}

impl fmt::Display for RequirementsToUnlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequirementsToUnlock::None => "none",
            RequirementsToUnlock::Own => "own",
            RequirementsToUnlock::All => "all",
        };
        f.write_str(name)
    }
}

/// A version constraint declared in one dependency file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Dependency file declaring the constraint.
    pub file: String,
    /// Constraint as written in the file, absent for unpinned declarations.
    pub requirement: Option<String>,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// A dependency as produced by the ecosystem parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    /// Resolved version, absent for ecosystems without resolvable versions.
    pub version: Option<String>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    /// Directly declared in a manifest rather than pulled in transitively.
    pub top_level: bool,
}

impl Dependency {
    /// Top-level when it declares at least one requirement.
    pub fn new(
        name: impl Into<String>,
        version: Option<String>,
        requirements: Vec<Requirement>,
    ) -> Self {
        let top_level = !requirements.is_empty();
        Self {
            name: name.into(),
            version,
            requirements,
            top_level,
        }
    }

    pub fn display_version(&self) -> &str {
        self.version.as_deref().unwrap_or("unknown")
    }
}

/// A dependency after the checker picked its update target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedDependency {
    pub name: String,
    pub version: Option<String>,
    pub previous_version: Option<String>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub previous_requirements: Vec<Requirement>,
}

impl UpdatedDependency {
    /// Requirements whose constraint changed, paired with the previous one.
    pub fn changed_requirements(
        &self,
    ) -> Vec<(&Requirement, Option<&Requirement>)> {
        self.requirements
            .iter()
            .filter_map(|req| {
                let previous = self
                    .previous_requirements
                    .iter()
                    .find(|prev| prev.file == req.file);

                match previous {
                    Some(prev) if prev.requirement == req.requirement => None,
                    _ => Some((req, previous)),
                }
            })
            .collect()
    }
}

/// A manifest or lockfile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyFile {
    /// File name relative to `directory`.
    pub name: String,
    /// Directory of the file relative to the repository root.
    pub directory: String,
    pub content: String,
}

impl DependencyFile {
    pub fn new(
        directory: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
            content: content.into(),
        }
    }

    /// Path relative to the repository root, without a leading slash.
    pub fn path(&self) -> String {
        let directory = self.directory.trim_matches('/');
        let name = self.name.trim_start_matches("./").trim_start_matches('/');

        if directory.is_empty() {
            name.to_string()
        } else {
            format!("{directory}/{name}")
        }
    }
}

/// Ordered set of dependency files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSet(Vec<DependencyFile>);

impl FileSet {
    pub fn new(files: Vec<DependencyFile>) -> Self {
        Self(files)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DependencyFile> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&DependencyFile> {
        self.0.iter().find(|f| f.name == name)
    }

    /// Whether a file with the repository relative path is in the set.
    pub fn contains_path(&self, path: &str) -> bool {
        self.0.iter().any(|f| f.path() == path)
    }
}

impl FromIterator<DependencyFile> for FileSet {
    fn from_iter<T: IntoIterator<Item = DependencyFile>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FileSet {
    type Item = DependencyFile;
    type IntoIter = std::vec::IntoIter<DependencyFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a DependencyFile;
    type IntoIter = std::slice::Iter<'a, DependencyFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Dependency files together with the commit they were read at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedFiles {
    pub files: FileSet,
    /// Base commit the files were read at.
    pub commit: String,
}
