//! Package manager collaborators and the registry that selects them.
pub mod helper;
pub mod registry;
pub mod traits;
pub mod types;

pub use helper::HelperEcosystem;
pub use registry::Registry;
pub use traits::{Ecosystem, FileFetcher, FileParser, FileUpdater, UpdateChecker};
pub use types::{
    Dependency, DependencyFile, FetchedFiles, FileSet, Requirement,
    RequirementsToUnlock, UpdatedDependency,
};
