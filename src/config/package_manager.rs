//! Supported package managers.
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::BumpkinError;

/// Package manager an update run operates on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum PackageManager {
    #[default]
    Bundler,
    Pip,
    NpmAndYarn,
    Maven,
    Gradle,
    Cargo,
    Hex,
    Composer,
    Nuget,
    Dep,
    GoModules,
    Elm,
    Submodules,
    Docker,
    Terraform,
}

impl PackageManager {
    pub const ALL: [PackageManager; 15] = [
        PackageManager::Bundler,
        PackageManager::Pip,
        PackageManager::NpmAndYarn,
        PackageManager::Maven,
        PackageManager::Gradle,
        PackageManager::Cargo,
        PackageManager::Hex,
        PackageManager::Composer,
        PackageManager::Nuget,
        PackageManager::Dep,
        PackageManager::GoModules,
        PackageManager::Elm,
        PackageManager::Submodules,
        PackageManager::Docker,
        PackageManager::Terraform,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Bundler => "bundler",
            PackageManager::Pip => "pip",
            PackageManager::NpmAndYarn => "npm-and-yarn",
            PackageManager::Maven => "maven",
            PackageManager::Gradle => "gradle",
            PackageManager::Cargo => "cargo",
            PackageManager::Hex => "hex",
            PackageManager::Composer => "composer",
            PackageManager::Nuget => "nuget",
            PackageManager::Dep => "dep",
            PackageManager::GoModules => "go-modules",
            PackageManager::Elm => "elm",
            PackageManager::Submodules => "submodules",
            PackageManager::Docker => "docker",
            PackageManager::Terraform => "terraform",
        }
    }

    /// Label naming the language ecosystem, applied to pull requests when
    /// language labelling is requested.
    pub fn language_label(&self) -> &'static str {
        match self {
            PackageManager::Bundler => "ruby",
            PackageManager::Pip => "python",
            PackageManager::NpmAndYarn => "javascript",
            PackageManager::Maven | PackageManager::Gradle => "java",
            PackageManager::Cargo => "rust",
            PackageManager::Hex => "elixir",
            PackageManager::Composer => "php",
            PackageManager::Nuget => ".NET",
            PackageManager::Dep | PackageManager::GoModules => "go",
            PackageManager::Elm => "elm",
            PackageManager::Submodules => "submodules",
            PackageManager::Docker => "docker",
            PackageManager::Terraform => "terraform",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = BumpkinError;

    /// Accepts both `npm-and-yarn` and `npm_and_yarn` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");

        PackageManager::ALL
            .into_iter()
            .find(|pm| pm.as_str() == normalized)
            .ok_or_else(|| BumpkinError::UnsupportedPackageManager(s.into()))
    }
}
