//! Closed registry mapping package managers to ecosystem implementations.
use log::*;
use std::{collections::HashMap, sync::Arc};

use crate::{
    Result, config::PackageManager, ecosystem::traits::Ecosystem,
    error::BumpkinError,
};

/// Ecosystems keyed by package manager, resolved once at startup.
#[derive(Default, Clone)]
pub struct Registry {
    ecosystems: HashMap<PackageManager, Arc<dyn Ecosystem>>,
}

impl Registry {
    /// Registry of ecosystems compiled into this build. None are; backends
    /// are registered at runtime (see [`crate::ecosystem::helper`]).
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Register (or replace) the ecosystem for a package manager.
    pub fn register(
        mut self,
        package_manager: PackageManager,
        ecosystem: Arc<dyn Ecosystem>,
    ) -> Self {
        if self
            .ecosystems
            .insert(package_manager, ecosystem)
            .is_some()
        {
            warn!("replacing registered ecosystem for {package_manager}");
        }
        self
    }

    pub fn resolve(
        &self,
        package_manager: PackageManager,
    ) -> Result<Arc<dyn Ecosystem>> {
        self.ecosystems
            .get(&package_manager)
            .cloned()
            .ok_or_else(|| {
                BumpkinError::UnsupportedPackageManager(format!(
                    "{package_manager}: no ecosystem registered (configure one with --ecosystem-helper)"
                ))
            })
    }
}
