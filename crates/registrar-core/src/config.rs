//! Configuration loading
//!
//! Settings come from an optional file (format inferred from its extension)
//! overlaid with `REGISTRAR__*` environment variables.

use std::path::PathBuf;
use std::sync::Arc;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::Result,
    permission::{APIPermission, PermissionMapping},
};

const ENV_PREFIX: &str = "REGISTRAR";

/// One extra storage-to-API permission translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionMappingEntry {
    pub db_permission: String,
    pub api_permission: APIPermission,
}

/// Permission mapping settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionSettings {
    /// Start from the built-in registrar mapping
    pub include_defaults: bool,
    /// Additional or overriding translations
    pub mappings: Vec<PermissionMappingEntry>,
    /// Replaces the enrollment permission set when present
    pub enrollment_permissions: Option<Vec<APIPermission>>,
}

impl Default for PermissionSettings {
    fn default() -> Self {
        Self {
            include_defaults: true,
            mappings: Vec::new(),
            enrollment_permissions: None,
        }
    }
}

impl PermissionSettings {
    /// Build the mapping described by these settings
    pub fn to_mapping(&self) -> PermissionMapping {
        let mut mapping = if self.include_defaults {
            PermissionMapping::registrar_default()
        } else {
            PermissionMapping::empty()
        };
        for entry in &self.mappings {
            mapping.add(entry.db_permission.clone(), entry.api_permission);
        }
        if let Some(enrollment) = &self.enrollment_permissions {
            mapping = mapping.with_enrollment_permissions(enrollment.iter().copied());
        }
        mapping
    }
}

/// Top-level registrar configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrarConfig {
    pub permissions: PermissionSettings,
}

impl RegistrarConfig {
    /// Shared permission mapping for resolvers
    pub fn permission_mapping(&self) -> Arc<PermissionMapping> {
        Arc::new(self.permissions.to_mapping())
    }
}

/// Loads [`RegistrarConfig`] from file and environment
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Loader reading only the environment
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Loader reading `path` (if it exists) and the environment
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(path.into()),
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Override the environment variable prefix
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load the configuration, falling back to defaults for unset values
    pub fn load(&self) -> Result<RegistrarConfig> {
        let mut builder = Config::builder();
        if let Some(path) = &self.config_path {
            builder = builder.add_source(File::from(path.clone()).required(false));
        }
        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .separator("__")
                .try_parsing(true),
        );

        let config: RegistrarConfig = builder.build()?.try_deserialize()?;
        debug!(
            path = ?self.config_path,
            mappings = config.permissions.mappings.len(),
            "loaded registrar configuration"
        );
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
