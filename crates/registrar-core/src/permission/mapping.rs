//! Storage-to-API permission mapping

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::permission::models::APIPermission;

const STORAGE_NAMESPACE: &str = "core";

/// Translation table from storage-level permission ids to API permissions
///
/// Only ids present in `db_to_api` are recognised; everything else the
/// authorization store reports is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionMapping {
    /// Storage permission id to API permission
    pub db_to_api: HashMap<String, APIPermission>,
    /// API permissions that only make sense when enrollment is enabled
    pub enrollment_permissions: HashSet<APIPermission>,
}

impl PermissionMapping {
    /// Create an empty mapping that recognises nothing
    pub fn empty() -> Self {
        Self {
            db_to_api: HashMap::new(),
            enrollment_permissions: HashSet::new(),
        }
    }

    /// The registrar's built-in mapping for organization and program grants
    pub fn registrar_default() -> Self {
        let mut mapping = Self::empty();
        for scope in ["organization", "program"] {
            mapping.add(
                format!("{STORAGE_NAMESPACE}.{scope}_read_metadata"),
                APIPermission::ReadMetadata,
            );
            mapping.add(
                format!("{STORAGE_NAMESPACE}.{scope}_read_enrollments"),
                APIPermission::ReadEnrollments,
            );
            mapping.add(
                format!("{STORAGE_NAMESPACE}.{scope}_write_enrollments"),
                APIPermission::WriteEnrollments,
            );
            mapping.add(
                format!("{STORAGE_NAMESPACE}.{scope}_read_reports"),
                APIPermission::ReadReports,
            );
        }
        mapping.enrollment_permissions = [
            APIPermission::ReadEnrollments,
            APIPermission::WriteEnrollments,
        ]
        .into_iter()
        .collect();
        mapping
    }

    /// Map a storage permission id to an API permission
    pub fn add(&mut self, db_permission: impl Into<String>, api_permission: APIPermission) {
        self.db_to_api.insert(db_permission.into(), api_permission);
    }

    /// Builder-style variant of [`PermissionMapping::add`]
    pub fn with(mut self, db_permission: impl Into<String>, api_permission: APIPermission) -> Self {
        self.add(db_permission, api_permission);
        self
    }

    /// Replace the enrollment permission set
    pub fn with_enrollment_permissions<I>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = APIPermission>,
    {
        self.enrollment_permissions = permissions.into_iter().collect();
        self
    }

    /// Look up the API permission for a storage permission id
    pub fn translate(&self, db_permission: &str) -> Option<APIPermission> {
        self.db_to_api.get(db_permission).copied()
    }

    /// Whether the permission is enrollment-related
    pub fn is_enrollment_permission(&self, permission: APIPermission) -> bool {
        self.enrollment_permissions.contains(&permission)
    }

    /// Every API permission this mapping can produce
    pub fn api_permissions(&self) -> HashSet<APIPermission> {
        self.db_to_api.values().copied().collect()
    }
}

impl Default for PermissionMapping {
    fn default() -> Self {
        Self::registrar_default()
    }
}
