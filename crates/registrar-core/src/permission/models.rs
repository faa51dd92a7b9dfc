//! Permission data models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Permission exposed through the registrar API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum APIPermission {
    /// Read program and organization metadata
    #[serde(rename = "api_read_metadata")]
    ReadMetadata,
    /// Read learner enrollments
    #[serde(rename = "api_read_enrollments")]
    ReadEnrollments,
    /// Create or modify learner enrollments
    #[serde(rename = "api_write_enrollments")]
    WriteEnrollments,
    /// Read generated reports
    #[serde(rename = "api_read_reports")]
    ReadReports,
}

impl APIPermission {
    /// Every API permission, in declaration order
    pub const ALL: [APIPermission; 4] = [
        APIPermission::ReadMetadata,
        APIPermission::ReadEnrollments,
        APIPermission::WriteEnrollments,
        APIPermission::ReadReports,
    ];

    /// Wire identifier of this permission
    pub fn as_str(&self) -> &'static str {
        match self {
            APIPermission::ReadMetadata => "api_read_metadata",
            APIPermission::ReadEnrollments => "api_read_enrollments",
            APIPermission::WriteEnrollments => "api_write_enrollments",
            APIPermission::ReadReports => "api_read_reports",
        }
    }
}

impl std::fmt::Display for APIPermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
}

impl User {
    /// Create a user with a fresh id
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
        }
    }
}

/// Identifier of a group the user belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub u64);

/// Organization that manages programs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Organization {
    /// Unique slug of the organization
    pub key: String,
    pub name: String,
}

impl Organization {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
        }
    }
}

/// Program offered by an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Unique slug of the program
    pub key: String,
    pub managing_organization: Organization,
    pub is_enrollment_enabled: bool,
}

impl Program {
    pub fn new(
        key: impl Into<String>,
        managing_organization: Organization,
        is_enrollment_enabled: bool,
    ) -> Self {
        Self {
            key: key.into(),
            managing_organization,
            is_enrollment_enabled,
        }
    }
}

/// Kind of object a permission can be granted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Organization,
    Program,
}

/// Storage key of an object carrying object-scoped grants
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectKey {
    pub kind: ObjectKind,
    pub key: String,
}

impl ObjectKey {
    pub fn new(kind: ObjectKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
        }
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ObjectKind::Organization => write!(f, "organization:{}", self.key),
            ObjectKind::Program => write!(f, "program:{}", self.key),
        }
    }
}

/// Object on which permissions can be granted
pub trait PermissionObject {
    /// Key under which grants for this object are stored
    fn object_key(&self) -> ObjectKey;
}

impl PermissionObject for Organization {
    fn object_key(&self) -> ObjectKey {
        ObjectKey::new(ObjectKind::Organization, self.key.clone())
    }
}

impl PermissionObject for Program {
    fn object_key(&self) -> ObjectKey {
        ObjectKey::new(ObjectKind::Program, self.key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_permission_display() {
        assert_eq!(APIPermission::ReadMetadata.to_string(), "api_read_metadata");
        assert_eq!(APIPermission::ReadEnrollments.to_string(), "api_read_enrollments");
        assert_eq!(APIPermission::WriteEnrollments.to_string(), "api_write_enrollments");
        assert_eq!(APIPermission::ReadReports.to_string(), "api_read_reports");
    }

    #[test]
    fn test_api_permission_serialization_matches_display() {
        for perm in APIPermission::ALL {
            let json = serde_json::to_string(&perm).unwrap();
            assert_eq!(json, format!("\"{}\"", perm.as_str()));

            let deserialized: APIPermission = serde_json::from_str(&json).unwrap();
            assert_eq!(deserialized, perm);
        }
    }

    #[test]
    fn test_object_keys_distinguish_kinds() {
        let org = Organization::new("mitx", "MITx");
        let program = Program::new("mitx", org.clone(), true);

        assert_ne!(org.object_key(), program.object_key());
        assert_eq!(org.object_key().to_string(), "organization:mitx");
        assert_eq!(program.object_key().to_string(), "program:mitx");
    }

    #[test]
    fn test_users_get_distinct_ids() {
        let a = User::new("alice");
        let b = User::new("alice");
        assert_ne!(a.id, b.id);
        assert_ne!(a, b);
    }
}
