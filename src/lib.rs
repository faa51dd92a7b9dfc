//! End-to-end fixtures for the registrar
//!
//! Models what an API handler does with `registrar-core`: check the caller's
//! effective permissions on a program, then import or export enrollment CSVs.

use std::sync::Arc;

use registrar_core::{
    load_records_from_uploaded_csv, serialize_to_csv, APIPermission, GroupId,
    InMemoryAuthorizationStore, Organization, PermissionObject, PermissionResolver, Program,
    Record, UploadedFile, User,
};
use thiserror::Error;
use tracing::info;

/// Columns of an enrollment upload
pub const ENROLLMENT_FIELDS: [&str; 3] = ["student_key", "status", "course_key"];

/// Enrollment columns that may be left out
pub const OPTIONAL_ENROLLMENT_FIELDS: [&str; 1] = ["course_key"];

/// Errors surfaced by the enrollment endpoints
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("{user} lacks {permission} on program {program}")]
    Forbidden {
        user: String,
        program: String,
        permission: APIPermission,
    },

    #[error(transparent)]
    Registrar(#[from] registrar_core::Error),
}

/// Install a test log subscriber once per process
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// A single organization with its organization group and programs
pub struct Campus {
    pub store: Arc<InMemoryAuthorizationStore>,
    pub resolver: PermissionResolver<Arc<InMemoryAuthorizationStore>>,
    pub organization: Organization,
    pub organization_group: GroupId,
}

impl Campus {
    pub fn new(key: &str) -> Self {
        let store = Arc::new(InMemoryAuthorizationStore::new());
        let organization = Organization::new(key, key.to_uppercase());
        let organization_group = GroupId(1);
        store.link_organization_group(organization_group, organization.clone());

        Self {
            resolver: PermissionResolver::with_default_mapping(store.clone()),
            store,
            organization,
            organization_group,
        }
    }

    /// A program managed by this campus
    pub fn program(&self, key: &str, is_enrollment_enabled: bool) -> Program {
        Program::new(key, self.organization.clone(), is_enrollment_enabled)
    }

    /// A member of the organization group holding `grants` on the organization
    pub fn organization_member(&self, username: &str, grants: &[&str]) -> User {
        let user = User::new(username);
        self.store.add_group_membership(&user, self.organization_group);
        for grant in grants {
            self.store
                .grant_object(&user, self.organization.object_key(), *grant);
        }
        user
    }

    /// A user holding `grants` directly on `program`
    pub fn program_member(&self, username: &str, program: &Program, grants: &[&str]) -> User {
        let user = User::new(username);
        for grant in grants {
            self.store.grant_object(&user, program.object_key(), *grant);
        }
        user
    }

    fn require(
        &self,
        user: &User,
        program: &Program,
        permission: APIPermission,
    ) -> Result<(), EndpointError> {
        if self.resolver.has_program_permission(user, program, permission) {
            Ok(())
        } else {
            Err(EndpointError::Forbidden {
                user: user.username.clone(),
                program: program.key.clone(),
                permission,
            })
        }
    }

    /// Handle an enrollment CSV upload for a program
    pub fn import_enrollments<F: UploadedFile + ?Sized>(
        &self,
        user: &User,
        program: &Program,
        file: &mut F,
    ) -> Result<Vec<Record>, EndpointError> {
        self.require(user, program, APIPermission::WriteEnrollments)?;
        let records =
            load_records_from_uploaded_csv(file, &ENROLLMENT_FIELDS, &OPTIONAL_ENROLLMENT_FIELDS)?;
        info!(program = %program.key, count = records.len(), "imported enrollments");
        Ok(records)
    }

    /// Render a program's enrollments as a downloadable CSV
    pub fn export_enrollments(
        &self,
        user: &User,
        program: &Program,
        enrollments: &[serde_json::Value],
    ) -> Result<String, EndpointError> {
        self.require(user, program, APIPermission::ReadEnrollments)?;
        Ok(serialize_to_csv(enrollments, &ENROLLMENT_FIELDS, true)?)
    }
}
