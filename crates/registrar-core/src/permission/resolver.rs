//! Effective permission resolution

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::{
    permission::{
        mapping::PermissionMapping,
        models::{APIPermission, Organization, PermissionObject, Program, User},
    },
    store::AuthorizationStore,
};

/// Resolves the API permissions a user holds on registrar objects
pub struct PermissionResolver<S> {
    store: S,
    mapping: Arc<PermissionMapping>,
}

impl<S: AuthorizationStore> PermissionResolver<S> {
    /// Create a resolver over a store and a permission mapping
    pub fn new(store: S, mapping: Arc<PermissionMapping>) -> Self {
        Self { store, mapping }
    }

    /// Create a resolver using the registrar's default mapping
    pub fn with_default_mapping(store: S) -> Self {
        Self::new(store, Arc::new(PermissionMapping::default()))
    }

    /// The mapping this resolver translates through
    pub fn mapping(&self) -> &PermissionMapping {
        &self.mapping
    }

    /// The underlying authorization store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// All API permissions granted to the user on `object`, including global
    /// grants. With no object only global grants are considered.
    ///
    /// This does not account for programs with enrollment disabled; use
    /// [`PermissionResolver::get_effective_user_program_api_permissions`]
    /// for a program's effective permissions.
    pub fn get_user_api_permissions(
        &self,
        user: &User,
        object: Option<&dyn PermissionObject>,
    ) -> HashSet<APIPermission> {
        let object_permissions = match object {
            Some(object) => self.store.object_permissions(user, &object.object_key()),
            None => Vec::new(),
        };
        let global_permissions = self.store.global_permissions(user);

        let mut api_permissions = HashSet::new();
        for db_permission in object_permissions.iter().chain(global_permissions.iter()) {
            match self.mapping.translate(db_permission) {
                Some(api_permission) => {
                    api_permissions.insert(api_permission);
                }
                None => trace!(permission = %db_permission, "ignoring unmapped permission"),
            }
        }

        api_permissions
    }

    /// API permissions the user holds on a program, either directly or via
    /// its managing organization, minus permissions that are not valid for
    /// the program.
    pub fn get_effective_user_program_api_permissions(
        &self,
        user: &User,
        program: &Program,
    ) -> HashSet<APIPermission> {
        let mut permissions = self.get_user_api_permissions(user, Some(program));
        permissions.extend(
            self.get_user_api_permissions(user, Some(&program.managing_organization)),
        );

        if !program.is_enrollment_enabled {
            permissions.retain(|perm| !self.mapping.is_enrollment_permission(*perm));
        }

        debug!(
            user = %user.username,
            program = %program.key,
            count = permissions.len(),
            "resolved effective program permissions"
        );
        permissions
    }

    /// Whether the user effectively holds `permission` on the program
    pub fn has_program_permission(
        &self,
        user: &User,
        program: &Program,
        permission: APIPermission,
    ) -> bool {
        self.get_effective_user_program_api_permissions(user, program)
            .contains(&permission)
    }

    /// Organizations the user belongs to through organization groups.
    /// Groups that are not organization groups are skipped.
    pub fn get_user_organizations(&self, user: &User) -> HashSet<Organization> {
        let mut organizations = HashSet::new();
        for group in self.store.user_groups(user) {
            match self.store.organization_for_group(group) {
                Some(organization) => {
                    organizations.insert(organization);
                }
                None => trace!(group = group.0, "group is not an organization group"),
            }
        }
        organizations
    }
}
