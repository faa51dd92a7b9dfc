//! Authorization store integration
//!
//! The resolver reads grants and group memberships through
//! [`AuthorizationStore`]; the backing identity store lives outside this crate.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use uuid::Uuid;

use crate::permission::models::{GroupId, ObjectKey, Organization, User};

/// Read-only view over the identity and authorization store
pub trait AuthorizationStore: Send + Sync {
    /// Storage permission ids granted to the user on a specific object
    fn object_permissions(&self, user: &User, object: &ObjectKey) -> Vec<String>;

    /// Storage permission ids granted to the user globally, including via roles
    fn global_permissions(&self, user: &User) -> Vec<String>;

    /// Groups the user is a member of
    fn user_groups(&self, user: &User) -> Vec<GroupId>;

    /// Organization linked to a group, if the group is an organization group
    fn organization_for_group(&self, group: GroupId) -> Option<Organization>;
}

impl<S: AuthorizationStore + ?Sized> AuthorizationStore for std::sync::Arc<S> {
    fn object_permissions(&self, user: &User, object: &ObjectKey) -> Vec<String> {
        (**self).object_permissions(user, object)
    }

    fn global_permissions(&self, user: &User) -> Vec<String> {
        (**self).global_permissions(user)
    }

    fn user_groups(&self, user: &User) -> Vec<GroupId> {
        (**self).user_groups(user)
    }

    fn organization_for_group(&self, group: GroupId) -> Option<Organization> {
        (**self).organization_for_group(group)
    }
}

#[derive(Default)]
struct StoreState {
    global: HashMap<Uuid, HashSet<String>>,
    object: HashMap<(Uuid, ObjectKey), HashSet<String>>,
    memberships: HashMap<Uuid, Vec<GroupId>>,
    organization_groups: HashMap<GroupId, Organization>,
}

/// In-memory authorization store (for testing and fixtures)
#[derive(Default)]
pub struct InMemoryAuthorizationStore {
    state: RwLock<StoreState>,
}

impl InMemoryAuthorizationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant a storage permission to the user on every object
    pub fn grant_global(&self, user: &User, permission: impl Into<String>) {
        self.state
            .write()
            .global
            .entry(user.id)
            .or_default()
            .insert(permission.into());
    }

    /// Grant a storage permission to the user on a single object
    pub fn grant_object(&self, user: &User, object: ObjectKey, permission: impl Into<String>) {
        self.state
            .write()
            .object
            .entry((user.id, object))
            .or_default()
            .insert(permission.into());
    }

    /// Add the user to a group
    pub fn add_group_membership(&self, user: &User, group: GroupId) {
        let mut state = self.state.write();
        let groups = state.memberships.entry(user.id).or_default();
        if !groups.contains(&group) {
            groups.push(group);
        }
    }

    /// Mark a group as the organization group of `organization`
    pub fn link_organization_group(&self, group: GroupId, organization: Organization) {
        self.state
            .write()
            .organization_groups
            .insert(group, organization);
    }
}

impl AuthorizationStore for InMemoryAuthorizationStore {
    fn object_permissions(&self, user: &User, object: &ObjectKey) -> Vec<String> {
        self.state
            .read()
            .object
            .get(&(user.id, object.clone()))
            .map(|perms| perms.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn global_permissions(&self, user: &User) -> Vec<String> {
        self.state
            .read()
            .global
            .get(&user.id)
            .map(|perms| perms.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn user_groups(&self, user: &User) -> Vec<GroupId> {
        self.state
            .read()
            .memberships
            .get(&user.id)
            .cloned()
            .unwrap_or_default()
    }

    fn organization_for_group(&self, group: GroupId) -> Option<Organization> {
        self.state.read().organization_groups.get(&group).cloned()
    }
}
